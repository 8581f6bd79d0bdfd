pub mod command_runner;
pub mod os_runner;
