use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::process::command_runner::{CommandRunner, ProcessError, RunOutput};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Runs external executables as OS child processes.
///
/// stdout and stderr are drained by dedicated reader threads into one
/// channel, so output is observed (and logged) as it arrives rather than
/// buffered until exit. The deadline is checked between reads; on expiry
/// the child is killed and `timed_out` is reported.
pub struct OsCommandRunner;

impl OsCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OsCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for OsCommandRunner {
    fn run(
        &self,
        program: &Path,
        args: &[String],
        timeout: Duration,
    ) -> Result<RunOutput, ProcessError> {
        log::debug!("running {} {}", program.display(), args.join(" "));

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ProcessError::Spawn {
                program: program.to_path_buf(),
                source: e,
            })?;

        let (tx, rx) = crossbeam_channel::unbounded::<String>();
        let stdout_reader = child.stdout.take().map(|s| spawn_line_reader(s, tx.clone()));
        let stderr_reader = child.stderr.take().map(|s| spawn_line_reader(s, tx));

        let deadline = Instant::now() + timeout;
        let (lines, mut timed_out) = drain_until_closed(&rx, deadline, &mut child);

        // A child can close its stdio and keep running; the deadline stays
        // in force until it actually exits.
        if !timed_out {
            timed_out = kill_after_deadline(&mut child, deadline);
        }
        let status = child.wait().map_err(|e| ProcessError::Wait {
            program: program.to_path_buf(),
            source: e,
        })?;
        if let Some(handle) = stdout_reader {
            let _ = handle.join();
        }
        if let Some(handle) = stderr_reader {
            let _ = handle.join();
        }

        let exit_code = if timed_out { None } else { status.code() };
        log::debug!(
            "{} finished: exit={exit_code:?} timed_out={timed_out}",
            program.display()
        );

        Ok(RunOutput {
            exit_code,
            lines,
            timed_out,
        })
    }
}

fn spawn_line_reader<R: Read + Send + 'static>(
    stream: R,
    tx: Sender<String>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let reader = BufReader::new(stream);
        for line in reader.lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.send(line).is_err() {
                break;
            }
        }
    })
}

/// Collect lines until both reader threads hang up, killing the child the
/// first time the deadline passes while it is still running.
fn drain_until_closed(
    rx: &Receiver<String>,
    deadline: Instant,
    child: &mut std::process::Child,
) -> (Vec<String>, bool) {
    let mut lines = Vec::new();
    let mut timed_out = false;

    loop {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(line) => {
                log::debug!("[engine] {line}");
                lines.push(line);
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if !timed_out && Instant::now() >= deadline {
            if let Ok(None) = child.try_wait() {
                log::warn!("process exceeded timeout, killing");
                let _ = child.kill();
                timed_out = true;
            }
        }
    }

    (lines, timed_out)
}

/// Poll for exit, killing the child if the deadline passes first.
fn kill_after_deadline(child: &mut std::process::Child, deadline: Instant) -> bool {
    loop {
        match child.try_wait() {
            Ok(None) => {}
            Ok(Some(_)) | Err(_) => return false,
        }
        if Instant::now() >= deadline {
            log::warn!("process exceeded timeout after closing its streams, killing");
            let _ = child.kill();
            return true;
        }
        thread::sleep(POLL_INTERVAL);
    }
}
