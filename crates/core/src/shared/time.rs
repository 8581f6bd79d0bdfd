/// Format a duration in whole seconds as `HH:MM:SS`.
///
/// The media engine's `-ss`/`-to` options accept this form directly.
pub fn format_seconds(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Format a duration in milliseconds as `HH:MM:SS.mmm`.
pub fn format_millis(total_millis: u64) -> String {
    let millis = total_millis % 1000;
    format!("{}.{millis:03}", format_seconds(total_millis / 1000))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, "00:00:00")]
    #[case(59, "00:00:59")]
    #[case(60, "00:01:00")]
    #[case(3600, "01:00:00")]
    #[case(3725, "01:02:05")]
    #[case(360_000, "100:00:00")]
    fn test_format_seconds(#[case] input: u64, #[case] expected: &str) {
        assert_eq!(format_seconds(input), expected);
    }

    #[rstest]
    #[case(0, "00:00:00.000")]
    #[case(1_000, "00:00:01.000")]
    #[case(2_500, "00:00:02.500")]
    #[case(3_661_007, "01:01:01.007")]
    fn test_format_millis(#[case] input: u64, #[case] expected: &str) {
        assert_eq!(format_millis(input), expected);
    }
}
