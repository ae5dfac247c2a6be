use crate::pipeline::RunSummary;

/// Output mode determines how the run summary is printed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Tty,
    Json,
}

/// Detect the appropriate output mode.
pub fn detect_output_mode(json_flag: bool) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }
    OutputMode::Tty
}

/// Print the run summary to stdout.
///
/// Status lines already went to stderr during the run, so TTY mode prints
/// nothing further.
pub fn print_summary(summary: &RunSummary, mode: OutputMode) -> anyhow::Result<()> {
    if mode == OutputMode::Json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    }
    Ok(())
}
