use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal};

/// Prefix for user-facing status lines on stderr.
pub const PREFIX: &str = "[notion-posts]";

/// Create a spinner for indeterminate-progress operations (e.g., waiting for an API response).
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("[notion-posts] {spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Per-row progress. Draws a bar when stderr is a TTY; status lines are
/// always printed, above the bar when one is active.
pub struct RowProgress {
    bar: Option<ProgressBar>,
}

impl RowProgress {
    pub fn new(total: u64) -> Self {
        let bar = if io::stderr().is_terminal() && total > 0 {
            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("[notion-posts] {pos}/{len} [{bar:30}] {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=> "),
            );
            Some(pb)
        } else {
            None
        };

        Self { bar }
    }

    /// Show which row is being converted.
    pub fn set_current(&self, title: &str) {
        if let Some(ref pb) = self.bar {
            pb.set_message(title.to_string());
        }
    }

    /// Print a prefixed status line.
    pub fn println(&self, msg: &str) {
        let line = format!("{} {}", PREFIX, msg);
        match self.bar {
            Some(ref pb) => pb.println(line),
            None => eprintln!("{}", line),
        }
    }

    pub fn inc(&self) {
        if let Some(ref pb) = self.bar {
            pb.inc(1);
        }
    }

    /// Finish and clear the progress bar.
    pub fn finish(&self) {
        if let Some(ref pb) = self.bar {
            pb.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_spinner() {
        let spinner = create_spinner("Testing...");
        spinner.finish_and_clear();
    }

    #[test]
    fn test_row_progress_without_rows_has_no_bar() {
        let progress = RowProgress::new(0);
        assert!(progress.bar.is_none());
        progress.set_current("ignored");
        progress.inc();
        progress.finish();
    }
}
