#![allow(dead_code)]

use assert_cmd::Command;
use tempfile::TempDir;

/// An isolated working directory with the Notion variables cleared.
pub struct TestEnv {
    pub dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        TestEnv {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Get a Command that runs notion-posts inside this environment.
    pub fn cmd(&self) -> Command {
        let mut cmd = assert_cmd::cargo_bin_cmd!("notion-posts");
        cmd.current_dir(self.dir.path());
        cmd.env_remove("NOTION_TOKEN");
        cmd.env_remove("NOTION_DATABASE_ID");
        cmd.env_remove("NOTION_POSTS_LOG");
        // Ensure no color codes pollute test output
        cmd.env("NO_COLOR", "1");
        cmd
    }

    /// True if nothing was created in the working directory.
    pub fn is_untouched(&self) -> bool {
        std::fs::read_dir(self.dir.path()).unwrap().next().is_none()
    }
}
