use std::path::PathBuf;

use clap::Parser;

/// Sync published Notion database rows into Markdown files.
///
/// Reads NOTION_TOKEN and NOTION_DATABASE_ID from the environment.
#[derive(Parser, Debug)]
#[command(name = "notion-posts", version = env!("NOTION_POSTS_VERSION"))]
pub struct Cli {
    /// Directory to write posts into
    #[arg(long, value_name = "DIR", default_value = crate::config::DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Query and convert, but don't write any files
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output for debugging API calls and conversion
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
