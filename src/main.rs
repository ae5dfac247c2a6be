mod api;
mod cli;
mod config;
mod convert;
mod frontmatter;
mod output;
mod pipeline;
mod post;
mod writer;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use api::{ApiClient, ApiError};
use cli::args::Cli;
use cli::context::RunContext;
use config::Config;
use convert::NotionToMarkdown;
use output::format::print_summary;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let ctx = RunContext::from_args(cli.json, cli.no_color);

    if let Err(err) = run(&cli, &ctx) {
        report_error(&err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli, ctx: &RunContext) -> Result<()> {
    // Config comes first: nothing touches the network or disk without it
    let config = Config::from_env(Some(cli.output_dir.clone()), cli.dry_run)?;

    let client = ApiClient::new(config.token.clone())?;
    let converter = NotionToMarkdown::new(&client);
    let today = chrono::Utc::now().date_naive();

    let summary = pipeline::run(&config, &client, &converter, today)?;
    print_summary(&summary, ctx.output_mode)
}

/// Print the error chain, plus the response details of a failed API call.
fn report_error(err: &anyhow::Error) {
    eprintln!("{} {}", "error:".red().bold(), err);
    for cause in err.chain().skip(1) {
        eprintln!("  caused by: {}", cause);
    }

    if let Some(ApiError::Api {
        status, code, body, ..
    }) = err.downcast_ref::<ApiError>()
    {
        eprintln!("  status: {}", status);
        if let Some(code) = code {
            eprintln!("  code: {}", code);
        }
        if !body.is_empty() {
            eprintln!("  body: {}", body);
        }
    }
}

/// Initialize logging based on the `--verbose` flag or `NOTION_POSTS_LOG` env var.
///
/// - `NOTION_POSTS_LOG` env var: full filter control (e.g. `NOTION_POSTS_LOG=notion_posts::api=trace`)
/// - `--verbose`: sets `notion_posts` crate to `Debug` level
/// - Otherwise: `Warn` level only (effectively silent)
fn init_logging(verbose: bool) {
    let env_var = std::env::var("NOTION_POSTS_LOG").ok();

    let mut builder = env_logger::Builder::new();
    builder.format_target(true);
    builder.format_module_path(false);

    if let Some(ref filter) = env_var {
        builder.parse_filters(filter);
    } else if verbose {
        builder.filter_module("notion_posts", log::LevelFilter::Debug);
    } else {
        builder.filter_level(log::LevelFilter::Warn);
    }

    builder.init();
}
