//! The sync run: query published rows, convert each body, write one
//! Markdown file per row.
//!
//! Rows are handled strictly one at a time in query order (newest `Date`
//! first), so when two rows share a slug the later-processed one wins.
//! Any error aborts the run; files already written stay on disk.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::debug;
use serde::Serialize;

use crate::api::QueryRows;
use crate::config::Config;
use crate::convert::MarkdownConverter;
use crate::frontmatter::build_document;
use crate::output::progress::{create_spinner, RowProgress, PREFIX};
use crate::post::PostMeta;
use crate::writer::{ensure_output_dir, post_path, write_post};

/// One generated post
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SyncedPost {
    pub page_id: String,
    pub title: String,
    pub slug: String,
    pub path: PathBuf,
}

/// Outcome of a completed run
#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    pub dry_run: bool,
    pub posts: Vec<SyncedPost>,
}

/// Run the sync.
///
/// `today` is the fallback date for rows without a `Date`.
pub fn run(
    config: &Config,
    rows: &impl QueryRows,
    converter: &impl MarkdownConverter,
    today: NaiveDate,
) -> Result<RunSummary> {
    debug!(
        "Starting sync (database={}, output={}, dry_run={})",
        config.database_id,
        config.output_dir.display(),
        config.dry_run
    );
    eprintln!("{} Fetching published posts from Notion...", PREFIX);

    let spinner = create_spinner("Querying database...");
    let pages = rows.query_database(&config.database_id);
    spinner.finish_and_clear();
    let pages = pages.context("Failed to query Notion database")?;
    eprintln!("{} Found {} published posts", PREFIX, pages.len());

    if !config.dry_run {
        ensure_output_dir(&config.output_dir)?;
    }

    let progress = RowProgress::new(pages.len() as u64);
    let mut summary = RunSummary {
        dry_run: config.dry_run,
        posts: Vec::with_capacity(pages.len()),
    };

    for page in &pages {
        let meta = PostMeta::from_page(page, today);
        debug!("Row {} -> slug {:?}", page.id, meta.slug);
        progress.set_current(&meta.title);

        let body = converter
            .page_to_markdown(&page.id)
            .with_context(|| format!("Failed to convert \"{}\" ({})", meta.title, page.id))?;
        let document = build_document(&meta, &body);

        let path = if config.dry_run {
            let path = post_path(&config.output_dir, &meta.slug);
            progress.println(&format!("[dry-run] Would write {}", path.display()));
            path
        } else {
            let path = write_post(&config.output_dir, &meta.slug, &document)?;
            progress.println(&format!("Wrote {}", path.display()));
            path
        };
        progress.inc();

        summary.posts.push(SyncedPost {
            page_id: page.id.clone(),
            title: meta.title,
            slug: meta.slug,
            path,
        });
    }
    progress.finish();

    eprintln!("{} Done: {} posts synced", PREFIX, summary.posts.len());
    Ok(summary)
}
