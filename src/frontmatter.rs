use crate::post::PostMeta;

/// Assemble the final Markdown document: front matter, a blank line, then
/// `body` verbatim.
///
/// Only the title is escaped (`"` becomes `\"`). Slug, date and tags are
/// interpolated as-is, and `draft` is always written as `false`.
pub fn build_document(meta: &PostMeta, body: &str) -> String {
    let tags = meta
        .tags
        .iter()
        .map(|t| format!("\"{}\"", t))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "---\ntitle: \"{title}\"\ndate: \"{date}\"\nslug: \"{slug}\"\ntags: [{tags}]\ndraft: false\n---\n\n{body}",
        title = meta.title.replace('"', "\\\""),
        date = meta.date,
        slug = meta.slug,
        tags = tags,
        body = body,
    )
}
