use serde::Deserialize;
use serde_json::Value;

use super::BlockNode;
use crate::api::RichText;

const LIST_KINDS: &[&str] = &["bulleted_list_item", "numbered_list_item", "to_do", "toggle"];

/// Convert a page body (a tree of Notion blocks) to Markdown.
///
/// Handles paragraph, heading_1..3, bulleted/numbered list items, to_do,
/// toggle, quote, callout, code, divider, equation, image, bookmark-like
/// media blocks, and tables. Unknown blocks fall back to their rich text
/// followed by their children.
pub fn render_blocks(nodes: &[BlockNode]) -> String {
    let mut output = String::new();
    render_nodes(nodes, &mut output, 0);
    output.trim_end().to_string()
}

fn render_nodes(nodes: &[BlockNode], output: &mut String, depth: usize) {
    let mut number = 0;
    let mut in_list = false;

    for node in nodes {
        let kind = node.block.kind.as_str();
        let is_list = LIST_KINDS.contains(&kind);

        if kind == "numbered_list_item" {
            number += 1;
        } else {
            number = 0;
        }
        // A list run ends: separate it from the next block
        if in_list && !is_list {
            output.push('\n');
        }
        in_list = is_list;

        render_node(node, output, depth, number);
    }
}

fn render_node(node: &BlockNode, output: &mut String, depth: usize, number: usize) {
    let payload = node.block.payload();
    let indent = list_indent(depth);

    match node.block.kind.as_str() {
        "paragraph" => {
            let text = render_rich_text(&rich_text(payload));
            if !text.is_empty() {
                output.push_str(&indent);
                output.push_str(&text);
                output.push_str("\n\n");
            }
            render_nodes(&node.children, output, depth);
        }
        kind @ ("heading_1" | "heading_2" | "heading_3") => {
            let level = kind.trim_start_matches("heading_").parse::<usize>().unwrap_or(1);
            let text = format!("{} {}", "#".repeat(level), render_rich_text(&rich_text(payload)));
            push_indented(&text, output, &indent);
            render_nodes(&node.children, output, depth);
        }
        "bulleted_list_item" | "toggle" => {
            render_list_item(node, output, depth, "- ".to_string());
        }
        "numbered_list_item" => {
            render_list_item(node, output, depth, format!("{}. ", number));
        }
        "to_do" => {
            let checked = payload
                .and_then(|p| p.get("checked"))
                .and_then(|c| c.as_bool())
                .unwrap_or(false);
            let marker = if checked { "- [x] " } else { "- [ ] " };
            render_list_item(node, output, depth, marker.to_string());
        }
        "quote" => {
            let text = render_rich_text(&rich_text(payload));
            push_quoted(&text, output, &indent);
            render_nodes(&node.children, output, depth);
        }
        "callout" => {
            let mut text = render_rich_text(&rich_text(payload));
            if let Some(emoji) = payload
                .and_then(|p| p.get("icon"))
                .and_then(|i| i.get("emoji"))
                .and_then(|e| e.as_str())
            {
                text = format!("{} {}", emoji, text);
            }
            push_quoted(&text, output, &indent);
            render_nodes(&node.children, output, depth);
        }
        "code" => {
            let language = payload
                .and_then(|p| p.get("language"))
                .and_then(|l| l.as_str())
                .filter(|l| *l != "plain text")
                .unwrap_or("");
            let code: String = rich_text(payload).iter().map(|t| t.plain_text.as_str()).collect();
            push_indented(&format!("```{}\n{}\n```", language, code), output, &indent);
        }
        "divider" => {
            push_indented("---", output, &indent);
        }
        "equation" => {
            let expression = payload
                .and_then(|p| p.get("expression"))
                .and_then(|e| e.as_str())
                .unwrap_or("");
            push_indented(&format!("$$\n{}\n$$", expression), output, &indent);
        }
        "image" => {
            if let Some(url) = media_url(payload) {
                let caption = plain_caption(payload);
                push_indented(&format!("![{}]({})", caption, url), output, &indent);
            }
        }
        "bookmark" | "embed" | "link_preview" | "video" | "pdf" | "file" | "audio" => {
            if let Some(url) = media_url(payload) {
                let caption = plain_caption(payload);
                let label = if caption.is_empty() { url.clone() } else { caption };
                push_indented(&format!("[{}]({})", label, url), output, &indent);
            }
        }
        "table" => {
            render_table(node, output);
        }
        "child_page" | "child_database" => {
            // Sub-pages are separate documents
        }
        _ => {
            // Unknown block: render its text, then its children
            let text = render_rich_text(&rich_text(payload));
            if !text.is_empty() {
                output.push_str(&indent);
                output.push_str(&text);
                output.push_str("\n\n");
            }
            render_nodes(&node.children, output, depth);
        }
    }
}

fn render_list_item(node: &BlockNode, output: &mut String, depth: usize, marker: String) {
    output.push_str(&list_indent(depth));
    output.push_str(&marker);
    output.push_str(&render_rich_text(&rich_text(node.block.payload())));
    output.push('\n');
    render_nodes(&node.children, output, depth + 1);
}

fn render_table(node: &BlockNode, output: &mut String) {
    let has_header = node
        .block
        .payload()
        .and_then(|p| p.get("has_column_header"))
        .and_then(|h| h.as_bool())
        .unwrap_or(true);

    let rows: Vec<Vec<String>> = node
        .children
        .iter()
        .filter(|c| c.block.kind == "table_row")
        .map(|row| {
            row.block
                .payload()
                .and_then(|p| p.get("cells"))
                .and_then(|c| Vec::<Vec<RichText>>::deserialize(c).ok())
                .unwrap_or_default()
                .iter()
                .map(|cell| render_rich_text(cell).replace('|', "\\|"))
                .collect()
        })
        .collect();

    let Some(width) = rows.iter().map(|r| r.len()).max().filter(|w| *w > 0) else {
        return;
    };

    let separator = format!("|{}\n", " --- |".repeat(width));

    let mut body = rows.iter();
    if has_header {
        if let Some(header) = body.next() {
            output.push_str(&format_row(header, width));
        }
    } else {
        output.push_str(&format_row(&[], width));
    }
    output.push_str(&separator);
    for row in body {
        output.push_str(&format_row(row, width));
    }
    output.push('\n');
}

fn format_row(cells: &[String], width: usize) -> String {
    let mut padded: Vec<&str> = cells.iter().map(|c| c.as_str()).collect();
    padded.resize(width, "");
    format!("| {} |\n", padded.join(" | "))
}

/// Push a block at the given indent, every line prefixed, followed by a blank line.
fn push_indented(text: &str, output: &mut String, indent: &str) {
    for line in text.lines() {
        if !line.is_empty() {
            output.push_str(indent);
        }
        output.push_str(line);
        output.push('\n');
    }
    output.push('\n');
}

fn push_quoted(text: &str, output: &mut String, indent: &str) {
    for line in text.lines() {
        output.push_str(indent);
        output.push_str("> ");
        output.push_str(line);
        output.push('\n');
    }
    output.push('\n');
}

/// Decode the `rich_text` array of a block payload.
fn rich_text(payload: Option<&Value>) -> Vec<RichText> {
    payload
        .and_then(|p| p.get("rich_text"))
        .and_then(|rt| Vec::<RichText>::deserialize(rt).ok())
        .unwrap_or_default()
}

/// Render rich text fragments to inline Markdown.
pub fn render_rich_text(fragments: &[RichText]) -> String {
    fragments.iter().map(apply_annotations).collect()
}

fn apply_annotations(fragment: &RichText) -> String {
    let text = &fragment.plain_text;
    // Markers around pure whitespace produce broken Markdown
    if text.trim().is_empty() {
        return text.clone();
    }

    // Markers must hug the text: `**bold **` is not bold in CommonMark
    let body = text.trim_start();
    let leading = &text[..text.len() - body.len()];
    let core = body.trim_end();
    let trailing = &body[core.len()..];

    let notes = &fragment.annotations;
    let mut result = core.to_string();
    if notes.code {
        result = format!("`{}`", result);
    }
    if notes.bold {
        result = format!("**{}**", result);
    }
    if notes.italic {
        result = format!("_{}_", result);
    }
    if notes.strikethrough {
        result = format!("~~{}~~", result);
    }
    if let Some(ref href) = fragment.href {
        result = format!("[{}]({})", result, href);
    }

    format!("{}{}{}", leading, result, trailing)
}

/// URL of a media or link block (`external`/`file` hosted, or a bare `url`).
fn media_url(payload: Option<&Value>) -> Option<String> {
    let payload = payload?;
    payload
        .get("url")
        .or_else(|| payload.get("external").and_then(|e| e.get("url")))
        .or_else(|| payload.get("file").and_then(|f| f.get("url")))
        .and_then(|u| u.as_str())
        .map(|s| s.to_string())
}

fn plain_caption(payload: Option<&Value>) -> String {
    payload
        .and_then(|p| p.get("caption"))
        .and_then(|c| Vec::<RichText>::deserialize(c).ok())
        .unwrap_or_default()
        .iter()
        .map(|t| t.plain_text.as_str())
        .collect()
}

fn list_indent(depth: usize) -> String {
    "  ".repeat(depth)
}
