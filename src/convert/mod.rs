//! Page body to Markdown conversion.
//!
//! The sync pipeline only sees [`MarkdownConverter`]: give it a page id, get
//! Markdown back. [`NotionToMarkdown`] is the implementation backed by the
//! Notion block API.

pub mod blocks;

use anyhow::{Context, Result};
use log::debug;

use crate::api::{Block, BlockSource};

pub use blocks::render_blocks;

/// Renders the body of a page to Markdown.
pub trait MarkdownConverter {
    fn page_to_markdown(&self, page_id: &str) -> Result<String>;
}

/// A block together with its fetched descendants.
#[derive(Debug, Clone)]
pub struct BlockNode {
    pub block: Block,
    pub children: Vec<BlockNode>,
}

/// Converter that walks the page's block tree through a [`BlockSource`].
pub struct NotionToMarkdown<'a, S: BlockSource> {
    source: &'a S,
}

impl<'a, S: BlockSource> NotionToMarkdown<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Fetch the full ordered block tree under `block_id`.
    ///
    /// Child pages and databases are not descended into.
    pub fn fetch_tree(&self, block_id: &str) -> Result<Vec<BlockNode>> {
        let blocks = self
            .source
            .block_children(block_id)
            .with_context(|| format!("Failed to fetch blocks of {}", block_id))?;

        blocks
            .into_iter()
            .map(|block| {
                let children = if block.has_children && !is_subpage(&block) {
                    self.fetch_tree(&block.id)?
                } else {
                    Vec::new()
                };
                Ok(BlockNode { block, children })
            })
            .collect()
    }
}

fn is_subpage(block: &Block) -> bool {
    matches!(block.kind.as_str(), "child_page" | "child_database")
}

impl<S: BlockSource> MarkdownConverter for NotionToMarkdown<'_, S> {
    fn page_to_markdown(&self, page_id: &str) -> Result<String> {
        let tree = self.fetch_tree(page_id)?;
        debug!("Rendering {} top-level blocks for {}", tree.len(), page_id);
        Ok(render_blocks(&tree))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory block source keyed by parent id, recording every fetch.
    #[derive(Default)]
    struct FakeBlocks {
        children: HashMap<String, Vec<Block>>,
        fetched: RefCell<Vec<String>>,
    }

    impl FakeBlocks {
        fn with(mut self, parent: &str, blocks: Vec<serde_json::Value>) -> Self {
            let blocks = blocks
                .into_iter()
                .map(|b| serde_json::from_value(b).unwrap())
                .collect();
            self.children.insert(parent.to_string(), blocks);
            self
        }
    }

    impl BlockSource for FakeBlocks {
        fn block_children(&self, block_id: &str) -> Result<Vec<Block>, ApiError> {
            self.fetched.borrow_mut().push(block_id.to_string());
            self.children
                .get(block_id)
                .cloned()
                .ok_or_else(|| ApiError::Api {
                    status: 404,
                    code: Some("object_not_found".to_string()),
                    message: format!("Could not find block with ID: {}", block_id),
                    body: String::new(),
                })
        }
    }

    fn paragraph(id: &str, text: &str, has_children: bool) -> serde_json::Value {
        json!({
            "id": id,
            "type": "paragraph",
            "has_children": has_children,
            "paragraph": {"rich_text": [{"plain_text": text}]}
        })
    }

    #[test]
    fn test_single_paragraph_page() {
        let source = FakeBlocks::default().with("page-1", vec![paragraph("b1", "A paragraph.", false)]);
        let converter = NotionToMarkdown::new(&source);
        assert_eq!(converter.page_to_markdown("page-1").unwrap(), "A paragraph.");
        assert_eq!(*source.fetched.borrow(), vec!["page-1".to_string()]);
    }

    #[test]
    fn test_nested_children_fetched_in_order() {
        let source = FakeBlocks::default()
            .with(
                "page-1",
                vec![
                    json!({"id": "li", "type": "bulleted_list_item", "has_children": true,
                           "bulleted_list_item": {"rich_text": [{"plain_text": "Parent"}]}}),
                    paragraph("after", "After", false),
                ],
            )
            .with(
                "li",
                vec![json!({"id": "child", "type": "bulleted_list_item", "has_children": false,
                            "bulleted_list_item": {"rich_text": [{"plain_text": "Child"}]}})],
            );

        let converter = NotionToMarkdown::new(&source);
        assert_eq!(
            converter.page_to_markdown("page-1").unwrap(),
            "- Parent\n  - Child\n\nAfter"
        );
        assert_eq!(
            *source.fetched.borrow(),
            vec!["page-1".to_string(), "li".to_string()]
        );
    }

    #[test]
    fn test_child_pages_not_descended() {
        let source = FakeBlocks::default().with(
            "page-1",
            vec![
                json!({"id": "sub", "type": "child_page", "has_children": true,
                       "child_page": {"title": "Sub"}}),
                paragraph("p", "Body", false),
            ],
        );
        let converter = NotionToMarkdown::new(&source);
        assert_eq!(converter.page_to_markdown("page-1").unwrap(), "Body");
        assert_eq!(source.fetched.borrow().len(), 1);
    }

    #[test]
    fn test_fetch_error_propagates() {
        let source = FakeBlocks::default().with("page-1", vec![paragraph("b1", "x", true)]);
        let converter = NotionToMarkdown::new(&source);
        let err = converter.page_to_markdown("page-1").unwrap_err();
        assert!(err.to_string().contains("b1"));
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::Api { status: 404, .. })
        ));
    }
}
