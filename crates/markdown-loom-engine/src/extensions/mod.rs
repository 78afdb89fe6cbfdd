//! # Bundled Extensions
//!
//! Optional syntax built only on the public extension points, enabled by
//! name from [`ParserOptions::extensions`](crate::ParserOptions) or passed
//! to [`ParserBuilder::extension`](crate::ParserBuilder::extension).
//!
//! ## Extensions
//!
//! - **`strikethrough`**: `~~text~~` through a delimiter processor
//! - **`wikilink`**: `[[target|alias]]` through an inline content parser
//! - **`tasklist`**: `- [x] item` through a post-processor

pub mod strikethrough;
pub mod task_list;
pub mod wikilink;

pub use strikethrough::{Strikethrough, StrikethroughExtension};
pub use task_list::{TaskListExtension, TaskListItem};
pub use wikilink::{WikiLink, WikiLinkExtension};

use std::sync::Arc;

use crate::registry::Extension;

/// The bundled extension called `name` in configuration files.
pub fn by_name(name: &str) -> Option<Arc<dyn Extension>> {
    match name {
        "strikethrough" => Some(Arc::new(StrikethroughExtension)),
        "wikilink" => Some(Arc::new(WikiLinkExtension)),
        "tasklist" => Some(Arc::new(TaskListExtension)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("strikethrough")]
    #[case("wikilink")]
    #[case("tasklist")]
    fn names_round_trip(#[case] name: &str) {
        let extension = by_name(name).expect("bundled");
        assert_eq!(extension.name(), name);
    }

    #[test]
    fn unknown_names_are_none() {
        assert!(by_name("tables").is_none());
    }
}
