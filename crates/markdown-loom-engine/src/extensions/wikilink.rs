use std::any::Any;

use crate::{
    ast::{ExtensionNode, NodeKind},
    error::ParseError,
    parsing::inline::{InlineContentParser, InlineScanner, ParsedInline},
    registry::{Extension, Registrar},
};

/// `[[target]]` or `[[target|alias]]`. The visible text, the alias when
/// present, is the node's only child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiLink {
    pub target: String,
    pub alias: Option<String>,
}

impl ExtensionNode for WikiLink {
    fn name(&self) -> &'static str {
        "WikiLink"
    }

    fn is_block(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn describe(&self) -> String {
        match &self.alias {
            Some(alias) => format!("WikiLink target={:?} alias={alias:?}", self.target),
            None => format!("WikiLink target={:?}", self.target),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WikiLinkParser;

impl WikiLinkParser {
    const OPEN: &'static str = "[[";
    const CLOSE: &'static str = "]]";
    const ALIAS: char = '|';
}

impl InlineContentParser for WikiLinkParser {
    fn triggers(&self) -> &[char] {
        &['[']
    }

    fn try_parse(&self, scanner: &InlineScanner<'_>) -> Result<Option<ParsedInline>, ParseError> {
        let Some(rest) = scanner.rest().strip_prefix(Self::OPEN) else {
            return Ok(None);
        };
        let Some(close) = rest.find(Self::CLOSE) else {
            return Ok(None);
        };
        let inner = &rest[..close];
        if inner.contains(['[', ']', '\n', '\r']) {
            return Ok(None);
        }

        let open = Self::OPEN.len();
        let (target, alias, visible) = match inner.split_once(Self::ALIAS) {
            Some((target, alias)) => {
                let alias_start = open + target.len() + Self::ALIAS.len_utf8();
                (target, Some(alias), alias_start..alias_start + alias.len())
            }
            None => (inner, None, open..open + inner.len()),
        };
        let target = target.trim();
        if target.is_empty() || alias.is_some_and(|a| a.trim().is_empty()) {
            return Ok(None);
        }

        let kind = NodeKind::extension(WikiLink {
            target: target.to_string(),
            alias: alias.map(|a| a.trim().to_string()),
        });
        let len = open + close + Self::CLOSE.len();
        Ok(Some(ParsedInline::new(kind, len).with_text_child(visible)))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct WikiLinkExtension;

impl Extension for WikiLinkExtension {
    fn name(&self) -> &str {
        "wikilink"
    }

    fn extend(&self, registrar: &mut Registrar) {
        registrar.inline_parser("wikilink.link", WikiLinkParser);
    }
}
