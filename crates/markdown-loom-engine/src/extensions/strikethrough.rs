use std::any::Any;

use crate::{
    ast::{ExtensionNode, NodeKind},
    parsing::inline::{DelimiterProcessor, DelimiterRun},
    registry::{Extension, Registrar},
};

/// `~~deleted~~` text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strikethrough;

impl ExtensionNode for Strikethrough {
    fn name(&self) -> &'static str {
        "Strikethrough"
    }

    fn is_block(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Pairs runs of exactly two tildes. Longer runs stay text.
#[derive(Debug, Clone, Copy)]
pub struct StrikethroughProcessor;

impl StrikethroughProcessor {
    pub const TILDE: char = '~';
}

impl DelimiterProcessor for StrikethroughProcessor {
    fn opening_char(&self) -> char {
        Self::TILDE
    }

    fn closing_char(&self) -> char {
        Self::TILDE
    }

    fn min_length(&self) -> usize {
        2
    }

    fn process(&self, opener: &DelimiterRun, closer: &DelimiterRun) -> usize {
        if opener.orig_len == 2 && closer.orig_len == 2 {
            2
        } else {
            0
        }
    }

    fn wrap(&self, _used: usize) -> NodeKind {
        NodeKind::extension(Strikethrough)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StrikethroughExtension;

impl Extension for StrikethroughExtension {
    fn name(&self) -> &str {
        "strikethrough"
    }

    fn extend(&self, registrar: &mut Registrar) {
        registrar.delimiter_processor("strikethrough.tilde", StrikethroughProcessor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Parser;
    use pretty_assertions::assert_eq;

    fn dump(input: &str) -> String {
        let parser = Parser::builder()
            .extension(StrikethroughExtension)
            .build()
            .expect("build");
        let document = parser.parse(input).expect("parse");
        document.ast.dump().to_string()
    }

    #[test]
    fn double_tildes_strike_through() {
        assert_eq!(
            dump("a ~~b~~"),
            "Document @0..7\n  Paragraph @0..7\n    Text \"a \" @0..2\n    Strikethrough @2..7\n      Text \"b\" @4..5\n"
        );
    }

    #[test]
    fn single_and_triple_tildes_stay_text() {
        assert_eq!(
            dump("~a~ ~~~b~~~"),
            "Document @0..11\n  Paragraph @0..11\n    Text \"~a~ ~~~b~~~\" @0..11\n"
        );
    }

    #[test]
    fn unbalanced_runs_stay_text() {
        assert_eq!(
            dump("~~a~~~"),
            "Document @0..6\n  Paragraph @0..6\n    Text \"~~a~~~\" @0..6\n"
        );
    }
}
