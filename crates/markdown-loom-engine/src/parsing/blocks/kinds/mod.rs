//! Core block syntax: one parser per block kind, plus the factories that
//! recognize their starts.

pub mod block_quote;
pub mod document;
pub mod fenced_code;
pub mod heading;
pub mod html_block;
pub mod indented_code;
pub mod list;
pub mod paragraph;
pub mod thematic_break;

use crate::registry::Registrar;

/// Registers the core block factories in their precedence order.
pub(crate) fn register(registrar: &mut Registrar) {
    registrar.block_factory("core.block_quote", block_quote::BlockQuoteFactory);
    registrar
        .block_factory("core.atx_heading", heading::AtxHeadingFactory)
        .after("core.block_quote");
    registrar
        .block_factory("core.fenced_code", fenced_code::FencedCodeFactory)
        .after("core.atx_heading");
    registrar
        .block_factory("core.html_block", html_block::HtmlBlockFactory)
        .after("core.fenced_code");
    registrar
        .block_factory("core.setext_heading", heading::SetextHeadingFactory)
        .after("core.html_block");
    // A setext underline made of dashes wins over a thematic break.
    registrar
        .block_factory("core.thematic_break", thematic_break::ThematicBreakFactory)
        .after("core.setext_heading");
    registrar
        .block_factory("core.list", list::ListFactory)
        .after("core.thematic_break");
    registrar
        .block_factory("core.indented_code", indented_code::IndentedCodeFactory)
        .after("core.list");
}
