//! # Inline Kinds
//!
//! Core inline syntax. Each type owns its delimiter characters; the engine
//! only knows them as triggers and delimiter characters.
//!
//! ## Types
//!
//! - **`BackslashEscape`**: `\` before punctuation or a line ending
//! - **`CodeSpan`**: backtick runs, a raw zone
//! - **`AutoLink`**: `<scheme:...>` and `<user@host>`
//! - **`HtmlInline`**: raw tags and comments
//! - **`EmphasisProcessor`**: `*` and `_` delimiter runs

pub mod autolink;
pub mod code_span;
pub mod emphasis;
pub mod escape;
pub mod html_inline;

pub use autolink::AutoLink;
pub use code_span::CodeSpan;
pub use emphasis::EmphasisProcessor;
pub use escape::BackslashEscape;
pub use html_inline::HtmlInline;

use crate::registry::Registrar;

/// Registers the core inline content parsers and delimiter processors.
pub(crate) fn register(registrar: &mut Registrar) {
    registrar.inline_parser("core.backslash_escape", BackslashEscape);
    registrar.inline_parser("core.code_span", CodeSpan);
    registrar.inline_parser("core.autolink", AutoLink);
    registrar
        .inline_parser("core.html_inline", HtmlInline)
        .after("core.autolink");
    registrar.delimiter_processor(
        "core.emphasis_star",
        EmphasisProcessor::new(EmphasisProcessor::STAR),
    );
    registrar.delimiter_processor(
        "core.emphasis_underscore",
        EmphasisProcessor::new(EmphasisProcessor::UNDERSCORE),
    );
}
