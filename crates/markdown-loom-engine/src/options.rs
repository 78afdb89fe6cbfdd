use serde::{Deserialize, Serialize};

/// What line endings look like in node chars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEndings {
    /// Keep `\n`, `\r\n` and `\r` as written, as views of the input.
    #[default]
    Preserve,
    /// Replace every line ending with a synthetic `\n`.
    Normalize,
}

/// Per-parser settings, usually read from the `[parser]` table of a config
/// file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Columns between tab stops.
    pub tab_width: usize,
    pub line_endings: LineEndings,
    /// Bundled extensions to enable, by name.
    pub extensions: Vec<String>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            tab_width: 4,
            line_endings: LineEndings::default(),
            extensions: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_commonmark() {
        let options = ParserOptions::default();
        assert_eq!(options.tab_width, 4);
        assert_eq!(options.line_endings, LineEndings::Preserve);
        assert!(options.extensions.is_empty());
    }

    #[test]
    fn line_endings_serialize_lowercase() {
        #[derive(Serialize)]
        struct Wrapper {
            line_endings: LineEndings,
        }
        let encoded = toml::to_string(&Wrapper {
            line_endings: LineEndings::Normalize,
        })
        .expect("serialize");
        assert_eq!(encoded.trim(), "line_endings = \"normalize\"");
    }
}
