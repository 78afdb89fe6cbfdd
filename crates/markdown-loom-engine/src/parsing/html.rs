//! Raw HTML patterns shared by HTML blocks and inline HTML.

use std::sync::LazyLock;

use regex::Regex;

const TAG_NAME: &str = "[A-Za-z][A-Za-z0-9-]*";
const ATTRIBUTE_NAME: &str = "[a-zA-Z_:][a-zA-Z0-9:._-]*";
const UNQUOTED_VALUE: &str = "[^\"'=<>`\\x00-\\x20]+";
const SINGLE_QUOTED_VALUE: &str = "'[^']*'";
const DOUBLE_QUOTED_VALUE: &str = "\"[^\"]*\"";

fn attribute() -> String {
    let value = format!("(?:{UNQUOTED_VALUE}|{SINGLE_QUOTED_VALUE}|{DOUBLE_QUOTED_VALUE})");
    format!("(?:\\s+{ATTRIBUTE_NAME}(?:\\s*=\\s*{value})?)")
}

/// `<tag attr="x">` or `<tag/>`.
pub fn open_tag() -> String {
    format!("<{TAG_NAME}{}*\\s*/?>", attribute())
}

/// `</tag>`.
pub fn close_tag() -> String {
    format!("</{TAG_NAME}\\s*>")
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static HTML pattern is valid")
}

/// Any inline HTML construct, anchored at the start of the input.
pub static INLINE_HTML: LazyLock<Regex> = LazyLock::new(|| {
    let comment = "<!-->|<!--->|<!--(?s:.*?)-->";
    let processing = "<\\?(?s:.*?)\\?>";
    let declaration = "<![A-Za-z][^>]*>";
    let cdata = "<!\\[CDATA\\[(?s:.*?)\\]\\]>";
    compile(&format!(
        "^(?:{}|{}|{comment}|{processing}|{declaration}|{cdata})",
        open_tag(),
        close_tag()
    ))
});

/// Start and end conditions of the seven HTML block kinds. Kinds 6 and 7
/// have no end pattern; a blank line ends them.
pub static HTML_BLOCK_KINDS: LazyLock<[(Regex, Option<Regex>); 7]> = LazyLock::new(|| {
    let block_tags = "address|article|aside|base|basefont|blockquote|body|caption|center|col\
        |colgroup|dd|details|dialog|dir|div|dl|dt|fieldset|figcaption|figure|footer|form|frame\
        |frameset|h1|h2|h3|h4|h5|h6|head|header|hr|html|iframe|legend|li|link|main|menu|menuitem\
        |nav|noframes|ol|optgroup|option|p|param|search|section|summary|table|tbody|td|tfoot|th\
        |thead|title|tr|track|ul";
    [
        (
            compile("(?i)^<(?:script|pre|style|textarea)(?:\\s|>|$)"),
            Some(compile("(?i)</(?:script|pre|style|textarea)>")),
        ),
        (compile("^<!--"), Some(compile("-->"))),
        (compile("^<\\?"), Some(compile("\\?>"))),
        (compile("^<![A-Za-z]"), Some(compile(">"))),
        (compile("^<!\\[CDATA\\["), Some(compile("\\]\\]>"))),
        (
            compile(&format!("(?i)^</?(?:{block_tags})(?:\\s|/?>|$)")),
            None,
        ),
        (
            compile(&format!("(?i)^(?:{}|{})\\s*$", open_tag(), close_tag())),
            None,
        ),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("<a href=\"x\">", true)]
    #[case("<br/>", true)]
    #[case("</em >", true)]
    #[case("<!-- c -->", true)]
    #[case("<!-->", true)]
    #[case("<?php x ?>", true)]
    #[case("<!DOCTYPE html>", true)]
    #[case("<![CDATA[x]]>", true)]
    #[case("<a href=>", false)]
    #[case("< a>", false)]
    #[case("<33>", false)]
    fn inline_html(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(INLINE_HTML.is_match(input), expected);
    }

    #[test]
    fn block_kind_six_matches_known_tags_only() {
        let (open, close) = &HTML_BLOCK_KINDS[5];
        assert!(open.is_match("<DIV class=\"x\">"));
        assert!(open.is_match("</table>"));
        assert!(!open.is_match("<divider>"));
        assert!(close.is_none());
    }

    #[test]
    fn block_kind_seven_needs_complete_tag_alone() {
        let (open, _) = &HTML_BLOCK_KINDS[6];
        assert!(open.is_match("<custom-tag attr='1'>  "));
        assert!(!open.is_match("<custom-tag> text"));
    }
}
