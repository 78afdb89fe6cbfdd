use std::sync::LazyLock;

use regex::Regex;

use crate::{
    ast::NodeKind,
    error::ParseError,
    parsing::inline::{InlineContentParser, InlineScanner, ParsedInline},
};

static URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<([a-zA-Z][a-zA-Z0-9.+-]{1,31}:[^<>\x00-\x20]*)>")
        .expect("static autolink pattern is valid")
});

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^<([a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*)>",
    )
    .expect("static email pattern is valid")
});

/// `<scheme:rest>` and `<user@host>`. The visible text is the address
/// between the angle brackets.
pub struct AutoLink;

impl AutoLink {
    pub const OPEN: char = '<';
}

impl InlineContentParser for AutoLink {
    fn triggers(&self) -> &[char] {
        &[Self::OPEN]
    }

    fn try_parse(&self, scanner: &InlineScanner<'_>) -> Result<Option<ParsedInline>, ParseError> {
        let rest = scanner.rest();
        for (pattern, email) in [(&*URI, false), (&*EMAIL, true)] {
            if let Some(caps) = pattern.captures(rest)
                && let (Some(whole), Some(address)) = (caps.get(0), caps.get(1))
            {
                let destination = if email {
                    format!("mailto:{}", address.as_str())
                } else {
                    address.as_str().to_string()
                };
                let kind = NodeKind::AutoLink { destination, email };
                return Ok(Some(
                    ParsedInline::new(kind, whole.end()).with_text_child(address.range()),
                ));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("<https://example.com/a?b> x", Some(("https://example.com/a?b", false, 25)))]
    #[case("<MAILTO:FOO@BAR.BAZ>", Some(("MAILTO:FOO@BAR.BAZ", false, 20)))]
    #[case("<foo@bar.example.com>", Some(("mailto:foo@bar.example.com", true, 21)))]
    #[case("<https://a b>", None)]
    #[case("<m:abc>", None)]
    #[case("<foo.bar>", None)]
    fn autolinks(#[case] text: &str, #[case] expected: Option<(&str, bool, usize)>) {
        let parsed = AutoLink
            .try_parse(&InlineScanner::new(text, 0))
            .expect("autolinks never fail");
        let got = parsed.map(|p| match p.kind() {
            NodeKind::AutoLink { destination, email } => (destination.clone(), *email, p.len()),
            other => panic!("unexpected {other:?}"),
        });
        assert_eq!(got, expected.map(|(d, e, l)| (d.to_string(), e, l)));
    }
}
