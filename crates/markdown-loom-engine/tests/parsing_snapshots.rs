mod common;

use insta::assert_snapshot;
use markdown_loom_engine::NodeKind;
use pretty_assertions::assert_eq;

use common::{check, core_parser, first, full_parser, inline_text};

fn dump(input: &str) -> String {
    let document = core_parser().parse(input).expect("parse");
    check(&document);
    document.ast.dump().to_string()
}

fn shape(input: &str) -> String {
    let document = core_parser().parse(input).expect("parse");
    check(&document);
    document.ast.dump().without_ranges().to_string()
}

#[test]
fn alternating_emphasis() {
    assert_snapshot!(dump("*a*b*c*"), @r#"
    Document @0..7
      Paragraph @0..7
        Emphasis @0..3
          Text "a" @1..2
        Text "b" @3..4
        Emphasis @4..7
          Text "c" @5..6
    "#);
}

#[test]
fn strong_emphasis_is_one_node() {
    assert_snapshot!(dump("**bold**"), @r#"
    Document @0..8
      Paragraph @0..8
        StrongEmphasis @0..8
          Text "bold" @2..6
    "#);
}

#[test]
fn unmatched_delimiter_is_literal() {
    assert_snapshot!(dump("*lonely"), @r#"
    Document @0..7
      Paragraph @0..7
        Text "*lonely" @0..7
    "#);
}

#[test]
fn nested_block_quotes_strip_their_prefix() {
    assert_snapshot!(dump("> > > text"), @r#"
    Document @0..10
      BlockQuote @0..10
        BlockQuote @2..10
          BlockQuote @4..10
            Paragraph @6..10
              Text "text" @6..10
    "#);
}

#[test]
fn empty_document_is_just_the_root() {
    let document = core_parser().parse("").expect("parse");
    assert_eq!(document.ast.len(), 1);
    assert_eq!(document.ast.children(document.ast.root()).count(), 0);
    assert_eq!(document.ast.dump().without_ranges().to_string(), "Document\n");
}

#[test]
fn mixed_document() {
    let input = "# Title\n\nSome *emph* and `code`.\n\n- one\n- two\n\n> quote\n";
    assert_snapshot!(shape(input), @r#"
    Document
      Heading level=1
        Text "Title"
      Paragraph
        Text "Some "
        Emphasis
          Text "emph"
        Text " and "
        Code "code"
        Text "."
      BulletList marker='-' tight=true
        ListItem
          Paragraph
            Text "one"
        ListItem
          Paragraph
            Text "two"
      BlockQuote
        Paragraph
          Text "quote"
    "#);
}

#[test]
fn references_resolve_before_inlines() {
    let input = "[foo] and ![img](/i.png)\n\n[foo]: /url \"title\"\n";
    assert_snapshot!(shape(input), @r#"
    Document
      Paragraph
        Link destination="/url" title="title"
          Text "foo"
        Text " and "
        Image destination="/i.png"
          Text "img"
      LinkReferenceDefinition label="foo" destination="/url" title="title"
    "#);
}

#[test]
fn fenced_code_keeps_its_info_and_lines() {
    assert_snapshot!(shape("```rust\nfn main() {}\n```\n"), @r#"
    Document
      FencedCodeBlock info="rust" "fn main() {}\n"
    "#);
}

#[test]
fn setext_heading_replaces_the_paragraph() {
    assert_snapshot!(dump("Title\n====="), @r#"
    Document @0..11
      Heading level=1 setext @0..11
        Text "Title" @0..5
    "#);
}

#[test]
fn lazy_continuation_stays_in_the_quote() {
    assert_snapshot!(shape("> first\nsecond"), @r#"
    Document
      BlockQuote
        Paragraph
          Text "first"
          SoftLineBreak
          Text "second"
    "#);
}

#[test]
fn hard_break_covers_trailing_spaces() {
    let document = core_parser().parse("a  \nb").expect("parse");
    check(&document);
    let br = first(&document, |k| matches!(k, NodeKind::HardLineBreak)).expect("hard break");
    assert_eq!(document.ast[br].chars.to_string(), "  \n");
    let para = first(&document, |k| matches!(k, NodeKind::Paragraph)).expect("paragraph");
    assert_eq!(inline_text(&document, para), "a  \nb");
}

#[test]
fn code_spans_are_raw_zones() {
    assert_snapshot!(shape("`*not emphasis*` <https://x.org>"), @r#"
    Document
      Paragraph
        Code "*not emphasis*"
        Text " "
        AutoLink destination="https://x.org"
          Text "https://x.org"
    "#);
}

#[test]
fn bundled_extensions_together() {
    let document = full_parser()
        .parse("- [x] ~~old~~ see [[Notes|notes]]\n- [ ] next")
        .expect("parse");
    check(&document);
    assert_snapshot!(document.ast.dump().without_ranges().to_string(), @r#"
    Document
      BulletList marker='-' tight=true
        TaskListItem checked
          Paragraph
            Strikethrough
              Text "old"
            Text " see "
            WikiLink target="Notes" alias="notes"
              Text "notes"
        TaskListItem
          Paragraph
            Text "next"
    "#);
}
