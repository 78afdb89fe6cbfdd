use std::{any::Any, fmt};

/// Stable index of a node in an [`Ast`](super::Ast) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Payload of a node kind contributed by an extension.
///
/// The core never inspects extension payloads; renderers and post-processors
/// that know the concrete type downcast through [`as_any`](Self::as_any).
pub trait ExtensionNode: fmt::Debug + Send + Sync + 'static {
    /// Kind name, e.g. `"Strikethrough"`.
    fn name(&self) -> &'static str;

    fn is_block(&self) -> bool;

    fn as_any(&self) -> &dyn Any;

    /// One-line summary used by tree dumps.
    fn describe(&self) -> String {
        self.name().to_string()
    }
}

/// Every kind of node the engine can produce.
///
/// Core kinds are closed so renderers match exhaustively; anything else lives
/// behind [`NodeKind::Extension`].
#[derive(Debug)]
pub enum NodeKind {
    // Blocks
    Document,
    BlockQuote,
    BulletList {
        marker: char,
        tight: bool,
    },
    OrderedList {
        start: u32,
        delimiter: char,
        tight: bool,
    },
    ListItem {
        /// Column of the list marker relative to the enclosing container.
        marker_indent: usize,
        /// Columns a continuation line must be indented to stay in the item.
        content_indent: usize,
    },
    Paragraph,
    Heading {
        level: u8,
        setext: bool,
    },
    FencedCodeBlock {
        fence_char: char,
        fence_len: usize,
        info: String,
        literal: String,
    },
    IndentedCodeBlock {
        literal: String,
    },
    ThematicBreak,
    HtmlBlock {
        literal: String,
    },
    LinkReferenceDefinition {
        label: String,
        destination: String,
        title: Option<String>,
    },

    // Inlines
    Text {
        literal: String,
    },
    Emphasis {
        delimiter: char,
    },
    StrongEmphasis {
        delimiter: char,
    },
    Code {
        literal: String,
    },
    Link {
        destination: String,
        title: Option<String>,
    },
    Image {
        destination: String,
        title: Option<String>,
    },
    AutoLink {
        destination: String,
        email: bool,
    },
    HtmlInline {
        literal: String,
    },
    SoftLineBreak,
    HardLineBreak,

    Extension(Box<dyn ExtensionNode>),
}

impl NodeKind {
    pub fn text(literal: impl Into<String>) -> Self {
        NodeKind::Text {
            literal: literal.into(),
        }
    }

    pub fn extension(node: impl ExtensionNode) -> Self {
        NodeKind::Extension(Box::new(node))
    }

    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Document => "Document",
            NodeKind::BlockQuote => "BlockQuote",
            NodeKind::BulletList { .. } => "BulletList",
            NodeKind::OrderedList { .. } => "OrderedList",
            NodeKind::ListItem { .. } => "ListItem",
            NodeKind::Paragraph => "Paragraph",
            NodeKind::Heading { .. } => "Heading",
            NodeKind::FencedCodeBlock { .. } => "FencedCodeBlock",
            NodeKind::IndentedCodeBlock { .. } => "IndentedCodeBlock",
            NodeKind::ThematicBreak => "ThematicBreak",
            NodeKind::HtmlBlock { .. } => "HtmlBlock",
            NodeKind::LinkReferenceDefinition { .. } => "LinkReferenceDefinition",
            NodeKind::Text { .. } => "Text",
            NodeKind::Emphasis { .. } => "Emphasis",
            NodeKind::StrongEmphasis { .. } => "StrongEmphasis",
            NodeKind::Code { .. } => "Code",
            NodeKind::Link { .. } => "Link",
            NodeKind::Image { .. } => "Image",
            NodeKind::AutoLink { .. } => "AutoLink",
            NodeKind::HtmlInline { .. } => "HtmlInline",
            NodeKind::SoftLineBreak => "SoftLineBreak",
            NodeKind::HardLineBreak => "HardLineBreak",
            NodeKind::Extension(ext) => ext.name(),
        }
    }

    pub fn is_block(&self) -> bool {
        match self {
            NodeKind::Document
            | NodeKind::BlockQuote
            | NodeKind::BulletList { .. }
            | NodeKind::OrderedList { .. }
            | NodeKind::ListItem { .. }
            | NodeKind::Paragraph
            | NodeKind::Heading { .. }
            | NodeKind::FencedCodeBlock { .. }
            | NodeKind::IndentedCodeBlock { .. }
            | NodeKind::ThematicBreak
            | NodeKind::HtmlBlock { .. }
            | NodeKind::LinkReferenceDefinition { .. } => true,
            NodeKind::Text { .. }
            | NodeKind::Emphasis { .. }
            | NodeKind::StrongEmphasis { .. }
            | NodeKind::Code { .. }
            | NodeKind::Link { .. }
            | NodeKind::Image { .. }
            | NodeKind::AutoLink { .. }
            | NodeKind::HtmlInline { .. }
            | NodeKind::SoftLineBreak
            | NodeKind::HardLineBreak => false,
            NodeKind::Extension(ext) => ext.is_block(),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, NodeKind::BulletList { .. } | NodeKind::OrderedList { .. })
    }

    /// Downcasts an extension payload to `T`.
    pub fn extension_ref<T: ExtensionNode>(&self) -> Option<&T> {
        match self {
            NodeKind::Extension(ext) => ext.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Kind name followed by a short payload summary.
    pub fn describe(&self) -> String {
        match self {
            NodeKind::BulletList { marker, tight } => {
                format!("BulletList marker={marker:?} tight={tight}")
            }
            NodeKind::OrderedList {
                start,
                delimiter,
                tight,
            } => format!("OrderedList start={start} delimiter={delimiter:?} tight={tight}"),
            NodeKind::Heading { level, setext } => {
                if *setext {
                    format!("Heading level={level} setext")
                } else {
                    format!("Heading level={level}")
                }
            }
            NodeKind::FencedCodeBlock { info, literal, .. } => {
                format!("FencedCodeBlock info={info:?} {literal:?}")
            }
            NodeKind::IndentedCodeBlock { literal } => format!("IndentedCodeBlock {literal:?}"),
            NodeKind::HtmlBlock { literal } => format!("HtmlBlock {literal:?}"),
            NodeKind::LinkReferenceDefinition {
                label,
                destination,
                title,
            } => match title {
                Some(title) => format!(
                    "LinkReferenceDefinition label={label:?} destination={destination:?} title={title:?}"
                ),
                None => {
                    format!("LinkReferenceDefinition label={label:?} destination={destination:?}")
                }
            },
            NodeKind::Text { literal } => format!("Text {literal:?}"),
            NodeKind::Code { literal } => format!("Code {literal:?}"),
            NodeKind::Link { destination, title } | NodeKind::Image { destination, title } => {
                match title {
                    Some(title) => format!(
                        "{} destination={destination:?} title={title:?}",
                        self.name()
                    ),
                    None => format!("{} destination={destination:?}", self.name()),
                }
            }
            NodeKind::AutoLink { destination, email } => {
                if *email {
                    format!("AutoLink destination={destination:?} email")
                } else {
                    format!("AutoLink destination={destination:?}")
                }
            }
            NodeKind::HtmlInline { literal } => format!("HtmlInline {literal:?}"),
            NodeKind::Extension(ext) => ext.describe(),
            NodeKind::Document
            | NodeKind::BlockQuote
            | NodeKind::ListItem { .. }
            | NodeKind::Paragraph
            | NodeKind::ThematicBreak
            | NodeKind::Emphasis { .. }
            | NodeKind::StrongEmphasis { .. }
            | NodeKind::SoftLineBreak
            | NodeKind::HardLineBreak => self.name().to_string(),
        }
    }
}
