use std::{collections::HashSet, sync::Arc};

use crate::{
    ast::Ast,
    error::{ConfigError, ParseError},
    extensions,
    options::ParserOptions,
    parsing::{
        CoreSyntax,
        blocks::{BlockBuilder, BlockParserFactory},
        inline::{InlineSyntax, parse_inlines},
        post_process::{self, NodePostProcessor},
        references::ReferenceMap,
    },
    registry::{Descriptor, DescriptorKind, Extension, Registrar, resolve},
    sequence::BasedSequence,
};

/// The result of one parse.
#[derive(Debug)]
pub struct Document {
    pub ast: Ast,
    /// Link reference definitions, keyed by normalized label.
    pub references: ReferenceMap,
    /// The parsed input; every based node sequence is a view of it.
    pub source: BasedSequence,
}

/// Resolved, immutable parsing configuration shared by every parse.
struct ParserConfig {
    options: ParserOptions,
    block_factories: Vec<Descriptor<dyn BlockParserFactory>>,
    inline: InlineSyntax,
    post_processors: Vec<Descriptor<dyn NodePostProcessor>>,
}

/// A configured Markdown parser.
///
/// Building resolves every extension's contributions once; the parser can
/// then be cloned cheaply and used from any thread.
///
/// ```
/// use markdown_loom_engine::{Parser, extensions::StrikethroughExtension};
///
/// let parser = Parser::builder()
///     .extension(StrikethroughExtension)
///     .build()
///     .unwrap();
/// let document = parser.parse("~~gone~~ *here*").unwrap();
/// assert_eq!(document.ast.children(document.ast.root()).count(), 1);
/// ```
#[derive(Clone)]
pub struct Parser {
    config: Arc<ParserConfig>,
}

impl Parser {
    pub fn builder() -> ParserBuilder {
        ParserBuilder::default()
    }

    /// A parser with the core syntax and the given options.
    pub fn new(options: ParserOptions) -> Result<Self, ConfigError> {
        Self::builder().options(options).build()
    }

    pub fn options(&self) -> &ParserOptions {
        &self.config.options
    }

    pub fn parse(&self, input: &str) -> Result<Document, ParseError> {
        self.parse_sequence(BasedSequence::new(input))
    }

    /// Parses a sequence, which may itself be a view into a larger buffer.
    /// Node ranges are then offsets in that buffer.
    pub fn parse_sequence(&self, source: BasedSequence) -> Result<Document, ParseError> {
        let config = &*self.config;
        let blocks = BlockBuilder::parse(
            &config.block_factories,
            source.clone(),
            config.options.tab_width,
            config.options.line_endings,
        )?;
        let mut ast = blocks.ast;
        let references = blocks.references;

        for pending in &blocks.pending {
            if ast.is_attached(pending.node) {
                parse_inlines(
                    &config.inline,
                    &references,
                    &mut ast,
                    pending.node,
                    &pending.content,
                )?;
            }
        }
        post_process::run(&config.post_processors, &mut ast)?;

        log::debug!(
            "parsed {} bytes into {} nodes ({} references)",
            source.len(),
            ast.len(),
            references.len()
        );
        Ok(Document {
            ast,
            references,
            source,
        })
    }
}

/// Collects options and extensions for a [`Parser`].
#[derive(Default)]
pub struct ParserBuilder {
    options: ParserOptions,
    extensions: Vec<Arc<dyn Extension>>,
}

impl ParserBuilder {
    /// Replaces the options. Extensions named in them are added at build
    /// time, before the ones passed to [`extension`](Self::extension).
    pub fn options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    pub fn extension(mut self, extension: impl Extension + 'static) -> Self {
        self.extensions.push(Arc::new(extension));
        self
    }

    pub fn build(self) -> Result<Parser, ConfigError> {
        if self.options.tab_width < 1 {
            return Err(ConfigError::InvalidTabWidth);
        }

        let mut enabled: Vec<Arc<dyn Extension>> = vec![Arc::new(CoreSyntax)];
        for name in &self.options.extensions {
            let extension = extensions::by_name(name)
                .ok_or_else(|| ConfigError::UnknownExtension(name.clone()))?;
            enabled.push(extension);
        }
        enabled.extend(self.extensions);

        let mut registrar = Registrar::default();
        let mut seen = HashSet::new();
        for extension in &enabled {
            if !seen.insert(extension.name().to_string()) {
                log::debug!("extension `{}` enabled twice, skipping", extension.name());
                continue;
            }
            log::debug!("registering extension `{}`", extension.name());
            extension.extend(&mut registrar);
        }

        let block_factories = resolve(DescriptorKind::BlockFactory, registrar.block_factories)?;
        let inline_parsers = resolve(DescriptorKind::InlineParser, registrar.inline_parsers)?;
        let delimiter_processors = resolve(
            DescriptorKind::DelimiterProcessor,
            registrar.delimiter_processors,
        )?;
        let post_processors = resolve(DescriptorKind::PostProcessor, registrar.post_processors)?;
        let inline = InlineSyntax::new(&inline_parsers, &delimiter_processors)?;

        Ok(Parser {
            config: Arc::new(ParserConfig {
                options: self.options,
                block_factories,
                inline,
                post_processors,
            }),
        })
    }
}
