use std::{borrow::Cow, sync::Arc};

use super::Descriptor;
use crate::parsing::{
    blocks::BlockParserFactory,
    inline::{DelimiterProcessor, InlineContentParser},
    post_process::NodePostProcessor,
};

/// A bundle of parsing behaviour composed into a parser at build time.
pub trait Extension: Send + Sync {
    /// Name used in configuration files and logs.
    fn name(&self) -> &str;

    fn extend(&self, registrar: &mut Registrar);
}

/// Collects the descriptors contributed by extensions.
///
/// Every method returns the new descriptor so constraints can be chained:
///
/// ```
/// # use markdown_loom_engine::registry::Registrar;
/// # use markdown_loom_engine::extensions::strikethrough::StrikethroughProcessor;
/// let mut registrar = Registrar::default();
/// registrar
///     .delimiter_processor("demo.strike", StrikethroughProcessor)
///     .after("core.emphasis_star");
/// ```
#[derive(Default)]
pub struct Registrar {
    pub(crate) block_factories: Vec<Descriptor<dyn BlockParserFactory>>,
    pub(crate) inline_parsers: Vec<Descriptor<dyn InlineContentParser>>,
    pub(crate) delimiter_processors: Vec<Descriptor<dyn DelimiterProcessor>>,
    pub(crate) post_processors: Vec<Descriptor<dyn NodePostProcessor>>,
}

impl Registrar {
    pub fn block_factory(
        &mut self,
        id: impl Into<Cow<'static, str>>,
        factory: impl BlockParserFactory + 'static,
    ) -> &mut Descriptor<dyn BlockParserFactory> {
        let item: Arc<dyn BlockParserFactory> = Arc::new(factory);
        push(&mut self.block_factories, Descriptor::new(id, item))
    }

    pub fn inline_parser(
        &mut self,
        id: impl Into<Cow<'static, str>>,
        parser: impl InlineContentParser + 'static,
    ) -> &mut Descriptor<dyn InlineContentParser> {
        let item: Arc<dyn InlineContentParser> = Arc::new(parser);
        push(&mut self.inline_parsers, Descriptor::new(id, item))
    }

    pub fn delimiter_processor(
        &mut self,
        id: impl Into<Cow<'static, str>>,
        processor: impl DelimiterProcessor + 'static,
    ) -> &mut Descriptor<dyn DelimiterProcessor> {
        let item: Arc<dyn DelimiterProcessor> = Arc::new(processor);
        push(&mut self.delimiter_processors, Descriptor::new(id, item))
    }

    pub fn post_processor(
        &mut self,
        id: impl Into<Cow<'static, str>>,
        processor: impl NodePostProcessor + 'static,
    ) -> &mut Descriptor<dyn NodePostProcessor> {
        let item: Arc<dyn NodePostProcessor> = Arc::new(processor);
        push(&mut self.post_processors, Descriptor::new(id, item))
    }
}

fn push<T: ?Sized>(list: &mut Vec<Descriptor<T>>, descriptor: Descriptor<T>) -> &mut Descriptor<T> {
    list.push(descriptor);
    let last = list.len() - 1;
    &mut list[last]
}
