//! Registration of the Athōn language with a formatting host.
//!
//! The host consumes a [`PluginDescriptor`] (languages, parsers, printers,
//! options) and drives formatting through the [`FormatterPlugin`] trait.

mod descriptor;

pub use descriptor::{
    DefaultOptions, LanguageDescriptor, OptionSpec, ParserDescriptor, PluginDescriptor, AST_FORMAT,
    FILE_EXTENSION, LANGUAGE_NAME, PARSER_NAME,
};

use crate::config::{PluginConfig, PrintOptions};
use crate::error::FormatError;
use crate::parser::{self, Program};
use crate::printer::DelegatedPrinter;

/// Interface a formatting host uses to drive a language plugin.
#[async_trait::async_trait]
pub trait FormatterPlugin: Send + Sync {
    /// Metadata the host registers: languages, parsers, printers, options.
    fn descriptor(&self) -> PluginDescriptor;

    fn parse(&self, text: &str) -> Program {
        parser::parse(text)
    }

    /// Render a parsed program. Never fails; see the plugin for its policy.
    async fn print(&self, program: &Program) -> String;

    async fn format(&self, text: &str) -> String {
        let program = self.parse(text);
        self.print(&program).await
    }
}

/// The Athōn plugin: pass-through parser plus the delegated printer.
#[derive(Debug, Clone)]
pub struct AthonPlugin {
    printer: DelegatedPrinter,
    options: PrintOptions,
}

impl AthonPlugin {
    pub fn new(printer: DelegatedPrinter, options: PrintOptions) -> Self {
        Self { printer, options }
    }

    pub fn from_config(config: &PluginConfig) -> Self {
        Self::new(DelegatedPrinter::from_config(&config.formatter), config.options)
    }

    pub fn printer(&self) -> &DelegatedPrinter {
        &self.printer
    }

    /// Like [`FormatterPlugin::format`] but reports formatter failures.
    pub async fn try_format(&self, text: &str) -> Result<String, FormatError> {
        let program = self.parse(text);
        self.printer.try_print(&program).await
    }
}

#[async_trait::async_trait]
impl FormatterPlugin for AthonPlugin {
    fn descriptor(&self) -> PluginDescriptor {
        PluginDescriptor::athon(&self.options)
    }

    async fn print(&self, program: &Program) -> String {
        self.printer.print(program).await
    }
}
