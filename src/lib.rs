//! Athōn language plugin for code-formatting hosts.
//!
//! Formatting itself is done by the external `athon-format.py` script; this
//! crate finds it, pipes source text through it and describes the language
//! to the host.

pub mod config;
pub mod error;
pub mod locator;
pub mod logging;
pub mod parser;
pub mod plugin;
pub mod printer;

pub use config::PluginConfig;
pub use error::FormatError;
pub use plugin::{AthonPlugin, FormatterPlugin, PluginDescriptor};
