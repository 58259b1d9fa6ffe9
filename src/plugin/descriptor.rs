use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::config::PrintOptions;

pub const LANGUAGE_NAME: &str = "Athōn";
pub const PARSER_NAME: &str = "athon";
pub const AST_FORMAT: &str = "athon-ast";
pub const FILE_EXTENSION: &str = ".at";

/// Everything the host needs to register the plugin.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginDescriptor {
    pub languages: Vec<LanguageDescriptor>,
    pub parsers: BTreeMap<String, ParserDescriptor>,
    pub printers: Vec<String>,
    pub options: BTreeMap<String, OptionSpec>,
    pub default_options: DefaultOptions,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageDescriptor {
    pub name: String,
    pub parsers: Vec<String>,
    pub extensions: Vec<String>,
    pub vscode_language_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParserDescriptor {
    pub ast_format: String,
    pub loc_start: usize,
    pub loc_end: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub default: serde_json::Value,
    pub description: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DefaultOptions {
    pub print_width: u32,
    pub tab_width: u32,
    pub use_tabs: bool,
}

impl PluginDescriptor {
    pub fn athon(options: &PrintOptions) -> Self {
        let language = LanguageDescriptor {
            name: LANGUAGE_NAME.to_string(),
            parsers: vec![PARSER_NAME.to_string()],
            extensions: vec![FILE_EXTENSION.to_string()],
            vscode_language_ids: vec![PARSER_NAME.to_string()],
        };

        let mut parsers = BTreeMap::new();
        parsers.insert(
            PARSER_NAME.to_string(),
            ParserDescriptor {
                ast_format: AST_FORMAT.to_string(),
                loc_start: 0,
                loc_end: 0,
            },
        );

        let mut option_specs = BTreeMap::new();
        option_specs.insert(
            "indentSize".to_string(),
            OptionSpec {
                kind: "int".to_string(),
                category: LANGUAGE_NAME.to_string(),
                default: serde_json::json!(options.indent_size),
                description: "Number of spaces for indentation".to_string(),
            },
        );

        Self {
            languages: vec![language],
            parsers,
            printers: vec![AST_FORMAT.to_string()],
            options: option_specs,
            default_options: DefaultOptions {
                print_width: options.print_width,
                tab_width: options.tab_width,
                use_tabs: options.use_tabs,
            },
        }
    }

    /// Whether some declared language claims `path` by its extension.
    pub fn claims(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let ext = format!(".{ext}");
        self.languages
            .iter()
            .any(|lang| lang.extensions.iter().any(|e| *e == ext))
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
