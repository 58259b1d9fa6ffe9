use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PluginConfig {
    /// What to do when the external formatter fails
    #[serde(default)]
    pub on_error: FallbackPolicy,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub formatter: FormatterConfig,
    #[serde(default)]
    pub options: PrintOptions,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Policy applied when the delegated print step fails.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Log the failure and return the original text (default)
    #[default]
    Passthrough,
    /// Surface the failure to the caller
    Strict,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    pub base_dir: Option<String>,
}

impl PathsConfig {
    pub fn base_dir(&self) -> PathBuf {
        if let Some(ref base) = self.base_dir {
            PathBuf::from(base)
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".athon")
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.base_dir().join("fmt.toml")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir().join("logs")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatterConfig {
    /// Program used to run the formatter script (default: "python3")
    #[serde(default = "default_interpreter")]
    pub interpreter: String,
    /// File name searched for in the standard locations
    #[serde(default = "default_script_name")]
    pub script_name: String,
    /// Extra candidate paths, tried before the standard locations
    #[serde(default)]
    pub path: Vec<PathBuf>,
    /// Kill the formatter after this many seconds (unbounded when unset)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            script_name: default_script_name(),
            path: Vec::new(),
            timeout_secs: None,
        }
    }
}

fn default_interpreter() -> String {
    "python3".to_string()
}

fn default_script_name() -> String {
    "athon-format.py".to_string()
}

/// Print options published to the host as the plugin's defaults.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrintOptions {
    #[serde(default = "default_indent_size")]
    pub indent_size: u32,
    #[serde(default = "default_print_width")]
    pub print_width: u32,
    #[serde(default = "default_tab_width")]
    pub tab_width: u32,
    #[serde(default)]
    pub use_tabs: bool,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            indent_size: default_indent_size(),
            print_width: default_print_width(),
            tab_width: default_tab_width(),
            use_tabs: false,
        }
    }
}

fn default_indent_size() -> u32 {
    4
}

fn default_print_width() -> u32 {
    100
}

fn default_tab_width() -> u32 {
    4
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Also write JSON logs under the logs directory
    #[serde(default)]
    pub file: bool,
}

impl PluginConfig {
    /// Load from the default location, falling back to defaults when absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&PathsConfig::default().config_file())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
