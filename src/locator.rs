//! Discovery of the external `athon-format.py` script.
//!
//! The formatter is looked up in a short, fixed list of places: next to the
//! plugin, the system-wide bin directory, and the user's `~/.local/bin`.
//! The first path that exists wins.

use std::path::{Path, PathBuf};

use crate::config::FormatterConfig;

pub const DEFAULT_SCRIPT_NAME: &str = "athon-format.py";
pub const SYSTEM_BIN_DIR: &str = "/usr/local/bin";

#[derive(Debug, Clone)]
pub struct FormatterLocator {
    candidates: Vec<PathBuf>,
}

impl FormatterLocator {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    /// The standard search list for `script_name`, in priority order.
    ///
    /// An unknown home directory yields a relative `.local/bin/...` entry,
    /// which is what joining onto an empty home produces.
    pub fn default_candidates(
        plugin_dir: &Path,
        home: Option<&Path>,
        script_name: &str,
    ) -> Vec<PathBuf> {
        let home = home.map(Path::to_path_buf).unwrap_or_default();
        vec![
            plugin_dir.join("..").join(script_name),
            Path::new(SYSTEM_BIN_DIR).join(script_name),
            home.join(".local").join("bin").join(script_name),
        ]
    }

    /// Configured paths first, then the standard list.
    pub fn from_config(config: &FormatterConfig) -> Self {
        let mut candidates = config.path.clone();
        candidates.extend(Self::default_candidates(
            &plugin_dir(),
            dirs::home_dir().as_deref(),
            &config.script_name,
        ));
        Self::new(candidates)
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// First candidate that exists on disk.
    pub fn locate(&self) -> Option<PathBuf> {
        self.candidates.iter().find(|p| p.exists()).cloned()
    }
}

/// Directory the plugin is loaded from: the one holding the running binary.
fn plugin_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_candidate_order() {
        let candidates = FormatterLocator::default_candidates(
            Path::new("/opt/athon/plugin"),
            Some(Path::new("/home/ada")),
            DEFAULT_SCRIPT_NAME,
        );
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/opt/athon/plugin/../athon-format.py"),
                PathBuf::from("/usr/local/bin/athon-format.py"),
                PathBuf::from("/home/ada/.local/bin/athon-format.py"),
            ]
        );
    }

    #[test]
    fn test_missing_home() {
        let candidates =
            FormatterLocator::default_candidates(Path::new("/p"), None, DEFAULT_SCRIPT_NAME);
        assert_eq!(candidates[2], PathBuf::from(".local/bin/athon-format.py"));
    }

    #[test]
    fn test_nothing_found() {
        let dir = tempfile::tempdir().unwrap();
        let locator = FormatterLocator::new(vec![
            dir.path().join("a.py"),
            dir.path().join("b.py"),
            dir.path().join("c.py"),
        ]);
        assert_eq!(locator.locate(), None);
    }

    #[test]
    fn test_returns_existing_path_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let plugin = dir.path().join("plugin");
        std::fs::create_dir(&plugin).unwrap();
        std::fs::write(dir.path().join(DEFAULT_SCRIPT_NAME), "").unwrap();

        let candidates = vec![
            dir.path().join("missing.py"),
            plugin.join("..").join(DEFAULT_SCRIPT_NAME),
        ];
        let locator = FormatterLocator::new(candidates.clone());
        assert_eq!(locator.locate(), Some(candidates[1].clone()));
    }

    #[test]
    fn test_first_match_wins() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.py");
        let second = dir.path().join("second.py");
        std::fs::write(&first, "").unwrap();
        std::fs::write(&second, "").unwrap();

        let locator = FormatterLocator::new(vec![second.clone(), first.clone()]);
        assert_eq!(locator.locate(), Some(second));
    }

    #[test]
    fn test_configured_paths_come_first() {
        let config = FormatterConfig {
            path: vec![PathBuf::from("/custom/athon-format.py")],
            ..FormatterConfig::default()
        };
        let locator = FormatterLocator::from_config(&config);
        assert_eq!(locator.candidates().len(), 4);
        assert_eq!(locator.candidates()[0], PathBuf::from("/custom/athon-format.py"));
        assert_eq!(
            locator.candidates()[2],
            PathBuf::from("/usr/local/bin/athon-format.py")
        );
    }
}
