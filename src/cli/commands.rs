use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokio::io::AsyncReadExt;

use athon_fmt_plugin::config::{FallbackPolicy, PluginConfig};
use athon_fmt_plugin::plugin::{AthonPlugin, FormatterPlugin};

/// Format `text` under the configured fallback policy.
async fn format_source(
    plugin: &AthonPlugin,
    policy: FallbackPolicy,
    text: &str,
) -> Result<String> {
    match policy {
        FallbackPolicy::Passthrough => Ok(plugin.format(text).await),
        FallbackPolicy::Strict => plugin.try_format(text).await.context("Formatting failed"),
    }
}

pub async fn format_stdin(config: &PluginConfig) -> Result<ExitCode> {
    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("Failed to read source from stdin")?;

    let plugin = AthonPlugin::from_config(config);
    let formatted = format_source(&plugin, config.on_error, &input).await?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(formatted.as_bytes())?;
    stdout.flush()?;
    Ok(ExitCode::SUCCESS)
}

#[derive(Debug, PartialEq, Eq)]
enum Mode {
    Print,
    Check,
    Write,
}

#[derive(Debug, PartialEq, Eq)]
enum FileOutcome {
    Skipped,
    Printed,
    AlreadyFormatted,
    NeedsFormatting,
    Written,
}

async fn format_file(
    plugin: &AthonPlugin,
    policy: FallbackPolicy,
    file: &Path,
    mode: &Mode,
) -> Result<FileOutcome> {
    if !plugin.descriptor().claims(file) {
        tracing::warn!(
            component = "cli",
            file = %file.display(),
            "Not an Athōn source file, skipping"
        );
        return Ok(FileOutcome::Skipped);
    }

    // A fallback would read as "already formatted" in check and write modes
    let policy = match mode {
        Mode::Print => policy,
        Mode::Check | Mode::Write => FallbackPolicy::Strict,
    };

    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let formatted = format_source(plugin, policy, &content)
        .await
        .with_context(|| format!("Failed to format {}", file.display()))?;

    let outcome = match mode {
        Mode::Print => {
            print!("{formatted}");
            FileOutcome::Printed
        }
        Mode::Check if content == formatted => {
            println!("File {} is already formatted", file.display());
            FileOutcome::AlreadyFormatted
        }
        Mode::Check => {
            println!("File {} needs formatting", file.display());
            FileOutcome::NeedsFormatting
        }
        Mode::Write => {
            if content != formatted {
                std::fs::write(file, &formatted)
                    .with_context(|| format!("Failed to write {}", file.display()))?;
            }
            println!("Formatted {}", file.display());
            FileOutcome::Written
        }
    };

    Ok(outcome)
}

pub async fn format_files(
    config: &PluginConfig,
    files: &[PathBuf],
    check: bool,
    write: bool,
) -> Result<ExitCode> {
    let mode = if check {
        Mode::Check
    } else if write {
        Mode::Write
    } else {
        Mode::Print
    };

    let plugin = AthonPlugin::from_config(config);
    let mut needs_formatting = 0;

    for file in files {
        let outcome = format_file(&plugin, config.on_error, file, &mode).await?;
        if outcome == FileOutcome::NeedsFormatting {
            needs_formatting += 1;
        }
    }

    if needs_formatting > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

pub fn describe(config: &PluginConfig) -> Result<ExitCode> {
    let plugin = AthonPlugin::from_config(config);
    let json = plugin
        .descriptor()
        .to_json_pretty()
        .context("Failed to serialize plugin descriptor")?;
    println!("{json}");
    Ok(ExitCode::SUCCESS)
}

pub fn locate(config: &PluginConfig) -> Result<ExitCode> {
    let plugin = AthonPlugin::from_config(config);
    let locator = plugin.printer().locator();

    match locator.locate() {
        Some(path) => {
            println!("{}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("Athōn formatter not found. Searched:");
            for candidate in locator.candidates() {
                eprintln!("  {}", candidate.display());
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

pub fn show_config(config: &PluginConfig) -> Result<ExitCode> {
    print!("{}", config.to_toml()?);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use athon_fmt_plugin::config::PrintOptions;
    use athon_fmt_plugin::locator::FormatterLocator;
    use athon_fmt_plugin::printer::DelegatedPrinter;
    use tempfile::TempDir;

    fn plugin_with_script(body: &str) -> (TempDir, AthonPlugin) {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("athon-format.py");
        std::fs::write(&script, body).unwrap();
        let printer = DelegatedPrinter::new(FormatterLocator::new(vec![script]), "sh");
        (dir, AthonPlugin::new(printer, PrintOptions::default()))
    }

    #[tokio::test]
    async fn test_strict_policy_surfaces_failure() {
        let (_dir, plugin) = plugin_with_script("exit 2\n");
        assert!(format_source(&plugin, FallbackPolicy::Strict, "x").await.is_err());
        assert_eq!(
            format_source(&plugin, FallbackPolicy::Passthrough, "x").await.unwrap(),
            "x"
        );
    }

    #[tokio::test]
    async fn test_check_reports_without_writing() {
        let (dir, plugin) = plugin_with_script("tr a-z A-Z\n");
        let file = dir.path().join("main.at");
        std::fs::write(&file, "let x").unwrap();

        let outcome = format_file(&plugin, FallbackPolicy::Passthrough, &file, &Mode::Check)
            .await
            .unwrap();
        assert_eq!(outcome, FileOutcome::NeedsFormatting);
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "let x");
    }

    #[tokio::test]
    async fn test_check_already_formatted() {
        let (dir, plugin) = plugin_with_script("cat\n");
        let file = dir.path().join("main.at");
        std::fs::write(&file, "let x = 1\n").unwrap();

        let outcome = format_file(&plugin, FallbackPolicy::Passthrough, &file, &Mode::Check)
            .await
            .unwrap();
        assert_eq!(outcome, FileOutcome::AlreadyFormatted);
    }

    #[tokio::test]
    async fn test_write_rewrites_file() {
        let (dir, plugin) = plugin_with_script("tr a-z A-Z\n");
        let file = dir.path().join("main.at");
        std::fs::write(&file, "let x").unwrap();

        let outcome = format_file(&plugin, FallbackPolicy::Passthrough, &file, &Mode::Write)
            .await
            .unwrap();
        assert_eq!(outcome, FileOutcome::Written);
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "LET X");
    }

    #[tokio::test]
    async fn test_unclaimed_extension_is_skipped() {
        let (dir, plugin) = plugin_with_script("tr a-z A-Z\n");
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "hello").unwrap();

        let outcome = format_file(&plugin, FallbackPolicy::Passthrough, &file, &Mode::Write)
            .await
            .unwrap();
        assert_eq!(outcome, FileOutcome::Skipped);
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "hello");
    }

    fn plugin_without_formatter(dir: &Path) -> AthonPlugin {
        let locator = FormatterLocator::new(vec![dir.join("missing/athon-format.py")]);
        AthonPlugin::new(DelegatedPrinter::new(locator, "sh"), PrintOptions::default())
    }

    #[tokio::test]
    async fn test_check_fails_when_formatter_missing() {
        let dir = tempfile::tempdir().unwrap();
        let plugin = plugin_without_formatter(dir.path());
        let file = dir.path().join("main.at");
        std::fs::write(&file, "let x=1").unwrap();

        let result = format_file(&plugin, FallbackPolicy::Passthrough, &file, &Mode::Check).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_write_fails_when_formatter_errors() {
        let (dir, plugin) = plugin_with_script("exit 1\n");
        let file = dir.path().join("main.at");
        std::fs::write(&file, "let x=1").unwrap();

        let result = format_file(&plugin, FallbackPolicy::Passthrough, &file, &Mode::Write).await;
        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "let x=1");
    }

    #[tokio::test]
    async fn test_print_still_falls_back_when_formatter_missing() {
        let dir = tempfile::tempdir().unwrap();
        let plugin = plugin_without_formatter(dir.path());
        let file = dir.path().join("main.at");
        std::fs::write(&file, "let x=1").unwrap();

        let outcome = format_file(&plugin, FallbackPolicy::Passthrough, &file, &Mode::Print)
            .await
            .unwrap();
        assert_eq!(outcome, FileOutcome::Printed);
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let (dir, plugin) = plugin_with_script("cat\n");
        let file = dir.path().join("gone.at");
        assert!(format_file(&plugin, FallbackPolicy::Passthrough, &file, &Mode::Print)
            .await
            .is_err());
    }
}
