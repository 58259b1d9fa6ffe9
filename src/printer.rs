//! Delegated print step.
//!
//! Runs `python3 <athon-format.py> --stdin`, feeds it the source text and
//! returns whatever it prints. On any failure the original text is returned
//! so formatting can never corrupt the caller's content.

use std::io::ErrorKind;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::FormatterConfig;
use crate::error::FormatError;
use crate::locator::FormatterLocator;
use crate::parser::Program;

#[derive(Debug, Clone)]
pub struct DelegatedPrinter {
    locator: FormatterLocator,
    interpreter: String,
    timeout: Option<Duration>,
}

impl DelegatedPrinter {
    pub fn new(locator: FormatterLocator, interpreter: impl Into<String>) -> Self {
        Self {
            locator,
            interpreter: interpreter.into(),
            timeout: None,
        }
    }

    pub fn from_config(config: &FormatterConfig) -> Self {
        Self::new(FormatterLocator::from_config(config), &config.interpreter)
            .with_timeout(config.timeout_secs.map(Duration::from_secs))
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn locator(&self) -> &FormatterLocator {
        &self.locator
    }

    /// Format `program`, falling back to its original text on failure.
    pub async fn print(&self, program: &Program) -> String {
        match self.try_print(program).await {
            Ok(formatted) => formatted,
            Err(e) => {
                if e.is_not_found() {
                    tracing::warn!(
                        component = "printer",
                        "Athōn formatter not found, returning original text"
                    );
                } else {
                    tracing::error!(
                        component = "printer",
                        error = %e,
                        "Formatter error, returning original text"
                    );
                }
                program.body.clone()
            }
        }
    }

    /// Format `program`, reporting why it failed instead of falling back.
    pub async fn try_print(&self, program: &Program) -> Result<String, FormatError> {
        let formatter = self
            .locator
            .locate()
            .ok_or_else(|| FormatError::NotFound {
                searched: self.locator.candidates().to_vec(),
            })?;

        tracing::debug!(
            component = "printer",
            formatter = %formatter.display(),
            interpreter = %self.interpreter,
            bytes = program.body.len(),
            "Running external formatter"
        );

        match self.timeout {
            Some(after) => tokio::time::timeout(after, self.run(&formatter, &program.body))
                .await
                .map_err(|_| FormatError::Timeout { after })?,
            None => self.run(&formatter, &program.body).await,
        }
    }

    async fn run(&self, formatter: &Path, text: &str) -> Result<String, FormatError> {
        let mut cmd = Command::new(&self.interpreter);
        cmd.arg(formatter).arg("--stdin");
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        // Dropping the future on timeout must not leave the formatter running
        cmd.kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|source| FormatError::Spawn {
            interpreter: self.interpreter.clone(),
            source,
        })?;

        let mut stdin = child.stdin.take().ok_or_else(|| {
            std::io::Error::new(ErrorKind::BrokenPipe, "formatter stdin unavailable")
        })?;

        // Write on a separate task so a full stdout pipe cannot stall us
        let input = text.as_bytes().to_vec();
        let writer = tokio::spawn(async move {
            stdin.write_all(&input).await?;
            stdin.shutdown().await
        });

        let output = child.wait_with_output().await?;

        match writer.await {
            Ok(Ok(())) => {}
            // The formatter may exit without draining its input
            Ok(Err(e)) if e.kind() == ErrorKind::BrokenPipe => {
                tracing::debug!(component = "printer", "Formatter closed stdin early");
            }
            Ok(Err(e)) => return Err(e.into()),
            Err(e) => return Err(writer_lost(e)),
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            return Err(FormatError::Exit {
                status: output.status,
                stderr,
            });
        }

        if !stderr.is_empty() {
            tracing::warn!(component = "printer", stderr = %stderr, "Formatter wrote to stderr");
        }

        tracing::debug!(
            component = "printer",
            status = %output.status,
            bytes = output.stdout.len(),
            "External formatter finished"
        );

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// A writer task that panicked or was cancelled never delivered the input.
fn writer_lost(e: tokio::task::JoinError) -> FormatError {
    FormatError::Io(std::io::Error::other(format!("stdin writer task failed: {e}")))
}
