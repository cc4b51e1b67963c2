//! External compiler delegation.
//!
//! A conformant `msgfmt` is preferred over the built-in writer, but it must
//! never be a hard dependency: anything short of a clean exit falls through to
//! the local implementation.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// What happened when the external compiler was tried.
#[derive(Debug)]
pub enum DelegateOutcome {
    /// The tool exited successfully; its output file is used as-is.
    Compiled,
    /// The tool could not be started (not installed, not executable, disabled).
    Unavailable(String),
    /// The tool ran and exited unsuccessfully.
    Failed { status: ExitStatus, stderr: String },
    /// The tool did not finish within the configured timeout.
    TimedOut(Duration),
}

impl DelegateOutcome {
    /// Whether the pipeline should stop here for this catalog.
    pub fn is_compiled(&self) -> bool {
        matches!(self, DelegateOutcome::Compiled)
    }
}

/// A tool able to compile a `.po` source into a `.mo` file.
pub trait ExternalCompiler {
    /// Human-readable name used in logs and reports.
    fn name(&self) -> &str;

    fn compile(&self, source: &Path, output: &Path) -> impl Future<Output = DelegateOutcome>;
}

/// Runs `msgfmt <source> -o <output>` (or a compatible program).
#[derive(Debug, Clone)]
pub struct MsgfmtCompiler {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl MsgfmtCompiler {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    /// Kill the tool and fall through if it runs longer than `timeout`.
    ///
    /// Without a timeout the call waits for as long as the tool runs.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl ExternalCompiler for MsgfmtCompiler {
    fn name(&self) -> &str {
        self.program.to_str().unwrap_or("msgfmt")
    }

    async fn compile(&self, source: &Path, output: &Path) -> DelegateOutcome {
        let mut command = Command::new(&self.program);
        command
            .arg(source)
            .arg("-o")
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                debug!("{} unavailable: {}", self.program.display(), e);
                return DelegateOutcome::Unavailable(e.to_string());
            }
        };

        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(
                        "{} did not finish within {:?}, falling back",
                        self.program.display(),
                        limit
                    );
                    return DelegateOutcome::TimedOut(limit);
                }
            },
            None => child.wait_with_output().await,
        };

        match result {
            Ok(output) if output.status.success() => DelegateOutcome::Compiled,
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                debug!(
                    "{} exited with {}: {}",
                    self.program.display(),
                    output.status,
                    stderr
                );
                DelegateOutcome::Failed {
                    status: output.status,
                    stderr,
                }
            }
            Err(e) => DelegateOutcome::Unavailable(e.to_string()),
        }
    }
}

/// Delegate that is never available, forcing the built-in compiler.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExternalCompiler;

impl ExternalCompiler for NoExternalCompiler {
    fn name(&self) -> &str {
        "none"
    }

    async fn compile(&self, _source: &Path, _output: &Path) -> DelegateOutcome {
        DelegateOutcome::Unavailable("external compiler disabled".to_string())
    }
}

/// Either a real `msgfmt` or nothing, chosen at runtime from configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredCompiler {
    Msgfmt(MsgfmtCompiler),
    Disabled(NoExternalCompiler),
}

impl ExternalCompiler for ConfiguredCompiler {
    fn name(&self) -> &str {
        match self {
            ConfiguredCompiler::Msgfmt(msgfmt) => msgfmt.name(),
            ConfiguredCompiler::Disabled(none) => none.name(),
        }
    }

    async fn compile(&self, source: &Path, output: &Path) -> DelegateOutcome {
        match self {
            ConfiguredCompiler::Msgfmt(msgfmt) => msgfmt.compile(source, output).await,
            ConfiguredCompiler::Disabled(none) => none.compile(source, output).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== NoExternalCompiler Tests ====================

    #[tokio::test]
    async fn test_no_external_compiler_is_unavailable() {
        let outcome = NoExternalCompiler
            .compile(Path::new("in.po"), Path::new("out.mo"))
            .await;
        assert!(matches!(outcome, DelegateOutcome::Unavailable(_)));
        assert!(!outcome.is_compiled());
    }

    // ==================== MsgfmtCompiler Tests ====================

    #[tokio::test]
    async fn test_missing_program_is_unavailable() {
        let compiler = MsgfmtCompiler::new("/nonexistent/definitely-not-msgfmt");
        let outcome = compiler
            .compile(Path::new("in.po"), Path::new("out.mo"))
            .await;
        assert!(matches!(outcome, DelegateOutcome::Unavailable(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_failed() {
        // `false` ignores its arguments and exits 1.
        let compiler = MsgfmtCompiler::new("false");
        let outcome = compiler
            .compile(Path::new("in.po"), Path::new("out.mo"))
            .await;
        assert!(matches!(outcome, DelegateOutcome::Failed { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_zero_exit_is_compiled() {
        let compiler = MsgfmtCompiler::new("true");
        let outcome = compiler
            .compile(Path::new("in.po"), Path::new("out.mo"))
            .await;
        assert!(outcome.is_compiled());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_falls_through() {
        let dir = tempfile::TempDir::new().unwrap();
        let script = dir.path().join("slow-msgfmt");
        std::fs::write(&script, "#!/bin/sh\nsleep 5\n").unwrap();
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        let compiler =
            MsgfmtCompiler::new(&script).with_timeout(Some(Duration::from_millis(100)));
        let outcome = compiler
            .compile(Path::new("in.po"), Path::new("out.mo"))
            .await;
        assert!(matches!(outcome, DelegateOutcome::TimedOut(_)));
    }

    #[test]
    fn test_name_is_program() {
        assert_eq!(MsgfmtCompiler::new("msgfmt").name(), "msgfmt");
        assert_eq!(ConfiguredCompiler::Disabled(NoExternalCompiler).name(), "none");
    }
}
