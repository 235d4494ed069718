use std::fmt;
use std::path::PathBuf;

/// Pipeline failure taxonomy
///
/// Every stage-local failure surfaces as one of these variants; the binary
/// converts the top-level error into exit code 1. There is no partial-success
/// state - the run is all-or-nothing from the user's perspective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The source directory is missing or is not a directory
    ///
    /// Raised before any staging or subprocess work happens, so a bad
    /// `--source` never leaves a working directory behind.
    Configuration {
        /// Path that failed validation
        path: PathBuf,
        /// Human-readable reason
        reason: String,
    },
    /// An external generator command exited non-zero
    ///
    /// Carries whatever the subprocess wrote to its standard streams. The
    /// streams are empty when the command ran with inherited stdio
    /// (plugin installation).
    Generation {
        /// The command line that failed
        command: String,
        /// Captured standard output, possibly empty
        stdout: String,
        /// Captured standard error, possibly empty
        stderr: String,
    },
    /// The generator exited successfully but its output directory is absent
    Organize {
        /// Directory the generator was expected to produce
        expected: PathBuf,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Configuration { path, reason } => {
                write!(f, "configuration error: {}: {}", path.display(), reason)
            }
            PipelineError::Generation {
                command,
                stdout,
                stderr,
            } => {
                write!(f, "generation error: `{command}` exited with failure")?;
                if !stdout.trim().is_empty() {
                    write!(f, "\nstdout:\n{stdout}")?;
                }
                if !stderr.trim().is_empty() {
                    write!(f, "\nstderr:\n{stderr}")?;
                }
                Ok(())
            }
            PipelineError::Organize { expected } => {
                write!(
                    f,
                    "organize error: generated output directory {} does not exist, generation may have failed",
                    expected.display()
                )
            }
        }
    }
}

impl std::error::Error for PipelineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_display_includes_path_and_reason() {
        let err = PipelineError::Configuration {
            path: PathBuf::from("/missing/proto"),
            reason: "directory does not exist".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/missing/proto"));
        assert!(msg.contains("directory does not exist"));
    }

    #[test]
    fn test_generation_display_omits_empty_streams() {
        let err = PipelineError::Generation {
            command: "npm install".to_string(),
            stdout: String::new(),
            stderr: String::new(),
        };
        let msg = err.to_string();
        assert!(msg.contains("npm install"));
        assert!(!msg.contains("stdout:"));
        assert!(!msg.contains("stderr:"));
    }

    #[test]
    fn test_generation_display_attaches_captured_streams() {
        let err = PipelineError::Generation {
            command: "npx buf generate".to_string(),
            stdout: "compiling".to_string(),
            stderr: "user.proto:3: unknown field".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("stdout:\ncompiling"));
        assert!(msg.contains("unknown field"));
    }
}
