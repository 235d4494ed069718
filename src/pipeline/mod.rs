//! # Pipeline Module
//!
//! The staging/generation/organization pipeline behind `proto gen`.
//!
//! ## Stages
//!
//! ```text
//! Idle → Staged → Normalized → Generated → Organized → CleanedUp
//! ```
//!
//! 1. **Stage** - validate the source directory, create a fresh `.proto-temp`
//!    working directory, copy the bundled buf configuration and all proto
//!    sources into it ([`stage`])
//! 2. **Normalize** - rewrite missing or `proto2` syntax declarations to
//!    `proto3` ([`syntax`])
//! 3. **Generate** - `npm install`, write the `buf.yaml` policy, run
//!    `npx buf generate` ([`invoke`])
//! 4. **Organize** - group the flat generator output into one subdirectory
//!    per schema basename ([`organize`])
//!
//! Failure at any stage is terminal for the run; there are no retries. The
//! working directory is removed on every exit path by [`workdir::ScopedWorkdir`].

pub mod invoke;
pub mod organize;
pub mod stage;
pub mod syntax;
pub mod workdir;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::error::PipelineError;
use workdir::ScopedWorkdir;

/// Name of the disposable staging directory, resolved against the process
/// working directory. Process-exclusive by convention: concurrent runs from
/// the same location collide.
pub const WORKDIR_NAME: &str = ".proto-temp";

/// Subdirectory the buf template writes generated files into.
pub const GENERATED_DIR_NAME: &str = "cli-gen-ts-file";

/// Run the full generation pipeline against a local proto directory
///
/// Sequences staging, syntax normalization, plugin installation, generation
/// and output organization. The staging directory is deleted when this
/// returns, on both success and failure paths.
///
/// # Errors
///
/// Returns an error if the source directory is invalid
/// ([`PipelineError::Configuration`]), an external command exits non-zero
/// ([`PipelineError::Generation`]), the generator produced no output
/// directory ([`PipelineError::Organize`]), or any filesystem step fails.
pub fn generate_from_local(source_dir: &Path, output_dir: &Path) -> anyhow::Result<()> {
    stage::check_source_dir(source_dir)?;

    let workdir = ScopedWorkdir::create(&std::env::current_dir()?.join(WORKDIR_NAME))?;

    stage::stage_sources(source_dir, workdir.path())?;
    let rewritten = syntax::normalize_proto_syntax(workdir.path())?;
    if !rewritten.is_empty() {
        tracing::debug!(count = rewritten.len(), "normalized syntax declarations");
    }

    invoke::install_plugins(workdir.path())?;
    invoke::write_buf_policy(workdir.path())?;
    invoke::run_generator(workdir.path())?;

    let proto_names = proto_basenames(source_dir)?;

    let generated_dir = workdir.path().join(GENERATED_DIR_NAME);
    if !generated_dir.is_dir() {
        return Err(PipelineError::Organize {
            expected: generated_dir,
        }
        .into());
    }

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;
    organize::organize_generated(&generated_dir, output_dir, &proto_names)?;

    println!("Files generated to: {}", output_dir.display());
    Ok(())
}

/// Collect the basenames (no extension) of every `.proto` file directly
/// inside `dir`, in directory order.
pub fn proto_basenames(dir: &Path) -> anyhow::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)
        .with_context(|| format!("failed to read proto directory {}", dir.display()))?
    {
        let path: PathBuf = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("proto") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            names.push(stem.to_string());
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proto_basenames_strips_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("user.proto"), "message User {}").unwrap();
        fs::write(dir.path().join("order.proto"), "message Order {}").unwrap();
        fs::write(dir.path().join("README.md"), "# notes").unwrap();

        let mut names = proto_basenames(dir.path()).unwrap();
        names.sort();
        assert_eq!(names, vec!["order".to_string(), "user".to_string()]);
    }

    #[test]
    fn test_proto_basenames_missing_dir_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(proto_basenames(&missing).is_err());
    }

    #[test]
    fn test_generate_from_local_rejects_missing_source_before_any_work() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("proto");
        let output = dir.path().join("types");

        let err = generate_from_local(&missing, &output).unwrap_err();
        let pipeline_err = err.downcast_ref::<crate::PipelineError>().unwrap();
        assert!(matches!(
            pipeline_err,
            crate::PipelineError::Configuration { .. }
        ));
        // Validation fails before the working directory is ever created
        assert!(!std::env::current_dir().unwrap().join(WORKDIR_NAME).exists());
        assert!(!output.exists());
    }
}
