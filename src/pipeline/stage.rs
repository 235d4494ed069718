use std::fs;
use std::path::Path;

use anyhow::Context;
use walkdir::WalkDir;

use crate::error::PipelineError;

/// Bundled buf generation template, written into every staging directory.
const BUF_GEN_TEMPLATE: &str = include_str!("../../assets/buf.gen.yaml");

/// Bundled npm manifest declaring the buf CLI and protoc plugins.
const PACKAGE_MANIFEST: &str = include_str!("../../assets/package.json");

/// Validate the proto source directory
///
/// # Errors
///
/// Returns [`PipelineError::Configuration`] if the path does not exist or is
/// not a directory. Runs before anything touches the filesystem, so a bad
/// `--source` never leaves a staging directory behind.
pub fn check_source_dir(source_dir: &Path) -> Result<(), PipelineError> {
    let meta = fs::metadata(source_dir).map_err(|_| PipelineError::Configuration {
        path: source_dir.to_path_buf(),
        reason: "proto source directory does not exist".to_string(),
    })?;
    if !meta.is_dir() {
        return Err(PipelineError::Configuration {
            path: source_dir.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }
    Ok(())
}

/// Populate the staging directory
///
/// Writes the bundled `buf.gen.yaml` and `package.json` into `workdir`, then
/// copies the full contents of `source_dir` into it, preserving relative
/// structure.
pub fn stage_sources(source_dir: &Path, workdir: &Path) -> anyhow::Result<()> {
    fs::write(workdir.join("buf.gen.yaml"), BUF_GEN_TEMPLATE)
        .with_context(|| format!("failed to write buf.gen.yaml into {}", workdir.display()))?;
    fs::write(workdir.join("package.json"), PACKAGE_MANIFEST)
        .with_context(|| format!("failed to write package.json into {}", workdir.display()))?;

    copy_dir_recursive(source_dir, workdir)?;

    tracing::debug!(
        source = %source_dir.display(),
        workdir = %workdir.display(),
        "staged proto sources"
    );
    Ok(())
}

/// Recursively copy the contents of `src` into `dst`
///
/// `dst` must already exist. Directories are created as needed; files are
/// overwritten. Symlinks are followed.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> anyhow::Result<()> {
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry
            .with_context(|| format!("failed to walk source directory {}", src.display()))?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .context("walked entry outside the source root")?;
        if rel.as_os_str().is_empty() {
            continue;
        }
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("failed to create directory {}", target.display()))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create directory {}", parent.display()))?;
            }
            fs::copy(entry.path(), &target).with_context(|| {
                format!(
                    "failed to copy {} to {}",
                    entry.path().display(),
                    target.display()
                )
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;

    #[test]
    fn test_check_source_dir_missing() {
        let base = tempfile::tempdir().unwrap();
        let missing = base.path().join("proto");
        let err = check_source_dir(&missing).unwrap_err();
        assert!(matches!(err, PipelineError::Configuration { .. }));
    }

    #[test]
    fn test_check_source_dir_rejects_file() {
        let base = tempfile::tempdir().unwrap();
        let file = base.path().join("proto");
        fs::write(&file, "not a directory").unwrap();
        let err = check_source_dir(&file).unwrap_err();
        match err {
            PipelineError::Configuration { reason, .. } => {
                assert_eq!(reason, "not a directory");
            }
            other => panic!("expected Configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_check_source_dir_accepts_directory() {
        let base = tempfile::tempdir().unwrap();
        assert!(check_source_dir(base.path()).is_ok());
    }

    #[test]
    fn test_stage_sources_writes_config_and_copies_protos() {
        let base = tempfile::tempdir().unwrap();
        let source = base.path().join("proto");
        let workdir = base.path().join("work");
        fs::create_dir_all(source.join("nested")).unwrap();
        fs::create_dir_all(&workdir).unwrap();
        fs::write(source.join("user.proto"), "message User {}").unwrap();
        fs::write(source.join("nested").join("order.proto"), "message Order {}").unwrap();

        stage_sources(&source, &workdir).unwrap();

        assert!(workdir.join("buf.gen.yaml").exists());
        assert!(workdir.join("package.json").exists());
        assert!(workdir.join("user.proto").exists());
        assert!(workdir.join("nested").join("order.proto").exists());

        let template = fs::read_to_string(workdir.join("buf.gen.yaml")).unwrap();
        assert!(template.contains("cli-gen-ts-file"));
    }

    #[test]
    fn test_copy_dir_recursive_overwrites_existing_files() {
        let base = tempfile::tempdir().unwrap();
        let src = base.path().join("src");
        let dst = base.path().join("dst");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(&dst).unwrap();
        fs::write(src.join("a.txt"), "new").unwrap();
        fs::write(dst.join("a.txt"), "old").unwrap();

        copy_dir_recursive(&src, &dst).unwrap();
        assert_eq!(fs::read_to_string(dst.join("a.txt")).unwrap(), "new");
    }
}
