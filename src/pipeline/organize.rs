use std::fs;
use std::path::Path;

use anyhow::Context;

use super::stage::copy_dir_recursive;

/// Extensions recognized as generator output when falling back to the
/// single-schema copy.
const OUTPUT_EXTENSIONS: [&str; 3] = [".ts", ".js", ".d.ts"];

/// Group the flat generator output into per-schema subdirectories
///
/// For each proto basename a `<output>/<basename>/` directory is created and
/// every generated file whose name contains the basename (case-sensitive, or
/// its lowercase form) is copied into it. Two fallbacks:
///
/// - a basename matched nothing and it is the only schema: copy every
///   recognized output file into its subdirectory;
/// - after all basenames no subdirectory received a file: copy the entire
///   generator output flat into the output root.
///
/// Substring matching is a heuristic, not a guaranteed partition: when one
/// basename is a substring of another (`user` vs `user_profile`), files of
/// either schema match both.
pub fn organize_generated(
    generated_dir: &Path,
    output_dir: &Path,
    proto_names: &[String],
) -> anyhow::Result<()> {
    let generated_files = list_file_names(generated_dir)?;

    for proto_name in proto_names {
        let sub_dir = output_dir.join(proto_name);
        fs::create_dir_all(&sub_dir)
            .with_context(|| format!("failed to create {}", sub_dir.display()))?;

        let lowercase = proto_name.to_lowercase();
        let related: Vec<&String> = generated_files
            .iter()
            .filter(|file| file.contains(proto_name.as_str()) || file.contains(&lowercase))
            .collect();

        if related.is_empty() {
            // Looser match: with a single schema, claim every recognized
            // output file for it
            if proto_names.len() == 1 {
                for file in generated_files
                    .iter()
                    .filter(|f| OUTPUT_EXTENSIONS.iter().any(|ext| f.ends_with(ext)))
                {
                    copy_into(generated_dir, &sub_dir, proto_name, file)?;
                }
            }
        } else {
            for file in related {
                copy_into(generated_dir, &sub_dir, proto_name, file)?;
            }
        }
    }

    // Grouping produced nothing at all: fall back to a flat copy
    let any_grouped = proto_names.iter().any(|proto_name| {
        fs::read_dir(output_dir.join(proto_name))
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false)
    });

    if !any_grouped {
        println!("Could not group files per proto, copying everything as-is...");
        copy_dir_recursive(generated_dir, output_dir)?;
    }

    Ok(())
}

/// Copy one generated file into a schema subdirectory, skipping files that
/// vanished between listing and copy.
fn copy_into(
    generated_dir: &Path,
    sub_dir: &Path,
    proto_name: &str,
    file: &str,
) -> anyhow::Result<()> {
    let src = generated_dir.join(file);
    if !src.exists() {
        tracing::debug!(file, "generated file disappeared before copy, skipping");
        return Ok(());
    }
    let dest = sub_dir.join(file);
    fs::copy(&src, &dest)
        .with_context(|| format!("failed to copy {} to {}", src.display(), dest.display()))?;
    println!("  {proto_name}/{file}");
    Ok(())
}

/// Top-level file names (not directories) in `dir`, in directory order.
fn list_file_names(dir: &Path) -> anyhow::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)
        .with_context(|| format!("failed to read generated directory {}", dir.display()))?
    {
        let entry = entry?;
        if entry.path().is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(names)
}
