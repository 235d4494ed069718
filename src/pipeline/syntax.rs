use std::fs;
use std::path::Path;

use anyhow::Context;

/// Normalize syntax declarations across the staged proto files
///
/// For every top-level `.proto` file in `dir`:
/// - no `syntax =` declaration: prepend `syntax = "proto3";`
/// - a `proto2` declaration: rewrite it to `proto3`
///
/// Single pass, whole-file in-place overwrite, no backups. The staging
/// directory is disposable, so a crash mid-write costs nothing.
///
/// Returns the names of the files that were rewritten.
pub fn normalize_proto_syntax(dir: &Path) -> anyhow::Result<Vec<String>> {
    let mut rewritten = Vec::new();

    for entry in fs::read_dir(dir)
        .with_context(|| format!("failed to read staging directory {}", dir.display()))?
    {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("proto") {
            continue;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read proto file {}", path.display()))?;

        if !content.contains("syntax =") {
            let updated = format!("syntax = \"proto3\";\n\n{content}");
            fs::write(&path, updated)
                .with_context(|| format!("failed to rewrite {}", path.display()))?;
            println!("Added proto3 syntax declaration to {name}");
            rewritten.push(name);
        } else if content.contains("syntax = \"proto2\"") {
            let updated = content.replace("syntax = \"proto2\"", "syntax = \"proto3\"");
            fs::write(&path, updated)
                .with_context(|| format!("failed to rewrite {}", path.display()))?;
            println!("Converted {name} from proto2 to proto3");
            rewritten.push(name);
        }
    }

    Ok(rewritten)
}
