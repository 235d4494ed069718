use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::Context;
use serde::Serialize;
use walkdir::WalkDir;

use crate::error::PipelineError;

/// buf module policy written into the staging directory as `buf.yaml`.
#[derive(Debug, Serialize)]
pub struct BufPolicy {
    version: String,
    name: String,
    lint: LintPolicy,
}

#[derive(Debug, Serialize)]
struct LintPolicy {
    #[serde(rename = "use")]
    use_rules: Vec<String>,
    except: Vec<String>,
}

impl Default for BufPolicy {
    fn default() -> Self {
        Self {
            version: "v1".to_string(),
            name: "buf.build/local/proto".to_string(),
            lint: LintPolicy {
                use_rules: vec!["DEFAULT".to_string()],
                except: vec![
                    "FIELD_NO_REQUIRED".to_string(),
                    "FIELD_NO_OPTIONAL".to_string(),
                ],
            },
        }
    }
}

// npm/npx binary overrides let tests point at stubs without mutating PATH
fn npm_bin() -> String {
    std::env::var("PROTOGEN_NPM_BIN").unwrap_or_else(|_| "npm".to_string())
}

fn npx_bin() -> String {
    std::env::var("PROTOGEN_NPX_BIN").unwrap_or_else(|_| "npx".to_string())
}

/// Install the buf CLI and protoc plugins into the staging directory
///
/// Runs `npm install` with inherited stdio so install progress streams
/// straight to the user.
///
/// # Errors
///
/// Returns [`PipelineError::Generation`] on non-zero exit.
pub fn install_plugins(workdir: &Path) -> anyhow::Result<()> {
    println!("Installing buf plugins...");
    let status = Command::new(npm_bin())
        .arg("install")
        .current_dir(workdir)
        .status()
        .context("failed to run npm install")?;
    if !status.success() {
        return Err(PipelineError::Generation {
            command: "npm install".to_string(),
            stdout: String::new(),
            stderr: String::new(),
        }
        .into());
    }
    Ok(())
}

/// Write the `buf.yaml` module policy into the staging directory
pub fn write_buf_policy(workdir: &Path) -> anyhow::Result<()> {
    let yaml = serde_yaml::to_string(&BufPolicy::default())
        .context("failed to serialize buf policy")?;
    let path = workdir.join("buf.yaml");
    fs::write(&path, yaml).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Run `buf generate` against the staged proto files
///
/// The subprocess runs with `workdir` as its working directory; this process
/// never changes its own. Output is captured so a failure can be reported
/// with the generator's own diagnostics attached.
///
/// # Errors
///
/// Returns [`PipelineError::Generation`] carrying captured stdout/stderr on
/// non-zero exit, after printing surrounding context (directory listing,
/// config contents, proto files found).
pub fn run_generator(workdir: &Path) -> anyhow::Result<()> {
    println!("Generating TypeScript types...");
    let command = format!("{} buf generate --template=./buf.gen.yaml", npx_bin());
    println!("\x1b[32m{command}\x1b[0m");

    let output = Command::new(npx_bin())
        .args(["buf", "generate", "--template=./buf.gen.yaml"])
        .current_dir(workdir)
        .output()
        .context("failed to run buf generate")?;

    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        eprintln!("buf generate failed:");
        eprintln!("stdout: {stdout}");
        eprintln!("stderr: {stderr}");
        print_generation_diagnostics(workdir);
        return Err(PipelineError::Generation {
            command,
            stdout,
            stderr,
        }
        .into());
    }
    Ok(())
}

/// Print the surrounding context of a failed generator run: staging
/// directory listing, config file contents, and the proto files found.
fn print_generation_diagnostics(workdir: &Path) {
    println!("\nDiagnostics:");

    match fs::read_dir(workdir) {
        Ok(entries) => {
            for entry in entries.flatten() {
                let marker = if entry.path().is_dir() { "/" } else { "" };
                println!("  {}{}", entry.file_name().to_string_lossy(), marker);
            }
        }
        Err(err) => tracing::warn!(error = %err, "failed to list staging directory"),
    }

    for config in ["buf.gen.yaml", "buf.yaml"] {
        println!("\n{config} contents:");
        match fs::read_to_string(workdir.join(config)) {
            Ok(contents) => println!("{contents}"),
            Err(_) => println!("  <missing>"),
        }
    }

    println!("\nproto files:");
    for entry in WalkDir::new(workdir).into_iter().flatten() {
        if entry.path().extension().and_then(|e| e.to_str()) == Some("proto") {
            println!("  {}", entry.path().display());
        }
    }
}
