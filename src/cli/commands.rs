use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface for protogen
///
/// Wraps the buf toolchain to generate TypeScript types from local
/// protobuf definitions.
#[derive(Debug, Parser)]
#[command(name = "proto")]
#[command(version, about = "CLI for protobuf TypeScript generation", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate TypeScript types from local proto files
    Gen {
        /// Directory containing .proto source files
        #[arg(short, long, default_value = "proto")]
        source: PathBuf,

        /// Output directory for the generated types
        #[arg(short, long, default_value = "types")]
        output: PathBuf,
    },
}

/// Execute the CLI command provided by the user
///
/// # Errors
///
/// Returns an error if:
/// - The source directory is missing or is not a directory
/// - Plugin installation or `buf generate` fails
/// - The generator produced no output directory
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Gen { source, output } => {
            let cwd = std::env::current_dir()?;
            let source_dir = cwd.join(source);
            let output_dir = cwd.join(output);

            println!("Generating protobuf TypeScript types...\n");
            println!("Proto source directory: {}", source_dir.display());
            println!("Output directory: {}\n", output_dir.display());

            crate::pipeline::generate_from_local(&source_dir, &output_dir)?;

            println!("Generation succeeded");
            Ok(())
        }
    }
}
