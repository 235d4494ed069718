//! # CLI Module
//!
//! Command-line surface of the `proto` binary.
//!
//! ## Commands
//!
//! ### `gen`
//!
//! Generate TypeScript types from the `.proto` files in a local directory:
//!
//! ```bash
//! proto gen --source proto --output types
//! ```
//!
//! Options:
//! - `-s, --source <PATH>` - Directory containing `.proto` files (default: `proto`)
//! - `-o, --output <PATH>` - Destination for generated types (default: `types`)
//!
//! Both paths are resolved against the current working directory. The command
//! exits 1 on any pipeline failure and 0 on success.
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use protogen::cli::run_cli;
//!
//! run_cli()?;
//! ```

mod commands;


pub use commands::{run_cli, Cli, Commands};
