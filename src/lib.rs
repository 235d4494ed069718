//! # protogen
//!
//! **protogen** is a command-line wrapper around the [`buf`](https://buf.build)
//! toolchain. It stages local `.proto` files into a disposable working
//! directory, runs `buf generate` against them, and reorganizes the flat
//! generator output into one subdirectory per schema.
//!
//! ## Overview
//!
//! The tool does no schema parsing of its own; `buf` and its protoc plugins do
//! all of the actual compilation. What this crate provides is the plumbing
//! around that external generator:
//!
//! - **[`pipeline::stage`]** - Staging of proto sources and bundled `buf`
//!   configuration into a fresh working directory
//! - **[`pipeline::syntax`]** - Rewriting missing or `proto2` syntax
//!   declarations to `proto3` before generation
//! - **[`pipeline::invoke`]** - Plugin installation, `buf.yaml` policy
//!   writing, and the `buf generate` subprocess call
//! - **[`pipeline::organize`]** - Grouping generated files into per-schema
//!   output subdirectories
//! - **[`cli`]** - The `proto` binary's clap command surface
//!
//! ## Pipeline Flow
//!
//! ```text
//! proto/          .proto-temp/              types/
//! ├── user.proto  ├── user.proto            ├── user/
//! └── order.proto ├── order.proto           │   └── user_pb.ts
//!       │         ├── buf.yaml              └── order/
//!       │         ├── buf.gen.yaml              └── order_pb.ts
//!       └─stage──▶├── package.json
//!                 └── cli-gen-ts-file/  ──organize──▶
//!                       (buf generate)
//! ```
//!
//! Stages run strictly in sequence; a failure at any stage aborts the run and
//! the working directory is removed on every exit path. Subprocesses receive
//! the staging directory through [`std::process::Command::current_dir`]; the
//! tool never changes its own working directory.

pub mod cli;
pub mod error;
pub mod pipeline;

pub use error::PipelineError;
