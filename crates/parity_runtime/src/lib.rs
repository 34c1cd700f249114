//! Run manifests, logging, serialization, and the command line for parity.
//!
//! This crate provides:
//! - [`RunManifest`] - TOML description of one audit
//! - [`run_manifest`] - Loads, compares, and reports a manifest's versions
//! - [`logging::init`] - Installs the `tracing` subscriber
//! - Comparison set serialization to JSON and `MessagePack`
//! - [`Summary`] - Plain-text tallies of a report

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod logging;
pub mod run;
pub mod serialize;
pub mod summary;

pub use config::{OutputPaths, RunManifest, RunOptions, VersionEntry};
pub use logging::Profile;
pub use run::{RunOutcome, run_manifest, run_with_loader, write_outputs};
pub use serialize::{
    from_json, from_msgpack, load_json, load_msgpack, save_json, save_msgpack, to_json, to_msgpack,
};
pub use summary::{ColumnTally, Summary};
