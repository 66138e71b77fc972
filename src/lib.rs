//! Domain-partitioned TypeScript API client generator.
//!
//! Given one OpenAPI document and a fixed path-prefix → domain rule table,
//! this crate produces three self-contained TypeScript modules per domain:
//!
//! - a zod validation-schema module (`schemas/<domain>.schemas.ts`)
//! - a zodios typed HTTP client module (`clients/<domain>.client.ts`)
//! - a plain type-definitions module (`types/<domain>.types.ts`)
//!
//! The pipeline per domain: slice the document down to the domain's paths,
//! delegate combined-artifact generation to an [`delegate::ArtifactGenerator`],
//! split the artifact into schema and client modules, synthesize the types
//! module independently from the endpoint schemas, and write all three.

#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

pub mod config;
pub mod delegate;
pub mod domain;
pub mod error;
pub mod fsx;
pub mod pipeline;
pub mod slice;
pub mod spec;
pub mod splitter;
pub mod synth;
pub mod ts;

use std::path::Path;

pub use config::GeneratorConfig;
pub use delegate::{ArtifactGenerator, FormatOptions, ZodClientGenerator};
pub use domain::{classify_path, partition_endpoints, Domain, Endpoint};
pub use error::{DelegateError, GenerateError};
pub use fsx::{FileStore, LocalFs};
pub use pipeline::{OutputLayout, Pipeline, RunReport};
pub use spec::ApiDocument;

/// Generate all domain modules from an API document JSON string, using the
/// built-in zod/zodios generator and the local filesystem.
pub async fn generate(document_json: &str, out_root: &Path) -> Result<RunReport, GenerateError> {
    let doc = ApiDocument::from_json(document_json)
        .map_err(|message| GenerateError::Parse { message })?;
    let pipeline = Pipeline::new(
        ZodClientGenerator,
        LocalFs,
        OutputLayout::new(out_root),
        FormatOptions::default(),
    );
    pipeline.run(&doc).await
}
