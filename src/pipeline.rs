//! Per-domain generation pipeline.
//!
//! For every domain with classified endpoints, the pipeline slices the
//! document, delegates combined-artifact generation to a temp file, splits
//! the artifact into schema and client modules, synthesizes the types
//! module, and writes the three files. The temp artifact is deleted on
//! every exit path; final files are staged and renamed into place only
//! after all three writes succeed, so a failing domain never leaves an
//! inconsistent triple behind.
//!
//! Domains are processed sequentially and isolated from each other: a
//! failure is logged and collected, remaining domains still run, and a
//! single summary error is returned at the end.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::delegate::{ArtifactGenerator, FormatOptions};
use crate::domain::{collect_referenced_schemas, partition_endpoints, Domain, Endpoint};
use crate::error::{DomainFailure, GenerateError};
use crate::fsx::FileStore;
use crate::slice::slice_for_domain;
use crate::spec::ApiDocument;
use crate::splitter::split_artifact;
use crate::synth::render_types_module;

/// Where the generated modules live, relative to one output root.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    /// Root directory for all generated modules.
    pub root: PathBuf,
}

impl OutputLayout {
    /// Layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `schemas/<domain>.schemas.ts`
    pub fn schemas_path(&self, domain: Domain) -> PathBuf {
        self.root
            .join("schemas")
            .join(format!("{domain}.schemas.ts"))
    }

    /// `clients/<domain>.client.ts`
    pub fn client_path(&self, domain: Domain) -> PathBuf {
        self.root.join("clients").join(format!("{domain}.client.ts"))
    }

    /// `types/<domain>.types.ts`
    pub fn types_path(&self, domain: Domain) -> PathBuf {
        self.root.join("types").join(format!("{domain}.types.ts"))
    }

    /// Transient `temp-<domain>.ts` artifact path.
    pub fn temp_path(&self, domain: Domain) -> PathBuf {
        self.root.join(format!("temp-{domain}.ts"))
    }
}

/// Summary of a successful (or partially successful) run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Domains whose three modules were written.
    pub generated: Vec<Domain>,
}

/// The generation pipeline, generic over the delegated generator and the
/// filesystem so both can be swapped out in tests.
#[derive(Debug)]
pub struct Pipeline<G, F> {
    delegate: G,
    fs: F,
    layout: OutputLayout,
    options: FormatOptions,
}

impl<G: ArtifactGenerator, F: FileStore> Pipeline<G, F> {
    /// Build a pipeline writing under `layout`.
    pub fn new(delegate: G, fs: F, layout: OutputLayout, options: FormatOptions) -> Self {
        Self {
            delegate,
            fs,
            layout,
            options,
        }
    }

    /// Generate all domain modules for `doc`.
    ///
    /// Domains with zero classified endpoints are skipped without touching
    /// the filesystem. Failures are isolated per domain and reported once,
    /// after every domain has been attempted.
    pub async fn run(&self, doc: &ApiDocument) -> Result<RunReport, GenerateError> {
        let partitions = partition_endpoints(doc);
        let mut report = RunReport::default();
        let mut failures = Vec::new();
        let mut attempted = 0;

        for (domain, endpoints) in &partitions {
            if endpoints.is_empty() {
                continue;
            }
            attempted += 1;
            match self.generate_domain(doc, *domain, endpoints).await {
                Ok(()) => report.generated.push(*domain),
                Err(err) => {
                    warn!(domain = %domain, error = %err, "Domain generation failed.");
                    failures.push(DomainFailure {
                        domain: *domain,
                        source: Box::new(err),
                    });
                }
            }
        }

        if failures.is_empty() {
            Ok(report)
        } else {
            Err(GenerateError::Run {
                attempted,
                failures,
            })
        }
    }

    async fn generate_domain(
        &self,
        doc: &ApiDocument,
        domain: Domain,
        endpoints: &[Endpoint],
    ) -> Result<(), GenerateError> {
        debug!(
            domain = %domain,
            endpoints = endpoints.len(),
            schemas = collect_referenced_schemas(endpoints).len(),
            "Generating domain modules."
        );

        let slice = slice_for_domain(doc, endpoints);
        let temp_path = self.layout.temp_path(domain);

        self.fs
            .create_dir_all(&self.layout.root)
            .await
            .map_err(|e| GenerateError::io("create", self.layout.root.clone(), e))?;

        let result = self
            .generate_domain_inner(domain, &slice, endpoints, &temp_path)
            .await;

        // The temp artifact is deleted on every exit path; a failing delete
        // must not mask the pipeline outcome.
        if let Err(err) = self.fs.remove_file(&temp_path).await {
            debug!(path = %temp_path.display(), error = %err, "Temp artifact cleanup failed.");
        }

        result
    }

    async fn generate_domain_inner(
        &self,
        domain: Domain,
        slice: &ApiDocument,
        endpoints: &[Endpoint],
        temp_path: &Path,
    ) -> Result<(), GenerateError> {
        self.delegate
            .generate(slice, temp_path, &self.options)
            .await
            .map_err(|source| GenerateError::Delegate { domain, source })?;

        let artifact = self
            .fs
            .read_to_string(temp_path)
            .await
            .map_err(|e| GenerateError::io("read", temp_path, e))?;

        let modules = split_artifact(domain, &artifact);
        let types = render_types_module(domain, endpoints);

        let outputs = [
            (self.layout.schemas_path(domain), modules.schemas),
            (self.layout.client_path(domain), modules.client),
            (self.layout.types_path(domain), types),
        ];
        self.write_atomically(&outputs).await?;

        info!(
            domain = %domain,
            endpoints = endpoints.len(),
            "Generated schema, client, and types modules."
        );
        Ok(())
    }

    /// Write all outputs to staged names, then rename into place.
    ///
    /// Renames only start after every staged write succeeded, so a failure
    /// leaves the previous files untouched. Staged leftovers are removed
    /// best-effort on failure.
    async fn write_atomically(&self, outputs: &[(PathBuf, String)]) -> Result<(), GenerateError> {
        let mut staged = Vec::new();

        for (path, contents) in outputs {
            if let Some(parent) = path.parent() {
                self.fs
                    .create_dir_all(parent)
                    .await
                    .map_err(|e| GenerateError::io("create", parent.to_path_buf(), e))?;
            }
            let tmp = staged_name(path);
            if let Err(err) = self.fs.write(&tmp, contents).await {
                self.discard_staged(&staged).await;
                return Err(GenerateError::io("write", tmp, err));
            }
            staged.push(tmp);
        }

        for (tmp, (path, _)) in staged.iter().zip(outputs) {
            if let Err(err) = self.fs.rename(tmp, path).await {
                self.discard_staged(&staged).await;
                return Err(GenerateError::io("rename", tmp.clone(), err));
            }
        }

        Ok(())
    }

    async fn discard_staged(&self, staged: &[PathBuf]) {
        for tmp in staged {
            if let Err(err) = self.fs.remove_file(tmp).await {
                debug!(path = %tmp.display(), error = %err, "Staged file cleanup failed.");
            }
        }
    }
}

fn staged_name(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}
