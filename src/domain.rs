//! Domain classification of API paths.
//!
//! Every path in the document is routed to exactly one [`Domain`] by a
//! first-match-wins prefix rule table. Paths landing in an excluded domain
//! (system plumbing, shared infrastructure) never produce endpoints and
//! never produce output files.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::spec::{ApiDocument, HttpMethod, Operation, METHOD_ORDER};

/// Logical grouping of endpoints used to partition generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Domain {
    Auth,
    Chat,
    User,
    /// Health/system endpoints. Excluded from generation.
    System,
    /// Everything no rule claims. Excluded from generation.
    Shared,
}

/// Domains that produce output modules, in generation order.
pub const GENERATED_DOMAINS: [Domain; 3] = [Domain::Auth, Domain::Chat, Domain::User];

/// Ordered prefix → domain rule table. First match wins; unmatched paths
/// fall through to [`Domain::Shared`].
pub const CLASSIFICATION_RULES: &[(&str, Domain)] = &[
    ("/auth", Domain::Auth),
    ("/chats", Domain::Chat),
    ("/users", Domain::User),
    ("/health", Domain::System),
    ("/system-info", Domain::System),
];

impl Domain {
    /// Lowercase domain name used in file names and generated identifiers.
    pub const fn as_str(self) -> &'static str {
        match self {
            Domain::Auth => "auth",
            Domain::Chat => "chat",
            Domain::User => "user",
            Domain::System => "system",
            Domain::Shared => "shared",
        }
    }

    /// Excluded domains are classified but never materialized into output.
    pub const fn is_excluded(self) -> bool {
        matches!(self, Domain::System | Domain::Shared)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Route a path to its domain via [`CLASSIFICATION_RULES`].
pub fn classify_path(path: &str) -> Domain {
    for (prefix, domain) in CLASSIFICATION_RULES {
        if path.starts_with(prefix) {
            return *domain;
        }
    }
    Domain::Shared
}

/// One (path, method) pair with its operation, bound to a domain at
/// classification time.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub path: String,
    pub method: HttpMethod,
    pub operation: Operation,
    pub domain: Domain,
}

/// Partition the document's endpoints by domain.
///
/// Paths are visited in document order; for each non-excluded path, methods
/// are visited in the fixed [`METHOD_ORDER`]. Paths classified as excluded
/// are skipped entirely, so no [`Endpoint`] ever exists for them.
pub fn partition_endpoints(doc: &ApiDocument) -> BTreeMap<Domain, Vec<Endpoint>> {
    let mut partitions: BTreeMap<Domain, Vec<Endpoint>> = BTreeMap::new();

    for (path, item) in doc.paths.iter() {
        let domain = classify_path(path);
        if domain.is_excluded() {
            continue;
        }
        for method in METHOD_ORDER {
            if let Some(operation) = item.operation(method) {
                partitions.entry(domain).or_default().push(Endpoint {
                    path: path.to_string(),
                    method,
                    operation: operation.clone(),
                    domain,
                });
            }
        }
    }

    partitions
}

/// Best-effort index of schema names referenced by a set of endpoints.
///
/// Scans the request body's JSON content schema, every response's JSON
/// content schema, and every operation parameter's schema for `$ref`s, and
/// records the trailing segment after the last `/`. Missing or malformed
/// references contribute nothing. The index is informational only; nothing
/// downstream is pruned based on it.
pub fn collect_referenced_schemas(endpoints: &[Endpoint]) -> BTreeSet<String> {
    let mut names = BTreeSet::new();

    for endpoint in endpoints {
        let op = &endpoint.operation;
        if let Some(schema) = op.request_json_schema() {
            record_ref(schema.ref_path.as_deref(), &mut names);
        }
        for (_, response) in op.responses.iter() {
            if let Some(schema) = response.json_schema() {
                record_ref(schema.ref_path.as_deref(), &mut names);
            }
        }
        for param in op.parameters.iter().flatten() {
            if let Some(schema) = &param.schema {
                record_ref(schema.ref_path.as_deref(), &mut names);
            }
        }
    }

    names
}

fn record_ref(ref_path: Option<&str>, names: &mut BTreeSet<String>) {
    let Some(ref_path) = ref_path else {
        return;
    };
    let Some(name) = ref_path.rsplit('/').next() else {
        return;
    };
    if !name.is_empty() {
        names.insert(name.to_string());
    }
}
