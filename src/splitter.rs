//! Splitting a combined generated artifact into schema and client modules.
//!
//! The delegated generator writes one file mixing zod schema declarations
//! and a zodios endpoint table. This module re-parses that text line by line
//! (it is deliberately not a structural parser) and produces two
//! self-contained modules, rewriting the combined exports into
//! domain-qualified ones.
//!
//! The state machine has three modes: idle, schema-capture, and
//! endpoint-capture. Splitting is total: malformed artifacts produce
//! degenerate modules, never a panic. If the table's closing token never
//! appears, capture ends at end of input and later boilerplate is ignored.

use std::collections::BTreeSet;
use std::fmt::Write;

use crate::domain::Domain;

/// Fixed naming suffix that marks validation-schema declarations.
const SCHEMA_SUFFIX: &str = "Schema";

/// Marker introducing the combined endpoint table.
const TABLE_INTRO: &str = "makeApi([";

/// Line that closes the endpoint table.
const TABLE_CLOSE: &str = "]);";

/// Combined-client export dropped and replaced with a domain-qualified one.
const CLIENT_EXPORT: &str = "export const api = new Zodios(";

/// Combined factory export dropped and replaced with a domain-qualified one.
const FACTORY_EXPORT: &str = "export function createApiClient";

/// The two module sources produced from one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitModules {
    /// Validation-schema module source.
    pub schemas: String,
    /// Typed HTTP client module source.
    pub client: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Idle,
    SchemaCapture,
    EndpointCapture,
    Done,
}

/// Split one generated artifact into a schema module and a client module
/// for the given domain.
pub fn split_artifact(domain: Domain, artifact: &str) -> SplitModules {
    let mut schema_buf: Vec<&str> = Vec::new();
    let mut endpoint_buf: Vec<String> = Vec::new();
    let mut mode = Mode::Idle;
    let mut table_seen = false;
    let mut skipping_factory = false;

    for line in artifact.lines() {
        match mode {
            Mode::Idle | Mode::SchemaCapture => {
                if is_table_intro(line) {
                    table_seen = true;
                    endpoint_buf.push(format!(
                        "const {}Endpoints = {TABLE_INTRO}",
                        domain.as_str()
                    ));
                    mode = Mode::EndpointCapture;
                } else if mode == Mode::SchemaCapture {
                    schema_buf.push(line);
                } else if schema_decl_name(line).is_some() {
                    schema_buf.push(line);
                    mode = Mode::SchemaCapture;
                }
            }
            Mode::EndpointCapture => {
                if skipping_factory {
                    if line.trim() == "}" {
                        skipping_factory = false;
                    }
                    continue;
                }
                let trimmed = line.trim();
                if trimmed == TABLE_CLOSE {
                    endpoint_buf.push(line.to_string());
                    mode = Mode::Done;
                } else if trimmed.starts_with(CLIENT_EXPORT) {
                    // Dropped; the domain-qualified client is appended below.
                } else if trimmed.starts_with(FACTORY_EXPORT) {
                    skipping_factory = !trimmed.ends_with('}');
                } else {
                    endpoint_buf.push(line.to_string());
                }
            }
            Mode::Done => {}
        }
    }

    SplitModules {
        schemas: build_schema_module(&schema_buf),
        client: build_client_module(domain, &endpoint_buf, table_seen),
    }
}

fn build_schema_module(schema_buf: &[&str]) -> String {
    // Rescan the captured buffer for declaration names, first-seen order.
    let mut names: Vec<&str> = Vec::new();
    for line in schema_buf {
        if let Some(name) = schema_decl_name(line) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }

    if names.is_empty() {
        return "// No request schemas were generated for this domain yet.\n\
                export const schemas = {};\n"
            .to_string();
    }

    let mut out = String::from("import { z } from \"zod\";\n\n");
    for line in schema_buf {
        out.push_str(line);
        out.push('\n');
    }
    let _ = writeln!(out, "\nexport {{ {} }};", names.join(", "));
    out
}

fn build_client_module(domain: Domain, endpoint_buf: &[String], table_seen: bool) -> String {
    let mut out = String::from(
        "import { makeApi, Zodios, type ZodiosOptions } from \"@zodios/core\";\n",
    );

    // The table carries inline zod expressions (`z.unknown()` at minimum),
    // so the module must bind `z` itself.
    if references_ident(endpoint_buf, "z") {
        out.push_str("import { z } from \"zod\";\n");
    }

    // Import schema declarations only when the table references them.
    let referenced = referenced_schema_names(endpoint_buf);
    if !referenced.is_empty() {
        let names: Vec<&str> = referenced.iter().map(String::as_str).collect();
        let _ = writeln!(
            out,
            "import {{ {} }} from \"./{}.schemas\";",
            names.join(", "),
            domain.as_str()
        );
    }
    out.push('\n');

    for line in endpoint_buf {
        out.push_str(line);
        out.push('\n');
    }

    if table_seen {
        let name = domain.as_str();
        let pascal = capitalize(name);
        let _ = write!(
            out,
            "\nexport const {name}Api = new Zodios({name}Endpoints);\n\n\
             export function create{pascal}ApiClient(baseUrl: string, options?: ZodiosOptions) {{\n\
             \x20 return new Zodios(baseUrl, {name}Endpoints, options);\n\
             }}\n"
        );
    }

    out
}

/// Extract the declared identifier from a schema-declaration line, if the
/// line is one: a (possibly exported) `const` assignment whose name carries
/// the fixed suffix.
fn schema_decl_name(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let rest = trimmed.strip_prefix("export ").unwrap_or(trimmed);
    let rest = rest.strip_prefix("const ")?;
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '$'))
        .unwrap_or(rest.len());
    let name = &rest[..end];
    let after = rest[end..].trim_start();
    if name.len() > SCHEMA_SUFFIX.len() && name.ends_with(SCHEMA_SUFFIX) && after.starts_with('=') {
        Some(name)
    } else {
        None
    }
}

fn is_table_intro(line: &str) -> bool {
    let trimmed = line.trim_start();
    let rest = trimmed.strip_prefix("export ").unwrap_or(trimmed);
    rest.starts_with("const endpoints") && rest.contains(TABLE_INTRO)
}

/// All suffix-matching identifiers referenced in the endpoint buffer,
/// sorted for a stable import line.
fn referenced_schema_names(endpoint_buf: &[String]) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    for line in endpoint_buf {
        let mut ident = String::new();
        for c in line.chars().chain(std::iter::once(' ')) {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                ident.push(c);
            } else {
                if ident.len() > SCHEMA_SUFFIX.len() && ident.ends_with(SCHEMA_SUFFIX) {
                    names.insert(ident.clone());
                }
                ident.clear();
            }
        }
    }
    names
}

/// Whether any captured line uses `target` as a standalone identifier.
fn references_ident(endpoint_buf: &[String], target: &str) -> bool {
    for line in endpoint_buf {
        let mut ident = String::new();
        for c in line.chars().chain(std::iter::once(' ')) {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                ident.push(c);
            } else {
                if ident == target {
                    return true;
                }
                ident.clear();
            }
        }
    }
    false
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}
