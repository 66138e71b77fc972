//! Delegated single-file generator contract.
//!
//! The pipeline does not generate the combined schema/client artifact
//! itself; it delegates to an [`ArtifactGenerator`], which writes one source
//! file mixing zod schema declarations and a zodios endpoint table. Any
//! compatible implementation can be plugged in; [`ZodClientGenerator`] is
//! the built-in default.

use std::path::Path;

use crate::error::DelegateError;
use crate::spec::{ApiDocument, EnumValue, Schema, SchemaType, METHOD_ORDER};
use crate::ts::{escape_ts_string, quote_if_needed};

/// Formatting options passed through to the delegated generator.
#[derive(Debug, Clone, Copy)]
pub struct FormatOptions {
    /// Spaces per indentation level in the generated artifact.
    pub indent: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

/// A generator that turns a (sliced) document into one combined source file.
///
/// The artifact is written to `out_path` as a side effect. Any failure
/// aborts the calling domain's pipeline; the caller owns temp-file cleanup.
#[allow(async_fn_in_trait)]
pub trait ArtifactGenerator {
    /// Generate the combined artifact for `document` at `out_path`.
    async fn generate(
        &self,
        document: &ApiDocument,
        out_path: &Path,
        options: &FormatOptions,
    ) -> Result<(), DelegateError>;
}

/// Built-in artifact generator emitting zod schemas and a zodios client.
///
/// Schema declarations are emitted in document order, one per request body
/// that defines an `application/json` schema, followed by a single
/// `endpoints` table and the combined client boilerplate. `$ref`s compile to
/// `z.unknown()` so each artifact stays self-contained.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZodClientGenerator;

impl ArtifactGenerator for ZodClientGenerator {
    async fn generate(
        &self,
        document: &ApiDocument,
        out_path: &Path,
        options: &FormatOptions,
    ) -> Result<(), DelegateError> {
        let artifact = render_artifact(document, options);
        if let Some(parent) = out_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(out_path, artifact).await?;
        Ok(())
    }
}

fn render_artifact(document: &ApiDocument, options: &FormatOptions) -> String {
    let pad = " ".repeat(options.indent);
    let mut schemas = String::new();
    let mut table = String::from("export const endpoints = makeApi([\n");

    for (path, item) in document.paths.iter() {
        for method in METHOD_ORDER {
            let Some(operation) = item.operation(method) else {
                continue;
            };

            let body_schema = operation.request_json_schema();
            let body_ident = body_schema
                .map(|_| format!("{}Schema", operation_ident(path, method.as_str())));

            if let (Some(schema), Some(ident)) = (body_schema, &body_ident) {
                schemas.push_str(&format!(
                    "const {ident} = {};\n",
                    zod_expr(schema, 0, options)
                ));
            }

            table.push_str(&format!("{pad}{{\n"));
            table.push_str(&format!("{pad}{pad}method: \"{method}\",\n"));
            table.push_str(&format!("{pad}{pad}path: \"{path}\",\n"));
            table.push_str(&format!("{pad}{pad}requestFormat: \"json\",\n"));

            let mut parameters = Vec::new();
            if let Some(ident) = &body_ident {
                parameters.push(format!(
                    "{{ name: \"body\", type: \"Body\", schema: {ident} }}"
                ));
            }
            for param in operation.parameters.iter().flatten() {
                let kind = match param.location.as_str() {
                    "query" => "Query",
                    "path" => "Path",
                    "header" => "Header",
                    _ => continue,
                };
                let schema = param
                    .schema
                    .as_ref()
                    .map_or_else(|| "z.unknown()".to_string(), |s| zod_expr(s, 2, options));
                parameters.push(format!(
                    "{{ name: \"{}\", type: \"{kind}\", schema: {schema} }}",
                    escape_ts_string(&param.name)
                ));
            }
            if !parameters.is_empty() {
                table.push_str(&format!(
                    "{pad}{pad}parameters: [{}],\n",
                    parameters.join(", ")
                ));
            }

            let response = operation
                .first_success_json_schema()
                .map_or_else(|| "z.unknown()".to_string(), |s| zod_expr(s, 2, options));
            table.push_str(&format!("{pad}{pad}response: {response},\n"));
            table.push_str(&format!("{pad}}},\n"));
        }
    }

    table.push_str("]);\n");

    let mut out = String::from(
        "import { makeApi, Zodios, type ZodiosOptions } from \"@zodios/core\";\n\
         import { z } from \"zod\";\n\n",
    );
    if !schemas.is_empty() {
        out.push_str(&schemas);
        out.push('\n');
    }
    out.push_str(&table);
    out.push_str(
        "\nexport const api = new Zodios(endpoints);\n\n\
         export function createApiClient(baseUrl: string, options?: ZodiosOptions) {\n",
    );
    out.push_str(&format!("{pad}return new Zodios(baseUrl, endpoints, options);\n"));
    out.push_str("}\n");
    out
}

/// camelCase identifier for one (path, method) pair, e.g.
/// (`/auth/login`, post) → `postAuthLoginBody`.
fn operation_ident(path: &str, method: &str) -> String {
    let mut ident = method.to_string();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        if let Some(param) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            ident.push_str("By");
            ident.push_str(&pascal(param));
        } else {
            ident.push_str(&pascal(segment));
        }
    }
    ident.push_str("Body");
    ident
}

fn pascal(s: &str) -> String {
    s.split(['-', '_'])
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect()
}

/// Compile a JSON schema into a zod expression.
///
/// Total like the type compiler: unrecognized constructs (including `$ref`)
/// become `z.unknown()`.
fn zod_expr(schema: &Schema, level: usize, options: &FormatOptions) -> String {
    if schema.nullable == Some(true) {
        let mut inner = schema.clone();
        inner.nullable = None;
        return format!("{}.nullable()", zod_expr(&inner, level, options));
    }

    let Some(SchemaType::Single(ty)) = &schema.schema_type else {
        return "z.unknown()".to_string();
    };

    match ty.as_str() {
        "object" => match &schema.properties {
            Some(properties) => {
                let pad = " ".repeat(options.indent * (level + 1));
                let close_pad = " ".repeat(options.indent * level);
                let required = schema.required.as_deref().unwrap_or_default();
                let mut out = String::from("z.object({\n");
                for (name, prop) in properties.iter() {
                    let suffix = if required.iter().any(|r| r == name) {
                        ""
                    } else {
                        ".optional()"
                    };
                    out.push_str(&format!(
                        "{pad}{}: {}{suffix},\n",
                        quote_if_needed(name),
                        zod_expr(prop, level + 1, options)
                    ));
                }
                out.push_str(&format!("{close_pad}}})"));
                out
            }
            None => "z.unknown()".to_string(),
        },
        "string" => match &schema.enum_values {
            Some(values) if values.iter().all(|v| matches!(v, EnumValue::String(_))) => {
                let literals: Vec<String> = values
                    .iter()
                    .filter_map(|v| match v {
                        EnumValue::String(s) => Some(format!("\"{}\"", escape_ts_string(s))),
                        _ => None,
                    })
                    .collect();
                format!("z.enum([{}])", literals.join(", "))
            }
            Some(_) | None => "z.string()".to_string(),
        },
        "number" | "integer" => "z.number()".to_string(),
        "boolean" => "z.boolean()".to_string(),
        "array" => match &schema.items {
            Some(items) => format!("z.array({})", zod_expr(items, level, options)),
            None => "z.unknown()".to_string(),
        },
        _ => "z.unknown()".to_string(),
    }
}
