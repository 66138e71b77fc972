//! Independent request/response type synthesis.
//!
//! Works directly on a domain's endpoint list, never on the delegated
//! generator's artifact. For each endpoint, the request body schema and the
//! first 2xx JSON response schema (declared order) are compiled into named
//! declarations via a deterministic naming algorithm.

use crate::domain::{Domain, Endpoint};
use crate::spec::{EnumValue, HttpMethod, Schema, SchemaType};
use crate::ts::{TsLiteral, TsPrimitive, TsProp, TsType};

/// Whether a synthesized definition describes a request or response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRole {
    Request,
    Response,
}

impl TypeRole {
    const fn suffix(self) -> &'static str {
        match self {
            TypeRole::Request => "Request",
            TypeRole::Response => "Response",
        }
    }
}

/// A named type declaration derived from an endpoint schema.
#[derive(Debug, Clone)]
pub struct TypeDefinition {
    pub name: String,
    pub shape: TsType,
    pub role: TypeRole,
}

/// PascalCase a single word (first letter uppercased, rest untouched).
fn pascal_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// PascalCase a name that may contain `-` or `_` separators.
fn pascal_case(name: &str) -> String {
    name.split(['-', '_']).map(pascal_word).collect()
}

/// Deterministic type name for an endpoint body.
///
/// 1. Split the path into non-empty segments, dropping a leading segment
///    equal to the domain name.
/// 2. `{param}` segments map to `By` + PascalCase(param); others are
///    PascalCase-joined across `-`.
/// 3. If the concatenation does not already contain the method name
///    (case-insensitive), the PascalCased method is prepended.
/// 4. Final name = PascalCase(domain) + operation + `Request`/`Response`.
///
/// Injective over (domain, path, method, role) because (path, method) pairs
/// are unique per document.
pub fn type_name(domain: Domain, path: &str, method: HttpMethod, role: TypeRole) -> String {
    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.first() == Some(&domain.as_str()) {
        segments.remove(0);
    }

    let mut operation = String::new();
    for segment in segments {
        if let Some(param) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            operation.push_str("By");
            operation.push_str(&pascal_case(param));
        } else {
            operation.push_str(&pascal_case(segment));
        }
    }

    if !operation.to_lowercase().contains(method.as_str()) {
        operation = format!("{}{operation}", pascal_word(method.as_str()));
    }

    format!("{}{operation}{}", pascal_case(domain.as_str()), role.suffix())
}

/// Compile a JSON schema into a TypeScript shape.
///
/// Total: unrecognized constructs (including `$ref`, which would couple the
/// module to schemas outside the domain) become `unknown`, never an error.
pub fn compile_schema(schema: &Schema) -> TsType {
    compile(schema, true)
}

fn compile(schema: &Schema, allow_nullable: bool) -> TsType {
    // Nullable flag: compile with the flag cleared, then union with null.
    if allow_nullable && schema.nullable == Some(true) {
        return TsType::Union(vec![
            compile(schema, false),
            TsType::Primitive(TsPrimitive::Null),
        ]);
    }

    match &schema.schema_type {
        Some(SchemaType::Single(ty)) => compile_single(ty.as_str(), schema),
        Some(SchemaType::Multiple(types)) => {
            // A 3.1-style [T, "null"] pair compiles to a nullable union;
            // anything more exotic is opaque.
            let non_null: Vec<&String> = types.iter().filter(|t| *t != "null").collect();
            let has_null = types.iter().any(|t| t == "null");
            match (non_null.as_slice(), has_null) {
                ([single], true) => TsType::Union(vec![
                    compile_single(single, schema),
                    TsType::Primitive(TsPrimitive::Null),
                ]),
                ([single], false) => compile_single(single, schema),
                _ => TsType::Primitive(TsPrimitive::Unknown),
            }
        }
        None => TsType::Primitive(TsPrimitive::Unknown),
    }
}

fn compile_single(ty: &str, schema: &Schema) -> TsType {
    match ty {
        "object" => match &schema.properties {
            Some(properties) => {
                let required = schema.required.as_deref().unwrap_or_default();
                let props = properties
                    .iter()
                    .map(|(name, prop_schema)| TsProp {
                        name: name.to_string(),
                        ty: compile(prop_schema, true),
                        optional: !required.iter().any(|r| r == name),
                    })
                    .collect();
                TsType::Object(props)
            }
            None => TsType::Primitive(TsPrimitive::Unknown),
        },
        "string" => match &schema.enum_values {
            // Enum declaration order is preserved in the union.
            Some(values) => TsType::Union(values.iter().map(enum_literal).collect()),
            None => TsType::Primitive(TsPrimitive::String),
        },
        "number" | "integer" => TsType::Primitive(TsPrimitive::Number),
        "boolean" => TsType::Primitive(TsPrimitive::Boolean),
        "array" => match &schema.items {
            Some(items) => TsType::Array(Box::new(compile(items, true))),
            None => TsType::Primitive(TsPrimitive::Unknown),
        },
        _ => TsType::Primitive(TsPrimitive::Unknown),
    }
}

fn enum_literal(value: &EnumValue) -> TsType {
    TsType::Literal(match value {
        EnumValue::String(s) => TsLiteral::String(s.clone()),
        EnumValue::Integer(i) => TsLiteral::Int(*i),
        EnumValue::Float(f) => TsLiteral::Number(*f),
        EnumValue::Bool(b) => TsLiteral::Bool(*b),
        EnumValue::Null => TsLiteral::Null,
    })
}

/// Synthesize the type definitions for a domain's endpoints.
pub fn synthesize_types(domain: Domain, endpoints: &[Endpoint]) -> Vec<TypeDefinition> {
    let mut definitions = Vec::new();

    for endpoint in endpoints {
        if let Some(schema) = endpoint.operation.request_json_schema() {
            definitions.push(TypeDefinition {
                name: type_name(domain, &endpoint.path, endpoint.method, TypeRole::Request),
                shape: compile_schema(schema),
                role: TypeRole::Request,
            });
        }
        if let Some(schema) = endpoint.operation.first_success_json_schema() {
            definitions.push(TypeDefinition {
                name: type_name(domain, &endpoint.path, endpoint.method, TypeRole::Response),
                shape: compile_schema(schema),
                role: TypeRole::Response,
            });
        }
    }

    definitions
}

/// Render the type-definitions module for a domain.
///
/// A domain with no request or response bodies still gets a module, holding
/// a single placeholder alias so the file is importable.
pub fn render_types_module(domain: Domain, endpoints: &[Endpoint]) -> String {
    let definitions = synthesize_types(domain, endpoints);

    if definitions.is_empty() {
        let name = pascal_case(domain.as_str());
        return format!(
            "// No request or response bodies are defined for this domain yet.\n\
             export type {name}Placeholder = Record<string, never>;\n"
        );
    }

    let mut out = String::new();
    for (i, def) in definitions.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&def.shape.emit_declaration(&def.name));
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::{partition_endpoints, Domain};
    use crate::spec::ApiDocument;
    use crate::ts::Emit;

    fn schema(json: &str) -> Schema {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_type_name_pinned_contract_literal() {
        assert_eq!(
            type_name(
                Domain::Chat,
                "/chats/{id}/messages",
                HttpMethod::Post,
                TypeRole::Request
            ),
            "ChatPostChatsByIdMessagesRequest"
        );
    }

    #[test]
    fn test_type_name_drops_leading_domain_segment() {
        assert_eq!(
            type_name(Domain::Auth, "/auth/login", HttpMethod::Post, TypeRole::Request),
            "AuthPostLoginRequest"
        );
    }

    #[test]
    fn test_type_name_skips_method_prefix_when_present() {
        // "Logout" does not contain "post", so the method is prepended;
        // a path already containing the method name is left alone.
        assert_eq!(
            type_name(Domain::Auth, "/auth/logout", HttpMethod::Post, TypeRole::Response),
            "AuthPostLogoutResponse"
        );
        assert_eq!(
            type_name(Domain::User, "/users/get-profile", HttpMethod::Get, TypeRole::Response),
            "UserUsersGetProfileResponse"
        );
    }

    #[test]
    fn test_type_name_pascals_dashed_segments() {
        assert_eq!(
            type_name(
                Domain::User,
                "/users/password-reset",
                HttpMethod::Post,
                TypeRole::Request
            ),
            "UserPostUsersPasswordResetRequest"
        );
    }

    #[test]
    fn test_compile_required_controls_optionality() {
        let required = schema(
            r#"{ "type": "object", "properties": { "a": { "type": "string" } }, "required": ["a"] }"#,
        );
        let optional =
            schema(r#"{ "type": "object", "properties": { "a": { "type": "string" } } }"#);

        assert_eq!(compile_schema(&required).emit(), "{ a: string }");
        assert_eq!(compile_schema(&optional).emit(), "{ a?: string }");
    }

    #[test]
    fn test_compile_is_deterministic() {
        let s = schema(
            r#"{ "type": "object", "properties": {
                "b": { "type": "integer" },
                "a": { "type": "array", "items": { "type": "string" } }
            }, "required": ["b"] }"#,
        );
        assert_eq!(compile_schema(&s).emit(), compile_schema(&s).emit());
        // Property order follows the document, not alphabetical order.
        assert_eq!(compile_schema(&s).emit(), "{ b: number; a?: string[] }");
    }

    #[test]
    fn test_compile_enum_preserves_declaration_order() {
        let s = schema(r#"{ "type": "string", "enum": ["a", "b"] }"#);
        assert_eq!(compile_schema(&s).emit(), "\"a\" | \"b\"");
    }

    #[test]
    fn test_compile_nullable_flag() {
        let s = schema(r#"{ "type": "string", "nullable": true }"#);
        assert_eq!(compile_schema(&s).emit(), "string | null");
    }

    #[test]
    fn test_compile_type_array_nullable() {
        let s = schema(r#"{ "type": ["integer", "null"] }"#);
        assert_eq!(compile_schema(&s).emit(), "number | null");
    }

    #[test]
    fn test_compile_unrecognized_is_unknown() {
        assert_eq!(
            compile_schema(&schema(r##"{ "$ref": "#/components/schemas/Chat" }"##)).emit(),
            "unknown"
        );
        assert_eq!(compile_schema(&schema(r#"{}"#)).emit(), "unknown");
        assert_eq!(
            compile_schema(&schema(r#"{ "type": "widget" }"#)).emit(),
            "unknown"
        );
    }

    #[test]
    fn test_first_2xx_response_wins() {
        let doc = ApiDocument::from_json(
            r#"{
            "paths": {
                "/chats": {
                    "get": {
                        "responses": {
                            "200": { "content": { "application/json": { "schema": { "type": "string" } } } },
                            "201": { "content": { "application/json": { "schema": { "type": "boolean" } } } }
                        }
                    }
                }
            }
        }"#,
        )
        .unwrap();
        let partitions = partition_endpoints(&doc);
        let defs = synthesize_types(Domain::Chat, &partitions[&Domain::Chat]);
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].role, TypeRole::Response);
        assert_eq!(defs[0].shape.emit(), "string");
    }

    #[test]
    fn test_render_module_with_request_and_response() {
        let doc = ApiDocument::from_json(
            r#"{
            "paths": {
                "/auth/login": {
                    "post": {
                        "requestBody": {
                            "content": { "application/json": { "schema": {
                                "type": "object",
                                "properties": { "email": { "type": "string" } },
                                "required": ["email"]
                            } } }
                        },
                        "responses": {
                            "200": { "content": { "application/json": { "schema": {
                                "type": "object",
                                "properties": { "token": { "type": "string" } },
                                "required": ["token"]
                            } } } }
                        }
                    }
                }
            }
        }"#,
        )
        .unwrap();
        let partitions = partition_endpoints(&doc);
        let module = render_types_module(Domain::Auth, &partitions[&Domain::Auth]);
        assert!(module.contains("export interface AuthPostLoginRequest {"));
        assert!(module.contains("  email: string;"));
        assert!(module.contains("export interface AuthPostLoginResponse {"));
        assert!(module.contains("  token: string;"));
    }

    #[test]
    fn test_render_module_placeholder_when_empty() {
        let doc = ApiDocument::from_json(
            r#"{ "paths": { "/users/me": { "get": { "responses": { "204": { "description": "ok" } } } } } }"#,
        )
        .unwrap();
        let partitions = partition_endpoints(&doc);
        let module = render_types_module(Domain::User, &partitions[&Domain::User]);
        assert!(module.contains("export type UserPlaceholder = Record<string, never>;"));
    }
}
