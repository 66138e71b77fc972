//! Minimal TypeScript type AST used by the type synthesizer.
//!
//! The synthesizer compiles JSON schemas into this representation and the
//! [`Emit`] trait turns it into source text. Only the shapes the schema
//! compiler can produce are modeled.

use std::fmt::Write;

/// Trait for emitting TypeScript code from AST nodes.
pub trait Emit {
    /// Convert the AST node to its TypeScript string representation.
    fn emit(&self) -> String;
}

/// TypeScript type representation.
#[derive(Debug, Clone, PartialEq)]
pub enum TsType {
    /// Primitive types: string, number, boolean, null, unknown
    Primitive(TsPrimitive),
    /// Array type: `T[]`
    Array(Box<TsType>),
    /// Union type: `A | B | C`
    Union(Vec<TsType>),
    /// Object type: `{ foo: string; bar?: number }`
    Object(Vec<TsProp>),
    /// Literal type: `"foo"`, `42`, `true`
    Literal(TsLiteral),
}

/// TypeScript primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsPrimitive {
    String,
    Number,
    Boolean,
    Null,
    Unknown,
}

/// Object property definition.
#[derive(Debug, Clone, PartialEq)]
pub struct TsProp {
    pub name: String,
    pub ty: TsType,
    pub optional: bool,
}

/// TypeScript literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum TsLiteral {
    String(String),
    Int(i64),
    Number(f64),
    Bool(bool),
    Null,
}

/// Whether a property name can appear bare, or needs quoting.
fn is_plain_ident(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Escape a string for use in a double-quoted TypeScript literal.
pub fn escape_ts_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Quote a property key if it is not a valid bare identifier.
pub fn quote_if_needed(name: &str) -> String {
    if is_plain_ident(name) {
        name.to_string()
    } else {
        format!("\"{}\"", escape_ts_string(name))
    }
}

impl Emit for TsPrimitive {
    fn emit(&self) -> String {
        match self {
            TsPrimitive::String => "string".to_string(),
            TsPrimitive::Number => "number".to_string(),
            TsPrimitive::Boolean => "boolean".to_string(),
            TsPrimitive::Null => "null".to_string(),
            TsPrimitive::Unknown => "unknown".to_string(),
        }
    }
}

impl Emit for TsLiteral {
    fn emit(&self) -> String {
        match self {
            TsLiteral::String(s) => format!("\"{}\"", escape_ts_string(s)),
            TsLiteral::Int(i) => i.to_string(),
            TsLiteral::Number(n) => n.to_string(),
            TsLiteral::Bool(b) => b.to_string(),
            TsLiteral::Null => "null".to_string(),
        }
    }
}

impl Emit for TsProp {
    fn emit(&self) -> String {
        let opt = if self.optional { "?" } else { "" };
        format!("{}{}: {}", quote_if_needed(&self.name), opt, self.ty.emit())
    }
}

impl Emit for TsType {
    fn emit(&self) -> String {
        match self {
            TsType::Primitive(p) => p.emit(),
            TsType::Array(inner) => {
                let inner_str = inner.emit();
                // Unions inside arrays need parentheses.
                if matches!(**inner, TsType::Union(_)) {
                    format!("({inner_str})[]")
                } else {
                    format!("{inner_str}[]")
                }
            }
            TsType::Union(types) => types.iter().map(Emit::emit).collect::<Vec<_>>().join(" | "),
            TsType::Object(props) => {
                if props.is_empty() {
                    "{}".to_string()
                } else {
                    let parts: Vec<_> = props.iter().map(Emit::emit).collect();
                    format!("{{ {} }}", parts.join("; "))
                }
            }
            TsType::Literal(lit) => lit.emit(),
        }
    }
}

impl TsType {
    /// Emit a named top-level declaration for this type.
    ///
    /// Object shapes become `export interface`; everything else becomes an
    /// `export type` alias.
    pub fn emit_declaration(&self, name: &str) -> String {
        match self {
            TsType::Object(props) => {
                let mut out = format!("export interface {name} {{\n");
                for prop in props {
                    let opt = if prop.optional { "?" } else { "" };
                    let _ = writeln!(
                        out,
                        "  {}{}: {};",
                        quote_if_needed(&prop.name),
                        opt,
                        prop.ty.emit()
                    );
                }
                out.push_str("}\n");
                out
            }
            other => format!("export type {name} = {};\n", other.emit()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_primitives() {
        assert_eq!(TsPrimitive::String.emit(), "string");
        assert_eq!(TsPrimitive::Unknown.emit(), "unknown");
    }

    #[test]
    fn test_emit_union_array_parenthesized() {
        let ty = TsType::Array(Box::new(TsType::Union(vec![
            TsType::Primitive(TsPrimitive::String),
            TsType::Primitive(TsPrimitive::Null),
        ])));
        assert_eq!(ty.emit(), "(string | null)[]");
    }

    #[test]
    fn test_emit_object_type() {
        let ty = TsType::Object(vec![
            TsProp {
                name: "id".into(),
                ty: TsType::Primitive(TsPrimitive::Number),
                optional: false,
            },
            TsProp {
                name: "display-name".into(),
                ty: TsType::Primitive(TsPrimitive::String),
                optional: true,
            },
        ]);
        assert_eq!(ty.emit(), "{ id: number; \"display-name\"?: string }");
    }

    #[test]
    fn test_emit_interface_declaration() {
        let ty = TsType::Object(vec![TsProp {
            name: "name".into(),
            ty: TsType::Primitive(TsPrimitive::String),
            optional: false,
        }]);
        assert_eq!(
            ty.emit_declaration("Item"),
            "export interface Item {\n  name: string;\n}\n"
        );
    }

    #[test]
    fn test_emit_alias_declaration() {
        let ty = TsType::Union(vec![
            TsType::Literal(TsLiteral::String("a".into())),
            TsType::Literal(TsLiteral::String("b".into())),
        ]);
        assert_eq!(
            ty.emit_declaration("Status"),
            "export type Status = \"a\" | \"b\";\n"
        );
    }
}
