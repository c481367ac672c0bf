//! Abstract schema descriptions.
//!
//! Endpoint inputs and outputs are described by the backend's runtime
//! validation library. The generator only needs their shape, so they are
//! represented here as a closed sum type and validated once, when the
//! manifest is loaded.

use serde_json::{Map, Value};

use crate::diagnostic::CompilerError;
use super::compare::records_equal;

/// A recursive schema description.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// A primitive field descriptor.
    Field(FieldSchema),
    /// An optional wrapper around another description.
    Optional(Box<SchemaNode>),
    /// An array of one element description.
    Array(Box<SchemaNode>),
    /// A plain mapping of field name to description, in declaration order.
    Object(Vec<(String, SchemaNode)>),
}

/// A primitive field descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    pub kind: FieldKind,
    pub is_optional: bool,
}

/// The discriminant of a primitive field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    String,
    Boolean,
    Number {
        /// `false` means the value must be an integer.
        decimals: bool,
    },
    Date,
    Enum(EnumContent),
    Any,
}

/// A literal value of an enum member.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    /// An initializer that is not a plain literal, kept as source text.
    Expression(String),
}

impl LiteralValue {
    /// Renders the value as a TypeScript literal.
    pub fn to_ts(&self) -> String {
        match self {
            LiteralValue::String(s) => quote_single(s),
            LiteralValue::Number(n) => format_number(*n),
            LiteralValue::Expression(raw) => raw.clone(),
        }
    }
}

/// Ordered member-name to value mapping of an enum.
#[derive(Debug, Clone, Default)]
pub struct EnumContent(pub Vec<(String, LiteralValue)>);

impl EnumContent {
    /// Returns true if both enums have the same members with the same values,
    /// regardless of declaration order.
    pub fn structurally_equals(&self, other: &EnumContent) -> bool {
        records_equal(&self.0, &other.0)
    }

    pub fn values(&self) -> impl Iterator<Item = &LiteralValue> {
        self.0.iter().map(|(_, value)| value)
    }
}

impl PartialEq for EnumContent {
    fn eq(&self, other: &Self) -> bool {
        self.structurally_equals(other)
    }
}

impl SchemaNode {
    /// Shorthand for a required primitive field.
    pub fn field(kind: FieldKind) -> Self {
        SchemaNode::Field(FieldSchema { kind, is_optional: false })
    }

    /// Shorthand for an optional primitive field.
    pub fn optional_field(kind: FieldKind) -> Self {
        SchemaNode::Field(FieldSchema { kind, is_optional: true })
    }

    /// Returns true for an object description without fields.
    pub fn is_empty_object(&self) -> bool {
        matches!(self, SchemaNode::Object(fields) if fields.is_empty())
    }

    /// Returns true if the description is optional at its own level.
    pub fn is_optional(&self) -> bool {
        match self {
            SchemaNode::Field(field) => field.is_optional,
            SchemaNode::Optional(_) => true,
            _ => false,
        }
    }

    /// Returns the object with every field made optional.
    pub fn partial(&self) -> SchemaNode {
        match self {
            SchemaNode::Object(fields) => SchemaNode::Object(
                fields
                    .iter()
                    .map(|(name, node)| {
                        let optional = match node {
                            SchemaNode::Field(field) => SchemaNode::Field(FieldSchema {
                                kind: field.kind.clone(),
                                is_optional: true,
                            }),
                            SchemaNode::Optional(_) => node.clone(),
                            other => SchemaNode::Optional(Box::new(other.clone())),
                        };
                        (name.clone(), optional)
                    })
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// Merges the fields of `other` into this object. A field that already
    /// exists keeps its position and takes the value from `other`.
    pub fn merged(&self, other: &SchemaNode) -> SchemaNode {
        match (self, other) {
            (SchemaNode::Object(base), SchemaNode::Object(extra)) => {
                let mut fields = base.clone();
                for (name, node) in extra {
                    match fields.iter_mut().find(|(existing, _)| existing == name) {
                        Some(slot) => slot.1 = node.clone(),
                        None => fields.push((name.clone(), node.clone())),
                    }
                }
                SchemaNode::Object(fields)
            }
            _ => self.clone(),
        }
    }

    /// Parses a schema description from its JSON form.
    ///
    /// `location` is used in error messages, e.g. `endpoints[0].outputSchema`.
    pub fn from_json(value: &Value, location: &str) -> Result<SchemaNode, CompilerError> {
        match value {
            Value::Array(items) => {
                if items.len() != 1 {
                    return Err(CompilerError::schema(
                        location,
                        format!("array schemas must contain exactly one element, found {}", items.len()),
                    ));
                }
                let element = SchemaNode::from_json(&items[0], &format!("{}[0]", location))?;
                Ok(SchemaNode::Array(Box::new(element)))
            }
            Value::Object(map) => {
                let is_field = map.get("isSchemaField").and_then(Value::as_bool).unwrap_or(false);
                if is_field {
                    parse_field(map, location)
                } else {
                    let mut fields = Vec::with_capacity(map.len());
                    for (key, child) in map {
                        let node = SchemaNode::from_json(child, &format!("{}.{}", location, key))?;
                        fields.push((key.clone(), node));
                    }
                    Ok(SchemaNode::Object(fields))
                }
            }
            other => Err(CompilerError::schema(
                location,
                format!("expected an object or a one-element array, found {}", json_kind(other)),
            )),
        }
    }
}

fn parse_field(map: &Map<String, Value>, location: &str) -> Result<SchemaNode, CompilerError> {
    let type_name = map
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| CompilerError::schema(location, "schema field is missing its \"type\""))?;
    let is_optional = map.get("isOptional").and_then(Value::as_bool).unwrap_or(false);

    let kind = match type_name {
        "string" => FieldKind::String,
        "boolean" => FieldKind::Boolean,
        "date" => FieldKind::Date,
        "any" => FieldKind::Any,
        "number" => FieldKind::Number {
            decimals: map.get("areDecimalsAllowed").and_then(Value::as_bool).unwrap_or(false),
        },
        "enum" => FieldKind::Enum(parse_enum_content(map.get("enumType"), location)?),
        "optionalObject" => {
            let next = map
                .get("nextSchema")
                .ok_or_else(|| CompilerError::schema(location, "optionalObject is missing \"nextSchema\""))?;
            let inner = SchemaNode::from_json(next, location)?;
            return Ok(SchemaNode::Optional(Box::new(inner)));
        }
        other => {
            return Err(CompilerError::schema(location, format!("Unknown schema type: \"{}\"", other)));
        }
    };

    Ok(SchemaNode::Field(FieldSchema { kind, is_optional }))
}

fn parse_enum_content(value: Option<&Value>, location: &str) -> Result<EnumContent, CompilerError> {
    let map = value
        .and_then(Value::as_object)
        .ok_or_else(|| CompilerError::schema(location, "enum field needs an \"enumType\" object"))?;

    let mut members = Vec::with_capacity(map.len());
    for (key, member) in map {
        let literal = match member {
            Value::String(s) => LiteralValue::String(s.clone()),
            Value::Number(n) => match n.as_f64() {
                Some(n) => LiteralValue::Number(n),
                None => return Err(CompilerError::schema(location, format!("enum member '{}' is not a finite number", key))),
            },
            other => {
                return Err(CompilerError::schema(
                    location,
                    format!("enum member '{}' must be a string or number, found {}", key, json_kind(other)),
                ));
            }
        };
        members.push((key.clone(), literal));
    }

    Ok(EnumContent(members))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Quotes a string as a single-quoted TypeScript literal.
pub fn quote_single(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Formats a number the way TypeScript source would spell it.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Schemas of the shared shapes every generated client includes.
pub mod shared {
    use super::{FieldKind, SchemaNode};

    /// `{ id, createdAt, updatedAt, ownerId? }`
    pub fn instance() -> SchemaNode {
        SchemaNode::Object(vec![
            ("id".to_string(), SchemaNode::field(FieldKind::String)),
            ("createdAt".to_string(), SchemaNode::field(FieldKind::Date)),
            ("updatedAt".to_string(), SchemaNode::field(FieldKind::Date)),
            ("ownerId".to_string(), SchemaNode::optional_field(FieldKind::String)),
        ])
    }

    /// `{ id }`
    pub fn id_input() -> SchemaNode {
        SchemaNode::Object(vec![("id".to_string(), SchemaNode::field(FieldKind::String))])
    }

    /// `{ message }`
    pub fn message() -> SchemaNode {
        SchemaNode::Object(vec![("message".to_string(), SchemaNode::field(FieldKind::String))])
    }
}
