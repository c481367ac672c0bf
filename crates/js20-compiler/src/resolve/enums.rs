//! Registration of the enums used by a schema description.

use tracing::debug;

use crate::ir::{Compilation, FieldKind, SchemaNode};
use super::builder::ReferenceBuilder;

/// Walks `schema` and registers every declared enum whose content matches an
/// enum field. Unmatched enum fields are skipped.
pub fn discover(schema: &SchemaNode, compilation: &Compilation, builder: &mut ReferenceBuilder) {
    match schema {
        SchemaNode::Object(fields) => {
            for (_, node) in fields {
                discover(node, compilation, builder);
            }
        }
        SchemaNode::Array(element) => discover(element, compilation, builder),
        SchemaNode::Optional(inner) => discover(inner, compilation, builder),
        SchemaNode::Field(field) => {
            if let FieldKind::Enum(content) = &field.kind {
                match compilation.enum_matching(content) {
                    Some(declared) => builder.add_enum(&declared.name),
                    None => debug!(members = content.0.len(), "enum field matches no declared enum"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::typescript::parse_source;
    use crate::ir::{EnumContent, LiteralValue};

    fn content(pairs: &[(&str, &str)]) -> EnumContent {
        EnumContent(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), LiteralValue::String(v.to_string())))
                .collect(),
        )
    }

    #[test]
    fn test_discovers_nested_enums_by_structure() {
        let source = r#"
            enum Color { Red = 'red', Blue = 'blue' }
            enum Size { Small = 'small', Large = 'large' }
            enum Unused { A = 'a' }
        "#;
        let compilation = parse_source(source, "enums.ts").unwrap();

        let schema = SchemaNode::Object(vec![
            (
                "paint".to_string(),
                SchemaNode::field(FieldKind::Enum(content(&[("Blue", "blue"), ("Red", "red")]))),
            ),
            (
                "sizes".to_string(),
                SchemaNode::Array(Box::new(SchemaNode::Optional(Box::new(SchemaNode::Object(vec![(
                    "size".to_string(),
                    SchemaNode::field(FieldKind::Enum(content(&[("Small", "small"), ("Large", "large")]))),
                )]))))),
            ),
        ]);

        let mut builder = ReferenceBuilder::new();
        discover(&schema, &compilation, &mut builder);

        assert_eq!(builder.references().enums, vec!["Color", "Size"]);
    }

    #[test]
    fn test_same_names_different_values_do_not_match() {
        let compilation = parse_source("enum Color { Red = 'red', Blue = 'blue' }", "enums.ts").unwrap();
        let schema = SchemaNode::field(FieldKind::Enum(content(&[("Red", "blue"), ("Blue", "red")])));

        let mut builder = ReferenceBuilder::new();
        discover(&schema, &compilation, &mut builder);

        assert!(builder.references().enums.is_empty());
    }
}
