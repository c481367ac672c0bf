//! Per-run accumulator of requested declaration names.

/// Names requested during one generation run, in registration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct References {
    pub interfaces: Vec<String>,
    pub enums: Vec<String>,
    pub schemas: Vec<String>,
}

/// Collects the interfaces, enums and schema bindings the generated client
/// needs. Each name is stored once.
#[derive(Debug, Clone, Default)]
pub struct ReferenceBuilder {
    references: References,
}

impl ReferenceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder seeded with the given interface names.
    pub fn with_interfaces<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut builder = Self::new();
        for name in names {
            builder.add_interface(name);
        }
        builder
    }

    pub fn add_interface(&mut self, name: impl Into<String>) {
        push_unique(&mut self.references.interfaces, name.into());
    }

    pub fn add_enum(&mut self, name: impl Into<String>) {
        push_unique(&mut self.references.enums, name.into());
    }

    pub fn add_schema(&mut self, name: impl Into<String>) {
        push_unique(&mut self.references.schemas, name.into());
    }

    /// Snapshot of everything registered so far.
    pub fn references(&self) -> References {
        self.references.clone()
    }
}

fn push_unique(list: &mut Vec<String>, name: String) {
    if !name.is_empty() && !list.contains(&name) {
        list.push(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deduplicates_and_keeps_order() {
        let mut builder = ReferenceBuilder::with_interfaces(["Instance", "IdInput"]);
        builder.add_interface("Car");
        builder.add_interface("Instance");
        builder.add_enum("Color");
        builder.add_enum("Color");
        builder.add_schema("sCar");
        builder.add_schema("");

        let references = builder.references();
        assert_eq!(references.interfaces, vec!["Instance", "IdInput", "Car"]);
        assert_eq!(references.enums, vec!["Color"]);
        assert_eq!(references.schemas, vec!["sCar"]);
    }
}
