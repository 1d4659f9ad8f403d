use std::collections::{BTreeMap, HashMap};

use crate::{
    decoder::DecoderRegistry,
    error::ConfigError,
    schema::{SchemaIndex, SCHEMA_OPTION},
};

/// Name under which the row cursor registers with host tooling.
pub const CURSOR_NAME: &str = "row.mapping";

/// Description of a cursor and the options it understands, for host tooling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IteratorOptions {
    /// Short registration name.
    pub name: String,
    /// Human-readable summary.
    pub description: String,
    /// Option key to its description.
    pub named_options: BTreeMap<String, String>,
}

impl IteratorOptions {
    /// Options block without any named option.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            named_options: BTreeMap::new(),
        }
    }

    /// Declare one named option.
    pub fn named_option(mut self, key: impl Into<String>, description: impl Into<String>) -> Self {
        self.named_options.insert(key.into(), description.into());
        self
    }
}

/// Metadata for the row cursor. Has no effect on scanning.
pub fn describe_options() -> IteratorOptions {
    IteratorOptions::new(
        CURSOR_NAME,
        "Groups cells into one record per row using a schema mapping",
    )
    .named_option(SCHEMA_OPTION, "Schema mapping cells into columns")
}

/// Check host options without building a cursor.
///
/// Performs the same parsing and decoder resolution as cursor
/// initialization, so anything accepted here initializes cleanly.
pub fn validate_options(
    options: &HashMap<String, String>,
    registry: &DecoderRegistry,
) -> Result<(), ConfigError> {
    SchemaIndex::from_options(options, registry).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_single_schema_option() {
        let options = describe_options();
        assert_eq!(options.name, CURSOR_NAME);
        assert_eq!(
            options.named_options.keys().collect::<Vec<_>>(),
            vec![SCHEMA_OPTION]
        );
    }

    #[test]
    fn validation_matches_initialization() {
        let registry = DecoderRegistry::default();
        let raw = r#"[{"mapping": {"x": {
            "columnFamily": "f", "columnQualifier": "q", "type": "string"
        }}}]"#;
        let good = HashMap::from([(SCHEMA_OPTION.to_string(), raw.to_string())]);
        validate_options(&good, &registry).expect("valid options");

        let bad = HashMap::from([(SCHEMA_OPTION.to_string(), "[{]".to_string())]);
        assert!(matches!(
            validate_options(&bad, &registry),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            validate_options(&HashMap::new(), &registry),
            Err(ConfigError::MissingOption(_))
        ));
    }
}
