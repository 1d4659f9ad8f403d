//! Schema mappings and the immutable index built from them.
//!
//! The index is keyed family first, qualifier second, mirroring cell sort
//! order so the cursor only re-resolves a qualifier table when the family
//! changes within a row.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    sync::Arc,
};

use bytes::Bytes;
use serde::{Deserialize, Deserializer};

use crate::{
    decoder::{DecodedValue, DecoderRegistry, ValueDecoder},
    error::{ConfigError, ScanError},
    observability::{log_debug, log_warn},
};

/// Option key holding the serialized mapping list.
pub const SCHEMA_OPTION: &str = "schema";

/// One named group of column definitions.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SchemaMapping {
    /// Optional label for the group.
    #[serde(default)]
    pub name: Option<String>,
    /// Output column name to cell coordinates and decoder kind.
    pub mapping: BTreeMap<String, SchemaMappingField>,
}

/// Cell coordinates and decoder kind for one output column.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaMappingField {
    /// Column family the cell lives in.
    #[serde(deserialize_with = "bytes_from_text")]
    pub column_family: Bytes,
    /// Column qualifier of the cell.
    #[serde(deserialize_with = "bytes_from_text")]
    pub column_qualifier: Bytes,
    /// Decoder kind, resolved through a [`DecoderRegistry`].
    #[serde(rename = "type")]
    pub kind: String,
}

fn bytes_from_text<'de, D>(deserializer: D) -> Result<Bytes, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(Bytes::from)
}

impl SchemaMapping {
    /// Start an empty mapping group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            mapping: BTreeMap::new(),
        }
    }

    /// Map the cell at (`family`, `qualifier`) to `column`, decoded as `kind`.
    pub fn field(
        mut self,
        column: impl Into<String>,
        family: impl Into<Bytes>,
        qualifier: impl Into<Bytes>,
        kind: impl Into<String>,
    ) -> Self {
        self.mapping.insert(
            column.into(),
            SchemaMappingField {
                column_family: family.into(),
                column_qualifier: qualifier.into(),
                kind: kind.into(),
            },
        );
        self
    }
}

/// Parse the serialized mapping list carried by the `schema` option.
pub fn parse_mappings(raw: &str) -> Result<Vec<SchemaMapping>, ConfigError> {
    serde_json::from_str(raw).map_err(ConfigError::Parse)
}

/// Where a matched cell goes and how its value is decoded.
#[derive(Clone, Debug)]
pub struct ColumnBinding {
    column: String,
    kind: String,
    decoder: Arc<dyn ValueDecoder>,
}

impl ColumnBinding {
    /// Output column name.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Decoder kind as written in the configuration.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Decoder for the cell value.
    pub fn decoder(&self) -> &dyn ValueDecoder {
        self.decoder.as_ref()
    }

    /// Decode `value`, tagging a failure with this binding's column.
    pub fn decode(&self, value: &[u8]) -> Result<DecodedValue, ScanError> {
        match self.decoder.decode(value) {
            Ok(decoded) => Ok(decoded),
            Err(source) => Err(ScanError::Decode {
                column: self.column.clone(),
                source,
            }),
        }
    }
}

/// Qualifier lookup for a single column family.
#[derive(Clone, Debug, Default)]
pub struct QualifierTable {
    qualifiers: HashMap<Bytes, ColumnBinding>,
}

impl QualifierTable {
    /// Binding for `qualifier`, if mapped.
    pub fn get(&self, qualifier: &[u8]) -> Option<&ColumnBinding> {
        self.qualifiers.get(qualifier)
    }

    /// Number of mapped qualifiers.
    pub fn len(&self) -> usize {
        self.qualifiers.len()
    }

    /// Whether no qualifier is mapped.
    pub fn is_empty(&self) -> bool {
        self.qualifiers.is_empty()
    }
}

/// Immutable family → qualifier → [`ColumnBinding`] lookup.
///
/// Built once per configuration and shared by reference between duplicated
/// cursors. If two definitions name the same (family, qualifier) pair, the one
/// that comes later wins: later groups override earlier ones, and inside a
/// group columns apply in name order.
#[derive(Clone, Default)]
pub struct SchemaIndex {
    families: HashMap<Bytes, QualifierTable>,
}

impl SchemaIndex {
    /// Build the index from mapping groups, resolving every decoder kind.
    pub fn from_mappings(
        mappings: &[SchemaMapping],
        registry: &DecoderRegistry,
    ) -> Result<Self, ConfigError> {
        let mut families: HashMap<Bytes, QualifierTable> = HashMap::new();
        for mapping in mappings {
            for (column, field) in &mapping.mapping {
                let decoder = registry.resolve(&field.kind).ok_or_else(|| {
                    ConfigError::UnsupportedDecoder {
                        kind: field.kind.clone(),
                        column: column.clone(),
                    }
                })?;
                let binding = ColumnBinding {
                    column: column.clone(),
                    kind: field.kind.clone(),
                    decoder,
                };
                let table = families.entry(field.column_family.clone()).or_default();
                if let Some(previous) = table
                    .qualifiers
                    .insert(field.column_qualifier.clone(), binding)
                {
                    log_warn!(
                        component = "schema",
                        event = "schema_mapping_overridden",
                        family = ?field.column_family,
                        qualifier = ?field.column_qualifier,
                        previous = %previous.column,
                        column = %column,
                    );
                }
            }
        }

        let index = Self { families };
        log_debug!(
            component = "schema",
            event = "schema_index_built",
            families = index.families.len(),
            columns = index.column_count(),
        );
        Ok(index)
    }

    /// Parse the `schema` option and build the index.
    pub fn from_options(
        options: &HashMap<String, String>,
        registry: &DecoderRegistry,
    ) -> Result<Self, ConfigError> {
        let raw = options
            .get(SCHEMA_OPTION)
            .ok_or(ConfigError::MissingOption(SCHEMA_OPTION))?;
        Self::from_mappings(&parse_mappings(raw)?, registry)
    }

    /// Qualifier table for `family`, if any column lives there.
    pub fn family(&self, family: &[u8]) -> Option<&QualifierTable> {
        self.families.get(family)
    }

    /// Binding for the cell at (`family`, `qualifier`).
    pub fn lookup(&self, family: &[u8], qualifier: &[u8]) -> Option<&ColumnBinding> {
        self.family(family)?.get(qualifier)
    }

    /// Total number of mapped (family, qualifier) pairs.
    pub fn column_count(&self) -> usize {
        self.families.values().map(QualifierTable::len).sum()
    }

    /// Whether nothing is mapped.
    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }
}

impl fmt::Debug for SchemaIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaIndex")
            .field("families", &self.families.len())
            .field("columns", &self.column_count())
            .finish()
    }
}
