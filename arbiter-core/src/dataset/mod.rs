//! Dataset collaborator: attribute metadata plus the capability check.
//!
//! The resolver never looks at row contents directly. Everything it needs is
//! exposed through the [`Dataset`] trait; [`Instances`] is the in-memory
//! implementation produced by the ARFF reader and the dummy generator.

pub mod arff;
pub mod dummy;

use crate::capabilities::Capabilities;
use crate::error::{CapabilityError, DatasetError};
use serde::{Deserialize, Serialize};

pub use arff::{load_arff, parse_arff};
pub use dummy::{DummySpec, create_dummy_instances};

/// Type of a single attribute (column).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail", rename_all = "snake_case")]
pub enum AttributeType {
    Numeric,
    Nominal(Vec<String>),
    String,
    Date(Option<String>),
    Relational,
}

impl AttributeType {
    /// Short human-readable name, refined by arity for nominal attributes.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Nominal(values) => match values.len() {
                0 => "empty nominal",
                1 => "unary",
                2 => "binary",
                _ => "nominal",
            },
            Self::String => "string",
            Self::Date(_) => "date",
            Self::Relational => "relational",
        }
    }
}

/// Attribute metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub kind: AttributeType,
}

impl Attribute {
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeType::Numeric,
        }
    }

    pub fn nominal<S: Into<String>>(name: impl Into<String>, values: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeType::Nominal(values.into_iter().map(Into::into).collect()),
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeType::String,
        }
    }

    pub fn date(name: impl Into<String>, format: Option<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeType::Date(format),
        }
    }

    pub fn relational(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeType::Relational,
        }
    }
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Missing,
    Number(f64),
    Nominal(usize),
    Text(String),
}

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// The view of a dataset the resolver relies on.
///
/// Implementations must be read-only: probing never mutates the dataset.
pub trait Dataset {
    fn relation_name(&self) -> &str;

    fn attributes(&self) -> &[Attribute];

    fn class_index(&self) -> Option<usize>;

    fn num_instances(&self) -> usize;

    /// Whether any instance is missing a value for the given attribute.
    fn has_missing_values(&self, attribute: usize) -> bool;

    fn class_attribute(&self) -> Option<&Attribute> {
        self.class_index().and_then(|i| self.attributes().get(i))
    }

    /// Fail with a descriptive error if `capabilities` do not cover this dataset.
    fn check_capabilities(&self, capabilities: &Capabilities) -> Result<(), CapabilityError> {
        capabilities.test(self)
    }
}

/// In-memory dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instances {
    relation: String,
    attributes: Vec<Attribute>,
    class_index: Option<usize>,
    rows: Vec<Vec<Value>>,
}

impl Instances {
    pub fn new(relation: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self {
            relation: relation.into(),
            attributes,
            class_index: None,
            rows: Vec::new(),
        }
    }

    pub fn set_class_index(&mut self, index: Option<usize>) -> Result<(), DatasetError> {
        if let Some(i) = index
            && i >= self.attributes.len()
        {
            return Err(DatasetError::ClassIndexOutOfRange {
                index: i,
                count: self.attributes.len(),
            });
        }
        self.class_index = index;
        Ok(())
    }

    /// Use the last attribute as the class, the ARFF convention.
    pub fn with_last_as_class(mut self) -> Result<Self, DatasetError> {
        if self.attributes.is_empty() {
            return Err(DatasetError::NoAttributes);
        }
        self.class_index = Some(self.attributes.len() - 1);
        Ok(self)
    }

    /// Append a row, checking arity and nominal value ranges.
    pub fn push(&mut self, row: Vec<Value>) -> Result<(), DatasetError> {
        if row.len() != self.attributes.len() {
            return Err(DatasetError::InvalidSpec {
                message: format!(
                    "row has {} values, expected {}",
                    row.len(),
                    self.attributes.len()
                ),
            });
        }
        for (value, attribute) in row.iter().zip(&self.attributes) {
            if let (Value::Nominal(idx), AttributeType::Nominal(values)) = (value, &attribute.kind)
                && *idx >= values.len()
            {
                return Err(DatasetError::InvalidSpec {
                    message: format!(
                        "nominal index {} out of range for attribute '{}'",
                        idx, attribute.name
                    ),
                });
            }
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }
}

impl Dataset for Instances {
    fn relation_name(&self) -> &str {
        &self.relation
    }

    fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    fn class_index(&self) -> Option<usize> {
        self.class_index
    }

    fn num_instances(&self) -> usize {
        self.rows.len()
    }

    fn has_missing_values(&self, attribute: usize) -> bool {
        self.rows
            .iter()
            .any(|row| row.get(attribute).is_some_and(Value::is_missing))
    }
}
