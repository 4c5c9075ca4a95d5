//! Declared capabilities of an algorithm and the test against a dataset.
//!
//! Nominal capabilities form a ladder: enabling `NominalAttributes` also
//! covers binary, unary and empty nominal attributes, `BinaryAttributes`
//! covers unary and empty ones, and so on. The same holds for class
//! capabilities.

use crate::dataset::{AttributeType, Dataset};
use crate::error::CapabilityError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single declared capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    NominalAttributes,
    BinaryAttributes,
    UnaryAttributes,
    EmptyNominalAttributes,
    NumericAttributes,
    DateAttributes,
    StringAttributes,
    RelationalAttributes,
    MissingValues,

    NoClass,
    NominalClass,
    BinaryClass,
    UnaryClass,
    EmptyNominalClass,
    NumericClass,
    DateClass,
    StringClass,
    RelationalClass,
    MissingClassValues,
}

impl Capability {
    pub const ATTRIBUTES: [Capability; 8] = [
        Self::NominalAttributes,
        Self::BinaryAttributes,
        Self::UnaryAttributes,
        Self::EmptyNominalAttributes,
        Self::NumericAttributes,
        Self::DateAttributes,
        Self::StringAttributes,
        Self::RelationalAttributes,
    ];

    pub const CLASSES: [Capability; 8] = [
        Self::NominalClass,
        Self::BinaryClass,
        Self::UnaryClass,
        Self::EmptyNominalClass,
        Self::NumericClass,
        Self::DateClass,
        Self::StringClass,
        Self::RelationalClass,
    ];

    pub fn is_class_capability(&self) -> bool {
        Self::CLASSES.contains(self) || matches!(self, Self::NoClass | Self::MissingClassValues)
    }
}

/// The set of capabilities an algorithm declares, plus the minimum number
/// of training instances it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    enabled: BTreeSet<Capability>,
    min_instances: usize,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            enabled: BTreeSet::new(),
            min_instances: 1,
        }
    }
}

impl Capabilities {
    /// No capabilities, minimum of one instance.
    pub fn none() -> Self {
        Self::default()
    }

    /// Every capability, no instance minimum.
    pub fn all() -> Self {
        Self {
            enabled: Capability::ATTRIBUTES
                .into_iter()
                .chain(Capability::CLASSES)
                .chain([
                    Capability::MissingValues,
                    Capability::NoClass,
                    Capability::MissingClassValues,
                ])
                .collect(),
            min_instances: 0,
        }
    }

    pub fn with(capabilities: impl IntoIterator<Item = Capability>) -> Self {
        let mut caps = Self::none();
        caps.enabled.extend(capabilities);
        caps
    }

    pub fn enable(&mut self, capability: Capability) -> &mut Self {
        self.enabled.insert(capability);
        self
    }

    pub fn disable(&mut self, capability: Capability) -> &mut Self {
        self.enabled.remove(&capability);
        self
    }

    pub fn enable_all_attributes(&mut self) -> &mut Self {
        self.enabled.extend(Capability::ATTRIBUTES);
        self
    }

    pub fn enable_all_classes(&mut self) -> &mut Self {
        self.enabled.extend(Capability::CLASSES);
        self
    }

    /// Drop every class capability (including `NoClass` and missing class values).
    pub fn disable_all_classes(&mut self) -> &mut Self {
        self.enabled.retain(|c| !c.is_class_capability());
        self
    }

    pub fn set_min_instances(&mut self, min: usize) -> &mut Self {
        self.min_instances = min;
        self
    }

    pub fn min_instances(&self) -> usize {
        self.min_instances
    }

    pub fn handles(&self, capability: Capability) -> bool {
        self.enabled.contains(&capability)
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.enabled.iter().copied()
    }

    /// Capabilities shared by both sets; the stricter instance minimum wins.
    pub fn intersect(&self, other: &Capabilities) -> Capabilities {
        Capabilities {
            enabled: self.enabled.intersection(&other.enabled).copied().collect(),
            min_instances: self.min_instances.max(other.min_instances),
        }
    }

    fn handles_nominal(&self, arity: usize, ladder: [Capability; 4]) -> bool {
        // ladder: [nominal, binary, unary, empty]
        let [nominal, binary, unary, empty] = ladder;
        match arity {
            0 => [nominal, binary, unary, empty].iter().any(|c| self.handles(*c)),
            1 => [nominal, binary, unary].iter().any(|c| self.handles(*c)),
            2 => [nominal, binary].iter().any(|c| self.handles(*c)),
            _ => self.handles(nominal),
        }
    }

    fn handles_attribute(&self, kind: &AttributeType) -> bool {
        match kind {
            AttributeType::Numeric => self.handles(Capability::NumericAttributes),
            AttributeType::Nominal(values) => self.handles_nominal(
                values.len(),
                [
                    Capability::NominalAttributes,
                    Capability::BinaryAttributes,
                    Capability::UnaryAttributes,
                    Capability::EmptyNominalAttributes,
                ],
            ),
            AttributeType::String => self.handles(Capability::StringAttributes),
            AttributeType::Date(_) => self.handles(Capability::DateAttributes),
            AttributeType::Relational => self.handles(Capability::RelationalAttributes),
        }
    }

    fn handles_class(&self, kind: &AttributeType) -> bool {
        match kind {
            AttributeType::Numeric => self.handles(Capability::NumericClass),
            AttributeType::Nominal(values) => self.handles_nominal(
                values.len(),
                [
                    Capability::NominalClass,
                    Capability::BinaryClass,
                    Capability::UnaryClass,
                    Capability::EmptyNominalClass,
                ],
            ),
            AttributeType::String => self.handles(Capability::StringClass),
            AttributeType::Date(_) => self.handles(Capability::DateClass),
            AttributeType::Relational => self.handles(Capability::RelationalClass),
        }
    }

    /// Check the dataset against these capabilities.
    ///
    /// Order: attribute types, class type, missing attribute values, missing
    /// class values, minimum instance count. The first violation is returned.
    pub fn test<D: Dataset + ?Sized>(&self, data: &D) -> Result<(), CapabilityError> {
        let class_index = data.class_index();
        let attributes = data.attributes();

        for (i, attribute) in attributes.iter().enumerate() {
            if Some(i) == class_index {
                continue;
            }
            if !self.handles_attribute(&attribute.kind) {
                return Err(CapabilityError::UnsupportedAttributeType {
                    attribute: attribute.name.clone(),
                    kind: attribute.kind.describe().to_string(),
                });
            }
        }

        match data.class_attribute() {
            None => {
                if !self.handles(Capability::NoClass) {
                    return Err(CapabilityError::ClassNotSet);
                }
            }
            Some(class) => {
                if !self.handles_class(&class.kind) {
                    let any_class = Capability::CLASSES.iter().any(|c| self.handles(*c));
                    if !any_class && self.handles(Capability::NoClass) {
                        return Err(CapabilityError::ClassNotAllowed);
                    }
                    return Err(CapabilityError::UnsupportedClassType {
                        attribute: class.name.clone(),
                        kind: class.kind.describe().to_string(),
                    });
                }
            }
        }

        if !self.handles(Capability::MissingValues) {
            for (i, attribute) in attributes.iter().enumerate() {
                if Some(i) != class_index && data.has_missing_values(i) {
                    return Err(CapabilityError::MissingValues {
                        attribute: attribute.name.clone(),
                    });
                }
            }
        }

        if let Some(ci) = class_index
            && !self.handles(Capability::MissingClassValues)
            && data.has_missing_values(ci)
        {
            return Err(CapabilityError::MissingClassValues);
        }

        if data.num_instances() < self.min_instances {
            return Err(CapabilityError::NotEnoughInstances {
                required: self.min_instances,
                provided: data.num_instances(),
            });
        }

        Ok(())
    }
}
