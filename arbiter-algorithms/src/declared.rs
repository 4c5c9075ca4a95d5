//! Algorithms whose capabilities are a fixed declaration.

use arbiter_core::{Algorithm, AlgorithmError, Capabilities, Capability};

/// An algorithm that takes no options and always declares the same
/// capabilities.
#[derive(Debug, Clone)]
pub struct DeclaredAlgorithm {
    identifier: String,
    capabilities: Capabilities,
}

impl DeclaredAlgorithm {
    pub fn new(identifier: impl Into<String>, capabilities: Capabilities) -> Self {
        Self {
            identifier: identifier.into(),
            capabilities,
        }
    }
}

impl Algorithm for DeclaredAlgorithm {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn capabilities(&self) -> Result<Capabilities, AlgorithmError> {
        Ok(self.capabilities.clone())
    }
}

/// A builder for one entry of a built-in capability table.
pub type CapabilityFn = fn() -> Capabilities;

/// Nominal, numeric and date attributes plus missing values: the usual
/// attribute side for tree and rule learners.
pub(crate) fn standard_attributes() -> Capabilities {
    Capabilities::with([
        Capability::NominalAttributes,
        Capability::NumericAttributes,
        Capability::DateAttributes,
        Capability::MissingValues,
    ])
}

pub(crate) fn nominal_numeric_attributes() -> Capabilities {
    Capabilities::with([
        Capability::NominalAttributes,
        Capability::NumericAttributes,
        Capability::MissingValues,
    ])
}

pub(crate) fn with_nominal_class(mut caps: Capabilities) -> Capabilities {
    caps.enable(Capability::NominalClass)
        .enable(Capability::MissingClassValues);
    caps
}

pub(crate) fn with_numeric_class(mut caps: Capabilities) -> Capabilities {
    caps.enable(Capability::NumericClass)
        .enable(Capability::DateClass)
        .enable(Capability::MissingClassValues);
    caps
}

pub(crate) fn with_any_class(caps: Capabilities) -> Capabilities {
    with_numeric_class(with_nominal_class(caps))
}

/// Everything on the attribute side, any class or none. Typical for
/// unsupervised filters.
pub(crate) fn unsupervised_all() -> Capabilities {
    let mut caps = Capabilities::none();
    caps.enable_all_attributes()
        .enable(Capability::MissingValues)
        .enable_all_classes()
        .enable(Capability::MissingClassValues)
        .enable(Capability::NoClass)
        .set_min_instances(0);
    caps
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbiter_core::AlgorithmRegistry;

    #[test]
    fn test_declared_rejects_options() {
        let mut algo = DeclaredAlgorithm::new("x", Capabilities::none());
        let registry = AlgorithmRegistry::new();
        assert!(algo.set_options(&["-K".into()], &registry).is_err());
        assert!(algo.set_options(&[], &registry).is_ok());
    }

    #[test]
    fn test_any_class_covers_both() {
        let caps = with_any_class(standard_attributes());
        assert!(caps.handles(Capability::NominalClass));
        assert!(caps.handles(Capability::NumericClass));
        assert!(!caps.handles(Capability::NoClass));
    }

    #[test]
    fn test_unsupervised_allows_no_class() {
        let caps = unsupervised_all();
        assert!(caps.handles(Capability::NoClass));
        assert!(caps.handles(Capability::StringAttributes));
        assert_eq!(caps.min_instances(), 0);
    }
}
