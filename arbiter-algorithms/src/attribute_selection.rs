//! Built-in attribute evaluators and search strategies.

use crate::declared::{CapabilityFn, DeclaredAlgorithm, standard_attributes, with_any_class, with_nominal_class};
use arbiter_core::{Algorithm, AlgorithmKind, AlgorithmRegistry, ArbiterError, Capabilities, Capability};

fn nominal_class_evaluator() -> Capabilities {
    with_nominal_class(standard_attributes())
}

fn any_class_evaluator() -> Capabilities {
    with_any_class(standard_attributes())
}

pub const ATTRIBUTE_EVALUATORS: &[(&str, CapabilityFn)] = &[
    ("weka.attributeSelection.CfsSubsetEval", any_class_evaluator),
    ("weka.attributeSelection.CorrelationAttributeEval", any_class_evaluator),
    ("weka.attributeSelection.GainRatioAttributeEval", nominal_class_evaluator),
    ("weka.attributeSelection.InfoGainAttributeEval", nominal_class_evaluator),
    ("weka.attributeSelection.OneRAttributeEval", nominal_class_evaluator),
    ("weka.attributeSelection.PrincipalComponents", || {
        let mut caps = any_class_evaluator();
        caps.enable(Capability::NoClass);
        caps
    }),
    ("weka.attributeSelection.ReliefFAttributeEval", any_class_evaluator),
    ("weka.attributeSelection.SymmetricalUncertAttributeEval", nominal_class_evaluator),
];

/// Search strategies are only ever constructed, never tested, so they
/// declare nothing.
pub const ATTRIBUTE_SEARCHES: &[&str] = &[
    "weka.attributeSelection.BestFirst",
    "weka.attributeSelection.GreedyStepwise",
    "weka.attributeSelection.Ranker",
];

pub fn register_attribute_selection(registry: &mut AlgorithmRegistry) -> Result<(), ArbiterError> {
    for &(identifier, capabilities) in ATTRIBUTE_EVALUATORS {
        registry.register(identifier, AlgorithmKind::AttributeEvaluator, move || {
            Ok(Box::new(DeclaredAlgorithm::new(identifier, capabilities())) as Box<dyn Algorithm>)
        })?;
    }

    for &identifier in ATTRIBUTE_SEARCHES {
        registry.register(identifier, AlgorithmKind::AttributeSearch, move || {
            Ok(Box::new(DeclaredAlgorithm::new(identifier, Capabilities::none())) as Box<dyn Algorithm>)
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_kinds() {
        let mut registry = AlgorithmRegistry::new();
        register_attribute_selection(&mut registry).unwrap();
        assert_eq!(
            registry.identifiers(AlgorithmKind::AttributeSearch).len(),
            ATTRIBUTE_SEARCHES.len()
        );
        assert_eq!(
            registry.kind_of("weka.attributeSelection.InfoGainAttributeEval"),
            Some(AlgorithmKind::AttributeEvaluator)
        );
    }

    #[test]
    fn test_info_gain_rejects_numeric_class() {
        let caps = nominal_class_evaluator();
        assert!(!caps.handles(Capability::NumericClass));
        assert!(any_class_evaluator().handles(Capability::NumericClass));
    }
}
