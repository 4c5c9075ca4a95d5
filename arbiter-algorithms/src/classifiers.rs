//! Built-in classifiers: base learners, single-classifier wrappers and
//! multi-classifier ensembles.

use crate::declared::{
    CapabilityFn, DeclaredAlgorithm, nominal_numeric_attributes, standard_attributes,
    with_any_class, with_nominal_class, with_numeric_class,
};
use arbiter_core::algorithm::{ensure_consumed, take_option};
use arbiter_core::{
    Algorithm, AlgorithmError, AlgorithmKind, AlgorithmRegistry, ArbiterError, Capabilities,
    Capability, FALLBACK_CLASSIFIER,
};

/// Base classifiers and the capabilities they declare.
pub const BASE_CLASSIFIERS: &[(&str, CapabilityFn)] = &[
    ("weka.classifiers.bayes.BayesNet", || with_nominal_class(nominal_numeric_attributes())),
    ("weka.classifiers.bayes.NaiveBayes", || with_nominal_class(nominal_numeric_attributes())),
    ("weka.classifiers.functions.GaussianProcesses", || {
        with_numeric_class(nominal_numeric_attributes())
    }),
    ("weka.classifiers.functions.LinearRegression", || with_numeric_class(standard_attributes())),
    ("weka.classifiers.functions.Logistic", || with_nominal_class(standard_attributes())),
    ("weka.classifiers.functions.MultilayerPerceptron", || with_any_class(standard_attributes())),
    ("weka.classifiers.functions.SGD", || {
        let mut caps = with_nominal_class(nominal_numeric_attributes());
        caps.disable(Capability::NominalClass).enable(Capability::BinaryClass);
        with_numeric_class(caps)
    }),
    ("weka.classifiers.functions.SMO", || with_nominal_class(nominal_numeric_attributes())),
    ("weka.classifiers.functions.SMOreg", || with_numeric_class(nominal_numeric_attributes())),
    ("weka.classifiers.functions.SimpleLinearRegression", || {
        with_numeric_class(Capabilities::with([
            Capability::NumericAttributes,
            Capability::DateAttributes,
            Capability::MissingValues,
        ]))
    }),
    ("weka.classifiers.functions.SimpleLogistic", || with_nominal_class(standard_attributes())),
    ("weka.classifiers.functions.VotedPerceptron", || {
        let mut caps = nominal_numeric_attributes();
        caps.enable(Capability::BinaryClass)
            .enable(Capability::MissingClassValues);
        caps
    }),
    ("weka.classifiers.lazy.IBk", || {
        let mut caps = with_any_class(standard_attributes());
        caps.set_min_instances(0);
        caps
    }),
    ("weka.classifiers.lazy.KStar", || {
        let mut caps = with_any_class(standard_attributes());
        caps.set_min_instances(0);
        caps
    }),
    ("weka.classifiers.rules.DecisionTable", || with_any_class(standard_attributes())),
    ("weka.classifiers.rules.JRip", || {
        let mut caps = with_nominal_class(standard_attributes());
        caps.set_min_instances(3);
        caps
    }),
    ("weka.classifiers.rules.M5Rules", || with_numeric_class(standard_attributes())),
    ("weka.classifiers.rules.OneR", || with_nominal_class(standard_attributes())),
    ("weka.classifiers.rules.PART", || {
        let mut caps = with_nominal_class(standard_attributes());
        caps.set_min_instances(0);
        caps
    }),
    ("weka.classifiers.rules.ZeroR", || {
        let mut caps = with_any_class(Capabilities::none());
        caps.enable_all_attributes()
            .enable(Capability::MissingValues)
            .set_min_instances(0);
        caps
    }),
    ("weka.classifiers.trees.DecisionStump", || with_any_class(standard_attributes())),
    ("weka.classifiers.trees.J48", || {
        let mut caps = with_nominal_class(standard_attributes());
        caps.set_min_instances(0);
        caps
    }),
    ("weka.classifiers.trees.LMT", || with_nominal_class(standard_attributes())),
    ("weka.classifiers.trees.M5P", || with_numeric_class(standard_attributes())),
    ("weka.classifiers.trees.REPTree", || with_any_class(standard_attributes())),
    ("weka.classifiers.trees.RandomForest", || with_any_class(standard_attributes())),
    ("weka.classifiers.trees.RandomTree", || with_any_class(standard_attributes())),
];

/// How a single-classifier wrapper derives its capabilities from the
/// classifier it wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassAdjustment {
    /// The wrapped classifier's capabilities, unchanged.
    Inherit,
    /// Only the nominal class types the wrapped classifier supports.
    NominalClassOnly,
    /// Nominal classes, provided the wrapped classifier handles numeric ones.
    NominalFromRegression,
    /// Numeric classes, provided the wrapped classifier handles numeric ones.
    NumericOnly,
}

impl ClassAdjustment {
    pub fn apply(&self, inner: &Capabilities) -> Capabilities {
        let mut caps = inner.clone();
        match self {
            Self::Inherit => {}
            Self::NominalClassOnly => {
                caps.disable_all_classes();
                for c in [
                    Capability::NominalClass,
                    Capability::BinaryClass,
                    Capability::UnaryClass,
                    Capability::EmptyNominalClass,
                    Capability::MissingClassValues,
                ] {
                    if inner.handles(c) {
                        caps.enable(c);
                    }
                }
            }
            Self::NominalFromRegression => {
                caps.disable_all_classes();
                if inner.handles(Capability::NumericClass) {
                    caps.enable(Capability::NominalClass);
                    if inner.handles(Capability::MissingClassValues) {
                        caps.enable(Capability::MissingClassValues);
                    }
                }
            }
            Self::NumericOnly => {
                caps.disable_all_classes();
                if inner.handles(Capability::NumericClass) {
                    caps.enable(Capability::NumericClass)
                        .enable(Capability::DateClass);
                    if inner.handles(Capability::MissingClassValues) {
                        caps.enable(Capability::MissingClassValues);
                    }
                }
            }
        }
        caps
    }
}

/// Single-classifier wrappers: identifier, default wrapped classifier, and
/// how capabilities are derived.
pub const META_CLASSIFIERS: &[(&str, &str, ClassAdjustment)] = &[
    (
        "weka.classifiers.lazy.LWL",
        "weka.classifiers.trees.DecisionStump",
        ClassAdjustment::Inherit,
    ),
    (
        "weka.classifiers.meta.AdaBoostM1",
        "weka.classifiers.trees.DecisionStump",
        ClassAdjustment::NominalClassOnly,
    ),
    (
        "weka.classifiers.meta.AdditiveRegression",
        "weka.classifiers.trees.DecisionStump",
        ClassAdjustment::NumericOnly,
    ),
    (
        "weka.classifiers.meta.AttributeSelectedClassifier",
        "weka.classifiers.trees.J48",
        ClassAdjustment::Inherit,
    ),
    (
        "weka.classifiers.meta.Bagging",
        "weka.classifiers.trees.REPTree",
        ClassAdjustment::Inherit,
    ),
    (
        "weka.classifiers.meta.ClassificationViaRegression",
        "weka.classifiers.trees.M5P",
        ClassAdjustment::NominalFromRegression,
    ),
    (
        "weka.classifiers.meta.LogitBoost",
        "weka.classifiers.trees.DecisionStump",
        ClassAdjustment::NominalFromRegression,
    ),
    (
        "weka.classifiers.meta.MultiClassClassifier",
        "weka.classifiers.functions.Logistic",
        ClassAdjustment::NominalClassOnly,
    ),
    (
        "weka.classifiers.meta.RandomCommittee",
        "weka.classifiers.trees.RandomTree",
        ClassAdjustment::Inherit,
    ),
    (
        "weka.classifiers.meta.RandomSubSpace",
        "weka.classifiers.trees.REPTree",
        ClassAdjustment::Inherit,
    ),
];

/// A meta classifier wrapping one classifier named by `-W`.
pub struct SingleClassifierEnhancer {
    identifier: String,
    default_inner: &'static str,
    adjustment: ClassAdjustment,
    inner: Option<Box<dyn Algorithm>>,
}

impl SingleClassifierEnhancer {
    pub fn new(
        identifier: impl Into<String>,
        default_inner: &'static str,
        adjustment: ClassAdjustment,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            default_inner,
            adjustment,
            inner: declared_classifier(default_inner),
        }
    }
}

impl Algorithm for SingleClassifierEnhancer {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn set_options(
        &mut self,
        options: &[String],
        registry: &AlgorithmRegistry,
    ) -> Result<(), AlgorithmError> {
        let mut options = options.to_vec();
        // trailing options after "--" belong to the wrapped classifier
        let inner_options = split_off_nested(&mut options);
        let name = take_option("-W", &mut options)?.unwrap_or_else(|| self.default_inner.to_string());
        ensure_consumed(&options)?;

        let mut inner = create_dependency(registry, "-W", &name, AlgorithmKind::Classifier)?;
        if !inner_options.is_empty() {
            inner.set_options(&inner_options, registry)?;
        }
        self.inner = Some(inner);
        Ok(())
    }

    fn capabilities(&self) -> Result<Capabilities, AlgorithmError> {
        let inner = self
            .inner
            .as_ref()
            .ok_or_else(|| AlgorithmError::other(format!("{}: no base classifier set", self.identifier)))?;
        Ok(self.adjustment.apply(&inner.capabilities()?))
    }
}

/// Multi-classifier ensembles and their default members.
pub const ENSEMBLE_CLASSIFIERS: &[(&str, &str)] = &[
    ("weka.classifiers.meta.Stacking", "weka.classifiers.rules.ZeroR"),
    ("weka.classifiers.meta.Vote", "weka.classifiers.rules.ZeroR"),
];

/// An ensemble over every classifier named by a `-W` (or `-B`) option.
///
/// Declares only what all members can handle.
pub struct MultipleClassifiersCombiner {
    identifier: String,
    default_member: &'static str,
    members: Vec<Box<dyn Algorithm>>,
}

impl MultipleClassifiersCombiner {
    pub fn new(identifier: impl Into<String>, default_member: &'static str) -> Self {
        Self {
            identifier: identifier.into(),
            default_member,
            members: declared_classifier(default_member).into_iter().collect(),
        }
    }
}

impl Algorithm for MultipleClassifiersCombiner {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn set_options(
        &mut self,
        options: &[String],
        registry: &AlgorithmRegistry,
    ) -> Result<(), AlgorithmError> {
        let mut options = options.to_vec();
        let mut names = Vec::new();
        for flag in ["-W", "-B"] {
            while let Some(name) = take_option(flag, &mut options)? {
                names.push((flag, name));
            }
        }
        ensure_consumed(&options)?;
        if names.is_empty() {
            names.push(("-W", self.default_member.to_string()));
        }

        self.members = names
            .iter()
            .map(|(flag, name)| create_dependency(registry, flag, name, AlgorithmKind::Classifier))
            .collect::<Result<_, _>>()?;
        Ok(())
    }

    fn capabilities(&self) -> Result<Capabilities, AlgorithmError> {
        let mut members = self.members.iter();
        let first = members
            .next()
            .ok_or_else(|| AlgorithmError::other(format!("{}: no members set", self.identifier)))?;
        members.try_fold(first.capabilities()?, |acc, m| Ok(acc.intersect(&m.capabilities()?)))
    }
}

/// A fresh fixed-capability classifier from the built-in tables, used as
/// the dependency a wrapper holds before any options are set.
pub(crate) fn declared_classifier(identifier: &str) -> Option<Box<dyn Algorithm>> {
    let capabilities = if identifier == FALLBACK_CLASSIFIER {
        Capabilities::all()
    } else {
        let &(_, capabilities) = BASE_CLASSIFIERS.iter().find(|(id, _)| *id == identifier)?;
        capabilities()
    };
    Some(Box::new(DeclaredAlgorithm::new(identifier, capabilities)))
}

/// Construct the algorithm a dependency option names, reporting any
/// failure as a rejection of that option.
pub(crate) fn create_dependency(
    registry: &AlgorithmRegistry,
    flag: &str,
    name: &str,
    kind: AlgorithmKind,
) -> Result<Box<dyn Algorithm>, AlgorithmError> {
    registry
        .create(name, kind)
        .map_err(|e| AlgorithmError::invalid_option(flag, format!("cannot use '{}': {:?}", name, e)))
}

/// Remove and return everything after a `--` separator.
pub(crate) fn split_off_nested(options: &mut Vec<String>) -> Vec<String> {
    match options.iter().position(|o| o == "--") {
        Some(pos) => {
            let nested = options.split_off(pos + 1);
            options.pop();
            nested
        }
        None => Vec::new(),
    }
}

/// Register the fallback, base, meta and ensemble classifiers.
pub fn register_classifiers(registry: &mut AlgorithmRegistry) -> Result<(), ArbiterError> {
    registry.register(FALLBACK_CLASSIFIER, AlgorithmKind::Classifier, || {
        Ok(Box::new(DeclaredAlgorithm::new(FALLBACK_CLASSIFIER, Capabilities::all())) as Box<dyn Algorithm>)
    })?;

    for &(identifier, capabilities) in BASE_CLASSIFIERS {
        registry.register(identifier, AlgorithmKind::Classifier, move || {
            Ok(Box::new(DeclaredAlgorithm::new(identifier, capabilities())) as Box<dyn Algorithm>)
        })?;
    }

    for &(identifier, default_inner, adjustment) in META_CLASSIFIERS {
        registry.register(identifier, AlgorithmKind::Classifier, move || {
            Ok(Box::new(SingleClassifierEnhancer::new(identifier, default_inner, adjustment))
                as Box<dyn Algorithm>)
        })?;
    }

    for &(identifier, default_member) in ENSEMBLE_CLASSIFIERS {
        registry.register(identifier, AlgorithmKind::Classifier, move || {
            Ok(Box::new(MultipleClassifiersCombiner::new(identifier, default_member))
                as Box<dyn Algorithm>)
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> AlgorithmRegistry {
        let mut registry = AlgorithmRegistry::new();
        register_classifiers(&mut registry).unwrap();
        registry
    }

    fn configured(registry: &AlgorithmRegistry, id: &str, options: &[&str]) -> Result<Capabilities, AlgorithmError> {
        let mut algo = registry.create(id, AlgorithmKind::Classifier).unwrap();
        let options: Vec<String> = options.iter().map(|s| s.to_string()).collect();
        algo.set_options(&options, registry)?;
        algo.capabilities()
    }

    #[test]
    fn test_table_identifiers_are_unique() {
        let registry = registry();
        let expected = 1 + BASE_CLASSIFIERS.len() + META_CLASSIFIERS.len() + ENSEMBLE_CLASSIFIERS.len();
        assert_eq!(registry.len(), expected);
    }

    #[test]
    fn test_adaboost_keeps_only_nominal_classes() {
        let registry = registry();
        let caps = configured(
            &registry,
            "weka.classifiers.meta.AdaBoostM1",
            &["-W", "weka.classifiers.trees.REPTree"],
        )
        .unwrap();
        assert!(caps.handles(Capability::NominalClass));
        assert!(!caps.handles(Capability::NumericClass));
        assert!(caps.handles(Capability::DateAttributes));
    }

    #[test]
    fn test_logitboost_needs_regression_base() {
        let registry = registry();
        let caps = configured(
            &registry,
            "weka.classifiers.meta.LogitBoost",
            &["-W", "weka.classifiers.trees.J48"],
        )
        .unwrap();
        assert!(!caps.handles(Capability::NominalClass));

        let caps = configured(
            &registry,
            "weka.classifiers.meta.LogitBoost",
            &["-W", "weka.classifiers.trees.REPTree"],
        )
        .unwrap();
        assert!(caps.handles(Capability::NominalClass));
        assert!(!caps.handles(Capability::NumericClass));
    }

    #[test]
    fn test_meta_uses_default_without_w() {
        let registry = registry();
        let caps = configured(&registry, "weka.classifiers.meta.Bagging", &[]).unwrap();
        assert!(caps.handles(Capability::NumericClass));
    }

    #[test]
    fn test_unconfigured_meta_wraps_default() {
        let registry = registry();
        let algo = registry
            .create("weka.classifiers.meta.Bagging", AlgorithmKind::Classifier)
            .unwrap();
        let caps = algo.capabilities().unwrap();
        // REPTree handles both class kinds
        assert!(caps.handles(Capability::NominalClass));
        assert!(caps.handles(Capability::NumericClass));

        let algo = registry
            .create("weka.classifiers.meta.AdaBoostM1", AlgorithmKind::Classifier)
            .unwrap();
        let caps = algo.capabilities().unwrap();
        assert!(caps.handles(Capability::NominalClass));
        assert!(!caps.handles(Capability::NumericClass));
    }

    #[test]
    fn test_unconfigured_ensemble_uses_default_member() {
        let registry = registry();
        for &(identifier, default_member) in ENSEMBLE_CLASSIFIERS {
            let algo = registry.create(identifier, AlgorithmKind::Classifier).unwrap();
            let expected = configured(&registry, default_member, &[]).unwrap();
            assert_eq!(algo.capabilities().unwrap(), expected);
        }
    }

    #[test]
    fn test_every_default_dependency_is_declared() {
        for &(identifier, default_inner, _) in META_CLASSIFIERS {
            assert!(declared_classifier(default_inner).is_some(), "{}", identifier);
        }
        for &(identifier, default_member) in ENSEMBLE_CLASSIFIERS {
            assert!(declared_classifier(default_member).is_some(), "{}", identifier);
        }
    }

    #[test]
    fn test_w_after_separator_belongs_to_inner() {
        let registry = registry();
        let err = configured(
            &registry,
            "weka.classifiers.meta.Bagging",
            &["--", "-W", "weka.classifiers.functions.LinearRegression"],
        )
        .unwrap_err();
        // the default REPTree takes no options, so the nested -W is rejected
        assert!(matches!(err, AlgorithmError::InvalidOption { .. }));
    }

    #[test]
    fn test_meta_passes_nested_options() {
        let registry = registry();
        let err = configured(
            &registry,
            "weka.classifiers.meta.Bagging",
            &["-W", "weka.classifiers.trees.J48", "--", "-C", "0.25"],
        )
        .unwrap_err();
        // J48 is declared without options here, so the nested ones are rejected
        assert!(matches!(err, AlgorithmError::InvalidOption { .. }));
    }

    #[test]
    fn test_unknown_dependency_is_option_error() {
        let registry = registry();
        let err = configured(&registry, "weka.classifiers.meta.Bagging", &["-W", "nope.Classifier"])
            .unwrap_err();
        assert!(matches!(err, AlgorithmError::InvalidOption { ref option, .. } if option == "-W"));
    }

    #[test]
    fn test_fallback_dependency_is_constructible() {
        let registry = registry();
        let caps = configured(&registry, "weka.classifiers.meta.Vote", &["-W", FALLBACK_CLASSIFIER]).unwrap();
        assert_eq!(caps, Capabilities::all());
    }

    #[test]
    fn test_ensemble_intersects_members() {
        let registry = registry();
        let caps = configured(
            &registry,
            "weka.classifiers.meta.Vote",
            &[
                "-B",
                "weka.classifiers.trees.J48",
                "-B",
                "weka.classifiers.functions.LinearRegression",
            ],
        )
        .unwrap();
        assert!(!caps.handles(Capability::NominalClass));
        assert!(!caps.handles(Capability::NumericClass));
        assert!(caps.handles(Capability::NumericAttributes));
    }

    #[test]
    fn test_unused_options_rejected() {
        let registry = registry();
        assert!(configured(&registry, "weka.classifiers.meta.Stacking", &["-X", "3"]).is_err());
    }
}
