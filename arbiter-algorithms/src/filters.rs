//! Built-in filters.

use crate::classifiers::{create_dependency, split_off_nested};
use crate::declared::{CapabilityFn, DeclaredAlgorithm, unsupervised_all};
use arbiter_core::algorithm::{ensure_consumed, take_option};
use arbiter_core::{
    Algorithm, AlgorithmError, AlgorithmKind, AlgorithmRegistry, ArbiterError, Capabilities,
    Capability, FALLBACK_FILTER,
};

fn supervised_nominal_class() -> Capabilities {
    let mut caps = unsupervised_all();
    caps.disable_all_classes()
        .enable(Capability::NominalClass)
        .set_min_instances(0);
    caps
}

fn numeric_nominal_unsupervised() -> Capabilities {
    let mut caps = unsupervised_all();
    caps.disable(Capability::StringAttributes)
        .disable(Capability::RelationalAttributes);
    caps
}

/// Base filters and the capabilities they declare.
pub const BASE_FILTERS: &[(&str, CapabilityFn)] = &[
    ("weka.filters.supervised.attribute.AttributeSelection", || {
        let mut caps = numeric_nominal_unsupervised();
        caps.disable_all_classes()
            .enable(Capability::NominalClass)
            .enable(Capability::NumericClass)
            .enable(Capability::DateClass)
            .enable(Capability::MissingClassValues);
        caps
    }),
    ("weka.filters.supervised.attribute.Discretize", || {
        let mut caps = supervised_nominal_class();
        caps.enable(Capability::MissingClassValues);
        caps
    }),
    ("weka.filters.supervised.attribute.NominalToBinary", || {
        let mut caps = numeric_nominal_unsupervised();
        caps.disable_all_classes()
            .enable(Capability::NominalClass)
            .enable(Capability::NumericClass)
            .enable(Capability::DateClass)
            .enable(Capability::MissingClassValues);
        caps
    }),
    ("weka.filters.supervised.instance.Resample", supervised_nominal_class),
    ("weka.filters.unsupervised.attribute.Discretize", unsupervised_all),
    ("weka.filters.unsupervised.attribute.NominalToBinary", unsupervised_all),
    ("weka.filters.unsupervised.attribute.Normalize", unsupervised_all),
    ("weka.filters.unsupervised.attribute.PrincipalComponents", || {
        let mut caps = numeric_nominal_unsupervised();
        caps.set_min_instances(1);
        caps
    }),
    ("weka.filters.unsupervised.attribute.RemoveUseless", unsupervised_all),
    ("weka.filters.unsupervised.attribute.ReplaceMissingValues", unsupervised_all),
    ("weka.filters.unsupervised.attribute.Standardize", unsupervised_all),
    ("weka.filters.unsupervised.attribute.StringToWordVector", unsupervised_all),
    ("weka.filters.unsupervised.instance.Randomize", unsupervised_all),
];

/// Meta filters and their default wrapped filter.
pub const META_FILTERS: &[(&str, &str)] = &[
    ("weka.filters.MultiFilter", FALLBACK_FILTER),
    (
        "weka.filters.unsupervised.attribute.PartitionedMultiFilter",
        FALLBACK_FILTER,
    ),
];

/// A filter chaining every filter named by `-F`.
pub struct FilterChain {
    identifier: String,
    default_filter: &'static str,
    filters: Vec<Box<dyn Algorithm>>,
}

impl FilterChain {
    pub fn new(identifier: impl Into<String>, default_filter: &'static str) -> Self {
        Self {
            identifier: identifier.into(),
            default_filter,
            filters: declared_filter(default_filter).into_iter().collect(),
        }
    }
}

impl Algorithm for FilterChain {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn set_options(
        &mut self,
        options: &[String],
        registry: &AlgorithmRegistry,
    ) -> Result<(), AlgorithmError> {
        let mut options = options.to_vec();
        let nested = split_off_nested(&mut options);
        let mut names = Vec::new();
        while let Some(name) = take_option("-F", &mut options)? {
            names.push(name);
        }
        ensure_consumed(&options)?;
        if names.is_empty() {
            names.push(self.default_filter.to_string());
        }

        let mut filters = Vec::with_capacity(names.len());
        for name in &names {
            filters.push(create_dependency(registry, "-F", name, AlgorithmKind::Filter)?);
        }
        // options after "--" go to the last filter in the chain
        if !nested.is_empty()
            && let Some(last) = filters.last_mut()
        {
            last.set_options(&nested, registry)?;
        }
        self.filters = filters;
        Ok(())
    }

    fn capabilities(&self) -> Result<Capabilities, AlgorithmError> {
        let mut filters = self.filters.iter();
        let first = filters
            .next()
            .ok_or_else(|| AlgorithmError::other(format!("{}: no filters set", self.identifier)))?;
        filters.try_fold(first.capabilities()?, |acc, f| Ok(acc.intersect(&f.capabilities()?)))
    }
}

/// A fresh fixed-capability filter from the built-in tables.
pub(crate) fn declared_filter(identifier: &str) -> Option<Box<dyn Algorithm>> {
    let capabilities = if identifier == FALLBACK_FILTER {
        Capabilities::all()
    } else {
        let &(_, capabilities) = BASE_FILTERS.iter().find(|(id, _)| *id == identifier)?;
        capabilities()
    };
    Some(Box::new(DeclaredAlgorithm::new(identifier, capabilities)))
}

/// Register the fallback, base and meta filters.
pub fn register_filters(registry: &mut AlgorithmRegistry) -> Result<(), ArbiterError> {
    registry.register(FALLBACK_FILTER, AlgorithmKind::Filter, || {
        Ok(Box::new(DeclaredAlgorithm::new(FALLBACK_FILTER, Capabilities::all())) as Box<dyn Algorithm>)
    })?;

    for &(identifier, capabilities) in BASE_FILTERS {
        registry.register(identifier, AlgorithmKind::Filter, move || {
            Ok(Box::new(DeclaredAlgorithm::new(identifier, capabilities())) as Box<dyn Algorithm>)
        })?;
    }

    for &(identifier, default_filter) in META_FILTERS {
        registry.register(identifier, AlgorithmKind::Filter, move || {
            Ok(Box::new(FilterChain::new(identifier, default_filter)) as Box<dyn Algorithm>)
        })?;
    }
    Ok(())
}
