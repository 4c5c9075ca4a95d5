//! Tier Resolver: composes catalog and probe across dependent tiers.
//!
//! Classifiers resolve base → meta → ensemble and filters resolve
//! base → meta. Higher tiers are probed with a dependency option naming the
//! first admissible lower-tier algorithm, or a fallback that is always
//! constructible when the lower tier came back empty.

use crate::catalog::{AllowList, Catalog};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::probe::{ApplicabilityOutcome, CapabilityProbe};
use crate::report::{ApplicabilityReport, ApplicableClassifiers, ApplicableFilters};
use crate::types::{AlgorithmCategory, AlgorithmDescriptor, OptionVector};
use std::path::PathBuf;
use tracing::info;

/// Do-nothing classifier used as the `-W` dependency when no base
/// classifier is admissible.
pub const FALLBACK_CLASSIFIER: &str = "weka.classifiers.AbstractClassifier";

/// Identity filter used as the `-F` dependency when no base filter is
/// admissible.
pub const FALLBACK_FILTER: &str = "weka.filters.AllFilter";

/// Which lower tier a dependency option refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyRole {
    Classifier,
    Filter,
}

impl DependencyRole {
    pub fn flag(&self) -> &'static str {
        match self {
            Self::Classifier => "-W",
            Self::Filter => "-F",
        }
    }

    pub fn fallback(&self) -> &'static str {
        match self {
            Self::Classifier => FALLBACK_CLASSIFIER,
            Self::Filter => FALLBACK_FILTER,
        }
    }

    /// The first admissible lower-tier identifier, or the fallback.
    pub fn select<'a>(&self, lower: &'a [AlgorithmDescriptor]) -> &'a str {
        lower
            .first()
            .map(|d| d.identifier.as_str())
            .unwrap_or(self.fallback())
    }

    pub fn option(&self, lower: &[AlgorithmDescriptor]) -> OptionVector {
        vec![self.flag().to_string(), self.select(lower).to_string()]
    }
}

/// Resolves admissible algorithms for a dataset. Holds no state between calls.
#[derive(Debug, Clone)]
pub struct TierResolver<'a> {
    catalog: Catalog,
    probe: CapabilityProbe<'a>,
}

impl<'a> TierResolver<'a> {
    pub fn new(probe: CapabilityProbe<'a>, params_dir: impl Into<PathBuf>) -> Self {
        Self {
            catalog: Catalog::new(params_dir),
            probe,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Probe every candidate of one category, keeping catalog order.
    pub fn resolve_tier(
        &self,
        dataset: &dyn Dataset,
        category: AlgorithmCategory,
        allow_list: Option<&AllowList>,
        options: &[String],
    ) -> Result<Vec<AlgorithmDescriptor>> {
        let candidates = self.catalog.list_candidates(category, allow_list)?;
        let total = candidates.len();

        let admissible: Vec<AlgorithmDescriptor> = candidates
            .into_iter()
            .filter_map(|candidate| {
                match self.probe.probe(&candidate.identifier, dataset, options, category) {
                    ApplicabilityOutcome::Admissible(descriptor) => Some(match candidate.params_path {
                        Some(path) => descriptor.with_params_path(path),
                        None => descriptor,
                    }),
                    _ => None,
                }
            })
            .collect();

        info!(
            %category,
            candidates = total,
            admissible = admissible.len(),
            options = %options.join(" "),
            "Resolved tier"
        );
        Ok(admissible)
    }

    pub fn resolve_classifiers(
        &self,
        dataset: &dyn Dataset,
        allow_list: Option<&AllowList>,
    ) -> Result<ApplicableClassifiers> {
        let role = DependencyRole::Classifier;
        let base = self.resolve_tier(dataset, AlgorithmCategory::BaseClassifier, allow_list, &[])?;

        let options = role.option(&base);
        let meta =
            self.resolve_tier(dataset, AlgorithmCategory::MetaClassifier, allow_list, &options)?;

        let options = role.option(&base);
        let ensemble =
            self.resolve_tier(dataset, AlgorithmCategory::EnsembleClassifier, allow_list, &options)?;

        Ok(ApplicableClassifiers {
            dependency: role.select(&base).to_string(),
            base,
            meta,
            ensemble,
        })
    }

    pub fn resolve_filters(
        &self,
        dataset: &dyn Dataset,
        allow_list: Option<&AllowList>,
    ) -> Result<ApplicableFilters> {
        let role = DependencyRole::Filter;
        let base = self.resolve_tier(dataset, AlgorithmCategory::BaseFilter, allow_list, &[])?;

        let options = role.option(&base);
        let meta = self.resolve_tier(dataset, AlgorithmCategory::MetaFilter, allow_list, &options)?;

        Ok(ApplicableFilters {
            dependency: role.select(&base).to_string(),
            base,
            meta,
        })
    }

    pub fn resolve_attribute_evaluators(
        &self,
        dataset: &dyn Dataset,
    ) -> Result<Vec<AlgorithmDescriptor>> {
        self.resolve_tier(dataset, AlgorithmCategory::AttributeEvaluator, None, &[])
    }

    pub fn resolve_attribute_searchers(
        &self,
        dataset: &dyn Dataset,
    ) -> Result<Vec<AlgorithmDescriptor>> {
        self.resolve_tier(dataset, AlgorithmCategory::AttributeSearch, None, &[])
    }

    /// Resolve every category into one report.
    pub fn resolve_all(
        &self,
        dataset: &dyn Dataset,
        allow_list: Option<&AllowList>,
    ) -> Result<ApplicabilityReport> {
        Ok(ApplicabilityReport {
            classifiers: self.resolve_classifiers(dataset, allow_list)?,
            filters: self.resolve_filters(dataset, allow_list)?,
            attribute_evaluators: self.resolve_attribute_evaluators(dataset)?,
            attribute_searchers: self.resolve_attribute_searchers(dataset)?,
        })
    }
}
