//! Applicability Report: admissible algorithms grouped by tier.

use crate::types::AlgorithmDescriptor;
use serde::{Deserialize, Serialize};

/// Admissible classifiers by tier, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicableClassifiers {
    pub base: Vec<AlgorithmDescriptor>,
    pub meta: Vec<AlgorithmDescriptor>,
    pub ensemble: Vec<AlgorithmDescriptor>,
    /// Identifier injected with `-W` into the meta and ensemble probes.
    pub dependency: String,
}

/// Admissible filters by tier, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicableFilters {
    pub base: Vec<AlgorithmDescriptor>,
    pub meta: Vec<AlgorithmDescriptor>,
    /// Identifier injected with `-F` into the meta probes.
    pub dependency: String,
}

/// Everything the search-space builder needs for one dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicabilityReport {
    pub classifiers: ApplicableClassifiers,
    pub filters: ApplicableFilters,
    pub attribute_evaluators: Vec<AlgorithmDescriptor>,
    pub attribute_searchers: Vec<AlgorithmDescriptor>,
}

impl ApplicabilityReport {
    /// Total number of admissible entries across all lists.
    pub fn total(&self) -> usize {
        self.classifiers.base.len()
            + self.classifiers.meta.len()
            + self.classifiers.ensemble.len()
            + self.filters.base.len()
            + self.filters.meta.len()
            + self.attribute_evaluators.len()
            + self.attribute_searchers.len()
    }

    /// Plain-text rendering, one section per list.
    pub fn to_text(&self) -> String {
        let sections: [(&str, &[AlgorithmDescriptor]); 7] = [
            ("Base classifiers", self.classifiers.base.as_slice()),
            ("Meta classifiers", self.classifiers.meta.as_slice()),
            ("Ensemble classifiers", self.classifiers.ensemble.as_slice()),
            ("Base filters", self.filters.base.as_slice()),
            ("Meta filters", self.filters.meta.as_slice()),
            ("Attribute evaluators", self.attribute_evaluators.as_slice()),
            ("Attribute searches", self.attribute_searchers.as_slice()),
        ];

        let mut out = String::new();
        for (title, entries) in sections {
            out.push_str(&format!("{} ({})\n", title, entries.len()));
            for entry in entries {
                out.push_str(&format!("  {}\n", entry.identifier));
            }
        }
        out.push_str(&format!(
            "Classifier dependency: {}\nFilter dependency: {}\n",
            self.classifiers.dependency, self.filters.dependency
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AlgorithmCategory;

    #[test]
    fn test_total_and_text() {
        let report = ApplicabilityReport {
            classifiers: ApplicableClassifiers {
                base: vec![AlgorithmDescriptor::new("J48", AlgorithmCategory::BaseClassifier)],
                meta: vec![],
                ensemble: vec![],
                dependency: "J48".into(),
            },
            filters: ApplicableFilters {
                dependency: "AllFilter".into(),
                ..Default::default()
            },
            attribute_evaluators: vec![],
            attribute_searchers: vec![AlgorithmDescriptor::new(
                "BestFirst",
                AlgorithmCategory::AttributeSearch,
            )],
        };
        assert_eq!(report.total(), 2);
        let text = report.to_text();
        assert!(text.contains("Base classifiers (1)\n  J48\n"));
        assert!(text.contains("Meta classifiers (0)\n"));
        assert!(text.contains("Filter dependency: AllFilter"));
    }

    #[test]
    fn test_report_json_shape() {
        let report = ApplicabilityReport::default();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["classifiers"]["ensemble"].as_array().unwrap().is_empty());
        assert!(json["attribute_searchers"].is_array());
    }
}
