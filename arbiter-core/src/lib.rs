//! # Arbiter Core
//!
//! Decides which machine-learning algorithms from an on-disk catalog can be
//! applied to a given dataset. Each candidate is constructed from a registry,
//! configured, and asked for its declared capabilities, which are then tested
//! against the dataset. Classifiers and filters resolve in tiers so that
//! wrapper algorithms are probed with a concrete lower-tier dependency.

pub mod algorithm;
pub mod args;
pub mod capabilities;
pub mod catalog;
pub mod config;
pub mod dataset;
pub mod error;
pub mod paths;
pub mod probe;
pub mod properties;
pub mod report;
pub mod resolver;
pub mod types;

// Re-export commonly used types at the crate root.
pub use algorithm::{Algorithm, AlgorithmFactory, AlgorithmRegistry, LookupError};
pub use capabilities::{Capabilities, Capability};
pub use catalog::{AllowList, Catalog, DistributionLookup, locate_distribution};
pub use config::{ArbiterConfig, OutputFormat, apply_properties, load_config};
pub use dataset::{Attribute, AttributeType, Dataset, Instances, Value};
pub use error::{
    AlgorithmError, ArbiterError, CapabilityError, DatasetError, PropertyError, Result,
};
pub use probe::{ApplicabilityOutcome, CapabilityProbe};
pub use report::{ApplicabilityReport, ApplicableClassifiers, ApplicableFilters};
pub use resolver::{DependencyRole, FALLBACK_CLASSIFIER, FALLBACK_FILTER, TierResolver};
pub use types::{AlgorithmCategory, AlgorithmDescriptor, AlgorithmKind, OptionVector};
