//! Capability Probe: decides whether one algorithm can run on a dataset.
//!
//! The probe constructs the algorithm through the registry, applies the
//! option vector, asks for its capabilities and tests them against the
//! dataset. Every failure along the way, including a panic inside the
//! algorithm, is classified into an [`ApplicabilityOutcome`]; nothing
//! escapes to the caller.

use crate::algorithm::{AlgorithmRegistry, LookupError};
use crate::dataset::Dataset;
use crate::error::AlgorithmError;
use crate::types::{AlgorithmCategory, AlgorithmDescriptor};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, info, warn};

/// Result of probing one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum ApplicabilityOutcome {
    Admissible(AlgorithmDescriptor),
    NotFound,
    InstantiationFailed(String),
    OptionsRejected(String),
    CapabilityMismatch(String),
    UnexpectedError(String),
}

impl ApplicabilityOutcome {
    pub fn is_admissible(&self) -> bool {
        matches!(self, Self::Admissible(_))
    }

    pub fn into_descriptor(self) -> Option<AlgorithmDescriptor> {
        match self {
            Self::Admissible(d) => Some(d),
            _ => None,
        }
    }

    /// Short machine-friendly label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Admissible(_) => "admissible",
            Self::NotFound => "not_found",
            Self::InstantiationFailed(_) => "instantiation_failed",
            Self::OptionsRejected(_) => "options_rejected",
            Self::CapabilityMismatch(_) => "capability_mismatch",
            Self::UnexpectedError(_) => "unexpected_error",
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::InstantiationFailed(r)
            | Self::OptionsRejected(r)
            | Self::CapabilityMismatch(r)
            | Self::UnexpectedError(r) => Some(r),
            Self::Admissible(_) | Self::NotFound => None,
        }
    }
}

impl fmt::Display for ApplicabilityOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason() {
            Some(reason) => write!(f, "{}: {}", self.label(), reason),
            None => f.write_str(self.label()),
        }
    }
}

/// Probes candidates against a dataset using a registry.
#[derive(Debug, Clone, Copy)]
pub struct CapabilityProbe<'a> {
    registry: &'a AlgorithmRegistry,
    catch_panics: bool,
}

impl<'a> CapabilityProbe<'a> {
    pub fn new(registry: &'a AlgorithmRegistry) -> Self {
        Self {
            registry,
            catch_panics: true,
        }
    }

    /// Whether panics raised by an algorithm are turned into
    /// `UnexpectedError` (the default) or allowed to unwind.
    pub fn catch_panics(mut self, catch: bool) -> Self {
        self.catch_panics = catch;
        self
    }

    pub fn registry(&self) -> &'a AlgorithmRegistry {
        self.registry
    }

    /// Probe `identifier` as a member of `category` with the given options.
    pub fn probe(
        &self,
        identifier: &str,
        dataset: &dyn Dataset,
        options: &[String],
        category: AlgorithmCategory,
    ) -> ApplicabilityOutcome {
        let outcome = if self.catch_panics {
            panic::catch_unwind(AssertUnwindSafe(|| {
                self.probe_inner(identifier, dataset, options, category)
            }))
            .unwrap_or_else(|payload| {
                ApplicabilityOutcome::UnexpectedError(format!(
                    "panicked: {}",
                    panic_message(payload.as_ref())
                ))
            })
        } else {
            self.probe_inner(identifier, dataset, options, category)
        };
        log_outcome(identifier, category, &outcome);
        outcome
    }

    fn probe_inner(
        &self,
        identifier: &str,
        dataset: &dyn Dataset,
        options: &[String],
        category: AlgorithmCategory,
    ) -> ApplicabilityOutcome {
        let kind = category.kind();
        let mut algorithm = match self.registry.create(identifier, kind) {
            Ok(algorithm) => algorithm,
            Err(LookupError::NotFound) => return ApplicabilityOutcome::NotFound,
            Err(LookupError::WrongKind { expected, actual }) => {
                return ApplicabilityOutcome::UnexpectedError(format!(
                    "'{}' is a registered {}, not a {}",
                    identifier, actual, expected
                ));
            }
            // search strategies only get a construction check
            Err(LookupError::Construction(e)) if category == AlgorithmCategory::AttributeSearch => {
                return ApplicabilityOutcome::CapabilityMismatch(e.to_string());
            }
            Err(LookupError::Construction(e)) => return classify_construction(e),
        };

        // TODO: search strategies skip the capability query entirely; decide
        // whether they should be tested like evaluators once one declares
        // dataset restrictions.
        if category == AlgorithmCategory::AttributeSearch {
            return ApplicabilityOutcome::Admissible(AlgorithmDescriptor::new(identifier, category));
        }

        if !options.is_empty()
            && let Err(e) = algorithm.set_options(options, self.registry)
        {
            return ApplicabilityOutcome::OptionsRejected(e.to_string());
        }

        let capabilities = match algorithm.capabilities() {
            Ok(capabilities) => capabilities,
            Err(e) => return classify_query(e),
        };

        match dataset.check_capabilities(&capabilities) {
            Ok(()) => ApplicabilityOutcome::Admissible(AlgorithmDescriptor::new(identifier, category)),
            Err(e) => ApplicabilityOutcome::CapabilityMismatch(e.to_string()),
        }
    }
}

fn classify_construction(error: AlgorithmError) -> ApplicabilityOutcome {
    match error {
        AlgorithmError::Instantiation { .. } | AlgorithmError::IllegalAccess { .. } => {
            ApplicabilityOutcome::InstantiationFailed(error.to_string())
        }
        AlgorithmError::UnsupportedAttributeType { .. } => {
            ApplicabilityOutcome::CapabilityMismatch(error.to_string())
        }
        AlgorithmError::InvalidOption { .. } | AlgorithmError::Other { .. } => {
            ApplicabilityOutcome::UnexpectedError(error.to_string())
        }
    }
}

fn classify_query(error: AlgorithmError) -> ApplicabilityOutcome {
    match error {
        AlgorithmError::UnsupportedAttributeType { .. } => {
            ApplicabilityOutcome::CapabilityMismatch(error.to_string())
        }
        _ => ApplicabilityOutcome::UnexpectedError(error.to_string()),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn log_outcome(identifier: &str, category: AlgorithmCategory, outcome: &ApplicabilityOutcome) {
    match outcome {
        ApplicabilityOutcome::Admissible(_) => {
            debug!(algorithm = %identifier, %category, "Candidate admissible");
        }
        ApplicabilityOutcome::NotFound => {
            info!(algorithm = %identifier, %category, "No implementation registered for candidate");
        }
        ApplicabilityOutcome::CapabilityMismatch(reason) => {
            info!(algorithm = %identifier, %category, %reason, "Candidate not supported by dataset");
        }
        ApplicabilityOutcome::InstantiationFailed(reason) => {
            warn!(algorithm = %identifier, %category, %reason, "Failed to instantiate candidate");
        }
        ApplicabilityOutcome::OptionsRejected(reason) => {
            warn!(algorithm = %identifier, %category, %reason, "Candidate rejected its options");
        }
        ApplicabilityOutcome::UnexpectedError(reason) => {
            warn!(algorithm = %identifier, %category, %reason, "Unexpected error while probing candidate");
        }
    }
}
