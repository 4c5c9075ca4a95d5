//! # Arbiter Algorithms
//!
//! Built-in algorithm implementations for Arbiter. Each one declares the
//! capabilities of the Weka algorithm it is registered as; wrappers and
//! ensembles derive theirs from the algorithms named by their `-W`/`-F`
//! options.

pub mod attribute_selection;
pub mod classifiers;
pub mod declared;
pub mod filters;

use arbiter_core::{AlgorithmRegistry, ArbiterError};

/// Register every built-in algorithm, including the dependency fallbacks.
pub fn register_builtin_algorithms(registry: &mut AlgorithmRegistry) -> Result<(), ArbiterError> {
    classifiers::register_classifiers(registry)?;
    filters::register_filters(registry)?;
    attribute_selection::register_attribute_selection(registry)?;
    tracing::debug!(count = registry.len(), "Registered built-in algorithms");
    Ok(())
}

/// A registry holding only the built-in algorithms.
pub fn builtin_registry() -> Result<AlgorithmRegistry, ArbiterError> {
    let mut registry = AlgorithmRegistry::new();
    register_builtin_algorithms(&mut registry)?;
    Ok(registry)
}
