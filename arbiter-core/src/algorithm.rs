//! Algorithm Registry: construct-by-name for pluggable algorithms.
//!
//! Every implementation is registered under its identifier together with the
//! interface it implements and a factory. The probe only ever goes through
//! this table, so the set of constructible identifiers is known up front.

use crate::capabilities::Capabilities;
use crate::error::{AlgorithmError, ArbiterError};
use crate::types::AlgorithmKind;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// The uniform interface all probed algorithms implement.
pub trait Algorithm: Send {
    /// The identifier this instance was registered under.
    fn identifier(&self) -> &str;

    /// Apply option tokens. Implementations that take no options reject any.
    ///
    /// The registry is passed so that wrapping algorithms can construct the
    /// algorithm an option refers to.
    fn set_options(
        &mut self,
        options: &[String],
        registry: &AlgorithmRegistry,
    ) -> Result<(), AlgorithmError> {
        let _ = registry;
        ensure_consumed(options)
    }

    /// The capabilities this instance declares in its current configuration.
    fn capabilities(&self) -> Result<Capabilities, AlgorithmError>;
}

/// Builds a fresh, unconfigured instance.
pub type AlgorithmFactory =
    Arc<dyn Fn() -> Result<Box<dyn Algorithm>, AlgorithmError> + Send + Sync>;

#[derive(Clone)]
struct RegistryEntry {
    kind: AlgorithmKind,
    factory: AlgorithmFactory,
}

/// Why a lookup did not produce an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Nothing is registered under the identifier.
    NotFound,
    /// Registered, but under a different interface.
    WrongKind { expected: AlgorithmKind, actual: AlgorithmKind },
    /// The factory failed.
    Construction(AlgorithmError),
}

/// The registry maps identifiers to factories.
#[derive(Clone, Default)]
pub struct AlgorithmRegistry {
    entries: HashMap<String, RegistryEntry>,
}

impl AlgorithmRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory. Returns error if the identifier is already taken.
    pub fn register<F>(
        &mut self,
        identifier: impl Into<String>,
        kind: AlgorithmKind,
        factory: F,
    ) -> Result<(), ArbiterError>
    where
        F: Fn() -> Result<Box<dyn Algorithm>, AlgorithmError> + Send + Sync + 'static,
    {
        let identifier = identifier.into();
        if self.entries.contains_key(&identifier) {
            return Err(ArbiterError::AlreadyRegistered { identifier });
        }
        debug!(algorithm = %identifier, %kind, "Registering algorithm");
        self.entries.insert(
            identifier,
            RegistryEntry {
                kind,
                factory: Arc::new(factory),
            },
        );
        Ok(())
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    pub fn kind_of(&self, identifier: &str) -> Option<AlgorithmKind> {
        self.entries.get(identifier).map(|e| e.kind)
    }

    /// Construct an instance of `identifier`, which must implement `kind`.
    pub fn create(
        &self,
        identifier: &str,
        kind: AlgorithmKind,
    ) -> Result<Box<dyn Algorithm>, LookupError> {
        let entry = self.entries.get(identifier).ok_or(LookupError::NotFound)?;
        if entry.kind != kind {
            return Err(LookupError::WrongKind {
                expected: kind,
                actual: entry.kind,
            });
        }
        (entry.factory)().map_err(LookupError::Construction)
    }

    /// All registered identifiers of one kind, sorted.
    pub fn identifiers(&self, kind: AlgorithmKind) -> Vec<String> {
        let mut ids: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, e)| e.kind == kind)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for AlgorithmRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<_> = self.entries.keys().collect();
        ids.sort();
        f.debug_struct("AlgorithmRegistry").field("algorithms", &ids).finish()
    }
}

/// Remove `flag` and its value from `options`, returning the value.
///
/// Returns `Ok(None)` when the flag is absent and an error when it is the
/// last token with no value after it.
pub fn take_option(flag: &str, options: &mut Vec<String>) -> Result<Option<String>, AlgorithmError> {
    let Some(pos) = options.iter().position(|o| o == flag) else {
        return Ok(None);
    };
    if pos + 1 >= options.len() {
        return Err(AlgorithmError::invalid_option(flag, "missing value"));
    }
    let value = options.remove(pos + 1);
    options.remove(pos);
    Ok(Some(value))
}

/// Fail if any option tokens were not understood.
pub fn ensure_consumed(options: &[String]) -> Result<(), AlgorithmError> {
    match options.iter().find(|o| !o.is_empty()) {
        Some(first) => Err(AlgorithmError::invalid_option(
            first.clone(),
            format!("unrecognized option(s): {}", options.join(" ")),
        )),
        None => Ok(()),
    }
}
