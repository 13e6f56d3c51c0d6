//! Dialect factories and the process wide registry they are published in.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::dialect::{BasicSqlDialect, PreparedSqlDialect};
use crate::dialects::DialectInfo;

/// Builds dialect instances for one database engine.
pub trait DialectFactory: Send + Sync {
    /// Description of the dialect this factory builds.
    fn dialect(&self) -> DialectInfo;

    /// Creates the raw statement variant, if supported.
    fn create_basic(&self) -> Option<Arc<dyn BasicSqlDialect>>;

    /// Creates the prepared statement variant, if supported.
    fn create_prepared(&self) -> Option<Arc<dyn PreparedSqlDialect>>;
}

/// Name keyed collection of dialect factories. Lookup is case-insensitive.
#[derive(Default)]
pub struct DialectRegistry {
    factories: RwLock<HashMap<String, Arc<dyn DialectFactory>>>,
}

impl DialectRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under its dialect's short name, replacing any
    /// previous registration with the same name.
    pub fn register(&self, factory: Arc<dyn DialectFactory>) {
        let key = factory.dialect().short_name.to_lowercase();
        self.factories
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, factory);
    }

    /// Finds a factory by dialect name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn DialectFactory>> {
        self.factories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&name.to_lowercase())
            .cloned()
    }

    /// Descriptions of every registered dialect, sorted by short name.
    #[must_use]
    pub fn dialects(&self) -> Vec<DialectInfo> {
        let mut infos: Vec<DialectInfo> = self
            .factories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|f| f.dialect())
            .collect();
        infos.sort_by_key(|d| d.short_name);
        infos
    }

    /// Returns `true` if a dialect with this name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// The process wide registry.
pub fn dialect_registry() -> &'static DialectRegistry {
    static REGISTRY: OnceLock<DialectRegistry> = OnceLock::new();
    REGISTRY.get_or_init(DialectRegistry::new)
}
