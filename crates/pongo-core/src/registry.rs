//! Schema type registry
//!
//! A [`Registry`] maps wire type ids to factories producing blank instances of
//! a schema type. Decoding always takes a registry explicitly; the
//! process-wide *current* registry is only a convenience default for callers
//! that do not thread one through.

use crate::error::RegistryError;
use crate::node::SchemaType;
use crate::types::{
    AllOfType, AnyOfType, BoolType, BytesType, DatetimeType, Float64Type, IntType, ListType,
    ObjectType, OneOfType, StringType,
};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// Factory producing a blank instance of a schema type
pub type SchemaFactory = Arc<dyn Fn() -> Box<dyn SchemaType> + Send + Sync>;

/// The schema types shipped with the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    AnyOf,
    OneOf,
    AllOf,
    List,
    Object,
    String,
    Int,
    Float64,
    Bytes,
    Bool,
    Datetime,
}

impl BuiltinType {
    pub const ALL: [BuiltinType; 11] = [
        BuiltinType::AnyOf,
        BuiltinType::OneOf,
        BuiltinType::AllOf,
        BuiltinType::List,
        BuiltinType::Object,
        BuiltinType::String,
        BuiltinType::Int,
        BuiltinType::Float64,
        BuiltinType::Bytes,
        BuiltinType::Bool,
        BuiltinType::Datetime,
    ];

    /// Wire type id
    pub fn as_str(&self) -> &'static str {
        match self {
            BuiltinType::AnyOf => "anyOf",
            BuiltinType::OneOf => "oneOf",
            BuiltinType::AllOf => "allOf",
            BuiltinType::List => "list",
            BuiltinType::Object => "object",
            BuiltinType::String => "string",
            BuiltinType::Int => "int",
            BuiltinType::Float64 => "float64",
            BuiltinType::Bytes => "bytes",
            BuiltinType::Bool => "bool",
            BuiltinType::Datetime => "datetime",
        }
    }

    /// Create a blank instance
    pub fn create(&self) -> Box<dyn SchemaType> {
        match self {
            BuiltinType::AnyOf => Box::new(AnyOfType::default()),
            BuiltinType::OneOf => Box::new(OneOfType::default()),
            BuiltinType::AllOf => Box::new(AllOfType::default()),
            BuiltinType::List => Box::new(ListType::default()),
            BuiltinType::Object => Box::new(ObjectType::default()),
            BuiltinType::String => Box::new(StringType::default()),
            BuiltinType::Int => Box::new(IntType::default()),
            BuiltinType::Float64 => Box::new(Float64Type::default()),
            BuiltinType::Bytes => Box::new(BytesType::default()),
            BuiltinType::Bool => Box::new(BoolType::default()),
            BuiltinType::Datetime => Box::new(DatetimeType::default()),
        }
    }
}

impl fmt::Display for BuiltinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuiltinType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BuiltinType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown builtin schema type: {}", s))
    }
}

/// Mapping from type id to schema type factory
#[derive(Clone, Default)]
pub struct Registry {
    factories: HashMap<String, SchemaFactory>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every [`BuiltinType`]
    pub fn builtin() -> Self {
        let factories = BuiltinType::ALL
            .into_iter()
            .map(|t| {
                let factory: SchemaFactory = Arc::new(move || t.create());
                (t.as_str().to_string(), factory)
            })
            .collect();
        Self { factories }
    }

    /// Blank instance of the type registered under `id`
    pub fn get(&self, id: &str) -> Option<Box<dyn SchemaType>> {
        self.factories.get(id).map(|factory| factory())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    /// Registered ids, sorted
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Register a factory under the id of the instances it produces.
    ///
    /// Fails if the id is already taken; use [`Registry::replace`] to
    /// overwrite an entry.
    pub fn register<F>(&mut self, factory: F) -> Result<&mut Self, RegistryError>
    where
        F: Fn() -> Box<dyn SchemaType> + Send + Sync + 'static,
    {
        let id = factory().schema_type_id().to_string();
        if self.factories.contains_key(&id) {
            return Err(RegistryError::DuplicateTypeId(id));
        }
        tracing::debug!(schema_type = %id, "registered schema type");
        self.factories.insert(id, Arc::new(factory));
        Ok(self)
    }

    /// Register `T` using its `Default` value as the blank instance
    pub fn register_type<T>(&mut self) -> Result<&mut Self, RegistryError>
    where
        T: SchemaType + Default,
    {
        self.register(|| Box::new(T::default()))
    }

    /// Builder form of [`Registry::register`]
    pub fn with<F>(mut self, factory: F) -> Result<Self, RegistryError>
    where
        F: Fn() -> Box<dyn SchemaType> + Send + Sync + 'static,
    {
        self.register(factory)?;
        Ok(self)
    }

    /// Register a factory, returning the one it displaced
    pub fn replace<F>(&mut self, factory: F) -> Option<SchemaFactory>
    where
        F: Fn() -> Box<dyn SchemaType> + Send + Sync + 'static,
    {
        let id = factory().schema_type_id().to_string();
        tracing::debug!(schema_type = %id, "replaced schema type");
        self.factories.insert(id, Arc::new(factory))
    }

    /// Remove an entry, returning whether it existed
    pub fn remove(&mut self, id: &str) -> bool {
        self.factories.remove(id).is_some()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("types", &self.ids())
            .finish()
    }
}

fn current_cell() -> &'static RwLock<Registry> {
    static CURRENT: OnceLock<RwLock<Registry>> = OnceLock::new();
    CURRENT.get_or_init(|| RwLock::new(Registry::builtin()))
}

/// Snapshot of the process-wide current registry.
///
/// Starts out as [`Registry::builtin`]. Later changes to the current registry
/// do not affect a snapshot already taken.
pub fn current() -> Registry {
    current_cell()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Swap the process-wide current registry, returning the previous one
pub fn set_current(registry: Registry) -> Registry {
    let mut current = current_cell()
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    tracing::info!(types = registry.len(), "replaced current schema registry");
    std::mem::replace(&mut *current, registry)
}

/// Restore the builtin registry as current, returning the previous one
pub fn reset_current() -> Registry {
    set_current(Registry::builtin())
}

/// Make `registry` current until the returned guard is dropped
pub fn scoped(registry: Registry) -> CurrentGuard {
    CurrentGuard {
        previous: Some(set_current(registry)),
    }
}

/// Restores the previously current registry on drop
#[must_use = "the previous registry is restored as soon as the guard is dropped"]
pub struct CurrentGuard {
    previous: Option<Registry>,
}

impl Drop for CurrentGuard {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            set_current(previous);
        }
    }
}
