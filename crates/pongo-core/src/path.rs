//! Path-tracked navigation through the data being processed
//!
//! A [`Path`] is the trail of frames from the root input down to the value a
//! schema is currently looking at. Each frame remembers its key, the original
//! value, an optional override and the id of the schema type processing it.
//!
//! Frames are shared between paths and copied on write: pushing a frame or
//! overriding the last one never changes any other path, so an override set
//! while chaining inside one combinator is invisible to its siblings and to
//! the caller.

use crate::data::Data;
use crate::error::PathError;
use std::fmt;
use std::sync::Arc;

/// One step of a [`Path`]
#[derive(Debug, Clone, PartialEq)]
pub struct PathElement {
    key: String,
    data: Arc<Data>,
    overridden: Option<Arc<Data>>,
    schema_type: String,
}

impl PathElement {
    pub fn new(key: impl Into<String>, data: impl Into<Arc<Data>>, schema_type: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            data: data.into(),
            overridden: None,
            schema_type: schema_type.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn schema_type(&self) -> &str {
        &self.schema_type
    }

    /// The value before any override
    pub fn data(&self) -> &Data {
        &self.data
    }

    pub fn overridden(&self) -> Option<&Data> {
        self.overridden.as_deref()
    }

    /// The override if one is set, otherwise the original value
    pub fn value(&self) -> &Data {
        self.overridden.as_deref().unwrap_or(&self.data)
    }

    fn set_override(&mut self, data: Data) {
        self.overridden = Some(Arc::new(data));
    }

    fn unset_override(&mut self) {
        self.overridden = None;
    }
}

/// Ordered sequence of frames, from the root to the current position
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    elements: Vec<Arc<PathElement>>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> impl Iterator<Item = &PathElement> {
        self.elements.iter().map(|e| e.as_ref())
    }

    pub fn last(&self) -> Option<&PathElement> {
        self.elements.last().map(|e| e.as_ref())
    }

    /// Return a new path extended by one frame; `self` is left unchanged
    pub fn push(&self, key: impl Into<String>, data: impl Into<Arc<Data>>, schema_type: impl Into<String>) -> Path {
        let mut elements = Vec::with_capacity(self.elements.len() + 1);
        elements.extend(self.elements.iter().cloned());
        elements.push(Arc::new(PathElement::new(key, data, schema_type)));
        Path { elements }
    }

    /// Current value at the end of the path, honoring overrides
    pub fn value(&self) -> Option<&Data> {
        self.last().map(PathElement::value)
    }

    /// Value at the end of the path, ignoring overrides
    pub fn original_value(&self) -> Option<&Data> {
        self.last().map(PathElement::data)
    }

    pub fn overridden_value(&self) -> Option<&Data> {
        self.last().and_then(PathElement::overridden)
    }

    /// Override the value of the last frame
    pub fn set_override(&mut self, data: Data) -> Result<(), PathError> {
        let last = self
            .elements
            .last_mut()
            .ok_or(PathError::Empty("override"))?;
        Arc::make_mut(last).set_override(data);
        Ok(())
    }

    /// Clear the override of the last frame
    pub fn unset_override(&mut self) -> Result<(), PathError> {
        let last = self
            .elements
            .last_mut()
            .ok_or(PathError::Empty("clear"))?;
        Arc::make_mut(last).unset_override();
        Ok(())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for element in &self.elements {
            write!(f, ".{}<{}>", element.key, element.schema_type)?;
        }
        Ok(())
    }
}

/// A root value plus the path leading to the value currently under focus
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataPointer {
    root: Arc<Data>,
    path: Path,
}

impl DataPointer {
    /// Point at the root of `data`, processed by the schema type `schema_type`
    pub fn new(data: Data, schema_type: impl Into<String>) -> Self {
        let root = Arc::new(data);
        let path = Path::new().push("", Arc::clone(&root), schema_type);
        Self { root, path }
    }

    /// Descend into a child value; `self` is left unchanged
    pub fn push(&self, key: impl Into<String>, data: impl Into<Arc<Data>>, schema_type: impl Into<String>) -> Self {
        Self {
            root: Arc::clone(&self.root),
            path: self.path.push(key, data, schema_type),
        }
    }

    /// The current value, or `None` when the path is empty
    pub fn get(&self) -> Option<&Data> {
        self.path.value()
    }

    pub fn root(&self) -> &Data {
        &self.root
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set_override(&mut self, data: Data) -> Result<(), PathError> {
        self.path.set_override(data)
    }

    pub fn unset_override(&mut self) -> Result<(), PathError> {
        self.path.unset_override()
    }

    /// Return a copy whose current value is overridden with `data`
    pub fn with_override(&self, data: Data) -> Result<Self, PathError> {
        let mut pointer = self.clone();
        pointer.set_override(data)?;
        Ok(pointer)
    }
}
