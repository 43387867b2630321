// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Per-node annotation storage.
//!
//! One sparse map per node, with two access modes over the same entries:
//! typed slots keyed by type identity (at most one value per Rust type,
//! overwriting), and named entries keyed by string (insert-only; a second
//! insert under the same key is an error).

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::AstError;

/// Key for one annotation entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnnotationKey {
    /// Typed single-slot entry, keyed by the value's type identity.
    Type(TypeId),
    /// Caller-chosen named entry.
    Named(String),
}

/// Sparse per-node map from annotation key to value.
///
/// Values are reference-counted, so cloning the store copies the entries
/// but shares the values; inserting into or removing from one copy never
/// affects the other.
#[derive(Default, Clone)]
pub struct Annotations {
    map: HashMap<AnnotationKey, Rc<dyn Any>>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    /// The typed slot for `T`, if populated.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.map
            .get(&AnnotationKey::Type(TypeId::of::<T>()))
            .and_then(|v| v.downcast_ref::<T>())
    }

    /// Fill the typed slot for `T`, replacing any previous value.
    pub fn set<T: Any>(&mut self, value: T) {
        self.map
            .insert(AnnotationKey::Type(TypeId::of::<T>()), Rc::new(value));
    }

    /// Insert a named entry. Named entries are insert-only: if `key` is
    /// already present this fails with [`AstError::DuplicateAnnotation`]
    /// and the store is unchanged. Check [`contains`](Self::contains)
    /// first for overwrite-or-skip behavior.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Any) -> Result<(), AstError> {
        let key = key.into();
        if self.map.contains_key(&AnnotationKey::Named(key.clone())) {
            return Err(AstError::DuplicateAnnotation(key));
        }
        self.map.insert(AnnotationKey::Named(key), Rc::new(value));
        Ok(())
    }

    /// Insert a named entry whose value is the key itself.
    pub fn insert_key(&mut self, key: &str) -> Result<(), AstError> {
        self.insert(key, key.to_string())
    }

    /// The named entry for `key`, if present.
    pub fn get_value(&self, key: &str) -> Option<&dyn Any> {
        self.map
            .get(&AnnotationKey::Named(key.to_string()))
            .map(|v| v.as_ref())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(&AnnotationKey::Named(key.to_string()))
    }

    /// Remove the named entry for `key`. Removing an absent key is a
    /// no-op, not an error.
    pub fn remove(&mut self, key: &str) -> bool {
        self.map
            .remove(&AnnotationKey::Named(key.to_string()))
            .is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}

impl fmt::Debug for Annotations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.map.keys()).finish()
    }
}
