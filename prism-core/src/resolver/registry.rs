// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! The serializer registry: ordered predicate families with lazily
//! resolved, memoized serializer handles.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, Weak};

use crate::error::Error;
use crate::format::Format;
use crate::serializer::Serializer;
use crate::types::TypeKey;
use crate::util::lock;

/// Decides whether a family covers a given type.
pub type TypePredicate = Arc<dyn Fn(&TypeKey) -> bool + Send + Sync>;
/// Builds the concrete serializer for one resolved type. Invoked at most
/// once per `(format, type)` key, on first actual use.
pub type SerializerFactory<F> = Arc<
    dyn Fn(&SerializerRegistry<F>, &TypeKey) -> Result<Arc<dyn Serializer<F>>, Error>
        + Send
        + Sync,
>;

struct Family<F: Format> {
    id: String,
    predicate: TypePredicate,
    factory: Option<SerializerFactory<F>>,
}

struct Shared<F: Format> {
    families: Mutex<Vec<Family<F>>>,
    cache: Mutex<HashMap<TypeKey, SerializerHandle<F>>>,
}

/// Ordered mapping from type predicates to serializer factories for one
/// target format.
///
/// Families are scanned in registration order and the first match wins;
/// type hierarchies can satisfy several predicates (a specific family and
/// a generic fallback), so that order is a correctness contract, not an
/// implementation detail. Resolution is memoized per type; the handle is
/// installed in the cache *before* its serializer is constructed, so
/// mutually recursive and self-referential type graphs resolve without
/// infinite regress.
pub struct SerializerRegistry<F: Format> {
    shared: Arc<Shared<F>>,
}

impl<F: Format> Clone for SerializerRegistry<F> {
    fn clone(&self) -> Self {
        SerializerRegistry {
            shared: self.shared.clone(),
        }
    }
}

impl<F: Format> Default for SerializerRegistry<F> {
    fn default() -> Self {
        SerializerRegistry {
            shared: Arc::new(Shared {
                families: Mutex::new(Vec::new()),
                cache: Mutex::new(HashMap::new()),
            }),
        }
    }
}

impl<F: Format> SerializerRegistry<F> {
    /// Appends a named serializer family. Registration order is resolution
    /// order.
    pub fn register(&self, id: impl Into<String>, predicate: TypePredicate) {
        lock(&self.shared.families).push(Family {
            id: id.into(),
            predicate,
            factory: None,
        });
    }

    /// Attaches this format's construction function to a registered family.
    pub fn register_impl(&self, id: &str, factory: SerializerFactory<F>) -> Result<(), Error> {
        let mut families = lock(&self.shared.families);
        let family = families.iter_mut().find(|f| f.id == id).ok_or_else(|| {
            Error::configuration(format!("no serializer family `{}` registered", id))
        })?;
        family.factory = Some(factory);
        Ok(())
    }

    /// Finds the first family whose predicate matches `ty` and returns its
    /// memoized handle. At most one handle ever exists per type; racing
    /// callers observe the same instance.
    pub fn resolve(&self, ty: &TypeKey) -> Result<SerializerHandle<F>, Error> {
        let mut cache = lock(&self.shared.cache);
        if let Some(handle) = cache.get(ty) {
            return Ok(handle.clone());
        }
        let family = {
            let families = lock(&self.shared.families);
            families
                .iter()
                .position(|f| (f.predicate)(ty))
                .ok_or_else(|| {
                    Error::resolution(format!("no serializer family matches type {}", ty))
                })?
        };
        let handle = SerializerHandle {
            inner: Arc::new(HandleInner {
                registry: Arc::downgrade(&self.shared),
                family,
                ty: ty.clone(),
                slot: OnceLock::new(),
                fill: Mutex::new(()),
            }),
        };
        cache.insert(ty.clone(), handle.clone());
        Ok(handle)
    }
}

struct HandleInner<F: Format> {
    registry: Weak<Shared<F>>,
    family: usize,
    ty: TypeKey,
    slot: OnceLock<Arc<dyn Serializer<F>>>,
    fill: Mutex<()>,
}

/// A deferred reference to the concrete serializer for one type.
///
/// The underlying serializer is constructed on first [`get`] and shared
/// by every holder of the handle afterwards.
///
/// [`get`]: SerializerHandle::get
pub struct SerializerHandle<F: Format> {
    inner: Arc<HandleInner<F>>,
}

impl<F: Format> Clone for SerializerHandle<F> {
    fn clone(&self) -> Self {
        SerializerHandle {
            inner: self.inner.clone(),
        }
    }
}

impl<F: Format> SerializerHandle<F> {
    pub fn key(&self) -> &TypeKey {
        &self.inner.ty
    }

    /// The concrete serializer, constructing it on first use.
    pub fn get(&self) -> Result<Arc<dyn Serializer<F>>, Error> {
        if let Some(serializer) = self.inner.slot.get() {
            return Ok(serializer.clone());
        }
        let _guard = lock(&self.inner.fill);
        if let Some(serializer) = self.inner.slot.get() {
            return Ok(serializer.clone());
        }
        let shared = self.inner.registry.upgrade().ok_or_else(|| {
            Error::resolution("serializer registry was dropped before resolution completed")
        })?;
        let factory = {
            let families = lock(&shared.families);
            let family = &families[self.inner.family];
            family.factory.clone().ok_or_else(|| {
                Error::resolution(format!(
                    "serializer family `{}` has no implementation for this target format",
                    family.id
                ))
            })?
        };
        let registry = SerializerRegistry { shared };
        let serializer = factory(&registry, &self.inner.ty)?;
        let _ = self.inner.slot.set(serializer.clone());
        Ok(serializer)
    }
}
