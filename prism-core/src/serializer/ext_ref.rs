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

//! Serialization by external-registry reference.
//!
//! Some values are not serialized structurally at all: they live in a
//! named registry (item types, recipe definitions, shared palettes) and
//! only their identifier crosses the wire. Decode looks the identifier
//! back up; an identifier with no entry is a deserialization error, the
//! one error class callers are expected to recover from, since stale
//! identifiers in old payloads are a fact of life.

use std::any::Any;
use std::sync::Arc;

use crate::error::Error;
use crate::format::{StreamFormat, TreeFormat};
use crate::serializer::Serializer;

/// Resolves a stored identifier to a fresh boxed value, or `None` when
/// the registry has no such entry.
pub type RegistryLookup = Arc<dyn Fn(&str) -> Option<Box<dyn Any>> + Send + Sync>;
/// The inverse direction: the identifier a live value is registered
/// under.
pub type RegistryNameOf = Arc<dyn Fn(&dyn Any) -> Result<String, Error> + Send + Sync>;

/// A named lookup table whose entries serialize as bare identifiers.
pub struct ExternalRegistry {
    name: String,
    lookup: RegistryLookup,
    name_of: RegistryNameOf,
}

impl ExternalRegistry {
    pub fn new(
        name: impl Into<String>,
        lookup: impl Fn(&str) -> Option<Box<dyn Any>> + Send + Sync + 'static,
        name_of: impl Fn(&dyn Any) -> Result<String, Error> + Send + Sync + 'static,
    ) -> ExternalRegistry {
        ExternalRegistry {
            name: name.into(),
            lookup: Arc::new(lookup),
            name_of: Arc::new(name_of),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn entry(&self, id: &str) -> Result<Box<dyn Any>, Error> {
        (self.lookup)(id).ok_or_else(|| {
            Error::deserialization(format!(
                "no entry `{}` in registry `{}`",
                id, self.name
            ))
        })
    }
}

pub struct TreeExternalRef {
    registry: Arc<ExternalRegistry>,
}

impl TreeExternalRef {
    pub fn new(registry: Arc<ExternalRegistry>) -> TreeExternalRef {
        TreeExternalRef { registry }
    }
}

impl<F: TreeFormat> Serializer<F> for TreeExternalRef {
    fn write(&self, value: &dyn Any, out: &mut F::Writer, _sync: bool) -> Result<(), Error> {
        F::put_text(out, &(self.registry.name_of)(value)?);
        Ok(())
    }

    fn read(
        &self,
        input: &mut F::Reader<'_>,
        _existing: Option<Box<dyn Any>>,
        _sync: bool,
    ) -> Result<Box<dyn Any>, Error> {
        self.registry.entry(F::get_text(&*input)?)
    }
}

pub struct StreamExternalRef {
    registry: Arc<ExternalRegistry>,
}

impl StreamExternalRef {
    pub fn new(registry: Arc<ExternalRegistry>) -> StreamExternalRef {
        StreamExternalRef { registry }
    }
}

impl<F: StreamFormat> Serializer<F> for StreamExternalRef {
    fn write(&self, value: &dyn Any, out: &mut F::Writer, _sync: bool) -> Result<(), Error> {
        F::write_text(out, &(self.registry.name_of)(value)?);
        Ok(())
    }

    fn read(
        &self,
        input: &mut F::Reader<'_>,
        _existing: Option<Box<dyn Any>>,
        _sync: bool,
    ) -> Result<Box<dyn Any>, Error> {
        self.registry.entry(&F::read_text(input)?)
    }
}
