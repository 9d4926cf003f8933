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

//! Per-type serialization analysis.
//!
//! Derived once per `(type, target format)` pair: mutability, the
//! always/no-sync field partition, the construction strategy, and a
//! lazily resolved serializer handle per field. Configuration problems
//! surface here, at analysis time, not on every encode/decode.

use std::slice;
use std::sync::Arc;

use crate::ensure;
use crate::error::Error;
use crate::format::Format;
use crate::model::{Construct, FieldModel, ModelStore, ZeroConstruct};
use crate::resolver::registry::{SerializerHandle, SerializerRegistry};
use crate::types::{field_flags, TypeKey};

/// A persistent field together with its resolved-type serializer handle.
pub struct AnalyzedField<F: Format> {
    pub model: Arc<FieldModel>,
    pub handle: SerializerHandle<F>,
}

/// How instances of the type are rebuilt on decode.
pub enum Construction {
    /// Mutable type: default-construct (or reuse the existing instance),
    /// then set each field.
    Default(ZeroConstruct),
    /// Immutable type: collect one argument per always-field, in the
    /// canonical (constructor parameter) order, and invoke the
    /// constructor. Existing instances cannot be mutated in place and are
    /// ignored.
    Arguments(Construct),
}

pub struct TypeAnalysis<F: Format> {
    pub ty: TypeKey,
    pub mutable: bool,
    /// Fields present in every payload, in canonical order.
    pub always: Vec<AnalyzedField<F>>,
    /// Fields omitted from sync-mode payloads, in declaration order.
    pub no_sync: Vec<AnalyzedField<F>>,
    pub construction: Construction,
}

impl<F: Format> TypeAnalysis<F> {
    /// Fields of a payload in wire order: always-fields, then the
    /// no-sync fields in full mode only. Encode and decode must iterate
    /// identically or the positional stream corrupts silently.
    pub fn fields_for(
        &self,
        sync: bool,
    ) -> std::iter::Chain<slice::Iter<'_, AnalyzedField<F>>, slice::Iter<'_, AnalyzedField<F>>>
    {
        let no_sync: &[AnalyzedField<F>] = if sync { &[] } else { &self.no_sync };
        self.always.iter().chain(no_sync.iter())
    }

    pub fn field_count(&self, sync: bool) -> usize {
        if sync {
            self.always.len()
        } else {
            self.always.len() + self.no_sync.len()
        }
    }
}

/// Analyzes a structured type for one target format.
pub fn analyze<F: Format>(
    store: &ModelStore,
    registry: &SerializerRegistry<F>,
    ty: &TypeKey,
) -> Result<TypeAnalysis<F>, Error> {
    let (name, args) = match ty {
        TypeKey::Named { name, args } => (name.as_ref(), args.as_slice()),
        other => {
            return Err(Error::configuration(format!(
                "type {} is not a structured type",
                other
            )))
        }
    };
    let fields = store.class_fields(name)?;
    let model = store.get(name).ok_or_else(|| {
        Error::configuration(format!("no type model registered for `{}`", name))
    })?;

    let mutable = !fields.iter().any(|f| f.has_flag(field_flags::FINAL));
    ensure!(
        mutable || !fields.iter().any(|f| f.has_flag(field_flags::NO_SYNC)),
        Error::configuration(format!(
            "immutable type `{}` cannot have non-syncing fields",
            name
        ))
    );

    let (always_models, no_sync_models): (Vec<_>, Vec<_>) = fields
        .iter()
        .cloned()
        .partition(|f| !f.has_flag(field_flags::NO_SYNC));

    let (construction, always_models) = if mutable {
        for field in fields.iter() {
            ensure!(
                field.setter.is_some(),
                Error::configuration(format!(
                    "field `{}` of mutable type `{}` has no setter",
                    field.name, name
                ))
            );
        }
        let zero = model.zero_construct().cloned().ok_or_else(|| {
            Error::configuration(format!(
                "no zero-argument constructor for mutable type `{}`",
                name
            ))
        })?;
        (Construction::Default(zero), always_models)
    } else {
        // Order-independent exact match over the full field set; each
        // parameter consumes its field, so duplicate parameter names
        // cannot bind one field twice. The winning constructor's
        // parameter order becomes canonical.
        let constructor = model
            .constructors()
            .iter()
            .find(|c| {
                if c.params.len() != fields.len() {
                    return false;
                }
                let mut unclaimed: Vec<&Arc<FieldModel>> = fields.iter().collect();
                c.params.iter().all(|(param_name, param_ty)| {
                    match unclaimed
                        .iter()
                        .position(|f| f.name == *param_name && f.ty == *param_ty)
                    {
                        Some(index) => {
                            unclaimed.swap_remove(index);
                            true
                        }
                        None => false,
                    }
                })
            })
            .ok_or_else(|| {
                let wanted = fields
                    .iter()
                    .map(|f| format!("{} {}", f.ty, f.name))
                    .collect::<Vec<_>>()
                    .join(", ");
                Error::configuration(format!(
                    "no constructor with parameters ({}) for immutable type `{}`",
                    wanted, name
                ))
            })?;
        let mut ordered = Vec::with_capacity(constructor.params.len());
        for (param_name, _) in &constructor.params {
            let field = always_models
                .iter()
                .find(|f| &f.name == param_name)
                .cloned()
                .ok_or_else(|| {
                    Error::configuration(format!(
                        "constructor parameter `{}` does not name a field of `{}`",
                        param_name, name
                    ))
                })?;
            ordered.push(field);
        }
        (
            Construction::Arguments(constructor.construct.clone()),
            ordered,
        )
    };

    let resolve_fields = |models: Vec<Arc<FieldModel>>| -> Result<Vec<AnalyzedField<F>>, Error> {
        let mut analyzed = Vec::with_capacity(models.len());
        for field in models {
            let resolved_ty = field.ty.substitute(args)?;
            let handle = registry.resolve(&resolved_ty)?;
            analyzed.push(AnalyzedField {
                model: field,
                handle,
            });
        }
        Ok(analyzed)
    };

    Ok(TypeAnalysis {
        ty: ty.clone(),
        mutable,
        always: resolve_fields(always_models)?,
        no_sync: resolve_fields(no_sync_models)?,
        construction,
    })
}
