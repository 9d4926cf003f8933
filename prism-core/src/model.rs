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

//! Type models and the field metadata cache.
//!
//! A [`TypeModel`] is the registration-time replacement for runtime
//! reflection: callers describe a type once (field names, declared
//! [`TypeKey`]s, flags, accessor closures, constructors) and the engine
//! derives everything else. Field values cross the accessor boundary as
//! `Option<Box<dyn Any>>`; `None` is the null signal.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::Error;
use crate::types::{field_flags, TypeKey};
use crate::util::lock;

/// Reads a field from a value. `None` means the field is null.
pub type Getter = Arc<dyn Fn(&dyn Any) -> Result<Option<Box<dyn Any>>, Error> + Send + Sync>;
/// Writes a field of a mutable value. Passing `None` nulls the field.
pub type Setter = Arc<dyn Fn(&mut dyn Any, Option<Box<dyn Any>>) -> Result<(), Error> + Send + Sync>;
/// Builds a fresh default instance of a mutable type.
pub type ZeroConstruct = Arc<dyn Fn() -> Box<dyn Any> + Send + Sync>;
/// Builds an instance of an immutable type from ordered arguments.
pub type Construct =
    Arc<dyn Fn(Vec<Option<Box<dyn Any>>>) -> Result<Box<dyn Any>, Error> + Send + Sync>;

/// One persistent field of a type model.
pub struct FieldModel {
    pub name: String,
    pub ty: TypeKey,
    pub flags: u8,
    pub getter: Getter,
    /// Absent for final fields; required on every field of a mutable type.
    pub setter: Option<Setter>,
}

impl FieldModel {
    pub fn has_flag(&self, flag: u8) -> bool {
        self.flags & flag != 0
    }
}

/// A candidate constructor of an immutable type. Parameter names and
/// declared types must exactly cover the persistent field set; the
/// declared parameter order becomes the canonical serialization order.
pub struct ConstructorModel {
    pub params: Vec<(String, TypeKey)>,
    pub construct: Construct,
}

impl ConstructorModel {
    pub fn new(
        params: Vec<(&str, TypeKey)>,
        construct: impl Fn(Vec<Option<Box<dyn Any>>>) -> Result<Box<dyn Any>, Error>
            + Send
            + Sync
            + 'static,
    ) -> ConstructorModel {
        ConstructorModel {
            params: params
                .into_iter()
                .map(|(name, ty)| (name.to_owned(), ty))
                .collect(),
            construct: Arc::new(construct),
        }
    }
}

/// Registration-time description of a serializable structured type.
pub struct TypeModel {
    name: String,
    savable: bool,
    fields: Vec<Arc<FieldModel>>,
    zero_constructor: Option<ZeroConstruct>,
    constructors: Vec<ConstructorModel>,
}

impl TypeModel {
    pub fn new(name: impl Into<String>) -> TypeModel {
        TypeModel {
            name: name.into(),
            savable: false,
            fields: Vec::new(),
            zero_constructor: None,
            constructors: Vec::new(),
        }
    }

    /// Marks the type itself as serializable: without this marker only
    /// explicitly annotated fields are persistent.
    pub fn savable(mut self) -> TypeModel {
        self.savable = true;
        self
    }

    pub fn field(
        mut self,
        name: impl Into<String>,
        ty: TypeKey,
        flags: u8,
        getter: Getter,
        setter: Option<Setter>,
    ) -> TypeModel {
        self.fields.push(Arc::new(FieldModel {
            name: name.into(),
            ty,
            flags,
            getter,
            setter,
        }));
        self
    }

    pub fn zero_constructor(mut self, constructor: ZeroConstruct) -> TypeModel {
        self.zero_constructor = Some(constructor);
        self
    }

    pub fn constructor(mut self, constructor: ConstructorModel) -> TypeModel {
        self.constructors.push(constructor);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_savable(&self) -> bool {
        self.savable
    }

    pub(crate) fn zero_construct(&self) -> Option<&ZeroConstruct> {
        self.zero_constructor.as_ref()
    }

    pub(crate) fn constructors(&self) -> &[ConstructorModel] {
        &self.constructors
    }
}

/// Process-wide store of type models plus the field metadata cache.
///
/// The persistent-field set of a type is computed once, on first access,
/// and cached for the process lifetime. Registered types are not
/// expected to change shape at runtime.
#[derive(Default)]
pub struct ModelStore {
    models: Mutex<HashMap<String, Arc<TypeModel>>>,
    fields: Mutex<HashMap<String, Arc<Vec<Arc<FieldModel>>>>>,
}

impl ModelStore {
    pub fn register(&self, model: TypeModel) -> Result<(), Error> {
        let mut models = lock(&self.models);
        if models.contains_key(model.name()) {
            return Err(Error::configuration(format!(
                "type model `{}` is already registered",
                model.name()
            )));
        }
        models.insert(model.name().to_owned(), Arc::new(model));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<TypeModel>> {
        lock(&self.models).get(name).cloned()
    }

    /// The ordered persistent fields of a registered type:
    ///
    /// - if any field is `ANNOTATED`, exactly the annotated fields;
    /// - otherwise, if the type is marked savable, every non-transient
    ///   field;
    /// - otherwise, no fields. An empty set is valid, not an error.
    pub fn class_fields(&self, name: &str) -> Result<Arc<Vec<Arc<FieldModel>>>, Error> {
        let mut cache = lock(&self.fields);
        if let Some(fields) = cache.get(name) {
            return Ok(fields.clone());
        }
        let model = self.get(name).ok_or_else(|| {
            Error::configuration(format!("no type model registered for `{}`", name))
        })?;
        let annotated = model.fields.iter().any(|f| f.has_flag(field_flags::ANNOTATED));
        let included: Vec<Arc<FieldModel>> = if annotated {
            model
                .fields
                .iter()
                .filter(|f| f.has_flag(field_flags::ANNOTATED))
                .cloned()
                .collect()
        } else if model.savable {
            model
                .fields
                .iter()
                .filter(|f| !f.has_flag(field_flags::TRANSIENT))
                .cloned()
                .collect()
        } else {
            Vec::new()
        };
        let included = Arc::new(included);
        cache.insert(name.to_owned(), included.clone());
        Ok(included)
    }
}

/// Wraps a plain field-read function as a [`Getter`], handling the
/// `dyn Any` downcasts.
pub fn getter_of<T: 'static, V: 'static>(get: fn(&T) -> Option<V>) -> Getter {
    Arc::new(move |value| {
        let value = value.downcast_ref::<T>().ok_or_else(|| {
            Error::configuration(format!(
                "accessor applied to a value that is not a {}",
                std::any::type_name::<T>()
            ))
        })?;
        Ok(get(value).map(|v| Box::new(v) as Box<dyn Any>))
    })
}

/// Wraps a plain field-write function as a [`Setter`].
pub fn setter_of<T: 'static, V: 'static>(set: fn(&mut T, Option<V>)) -> Setter {
    Arc::new(move |value, field| {
        let value = value.downcast_mut::<T>().ok_or_else(|| {
            Error::configuration(format!(
                "accessor applied to a value that is not a {}",
                std::any::type_name::<T>()
            ))
        })?;
        let field = match field {
            None => None,
            Some(boxed) => Some(*boxed.downcast::<V>().map_err(|_| {
                Error::configuration(format!(
                    "field value is not a {}",
                    std::any::type_name::<V>()
                ))
            })?),
        };
        set(value, field);
        Ok(())
    })
}

/// A [`ZeroConstruct`] for any `Default` type.
pub fn zero_constructor_of<T: Default + 'static>() -> ZeroConstruct {
    Arc::new(|| Box::new(T::default()))
}

/// Takes and downcasts one constructor argument. `None` stays `None`.
pub fn take_arg<V: 'static>(
    args: &mut [Option<Box<dyn Any>>],
    index: usize,
) -> Result<Option<V>, Error> {
    let slot = args.get_mut(index).ok_or_else(|| {
        Error::configuration(format!("constructor argument {} out of range", index))
    })?;
    match slot.take() {
        None => Ok(None),
        Some(boxed) => boxed.downcast::<V>().map(|v| Some(*v)).map_err(|_| {
            Error::configuration(format!(
                "constructor argument {} is not a {}",
                index,
                std::any::type_name::<V>()
            ))
        }),
    }
}
