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

use std::any::Any;

use crate::error::Error;
use crate::format::Format;

mod bool;
pub mod ext_ref;
mod number;
pub mod object;
mod string;

pub(crate) use bool::{StreamBool, TreeBool};
pub(crate) use number::{
    StreamChar, StreamF32, StreamF64, StreamI16, StreamI32, StreamI64, StreamI8, TreeChar,
    TreeF32, TreeF64, TreeI16, TreeI32, TreeI64, TreeI8,
};
pub(crate) use string::{StreamText, TreeText};

/// A resolved encode/decode implementation for one (type, target format)
/// pair.
///
/// `sync` selects the payload mode: `false` carries every persistent
/// field, `true` omits `NO_SYNC` fields. Leaf codecs ignore it.
pub trait Serializer<F: Format>: Send + Sync {
    /// Encodes `value` into `out`.
    fn write(&self, value: &dyn Any, out: &mut F::Writer, sync: bool) -> Result<(), Error>;

    /// Decodes a value. For mutable structured types `existing` seeds the
    /// instance to update; immutable types and leaves ignore it.
    fn read(
        &self,
        input: &mut F::Reader<'_>,
        existing: Option<Box<dyn Any>>,
        sync: bool,
    ) -> Result<Box<dyn Any>, Error>;
}

/// Downcasts an encode-side value, reporting the expected type on failure.
pub(crate) fn downcast_value<T: 'static>(value: &dyn Any) -> Result<&T, Error> {
    value.downcast_ref::<T>().ok_or_else(|| {
        Error::configuration(format!(
            "value passed to serializer is not a {}",
            std::any::type_name::<T>()
        ))
    })
}
