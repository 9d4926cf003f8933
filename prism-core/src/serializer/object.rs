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

//! Structured-object codecs driven by a [`TypeAnalysis`].
//!
//! One codec per capability set. The tree codec writes one keyed entry
//! per non-null field and treats key absence as null; the stream codec
//! writes a null-presence bit vector followed by the non-null payloads in
//! canonical order. Both iterate fields through
//! [`TypeAnalysis::fields_for`], so the encode and decode field sequences
//! cannot drift apart.

use std::any::Any;

use crate::ensure;
use crate::error::Error;
use crate::format::{StreamFormat, TreeFormat};
use crate::resolver::{Construction, TypeAnalysis};
use crate::serializer::Serializer;

pub struct TreeObjectSerializer<F: TreeFormat> {
    analysis: TypeAnalysis<F>,
}

impl<F: TreeFormat> TreeObjectSerializer<F> {
    pub fn new(analysis: TypeAnalysis<F>) -> TreeObjectSerializer<F> {
        TreeObjectSerializer { analysis }
    }
}

impl<F: TreeFormat> Serializer<F> for TreeObjectSerializer<F> {
    fn write(&self, value: &dyn Any, out: &mut F::Writer, sync: bool) -> Result<(), Error> {
        let mut doc = F::new_document();
        for field in self.analysis.fields_for(sync) {
            if let Some(field_value) = (field.model.getter)(value)? {
                let mut node = F::new_value();
                field.handle.get()?.write(&*field_value, &mut node, sync)?;
                F::set_field(&mut doc, &field.model.name, node)?;
            }
        }
        *out = doc;
        Ok(())
    }

    fn read(
        &self,
        input: &mut F::Reader<'_>,
        existing: Option<Box<dyn Any>>,
        sync: bool,
    ) -> Result<Box<dyn Any>, Error> {
        match &self.analysis.construction {
            Construction::Default(zero) => {
                let mut instance = existing.unwrap_or_else(|| zero());
                for field in self.analysis.fields_for(sync) {
                    let decoded = match F::get_field(&*input, &field.model.name)? {
                        Some(mut child) => {
                            let seed = (field.model.getter)(&*instance)?;
                            Some(field.handle.get()?.read(&mut child, seed, sync)?)
                        }
                        None => None,
                    };
                    let setter = field.model.setter.as_ref().ok_or_else(|| {
                        Error::configuration(format!(
                            "field `{}` has no setter",
                            field.model.name
                        ))
                    })?;
                    setter(&mut *instance, decoded)?;
                }
                Ok(instance)
            }
            Construction::Arguments(construct) => {
                let mut args = Vec::with_capacity(self.analysis.always.len());
                for field in &self.analysis.always {
                    let decoded = match F::get_field(&*input, &field.model.name)? {
                        Some(mut child) => {
                            Some(field.handle.get()?.read(&mut child, None, sync)?)
                        }
                        None => None,
                    };
                    args.push(decoded);
                }
                construct(args)
            }
        }
    }
}

pub struct StreamObjectSerializer<F: StreamFormat> {
    analysis: TypeAnalysis<F>,
}

impl<F: StreamFormat> StreamObjectSerializer<F> {
    pub fn new(analysis: TypeAnalysis<F>) -> StreamObjectSerializer<F> {
        StreamObjectSerializer { analysis }
    }
}

impl<F: StreamFormat> Serializer<F> for StreamObjectSerializer<F> {
    fn write(&self, value: &dyn Any, out: &mut F::Writer, sync: bool) -> Result<(), Error> {
        // Read each field once: the same values feed the presence vector
        // and the payloads.
        let mut values = Vec::with_capacity(self.analysis.field_count(sync));
        for field in self.analysis.fields_for(sync) {
            values.push((field.model.getter)(value)?);
        }
        // a set bit marks a null field, whose payload is then omitted
        let bits: Vec<bool> = values.iter().map(Option::is_none).collect();
        F::write_bits(out, &bits);
        for (field, field_value) in self.analysis.fields_for(sync).zip(values) {
            if let Some(field_value) = field_value {
                field.handle.get()?.write(&*field_value, out, sync)?;
            }
        }
        Ok(())
    }

    fn read(
        &self,
        input: &mut F::Reader<'_>,
        existing: Option<Box<dyn Any>>,
        sync: bool,
    ) -> Result<Box<dyn Any>, Error> {
        let bits = F::read_bits(input)?;
        ensure!(
            bits.len() == self.analysis.field_count(sync),
            Error::format(format!(
                "null presence vector length {} does not match expected field count {}",
                bits.len(),
                self.analysis.field_count(sync)
            ))
        );
        match &self.analysis.construction {
            Construction::Default(zero) => {
                let mut instance = existing.unwrap_or_else(|| zero());
                for (field, null) in self.analysis.fields_for(sync).zip(bits) {
                    let decoded = if null {
                        None
                    } else {
                        let seed = (field.model.getter)(&*instance)?;
                        Some(field.handle.get()?.read(input, seed, sync)?)
                    };
                    let setter = field.model.setter.as_ref().ok_or_else(|| {
                        Error::configuration(format!(
                            "field `{}` has no setter",
                            field.model.name
                        ))
                    })?;
                    setter(&mut *instance, decoded)?;
                }
                Ok(instance)
            }
            Construction::Arguments(construct) => {
                let mut args = Vec::with_capacity(self.analysis.always.len());
                for (field, null) in self.analysis.always.iter().zip(bits) {
                    let decoded = if null {
                        None
                    } else {
                        Some(field.handle.get()?.read(input, None, sync)?)
                    };
                    args.push(decoded);
                }
                construct(args)
            }
        }
    }
}
