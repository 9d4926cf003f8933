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
use crate::format::{StreamFormat, TreeFormat};
use crate::serializer::{downcast_value, Serializer};

pub(crate) struct TreeText;

impl<F: TreeFormat> Serializer<F> for TreeText {
    fn write(&self, value: &dyn Any, out: &mut F::Writer, _sync: bool) -> Result<(), Error> {
        F::put_text(out, downcast_value::<String>(value)?);
        Ok(())
    }

    fn read(
        &self,
        input: &mut F::Reader<'_>,
        _existing: Option<Box<dyn Any>>,
        _sync: bool,
    ) -> Result<Box<dyn Any>, Error> {
        Ok(Box::new(F::get_text(&*input)?.to_owned()))
    }
}

pub(crate) struct StreamText;

impl<F: StreamFormat> Serializer<F> for StreamText {
    fn write(&self, value: &dyn Any, out: &mut F::Writer, _sync: bool) -> Result<(), Error> {
        F::write_text(out, downcast_value::<String>(value)?);
        Ok(())
    }

    fn read(
        &self,
        input: &mut F::Reader<'_>,
        _existing: Option<Box<dyn Any>>,
        _sync: bool,
    ) -> Result<Box<dyn Any>, Error> {
        Ok(Box::new(F::read_text(input)?))
    }
}
