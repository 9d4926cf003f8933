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

//! Numeric and character leaf codecs.
//!
//! Tree documents are self-describing, so a stored numeric node may have
//! a different kind than the field it decodes into. Cross-kind decode
//! clamps rather than errors: floating values saturate at the 32/64-bit
//! integer boundary and narrow by truncation below it, integers widen or
//! truncate, and either side converts to floating freely. The byte
//! stream is positional with fixed widths, so no cross-kind case arises
//! there.

use std::any::Any;

use crate::error::Error;
use crate::format::{Numeric, StreamFormat, TreeFormat};
use crate::serializer::{downcast_value, Serializer};

pub(crate) fn numeric_to_i64(n: Numeric) -> i64 {
    match n {
        Numeric::Int(v) => v,
        // saturating cast: out-of-range clamps to MIN/MAX, not wraps
        Numeric::Float(d) => d as i64,
    }
}

pub(crate) fn numeric_to_i32(n: Numeric) -> i32 {
    match n {
        Numeric::Int(v) => v as i32,
        Numeric::Float(d) => d as i32,
    }
}

pub(crate) fn numeric_to_i16(n: Numeric) -> i16 {
    match n {
        Numeric::Int(v) => v as i16,
        // saturate at 32 bits, then narrow by truncation
        Numeric::Float(d) => (d as i32) as i16,
    }
}

pub(crate) fn numeric_to_i8(n: Numeric) -> i8 {
    match n {
        Numeric::Int(v) => v as i8,
        Numeric::Float(d) => (d as i32) as i8,
    }
}

pub(crate) fn numeric_to_f32(n: Numeric) -> f32 {
    match n {
        Numeric::Int(v) => v as f32,
        Numeric::Float(d) => d as f32,
    }
}

pub(crate) fn numeric_to_f64(n: Numeric) -> f64 {
    match n {
        Numeric::Int(v) => v as f64,
        Numeric::Float(d) => d,
    }
}

/// Stored integers are taken as full code points; floating values narrow
/// through the 16-bit clamp path like the other short kinds. A result
/// that is not a valid scalar value is a format error.
pub(crate) fn numeric_to_char(n: Numeric) -> Result<char, Error> {
    let code = match n {
        Numeric::Int(v) => v as u32,
        Numeric::Float(d) => (d as i32) as u16 as u32,
    };
    char::from_u32(code)
        .ok_or_else(|| Error::format(format!("invalid character code point {:#x}", code)))
}

macro_rules! tree_number {
    ($codec:ident, $ty:ty, $put:ident, $convert:expr) => {
        pub(crate) struct $codec;

        impl<F: TreeFormat> Serializer<F> for $codec {
            fn write(
                &self,
                value: &dyn Any,
                out: &mut F::Writer,
                _sync: bool,
            ) -> Result<(), Error> {
                F::$put(out, *downcast_value::<$ty>(value)?);
                Ok(())
            }

            fn read(
                &self,
                input: &mut F::Reader<'_>,
                _existing: Option<Box<dyn Any>>,
                _sync: bool,
            ) -> Result<Box<dyn Any>, Error> {
                let numeric = F::get_numeric(&*input)?;
                Ok(Box::new($convert(numeric)))
            }
        }
    };
}

tree_number!(TreeI8, i8, put_i8, numeric_to_i8);
tree_number!(TreeI16, i16, put_i16, numeric_to_i16);
tree_number!(TreeI32, i32, put_i32, numeric_to_i32);
tree_number!(TreeI64, i64, put_i64, numeric_to_i64);
tree_number!(TreeF32, f32, put_f32, numeric_to_f32);
tree_number!(TreeF64, f64, put_f64, numeric_to_f64);

pub(crate) struct TreeChar;

impl<F: TreeFormat> Serializer<F> for TreeChar {
    fn write(&self, value: &dyn Any, out: &mut F::Writer, _sync: bool) -> Result<(), Error> {
        F::put_char(out, *downcast_value::<char>(value)?);
        Ok(())
    }

    fn read(
        &self,
        input: &mut F::Reader<'_>,
        _existing: Option<Box<dyn Any>>,
        _sync: bool,
    ) -> Result<Box<dyn Any>, Error> {
        let numeric = F::get_numeric(&*input)?;
        Ok(Box::new(numeric_to_char(numeric)?))
    }
}

macro_rules! stream_number {
    ($codec:ident, $ty:ty, $write:ident, $read:ident) => {
        pub(crate) struct $codec;

        impl<F: StreamFormat> Serializer<F> for $codec {
            fn write(
                &self,
                value: &dyn Any,
                out: &mut F::Writer,
                _sync: bool,
            ) -> Result<(), Error> {
                F::$write(out, *downcast_value::<$ty>(value)?);
                Ok(())
            }

            fn read(
                &self,
                input: &mut F::Reader<'_>,
                _existing: Option<Box<dyn Any>>,
                _sync: bool,
            ) -> Result<Box<dyn Any>, Error> {
                Ok(Box::new(F::$read(input)?))
            }
        }
    };
}

stream_number!(StreamI8, i8, write_i8, read_i8);
stream_number!(StreamI16, i16, write_i16, read_i16);
stream_number!(StreamI32, i32, write_i32, read_i32);
stream_number!(StreamI64, i64, write_i64, read_i64);
stream_number!(StreamF32, f32, write_f32, read_f32);
stream_number!(StreamF64, f64, write_f64, read_f64);
stream_number!(StreamChar, char, write_char, read_char);
