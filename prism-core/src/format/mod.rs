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

//! Target codec abstraction.
//!
//! The engine is parameterized over a target format: serializers, the
//! registry, and type analysis are all generic over [`Format`]. Two
//! capability sets refine it: [`TreeFormat`] for self-describing keyed
//! documents and [`StreamFormat`] for flat positional byte streams.
//! Adding a third format means implementing one of the capability traits;
//! analysis and the object codec are untouched.

pub mod stream;
pub mod tree;

pub use stream::ByteStream;
pub use tree::{Node, Tree};

use crate::error::Error;

/// A target wire representation the engine can encode into and decode from.
pub trait Format: Sized + Send + Sync + 'static {
    /// Write-side state a serializer fills: a document node being built,
    /// or an append-only byte writer.
    type Writer;
    /// Read-side cursor: a borrowed document node, or a positional byte
    /// reader.
    type Reader<'a>;
}

/// Numeric payload of a stored leaf, preserving whether the stored kind
/// was integral or floating. Cross-kind decode rules depend on it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Numeric {
    Int(i64),
    Float(f64),
}

/// Capability set for self-describing, keyed document formats.
///
/// Key absence is the null signal: the object codec omits the key of a
/// null field entirely and interprets a missing key as null on decode.
pub trait TreeFormat: Format {
    /// A fresh, empty keyed document.
    fn new_document() -> Self::Writer;
    /// A scratch value for a leaf codec to overwrite.
    fn new_value() -> Self::Writer;
    fn set_field(doc: &mut Self::Writer, key: &str, value: Self::Writer) -> Result<(), Error>;
    fn has_field(doc: &Self::Reader<'_>, key: &str) -> Result<bool, Error>;
    fn get_field<'a>(doc: &Self::Reader<'a>, key: &str)
        -> Result<Option<Self::Reader<'a>>, Error>;

    fn put_bool(out: &mut Self::Writer, value: bool);
    fn put_i8(out: &mut Self::Writer, value: i8);
    fn put_i16(out: &mut Self::Writer, value: i16);
    fn put_i32(out: &mut Self::Writer, value: i32);
    fn put_i64(out: &mut Self::Writer, value: i64);
    fn put_f32(out: &mut Self::Writer, value: f32);
    fn put_f64(out: &mut Self::Writer, value: f64);
    fn put_char(out: &mut Self::Writer, value: char);
    fn put_text(out: &mut Self::Writer, value: &str);

    /// The numeric payload of a leaf, whatever its stored width.
    /// A non-numeric node is a format error.
    fn get_numeric(input: &Self::Reader<'_>) -> Result<Numeric, Error>;
    /// The textual payload of a leaf. A non-textual node is a format error.
    fn get_text<'a>(input: &Self::Reader<'a>) -> Result<&'a str, Error>;
}

/// Capability set for flat, positional byte-stream formats.
///
/// The stream is not self-describing: field order and the null-presence
/// bit vector carry all the structure.
pub trait StreamFormat: Format {
    /// Writes the null-presence vector: an explicit length, then one bit
    /// per field in declaration order. A set bit marks a null field.
    fn write_bits(out: &mut Self::Writer, bits: &[bool]);
    fn read_bits(input: &mut Self::Reader<'_>) -> Result<Vec<bool>, Error>;

    fn write_bool(out: &mut Self::Writer, value: bool);
    fn write_i8(out: &mut Self::Writer, value: i8);
    fn write_i16(out: &mut Self::Writer, value: i16);
    fn write_i32(out: &mut Self::Writer, value: i32);
    fn write_i64(out: &mut Self::Writer, value: i64);
    fn write_f32(out: &mut Self::Writer, value: f32);
    fn write_f64(out: &mut Self::Writer, value: f64);
    fn write_char(out: &mut Self::Writer, value: char);
    fn write_text(out: &mut Self::Writer, value: &str);

    fn read_bool(input: &mut Self::Reader<'_>) -> Result<bool, Error>;
    fn read_i8(input: &mut Self::Reader<'_>) -> Result<i8, Error>;
    fn read_i16(input: &mut Self::Reader<'_>) -> Result<i16, Error>;
    fn read_i32(input: &mut Self::Reader<'_>) -> Result<i32, Error>;
    fn read_i64(input: &mut Self::Reader<'_>) -> Result<i64, Error>;
    fn read_f32(input: &mut Self::Reader<'_>) -> Result<f32, Error>;
    fn read_f64(input: &mut Self::Reader<'_>) -> Result<f64, Error>;
    fn read_char(input: &mut Self::Reader<'_>) -> Result<char, Error>;
    fn read_text(input: &mut Self::Reader<'_>) -> Result<String, Error>;
}
