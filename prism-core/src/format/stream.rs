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

use crate::buffer::{Reader, Writer};
use crate::error::Error;
use crate::format::{Format, StreamFormat};

/// The shipped flat byte-stream format, little-endian and positional.
pub struct ByteStream;

impl Format for ByteStream {
    type Writer = Writer;
    type Reader<'a> = Reader<'a>;
}

impl StreamFormat for ByteStream {
    /// varuint32 bit count, then the bits packed LSB-first into bytes.
    fn write_bits(out: &mut Writer, bits: &[bool]) {
        out.write_varuint32(bits.len() as u32);
        for chunk in bits.chunks(8) {
            let mut byte = 0u8;
            for (i, bit) in chunk.iter().enumerate() {
                if *bit {
                    byte |= 1 << i;
                }
            }
            out.write_u8(byte);
        }
    }

    fn read_bits(input: &mut Reader<'_>) -> Result<Vec<bool>, Error> {
        let len = input.read_varuint32()? as usize;
        let raw = input.read_bytes(len.div_ceil(8))?;
        Ok((0..len).map(|i| raw[i / 8] & (1 << (i % 8)) != 0).collect())
    }

    fn write_bool(out: &mut Writer, value: bool) {
        out.write_u8(if value { 1 } else { 0 });
    }

    fn write_i8(out: &mut Writer, value: i8) {
        out.write_i8(value);
    }

    fn write_i16(out: &mut Writer, value: i16) {
        out.write_i16(value);
    }

    fn write_i32(out: &mut Writer, value: i32) {
        out.write_i32(value);
    }

    fn write_i64(out: &mut Writer, value: i64) {
        out.write_i64(value);
    }

    fn write_f32(out: &mut Writer, value: f32) {
        out.write_f32(value);
    }

    fn write_f64(out: &mut Writer, value: f64) {
        out.write_f64(value);
    }

    fn write_char(out: &mut Writer, value: char) {
        out.write_u32(value as u32);
    }

    fn write_text(out: &mut Writer, value: &str) {
        out.write_varuint32(value.len() as u32);
        out.write_bytes(value.as_bytes());
    }

    fn read_bool(input: &mut Reader<'_>) -> Result<bool, Error> {
        Ok(input.read_u8()? != 0)
    }

    fn read_i8(input: &mut Reader<'_>) -> Result<i8, Error> {
        input.read_i8()
    }

    fn read_i16(input: &mut Reader<'_>) -> Result<i16, Error> {
        input.read_i16()
    }

    fn read_i32(input: &mut Reader<'_>) -> Result<i32, Error> {
        input.read_i32()
    }

    fn read_i64(input: &mut Reader<'_>) -> Result<i64, Error> {
        input.read_i64()
    }

    fn read_f32(input: &mut Reader<'_>) -> Result<f32, Error> {
        input.read_f32()
    }

    fn read_f64(input: &mut Reader<'_>) -> Result<f64, Error> {
        input.read_f64()
    }

    fn read_char(input: &mut Reader<'_>) -> Result<char, Error> {
        let code = input.read_u32()?;
        char::from_u32(code)
            .ok_or_else(|| Error::format(format!("invalid character code point {:#x}", code)))
    }

    fn read_text(input: &mut Reader<'_>) -> Result<String, Error> {
        let len = input.read_varuint32()? as usize;
        let raw = input.read_bytes(len)?;
        String::from_utf8(raw.to_vec())
            .map_err(|_| Error::format("invalid utf-8 in text payload"))
    }
}
