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

use std::collections::HashMap;

use crate::error::Error;
use crate::format::{Format, Numeric, TreeFormat};

/// A node of the self-describing tree document.
///
/// Numeric nodes keep their stored width so cross-kind decode can apply
/// the clamping rules; booleans are stored as `I8` (0/1) and characters
/// as `I32` code points.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Text(String),
    Compound(HashMap<String, Node>),
}

impl Node {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::I8(_) => "i8",
            Node::I16(_) => "i16",
            Node::I32(_) => "i32",
            Node::I64(_) => "i64",
            Node::F32(_) => "f32",
            Node::F64(_) => "f64",
            Node::Text(_) => "text",
            Node::Compound(_) => "compound",
        }
    }

    pub fn is_compound(&self) -> bool {
        matches!(self, Node::Compound(_))
    }
}

/// The shipped tree-document format.
pub struct Tree;

impl Format for Tree {
    type Writer = Node;
    type Reader<'a> = &'a Node;
}

impl TreeFormat for Tree {
    fn new_document() -> Node {
        Node::Compound(HashMap::new())
    }

    fn new_value() -> Node {
        // placeholder; every leaf codec overwrites it
        Node::I8(0)
    }

    fn set_field(doc: &mut Node, key: &str, value: Node) -> Result<(), Error> {
        match doc {
            Node::Compound(map) => {
                map.insert(key.to_owned(), value);
                Ok(())
            }
            other => Err(Error::format(format!(
                "expected a compound document, found {} node",
                other.kind_name()
            ))),
        }
    }

    fn has_field(doc: &Self::Reader<'_>, key: &str) -> Result<bool, Error> {
        match *doc {
            Node::Compound(map) => Ok(map.contains_key(key)),
            other => Err(Error::format(format!(
                "expected a compound document, found {} node",
                other.kind_name()
            ))),
        }
    }

    fn get_field<'a>(
        doc: &Self::Reader<'a>,
        key: &str,
    ) -> Result<Option<Self::Reader<'a>>, Error> {
        match *doc {
            Node::Compound(map) => Ok(map.get(key)),
            other => Err(Error::format(format!(
                "expected a compound document, found {} node",
                other.kind_name()
            ))),
        }
    }

    fn put_bool(out: &mut Node, value: bool) {
        *out = Node::I8(if value { 1 } else { 0 });
    }

    fn put_i8(out: &mut Node, value: i8) {
        *out = Node::I8(value);
    }

    fn put_i16(out: &mut Node, value: i16) {
        *out = Node::I16(value);
    }

    fn put_i32(out: &mut Node, value: i32) {
        *out = Node::I32(value);
    }

    fn put_i64(out: &mut Node, value: i64) {
        *out = Node::I64(value);
    }

    fn put_f32(out: &mut Node, value: f32) {
        *out = Node::F32(value);
    }

    fn put_f64(out: &mut Node, value: f64) {
        *out = Node::F64(value);
    }

    fn put_char(out: &mut Node, value: char) {
        *out = Node::I32(value as i32);
    }

    fn put_text(out: &mut Node, value: &str) {
        *out = Node::Text(value.to_owned());
    }

    fn get_numeric(input: &Self::Reader<'_>) -> Result<Numeric, Error> {
        match *input {
            Node::I8(v) => Ok(Numeric::Int(*v as i64)),
            Node::I16(v) => Ok(Numeric::Int(*v as i64)),
            Node::I32(v) => Ok(Numeric::Int(*v as i64)),
            Node::I64(v) => Ok(Numeric::Int(*v)),
            Node::F32(v) => Ok(Numeric::Float(*v as f64)),
            Node::F64(v) => Ok(Numeric::Float(*v)),
            other => Err(Error::format(format!(
                "expected a numeric node, found {} node",
                other.kind_name()
            ))),
        }
    }

    fn get_text<'a>(input: &Self::Reader<'a>) -> Result<&'a str, Error> {
        match *input {
            Node::Text(s) => Ok(s.as_str()),
            other => Err(Error::format(format!(
                "expected a textual node, found {} node",
                other.kind_name()
            ))),
        }
    }
}
