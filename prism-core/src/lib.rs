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

//! # Prism Core
//!
//! Prism is a structured-object codec. Callers describe their types once
//! (field names, declared types, flags, accessors, constructors) and the
//! engine encodes and decodes values of those types against pluggable
//! target formats.
//!
//! ## Architecture
//!
//! - **`model`**: type models and the process-wide field metadata cache
//! - **`format`**: the target codec abstraction and the two shipped
//!   formats (self-describing tree documents and flat byte streams)
//! - **`resolver`**: the serializer registry (ordered predicate families,
//!   lazy memoized resolution) and per-type analysis
//! - **`serializer`**: leaf codecs and the object codec
//! - **`buffer`**: little-endian binary Writer/Reader
//! - **`prism`**: the [`Prism`] facade tying everything together
//! - **`error`**: error handling and result types
//!
//! ## Key concepts
//!
//! A value is serialized for a *target format* in one of two *sync modes*:
//! full mode carries every persistent field, sync mode omits fields marked
//! `NO_SYNC` (intended for lightweight replication). The tree format keys
//! fields by name and signals null by key absence; the byte-stream format
//! is positional and prefixes each object with a null-presence bit vector.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use prism_core::prism::Prism;
//! use prism_core::types::TypeKey;
//!
//! let mut prism = Prism::default();
//! prism.register_model(my_model())?;
//! let doc = prism.to_tree(&TypeKey::named("my_type"), &value, false)?;
//! ```

pub mod buffer;
pub mod error;
pub mod format;
pub mod model;
pub mod prism;
pub mod resolver;
pub mod serializer;
pub mod types;
mod util;

pub use error::Error;
pub use prism::Prism;
pub use types::TypeKey;
