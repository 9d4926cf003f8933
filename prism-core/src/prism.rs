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

//! The engine facade.
//!
//! A [`Prism`] owns the model store and one serializer registry per
//! shipped target format. Construction registers the built-in families in
//! priority order: primitives, then strings, then structured objects.
//! Caller families registered afterwards rank below the built-ins, which
//! matches the common case of adding a fallback; a caller who needs to
//! shadow a built-in can build the registries by hand.

use std::any::Any;
use std::sync::Arc;

use crate::buffer;
use crate::error::Error;
use crate::format::{ByteStream, Node, Tree, TreeFormat};
use crate::model::{ModelStore, TypeModel};
use crate::resolver::{analyze, SerializerFactory, SerializerRegistry, TypePredicate};
use crate::serializer::ext_ref::{ExternalRegistry, StreamExternalRef, TreeExternalRef};
use crate::serializer::object::{StreamObjectSerializer, TreeObjectSerializer};
use crate::serializer::{
    Serializer, StreamBool, StreamChar, StreamF32, StreamF64, StreamI16, StreamI32, StreamI64,
    StreamI8, StreamText, TreeBool, TreeChar, TreeF32, TreeF64, TreeI16, TreeI32, TreeI64,
    TreeI8, TreeText,
};
use crate::types::TypeKey;

/// Family id of the built-in primitive leaf codecs.
pub const FAMILY_PRIMITIVES: &str = "prism:primitives";
/// Family id of the built-in string codec.
pub const FAMILY_STRING: &str = "prism:string";
/// Family id of the structured-object codec.
pub const FAMILY_OBJECT: &str = "prism:object";

pub struct Prism {
    models: Arc<ModelStore>,
    tree: SerializerRegistry<Tree>,
    stream: SerializerRegistry<ByteStream>,
}

impl Default for Prism {
    fn default() -> Prism {
        let prism = Prism {
            models: Arc::new(ModelStore::default()),
            tree: SerializerRegistry::default(),
            stream: SerializerRegistry::default(),
        };
        prism.register_builtins();
        prism
    }
}

impl Prism {
    fn register_builtins(&self) {
        self.register_family(FAMILY_PRIMITIVES, Arc::new(TypeKey::is_primitive));
        self.register_family(FAMILY_STRING, Arc::new(|ty| *ty == TypeKey::String));
        let models = self.models.clone();
        self.register_family(
            FAMILY_OBJECT,
            Arc::new(move |ty| match ty {
                TypeKey::Named { name, .. } => models.get(name).is_some(),
                _ => false,
            }),
        );

        // Family ids were just registered, so attaching impls cannot fail.
        let _ = self
            .tree
            .register_impl(FAMILY_PRIMITIVES, Arc::new(|_, ty| tree_primitive(ty)));
        let _ = self
            .stream
            .register_impl(FAMILY_PRIMITIVES, Arc::new(|_, ty| stream_primitive(ty)));
        let _ = self
            .tree
            .register_impl(FAMILY_STRING, Arc::new(|_, _| Ok(Arc::new(TreeText))));
        let _ = self
            .stream
            .register_impl(FAMILY_STRING, Arc::new(|_, _| Ok(Arc::new(StreamText))));

        let models = self.models.clone();
        let _ = self.tree.register_impl(
            FAMILY_OBJECT,
            Arc::new(move |registry, ty| {
                let analysis = analyze(&models, registry, ty)?;
                Ok(Arc::new(TreeObjectSerializer::new(analysis)))
            }),
        );
        let models = self.models.clone();
        let _ = self.stream.register_impl(
            FAMILY_OBJECT,
            Arc::new(move |registry, ty| {
                let analysis = analyze(&models, registry, ty)?;
                Ok(Arc::new(StreamObjectSerializer::new(analysis)))
            }),
        );
    }

    /// Registers a structured type. Duplicate names are a configuration
    /// error.
    pub fn register_model(&self, model: TypeModel) -> Result<(), Error> {
        self.models.register(model)
    }

    pub fn models(&self) -> &ModelStore {
        &self.models
    }

    /// Appends a serializer family to both target formats. Registration
    /// order is resolution priority: earlier families shadow later ones.
    pub fn register_family(&self, id: impl Into<String>, predicate: TypePredicate) {
        let id = id.into();
        self.tree.register(id.clone(), predicate.clone());
        self.stream.register(id, predicate);
    }

    /// Attaches the tree-format implementation of a registered family.
    pub fn register_tree_impl(
        &self,
        id: &str,
        factory: SerializerFactory<Tree>,
    ) -> Result<(), Error> {
        self.tree.register_impl(id, factory)
    }

    /// Attaches the byte-stream implementation of a registered family.
    pub fn register_stream_impl(
        &self,
        id: &str,
        factory: SerializerFactory<ByteStream>,
    ) -> Result<(), Error> {
        self.stream.register_impl(id, factory)
    }

    /// Registers a type that serializes by external-registry reference:
    /// only the identifier crosses the wire, and decode resolves it
    /// against `registry`.
    pub fn register_external(
        &self,
        ty: TypeKey,
        registry: Arc<ExternalRegistry>,
    ) -> Result<(), Error> {
        let id = format!("prism:external:{}", registry.name());
        let matched = ty.clone();
        self.register_family(id.clone(), Arc::new(move |candidate| *candidate == matched));
        let tree_registry = registry.clone();
        self.tree.register_impl(
            &id,
            Arc::new(move |_, _| Ok(Arc::new(TreeExternalRef::new(tree_registry.clone())))),
        )?;
        self.stream.register_impl(
            &id,
            Arc::new(move |_, _| Ok(Arc::new(StreamExternalRef::new(registry.clone())))),
        )
    }

    pub fn tree_registry(&self) -> &SerializerRegistry<Tree> {
        &self.tree
    }

    pub fn stream_registry(&self) -> &SerializerRegistry<ByteStream> {
        &self.stream
    }

    /// Encodes `value` as a tree document node.
    pub fn to_tree(&self, ty: &TypeKey, value: &dyn Any, sync: bool) -> Result<Node, Error> {
        let serializer = self.tree.resolve(ty)?.get()?;
        let mut node = Tree::new_value();
        serializer.write(value, &mut node, sync)?;
        Ok(node)
    }

    /// Decodes a value from a tree document node. For mutable structured
    /// types `existing` is updated in place; otherwise it is ignored.
    pub fn from_tree(
        &self,
        ty: &TypeKey,
        document: &Node,
        existing: Option<Box<dyn Any>>,
        sync: bool,
    ) -> Result<Box<dyn Any>, Error> {
        let serializer = self.tree.resolve(ty)?.get()?;
        let mut reader: &Node = document;
        serializer.read(&mut reader, existing, sync)
    }

    /// Encodes `value` as a flat byte stream.
    pub fn to_bytes(&self, ty: &TypeKey, value: &dyn Any, sync: bool) -> Result<Vec<u8>, Error> {
        let serializer = self.stream.resolve(ty)?.get()?;
        let mut writer = buffer::Writer::default();
        serializer.write(value, &mut writer, sync)?;
        Ok(writer.dump())
    }

    /// Decodes a value from a byte stream produced by [`to_bytes`] with
    /// the same type and sync mode.
    ///
    /// [`to_bytes`]: Prism::to_bytes
    pub fn from_bytes(
        &self,
        ty: &TypeKey,
        bytes: &[u8],
        existing: Option<Box<dyn Any>>,
        sync: bool,
    ) -> Result<Box<dyn Any>, Error> {
        let serializer = self.stream.resolve(ty)?.get()?;
        let mut reader = buffer::Reader::new(bytes);
        serializer.read(&mut reader, existing, sync)
    }
}

fn tree_primitive(ty: &TypeKey) -> Result<Arc<dyn Serializer<Tree>>, Error> {
    Ok(match ty {
        TypeKey::Bool => Arc::new(TreeBool),
        TypeKey::I8 => Arc::new(TreeI8),
        TypeKey::I16 => Arc::new(TreeI16),
        TypeKey::I32 => Arc::new(TreeI32),
        TypeKey::I64 => Arc::new(TreeI64),
        TypeKey::F32 => Arc::new(TreeF32),
        TypeKey::F64 => Arc::new(TreeF64),
        TypeKey::Char => Arc::new(TreeChar),
        other => {
            return Err(Error::resolution(format!(
                "type {} is not a primitive",
                other
            )))
        }
    })
}

fn stream_primitive(ty: &TypeKey) -> Result<Arc<dyn Serializer<ByteStream>>, Error> {
    Ok(match ty {
        TypeKey::Bool => Arc::new(StreamBool),
        TypeKey::I8 => Arc::new(StreamI8),
        TypeKey::I16 => Arc::new(StreamI16),
        TypeKey::I32 => Arc::new(StreamI32),
        TypeKey::I64 => Arc::new(StreamI64),
        TypeKey::F32 => Arc::new(StreamF32),
        TypeKey::F64 => Arc::new(StreamF64),
        TypeKey::Char => Arc::new(StreamChar),
        other => {
            return Err(Error::resolution(format!(
                "type {} is not a primitive",
                other
            )))
        }
    })
}
