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
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use prism_core::format::{Node, Tree, TreeFormat};
use prism_core::resolver::SerializerRegistry;
use prism_core::serializer::Serializer;
use prism_core::{Error, Prism, TypeKey};

/// Writes a fixed marker byte so tests can tell which family produced the
/// serializer.
struct MarkerSerializer(i8);

impl Serializer<Tree> for MarkerSerializer {
    fn write(&self, _value: &dyn Any, out: &mut Node, _sync: bool) -> Result<(), Error> {
        Tree::put_i8(out, self.0);
        Ok(())
    }

    fn read(
        &self,
        _input: &mut &Node,
        _existing: Option<Box<dyn Any>>,
        _sync: bool,
    ) -> Result<Box<dyn Any>, Error> {
        Ok(Box::new(self.0))
    }
}

#[test]
fn test_first_matching_family_wins() {
    let registry = SerializerRegistry::<Tree>::default();
    registry.register("first", Arc::new(|ty: &TypeKey| *ty == TypeKey::I32));
    registry.register("second", Arc::new(|ty: &TypeKey| ty.is_primitive()));
    registry
        .register_impl("first", Arc::new(|_, _| Ok(Arc::new(MarkerSerializer(1)))))
        .unwrap();
    registry
        .register_impl("second", Arc::new(|_, _| Ok(Arc::new(MarkerSerializer(2)))))
        .unwrap();

    // both predicates cover i32, but "first" was registered first
    let serializer = registry.resolve(&TypeKey::I32).unwrap().get().unwrap();
    let mut node = Tree::new_value();
    serializer.write(&0i32, &mut node, false).unwrap();
    assert_eq!(node, Node::I8(1));

    // "second" still catches the rest of the primitives
    let serializer = registry.resolve(&TypeKey::I64).unwrap().get().unwrap();
    let mut node = Tree::new_value();
    serializer.write(&0i64, &mut node, false).unwrap();
    assert_eq!(node, Node::I8(2));
}

#[test]
fn test_unmatched_type_is_a_resolution_error() {
    let prism = Prism::default();
    let err = prism
        .to_tree(&TypeKey::named("never_registered"), &0i32, false)
        .unwrap_err();
    assert!(matches!(err, Error::Resolution(_)));
}

#[test]
fn test_family_without_impl_for_a_format() {
    let prism = Prism::default();
    let ty = TypeKey::named("special");
    let matched = ty.clone();
    prism.register_family("special", Arc::new(move |t: &TypeKey| *t == matched));
    prism
        .register_tree_impl("special", Arc::new(|_, _| Ok(Arc::new(MarkerSerializer(9)))))
        .unwrap();

    // the family is known to both formats; only the stream side lacks an
    // implementation, and only on first use
    assert!(prism.to_tree(&ty, &0i32, false).is_ok());
    let err = prism.to_bytes(&ty, &0i32, false).unwrap_err();
    assert!(matches!(err, Error::Resolution(_)));
}

#[test]
fn test_factory_runs_once_and_lazily() {
    let registry = SerializerRegistry::<Tree>::default();
    registry.register("counted", Arc::new(|ty: &TypeKey| *ty == TypeKey::I8));
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    registry
        .register_impl(
            "counted",
            Arc::new(move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Arc::new(MarkerSerializer(3)))
            }),
        )
        .unwrap();

    let first = registry.resolve(&TypeKey::I8).unwrap();
    let second = registry.resolve(&TypeKey::I8).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let a = first.get().unwrap();
    let b = second.get().unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn test_concurrent_resolution_yields_one_serializer() {
    let prism = Arc::new(Prism::default());
    let mut handles = vec![];
    for _ in 0..8 {
        let prism = Arc::clone(&prism);
        handles.push(thread::spawn(move || {
            prism
                .tree_registry()
                .resolve(&TypeKey::I64)
                .unwrap()
                .get()
                .unwrap()
        }));
    }
    let serializers: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for serializer in &serializers[1..] {
        assert!(Arc::ptr_eq(&serializers[0], serializer));
    }
}

#[test]
fn test_resolution_is_memoized_per_type_argument() {
    let prism = Prism::default();
    prism.register_model(prism_tests::pair_model()).unwrap();

    let of_i32 = prism
        .tree_registry()
        .resolve(&TypeKey::generic("pair", vec![TypeKey::I32]))
        .unwrap();
    let of_i64 = prism
        .tree_registry()
        .resolve(&TypeKey::generic("pair", vec![TypeKey::I64]))
        .unwrap();
    assert_ne!(of_i32.key(), of_i64.key());

    let again = prism
        .tree_registry()
        .resolve(&TypeKey::generic("pair", vec![TypeKey::I32]))
        .unwrap();
    assert_eq!(of_i32.key(), again.key());
}
