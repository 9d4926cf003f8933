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

use prism_tests::unbox;
use prism_core::format::Node;
use prism_core::model::{
    getter_of, setter_of, take_arg, zero_constructor_of, ConstructorModel, TypeModel,
};
use prism_core::types::{field_flags, TypeKey};
use prism_core::{Error, Prism};

#[derive(Clone, Debug, PartialEq, Default)]
struct Sample {
    a: i32,
    b: i32,
}

#[test]
fn test_immutable_type_rejects_no_sync_fields() {
    let prism = Prism::default();
    let model = TypeModel::new("frozen")
        .savable()
        .field(
            "a",
            TypeKey::I32,
            field_flags::FINAL,
            getter_of(|s: &Sample| Some(s.a)),
            None,
        )
        .field(
            "b",
            TypeKey::I32,
            field_flags::FINAL | field_flags::NO_SYNC,
            getter_of(|s: &Sample| Some(s.b)),
            None,
        )
        .constructor(ConstructorModel::new(
            vec![("a", TypeKey::I32), ("b", TypeKey::I32)],
            |mut args| {
                let a = take_arg::<i32>(&mut args, 0)?.unwrap_or_default();
                let b = take_arg::<i32>(&mut args, 1)?.unwrap_or_default();
                Ok(Box::new(Sample { a, b }))
            },
        ));
    prism.register_model(model).unwrap();

    let err = prism
        .to_tree(&TypeKey::named("frozen"), &Sample::default(), false)
        .unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}

#[test]
fn test_mutable_type_requires_a_zero_constructor() {
    let prism = Prism::default();
    let model = TypeModel::new("no_ctor").savable().field(
        "a",
        TypeKey::I32,
        0,
        getter_of(|s: &Sample| Some(s.a)),
        Some(setter_of(|s: &mut Sample, v: Option<i32>| {
            s.a = v.unwrap_or_default()
        })),
    );
    prism.register_model(model).unwrap();

    let err = prism
        .to_tree(&TypeKey::named("no_ctor"), &Sample::default(), false)
        .unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}

#[test]
fn test_mutable_field_requires_a_setter() {
    let prism = Prism::default();
    let model = TypeModel::new("half_settable")
        .savable()
        .field(
            "a",
            TypeKey::I32,
            0,
            getter_of(|s: &Sample| Some(s.a)),
            Some(setter_of(|s: &mut Sample, v: Option<i32>| {
                s.a = v.unwrap_or_default()
            })),
        )
        .field(
            "b",
            TypeKey::I32,
            0,
            getter_of(|s: &Sample| Some(s.b)),
            None,
        )
        .zero_constructor(zero_constructor_of::<Sample>());
    prism.register_model(model).unwrap();

    let err = prism
        .to_tree(&TypeKey::named("half_settable"), &Sample::default(), false)
        .unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}

#[test]
fn test_immutable_type_requires_an_exactly_matching_constructor() {
    let prism = Prism::default();
    // constructor misses field "b"
    let model = TypeModel::new("partial_ctor")
        .savable()
        .field(
            "a",
            TypeKey::I32,
            field_flags::FINAL,
            getter_of(|s: &Sample| Some(s.a)),
            None,
        )
        .field(
            "b",
            TypeKey::I32,
            field_flags::FINAL,
            getter_of(|s: &Sample| Some(s.b)),
            None,
        )
        .constructor(ConstructorModel::new(
            vec![("a", TypeKey::I32)],
            |mut args| {
                let a = take_arg::<i32>(&mut args, 0)?.unwrap_or_default();
                Ok(Box::new(Sample { a, b: 0 }))
            },
        ));
    prism.register_model(model).unwrap();

    let err = prism
        .to_tree(&TypeKey::named("partial_ctor"), &Sample::default(), false)
        .unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}

#[test]
fn test_constructor_with_duplicate_parameters_is_rejected() {
    let prism = Prism::default();
    // parameters (a, a) must not match fields {a, b}: each parameter has
    // to claim a distinct field
    let model = TypeModel::new("double_a")
        .savable()
        .field(
            "a",
            TypeKey::I32,
            field_flags::FINAL,
            getter_of(|s: &Sample| Some(s.a)),
            None,
        )
        .field(
            "b",
            TypeKey::I32,
            field_flags::FINAL,
            getter_of(|s: &Sample| Some(s.b)),
            None,
        )
        .constructor(ConstructorModel::new(
            vec![("a", TypeKey::I32), ("a", TypeKey::I32)],
            |mut args| {
                let a = take_arg::<i32>(&mut args, 0)?.unwrap_or_default();
                Ok(Box::new(Sample { a, b: 0 }))
            },
        ));
    prism.register_model(model).unwrap();

    let err = prism
        .to_tree(&TypeKey::named("double_a"), &Sample::default(), false)
        .unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}

#[test]
fn test_annotated_fields_shadow_the_savable_set() {
    let prism = Prism::default();
    let model = TypeModel::new("annotated")
        .savable()
        .field(
            "a",
            TypeKey::I32,
            field_flags::ANNOTATED,
            getter_of(|s: &Sample| Some(s.a)),
            Some(setter_of(|s: &mut Sample, v: Option<i32>| {
                s.a = v.unwrap_or_default()
            })),
        )
        .field(
            "b",
            TypeKey::I32,
            0,
            getter_of(|s: &Sample| Some(s.b)),
            Some(setter_of(|s: &mut Sample, v: Option<i32>| {
                s.b = v.unwrap_or_default()
            })),
        )
        .zero_constructor(zero_constructor_of::<Sample>());
    prism.register_model(model).unwrap();

    let ty = TypeKey::named("annotated");
    let doc = prism
        .to_tree(&ty, &Sample { a: 1, b: 2 }, false)
        .unwrap();
    match &doc {
        Node::Compound(map) => {
            assert!(map.contains_key("a"));
            assert!(!map.contains_key("b"));
        }
        other => panic!("expected a compound node, got {:?}", other),
    }
}

#[test]
fn test_transient_fields_are_excluded() {
    let prism = Prism::default();
    let model = TypeModel::new("with_transient")
        .savable()
        .field(
            "a",
            TypeKey::I32,
            0,
            getter_of(|s: &Sample| Some(s.a)),
            Some(setter_of(|s: &mut Sample, v: Option<i32>| {
                s.a = v.unwrap_or_default()
            })),
        )
        .field(
            "b",
            TypeKey::I32,
            field_flags::TRANSIENT,
            getter_of(|s: &Sample| Some(s.b)),
            Some(setter_of(|s: &mut Sample, v: Option<i32>| {
                s.b = v.unwrap_or_default()
            })),
        )
        .zero_constructor(zero_constructor_of::<Sample>());
    prism.register_model(model).unwrap();

    let ty = TypeKey::named("with_transient");
    let doc = prism.to_tree(&ty, &Sample { a: 1, b: 2 }, false).unwrap();
    let decoded = unbox::<Sample>(prism.from_tree(&ty, &doc, None, false).unwrap());
    assert_eq!(decoded, Sample { a: 1, b: 0 });
}

#[test]
fn test_type_with_no_persistent_fields_is_valid() {
    let prism = Prism::default();
    // not marked savable and nothing annotated: empty field set
    let model = TypeModel::new("opaque")
        .field(
            "a",
            TypeKey::I32,
            0,
            getter_of(|s: &Sample| Some(s.a)),
            Some(setter_of(|s: &mut Sample, v: Option<i32>| {
                s.a = v.unwrap_or_default()
            })),
        )
        .zero_constructor(zero_constructor_of::<Sample>());
    prism.register_model(model).unwrap();

    let ty = TypeKey::named("opaque");
    let doc = prism.to_tree(&ty, &Sample { a: 5, b: 6 }, false).unwrap();
    assert_eq!(doc, Node::Compound(Default::default()));
    let decoded = unbox::<Sample>(prism.from_tree(&ty, &doc, None, false).unwrap());
    assert_eq!(decoded, Sample::default());
}

#[test]
fn test_duplicate_model_registration_fails() {
    let prism = Prism::default();
    prism.register_model(TypeModel::new("dup")).unwrap();
    let err = prism.register_model(TypeModel::new("dup")).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}

#[test]
fn test_type_variable_out_of_range() {
    let prism = Prism::default();
    let model = TypeModel::new("loose_var")
        .savable()
        .field(
            "a",
            TypeKey::Var(1),
            0,
            getter_of(|s: &Sample| Some(s.a)),
            Some(setter_of(|s: &mut Sample, v: Option<i32>| {
                s.a = v.unwrap_or_default()
            })),
        )
        .zero_constructor(zero_constructor_of::<Sample>());
    prism.register_model(model).unwrap();

    // only one type argument is supplied, but the field names variable 1
    let ty = TypeKey::generic("loose_var", vec![TypeKey::I32]);
    let err = prism
        .to_tree(&ty, &Sample::default(), false)
        .unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}
