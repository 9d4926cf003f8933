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

use std::sync::Arc;

use prism_tests::unbox;
use prism_core::format::Node;
use prism_core::serializer::ext_ref::ExternalRegistry;
use prism_core::{Error, Prism, TypeKey};

#[derive(Clone, Debug, PartialEq)]
struct Element {
    id: &'static str,
    weight: f64,
}

const ELEMENTS: [Element; 2] = [
    Element {
        id: "iron",
        weight: 55.8,
    },
    Element {
        id: "gold",
        weight: 197.0,
    },
];

fn element_registry() -> Arc<ExternalRegistry> {
    Arc::new(ExternalRegistry::new(
        "element",
        |id| {
            ELEMENTS
                .iter()
                .find(|e| e.id == id)
                .map(|e| Box::new(e.clone()) as Box<dyn std::any::Any>)
        },
        |value| {
            value
                .downcast_ref::<Element>()
                .map(|e| e.id.to_owned())
                .ok_or_else(|| Error::configuration("value is not an element"))
        },
    ))
}

#[test]
fn test_external_reference_round_trips_as_an_identifier() {
    let prism = Prism::default();
    let ty = TypeKey::named("element");
    prism.register_external(ty.clone(), element_registry()).unwrap();

    let gold = ELEMENTS[1].clone();
    let doc = prism.to_tree(&ty, &gold, false).unwrap();
    assert_eq!(doc, Node::Text(String::from("gold")));
    let decoded = unbox::<Element>(prism.from_tree(&ty, &doc, None, false).unwrap());
    assert_eq!(decoded, gold);

    let bytes = prism.to_bytes(&ty, &gold, false).unwrap();
    let decoded = unbox::<Element>(prism.from_bytes(&ty, &bytes, None, false).unwrap());
    assert_eq!(decoded, gold);
}

#[test]
fn test_unknown_identifier_is_a_deserialization_error() {
    let prism = Prism::default();
    let ty = TypeKey::named("element");
    prism.register_external(ty.clone(), element_registry()).unwrap();

    let err = prism
        .from_tree(&ty, &Node::Text(String::from("mithril")), None, false)
        .unwrap_err();
    assert!(matches!(err, Error::Deserialization(_)));
}

#[test]
fn test_externally_referenced_field_inside_an_object() {
    let prism = Prism::default();
    let ty = TypeKey::named("element");
    prism.register_external(ty.clone(), element_registry()).unwrap();

    #[derive(Clone, Debug, PartialEq, Default)]
    struct Ingot {
        count: i32,
        metal: Option<Element>,
    }

    use prism_core::model::{getter_of, setter_of, zero_constructor_of, TypeModel};
    let model = TypeModel::new("ingot")
        .savable()
        .field(
            "count",
            TypeKey::I32,
            0,
            getter_of(|i: &Ingot| Some(i.count)),
            Some(setter_of(|i: &mut Ingot, v: Option<i32>| {
                i.count = v.unwrap_or_default()
            })),
        )
        .field(
            "metal",
            TypeKey::named("element"),
            0,
            getter_of(|i: &Ingot| i.metal.clone()),
            Some(setter_of(|i: &mut Ingot, v: Option<Element>| i.metal = v)),
        )
        .zero_constructor(zero_constructor_of::<Ingot>());
    prism.register_model(model).unwrap();

    let ingot = Ingot {
        count: 4,
        metal: Some(ELEMENTS[0].clone()),
    };
    let ingot_ty = TypeKey::named("ingot");
    let doc = prism.to_tree(&ingot_ty, &ingot, false).unwrap();
    match &doc {
        Node::Compound(map) => {
            assert_eq!(map.get("metal"), Some(&Node::Text(String::from("iron"))))
        }
        other => panic!("expected a compound node, got {:?}", other),
    }
    let decoded = unbox::<Ingot>(prism.from_tree(&ingot_ty, &doc, None, false).unwrap());
    assert_eq!(decoded, ingot);
}
