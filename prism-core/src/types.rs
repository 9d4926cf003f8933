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

use std::borrow::Cow;
use std::fmt;

use crate::error::Error;

/// Flags attached to a persistent field in a type model.
pub mod field_flags {
    /// The field cannot be reassigned after construction. A type in which
    /// every persistent field is final is treated as immutable and is
    /// reconstructed through a matching constructor.
    pub const FINAL: u8 = 1;
    /// The field is excluded from implicit inclusion.
    pub const TRANSIENT: u8 = 1 << 1;
    /// The field was explicitly marked for serialization. If any field of
    /// a type carries this flag, only the flagged fields are persistent.
    pub const ANNOTATED: u8 = 1 << 2;
    /// The field is skipped in sync-mode payloads.
    pub const NO_SYNC: u8 = 1 << 3;
}

/// Structurally comparable identifier for a serializable data type.
///
/// Keys serializer caches, so equality and hashing are structural.
/// Parameterized types carry their own type arguments; a field of a
/// generic type may be declared as a [`TypeKey::Var`] bound to the owning
/// type's arguments and is substituted during analysis.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKey {
    Bool,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Char,
    String,
    /// A named (possibly parameterized) structured type.
    Named {
        name: Cow<'static, str>,
        args: Vec<TypeKey>,
    },
    /// A type variable: an index into the owning type's argument list.
    Var(usize),
}

impl TypeKey {
    /// A named type with no type arguments.
    pub fn named(name: impl Into<Cow<'static, str>>) -> TypeKey {
        TypeKey::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// A named type with the given type arguments.
    pub fn generic(name: impl Into<Cow<'static, str>>, args: Vec<TypeKey>) -> TypeKey {
        TypeKey::Named {
            name: name.into(),
            args,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            TypeKey::Bool
                | TypeKey::I8
                | TypeKey::I16
                | TypeKey::I32
                | TypeKey::I64
                | TypeKey::F32
                | TypeKey::F64
                | TypeKey::Char
        )
    }

    /// The name of a named type, if this is one.
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeKey::Named { name, .. } => Some(name.as_ref()),
            _ => None,
        }
    }

    /// Replaces type variables with the owning type's arguments.
    ///
    /// A variable index past the end of `args` is a configuration error:
    /// the model declared more variables than the concrete key supplies.
    pub fn substitute(&self, args: &[TypeKey]) -> Result<TypeKey, Error> {
        match self {
            TypeKey::Var(index) => args.get(*index).cloned().ok_or_else(|| {
                Error::configuration(format!(
                    "type variable {} is out of range for {} type argument(s)",
                    index,
                    args.len()
                ))
            }),
            TypeKey::Named { name, args: own } => {
                let mut substituted = Vec::with_capacity(own.len());
                for arg in own {
                    substituted.push(arg.substitute(args)?);
                }
                Ok(TypeKey::Named {
                    name: name.clone(),
                    args: substituted,
                })
            }
            other => Ok(other.clone()),
        }
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKey::Bool => write!(f, "bool"),
            TypeKey::I8 => write!(f, "i8"),
            TypeKey::I16 => write!(f, "i16"),
            TypeKey::I32 => write!(f, "i32"),
            TypeKey::I64 => write!(f, "i64"),
            TypeKey::F32 => write!(f, "f32"),
            TypeKey::F64 => write!(f, "f64"),
            TypeKey::Char => write!(f, "char"),
            TypeKey::String => write!(f, "string"),
            TypeKey::Named { name, args } => {
                write!(f, "{}", name)?;
                if !args.is_empty() {
                    write!(f, "<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            TypeKey::Var(index) => write!(f, "${}", index),
        }
    }
}
