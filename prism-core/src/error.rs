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

use thiserror::Error;

/// Set `PRISM_PANIC_ON_ERROR=1` at compile time to panic at the exact
/// location an error is created, with a full stack trace. Debugging aid
/// only; release builds leave it unset.
pub const PANIC_ON_ERROR: bool = option_env!("PRISM_PANIC_ON_ERROR").is_some();

/// Error type for all Prism operations.
///
/// Construct variants through the static constructor functions
/// ([`Error::configuration`], [`Error::resolution`], [`Error::format`],
/// [`Error::deserialization`]) rather than the enum syntax; the
/// constructors handle message conversion and the
/// `PRISM_PANIC_ON_ERROR` debug hook.
///
/// The taxonomy:
///
/// - [`Error::Configuration`]: a type model cannot be serialized as
///   declared (missing constructor, invalid flag combination, malformed
///   accessor table). Raised once, at analysis time.
/// - [`Error::Resolution`]: no registered serializer family matches a
///   requested type. Raised at first use of the type.
/// - [`Error::Format`]: malformed input at decode time, such as a
///   truncated stream, a wrong null-presence vector length, or an
///   unexpected node kind. Recoverable by the caller, never silently
///   ignored.
/// - [`Error::Deserialization`]: a decoded identifier does not resolve to
///   any known instance in an external registry.
///
/// All of these propagate to the immediate caller of encode/decode;
/// nothing is caught and downgraded internally, and there is no retry
/// logic. Numeric overflow during primitive decode is *not* an error; it
/// is defined clamping.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A type model cannot be serialized as declared.
    #[error("{0}")]
    Configuration(Cow<'static, str>),

    /// No registered serializer family matches the requested type.
    #[error("{0}")]
    Resolution(Cow<'static, str>),

    /// Malformed input encountered while decoding.
    #[error("{0}")]
    Format(Cow<'static, str>),

    /// A decoded reference has no known target instance.
    #[error("{0}")]
    Deserialization(Cow<'static, str>),
}

impl Error {
    /// Creates a new [`Error::Configuration`] from a string or static message.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn configuration<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::Configuration(s.into());
        if PANIC_ON_ERROR {
            panic!("PRISM_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::Resolution`] from a string or static message.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn resolution<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::Resolution(s.into());
        if PANIC_ON_ERROR {
            panic!("PRISM_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::Format`] from a string or static message.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn format<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::Format(s.into());
        if PANIC_ON_ERROR {
            panic!("PRISM_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::Deserialization`] from a string or static message.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn deserialization<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::Deserialization(s.into());
        if PANIC_ON_ERROR {
            panic!("PRISM_PANIC_ON_ERROR: {}", err);
        }
        err
    }
}

/// Ensures a condition is true; otherwise returns the given [`enum@Error`].
///
/// ```rust
/// use prism_core::ensure;
/// use prism_core::error::Error;
///
/// fn check(n: usize, expected: usize) -> Result<(), Error> {
///     ensure!(n == expected, Error::format("length mismatch"));
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
}

/// Returns early with the given [`enum@Error`].
#[macro_export]
macro_rules! bail {
    ($err:expr) => {
        return Err($err)
    };
}
