// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recoverable configuration diagnostics.
//!
//! Configuration mismatches (unknown mark kinds, settings a geom does not understand,
//! options referencing fields the data never carries) do not abort a render. They are
//! collected on the [`View`](crate::View) instead, and callers drain them with
//! [`View::take_diagnostics`](crate::View::take_diagnostics). Sequencing violations and
//! collaborator failures are typed errors, not diagnostics.

extern crate alloc;

use alloc::string::String;
use core::fmt;

/// A recoverable configuration mismatch observed while applying options or rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// A declared geom option names a kind the registry does not know.
    UnknownGeomKind(String),
    /// A geom option carries a setting key the created geom does not expose.
    UnknownGeomSetting {
        /// The geom kind the setting was applied to.
        kind: String,
        /// The unrecognized setting key.
        key: String,
    },
    /// A scale was requested for a field no record carries.
    MissingField(String),
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownGeomKind(kind) => write!(f, "unknown geom kind `{kind}`"),
            Self::UnknownGeomSetting { kind, key } => {
                write!(f, "geom `{kind}` has no setting `{key}`")
            }
            Self::MissingField(field) => {
                write!(f, "scale requested for field `{field}` absent from the data")
            }
        }
    }
}
