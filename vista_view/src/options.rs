// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The declarative options tree.
//!
//! Options are the single source of truth a view replays into its controllers: per-field
//! scale definitions, the coordinate descriptor, and the declared geoms. Absent
//! sub-trees normalize to empty defaults via [`Default`].

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::coord::CoordSpec;
use crate::geom::Setting;
use crate::scale::ScaleDef;

/// One declared geom: a mark kind plus its per-instance settings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeomOption {
    /// The mark-kind identifier looked up in the view's registry.
    pub kind: String,
    settings: Vec<(String, Setting)>,
}

impl GeomOption {
    /// Declares a geom of `kind` with no settings.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            settings: Vec::new(),
        }
    }

    /// Adds a setting, keeping declaration order.
    pub fn with(mut self, key: impl Into<String>, setting: impl Into<Setting>) -> Self {
        self.settings.push((key.into(), setting.into()));
        self
    }

    /// Returns the settings in declaration order.
    pub fn settings(&self) -> &[(String, Setting)] {
        &self.settings
    }
}

/// The full declarative configuration of a view.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewOptions {
    /// Per-field scale definitions.
    pub scales: HashMap<String, ScaleDef>,
    /// The coordinate descriptor.
    pub coord: CoordSpec,
    /// Declared geoms, instantiated in order when the options are applied.
    pub geoms: Vec<GeomOption>,
}

impl ViewOptions {
    /// Creates an empty options tree (cartesian coordinates, no scales, no geoms).
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a per-field scale definition.
    pub fn with_scale(mut self, field: impl Into<String>, def: ScaleDef) -> Self {
        self.scales.insert(field.into(), def);
        self
    }

    /// Sets the coordinate descriptor.
    pub fn with_coord(mut self, coord: CoordSpec) -> Self {
        self.coord = coord;
        self
    }

    /// Declares a geom.
    pub fn with_geom(mut self, geom: GeomOption) -> Self {
        self.geoms.push(geom);
        self
    }
}
