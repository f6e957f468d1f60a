// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Position-encoding plumbing shared by the built-in geoms.

extern crate alloc;

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Point;
use peniko::{Brush, Color};
use vista_core::DataSet;
use vista_view::{Coord, GeomError, GeomState, Scale, ScalePool, Setting};

/// The x/y field bindings, resolved scales, paint color, and lifecycle state every
/// built-in geom carries.
///
/// Geoms embed this and delegate the shared parts of the lifecycle contract to it;
/// only `paint` differs per mark kind.
#[derive(Debug)]
pub(crate) struct SeriesBase {
    state: GeomState,
    data: Option<Rc<DataSet>>,
    coord: Option<Coord>,
    x_field: Option<String>,
    y_field: Option<String>,
    x_scale: Option<Rc<Scale>>,
    y_scale: Option<Rc<Scale>>,
    color: Brush,
}

impl SeriesBase {
    pub(crate) fn new(default_color: Color) -> Self {
        Self {
            state: GeomState::Unattached,
            data: None,
            coord: None,
            x_field: None,
            y_field: None,
            x_scale: None,
            y_scale: None,
            color: Brush::Solid(default_color),
        }
    }

    pub(crate) fn state(&self) -> GeomState {
        self.state
    }

    pub(crate) fn set_data(&mut self, data: Rc<DataSet>) {
        self.data = Some(data);
    }

    pub(crate) fn set_coord(&mut self, coord: Coord) {
        self.coord = Some(coord);
    }

    /// Handles the settings every built-in geom shares: `x`, `y`, and `color`.
    pub(crate) fn configure(&mut self, key: &str, setting: &Setting) -> bool {
        match (key, setting) {
            ("x", Setting::Field(field)) => {
                self.x_field = Some(field.clone());
                true
            }
            ("y", Setting::Field(field)) => {
                self.y_field = Some(field.clone());
                true
            }
            ("color", Setting::Color(color)) => {
                self.color = Brush::Solid(*color);
                true
            }
            _ => false,
        }
    }

    /// Resolves the bound fields' scales through the pool.
    pub(crate) fn init(&mut self, scales: &mut ScalePool) -> Result<(), GeomError> {
        if self.state == GeomState::Destroyed {
            return Err(GeomError::Lifecycle {
                op: "init",
                state: self.state,
            });
        }
        self.x_scale = self.x_field.as_deref().map(|f| scales.scale(f));
        self.y_scale = self.y_field.as_deref().map(|f| scales.scale(f));
        self.state = GeomState::Initialized;
        Ok(())
    }

    /// Checks paint preconditions and returns the installed coordinate transform.
    pub(crate) fn require_paintable(&self) -> Result<Coord, GeomError> {
        let ready = matches!(
            self.state,
            GeomState::Initialized | GeomState::Painted | GeomState::Cleared
        );
        match self.coord {
            Some(coord) if ready => Ok(coord),
            _ => Err(GeomError::Lifecycle {
                op: "paint",
                state: self.state,
            }),
        }
    }

    /// Returns the normalized `(x, y)` position of every mappable row, in row order.
    ///
    /// Rows where either bound field is absent or cannot be positioned on its scale
    /// (nulls, labels outside the ordinal domain) are skipped.
    pub(crate) fn normalized(&self) -> Vec<Point> {
        let (Some(data), Some(xf), Some(yf), Some(xs), Some(ys)) = (
            self.data.as_ref(),
            self.x_field.as_deref(),
            self.y_field.as_deref(),
            self.x_scale.as_ref(),
            self.y_scale.as_ref(),
        ) else {
            return Vec::new();
        };
        data.rows()
            .iter()
            .filter_map(|row| {
                let nx = xs.map(row.get(xf)?)?;
                let ny = ys.map(row.get(yf)?)?;
                Some(Point::new(nx, ny))
            })
            .collect()
    }

    /// Returns the surface-space position of every mappable row, in row order.
    pub(crate) fn positions(&self, coord: Coord) -> Vec<Point> {
        self.normalized().iter().map(|p| coord.map(*p)).collect()
    }

    pub(crate) fn mark_painted(&mut self) {
        self.state = GeomState::Painted;
    }

    pub(crate) fn clear(&mut self) {
        if !matches!(self.state, GeomState::Unattached | GeomState::Destroyed) {
            self.state = GeomState::Cleared;
        }
    }

    pub(crate) fn destroy(&mut self) {
        self.state = GeomState::Destroyed;
        self.data = None;
        self.coord = None;
        self.x_scale = None;
        self.y_scale = None;
    }

    pub(crate) fn color(&self) -> Brush {
        self.color.clone()
    }

    pub(crate) fn x_scale(&self) -> Option<&Rc<Scale>> {
        self.x_scale.as_ref()
    }

    pub(crate) fn y_scale(&self) -> Option<&Rc<Scale>> {
        self.y_scale.as_ref()
    }

    pub(crate) fn row_count(&self) -> usize {
        self.data.as_ref().map_or(0, |d| d.len())
    }
}
