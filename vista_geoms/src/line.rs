// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The line mark.

extern crate alloc;

use alloc::rc::Rc;

use kurbo::BezPath;
use peniko::Color;
use vista_core::{DataSet, GroupId, Shape, Surface};
use vista_view::{Coord, Geom, GeomError, GeomState, ScalePool, Setting};

use crate::series::SeriesBase;

const DEFAULT_STROKE_WIDTH: f64 = 2.0;
const DEFAULT_COLOR: Color = Color::from_rgb8(0x2f, 0xc2, 0x5b);

/// Connects the mappable rows with a single stroked polyline, in row order.
///
/// Row order is the series order; unmappable rows are dropped, not broken into
/// separate segments.
#[derive(Debug)]
pub struct LineGeom {
    base: SeriesBase,
    stroke_width: f64,
}

impl LineGeom {
    /// Creates a line geom with the default stroke width and color.
    pub fn new() -> Self {
        Self {
            base: SeriesBase::new(DEFAULT_COLOR),
            stroke_width: DEFAULT_STROKE_WIDTH,
        }
    }
}

impl Default for LineGeom {
    fn default() -> Self {
        Self::new()
    }
}

impl Geom for LineGeom {
    fn kind(&self) -> &str {
        "line"
    }

    fn state(&self) -> GeomState {
        self.base.state()
    }

    fn set_data(&mut self, data: Rc<DataSet>) {
        self.base.set_data(data);
    }

    fn init(&mut self, scales: &mut ScalePool) -> Result<(), GeomError> {
        self.base.init(scales)
    }

    fn set_coord(&mut self, coord: Coord) {
        self.base.set_coord(coord);
    }

    fn paint(&mut self, surface: &mut dyn Surface, group: GroupId) -> Result<(), GeomError> {
        let coord = self.base.require_paintable()?;
        surface.clear_group(group);
        let positions = self.base.positions(coord);
        if positions.len() >= 2 {
            let mut path = BezPath::new();
            path.move_to(positions[0]);
            for p in &positions[1..] {
                path.line_to(*p);
            }
            surface.push(
                group,
                Shape::Path {
                    path,
                    stroke: self.base.color(),
                    stroke_width: self.stroke_width,
                },
            )?;
        }
        self.base.mark_painted();
        Ok(())
    }

    fn clear(&mut self, surface: &mut dyn Surface, group: GroupId) {
        surface.clear_group(group);
        self.base.clear();
    }

    fn destroy(&mut self) {
        self.base.destroy();
    }

    fn configure(&mut self, key: &str, setting: &Setting) -> bool {
        match (key, setting) {
            ("size", Setting::Number(width)) if *width > 0.0 => {
                self.stroke_width = *width;
                true
            }
            _ => self.base.configure(key, setting),
        }
    }
}
