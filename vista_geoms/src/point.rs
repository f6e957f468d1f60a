// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The point (scatter) mark.

extern crate alloc;

use alloc::rc::Rc;

use peniko::Color;
use vista_core::{DataSet, GroupId, Shape, Surface};
use vista_view::{Coord, Geom, GeomError, GeomState, ScalePool, Setting};

use crate::series::SeriesBase;

const DEFAULT_RADIUS: f64 = 3.0;
const DEFAULT_COLOR: Color = Color::from_rgb8(0x18, 0x90, 0xff);

/// Draws one filled circle per mappable row.
#[derive(Debug)]
pub struct PointGeom {
    base: SeriesBase,
    radius: f64,
}

impl PointGeom {
    /// Creates a point geom with the default radius and color.
    pub fn new() -> Self {
        Self {
            base: SeriesBase::new(DEFAULT_COLOR),
            radius: DEFAULT_RADIUS,
        }
    }
}

impl Default for PointGeom {
    fn default() -> Self {
        Self::new()
    }
}

impl Geom for PointGeom {
    fn kind(&self) -> &str {
        "point"
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
        // Replay semantics: repeated paints replace the group's shapes, never stack.
        surface.clear_group(group);
        for center in self.base.positions(coord) {
            surface.push(
                group,
                Shape::Circle {
                    center,
                    radius: self.radius,
                    fill: self.base.color(),
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
            ("size", Setting::Number(radius)) if *radius > 0.0 => {
                self.radius = *radius;
                true
            }
            _ => self.base.configure(key, setting),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn size_setting_is_validated() {
        let mut geom = PointGeom::new();
        assert!(geom.configure("size", &Setting::from(5.0)));
        assert_eq!(geom.radius, 5.0);
        assert!(!geom.configure("size", &Setting::from(-1.0)));
        assert!(!geom.configure("size", &Setting::from("a")));
        assert_eq!(geom.radius, 5.0);
    }
}
