// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end pipeline tests: declarative options through the view into drawn shapes.

use kurbo::Point;
use vista_core::{Canvas, DataSet, Record, Shape};
use vista_geoms::default_registry;
use vista_view::{
    CoordCfg, CoordKind, GeomOption, ScaleDef, View, ViewConfig, ViewOptions,
};

fn region_config() -> ViewConfig {
    ViewConfig::new().with_region(Point::new(0.0, 100.0), Point::new(100.0, 0.0))
}

fn sample_data() -> DataSet {
    [
        Record::new().with("a", 1.0).with("b", 2.0),
        Record::new().with("a", 2.0).with("b", 4.0),
    ]
    .into_iter()
    .collect()
}

fn close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

#[test]
fn declared_point_chart_renders_circles() {
    let options =
        ViewOptions::new().with_geom(GeomOption::new("point").with("x", "a").with("y", "b"));
    let mut view = View::new(
        Canvas::new(),
        default_registry(),
        region_config().with_options(options),
    )
    .unwrap();
    view.source(sample_data());
    view.render().unwrap();

    assert!(view.diagnostics().is_empty());
    assert!(view.active_coord().is_some());
    assert!(view.has_cached_scale("a"));
    assert!(view.has_cached_scale("b"));

    let group = view.group_of(view.geom_ids()[0]).unwrap();
    let shapes = view.surface().shapes_in(group).unwrap();
    assert_eq!(shapes.len(), 2);
    assert!(shapes.iter().all(|s| matches!(s, Shape::Circle { .. })));
}

#[test]
fn scale_overrides_position_marks_exactly() {
    let options = ViewOptions::new()
        .with_scale("a", ScaleDef::new().with_min(0.0).with_max(10.0))
        .with_scale("b", ScaleDef::new().with_min(0.0).with_max(10.0))
        .with_geom(GeomOption::new("point").with("x", "a").with("y", "b"));
    let mut view = View::new(
        Canvas::new(),
        default_registry(),
        region_config().with_options(options),
    )
    .unwrap();
    view.source([Record::new().with("a", 5.0).with("b", 5.0)].into_iter().collect());
    view.render().unwrap();

    let shapes: Vec<_> = view.surface().shapes().collect();
    assert_eq!(shapes.len(), 1);
    // Domain midpoint lands at the region midpoint on both (y-flipped) axes.
    let Shape::Circle { center, .. } = shapes[0] else {
        panic!("expected a circle, got {:?}", shapes[0]);
    };
    assert!(close(*center, Point::new(50.0, 50.0)));
}

#[test]
fn line_connects_rows_in_order() {
    let data: DataSet = [
        Record::new().with("a", 1.0).with("b", 1.0),
        Record::new().with("a", 2.0).with("b", 3.0),
        Record::new().with("a", 3.0).with("b", 2.0),
    ]
    .into_iter()
    .collect();
    let options =
        ViewOptions::new().with_geom(GeomOption::new("line").with("x", "a").with("y", "b"));
    let mut view = View::new(
        Canvas::new(),
        default_registry(),
        region_config().with_options(options),
    )
    .unwrap();
    view.source(data);
    view.render().unwrap();

    let shapes: Vec<_> = view.surface().shapes().collect();
    assert_eq!(shapes.len(), 1);
    let Shape::Path { path, .. } = shapes[0] else {
        panic!("expected a path, got {:?}", shapes[0]);
    };
    // One on-curve point per row: a move plus two line segments.
    assert_eq!(path.elements().len(), 3);
}

#[test]
fn interval_draws_one_bar_per_category() {
    let data: DataSet = [
        Record::new().with("cat", "east").with("v", 1.0),
        Record::new().with("cat", "west").with("v", 3.0),
        Record::new().with("cat", "north").with("v", 2.0),
    ]
    .into_iter()
    .collect();
    let options = ViewOptions::new()
        .with_geom(GeomOption::new("interval").with("x", "cat").with("y", "v"));
    let mut view = View::new(
        Canvas::new(),
        default_registry(),
        region_config().with_options(options),
    )
    .unwrap();
    view.source(data);
    view.render().unwrap();

    let bars: Vec<_> = view
        .surface()
        .shapes()
        .map(|s| match s {
            Shape::Rect { rect, .. } => *rect,
            other => panic!("expected a rect, got {other:?}"),
        })
        .collect();
    assert_eq!(bars.len(), 3);
    // Equal widths, heights ordered by value.
    assert!((bars[0].width() - bars[1].width()).abs() < 1e-9);
    assert!((bars[1].width() - bars[2].width()).abs() < 1e-9);
    assert!(bars[1].height() > bars[2].height());
    assert!(bars[2].height() > bars[0].height());
}

#[test]
fn change_data_redraws_to_the_new_row_count() {
    let options =
        ViewOptions::new().with_geom(GeomOption::new("point").with("x", "a").with("y", "b"));
    let mut view = View::new(
        Canvas::new(),
        default_registry(),
        region_config().with_options(options),
    )
    .unwrap();
    view.source(sample_data());
    view.render().unwrap();
    assert_eq!(view.surface().shape_count(), 2);

    let new_data: DataSet = [
        Record::new().with("a", 1.0).with("b", 1.0),
        Record::new().with("a", 2.0).with("b", 2.0),
        Record::new().with("a", 3.0).with("b", 3.0),
    ]
    .into_iter()
    .collect();
    view.change_data(new_data).unwrap();
    assert_eq!(view.surface().shape_count(), 3);
}

#[test]
fn rows_missing_an_encoded_field_are_skipped() {
    let data: DataSet = [
        Record::new().with("a", 1.0).with("b", 2.0),
        Record::new().with("a", 2.0),
    ]
    .into_iter()
    .collect();
    let options =
        ViewOptions::new().with_geom(GeomOption::new("point").with("x", "a").with("y", "b"));
    let mut view = View::new(
        Canvas::new(),
        default_registry(),
        region_config().with_options(options),
    )
    .unwrap();
    view.source(data);
    view.render().unwrap();
    assert_eq!(view.surface().shape_count(), 1);
}

#[test]
fn polar_points_stay_inside_the_inscribed_circle() {
    let mut view = View::new(Canvas::new(), default_registry(), region_config()).unwrap();
    view.source(sample_data());
    let id = view.attach("point").unwrap().unwrap();
    assert!(view.configure_geom(id, "x", "a"));
    assert!(view.configure_geom(id, "y", "b"));
    view.coord(CoordKind::Polar, CoordCfg::new());
    view.render().unwrap();

    assert_eq!(view.active_coord().unwrap().kind(), CoordKind::Polar);
    let center = Point::new(50.0, 50.0);
    for shape in view.surface().shapes() {
        let Shape::Circle { center: c, .. } = shape else {
            panic!("expected a circle, got {shape:?}");
        };
        assert!(c.distance(center) <= 50.0 + 1e-9);
    }
}
