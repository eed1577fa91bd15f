use super::*;
use crate::assets::SourceImage;
use crate::foundation::color::Rgba8;
use crate::foundation::core::Point;
use crate::model::{PathKind, VertexRef};
use crate::segment::{SegmentOpts, segment};

const RED: Rgba8 = Rgba8::rgb(255, 0, 0);

fn square(x0: f64, y0: f64, side: f64) -> Vec<Point> {
    vec![
        Point::new(x0, y0),
        Point::new(x0 + side, y0),
        Point::new(x0 + side, y0 + side),
        Point::new(x0, y0 + side),
    ]
}

struct Scene {
    parts: BTreeMap<String, Part>,
    params: BTreeMap<String, AnimationParams>,
    order: Vec<String>,
    groups: Vec<VertexGroup>,
    bitmaps: Bitmaps,
}

impl Scene {
    fn new(names: &[&str], anchor: Option<Point>, params: AnimationParams) -> Self {
        let img = SourceImage::from_fn(40, 40, |_, _| RED).unwrap();
        let mut parts = BTreeMap::new();
        let mut all_params = BTreeMap::new();
        for name in names {
            let mut part = Part::default();
            part.set_outline(square(0.0, 0.0, 20.0));
            part.anchor = anchor;
            parts.insert((*name).to_owned(), part);
            all_params.insert((*name).to_owned(), params);
        }
        let bitmaps = segment(&img, &parts, &SegmentOpts::default()).unwrap();
        Self {
            parts,
            params: all_params,
            order: names.iter().map(|s| (*s).to_owned()).collect(),
            groups: Vec::new(),
            bitmaps,
        }
    }

    fn inputs(&self) -> FrameInputs<'_> {
        FrameInputs {
            bitmaps: &self.bitmaps,
            parts: &self.parts,
            animation_params: &self.params,
            part_order: &self.order,
            vertex_groups: &self.groups,
        }
    }
}

fn is_red(frame: &FrameRGBA, x: u32, y: u32) -> bool {
    let p = frame.pixel(x, y).unwrap();
    p.r >= 250 && p.g <= 5 && p.b <= 5 && p.a >= 250
}

#[test]
fn rest_frame_reassembles_the_image() {
    let scene = Scene::new(&["A"], Some(Point::new(10.0, 10.0)), AnimationParams::default());
    let frame = draw_frame(&scene.inputs(), 0.0).unwrap();
    assert_eq!(frame.canvas(), Canvas::new(40, 40));
    assert!(frame.premultiplied);
    for (x, y) in [(2, 2), (15, 15), (30, 5), (5, 35), (39, 39)] {
        assert!(is_red(&frame, x, y), "({x},{y})");
    }
}

#[test]
fn moved_part_uncovers_its_hole() {
    let params = AnimationParams {
        move_x: 10.0,
        ..AnimationParams::default()
    };
    let scene = Scene::new(&["A"], Some(Point::new(10.0, 10.0)), params);
    let frame = draw_frame(&scene.inputs(), 500.0).unwrap();
    assert_eq!(frame.pixel(5, 5).unwrap().a, 0);
    assert!(is_red(&frame, 15, 5));
    assert!(is_red(&frame, 25, 5));
    assert!(is_red(&frame, 35, 35));
}

#[test]
fn part_without_anchor_is_not_drawn() {
    let scene = Scene::new(&["A"], None, AnimationParams::default());
    let frame = draw_frame(&scene.inputs(), 0.0).unwrap();
    assert_eq!(frame.pixel(5, 5).unwrap().a, 0);
    assert!(is_red(&frame, 30, 30));
}

#[test]
fn front_of_order_is_drawn_last() {
    let blue = AnimationParams {
        tint_color: Rgba8::rgb(0, 0, 255),
        tint_intensity: 1.0,
        ..AnimationParams::default()
    };
    let mut scene = Scene::new(&["A", "B"], Some(Point::new(10.0, 10.0)), blue);
    scene.params.get_mut("B").unwrap().tint_color = Rgba8::rgb(0, 255, 0);

    let frame = draw_frame(&scene.inputs(), 500.0).unwrap();
    let p = frame.pixel(5, 5).unwrap();
    assert!(p.b >= 250 && p.g <= 5, "{p:?}");

    scene.order.reverse();
    let frame = draw_frame(&scene.inputs(), 500.0).unwrap();
    let p = frame.pixel(5, 5).unwrap();
    assert!(p.g >= 250 && p.b <= 5, "{p:?}");
}

#[test]
fn zero_tint_leaves_colors_alone() {
    let params = AnimationParams {
        tint_color: Rgba8::rgb(0, 0, 255),
        tint_intensity: 0.0,
        ..AnimationParams::default()
    };
    let scene = Scene::new(&["A"], Some(Point::new(10.0, 10.0)), params);
    let frame = draw_frame(&scene.inputs(), 500.0).unwrap();
    assert!(is_red(&frame, 10, 10));
}

#[test]
fn seam_patch_fills_behind_parts() {
    let green = Rgba8::rgb(0, 255, 0);
    let mut scene = Scene::new(&["A"], None, AnimationParams::default());
    scene.groups.push(VertexGroup {
        vertices: (0..3)
            .map(|i| VertexRef::new("A", PathKind::Add, 0, i))
            .collect(),
        color: Some(green),
    });
    let frame = draw_frame(&scene.inputs(), 0.0).unwrap();
    let p = frame.pixel(15, 5).unwrap();
    assert!(p.g >= 250 && p.r <= 5 && p.a >= 250, "{p:?}");
}

#[test]
fn frames_are_deterministic_across_compositors() {
    let params = AnimationParams {
        rotation: 25.0,
        move_y: 3.0,
        scale: 1.2,
        tint_intensity: 0.5,
        ..AnimationParams::default()
    };
    let scene = Scene::new(&["A"], Some(Point::new(10.0, 10.0)), params);
    let mut warm = Compositor::new();
    let first = warm.draw_frame(&scene.inputs(), 333.0).unwrap();
    let again = warm.draw_frame(&scene.inputs(), 333.0).unwrap();
    let fresh = draw_frame(&scene.inputs(), 333.0).unwrap();
    assert_eq!(first.fingerprint(), again.fingerprint());
    assert_eq!(first, fresh);
}

#[test]
fn empty_bitmaps_are_a_render_error() {
    let empty = Bitmaps::default();
    let parts = BTreeMap::new();
    let params = BTreeMap::new();
    let inputs = FrameInputs {
        bitmaps: &empty,
        parts: &parts,
        animation_params: &params,
        part_order: &[],
        vertex_groups: &[],
    };
    assert!(matches!(
        draw_frame(&inputs, 0.0),
        Err(SpritecutError::Render(_))
    ));
}
