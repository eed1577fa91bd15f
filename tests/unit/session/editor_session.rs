use super::*;
use crate::editor::PointerEvent;
use crate::encode::ExportScale;
use crate::foundation::color::Rgba8;
use crate::foundation::error::SpritecutError;
use crate::model::AnimationParams;
use base64::Engine;
use std::io::Cursor;

fn image(w: u32, h: u32) -> SourceImage {
    SourceImage::from_fn(w, h, |x, _| {
        if x < w / 2 {
            Rgba8::rgb(255, 0, 0)
        } else {
            Rgba8::rgb(0, 0, 255)
        }
    })
    .unwrap()
}

fn png_payload(w: u32, h: u32) -> String {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&buf)
    )
}

const CONFIG: &str = r#"{
    "parts": {
        "Left": {
            "paths": { "add": [[{"x":0,"y":0},{"x":4,"y":0},{"x":4,"y":8},{"x":0,"y":8}]] },
            "anchor": {"x": 2, "y": 4},
            "boundingBox": null
        }
    },
    "animationParams": { "Left": { "moveX": 2 } },
    "partOrder": ["Left"]
}"#;

fn draw_square(s: &mut Session, x0: f64, y0: f64, side: f64) -> LassoOutcome {
    s.lasso_down(PointerEvent::mouse(Point::new(x0, y0), 0.0)).unwrap();
    s.lasso_move(PointerEvent::mouse(Point::new(x0 + side, y0), 1.0)).unwrap();
    s.lasso_move(PointerEvent::mouse(Point::new(x0 + side, y0 + side), 2.0))
        .unwrap();
    s.lasso_move(PointerEvent::mouse(Point::new(x0, y0 + side), 3.0)).unwrap();
    s.lasso_up(PointerEvent::mouse(Point::new(x0, y0 + side), 4.0)).unwrap()
}

#[test]
fn blank_session_has_nothing_to_draw() {
    let mut s = Session::new();
    assert!(s.image().is_none());
    assert!(s.refresh_bitmaps().unwrap());
    assert!(s.bitmaps().is_empty());
    assert!(matches!(s.draw_frame(0.0), Err(SpritecutError::Render(_))));
}

#[test]
fn lasso_commits_outline_and_bitmaps_refresh_lazily() {
    let mut s = Session::new();
    s.load_image(image(20, 20));
    s.document_mut().add_part("Left").unwrap();

    let out = draw_square(&mut s, 0.0, 0.0, 10.0);
    assert!(matches!(out, LassoOutcome::PathFinished(_)));
    let part = s.document().part("Left").unwrap();
    assert_eq!(part.paths.add[0].len(), 4);
    assert_eq!(part.anchor, Some(Point::new(5.0, 5.0)));

    assert!(s.bitmaps_stale());
    assert!(s.refresh_bitmaps().unwrap());
    assert!(!s.refresh_bitmaps().unwrap());
    assert_eq!(s.bitmaps().part("Left").unwrap().opaque_pixel_count(), 100);

    let params = AnimationParams {
        move_x: 3.0,
        ..AnimationParams::default()
    };
    s.document_mut().set_params("Left", params).unwrap();
    assert!(!s.bitmaps_stale());
}

#[test]
fn lasso_without_active_part_is_ignored() {
    let mut s = Session::new();
    s.load_image(image(10, 10));
    let out = s
        .lasso_down(PointerEvent::mouse(Point::new(1.0, 1.0), 0.0))
        .unwrap();
    assert_eq!(out, LassoOutcome::Nothing);
    assert!(!s.lasso().is_drawing());
}

#[test]
fn alt_click_moves_the_anchor() {
    let mut s = Session::new();
    s.load_image(image(10, 10));
    s.document_mut().add_part("Arm").unwrap();
    let out = s
        .lasso_down(PointerEvent::mouse(Point::new(3.0, 7.0), 0.0).with_alt())
        .unwrap();
    assert_eq!(out, LassoOutcome::AnchorSet(Point::new(3.0, 7.0)));
    assert_eq!(
        s.document().part("Arm").unwrap().anchor,
        Some(Point::new(3.0, 7.0))
    );
}

#[test]
fn failed_import_leaves_document_untouched() {
    let mut s = Session::new();
    s.load_image(image(10, 10));
    s.document_mut().add_part("Keep").unwrap();
    let rev = s.document().revision();

    assert!(s.import_config("{ not json").is_err());
    assert!(s.import_config(r#"{"parts": {}}"#).is_err());
    assert_eq!(s.document().revision(), rev);
    assert_eq!(s.document().part_order(), ["Keep".to_owned()]);

    s.import_config(CONFIG).unwrap();
    assert_eq!(s.document().part_order(), ["Left".to_owned()]);
    assert!(s.image().is_some());
}

#[test]
fn config_export_round_trips_through_import() {
    let mut s = Session::new();
    s.import_config(CONFIG).unwrap();
    let json = s.export_config().unwrap();
    let mut other = Session::new();
    other.import_config(&json).unwrap();
    assert_eq!(other.document().parts(), s.document().parts());
    assert_eq!(other.document().animation_params(), s.document().animation_params());
}

#[test]
fn defaults_load_image_then_config() {
    let mut s = Session::new();
    s.load_defaults(&png_payload(8, 8), CONFIG).unwrap();
    assert_eq!(s.image().unwrap().canvas().width, 8);
    assert_eq!(s.document().active_part(), Some("Left"));
    assert_eq!(s.document().params("Left").unwrap().move_x, 2.0);
}

#[test]
fn failed_defaults_leave_a_blank_session() {
    let mut s = Session::new();
    s.load_image(image(10, 10));
    s.document_mut().add_part("Old").unwrap();

    assert!(matches!(
        s.load_defaults("data:image/png;base64,!!!", CONFIG),
        Err(SpritecutError::Asset(_))
    ));
    assert!(s.image().is_none());
    assert!(s.document().parts().is_empty());

    s.load_image(image(10, 10));
    assert!(s.load_defaults(&png_payload(4, 4), "{}").is_err());
    assert!(s.image().is_none());
}

#[test]
fn undecodable_upload_resets() {
    let mut s = Session::new();
    s.load_image(image(10, 10));
    s.document_mut().add_part("Old").unwrap();
    assert!(s.load_image_bytes(b"nope").is_err());
    assert!(s.image().is_none());
    assert!(s.document().part_order().is_empty());
}

#[test]
fn exports_are_rejected_while_one_is_running() {
    let mut s = Session::new();
    s.load_image(image(8, 8));
    let opts = ExportOpts {
        scale: ExportScale::Half,
        parallel: false,
    };

    let flag = s.rendering_flag();
    let guard = flag.try_begin().unwrap();
    assert!(matches!(s.export_gif(&opts), Err(SpritecutError::Busy)));
    drop(guard);

    let art = s.export_spritesheet(&opts).unwrap();
    assert_eq!(art.file_name, "spritesheet.png");
    assert!(!s.is_rendering());
}

#[test]
fn failed_export_clears_the_flag() {
    let mut s = Session::new();
    let err = s.export_spritesheet(&ExportOpts::default()).unwrap_err();
    assert!(matches!(err, SpritecutError::Export(_)));
    assert!(!s.is_rendering());
}

#[test]
fn vertex_pick_feeds_the_active_group() {
    let mut s = Session::new();
    s.load_image(image(40, 40));
    s.document_mut().add_part("A").unwrap();
    draw_square(&mut s, 0.0, 0.0, 20.0);

    assert!(s.pick_vertex(Point::new(1.0, 1.0), false).unwrap());
    assert!(s.pick_vertex(Point::new(19.0, 1.0), true).unwrap());
    let group = &s.document().vertex_groups()[0];
    assert_eq!(group.vertices.len(), 2);

    assert!(s.pick_vertex(Point::new(10.0, 10.0), false).unwrap());
    assert!(s.document().vertex_groups()[0].vertices.is_empty());
}

#[test]
fn every_recompute_gets_a_new_generation() {
    let mut s = Session::new();
    assert!(s.bitmaps().is_empty());
    assert_eq!(s.bitmaps().canvas(), crate::foundation::core::Canvas::default());

    s.load_image(image(10, 10));
    s.refresh_bitmaps().unwrap();
    let first = s.bitmaps().version();
    s.document_mut().add_part("A").unwrap();
    draw_square(&mut s, 0.0, 0.0, 4.0);
    s.refresh_bitmaps().unwrap();
    let second = s.bitmaps().version();
    assert!(second > first);

    s.reset();
    assert!(s.bitmaps().is_empty());
}
