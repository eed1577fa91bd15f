use super::*;
use crate::assets::SourceImage;
use crate::foundation::color::Rgba8;
use crate::foundation::core::Point;
use crate::model::{AnimationParams, Part, VertexGroup};
use crate::encode::sink::InMemorySink;
use crate::segment::{Bitmaps, SegmentOpts, segment};
use std::collections::BTreeMap;

struct Scene {
    parts: BTreeMap<String, Part>,
    params: BTreeMap<String, AnimationParams>,
    order: Vec<String>,
    groups: Vec<VertexGroup>,
    bitmaps: Bitmaps,
}

impl Scene {
    fn new() -> Self {
        let img = SourceImage::from_fn(20, 10, |x, _| {
            if x < 10 {
                Rgba8::rgb(255, 0, 0)
            } else {
                Rgba8::rgb(0, 0, 255)
            }
        })
        .unwrap();
        let mut part = Part::default();
        part.set_outline(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]);
        let mut parts = BTreeMap::new();
        parts.insert("Left".to_owned(), part);
        let mut params = BTreeMap::new();
        params.insert(
            "Left".to_owned(),
            AnimationParams {
                rotation: 15.0,
                move_y: 2.0,
                tint_intensity: 0.4,
                ..AnimationParams::default()
            },
        );
        let bitmaps = segment(&img, &parts, &SegmentOpts::default()).unwrap();
        Self {
            parts,
            params,
            order: vec!["Left".to_owned()],
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

#[test]
fn scale_floors_and_keeps_one_pixel() {
    assert_eq!(ExportScale::Full.apply(Canvas::new(101, 51)), Canvas::new(101, 51));
    assert_eq!(ExportScale::Half.apply(Canvas::new(101, 51)), Canvas::new(50, 25));
    assert_eq!(ExportScale::Quarter.apply(Canvas::new(3, 9)), Canvas::new(1, 2));
}

#[test]
fn nearest_scaling_picks_pixel_centers() {
    let data: Vec<u8> = (0..8u8).flat_map(|i| [i, i, i, 255]).collect();
    let frame = FrameRGBA {
        width: 4,
        height: 2,
        data,
        premultiplied: true,
    };
    let small = scale_nearest(&frame, Canvas::new(2, 1));
    assert_eq!(small.canvas(), Canvas::new(2, 1));
    assert_eq!(small.data, vec![5, 5, 5, 255, 7, 7, 7, 255]);
    assert_eq!(scale_nearest(&frame, frame.canvas()), frame);
}

#[test]
fn missing_static_body_fails_export() {
    let mut scene = Scene::new();
    scene.bitmaps = Bitmaps::default();
    let opts = ExportOpts::default();
    assert!(matches!(
        export_spritesheet(&scene.inputs(), &opts),
        Err(SpritecutError::Export(_))
    ));
    assert!(matches!(
        export_gif(&scene.inputs(), &opts),
        Err(SpritecutError::Export(_))
    ));
}

#[test]
fn spritesheet_artifact_has_grid_dimensions() {
    let scene = Scene::new();
    let opts = ExportOpts {
        scale: ExportScale::Half,
        parallel: false,
    };
    let art = export_spritesheet(&scene.inputs(), &opts).unwrap();
    assert_eq!(art.file_name, SPRITESHEET_FILE_NAME);
    assert_eq!(art.mime, "image/png");
    let sheet = image::load_from_memory(&art.bytes).unwrap();
    assert_eq!((sheet.width(), sheet.height()), (50, 10));
}

#[test]
fn parallel_frames_match_sequential() {
    let scene = Scene::new();
    let times = [0.0, 123.0, 500.0, 1250.0, 1999.0];
    let target = Canvas::new(20, 10);
    let seq = render_frames(&scene.inputs(), &times, target, false).unwrap();
    let par = render_frames(&scene.inputs(), &times, target, true).unwrap();
    assert_eq!(seq.len(), times.len());
    assert_eq!(seq, par);
}

#[test]
fn write_to_dir_uses_fixed_name() {
    let dir = std::env::temp_dir().join(format!("spritecut-export-{}", std::process::id()));
    let art = ExportArtifact {
        file_name: GIF_FILE_NAME.to_owned(),
        mime: "image/gif".to_owned(),
        bytes: vec![1, 2, 3],
    };
    let path = art.write_to_dir(&dir).unwrap();
    assert_eq!(path.file_name().unwrap(), GIF_FILE_NAME);
    assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn frames_reach_the_sink_in_order() {
    let scene = Scene::new();
    let times = gif_frame_times();
    let target = ExportScale::Half.apply(scene.bitmaps.canvas());
    let frames = render_frames(&scene.inputs(), &times, target, true).unwrap();

    let mut sink = InMemorySink::new();
    let cfg = SinkConfig {
        width: target.width,
        height: target.height,
        frame_count: frames.len(),
        frame_delay_ms: GIF_FRAME_DELAY_MS,
    };
    drive_sink(&mut sink, cfg, &frames).unwrap();

    assert!(sink.is_finished());
    assert_eq!(sink.config(), Some(cfg));
    assert_eq!(sink.frames().len(), 50);
    for (i, (idx, frame)) in sink.frames().iter().enumerate() {
        assert_eq!(*idx, i);
        assert_eq!(frame, &frames[i]);
    }
}

#[test]
fn sink_rejects_frames_of_the_wrong_size() {
    let scene = Scene::new();
    let frames = render_frames(&scene.inputs(), &[0.0], Canvas::new(20, 10), false).unwrap();
    let mut sink = InMemorySink::new();
    assert!(sink.push_frame(0, &frames[0]).is_err());

    let cfg = SinkConfig {
        width: 10,
        height: 5,
        frame_count: 1,
        frame_delay_ms: 0,
    };
    assert!(matches!(
        drive_sink(&mut sink, cfg, &frames),
        Err(SpritecutError::Export(_))
    ));
    assert!(sink.frames().is_empty());
    assert!(!sink.is_finished());
}
