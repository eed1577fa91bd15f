use super::*;
use crate::assets::SourceImage;
use crate::geometry::{DEFAULT_VERTEX_SPACING, centroid};
use crate::model::PathKind;
use crate::segment::{SegmentOpts, segment};

const FILL: Rgba8 = Rgba8::rgb(10, 200, 30);

fn square(x0: f64, y0: f64, side: f64) -> Vec<Point> {
    vec![
        Point::new(x0, y0),
        Point::new(x0 + side, y0),
        Point::new(x0 + side, y0 + side),
        Point::new(x0, y0 + side),
    ]
}

struct Fixture {
    parts: BTreeMap<String, Part>,
    params: BTreeMap<String, AnimationParams>,
    bitmaps: Bitmaps,
}

fn fixture(move_x: f64) -> Fixture {
    let img = SourceImage::from_fn(40, 40, |_, _| FILL).unwrap();
    let mut part = Part::default();
    part.set_outline(square(0.0, 0.0, 20.0));
    let mut parts = BTreeMap::new();
    parts.insert("A".to_owned(), part);
    let mut params = BTreeMap::new();
    params.insert(
        "A".to_owned(),
        AnimationParams {
            move_x,
            ..AnimationParams::default()
        },
    );
    let bitmaps = segment(&img, &parts, &SegmentOpts::default()).unwrap();
    Fixture {
        parts,
        params,
        bitmaps,
    }
}

impl Fixture {
    fn ctx(&self) -> SeamContext<'_> {
        SeamContext {
            parts: &self.parts,
            animation_params: &self.params,
            bitmaps: &self.bitmaps,
            vertex_spacing: DEFAULT_VERTEX_SPACING,
        }
    }
}

fn group(indices: &[usize], color: Option<Rgba8>) -> VertexGroup {
    VertexGroup {
        vertices: indices
            .iter()
            .map(|&i| VertexRef::new("A", PathKind::Add, 0, i))
            .collect(),
        color,
    }
}

#[test]
fn explicit_color_and_scaled_hull() {
    let f = fixture(0.0);
    let explicit = Rgba8::rgb(1, 2, 3);
    let patches = plan_seams(&f.ctx(), &[group(&[0, 1, 2], Some(explicit))], 0.0);
    assert_eq!(patches.len(), 1);
    let p = &patches[0];
    assert_eq!(p.color, explicit);
    assert_eq!(p.polygon.len(), 3);

    let hull = convex_hull(&[
        Point::new(0.0, 0.0),
        Point::new(20.0, 0.0),
        Point::new(20.0, 20.0),
    ]);
    let c = centroid(&hull).unwrap();
    for (scaled, orig) in p.polygon.iter().zip(&hull) {
        let expect = c + (*orig - c) * SEAM_HULL_SCALE;
        assert!((*scaled - expect).hypot() < 1e-9);
    }
}

#[test]
fn sampled_color_averages_opaque_samples() {
    let f = fixture(0.0);
    let patches = plan_seams(&f.ctx(), &[group(&[0, 1, 2, 3], None)], 0.0);
    assert_eq!(patches.len(), 1);
    assert_eq!(patches[0].color, FILL);
}

#[test]
fn too_few_or_unresolved_vertices_are_skipped() {
    let f = fixture(0.0);
    assert!(plan_seams(&f.ctx(), &[group(&[0, 1], None)], 0.0).is_empty());
    assert!(plan_seams(&f.ctx(), &[group(&[0, 1, 99], None)], 0.0).is_empty());
    assert!(plan_seams(&f.ctx(), &[VertexGroup::default()], 0.0).is_empty());
}

#[derive(Clone, Default)]
struct LogBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn stale_references_stay_below_warn_level() {
    let f = fixture(0.0);
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        for frame in 0..60 {
            plan_seams(&f.ctx(), &[group(&[0, 1, 99], None)], f64::from(frame) * 16.0);
        }
    });
    assert!(logs.0.lock().unwrap().is_empty());
}

#[test]
fn patches_follow_part_motion() {
    let f = fixture(10.0);
    let g = [group(&[0, 1, 2, 3], Some(FILL))];
    let rest = plan_seams(&f.ctx(), &g, 0.0);
    let moved = plan_seams(&f.ctx(), &g, 500.0);
    for (a, b) in rest[0].polygon.iter().zip(&moved[0].polygon) {
        assert!((b.x - a.x - 10.0).abs() < 1e-9);
        assert!((b.y - a.y).abs() < 1e-9);
    }
}

#[test]
fn planning_is_pure() {
    let f = fixture(7.0);
    let g = [group(&[0, 1, 2, 3], None)];
    assert_eq!(plan_seams(&f.ctx(), &g, 321.0), plan_seams(&f.ctx(), &g, 321.0));
}
