use super::*;

fn square(x0: f64, y0: f64, side: f64) -> LassoPath {
    vec![
        Point::new(x0, y0),
        Point::new(x0 + side, y0),
        Point::new(x0 + side, y0 + side),
        Point::new(x0, y0 + side),
    ]
}

#[test]
fn coverage_is_thresholded_at_half() {
    let canvas = Canvas::new(4, 1);
    let m = Mask::from_coverage(canvas, &[0, 127, 128, 255]).unwrap();
    assert_eq!(m.alpha(), &[0, 0, 255, 255]);
    assert_eq!(m.count(), 2);
    assert!(Mask::from_coverage(canvas, &[0; 3]).is_err());
}

#[test]
fn union_and_subtract() {
    let canvas = Canvas::new(3, 1);
    let mut a = Mask::from_coverage(canvas, &[255, 0, 0]).unwrap();
    let b = Mask::from_coverage(canvas, &[0, 255, 0]).unwrap();
    a.union_with(&b);
    assert_eq!(a.count(), 2);
    a.subtract(&b);
    assert!(a.get(0, 0));
    assert!(!a.get(1, 0));
    assert!(!a.get(9, 0));
}

#[test]
fn border_pixels_of_filled_block() {
    let canvas = Canvas::new(5, 5);
    let mut m = Mask::empty(canvas);
    for y in 1..4 {
        for x in 1..4 {
            m.set(x, y, true);
        }
    }
    let border = m.border_pixels();
    assert_eq!(border.len(), 8);
    assert!(!border.contains(&(2, 2)));
}

#[test]
fn canvas_edge_counts_as_outside() {
    let canvas = Canvas::new(3, 3);
    let m = Mask::from_coverage(canvas, &[255; 9]).unwrap();
    assert_eq!(m.border_pixels().len(), 8);
}

#[test]
fn rasterize_paths_ignores_short_paths() {
    let mut raster = CpuRaster::new();
    let canvas = Canvas::new(10, 10);
    let m = rasterize_paths(
        &mut raster,
        canvas,
        &[vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)]],
    )
    .unwrap();
    assert!(m.is_empty());

    let m = rasterize_paths(&mut raster, canvas, &[square(0.0, 0.0, 5.0)]).unwrap();
    assert_eq!(m.count(), 25);
    assert!(m.get(4, 4));
    assert!(!m.get(5, 5));
}
