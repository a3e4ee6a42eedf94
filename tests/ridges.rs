mod common;

use common::init_logging;
use common::synthetic_image::soft_disk;
use ridge_nms::edges::canny::{detect_ridges, Precision, RidgeOptions};
use ridge_nms::edges::grad::GradientKernel;
use ridge_nms::{ridge_pixels, DirectionCode};

const SIZE: usize = 48;
const RADIUS: f32 = 12.0;

fn check_ring(options: &RidgeOptions) -> usize {
    let img = soft_disk(SIZE, SIZE, RADIUS, 1.0);
    let result = detect_ridges(&img, options).unwrap();
    let centre = (SIZE as f32 - 1.0) / 2.0;
    for e in &result.elements {
        let (dx, dy) = (e.x as f32 - centre, e.y as f32 - centre);
        let r = (dx * dx + dy * dy).sqrt();
        assert!(
            (r - RADIUS).abs() <= 2.0,
            "ridge at ({}, {}) has radius {r:.2}",
            e.x,
            e.y
        );
        // The disk is bright, so gradients point back towards the centre.
        let [ux, uy] = DirectionCode::new(e.direction).unwrap().unit_vector();
        let inward = -(ux as f32 * dx + uy as f32 * dy) / r;
        assert!(inward > 0.5, "direction {} at ({}, {})", e.direction, e.x, e.y);
    }
    assert_eq!(ridge_pixels(&result.ridges).len(), result.elements.len());
    result.elements.len()
}

#[test]
fn soft_disk_gives_a_thin_ring() {
    init_logging();
    let options = RidgeOptions {
        magnitude_threshold: 1.2,
        ..RidgeOptions::default()
    };
    let count = check_ring(&options);
    assert!(count > 20, "only {count} ridge pixels");
}

#[test]
fn scharr_and_integer_precision_find_the_same_ring() {
    init_logging();
    let options = RidgeOptions {
        magnitude_threshold: 4.8,
        kernel: GradientKernel::Scharr,
        precision: Precision::Integer,
        integer_scale: 1024.0,
    };
    let count = check_ring(&options);
    assert!(count > 20, "only {count} ridge pixels");
}
