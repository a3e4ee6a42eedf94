use ridge_nms::image::ImageF32;

/// Bright disk on a dark background with a logistic edge profile, so the
/// gradient magnitude peaks on the circle of `radius`.
pub fn soft_disk(width: usize, height: usize, radius: f32, softness: f32) -> ImageF32 {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    let cx = (width as f32 - 1.0) / 2.0;
    let cy = (height as f32 - 1.0) / 2.0;
    ImageF32::from_fn(width, height, |x, y| {
        let r = ((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2)).sqrt();
        1.0 / (1.0 + ((r - radius) / softness).exp())
    })
}
