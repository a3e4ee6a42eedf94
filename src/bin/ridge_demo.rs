use ridge_nms::config::ridge::load_config;
use ridge_nms::diagnostics::RidgeSummary;
use ridge_nms::edges::canny::{detect_ridges, RidgeElement};
use ridge_nms::image::io::{
    load_grayscale_image, render_direction_raster, save_grayscale_u8, write_json_file,
};
use ridge_nms::image::ImageF32;
use serde::Serialize;
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let gray = load_grayscale_image(&config.input)?;
    let image = ImageF32::from_gray_u8(&gray.as_view());
    let result = detect_ridges(&image, &config.ridge).map_err(|e| e.to_string())?;

    let raster = render_direction_raster(&result.ridges, image.w, image.h);
    save_grayscale_u8(&raster, &config.output.direction_image)?;

    let report = RidgeReport {
        summary: RidgeSummary::new(image.w, image.h, &config.ridge, &result),
        ridges: &result.elements,
    };
    write_json_file(&config.output.ridges_json, &report)?;

    println!(
        "Saved direction raster to {}",
        config.output.direction_image.display()
    );
    println!(
        "Saved {} ridge pixels to {} ({:.3} ms)",
        report.summary.ridge_count,
        config.output.ridges_json.display(),
        report.summary.timing.total_ms
    );

    Ok(())
}

fn usage() -> String {
    "Usage: ridge_demo <config.json>".to_string()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RidgeReport<'a> {
    #[serde(flatten)]
    summary: RidgeSummary,
    ridges: &'a [RidgeElement],
}
