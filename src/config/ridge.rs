use crate::edges::canny::RidgeOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct RidgeToolConfig {
    #[serde(rename = "input")]
    pub input: PathBuf,
    #[serde(default)]
    pub ridge: RidgeOptions,
    pub output: RidgeOutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct RidgeOutputConfig {
    /// PNG of the direction raster: 0 background, `128 + code` on ridges.
    #[serde(rename = "direction_image")]
    pub direction_image: PathBuf,
    #[serde(rename = "ridges_json")]
    pub ridges_json: PathBuf,
}

pub fn load_config(path: &Path) -> Result<RidgeToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&data).map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

fn parse_config(data: &str) -> Result<RidgeToolConfig, serde_json::Error> {
    serde_json::from_str(data)
}
