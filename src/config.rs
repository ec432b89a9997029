use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Result, ensure};
use serde::Deserialize;

use crate::settings::SLIDESHOW_INTERVALS;

/// Gallery screen configuration, loaded from YAML by the application shell.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct GalleryConfig {
    /// Host directory exposed to the screen as the storage root `/`.
    pub storage_root: PathBuf,
    /// Rows per browser page; also the page-jump stride.
    pub page_size: usize,
    /// Prev/Next held at least this long jump a whole page.
    #[serde(with = "humantime_serde")]
    pub page_skip_hold: Duration,
    /// Back held at least this long leaves the screen from any directory.
    #[serde(with = "humantime_serde")]
    pub go_home_hold: Duration,
    /// Confirm held this long produces the Settings trigger.
    #[serde(with = "humantime_serde")]
    pub settings_hold: Duration,
    /// In slideshow settings, a Confirm still held past this is ignored.
    #[serde(with = "humantime_serde")]
    pub settings_confirm_guard: Duration,
    /// Render task polling cadence.
    #[serde(with = "humantime_serde")]
    pub render_tick: Duration,
    /// Single-slot scratch file for JPEG transcodes, as a storage path.
    pub temp_image_path: String,
    /// Initial position in the slideshow interval table.
    pub default_interval_index: usize,
    pub display: DisplayOptions,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
pub struct DisplayOptions {
    pub width: u32,
    pub height: u32,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            width: 480,
            height: 800,
        }
    }
}

impl GalleryConfig {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(self) -> Result<Self> {
        ensure!(self.page_size > 0, "page-size must be greater than zero");
        ensure!(
            self.render_tick > Duration::ZERO,
            "render-tick must be greater than zero"
        );
        ensure!(
            self.temp_image_path.starts_with('/') && self.temp_image_path.len() > 1,
            "temp-image-path must be an absolute storage path to a file"
        );
        ensure!(
            self.default_interval_index < SLIDESHOW_INTERVALS.len(),
            "default-interval-index must be below {}",
            SLIDESHOW_INTERVALS.len()
        );
        ensure!(
            self.display.width > 0 && self.display.height > 0,
            "display dimensions must be positive"
        );
        Ok(self)
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::from("."),
            page_size: 23,
            page_skip_hold: Duration::from_millis(700),
            go_home_hold: Duration::from_millis(1000),
            settings_hold: Duration::from_millis(1000),
            settings_confirm_guard: Duration::from_millis(500),
            render_tick: Duration::from_millis(10),
            temp_image_path: "/temp_view.bmp".to_string(),
            default_interval_index: 1,
            display: DisplayOptions::default(),
        }
    }
}
