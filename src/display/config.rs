// Configuration management
//
// `ScreenConfig` is the logical resolution and window scale the display is
// currently running at. `DisplayConfig` is the user-editable settings file the
// binary starts from.

use super::blink::DEFAULT_BLINK_INTERVAL_MS;
use super::error::DisplayError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default configuration file path
pub const CONFIG_FILE: &str = "eight_config.toml";

/// Default logical width in cells
pub const DEFAULT_WIDTH: u32 = 80;

/// Default logical height in cells
pub const DEFAULT_HEIGHT: u32 = 25;

/// Default window scale factor
pub const DEFAULT_SCALE: f32 = 2.0;

/// Default window title
pub const DEFAULT_TITLE: &str = concat!("Eight ", env!("CARGO_PKG_VERSION"));

/// Logical resolution and window scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenConfig {
    /// Width in cells
    pub width: u32,

    /// Height in cells
    pub height: u32,

    /// Window scale factor
    pub scale: f32,
}

impl ScreenConfig {
    /// Create a validated screen configuration
    ///
    /// # Returns
    /// `DisplayError::InvalidSize` unless width, height and scale are all positive
    pub fn new(width: u32, height: u32, scale: f32) -> Result<Self, DisplayError> {
        // `!(scale > 0.0)` also rejects NaN
        if width == 0 || height == 0 || !(scale > 0.0) || !scale.is_finite() {
            return Err(DisplayError::InvalidSize {
                width,
                height,
                scale,
            });
        }
        Ok(Self {
            width,
            height,
            scale,
        })
    }

    /// Number of cells in the grid
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Pixel sizes for a font with the given glyph cell size
    ///
    /// # Returns
    /// `DisplayError::Allocation` if the surface size does not fit in `u32`
    pub fn geometry(
        &self,
        glyph_width: u32,
        glyph_height: u32,
    ) -> Result<ScreenGeometry, DisplayError> {
        let (Some(pixel_width), Some(pixel_height)) = (
            self.width.checked_mul(glyph_width),
            self.height.checked_mul(glyph_height),
        ) else {
            return Err(DisplayError::Allocation(format!(
                "{}x{} cells of {}x{} px exceed the surface size limit",
                self.width, self.height, glyph_width, glyph_height
            )));
        };

        Ok(ScreenGeometry {
            columns: self.width,
            rows: self.height,
            pixel_width,
            pixel_height,
            window_width: scaled(pixel_width, self.scale),
            window_height: scaled(pixel_height, self.scale),
        })
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            scale: DEFAULT_SCALE,
        }
    }
}

fn scaled(pixels: u32, scale: f32) -> u32 {
    ((pixels as f64 * scale as f64) as u32).max(1)
}

/// Derived sizes for the current screen configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenGeometry {
    /// Grid width in cells
    pub columns: u32,
    /// Grid height in cells
    pub rows: u32,
    /// Logical surface width in pixels
    pub pixel_width: u32,
    /// Logical surface height in pixels
    pub pixel_height: u32,
    /// Window width in physical pixels
    pub window_width: u32,
    /// Window height in physical pixels
    pub window_height: u32,
}

/// Tick timing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Duration of one scheduler tick in milliseconds
    pub tick_ms: u32,

    /// Blink phase interval in milliseconds
    pub blink_interval_ms: u32,
}

/// Asset paths
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Bitmap font glyph sheet (required)
    pub font: PathBuf,

    /// Window icon (optional)
    pub icon: Option<PathBuf>,
}

/// Display configuration
///
/// Stores all user-configurable settings for the display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Window title
    pub title: String,

    /// Default logical resolution and scale
    pub screen: ScreenConfig,

    /// Tick and blink timing
    pub timing: TimingConfig,

    /// Asset locations
    pub assets: AssetConfig,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            title: DEFAULT_TITLE.to_string(),
            screen: ScreenConfig::default(),
            timing: TimingConfig {
                tick_ms: 16,
                blink_interval_ms: DEFAULT_BLINK_INTERVAL_MS,
            },
            assets: AssetConfig {
                font: PathBuf::from("assets/font.png"),
                icon: Some(PathBuf::from("icon.png")),
            },
        }
    }
}

impl DisplayConfig {
    /// Load configuration from file or fall back to defaults
    ///
    /// A missing file is silently replaced by the defaults; an unreadable or
    /// invalid file is logged first.
    ///
    /// # Example
    ///
    /// ```
    /// use eight_rs::display::DisplayConfig;
    ///
    /// let config = DisplayConfig::load_or_default("does_not_exist.toml");
    /// assert_eq!(config.screen.width, 80);
    /// ```
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                log::warn!(
                    "Ignoring config {}: {}; using defaults",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Load configuration from file
    ///
    /// The screen section is validated like a resize request.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, io::Error> {
        let contents = fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&contents).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        ScreenConfig::new(config.screen.width, config.screen.height, config.screen.scale)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;

        Ok(config)
    }

    /// Save configuration to file
    ///
    /// # Example
    ///
    /// ```no_run
    /// use eight_rs::display::DisplayConfig;
    ///
    /// let config = DisplayConfig::default();
    /// config.save("eight_config.toml").expect("Failed to save configuration");
    /// ```
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), io::Error> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)
    }
}
