// Display module - Frame composition for the character-grid console
//
// This module provides:
// - Pixel surface (packed RGBA, sized from the logical resolution)
// - Text grid with per-cell codes and attribute flags
// - Dirty tracking and the present pipeline
// - Blink scheduler driven by the tick clock
// - Display lifecycle (initialize, resize, shutdown)
// - Window creation and the tick loop using winit + pixels

pub mod blink;
pub mod config;
pub mod error;
pub mod flags;
pub mod font;
pub mod grid;
pub mod headless;
pub mod image;
pub mod lifecycle;
pub mod palette;
pub mod present;
pub mod surface;
pub mod text;
pub mod window;

pub use blink::{BlinkPhase, BlinkScheduler, DEFAULT_BLINK_INTERVAL_MS};
pub use config::{DisplayConfig, ScreenConfig, ScreenGeometry, CONFIG_FILE};
pub use error::{AssetError, DisplayError, InitError};
pub use flags::{CellCode, TextFlags};
pub use font::BitmapFont;
pub use grid::TextGrid;
pub use headless::{HeadlessBuilder, HeadlessContext, HeadlessFrame};
pub use lifecycle::Display;
pub use palette::{palette_to_packed, CONSOLE_PALETTE};
pub use present::{ContextBuilder, DirtyFlag, PresentPipeline, RenderContext};
pub use surface::PixelSurface;
pub use text::{FontRenderer, TextRenderer};
pub use window::{run_console, ConsoleApp, ConsoleDisplay, PixelsContext, TickHandler};
