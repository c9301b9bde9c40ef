// Eight Display Library
// Display and frame-composition core for the Eight character-grid console

// Public modules
pub mod display;

// Re-export main types for convenience
pub use display::{
    BlinkPhase, BlinkScheduler, CellCode, Display, DisplayConfig, DisplayError, InitError,
    PixelSurface, ScreenConfig, TextFlags, TextGrid,
};
