// Present pipeline - Dirty tracking and surface-to-window presentation
//
// Presenting is the expensive step: the whole surface is snapshotted into a
// frame, shown, and the frame released. It only runs when the dirty flag is
// set, and clears the flag once the frame is on screen.

use super::config::ScreenGeometry;
use super::error::{AssetError, DisplayError, InitError};
use super::surface::PixelSurface;

/// Whether the pixel surface changed since the last present
///
/// Starts dirty so the first present always produces a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyFlag(bool);

impl DirtyFlag {
    pub fn new() -> Self {
        DirtyFlag(true)
    }

    /// Mark the surface as changed
    #[inline]
    pub fn mark(&mut self) {
        self.0 = true;
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.0
    }

    /// Only the present step clears the flag
    fn clear(&mut self) {
        self.0 = false;
    }
}

impl Default for DirtyFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Windowing and rendering context the display presents through
pub trait RenderContext {
    /// Transient frame produced from a surface snapshot
    type Frame;

    /// Apply a new logical pixel size and window size
    fn resize(&mut self, geometry: &ScreenGeometry) -> Result<(), DisplayError>;

    /// Copy the full surface into a new frame
    fn snapshot(&mut self, surface: &PixelSurface) -> Result<Self::Frame, DisplayError>;

    /// Put a frame on screen
    fn show(&mut self, frame: &Self::Frame) -> Result<(), DisplayError>;

    /// Discard a frame after it has been shown
    fn release_frame(&mut self, frame: Self::Frame) {
        drop(frame);
    }

    /// Change the window title
    fn set_title(&mut self, _title: &str) {}

    /// Set the window icon
    fn set_icon(&mut self, _icon: &PixelSurface) -> Result<(), AssetError> {
        Ok(())
    }

    /// Release the context; called at most once
    fn destroy(&mut self);
}

/// Creates a render context for a window of the given geometry
pub trait ContextBuilder {
    type Context: RenderContext;

    fn build(self, title: &str, geometry: &ScreenGeometry) -> Result<Self::Context, InitError>;
}

/// Presents the surface when dirty and counts produced frames
#[derive(Debug, Default)]
pub struct PresentPipeline {
    frames_presented: u64,
}

impl PresentPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Present the surface if it is dirty
    ///
    /// # Returns
    /// `Ok(true)` if a frame was produced and shown, `Ok(false)` if the
    /// surface was clean. On error the flag stays set so the next tick retries.
    pub fn present<C: RenderContext>(
        &mut self,
        dirty: &mut DirtyFlag,
        surface: &PixelSurface,
        context: &mut C,
    ) -> Result<bool, DisplayError> {
        if !dirty.is_set() {
            return Ok(false);
        }

        let frame = context.snapshot(surface)?;
        let shown = context.show(&frame);
        context.release_frame(frame);
        shown?;

        dirty.clear();
        self.frames_presented += 1;
        log::trace!("Presented frame {}", self.frames_presented);
        Ok(true)
    }

    /// Number of frames produced so far
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}
