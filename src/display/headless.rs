// Headless render context - Presents into memory instead of a window
//
// Used by tests, benchmarks and tools that want the composed frames without a
// windowing system. Every call is recorded so callers can check what the
// display asked for.

use super::config::ScreenGeometry;
use super::error::{AssetError, DisplayError, InitError};
use super::present::{ContextBuilder, RenderContext};
use super::surface::{PixelSurface, BYTES_PER_PIXEL};

/// In-memory frame produced by a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessFrame {
    pub width: u32,
    pub height: u32,
    /// RGBA bytes
    pub data: Vec<u8>,
}

/// Render context that keeps the last shown frame in memory
#[derive(Debug, Default)]
pub struct HeadlessContext {
    title: String,
    geometry: Option<ScreenGeometry>,
    resizes: Vec<ScreenGeometry>,
    snapshots: u64,
    frames_released: u64,
    last_frame: Option<HeadlessFrame>,
    icon: Option<(u32, u32)>,
    destroyed: u32,
}

impl HeadlessContext {
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Geometry of the most recent create or resize
    pub fn geometry(&self) -> Option<ScreenGeometry> {
        self.geometry
    }

    /// Every geometry passed to `resize`, oldest first
    pub fn resizes(&self) -> &[ScreenGeometry] {
        &self.resizes
    }

    /// Number of surface snapshots taken
    pub fn snapshots(&self) -> u64 {
        self.snapshots
    }

    pub fn frames_released(&self) -> u64 {
        self.frames_released
    }

    /// Last frame shown
    pub fn last_frame(&self) -> Option<&HeadlessFrame> {
        self.last_frame.as_ref()
    }

    /// Size of the icon, if one was set
    pub fn icon(&self) -> Option<(u32, u32)> {
        self.icon
    }

    /// Number of `destroy` calls received
    pub fn destroy_count(&self) -> u32 {
        self.destroyed
    }
}

impl RenderContext for HeadlessContext {
    type Frame = HeadlessFrame;

    fn resize(&mut self, geometry: &ScreenGeometry) -> Result<(), DisplayError> {
        self.geometry = Some(*geometry);
        self.resizes.push(*geometry);
        Ok(())
    }

    fn snapshot(&mut self, surface: &PixelSurface) -> Result<HeadlessFrame, DisplayError> {
        let mut data = Vec::new();
        data.try_reserve_exact(surface.len() * BYTES_PER_PIXEL)
            .map_err(|e| DisplayError::Allocation(format!("frame: {}", e)))?;
        data.resize(surface.len() * BYTES_PER_PIXEL, 0);
        surface.to_rgba(&mut data);

        self.snapshots += 1;
        Ok(HeadlessFrame {
            width: surface.width(),
            height: surface.height(),
            data,
        })
    }

    fn show(&mut self, frame: &HeadlessFrame) -> Result<(), DisplayError> {
        self.last_frame = Some(frame.clone());
        Ok(())
    }

    fn release_frame(&mut self, _frame: HeadlessFrame) {
        self.frames_released += 1;
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn set_icon(&mut self, icon: &PixelSurface) -> Result<(), AssetError> {
        self.icon = Some((icon.width(), icon.height()));
        Ok(())
    }

    fn destroy(&mut self) {
        self.destroyed += 1;
    }
}

/// Builds a `HeadlessContext`
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessBuilder;

impl ContextBuilder for HeadlessBuilder {
    type Context = HeadlessContext;

    fn build(self, title: &str, geometry: &ScreenGeometry) -> Result<HeadlessContext, InitError> {
        Ok(HeadlessContext {
            title: title.to_string(),
            geometry: Some(*geometry),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::config::ScreenConfig;

    #[test]
    fn test_build_records_geometry() {
        let geometry = ScreenConfig::default().geometry(8, 8).unwrap();
        let context = HeadlessBuilder.build("Eight", &geometry).unwrap();

        assert_eq!(context.title(), "Eight");
        assert_eq!(context.geometry(), Some(geometry));
        assert!(context.resizes().is_empty());
    }

    #[test]
    fn test_snapshot_converts_to_rgba() {
        let mut context = HeadlessContext::default();
        let mut surface = PixelSurface::new(1, 1).unwrap();
        surface.set_pixel(0, 0, 0x01020304);

        let frame = context.snapshot(&surface).unwrap();
        context.show(&frame).unwrap();
        context.release_frame(frame);

        assert_eq!(context.last_frame().unwrap().data, vec![1, 2, 3, 4]);
        assert_eq!(context.snapshots(), 1);
        assert_eq!(context.frames_released(), 1);
    }
}
