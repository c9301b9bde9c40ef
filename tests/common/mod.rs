// Common test utilities for display integration tests
//
// Provides a text renderer that records which cells it was asked to redraw
// and helpers for building headless displays and PNG fixtures.

#![allow(dead_code)]

use eight_rs::display::{
    ContextBuilder, Display, DisplayConfig, DisplayError, HeadlessBuilder, HeadlessContext,
    HeadlessFrame, InitError, PixelSurface, RenderContext, ScreenGeometry, TextGrid, TextRenderer,
};
use std::cell::Cell;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::rc::Rc;

/// Glyph cell width used by the recording renderer
pub const CELL_WIDTH: u32 = 8;

/// Glyph cell height used by the recording renderer
pub const CELL_HEIGHT: u32 = 8;

/// Text renderer that logs every redraw request
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    /// Indices passed to `redraw_cell`, in call order
    pub redrawn: Vec<usize>,
    /// Blink phase seen on the most recent redraw
    pub last_blink_on: Option<bool>,
}

impl RecordingRenderer {
    /// Sorted, deduplicated redraw indices
    pub fn redrawn_set(&self) -> Vec<usize> {
        let mut cells = self.redrawn.clone();
        cells.sort_unstable();
        cells.dedup();
        cells
    }
}

impl TextRenderer for RecordingRenderer {
    fn cell_size(&self) -> (u32, u32) {
        (CELL_WIDTH, CELL_HEIGHT)
    }

    fn redraw_cell(
        &mut self,
        index: usize,
        grid: &TextGrid,
        surface: &mut PixelSurface,
        blink_on: bool,
    ) {
        self.redrawn.push(index);
        self.last_blink_on = Some(blink_on);

        if let (Some((col, row)), Ok(code)) = (grid.position_of(index), grid.code(index)) {
            surface.fill_rect(
                col * CELL_WIDTH,
                row * CELL_HEIGHT,
                CELL_WIDTH,
                CELL_HEIGHT,
                code.0 as u32,
            );
        }
    }
}

pub type TestDisplay = Display<HeadlessContext, RecordingRenderer>;

/// Config with a small screen and no icon
pub fn test_config(width: u32, height: u32, scale: f32) -> DisplayConfig {
    let mut config = DisplayConfig::default();
    config.screen.width = width;
    config.screen.height = height;
    config.screen.scale = scale;
    config.assets.icon = None;
    config
}

/// Headless display with a recording renderer
pub fn headless_display(width: u32, height: u32) -> TestDisplay {
    Display::with_renderer(
        &test_config(width, height, 1.0),
        HeadlessBuilder,
        RecordingRenderer::default(),
    )
    .expect("headless display should initialize")
}

/// Write an 8-bit PNG
pub fn write_png(path: &Path, width: u32, height: u32, color: png::ColorType, data: &[u8]) {
    let file = File::create(path).unwrap();
    let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(color);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().unwrap();
    writer.write_image_data(data).unwrap();
}

/// Write a grayscale glyph sheet where every glyph is a solid block
pub fn write_solid_font(path: &Path, glyph_width: u32, glyph_height: u32) {
    let width = glyph_width * 16;
    let height = glyph_height * 16;
    let data = vec![0xFFu8; (width * height) as usize];
    write_png(path, width, height, png::ColorType::Grayscale, &data);
}

/// Render context wrapper that reports `destroy` calls through a shared counter
#[derive(Debug, Default)]
pub struct ProbeContext {
    pub inner: HeadlessContext,
    pub destroyed: Rc<Cell<u32>>,
}

impl RenderContext for ProbeContext {
    type Frame = HeadlessFrame;

    fn resize(&mut self, geometry: &ScreenGeometry) -> Result<(), DisplayError> {
        self.inner.resize(geometry)
    }

    fn snapshot(&mut self, surface: &PixelSurface) -> Result<HeadlessFrame, DisplayError> {
        self.inner.snapshot(surface)
    }

    fn show(&mut self, frame: &HeadlessFrame) -> Result<(), DisplayError> {
        self.inner.show(frame)
    }

    fn destroy(&mut self) {
        self.destroyed.set(self.destroyed.get() + 1);
        self.inner.destroy();
    }
}

/// Builds a `ProbeContext` sharing the given destroy counter
pub struct ProbeBuilder(pub Rc<Cell<u32>>);

impl ContextBuilder for ProbeBuilder {
    type Context = ProbeContext;

    fn build(self, _title: &str, _geometry: &ScreenGeometry) -> Result<ProbeContext, InitError> {
        Ok(ProbeContext {
            inner: HeadlessContext::default(),
            destroyed: self.0,
        })
    }
}
