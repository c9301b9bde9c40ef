// Display lifecycle - Owns every piece of display state
//
// A `Display` holds the render context, the pixel surface, the text grid, the
// dirty flag and the blink scheduler. All operations go through it; nothing is
// global. Per tick the caller is expected to run its own update (which may call
// `set_cell`/`redraw_cell`), then `advance`, then `present`.

use super::blink::{BlinkPhase, BlinkScheduler};
use super::config::{DisplayConfig, ScreenConfig, ScreenGeometry};
use super::error::DisplayError;
use super::flags::{CellCode, TextFlags};
use super::font::BitmapFont;
use super::grid::TextGrid;
use super::image::load_png_surface;
use super::present::{ContextBuilder, DirtyFlag, PresentPipeline, RenderContext};
use super::surface::PixelSurface;
use super::text::{FontRenderer, TextRenderer};
use std::path::Path;

/// Display and frame-composition state for one console window
pub struct Display<C: RenderContext, R: TextRenderer> {
    title: String,
    defaults: ScreenConfig,
    screen: ScreenConfig,
    geometry: ScreenGeometry,
    /// `None` once shut down
    context: Option<C>,
    /// `None` once shut down
    surface: Option<PixelSurface>,
    grid: TextGrid,
    renderer: R,
    dirty: DirtyFlag,
    blink: BlinkScheduler,
    pipeline: PresentPipeline,
}

impl<C: RenderContext> Display<C, FontRenderer> {
    /// Initialize the display with the configured bitmap font
    ///
    /// Loads the font, creates the render context through `builder`, sets the
    /// optional window icon and allocates the surface and grid at the default
    /// resolution.
    ///
    /// # Returns
    /// A fatal `DisplayError` if the font is missing or corrupt, the context
    /// cannot be created, or the initial allocation fails
    pub fn initialize<B>(config: &DisplayConfig, builder: B) -> Result<Self, DisplayError>
    where
        B: ContextBuilder<Context = C>,
    {
        log::info!("Loading font {}...", config.assets.font.display());
        let font = BitmapFont::load(&config.assets.font)?;

        Self::with_renderer(config, builder, FontRenderer::new(font))
    }
}

impl<C: RenderContext, R: TextRenderer> Display<C, R> {
    /// Initialize the display with an explicit text renderer
    pub fn with_renderer<B>(
        config: &DisplayConfig,
        builder: B,
        renderer: R,
    ) -> Result<Self, DisplayError>
    where
        B: ContextBuilder<Context = C>,
    {
        let defaults =
            ScreenConfig::new(config.screen.width, config.screen.height, config.screen.scale)?;
        let (glyph_width, glyph_height) = renderer.cell_size();
        let geometry = defaults.geometry(glyph_width, glyph_height)?;

        log::info!(
            "Creating window {}x{} ({}x{} cells, scale {})",
            geometry.window_width,
            geometry.window_height,
            defaults.width,
            defaults.height,
            defaults.scale
        );
        let mut context = builder.build(&config.title, &geometry)?;

        if let Some(icon) = &config.assets.icon {
            set_icon(&mut context, icon);
        }

        let mut display = Self {
            title: config.title.clone(),
            defaults,
            screen: defaults,
            geometry,
            context: Some(context),
            surface: None,
            grid: TextGrid::new(0, 0)?,
            renderer,
            dirty: DirtyFlag::new(),
            blink: BlinkScheduler::new(config.timing.blink_interval_ms),
            pipeline: PresentPipeline::new(),
        };
        display.reset_to_default()?;

        log::info!("Display ready");
        Ok(display)
    }

    /// Change the logical resolution and window scale
    ///
    /// The surface and the grid are reallocated; all previous cell content is
    /// lost and the surface is marked dirty. A fatal failure (allocation or
    /// context resize) shuts the display down before the error is returned.
    pub fn resize(&mut self, width: u32, height: u32, scale: f32) -> Result<(), DisplayError> {
        let screen = ScreenConfig::new(width, height, scale)?;
        if self.is_shut_down() {
            return Err(DisplayError::ShutDown);
        }

        let result = self.reallocate(screen);
        if let Err(err) = &result {
            if err.is_fatal() {
                log::error!("Resize to {}x{} failed: {}", width, height, err);
                self.shutdown();
            }
        }
        result
    }

    /// Allocate surface and grid for `screen`, then commit the new state
    fn reallocate(&mut self, screen: ScreenConfig) -> Result<(), DisplayError> {
        let (glyph_width, glyph_height) = self.renderer.cell_size();
        let geometry = screen.geometry(glyph_width, glyph_height)?;
        log::debug!(
            "Resizing to {}x{} cells ({}x{} px, window {}x{})",
            screen.width,
            screen.height,
            geometry.pixel_width,
            geometry.pixel_height,
            geometry.window_width,
            geometry.window_height
        );

        // The old surface is freed before the new one is allocated
        self.surface = None;
        let surface = PixelSurface::new(geometry.pixel_width, geometry.pixel_height)?;
        let grid = TextGrid::new(screen.width, screen.height)?;

        let context = self.context.as_mut().ok_or(DisplayError::ShutDown)?;
        context.resize(&geometry)?;

        self.surface = Some(surface);
        self.grid = grid;
        self.screen = screen;
        self.geometry = geometry;
        self.dirty.mark();

        Ok(())
    }

    /// Resize to the configured default resolution and restore the title
    pub fn reset_to_default(&mut self) -> Result<(), DisplayError> {
        let ScreenConfig {
            width,
            height,
            scale,
        } = self.defaults;
        self.resize(width, height, scale)?;

        if let Some(context) = self.context.as_mut() {
            context.set_title(&self.title);
        }
        Ok(())
    }

    /// Release the surface, then the render context
    ///
    /// Safe to call more than once.
    pub fn shutdown(&mut self) {
        if self.surface.take().is_some() {
            log::debug!("Released pixel surface");
        }
        if let Some(mut context) = self.context.take() {
            log::info!("Shutting down display");
            context.destroy();
        }
    }

    /// Whether `shutdown` has run
    pub fn is_shut_down(&self) -> bool {
        self.context.is_none()
    }

    /// Advance the blink clock by one tick
    ///
    /// When the interval has elapsed the phase toggles and every blinking cell
    /// is redrawn. A tick spanning several intervals still toggles only once.
    ///
    /// # Returns
    /// `true` if the phase toggled
    pub fn advance(&mut self, elapsed_ms: u32) -> bool {
        if !self.blink.advance(elapsed_ms) {
            return false;
        }

        let Some(surface) = self.surface.as_mut() else {
            return true;
        };
        let blink_on = self.blink.is_on();
        for index in self.grid.blinking_cells() {
            self.renderer
                .redraw_cell(index, &self.grid, surface, blink_on);
            self.dirty.mark();
        }
        true
    }

    /// Present the surface if it changed since the last present
    ///
    /// # Returns
    /// `true` if a frame was produced
    pub fn present(&mut self) -> Result<bool, DisplayError> {
        let (Some(context), Some(surface)) = (self.context.as_mut(), self.surface.as_ref()) else {
            return Ok(false);
        };
        self.pipeline.present(&mut self.dirty, surface, context)
    }

    /// Store a cell without drawing it
    pub fn set_cell(
        &mut self,
        index: usize,
        code: CellCode,
        flags: TextFlags,
    ) -> Result<(), DisplayError> {
        self.grid.set_cell(index, code, flags)
    }

    /// Flags of a cell
    pub fn flags(&self, index: usize) -> Result<TextFlags, DisplayError> {
        self.grid.flags(index)
    }

    /// Code of a cell
    pub fn code(&self, index: usize) -> Result<CellCode, DisplayError> {
        self.grid.code(index)
    }

    /// Draw a cell into the surface from its current grid content
    pub fn redraw_cell(&mut self, index: usize) -> Result<(), DisplayError> {
        self.grid.flags(index)?;
        if let Some(surface) = self.surface.as_mut() {
            self.renderer
                .redraw_cell(index, &self.grid, surface, self.blink.is_on());
            self.dirty.mark();
        }
        Ok(())
    }

    /// Store a cell and draw it
    pub fn write_cell(
        &mut self,
        index: usize,
        code: CellCode,
        flags: TextFlags,
    ) -> Result<(), DisplayError> {
        self.set_cell(index, code, flags)?;
        self.redraw_cell(index)
    }

    /// Write text into consecutive cells starting at `index`
    ///
    /// Writing stops at the end of the grid.
    ///
    /// # Returns
    /// Number of cells written
    pub fn write_text(
        &mut self,
        index: usize,
        text: &str,
        fg: u8,
        bg: u8,
        flags: TextFlags,
    ) -> Result<usize, DisplayError> {
        self.grid.flags(index)?;

        let mut written = 0;
        for (cell, c) in (index..self.grid.len()).zip(text.chars()) {
            let glyph = u16::try_from(u32::from(c)).unwrap_or(b'?' as u16);
            self.write_cell(cell, CellCode::new(glyph, fg, bg), flags)?;
            written += 1;
        }
        Ok(written)
    }

    /// Current logical resolution and scale
    pub fn config(&self) -> ScreenConfig {
        self.screen
    }

    /// Pixel sizes for the current resolution
    pub fn geometry(&self) -> ScreenGeometry {
        self.geometry
    }

    pub fn grid(&self) -> &TextGrid {
        &self.grid
    }

    /// The pixel surface, if the display is running
    pub fn surface(&self) -> Option<&PixelSurface> {
        self.surface.as_ref()
    }

    /// Mutable access to the pixel surface
    ///
    /// Marks the surface dirty.
    pub fn surface_mut(&mut self) -> Option<&mut PixelSurface> {
        let surface = self.surface.as_mut()?;
        self.dirty.mark();
        Some(surface)
    }

    /// Force the next present to produce a frame
    pub fn mark_dirty(&mut self) {
        self.dirty.mark();
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.is_set()
    }

    pub fn blink_phase(&self) -> BlinkPhase {
        self.blink.phase()
    }

    /// Whether blinking cells are currently visible
    pub fn blink_on(&self) -> bool {
        self.blink.is_on()
    }

    /// Number of frames presented since initialization
    pub fn frames_presented(&self) -> u64 {
        self.pipeline.frames_presented()
    }

    pub fn context(&self) -> Option<&C> {
        self.context.as_ref()
    }

    pub fn context_mut(&mut self) -> Option<&mut C> {
        self.context.as_mut()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

impl<C: RenderContext, R: TextRenderer> Drop for Display<C, R> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Load and apply the window icon; failures are logged and ignored
fn set_icon<C: RenderContext>(context: &mut C, path: &Path) {
    let result = load_png_surface(path).and_then(|icon| context.set_icon(&icon));
    match result {
        Ok(()) => log::debug!("Window icon set from {}", path.display()),
        Err(e) => log::warn!("Window icon {} not loaded: {}", path.display(), e),
    }
}
