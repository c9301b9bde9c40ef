// Window module - winit window, pixels presenter and the tick loop
//
// `PixelsContext` is the render context for a real window: snapshots are
// written straight into the pixels frame buffer and shown with `render()`.
// `ConsoleApp` drives the fixed-step tick loop on top of winit's event loop.

use super::config::{DisplayConfig, ScreenGeometry};
use super::error::{AssetError, DisplayError, InitError};
use super::lifecycle::Display;
use super::present::{ContextBuilder, RenderContext};
use super::surface::{PixelSurface, BYTES_PER_PIXEL};
use super::text::FontRenderer;
use pixels::{Pixels, SurfaceTexture};
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Icon, Window, WindowId};

/// Display running in a real window
pub type ConsoleDisplay = Display<PixelsContext, FontRenderer>;

/// Render context backed by a winit window and a pixels surface
pub struct PixelsContext {
    window: Arc<Window>,
    pixels: Pixels<'static>,
}

/// Marker for a snapshot living in the pixels frame buffer
#[derive(Debug)]
pub struct PixelsFrame {
    width: u32,
    height: u32,
}

impl PixelsContext {
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Match the presentation surface to the window's physical size
    pub fn resize_surface(&mut self, size: PhysicalSize<u32>) -> Result<(), DisplayError> {
        self.pixels
            .resize_surface(size.width.max(1), size.height.max(1))
            .map_err(|e| DisplayError::Allocation(format!("window surface: {}", e)))
    }
}

impl RenderContext for PixelsContext {
    type Frame = PixelsFrame;

    fn resize(&mut self, geometry: &ScreenGeometry) -> Result<(), DisplayError> {
        let _ = self.window.request_inner_size(LogicalSize::new(
            geometry.window_width,
            geometry.window_height,
        ));

        self.pixels
            .resize_buffer(geometry.pixel_width, geometry.pixel_height)
            .map_err(|e| DisplayError::Allocation(format!("frame buffer: {}", e)))?;
        self.resize_surface(self.window.inner_size())
    }

    fn snapshot(&mut self, surface: &PixelSurface) -> Result<PixelsFrame, DisplayError> {
        let frame = self.pixels.frame_mut();
        if frame.len() != surface.len() * BYTES_PER_PIXEL {
            return Err(DisplayError::Render(format!(
                "frame buffer holds {} bytes, surface needs {}",
                frame.len(),
                surface.len() * BYTES_PER_PIXEL
            )));
        }
        surface.to_rgba(frame);

        Ok(PixelsFrame {
            width: surface.width(),
            height: surface.height(),
        })
    }

    fn show(&mut self, frame: &PixelsFrame) -> Result<(), DisplayError> {
        self.pixels
            .render()
            .map_err(|e| DisplayError::Render(format!("{}x{} frame: {}", frame.width, frame.height, e)))
    }

    fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }

    fn set_icon(&mut self, icon: &PixelSurface) -> Result<(), AssetError> {
        let mut rgba = vec![0u8; icon.len() * BYTES_PER_PIXEL];
        icon.to_rgba(&mut rgba);

        let icon = Icon::from_rgba(rgba, icon.width(), icon.height())
            .map_err(|e| AssetError::Unsupported(e.to_string()))?;
        self.window.set_window_icon(Some(icon));
        Ok(())
    }

    fn destroy(&mut self) {
        // Window and GPU surface are released when the context is dropped
        self.window.set_visible(false);
    }
}

/// Creates the window and pixels surface from inside the event loop
pub struct WinitBuilder<'a> {
    event_loop: &'a ActiveEventLoop,
}

impl<'a> WinitBuilder<'a> {
    pub fn new(event_loop: &'a ActiveEventLoop) -> Self {
        Self { event_loop }
    }
}

impl ContextBuilder for WinitBuilder<'_> {
    type Context = PixelsContext;

    fn build(self, title: &str, geometry: &ScreenGeometry) -> Result<PixelsContext, InitError> {
        let inner_size = LogicalSize::new(geometry.window_width, geometry.window_height);
        let mut window_attributes = Window::default_attributes()
            .with_title(title)
            .with_inner_size(inner_size)
            .with_resizable(false);

        match self.event_loop.primary_monitor() {
            Some(monitor) => {
                let window_size = inner_size.to_physical::<u32>(monitor.scale_factor());
                window_attributes = window_attributes.with_position(centered_position(
                    monitor.position(),
                    monitor.size(),
                    window_size,
                ));
            }
            None => log::debug!("No primary monitor; leaving window placement to the system"),
        }

        let window = self
            .event_loop
            .create_window(window_attributes)
            .map_err(|e| InitError::Windowing(e.to_string()))?;

        // Wrap window in Arc for shared ownership
        let window = Arc::new(window);
        let window_size = window.inner_size();

        // Create surface texture using Arc<Window> for safe 'static lifetime
        let surface_texture =
            SurfaceTexture::new(window_size.width, window_size.height, window.clone());

        let pixels = Pixels::new(geometry.pixel_width, geometry.pixel_height, surface_texture)
            .map_err(|e| InitError::Surface(e.to_string()))?;

        Ok(PixelsContext { window, pixels })
    }
}

/// Top-left position that centers a window on a monitor
///
/// Windows larger than the monitor are pinned to its top-left corner.
fn centered_position(
    monitor_position: PhysicalPosition<i32>,
    monitor_size: PhysicalSize<u32>,
    window_size: PhysicalSize<u32>,
) -> PhysicalPosition<i32> {
    let offset = |monitor: u32, window: u32| (monitor.saturating_sub(window) / 2) as i32;
    PhysicalPosition::new(
        monitor_position.x + offset(monitor_size.width, window_size.width),
        monitor_position.y + offset(monitor_size.height, window_size.height),
    )
}

/// Per-tick program logic driven by `ConsoleApp`
pub trait TickHandler {
    /// Called once after the display is initialized
    fn start(&mut self, _display: &mut ConsoleDisplay) -> Result<(), DisplayError> {
        Ok(())
    }

    /// Update state for one tick, before blinking and presenting
    fn update(&mut self, display: &mut ConsoleDisplay, elapsed_ms: u32) -> Result<(), DisplayError>;
}

/// winit application running the display tick loop
pub struct ConsoleApp<H: TickHandler> {
    config: DisplayConfig,
    handler: H,
    display: Option<ConsoleDisplay>,
    next_tick: Instant,
    error: Option<DisplayError>,
}

impl<H: TickHandler> ConsoleApp<H> {
    pub fn new(config: DisplayConfig, handler: H) -> Self {
        Self {
            config,
            handler,
            display: None,
            next_tick: Instant::now(),
            error: None,
        }
    }

    fn tick_duration(&self) -> Duration {
        Duration::from_millis(self.config.timing.tick_ms.max(1) as u64)
    }

    /// Run one tick: update, blink, present
    fn tick(&mut self) -> Result<(), DisplayError> {
        let elapsed = self.config.timing.tick_ms;
        let Some(display) = self.display.as_mut() else {
            return Ok(());
        };

        self.handler.update(display, elapsed)?;
        display.advance(elapsed);
        display.present()?;
        Ok(())
    }

    /// Log an error; fatal ones shut the display down and stop the loop
    fn handle_error(&mut self, event_loop: &ActiveEventLoop, err: DisplayError) {
        if !err.is_fatal() {
            log::warn!("{}", err);
            return;
        }

        log::error!("{}", err);
        if let Some(display) = self.display.as_mut() {
            display.shutdown();
        }
        self.error = Some(err);
        event_loop.exit();
    }

    /// Fatal error that stopped the loop, if any
    pub fn take_error(&mut self) -> Option<DisplayError> {
        self.error.take()
    }
}

impl<H: TickHandler> ApplicationHandler for ConsoleApp<H> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.display.is_some() {
            return;
        }

        log::info!("Initializing display...");
        let result = Display::initialize(&self.config, WinitBuilder::new(event_loop))
            .and_then(|mut display| {
                self.handler.start(&mut display)?;
                Ok(display)
            });

        match result {
            Ok(display) => {
                self.display = Some(display);
                self.next_tick = Instant::now();
            }
            Err(err) => self.handle_error(event_loop, err),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(display) = self.display.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting...");
                display.shutdown();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                let result = match display.context_mut() {
                    Some(context) => context.resize_surface(size),
                    None => Ok(()),
                };
                display.mark_dirty();
                if let Err(err) = result {
                    self.handle_error(event_loop, err);
                }
            }
            WindowEvent::RedrawRequested => {
                // Window contents were lost; show the surface again
                display.mark_dirty();
                if let Err(err) = display.present() {
                    self.handle_error(event_loop, err);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.display.as_ref().map_or(true, |d| d.is_shut_down()) {
            return;
        }

        let now = Instant::now();
        if now >= self.next_tick {
            if let Err(err) = self.tick() {
                self.handle_error(event_loop, err);
            }

            self.next_tick += self.tick_duration();
            // Fell behind: resume the cadence from now instead of catching up
            if self.next_tick < now {
                self.next_tick = now + self.tick_duration();
            }
        }

        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_tick));
    }
}

/// Create the window and run the tick loop until it closes
///
/// # Returns
/// The fatal error that ended the loop, if any
pub fn run_console<H: TickHandler>(
    config: DisplayConfig,
    handler: H,
) -> Result<(), Box<dyn std::error::Error>> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    log::info!("Starting console...");
    log::info!(
        "  Resolution: {}x{} cells",
        config.screen.width,
        config.screen.height
    );
    log::info!("  Scale: {}x", config.screen.scale);
    log::info!("  Tick: {}ms", config.timing.tick_ms);

    let mut app = ConsoleApp::new(config, handler);
    event_loop.run_app(&mut app)?;

    match app.take_error() {
        Some(err) => Err(Box::new(err)),
        None => Ok(()),
    }
}
