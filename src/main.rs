// Eight - Main Entry Point
//
// Opens the console window and runs a small demo: a banner, a palette strip
// and a blinking cursor.

use eight_rs::display::{
    run_console, CellCode, ConsoleDisplay, DisplayConfig, DisplayError, TextFlags, TickHandler,
    CONFIG_FILE,
};

/// Cursor glyph (full block in CP437)
const CURSOR_GLYPH: u16 = 0xDB;

/// Demo program drawn on startup
struct Banner;

impl TickHandler for Banner {
    fn start(&mut self, display: &mut ConsoleDisplay) -> Result<(), DisplayError> {
        let width = display.config().width as usize;

        let title = concat!("Eight ", env!("CARGO_PKG_VERSION"));
        display.write_text(0, title, 15, 1, TextFlags::empty())?;
        display.write_text(width, "Ready.", 7, 0, TextFlags::UNDERLINE)?;

        for color in 0..16u8 {
            let index = 3 * width + color as usize;
            if index < display.grid().len() {
                display.write_cell(index, CellCode::new(b' ' as u16, 0, color), TextFlags::empty())?;
            }
        }

        let cursor = 5 * width;
        if cursor < display.grid().len() {
            display.write_cell(cursor, CellCode::new(CURSOR_GLYPH, 7, 0), TextFlags::BLINKING)?;
        }
        Ok(())
    }

    fn update(&mut self, _display: &mut ConsoleDisplay, _elapsed_ms: u32) -> Result<(), DisplayError> {
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Eight (eight-rs) v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration, optionally from a path given on the command line
    let config_path = std::env::args().nth(1).unwrap_or_else(|| CONFIG_FILE.to_string());
    let config = DisplayConfig::load_or_default(&config_path);
    log::info!("Configuration loaded from '{}'", config_path);

    run_console(config, Banner)?;

    log::info!("Display window closed.");
    Ok(())
}
