// Text rendering - Draws grid cells into the pixel surface
//
// The display never writes glyph pixels itself. It asks a `TextRenderer` to
// redraw a cell and marks the surface dirty afterwards.

use super::flags::CellCode;
use super::font::BitmapFont;
use super::grid::TextGrid;
use super::palette::palette_to_packed;
use super::surface::PixelSurface;

/// Draws one text grid cell into the surface
pub trait TextRenderer {
    /// Glyph cell size in pixels (width, height)
    fn cell_size(&self) -> (u32, u32);

    /// Redraw the cell at `index` from its current code and flags
    ///
    /// `blink_on` is the current blink phase. Indices outside the grid are
    /// ignored.
    fn redraw_cell(
        &mut self,
        index: usize,
        grid: &TextGrid,
        surface: &mut PixelSurface,
        blink_on: bool,
    );
}

/// Renders cells with a bitmap font and the console palette
#[derive(Debug, Clone)]
pub struct FontRenderer {
    font: BitmapFont,
}

impl FontRenderer {
    pub fn new(font: BitmapFont) -> Self {
        Self { font }
    }

    pub fn font(&self) -> &BitmapFont {
        &self.font
    }
}

impl TextRenderer for FontRenderer {
    fn cell_size(&self) -> (u32, u32) {
        (self.font.glyph_width(), self.font.glyph_height())
    }

    fn redraw_cell(
        &mut self,
        index: usize,
        grid: &TextGrid,
        surface: &mut PixelSurface,
        blink_on: bool,
    ) {
        let (Ok(code), Ok(flags), Some((col, row))) =
            (grid.code(index), grid.flags(index), grid.position_of(index))
        else {
            return;
        };

        let (gw, gh) = self.cell_size();
        let x0 = col * gw;
        let y0 = row * gh;
        if x0 + gw > surface.width() || y0 + gh > surface.height() {
            return;
        }

        let (mut fg, mut bg) = colors(code);
        if flags.is_inverted() {
            std::mem::swap(&mut fg, &mut bg);
        }

        surface.fill_rect(x0, y0, gw, gh, bg);
        if flags.is_blinking() && !blink_on {
            return;
        }

        let mask = self.font.glyph(code.glyph());
        for (i, _) in mask.iter().enumerate().filter(|&(_, &ink)| ink) {
            let i = i as u32;
            surface.set_pixel(x0 + i % gw, y0 + i / gw, fg);
        }

        if flags.is_underlined() {
            surface.fill_rect(x0, y0 + gh - 1, gw, 1, fg);
        }
    }
}

fn colors(code: CellCode) -> (u32, u32) {
    (palette_to_packed(code.fg()), palette_to_packed(code.bg()))
}
