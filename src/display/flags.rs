// Cell flags - Per-cell attribute bits and packed cell codes
//
// Named bits are interpreted by the text renderer; any other bits are stored
// and read back unchanged.

use super::palette::{DEFAULT_BG, DEFAULT_FG};
use bitflags::bitflags;

bitflags! {
    /// Attribute bits stored alongside every text grid cell
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TextFlags: u8 {
        const BLINKING  = 1 << 0;
        const INVERTED  = 1 << 1;
        const UNDERLINE = 1 << 2;

        const _ = !0;
    }
}

impl TextFlags {
    /// Whether the cell takes part in the blink cycle
    #[inline]
    pub fn is_blinking(self) -> bool {
        self.contains(TextFlags::BLINKING)
    }

    /// Whether foreground and background are swapped
    #[inline]
    pub fn is_inverted(self) -> bool {
        self.contains(TextFlags::INVERTED)
    }

    #[inline]
    pub fn is_underlined(self) -> bool {
        self.contains(TextFlags::UNDERLINE)
    }
}

const GLYPH_MASK: u64 = 0xFFFF;
const FG_SHIFT: u32 = 16;
const BG_SHIFT: u32 = 20;
const COLOR_MASK: u64 = 0xF;

/// Opaque cell code: glyph index plus packed colors
///
/// Layout: bits 0-15 glyph, 16-19 foreground, 20-23 background. Higher bits
/// are kept but not interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellCode(pub u64);

impl CellCode {
    /// Pack a glyph with explicit palette colors
    pub fn new(glyph: u16, fg: u8, bg: u8) -> Self {
        CellCode(
            glyph as u64
                | ((fg as u64 & COLOR_MASK) << FG_SHIFT)
                | ((bg as u64 & COLOR_MASK) << BG_SHIFT),
        )
    }

    /// Pack a character using the default colors
    ///
    /// Characters outside the 16-bit glyph range map to `?`
    pub fn from_char(c: char) -> Self {
        let glyph = u16::try_from(u32::from(c)).unwrap_or(b'?' as u16);
        Self::new(glyph, DEFAULT_FG, DEFAULT_BG)
    }

    #[inline]
    pub fn glyph(self) -> u16 {
        (self.0 & GLYPH_MASK) as u16
    }

    #[inline]
    pub fn fg(self) -> u8 {
        ((self.0 >> FG_SHIFT) & COLOR_MASK) as u8
    }

    #[inline]
    pub fn bg(self) -> u8 {
        ((self.0 >> BG_SHIFT) & COLOR_MASK) as u8
    }
}

impl From<u64> for CellCode {
    fn from(raw: u64) -> Self {
        CellCode(raw)
    }
}
