// Console Color Palette - RGBA conversions for the 16 text colors
//
// Cell codes carry 4-bit foreground/background indices into this palette.
// Colors are stored packed as 0xRRGGBBAA, the same layout the pixel surface
// uses, so a palette lookup can be written to the surface without conversion.

/// Number of entries in the console palette
pub const PALETTE_SIZE: usize = 16;

/// Console master palette in packed RGBA format (16 colors)
///
/// Ordering follows the classic CGA text-mode palette: 8 base colors
/// followed by their bright variants.
pub const CONSOLE_PALETTE: [u32; PALETTE_SIZE] = [
    // 0-7
    0x000000FF, 0x0000AAFF, 0x00AA00FF, 0x00AAAAFF, 0xAA0000FF, 0xAA00AAFF, 0xAA5500FF, 0xAAAAAAFF,
    // 8-15
    0x555555FF, 0x5555FFFF, 0x55FF55FF, 0x55FFFFFF, 0xFF5555FF, 0xFF55FFFF, 0xFFFF55FF, 0xFFFFFFFF,
];

/// Default foreground palette index (light gray)
pub const DEFAULT_FG: u8 = 7;

/// Default background palette index (black)
pub const DEFAULT_BG: u8 = 0;

/// Convert a palette index to a packed RGBA color
///
/// Indices wrap at 16.
#[inline]
pub fn palette_to_packed(index: u8) -> u32 {
    CONSOLE_PALETTE[(index as usize) % PALETTE_SIZE]
}

/// Unpack a 0xRRGGBBAA color into [R, G, B, A] bytes
#[inline]
pub fn packed_to_rgba(packed: u32) -> [u8; 4] {
    packed.to_be_bytes()
}

/// Pack [R, G, B, A] bytes into a 0xRRGGBBAA color
#[inline]
pub fn rgba_to_packed(rgba: [u8; 4]) -> u32 {
    u32::from_be_bytes(rgba)
}
