// Bitmap font - Fixed-width glyph sheet loaded from a PNG
//
// The sheet is a 16x16 grid of glyphs (256 total). Every glyph has the same
// cell size, derived from the image dimensions. A sheet pixel counts as ink
// when it is bright and opaque.

use super::error::{AssetError, InitError};
use super::image::{decode_png, expand_rgba};
use std::io;
use std::path::Path;

/// Glyphs per sheet row and column
pub const SHEET_GLYPHS: u32 = 16;

/// Number of glyphs in a sheet
pub const GLYPH_COUNT: usize = (SHEET_GLYPHS * SHEET_GLYPHS) as usize;

/// Glyph drawn for codes outside the sheet
pub const REPLACEMENT_GLYPH: u16 = b'?' as u16;

const INK_THRESHOLD: u8 = 128;

/// Fixed-width bitmap font
#[derive(Debug, Clone)]
pub struct BitmapFont {
    glyph_width: u32,
    glyph_height: u32,
    /// Ink mask per glyph, `glyph_width * glyph_height` entries each
    glyphs: Vec<Vec<bool>>,
}

impl BitmapFont {
    /// Load a glyph sheet from a PNG file
    ///
    /// # Returns
    /// `InitError::FontMissing` if the file does not exist,
    /// `InitError::FontCorrupt` if it cannot be decoded or has unusable dimensions
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, InitError> {
        let path = path.as_ref();
        let corrupt = |reason: String| InitError::FontCorrupt {
            path: path.to_path_buf(),
            reason,
        };

        let image = decode_png(path).map_err(|e| match e {
            AssetError::Io(ref io) if io.kind() == io::ErrorKind::NotFound => {
                InitError::FontMissing(path.to_path_buf())
            }
            other => corrupt(other.to_string()),
        })?;

        if image.width == 0
            || image.height == 0
            || image.width % SHEET_GLYPHS != 0
            || image.height % SHEET_GLYPHS != 0
        {
            return Err(corrupt(format!(
                "sheet {}x{} is not a {}x{} glyph grid",
                image.width, image.height, SHEET_GLYPHS, SHEET_GLYPHS
            )));
        }

        let glyph_width = image.width / SHEET_GLYPHS;
        let glyph_height = image.height / SHEET_GLYPHS;
        let mut glyphs = vec![vec![false; (glyph_width * glyph_height) as usize]; GLYPH_COUNT];

        for y in 0..image.height {
            let start = y as usize * image.stride;
            let row = image
                .data
                .get(start..start + image.width as usize * image.samples)
                .ok_or_else(|| corrupt(format!("sheet data truncated at row {}", y)))?;

            for (x, px) in row.chunks_exact(image.samples).enumerate() {
                let x = x as u32;
                let glyph = ((y / glyph_height) * SHEET_GLYPHS + x / glyph_width) as usize;
                let offset = ((y % glyph_height) * glyph_width + x % glyph_width) as usize;
                glyphs[glyph][offset] = is_ink(px);
            }
        }

        log::debug!(
            "Loaded font {} ({}x{} glyphs)",
            path.display(),
            glyph_width,
            glyph_height
        );

        Ok(Self {
            glyph_width,
            glyph_height,
            glyphs,
        })
    }

    /// Build a font from raw ink masks
    ///
    /// Glyphs beyond the supplied ones are blank.
    pub fn from_masks(glyph_width: u32, glyph_height: u32, masks: Vec<Vec<bool>>) -> Self {
        let size = (glyph_width * glyph_height) as usize;
        let mut glyphs: Vec<Vec<bool>> = masks
            .into_iter()
            .take(GLYPH_COUNT)
            .map(|mut m| {
                m.resize(size, false);
                m
            })
            .collect();
        glyphs.resize(GLYPH_COUNT, vec![false; size]);

        Self {
            glyph_width: glyph_width.max(1),
            glyph_height: glyph_height.max(1),
            glyphs,
        }
    }

    /// Width of one glyph cell in pixels
    pub fn glyph_width(&self) -> u32 {
        self.glyph_width
    }

    /// Height of one glyph cell in pixels
    pub fn glyph_height(&self) -> u32 {
        self.glyph_height
    }

    /// Ink mask of a glyph
    ///
    /// Codes outside the sheet fall back to `?`.
    pub fn glyph(&self, code: u16) -> &[bool] {
        let index = if (code as usize) < GLYPH_COUNT {
            code
        } else {
            REPLACEMENT_GLYPH
        };
        &self.glyphs[index as usize]
    }
}

fn is_ink(px: &[u8]) -> bool {
    let Some([r, g, b, a]) = expand_rgba(px) else {
        return false;
    };
    // Rec. 601 luma
    let luma = (299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000;
    luma >= INK_THRESHOLD as u32 && a >= INK_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::BufWriter;

    /// Write a grayscale sheet where glyph `g` has its top-left pixel inked
    /// when `g` is odd
    fn write_sheet(path: &Path, glyph_w: u32, glyph_h: u32) {
        let width = glyph_w * SHEET_GLYPHS;
        let height = glyph_h * SHEET_GLYPHS;
        let mut data = vec![0u8; (width * height) as usize];
        for g in (1..GLYPH_COUNT as u32).step_by(2) {
            let x = (g % SHEET_GLYPHS) * glyph_w;
            let y = (g / SHEET_GLYPHS) * glyph_h;
            data[(y * width + x) as usize] = 0xFF;
        }

        let file = File::create(path).unwrap();
        let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&data).unwrap();
    }

    #[test]
    fn test_load_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("font.png");
        write_sheet(&path, 8, 16);

        let font = BitmapFont::load(&path).unwrap();
        assert_eq!(font.glyph_width(), 8);
        assert_eq!(font.glyph_height(), 16);
        assert!(font.glyph(65)[0]);
        assert!(!font.glyph(64)[0]);
        assert!(!font.glyph(65)[1]);
    }

    #[test]
    fn test_missing_font() {
        let result = BitmapFont::load("no/such/font.png");
        assert!(matches!(result, Err(InitError::FontMissing(_))));
    }

    #[test]
    fn test_corrupt_font() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("font.png");
        std::fs::write(&path, b"garbage").unwrap();

        assert!(matches!(
            BitmapFont::load(&path),
            Err(InitError::FontCorrupt { .. })
        ));
    }

    #[test]
    fn test_sheet_not_divisible() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("font.png");
        let file = File::create(&path).unwrap();
        let mut encoder = png::Encoder::new(BufWriter::new(file), 17, 16);
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&[0u8; 17 * 16]).unwrap();
        drop(writer);

        assert!(matches!(
            BitmapFont::load(&path),
            Err(InitError::FontCorrupt { .. })
        ));
    }

    #[test]
    fn test_out_of_sheet_code_uses_replacement() {
        let mut masks = vec![vec![false; 4]; GLYPH_COUNT];
        masks[REPLACEMENT_GLYPH as usize] = vec![true; 4];
        let font = BitmapFont::from_masks(2, 2, masks);

        assert_eq!(font.glyph(0x1234), &[true; 4]);
        assert_eq!(font.glyph(0), &[false; 4]);
    }

    #[test]
    fn test_ink_needs_bright_and_opaque() {
        assert!(is_ink(&[0xFF]));
        assert!(!is_ink(&[0x40]));
        assert!(is_ink(&[0xFF, 0xFF]));
        // Bright but transparent
        assert!(!is_ink(&[0xFF, 0x20]));
        assert!(is_ink(&[0xFF, 0xFF, 0xFF, 0xFF]));
        // Pure blue is too dark
        assert!(!is_ink(&[0, 0, 0xFF]));
        assert!(!is_ink(&[]));
    }
}
