// Image loading - PNG files into pixel surfaces
//
// Used for the window icon and the bitmap font sheet. Decoded rows are copied
// into the destination one row at a time using the source line stride, so
// padded or differently laid out sources never index out of bounds.

use super::error::AssetError;
use super::palette::rgba_to_packed;
use super::surface::PixelSurface;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// PNG data normalized to 8 bits per sample
#[derive(Debug)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// Samples per pixel (1 gray, 2 gray+alpha, 3 RGB, 4 RGBA)
    pub samples: usize,
    /// Bytes per source row
    pub stride: usize,
    pub data: Vec<u8>,
}

/// Decode a PNG file
pub fn decode_png<P: AsRef<Path>>(path: P) -> Result<DecodedImage, AssetError> {
    let file = File::open(path)?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);

    let mut reader = decoder.read_info()?;
    let (color_type, _) = reader.output_color_type();
    let (width, height) = {
        let info = reader.info();
        (info.width, info.height)
    };
    let samples = color_type.samples();

    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(samples))
        .ok_or_else(|| AssetError::Unsupported(format!("image {}x{} too large", width, height)))?;
    let mut data = vec![0u8; len];
    let frame = reader.next_frame(&mut data)?;

    Ok(DecodedImage {
        width: frame.width,
        height: frame.height,
        samples,
        stride: frame.line_size,
        data,
    })
}

/// Expand one 1-4 sample source pixel to RGBA bytes
pub fn expand_rgba(px: &[u8]) -> Option<[u8; 4]> {
    match *px {
        [g] => Some([g, g, g, 0xFF]),
        [g, a] => Some([g, g, g, a]),
        [r, g, b] => Some([r, g, b, 0xFF]),
        [r, g, b, a] => Some([r, g, b, a]),
        _ => None,
    }
}

/// Copy decoded rows into a surface of the same size
///
/// Every row is bounds-checked against both the source stride and the
/// destination row length.
pub fn copy_rows(image: &DecodedImage, dst: &mut PixelSurface) -> Result<(), AssetError> {
    if dst.width() != image.width || dst.height() != image.height {
        return Err(AssetError::Unsupported(format!(
            "destination {}x{} does not match image {}x{}",
            dst.width(),
            dst.height(),
            image.width,
            image.height
        )));
    }
    if !(1..=4).contains(&image.samples) {
        return Err(AssetError::Unsupported(format!(
            "{} samples per pixel",
            image.samples
        )));
    }

    let row_bytes = image.width as usize * image.samples;
    if image.stride < row_bytes {
        return Err(AssetError::Unsupported(format!(
            "stride {} shorter than row ({} bytes)",
            image.stride, row_bytes
        )));
    }

    for y in 0..image.height {
        let start = y as usize * image.stride;
        let src_row = image
            .data
            .get(start..start + row_bytes)
            .ok_or_else(|| AssetError::Unsupported(format!("image data truncated at row {}", y)))?;
        let dst_row = dst
            .row_mut(y)
            .ok_or_else(|| AssetError::Unsupported(format!("destination has no row {}", y)))?;

        for (out, px) in dst_row.iter_mut().zip(src_row.chunks_exact(image.samples)) {
            if let Some(rgba) = expand_rgba(px) {
                *out = rgba_to_packed(rgba);
            }
        }
    }

    Ok(())
}

/// Load a PNG file as a new pixel surface
pub fn load_png_surface<P: AsRef<Path>>(path: P) -> Result<PixelSurface, AssetError> {
    let image = decode_png(path)?;
    let mut surface = PixelSurface::new(image.width, image.height)
        .map_err(|e| AssetError::Unsupported(e.to_string()))?;
    copy_rows(&image, &mut surface)?;
    Ok(surface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufWriter;

    fn write_png(path: &Path, width: u32, height: u32, color: png::ColorType, data: &[u8]) {
        let file = File::create(path).unwrap();
        let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(data).unwrap();
    }

    #[test]
    fn test_load_rgba_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icon.png");
        let data = [
            0xFF, 0x00, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0x80, //
            0x00, 0x00, 0xFF, 0xFF, 0x10, 0x20, 0x30, 0x40,
        ];
        write_png(&path, 2, 2, png::ColorType::Rgba, &data);

        let surface = load_png_surface(&path).unwrap();
        assert_eq!(surface.width(), 2);
        assert_eq!(surface.height(), 2);
        assert_eq!(surface.get_pixel(0, 0), 0xFF0000FF);
        assert_eq!(surface.get_pixel(1, 0), 0x00FF0080);
        assert_eq!(surface.get_pixel(0, 1), 0x0000FFFF);
        assert_eq!(surface.get_pixel(1, 1), 0x10203040);
    }

    #[test]
    fn test_load_grayscale_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        write_png(&path, 3, 1, png::ColorType::Grayscale, &[0x00, 0x80, 0xFF]);

        let surface = load_png_surface(&path).unwrap();
        assert_eq!(surface.get_pixel(0, 0), 0x000000FF);
        assert_eq!(surface.get_pixel(1, 0), 0x808080FF);
        assert_eq!(surface.get_pixel(2, 0), 0xFFFFFFFF);
    }

    #[test]
    fn test_missing_file() {
        let result = load_png_surface("definitely/not/here.png");
        assert!(matches!(result, Err(AssetError::Io(_))));
    }

    #[test]
    fn test_not_a_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bogus.png");
        std::fs::write(&path, b"not a png at all").unwrap();

        assert!(matches!(
            load_png_surface(&path),
            Err(AssetError::Decode(_))
        ));
    }

    #[test]
    fn test_copy_rows_honours_stride() {
        // 2x2 RGB image with 2 bytes of padding per row
        let image = DecodedImage {
            width: 2,
            height: 2,
            samples: 3,
            stride: 8,
            data: vec![
                1, 2, 3, 4, 5, 6, 0xEE, 0xEE, //
                7, 8, 9, 10, 11, 12, 0xEE, 0xEE,
            ],
        };
        let mut surface = PixelSurface::new(2, 2).unwrap();
        copy_rows(&image, &mut surface).unwrap();

        assert_eq!(surface.get_pixel(0, 0), 0x010203FF);
        assert_eq!(surface.get_pixel(1, 0), 0x040506FF);
        assert_eq!(surface.get_pixel(0, 1), 0x070809FF);
        assert_eq!(surface.get_pixel(1, 1), 0x0A0B0CFF);
    }

    #[test]
    fn test_copy_rows_truncated_source() {
        let image = DecodedImage {
            width: 2,
            height: 2,
            samples: 4,
            stride: 8,
            data: vec![0; 12],
        };
        let mut surface = PixelSurface::new(2, 2).unwrap();
        assert!(matches!(
            copy_rows(&image, &mut surface),
            Err(AssetError::Unsupported(_))
        ));
    }

    #[test]
    fn test_copy_rows_size_mismatch() {
        let image = DecodedImage {
            width: 2,
            height: 2,
            samples: 4,
            stride: 8,
            data: vec![0; 16],
        };
        let mut surface = PixelSurface::new(3, 2).unwrap();
        assert!(copy_rows(&image, &mut surface).is_err());
    }

    #[test]
    fn test_expand_rgba_sample_counts() {
        assert_eq!(expand_rgba(&[0x80]), Some([0x80, 0x80, 0x80, 0xFF]));
        assert_eq!(expand_rgba(&[0x80, 0x10]), Some([0x80, 0x80, 0x80, 0x10]));
        assert_eq!(expand_rgba(&[1, 2, 3]), Some([1, 2, 3, 0xFF]));
        assert_eq!(expand_rgba(&[1, 2, 3, 4]), Some([1, 2, 3, 4]));
        assert_eq!(expand_rgba(&[]), None);
        assert_eq!(expand_rgba(&[1, 2, 3, 4, 5]), None);
    }
}
