//! Minimal BMP container writer: 14-byte file header, 40-byte BITMAPINFOHEADER,
//! bottom-up 32bpp BGRA pixel data. Rows are already a multiple of 4 bytes at
//! 32bpp, so no row padding logic is needed (unlike 24bpp BMPs).

use std::io::Write;
use std::path::Path;

use crate::error::RenderError;
use crate::image::Image;

const FILE_HEADER_SIZE: u32 = 14;
const INFO_HEADER_SIZE: u32 = 40;
const BITS_PER_PIXEL: u16 = 32;

fn file_header(pixel_data_size: u32) -> Vec<u8> {
    let file_size = FILE_HEADER_SIZE + INFO_HEADER_SIZE + pixel_data_size;
    let pixel_data_offset = FILE_HEADER_SIZE + INFO_HEADER_SIZE;

    let mut header = Vec::with_capacity(FILE_HEADER_SIZE as usize);
    header.extend_from_slice(b"BM");
    header.extend_from_slice(&file_size.to_le_bytes());
    header.extend_from_slice(&0u16.to_le_bytes()); // reserved1
    header.extend_from_slice(&0u16.to_le_bytes()); // reserved2
    header.extend_from_slice(&pixel_data_offset.to_le_bytes());
    header
}

fn info_header(width: u32, height: u32) -> Vec<u8> {
    let image_size = width * height * (BITS_PER_PIXEL as u32 / 8);

    let mut header = Vec::with_capacity(INFO_HEADER_SIZE as usize);
    header.extend_from_slice(&INFO_HEADER_SIZE.to_le_bytes());
    header.extend_from_slice(&(width as i32).to_le_bytes());
    header.extend_from_slice(&(height as i32).to_le_bytes());
    header.extend_from_slice(&1u16.to_le_bytes()); // planes
    header.extend_from_slice(&BITS_PER_PIXEL.to_le_bytes());
    header.extend_from_slice(&0u32.to_le_bytes()); // compression: BI_RGB
    header.extend_from_slice(&image_size.to_le_bytes());
    header.extend_from_slice(&2835i32.to_le_bytes()); // x pixels per meter (~72 dpi)
    header.extend_from_slice(&2835i32.to_le_bytes()); // y pixels per meter
    header.extend_from_slice(&0u32.to_le_bytes()); // colours used
    header.extend_from_slice(&0u32.to_le_bytes()); // important colours
    header
}

/// Writes `image` to `path` as a bottom-up 32bpp BGRA BMP.
pub fn write_file(path: impl AsRef<Path>, image: &Image) -> Result<(), RenderError> {
    let path = path.as_ref();
    let width = image.width();
    let height = image.height();
    let pixels = image.as_slice();

    let pixel_data_size = width * height * (BITS_PER_PIXEL as u32 / 8);

    let mut file = std::fs::File::create(path).map_err(|source| RenderError::IoFailure {
        path: path.to_path_buf(),
        source,
    })?;

    let write_all = |file: &mut std::fs::File, bytes: &[u8]| {
        file.write_all(bytes).map_err(|source| RenderError::IoFailure {
            path: path.to_path_buf(),
            source,
        })
    };

    write_all(&mut file, &file_header(pixel_data_size))?;
    write_all(&mut file, &info_header(width, height))?;

    // The image's row 0 is already its bottom row (origin bottom-left, Y
    // increases upward), which is exactly what a bottom-up BMP expects as
    // its first row of pixel data — no reversal needed.
    for y in 0..height {
        let row_start = y as usize * width as usize;
        let row = &pixels[row_start..row_start + width as usize];
        let mut row_bytes = Vec::with_capacity(row.len() * 4);
        for &pixel in row {
            row_bytes.extend_from_slice(&pixel.to_le_bytes());
        }
        write_all(&mut file, &row_bytes)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::pack_bgra;

    #[test]
    fn written_file_has_expected_size_and_magic() {
        let image = Image::new(4, 3).unwrap();
        for y in 0..3 {
            for x in 0..4 {
                image.write_pixel(x, y, pack_bgra(10, 20, 30));
            }
        }

        let dir = std::env::temp_dir();
        let path = dir.join(format!("pathtracer_bmp_test_{}.bmp", std::process::id()));
        write_file(&path, &image).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(&bytes[0..2], b"BM");
        let expected_size = 14 + 40 + 4 * 3 * 4;
        assert_eq!(bytes.len(), expected_size);

        let declared_size = u32::from_le_bytes(bytes[2..6].try_into().unwrap());
        assert_eq!(declared_size as usize, expected_size);
    }

    #[test]
    fn image_row_zero_is_written_first() {
        let image = Image::new(1, 2).unwrap();
        image.write_pixel(0, 0, pack_bgra(1, 1, 1));
        image.write_pixel(0, 1, pack_bgra(2, 2, 2));

        let dir = std::env::temp_dir();
        let path = dir.join(format!("pathtracer_bmp_order_test_{}.bmp", std::process::id()));
        write_file(&path, &image).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let pixel_data = &bytes[54..];
        // Image row 0 is already the bottom row (origin bottom-left), which
        // is exactly what a bottom-up BMP expects to read first.
        assert_eq!(pixel_data[0], 1);
        assert_eq!(pixel_data[4], 2);
    }
}
