//! ICO container writer.
//!
//! Windows icon files are little-endian: a 6-byte ICONDIR header, one
//! 16-byte directory entry per image, then per image a 40-byte
//! BITMAPINFOHEADER and the pixel data. The DIB quirks all live here:
//! the header height is doubled to account for the implicit AND mask,
//! and rows are stored bottom-up in BGRA order, the reverse of the
//! natural top-down RGBA raster.

use crate::surface::Surface;

const HEADER_SIZE: u32 = 6;
const DIRECTORY_SIZE: u32 = 16;
const BITMAP_HEADER_SIZE: u32 = 40;
const BYTES_PER_PIXEL: u32 = 4;

/// Encodes rendered surfaces into an ICO container, one directory
/// entry per surface in order.
pub fn make_ico(images: &[Surface]) -> Vec<u8> {
    let mut out = Vec::new();

    // ICONDIR: reserved, type (1 = icon), count.
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&(images.len() as u16).to_le_bytes());

    let mut offset = HEADER_SIZE + DIRECTORY_SIZE * images.len() as u32;
    for surface in images {
        write_directory_entry(&mut out, surface, offset);
        offset += pixel_data_len(surface) + BITMAP_HEADER_SIZE;
    }

    for surface in images {
        write_bitmap_header(&mut out, surface);
        write_dib(&mut out, surface);
    }

    out
}

fn pixel_data_len(surface: &Surface) -> u32 {
    surface.width() * surface.height() * BYTES_PER_PIXEL
}

fn write_directory_entry(out: &mut Vec<u8>, surface: &Surface, offset: u32) {
    // Width and height are single bytes; 0 means 256.
    let dim_byte = |d: u32| if d == 256 { 0u8 } else { d as u8 };
    out.push(dim_byte(surface.width()));
    out.push(dim_byte(surface.height()));
    out.push(0); // palette size (no palette)
    out.push(0); // reserved
    out.extend_from_slice(&1u16.to_le_bytes()); // color planes
    out.extend_from_slice(&32u16.to_le_bytes()); // bits per pixel
    out.extend_from_slice(&(pixel_data_len(surface) + BITMAP_HEADER_SIZE).to_le_bytes());
    out.extend_from_slice(&offset.to_le_bytes());
}

fn write_bitmap_header(out: &mut Vec<u8>, surface: &Surface) {
    out.extend_from_slice(&BITMAP_HEADER_SIZE.to_le_bytes());
    out.extend_from_slice(&(surface.width() as i32).to_le_bytes());
    // Height is doubled: the XOR (color) plane plus the implicit
    // 1-bit AND mask below it.
    out.extend_from_slice(&(surface.height() as i32 * 2).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // planes
    out.extend_from_slice(&(8 * BYTES_PER_PIXEL as u16).to_le_bytes()); // bit count
    out.extend_from_slice(&0u32.to_le_bytes()); // compression (BI_RGB)
    out.extend_from_slice(&pixel_data_len(surface).to_le_bytes());
    out.extend_from_slice(&0i32.to_le_bytes()); // x pixels per meter
    out.extend_from_slice(&0i32.to_le_bytes()); // y pixels per meter
    out.extend_from_slice(&0u32.to_le_bytes()); // colors used
    out.extend_from_slice(&0u32.to_le_bytes()); // important colors
}

/// Writes the pixel buffer bottom-up and channel-swapped to BGRA.
fn write_dib(out: &mut Vec<u8>, surface: &Surface) {
    let rgba = surface.to_rgba();
    let (w, h) = (rgba.width(), rgba.height());
    for y in (0..h).rev() {
        for x in 0..w {
            let [r, g, b, a] = rgba.get_pixel(x, y).0;
            out.extend_from_slice(&[b, g, r, a]);
        }
    }
}
