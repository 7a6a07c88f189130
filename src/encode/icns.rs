//! ICNS container writer.
//!
//! An ICNS file is a big-endian TLV stream: an 8-byte header (`icns`
//! magic plus total file size) followed by chunks of
//! `{4-byte ASCII type, u32 size including the 8-byte chunk header,
//! payload}`. Modern OS types embed complete PNG files; the legacy
//! small-size family stores RLE-packed planar RGB plus a separate
//! uncompressed 8-bit alpha mask.

use crate::encode::packbits;
use crate::error::RenderError;
use crate::surface::Surface;

const HEADER_SIZE: u32 = 8;

/// Modern OS type codes embedding PNG payloads, by icon pixel size.
/// The table is fixed; sizes not listed are skipped.
pub const PNG_OS_TYPES: &[(u32, &[&str])] = &[
    (16, &["icp4"]),
    (32, &["icp5", "ic11"]),
    (64, &["icp6", "ic12"]),
    (128, &["ic07"]),
    (256, &["ic08", "ic13"]),
    (512, &["ic09", "ic14"]),
    (1024, &["ic10"]),
];

/// Legacy RLE entries: (size, packed-RGB chunk type, alpha mask chunk
/// type).
pub const LEGACY_OS_TYPES: &[(u32, &str, &str)] = &[
    (16, "is32", "s8mk"),
    (32, "il32", "l8mk"),
    (48, "ih32", "h8mk"),
    (128, "it32", "t8mk"),
];

/// Writer options.
#[derive(Debug, Clone, Copy, Default)]
pub struct IcnsOptions {
    /// Also emit the legacy packed-RGB chunks (and their masks) for
    /// the sizes that have them. Old tooling still reads these.
    pub legacy: bool,
}

/// All icon pixel sizes the writer can place in a container.
pub fn supported_sizes(options: &IcnsOptions) -> Vec<u32> {
    let mut sizes: Vec<u32> = PNG_OS_TYPES.iter().map(|(s, _)| *s).collect();
    if options.legacy {
        for (s, _, _) in LEGACY_OS_TYPES {
            if !sizes.contains(s) {
                sizes.push(*s);
            }
        }
    }
    sizes.sort_unstable();
    sizes
}

/// Encodes rendered surfaces into an ICNS container.
///
/// Each surface is mapped to chunks by its width; surfaces whose size
/// has no OS type are skipped silently (not an error).
pub fn make_icns(images: &[Surface], options: &IcnsOptions) -> Result<Vec<u8>, RenderError> {
    let mut chunks: Vec<Vec<u8>> = Vec::new();

    for surface in images {
        let size = surface.width();
        let mut matched = false;

        if let Some((_, types)) = PNG_OS_TYPES.iter().find(|(s, _)| *s == size) {
            let png = surface.encode_png()?;
            for os_type in *types {
                chunks.push(make_chunk(os_type, &png));
            }
            matched = true;
        }

        if options.legacy {
            if let Some((_, data_type, mask_type)) =
                LEGACY_OS_TYPES.iter().find(|(s, _, _)| *s == size)
            {
                chunks.push(make_chunk(data_type, &packed_rgb_payload(surface)));
                chunks.push(make_chunk(mask_type, &alpha_mask_payload(surface)));
                matched = true;
            }
        }

        if !matched {
            log::debug!("make_icns: no OS type for {size}px, skipping");
        }
    }

    let total_size = HEADER_SIZE + chunks.iter().map(|c| c.len() as u32).sum::<u32>();
    let mut out = Vec::with_capacity(total_size as usize);
    out.extend_from_slice(b"icns");
    out.extend_from_slice(&total_size.to_be_bytes());
    for chunk in chunks {
        out.extend_from_slice(&chunk);
    }
    Ok(out)
}

fn make_chunk(os_type: &str, payload: &[u8]) -> Vec<u8> {
    debug_assert_eq!(os_type.len(), 4);
    let size = HEADER_SIZE + payload.len() as u32;
    let mut chunk = Vec::with_capacity(size as usize);
    chunk.extend_from_slice(os_type.as_bytes());
    chunk.extend_from_slice(&size.to_be_bytes());
    chunk.extend_from_slice(payload);
    chunk
}

/// The legacy color payload: each channel packed independently, the
/// three packed planes concatenated and wrapped with an inner
/// `"RGB "` + size header.
fn packed_rgb_payload(surface: &Surface) -> Vec<u8> {
    let rgba = surface.to_rgba();
    let mut packed = Vec::new();
    for channel in 0..3 {
        let plane: Vec<u8> = rgba.pixels().map(|p| p.0[channel]).collect();
        packed.extend_from_slice(&packbits::pack(&plane));
    }
    let mut payload = Vec::with_capacity(packed.len() + HEADER_SIZE as usize);
    payload.extend_from_slice(b"RGB ");
    payload.extend_from_slice(&(HEADER_SIZE + packed.len() as u32).to_be_bytes());
    payload.extend_from_slice(&packed);
    payload
}

/// The alpha channel, stored unpacked.
fn alpha_mask_payload(surface: &Surface) -> Vec<u8> {
    surface.to_rgba().pixels().map(|p| p.0[3]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::geom::{Rect, Size};
    use crate::surface::{Composite, Paint};

    fn solid_surface(side: u32, color: Color) -> Surface {
        let mut s = Surface::new(Size::square(side)).unwrap();
        s.fill_rect(
            Rect::from_size(s.size()),
            &Paint::Solid(color),
            Composite::SourceOver,
            1.0,
        );
        s
    }

    fn read_u32_be(bytes: &[u8], at: usize) -> u32 {
        u32::from_be_bytes(bytes[at..at + 4].try_into().unwrap())
    }

    /// Walks the chunk stream, returning (type, declared size, payload
    /// length) triples.
    fn walk_chunks(icns: &[u8]) -> Vec<(String, u32, usize)> {
        let mut chunks = Vec::new();
        let mut at = 8;
        while at < icns.len() {
            let os_type = String::from_utf8(icns[at..at + 4].to_vec()).unwrap();
            let size = read_u32_be(icns, at + 4);
            chunks.push((os_type, size, size as usize - 8));
            at += size as usize;
        }
        chunks
    }

    #[test]
    fn header_declares_the_exact_file_size() {
        let icns = make_icns(
            &[solid_surface(16, Color::WHITE), solid_surface(32, Color::BLACK)],
            &IcnsOptions::default(),
        )
        .unwrap();
        assert_eq!(&icns[0..4], b"icns");
        assert_eq!(read_u32_be(&icns, 4) as usize, icns.len());

        let chunks = walk_chunks(&icns);
        let total: u32 = 8 + chunks.iter().map(|(_, size, _)| size).sum::<u32>();
        assert_eq!(total as usize, icns.len());
    }

    #[test]
    fn sizes_map_to_their_os_types() {
        let icns = make_icns(
            &[
                solid_surface(16, Color::WHITE),
                solid_surface(32, Color::WHITE),
                solid_surface(1024, Color::WHITE),
            ],
            &IcnsOptions::default(),
        )
        .unwrap();
        let types: Vec<String> = walk_chunks(&icns).into_iter().map(|(t, _, _)| t).collect();
        assert_eq!(types, ["icp4", "icp5", "ic11", "ic10"]);
    }

    #[test]
    fn unmapped_sizes_are_skipped_silently() {
        let icns = make_icns(
            &[solid_surface(48, Color::WHITE)],
            &IcnsOptions::default(),
        )
        .unwrap();
        // 48 has no PNG OS type; only the bare header remains.
        assert_eq!(icns.len(), 8);
        assert_eq!(read_u32_be(&icns, 4), 8);
    }

    #[test]
    fn png_payloads_are_wellformed_png() {
        let icns = make_icns(&[solid_surface(16, Color::WHITE)], &IcnsOptions::default()).unwrap();
        // First chunk payload starts with the PNG signature.
        assert_eq!(&icns[16..24], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn legacy_chunks_carry_packed_rgb_and_raw_mask() {
        let icns = make_icns(
            &[solid_surface(16, Color::rgba(10, 20, 30, 128))],
            &IcnsOptions { legacy: true },
        )
        .unwrap();
        let chunks = walk_chunks(&icns);
        let types: Vec<&str> = chunks.iter().map(|(t, _, _)| t.as_str()).collect();
        assert_eq!(types, ["icp4", "is32", "s8mk"]);

        // is32 payload: "RGB " wrapper around the packed planes.
        let is32_at = 8 + chunks[0].1 as usize;
        let payload = &icns[is32_at + 8..is32_at + chunks[1].1 as usize];
        assert_eq!(&payload[0..4], b"RGB ");
        assert_eq!(read_u32_be(payload, 4) as usize, payload.len());
        // 256 same-valued bytes per plane pack to 130+126 runs: 4
        // bytes per plane.
        let packed = &payload[8..];
        assert_eq!(packed.len(), 12);
        let r_plane = packbits::unpack(&packed[0..4]);
        assert_eq!(r_plane.len(), 256);

        // s8mk payload: unpacked alpha, one byte per pixel.
        let s8mk_at = is32_at + chunks[1].1 as usize;
        let mask = &icns[s8mk_at + 8..s8mk_at + chunks[2].1 as usize];
        assert_eq!(mask.len(), 256);
        assert!(mask.iter().all(|&a| a == 128));
    }

    #[test]
    fn supported_sizes_include_legacy_only_when_asked() {
        assert!(!supported_sizes(&IcnsOptions::default()).contains(&48));
        assert!(supported_sizes(&IcnsOptions { legacy: true }).contains(&48));
    }
}
