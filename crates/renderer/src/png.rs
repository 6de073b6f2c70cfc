//! PNG encoding for rendered figures.
//!
//! Two layouts are written:
//! - **Indexed (color type 3)** when the image has at most 256 distinct
//!   colors. Thumbnails drawn from a colormap lookup table normally do.
//! - **RGBA (color type 6)** otherwise.
//!
//! Optional `tEXt` chunks carry metadata such as the figure title.

use image::RgbaImage;
use raster_common::{RasterError, RasterResult};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::io::Write;

/// PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Maximum colors for indexed PNG (PNG8)
const MAX_PALETTE_SIZE: usize = 256;

/// Minimum pixels to benefit from parallel palette extraction
const PARALLEL_THRESHOLD: usize = 4096; // 64x64 or larger

/// RGBA colors of an indexed image, in index order.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub colors: Vec<[u8; 4]>,
}

impl Palette {
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    fn has_transparency(&self) -> bool {
        self.colors.iter().any(|c| c[3] < 255)
    }
}

/// Encode an image, choosing indexed or RGBA layout automatically.
pub fn encode_png(image: &RgbaImage, text: &[(&str, &str)]) -> RasterResult<Vec<u8>> {
    let (width, height) = image.dimensions();
    let pixels = image.as_raw();

    match extract_palette(pixels) {
        Some((palette, indices)) => encode_indexed(width, height, &palette, &indices, text),
        None => encode_rgba(pixels, width, height, text),
    }
}

/// Pack RGBA bytes into a u32 for faster hashing and comparison
#[inline(always)]
fn pack_color(px: &[u8]) -> u32 {
    u32::from_le_bytes([px[0], px[1], px[2], px[3]])
}

/// Build a palette and per-pixel indices, or `None` past 256 colors.
pub fn extract_palette(pixels: &[u8]) -> Option<(Palette, Vec<u8>)> {
    if pixels.len() / 4 >= PARALLEL_THRESHOLD {
        extract_palette_parallel(pixels)
    } else {
        extract_palette_sequential(pixels)
    }
}

fn extract_palette_sequential(pixels: &[u8]) -> Option<(Palette, Vec<u8>)> {
    let mut index_of: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut colors: Vec<[u8; 4]> = Vec::with_capacity(MAX_PALETTE_SIZE);
    let mut indices = Vec::with_capacity(pixels.len() / 4);

    for px in pixels.chunks_exact(4) {
        let packed = pack_color(px);
        let index = match index_of.get(&packed) {
            Some(&idx) => idx,
            None => {
                if colors.len() >= MAX_PALETTE_SIZE {
                    return None;
                }
                let idx = colors.len() as u8;
                colors.push([px[0], px[1], px[2], px[3]]);
                index_of.insert(packed, idx);
                idx
            }
        };
        indices.push(index);
    }

    Some((Palette { colors }, indices))
}

/// Collects distinct colors per chunk in parallel, merges them, then maps
/// every pixel to its index in parallel. Colors are sorted so the palette
/// does not depend on thread scheduling.
fn extract_palette_parallel(pixels: &[u8]) -> Option<(Palette, Vec<u8>)> {
    let chunk_px = (pixels.len() / 4 / rayon::current_num_threads()).max(256);

    let distinct: HashSet<u32> = pixels
        .par_chunks(chunk_px * 4)
        .map(|chunk| {
            let mut local = HashSet::with_capacity(MAX_PALETTE_SIZE);
            for px in chunk.chunks_exact(4) {
                local.insert(pack_color(px));
                if local.len() > MAX_PALETTE_SIZE {
                    return None;
                }
            }
            Some(local)
        })
        .try_reduce(HashSet::new, |mut acc, local| {
            acc.extend(local);
            if acc.len() > MAX_PALETTE_SIZE {
                None
            } else {
                Some(acc)
            }
        })?;

    if distinct.len() > MAX_PALETTE_SIZE {
        return None;
    }

    let mut packed: Vec<u32> = distinct.into_iter().collect();
    packed.sort_unstable();
    let index_of: HashMap<u32, u8> = packed
        .iter()
        .enumerate()
        .map(|(i, c)| (*c, i as u8))
        .collect();

    let indices: Vec<u8> = pixels
        .par_chunks_exact(4)
        .map(|px| index_of.get(&pack_color(px)).copied().unwrap_or(0))
        .collect();

    let colors = packed.into_iter().map(u32::to_le_bytes).collect();
    Some((Palette { colors }, indices))
}

/// Encode an indexed PNG (color type 3) from palette and indices.
pub fn encode_indexed(
    width: u32,
    height: u32,
    palette: &Palette,
    indices: &[u8],
    text: &[(&str, &str)],
) -> RasterResult<Vec<u8>> {
    check_size(width, height, indices.len(), 1)?;
    if palette.is_empty() || palette.len() > MAX_PALETTE_SIZE {
        return Err(RasterError::EncodeError(format!(
            "palette has {} colors",
            palette.len()
        )));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);
    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 3));

    let plte: Vec<u8> = palette.colors.iter().flat_map(|c| [c[0], c[1], c[2]]).collect();
    write_chunk(&mut png, b"PLTE", &plte);

    // tRNS holds one alpha per palette entry, only needed with transparency
    if palette.has_transparency() {
        let trns: Vec<u8> = palette.colors.iter().map(|c| c[3]).collect();
        write_chunk(&mut png, b"tRNS", &trns);
    }

    write_text_chunks(&mut png, text);
    let idat = deflate_scanlines(indices, width as usize, height as usize)?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Encode an RGBA PNG (color type 6).
pub fn encode_rgba(
    pixels: &[u8],
    width: u32,
    height: u32,
    text: &[(&str, &str)],
) -> RasterResult<Vec<u8>> {
    check_size(width, height, pixels.len(), 4)?;

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);
    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 6));
    write_text_chunks(&mut png, text);
    let idat = deflate_scanlines(pixels, width as usize * 4, height as usize)?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

fn check_size(width: u32, height: u32, len: usize, bytes_per_pixel: usize) -> RasterResult<()> {
    if width == 0 || height == 0 {
        return Err(RasterError::EncodeError(format!(
            "cannot encode a {}x{} image",
            width, height
        )));
    }
    let expected = width as usize * height as usize * bytes_per_pixel;
    if len != expected {
        return Err(RasterError::EncodeError(format!(
            "expected {} bytes for {}x{}, got {}",
            expected, width, height, len
        )));
    }
    Ok(())
}

fn ihdr(width: u32, height: u32, color_type: u8) -> [u8; 13] {
    let mut data = [0u8; 13];
    data[0..4].copy_from_slice(&width.to_be_bytes());
    data[4..8].copy_from_slice(&height.to_be_bytes());
    data[8] = 8; // bit depth
    data[9] = color_type;
    // compression, filter and interlace methods stay 0
    data
}

/// `tEXt` chunks: Latin-1 keyword (1-79 bytes), NUL, Latin-1 text.
fn write_text_chunks(png: &mut Vec<u8>, text: &[(&str, &str)]) {
    let latin1 = |s: &str| -> Vec<u8> {
        s.chars()
            .map(|c| if (c as u32) < 256 { c as u8 } else { b'?' })
            .collect()
    };
    for (keyword, value) in text {
        let mut key = latin1(keyword);
        key.retain(|b| *b != 0);
        key.truncate(79);
        if key.is_empty() {
            continue;
        }
        let mut data = key;
        data.push(0);
        data.extend(latin1(value));
        write_chunk(png, b"tEXt", &data);
    }
}

/// Write a PNG chunk: length, type, data, CRC over type and data.
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Prefix every scanline with filter type 0 and zlib-compress.
fn deflate_scanlines(data: &[u8], row_bytes: usize, height: usize) -> RasterResult<Vec<u8>> {
    let mut raw = Vec::with_capacity(height * (1 + row_bytes));
    for row in data.chunks_exact(row_bytes).take(height) {
        raw.push(0);
        raw.extend_from_slice(row);
    }

    let compress_err = |e: std::io::Error| RasterError::EncodeError(format!("IDAT compression failed: {}", e));
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder.write_all(&raw).map_err(compress_err)?;
    encoder.finish().map_err(compress_err)
}
