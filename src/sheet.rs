use crate::error::{Result, SheetError};
use crate::palette::Rgba;
use crate::parser::ChunkReader;
use crate::registry::{ChunkValue, Registry, default_registry};
use crate::timeline::{Animation, Frame, Record, reconstruct_records};
use std::collections::BTreeMap;
use std::io::{Read, Seek, SeekFrom};
use std::sync::Arc;
use tracing::{debug, trace};

/// Sprite-sheet metadata gathered from every recognised chunk of one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetInfo {
    /// Keyed by palette name; a later chunk with the same name replaces an earlier one.
    pub suggested_palettes: BTreeMap<Vec<u8>, Vec<Rgba>>,
    /// Every frame in file order, across all control chunks.
    pub frames: Vec<Arc<Frame>>,
    pub animations: Vec<Animation>,
}

impl SheetInfo {
    pub fn palette(&self, name: &[u8]) -> Option<&[Rgba]> {
        self.suggested_palettes.get(name).map(Vec::as_slice)
    }

    /// Control records that would reproduce the terminated animations.
    pub fn control_records(&self) -> Vec<Record> {
        reconstruct_records(&self.frames, &self.animations)
    }

    fn merge(&mut self, value: ChunkValue) {
        match value {
            ChunkValue::Palette(p) => {
                if self.suggested_palettes.contains_key(&p.name) {
                    debug!(name = %p.name_lossy(), "suggested palette replaced");
                }
                self.suggested_palettes.insert(p.name, p.colors);
            }
            ChunkValue::Timeline(t) => {
                let base = self.frames.len();
                self.frames.extend(t.frames);
                self.animations.extend(t.animations.into_iter().map(|mut a| {
                    a.frame_range = a.frame_range.start + base..a.frame_range.end + base;
                    a
                }));
            }
        }
    }
}

/// Read sprite-sheet metadata from a PNG stream using the default decoders.
pub fn load_info<R: Read>(r: R) -> Result<SheetInfo> {
    load_info_with(r, &default_registry())
}

/// Like [`load_info`], dispatching payloads through `reg`.
///
/// Chunks without a decoder are drained and ignored.
pub fn load_info_with<R: Read>(r: R, reg: &Registry) -> Result<SheetInfo> {
    let mut chunks = ChunkReader::new(r)?;
    let mut info = SheetInfo::default();

    while let Some(mut chunk) = chunks.next_chunk()? {
        let hdr = chunk.header().clone();
        match reg.decode(&hdr.typ, &mut chunk, &hdr) {
            Some(value) => {
                let value = value?;
                debug!(
                    typ = %hdr.typ,
                    decoder = reg.name_of(&hdr.typ).unwrap_or_default(),
                    length = hdr.length,
                    "decoded chunk"
                );
                info.merge(value);
            }
            None => trace!(typ = %hdr.typ, length = hdr.length, "skipping chunk"),
        }
        chunk.close()?;
    }

    debug!(
        palettes = info.suggested_palettes.len(),
        frames = info.frames.len(),
        animations = info.animations.len(),
        "sheet info loaded"
    );
    Ok(info)
}

/// Pixel data of a paletted PNG, left as palette indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    pub width: u32,
    pub height: u32,
    /// Bits per index: 1, 2, 4 or 8.
    pub bit_depth: u8,
    /// Bytes per row in `pixels`.
    pub line_size: usize,
    pub pixels: Vec<u8>,
    /// `PLTE` colors with `tRNS` alpha applied.
    pub palette: Vec<Rgba>,
}

impl IndexedImage {
    /// Palette index at `(x, y)`, unpacking sub-byte depths.
    pub fn index_at(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let bits = self.bit_depth as usize;
        let bit = x as usize * bits;
        let byte = *self.pixels.get(y as usize * self.line_size + bit / 8)?;
        let shift = 8 - bits - bit % 8;
        let mask = ((1u16 << bits) - 1) as u8;
        Some((byte >> shift) & mask)
    }

    /// The image palette followed by `extra`.
    pub fn palette_with(&self, extra: &[Rgba]) -> Vec<Rgba> {
        let mut out = Vec::with_capacity(self.palette.len() + extra.len());
        out.extend_from_slice(&self.palette);
        out.extend_from_slice(extra);
        out
    }
}

/// Read the sprite-sheet metadata, then rewind and decode the pixels.
///
/// Fails with [`SheetError::UnsupportedPixelFormat`] unless the image is indexed.
pub fn load<R: Read + Seek>(mut r: R) -> Result<(IndexedImage, SheetInfo)> {
    let info = load_info(&mut r)?;
    r.seek(SeekFrom::Start(0))?;
    let image = decode_indexed(r)?;
    Ok((image, info))
}

fn decode_indexed<R: Read>(r: R) -> Result<IndexedImage> {
    let mut decoder = png::Decoder::new(r);
    decoder.set_transformations(png::Transformations::IDENTITY);
    // zTXt carries binary control records, not text.
    decoder.set_ignore_text_chunk(true);
    let mut reader = decoder.read_info()?;

    let (width, height, color_type, bit_depth, palette) = {
        let info = reader.info();
        let plte = info.palette.as_deref().unwrap_or_default();
        let trns = info.trns.as_deref().unwrap_or_default();
        let palette = plte
            .chunks_exact(3)
            .enumerate()
            .map(|(i, c)| Rgba::new(c[0], c[1], c[2], trns.get(i).copied().unwrap_or(0xff)))
            .collect::<Vec<_>>();
        (info.width, info.height, info.color_type, info.bit_depth, palette)
    };
    if color_type != png::ColorType::Indexed {
        return Err(SheetError::UnsupportedPixelFormat(color_type));
    }

    let mut pixels = vec![0u8; reader.output_buffer_size()];
    let out = reader.next_frame(&mut pixels)?;
    pixels.truncate(out.buffer_size());

    Ok(IndexedImage {
        width,
        height,
        bit_depth: bit_depth as u8,
        line_size: out.line_size,
        pixels,
        palette,
    })
}
