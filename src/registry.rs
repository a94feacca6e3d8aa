use crate::chunks::{ChunkHeader, ChunkType, SPLT, ZTXT};
use crate::error::Result;
use crate::palette::{NamedPalette, decode_palette};
use crate::timeline::{Timeline, decode_timeline};
use std::collections::HashMap;
use std::io::Read;

/// A value returned from a chunk decoder.
#[derive(Debug, Clone)]
pub enum ChunkValue {
    Palette(NamedPalette),
    Timeline(Timeline),
}

/// Trait for chunk payload decoders.
///
/// A decoder is handed a reader bounded to one chunk's payload. It does not
/// have to consume the whole payload; the caller drains whatever is left.
pub trait ChunkDecoder: Send + Sync {
    fn decode(&self, r: &mut dyn Read, hdr: &ChunkHeader) -> Result<ChunkValue>;
}

/// Registry of decoders keyed by chunk type.
///
/// The registry is immutable once constructed; use [`Registry::with_decoder`]
/// to build it fluently.
pub struct Registry {
    map: HashMap<ChunkType, ChunkDecoderEntry>,
}

struct ChunkDecoderEntry {
    inner: Box<dyn ChunkDecoder>,
    name: String,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Return a new registry with the given decoder added, replacing any
    /// decoder already registered for `key`.
    ///
    /// `name` is human-readable and used only for logging.
    pub fn with_decoder(mut self, key: ChunkType, name: &str, dec: Box<dyn ChunkDecoder>) -> Self {
        self.map.insert(
            key,
            ChunkDecoderEntry {
                inner: dec,
                name: name.to_string(),
            },
        );
        self
    }

    pub fn name_of(&self, key: &ChunkType) -> Option<&str> {
        self.map.get(key).map(|d| d.name.as_str())
    }

    /// Try to decode the payload of a chunk using a registered decoder.
    ///
    /// Returns `None` if no decoder exists for the given type.
    pub fn decode(
        &self,
        key: &ChunkType,
        r: &mut dyn Read,
        hdr: &ChunkHeader,
    ) -> Option<Result<ChunkValue>> {
        self.map.get(key).map(|d| d.inner.decode(r, hdr))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

fn read_all(r: &mut dyn Read) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    r.read_to_end(&mut buf)?;
    Ok(buf)
}

// sPLT: named RGBA table
pub struct PaletteDecoder;

impl ChunkDecoder for PaletteDecoder {
    fn decode(&self, r: &mut dyn Read, _hdr: &ChunkHeader) -> Result<ChunkValue> {
        let buf = read_all(r)?;
        Ok(ChunkValue::Palette(decode_palette(&buf)?))
    }
}

// zTXt: raw control records, never decompressed
pub struct ControlStreamDecoder;

impl ChunkDecoder for ControlStreamDecoder {
    fn decode(&self, r: &mut dyn Read, _hdr: &ChunkHeader) -> Result<ChunkValue> {
        let buf = read_all(r)?;
        Ok(ChunkValue::Timeline(decode_timeline(&buf)?))
    }
}

pub fn default_registry() -> Registry {
    Registry::new()
        .with_decoder(SPLT, "suggested palette", Box::new(PaletteDecoder))
        .with_decoder(ZTXT, "animation control", Box::new(ControlStreamDecoder))
}
