//! Suggested-palette (`sPLT`) payloads.
//!
//! Layout: NUL-terminated name, one reserved byte, then 6-byte entries of
//! `R G B A` followed by a 2-byte frequency that is not interpreted here.

use crate::error::{Result, SheetError};
use byteorder::{BigEndian, WriteBytesExt};
use serde::Serialize;
use std::fmt;

/// Bytes per palette entry: RGBA plus the 16-bit frequency.
pub const ENTRY_SIZE: usize = 6;

/// Value written to the reserved byte by [`encode_palette`] (the sPLT sample depth).
const SAMPLE_DEPTH: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// `#rrggbbaa`
    pub fn to_hex(&self) -> String {
        format!("#{}", hex::encode([self.r, self.g, self.b, self.a]))
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A decoded `sPLT` chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedPalette {
    pub name: Vec<u8>,
    pub colors: Vec<Rgba>,
}

impl NamedPalette {
    pub fn name_lossy(&self) -> String {
        String::from_utf8_lossy(&self.name).into_owned()
    }
}

pub fn decode_palette(buf: &[u8]) -> Result<NamedPalette> {
    let nul = buf
        .iter()
        .position(|&b| b == 0)
        .ok_or(SheetError::MalformedPalette("missing name terminator"))?;

    let entries_start = nul + 2;
    if entries_start > buf.len() {
        return Err(SheetError::MalformedPalette("missing reserved byte"));
    }

    let entries = &buf[entries_start..];
    if entries.len() % ENTRY_SIZE != 0 {
        return Err(SheetError::MalformedPalette(
            "entry region is not a multiple of 6 bytes",
        ));
    }

    let colors = entries
        .chunks_exact(ENTRY_SIZE)
        .map(|e| Rgba::new(e[0], e[1], e[2], e[3]))
        .collect();

    Ok(NamedPalette {
        name: buf[..nul].to_vec(),
        colors,
    })
}

/// Build an `sPLT` payload; frequencies are written as zero.
pub fn encode_palette(name: &[u8], colors: &[Rgba]) -> Vec<u8> {
    let mut out = Vec::with_capacity(name.len() + 2 + colors.len() * ENTRY_SIZE);
    out.extend_from_slice(name);
    out.push(0);
    out.push(SAMPLE_DEPTH);
    for c in colors {
        out.extend_from_slice(&[c.r, c.g, c.b, c.a]);
        // Vec<u8> writes are infallible.
        let _ = out.write_u16::<BigEndian>(0);
    }
    out
}
