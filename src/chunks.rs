use std::fmt;

/// Four-byte PNG chunk type such as `IHDR` or `sPLT`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ChunkType(pub [u8; 4]);

pub const IHDR: ChunkType = ChunkType(*b"IHDR");
pub const PLTE: ChunkType = ChunkType(*b"PLTE");
pub const IDAT: ChunkType = ChunkType(*b"IDAT");
pub const IEND: ChunkType = ChunkType(*b"IEND");
pub const TRNS: ChunkType = ChunkType(*b"tRNS");
/// Suggested palette.
pub const SPLT: ChunkType = ChunkType(*b"sPLT");
/// Compressed text, repurposed to carry raw animation control records.
pub const ZTXT: ChunkType = ChunkType(*b"zTXt");

impl ChunkType {
    pub fn from_str(s: &str) -> Option<Self> {
        let b = s.as_bytes();
        if b.len() == 4 {
            Some(ChunkType([b[0], b[1], b[2], b[3]]))
        } else {
            None
        }
    }

    pub fn as_str_lossy(&self) -> String {
        self.0
            .iter()
            .map(|&c| if c.is_ascii_graphic() { c as char } else { '.' })
            .collect()
    }

    /// PNG requires every type byte to be an ASCII letter.
    pub fn is_valid(&self) -> bool {
        self.0.iter().all(|c| c.is_ascii_alphabetic())
    }

    // Property bits live in bit 5 (the case bit) of each byte.

    pub fn is_critical(&self) -> bool {
        self.0[0] & 0x20 == 0
    }

    pub fn is_public(&self) -> bool {
        self.0[1] & 0x20 == 0
    }

    pub fn is_safe_to_copy(&self) -> bool {
        self.0[3] & 0x20 != 0
    }
}

impl fmt::Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str_lossy())
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str_lossy())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkHeader {
    pub length: u32,     // payload length, excludes type and CRC
    pub typ: ChunkType,
    pub start: u64,      // file offset of the length field
}

impl ChunkHeader {
    /// Offset of the first payload byte.
    pub fn data_offset(&self) -> u64 {
        self.start + 8
    }

    /// Offset just past the trailing CRC.
    pub fn end(&self) -> u64 {
        self.start + 12 + self.length as u64
    }
}
