use crate::chunks::ChunkType;

/// Typed view over the standard PNG chunk types.
///
/// Anything not in this list becomes `KnownChunk::Unknown(typ)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownChunk {
    // Critical
    Ihdr,
    Plte,
    Idat,
    Iend,

    // Transparency / color space
    Trns,
    Chrm,
    Gama,
    Iccp,
    Sbit,
    Srgb,
    Cicp,

    // Text
    Text,
    Ztxt,
    Itxt,

    // Misc
    Bkgd,
    Hist,
    Phys,
    Splt,
    Time,
    Exif,

    // APNG
    Actl,
    Fctl,
    Fdat,

    Unknown(ChunkType),
}

impl From<ChunkType> for KnownChunk {
    fn from(typ: ChunkType) -> Self {
        match &typ.0 {
            b"IHDR" => KnownChunk::Ihdr,
            b"PLTE" => KnownChunk::Plte,
            b"IDAT" => KnownChunk::Idat,
            b"IEND" => KnownChunk::Iend,

            b"tRNS" => KnownChunk::Trns,
            b"cHRM" => KnownChunk::Chrm,
            b"gAMA" => KnownChunk::Gama,
            b"iCCP" => KnownChunk::Iccp,
            b"sBIT" => KnownChunk::Sbit,
            b"sRGB" => KnownChunk::Srgb,
            b"cICP" => KnownChunk::Cicp,

            b"tEXt" => KnownChunk::Text,
            b"zTXt" => KnownChunk::Ztxt,
            b"iTXt" => KnownChunk::Itxt,

            b"bKGD" => KnownChunk::Bkgd,
            b"hIST" => KnownChunk::Hist,
            b"pHYs" => KnownChunk::Phys,
            b"sPLT" => KnownChunk::Splt,
            b"tIME" => KnownChunk::Time,
            b"eXIf" => KnownChunk::Exif,

            b"acTL" => KnownChunk::Actl,
            b"fcTL" => KnownChunk::Fctl,
            b"fdAT" => KnownChunk::Fdat,

            _ => KnownChunk::Unknown(typ),
        }
    }
}

impl KnownChunk {
    pub fn full_name(&self) -> &'static str {
        match self {
            KnownChunk::Ihdr => "Image Header",
            KnownChunk::Plte => "Palette",
            KnownChunk::Idat => "Image Data",
            KnownChunk::Iend => "Image Trailer",
            KnownChunk::Trns => "Transparency",
            KnownChunk::Chrm => "Primary Chromaticities",
            KnownChunk::Gama => "Image Gamma",
            KnownChunk::Iccp => "Embedded ICC Profile",
            KnownChunk::Sbit => "Significant Bits",
            KnownChunk::Srgb => "Standard RGB Color Space",
            KnownChunk::Cicp => "Coding-independent Code Points",
            KnownChunk::Text => "Textual Data",
            // Carries raw animation control records in sprite sheets.
            KnownChunk::Ztxt => "Compressed Textual Data (animation control)",
            KnownChunk::Itxt => "International Textual Data",
            KnownChunk::Bkgd => "Background Color",
            KnownChunk::Hist => "Palette Histogram",
            KnownChunk::Phys => "Physical Pixel Dimensions",
            KnownChunk::Splt => "Suggested Palette",
            KnownChunk::Time => "Last Modification Time",
            KnownChunk::Exif => "Exif Data",
            KnownChunk::Actl => "Animation Control",
            KnownChunk::Fctl => "Frame Control",
            KnownChunk::Fdat => "Frame Data",
            KnownChunk::Unknown(_) => "Unknown Chunk",
        }
    }

    /// Chunks the sprite-sheet loader interprets.
    pub fn is_sheet_metadata(&self) -> bool {
        matches!(self, KnownChunk::Splt | KnownChunk::Ztxt)
    }
}
