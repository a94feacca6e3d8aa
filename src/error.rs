use crate::parser::ParseError;
use std::io;

/// Everything that can go wrong while extracting sprite-sheet data.
///
/// Every variant is fatal to the decode call; no partial [`SheetInfo`] is
/// ever returned.
///
/// [`SheetInfo`]: crate::SheetInfo
#[derive(thiserror::Error, Debug)]
pub enum SheetError {
    #[error("malformed palette chunk: {0}")]
    MalformedPalette(&'static str),
    #[error("truncated control record: {0}")]
    TruncatedRecord(&'static str),
    #[error("read failure: {0}")]
    UnderlyingReadFailure(#[from] ParseError),
    #[error("unsupported pixel format: {0:?} (expected indexed)")]
    UnsupportedPixelFormat(png::ColorType),
    #[error("pixel decode: {0}")]
    Decode(#[from] png::DecodingError),
}

impl From<io::Error> for SheetError {
    fn from(e: io::Error) -> Self {
        SheetError::UnderlyingReadFailure(ParseError::Io(e))
    }
}

pub type Result<T> = std::result::Result<T, SheetError>;
