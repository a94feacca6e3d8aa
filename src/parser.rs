use crate::chunks::{ChunkHeader, ChunkType, IEND};
use byteorder::{BigEndian, ByteOrder, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};
use tracing::{trace, warn};

/// The eight bytes every PNG stream starts with.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

const MAX_CHUNK_LENGTH: u32 = (1 << 31) - 1;

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("io: {0}")]
    Io(#[from] io::Error),
    #[error("invalid PNG signature")]
    InvalidSignature,
    #[error("chunk at offset {offset}: length {length} out of range")]
    InvalidLength { offset: u64, length: u32 },
    #[error("chunk at offset {offset}: invalid chunk type {typ}")]
    InvalidChunkType { offset: u64, typ: ChunkType },
    #[error("{typ}: crc mismatch (stored {stored:08x}, computed {computed:08x})")]
    CrcMismatch {
        typ: ChunkType,
        stored: u32,
        computed: u32,
    },
}

pub type Result<T> = std::result::Result<T, ParseError>;

struct OpenChunk {
    header: ChunkHeader,
    remaining: u64,
    hasher: crc32fast::Hasher,
}

/// Sequential reader over the chunks of a PNG stream.
///
/// Chunks are handed out one at a time; the previous chunk is drained and its
/// CRC checked before the next header is read, whether or not the caller
/// closed it explicitly.
pub struct ChunkReader<R> {
    inner: R,
    offset: u64,
    current: Option<OpenChunk>,
    verify_crc: bool,
    finished: bool,
}

impl<R: Read> ChunkReader<R> {
    /// Consume and validate the PNG signature.
    pub fn new(mut inner: R) -> Result<Self> {
        let mut sig = [0u8; 8];
        if read_up_to(&mut inner, &mut sig)? != sig.len() || sig != PNG_SIGNATURE {
            return Err(ParseError::InvalidSignature);
        }
        Ok(Self {
            inner,
            offset: PNG_SIGNATURE.len() as u64,
            current: None,
            verify_crc: true,
            finished: false,
        })
    }

    /// Turn CRC verification on or off (on by default).
    pub fn with_crc_check(mut self, verify: bool) -> Self {
        self.verify_crc = verify;
        self
    }

    /// Open the next chunk.
    ///
    /// Returns `Ok(None)` once `IEND` has been consumed. A stream that simply
    /// stops at a chunk boundary is treated the same way.
    pub fn next_chunk(&mut self) -> Result<Option<Chunk<'_, R>>> {
        self.finish_current()?;
        if self.finished {
            return Ok(None);
        }

        let start = self.offset;
        let mut head = [0u8; 8];
        let n = read_up_to(&mut self.inner, &mut head)?;
        if n == 0 {
            warn!(offset = start, "stream ended without IEND");
            self.finished = true;
            return Ok(None);
        }
        if n < head.len() {
            return Err(truncated("chunk header").into());
        }

        let length = BigEndian::read_u32(&head[0..4]);
        let typ = ChunkType([head[4], head[5], head[6], head[7]]);
        if length > MAX_CHUNK_LENGTH {
            return Err(ParseError::InvalidLength {
                offset: start,
                length,
            });
        }
        if !typ.is_valid() {
            return Err(ParseError::InvalidChunkType { offset: start, typ });
        }
        trace!(%typ, length, offset = start, "chunk");

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&typ.0);
        let header = ChunkHeader { length, typ, start };
        self.offset = header.data_offset();
        self.current = Some(OpenChunk {
            header: header.clone(),
            remaining: length as u64,
            hasher,
        });
        Ok(Some(Chunk {
            header,
            reader: self,
        }))
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn finish_current(&mut self) -> Result<()> {
        let Some(mut open) = self.current.take() else {
            return Ok(());
        };

        let mut scratch = [0u8; 4096];
        while open.remaining > 0 {
            let want = open.remaining.min(scratch.len() as u64) as usize;
            let n = self.inner.read(&mut scratch[..want])?;
            if n == 0 {
                return Err(truncated("chunk payload").into());
            }
            open.hasher.update(&scratch[..n]);
            open.remaining -= n as u64;
        }

        let stored = self.inner.read_u32::<BigEndian>()?;
        self.offset = open.header.end();
        let computed = open.hasher.finalize();
        if self.verify_crc && stored != computed {
            return Err(ParseError::CrcMismatch {
                typ: open.header.typ,
                stored,
                computed,
            });
        }
        if open.header.typ == IEND {
            self.finished = true;
        }
        Ok(())
    }
}

/// One chunk of a [`ChunkReader`]; reading yields the payload bytes only.
pub struct Chunk<'a, R> {
    header: ChunkHeader,
    reader: &'a mut ChunkReader<R>,
}

impl<R: Read> Chunk<'_, R> {
    pub fn header(&self) -> &ChunkHeader {
        &self.header
    }

    /// Payload bytes not yet read.
    pub fn remaining(&self) -> u64 {
        self.reader.current.as_ref().map_or(0, |c| c.remaining)
    }

    /// Discard the unread payload and verify the CRC.
    pub fn close(self) -> Result<()> {
        self.reader.finish_current()
    }
}

impl<R: Read> Read for Chunk<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let reader = &mut *self.reader;
        let Some(open) = reader.current.as_mut() else {
            return Ok(0);
        };
        if open.remaining == 0 || buf.is_empty() {
            return Ok(0);
        }

        let want = open.remaining.min(buf.len() as u64) as usize;
        let n = reader.inner.read(&mut buf[..want])?;
        if n == 0 {
            return Err(truncated("chunk payload"));
        }
        open.hasher.update(&buf[..n]);
        open.remaining -= n as u64;
        Ok(n)
    }
}

/// Write one framed chunk: length, type, data, CRC.
pub fn write_chunk<W: Write>(w: &mut W, typ: ChunkType, data: &[u8]) -> io::Result<()> {
    let length = u32::try_from(data.len())
        .ok()
        .filter(|&l| l <= MAX_CHUNK_LENGTH)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "chunk too large"))?;

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&typ.0);
    hasher.update(data);

    w.write_u32::<BigEndian>(length)?;
    w.write_all(&typ.0)?;
    w.write_all(data)?;
    w.write_u32::<BigEndian>(hasher.finalize())?;
    Ok(())
}

fn read_up_to<R: Read>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

fn truncated(what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, format!("truncated {what}"))
}
