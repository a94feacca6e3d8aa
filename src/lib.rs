pub mod chunks;
pub mod error;
pub mod known_chunks;
pub mod palette;
pub mod parser;
pub mod registry;
pub mod sheet;
pub mod timeline;
pub mod util;

pub use chunks::{ChunkHeader, ChunkType};
pub use error::SheetError;
pub use palette::{NamedPalette, Rgba};
pub use parser::{Chunk, ChunkReader, ParseError, write_chunk};
pub use registry::{ChunkDecoder, ChunkValue, Registry, default_registry};
pub use sheet::{IndexedImage, SheetInfo, load, load_info, load_info_with};
pub use timeline::{Action, Animation, Frame, Point, Record, Rect, Timeline};
