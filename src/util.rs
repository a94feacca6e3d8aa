use crate::parser::{Chunk, Result};
use std::io::Read;

/// Read at most `max_len` bytes from the front of a chunk payload.
///
/// `max_len == 0` reads the whole payload.
pub fn read_prefix<R: Read>(chunk: &mut Chunk<'_, R>, max_len: u64) -> Result<Vec<u8>> {
    let want = if max_len == 0 {
        chunk.remaining()
    } else {
        chunk.remaining().min(max_len)
    };
    let mut v = Vec::with_capacity(want.min(64 * 1024) as usize);
    chunk.by_ref().take(want).read_to_end(&mut v)?;
    Ok(v)
}

pub fn hex_dump(bytes: &[u8], start_offset: u64) -> String {
    let mut out = String::new();
    for (i, row) in bytes.chunks(16).enumerate() {
        let offs = start_offset + (i as u64) * 16;
        let hexs: String = row.iter().map(|b| format!("{:02x} ", b)).collect();
        let ascii: String = row
            .iter()
            .map(|&c| if (32..=126).contains(&c) { c as char } else { '.' })
            .collect();
        out.push_str(&format!("{:08x}  {:<48}  |{}|\n", offs, hexs, ascii));
    }
    out
}
