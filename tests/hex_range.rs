use pngsheet::chunks::{ChunkType, IEND};
use pngsheet::parser::{ChunkReader, PNG_SIGNATURE, write_chunk};
use pngsheet::util::{hex_dump, read_prefix};
use std::io::Cursor;

fn file_with_payload(payload: &[u8]) -> Vec<u8> {
    let mut v = PNG_SIGNATURE.to_vec();
    write_chunk(&mut v, ChunkType(*b"daTa"), payload).unwrap();
    write_chunk(&mut v, IEND, &[]).unwrap();
    v
}

#[test]
fn prefix_reads_within_bounds() {
    let data = (0u8..64u8).collect::<Vec<_>>();
    let mut reader = ChunkReader::new(Cursor::new(file_with_payload(&data))).unwrap();
    let mut chunk = reader.next_chunk().unwrap().unwrap();

    let prefix = read_prefix(&mut chunk, 16).unwrap();
    assert_eq!(prefix, (0u8..16).collect::<Vec<_>>());
    assert_eq!(chunk.remaining(), 48);
    chunk.close().unwrap();

    assert_eq!(reader.next_chunk().unwrap().unwrap().header().typ, IEND);
}

#[test]
fn prefix_clamps_to_payload() {
    let data = (0u8..8u8).collect::<Vec<_>>();
    let mut reader = ChunkReader::new(Cursor::new(file_with_payload(&data))).unwrap();
    let mut chunk = reader.next_chunk().unwrap().unwrap();

    assert_eq!(read_prefix(&mut chunk, 32).unwrap().len(), 8);
    assert_eq!(chunk.remaining(), 0);
}

#[test]
fn hex_dump_shows_offsets_and_ascii() {
    let dump = hex_dump(b"sPLT\0\x08", 0x10);
    assert!(dump.starts_with("00000010  73 50 4c 54 00 08"));
    assert!(dump.trim_end().ends_with("|sPLT..|"));
}

#[test]
fn whole_payload_prefix_of_forged_length_fails() {
    let mut data = PNG_SIGNATURE.to_vec();
    data.extend_from_slice(&0x7fff_ffffu32.to_be_bytes());
    data.extend_from_slice(b"daTa");
    data.extend_from_slice(&[1, 2, 3, 4]);

    let mut reader = ChunkReader::new(Cursor::new(data)).unwrap();
    let mut chunk = reader.next_chunk().unwrap().unwrap();
    let err = read_prefix(&mut chunk, 0).unwrap_err();
    assert!(err.to_string().contains("truncated"));
}
