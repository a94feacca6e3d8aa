use pngsheet::chunks::{ChunkHeader, ChunkType, IEND, SPLT, ZTXT};
use pngsheet::palette::{NamedPalette, Rgba, encode_palette};
use pngsheet::parser::{PNG_SIGNATURE, write_chunk};
use pngsheet::registry::{ChunkDecoder, ChunkValue, Registry, default_registry};
use pngsheet::timeline::{Action, Point, Record, Rect, encode_control};
use pngsheet::{SheetError, load_info_with};
use std::io::{Cursor, Read};

/// Reads a palette from a private chunk where every byte is a gray level.
struct GrayRampDecoder;

impl ChunkDecoder for GrayRampDecoder {
    fn decode(&self, r: &mut dyn Read, _hdr: &ChunkHeader) -> Result<ChunkValue, SheetError> {
        let mut buf = Vec::new();
        r.read_to_end(&mut buf)?;
        Ok(ChunkValue::Palette(NamedPalette {
            name: b"gray".to_vec(),
            colors: buf.iter().map(|&v| Rgba::new(v, v, v, 255)).collect(),
        }))
    }
}

/// Reads nothing; the loader must still drain the chunk.
struct LazyDecoder;

impl ChunkDecoder for LazyDecoder {
    fn decode(&self, _r: &mut dyn Read, hdr: &ChunkHeader) -> Result<ChunkValue, SheetError> {
        Ok(ChunkValue::Palette(NamedPalette {
            name: hdr.typ.to_string().into_bytes(),
            colors: Vec::new(),
        }))
    }
}

fn header(typ: ChunkType, length: u32) -> ChunkHeader {
    ChunkHeader {
        length,
        typ,
        start: 0,
    }
}

#[test]
fn default_registry_decodes_palette_payload() {
    let payload = encode_palette(b"p", &[Rgba::new(10, 20, 30, 255)]);
    let reg = default_registry();

    let res = reg
        .decode(&SPLT, &mut Cursor::new(payload.clone()), &header(SPLT, payload.len() as u32))
        .expect("sPLT decoder registered")
        .unwrap();
    match res {
        ChunkValue::Palette(p) => {
            assert_eq!(p.name, b"p");
            assert_eq!(p.colors, vec![Rgba::new(10, 20, 30, 255)]);
        }
        other => panic!("expected palette, got {:?}", other),
    }
}

#[test]
fn default_registry_reads_control_payload_uncompressed() {
    let records = [Record {
        rect: Rect {
            left: 0,
            top: 0,
            right: 4,
            bottom: 4,
        },
        origin: Point { x: 2, y: 4 },
        delay: 3,
        action: Action::Loop,
    }];
    // compression-method byte of a real zTXt would be 0 here as well
    let payload = encode_control(b"anim", &records);
    let reg = default_registry();

    let res = reg
        .decode(&ZTXT, &mut Cursor::new(payload.clone()), &header(ZTXT, payload.len() as u32))
        .unwrap()
        .unwrap();
    match res {
        ChunkValue::Timeline(t) => {
            assert_eq!(t.label, b"anim");
            assert_eq!(t.animations.len(), 1);
            assert_eq!(t.animations[0].frames.len(), 3);
        }
        other => panic!("expected timeline, got {:?}", other),
    }
}

#[test]
fn unregistered_type_returns_none() {
    let reg = default_registry();
    let typ = ChunkType(*b"tEXt");
    assert!(reg.decode(&typ, &mut Cursor::new(vec![1, 2, 3]), &header(typ, 3)).is_none());
    assert!(reg.name_of(&typ).is_none());
    assert_eq!(reg.name_of(&SPLT), Some("suggested palette"));
}

#[test]
fn custom_decoder_extends_loader() {
    let gray = ChunkType(*b"grAy");
    let reg = default_registry().with_decoder(gray, "gray ramp", Box::new(GrayRampDecoder));

    let mut v = PNG_SIGNATURE.to_vec();
    write_chunk(&mut v, gray, &[0, 128, 255]).unwrap();
    write_chunk(&mut v, SPLT, &encode_palette(b"p", &[])).unwrap();
    write_chunk(&mut v, IEND, &[]).unwrap();

    let info = load_info_with(Cursor::new(v), &reg).unwrap();
    assert_eq!(info.suggested_palettes.len(), 2);
    assert_eq!(
        info.palette(b"gray").unwrap(),
        &[
            Rgba::new(0, 0, 0, 255),
            Rgba::new(128, 128, 128, 255),
            Rgba::new(255, 255, 255, 255)
        ]
    );
}

#[test]
fn decoder_that_skips_payload_leaves_stream_in_sync() {
    let reg = Registry::new().with_decoder(SPLT, "lazy", Box::new(LazyDecoder));

    let mut v = PNG_SIGNATURE.to_vec();
    write_chunk(&mut v, SPLT, &encode_palette(b"ignored", &[Rgba::new(1, 2, 3, 4)])).unwrap();
    write_chunk(&mut v, ZTXT, b"not decoded by this registry").unwrap();
    write_chunk(&mut v, IEND, &[]).unwrap();

    let info = load_info_with(Cursor::new(v), &reg).unwrap();
    assert!(info.palette(b"sPLT").unwrap().is_empty());
    assert!(info.frames.is_empty());
}

#[test]
fn empty_registry_ignores_everything() {
    let mut v = PNG_SIGNATURE.to_vec();
    write_chunk(&mut v, SPLT, b"garbage without terminator").unwrap();
    write_chunk(&mut v, IEND, &[]).unwrap();

    let info = load_info_with(Cursor::new(v), &Registry::default()).unwrap();
    assert!(info.suggested_palettes.is_empty());
}
