use pngsheet::SheetError;
use pngsheet::palette::{ENTRY_SIZE, Rgba, decode_palette, encode_palette};

#[test]
fn decodes_two_color_palette() {
    let mut payload = b"p\0".to_vec();
    payload.push(0x00);
    payload.extend_from_slice(&[10, 20, 30, 255, 0, 0]);
    payload.extend_from_slice(&[40, 50, 60, 255, 0, 0]);

    let p = decode_palette(&payload).unwrap();
    assert_eq!(p.name, b"p");
    assert_eq!(
        p.colors,
        vec![Rgba::new(10, 20, 30, 255), Rgba::new(40, 50, 60, 255)]
    );
}

#[test]
fn frequency_bytes_are_ignored() {
    let mut payload = b"freq\0\x08".to_vec();
    payload.extend_from_slice(&[1, 2, 3, 4, 0xff, 0xee]);

    let p = decode_palette(&payload).unwrap();
    assert_eq!(p.colors, vec![Rgba::new(1, 2, 3, 4)]);
}

#[test]
fn palette_length_follows_payload_length() {
    let names: [&[u8]; 4] = [b"", b"a", b"extra", b"a much longer palette name"];
    for name in names {
        for entries in [0usize, 1, 2, 16, 255] {
            let mut payload = name.to_vec();
            payload.extend_from_slice(&[0, 8]);
            for i in 0..entries {
                payload.extend_from_slice(&[i as u8, 0, 0, 255, 0, 1]);
            }

            let p = decode_palette(&payload).unwrap();
            assert_eq!(p.colors.len(), (payload.len() - name.len() - 2) / ENTRY_SIZE);
            assert_eq!(p.colors.len(), entries);
        }
    }
}

#[test]
fn empty_entry_region_is_an_empty_palette() {
    let p = decode_palette(b"none\0\x08").unwrap();
    assert_eq!(p.name, b"none");
    assert!(p.colors.is_empty());
}

#[test]
fn partial_entry_is_malformed() {
    for extra in 1..ENTRY_SIZE {
        let mut payload = b"p\0\x08".to_vec();
        payload.extend_from_slice(&[10, 20, 30, 255, 0, 0]);
        payload.extend(std::iter::repeat_n(7u8, extra));

        assert!(
            matches!(decode_palette(&payload), Err(SheetError::MalformedPalette(_))),
            "{extra} trailing bytes accepted"
        );
    }
}

#[test]
fn missing_terminator_is_malformed() {
    assert!(matches!(
        decode_palette(b"no terminator here"),
        Err(SheetError::MalformedPalette(_))
    ));
    assert!(matches!(
        decode_palette(b""),
        Err(SheetError::MalformedPalette(_))
    ));
}

#[test]
fn missing_reserved_byte_is_malformed() {
    assert!(matches!(
        decode_palette(b"p\0"),
        Err(SheetError::MalformedPalette(_))
    ));
}

#[test]
fn encoded_palette_decodes_back() {
    let colors = [Rgba::new(0, 0, 0, 0), Rgba::new(255, 128, 64, 32)];
    let payload = encode_palette(b"alt", &colors);
    assert_eq!(payload.len(), 3 + 2 + 2 * ENTRY_SIZE);

    let p = decode_palette(&payload).unwrap();
    assert_eq!(p.name, b"alt");
    assert_eq!(p.colors, colors);
}
