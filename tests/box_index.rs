mod common;

use common::*;
use mp4tag::boxes::FourCC;
use mp4tag::parser::{ParseError, index_boxes, read_box_header};
use std::io::{Cursor, Read, Seek, SeekFrom};

fn index(bytes: &[u8]) -> mp4tag::BoxIndex {
    let mut cur = Cursor::new(bytes.to_vec());
    index_boxes(&mut cur, bytes.len() as u64).expect("index_boxes failed")
}

fn tagged_file() -> Vec<u8> {
    Mp4Builder::new()
        .tag(text_tag(b"\xA9nam", "Song"))
        .tag(text_tag(b"aART", "Band"))
        .build()
}

#[test]
fn read_single_ftyp_header() {
    let mut cur = Cursor::new(ftyp(b"isom"));

    let hdr = read_box_header(&mut cur).expect("read_box_header failed");

    assert_eq!(hdr.start, 0);
    assert_eq!(hdr.size, 20);
    assert_eq!(hdr.typ, FourCC(*b"ftyp"));
    assert_eq!(hdr.header_size, 8);
}

#[test]
fn large_size_header() {
    let mut v = 1u32.to_be_bytes().to_vec();
    v.extend_from_slice(b"free");
    v.extend_from_slice(&24u64.to_be_bytes());
    v.extend_from_slice(&[0u8; 8]);

    let idx = index(&v);
    let b = idx.get_box_by_path("free").unwrap();
    assert_eq!(b.size, 24);
    assert_eq!(b.end_offset, 24);
}

#[test]
fn copyright_atoms_get_readable_paths() {
    let idx = index(&tagged_file());

    assert!(idx.contains("moov.udta.meta.ilst.(c)nam"));
    assert!(idx.contains("moov.udta.meta.ilst.(c)nam.data"));
    assert!(idx.contains("moov.udta.meta.ilst.aART.data"));
    assert_eq!(FourCC(*b"\xA9ART").path_segment(), "(c)art");
    assert_eq!(FourCC(*b"aART").path_segment(), "aART");
}

#[test]
fn paths_are_full_ancestor_chains() {
    let idx = index(&tagged_file());

    let paths: Vec<&str> = idx.iter().map(|b| b.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "ftyp",
            "mdat",
            "moov",
            "moov.mvhd",
            "moov.trak",
            "moov.trak.mdia",
            "moov.trak.mdia.mdhd",
            "moov.trak.mdia.hdlr",
            "moov.trak.mdia.minf",
            "moov.trak.mdia.minf.stbl",
            "moov.trak.mdia.minf.stbl.stts",
            "moov.trak.mdia.minf.stbl.stsc",
            "moov.trak.mdia.minf.stbl.stco",
            "moov.udta",
            "moov.udta.meta",
            "moov.udta.meta.hdlr",
            "moov.udta.meta.ilst",
            "moov.udta.meta.ilst.(c)nam",
            "moov.udta.meta.ilst.(c)nam.data",
            "moov.udta.meta.ilst.aART",
            "moov.udta.meta.ilst.aART.data",
        ]
    );
}

#[test]
fn offsets_stay_inside_their_parent() {
    let bytes = tagged_file();
    let idx = index(&bytes);

    for b in &idx {
        assert_eq!(b.end_offset, b.start_offset + b.size, "{}", b.path);
        assert!(b.start_offset < b.end_offset, "{}", b.path);
        assert!(b.end_offset <= bytes.len() as u64, "{}", b.path);

        if let Some((parent_path, _)) = b.path.rsplit_once('.') {
            // nearest preceding box with the parent's path encloses this one
            let parent = idx
                .iter()
                .filter(|p| p.path == parent_path && p.start_offset < b.start_offset)
                .last()
                .unwrap();
            assert!(b.start_offset >= parent.start_offset);
            assert!(b.end_offset <= parent.end_offset, "{} escapes {}", b.path, parent.path);
        }
    }
}

#[test]
fn children_precede_next_sibling() {
    let idx = index(&tagged_file());
    let order: Vec<&str> = idx.iter().map(|b| b.path.as_str()).collect();

    let trak = order.iter().position(|p| *p == "moov.trak").unwrap();
    let stco = order.iter().position(|p| *p == "moov.trak.mdia.minf.stbl.stco").unwrap();
    let udta = order.iter().position(|p| *p == "moov.udta").unwrap();
    assert!(trak < stco && stco < udta);
}

#[test]
fn meta_children_start_after_version_and_flags() {
    let idx = index(&tagged_file());
    let meta = idx.get_box_by_path("moov.udta.meta").unwrap();
    let first_child = idx.get_box_by_path("moov.udta.meta.hdlr").unwrap();
    assert_eq!(first_child.start_offset, meta.start_offset + 12);
}

#[test]
fn unknown_boxes_are_leaves() {
    // a valid-looking child inside a non-container is never indexed
    let hidden = atom(b"edts", &atom(b"elst", &[0u8; 8]));
    let bytes = [atom(b"moov", &hidden), atom(b"free", &atom(b"moov", &[]))].concat();
    let idx = index(&bytes);

    let paths: Vec<&str> = idx.iter().map(|b| b.path.as_str()).collect();
    assert_eq!(paths, vec!["moov", "moov.edts", "free"]);
}

#[test]
fn repeated_paths_keep_document_order() {
    let text = trak(&Track {
        handler: b"text",
        timescale: 1000,
        stsc: &[(1, 1)],
        stco: &[0],
        stts: &[(1, 1)],
    });
    let bytes = Mp4Builder::new().trak(text).build();
    let idx = index(&bytes);

    let hdlrs = idx.get_boxes_by_path("moov.trak.mdia.hdlr");
    assert_eq!(hdlrs.len(), 2);
    assert!(hdlrs[0].start_offset < hdlrs[1].start_offset);
    assert_eq!(idx.get_box_by_path("moov.trak.mdia.hdlr"), Some(hdlrs[0]));
}

#[test]
fn indexed_ranges_reread_to_the_same_headers() {
    let bytes = tagged_file();
    let idx = index(&bytes);
    let mut cur = Cursor::new(bytes);

    for b in &idx {
        cur.seek(SeekFrom::Start(b.start_offset)).unwrap();
        let mut hdr = [0u8; 8];
        cur.read_exact(&mut hdr).unwrap();
        assert_eq!(u32::from_be_bytes(hdr[..4].try_into().unwrap()) as u64, b.size);
        assert_eq!(FourCC(hdr[4..].try_into().unwrap()).path_segment(), b.name());
    }
}

#[test]
fn zero_size_is_rejected() {
    let bytes = [atom(b"free", &[]), vec![0, 0, 0, 0, b'f', b'r', b'e', b'e']].concat();
    let mut cur = Cursor::new(bytes.clone());
    let err = index_boxes(&mut cur, bytes.len() as u64).unwrap_err();
    assert!(matches!(err, ParseError::InvalidSize { offset: 8, size: 0 }));
}

#[test]
fn largesize_past_end_of_address_space_is_rejected() {
    let mut bytes = atom(b"free", &[]);
    bytes.extend_from_slice(&1u32.to_be_bytes());
    bytes.extend_from_slice(b"moov");
    bytes.extend_from_slice(&u64::MAX.to_be_bytes());
    let mut cur = Cursor::new(bytes.clone());
    let err = index_boxes(&mut cur, bytes.len() as u64).unwrap_err();
    assert!(matches!(err, ParseError::InvalidSize { offset: 8, size: u64::MAX }));
}

#[test]
fn child_overrunning_parent_is_rejected() {
    let mut child = atom(b"mvhd", &[0u8; 8]);
    child[3] = 64; // claims 64 bytes inside a 24-byte moov
    let bytes = atom(b"moov", &child);
    let mut cur = Cursor::new(bytes.clone());
    let err = index_boxes(&mut cur, bytes.len() as u64).unwrap_err();
    assert!(matches!(err, ParseError::InvalidSize { offset: 8, size: 64 }));
}

#[test]
fn truncated_stream_is_an_io_error() {
    let bytes = tagged_file();
    // drop the whole aART atom (28 bytes) and part of the one before it
    let mut cur = Cursor::new(bytes[..bytes.len() - 30].to_vec());
    let err = index_boxes(&mut cur, bytes.len() as u64).unwrap_err();
    assert!(matches!(err, ParseError::Io(_)));
}
