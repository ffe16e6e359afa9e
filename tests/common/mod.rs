#![allow(dead_code)]

//! Byte-level builders for synthetic MP4 files.

use std::io::Cursor;

use mp4tag::{Mp4, ReadOptions};

pub fn atom(typ: &[u8], payload: &[u8]) -> Vec<u8> {
    assert_eq!(typ.len(), 4);
    let mut v = Vec::with_capacity(8 + payload.len());
    v.extend_from_slice(&(8 + payload.len() as u32).to_be_bytes());
    v.extend_from_slice(typ);
    v.extend_from_slice(payload);
    v
}

pub fn full(typ: &[u8], version: u8, flags: u32, body: &[u8]) -> Vec<u8> {
    let mut p = vec![version];
    p.extend_from_slice(&flags.to_be_bytes()[1..]);
    p.extend_from_slice(body);
    atom(typ, &p)
}

pub fn ftyp(brand: &[u8; 4]) -> Vec<u8> {
    atom(b"ftyp", &[&brand[..], &512u32.to_be_bytes()[..], &brand[..]].concat())
}

pub const FTYP_LEN: u32 = 20;

/// Absolute offset of the first mdat payload byte in files from [`Mp4Builder`].
pub const MDAT_PAYLOAD: u32 = FTYP_LEN + 8;

pub fn meta(children: &[u8]) -> Vec<u8> {
    full(b"meta", 0, 0, children)
}

pub fn mvhd(timescale: u32, duration: u32) -> Vec<u8> {
    let mut b = Vec::new();
    b.extend_from_slice(&0u32.to_be_bytes()); // creation
    b.extend_from_slice(&0u32.to_be_bytes()); // modification
    b.extend_from_slice(&timescale.to_be_bytes());
    b.extend_from_slice(&duration.to_be_bytes());
    b.extend_from_slice(&[0u8; 80]);
    full(b"mvhd", 0, 0, &b)
}

pub fn mvhd_v1(timescale: u32, duration: u64) -> Vec<u8> {
    let mut b = Vec::new();
    b.extend_from_slice(&0u64.to_be_bytes());
    b.extend_from_slice(&0u64.to_be_bytes());
    b.extend_from_slice(&timescale.to_be_bytes());
    b.extend_from_slice(&duration.to_be_bytes());
    b.extend_from_slice(&[0u8; 80]);
    full(b"mvhd", 1, 0, &b)
}

pub fn mdhd(timescale: u32, duration: u32) -> Vec<u8> {
    let mut b = Vec::new();
    b.extend_from_slice(&[0u8; 8]);
    b.extend_from_slice(&timescale.to_be_bytes());
    b.extend_from_slice(&duration.to_be_bytes());
    b.extend_from_slice(&[0x55, 0xc4, 0, 0]); // "und", pre_defined
    full(b"mdhd", 0, 0, &b)
}

pub fn hdlr(subtype: &[u8; 4]) -> Vec<u8> {
    let mut b = Vec::new();
    b.extend_from_slice(&0u32.to_be_bytes());
    b.extend_from_slice(subtype);
    b.extend_from_slice(&[0u8; 12]);
    b.push(0);
    full(b"hdlr", 0, 0, &b)
}

pub fn stsc(runs: &[(u32, u32)]) -> Vec<u8> {
    let mut b = (runs.len() as u32).to_be_bytes().to_vec();
    for (first, per_chunk) in runs {
        b.extend_from_slice(&first.to_be_bytes());
        b.extend_from_slice(&per_chunk.to_be_bytes());
        b.extend_from_slice(&1u32.to_be_bytes());
    }
    full(b"stsc", 0, 0, &b)
}

pub fn stco(offsets: &[u32]) -> Vec<u8> {
    let mut b = (offsets.len() as u32).to_be_bytes().to_vec();
    for o in offsets {
        b.extend_from_slice(&o.to_be_bytes());
    }
    full(b"stco", 0, 0, &b)
}

pub fn stts(entries: &[(u32, u32)]) -> Vec<u8> {
    let mut b = (entries.len() as u32).to_be_bytes().to_vec();
    for (count, delta) in entries {
        b.extend_from_slice(&count.to_be_bytes());
        b.extend_from_slice(&delta.to_be_bytes());
    }
    full(b"stts", 0, 0, &b)
}

pub struct Track<'a> {
    pub handler: &'a [u8; 4],
    pub timescale: u32,
    pub stsc: &'a [(u32, u32)],
    pub stco: &'a [u32],
    pub stts: &'a [(u32, u32)],
}

pub fn trak(t: &Track) -> Vec<u8> {
    let stbl = atom(b"stbl", &[stts(t.stts), stsc(t.stsc), stco(t.stco)].concat());
    let minf = atom(b"minf", &stbl);
    let mdia = atom(b"mdia", &[mdhd(t.timescale, 0), hdlr(t.handler), minf].concat());
    atom(b"trak", &mdia)
}

pub fn sound_trak() -> Vec<u8> {
    trak(&Track {
        handler: b"soun",
        timescale: 44100,
        stsc: &[(1, 1)],
        stco: &[MDAT_PAYLOAD],
        stts: &[(1, 1024)],
    })
}

/// `data` sub-atom: type indicator, locale, payload.
pub fn data(type_code: u32, payload: &[u8]) -> Vec<u8> {
    atom(b"data", &[&type_code.to_be_bytes()[..], &[0u8; 4][..], payload].concat())
}

pub fn text_tag(name: &[u8], value: &str) -> Vec<u8> {
    atom(name, &data(1, value.as_bytes()))
}

/// Freeform `----` atom with one name and one or more values.
pub fn custom(name: &str, values: &[&str]) -> Vec<u8> {
    let mut p = full(b"mean", 0, 0, b"com.apple.iTunes");
    p.extend(full(b"name", 0, 0, name.as_bytes()));
    for v in values {
        p.extend(data(1, v.as_bytes()));
    }
    atom(b"----", &p)
}

/// Nero chapter list: `(start in 100ns units, title)`.
pub fn chpl(chapters: &[(u64, &str)]) -> Vec<u8> {
    let mut b = vec![0u8]; // reserved
    b.extend_from_slice(&(chapters.len() as u32).to_be_bytes());
    for (start, title) in chapters {
        b.extend_from_slice(&start.to_be_bytes());
        b.push(title.len() as u8);
        b.extend_from_slice(title.as_bytes());
    }
    full(b"chpl", 1, 0, &b)
}

/// Length-prefixed text samples as stored in a chapter track chunk.
pub fn text_samples(titles: &[&str]) -> Vec<u8> {
    let mut v = Vec::new();
    for t in titles {
        v.extend_from_slice(&(t.len() as u16).to_be_bytes());
        v.extend_from_slice(t.as_bytes());
    }
    v
}

/// `ftyp`, `mdat`, then `moov { mvhd, trak*, udta { meta { hdlr, ilst }, extra* } }`.
pub struct Mp4Builder {
    pub mdat: Vec<u8>,
    pub mvhd: Option<Vec<u8>>,
    pub traks: Vec<Vec<u8>>,
    pub tags: Vec<Vec<u8>>,
    pub ilst: bool,
    pub udta_extra: Vec<Vec<u8>>,
}

impl Mp4Builder {
    pub fn new() -> Self {
        Self {
            mdat: vec![0u8; 16],
            mvhd: Some(mvhd(1000, 0)),
            traks: vec![sound_trak()],
            tags: Vec::new(),
            ilst: true,
            udta_extra: Vec::new(),
        }
    }

    pub fn tag(mut self, atom: Vec<u8>) -> Self {
        self.tags.push(atom);
        self
    }

    pub fn udta(mut self, atom: Vec<u8>) -> Self {
        self.udta_extra.push(atom);
        self
    }

    pub fn trak(mut self, atom: Vec<u8>) -> Self {
        self.traks.push(atom);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut meta_kids = hdlr(b"mdir");
        if self.ilst {
            meta_kids.extend(atom(b"ilst", &self.tags.concat()));
        }
        let mut udta = meta(&meta_kids);
        udta.extend(self.udta_extra.concat());

        let mut moov = self.mvhd.clone().unwrap_or_default();
        moov.extend(self.traks.concat());
        moov.extend(atom(b"udta", &udta));

        let mut out = ftyp(b"M4A ");
        out.extend(atom(b"mdat", &self.mdat));
        out.extend(atom(b"moov", &moov));
        out
    }
}

pub fn open(bytes: Vec<u8>) -> Mp4<Cursor<Vec<u8>>> {
    let len = bytes.len() as u64;
    Mp4::with_options(Cursor::new(bytes), len, ReadOptions::default())
}

pub fn read_tags(bytes: Vec<u8>) -> mp4tag::Mp4Tags {
    open(bytes).read_tags().expect("read_tags failed")
}
