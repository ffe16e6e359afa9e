//! Fixed catalogue of the box types this crate knows how to walk.
//!
//! Only types in [`CONTAINERS`] are descended into. Everything else is
//! indexed as an opaque leaf, even when it structurally holds children
//! (`stsd`, `edts`, `dinf`, ...). That list is part of the format contract:
//! tag paths under `ilst` only exist because each tag atom is listed here.

/// Box types whose payload is a sequence of child boxes.
pub const CONTAINERS: &[&str] = &[
    "moov", "udta", "meta", "ilst", "----", "(c)alb",
    "aART", "(c)art", "(c)nam", "(c)cmt", "(c)gen", "gnre",
    "(c)wrt", "(c)con", "cprt", "desc", "(c)lyr", "(c)nrt",
    "(c)pub", "trkn", "covr", "(c)day", "disk", "(c)too",
    "trak", "mdia", "minf", "stbl", "rtng", "plID",
    "atID", "tmpo", "sonm", "soal", "soar", "soco",
    "soaa", "tvsn", "tvsh", "tves", "tven", "tvnn", "stik",
    "ldes",
];

/// Paths that must exist before any field is decoded.
pub const REQUIRED_PATHS: [&str; 5] = [
    "moov",
    "mdat",
    "moov.udta",
    "moov.udta.meta",
    "moov.trak.mdia.minf.stbl.stco",
];

/// Major brands accepted by the `ftyp` check.
pub const FTYP_BRANDS: [&[u8; 4]; 8] = [
    b"M4A ", b"M4B ", b"dash", b"mp41", b"mp42", b"isom", b"iso2", b"avc1",
];

pub const ILST_PATH: &str = "moov.udta.meta.ilst";
pub const CHPL_PATH: &str = "moov.udta.chpl";
pub const MVHD_PATH: &str = "moov.mvhd";
pub const HDLR_PATH: &str = "moov.trak.mdia.hdlr";
pub const MDHD_PATH: &str = "moov.trak.mdia.mdhd";
pub const STSC_PATH: &str = "moov.trak.mdia.minf.stbl.stsc";
pub const STCO_PATH: &str = "moov.trak.mdia.minf.stbl.stco";
pub const STTS_PATH: &str = "moov.trak.mdia.minf.stbl.stts";

pub fn is_container(name: &str) -> bool {
    CONTAINERS.contains(&name)
}

/// Path of the `data` sub-atom carrying the value of tag atom `atom`.
pub fn tag_data_path(atom: &str) -> String {
    format!("{ILST_PATH}.{atom}.data")
}

/// Human-readable name for the box types the CLI lists.
pub fn full_name(name: &str) -> &'static str {
    match name {
        "ftyp" => "File Type Box",
        "moov" => "Movie Box",
        "mdat" => "Media Data Box",
        "free" => "Free Space Box",
        "mvhd" => "Movie Header Box",
        "trak" => "Track Box",
        "tkhd" => "Track Header Box",
        "mdia" => "Media Box",
        "mdhd" => "Media Header Box",
        "hdlr" => "Handler Reference Box",
        "minf" => "Media Information Box",
        "stbl" => "Sample Table Box",
        "stsd" => "Sample Description Box",
        "stts" => "Decoding Time to Sample Box",
        "stsc" => "Sample To Chunk Box",
        "stsz" => "Sample Size Box",
        "stco" => "Chunk Offset Box",
        "co64" => "64-bit Chunk Offset Box",
        "udta" => "User Data Box",
        "meta" => "Meta Box",
        "ilst" => "iTunes Item List",
        "chpl" => "Nero Chapter List",
        "data" => "iTunes Data Atom",
        "name" => "iTunes Name Atom",
        "mean" => "iTunes Mean Atom",
        "----" => "iTunes Custom Tag",
        "covr" => "Cover Art",
        _ => "",
    }
}
