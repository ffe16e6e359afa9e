use crate::boxes::{BoxHeader, BoxIndex, FourCC, Mp4Box};
use crate::known_boxes::{FTYP_BRANDS, REQUIRED_PATHS, is_container};
use byteorder::{BigEndian, ReadBytesExt};
use log::trace;
use std::io::{ErrorKind, Read, Seek, SeekFrom};

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid box size {size} at offset {offset}")]
    InvalidSize { offset: u64, size: u64 },
    #[error("{0} box not present")]
    BoxNotPresent(String),
    #[error("invalid chapter: {0}")]
    InvalidChapter(String),
    #[error("file header is corrupted or not an mp4 file")]
    InvalidMagic,
    #[error("unsupported ftyp: {0:?}")]
    UnsupportedFtyp(String),
    #[error("year {0:?} does not fit in 32 bits")]
    InvalidYear(String),
}

pub type Result<T> = std::result::Result<T, ParseError>;

pub fn read_box_header<R: Read + Seek>(r: &mut R) -> Result<BoxHeader> {
    let start = r.stream_position()?;
    let size32 = r.read_u32::<BigEndian>()?;
    let mut typ = [0u8; 4]; r.read_exact(&mut typ)?;
    let mut size = size32 as u64;
    let mut header_size = 8;

    if size32 == 1 {
        size = r.read_u64::<BigEndian>()?;
        header_size = 16;
    }

    // 0 ("to end of file") is not supported; it never appears in tag-bearing files.
    if size < header_size || start.checked_add(size).is_none() {
        return Err(ParseError::InvalidSize { offset: start, size });
    }

    Ok(BoxHeader { size, typ: FourCC(typ), header_size, start })
}

/// Walk the whole stream, `size` bytes long, into a pre-order [`BoxIndex`].
pub fn index_boxes<R: Read + Seek>(r: &mut R, size: u64) -> Result<BoxIndex> {
    r.seek(SeekFrom::Start(0))?;
    let mut boxes = Vec::new();
    index_children(r, size, "", &mut boxes)?;
    Ok(BoxIndex::new(boxes))
}

/// Append every box between the current position and `parent_end` to `out`,
/// descending into allow-listed containers before moving to the next sibling.
pub fn index_children<R: Read + Seek>(
    r: &mut R,
    parent_end: u64,
    prefix: &str,
    out: &mut Vec<Mp4Box>,
) -> Result<()> {
    while r.stream_position()? < parent_end {
        let h = read_box_header(r)?;
        let box_end = h.end();
        if box_end > parent_end {
            return Err(ParseError::InvalidSize { offset: h.start, size: h.size });
        }

        let name = h.typ.path_segment();
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };
        trace!("box {path} @ {}..{}", h.start, box_end);

        out.push(Mp4Box {
            start_offset: h.start,
            end_offset: box_end,
            size: h.size,
            path: path.clone(),
        });

        if is_container(&name) {
            let mut content_start = h.start + h.header_size;
            // meta is a full box: skip version + flags
            if &h.typ.0 == b"meta" {
                content_start += 4;
            }
            r.seek(SeekFrom::Start(content_start))?;
            index_children(r, box_end, &path, out)?;
        }

        r.seek(SeekFrom::Start(box_end))?;
    }
    Ok(())
}

/// Fail with [`ParseError::BoxNotPresent`] unless every required path exists.
pub fn check_boxes(index: &BoxIndex) -> Result<()> {
    for path in REQUIRED_PATHS {
        if !index.contains(path) {
            return Err(ParseError::BoxNotPresent(path.to_string()));
        }
    }
    Ok(())
}

/// Check that the stream opens with an `ftyp` box carrying a known brand.
pub fn check_ftyp<R: Read + Seek>(r: &mut R) -> Result<()> {
    r.seek(SeekFrom::Start(0))?;
    let mut buf = [0u8; 12];
    match r.read_exact(&mut buf) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Err(ParseError::InvalidMagic),
        Err(e) => return Err(e.into()),
    }
    if &buf[4..8] != b"ftyp" {
        return Err(ParseError::InvalidMagic);
    }
    let brand = &buf[8..12];
    if !FTYP_BRANDS.iter().any(|b| &b[..] == brand) {
        return Err(ParseError::UnsupportedFtyp(String::from_utf8_lossy(brand).into_owned()));
    }
    Ok(())
}
