//! Decoders for individual iTunes tag fields.
//!
//! Every decoder looks up `moov.udta.meta.ilst.<atom>.data` and, when the
//! atom is missing, returns the field's absent value rather than an error.
//! Offsets are relative to the start of the `data` atom: 8 bytes of box
//! header, 4 bytes of type indicator and 4 bytes of locale put most payloads
//! at +16.

use crate::boxes::{BoxIndex, Mp4Box};
use crate::known_boxes::{ILST_PATH, MVHD_PATH, tag_data_path};
use crate::parser::Result;
use crate::tables::{Genre, ImageType, ItunesAdvisory, ItunesStik};
use crate::tags::Picture;
use crate::util::read_string;
use byteorder::{BigEndian, ReadBytesExt};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::io::{Read, Seek, SeekFrom};
use std::time::Duration;

const DATA_PAYLOAD: u64 = 16;
const NAME_PAYLOAD: u64 = 12;

fn data_box<'a>(index: &'a BoxIndex, atom: &str) -> Option<&'a Mp4Box> {
    index.get_box_by_path(&tag_data_path(atom))
}

/// Text payload of `atom`, or `""` when the atom is absent.
pub fn read_text_tag<R: Read + Seek>(r: &mut R, index: &BoxIndex, atom: &str) -> Result<String> {
    let Some(b) = data_box(index, atom) else {
        return Ok(String::new());
    };
    r.seek(SeekFrom::Start(b.start_offset + DATA_PAYLOAD))?;
    Ok(read_string(r, b.size.saturating_sub(DATA_PAYLOAD))?)
}

pub fn read_bpm<R: Read + Seek>(r: &mut R, index: &BoxIndex) -> Result<Option<i16>> {
    let Some(b) = data_box(index, "tmpo") else {
        return Ok(None);
    };
    r.seek(SeekFrom::Start(b.start_offset + DATA_PAYLOAD))?;
    Ok(Some(r.read_i16::<BigEndian>()?))
}

/// `(number, total)` from a `trkn` or `disk` atom.
pub fn read_number_pair<R: Read + Seek>(
    r: &mut R,
    index: &BoxIndex,
    atom: &str,
) -> Result<(Option<i16>, Option<i16>)> {
    let Some(b) = data_box(index, atom) else {
        return Ok((None, None));
    };
    // two reserved bytes precede the pair
    r.seek(SeekFrom::Start(b.start_offset + 18))?;
    let num = r.read_i16::<BigEndian>()?;
    let total = r.read_i16::<BigEndian>()?;
    Ok((Some(num), Some(total)))
}

fn read_i32_at<R: Read + Seek>(
    r: &mut R,
    index: &BoxIndex,
    atom: &str,
    offset: u64,
) -> Result<Option<i32>> {
    let Some(b) = data_box(index, atom) else {
        return Ok(None);
    };
    r.seek(SeekFrom::Start(b.start_offset + offset))?;
    Ok(Some(r.read_i32::<BigEndian>()?))
}

fn read_u8_at<R: Read + Seek>(
    r: &mut R,
    index: &BoxIndex,
    atom: &str,
    offset: u64,
) -> Result<Option<u8>> {
    let Some(b) = data_box(index, atom) else {
        return Ok(None);
    };
    r.seek(SeekFrom::Start(b.start_offset + offset))?;
    Ok(Some(r.read_u8()?))
}

pub fn read_itunes_album_id<R: Read + Seek>(r: &mut R, index: &BoxIndex) -> Result<Option<i32>> {
    read_i32_at(r, index, "plID", 20)
}

pub fn read_itunes_artist_id<R: Read + Seek>(r: &mut R, index: &BoxIndex) -> Result<Option<i32>> {
    read_i32_at(r, index, "atID", DATA_PAYLOAD)
}

pub fn read_tv_season<R: Read + Seek>(r: &mut R, index: &BoxIndex) -> Result<Option<i32>> {
    read_i32_at(r, index, "tvsn", DATA_PAYLOAD)
}

pub fn read_tv_episode<R: Read + Seek>(r: &mut R, index: &BoxIndex) -> Result<Option<i32>> {
    read_i32_at(r, index, "tves", DATA_PAYLOAD)
}

pub fn read_advisory<R: Read + Seek>(r: &mut R, index: &BoxIndex) -> Result<ItunesAdvisory> {
    let code = read_u8_at(r, index, "rtng", DATA_PAYLOAD)?;
    Ok(code.and_then(ItunesAdvisory::from_code).unwrap_or_default())
}

/// Legacy genre. The atom holds a 16-bit code; only its low byte is read.
pub fn read_genre<R: Read + Seek>(r: &mut R, index: &BoxIndex) -> Result<Genre> {
    let code = read_u8_at(r, index, "gnre", 17)?;
    Ok(code.and_then(Genre::from_code).unwrap_or_default())
}

pub fn read_stik<R: Read + Seek>(r: &mut R, index: &BoxIndex) -> Result<Option<ItunesStik>> {
    let code = read_u8_at(r, index, "stik", DATA_PAYLOAD)?;
    Ok(code.and_then(ItunesStik::from_code))
}

/// Every `covr` data atom, in document order.
pub fn read_pictures<R: Read + Seek>(r: &mut R, index: &BoxIndex) -> Result<Vec<Picture>> {
    let mut pictures = Vec::new();
    for b in index.get_boxes_by_path(&tag_data_path("covr")) {
        // low byte of the type indicator
        r.seek(SeekFrom::Start(b.start_offset + 11))?;
        let code = r.read_u8()?;
        let format = ImageType::from_code(code).unwrap_or_default();

        r.seek(SeekFrom::Start(b.start_offset + DATA_PAYLOAD))?;
        let mut data = vec![0u8; b.size.saturating_sub(DATA_PAYLOAD) as usize];
        r.read_exact(&mut data)?;
        pictures.push(Picture { format, data });
    }
    Ok(pictures)
}

pub type CustomTags = BTreeMap<String, String>;
pub type OtherCustomTags = BTreeMap<String, Vec<String>>;

/// Freeform (`----`) tags.
///
/// Name and data atoms are collected separately and joined by position. A
/// data atom that starts exactly where the previous one ended carries another
/// value for the same name. Any other data atom takes the latest unconsumed
/// name atom that precedes it. The first value seen for a name lands in the
/// first map; every later value for that name, contiguous or from a repeated
/// name atom, is appended to the second.
pub fn read_custom<R: Read + Seek>(
    r: &mut R,
    index: &BoxIndex,
    upper: bool,
) -> Result<(CustomTags, OtherCustomTags)> {
    let mut custom = CustomTags::new();
    let mut others = OtherCustomTags::new();

    let path = format!("{ILST_PATH}.----");
    let name_boxes = index.get_boxes_by_path(&format!("{path}.name"));
    if name_boxes.is_empty() {
        return Ok((custom, others));
    }

    let mut names = Vec::with_capacity(name_boxes.len());
    for b in name_boxes {
        r.seek(SeekFrom::Start(b.start_offset + NAME_PAYLOAD))?;
        let mut name = read_string(r, b.size.saturating_sub(NAME_PAYLOAD))?;
        if upper {
            name = name.to_uppercase();
        }
        names.push((b.start_offset, name));
    }

    let mut next_name = 0usize;
    let mut prev_end: Option<u64> = None;
    let mut current: Option<usize> = None;

    for b in index.get_boxes_by_path(&format!("{path}.data")) {
        r.seek(SeekFrom::Start(b.start_offset + DATA_PAYLOAD))?;
        let value = read_string(r, b.size.saturating_sub(DATA_PAYLOAD))?;
        let contiguous = prev_end == Some(b.start_offset);
        prev_end = Some(b.end_offset);

        if contiguous {
            match current {
                Some(i) => others.entry(names[i].1.clone()).or_default().push(value),
                None => warn!("custom data at {} has no name, skipping", b.start_offset),
            }
            continue;
        }

        let unconsumed = &names[next_name..];
        let pick = match unconsumed.iter().rposition(|(start, _)| *start < b.start_offset) {
            Some(i) => next_name + i,
            None if !unconsumed.is_empty() => next_name,
            None => {
                warn!("custom data at {} has no name, skipping", b.start_offset);
                current = None;
                continue;
            }
        };
        for (_, skipped) in &names[next_name..pick] {
            warn!("custom tag {skipped:?} has no data, skipping");
        }
        next_name = pick + 1;
        current = Some(pick);

        let name = &names[pick].1;
        if custom.contains_key(name) {
            others.entry(name.clone()).or_default().push(value);
        } else {
            custom.insert(name.clone(), value);
        }
    }

    debug!("custom tags: {} named, {} with extra values", custom.len(), others.len());
    Ok((custom, others))
}

/// `(timescale, duration)` from a movie or media header box.
///
/// Version 0 keeps both as 32-bit values at +20; version 1 moves the
/// timescale to +28 and widens the duration to 64 bits.
pub(crate) fn read_header_timing<R: Read + Seek>(r: &mut R, b: &Mp4Box) -> Result<(u32, u64)> {
    r.seek(SeekFrom::Start(b.start_offset + 8))?;
    let version = r.read_u8()?;
    if version == 1 {
        r.seek(SeekFrom::Start(b.start_offset + 28))?;
        let timescale = r.read_u32::<BigEndian>()?;
        let units = r.read_u64::<BigEndian>()?;
        Ok((timescale, units))
    } else {
        r.seek(SeekFrom::Start(b.start_offset + 20))?;
        let timescale = r.read_u32::<BigEndian>()?;
        let units = r.read_u32::<BigEndian>()? as u64;
        Ok((timescale, units))
    }
}

/// Total running time from `moov.mvhd`; zero when the header is missing.
pub fn read_duration<R: Read + Seek>(r: &mut R, index: &BoxIndex) -> Result<Duration> {
    let Some(mvhd) = index.get_box_by_path(MVHD_PATH) else {
        return Ok(Duration::ZERO);
    };
    let (timescale, units) = read_header_timing(r, mvhd)?;
    if timescale == 0 {
        warn!("mvhd timescale is 0, duration unknown");
        return Ok(Duration::ZERO);
    }
    match Duration::try_from_secs_f64(units as f64 / timescale as f64) {
        Ok(d) => Ok(d),
        Err(_) => {
            warn!("mvhd duration {units}/{timescale} out of range, duration unknown");
            Ok(Duration::ZERO)
        }
    }
}
