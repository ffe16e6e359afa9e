//! Chapter markers.
//!
//! Two layouts are understood: the Nero `chpl` list under `moov.udta`, and a
//! QuickTime text track whose samples are the chapter titles. When a `chpl`
//! box exists it is used exclusively.

use crate::boxes::{BoxIndex, Mp4Box};
use crate::fields::read_header_timing;
use crate::known_boxes::{CHPL_PATH, HDLR_PATH, MDHD_PATH, STCO_PATH, STSC_PATH, STTS_PATH};
use crate::parser::{ParseError, Result};
use crate::util::read_string;
use byteorder::{BigEndian, ReadBytesExt};
use log::debug;
use serde::Serialize;
use std::io::{Read, Seek, SeekFrom};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chapter {
    pub title: String,
    #[serde(serialize_with = "crate::util::duration_secs")]
    pub start_time: Duration,
    #[serde(serialize_with = "crate::util::duration_secs")]
    pub duration: Duration,
}

/// One run of the sample-to-chunk table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleToChunk {
    pub first_chunk: u32,
    pub samples_per_chunk: u32,
}

/// Samples stored in 1-based chunk `chunk`: the run with the greatest
/// `first_chunk <= chunk` wins; chunks before the first run hold one sample.
pub fn samples_in_chunk(runs: &[SampleToChunk], chunk: u32) -> u32 {
    let mut samples = 1;
    for run in runs {
        if run.first_chunk > chunk {
            break;
        }
        samples = run.samples_per_chunk;
    }
    samples
}

/// Chapters from whichever layout the file carries; empty when it has none.
pub fn read_chapters<R: Read + Seek>(r: &mut R, index: &BoxIndex) -> Result<Vec<Chapter>> {
    if let Some(chpl) = index.get_box_by_path(CHPL_PATH) {
        debug!("reading nero chapters from chpl @ {}", chpl.start_offset);
        return read_nero_chapters(r, chpl);
    }
    read_quicktime_chapters(r, index)
}

/// Nero `chpl`: start times in 100ns units, each chapter running until the
/// next one starts. The last chapter's duration stays zero.
pub fn read_nero_chapters<R: Read + Seek>(r: &mut R, chpl: &Mp4Box) -> Result<Vec<Chapter>> {
    // header, version + flags, reserved
    r.seek(SeekFrom::Start(chpl.start_offset + 13))?;
    let count = r.read_u32::<BigEndian>()?;

    let mut chapters: Vec<Chapter> = Vec::with_capacity(count.min(1024) as usize);
    for _ in 0..count {
        let start = r.read_u64::<BigEndian>()?;
        let title_len = r.read_u8()?;
        let title = read_string(r, title_len as u64)?;
        let start_time = Duration::from_nanos(start.saturating_mul(100));

        if let Some(last) = chapters.last_mut() {
            last.duration = start_time.saturating_sub(last.start_time);
        }
        chapters.push(Chapter { title, start_time, duration: Duration::ZERO });
    }
    debug!("{} nero chapters", chapters.len());
    Ok(chapters)
}

fn nth_box<'a>(index: &'a BoxIndex, path: &str, n: usize) -> Result<&'a Mp4Box> {
    index
        .get_boxes_by_path(path)
        .get(n)
        .copied()
        .ok_or_else(|| ParseError::InvalidChapter(format!("no {path} for track {n}")))
}

fn read_stsc<R: Read + Seek>(r: &mut R, stsc: &Mp4Box) -> Result<Vec<SampleToChunk>> {
    r.seek(SeekFrom::Start(stsc.start_offset + 12))?;
    let entries = r.read_u32::<BigEndian>()?;
    let mut runs = Vec::with_capacity(entries.min(1024) as usize);
    for _ in 0..entries {
        let first_chunk = r.read_u32::<BigEndian>()?;
        let samples_per_chunk = r.read_u32::<BigEndian>()?;
        let _sample_description_index = r.read_u32::<BigEndian>()?;
        runs.push(SampleToChunk { first_chunk, samples_per_chunk });
    }
    Ok(runs)
}

fn read_stco<R: Read + Seek>(r: &mut R, stco: &Mp4Box) -> Result<Vec<u64>> {
    r.seek(SeekFrom::Start(stco.start_offset + 12))?;
    let entries = r.read_u32::<BigEndian>()?;
    let mut offsets = Vec::with_capacity(entries.min(1024) as usize);
    for _ in 0..entries {
        offsets.push(r.read_u32::<BigEndian>()? as u64);
    }
    Ok(offsets)
}

/// Titles of every sample, chunk by chunk. Each sample is a 16-bit length
/// followed by that many bytes of text.
fn read_titles<R: Read + Seek>(
    r: &mut R,
    runs: &[SampleToChunk],
    chunk_offsets: &[u64],
) -> Result<Vec<String>> {
    let mut titles = Vec::new();
    for (i, &offset) in chunk_offsets.iter().enumerate() {
        let chunk = i as u32 + 1;
        r.seek(SeekFrom::Start(offset))?;
        for _ in 0..samples_in_chunk(runs, chunk) {
            let len = r.read_i16::<BigEndian>()?;
            if len <= 0 {
                return Err(ParseError::InvalidChapter(format!(
                    "title length {len} in chunk {chunk}"
                )));
            }
            titles.push(read_string(r, len as u64)?);
        }
    }
    Ok(titles)
}

/// Chapters from a QuickTime text track.
///
/// Tracks all share the same paths, so the text track's ordinal among the
/// `hdlr` boxes selects the matching `mdhd`, `stsc`, `stco` and `stts`.
pub fn read_quicktime_chapters<R: Read + Seek>(r: &mut R, index: &BoxIndex) -> Result<Vec<Chapter>> {
    let mut track = None;
    for (i, hdlr) in index.get_boxes_by_path(HDLR_PATH).into_iter().enumerate() {
        r.seek(SeekFrom::Start(hdlr.start_offset + 16))?;
        if read_string(r, 4)? == "text" {
            track = Some(i);
        }
    }
    let Some(track) = track else {
        return Ok(Vec::new());
    };
    debug!("chapter text track is trak #{track}");

    let mdhd = nth_box(index, MDHD_PATH, track)?;
    let stsc = nth_box(index, STSC_PATH, track)?;
    let stco = nth_box(index, STCO_PATH, track)?;
    let stts = nth_box(index, STTS_PATH, track)?;

    let (timescale, _) = read_header_timing(r, mdhd)?;
    if timescale == 0 {
        return Err(ParseError::InvalidChapter("text track timescale is 0".into()));
    }

    let runs = read_stsc(r, stsc)?;
    let chunk_offsets = read_stco(r, stco)?;
    let titles = read_titles(r, &runs, &chunk_offsets)?;

    r.seek(SeekFrom::Start(stts.start_offset + 12))?;
    let entries = r.read_u32::<BigEndian>()?;
    if entries as usize != titles.len() {
        return Err(ParseError::InvalidChapter(format!(
            "{} titles but {entries} durations",
            titles.len()
        )));
    }

    let mut chapters = Vec::with_capacity(titles.len());
    let mut start = Duration::ZERO;
    for title in titles {
        // each entry is one chapter, whatever its sample count says
        let _sample_count = r.read_u32::<BigEndian>()?;
        let units = r.read_u32::<BigEndian>()?;
        let duration = Duration::from_secs_f64(units as f64 / timescale as f64);
        chapters.push(Chapter { title, start_time: start, duration });
        start = start.saturating_add(duration);
    }
    debug!("{} quicktime chapters", chapters.len());
    Ok(chapters)
}
