use crate::boxes::BoxIndex;
use crate::chapters::{Chapter, read_chapters};
use crate::fields::{self, CustomTags, OtherCustomTags, read_text_tag as text};
use crate::parser::{ParseError, Result};
use crate::tables::{Genre, ImageType, ItunesAdvisory, ItunesStik};
use crate::util::contains_only_digits;
use serde::Serialize;
use std::io::{Read, Seek};
use std::time::Duration;

/// One cover art image from `covr`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Picture {
    pub format: ImageType,
    #[serde(serialize_with = "serialize_len")]
    pub data: Vec<u8>,
}

fn serialize_len<S: serde::Serializer>(data: &[u8], s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_u64(data.len() as u64)
}

/// Every tag read from a file.
///
/// Text fields are empty when the atom is absent; numeric fields are `None`,
/// which is distinct from a stored zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Mp4Tags {
    pub album: String,              // (c)alb
    pub album_sort: String,         // soal
    pub album_artist: String,       // aART
    pub album_artist_sort: String,  // soaa
    pub artist: String,             // (c)art
    pub artist_sort: String,        // soar
    pub bpm: Option<i16>,           // tmpo
    pub chapters: Vec<Chapter>,
    pub comment: String,            // (c)cmt
    pub composer: String,           // (c)wrt
    pub composer_sort: String,      // soco
    pub conductor: String,          // (c)con
    pub copyright: String,          // cprt
    pub custom: CustomTags,
    pub custom_genre: String,       // (c)gen
    pub date: String,
    pub description: String,        // desc
    pub disc_number: Option<i16>,
    pub disc_total: Option<i16>,
    #[serde(serialize_with = "crate::util::duration_secs")]
    pub duration: Duration,
    pub encoding_tool: String,      // (c)too
    pub genre: Genre,
    pub itunes_advisory: ItunesAdvisory,
    pub itunes_album_id: Option<i32>,
    pub itunes_artist_id: Option<i32>,
    pub itunes_stik: Option<ItunesStik>,
    pub long_description: String,   // ldes
    pub lyrics: String,             // (c)lyr
    pub narrator: String,           // (c)nrt
    pub other_custom: OtherCustomTags,
    pub pictures: Vec<Picture>,
    pub publisher: String,          // (c)pub
    pub title: String,              // (c)nam
    pub title_sort: String,         // sonm
    pub track_number: Option<i16>,
    pub track_total: Option<i16>,
    pub tv_episode: Option<i32>,    // tves
    pub tv_episode_id: String,      // tven
    pub tv_network: String,         // tvnn
    pub tv_season: Option<i32>,     // tvsn
    pub tv_show: String,            // tvsh
    pub year: Option<i32>,
}

/// Split a raw `(c)day` value into `(year, date)`.
///
/// All-digit text is a year; anything else is kept verbatim as a date.
pub fn classify_date(raw: &str) -> Result<(Option<i32>, String)> {
    if raw.is_empty() {
        return Ok((None, String::new()));
    }
    if contains_only_digits(raw) {
        let year = raw
            .parse::<i32>()
            .map_err(|_| ParseError::InvalidYear(raw.to_string()))?;
        return Ok((Some(year), String::new()));
    }
    Ok((None, raw.to_string()))
}

/// Decode every field. `index` must already have passed validation.
pub fn read_tags<R: Read + Seek>(r: &mut R, index: &BoxIndex, upper_custom: bool) -> Result<Mp4Tags> {
    let (track_number, track_total) = fields::read_number_pair(r, index, "trkn")?;
    let (disc_number, disc_total) = fields::read_number_pair(r, index, "disk")?;
    let (custom, other_custom) = fields::read_custom(r, index, upper_custom)?;
    let (year, date) = classify_date(&text(r, index, "(c)day")?)?;

    Ok(Mp4Tags {
        album: text(r, index, "(c)alb")?,
        album_sort: text(r, index, "soal")?,
        album_artist: text(r, index, "aART")?,
        album_artist_sort: text(r, index, "soaa")?,
        artist: text(r, index, "(c)art")?,
        artist_sort: text(r, index, "soar")?,
        bpm: fields::read_bpm(r, index)?,
        chapters: read_chapters(r, index)?,
        comment: text(r, index, "(c)cmt")?,
        composer: text(r, index, "(c)wrt")?,
        composer_sort: text(r, index, "soco")?,
        conductor: text(r, index, "(c)con")?,
        copyright: text(r, index, "cprt")?,
        custom,
        custom_genre: text(r, index, "(c)gen")?,
        date,
        description: text(r, index, "desc")?,
        disc_number,
        disc_total,
        duration: fields::read_duration(r, index)?,
        encoding_tool: text(r, index, "(c)too")?,
        genre: fields::read_genre(r, index)?,
        itunes_advisory: fields::read_advisory(r, index)?,
        itunes_album_id: fields::read_itunes_album_id(r, index)?,
        itunes_artist_id: fields::read_itunes_artist_id(r, index)?,
        itunes_stik: fields::read_stik(r, index)?,
        long_description: text(r, index, "ldes")?,
        lyrics: text(r, index, "(c)lyr")?,
        narrator: text(r, index, "(c)nrt")?,
        other_custom,
        pictures: fields::read_pictures(r, index)?,
        publisher: text(r, index, "(c)pub")?,
        title: text(r, index, "(c)nam")?,
        title_sort: text(r, index, "sonm")?,
        track_number,
        track_total,
        tv_episode: fields::read_tv_episode(r, index)?,
        tv_episode_id: text(r, index, "tven")?,
        tv_network: text(r, index, "tvnn")?,
        tv_season: fields::read_tv_season(r, index)?,
        tv_show: text(r, index, "tvsh")?,
        year,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_are_a_year() {
        let (year, date) = classify_date("2020").unwrap();
        assert_eq!(year, Some(2020));
        assert_eq!(date, "");
    }

    #[test]
    fn anything_else_is_a_date() {
        let (year, date) = classify_date("circa 2020").unwrap();
        assert_eq!(year, None);
        assert_eq!(date, "circa 2020");

        let (year, date) = classify_date("2020-05-01T00:00:00Z").unwrap();
        assert_eq!(year, None);
        assert_eq!(date, "2020-05-01T00:00:00Z");
    }

    #[test]
    fn empty_is_neither() {
        assert_eq!(classify_date("").unwrap(), (None, String::new()));
    }

    #[test]
    fn oversized_year_is_an_error() {
        assert!(matches!(classify_date("99999999999"), Err(ParseError::InvalidYear(_))));
    }
}
