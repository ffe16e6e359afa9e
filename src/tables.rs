//! Static code tables for the numeric iTunes atoms.
//!
//! Each table maps a raw byte to a symbolic value; codes that are not listed
//! map to `None` and the caller falls back to the field's absent value.

use serde::Serialize;
use std::fmt;

/// Picture encoding, from the type indicator byte of a `covr` data atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ImageType {
    Jpeg,
    Png,
    #[default]
    Unknown,
}

impl ImageType {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            13 => Some(ImageType::Jpeg),
            14 => Some(ImageType::Png),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageType::Jpeg => "jpg",
            ImageType::Png => "png",
            ImageType::Unknown => "bin",
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ImageType::Jpeg => "JPEG",
            ImageType::Png => "PNG",
            ImageType::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// Content advisory (`rtng`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ItunesAdvisory {
    #[default]
    None,
    Explicit,
    Clean,
}

impl ItunesAdvisory {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(ItunesAdvisory::Explicit),
            2 => Some(ItunesAdvisory::Clean),
            _ => None,
        }
    }
}

impl fmt::Display for ItunesAdvisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ItunesAdvisory::None => "None",
            ItunesAdvisory::Explicit => "Explicit",
            ItunesAdvisory::Clean => "Clean",
        };
        f.write_str(s)
    }
}

/// Media kind (`stik`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ItunesStik {
    HomeVideo,
    Normal,
    Audiobook,
    WhackedBookmark,
    MusicVideo,
    Movie,
    TvShow,
    Booklet,
    RingTone,
    Podcast,
    ItunesU,
}

impl ItunesStik {
    pub fn from_code(code: u8) -> Option<Self> {
        let stik = match code {
            0 => ItunesStik::HomeVideo,
            1 => ItunesStik::Normal,
            2 => ItunesStik::Audiobook,
            5 => ItunesStik::WhackedBookmark,
            6 => ItunesStik::MusicVideo,
            9 => ItunesStik::Movie,
            10 => ItunesStik::TvShow,
            11 => ItunesStik::Booklet,
            14 => ItunesStik::RingTone,
            21 => ItunesStik::Podcast,
            23 => ItunesStik::ItunesU,
            _ => return None,
        };
        Some(stik)
    }
}

impl fmt::Display for ItunesStik {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ItunesStik::HomeVideo => "Home Video",
            ItunesStik::Normal => "Normal",
            ItunesStik::Audiobook => "Audiobook",
            ItunesStik::WhackedBookmark => "Whacked Bookmark",
            ItunesStik::MusicVideo => "Music Video",
            ItunesStik::Movie => "Movie",
            ItunesStik::TvShow => "TV Show",
            ItunesStik::Booklet => "Booklet",
            ItunesStik::RingTone => "Ring Tone",
            ItunesStik::Podcast => "Podcast",
            ItunesStik::ItunesU => "iTunesU",
        };
        f.write_str(s)
    }
}

/// Legacy numeric genre (`gnre`), ID3v1 numbering plus one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Genre {
    #[default]
    None,
    Blues,
    ClassicRock,
    Country,
    Dance,
    Disco,
    Funk,
    Grunge,
    HipHop,
    Jazz,
    Metal,
    NewAge,
    Oldies,
    Other,
    Pop,
    RhythmAndBlues,
    Rap,
    Reggae,
    Rock,
    Techno,
    Industrial,
    Alternative,
    Ska,
    DeathMetal,
    Pranks,
    Soundtrack,
    Eurotechno,
    Ambient,
    TripHop,
    Vocal,
    JassAndFunk,
    Fusion,
    Trance,
    Classical,
    Instrumental,
    Acid,
    House,
    Game,
    SoundClip,
    Gospel,
    Noise,
    AlternativeRock,
    Bass,
    Soul,
    Punk,
    Space,
    Meditative,
    InstrumentalPop,
    InstrumentalRock,
    Ethnic,
    Gothic,
    Darkwave,
    Technoindustrial,
    Electronic,
    PopFolk,
    Eurodance,
    SouthernRock,
    Comedy,
    Cull,
    Gangsta,
    Top40,
    ChristianRap,
    PopSlashFunk,
    JungleMusic,
    NativeUs,
    Cabaret,
    NewWave,
    Psychedelic,
    Rave,
    Showtunes,
    Trailer,
    Lofi,
    Tribal,
    AcidPunk,
    AcidJazz,
    Polka,
    Retro,
    Musical,
    RockNRoll,
    HardRock,
}

// Indexed by code - 1.
const GENRES: [(Genre, &str); 79] = [
    (Genre::Blues, "Blues"),
    (Genre::ClassicRock, "Classic Rock"),
    (Genre::Country, "Country"),
    (Genre::Dance, "Dance"),
    (Genre::Disco, "Disco"),
    (Genre::Funk, "Funk"),
    (Genre::Grunge, "Grunge"),
    (Genre::HipHop, "Hip Hop"),
    (Genre::Jazz, "Jazz"),
    (Genre::Metal, "Metal"),
    (Genre::NewAge, "NewAge"),
    (Genre::Oldies, "Oldies"),
    (Genre::Other, "Other"),
    (Genre::Pop, "Pop"),
    (Genre::RhythmAndBlues, "Rhythm And Blues"),
    (Genre::Rap, "Rap"),
    (Genre::Reggae, "Reggae"),
    (Genre::Rock, "Rock"),
    (Genre::Techno, "Techno"),
    (Genre::Industrial, "Industrial"),
    (Genre::Alternative, "Alternative"),
    (Genre::Ska, "Ska"),
    (Genre::DeathMetal, "Death Metal"),
    (Genre::Pranks, "Pranks"),
    (Genre::Soundtrack, "Soundtrack"),
    (Genre::Eurotechno, "Eurotechno"),
    (Genre::Ambient, "Ambient"),
    (Genre::TripHop, "TripHop"),
    (Genre::Vocal, "Vocal"),
    (Genre::JassAndFunk, "Jass And Funk"),
    (Genre::Fusion, "Fusion"),
    (Genre::Trance, "Trance"),
    (Genre::Classical, "Classical"),
    (Genre::Instrumental, "Instrumental"),
    (Genre::Acid, "Acid"),
    (Genre::House, "House"),
    (Genre::Game, "Game"),
    (Genre::SoundClip, "Sound Clip"),
    (Genre::Gospel, "Gospel"),
    (Genre::Noise, "Noise"),
    (Genre::AlternativeRock, "Alternative Rock"),
    (Genre::Bass, "Bass"),
    (Genre::Soul, "Soul"),
    (Genre::Punk, "Punk"),
    (Genre::Space, "Space"),
    (Genre::Meditative, "Meditative"),
    (Genre::InstrumentalPop, "Instrumental Pop"),
    (Genre::InstrumentalRock, "Instrumental Rock"),
    (Genre::Ethnic, "Ethnic"),
    (Genre::Gothic, "Gothic"),
    (Genre::Darkwave, "Darkwave"),
    (Genre::Technoindustrial, "Techno Industrial"),
    (Genre::Electronic, "Electronic"),
    (Genre::PopFolk, "Pop Folk"),
    (Genre::Eurodance, "Eurodance"),
    (Genre::SouthernRock, "Southern Rock"),
    (Genre::Comedy, "Comedy"),
    (Genre::Cull, "Cull"),
    (Genre::Gangsta, "Gangsta"),
    (Genre::Top40, "Top 40"),
    (Genre::ChristianRap, "Christian Rap"),
    (Genre::PopSlashFunk, "Pop Slash Funk"),
    (Genre::JungleMusic, "Jungle Music"),
    (Genre::NativeUs, "Native US"),
    (Genre::Cabaret, "Cabaret"),
    (Genre::NewWave, "NewWave"),
    (Genre::Psychedelic, "Psychedelic"),
    (Genre::Rave, "Rave"),
    (Genre::Showtunes, "Showtunes"),
    (Genre::Trailer, "Trailer"),
    (Genre::Lofi, "Lofi"),
    (Genre::Tribal, "Tribal"),
    (Genre::AcidPunk, "Acid Punk"),
    (Genre::AcidJazz, "Acid Jazz"),
    (Genre::Polka, "Polka"),
    (Genre::Retro, "Retro"),
    (Genre::Musical, "Musical"),
    (Genre::RockNRoll, "RockNRoll"),
    (Genre::HardRock, "Hard Rock"),
];

impl Genre {
    /// 1-based lookup; 0 and anything past the table are unmapped.
    pub fn from_code(code: u8) -> Option<Self> {
        let idx = (code as usize).checked_sub(1)?;
        GENRES.get(idx).map(|(g, _)| *g)
    }

    pub fn name(&self) -> &'static str {
        GENRES
            .iter()
            .find(|(g, _)| g == self)
            .map(|(_, n)| *n)
            .unwrap_or("None")
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
