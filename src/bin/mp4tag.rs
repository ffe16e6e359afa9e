use anyhow::Context;
use clap::{ArgAction, Parser};
use mp4tag::{
    BoxIndex, Mp4, Mp4Tags, ReadOptions,
    known_boxes::full_name,
    util::hex_dump,
};
use serde::Serialize;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(version, about = "Print iTunes tags, cover art and chapters of an MP4/M4A/M4B file")]
struct Args {
    /// MP4/M4A/M4B file path
    path: String,

    /// Emit JSON instead of human-readable text
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Also list every indexed box with its dotted path
    #[arg(long, action = ArgAction::SetTrue)]
    boxes: bool,

    /// Hex-dump every box at this dotted path (e.g. moov.udta.chpl)
    #[arg(long = "raw")]
    raw: Option<String>,

    /// Show format, size and leading bytes of each cover picture
    #[arg(long, action = ArgAction::SetTrue)]
    pictures: bool,

    /// Upper-case freeform tag names
    #[arg(long, action = ArgAction::SetTrue)]
    upper_custom: bool,

    /// Skip the ftyp brand check
    #[arg(long, action = ArgAction::SetTrue)]
    no_ftyp_check: bool,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[derive(Serialize)]
struct Output<'a> {
    file: &'a str,
    tags: &'a Mp4Tags,
    #[serde(skip_serializing_if = "Option::is_none")]
    boxes: Option<&'a BoxIndex>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let options = ReadOptions::default()
        .upper_custom(args.upper_custom)
        .check_ftyp(!args.no_ftyp_check);
    let mut mp4 = Mp4::open_with(&args.path, options)
        .with_context(|| format!("opening {}", args.path))?;
    let (tags, index) = mp4
        .read()
        .with_context(|| format!("reading {}", args.path))?;

    if args.json {
        let out = Output {
            file: &args.path,
            tags: &tags,
            boxes: args.boxes.then_some(&index),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    print_tags(&tags);

    if args.pictures {
        print_pictures(&tags);
    }

    if args.boxes {
        println!();
        print_boxes(&index);
    }

    if let Some(path) = args.raw.as_deref() {
        dump_raw(&mut mp4, &index, path)?;
    }

    Ok(())
}

// ---------- Human-readable output ----------

fn print_tags(tags: &Mp4Tags) {
    let text = [
        ("Title", &tags.title),
        ("Title sort", &tags.title_sort),
        ("Artist", &tags.artist),
        ("Artist sort", &tags.artist_sort),
        ("Album", &tags.album),
        ("Album sort", &tags.album_sort),
        ("Album artist", &tags.album_artist),
        ("Album artist sort", &tags.album_artist_sort),
        ("Composer", &tags.composer),
        ("Composer sort", &tags.composer_sort),
        ("Conductor", &tags.conductor),
        ("Narrator", &tags.narrator),
        ("Publisher", &tags.publisher),
        ("Copyright", &tags.copyright),
        ("Comment", &tags.comment),
        ("Description", &tags.description),
        ("Long description", &tags.long_description),
        ("Genre (custom)", &tags.custom_genre),
        ("Date", &tags.date),
        ("Encoded with", &tags.encoding_tool),
        ("TV show", &tags.tv_show),
        ("TV network", &tags.tv_network),
        ("TV episode ID", &tags.tv_episode_id),
        ("Lyrics", &tags.lyrics),
    ];
    for (label, value) in text {
        if !value.is_empty() {
            println!("{label:<18} {value}");
        }
    }

    if let Some(year) = tags.year {
        println!("{:<18} {year}", "Year");
    }
    if tags.genre != mp4tag::Genre::None {
        println!("{:<18} {}", "Genre", tags.genre);
    }
    if let Some(n) = tags.track_number {
        println!("{:<18} {}", "Track", pair(n, tags.track_total));
    }
    if let Some(n) = tags.disc_number {
        println!("{:<18} {}", "Disc", pair(n, tags.disc_total));
    }
    if let Some(bpm) = tags.bpm {
        println!("{:<18} {bpm}", "BPM");
    }
    if tags.itunes_advisory != mp4tag::ItunesAdvisory::None {
        println!("{:<18} {}", "Advisory", tags.itunes_advisory);
    }
    if let Some(stik) = tags.itunes_stik {
        println!("{:<18} {stik}", "Media kind");
    }
    if let Some(id) = tags.itunes_album_id {
        println!("{:<18} {id}", "iTunes album ID");
    }
    if let Some(id) = tags.itunes_artist_id {
        println!("{:<18} {id}", "iTunes artist ID");
    }
    if let Some(season) = tags.tv_season {
        println!("{:<18} {season}", "TV season");
    }
    if let Some(episode) = tags.tv_episode {
        println!("{:<18} {episode}", "TV episode");
    }
    println!("{:<18} {}", "Duration", clock(tags.duration));

    for (name, value) in &tags.custom {
        println!("{:<18} {value}", format!("[{name}]"));
        if let Some(more) = tags.other_custom.get(name) {
            for v in more {
                println!("{:<18} {v}", "");
            }
        }
    }

    if !tags.pictures.is_empty() {
        println!("{:<18} {}", "Pictures", tags.pictures.len());
    }

    if !tags.chapters.is_empty() {
        println!("\nChapters:");
        for (i, ch) in tags.chapters.iter().enumerate() {
            println!(
                "  {:>3}  {}  (+{})  {}",
                i + 1,
                clock(ch.start_time),
                clock(ch.duration),
                ch.title
            );
        }
    }
}

fn print_pictures(tags: &Mp4Tags) {
    for (i, pic) in tags.pictures.iter().enumerate() {
        let head = &pic.data[..pic.data.len().min(8)];
        println!(
            "picture {}: {} ({}) {} bytes, starts {}",
            i + 1,
            pic.format,
            pic.format.extension(),
            pic.data.len(),
            hex::encode(head)
        );
    }
}

fn print_boxes(index: &BoxIndex) {
    for b in index {
        let indent = "  ".repeat(b.depth());
        let name = full_name(b.name());
        println!(
            "{indent}{} @ {:#x} size={}{}",
            b.name(),
            b.start_offset,
            b.size,
            if name.is_empty() { String::new() } else { format!(" ({name})") }
        );
    }
}

fn dump_raw<R: std::io::Read + std::io::Seek>(
    mp4: &mut Mp4<R>,
    index: &BoxIndex,
    path: &str,
) -> anyhow::Result<()> {
    let matches = index.get_boxes_by_path(path);
    if matches.is_empty() {
        anyhow::bail!("no box at path {path}");
    }
    for b in matches {
        let bytes = mp4.read_range(b.start_offset, b.size)?;
        println!("\n{path} @ {:#x} ({} bytes):", b.start_offset, b.size);
        print!("{}", hex_dump(&bytes, b.start_offset));
    }
    Ok(())
}

fn pair(n: i16, total: Option<i16>) -> String {
    match total {
        Some(t) if t > 0 => format!("{n}/{t}"),
        _ => n.to_string(),
    }
}

fn clock(d: Duration) -> String {
    let ms = d.as_millis();
    let (h, rem) = (ms / 3_600_000, ms % 3_600_000);
    let (m, rem) = (rem / 60_000, rem % 60_000);
    format!("{h:02}:{m:02}:{:02}.{:03}", rem / 1000, rem % 1000)
}
