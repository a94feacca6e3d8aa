use clap::{ArgAction, Parser};
use pngsheet::{
    ChunkReader, SheetInfo,
    known_chunks::KnownChunk,
    load, load_info,
    timeline::Frame,
    util::{hex_dump, read_prefix},
};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Dump sprite-sheet palettes and animations embedded in a PNG")]
struct Args {
    /// PNG file path
    path: String,

    /// Emit JSON instead of human-readable text
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// List the raw chunk sequence instead of decoding sheet metadata
    #[arg(long, action = ArgAction::SetTrue)]
    chunks: bool,

    /// With --chunks, hex-dump up to this many payload bytes per chunk (0 = none)
    #[arg(long, default_value_t = 0)]
    bytes: u64,

    /// Skip CRC verification when listing chunks
    #[arg(long, action = ArgAction::SetTrue)]
    no_crc: bool,

    /// Also decode the pixels and report the image palette
    #[arg(long, action = ArgAction::SetTrue)]
    image: bool,
}

#[derive(Debug, Serialize)]
struct ChunkEntry {
    offset: u64,
    typ: String,
    length: u32,
    name: &'static str,
    critical: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    hex: Option<String>,
}

#[derive(Debug, Serialize)]
struct ImageSummary {
    width: u32,
    height: u32,
    bit_depth: u8,
    palette_size: usize,
    /// Image palette extended by the "extra" suggested palette.
    combined_palette_size: usize,
}

#[derive(Debug, Serialize)]
struct PaletteReport {
    name: String,
    colors: Vec<String>,
}

#[derive(Debug, Serialize)]
struct AnimationReport {
    index: usize,
    looping: bool,
    duration: usize,
    frame_range: Range<usize>,
    /// Local frame index shown at each tick.
    ticks: Vec<usize>,
}

#[derive(Debug, Serialize)]
struct SheetReport<'a> {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<ImageSummary>,
    palettes: Vec<PaletteReport>,
    frames: &'a [Arc<Frame>],
    animations: Vec<AnimationReport>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let path = PathBuf::from(&args.path);

    if args.chunks {
        return list_chunks(&path, &args);
    }

    let reader = BufReader::new(File::open(&path)?);
    let (image, sheet) = if args.image {
        let (img, sheet) = load(reader)?;
        let extra = sheet.palette(b"extra").unwrap_or_default();
        let summary = ImageSummary {
            width: img.width,
            height: img.height,
            bit_depth: img.bit_depth,
            palette_size: img.palette.len(),
            combined_palette_size: img.palette_with(extra).len(),
        };
        info!(
            palette = summary.combined_palette_size,
            alt_palette = sheet.palette(b"alt").map_or(0, <[_]>::len),
            "decoded image"
        );
        (Some(summary), sheet)
    } else {
        (None, load_info(reader)?)
    };

    let report = build_report(&path, image, &sheet);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_human(&report);
    }
    Ok(())
}

fn build_report<'a>(path: &Path, image: Option<ImageSummary>, sheet: &'a SheetInfo) -> SheetReport<'a> {
    let palettes = sheet
        .suggested_palettes
        .iter()
        .map(|(name, colors)| PaletteReport {
            name: String::from_utf8_lossy(name).into_owned(),
            colors: colors.iter().map(|c| c.to_hex()).collect(),
        })
        .collect();

    let animations = sheet
        .animations
        .iter()
        .enumerate()
        .map(|(index, a)| AnimationReport {
            index,
            looping: a.is_looping,
            duration: a.duration(),
            frame_range: a.frame_range.clone(),
            ticks: a.frames.iter().map(|f| f.index).collect(),
        })
        .collect();

    SheetReport {
        file: path.display().to_string(),
        image,
        palettes,
        frames: &sheet.frames,
        animations,
    }
}

fn print_human(r: &SheetReport<'_>) {
    println!("File: {}", r.file);
    if let Some(img) = &r.image {
        println!(
            "Image: {}x{} @ {} bpp, palette {} ({} with extra)",
            img.width, img.height, img.bit_depth, img.palette_size, img.combined_palette_size
        );
    }

    println!("\nPalettes ({}):", r.palettes.len());
    for p in &r.palettes {
        println!("  {:<16} {} colors", format!("{:?}", p.name), p.colors.len());
        for row in p.colors.chunks(8) {
            println!("    {}", row.join(" "));
        }
    }

    println!("\nFrames ({}):", r.frames.len());
    for (g, f) in r.frames.iter().enumerate() {
        println!(
            "  #{:<4} local={:<3} rect=({}, {})-({}, {}) {}x{} origin=({}, {})",
            g,
            f.index,
            f.rect.left,
            f.rect.top,
            f.rect.right,
            f.rect.bottom,
            f.rect.width(),
            f.rect.height(),
            f.origin.x,
            f.origin.y
        );
    }

    println!("\nAnimations ({}):", r.animations.len());
    for a in &r.animations {
        println!(
            "  [{}] {} ticks, frames {}..{}, {}",
            a.index,
            a.duration,
            a.frame_range.start,
            a.frame_range.end,
            if a.looping { "loop" } else { "stop" }
        );
        println!("      {:?}", a.ticks);
    }
}

fn list_chunks(path: &Path, args: &Args) -> anyhow::Result<()> {
    let file = BufReader::new(File::open(path)?);
    let mut reader = ChunkReader::new(file)?.with_crc_check(!args.no_crc);

    let mut entries = Vec::new();
    while let Some(mut chunk) = reader.next_chunk()? {
        let hdr = chunk.header().clone();
        let kc = KnownChunk::from(hdr.typ);
        let hex = if args.bytes > 0 {
            let bytes = read_prefix(&mut chunk, args.bytes)?;
            Some(hex_dump(&bytes, hdr.data_offset()))
        } else {
            None
        };
        chunk.close()?;

        entries.push(ChunkEntry {
            offset: hdr.start,
            typ: hdr.typ.to_string(),
            length: hdr.length,
            name: kc.full_name(),
            critical: hdr.typ.is_critical(),
            hex,
        });
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for e in &entries {
        println!(
            "{:08x}  {}  {:>8} bytes  {}{}",
            e.offset,
            e.typ,
            e.length,
            e.name,
            if e.critical { " (critical)" } else { "" }
        );
        if let Some(h) = &e.hex {
            print!("{}", h);
        }
    }
    Ok(())
}
