use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::{debug, info, LevelFilter};

use glyphpack_codecs::{create_by_name, unpack_bitmap};
use glyphpack_core::stats::format_memory_unit;
use glyphpack_core::{
    pack, BitmapInfo, CodecOptions, CounterWidth, Encoding, OutputBound, PackedBitmap,
};

// ── CLI definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "glyphpack",
    about = "Pack font glyph bitmaps into compact embeddable payloads",
    version
)]
struct Cli {
    /// Log codec activity (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a raw pixel buffer into a packed bitmap
    Encode {
        /// Raw pixel file ("-" reads stdin)
        input: PathBuf,
        /// Destination packed bitmap
        output: PathBuf,
        /// Encoding to use: none | rle | lzw | huff
        #[arg(short, long, default_value = "rle")]
        encoding: String,
        /// RLE run counter width: u8 | u16
        #[arg(long, default_value = "u8")]
        counter_width: String,
        /// Cap the encoder output at input size times N (default: worst case)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        margin: Option<u64>,
        /// Bitmap width in pixels (default: whole buffer as one row)
        #[arg(long, requires = "height")]
        width: Option<u32>,
        /// Bitmap height in pixels
        #[arg(long, requires = "width")]
        height: Option<u32>,
        /// Bytes per pixel: 1 for grayscale, 4 for RGBA
        #[arg(short, long, default_value_t = 1)]
        channels: u32,
        /// Decode the result again and compare with the input
        #[arg(long)]
        verify: bool,
    },
    /// Restore the raw pixels of a packed bitmap
    Decode {
        /// Source packed bitmap
        input: PathBuf,
        /// Destination raw pixel file ("-" writes to stdout)
        output: PathBuf,
    },
    /// Print header metadata and compression statistics
    Inspect {
        /// Packed bitmap to inspect
        file: PathBuf,
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
        /// List the leading RLE packets (or raw bytes) of the payload
        #[arg(long)]
        dump: bool,
    },
}

// ── Helpers ────────────────────────────────────────────────────────────────

fn init_logging(verbose: bool) {
    let default = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(default)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    if path.to_str() == Some("-") {
        let mut buf = Vec::new();
        io::stdin().lock().read_to_end(&mut buf)?;
        return Ok(buf);
    }
    fs::read(path).with_context(|| format!("reading input file {:?}", path))
}

fn read_packed(path: &Path) -> anyhow::Result<PackedBitmap> {
    let bytes = fs::read(path).with_context(|| format!("reading packed bitmap {:?}", path))?;
    PackedBitmap::from_bytes(&bytes).with_context(|| format!("parsing packed bitmap {:?}", path))
}

fn human_bytes(n: usize) -> String {
    format_memory_unit(n as u64, true)
}

const DUMP_LIMIT: usize = 256;

/// One line per RLE packet: stream offset, run length and pixel value.
fn packet_lines(payload: &[u8], width: CounterWidth) -> Vec<String> {
    let packet_size = width.packet_size();
    let packets = payload.chunks_exact(packet_size);
    let trailing = packets.remainder().len();

    let mut lines: Vec<String> = packets
        .enumerate()
        .take(DUMP_LIMIT / packet_size)
        .map(|(i, packet)| {
            let count = width.read_count(packet);
            let value = packet[packet_size - 1];
            format!("  {:06x}  run {:>5} x {:02x}", i * packet_size, count, value)
        })
        .collect();

    let shown = lines.len() * packet_size;
    if payload.len() - trailing > shown {
        lines.push(format!(
            "  ... ({} more packets not shown)",
            (payload.len() - trailing - shown) / packet_size
        ));
    }
    if trailing > 0 {
        lines.push(format!("  !! {} trailing bytes do not form a packet", trailing));
    }
    lines
}

/// Raw pixel bytes, 16 per line, prefixed with their offset.
fn pixel_lines(payload: &[u8]) -> Vec<String> {
    let preview = &payload[..payload.len().min(DUMP_LIMIT)];
    let mut lines: Vec<String> = preview
        .chunks(16)
        .enumerate()
        .map(|(i, row)| {
            let hex: Vec<String> = row.iter().map(|b| format!("{:02x}", b)).collect();
            format!("  {:06x}  {}", i * 16, hex.join(" "))
        })
        .collect();
    if payload.len() > preview.len() {
        lines.push(format!("  ... ({} bytes not shown)", payload.len() - preview.len()));
    }
    lines
}

fn dump_payload(packed: &PackedBitmap) {
    let lines = match packed.encoding {
        Encoding::RunLength => {
            println!(
                "--- rle({}) packets, {} payload bytes ---",
                packed.counter_width,
                packed.payload.len()
            );
            packet_lines(&packed.payload, packed.counter_width)
        }
        other => {
            println!("--- {} payload, {} bytes ---", other, packed.payload.len());
            pixel_lines(&packed.payload)
        }
    };
    for line in lines {
        println!("{}", line);
    }
}

// ── Subcommand implementations ─────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
fn run_encode(
    input: PathBuf,
    output: PathBuf,
    encoding: &str,
    counter_width: &str,
    margin: Option<u64>,
    dims: Option<(u32, u32)>,
    channels: u32,
    verify: bool,
) -> anyhow::Result<()> {
    let mut options =
        CodecOptions::default().with_counter_width(counter_width.parse::<CounterWidth>()?);
    if let Some(n) = margin {
        options = options.with_output_bound(OutputBound::Factor(usize::try_from(n)?));
    }
    let codec = create_by_name(encoding, &options)?;

    let pixels = read_input(&input)?;
    if pixels.is_empty() {
        anyhow::bail!("input {:?} is empty, nothing to encode", input);
    }
    let info = match dims {
        Some((width, height)) => BitmapInfo::new(width, height, channels),
        None if channels == 1 => BitmapInfo::flat(pixels.len())?,
        None => anyhow::bail!("--channels requires --width and --height"),
    };
    debug!("encoding {:?} as {:?} with {:?}", input, info, options);

    let t0 = Instant::now();
    let original = verify.then(|| pixels.clone());
    let packed = pack(codec.as_ref(), info, pixels)?;
    let elapsed = t0.elapsed();

    if let Some(original) = original {
        let restored = unpack_bitmap(&packed)?;
        if restored != original {
            anyhow::bail!("verification failed: decoded bitmap differs from input");
        }
        info!("round-trip verified for {} bytes", original.len());
    }

    fs::write(&output, packed.to_bytes())
        .with_context(|| format!("writing output file {:?}", output))?;

    let stats = packed.stats();
    eprintln!("  requested   : {}", codec.name());
    eprintln!("  stored as   : {}", packed.encoding);
    eprintln!("  bitmap      : {}x{}x{}", info.width, info.height, info.channels);
    eprintln!("  raw size    : {}", human_bytes(stats.raw_len));
    eprintln!("  payload     : {}", human_bytes(stats.compressed_len));
    eprintln!("  saved       : {}", stats.space_saved());
    if let Some(ratio) = stats.ratio() {
        eprintln!("  ratio       : {:.2}x", ratio);
    }
    eprintln!("  elapsed     : {:.3}ms", elapsed.as_secs_f64() * 1000.0);
    Ok(())
}

fn run_decode(input: PathBuf, output: PathBuf) -> anyhow::Result<()> {
    let packed = read_packed(&input)?;

    let t0 = Instant::now();
    let raw = unpack_bitmap(&packed)
        .with_context(|| format!("decoding {:?} as {}", input, packed.encoding))?;
    let elapsed = t0.elapsed();

    if output.to_str() == Some("-") {
        io::stdout().lock().write_all(&raw)?;
    } else {
        fs::write(&output, &raw).with_context(|| format!("writing output file {:?}", output))?;
    }

    eprintln!("  encoding    : {}", packed.encoding);
    eprintln!("  raw size    : {}", human_bytes(raw.len()));
    eprintln!("  elapsed     : {:.3}ms", elapsed.as_secs_f64() * 1000.0);
    Ok(())
}

fn run_inspect(file: PathBuf, json: bool, dump: bool) -> anyhow::Result<()> {
    let packed = read_packed(&file)?;
    let header = packed.header();
    let stats = packed.stats();

    if json {
        let report = serde_json::json!({
            "file": file.display().to_string(),
            "version": header.version,
            "encoding": packed.encoding,
            "counter_width": packed.counter_width,
            "bitmap": packed.info,
            "stats": stats,
            "space_saved": stats.space_saved(),
            "ratio": stats.ratio(),
            "checksum": format!("{:016x}", header.checksum),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("=== Packed bitmap: {:?} ===", file);
        println!();
        println!("  format version : {}", header.version);
        println!("  encoding       : {} (id={})", packed.encoding, packed.encoding.id());
        println!("  counter width  : {}", packed.counter_width);
        println!(
            "  bitmap         : {}x{}x{}",
            packed.info.width, packed.info.height, packed.info.channels
        );
        println!("  raw size       : {}", human_bytes(stats.raw_len));
        println!("  payload        : {}", human_bytes(stats.compressed_len));
        println!("  saved          : {}", stats.space_saved());
        match stats.ratio() {
            Some(ratio) => println!("  ratio          : {:.2}x", ratio),
            None => println!("  ratio          : n/a"),
        }
        println!("  checksum       : {:016x}", header.checksum);
    }

    if dump {
        println!();
        dump_payload(&packed);
    }
    Ok(())
}

// ── Entry point ────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        Commands::Encode {
            input,
            output,
            encoding,
            counter_width,
            margin,
            width,
            height,
            channels,
            verify,
        } => run_encode(
            input,
            output,
            &encoding,
            &counter_width,
            margin,
            width.zip(height),
            channels,
            verify,
        ),
        Commands::Decode { input, output } => run_decode(input, output),
        Commands::Inspect { file, json, dump } => run_inspect(file, json, dump),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_margin_must_be_positive() {
        let zero = Cli::try_parse_from(["glyphpack", "encode", "in.raw", "out.gpk", "--margin", "0"]);
        assert!(zero.is_err());

        let cli =
            Cli::try_parse_from(["glyphpack", "encode", "in.raw", "out.gpk", "--margin", "2"]).unwrap();
        match cli.command {
            Commands::Encode { margin, .. } => assert_eq!(margin, Some(2)),
            _ => panic!("expected the encode subcommand"),
        }
    }

    #[test]
    fn test_packet_lines_mark_each_packet() {
        let lines = packet_lines(&[0x03, 0x41, 0x01, 0x42, 0x07], CounterWidth::U8);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("run     3 x 41"), "got: {}", lines[0]);
        assert!(lines[1].starts_with("  000002"), "got: {}", lines[1]);
        assert!(lines[2].contains("1 trailing bytes"), "got: {}", lines[2]);
    }

    #[test]
    fn test_pixel_lines_truncate_long_payloads() {
        let lines = pixel_lines(&[0xAB; 300]);
        assert_eq!(lines.len(), 17);
        assert!(lines[0].ends_with("ab ab"));
        assert_eq!(lines[16], "  ... (44 bytes not shown)");
    }
}
