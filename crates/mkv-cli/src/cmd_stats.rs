/// Implementation of `mkv stats`.
///
/// Streams a file and tabulates how many elements of each type it holds
/// and how many bytes their headers and leaf contents take.
///
/// # Example output
///
/// ```text
/// File:      /tmp/live.mkv  (1048576 bytes read)
/// Elements:  1742 total (204 containers, 1538 leaves), max depth 4
/// Unknown-length containers: 101
///
/// Element                Count       Bytes
/// ──────────────────────────────────────────
/// SimpleBlock             1400     1003520
/// Cluster                  100        1000
/// Timecode                 100         300
/// ──────────────────────────────────────────
/// Total                   1742     1048576
///
/// Frames per track:
///   track 1      900 frames     60 key
///   track 2      500 frames    500 key
/// ```
///
/// Element bytes count headers for containers and header plus content for
/// leaves, so skipped unknown elements make the total smaller than the
/// bytes read.
use std::collections::{BTreeMap, HashMap};

use anyhow::{Context, Result};
use mkv_parser::{MkvElement, ReaderConfig};

use crate::{StatsArgs, open_reader};

#[derive(Default)]
struct TypeStats {
    count: u64,
    bytes: u64,
}

#[derive(Default)]
struct TrackStats {
    frames: u64,
    key_frames: u64,
}

/// Run the `mkv stats` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is structurally invalid.
pub fn run(args: &StatsArgs) -> Result<()> {
    let mut reader = open_reader(&args.input, ReaderConfig::default())?;
    let file = args.input.file.display();

    let mut by_type: HashMap<&'static str, TypeStats> = HashMap::new();
    let mut tracks: BTreeMap<u64, TrackStats> = BTreeMap::new();
    let (mut containers, mut leaves, mut unknown_length, mut max_depth) = (0u64, 0u64, 0u64, 0usize);
    let mut bad_frames = 0u64;

    while reader
        .might_have_next()
        .with_context(|| format!("failed to read {file}"))?
    {
        let Some(element) = reader
            .next_if_available()
            .with_context(|| format!("failed to parse {file}"))?
        else {
            continue;
        };

        let bytes = match &element {
            MkvElement::Start(start) => {
                containers += 1;
                if start.declared_size.is_unknown() {
                    unknown_length += 1;
                }
                start.header.len() as u64
            }
            MkvElement::End(_) => continue,
            MkvElement::Data(data) => {
                leaves += 1;
                match data.frame() {
                    Ok(Some(frame)) => {
                        let track = tracks.entry(frame.track_number).or_default();
                        track.frames += 1;
                        track.key_frames += u64::from(frame.key_frame);
                    }
                    Ok(None) => {}
                    Err(_) => bad_frames += 1,
                }
                data.header.len() as u64 + data.content().len() as u64
            }
        };

        max_depth = max_depth.max(element.path().map_or(0, <[_]>::len));
        let entry = by_type.entry(element.name()).or_default();
        entry.count += 1;
        entry.bytes += bytes;
    }

    // ── Summary ───────────────────────────────────────────────────────────────

    println!("File:      {file}  ({} bytes read)", reader.total_bytes_read());
    println!(
        "Elements:  {} total ({containers} containers, {leaves} leaves), max depth {max_depth}",
        containers + leaves
    );
    println!("Unknown-length containers: {unknown_length}");
    if bad_frames > 0 {
        println!("Malformed SimpleBlocks: {bad_frames}");
    }
    println!();

    // ── Per-type table ────────────────────────────────────────────────────────

    let mut rows: Vec<_> = by_type.into_iter().collect();
    rows.sort_by(|a, b| b.1.bytes.cmp(&a.1.bytes).then(a.0.cmp(b.0)));

    let rule = "─".repeat(42);
    println!("{:<20} {:>7} {:>11}", "Element", "Count", "Bytes");
    println!("{rule}");
    let (mut total_count, mut total_bytes) = (0u64, 0u64);
    for (name, stats) in &rows {
        println!("{name:<20} {:>7} {:>11}", stats.count, stats.bytes);
        total_count += stats.count;
        total_bytes += stats.bytes;
    }
    println!("{rule}");
    println!("{:<20} {total_count:>7} {total_bytes:>11}", "Total");

    if !tracks.is_empty() {
        println!();
        println!("Frames per track:");
        for (track, stats) in &tracks {
            println!(
                "  track {track:<4} {:>8} frames {:>6} key",
                stats.frames, stats.key_frames
            );
        }
    }

    Ok(())
}
