/// Implementation of `mkv frames`.
///
/// Lists every SimpleBlock frame with its track, absolute timecode and
/// flags, using [`FrameVisitor`].
///
/// # Output format
///
/// ```text
/// track  timecode  flags  lacing     bytes
///     1         0  K      none        5120
///     2         5  -      xiph         417
/// ---
/// 2 frames
/// ```
///
/// `K` marks key frames, `I` invisible frames and `D` discardable frames.
/// A timecode of `?` means the block appeared before its cluster's
/// Timecode element.
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use mkv_parser::{
    ApplyError, DataElement, EndContainer, FrameEvent, FrameVisitor, MkvElementVisitor,
    ReaderConfig, StartContainer,
};
use mkv_types::matroska::{CLUSTER, SIMPLE_BLOCK, TIMECODE};

use crate::{FramesArgs, open_reader};

/// Run the `mkv frames` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is structurally invalid,
/// or holds a SimpleBlock whose frame header is malformed.
pub fn run(args: &FramesArgs) -> Result<()> {
    // Only the elements the frame visitor looks at.
    let config = ReaderConfig {
        capture_paths: false,
        ..ReaderConfig::default()
    }
    .with_filter([CLUSTER, TIMECODE, SIMPLE_BLOCK]);
    let mut reader = open_reader(&args.input, config)?;

    let mut out = BufWriter::new(io::stdout().lock());
    writeln!(out, "track  timecode  flags  lacing     bytes")?;

    let mut visitor = FrameVisitor::new(|event: FrameEvent<'_>| -> Result<()> {
        write_frame(&mut out, &event)?;
        Ok(())
    });
    if let Some(track) = args.track {
        visitor = visitor.track(track);
    }
    let mut limited = Limit {
        inner: visitor,
        limit: args.limit,
    };

    match reader.apply(&mut limited) {
        Ok(()) => {}
        Err(ApplyError::Parse(e)) => {
            return Err(e).with_context(|| format!("failed to parse {}", args.input.file.display()));
        }
        Err(ApplyError::Visitor(e)) => return Err(e),
    }

    let frames = limited.inner.frames();
    drop(limited);
    writeln!(out, "---")?;
    writeln!(out, "{frames} frame{}", if frames == 1 { "" } else { "s" })?;
    out.flush()?;
    Ok(())
}

fn write_frame(out: &mut impl Write, event: &FrameEvent<'_>) -> io::Result<()> {
    let frame = &event.frame;
    let flags: String = [
        (frame.key_frame, 'K'),
        (frame.invisible, 'I'),
        (frame.discardable, 'D'),
    ]
    .iter()
    .filter(|(set, _)| *set)
    .map(|&(_, c)| c)
    .collect();
    let flags = if flags.is_empty() { "-".to_string() } else { flags };
    let timecode = event
        .absolute_timecode()
        .map_or_else(|| "?".to_string(), |tc| tc.to_string());
    let lacing = format!("{:?}", frame.lacing).to_lowercase();

    writeln!(
        out,
        "{:>5}  {:>8}  {flags:<5}  {lacing:<9}  {:>6}",
        frame.track_number,
        timecode,
        frame.frame_data.len()
    )
}

/// Stops the drive loop after `limit` frames.
struct Limit<V> {
    inner: V,
    limit: Option<u64>,
}

impl<F> MkvElementVisitor for Limit<FrameVisitor<F, anyhow::Error>>
where
    F: FnMut(FrameEvent<'_>) -> Result<()>,
{
    type Error = anyhow::Error;

    fn visit_start(&mut self, element: &StartContainer) -> Result<()> {
        self.inner.visit_start(element)
    }

    fn visit_end(&mut self, element: &EndContainer) -> Result<()> {
        self.inner.visit_end(element)
    }

    fn visit_data(&mut self, element: &DataElement<'_>) -> Result<()> {
        self.inner.visit_data(element)
    }

    fn is_done(&self) -> bool {
        self.limit.is_some_and(|limit| self.inner.frames() >= limit)
    }
}
