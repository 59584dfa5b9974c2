/// Implementation of `mkv inspect`.
///
/// Streams a file through the reader and prints every element as an
/// indented tree, or as JSON Lines with `--json`.
///
/// # Output format
///
/// ```text
/// EBML (0x1A45DFA3) size=31
///   EBMLVersion (0x4286) = 1
///   DocType (0x4282) = "webm"
/// Segment (0x18538067) size=unknown
///   Cluster (0x1F43B675) size=unknown
///     Timecode (0xE7) = 0
///     SimpleBlock (0xA3) = track=1 tc=0 key=true lacing=None <1024 bytes>
/// ```
///
/// Values that fail to decode are shown as `!error` rather than aborting:
/// a bad value is not a structural error.
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use mkv_parser::{MkvElement, MkvValue, ReaderConfig};
use serde::Serialize;

use crate::{InspectArgs, open_reader};

/// Run the `mkv inspect` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is structurally invalid.
pub fn run(args: &InspectArgs) -> Result<()> {
    let mut reader = open_reader(&args.input, ReaderConfig::default())?;
    let mut out = BufWriter::new(io::stdout().lock());
    let file = args.input.file.display();

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

        let depth = element.path().map_or(0, <[_]>::len);
        if args.max_depth.is_some_and(|max| depth > max) {
            continue;
        }

        if args.json {
            let line = JsonElement::from_element(&element, depth, !args.no_values);
            serde_json::to_writer(&mut out, &line)?;
            writeln!(out)?;
        } else {
            write_tree_line(&mut out, &element, depth, !args.no_values)?;
        }
    }

    out.flush()?;
    Ok(())
}

// ── Tree output ───────────────────────────────────────────────────────────────

fn write_tree_line(
    out: &mut impl Write,
    element: &MkvElement<'_>,
    depth: usize,
    with_values: bool,
) -> io::Result<()> {
    let indent = "  ".repeat(depth);
    let info = &element.metadata().type_info;
    match element {
        MkvElement::Start(start) => {
            writeln!(out, "{indent}{} ({:#X}) size={}", info.name, info.id, start.declared_size)
        }
        // Ends are implied by indentation.
        MkvElement::End(_) => Ok(()),
        MkvElement::Data(data) if with_values => match data.value() {
            Ok(value) => writeln!(out, "{indent}{} ({:#X}) = {value}", info.name, info.id),
            Err(e) => writeln!(out, "{indent}{} ({:#X}) = !error: {e}", info.name, info.id),
        },
        MkvElement::Data(data) => writeln!(
            out,
            "{indent}{} ({:#X}) size={}",
            info.name,
            info.id,
            data.declared_size
        ),
    }
}

// ── JSON output ───────────────────────────────────────────────────────────────

/// One JSON Lines record.
#[derive(Serialize)]
struct JsonElement {
    event: &'static str,
    name: &'static str,
    id: String,
    kind: &'static str,
    element_count: u64,
    depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl JsonElement {
    fn from_element(element: &MkvElement<'_>, depth: usize, with_values: bool) -> Self {
        let metadata = element.metadata();
        let mut line = Self {
            event: "start",
            name: metadata.name(),
            id: format!("{:#X}", metadata.id()),
            kind: metadata.type_info.kind.label(),
            element_count: metadata.element_count,
            depth,
            size: None,
            value: None,
            error: None,
        };

        match element {
            MkvElement::Start(start) => line.size = start.declared_size.known(),
            MkvElement::End(_) => line.event = "end",
            MkvElement::Data(data) => {
                line.event = "data";
                line.size = Some(data.declared_size);
                if with_values {
                    match data.value() {
                        Ok(value) => line.value = Some(json_value(&value)),
                        Err(e) => line.error = Some(e.to_string()),
                    }
                }
            }
        }
        line
    }
}

/// Binary payloads longer than this are summarised by length only.
const MAX_HEX_BYTES: usize = 32;

fn json_value(value: &MkvValue) -> serde_json::Value {
    use serde_json::{Value, json};

    match value {
        MkvValue::Integer(v) => json!(v),
        MkvValue::UnsignedInteger(v) => json!(v),
        MkvValue::Float(v) => serde_json::Number::from_f64(*v).map_or(Value::Null, Value::Number),
        MkvValue::String(s) | MkvValue::Utf8(s) => json!(s),
        MkvValue::Date(d) => json!(d.to_rfc3339()),
        MkvValue::Binary(b) => binary_json(b),
        MkvValue::Frame(frame) => json!({
            "track": frame.track_number,
            "timecode": frame.time_code,
            "key_frame": frame.key_frame,
            "invisible": frame.invisible,
            "discardable": frame.discardable,
            "lacing": format!("{:?}", frame.lacing).to_lowercase(),
            "bytes": frame.frame_data.len(),
        }),
    }
}

fn binary_json(bytes: &[u8]) -> serde_json::Value {
    if bytes.len() > MAX_HEX_BYTES {
        return serde_json::json!({ "bytes": bytes.len() });
    }
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    serde_json::json!({ "bytes": bytes.len(), "hex": hex })
}
