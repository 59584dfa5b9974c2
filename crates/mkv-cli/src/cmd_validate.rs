/// Implementation of `mkv validate`.
///
/// Streams the whole file through the reader and decodes every leaf
/// value. Structural errors (malformed VINTs, unknown-length leaves) stop
/// the run; value errors are counted and reported together.
///
/// # Success output
///
/// ```text
/// ✓ Structure: 1742 elements (204 containers)
/// ✓ Values: all 1538 leaf values decode
/// ✓ Length: 1048576 bytes read
/// ```
///
/// # Failure output
///
/// ```text
/// ✗ Error: malformed element header at offset 4096: element id is 5 bytes wide, maximum is 4
/// ```
use anyhow::{Result, anyhow, bail};
use mkv_parser::{MkvElement, ParseError, ReaderConfig};

use crate::{FileReader, ValidateArgs, open_reader};

#[derive(Default)]
struct Report {
    elements: u64,
    leaves: u64,
    truncated: u64,
    containers: u64,
    value_errors: Vec<String>,
}

/// Run the `mkv validate` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is structurally invalid,
/// or contains leaf values that fail to decode.
pub fn run(args: &ValidateArgs) -> Result<()> {
    let mut reader = open_reader(&args.input, ReaderConfig::default())?;

    let report = match walk(&mut reader) {
        Ok(report) => report,
        Err(e) => {
            println!("✗ Error: {e}");
            return Err(anyhow!(e).context(format!("{} is invalid", args.input.file.display())));
        }
    };

    println!(
        "✓ Structure: {} elements ({} containers)",
        report.elements, report.containers
    );
    if report.truncated > 0 {
        println!("✗ Truncated: {} leaf element(s) cut off by end of input", report.truncated);
    }
    if report.value_errors.is_empty() {
        println!("✓ Values: all {} leaf values decode", report.leaves);
    } else {
        println!("✗ Values: {} of {} leaf values fail to decode", report.value_errors.len(), report.leaves);
        for e in report.value_errors.iter().take(10) {
            println!("    {e}");
        }
    }
    println!("✓ Length: {} bytes read", reader.total_bytes_read());

    if !report.value_errors.is_empty() || report.truncated > 0 {
        bail!("{} failed validation", args.input.file.display());
    }
    Ok(())
}

fn walk(reader: &mut FileReader) -> Result<Report, ParseError> {
    let mut report = Report::default();
    while reader.might_have_next()? {
        let Some(element) = reader.next_if_available()? else {
            continue;
        };
        match &element {
            MkvElement::Start(_) => {
                report.elements += 1;
                report.containers += 1;
            }
            MkvElement::End(_) => {}
            MkvElement::Data(data) => {
                report.elements += 1;
                report.leaves += 1;
                if data.is_truncated() {
                    report.truncated += 1;
                } else if let Err(e) = data.value() {
                    report
                        .value_errors
                        .push(format!("{} #{}: {e}", data.metadata.type_info, data.metadata.element_count));
                }
            }
        }
    }
    Ok(report)
}
