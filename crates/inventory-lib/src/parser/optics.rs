//! Optical-module brief parser
//!
//! The command prints a fixed frame: a four-line header/banner, one row
//! per transceiver, then a two-line trailing banner. Rows are
//! whitespace-tokenized positional fields; the token count per row is
//! stable in well-formed output, so a short row is a per-row parse
//! failure and is skipped.

use crate::models::RawTransceiverLine;
use tracing::warn;

/// Lines of header/banner before the first data row.
const HEADER_LINES: usize = 4;
/// Lines of trailing banner after the last data row.
const TRAILER_LINES: usize = 2;
/// A data row carries at least port, status, wavelength and type.
const MIN_ROW_TOKENS: usize = 4;

/// Parse `optical-module brief` output into transceiver rows.
///
/// Well-formed input of N lines yields exactly N - 6 rows. Input too
/// short to contain the frame yields nothing.
pub fn parse_optical_module_brief(text: &str) -> Vec<RawTransceiverLine> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() <= HEADER_LINES + TRAILER_LINES {
        return Vec::new();
    }

    let mut rows = Vec::new();
    for line in &lines[HEADER_LINES..lines.len() - TRAILER_LINES] {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < MIN_ROW_TOKENS {
            warn!(line, "short transceiver row, skipping");
            continue;
        }

        rows.push(RawTransceiverLine {
            port: tokens[0].to_string(),
            status: tokens[1].to_string(),
            optics_type: tokens[3].to_string(),
            vendor_part_number: tokens[tokens.len() - 1].to_string(),
        });
    }

    rows
}
