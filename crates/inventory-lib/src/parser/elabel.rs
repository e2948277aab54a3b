//! Elabel (electronic label) brief parser
//!
//! Recovers the chassis → line-card → port-interface-card hierarchy
//! from column-aligned CLI text that carries no explicit structure
//! markers. Three mutually exclusive line shapes, tried in priority
//! order per line:
//!
//! 1. Parent: `<SlotKind> <SlotNumber> <ProductId> <Serial> <Description>`
//! 2. Power/no-detail: `<SlotKind> <SlotNumber>` and nothing else
//! 3. Child: leading whitespace, then
//!    `<ChildKind> <ChildNumber> <ProductId> <Serial> [Description]`
//!
//! A parent or power line sets the current parent; a child line is only
//! valid while a parent is active and is keyed under it as
//! `<ParentKind><ParentNumber>/<ChildNumber>`. Columns are separated by
//! one-or-more whitespace, never fixed offsets, and the description is
//! a greedy capture to end of line (it may contain spaces).

use crate::models::RawInventoryLine;
use tracing::trace;

/// Split off the first `n` whitespace-separated columns of a line and
/// return them together with the trimmed remainder.
fn take_columns(line: &str, n: usize) -> (Vec<&str>, &str) {
    let mut rest = line.trim_start();
    let mut columns = Vec::with_capacity(n);

    for _ in 0..n {
        if rest.is_empty() {
            break;
        }
        match rest.find(char::is_whitespace) {
            Some(end) => {
                columns.push(&rest[..end]);
                rest = rest[end..].trim_start();
            }
            None => {
                columns.push(rest);
                rest = "";
            }
        }
    }

    (columns, rest)
}

/// A slot kind token is a bare identifier like `LPU`, `PIC`, `MPU`,
/// `PWR`. Digits are allowed after the first character but a kind never
/// starts with one, which keeps numeric table rows out.
fn is_slot_kind(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn is_slot_number(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

/// Parse `elabel brief` output into raw inventory lines.
///
/// Lines matching none of the three shapes (banners, column headers,
/// separators) are ignored. A child line seen before any parent is also
/// ignored rather than guessed at.
pub fn parse_elabel_brief(text: &str) -> Vec<RawInventoryLine> {
    let mut lines = Vec::new();
    // (kind, number) of the most recent parent or power line
    let mut current_parent: Option<(String, String)> = None;

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let indented = line.starts_with(' ') || line.starts_with('\t');
        let (columns, description) = take_columns(line, 4);

        if !indented {
            // Parent line: all four detail columns plus a description.
            if columns.len() == 4
                && !description.is_empty()
                && is_slot_kind(columns[0])
                && is_slot_number(columns[1])
            {
                let slot_id = format!("{}{}", columns[0], columns[1]);
                current_parent = Some((columns[0].to_string(), columns[1].to_string()));
                lines.push(RawInventoryLine {
                    slot_id,
                    product_id: columns[2].to_string(),
                    serial_number: columns[3].to_string(),
                    description: description.to_string(),
                });
                continue;
            }

            // Power/no-detail line: kind and number only.
            if columns.len() == 2
                && description.is_empty()
                && is_slot_kind(columns[0])
                && is_slot_number(columns[1])
            {
                let slot_id = format!("{}{}", columns[0], columns[1]);
                current_parent = Some((columns[0].to_string(), columns[1].to_string()));
                lines.push(RawInventoryLine {
                    slot_id,
                    ..Default::default()
                });
                continue;
            }

            trace!(line, "elabel line matched no shape, skipping");
            continue;
        }

        // Child line: needs an active parent. The description column is
        // optional here; a 4-column child line is valid.
        if let Some((parent_kind, parent_number)) = &current_parent {
            if columns.len() >= 4 && is_slot_kind(columns[0]) && is_slot_number(columns[1]) {
                let slot_id = format!("{}{}/{}", parent_kind, parent_number, columns[1]);
                lines.push(RawInventoryLine {
                    slot_id,
                    product_id: columns[2].to_string(),
                    serial_number: columns[3].to_string(),
                    description: description.to_string(),
                });
                continue;
            }
        }

        trace!(line, "elabel line matched no shape, skipping");
    }

    lines
}
