// Client-side sorting of table rows by one column.
use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

use crate::brazilian_format::parse_decimal;

static NON_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\d,.\-]").expect("Invalid non-numeric pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Which column a table is sorted by; drives the header's sort indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub column: Option<usize>,
    pub direction: SortDirection,
}

impl SortState {
    /// Clicking the ascending column again flips it; any other click sorts ascending.
    pub fn toggle(&mut self, column: usize) -> SortDirection {
        let direction = if self.column == Some(column) && self.direction == SortDirection::Ascending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        self.column = Some(column);
        self.direction = direction;
        direction
    }
}

#[derive(Debug, PartialEq)]
enum SortKey {
    Number(f64),
    Text(String),
}

impl SortKey {
    fn of(cell: &str) -> Self {
        let cell = cell.trim();
        let numeric = NON_NUMERIC.replace_all(cell, "");
        match parse_decimal(&numeric) {
            Ok(n) if !numeric.is_empty() && n.is_finite() => SortKey::Number(n),
            _ => SortKey::Text(cell.to_lowercase()),
        }
    }

    // Numbers sort before text so the ordering stays total on mixed columns.
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
            (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
        }
    }
}

/// Stable sort of `rows` by the text of `column`; missing cells count as empty text.
pub fn sort_rows(rows: &mut [Vec<String>], column: usize, direction: SortDirection) {
    let mut keyed: Vec<(SortKey, Vec<String>)> = rows
        .iter_mut()
        .map(|row| {
            let key = SortKey::of(row.get(column).map(String::as_str).unwrap_or(""));
            (key, std::mem::take(row))
        })
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match direction {
        SortDirection::Ascending => a.compare(b),
        SortDirection::Descending => b.compare(a),
    });

    for (slot, (_, row)) in rows.iter_mut().zip(keyed) {
        *slot = row;
    }
}
