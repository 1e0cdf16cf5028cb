//! Cell addresses and ranges in A1 notation.
//!
//! Columns are bijective base-26 letters (1 = A, 26 = Z, 27 = AA) and rows are
//! 1-based. Parsing is a pure validation step: it never panics and reports why
//! text is not an address through `AddressError`.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Highest column accepted in address text ("XFD").
pub const MAX_COL: u32 = 16_384;
/// Highest row accepted in address text.
pub const MAX_ROW: u32 = 1_048_576;

/// Why a piece of text is not a valid cell address or range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressError {
    Empty,
    /// No column letters before the row digits.
    MissingColumn,
    /// Column letters with no row digits after them.
    MissingRow,
    /// A character outside `[A-Z0-9]` (lowercase letters included).
    InvalidCharacter(char),
    /// Row digits written with a leading zero, e.g. "A01".
    LeadingZero,
    ZeroRow,
    ZeroColumn,
    /// Row or column past `MAX_ROW` / `MAX_COL`.
    Overflow,
    /// Range text without a `:` between its two corners.
    MissingSeparator,
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty address"),
            Self::MissingColumn => write!(f, "missing column letters"),
            Self::MissingRow => write!(f, "missing row number"),
            Self::InvalidCharacter(c) => write!(f, "invalid character '{c}'"),
            Self::LeadingZero => write!(f, "row number has a leading zero"),
            Self::ZeroRow => write!(f, "row must be at least 1"),
            Self::ZeroColumn => write!(f, "column must be at least 1"),
            Self::Overflow => write!(f, "address is outside the sheet (max {}{})", col_to_letters(MAX_COL), MAX_ROW),
            Self::MissingSeparator => write!(f, "range must be written as <address>:<address>"),
        }
    }
}

impl std::error::Error for AddressError {}

// ============================================================================
// Column letters
// ============================================================================

/// Convert a 1-based column number to its letters: 1 = "A", 26 = "Z", 27 = "AA".
///
/// Column 0 has no letter form and yields an empty string.
pub fn col_to_letters(col: u32) -> String {
    let mut letters = Vec::new();
    let mut n = col;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Convert column letters back to a 1-based column number.
///
/// Only uppercase ASCII letters are accepted. No upper bound is applied beyond
/// `u32` overflow; `CellAddress` enforces the sheet limits.
pub fn letters_to_col(letters: &str) -> Result<u32, AddressError> {
    if letters.is_empty() {
        return Err(AddressError::MissingColumn);
    }
    letters.chars().try_fold(0u32, |acc, c| {
        if !c.is_ascii_uppercase() {
            return Err(AddressError::InvalidCharacter(c));
        }
        let digit = c as u32 - 'A' as u32 + 1;
        acc.checked_mul(26)
            .and_then(|v| v.checked_add(digit))
            .ok_or(AddressError::Overflow)
    })
}

// ============================================================================
// CellAddress
// ============================================================================

/// A single cell, 1-based on both axes.
///
/// Ordering is row-major (row first, then column), which is also the order
/// `CellRange::cells` yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    row: u32,
    col: u32,
}

impl CellAddress {
    /// Build an address, checking both axes are within `1..=MAX_*`.
    pub fn new(row: u32, col: u32) -> Result<Self, AddressError> {
        if row == 0 {
            return Err(AddressError::ZeroRow);
        }
        if col == 0 {
            return Err(AddressError::ZeroColumn);
        }
        if row > MAX_ROW || col > MAX_COL {
            return Err(AddressError::Overflow);
        }
        Ok(Self { row, col })
    }

    #[inline]
    pub fn row(&self) -> u32 {
        self.row
    }

    #[inline]
    pub fn col(&self) -> u32 {
        self.col
    }

    /// Parse "A1"-style text. Accepts exactly `[A-Z]+[1-9][0-9]*`.
    pub fn from_a1(text: &str) -> Result<Self, AddressError> {
        let first = text.chars().next().ok_or(AddressError::Empty)?;
        let split = text
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(text.len());
        let (letters, digits) = text.split_at(split);

        if letters.is_empty() {
            return Err(if first.is_ascii_digit() {
                AddressError::MissingColumn
            } else {
                AddressError::InvalidCharacter(first)
            });
        }
        let col = letters_to_col(letters)?;

        if digits.is_empty() {
            return Err(AddressError::MissingRow);
        }
        if let Some(c) = digits.chars().find(|c| !c.is_ascii_digit()) {
            return Err(AddressError::InvalidCharacter(c));
        }
        if digits.starts_with('0') {
            return Err(if digits.bytes().all(|b| b == b'0') {
                AddressError::ZeroRow
            } else {
                AddressError::LeadingZero
            });
        }
        let row: u32 = digits.parse().map_err(|_| AddressError::Overflow)?;

        Self::new(row, col)
    }

    /// Canonical text form, e.g. "AA10".
    pub fn to_a1(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", col_to_letters(self.col), self.row)
    }
}

impl FromStr for CellAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_a1(s)
    }
}

impl Serialize for CellAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CellAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_a1(&text).map_err(|e| de::Error::custom(format!("{text}: {e}")))
    }
}

// ============================================================================
// CellRange
// ============================================================================

/// Two corners written as "A1:B10".
///
/// The corners keep the order they were written in (`Display` round-trips
/// "B3:A1" as-is), but expansion always covers the rectangle between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    start: CellAddress,
    end: CellAddress,
}

impl CellRange {
    pub fn new(start: CellAddress, end: CellAddress) -> Self {
        Self { start, end }
    }

    /// Parse "<address>:<address>".
    pub fn parse(text: &str) -> Result<Self, AddressError> {
        if text.is_empty() {
            return Err(AddressError::Empty);
        }
        let (left, right) = text.split_once(':').ok_or(AddressError::MissingSeparator)?;
        if right.contains(':') {
            return Err(AddressError::InvalidCharacter(':'));
        }
        Ok(Self::new(CellAddress::from_a1(left)?, CellAddress::from_a1(right)?))
    }

    #[inline]
    pub fn start(&self) -> CellAddress {
        self.start
    }

    #[inline]
    pub fn end(&self) -> CellAddress {
        self.end
    }

    /// Same rectangle with `start` as the top-left corner and `end` as the
    /// bottom-right one.
    pub fn normalized(&self) -> Self {
        let top = self.start.row.min(self.end.row);
        let bottom = self.start.row.max(self.end.row);
        let left = self.start.col.min(self.end.col);
        let right = self.start.col.max(self.end.col);
        Self {
            start: CellAddress { row: top, col: left },
            end: CellAddress { row: bottom, col: right },
        }
    }

    pub fn row_count(&self) -> u32 {
        self.start.row.abs_diff(self.end.row) + 1
    }

    pub fn col_count(&self) -> u32 {
        self.start.col.abs_diff(self.end.col) + 1
    }

    /// Number of cells in the rectangle. Never zero.
    pub fn cell_count(&self) -> u64 {
        u64::from(self.row_count()) * u64::from(self.col_count())
    }

    pub fn contains(&self, addr: &CellAddress) -> bool {
        let n = self.normalized();
        (n.start.row..=n.end.row).contains(&addr.row) && (n.start.col..=n.end.col).contains(&addr.col)
    }

    /// Every address in the rectangle, row by row, left to right.
    pub fn cells(&self) -> impl Iterator<Item = CellAddress> {
        let n = self.normalized();
        (n.start.row..=n.end.row)
            .flat_map(move |row| (n.start.col..=n.end.col).map(move |col| CellAddress { row, col }))
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

impl FromStr for CellRange {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for CellRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CellRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(|e| de::Error::custom(format!("{text}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(text: &str) -> CellAddress {
        CellAddress::from_a1(text).unwrap()
    }

    // =========================================================================
    // Column letters
    // =========================================================================

    #[test]
    fn test_col_to_letters() {
        assert_eq!(col_to_letters(1), "A");
        assert_eq!(col_to_letters(2), "B");
        assert_eq!(col_to_letters(26), "Z");
        assert_eq!(col_to_letters(27), "AA");
        assert_eq!(col_to_letters(28), "AB");
        assert_eq!(col_to_letters(702), "ZZ");
        assert_eq!(col_to_letters(703), "AAA");
        assert_eq!(col_to_letters(MAX_COL), "XFD");
        assert_eq!(col_to_letters(0), "");
    }

    #[test]
    fn test_letters_to_col() {
        assert_eq!(letters_to_col("A"), Ok(1));
        assert_eq!(letters_to_col("Z"), Ok(26));
        assert_eq!(letters_to_col("AA"), Ok(27));
        assert_eq!(letters_to_col("ZZ"), Ok(702));
        assert_eq!(letters_to_col("XFD"), Ok(MAX_COL));
    }

    #[test]
    fn test_letters_to_col_rejects_bad_input() {
        assert_eq!(letters_to_col(""), Err(AddressError::MissingColumn));
        assert_eq!(letters_to_col("a"), Err(AddressError::InvalidCharacter('a')));
        assert_eq!(letters_to_col("A1"), Err(AddressError::InvalidCharacter('1')));
        assert_eq!(letters_to_col("ZZZZZZZZZZ"), Err(AddressError::Overflow));
    }

    // =========================================================================
    // CellAddress parsing
    // =========================================================================

    #[test]
    fn test_parse_simple() {
        let a = addr("A1");
        assert_eq!((a.row(), a.col()), (1, 1));

        let b = addr("AA10");
        assert_eq!((b.row(), b.col()), (10, 27));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(CellAddress::from_a1(""), Err(AddressError::Empty));
        assert_eq!(CellAddress::from_a1("1A"), Err(AddressError::MissingColumn));
        assert_eq!(CellAddress::from_a1("A"), Err(AddressError::MissingRow));
        assert_eq!(CellAddress::from_a1("a1"), Err(AddressError::InvalidCharacter('a')));
        assert_eq!(CellAddress::from_a1("A1B"), Err(AddressError::InvalidCharacter('B')));
        assert_eq!(CellAddress::from_a1("$A$1"), Err(AddressError::InvalidCharacter('$')));
        assert_eq!(CellAddress::from_a1("A0"), Err(AddressError::ZeroRow));
        assert_eq!(CellAddress::from_a1("A01"), Err(AddressError::LeadingZero));
        assert_eq!(CellAddress::from_a1("XFE1"), Err(AddressError::Overflow));
        assert_eq!(CellAddress::from_a1("A1048577"), Err(AddressError::Overflow));
        assert_eq!(CellAddress::from_a1("A99999999999"), Err(AddressError::Overflow));
    }

    #[test]
    fn test_new_checks_bounds() {
        assert_eq!(CellAddress::new(0, 1), Err(AddressError::ZeroRow));
        assert_eq!(CellAddress::new(1, 0), Err(AddressError::ZeroColumn));
        assert!(CellAddress::new(MAX_ROW, MAX_COL).is_ok());
        assert_eq!(CellAddress::new(MAX_ROW + 1, 1), Err(AddressError::Overflow));
    }

    #[test]
    fn test_display_roundtrip() {
        for text in ["A1", "Z9", "AA10", "XFD1048576", "BC123"] {
            assert_eq!(addr(text).to_a1(), text);
        }
    }

    #[test]
    fn test_ordering_is_row_major() {
        assert!(addr("B1") < addr("A2"));
        assert!(addr("A1") < addr("B1"));
    }

    // =========================================================================
    // CellRange
    // =========================================================================

    #[test]
    fn test_range_parse() {
        let r = CellRange::parse("A1:B10").unwrap();
        assert_eq!(r.start(), addr("A1"));
        assert_eq!(r.end(), addr("B10"));
        assert_eq!(r.to_string(), "A1:B10");
    }

    #[test]
    fn test_range_parse_errors() {
        assert_eq!(CellRange::parse(""), Err(AddressError::Empty));
        assert_eq!(CellRange::parse("A1"), Err(AddressError::MissingSeparator));
        assert_eq!(CellRange::parse("A1:"), Err(AddressError::Empty));
        assert_eq!(CellRange::parse("A1:B"), Err(AddressError::MissingRow));
        assert_eq!(CellRange::parse("A1:B2:C3"), Err(AddressError::InvalidCharacter(':')));
    }

    #[test]
    fn test_range_expansion_row_major() {
        let r = CellRange::parse("A1:B2").unwrap();
        let cells: Vec<String> = r.cells().map(|a| a.to_a1()).collect();
        assert_eq!(cells, vec!["A1", "B1", "A2", "B2"]);
        assert_eq!(r.cell_count(), 4);
    }

    #[test]
    fn test_reversed_range_covers_same_rectangle() {
        let forward = CellRange::parse("A1:B3").unwrap();
        let reversed = CellRange::parse("B3:A1").unwrap();
        let mixed = CellRange::parse("B1:A3").unwrap();

        let expected: Vec<CellAddress> = forward.cells().collect();
        assert_eq!(reversed.cells().collect::<Vec<_>>(), expected);
        assert_eq!(mixed.cells().collect::<Vec<_>>(), expected);
        assert_eq!(reversed.to_string(), "B3:A1");
        assert_eq!(reversed.normalized(), forward);
        assert_eq!(mixed.cell_count(), 6);
    }

    #[test]
    fn test_range_contains() {
        let r = CellRange::parse("C3:A1").unwrap();
        assert!(r.contains(&addr("B2")));
        assert!(r.contains(&addr("C3")));
        assert!(!r.contains(&addr("D1")));
    }

    #[test]
    fn test_single_cell_range() {
        let r = CellRange::parse("C5:C5").unwrap();
        assert_eq!(r.cells().collect::<Vec<_>>(), vec![addr("C5")]);
    }
}
