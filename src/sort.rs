// ↕️ Column Sorter - Numeric, accent- and case-insensitive ordering of table rows

use crate::view::FactTable;
use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// ASCII punctuation and symbols in root collation order; all sort before digits
const SYMBOL_ORDER: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

/// One primary collation element
#[derive(Debug, PartialEq, Eq)]
enum Element<'a> {
    Space,
    Symbol(u32),
    Number(&'a str),
    Letter(char),
}

impl Element<'_> {
    fn rank(&self) -> u8 {
        match self {
            Element::Space => 0,
            Element::Symbol(_) => 1,
            Element::Number(_) => 2,
            Element::Letter(_) => 3,
        }
    }

    fn collate(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Element::Symbol(a), Element::Symbol(b)) => a.cmp(b),
            (Element::Number(a), Element::Number(b)) => cmp_numeric(a, b),
            (Element::Letter(a), Element::Letter(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

fn symbol_weight(c: char) -> u32 {
    match SYMBOL_ORDER.find(c) {
        Some(pos) => pos as u32,
        None => SYMBOL_ORDER.len() as u32 + c as u32,
    }
}

/// Strip accents: decompose, then drop the combining marks
fn fold(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Split folded text into collation elements, digit runs kept whole
fn elements(s: &str) -> Vec<Element<'_>> {
    let mut out = Vec::new();
    let mut digits_start = None;

    for (i, c) in s.char_indices() {
        if c.is_ascii_digit() {
            digits_start.get_or_insert(i);
            continue;
        }
        if let Some(start) = digits_start.take() {
            out.push(Element::Number(&s[start..i]));
        }
        if c.is_alphabetic() {
            out.extend(c.to_lowercase().map(Element::Letter));
        } else if c.is_whitespace() {
            out.push(Element::Space);
        } else {
            out.push(Element::Symbol(symbol_weight(c)));
        }
    }
    if let Some(start) = digits_start {
        out.push(Element::Number(&s[start..]));
    }
    out
}

/// Compare digit runs by value, without overflow
fn cmp_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Numeric, base-strength ordering: "2" < "10", case and accents ignored
///
/// Whitespace sorts before punctuation, punctuation before digits, digits
/// before letters, so "-6" and "(1,234)" come ahead of "0".
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (a, b) = (fold(a), fold(b));
    let left = elements(&a);
    let right = elements(&b);

    for (x, y) in left.iter().zip(right.iter()) {
        let ord = x.collate(y);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    left.len().cmp(&right.len())
}

impl FactTable {
    /// Reorder body rows ascending by one column's text
    ///
    /// Always ascending; clicking the same header again does not flip the
    /// order. Out-of-range columns leave the table untouched.
    pub fn sort_by_column(&mut self, column: usize) {
        if self.rows.first().and_then(|row| row.cell(column)).is_none() {
            return;
        }
        self.rows.sort_by(|a, b| {
            natural_cmp(a.cell(column).unwrap_or(""), b.cell(column).unwrap_or(""))
        });
    }
}
