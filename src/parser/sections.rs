use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

static COLUMN_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

/// The fixed section vocabulary of the guide layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Location,
    Coordinates,
    Accessibility,
    Hours,
    BestTimeToVisit,
    EntryFee,
    Gear,
    Settings,
    Tripod,
    Tips,
}

impl Section {
    pub fn label(self) -> &'static str {
        match self {
            Section::Location => "Location",
            Section::Coordinates => "Coordinates",
            Section::Accessibility => "Accessibility",
            Section::Hours => "Hours",
            Section::BestTimeToVisit => "Best time to visit",
            Section::EntryFee => "Entry Fee",
            Section::Gear => "Gear",
            Section::Settings => "Settings",
            Section::Tripod => "Tripod",
            Section::Tips => "Tips & additional information",
        }
    }
}

/// The three left/right pairings that share a visual row in the source layout.
/// Checked in this order; the first pair whose both labels appear wins.
pub const TWO_COLUMN_PAIRS: [(Section, Section); 3] = [
    (Section::Hours, Section::Gear),
    (Section::BestTimeToVisit, Section::Settings),
    (Section::EntryFee, Section::Tripod),
];

/// Classifier position within a page: outside any section, inside a
/// single-column section, or inside a bound two-column region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnState {
    #[default]
    None,
    Single(Section),
    TwoColumn(Section, Section),
}

/// A "Location" heading line. The unrelated "Location changed!" phrase does
/// not qualify.
pub fn is_location_heading(line: &str) -> bool {
    let s = line.trim();
    s.starts_with("Location") && !s.starts_with("Location changed")
}

/// Classify one non-blank line. Pure transition: returns the next state plus
/// the (section, value) appends the line produced. Blank lines must be
/// skipped by the caller; they never affect state.
pub fn step(state: ColumnState, line: &str) -> (ColumnState, Vec<(Section, String)>) {
    let stripped = line.trim();
    let mut out = Vec::new();

    // Single-column headings carry their first value inline on the label line.
    if is_location_heading(stripped) {
        push_inline(&mut out, Section::Location, stripped);
        return (ColumnState::Single(Section::Location), out);
    }
    if stripped.starts_with(Section::Coordinates.label()) {
        push_inline(&mut out, Section::Coordinates, stripped);
        return (ColumnState::Single(Section::Coordinates), out);
    }
    if stripped.starts_with(Section::Accessibility.label()) {
        push_inline(&mut out, Section::Accessibility, stripped);
        return (ColumnState::Single(Section::Accessibility), out);
    }

    // The tips label occupies the whole line in the source layout.
    if stripped.starts_with(Section::Tips.label()) {
        return (ColumnState::Single(Section::Tips), out);
    }

    // Two-column heading: both labels of a pair on the same row.
    for (left, right) in TWO_COLUMN_PAIRS {
        if stripped.contains(left.label()) && stripped.contains(right.label()) {
            return (ColumnState::TwoColumn(left, right), out);
        }
    }

    match state {
        ColumnState::TwoColumn(left, right) => {
            // Split on runs of two or more whitespace characters. A lone
            // un-split piece goes to the left column only.
            let parts: Vec<&str> = COLUMN_SPLIT_RE.splitn(stripped, 3).collect();
            if parts.len() >= 2 {
                let left_val = parts[0].trim();
                let right_val = parts[1].trim();
                if !left_val.is_empty() {
                    out.push((left, left_val.to_string()));
                }
                if !right_val.is_empty() {
                    out.push((right, right_val.to_string()));
                }
            } else {
                out.push((left, parts[0].trim().to_string()));
            }
        }
        ColumnState::Single(section) => out.push((section, stripped.to_string())),
        // No section open yet: the line is discarded.
        ColumnState::None => {}
    }

    (state, out)
}

fn push_inline(out: &mut Vec<(Section, String)>, section: Section, stripped: &str) {
    let value = stripped[section.label().len()..].trim();
    if !value.is_empty() {
        out.push((section, value.to_string()));
    }
}

/// Accumulated section contents for one page unit. Insertion order and
/// duplicates are preserved per section.
#[derive(Debug, Default)]
pub struct SectionBuffers {
    inner: HashMap<Section, Vec<String>>,
}

impl SectionBuffers {
    pub fn push(&mut self, section: Section, value: String) {
        self.inner.entry(section).or_default().push(value);
    }

    pub fn first(&self, section: Section) -> Option<&str> {
        self.inner
            .get(&section)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    pub fn take(&mut self, section: Section) -> Vec<String> {
        self.inner.remove(&section).unwrap_or_default()
    }
}
