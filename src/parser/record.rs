use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::model::PlaceRecord;
use crate::parser::coords;
use crate::parser::sections::{self, ColumnState, Section, SectionBuffers};

static PLACE_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").unwrap());

/// Informational noise that shows up inside some title blocks. It belongs to
/// the record's tips, not its name.
const LOCATION_CHANGED: &str = "Location changed!";

/// Map-link boilerplate dropped from collected Location lines.
const MAP_LINK_NOISE: [&str; 2] = ["Click to open", "Google Maps"];

/// Parse one page unit (a single page, or a page with its continuation page
/// concatenated) into a record.
///
/// Returns None for anything that is not a numbered place page: no qualifying
/// "Location" heading, or no bare-integer place number ahead of the title.
/// This never fails; malformed content degrades to absent fields.
pub fn parse_unit(text: &str, pdf_page: usize, detail_page: Option<usize>) -> Option<PlaceRecord> {
    let lines: Vec<&str> = text.lines().collect();
    let loc_idx = lines.iter().position(|l| sections::is_location_heading(l))?;

    // Header block: everything above the first heading.
    let mut header: Vec<&str> = lines[..loc_idx]
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    // The leading bare integer is the place number. Pages without one are not
    // records; this guards against false-positive "Location" matches.
    let place_number = match header.first() {
        Some(first) if PLACE_NUMBER_RE.is_match(first) => first.parse::<u32>().ok()?,
        _ => {
            debug!(pdf_page, "page has a Location heading but no place number");
            return None;
        }
    };
    header.remove(0);

    let mut title_lines: Vec<String> = header.iter().map(|s| s.to_string()).collect();

    // "Location changed!" in the title block is rerouted to the tips.
    let mut tips = Vec::new();
    if title_lines.iter().any(|l| l == LOCATION_CHANGED) {
        title_lines.retain(|l| l != LOCATION_CHANGED);
        tips.push(LOCATION_CHANGED.to_string());
    }
    let title = title_lines.join(" ").trim().to_string();

    let mut state = ColumnState::None;
    let mut buffers = SectionBuffers::default();
    for raw in &lines[loc_idx..] {
        if raw.trim().is_empty() {
            continue;
        }
        let (next, values) = sections::step(state, raw);
        state = next;
        for (section, value) in values {
            buffers.push(section, value);
        }
    }

    let location_lines: Vec<String> = buffers
        .take(Section::Location)
        .into_iter()
        .filter(|l| !MAP_LINK_NOISE.iter().any(|noise| l.contains(noise)))
        .collect();
    let location = location_lines.join(", ").trim().to_string();

    let coordinates_raw = buffers
        .first(Section::Coordinates)
        .unwrap_or_default()
        .to_string();
    let coordinates = coords::extract(&coordinates_raw);

    let accessibility = buffers
        .first(Section::Accessibility)
        .unwrap_or_default()
        .to_string();

    tips.extend(buffers.take(Section::Tips));

    Some(PlaceRecord {
        pdf_page,
        detail_page,
        place_number: Some(place_number),
        title,
        title_lines,
        location,
        location_lines,
        coordinates,
        coordinates_raw,
        accessibility,
        hours: buffers.take(Section::Hours),
        best_time_to_visit: buffers.take(Section::BestTimeToVisit),
        entry_fee: buffers.take(Section::EntryFee),
        gear: buffers.take(Section::Gear),
        settings: buffers.take(Section::Settings),
        tripod: buffers.take(Section::Tripod),
        tips,
        image: None,
        image_path: None,
    })
}
