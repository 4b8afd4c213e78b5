use std::sync::LazyLock;

use regex::Regex;

use crate::model::Coordinates;

static DECIMAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-+]?\d+\.\d+").unwrap());

/// Pull a coordinate pair out of a raw text fragment.
///
/// The first two signed decimal numbers, in textual order, become lat and lng.
/// Fewer than two means no coordinates; the record is kept either way.
pub fn extract(raw: &str) -> Option<Coordinates> {
    let mut nums = DECIMAL_RE
        .find_iter(raw)
        .filter_map(|m| m.as_str().parse::<f64>().ok());
    let lat = nums.next()?;
    let lng = nums.next()?;
    Some(Coordinates { lat, lng })
}
