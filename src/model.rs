use serde::{Deserialize, Serialize};

/// Latitude/longitude as they appeared in the text, in textual order.
/// No geographic validation is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// One extracted photo spot. Serialized 1:1 into `places.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaceRecord {
    /// 1-based page where the record's heading was found.
    pub pdf_page: usize,
    /// Page merged in as an unlabeled continuation, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_page: Option<usize>,
    pub place_number: Option<u32>,
    pub title: String,
    pub title_lines: Vec<String>,
    pub location: String,
    pub location_lines: Vec<String>,
    pub coordinates: Option<Coordinates>,
    pub coordinates_raw: String,
    pub accessibility: String,
    pub hours: Vec<String>,
    pub best_time_to_visit: Vec<String>,
    pub entry_fee: Vec<String>,
    pub gear: Vec<String>,
    pub settings: Vec<String>,
    pub tripod: Vec<String>,
    pub tips: Vec<String>,
    pub image: Option<String>,
    pub image_path: Option<String>,
}

impl PlaceRecord {
    /// Shift page numbers by a constant so that records parsed from a sliced
    /// page range stay absolute to the original document.
    pub fn shift_pages(&mut self, offset: usize) {
        self.pdf_page += offset;
        if let Some(detail) = self.detail_page.as_mut() {
            *detail += offset;
        }
    }
}
