pub mod coords;
pub mod merge;
pub mod record;
pub mod sections;

use crate::model::PlaceRecord;

/// Walk the page texts in order, merging continuation pages, and produce one
/// record per qualifying page unit. Pages that are not records are skipped
/// silently.
pub fn extract_places(pages: &[String]) -> Vec<PlaceRecord> {
    let mut cursor = merge::PageCursor::new(pages);
    let mut records = Vec::new();
    while let Some(unit) = cursor.next_unit() {
        if let Some(rec) = record::parse_unit(&unit.text, unit.pdf_page, unit.detail_page) {
            records.push(rec);
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.txt", name)).unwrap()
    }

    #[test]
    fn guide_pages_end_to_end() {
        let pages = vec![
            fixture("intro"),
            fixture("brandenburg_gate"),
            fixture("oberbaum_bridge_p1"),
            fixture("oberbaum_bridge_p2"),
        ];
        let records = extract_places(&pages);
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].pdf_page, 2);
        assert_eq!(records[0].detail_page, None);
        assert_eq!(records[0].title, "Brandenburg Gate at Blue Hour");

        assert_eq!(records[1].pdf_page, 3);
        assert_eq!(records[1].detail_page, Some(4));
        assert_eq!(records[1].title, "Oberbaum Bridge");
    }

    #[test]
    fn continuation_page_is_owned_by_one_record() {
        let pages = vec![fixture("oberbaum_bridge_p1"), fixture("oberbaum_bridge_p2")];
        let records = extract_places(&pages);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].detail_page, Some(2));
    }

    #[test]
    fn no_records_in_front_matter() {
        let pages = vec![fixture("intro")];
        assert!(extract_places(&pages).is_empty());
    }
}
