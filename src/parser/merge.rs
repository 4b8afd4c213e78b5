use crate::parser::sections;

/// One parse unit handed to the record parser: a record page, possibly with
/// its unlabeled continuation page folded in.
#[derive(Debug, PartialEq)]
pub struct PageUnit {
    pub text: String,
    /// 1-based index of the page carrying the heading.
    pub pdf_page: usize,
    /// 1-based index of the merged continuation page, if one was consumed.
    pub detail_page: Option<usize>,
}

/// Explicit cursor over the document's page texts, in order.
///
/// A record page followed by a page with no heading of its own merges that
/// page as a continuation. The lookahead is strictly one page; a consumed
/// continuation page is never revisited as a heading candidate.
pub struct PageCursor<'a> {
    pages: &'a [String],
    pos: usize,
}

impl<'a> PageCursor<'a> {
    pub fn new(pages: &'a [String]) -> Self {
        Self { pages, pos: 0 }
    }

    pub fn next_unit(&mut self) -> Option<PageUnit> {
        while self.pos < self.pages.len() {
            let page = &self.pages[self.pos];
            let pdf_page = self.pos + 1;

            if !has_location_heading(page) {
                self.pos += 1;
                continue;
            }

            let merge_next = self
                .pages
                .get(self.pos + 1)
                .is_some_and(|next| !has_location_heading(next));

            let unit = if merge_next {
                let detail = self.pos + 2;
                self.pos += 2;
                PageUnit {
                    text: format!("{}\n{}", page, &self.pages[detail - 1]),
                    pdf_page,
                    detail_page: Some(detail),
                }
            } else {
                self.pos += 1;
                PageUnit {
                    text: page.clone(),
                    pdf_page,
                    detail_page: None,
                }
            };
            return Some(unit);
        }
        None
    }
}

fn has_location_heading(text: &str) -> bool {
    text.lines().any(sections::is_location_heading)
}
