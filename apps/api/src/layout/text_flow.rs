//! Line wrapping and vertical page flow for the PDF renderer.
//!
//! Coordinates are PDF points with the origin at the bottom-left of a US Letter
//! page. The cursor walks downward from `TOP` and starts a fresh page whenever a
//! line or a section would land too close to the bottom.

use crate::layout::font_metrics::TextMeasure;

pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;
pub const MARGIN: f32 = 50.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
/// Baseline of the first line on every page.
pub const TOP: f32 = PAGE_HEIGHT - MARGIN;
pub const LINE_HEIGHT: f32 = 14.0;
pub const SECTION_GAP: f32 = 20.0;
/// A line whose baseline would fall below this starts a new page.
pub const BOTTOM_MARGIN: f32 = 50.0;
/// A section heading that would fall below this starts a new page.
pub const SECTION_BREAK_THRESHOLD: f32 = 80.0;

/// Greedy word wrap. Words are never split; a single word wider than
/// `max_width` gets a line to itself. Blank text yields no lines.
pub fn wrap_text(text: &str, measure: &dyn TextMeasure, size_pt: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate_width = measure.width_of(&current, size_pt)
            + measure.width_of(" ", size_pt)
            + measure.width_of(word, size_pt);
        if candidate_width > max_width {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        } else {
            current.push(' ');
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Where a line landed: zero-based page index and baseline y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSlot {
    pub page: usize,
    pub y: f32,
}

/// Vertical position on the current page.
#[derive(Debug, Clone)]
pub struct PageCursor {
    page: usize,
    y: f32,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl PageCursor {
    pub fn new() -> Self {
        Self { page: 0, y: TOP }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    /// Number of pages touched so far.
    pub fn page_count(&self) -> usize {
        self.page + 1
    }

    /// Reserves one line, breaking the page first if the cursor is below the margin.
    pub fn next_line(&mut self) -> LineSlot {
        if self.y < BOTTOM_MARGIN {
            self.break_page();
        }
        let slot = LineSlot {
            page: self.page,
            y: self.y,
        };
        self.y -= LINE_HEIGHT;
        slot
    }

    /// Opens a section: adds the section gap, and breaks the page when too little
    /// room would be left for the heading plus some content.
    pub fn start_section(&mut self) {
        self.y -= SECTION_GAP;
        if self.y < SECTION_BREAK_THRESHOLD {
            self.break_page();
        }
    }

    pub fn advance(&mut self, dy: f32) {
        self.y -= dy;
    }

    fn break_page(&mut self) {
        self.page += 1;
        self.y = TOP;
    }
}
