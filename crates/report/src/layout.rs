//! Line wrapping and pagination for exported documents.
//!
//! Positions are measured in millimetres from the top edge of the page; the
//! renderer flips them into PDF coordinates.

use crate::metrics::{glyph_width, text_units, units_to_mm, Face};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
    pub text_width_mm: f32,
    pub body_font_pt: f32,
    pub title_font_pt: f32,
    pub body_line_mm: f32,
    pub title_line_mm: f32,
    pub section_gap_mm: f32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_mm: 10.0,
            text_width_mm: 180.0,
            body_font_pt: 12.0,
            title_font_pt: 14.0,
            body_line_mm: 7.0,
            title_line_mm: 10.0,
            section_gap_mm: 5.0,
        }
    }
}

impl PageLayout {
    /// Lowest baseline a line may occupy before the page overflows.
    pub fn bottom_limit_mm(&self) -> f32 {
        self.page_height_mm - self.margin_mm
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub top_mm: f32,
    pub font_pt: f32,
    pub bold: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

#[derive(Debug, Clone, Copy)]
pub struct Block<'a> {
    pub title: Option<&'a str>,
    pub body: &'a str,
}

/// Greedy word wrap on measured glyph widths. Source line breaks are kept, so
/// blank lines survive as empty output lines; words wider than a full line are
/// split between characters.
pub fn wrap_text(text: &str, face: Face, font_pt: f32, max_width_mm: f32) -> Vec<String> {
    let fits = |units: u32| units_to_mm(units, font_pt) <= max_width_mm;
    let space = glyph_width(face, ' ') as u32;
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_units = 0u32;

        for word in paragraph.split_whitespace() {
            let word_units = text_units(word, face);
            if !current.is_empty() && fits(current_units + space + word_units) {
                current.push(' ');
                current.push_str(word);
                current_units += space + word_units;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current_units = 0;

            for ch in word.chars() {
                let ch_units = glyph_width(face, ch) as u32;
                if !current.is_empty() && !fits(current_units + ch_units) {
                    lines.push(std::mem::take(&mut current));
                    current_units = 0;
                }
                current.push(ch);
                current_units += ch_units;
            }
        }

        lines.push(current);
    }

    lines
}

struct Cursor<'l> {
    layout: &'l PageLayout,
    pages: Vec<Page>,
    top_mm: f32,
}

impl<'l> Cursor<'l> {
    fn new(layout: &'l PageLayout) -> Self {
        Self {
            layout,
            pages: vec![Page::default()],
            top_mm: layout.margin_mm,
        }
    }

    fn place(&mut self, text: String, font_pt: f32, bold: bool, advance_mm: f32) {
        if self.top_mm > self.layout.bottom_limit_mm() {
            self.pages.push(Page::default());
            self.top_mm = self.layout.margin_mm;
        }
        let top_mm = self.top_mm;
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(PlacedLine {
                text,
                top_mm,
                font_pt,
                bold,
            });
        }
        self.top_mm += advance_mm;
    }

    fn skip(&mut self, gap_mm: f32) {
        self.top_mm += gap_mm;
    }

    /// Starts a new page unless a line placed `lead_mm` below the cursor
    /// still fits on the current one. An empty page is never abandoned.
    fn keep_with_next(&mut self, lead_mm: f32) {
        let page_has_lines = self
            .pages
            .last()
            .is_some_and(|page| !page.lines.is_empty());
        if page_has_lines && self.top_mm + lead_mm > self.layout.bottom_limit_mm() {
            self.pages.push(Page::default());
            self.top_mm = self.layout.margin_mm;
        }
    }
}

pub fn paginate(layout: &PageLayout, blocks: &[Block<'_>]) -> Vec<Page> {
    let mut cursor = Cursor::new(layout);

    for (index, block) in blocks.iter().enumerate() {
        if index > 0 {
            cursor.skip(layout.section_gap_mm);
        }
        if let Some(title) = block.title {
            let title_lines = wrap_text(
                title,
                Face::Bold,
                layout.title_font_pt,
                layout.text_width_mm,
            );
            // A title never ends a page: its first body line follows it.
            cursor.keep_with_next(title_lines.len() as f32 * layout.title_line_mm);
            for line in title_lines {
                cursor.place(line, layout.title_font_pt, true, layout.title_line_mm);
            }
        }
        let body_lines = wrap_text(
            block.body,
            Face::Regular,
            layout.body_font_pt,
            layout.text_width_mm,
        );
        for line in body_lines {
            cursor.place(line, layout.body_font_pt, false, layout.body_line_mm);
        }
    }

    cursor.pages
}

#[cfg(test)]
#[path = "tests/layout_tests.rs"]
mod tests;
