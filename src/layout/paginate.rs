use crate::colour::{colours, Colour};
use crate::document::Document;
use crate::error::{Error, Result};
use crate::layout::Margins;
use crate::page::*;
use crate::pagesize::PageSize;
use crate::units::Pt;

/// The page cursor: the baseline of the next line on the current page.
///
/// Positions are computed from the slot index rather than by repeated subtraction,
/// so the `n`th line of every page lands on exactly the same coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    top: Pt,
    bottom: Pt,
    pitch: Pt,
    slot: usize,
}

impl Cursor {
    pub fn new(top: Pt, bottom: Pt, pitch: Pt) -> Cursor {
        Cursor {
            top,
            bottom,
            pitch,
            slot: 0,
        }
    }

    /// Vertical position of the given line slot on a page
    pub fn y_at(&self, slot: usize) -> Pt {
        self.top - self.pitch * slot as f32
    }

    /// Current vertical position
    pub fn y(&self) -> Pt {
        self.y_at(self.slot)
    }

    /// Number of lines already placed on the current page
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// True once the cursor has dropped below the bottom threshold, i.e. the next
    /// line belongs on a new page
    pub fn is_exhausted(&self) -> bool {
        self.y() < self.bottom
    }

    /// Move down by one line pitch
    pub fn advance(&mut self) {
        self.slot += 1;
    }

    /// Return to the top of a fresh page
    pub fn reset(&mut self) {
        self.slot = 0;
    }

    /// How many lines fit between the top and the bottom threshold
    pub fn capacity(&self) -> usize {
        if !(self.pitch.0 > 0.0) || self.top < self.bottom {
            return 0;
        }

        let fits = |slot: usize| self.y_at(slot) >= self.bottom;
        let mut n = ((self.top - self.bottom).0 / self.pitch.0).floor() as usize + 1;
        // settle float rounding against the predicate `is_exhausted` uses
        while n > 0 && !fits(n - 1) {
            n -= 1;
        }
        while fits(n) {
            n += 1;
        }
        n
    }
}

/// Places lines onto fixed-size pages at a constant line pitch, starting a new page
/// whenever the next line would fall below the bottom margin.
///
/// Every line is placed exactly once, in input order, at the left margin. Lines are
/// never wrapped or merged, and empty lines still occupy a slot.
#[derive(Debug, Clone)]
pub struct Paginator {
    page_size: PageSize,
    margins: Margins,
    line_pitch: Pt,
    font: SpanFont,
    colour: Colour,
}

impl Paginator {
    /// Fails if the margins and pitch leave no room for a single line
    pub fn new(page_size: PageSize, margins: Margins, line_pitch: Pt, font: SpanFont) -> Result<Paginator> {
        if !(line_pitch.0 > 0.0) {
            return Err(Error::Config(format!(
                "line pitch must be positive, got {line_pitch}"
            )));
        }
        if !margins.is_valid() {
            return Err(Error::Config(format!("margins must be non-negative, got {margins:?}")));
        }

        let paginator = Paginator {
            page_size,
            margins,
            line_pitch,
            font,
            colour: colours::BLACK,
        };
        if paginator.lines_per_page() == 0 {
            return Err(Error::Config(format!(
                "no room for a line: page height {} minus top margin {} is below the bottom margin {}",
                paginator.page_size.1, paginator.margins.top, paginator.margins.bottom
            )));
        }
        Ok(paginator)
    }

    /// Draw all lines in the given colour instead of black
    pub fn with_colour(mut self, colour: Colour) -> Paginator {
        self.colour = colour;
        self
    }

    fn cursor(&self) -> Cursor {
        Cursor::new(
            self.page_size.1 - self.margins.top,
            self.margins.bottom,
            self.line_pitch,
        )
    }

    fn new_page(&self) -> Page {
        Page::new(self.page_size, Some(self.margins.clone()))
    }

    /// `floor((H - top - bottom) / pitch) + 1`
    pub fn lines_per_page(&self) -> usize {
        self.cursor().capacity()
    }

    /// Pages needed for `line_count` lines; an empty input still gets one blank page
    pub fn page_count(&self, line_count: usize) -> usize {
        let per_page = self.lines_per_page().max(1);
        line_count.div_ceil(per_page).max(1)
    }

    /// Lay out `lines` onto new pages appended to `document`, returning the number of
    /// pages added. The first page is opened up front, so an empty input produces a
    /// single blank page.
    pub fn paginate<S: AsRef<str>>(&self, document: &mut Document, lines: &[S]) -> usize {
        let mut cursor = self.cursor();
        let mut page = self.new_page();
        let mut pages = 1;

        for line in lines.iter() {
            if cursor.is_exhausted() {
                log::debug!("page {pages} full after {} lines", cursor.slot());
                document.add_page(std::mem::replace(&mut page, self.new_page()));
                cursor.reset();
                pages += 1;
            }

            page.add_line(LineLayout {
                text: line.as_ref().to_string(),
                font: self.font,
                colour: self.colour,
                coords: (self.margins.left, cursor.y()),
            });
            cursor.advance();
        }

        document.add_page(page);
        pages
    }
}
