//! Pre-defined page sizes for common paper formats.
//!
//! All sizes are provided in portrait orientation (width, height) where width ≤ height,
//! except `LEDGER`, which is tabloid turned on its side. Use the
//! [`PageOrientation`](crate::pagesize::PageOrientation) trait to convert between
//! portrait and landscape, and [`by_name`](crate::pagesize::by_name) to look a size
//! up from configuration.
//!
//! # Example
//!
//! ```
//! use pdf_pager::pagesize::{self, PageOrientation, A4, LETTER};
//!
//! let page_size = LETTER;
//! let landscape = A4.landscape();
//! assert_eq!(pagesize::by_name("Letter"), Some(page_size));
//! ```

use crate::units::*;

/// Page dimensions as (width, height) in points.
pub type PageSize = (Pt, Pt);

// north american sizes
pub const LETTER: PageSize = (Pt(8.5 * 72.0), Pt(11.0 * 72.0));
pub const HALF_LETTER: PageSize = (Pt(5.5 * 72.0), Pt(8.5 * 72.0));
pub const JUNIOR_LEGAL: PageSize = (Pt(5.0 * 72.0), Pt(8.0 * 72.0));
pub const LEGAL: PageSize = (Pt(8.5 * 72.0), Pt(14.0 * 72.0));
pub const TABLOID: PageSize = (Pt(11.0 * 72.0), Pt(17.0 * 72.0));
pub const LEDGER: PageSize = (Pt(17.0 * 72.0), Pt(11.0 * 72.0));

// iso a-series (converted from mm to points)
pub const A3: PageSize = (Pt(297.0 * 72.0 / 25.4), Pt(420.0 * 72.0 / 25.4));
pub const A4: PageSize = (Pt(210.0 * 72.0 / 25.4), Pt(297.0 * 72.0 / 25.4));
pub const A5: PageSize = (Pt(148.0 * 72.0 / 25.4), Pt(210.0 * 72.0 / 25.4));
pub const A6: PageSize = (Pt(105.0 * 72.0 / 25.4), Pt(148.0 * 72.0 / 25.4));

/// Look up a named page size. Names are matched case-insensitively and ignore
/// `-`, `_` and spaces, so `"half-letter"`, `"Half Letter"` and `"HALF_LETTER"`
/// all resolve to [HALF_LETTER].
pub fn by_name(name: &str) -> Option<PageSize> {
    let key: String = name
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .map(|c| c.to_ascii_lowercase())
        .collect();

    match key.as_str() {
        "letter" => Some(LETTER),
        "halfletter" => Some(HALF_LETTER),
        "juniorlegal" => Some(JUNIOR_LEGAL),
        "legal" => Some(LEGAL),
        "tabloid" => Some(TABLOID),
        "ledger" => Some(LEDGER),
        "a3" => Some(A3),
        "a4" => Some(A4),
        "a5" => Some(A5),
        "a6" => Some(A6),
        _ => None,
    }
}

/// Convert page sizes between portrait and landscape orientations.
pub trait PageOrientation {
    /// Returns the size in portrait orientation (width ≤ height).
    fn portrait(self) -> Self;
    /// Returns the size in landscape orientation (width ≥ height).
    fn landscape(self) -> Self;
}

impl PageOrientation for PageSize {
    fn portrait(self) -> Self {
        if self.0 <= self.1 {
            self
        } else {
            (self.1, self.0)
        }
    }

    fn landscape(self) -> PageSize {
        if self.0 >= self.1 {
            self
        } else {
            (self.1, self.0)
        }
    }
}
