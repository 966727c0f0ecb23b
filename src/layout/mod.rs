//! Line placement and pagination.
//!
//! Lines are placed top to bottom at a fixed pitch, starting at the top-left margin of
//! each page. When the next baseline would fall below the bottom margin, the current
//! page is closed and the line moves to the top of a fresh page.
//!
//! # Example
//!
//! ```
//! use pdf_pager::{BuiltinFont, Document, Font, Pt, SpanFont};
//! use pdf_pager::layout::{Margins, Paginator};
//! use pdf_pager::pagesize;
//!
//! let mut doc = Document::default();
//! let font = doc.add_font(Font::builtin(BuiltinFont::Helvetica));
//!
//! let paginator = Paginator::new(
//!     pagesize::LETTER,
//!     Margins::all(Pt(72.0)),
//!     Pt(16.0),
//!     SpanFont { id: font, size: Pt(12.0) },
//! )
//! .expect("letter has room for lines");
//!
//! let lines: Vec<String> = (1..=50).map(|i| format!("Line {i}")).collect();
//! assert_eq!(paginator.paginate(&mut doc, &lines), 2);
//! ```

mod margins;
mod paginate;

pub use margins::*;
pub use paginate::*;
