//! Renders an ordered sequence of text lines onto paginated PDF documents.
//!
//! Lines are drawn one per slot at a fixed pitch from the top-left margin of each page;
//! a new page starts whenever the next line would fall below the bottom margin.
//!
//! ```no_run
//! use pdf_pager::{text, Renderer};
//!
//! let lines = text::split_lines(text::PAYMENT_GATEWAY_OVERVIEW);
//! let summary = Renderer::default()
//!     .render_to_path(&lines, "docs/payment_gateway_overview.pdf")
//!     .expect("can render");
//! assert_eq!(summary.pages, 2);
//! ```

mod colour;
pub use colour::*;

mod config;
pub use config::*;

mod content;

mod document;
pub use document::*;

mod error;
pub use error::*;

mod font;
pub use font::*;

mod info;
pub use info::*;

/// Line placement and pagination
pub mod layout;

mod page;
pub use page::*;

pub mod pagesize;

mod rect;
pub use rect::*;

pub(crate) mod refs;

mod render;
pub use render::*;

pub mod text;

mod units;
pub use units::*;

/// Re-export PDF-writer functionality
pub use pdf_writer;
