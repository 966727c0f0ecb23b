use crate::colour::Colour;
use crate::content::render_lines;
use crate::error::Result;
use crate::font::Font;
use crate::layout::Margins;
use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::refs::{ObjectReferences, RefType};
use crate::units::*;
use id_arena::{Arena, Id};
use pdf_writer::{Finish, Name, Pdf};

/// Which font, at which size, a line is drawn with
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SpanFont {
    pub id: Id<Font>,
    pub size: Pt,
}

/// A single line of text placed on a page. `coords` is the left end of the
/// line's baseline, measured from the bottom-left corner of the page.
#[derive(Clone, PartialEq, Debug)]
pub struct LineLayout {
    pub text: String,
    pub font: SpanFont,
    pub colour: Colour,
    pub coords: (Pt, Pt),
}

/// A page of the document: its physical size, the area inside its margins, and the
/// lines drawn on it in drawing order.
#[derive(Clone, Debug)]
pub struct Page {
    /// The size of the page
    pub media_box: Rect,
    /// Where content can live, i.e. within the margins
    pub content_box: Rect,
    /// The laid out lines
    pub lines: Vec<LineLayout>,
}

impl Page {
    pub fn new(size: PageSize, margins: Option<Margins>) -> Page {
        let (width, height) = size;
        let margins = margins.unwrap_or_default();
        Page {
            media_box: Rect {
                x1: Pt(0.0),
                y1: Pt(0.0),
                x2: width,
                y2: height,
            },
            content_box: Rect {
                x1: margins.left,
                y1: margins.bottom,
                x2: width - margins.right,
                y2: height - margins.top,
            },
            lines: Vec::default(),
        }
    }

    pub fn add_line(&mut self, line: LineLayout) {
        self.lines.push(line);
    }

    pub fn is_blank(&self) -> bool {
        self.lines.is_empty()
    }

    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        page_index: usize,
        fonts: &Arena<Font>,
        writer: &mut Pdf,
    ) -> Result<()> {
        let id = refs.require(RefType::Page(page_index))?;
        let parent = refs.require(RefType::PageTree)?;
        let font_refs = fonts
            .iter()
            .map(|(font_id, _)| {
                refs.require(RefType::Font(font_id.index()))
                    .map(|font_ref| (font_id.index(), font_ref))
            })
            .collect::<Result<Vec<_>>>()?;
        let rendered = render_lines(&self.lines, fonts)?;
        let content_id = refs.gen(RefType::ContentForPage(page_index));

        let mut page = writer.page(id);
        page.media_box(self.media_box.into());
        page.art_box(self.content_box.into());
        page.parent(parent);

        let mut resources = page.resources();
        let mut resource_fonts = resources.fonts();
        for (index, font_ref) in font_refs {
            resource_fonts.pair(Name(format!("F{index}").as_bytes()), font_ref);
        }
        resource_fonts.finish();
        resources.finish();

        page.contents(content_id);
        page.finish();

        writer.stream(content_id, rendered.as_slice());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagesize::LETTER;

    #[test]
    fn content_box_sits_inside_margins() {
        let page = Page::new(LETTER, Some(Margins::all(Pt(72.0))));
        assert_eq!(page.media_box.width(), Pt(612.0));
        assert_eq!(page.media_box.height(), Pt(792.0));
        assert_eq!(page.content_box.x1, Pt(72.0));
        assert_eq!(page.content_box.y1, Pt(72.0));
        assert_eq!(page.content_box.x2, Pt(540.0));
        assert_eq!(page.content_box.y2, Pt(720.0));
        assert!(page.is_blank());
    }

    #[test]
    fn no_margins_fills_the_page() {
        let page = Page::new(LETTER, None);
        assert_eq!(page.content_box, page.media_box);
    }
}
