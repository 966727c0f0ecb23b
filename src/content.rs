//! Content stream rendering for pages.

use crate::colour::Colour;
use crate::error::{Error, Result};
use crate::font::Font;
use crate::page::{LineLayout, SpanFont};
use id_arena::Arena;
use std::io::Write;

/// Renders the lines of a page to a PDF content stream.
///
/// Each line becomes its own `BT .. ET` text object positioned with `Td`, so the
/// stream mirrors the page's line list one-to-one. Font and colour operators are
/// only emitted when they change from the previous line.
pub(crate) fn render_lines(lines: &[LineLayout], fonts: &Arena<Font>) -> Result<Vec<u8>> {
    if lines.is_empty() {
        return Ok(Vec::default());
    }

    let mut encoded: Vec<Vec<u8>> = Vec::with_capacity(lines.len());
    for line in lines.iter() {
        let font = fonts
            .get(line.font.id)
            .ok_or_else(|| Error::Render(format!("font {} is not in the document", line.font.id.index())))?;
        let text = font.encode(&line.text)?;
        if text.substitutions > 0 {
            log::debug!(
                "{} character(s) not representable in {}: {:?}",
                text.substitutions,
                font.name(),
                line.text
            );
        }
        encoded.push(text.bytes);
    }

    let mut content: Vec<u8> = Vec::default();
    write_lines(&mut content, lines, &encoded)
        .map_err(|e| Error::Render(format!("cannot build content stream: {e}")))?;
    Ok(content)
}

#[allow(clippy::write_with_newline)]
fn write_lines(content: &mut Vec<u8>, lines: &[LineLayout], encoded: &[Vec<u8>]) -> std::io::Result<()> {
    write!(content, "q\n")?;

    let mut current_font: Option<SpanFont> = None;
    let mut current_colour: Option<Colour> = None;

    for (line, bytes) in lines.iter().zip(encoded.iter()) {
        if current_font != Some(line.font) {
            current_font = Some(line.font);
            write!(content, "/F{} {} Tf\n", line.font.id.index(), line.font.size)?;
        }
        if current_colour != Some(line.colour) {
            current_colour = Some(line.colour);
            write_colour(content, line.colour)?;
        }

        write!(content, "BT\n")?;
        write!(content, "{} {} Td\n", line.coords.0, line.coords.1)?;
        write!(content, "<")?;
        for b in bytes.iter() {
            write!(content, "{b:02x}")?;
        }
        write!(content, "> Tj\n")?;
        write!(content, "ET\n")?;
    }

    write!(content, "Q\n")?;
    Ok(())
}

#[allow(clippy::write_with_newline)]
fn write_colour(content: &mut Vec<u8>, colour: Colour) -> std::io::Result<()> {
    match colour {
        Colour::RGB { r, g, b } => write!(content, "{r} {g} {b} rg\n"),
        Colour::Grey { g } => write!(content, "{g} g\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colours;
    use crate::font::BuiltinFont;
    use crate::units::Pt;

    fn line(fonts: &mut Arena<Font>, text: &str, y: f32) -> LineLayout {
        let id = match fonts.iter().next() {
            Some((id, _)) => id,
            None => fonts.alloc(Font::builtin(BuiltinFont::Helvetica)),
        };
        LineLayout {
            text: text.to_string(),
            font: SpanFont { id, size: Pt(12.0) },
            colour: colours::BLACK,
            coords: (Pt(72.0), Pt(y)),
        }
    }

    #[test]
    fn blank_page_has_empty_stream() {
        let fonts: Arena<Font> = Arena::new();
        assert!(render_lines(&[], &fonts).expect("can render").is_empty());
    }

    #[test]
    fn lines_become_positioned_text_objects() {
        let mut fonts: Arena<Font> = Arena::new();
        let lines = vec![line(&mut fonts, "Hi", 720.0), line(&mut fonts, "", 704.0)];
        let stream = String::from_utf8(render_lines(&lines, &fonts).expect("can render"))
            .expect("stream is ascii");

        assert_eq!(
            stream,
            "q\n/F0 12 Tf\n0 g\nBT\n72 720 Td\n<4869> Tj\nET\nBT\n72 704 Td\n<> Tj\nET\nQ\n"
        );
    }

    #[test]
    fn colour_changes_are_emitted_once() {
        let mut fonts: Arena<Font> = Arena::new();
        let mut red = line(&mut fonts, "b", 704.0);
        red.colour = Colour::new_rgb(1.0, 0.0, 0.0);
        let lines = vec![line(&mut fonts, "a", 720.0), red.clone(), red];
        let stream = String::from_utf8(render_lines(&lines, &fonts).expect("can render"))
            .expect("stream is ascii");

        assert_eq!(stream.matches(" rg\n").count(), 1);
        assert_eq!(stream.matches(" g\n").count(), 1);
        assert_eq!(stream.matches("Tf\n").count(), 1);
    }
}
