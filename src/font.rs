use crate::{
    error::{Error, Result},
    refs::{ObjectReferences, RefType},
};
use id_arena::Id;
use owned_ttf_parser::{AsFaceRef, OwnedFace};
use pdf_writer::{
    types::{FontFlags, SystemInfo},
    Finish, Name, Pdf, Ref, Str,
};
use serde::Deserialize;
use std::{collections::HashMap, path::Path};

const TABSIZE: usize = 4;

/// The standard PDF fonts that every viewer provides, so they never need to be
/// embedded. Text drawn with these fonts is encoded as `WinAnsiEncoding`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuiltinFont {
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
    #[default]
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    Courier,
    CourierOblique,
    CourierBold,
    CourierBoldOblique,
}

impl BuiltinFont {
    /// The PostScript name used as the `BaseFont` of the font dictionary
    pub fn base_font(&self) -> &'static str {
        use BuiltinFont::*;
        match self {
            TimesRoman => "Times-Roman",
            TimesBold => "Times-Bold",
            TimesItalic => "Times-Italic",
            TimesBoldItalic => "Times-BoldItalic",
            Helvetica => "Helvetica",
            HelveticaBold => "Helvetica-Bold",
            HelveticaOblique => "Helvetica-Oblique",
            HelveticaBoldOblique => "Helvetica-BoldOblique",
            Courier => "Courier",
            CourierOblique => "Courier-Oblique",
            CourierBold => "Courier-Bold",
            CourierBoldOblique => "Courier-BoldOblique",
        }
    }
}

/// Map a character to its `WinAnsiEncoding` code, if it has one.
fn winansi_byte(ch: char) -> Option<u8> {
    let code = match ch {
        ' '..='~' => ch as u32,
        '\u{a0}'..='\u{ff}' => ch as u32,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8a,
        '‹' => 0x8b,
        'Œ' => 0x8c,
        'Ž' => 0x8e,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9a,
        '›' => 0x9b,
        'œ' => 0x9c,
        'ž' => 0x9e,
        'Ÿ' => 0x9f,
        _ => return None,
    };
    Some(code as u8)
}

/// Text encoded into the byte codes a font's content stream expects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedText {
    pub bytes: Vec<u8>,
    /// How many characters had no code in the font and were replaced
    pub substitutions: usize,
}

/// A TrueType / OpenType font, embedded in its entirety in the generated PDF, so large
/// fonts may dramatically increase the size of the output. Use an embedded font when the
/// text contains characters that `WinAnsiEncoding` cannot express.
pub struct EmbeddedFont {
    pub face: OwnedFace,
}

/// A font that lines can be drawn with. Fonts are stored once per document and
/// referred to by their [Id] from every line that uses them.
pub enum Font {
    Builtin(BuiltinFont),
    Embedded(EmbeddedFont),
}

impl Font {
    /// Use one of the standard PDF fonts
    pub fn builtin(font: BuiltinFont) -> Font {
        Font::Builtin(font)
    }

    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        Ok(Font::Embedded(EmbeddedFont { face }))
    }

    /// Read and parse a font file from disk
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Font> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| Error::Config(format!("cannot read font {}: {e}", path.display())))?;
        Font::load(bytes)
    }

    /// Human-readable name of the font, used in log output
    pub fn name(&self) -> String {
        match self {
            Font::Builtin(font) => font.base_font().to_string(),
            Font::Embedded(font) => font.name(),
        }
    }

    /// Encode a line of text for a `Tj` operator. Tabs are expanded to spaces; characters
    /// the font cannot show are replaced by `?` (builtin fonts) or by the font's
    /// replacement glyph (embedded fonts) and counted in [EncodedText::substitutions].
    pub fn encode(&self, text: &str) -> Result<EncodedText> {
        let text = text.replace('\t', &" ".repeat(TABSIZE));

        match self {
            Font::Builtin(_) => {
                let mut encoded = EncodedText {
                    bytes: Vec::with_capacity(text.len()),
                    substitutions: 0,
                };
                for ch in text.chars() {
                    match winansi_byte(ch) {
                        Some(b) => encoded.bytes.push(b),
                        None => {
                            encoded.bytes.push(b'?');
                            encoded.substitutions += 1;
                        }
                    }
                }
                Ok(encoded)
            }
            Font::Embedded(font) => {
                let fallback = font.replacement_glyph_id().or_else(|| font.glyph_id('?'));
                encode_glyphs(&text, |ch| font.glyph_id(ch), fallback).map_err(|ch| {
                    Error::Render(format!(
                        "font {} has no glyph for {ch:?} and no replacement glyph",
                        font.name()
                    ))
                })
            }
        }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, id: Id<Font>, writer: &mut Pdf) -> Result<()> {
        let font_index = id.index();
        match self {
            Font::Builtin(font) => {
                let font_id = refs.gen(RefType::Font(font_index));
                let mut type1 = writer.type1_font(font_id);
                type1.base_font(Name(font.base_font().as_bytes()));
                type1.encoding_predefined(Name(b"WinAnsiEncoding"));
                Ok(())
            }
            Font::Embedded(font) => font.write(refs, font_index, writer),
        }
    }
}

/// Encode `text` as big-endian glyph ids for an `Identity-H` font, using `fallback`
/// for characters `lookup` has no glyph for. Fails with the first character that
/// cannot be drawn when there is no fallback.
fn encode_glyphs<F>(text: &str, lookup: F, fallback: Option<u16>) -> std::result::Result<EncodedText, char>
where
    F: Fn(char) -> Option<u16>,
{
    let mut encoded = EncodedText {
        bytes: Vec::with_capacity(text.len() * 2),
        substitutions: 0,
    };
    for ch in text.chars() {
        let gid = match lookup(ch) {
            Some(gid) => gid,
            None => {
                encoded.substitutions += 1;
                fallback.ok_or(ch)?
            }
        };
        encoded.bytes.extend_from_slice(&gid.to_be_bytes());
    }
    Ok(encoded)
}

/// Group `(cid, width)` pairs, sorted by cid, into runs of consecutive cids for the
/// `W` array of a CID font
fn width_runs(widths: &[(u16, f32)]) -> Vec<(u16, Vec<f32>)> {
    let mut runs: Vec<(u16, Vec<f32>)> = Vec::new();
    for &(cid, width) in widths {
        match runs.last_mut() {
            Some((start, run)) if cid.checked_sub(*start).map(usize::from) == Some(run.len()) => {
                run.push(width)
            }
            _ => runs.push((cid, vec![width])),
        }
    }
    runs
}

impl EmbeddedFont {
    /// Obtain the full name of the font, falling back to its family name
    pub fn name(&self) -> String {
        self.lookup_name(owned_ttf_parser::name_id::FULL_NAME)
            .or_else(|| self.family())
            .unwrap_or_else(|| "Embedded".to_string())
    }

    /// Obtain the family name of the font
    pub fn family(&self) -> Option<String> {
        self.lookup_name(owned_ttf_parser::name_id::FAMILY)
    }

    fn lookup_name(&self, name_id: u16) -> Option<String> {
        self.face
            .as_face_ref()
            .names()
            .into_iter()
            .find(|name| name.name_id == name_id && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        self.face.as_face_ref().glyph_index(ch).map(|i| i.0)
    }

    pub fn replacement_glyph_id(&self) -> Option<u16> {
        self.glyph_id('\u{FFFD}')
    }

    fn write_cid(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) -> Result<Ref> {
        let font_descriptor_id = self.write_descriptor(refs, font_index, writer);

        let id = refs.gen(RefType::CidFont(font_index));

        let mut cid_font = writer.cid_font(id);
        cid_font.subtype(pdf_writer::types::CidFontType::Type2);
        cid_font.base_font(Name(format!("F{font_index}").as_bytes()));
        cid_font.system_info(SystemInfo {
            registry: Str(b"Adobe"),
            ordering: Str(b"Identity"),
            supplement: 0,
        });
        cid_font.font_descriptor(font_descriptor_id);

        let ids = self.glyph_ids();
        let ids_augmented = self.glyphs_sizing(&ids);

        let scaling = 1000.0 / self.face.as_face_ref().units_per_em() as f32;

        // the most common advance becomes the default width
        let mut widths_counts: HashMap<u16, usize> = HashMap::new();
        for (_, (width, _)) in ids_augmented.values() {
            *widths_counts.entry(*width).or_insert(0) += 1;
        }
        let most_common_width = widths_counts
            .iter()
            .max_by_key(|&(_, count)| count)
            .map(|(&width, _)| width as f32 * scaling)
            .unwrap_or(1000.0);

        let mut id_widths: Vec<(u16, f32)> = ids_augmented
            .iter()
            .map(|(&cid, &(_, (width, _)))| (cid, width as f32 * scaling))
            .collect();
        id_widths.sort_by_key(|(id, _)| *id);

        let runs = width_runs(&id_widths);
        if runs.is_empty() {
            return Err(Error::Render(format!("font {} maps no glyphs", self.name())));
        }

        let mut widths = cid_font.widths();
        widths.consecutive(0, [1000.0]);
        for (start, run) in runs {
            widths.consecutive(start, run);
        }
        widths.finish();

        cid_font.default_width(most_common_width);
        cid_font.cid_to_gid_map_predefined(Name(b"Identity"));

        Ok(id)
    }

    fn write_font_data(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) -> Ref {
        let id = refs.gen(RefType::FontData(font_index));

        writer
            .stream(id, self.face.as_slice())
            .pair(Name(b"Length1"), self.face.as_slice().len() as i32);

        id
    }

    fn write_descriptor(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) -> Ref {
        let font_data_stream_id = self.write_font_data(refs, font_index, writer);

        let gids = self.glyph_ids();
        let gids_augmented = self.glyphs_sizing(&gids);

        let max_width = gids_augmented
            .values()
            .map(|&(_, (w, _))| w)
            .max()
            .unwrap_or_default();
        let max_height = gids_augmented
            .values()
            .map(|&(_, (_, h))| h)
            .max()
            .unwrap_or_default();
        let sum_width: usize = gids_augmented.values().map(|&(_, (w, _))| w as usize).sum();
        let avg_width = sum_width as f32 / gids_augmented.len().max(1) as f32;

        let id = refs.gen(RefType::FontDescriptor(font_index));
        let face = self.face.as_face_ref();
        let name = self.name();
        let family = self.family().unwrap_or_else(|| name.clone());

        let mut descriptor = writer.font_descriptor(id);
        descriptor.name(Name(name.as_bytes()));
        descriptor.family(Str(family.as_bytes()));
        descriptor.weight(face.weight().to_number());

        let mut flags: FontFlags = FontFlags::NON_SYMBOLIC;
        if face.is_monospaced() {
            flags.set(FontFlags::FIXED_PITCH, true);
        }
        if face.is_italic() {
            flags.set(FontFlags::ITALIC, true);
        }
        descriptor.flags(flags);

        let scaling = 1000.0 / face.units_per_em() as f32;
        descriptor.bbox(pdf_writer::Rect {
            x1: 0.0,
            y1: 0.0,
            x2: max_width as f32 * scaling,
            y2: max_height as f32 * scaling,
        });
        descriptor.italic_angle(face.italic_angle());
        descriptor.ascent(face.ascender() as f32 * scaling);
        descriptor.descent(face.descender() as f32 * scaling);
        descriptor.leading(face.line_gap() as f32 * scaling);
        descriptor.cap_height(
            face.capital_height()
                .map(|h| h as f32 * scaling)
                .unwrap_or(1000.0),
        );
        descriptor.x_height(
            face.x_height()
                .unwrap_or_else(|| face.capital_height().unwrap_or_default()) as f32
                * scaling,
        );
        // no stem width in the font tables, so use the common default
        descriptor.stem_v(80.0);
        descriptor.avg_width(avg_width * scaling);
        descriptor.max_width(max_width as f32 * scaling);
        descriptor.missing_width(max_width as f32 * scaling);

        descriptor.font_file2(font_data_stream_id);

        id
    }

    fn glyph_ids(&self) -> HashMap<u16, char> {
        let mut map: HashMap<u16, char> = HashMap::new();

        let Some(cmap) = self.face.as_face_ref().tables().cmap else {
            return map;
        };

        for subtable in cmap.subtables.into_iter().filter(|table| table.is_unicode()) {
            subtable.codepoints(|codepoint: u32| {
                if let Ok(ch) = char::try_from(codepoint) {
                    if let Some(index) = subtable.glyph_index(codepoint).filter(|index| index.0 > 0) {
                        map.entry(index.0).or_insert(ch);
                    }
                }
            });
        }

        map
    }

    fn glyphs_sizing(&self, ids: &HashMap<u16, char>) -> HashMap<u16, (char, (u16, i16))> {
        let face = self.face.as_face_ref();
        let mut ids_augmented: HashMap<u16, (char, (u16, i16))> = HashMap::new();
        for (&id, &ch) in ids.iter() {
            if let Some(gid) = face.glyph_index(ch) {
                if let Some(h_advance) = face.glyph_hor_advance(gid) {
                    let height = face
                        .glyph_bounding_box(gid)
                        .map(|bbox| bbox.y_max - bbox.y_min - face.descender())
                        .unwrap_or(1000);
                    ids_augmented.insert(id, (ch, (h_advance, height)));
                }
            }
        }
        ids_augmented
    }

    /// The `ToUnicode` CMap mapping every glyph id back to its character
    fn to_unicode_cmap(&self) -> String {
        let mut map: String = r#"/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo
<< /Registry (Adobe)
/Ordering (UCS) /Supplement 0 >> def
/CMapName /Adobe-Identity-UCS def
/CMapType 2 def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
"#
        .replace("\r\n", "\n");

        let mut ids: Vec<(u16, char)> = self.glyph_ids().into_iter().collect();
        ids.sort_by_key(|&(id, _)| id);

        // bfchar blocks hold at most 100 entries sharing a high byte
        let mut cmap_blocks: Vec<Vec<(u16, char)>> = Vec::new();
        let mut current_block: Vec<(u16, char)> = Vec::new();
        let mut high_byte: u8 = 0;
        for &(id, ch) in ids.iter() {
            if (id >> 8) as u8 != high_byte || current_block.len() >= 100 {
                if !current_block.is_empty() {
                    cmap_blocks.push(std::mem::take(&mut current_block));
                }
                high_byte = (id >> 8) as u8;
            }

            current_block.push((id, ch));
        }
        if !current_block.is_empty() {
            cmap_blocks.push(current_block);
        }

        for block in cmap_blocks.into_iter() {
            map.push_str(&format!("{} beginbfchar\n", block.len()));
            for (id, ch) in block.into_iter() {
                let mut utf16 = [0u16; 2];
                let units: String = ch
                    .encode_utf16(&mut utf16)
                    .iter()
                    .map(|u| format!("{u:04x}"))
                    .collect();
                map.push_str(&format!("<{id:04x}> <{units}>\n"));
            }
            map.push_str("endbfchar\n");
        }

        map.push_str("endcmap CMapName currentdict /CMap defineresource pop end end\n");
        map
    }

    fn write_to_unicode(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) -> Ref {
        let id = refs.gen(RefType::ToUnicode(font_index));

        let map = self.to_unicode_cmap();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
            map.as_bytes(),
            miniz_oxide::deflate::CompressionLevel::DefaultCompression as u8,
        );
        let mut stream = writer.stream(id, compressed.as_slice());
        stream.filter(pdf_writer::Filter::FlateDecode);

        id
    }

    fn write(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) -> Result<()> {
        let font_id = refs.gen(RefType::Font(font_index));
        let cid_font_id = self.write_cid(refs, font_index, writer)?;
        let to_unicode_id = self.write_to_unicode(refs, font_index, writer);

        let mut font = writer.type0_font(font_id);
        font.base_font(Name(format!("F{font_index}").as_bytes()));
        font.encoding_predefined(Name(b"Identity-H"));
        font.descendant_font(cid_font_id);
        font.to_unicode(to_unicode_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_encodes_to_itself() {
        let font = Font::builtin(BuiltinFont::Helvetica);
        let encoded = font.encode("POST /api/payments").expect("can encode");
        assert_eq!(encoded.bytes, b"POST /api/payments".to_vec());
        assert_eq!(encoded.substitutions, 0);
    }

    #[test]
    fn typographic_quotes_use_winansi_codes() {
        let font = Font::builtin(BuiltinFont::Helvetica);
        let encoded = font.encode("“Proceed” provider’s").expect("can encode");
        assert_eq!(encoded.bytes[0], 0x93);
        assert_eq!(encoded.bytes[8], 0x94);
        assert_eq!(encoded.bytes[18], 0x92);
        assert_eq!(encoded.substitutions, 0);
    }

    #[test]
    fn unencodable_characters_are_substituted() {
        let font = Font::builtin(BuiltinFont::Courier);
        let encoded = font.encode("Review → Payment").expect("can encode");
        assert_eq!(encoded.bytes, b"Review ? Payment".to_vec());
        assert_eq!(encoded.substitutions, 1);
    }

    #[test]
    fn tabs_expand_to_spaces() {
        let font = Font::builtin(BuiltinFont::Helvetica);
        let encoded = font.encode("\tx").expect("can encode");
        assert_eq!(encoded.bytes, b"    x".to_vec());
    }

    #[test]
    fn latin1_passes_through() {
        assert_eq!(winansi_byte('é'), Some(0xe9));
        assert_eq!(winansi_byte('€'), Some(0x80));
        assert_eq!(winansi_byte('\u{7f}'), None);
        assert_eq!(winansi_byte('\n'), None);
    }

    #[test]
    fn garbage_bytes_are_not_a_font() {
        assert!(matches!(
            Font::load(vec![0, 1, 2, 3]),
            Err(Error::Font(_))
        ));
    }

    const MONO: &[u8] = include_bytes!("../tests/assets/DejaVuSansMono.ttf");

    fn mono() -> EmbeddedFont {
        match Font::load(MONO.to_vec()).expect("can load font") {
            Font::Embedded(font) => font,
            Font::Builtin(_) => unreachable!(),
        }
    }

    #[test]
    fn embedded_font_encodes_glyph_ids() {
        let font = mono();
        let arrow = font.glyph_id('→').expect("font has an arrow");
        let x = font.glyph_id('x').expect("font has x");

        let encoded = Font::Embedded(mono()).encode("→x").expect("can encode");
        assert_eq!(encoded.bytes, [arrow.to_be_bytes(), x.to_be_bytes()].concat());
        assert_eq!(encoded.substitutions, 0);

        let encoded = Font::Embedded(mono()).encode("Review → x").expect("can encode");
        assert_eq!(encoded.bytes.len(), 20);
        assert_eq!(encoded.substitutions, 0);
    }

    #[test]
    fn embedded_font_replaces_missing_glyphs() {
        let font = mono();
        assert_eq!(font.glyph_id('漢'), None);
        let replacement = font
            .replacement_glyph_id()
            .or_else(|| font.glyph_id('?'))
            .expect("font has a replacement glyph");
        let a = font.glyph_id('a').expect("font has a");

        let encoded = Font::Embedded(mono()).encode("a漢").expect("can encode");
        assert_eq!(encoded.bytes, [a.to_be_bytes(), replacement.to_be_bytes()].concat());
        assert_eq!(encoded.substitutions, 1);
    }

    #[test]
    fn glyph_encoding_fails_without_a_fallback() {
        let lookup = |ch: char| (ch == 'a').then_some(7u16);

        let encoded = encode_glyphs("a漢", lookup, Some(3)).expect("fallback exists");
        assert_eq!(encoded.bytes, vec![0, 7, 0, 3]);
        assert_eq!(encoded.substitutions, 1);

        assert_eq!(encode_glyphs("aa漢b", lookup, None), Err('漢'));
    }

    #[test]
    fn widths_are_grouped_into_consecutive_runs() {
        let runs = width_runs(&[(3, 600.0), (4, 600.0), (5, 500.0), (9, 250.0), (10, 250.0), (12, 1.0)]);
        assert_eq!(
            runs,
            vec![
                (3, vec![600.0, 600.0, 500.0]),
                (9, vec![250.0, 250.0]),
                (12, vec![1.0]),
            ]
        );
        assert!(width_runs(&[]).is_empty());
    }

    #[test]
    fn to_unicode_maps_glyphs_back_to_characters() {
        let font = mono();
        let cmap = font.to_unicode_cmap();
        let arrow = font.glyph_id('→').expect("font has an arrow");

        assert!(cmap.starts_with("/CIDInit /ProcSet findresource begin"));
        assert!(cmap.contains(&format!("<{arrow:04x}> <2192>\n")));
        assert!(cmap.ends_with("defineresource pop end end\n"));
        let counts: Vec<usize> = cmap
            .lines()
            .filter_map(|line| line.strip_suffix(" beginbfchar"))
            .map(|count| count.parse().expect("block size"))
            .collect();
        assert!(!counts.is_empty());
        assert!(counts.iter().all(|&count| count <= 100));
        assert_eq!(counts.iter().sum::<usize>(), font.glyph_ids().len());
    }

    #[test]
    fn embedded_font_writes_a_type0_font() {
        let mut arena: id_arena::Arena<Font> = id_arena::Arena::new();
        let id = arena.alloc(Font::Embedded(mono()));
        let mut refs = ObjectReferences::new();
        let mut pdf = Pdf::new();
        arena[id].write(&mut refs, id, &mut pdf).expect("can write font");

        let bytes = pdf.finish();
        let pdf = String::from_utf8_lossy(&bytes);
        assert!(pdf.contains("/Subtype /Type0"));
        assert!(pdf.contains("/Encoding /Identity-H"));
        assert!(pdf.contains("/Subtype /CIDFontType2"));
        assert!(pdf.contains("/CIDToGIDMap /Identity"));
        assert!(pdf.contains("/ToUnicode"));
        assert!(pdf.contains("/Filter /FlateDecode"));
        assert!(pdf.contains("/FontFile2"));
        assert!(pdf.contains("/Flags 33"));
    }

    #[test]
    fn builtin_names_match_postscript_names() {
        assert_eq!(BuiltinFont::default().base_font(), "Helvetica");
        assert_eq!(BuiltinFont::TimesBoldItalic.base_font(), "Times-BoldItalic");
        assert_eq!(Font::builtin(BuiltinFont::CourierBold).name(), "Courier-Bold");
    }
}
