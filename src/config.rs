use crate::{
    colour::{colours, Colour},
    error::{Error, Result},
    font::{BuiltinFont, Font},
    info::Info,
    layout::{Cursor, Margins},
    pagesize::{self, PageOrientation, PageSize},
    units::Pt,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Everything that controls how lines are placed and drawn. The defaults are US Letter
/// paper, one inch margins, a 16pt line pitch and 12pt Helvetica in black.
///
/// Any subset of fields can be given in TOML; missing fields keep their defaults:
///
/// ```
/// use pdf_pager::RenderConfig;
///
/// let config = RenderConfig::from_toml_str(r#"
///     page_size = "a4"
///     line_pitch = 14.0
/// "#).expect("valid config");
/// assert_eq!(config.margin_top, 72.0);
/// assert_eq!(config.line_pitch, 14.0);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Named paper size, see [pagesize::by_name]
    pub page_size: String,
    pub landscape: bool,
    pub margin_top: f32,
    pub margin_right: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    /// Vertical distance between successive baselines, in points
    pub line_pitch: f32,
    pub font_size: f32,
    pub font: BuiltinFont,
    /// A TrueType / OpenType font to embed instead of `font`
    pub font_path: Option<PathBuf>,
    /// Text colour as RGB components in `0.0..=1.0`; black when unset
    pub colour: Option<[f32; 3]>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    /// Stamp the document with its creation time
    pub timestamp: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            page_size: "letter".to_string(),
            landscape: false,
            margin_top: 72.0,
            margin_right: 72.0,
            margin_bottom: 72.0,
            margin_left: 72.0,
            line_pitch: 16.0,
            font_size: 12.0,
            font: BuiltinFont::default(),
            font_path: None,
            colour: None,
            title: None,
            author: None,
            subject: None,
            keywords: None,
            timestamp: true,
        }
    }
}

impl RenderConfig {
    /// Parse and validate a TOML configuration
    pub fn from_toml_str(source: &str) -> Result<RenderConfig> {
        let config: RenderConfig = toml::from_str(source).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<RenderConfig> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        log::debug!("loaded render configuration from {}", path.display());
        Self::from_toml_str(&source)
    }

    /// Check that the configuration can lay out at least one line per page
    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.page_size()?;
        let margins = self.margins();
        if !margins.is_valid() {
            return Err(Error::Config(format!("margins must be non-negative, got {margins:?}")));
        }
        if !(self.line_pitch > 0.0 && self.line_pitch.is_finite()) {
            return Err(Error::Config(format!(
                "line_pitch must be positive, got {}",
                self.line_pitch
            )));
        }
        if !(self.font_size > 0.0 && self.font_size.is_finite()) {
            return Err(Error::Config(format!(
                "font_size must be positive, got {}",
                self.font_size
            )));
        }
        if !self.colour().is_valid() {
            return Err(Error::Config(format!(
                "colour components must lie in 0.0..=1.0, got {:?}",
                self.colour
            )));
        }
        if margins.left >= width || margins.left + margins.right > width {
            return Err(Error::Config(format!(
                "horizontal margins leave no room for text on a page {width}pt wide"
            )));
        }
        let capacity = Cursor::new(height - margins.top, margins.bottom, Pt(self.line_pitch)).capacity();
        if capacity == 0 {
            return Err(Error::Config(format!(
                "margins leave no room for a line on a page {height}pt high"
            )));
        }
        Ok(())
    }

    /// The resolved page size, turned to landscape if requested
    pub fn page_size(&self) -> Result<PageSize> {
        let size = pagesize::by_name(&self.page_size)
            .ok_or_else(|| Error::Config(format!("unknown page size {:?}", self.page_size)))?;
        Ok(if self.landscape { size.landscape() } else { size })
    }

    pub fn margins(&self) -> Margins {
        Margins::trbl(
            Pt(self.margin_top),
            Pt(self.margin_right),
            Pt(self.margin_bottom),
            Pt(self.margin_left),
        )
    }

    pub fn colour(&self) -> Colour {
        self.colour.map(Colour::from).unwrap_or(colours::BLACK)
    }

    /// The font lines are drawn with: the embedded `font_path` if set, otherwise the
    /// builtin `font`
    pub fn font(&self) -> Result<Font> {
        match &self.font_path {
            Some(path) => Font::load_file(path),
            None => Ok(Font::builtin(self.font)),
        }
    }

    /// Document metadata; `default_title` is used when no title is configured
    pub fn info(&self, default_title: Option<&str>) -> Info {
        let mut info = Info::new();
        if let Some(title) = self.title.as_deref().or(default_title) {
            info.title(title);
        }
        if let Some(author) = &self.author {
            info.author(author);
        }
        if let Some(subject) = &self.subject {
            info.subject(subject);
        }
        if let Some(keywords) = &self.keywords {
            info.keywords(keywords);
        }
        info.creation_date(self.timestamp);
        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_letter_layout() {
        let config = RenderConfig::default();
        config.validate().expect("defaults are valid");
        assert_eq!(config.page_size().expect("letter"), pagesize::LETTER);
        assert_eq!(config.margins(), Margins::all(Pt(72.0)));
        assert_eq!(config.line_pitch, 16.0);
        assert_eq!(config.colour(), colours::BLACK);
        assert!(matches!(config.font(), Ok(Font::Builtin(BuiltinFont::Helvetica))));
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(RenderConfig::from_toml_str("").expect("empty is fine"), RenderConfig::default());
    }

    #[test]
    fn toml_overrides_fields() {
        let config = RenderConfig::from_toml_str(
            r#"
            page_size = "A4"
            landscape = true
            font = "courier-bold"
            colour = [0.2, 0.2, 0.2]
            title = "Gateway"
            timestamp = false
            "#,
        )
        .expect("valid config");

        assert_eq!(config.page_size().expect("a4"), pagesize::A4.landscape());
        assert_eq!(config.font, BuiltinFont::CourierBold);
        assert_eq!(config.colour(), Colour::new_rgb(0.2, 0.2, 0.2));
        let info = config.info(Some("ignored"));
        assert_eq!(info.title.as_deref(), Some("Gateway"));
        assert!(!info.creation_date);
    }

    #[test]
    fn default_title_fills_in() {
        let info = RenderConfig::default().info(Some("Overview"));
        assert_eq!(info.title.as_deref(), Some("Overview"));
        assert!(info.creation_date);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        for source in [
            "page_size = \"b7\"",
            "line_pitch = 0.0",
            "line_pitch = -16.0",
            "font_size = 0.0",
            "margin_top = -1.0",
            "margin_top = 400.0\nmargin_bottom = 400.0",
            "margin_left = 612.0",
            "margin_left = 400.0\nmargin_right = 300.0",
            "colour = [2.0, 0.0, 0.0]",
            "font = \"comic-sans\"",
            "unknown_field = 1",
            "line_pitch = \"sixteen\"",
        ] {
            assert!(
                matches!(RenderConfig::from_toml_str(source), Err(Error::Config(_))),
                "accepted {source:?}"
            );
        }
    }

    #[test]
    fn horizontal_margins_follow_orientation() {
        let wide = "margin_left = 600.0\nmargin_right = 0.0";
        assert!(RenderConfig::from_toml_str(wide).is_err());
        let config = RenderConfig::from_toml_str(&format!("{wide}\nlandscape = true")).expect("fits landscape");
        assert_eq!(config.margins().left, Pt(600.0));

        let flush = RenderConfig::from_toml_str("margin_left = 300.0\nmargin_right = 312.0");
        assert!(flush.is_ok(), "margins may meet exactly: {flush:?}");
    }

    #[test]
    fn missing_config_file_is_a_config_error() {
        assert!(matches!(
            RenderConfig::load("/nonexistent/render.toml"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn missing_font_file_is_a_config_error() {
        let config = RenderConfig {
            font_path: Some(PathBuf::from("/nonexistent/font.ttf")),
            ..RenderConfig::default()
        };
        assert!(matches!(config.font(), Err(Error::Config(_))));
    }
}
