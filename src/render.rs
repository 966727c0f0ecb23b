use crate::{
    config::RenderConfig,
    document::Document,
    error::{Error, Result},
    layout::Paginator,
    page::SpanFont,
    units::Pt,
};
use std::{
    io::Write,
    path::{Path, PathBuf},
};

/// Where the binary writes the rendered overview, relative to the working directory
pub const DEFAULT_OUTPUT: &str = "docs/payment_gateway_overview.pdf";

/// What a successful render produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSummary {
    pub path: PathBuf,
    pub lines: usize,
    pub pages: usize,
    pub bytes: usize,
}

/// Renders lines of text to paginated PDF files according to a [RenderConfig].
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    config: RenderConfig,
    title: Option<String>,
}

impl Renderer {
    /// Validates the configuration up front, so rendering can only fail on fonts,
    /// drawing, or storage
    pub fn new(config: RenderConfig) -> Result<Renderer> {
        config.validate()?;
        Ok(Renderer {
            config,
            title: None,
        })
    }

    /// Title to record in the document metadata when the configuration has none
    pub fn with_default_title<S: ToString>(mut self, title: S) -> Renderer {
        self.title = Some(title.to_string());
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Build the in-memory document for `lines` without touching storage
    pub fn layout<S: AsRef<str>>(&self, lines: &[S]) -> Result<Document> {
        let mut document = Document::default();
        document.set_info(self.config.info(self.title.as_deref()));

        let font = self.config.font()?;
        log::debug!("drawing with {} at {}pt", font.name(), self.config.font_size);
        let font = document.add_font(font);

        let paginator = Paginator::new(
            self.config.page_size()?,
            self.config.margins(),
            Pt(self.config.line_pitch),
            SpanFont {
                id: font,
                size: Pt(self.config.font_size),
            },
        )?
        .with_colour(self.config.colour());

        let pages = paginator.paginate(&mut document, lines);
        log::debug!(
            "laid out {} lines on {pages} pages ({} lines per page)",
            lines.len(),
            paginator.lines_per_page()
        );
        Ok(document)
    }

    /// Lay out `lines`, finalize the document, and persist it at `destination`.
    ///
    /// The parent directory is created if missing. The file is written to a temporary
    /// sibling and moved into place only once complete, so on failure `destination`
    /// is either untouched or absent, never truncated.
    pub fn render_to_path<S, P>(&self, lines: &[S], destination: P) -> Result<RenderSummary>
    where
        S: AsRef<str>,
        P: AsRef<Path>,
    {
        let destination = destination.as_ref();
        let document = self.layout(lines)?;
        let pages = document.page_count();
        let bytes = document.finalize()?;

        persist(&bytes, destination)?;
        log::info!(
            "wrote {} ({pages} pages, {} bytes)",
            destination.display(),
            bytes.len()
        );

        Ok(RenderSummary {
            path: destination.to_path_buf(),
            lines: lines.len(),
            pages,
            bytes: bytes.len(),
        })
    }
}

fn persist(bytes: &[u8], destination: &Path) -> Result<()> {
    let parent = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(|e| Error::storage(parent, e))?;

    // the temporary file is removed on drop unless persisted
    let mut file = tempfile::NamedTempFile::new_in(parent).map_err(|e| Error::storage(parent, e))?;
    file.write_all(bytes)
        .and_then(|_| file.as_file().sync_all())
        .map_err(|e| Error::storage(file.path(), e))?;
    file.persist(destination)
        .map_err(|e| Error::storage(destination, e.error))?;
    Ok(())
}
