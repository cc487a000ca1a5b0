//! # unipynb
//!
//! A Rust library for converting Jupyter notebooks (`.ipynb`) into a single
//! Markdown document, with embedded output images extracted to files.
//!
//! ## Rendering
//!
//! - **Markdown cells**: passed through unmodified
//! - **Code cells**: fenced source, then an `Output` section with streams,
//!   results (`text/plain`, `text/html`, `text/latex`, `image/png`,
//!   `image/jpeg`, `image/svg+xml`) and errors
//! - **Raw cells**: plain fenced block
//!
//! HTML, SVG and LaTeX outputs are emitted verbatim; notebooks are assumed to
//! come from a trusted local execution.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unipynb::{parse_file, RenderOptions};
//!
//! fn main() -> unipynb::Result<()> {
//!     // Parse a notebook
//!     let notebook = parse_file("analysis.ipynb")?;
//!
//!     // Render to Markdown, extracting images into ./images
//!     let options = RenderOptions::default().with_image_dir("images");
//!     let rendered = unipynb::render::render_markdown(&notebook, &options);
//!
//!     println!("{}", rendered.markdown);
//!     Ok(())
//! }
//! ```

pub mod cleanup;
pub mod convert;
pub mod error;
pub mod model;
pub mod render;

// Re-exports
pub use convert::{
    convert_file, default_image_dir, default_output_path, BatchConverter, ConversionReport,
    ConvertOptions,
};
pub use error::{Error, Result};
pub use model::{Cell, MimeBundle, MimeType, Notebook, Output};
pub use render::{CodeStyle, Rendered, RenderOptions, RenderWarning};

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parses a notebook from a file path.
///
/// The title defaults to the file name without its extension when the
/// notebook metadata carries none.
///
/// # Example
///
/// ```no_run
/// use unipynb::parse_file;
///
/// let notebook = parse_file("analysis.ipynb")?;
/// println!("Cells: {}", notebook.cells.len());
/// # Ok::<(), unipynb::Error>(())
/// ```
pub fn parse_file(path: impl AsRef<Path>) -> Result<Notebook> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
        _ => Error::Io(e),
    })?;

    let mut notebook = parse_bytes(&data)?;
    if let Some(stem) = path.file_stem() {
        notebook.set_default_title(stem.to_string_lossy());
    }
    Ok(notebook)
}

/// Parses a notebook from bytes.
pub fn parse_bytes(data: &[u8]) -> Result<Notebook> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    Ok(serde_json::from_slice(data)?)
}

/// Parses a notebook from a string.
pub fn parse_str(json: &str) -> Result<Notebook> {
    parse_bytes(json.as_bytes())
}

/// Converts a notebook to Markdown with default options.
///
/// Images are embedded inline; nothing is written to disk.
///
/// # Example
///
/// ```no_run
/// use unipynb::to_markdown;
///
/// let markdown = to_markdown("analysis.ipynb")?;
/// std::fs::write("analysis.md", markdown)?;
/// # Ok::<(), unipynb::Error>(())
/// ```
pub fn to_markdown(path: impl AsRef<Path>) -> Result<String> {
    to_markdown_with_options(path, &RenderOptions::default())
}

/// Converts a notebook to Markdown with custom options.
///
/// # Example
///
/// ```no_run
/// use unipynb::{to_markdown_with_options, CodeStyle, RenderOptions};
///
/// let options = RenderOptions::default()
///     .with_image_dir("./images")
///     .with_code_style(CodeStyle::Html)
///     .with_strip_ansi();
///
/// let markdown = to_markdown_with_options("analysis.ipynb", &options)?;
/// std::fs::write("analysis.md", markdown)?;
/// # Ok::<(), unipynb::Error>(())
/// ```
pub fn to_markdown_with_options(path: impl AsRef<Path>, options: &RenderOptions) -> Result<String> {
    let notebook = parse_file(path)?;
    Ok(render::render_markdown(&notebook, options).markdown)
}

/// Builder for parsing and rendering notebooks.
///
/// Provides a fluent API for configuring notebook processing.
///
/// # Example
///
/// ```no_run
/// use unipynb::Unipynb;
///
/// let markdown = Unipynb::new()
///     .with_image_dir("./images")
///     .strip_ansi()
///     .parse("analysis.ipynb")?
///     .to_markdown()?;
/// # Ok::<(), unipynb::Error>(())
/// ```
pub struct Unipynb {
    render_options: RenderOptions,
}

impl Default for Unipynb {
    fn default() -> Self {
        Self::new()
    }
}

impl Unipynb {
    /// Creates a new Unipynb builder with default settings.
    pub fn new() -> Self {
        Self {
            render_options: RenderOptions::default(),
        }
    }

    /// Sets the directory for extracted images.
    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.render_options.image_dir = Some(dir.into());
        self
    }

    /// Embeds images inline instead of extracting them.
    pub fn embed_images(mut self) -> Self {
        self.render_options.image_dir = None;
        self
    }

    /// Overrides the code fence language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.render_options.language = Some(language.into());
        self
    }

    /// Renders code cells as HTML blocks with a copy button.
    pub fn html_code(mut self) -> Self {
        self.render_options.code_style = CodeStyle::Html;
        self
    }

    /// Removes ANSI escape sequences from streams and tracebacks.
    pub fn strip_ansi(mut self) -> Self {
        self.render_options.strip_ansi = true;
        self
    }

    /// Parses a notebook from a file path.
    ///
    /// Extracted images are named after the file stem.
    pub fn parse(mut self, path: impl AsRef<Path>) -> Result<ParsedNotebook> {
        let path = path.as_ref();
        let notebook = parse_file(path)?;
        if let Some(stem) = path.file_stem() {
            self.render_options.image_stem = stem.to_string_lossy().into_owned();
        }
        Ok(ParsedNotebook {
            notebook,
            render_options: self.render_options,
        })
    }
}

/// A parsed notebook ready for rendering.
pub struct ParsedNotebook {
    notebook: Notebook,
    render_options: RenderOptions,
}

impl ParsedNotebook {
    /// Returns a reference to the underlying notebook.
    pub fn notebook(&self) -> &Notebook {
        &self.notebook
    }

    /// Renders the notebook, creating the image directory if needed.
    pub fn render(&self) -> Result<Rendered> {
        if let Some(ref image_dir) = self.render_options.image_dir {
            std::fs::create_dir_all(image_dir)?;
        }
        Ok(render::render_markdown(&self.notebook, &self.render_options))
    }

    /// Renders the notebook to Markdown.
    pub fn to_markdown(&self) -> Result<String> {
        Ok(self.render()?.markdown)
    }

    /// Renders the notebook and writes the Markdown to `path`.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<Rendered> {
        let rendered = self.render()?;
        std::fs::write(path, &rendered.markdown)?;
        Ok(rendered)
    }

    /// Returns the number of cells in the notebook.
    pub fn cell_count(&self) -> usize {
        self.notebook.cells.len()
    }

    /// Consumes self and returns the underlying notebook.
    pub fn into_notebook(self) -> Notebook {
        self.notebook
    }
}
