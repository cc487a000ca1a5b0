//! Markdown rendering for notebooks.

mod image;
mod markdown;
mod options;

pub use image::decode_payload;
pub use markdown::{Fragment, MarkdownRenderer, RenderContext, RenderWarning, Rendered, UNTITLED};
pub use options::{CodeStyle, RenderOptions};

use crate::error::Result;
use crate::model::Notebook;
use std::io::Write;
use std::path::Path;

/// Renders a notebook to Markdown.
pub fn render_markdown(notebook: &Notebook, options: &RenderOptions) -> Rendered {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render(notebook)
}

/// Renders a notebook to Markdown and writes to a file.
pub fn render_to_file(
    notebook: &Notebook,
    path: impl AsRef<Path>,
    options: &RenderOptions,
) -> Result<Rendered> {
    let rendered = render_markdown(notebook, options);
    std::fs::write(path, &rendered.markdown)?;
    Ok(rendered)
}

/// Renders a notebook to Markdown and writes to a writer.
pub fn render_to_writer<W: Write>(
    notebook: &Notebook,
    writer: &mut W,
    options: &RenderOptions,
) -> Result<Rendered> {
    let rendered = render_markdown(notebook, options);
    writer.write_all(rendered.markdown.as_bytes())?;
    Ok(rendered)
}
