//! Markdown renderer implementation.

use super::image::{data_uri, image_tag, save_image};
use super::{CodeStyle, RenderOptions};
use crate::cleanup::{escape_html, strip_ansi};
use crate::model::{Cell, MimeBundle, MimeType, Notebook, Output, DEFAULT_LANGUAGE};

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;

/// Title used when a notebook carries none.
pub const UNTITLED: &str = "Untitled";

/// Label emitted between a code cell's source and its outputs.
const OUTPUT_LABEL: &str = "**Output:**";

/// Separator emitted between non-empty cells.
const CELL_SEPARATOR: &str = "\n---\n";

/// A non-fatal problem encountered while rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderWarning {
    /// Image filename that could not be saved
    pub image: String,
    /// Underlying error message
    pub message: String,
}

impl fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Could not save image {}: {}", self.image, self.message)
    }
}

/// Markdown produced for a single cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    /// Rendered Markdown
    pub markdown: String,
    /// Number of image files written while rendering this cell
    pub images_written: usize,
}

impl Fragment {
    /// Returns true if the fragment contributes nothing to the document.
    pub fn is_blank(&self) -> bool {
        self.markdown.trim().is_empty()
    }
}

/// A fully rendered notebook.
#[derive(Debug, Clone, Default)]
pub struct Rendered {
    /// Final Markdown text
    pub markdown: String,
    /// Number of image files written
    pub images_written: usize,
    /// Image filenames claimed while rendering, including failed ones
    pub image_files: Vec<String>,
    /// Image fallbacks that were applied
    pub warnings: Vec<RenderWarning>,
}

/// Per-document rendering state.
///
/// Image filenames and HTML element ids come from counters in here, so a
/// context must not be shared between documents. Names already taken by
/// other documents of the same run can be reserved so they are skipped.
#[derive(Debug)]
pub struct RenderContext {
    language: String,
    next_image: usize,
    next_code_id: usize,
    images_written: usize,
    reserved_images: HashSet<String>,
    image_files: Vec<String>,
    warnings: Vec<RenderWarning>,
}

impl RenderContext {
    /// Creates a context for a document written in `language`.
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            next_image: 0,
            next_code_id: 0,
            images_written: 0,
            reserved_images: HashSet::new(),
            image_files: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Marks image filenames as taken.
    pub fn reserve_images<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved_images.extend(names.into_iter().map(Into::into));
    }

    /// Returns the code fence language.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Returns the warnings collected so far.
    pub fn warnings(&self) -> &[RenderWarning] {
        &self.warnings
    }

    /// Returns the next unreserved `{stem}_image_{n}.{extension}` name.
    fn next_image_name(&mut self, stem: &str, extension: &str) -> String {
        loop {
            let name = format!("{}_image_{}.{}", stem, self.next_image, extension);
            self.next_image += 1;
            if !self.reserved_images.contains(&name) {
                self.image_files.push(name.clone());
                return name;
            }
        }
    }

    fn next_code_id(&mut self) -> usize {
        let id = self.next_code_id;
        self.next_code_id += 1;
        id
    }
}

/// Markdown renderer.
#[derive(Debug)]
pub struct MarkdownRenderer {
    options: RenderOptions,
    image_dir_name: Option<String>,
}

impl MarkdownRenderer {
    /// Creates a new renderer with the given options.
    pub fn new(options: RenderOptions) -> Self {
        let image_dir_name = options.image_dir_name();
        Self {
            options,
            image_dir_name,
        }
    }

    /// Creates a fresh context for rendering `notebook`.
    pub fn context_for(&self, notebook: &Notebook) -> RenderContext {
        let language = self
            .options
            .language
            .as_deref()
            .or_else(|| notebook.language())
            .unwrap_or(DEFAULT_LANGUAGE);
        RenderContext::new(language)
    }

    /// Renders a notebook to a Markdown document.
    pub fn render(&self, notebook: &Notebook) -> Rendered {
        self.render_in(notebook, self.context_for(notebook))
    }

    /// Renders a notebook using a prepared context.
    pub fn render_in(&self, notebook: &Notebook, mut ctx: RenderContext) -> Rendered {
        let title = notebook.title().unwrap_or(UNTITLED);

        let mut parts = vec![format!("# {}\n", title)];
        let mut first = true;

        for cell in &notebook.cells {
            let fragment = self.render_cell(cell, &mut ctx);
            if fragment.is_blank() {
                continue;
            }
            if !first {
                parts.push(CELL_SEPARATOR.to_string());
            }
            parts.push(fragment.markdown);
            first = false;
        }

        Rendered {
            markdown: parts.join("\n"),
            images_written: ctx.images_written,
            image_files: ctx.image_files,
            warnings: ctx.warnings,
        }
    }

    /// Renders a single cell.
    ///
    /// Image payloads are written to the configured directory as a side effect.
    pub fn render_cell(&self, cell: &Cell, ctx: &mut RenderContext) -> Fragment {
        let images_before = ctx.images_written;

        let markdown = match cell {
            Cell::Markdown { source } => source.clone(),
            Cell::Raw { source } => fenced("", source),
            Cell::Code { source, outputs } => self.render_code_cell(source, outputs, ctx),
            Cell::Unknown => String::new(),
        };

        Fragment {
            markdown,
            images_written: ctx.images_written - images_before,
        }
    }

    fn render_code_cell(&self, source: &str, outputs: &[Output], ctx: &mut RenderContext) -> String {
        let mut parts = vec![self.render_source(source, ctx)];

        if !outputs.is_empty() {
            parts.push(format!("\n{}", OUTPUT_LABEL));
            for output in outputs {
                self.render_output(output, ctx, &mut parts);
            }
        }

        parts.join("\n")
    }

    fn render_source(&self, source: &str, ctx: &mut RenderContext) -> String {
        match self.options.code_style {
            CodeStyle::Fenced => fenced(&ctx.language, source),
            CodeStyle::Html => {
                let id = format!("code-cell-{}", ctx.next_code_id());
                format!(
                    concat!(
                        r#"<div class="code-cell" style="position:relative;">"#,
                        r#"<button class="copy-btn" style="position:absolute; top:8px; right:8px;" "#,
                        r#"onclick="navigator.clipboard.writeText(document.getElementById('{id}').innerText); this.blur();">Copy</button>"#,
                        r#"<pre id="{id}"><code class="language-{lang}">{code}</code></pre>"#,
                        "</div>"
                    ),
                    id = id,
                    lang = escape_html(&ctx.language),
                    code = escape_html(source),
                )
            }
        }
    }

    fn render_output(&self, output: &Output, ctx: &mut RenderContext, parts: &mut Vec<String>) {
        match output {
            Output::Stream { text } => {
                parts.push(format!("\n{}", fenced("", &self.clean(text))));
            }
            Output::Result(bundle) => self.render_bundle(bundle, ctx, parts),
            Output::Error {
                ename,
                evalue,
                traceback,
            } => {
                parts.push(format!("\n**Error: {}**", ename));

                let mut body = vec![self.clean(evalue).into_owned()];
                if !traceback.is_empty() {
                    let lines: Vec<_> = traceback.iter().map(|line| self.clean(line)).collect();
                    body.push(lines.join("\n"));
                }
                let fence = fence_for(&body.concat());
                parts.push(format!("{}\n{}", fence, body[0]));
                parts.extend(body.into_iter().skip(1));
                parts.push(fence);
            }
            Output::Unknown => {}
        }
    }

    fn render_bundle(&self, bundle: &MimeBundle, ctx: &mut RenderContext, parts: &mut Vec<String>) {
        for (mime, payload) in bundle.iter() {
            let rendered = match mime {
                MimeType::TextPlain => fenced("", &self.clean(payload)),
                MimeType::TextHtml | MimeType::ImageSvg => payload.to_string(),
                MimeType::TextLatex => format!("$\n{}\n$", payload),
                MimeType::ImagePng | MimeType::ImageJpeg => self.render_image(mime, payload, ctx),
            };
            parts.push(format!("\n{}", rendered));
        }
    }

    fn render_image(&self, mime: MimeType, payload: &str, ctx: &mut RenderContext) -> String {
        let (Some(dir), Some(dir_name), Some(extension)) = (
            self.options.image_dir.as_deref(),
            self.image_dir_name.as_deref(),
            mime.extension(),
        ) else {
            return image_tag(&data_uri(mime, payload));
        };

        let filename = ctx.next_image_name(&self.options.image_stem, extension);

        match save_image(dir, &filename, payload) {
            Ok(()) => {
                log::debug!("Saved image to {}", dir.join(&filename).display());
                ctx.images_written += 1;
                image_tag(&format!("{}/{}", dir_name, filename))
            }
            Err(e) => {
                log::warn!("Could not save image {}: {}", filename, e);
                ctx.warnings.push(RenderWarning {
                    image: filename,
                    message: e.to_string(),
                });
                image_tag(&data_uri(mime, payload))
            }
        }
    }

    fn clean<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.options.strip_ansi {
            strip_ansi(text)
        } else {
            Cow::Borrowed(text)
        }
    }
}

/// Wraps `body` in a fenced code block.
fn fenced(info: &str, body: &str) -> String {
    let fence = fence_for(body);
    format!("{}{}\n{}\n{}", fence, info, body, fence)
}

/// Returns a backtick fence longer than any backtick run in `body`.
fn fence_for(body: &str) -> String {
    let longest = body
        .split(|c: char| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat(longest.max(2) + 1)
}
