//! Rendering options for Markdown output.

use std::path::PathBuf;

/// Options for Markdown rendering.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Directory to save extracted images.
    /// If None, images are embedded as base64 data URIs.
    pub image_dir: Option<PathBuf>,

    /// Filename stem for extracted images (`{stem}_image_{n}.png`).
    /// Default: "notebook"
    pub image_stem: String,

    /// Language tag for code fences.
    /// If None, the notebook's kernel language is used.
    pub language: Option<String>,

    /// How code cell sources are rendered.
    pub code_style: CodeStyle,

    /// Whether to remove ANSI escape sequences from streams and tracebacks.
    pub strip_ansi: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            image_dir: None,
            image_stem: "notebook".to_string(),
            language: None,
            code_style: CodeStyle::Fenced,
            strip_ansi: false,
        }
    }
}

impl RenderOptions {
    /// Creates new options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the image output directory.
    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.image_dir = Some(dir.into());
        self
    }

    /// Embeds images inline instead of writing them to a directory.
    pub fn with_embedded_images(mut self) -> Self {
        self.image_dir = None;
        self
    }

    /// Sets the filename stem for extracted images.
    pub fn with_image_stem(mut self, stem: impl Into<String>) -> Self {
        self.image_stem = stem.into();
        self
    }

    /// Overrides the code fence language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the code cell style.
    pub fn with_code_style(mut self, style: CodeStyle) -> Self {
        self.code_style = style;
        self
    }

    /// Enables ANSI escape stripping.
    pub fn with_strip_ansi(mut self) -> Self {
        self.strip_ansi = true;
        self
    }

    /// Returns the name used for the image directory in Markdown references.
    ///
    /// A directory without a final component (`.`, `/`) falls back to
    /// `images`, which will not match where the files are written.
    pub fn image_dir_name(&self) -> Option<String> {
        self.image_dir.as_ref().map(|dir| match dir.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => {
                log::warn!(
                    "Image directory '{}' has no name; image links will point to 'images/'",
                    dir.display()
                );
                "images".to_string()
            }
        })
    }
}

/// Rendering styles for code cell sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeStyle {
    /// Fenced code block tagged with the source language.
    #[default]
    Fenced,
    /// HTML `<pre><code>` block with a copy button.
    Html,
}
