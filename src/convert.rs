//! Whole-file conversion: path resolution, rendering, and the final write.

use crate::error::{Error, Result};
use crate::render::{MarkdownRenderer, RenderOptions, RenderWarning};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of converted documents.
pub const MARKDOWN_EXTENSION: &str = "md";

/// Name of the default image directory, created next to the output file.
pub const DEFAULT_IMAGE_DIR: &str = "images";

/// Options for converting notebook files.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Explicit output path. Only valid when converting a single notebook.
    pub output: Option<PathBuf>,

    /// Explicit image directory.
    /// Default: `images` next to the output file.
    pub image_dir: Option<PathBuf>,

    /// Embed images as data URIs instead of extracting them.
    pub embed_images: bool,

    /// Rendering options. Its `image_dir` and `image_stem` are set per file.
    pub render: RenderOptions,
}

impl ConvertOptions {
    /// Creates new options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the output path.
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Sets the image directory.
    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.image_dir = Some(dir.into());
        self
    }

    /// Embeds images inline instead of writing files.
    pub fn with_embedded_images(mut self) -> Self {
        self.embed_images = true;
        self
    }

    /// Sets the rendering options.
    pub fn with_render_options(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }

    /// Checks that extracted images can be referenced from the Markdown.
    ///
    /// Image links use the directory's final component, so paths like `.`
    /// or `/` are rejected.
    pub fn validate_image_dir(&self) -> Result<()> {
        match self.image_dir {
            Some(ref dir) if !self.embed_images && dir.file_name().is_none() => {
                Err(Error::InvalidOptions(format!(
                    "Image directory '{}' must end in a directory name",
                    dir.display()
                )))
            }
            _ => Ok(()),
        }
    }

    /// Checks that these options can be used for a batch of `count` notebooks.
    pub fn validate_batch(&self, count: usize) -> Result<()> {
        self.validate_image_dir()?;
        if count > 1 && self.output.is_some() {
            return Err(Error::InvalidOptions(
                "Cannot specify output file when converting multiple notebooks".into(),
            ));
        }
        Ok(())
    }

    /// Returns the output path for `input`.
    pub fn output_for(&self, input: &Path) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(input))
    }

    /// Returns the image directory for `output`, or None when embedding.
    pub fn image_dir_for(&self, output: &Path) -> Option<PathBuf> {
        if self.embed_images {
            return None;
        }
        Some(
            self.image_dir
                .clone()
                .unwrap_or_else(|| default_image_dir(output)),
        )
    }
}

/// Summary of one converted notebook.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    /// Notebook that was read
    pub input: PathBuf,
    /// Markdown file that was written
    pub output: PathBuf,
    /// Directory images were extracted to, if extracting
    pub image_dir: Option<PathBuf>,
    /// Number of image files written
    pub images_written: usize,
    /// Image fallbacks that were applied
    pub warnings: Vec<RenderWarning>,
}

/// Returns `input` with its extension replaced by `.md`.
pub fn default_output_path(input: impl AsRef<Path>) -> PathBuf {
    input.as_ref().with_extension(MARKDOWN_EXTENSION)
}

/// Returns the `images` directory next to `output`.
pub fn default_image_dir(output: impl AsRef<Path>) -> PathBuf {
    output
        .as_ref()
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(DEFAULT_IMAGE_DIR)
}

/// Converts a notebook file to Markdown.
///
/// The Markdown is written once, after every cell has been rendered. Images
/// that cannot be decoded or saved are embedded inline and reported as
/// warnings; only loading and the final write can fail.
///
/// Use [`BatchConverter`] when several notebooks share an image directory.
///
/// # Example
///
/// ```no_run
/// use unipynb::{convert_file, ConvertOptions};
///
/// let report = convert_file("analysis.ipynb", &ConvertOptions::default())?;
/// println!("{} -> {}", report.input.display(), report.output.display());
/// # Ok::<(), unipynb::Error>(())
/// ```
pub fn convert_file(input: impl AsRef<Path>, options: &ConvertOptions) -> Result<ConversionReport> {
    BatchConverter::new(options).convert(input)
}

/// Converts several notebooks as one run.
///
/// Image filenames written by earlier notebooks stay reserved for the rest of
/// the run. Two notebooks with the same stem that share an image directory get
/// distinct image files.
///
/// # Example
///
/// ```no_run
/// use unipynb::{BatchConverter, ConvertOptions};
///
/// let options = ConvertOptions::new().with_image_dir("figures");
/// let mut converter = BatchConverter::new(&options);
/// for input in ["a/nb.ipynb", "b/nb.ipynb"] {
///     converter.convert(input)?;
/// }
/// # Ok::<(), unipynb::Error>(())
/// ```
#[derive(Debug)]
pub struct BatchConverter<'a> {
    options: &'a ConvertOptions,
    claimed_images: HashMap<PathBuf, HashSet<String>>,
}

impl<'a> BatchConverter<'a> {
    /// Creates a converter for one run.
    pub fn new(options: &'a ConvertOptions) -> Self {
        Self {
            options,
            claimed_images: HashMap::new(),
        }
    }

    /// Returns the options shared by the run.
    pub fn options(&self) -> &ConvertOptions {
        self.options
    }

    /// Converts one notebook, skipping image names claimed earlier in the run.
    pub fn convert(&mut self, input: impl AsRef<Path>) -> Result<ConversionReport> {
        let input = input.as_ref();
        self.options.validate_image_dir()?;
        let notebook = crate::parse_file(input)?;

        let output = self.options.output_for(input);
        let image_dir = self.options.image_dir_for(&output);
        log::debug!(
            "Converting {} ({} cells) to {}",
            input.display(),
            notebook.cells.len(),
            output.display()
        );

        let mut render = self.options.render.clone();
        render.image_dir = image_dir.clone();
        if let Some(stem) = output.file_stem() {
            render.image_stem = stem.to_string_lossy().into_owned();
        }
        let claim_key = match image_dir {
            Some(ref dir) => {
                fs::create_dir_all(dir)?;
                Some(fs::canonicalize(dir).unwrap_or_else(|_| dir.clone()))
            }
            None => None,
        };

        let renderer = MarkdownRenderer::new(render);
        let mut ctx = renderer.context_for(&notebook);
        if let Some(claimed) = claim_key.as_ref().and_then(|key| self.claimed_images.get(key)) {
            ctx.reserve_images(claimed.iter().cloned());
        }
        let rendered = renderer.render_in(&notebook, ctx);

        if let Some(key) = claim_key {
            self.claimed_images
                .entry(key)
                .or_default()
                .extend(rendered.image_files.iter().cloned());
        }
        fs::write(&output, &rendered.markdown)?;

        log::info!(
            "Converted '{}' to '{}' ({} images)",
            input.display(),
            output.display(),
            rendered.images_written
        );

        Ok(ConversionReport {
            input: input.to_path_buf(),
            output,
            image_dir,
            images_written: rendered.images_written,
            warnings: rendered.warnings,
        })
    }
}
