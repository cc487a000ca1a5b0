//! Cell and output definitions.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Text stored either as one string or as a list of line fragments.
///
/// Notebook writers split long text into fragments that each keep their
/// trailing newline, so joining them in order restores the original text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MultilineText {
    /// A single string
    Single(String),
    /// Ordered line fragments
    Lines(Vec<String>),
}

impl Default for MultilineText {
    fn default() -> Self {
        Self::Single(String::new())
    }
}

impl MultilineText {
    /// Returns the fragments concatenated in order.
    pub fn joined(&self) -> String {
        match self {
            Self::Single(text) => text.clone(),
            Self::Lines(lines) => lines.concat(),
        }
    }

    /// Extracts text from an arbitrary JSON value.
    ///
    /// Returns `None` unless the value is a string or an array of strings.
    fn from_value(value: &Value) -> Option<String> {
        match value {
            Value::String(text) => Some(text.clone()),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str())
                .collect::<Option<Vec<_>>>()
                .map(|parts| parts.concat()),
            _ => None,
        }
    }
}

impl From<&str> for MultilineText {
    fn from(text: &str) -> Self {
        Self::Single(text.to_string())
    }
}

/// A notebook cell.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawCell")]
pub enum Cell {
    /// Explanatory text, passed through unmodified
    Markdown { source: String },
    /// Executable source with the outputs of its last run
    Code { source: String, outputs: Vec<Output> },
    /// Raw text, shown in a plain fence
    Raw { source: String },
    /// Any other or missing `cell_type`
    Unknown,
}

impl Cell {
    /// Creates a markdown cell.
    pub fn markdown(source: impl Into<String>) -> Self {
        Cell::Markdown {
            source: source.into(),
        }
    }

    /// Creates a code cell.
    pub fn code(source: impl Into<String>, outputs: Vec<Output>) -> Self {
        Cell::Code {
            source: source.into(),
            outputs,
        }
    }

    /// Creates a raw cell.
    pub fn raw(source: impl Into<String>) -> Self {
        Cell::Raw {
            source: source.into(),
        }
    }

    /// Returns the cell source, if the variant carries one.
    pub fn source(&self) -> Option<&str> {
        match self {
            Cell::Markdown { source } | Cell::Code { source, .. } | Cell::Raw { source } => {
                Some(source.as_str())
            }
            Cell::Unknown => None,
        }
    }

    /// Returns the outputs of a code cell (empty for every other variant).
    pub fn outputs(&self) -> &[Output] {
        match self {
            Cell::Code { outputs, .. } => outputs,
            _ => &[],
        }
    }
}

#[derive(Deserialize)]
struct RawCell {
    #[serde(default)]
    cell_type: Option<String>,
    #[serde(default)]
    source: Option<MultilineText>,
    #[serde(default)]
    outputs: Option<Vec<Output>>,
}

impl From<RawCell> for Cell {
    fn from(raw: RawCell) -> Self {
        let source = raw.source.unwrap_or_default().joined();
        match raw.cell_type.as_deref() {
            Some("markdown") => Cell::Markdown { source },
            Some("code") => Cell::Code {
                source,
                outputs: raw.outputs.unwrap_or_default(),
            },
            Some("raw") => Cell::Raw { source },
            _ => Cell::Unknown,
        }
    }
}

/// A result payload attached to a code cell.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawOutput")]
pub enum Output {
    /// stdout/stderr text
    Stream { text: String },
    /// `execute_result` or `display_data` representations
    Result(MimeBundle),
    /// A raised exception
    Error {
        ename: String,
        evalue: String,
        traceback: Vec<String>,
    },
    /// Any other or missing `output_type`
    Unknown,
}

impl Output {
    /// Creates a stream output.
    pub fn stream(text: impl Into<String>) -> Self {
        Output::Stream { text: text.into() }
    }

    /// Creates an error output.
    pub fn error(
        ename: impl Into<String>,
        evalue: impl Into<String>,
        traceback: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Output::Error {
            ename: ename.into(),
            evalue: evalue.into(),
            traceback: traceback.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Deserialize)]
struct RawOutput {
    #[serde(default)]
    output_type: Option<String>,
    #[serde(default)]
    text: Option<MultilineText>,
    #[serde(default)]
    data: Option<Map<String, Value>>,
    #[serde(default)]
    ename: Option<String>,
    #[serde(default)]
    evalue: Option<String>,
    #[serde(default)]
    traceback: Option<Vec<String>>,
}

impl From<RawOutput> for Output {
    fn from(raw: RawOutput) -> Self {
        match raw.output_type.as_deref() {
            Some("stream") => Output::Stream {
                text: raw.text.unwrap_or_default().joined(),
            },
            Some("execute_result") | Some("display_data") => {
                Output::Result(MimeBundle::from_map(&raw.data.unwrap_or_default()))
            }
            Some("error") => Output::Error {
                ename: raw.ename.unwrap_or_else(|| "Error".to_string()),
                evalue: raw.evalue.unwrap_or_default(),
                traceback: raw.traceback.unwrap_or_default(),
            },
            _ => Output::Unknown,
        }
    }
}

/// MIME types rendered from a result payload.
///
/// The declaration order is the render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MimeType {
    TextPlain,
    TextHtml,
    TextLatex,
    ImagePng,
    ImageJpeg,
    ImageSvg,
}

impl MimeType {
    /// All recognized MIME types in render order.
    pub const ALL: [MimeType; 6] = [
        MimeType::TextPlain,
        MimeType::TextHtml,
        MimeType::TextLatex,
        MimeType::ImagePng,
        MimeType::ImageJpeg,
        MimeType::ImageSvg,
    ];

    /// Returns the MIME key as written in the notebook.
    pub fn as_str(&self) -> &'static str {
        match self {
            MimeType::TextPlain => "text/plain",
            MimeType::TextHtml => "text/html",
            MimeType::TextLatex => "text/latex",
            MimeType::ImagePng => "image/png",
            MimeType::ImageJpeg => "image/jpeg",
            MimeType::ImageSvg => "image/svg+xml",
        }
    }

    /// Returns the file extension for binary image types.
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            MimeType::ImagePng => Some("png"),
            MimeType::ImageJpeg => Some("jpg"),
            _ => None,
        }
    }
}

impl std::fmt::Display for MimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The recognized representations of one result, keyed by MIME type.
///
/// Unrecognized keys and payloads that are not text are dropped on load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MimeBundle {
    payloads: BTreeMap<MimeType, String>,
}

impl MimeBundle {
    /// Creates an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a payload, replacing any previous one of the same type.
    pub fn with(mut self, mime: MimeType, payload: impl Into<String>) -> Self {
        self.payloads.insert(mime, payload.into());
        self
    }

    /// Returns the payload for a MIME type.
    pub fn get(&self, mime: MimeType) -> Option<&str> {
        self.payloads.get(&mime).map(String::as_str)
    }

    /// Iterates over present payloads in render order.
    pub fn iter(&self) -> impl Iterator<Item = (MimeType, &str)> {
        self.payloads.iter().map(|(mime, payload)| (*mime, payload.as_str()))
    }

    /// Returns true if no recognized payload is present.
    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    fn from_map(data: &Map<String, Value>) -> Self {
        let payloads = MimeType::ALL
            .iter()
            .filter_map(|mime| {
                data.get(mime.as_str())
                    .and_then(MultilineText::from_value)
                    .map(|payload| (*mime, payload))
            })
            .collect();
        Self { payloads }
    }
}
