//! Notebook structure and metadata.

use super::Cell;
use serde::Deserialize;

/// Code-fence language used when the notebook does not declare one.
pub const DEFAULT_LANGUAGE: &str = "python";

/// A notebook document decoded from `.ipynb` JSON.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Notebook {
    /// Notebook metadata
    #[serde(default)]
    pub metadata: Metadata,
    /// Cells in document order
    #[serde(default)]
    pub cells: Vec<Cell>,
}

impl Notebook {
    /// Creates a new empty notebook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a notebook from cells.
    pub fn with_cells(cells: Vec<Cell>) -> Self {
        Self {
            metadata: Metadata::default(),
            cells,
        }
    }

    /// Returns the title, if one is set.
    pub fn title(&self) -> Option<&str> {
        self.metadata.title.as_deref()
    }

    /// Sets the title unless the metadata already carries one.
    pub fn set_default_title(&mut self, title: impl Into<String>) {
        if self.metadata.title.is_none() {
            self.metadata.title = Some(title.into());
        }
    }

    /// Returns the source language declared by the kernel.
    pub fn language(&self) -> Option<&str> {
        self.metadata
            .language_info
            .as_ref()
            .and_then(|info| info.name.as_deref())
            .or_else(|| {
                self.metadata
                    .kernelspec
                    .as_ref()
                    .and_then(|spec| spec.language.as_deref())
            })
            .filter(|name| !name.trim().is_empty())
    }
}

/// Notebook metadata.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Metadata {
    /// Document title
    #[serde(default)]
    pub title: Option<String>,
    /// Kernel language information
    #[serde(default)]
    pub language_info: Option<LanguageInfo>,
    /// Kernel specification
    #[serde(default)]
    pub kernelspec: Option<KernelSpec>,
}

/// `metadata.language_info`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LanguageInfo {
    #[serde(default)]
    pub name: Option<String>,
}

/// `metadata.kernelspec`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct KernelSpec {
    #[serde(default)]
    pub language: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sections_default() {
        let notebook: Notebook = serde_json::from_str("{}").unwrap();
        assert!(notebook.cells.is_empty());
        assert!(notebook.title().is_none());
        assert!(notebook.language().is_none());
    }

    #[test]
    fn test_default_title_does_not_override() {
        let mut notebook: Notebook =
            serde_json::from_str(r#"{"metadata":{"title":"Analysis"},"cells":[]}"#).unwrap();
        notebook.set_default_title("file_stem");
        assert_eq!(notebook.title(), Some("Analysis"));

        let mut untitled = Notebook::new();
        untitled.set_default_title("file_stem");
        assert_eq!(untitled.title(), Some("file_stem"));
    }

    #[test]
    fn test_language_lookup_order() {
        let both: Notebook = serde_json::from_str(
            r#"{"metadata":{"language_info":{"name":"julia"},"kernelspec":{"language":"python"}}}"#,
        )
        .unwrap();
        assert_eq!(both.language(), Some("julia"));

        let kernel_only: Notebook =
            serde_json::from_str(r#"{"metadata":{"kernelspec":{"language":"R","name":"ir"}}}"#)
                .unwrap();
        assert_eq!(kernel_only.language(), Some("R"));
    }

    #[test]
    fn test_cell_order_preserved() {
        let notebook: Notebook = serde_json::from_str(
            r#"{"cells":[
                {"cell_type":"markdown","source":"first"},
                {"cell_type":"code","source":"second","outputs":[]},
                {"cell_type":"raw","source":"third"}
            ]}"#,
        )
        .unwrap();
        let sources: Vec<_> = notebook.cells.iter().filter_map(Cell::source).collect();
        assert_eq!(sources, vec!["first", "second", "third"]);
    }
}
