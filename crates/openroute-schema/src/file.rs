//! Uploaded file descriptors.

use serde::{Deserialize, Serialize};

/// An uploaded file as handed over by a transport adapter.
///
/// The adapter stores the content somewhere (usually a temp file); routes
/// only ever see this descriptor. It is the value a file schema validates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Client-supplied file name.
    pub filename: String,
    /// MIME type.
    pub mime: String,
    /// Transfer encoding.
    #[serde(default)]
    pub encoding: String,
    /// Size in bytes.
    pub size: u64,
    /// Extension without the dot.
    #[serde(default)]
    pub extension: String,
    /// Where the adapter stored the content.
    #[serde(default)]
    pub tmp_file_path: String,
}

impl UploadedFile {
    /// Creates a descriptor, deriving the extension from the file name.
    #[must_use]
    pub fn new(filename: impl Into<String>, mime: impl Into<String>, size: u64) -> Self {
        let filename = filename.into();
        let extension = std::path::Path::new(&filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        Self {
            filename,
            mime: mime.into(),
            encoding: "7bit".to_string(),
            size,
            extension,
            tmp_file_path: String::new(),
        }
    }

    /// Sets the temp file location.
    #[must_use]
    pub fn with_tmp_file_path(mut self, path: impl Into<String>) -> Self {
        self.tmp_file_path = path.into();
        self
    }

    /// Converts the descriptor into the JSON object validators see.
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "filename": self.filename,
            "mime": self.mime,
            "encoding": self.encoding,
            "size": self.size,
            "extension": self.extension,
            "tmp_file_path": self.tmp_file_path,
        })
    }
}
