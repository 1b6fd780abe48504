//! Document source: reads raw text files into `Document`s.
//!
//! Only plain-text formats are handled here; richer formats (PDF, HTML)
//! are expected to be extracted to text by an external collaborator
//! before they reach this directory.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::types::Document;

const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "md"];

#[derive(Default)]
pub struct DocumentLoader;

impl DocumentLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load every supported file under `data_dir` (recursively, sorted by
    /// path). Unreadable files are logged and skipped; they never abort
    /// the rest of the directory.
    pub fn load_directory(&self, data_dir: &Path) -> Result<Vec<Document>> {
        let files = self.list_files(data_dir);
        if files.is_empty() {
            warn!(dir = %data_dir.display(), "no supported documents found");
            return Ok(vec![]);
        }
        let mut documents = Vec::new();
        for file_path in &files {
            match self.read_file_content(file_path) {
                Ok(content) => {
                    // Key on the path relative to the data directory, so
                    // same-named files in different subdirectories stay
                    // distinct in the index.
                    let filename = file_path
                        .strip_prefix(data_dir)
                        .unwrap_or(file_path)
                        .to_string_lossy()
                        .to_string();
                    let doc_type = file_path
                        .extension()
                        .and_then(|e| e.to_str())
                        .unwrap_or("txt")
                        .to_string();
                    documents.push(Document::new(content.trim(), filename, doc_type));
                }
                Err(e) => {
                    warn!(file = %file_path.display(), error = %e, "skipping unreadable file");
                }
            }
        }
        info!(dir = %data_dir.display(), files = files.len(), loaded = documents.len(), "loaded documents");
        Ok(documents)
    }

    fn read_file_content(&self, file_path: &Path) -> Result<String> {
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(_) => Ok(String::from_utf8_lossy(&fs::read(file_path)?).to_string()),
        }
    }

    fn list_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            let supported = path
                .extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext));
            if supported {
                files.push(path.to_path_buf());
            }
        }
        files.sort();
        files
    }
}
