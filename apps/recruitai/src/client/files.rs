use std::path::Path;

use anyhow::{Context, Result};
use bytes::Bytes;

/// Résumé formats the form accepts.
pub const ACCEPTED_RESUME_EXTENSIONS: [&str; 3] = ["pdf", "docx", "txt"];

/// A file picked or dropped by the user. Identity is `(name, size)`.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
    pub data: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        Self {
            name: name.into(),
            size: data.len() as u64,
            data,
        }
    }

    /// Reads a file from disk, as a file picker would hand it over.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("{} has no usable file name", path.display()))?;
        Ok(Self::new(name, data))
    }

    pub fn same_file(&self, other: &SelectedFile) -> bool {
        self.name == other.name && self.size == other.size
    }

    /// Text after the last `.`, lowercased. A name without a dot is its own extension.
    pub fn extension(&self) -> String {
        self.name
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }

    pub fn is_accepted_resume(&self) -> bool {
        ACCEPTED_RESUME_EXTENSIONS.contains(&self.extension().as_str())
    }

    pub fn size_label(&self) -> String {
        format_bytes(self.size)
    }
}

/// Human-readable size: bytes below 1 KiB, otherwise KB/MB with one decimal.
pub fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;
    if bytes < KIB {
        format!("{bytes} B")
    } else if bytes < MIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    }
}

/// State of a native `<input type="file">`.
#[derive(Debug, Clone, Default)]
pub struct FileInput {
    pub files: Vec<SelectedFile>,
}

impl FileInput {
    pub fn first(&self) -> Option<&SelectedFile> {
        self.files.first()
    }

    pub fn set(&mut self, files: Vec<SelectedFile>) {
        self.files = files;
    }

    pub fn reset(&mut self) {
        self.files.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes_thresholds() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024 + 200 * 1024), "5.2 MB");
    }

    #[test]
    fn test_extension_is_last_segment_lowercased() {
        assert_eq!(SelectedFile::new("CV.Final.PDF", "x").extension(), "pdf");
        assert_eq!(SelectedFile::new("resume", "x").extension(), "resume");
        assert_eq!(SelectedFile::new("notes.", "x").extension(), "");
    }

    #[test]
    fn test_accepted_resume_extensions() {
        assert!(SelectedFile::new("a.Docx", "x").is_accepted_resume());
        assert!(SelectedFile::new("a.txt", "x").is_accepted_resume());
        assert!(!SelectedFile::new("a.doc", "x").is_accepted_resume());
        assert!(!SelectedFile::new("a.pdf.exe", "x").is_accepted_resume());
    }

    #[test]
    fn test_size_comes_from_data() {
        let f = SelectedFile::new("a.txt", "hello");
        assert_eq!(f.size, 5);
        assert_eq!(f.size_label(), "5 B");
    }

    #[tokio::test]
    async fn test_from_path_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alice.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();
        let f = SelectedFile::from_path(&path).await.unwrap();
        assert_eq!(f.name, "alice.pdf");
        assert_eq!(f.size, 8);
    }
}
