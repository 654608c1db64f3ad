//! Multipart intake and on-disk staging for `POST /screen`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use axum::extract::Multipart;
use bytes::Bytes;
use tempfile::TempDir;
use tracing::{debug, warn};

use crate::errors::AppError;

pub const FIELD_JOB_DESCRIPTION: &str = "job_description";
pub const FIELD_RESUMES: &str = "resumes";
pub const FIELD_SPECIAL_INSTRUCTIONS: &str = "special_instructions";

/// Document formats the service can extract text from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Txt,
}

impl DocumentKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            "txt" => Some(DocumentKind::Txt),
            _ => None,
        }
    }
}

/// Lowercased text after the last `.`; empty when the name has no dot.
pub fn file_extension(filename: &str) -> String {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default()
}

pub fn is_allowed_file(filename: &str) -> bool {
    DocumentKind::from_extension(&file_extension(filename)).is_some()
}

/// Reduces an uploaded filename to a safe, flat ASCII name.
///
/// Path separators become word breaks, whitespace runs become `_`, anything
/// outside `[A-Za-z0-9_.-]` is dropped and leading/trailing `.`/`_` trimmed.
pub fn secure_filename(filename: &str) -> String {
    let spaced: String = filename
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Derives a display name from a résumé filename: `jane_doe-cv.pdf` → `Jane Doe Cv`.
pub fn candidate_name(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);
    title_case(&stem.replace(['_', '-'], " "))
}

/// Uppercases the first letter of every alphabetic run and lowercases the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Multipart form
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Bytes,
}

#[derive(Debug, Default)]
pub struct ScreenForm {
    pub job_description: Option<UploadedFile>,
    pub resumes: Vec<UploadedFile>,
    pub special_instructions: String,
}

/// Drains the multipart body into a `ScreenForm`. Unknown fields are skipped.
pub async fn read_screen_form(multipart: &mut Multipart) -> Result<ScreenForm, AppError> {
    let mut form = ScreenForm::default();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            FIELD_JOB_DESCRIPTION | FIELD_RESUMES => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field.bytes().await?;
                let file = UploadedFile { filename, data };
                if field_name == FIELD_JOB_DESCRIPTION {
                    form.job_description = Some(file);
                } else {
                    form.resumes.push(file);
                }
            }
            FIELD_SPECIAL_INSTRUCTIONS => {
                form.special_instructions = field.text().await?.trim().to_string();
            }
            other => {
                debug!("Ignoring unexpected form field '{other}'");
                let _ = field.bytes().await?;
            }
        }
    }

    Ok(form)
}

// ────────────────────────────────────────────────────────────────────────────
// Staging directory
// ────────────────────────────────────────────────────────────────────────────

/// A per-request directory under the upload root. Removed on `cleanup` or drop.
pub struct Staging {
    dir: TempDir,
}

impl Staging {
    pub async fn create(upload_root: &Path) -> Result<Self> {
        tokio::fs::create_dir_all(upload_root)
            .await
            .with_context(|| format!("creating upload root {}", upload_root.display()))?;
        let dir = tempfile::Builder::new()
            .prefix("screen-")
            .tempdir_in(upload_root)
            .context("creating staging directory")?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `file` as `<prefix>_<sanitized name>` and returns its path.
    pub async fn save(&self, prefix: &str, file: &UploadedFile) -> Result<PathBuf> {
        let path = self
            .dir
            .path()
            .join(format!("{prefix}_{}", secure_filename(&file.filename)));
        tokio::fs::write(&path, &file.data)
            .await
            .with_context(|| format!("staging {}", path.display()))?;
        Ok(path)
    }

    /// Removes the directory on the blocking pool.
    pub async fn cleanup(self) {
        let path = self.dir.path().to_path_buf();
        let dir = self.dir;
        match tokio::task::spawn_blocking(move || dir.close()).await {
            Ok(Ok(())) => debug!("Removed staging directory {}", path.display()),
            Ok(Err(e)) => warn!("Cleanup of {} failed: {e}", path.display()),
            Err(e) => warn!("spawn_blocking failed removing {}: {e}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_extensions_case_insensitive() {
        assert!(is_allowed_file("cv.PDF"));
        assert!(is_allowed_file("cv.docx"));
        assert!(is_allowed_file("archive.tar.txt"));
        assert!(!is_allowed_file("cv.doc"));
        assert!(!is_allowed_file("pdf"));
        assert!(!is_allowed_file(""));
    }

    #[test]
    fn test_secure_filename_strips_paths_and_symbols() {
        assert_eq!(secure_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename("My Resume (final).pdf"), "My_Resume_final.pdf");
        assert_eq!(secure_filename("C:\\Users\\bob\\cv.docx"), "C_Users_bob_cv.docx");
        assert_eq!(secure_filename("José Núñez.pdf"), "Jos_Nez.pdf");
    }

    #[test]
    fn test_secure_filename_never_empty() {
        assert_eq!(secure_filename("..."), "file");
        assert_eq!(secure_filename("日本語"), "file");
    }

    #[test]
    fn test_candidate_name_from_filename() {
        assert_eq!(candidate_name("jane_doe-cv.pdf"), "Jane Doe Cv");
        assert_eq!(candidate_name("JOHN_SMITH.docx"), "John Smith");
        assert_eq!(candidate_name("o'neil_2024resume.txt"), "O'Neil 2024Resume");
    }

    #[tokio::test]
    async fn test_staging_saves_and_cleans_up() {
        let root = tempfile::tempdir().unwrap();
        let staging = Staging::create(root.path()).await.unwrap();
        let staged_dir = staging.path().to_path_buf();

        let file = UploadedFile {
            filename: "Alice Resume.txt".to_string(),
            data: Bytes::from_static(b"SQL, Rust"),
        };
        let path = staging.save("resume", &file).await.unwrap();
        assert_eq!(path.file_name().unwrap(), "resume_Alice_Resume.txt");
        assert_eq!(std::fs::read(&path).unwrap(), b"SQL, Rust");

        staging.cleanup().await;
        assert!(!staged_dir.exists());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_cleanup_removes_every_staged_file_off_the_worker() {
        let root = tempfile::tempdir().unwrap();
        let staging = Staging::create(root.path()).await.unwrap();
        for i in 0..5 {
            let file = UploadedFile {
                filename: format!("cv_{i}.txt"),
                data: Bytes::from(vec![b'x'; 1024]),
            };
            staging.save("resume", &file).await.unwrap();
        }

        staging.cleanup().await;
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_staging_creates_missing_upload_root() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("uploads").join("nested");
        let staging = Staging::create(&nested).await.unwrap();
        assert!(staging.path().starts_with(&nested));
    }
}
