//! Files chosen for screening: one job description and a deduplicated résumé list.

use crate::client::files::{FileInput, SelectedFile};
use crate::client::markup::{Element, Node};
use crate::client::ClientError;

/// Preview shown in the job-description zone once a file is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JdPreview {
    pub filename: String,
    pub size_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeRow {
    pub index: usize,
    pub name: String,
    pub size_label: String,
}

/// The résumé list as displayed. `Empty` shows the drop prompt instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumeListView {
    Empty,
    Populated {
        count_label: String,
        rows: Vec<ResumeRow>,
    },
}

impl ResumeListView {
    /// Renders the populated list; the empty state has no list markup.
    pub fn render(&self) -> Option<Node> {
        let ResumeListView::Populated { count_label, rows } = self else {
            return None;
        };
        let items: Vec<Node> = rows
            .iter()
            .map(|row| {
                Element::new("div")
                    .class("resume-item")
                    .child(
                        Element::new("span")
                            .class("resume-item-name")
                            .attr("title", row.name.clone())
                            .text(row.name.clone()),
                    )
                    .child(
                        Element::new("span")
                            .class("resume-item-size")
                            .text(row.size_label.clone()),
                    )
                    .child(
                        Element::new("button")
                            .class("file-remove")
                            .attr("type", "button")
                            .attr("data-index", row.index.to_string()),
                    )
                    .into()
            })
            .collect();
        Some(
            Element::new("div")
                .class("resume-list")
                .child(
                    Element::new("div")
                        .class("resume-count")
                        .text(count_label.clone()),
                )
                .child(Element::new("div").class("resume-items").children(items))
                .into(),
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct FileSelectionState {
    /// Single-file input; its first file is the job description.
    jd_input: FileInput,
    /// Multi-file input; the selection itself lives in `resumes`.
    resumes_input: FileInput,
    resumes: Vec<SelectedFile>,
}

impl FileSelectionState {
    pub fn jd_input_mut(&mut self) -> &mut FileInput {
        &mut self.jd_input
    }

    pub fn resumes_input_mut(&mut self) -> &mut FileInput {
        &mut self.resumes_input
    }

    pub fn jd_file(&self) -> Option<&SelectedFile> {
        self.jd_input.first()
    }

    pub fn resumes(&self) -> &[SelectedFile] {
        &self.resumes
    }

    /// Stores the job description. The file type is not checked here.
    pub fn handle_jd_file(&mut self, file: SelectedFile) {
        self.jd_input.set(vec![file]);
    }

    pub fn clear_jd(&mut self) {
        self.jd_input.reset();
    }

    pub fn jd_preview(&self) -> Option<JdPreview> {
        self.jd_file().map(|f| JdPreview {
            filename: f.name.clone(),
            size_label: f.size_label(),
        })
    }

    /// Adds accepted résumés in order, skipping exact `(name, size)` repeats.
    /// Returns one error per rejected file; rejected files never enter the selection.
    pub fn handle_resume_files(&mut self, files: Vec<SelectedFile>) -> Vec<ClientError> {
        let mut rejected = Vec::new();
        for file in files {
            if !file.is_accepted_resume() {
                rejected.push(ClientError::UnsupportedFileType { name: file.name });
                continue;
            }
            if !self.resumes.iter().any(|existing| existing.same_file(&file)) {
                self.resumes.push(file);
            }
        }
        rejected
    }

    /// Removes the résumé at `index`. Out-of-range indexes are ignored.
    pub fn remove_resume(&mut self, index: usize) -> Option<SelectedFile> {
        (index < self.resumes.len()).then(|| self.resumes.remove(index))
    }

    pub fn clear_resumes(&mut self) {
        self.resumes.clear();
        self.resumes_input.reset();
    }

    pub fn resume_list(&self) -> ResumeListView {
        if self.resumes.is_empty() {
            return ResumeListView::Empty;
        }
        let count = self.resumes.len();
        ResumeListView::Populated {
            count_label: format!(
                "{count} resume{} selected",
                if count > 1 { "s" } else { "" }
            ),
            rows: self
                .resumes
                .iter()
                .enumerate()
                .map(|(index, f)| ResumeRow {
                    index,
                    name: f.name.clone(),
                    size_label: f.size_label(),
                })
                .collect(),
        }
    }
}
