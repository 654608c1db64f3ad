//! `ScreeningForm`: the single owner of all form state.
//!
//! Every user or network event maps to one `&mut self` method. Views
//! (`jd_preview`, `resume_list`, `results_view`, `toast`, progress) are read
//! back from the controller after each event.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::client::api::{ApiReply, ScreenRequest, ScreeningApi};
use crate::client::drop_zone::{DragEvent, DropZone, Dropped};
use crate::client::export::{export_report, ExportFile};
use crate::client::files::SelectedFile;
use crate::client::instructions::{truncate_instructions, InstructionsField};
use crate::client::notify::Toast;
use crate::client::progress::{ProgressTicker, ProgressView};
use crate::client::render::ResultsView;
use crate::client::selection::{FileSelectionState, JdPreview, ResumeListView};
use crate::client::{ClientError, GENERIC_FAILURE_MESSAGE};
use crate::models::candidate::Candidate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Validating,
    Submitting,
}

pub struct ScreeningForm {
    api: Arc<dyn ScreeningApi>,
    selection: FileSelectionState,
    jd_zone: DropZone,
    resume_zone: DropZone,
    instructions: InstructionsField,
    toast: Toast,
    state: SubmissionState,
    loading: bool,
    progress: Arc<watch::Sender<ProgressView>>,
    current_results: Vec<Candidate>,
    results_view: Option<ResultsView>,
    results_open: bool,
}

impl ScreeningForm {
    pub fn new(api: Arc<dyn ScreeningApi>) -> Self {
        let (progress, _) = watch::channel(ProgressView::idle());
        Self {
            api,
            selection: FileSelectionState::default(),
            jd_zone: DropZone::new(false),
            resume_zone: DropZone::new(true),
            instructions: InstructionsField::default(),
            toast: Toast::default(),
            state: SubmissionState::Idle,
            loading: false,
            progress: Arc::new(progress),
            current_results: Vec::new(),
            results_view: None,
            results_open: false,
        }
    }

    // ---- Job description ----

    pub fn jd_drag(&mut self, event: DragEvent) {
        let dropped = self.jd_zone.handle(event, self.selection.jd_input_mut());
        match dropped {
            Some(Dropped::Single(file)) => self.selection.handle_jd_file(file),
            Some(Dropped::Many(files)) => {
                if let Some(file) = files.into_iter().next() {
                    self.selection.handle_jd_file(file);
                }
            }
            None => {}
        }
    }

    /// File-picker change on the job-description input.
    pub fn select_jd(&mut self, file: Option<SelectedFile>) {
        if let Some(file) = file {
            self.selection.handle_jd_file(file);
        }
    }

    pub fn clear_jd(&mut self) {
        self.selection.clear_jd();
    }

    pub fn jd_preview(&self) -> Option<JdPreview> {
        self.selection.jd_preview()
    }

    pub fn jd_zone(&self) -> &DropZone {
        &self.jd_zone
    }

    // ---- Résumés ----

    pub fn resume_drag(&mut self, event: DragEvent) {
        let dropped = self
            .resume_zone
            .handle(event, self.selection.resumes_input_mut());
        match dropped {
            Some(Dropped::Many(files)) => self.add_resumes(files),
            Some(Dropped::Single(file)) => self.add_resumes(vec![file]),
            None => {}
        }
    }

    /// File-picker change on the résumé input.
    pub fn select_resumes(&mut self, files: Vec<SelectedFile>) {
        if !files.is_empty() {
            self.selection.resumes_input_mut().set(files.clone());
            self.add_resumes(files);
        }
    }

    fn add_resumes(&mut self, files: Vec<SelectedFile>) {
        for rejected in self.selection.handle_resume_files(files) {
            warn!("{rejected}");
            self.toast.show(rejected.to_string());
        }
    }

    pub fn remove_resume(&mut self, index: usize) {
        self.selection.remove_resume(index);
    }

    pub fn clear_resumes(&mut self) {
        self.selection.clear_resumes();
    }

    pub fn resumes(&self) -> &[SelectedFile] {
        self.selection.resumes()
    }

    pub fn resume_list(&self) -> ResumeListView {
        self.selection.resume_list()
    }

    pub fn resume_zone(&self) -> &DropZone {
        &self.resume_zone
    }

    // ---- Special instructions ----

    pub fn set_instructions(&mut self, text: &str) {
        self.instructions.set(text);
    }

    pub fn instructions(&self) -> &InstructionsField {
        &self.instructions
    }

    // ---- Notifications ----

    pub fn toast(&self) -> &Toast {
        &self.toast
    }

    pub fn dismiss_toast(&mut self) {
        self.toast.dismiss();
    }

    // ---- Submission ----

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn submit_enabled(&self) -> bool {
        !self.loading
    }

    pub fn subscribe_progress(&self) -> watch::Receiver<ProgressView> {
        self.progress.subscribe()
    }

    /// Validates, sends one request, and renders the outcome.
    ///
    /// Returns the number of ranked candidates. Every error is also shown in
    /// the toast; loading state and progress are reset on every path that
    /// reached the network.
    pub async fn submit(&mut self) -> Result<usize, ClientError> {
        self.state = SubmissionState::Validating;
        let request = match self.build_request() {
            Ok(request) => request,
            Err(e) => {
                self.state = SubmissionState::Idle;
                self.toast.show(e.to_string());
                return Err(e);
            }
        };

        self.state = SubmissionState::Submitting;
        info!(
            resumes = request.resumes.len(),
            "Submitting {} for screening",
            request.job_description.name
        );

        self.set_loading(true);
        let ticker = ProgressTicker::start(self.progress.clone());
        let api = self.api.clone();
        let reply = api.screen(request).await;
        ticker.cancel();
        self.set_loading(false);

        let outcome = reply.and_then(interpret_reply);
        self.state = SubmissionState::Idle;

        match outcome {
            Ok((results, total)) => {
                let count = results.len();
                info!("Screening returned {count} ranked candidates");
                self.show_results(results, total);
                Ok(count)
            }
            Err(e) => {
                warn!("Screening failed: {e}");
                self.toast.show(e.to_string());
                Err(e)
            }
        }
    }

    fn build_request(&self) -> Result<ScreenRequest, ClientError> {
        let job_description = self.selection.jd_file().cloned().ok_or_else(|| {
            ClientError::Validation("Please upload a Job Description file.".to_string())
        })?;
        if self.selection.resumes().is_empty() {
            return Err(ClientError::Validation(
                "Please upload at least one resume.".to_string(),
            ));
        }
        Ok(ScreenRequest {
            job_description,
            resumes: self.selection.resumes().to_vec(),
            special_instructions: truncate_instructions(self.instructions.value()).to_string(),
        })
    }

    fn set_loading(&mut self, loading: bool) {
        debug!(loading, "Loading overlay");
        self.loading = loading;
    }

    // ---- Results ----

    fn show_results(&mut self, results: Vec<Candidate>, total: usize) {
        self.results_view = Some(ResultsView::build(&results, total));
        self.current_results = results;
        self.results_open = true;
    }

    /// Advances the results view by one display frame (starts the score-bar animation).
    pub fn next_frame(&mut self) {
        if let Some(view) = self.results_view.as_mut() {
            view.animate_score_bars();
        }
    }

    pub fn results_view(&self) -> Option<&ResultsView> {
        self.results_view.as_ref().filter(|_| self.results_open)
    }

    pub fn current_results(&self) -> &[Candidate] {
        &self.current_results
    }

    pub fn results_open(&self) -> bool {
        self.results_open
    }

    pub fn close_results(&mut self) {
        self.results_open = false;
    }

    /// A click on the overlay backdrop closes it; clicks inside the panel do not.
    pub fn click_results_overlay(&mut self, on_backdrop: bool) {
        if on_backdrop {
            self.close_results();
        }
    }

    /// Hides the results and resets the form for a new batch.
    pub fn screen_again(&mut self) {
        self.close_results();
        self.selection.clear_jd();
        self.selection.clear_resumes();
        self.instructions.clear();
    }

    pub fn export(&self) -> Option<ExportFile> {
        export_report(&self.current_results)
    }
}

/// Splits a decoded reply into success or failure.
fn interpret_reply(reply: ApiReply) -> Result<(Vec<Candidate>, usize), ClientError> {
    let success = reply.is_success();
    let ApiReply { body, .. } = reply;
    let error = body.error.filter(|e| !e.is_empty());

    if !success || error.is_some() {
        return Err(ClientError::RequestFailure(
            error.unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
        ));
    }

    let results = body
        .results
        .ok_or_else(|| ClientError::RequestFailure(GENERIC_FAILURE_MESSAGE.to_string()))?;
    let total = body.total_candidates.unwrap_or(results.len());
    Ok((results, total))
}
