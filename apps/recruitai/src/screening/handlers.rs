//! Axum route handler for the screening API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::ScreenResponse;
use crate::screening::extract::extract_text_blocking;
use crate::screening::ranking::ResumeDocument;
use crate::screening::uploads::{
    candidate_name, is_allowed_file, read_screen_form, secure_filename, ScreenForm, Staging,
};
use crate::state::AppState;

/// POST /screen
///
/// Multipart: `job_description` (file), `resumes` (repeated file),
/// `special_instructions` (text). Returns ranked candidates or `{"error": ...}`.
pub async fn handle_screen(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScreenResponse>, AppError> {
    let request_id = Uuid::new_v4();
    let form = read_screen_form(&mut multipart).await?;

    let staging = Staging::create(&state.config.upload_dir).await?;
    let result = screen_staged(&state, &staging, form, request_id).await;
    staging.cleanup().await;

    result.map(Json)
}

async fn screen_staged(
    state: &AppState,
    staging: &Staging,
    form: ScreenForm,
    request_id: Uuid,
) -> Result<ScreenResponse, AppError> {
    // --- Job description ---
    let jd_file = form
        .job_description
        .filter(|f| !f.filename.is_empty())
        .ok_or_else(|| AppError::validation("Please upload a Job Description file."))?;
    if !is_allowed_file(&jd_file.filename) {
        return Err(AppError::validation(
            "Job Description must be a PDF, DOCX, or TXT file.",
        ));
    }

    let jd_path = staging.save("jd", &jd_file).await?;
    let jd_text = extract_text_blocking(&jd_path).await;
    if jd_text.trim().is_empty() {
        return Err(AppError::validation(
            "Could not extract text from the Job Description file.",
        ));
    }

    // --- Resumes ---
    if form.resumes.iter().all(|f| f.filename.is_empty()) {
        return Err(AppError::validation("Please upload at least one resume."));
    }

    let mut resumes = Vec::new();
    for file in form.resumes.iter().filter(|f| !f.filename.is_empty()) {
        if !is_allowed_file(&file.filename) {
            warn!(%request_id, "Skipping unsupported file: {}", file.filename);
            continue;
        }
        let path = staging.save("resume", file).await?;
        let text = extract_text_blocking(&path).await;
        if text.trim().is_empty() {
            warn!(%request_id, "No text extracted from {}", file.filename);
            continue;
        }
        let filename = secure_filename(&file.filename);
        resumes.push(ResumeDocument {
            name: candidate_name(&filename),
            filename,
            text,
        });
    }

    if resumes.is_empty() {
        return Err(AppError::validation(
            "No valid resumes could be processed. Please upload PDF, DOCX, or TXT files.",
        ));
    }

    // --- Ranking ---
    info!(
        %request_id,
        "Screening {} candidates against job description...",
        resumes.len()
    );
    let results = state
        .ranker
        .rank(&jd_text, &resumes, &form.special_instructions)
        .await?;

    Ok(ScreenResponse {
        success: true,
        results,
        total_candidates: resumes.len(),
    })
}
