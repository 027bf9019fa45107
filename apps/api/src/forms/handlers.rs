use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::collab::image::UploadedImage;
use crate::collab::CollabError;
use crate::errors::AppError;
use crate::forms::confirm::{ConfirmationToken, DeleteOutcome, DeleteTarget, PendingDelete};
use crate::forms::education::EducationInput;
use crate::forms::experience::ExperienceInput;
use crate::forms::personal::PersonalInfoInput;
use crate::forms::photo::{acquire_photo, save_photo};
use crate::forms::skills::SkillInput;
use crate::forms::{FormController, FormSpec, Section};
use crate::models::dates::{format_month_year, format_year, DateBounds};
use crate::models::{Education, EntryId, Experience, PersonalInfo, Skill};
use crate::progress::{compute_progress, ProgressReport};
use crate::state::AppState;
use crate::store::CvDocument;
use crate::validation::Rejection;

/// Buffer contents of a form plus whatever would currently block a submit.
#[derive(Serialize)]
pub struct FormDraft {
    pub section: Section,
    pub input: Value,
    pub rejections: Vec<Rejection>,
    /// Picker limits for date fields, when the form has any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_bounds: Option<Value>,
}

fn draft_of<F: FormSpec>(
    controller: &FormController<F>,
    document: &CvDocument,
    today: NaiveDate,
) -> Result<FormDraft, AppError> {
    Ok(FormDraft {
        section: F::SECTION,
        input: serde_json::to_value(controller.input()).map_err(anyhow::Error::from)?,
        rejections: controller.check(document, today),
        date_bounds: None,
    })
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PhotoResponse {
    Saved { mime_type: String, bytes: usize },
    Cancelled,
}

/// A date chosen in the picker. No date means the picker was dismissed.
#[derive(Debug, Deserialize)]
pub struct DatePick {
    pub field: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DatePickResponse {
    Picked { field: &'static str, value: String },
    Cancelled,
}

#[derive(Serialize)]
pub struct CancelResponse {
    pub cancelled: DeleteTarget,
}

/// GET /api/v1/cv
pub async fn handle_get_document(State(state): State<AppState>) -> Json<CvDocument> {
    let session = state.session.lock().await;
    Json(session.document.clone())
}

/// GET /api/v1/cv/progress
pub async fn handle_get_progress(State(state): State<AppState>) -> Json<ProgressReport> {
    let session = state.session.lock().await;
    Json(compute_progress(&session.document))
}

/// GET /api/v1/cv/forms/:section/draft
pub async fn handle_get_draft(
    State(state): State<AppState>,
    Path(section): Path<Section>,
) -> Result<Json<FormDraft>, AppError> {
    let today = state.clock.today();
    let session = state.session.lock().await;
    let draft = match section {
        Section::PersonalInfo => draft_of(&session.personal, &session.document, today)?,
        Section::Experience => {
            let bounds = session.experience.input().date_bounds(today);
            FormDraft {
                date_bounds: Some(serde_json::to_value(bounds).map_err(anyhow::Error::from)?),
                ..draft_of(&session.experience, &session.document, today)?
            }
        }
        Section::Education => {
            let bounds = EducationInput::date_bounds(today);
            FormDraft {
                date_bounds: Some(serde_json::to_value(bounds).map_err(anyhow::Error::from)?),
                ..draft_of(&session.education, &session.document, today)?
            }
        }
        Section::Skills => draft_of(&session.skills, &session.document, today)?,
        Section::Photo => {
            return Err(AppError::NotFound(
                "The photo section has no form draft".to_string(),
            ))
        }
    };
    Ok(Json(draft))
}

/// DELETE /api/v1/cv/forms/:section/draft
///
/// Discards unsaved input. The personal-info form goes back to what the
/// document holds; the others go back to blank.
pub async fn handle_reset_draft(
    State(state): State<AppState>,
    Path(section): Path<Section>,
) -> Result<StatusCode, AppError> {
    let mut guard = state.session.lock().await;
    let session = &mut *guard;
    match section {
        Section::PersonalInfo => session
            .personal
            .fill(PersonalInfoInput::from_info(session.document.personal_info())),
        Section::Experience => session.experience.reset(),
        Section::Education => session.education.reset(),
        Section::Skills => session.skills.reset(),
        Section::Photo => {
            return Err(AppError::NotFound(
                "The photo section has no form draft".to_string(),
            ))
        }
    }
    Ok(StatusCode::NO_CONTENT)
}

fn out_of_range(field: &'static str) -> AppError {
    AppError::Validation(Rejection {
        field,
        message: "The selected date is outside the allowed range".to_string(),
    })
}

fn checked(field: &'static str, bounds: DateBounds, date: NaiveDate) -> Result<(), AppError> {
    if bounds.permits(date) {
        Ok(())
    } else {
        Err(out_of_range(field))
    }
}

/// POST /api/v1/cv/forms/:section/dates
///
/// Writes a picked date into the form buffer in the format the form expects:
/// "Enero 2020" for experience dates, "2020" for a graduation year.
pub async fn handle_pick_date(
    State(state): State<AppState>,
    Path(section): Path<Section>,
    Json(pick): Json<DatePick>,
) -> Result<Json<DatePickResponse>, AppError> {
    let today = state.clock.today();
    let locale = state.config.locale;
    let mut session = state.session.lock().await;

    let field = match (section, pick.field.as_str()) {
        (Section::Experience, "start_date") => "start_date",
        (Section::Experience, "end_date") => "end_date",
        (Section::Education, "graduation_year") => "graduation_year",
        _ => {
            return Err(AppError::NotFound(format!(
                "The {section} form has no date field '{}'",
                pick.field
            )))
        }
    };
    let Some(date) = pick.date else {
        return Ok(Json(DatePickResponse::Cancelled));
    };

    let value = match field {
        "start_date" => {
            let bounds = session.experience.input().date_bounds(today);
            checked(field, bounds.start_date, date)?;
            let value = format_month_year(date, locale);
            session.experience.input_mut().start_date = value.clone();
            value
        }
        "end_date" => {
            let bounds = session.experience.input().date_bounds(today);
            checked(field, bounds.end_date, date)?;
            let value = format_month_year(date, locale);
            session.experience.input_mut().end_date = value.clone();
            value
        }
        _ => {
            checked(field, EducationInput::date_bounds(today), date)?;
            let value = format_year(date);
            session.education.input_mut().graduation_year = value.clone();
            value
        }
    };
    Ok(Json(DatePickResponse::Picked { field, value }))
}

/// GET /api/v1/cv/personal-info
pub async fn handle_get_personal_info(State(state): State<AppState>) -> Json<PersonalInfoInput> {
    let session = state.session.lock().await;
    Json(PersonalInfoInput::from_info(session.document.personal_info()))
}

/// PUT /api/v1/cv/personal-info
pub async fn handle_put_personal_info(
    State(state): State<AppState>,
    Json(input): Json<PersonalInfoInput>,
) -> Result<Json<PersonalInfo>, AppError> {
    let today = state.clock.today();
    let mut guard = state.session.lock().await;
    let session = &mut *guard;
    let info = session
        .personal
        .submit_input(input, &mut session.document, today)?;
    info!("Personal info saved");
    Ok(Json(info))
}

/// GET /api/v1/cv/experiences
pub async fn handle_list_experiences(State(state): State<AppState>) -> Json<Vec<Experience>> {
    let session = state.session.lock().await;
    Json(session.document.experiences().as_slice().to_vec())
}

/// POST /api/v1/cv/experiences
pub async fn handle_add_experience(
    State(state): State<AppState>,
    Json(input): Json<ExperienceInput>,
) -> Result<(StatusCode, Json<Experience>), AppError> {
    let today = state.clock.today();
    let mut guard = state.session.lock().await;
    let session = &mut *guard;
    let entry = session
        .experience
        .submit_input(input, &mut session.document, today)?;
    info!(id = %entry.id, company = %entry.company, "Experience added");
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /api/v1/cv/education
pub async fn handle_list_education(State(state): State<AppState>) -> Json<Vec<Education>> {
    let session = state.session.lock().await;
    Json(session.document.education().as_slice().to_vec())
}

/// POST /api/v1/cv/education
pub async fn handle_add_education(
    State(state): State<AppState>,
    Json(input): Json<EducationInput>,
) -> Result<(StatusCode, Json<Education>), AppError> {
    let today = state.clock.today();
    let mut guard = state.session.lock().await;
    let session = &mut *guard;
    let entry = session
        .education
        .submit_input(input, &mut session.document, today)?;
    info!(id = %entry.id, institution = %entry.institution, "Education added");
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /api/v1/cv/skills
pub async fn handle_list_skills(State(state): State<AppState>) -> Json<Vec<Skill>> {
    let session = state.session.lock().await;
    Json(session.document.skills().as_slice().to_vec())
}

/// POST /api/v1/cv/skills
pub async fn handle_add_skill(
    State(state): State<AppState>,
    Json(input): Json<SkillInput>,
) -> Result<(StatusCode, Json<Skill>), AppError> {
    let today = state.clock.today();
    let mut guard = state.session.lock().await;
    let session = &mut *guard;
    let skill = session
        .skills
        .submit_input(input, &mut session.document, today)?;
    info!(id = %skill.id, name = %skill.name, "Skill added");
    Ok((StatusCode::CREATED, Json(skill)))
}

async fn request_delete(state: &AppState, target: DeleteTarget) -> (StatusCode, Json<PendingDelete>) {
    let mut session = state.session.lock().await;
    let pending = session.confirmations.request(target);
    (StatusCode::ACCEPTED, Json(pending))
}

/// DELETE /api/v1/cv/experiences/:id
pub async fn handle_delete_experience(
    State(state): State<AppState>,
    Path(id): Path<EntryId>,
) -> (StatusCode, Json<PendingDelete>) {
    request_delete(&state, DeleteTarget::Experience(id)).await
}

/// DELETE /api/v1/cv/education/:id
pub async fn handle_delete_education(
    State(state): State<AppState>,
    Path(id): Path<EntryId>,
) -> (StatusCode, Json<PendingDelete>) {
    request_delete(&state, DeleteTarget::Education(id)).await
}

/// DELETE /api/v1/cv/skills/:id
pub async fn handle_delete_skill(
    State(state): State<AppState>,
    Path(id): Path<EntryId>,
) -> (StatusCode, Json<PendingDelete>) {
    request_delete(&state, DeleteTarget::Skill(id)).await
}

/// DELETE /api/v1/cv/photo
pub async fn handle_delete_photo(State(state): State<AppState>) -> (StatusCode, Json<PendingDelete>) {
    request_delete(&state, DeleteTarget::ProfileImage).await
}

/// POST /api/v1/cv/confirmations/:token
pub async fn handle_confirm(
    State(state): State<AppState>,
    Path(token): Path<ConfirmationToken>,
) -> Result<Json<DeleteOutcome>, AppError> {
    let mut guard = state.session.lock().await;
    let session = &mut *guard;
    let outcome = session.confirmations.confirm(token, &mut session.document)?;
    Ok(Json(outcome))
}

/// DELETE /api/v1/cv/confirmations/:token
pub async fn handle_cancel(
    State(state): State<AppState>,
    Path(token): Path<ConfirmationToken>,
) -> Result<Json<CancelResponse>, AppError> {
    let mut session = state.session.lock().await;
    let cancelled = session.confirmations.cancel(token)?;
    Ok(Json(CancelResponse { cancelled }))
}

/// PUT /api/v1/cv/photo
///
/// Multipart upload; the image is read from the `photo` part, or the first
/// file part. A request without one counts as a cancelled selection.
pub async fn handle_put_photo(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<PhotoResponse>, AppError> {
    let max_bytes = state.config.max_photo_bytes;
    let mut bytes: Option<Bytes> = None;
    let mut declared_type = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| upload_error(e, max_bytes))?
    {
        let is_photo = field.name() == Some("photo") || field.file_name().is_some();
        if !is_photo {
            continue;
        }
        declared_type = field.content_type().map(str::to_string);
        bytes = Some(field.bytes().await.map_err(|e| upload_error(e, max_bytes))?);
        break;
    }

    let upload = UploadedImage {
        bytes,
        declared_type,
        uploads_enabled: state.config.photo_uploads_enabled,
        max_bytes,
    };

    let Some(image) = acquire_photo(&upload).await? else {
        return Ok(Json(PhotoResponse::Cancelled));
    };

    let response = PhotoResponse::Saved {
        mime_type: image.mime_type.clone(),
        bytes: image.len(),
    };
    let mut session = state.session.lock().await;
    save_photo(&mut session.document, image);
    info!("Profile photo saved");
    Ok(Json(response))
}

/// An upload cut off by the body limit is an image problem, not a malformed
/// request.
fn upload_error(err: MultipartError, max_bytes: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        CollabError::Image(format!("the image exceeds the {max_bytes} byte limit")).into()
    } else {
        AppError::BadRequest(err.body_text())
    }
}
