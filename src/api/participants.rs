//! Participant registry endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{error, success, ApiResult};
use crate::dates;
use crate::errors::AppError;
use crate::models::{
    CreateParticipantRequest, Participant, ParticipantDraft, ParticipantUpdate, ReminderLink,
    UpdateParticipantRequest,
};
use crate::AppState;

/// GET /api/participants - List all participants in registration order.
pub async fn list_participants(State(state): State<AppState>) -> ApiResult<Vec<Participant>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_participants().await {
        Ok(participants) => success(participants, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/participants/:id - Get a single participant.
pub async fn get_participant(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Participant> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_participant(id).await {
        Ok(Some(participant)) => success(participant, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("Participant {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/participants - Register a new participant.
pub async fn create_participant(
    State(state): State<AppState>,
    Json(request): Json<CreateParticipantRequest>,
) -> ApiResult<Participant> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let name = request.name.trim().to_string();
    if name.is_empty() {
        return error(
            AppError::Validation("Name is required".to_string()),
            revision_id,
        );
    }

    let birthdate = match parse_birthdate_field(request.birthdate.as_deref()) {
        Ok(birthdate) => birthdate,
        Err(e) => return error(e, revision_id),
    };

    let draft = ParticipantDraft {
        name,
        birthdate,
        phone: non_empty(request.phone),
        email: non_empty(request.email),
        notes: non_empty(request.notes),
    };

    match state.repo.create_participant(&draft).await {
        Ok(participant) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(participant, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/participants/:id - Update a participant.
pub async fn update_participant(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateParticipantRequest>,
) -> ApiResult<Participant> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let name = match request.name {
        Some(name) => {
            let trimmed = name.trim().to_string();
            if trimmed.is_empty() {
                return error(
                    AppError::Validation("Name is required".to_string()),
                    revision_id,
                );
            }
            Some(trimmed)
        }
        None => None,
    };

    // Outer None keeps the stored date; an empty string clears it
    let birthdate = match request.birthdate.as_deref() {
        None => None,
        Some(text) => match parse_birthdate_field(Some(text)) {
            Ok(parsed) => Some(parsed),
            Err(e) => return error(e, revision_id),
        },
    };

    let update = ParticipantUpdate {
        name,
        birthdate,
        phone: non_empty(request.phone),
        email: non_empty(request.email),
        notes: non_empty(request.notes),
    };

    match state.repo.update_participant(id, &update).await {
        Ok(participant) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(participant, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/participants/:id - Delete a participant. Their historical
/// turns stay in the calendar.
pub async fn delete_participant(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_participant(id).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/participants/:id/reminder-link - WhatsApp reminder deep-link.
pub async fn reminder_link(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<ReminderLink> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let participant = match state.repo.get_participant(id).await {
        Ok(Some(participant)) => participant,
        Ok(None) => {
            return error(
                AppError::NotFound(format!("Participant {} not found", id)),
                revision_id,
            )
        }
        Err(e) => return error(e, revision_id),
    };

    match participant.reminder_link(&state.config.reminder_text) {
        Some(url) => success(
            ReminderLink {
                participant_id: id,
                url,
            },
            revision_id,
        ),
        None => error(
            AppError::Validation(format!(
                "Participant {} has no usable phone number",
                participant.name
            )),
            revision_id,
        ),
    }
}

/// Parse a textual birthdate field; empty text means "no date".
fn parse_birthdate_field(
    text: Option<&str>,
) -> Result<Option<chrono::NaiveDate>, AppError> {
    match text.map(str::trim) {
        None | Some("") => Ok(None),
        Some(trimmed) => dates::parse_flexible(trimmed)
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("Invalid birthdate: {}", trimmed))),
    }
}

/// Trim an optional field; blank strings become absent.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
