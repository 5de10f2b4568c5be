//! Payout calendar endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::{error, success, ApiResult};
use crate::engine;
use crate::errors::AppError;
use crate::models::{
    GenerateCalendarRequest, PayoutTurn, RecordPaymentRequest, UpdateTurnRequest,
};
use crate::AppState;

/// Query parameters for listing the calendar.
#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub year: Option<i32>,
}

/// GET /api/calendar?year=YYYY - List turns, optionally scoped to a year.
pub async fn list_calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> ApiResult<Vec<PayoutTurn>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let result = match query.year {
        Some(year) => state.repo.list_turns_for_year(year).await,
        None => state.repo.list_calendar().await,
    };

    match result {
        Ok(turns) => success(turns, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/calendar/years - Years that have a generated calendar.
pub async fn list_years(State(state): State<AppState>) -> ApiResult<Vec<i32>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_years().await {
        Ok(years) => success(years, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/calendar/generate - Generate (or regenerate) a year's calendar
/// from the current registry snapshot. Fully replaces that year's turns.
pub async fn generate_calendar(
    State(state): State<AppState>,
    Json(request): Json<GenerateCalendarRequest>,
) -> ApiResult<Vec<PayoutTurn>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    // Same bounds the original year picker enforced
    if !(2000..=2100).contains(&request.year) {
        return error(
            AppError::Validation(format!("Year {} out of range", request.year)),
            revision_id,
        );
    }
    if request.contribution_per_person <= Decimal::ZERO {
        return error(
            AppError::Validation("Contribution must be positive".to_string()),
            revision_id,
        );
    }

    let participants = match state.repo.list_participants().await {
        Ok(participants) => participants,
        Err(e) => return error(e, revision_id),
    };

    let drafts = match engine::plan_year(request.year, &participants) {
        Ok(drafts) => drafts,
        Err(e) => return error(e, revision_id),
    };

    // One shared pool amount for every turn of the year
    let total_payout = engine::total_payout(
        request.contribution_per_person,
        participants.len(),
        &state.config.policy,
    );

    match state
        .repo
        .replace_year(
            request.year,
            request.contribution_per_person,
            total_payout,
            &drafts,
        )
        .await
    {
        Ok(turns) => {
            tracing::info!(
                year = request.year,
                turns = turns.len(),
                "Calendar generated"
            );
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(turns, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/calendar/turns/:id - Get a single turn.
pub async fn get_turn(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<PayoutTurn> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_turn(id).await {
        Ok(Some(turn)) => success(turn, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("Turn {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/calendar/turns/:id - Edit a turn's status, actual pay date and
/// notes.
pub async fn update_turn(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateTurnRequest>,
) -> ApiResult<PayoutTurn> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.update_turn(id, &request).await {
        Ok(turn) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(turn, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/calendar/turns/:id/payments - Confirm or retract one member's
/// contribution; the turn auto-completes at the configured threshold.
pub async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<RecordPaymentRequest>,
) -> ApiResult<PayoutTurn> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    // Threshold follows the registry size at confirmation time
    let roster_size = match state.repo.list_participants().await {
        Ok(participants) => participants.len(),
        Err(e) => return error(e, revision_id),
    };
    let threshold = engine::auto_complete_threshold(roster_size, &state.config.policy);

    match state
        .repo
        .record_member_payment(id, request.participant_id, request.paid, threshold)
        .await
    {
        Ok(turn) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(turn, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
