//! History and summary endpoints.

use axum::extract::{Path, State};

use super::{error, success, ApiResult};
use crate::models::YearSummary;
use crate::AppState;

/// GET /api/summary/:year - Aggregate view of one tanda year: status
/// counts, total pool and the per-participant rollup.
pub async fn get_summary(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> ApiResult<YearSummary> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_turns_for_year(year).await {
        Ok(turns) => success(YearSummary::from_turns(year, &turns), revision_id),
        Err(e) => error(e, revision_id),
    }
}
