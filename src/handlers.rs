use crate::checkin::CheckInOutcome;
use crate::errors::AppError;
use crate::models::{
    CheckInEntry, CheckInRequest, CheckInResponse, Mood, RecentEntry, RecentResponse,
};
use crate::state::AppState;
use crate::storage::RECENT_LIMIT;
use crate::ui::{render_index, PageView};
use axum::{extract::State, http::StatusCode, response::Html, Form, Json};
use tracing::error;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let recent = load_recent(&state).await;
    Html(render_index(&PageView {
        recent,
        ..PageView::default()
    }))
}

pub async fn checkin_form(
    State(state): State<AppState>,
    Form(form): Form<CheckInRequest>,
) -> (StatusCode, Html<String>) {
    let mood = match form.mood.parse::<Mood>() {
        Ok(mood) => mood,
        Err(err) => {
            let recent = load_recent(&state).await;
            let view = PageView {
                failure: Some(err.to_string()),
                recent,
                ..PageView::default()
            };
            return (StatusCode::BAD_REQUEST, Html(render_index(&view)));
        }
    };

    let submitted = state.checkins.submit(mood, &form.focus, &form.note).await;
    let (status, outcome, failure) = match submitted {
        Ok(outcome) => (StatusCode::OK, Some(outcome), None),
        Err(err) => {
            error!("check-in not saved: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                None,
                Some(format!("Your check-in was not saved: {err}")),
            )
        }
    };

    let recent = load_recent(&state).await;
    let view = PageView {
        selected: Some(mood),
        outcome: outcome.as_ref(),
        failure,
        recent,
    };
    (status, Html(render_index(&view)))
}

pub async fn get_recent(State(state): State<AppState>) -> Result<Json<RecentResponse>, AppError> {
    let entries = state
        .checkins
        .recent(RECENT_LIMIT)
        .await?
        .into_iter()
        .map(|(timestamp, entry)| RecentEntry { timestamp, entry })
        .collect();
    Ok(Json(RecentResponse { entries }))
}

pub async fn checkin(
    State(state): State<AppState>,
    Json(payload): Json<CheckInRequest>,
) -> Result<Json<CheckInResponse>, AppError> {
    let mood: Mood = payload.mood.parse()?;
    let outcome: CheckInOutcome = state
        .checkins
        .submit(mood, &payload.focus, &payload.note)
        .await
        .map_err(|err| {
            error!("check-in not saved: {err}");
            AppError::from(err)
        })?;
    Ok(Json(outcome.into_api_response()))
}

async fn load_recent(state: &AppState) -> Result<Vec<(String, CheckInEntry)>, String> {
    state.checkins.recent(RECENT_LIMIT).await.map_err(|err| {
        error!("failed to load recent check-ins: {err}");
        err.to_string()
    })
}
