//! Intake pages

use axum::{extract::State, response::Html, Form};

use crate::models::Identity;
use crate::views::IndexPage;
use crate::{AppResult, AppState};

/// Identity intake form
pub async fn home(State(state): State<AppState>) -> AppResult<Html<String>> {
    Ok(Html(state.views.home()?))
}

/// Re-present identity alongside the empty feature form
pub async fn input_details(
    State(state): State<AppState>,
    Form(identity): Form<Identity>,
) -> AppResult<Html<String>> {
    tracing::debug!("Feature form requested");

    Ok(Html(state.views.index(&IndexPage::intake(identity))?))
}
