use axum::{
    extract::{FromRef, State},
    response::Redirect,
    routing::get,
    Extension, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use tracing::instrument;

use crate::{
    auth::{
        jwt::SessionKeys,
        session::{current_user, CurrentUser},
    },
    error::AppError,
    flash::{self, Flash},
    state::AppState,
};

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub notes: i64,
    pub summaries: i64,
    pub plans: i64,
}

#[derive(Debug, Serialize)]
pub struct DashboardPage {
    pub title: &'static str,
    pub user: String,
    pub stats: DashboardStats,
    pub flash: Option<Flash>,
}

#[derive(Debug, Serialize)]
pub struct PlannerPage {
    pub title: &'static str,
    pub user: String,
}

/// Routes behind the session guard.
pub fn gated_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/planner", get(planner))
}

pub async fn home(State(state): State<AppState>, jar: CookieJar) -> Redirect {
    let keys = SessionKeys::from_ref(&state);
    match current_user(&keys, &jar) {
        Some(_) => Redirect::to("/dashboard"),
        None => Redirect::to("/login"),
    }
}

#[instrument(skip(state, jar, user), fields(username = %user.username))]
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<DashboardPage>), AppError> {
    // Every history entry is one processed note and one summary.
    let count = state.history.count().await?;
    let (jar, flash) = flash::take(jar);
    Ok((
        jar,
        Json(DashboardPage {
            title: "Dashboard",
            user: user.username,
            stats: DashboardStats { notes: count, summaries: count, plans: 0 },
            flash,
        }),
    ))
}

pub async fn planner(Extension(user): Extension<CurrentUser>) -> Json<PlannerPage> {
    Json(PlannerPage { title: "Study Planner", user: user.username })
}
