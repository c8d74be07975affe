use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use crate::{
    auth::{jwt::SessionKeys, session::current_user},
    flash::{self, FlashKind},
    state::AppState,
};

/// Gate for routes that need a logged-in user.
///
/// Anonymous requests are sent to `/login` with a flash; authenticated ones
/// continue with a [`CurrentUser`](crate::auth::session::CurrentUser) in the
/// request extensions.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let keys = SessionKeys::from(&state.config.session);
    match current_user(&keys, &jar) {
        Some(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        None => {
            debug!(uri = %request.uri(), "anonymous request to gated route");
            let jar = flash::push(jar, FlashKind::Error, "Please login first");
            (jar, Redirect::to("/login")).into_response()
        }
    }
}
