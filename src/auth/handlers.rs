use axum::{
    extract::{FromRef, State},
    response::Redirect,
    routing::get,
    Form, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthPage, LoginForm, RegisterForm},
        jwt::SessionKeys,
        services::{authenticate, is_valid_email, normalize_username, register},
        session::{end_session, start_session},
    },
    error::AppError,
    flash::{self, FlashKind},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", get(register_page).post(register_submit))
        .route("/login", get(login_page).post(login_submit))
        .route("/logout", get(logout))
}

pub async fn register_page(jar: CookieJar) -> (CookieJar, Json<AuthPage>) {
    let (jar, flash) = flash::take(jar);
    (jar, Json(AuthPage { title: "Register", flash }))
}

pub async fn login_page(jar: CookieJar) -> (CookieJar, Json<AuthPage>) {
    let (jar, flash) = flash::take(jar);
    (jar, Json(AuthPage { title: "Login", flash }))
}

#[instrument(skip(state, jar, form))]
pub async fn register_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<(CookieJar, Redirect), AppError> {
    let email = normalize_username(&form.email);
    let password = form.password.trim();
    let confirm = form.confirm_password.trim();

    let rejection = if email.is_empty() || password.is_empty() || confirm.is_empty() {
        Some("Please fill all fields")
    } else if password != confirm {
        Some("Passwords do not match!")
    } else if !is_valid_email(&email) {
        Some("Please enter a valid email")
    } else {
        None
    };
    if let Some(message) = rejection {
        warn!(email = %email, reason = message, "registration rejected");
        let jar = flash::push(jar, FlashKind::Error, message);
        return Ok((jar, Redirect::to("/register")));
    }

    match register(state.users.as_ref(), &email, password).await {
        Ok(_) => {
            let jar = flash::push(jar, FlashKind::Success, "Registration successful!");
            Ok((jar, Redirect::to("/login")))
        }
        Err(e @ AppError::DuplicateUsername) => {
            warn!(email = %email, "email already registered");
            let jar = flash::push(jar, FlashKind::Error, e.to_string());
            Ok((jar, Redirect::to("/register")))
        }
        Err(e) => Err(e),
    }
}

#[instrument(skip(state, jar, form))]
pub async fn login_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Redirect), AppError> {
    let username = normalize_username(&form.username);
    let password = form.password.trim();

    match authenticate(state.users.as_ref(), &username, password).await {
        Ok(()) => {
            let keys = SessionKeys::from_ref(&state);
            let token = keys.sign(&username)?;
            let jar = start_session(jar, &keys, token, state.config.session.cookie_secure);
            info!(username = %username, "user logged in");
            Ok((jar, Redirect::to("/dashboard")))
        }
        Err(e @ AppError::InvalidCredentials) => {
            let jar = flash::push(jar, FlashKind::Error, e.to_string());
            Ok((jar, Redirect::to("/login")))
        }
        Err(e) => Err(e),
    }
}

pub async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    (end_session(jar), Redirect::to("/login"))
}
