use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::auth::jwt::SessionKeys;

pub const SESSION_COOKIE_NAME: &str = "session";

/// Identity of the logged-in user, attached to each gated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub username: String,
}

/// Reads the session cookie and validates it. Anything invalid is anonymous.
pub fn current_user(keys: &SessionKeys, jar: &CookieJar) -> Option<CurrentUser> {
    let token = jar.get(SESSION_COOKIE_NAME)?.value();
    keys.verify(token)
        .ok()
        .map(|claims| CurrentUser { username: claims.sub })
}

pub fn start_session(jar: CookieJar, keys: &SessionKeys, token: String, secure: bool) -> CookieJar {
    let cookie = Cookie::build((SESSION_COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(keys.ttl.as_secs() as i64));
    jar.add(cookie)
}

pub fn end_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE_NAME).path("/"))
}
