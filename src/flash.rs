//! One-shot messages carried across a redirect in the `flash` cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;

pub const FLASH_COOKIE_NAME: &str = "flash";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    fn as_str(self) -> &'static str {
        match self {
            FlashKind::Success => "success",
            FlashKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    fn encode(&self) -> String {
        format!("{}|{}", self.kind.as_str(), self.message)
    }

    fn decode(raw: &str) -> Option<Flash> {
        let (kind, message) = raw.split_once('|')?;
        let kind = match kind {
            "success" => FlashKind::Success,
            "error" => FlashKind::Error,
            _ => return None,
        };
        Some(Flash { kind, message: message.to_string() })
    }
}

pub fn push(jar: CookieJar, kind: FlashKind, message: impl Into<String>) -> CookieJar {
    let flash = Flash { kind, message: message.into() };
    let cookie = Cookie::build((FLASH_COOKIE_NAME, flash.encode()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    jar.add(cookie)
}

/// Returns the pending flash, if any, and a jar that clears it.
pub fn take(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let Some(raw) = jar.get(FLASH_COOKIE_NAME).map(|c| c.value().to_string()) else {
        return (jar, None);
    };
    (jar.remove(Cookie::build(FLASH_COOKIE_NAME).path("/")), Flash::decode(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_then_take_yields_message_once() {
        let jar = push(CookieJar::new(), FlashKind::Error, "Please login first");
        let (jar, flash) = take(jar);
        assert_eq!(
            flash,
            Some(Flash { kind: FlashKind::Error, message: "Please login first".into() })
        );
        let (_, again) = take(jar);
        assert_eq!(again, None);
    }

    #[test]
    fn message_may_contain_separator() {
        let decoded = Flash::decode("success|a|b").unwrap();
        assert_eq!(decoded.kind, FlashKind::Success);
        assert_eq!(decoded.message, "a|b");
    }

    #[test]
    fn unknown_kind_is_ignored() {
        assert_eq!(Flash::decode("info|hello"), None);
        assert_eq!(Flash::decode("no separator"), None);
    }
}
