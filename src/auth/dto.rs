use serde::{Deserialize, Serialize};

use crate::flash::Flash;

/// Registration form body.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

/// Login form body. The field is named `username` but holds the email.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// View model for the register and login pages.
#[derive(Debug, Serialize)]
pub struct AuthPage {
    pub title: &'static str,
    pub flash: Option<Flash>,
}
