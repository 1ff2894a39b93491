//! Admin login and logout route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::middleware::auth::LOGIN_PATH;
use crate::services::auth::{self, AuthError};
use crate::state::AppState;

pub const INVALID_LOGIN: &str = "Invalid username or password";

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}

/// Display the login page, or skip it when already logged in.
pub async fn login_page(session: Session) -> Response {
    if auth::is_authenticated(&session).await {
        return Redirect::to("/admin").into_response();
    }
    LoginTemplate { error: None }.into_response()
}

/// Handle login form submission.
///
/// Bad credentials re-render the form with a generic error. Neither the
/// username nor the password is echoed back.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let password = SecretString::from(form.password);
    match auth::login(&session, state.admins(), &form.username, password).await {
        Ok(admin) => {
            set_sentry_user(&admin.id, &admin.username);
            Ok(Redirect::to("/admin").into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::info!("Admin login rejected");
            Ok((
                StatusCode::UNAUTHORIZED,
                LoginTemplate {
                    error: Some(INVALID_LOGIN.to_string()),
                },
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Handle logout.
pub async fn logout(session: Session) -> Result<Redirect, AppError> {
    auth::logout(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to(LOGIN_PATH))
}
