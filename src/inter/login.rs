/*!
Logging in and out.
*/
use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::json;

use crate::config::Glob;
use crate::session::SessionStore;
use super::serve_template;

static LOGIN_FALLBACK: &str = "Error al iniciar sesión";

/// Data type to read the form data from a front-page login request.
#[derive(Deserialize, Debug)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// `GET /` just forwards to the dashboard; the route guard bounces
/// visitors without a session on to the login view from there.
pub async fn root() -> Redirect {
    Redirect::to("/dashboard")
}

pub async fn form(Extension(glob): Extension<Arc<Glob>>) -> Response {
    serve_template(&glob.templates, StatusCode::OK, "login", &json!({}))
}

/// Trade credentials for a token at the API and persist it in the session
/// cookie.
pub async fn submit(
    jar: CookieJar,
    Extension(glob): Extension<Arc<Glob>>,
    Form(form): Form<LoginForm>,
) -> Response {
    log::trace!("login::submit( {:?} ) called.", &form.email);

    match glob.api.login(&form.email, &form.password).await {
        Ok(token) => {
            let jar = SessionStore::set(jar, &token);
            (jar, Redirect::to("/dashboard")).into_response()
        },
        Err(e) => {
            log::warn!("Login failed for {:?}: {}", &form.email, &e);
            let data = json!({
                "error": e.user_message(LOGIN_FALLBACK),
                "email": &form.email,
            });
            serve_template(&glob.templates, StatusCode::UNAUTHORIZED, "login", &data)
        },
    }
}

pub async fn logout(jar: CookieJar) -> Response {
    log::trace!("login::logout() called.");

    (SessionStore::clear(jar), Redirect::to("/login")).into_response()
}
