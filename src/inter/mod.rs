/*!
Interoperation between the browser and this front end.

(Everything that talks to the remote API lives in `api`; this tree only
composes views and fields form submissions.)
*/
use std::fmt::Debug;

use axum::{
    http::{Request, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use handlebars::Handlebars;
use serde::Serialize;

use crate::session::SessionStore;

pub mod dashboard;
pub mod login;
pub mod registration;
pub mod upload;

static HTML_500: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<title>Aduni Vallejo | Error</title>
<link rel="stylesheet" href="/static/aduni.css">
</head>
<body>
<h1>Internal Server Error</h1>
<p>(Error 500)</p>
<p>Something went wrong on our end. No further or more
helpful information is available about the problem.</p>
</body>
</html>"#;

/// One user-facing outcome message, success or error, bound for a
/// template.
#[derive(Clone, Debug, Serialize)]
pub struct Feedback {
    pub kind: &'static str,
    pub text: String,
}

impl Feedback {
    pub fn success(text: String) -> Feedback {
        Feedback { kind: "success", text }
    }

    pub fn error(text: String) -> Feedback {
        Feedback { kind: "error", text }
    }
}

/**
Return an HTML response in the case of an unrecoverable* error.

(*"Unrecoverable" from the perspective of fielding the current request,
not from the perspective of the program crashing.)
*/
pub fn html_500() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(HTML_500)
    ).into_response()
}

pub fn respond_bad_request(msg: String) -> Response {
    log::trace!("respond_bad_request( {:?} ) called.", &msg);

    (
        StatusCode::BAD_REQUEST,
        msg
    ).into_response()
}

pub fn serve_template<S>(
    templates: &Handlebars,
    code: StatusCode,
    template_name: &str,
    data: &S,
) -> Response
where
    S: Serialize + Debug
{
    log::trace!("serve_template( {}, {:?}, ... ) called.", &code, template_name);

    match templates.render(template_name, data) {
        Ok(response_body) => (
            code,
            Html(response_body)
        ).into_response(),
        Err(e) => {
            log::error!(
                "Error rendering template {:?} with data {:?}:\n{}",
                template_name, data, &e
            );
            html_500()
        },
    }
}

pub fn redirect_to_login() -> Response {
    Redirect::to("/login").into_response()
}

/// Error page for a protected view that failed to load for reasons other
/// than an expired session; the token survives.
pub fn error_page(templates: &Handlebars, message: &str) -> Response {
    serve_template(
        templates,
        StatusCode::BAD_GATEWAY,
        "error",
        &serde_json::json!({ "message": message })
    )
}

/// Route guard for the protected views. Presence check only: whether the
/// token is still any good is the API's call to make, discovered when the
/// view composer uses it.
pub async fn require_session<B>(
    jar: CookieJar,
    req: Request<B>,
    next: Next<B>,
) -> Response {
    if SessionStore::from_jar(&jar).get().is_none() {
        log::trace!("require_session: no session token; redirecting to login.");
        return redirect_to_login();
    }

    next.run(req).await
}
