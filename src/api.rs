/*!
Thin client for the remote administration API.

All the heavy lifting (credential checks, spreadsheet parsing, ranking)
happens on the other side; this client shuttles JSON and multipart bodies
back and forth with a bearer token. It never touches the session itself;
callers decide what a failure means for the stored token.
*/
use serde::Deserialize;
use serde_json::Value;

use crate::{
    leaderboard::Leaderboard,
    panel::UploadRequest,
    user::{RegistrationPayload, User},
};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("API responded with status {status}")]
    Status { status: u16, message: Option<String> },
    #[error("error reaching API: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// A 401/403 means the token is no good; anything else may be
    /// transient and doesn't condemn the session.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Status { status: 401 | 403, .. })
    }

    /// Message fit to put in front of a user: the server-supplied one when
    /// there is one, otherwise the caller's localized fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Status { message: Some(m), .. } => m.clone(),
            _ => fallback.to_owned(),
        }
    }
}

/// Pull a display message out of an API response body. The API is not
/// entirely consistent about the field name, so both spellings count.
fn body_message(body: &Value) -> Option<String> {
    body.get("message")
        .or_else(|| body.get("error"))
        .and_then(Value::as_str)
        .map(str::to_owned)
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Debug)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> ApiClient {
        ApiClient {
            base_url: base_url.trim_end_matches('/').to_owned(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", &self.base_url, path)
    }

    /// Turn a non-2xx response into an `ApiError`, salvaging the body's
    /// message if it parses.
    async fn fail(resp: reqwest::Response) -> ApiError {
        let status = resp.status().as_u16();
        let message = resp.json::<Value>().await
            .ok()
            .and_then(|body| body_message(&body));
        ApiError::Status { status, message }
    }

    /// `POST /auth/login`; no token attached. Returns the fresh one.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        log::trace!("ApiClient::login( {:?}, [ password ] ) called.", email);

        let resp = self.http.post(self.url("/auth/login"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send().await?;
        if !resp.status().is_success() {
            return Err(Self::fail(resp).await);
        }

        let body: LoginResponse = resp.json().await?;
        Ok(body.token)
    }

    /// `GET /auth/me`.
    pub async fn me(&self, token: &str) -> Result<User, ApiError> {
        log::trace!("ApiClient::me( ... ) called.");

        let resp = self.http.get(self.url("/auth/me"))
            .bearer_auth(token)
            .send().await?;
        if !resp.status().is_success() {
            return Err(Self::fail(resp).await);
        }

        Ok(resp.json().await?)
    }

    /// `GET /leaderboard`: exam name -> ordered entries, key order as the
    /// server sent it.
    pub async fn leaderboard(&self, token: &str) -> Result<Leaderboard, ApiError> {
        log::trace!("ApiClient::leaderboard( ... ) called.");

        let resp = self.http.get(self.url("/leaderboard"))
            .bearer_auth(token)
            .send().await?;
        if !resp.status().is_success() {
            return Err(Self::fail(resp).await);
        }

        Ok(resp.json().await?)
    }

    /// `POST /users/create`.
    pub async fn create_user(
        &self,
        token: &str,
        payload: &RegistrationPayload,
    ) -> Result<(), ApiError> {
        log::trace!("ApiClient::create_user( {:?} ) called.", &payload.email);

        let resp = self.http.post(self.url("/users/create"))
            .bearer_auth(token)
            .json(payload)
            .send().await?;
        if !resp.status().is_success() {
            return Err(Self::fail(resp).await);
        }

        Ok(())
    }

    /// `POST /leaderboard/upload`, multipart. Returns the server's
    /// success message.
    pub async fn upload_leaderboard(
        &self,
        token: &str,
        request: UploadRequest,
    ) -> Result<String, ApiError> {
        log::trace!(
            "ApiClient::upload_leaderboard( {}, {:?} ) called.",
            request.modality, &request.exam_name
        );

        let part = reqwest::multipart::Part::bytes(request.file.bytes)
            .file_name(request.file.name);
        let form = reqwest::multipart::Form::new()
            .text("modality", request.modality.as_str())
            .text("examName", request.exam_name)
            .part("leaderboardFile", part);

        let resp = self.http.post(self.url("/leaderboard/upload"))
            .bearer_auth(token)
            .multipart(form)
            .send().await?;
        if !resp.status().is_success() {
            return Err(Self::fail(resp).await);
        }

        let body: Value = resp.json().await.unwrap_or(Value::Null);
        Ok(body_message(&body)
            .unwrap_or_else(|| "Archivo subido correctamente.".to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::ensure_logging;

    #[test]
    fn message_extraction_prefers_message_field() {
        ensure_logging();

        let body = serde_json::json!({ "message": "Token expirado", "error": "nope" });
        assert_eq!(body_message(&body).as_deref(), Some("Token expirado"));

        let body = serde_json::json!({ "error": "Modalidad desconocida" });
        assert_eq!(body_message(&body).as_deref(), Some("Modalidad desconocida"));

        let body = serde_json::json!({ "detail": 42 });
        assert!(body_message(&body).is_none());
    }

    #[test]
    fn auth_failure_classification() {
        ensure_logging();

        let e = ApiError::Status { status: 401, message: None };
        assert!(e.is_auth_failure());
        let e = ApiError::Status { status: 403, message: None };
        assert!(e.is_auth_failure());
        let e = ApiError::Status { status: 500, message: None };
        assert!(!e.is_auth_failure());
    }

    #[test]
    fn user_message_falls_back_when_server_is_silent() {
        ensure_logging();

        let e = ApiError::Status { status: 400, message: Some("Correo ya registrado".to_owned()) };
        assert_eq!(e.user_message("fallback"), "Correo ya registrado");

        let e = ApiError::Status { status: 502, message: None };
        assert_eq!(e.user_message("Error al cargar los datos"), "Error al cargar los datos");
    }
}
