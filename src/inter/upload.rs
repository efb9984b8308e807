/*!
Fielding the per-modality leaderboard upload panels.

The handler rebuilds the panel's state machine from the multipart body,
lets it veto the submission locally, and only then forwards the file to
the API.
*/
use std::sync::Arc;

use axum::{
    extract::{Extension, Multipart, Path},
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    catalog::Modality,
    config::Glob,
    panel::UploadPanel,
    session::SessionStore,
};
use super::{
    dashboard::{compose, SectionFeedback},
    html_500, redirect_to_login, respond_bad_request, Feedback,
};

static UPLOAD_FALLBACK: &str = "Ocurrió un error al subir el archivo.";

/// Multipart field names, shared with the API's upload endpoint.
static FIELD_EXAM_NAME: &str = "examName";
static FIELD_FILE: &str = "leaderboardFile";

/// `POST /upload/:modality`.
pub async fn submit(
    jar: CookieJar,
    Path(modality): Path<String>,
    Extension(glob): Extension<Arc<Glob>>,
    mut multipart: Multipart,
) -> Response {
    log::trace!("upload::submit( {:?} ) called.", &modality);

    let modality: Modality = match modality.parse() {
        Ok(m) => m,
        Err(e) => { return respond_bad_request(e); },
    };

    let mut panel = UploadPanel::new(modality);
    let mut stage_error: Option<Feedback> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => {
                log::error!("Error reading multipart field: {}", &e);
                return html_500();
            },
        };

        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(n) if n == FIELD_EXAM_NAME => {
                let text = match field.text().await {
                    Ok(t) => t,
                    Err(e) => {
                        log::error!("Error reading exam name field: {}", &e);
                        return html_500();
                    },
                };
                panel.set_exam_name(text);
            },
            Some(n) if n == FIELD_FILE => {
                let file_name = field.file_name()
                    .map(str::to_owned)
                    .unwrap_or_default();
                let bytes = match field.bytes().await {
                    Ok(b) => b,
                    Err(e) => {
                        log::error!("Error reading file field: {}", &e);
                        return html_500();
                    },
                };
                if let Err(e) = panel.stage_file(&file_name, bytes.to_vec()) {
                    stage_error = Some(Feedback::error(e.to_string()));
                }
            },
            _ => { /* Unknown fields are someone else's problem. */ },
        }
    }

    if let Some(message) = stage_error {
        let feedback = SectionFeedback::Upload {
            modality,
            message,
            exam_name: panel.exam_name().to_owned(),
        };
        return compose(&glob, jar, None, feedback).await;
    }

    let request = match panel.begin_submit() {
        Ok(r) => r,
        Err(e) => {
            // Local precondition failure: nothing went over the wire.
            let feedback = SectionFeedback::Upload {
                modality,
                message: Feedback::error(e.to_string()),
                exam_name: panel.exam_name().to_owned(),
            };
            return compose(&glob, jar, None, feedback).await;
        },
    };

    let session = SessionStore::from_jar(&jar);
    let token = match session.get() {
        Some(t) => t.to_owned(),
        None => { return redirect_to_login(); },
    };

    let feedback = match glob.api.upload_leaderboard(&token, request).await {
        Ok(message) => {
            panel.succeed();
            SectionFeedback::Upload {
                modality,
                message: Feedback::success(message),
                exam_name: String::new(),
            }
        },
        Err(e) => {
            log::warn!("Error uploading leaderboard for {}: {}", modality, &e);
            panel.fail();
            SectionFeedback::Upload {
                modality,
                message: Feedback::error(e.user_message(UPLOAD_FALLBACK)),
                exam_name: panel.exam_name().to_owned(),
            }
        },
    };

    compose(&glob, jar, None, feedback).await
}
