/*!
Registering new users (admins and matriculadores only see this form).
*/
use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::Response,
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    catalog::{Investment, Modality, Schedule},
    config::Glob,
    session::SessionStore,
    user::{ProfileData, RegisterRole, RegistrationPayload},
};
use super::{
    dashboard::{compose, SectionFeedback},
    serve_template, Feedback,
};

static CREATE_FALLBACK: &str = "Ocurrió un error al crear el usuario.";
static NOT_AUTHENTICATED: &str = "No estás autenticado. Por favor, inicia sesión de nuevo.";

/**
Everything the registration form posts, both profile sub-schemas
included. The browser submits whatever the user typed into either
section; only the sub-schema matching the selected role makes it into
the payload.
*/
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role_name: RegisterRole,
    pub modality: Modality,
    pub schedule: Schedule,
    pub investment: Investment,
    pub start_date: String,
    pub employment_status: String,
    pub specialty: String,
    pub academic_degree: String,
}

impl RegistrationForm {
    /// Exactly one profile sub-schema rides along, picked by the role
    /// selected at submit time. Values entered under the other role stay
    /// behind in the form state and never reach the wire.
    pub fn payload(&self) -> RegistrationPayload {
        let profile_data = match self.role_name {
            RegisterRole::Student => ProfileData::Student {
                modality: self.modality,
                schedule: self.schedule,
                investment: self.investment,
            },
            RegisterRole::Teacher => ProfileData::Teacher {
                start_date: self.start_date.clone(),
                employment_status: self.employment_status.clone(),
                specialty: self.specialty.clone(),
                academic_degree: self.academic_degree.clone(),
            },
        };

        RegistrationPayload {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            role_name: self.role_name,
            profile_data,
        }
    }
}

#[derive(Debug, Serialize)]
struct SelectOption {
    value: &'static str,
    label: &'static str,
    selected: bool,
}

/// Template-shaped view of the registration section, defaults or the
/// retained values of a failed submission.
#[derive(Debug, Serialize)]
pub struct RegistrationView {
    message: Option<Feedback>,
    first_name: String,
    last_name: String,
    email: String,
    password: String,
    role_options: Vec<SelectOption>,
    modality_options: Vec<SelectOption>,
    schedule_options: Vec<SelectOption>,
    investment_options: Vec<SelectOption>,
    start_date: String,
    employment_status: String,
    specialty: String,
    academic_degree: String,
}

pub(super) fn registration_view(
    form: &RegistrationForm,
    message: Option<Feedback>,
) -> RegistrationView {
    let role_options = RegisterRole::ALL.iter()
        .map(|r| SelectOption {
            value: r.as_str(),
            label: r.label(),
            selected: *r == form.role_name,
        })
        .collect();
    let modality_options = Modality::ALL.iter()
        .map(|m| SelectOption {
            value: m.as_str(),
            label: m.as_str(),
            selected: *m == form.modality,
        })
        .collect();
    let schedule_options = Schedule::ALL.iter()
        .map(|s| SelectOption {
            value: s.as_str(),
            label: s.as_str(),
            selected: *s == form.schedule,
        })
        .collect();
    let investment_options = Investment::ALL.iter()
        .map(|i| SelectOption {
            value: i.as_str(),
            label: i.as_str(),
            selected: *i == form.investment,
        })
        .collect();

    RegistrationView {
        message,
        first_name: form.first_name.clone(),
        last_name: form.last_name.clone(),
        email: form.email.clone(),
        password: form.password.clone(),
        role_options,
        modality_options,
        schedule_options,
        investment_options,
        start_date: form.start_date.clone(),
        employment_status: form.employment_status.clone(),
        specialty: form.specialty.clone(),
        academic_degree: form.academic_degree.clone(),
    }
}

/// `POST /register`. Success clears the form back to defaults; failure
/// keeps everything the user typed so they can fix and resubmit.
pub async fn submit(
    jar: CookieJar,
    Extension(glob): Extension<Arc<Glob>>,
    Form(form): Form<RegistrationForm>,
) -> Response {
    log::trace!("registration::submit( {:?} ) called.", &form.email);

    let session = SessionStore::from_jar(&jar);
    let token = match session.get() {
        Some(t) => t.to_owned(),
        None => {
            // The route guard checked for a token, but the session may
            // have been cleared in another tab while the form sat open.
            let data = json!({ "error": NOT_AUTHENTICATED });
            return serve_template(
                &glob.templates,
                StatusCode::UNAUTHORIZED,
                "login",
                &data
            );
        },
    };

    let feedback = match glob.api.create_user(&token, &form.payload()).await {
        Ok(()) => SectionFeedback::Registration {
            message: Feedback::success(
                format!("Usuario '{}' creado exitosamente.", &form.email)
            ),
            form: RegistrationForm::default(),
        },
        Err(e) => {
            log::warn!("Error creating user {:?}: {}", &form.email, &e);
            SectionFeedback::Registration {
                message: Feedback::error(e.user_message(CREATE_FALLBACK)),
                form,
            }
        },
    };

    compose(&glob, jar, None, feedback).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::ensure_logging;

    /// Form state with values left over in *both* profile sections, as
    /// happens when the user flips the role selector back and forth.
    fn mixed_form(role: RegisterRole) -> RegistrationForm {
        RegistrationForm {
            first_name: "Luz".to_owned(),
            last_name: "Paredes".to_owned(),
            email: "luz@example.com".to_owned(),
            password: "secret".to_owned(),
            role_name: role,
            modality: Modality::Coar,
            schedule: Schedule::TurnoTarde,
            investment: Investment::UnoSolo,
            start_date: "2026-04-01".to_owned(),
            employment_status: "Medio tiempo".to_owned(),
            specialty: "Física".to_owned(),
            academic_degree: "Magíster".to_owned(),
        }
    }

    #[test]
    fn teacher_submission_drops_student_leftovers() {
        ensure_logging();

        let payload = mixed_form(RegisterRole::Teacher).payload();
        let v = serde_json::to_value(&payload).unwrap();

        let profile = v["profileData"].as_object().unwrap();
        assert!(profile.get("modality").is_none());
        assert!(profile.get("schedule").is_none());
        assert!(profile.get("investment").is_none());
        assert_eq!(profile["startDate"], "2026-04-01");
        assert_eq!(profile["academicDegree"], "Magíster");
    }

    #[test]
    fn student_submission_drops_teacher_leftovers() {
        ensure_logging();

        let payload = mixed_form(RegisterRole::Student).payload();
        let v = serde_json::to_value(&payload).unwrap();

        let profile = v["profileData"].as_object().unwrap();
        assert!(profile.get("startDate").is_none());
        assert!(profile.get("specialty").is_none());
        assert_eq!(profile["modality"], "COAR");
    }

    #[test]
    fn failed_submission_view_retains_entries() {
        ensure_logging();

        let form = mixed_form(RegisterRole::Teacher);
        let view = registration_view(
            &form,
            Some(Feedback::error("Correo ya registrado".to_owned()))
        );

        assert_eq!(view.first_name, "Luz");
        assert_eq!(view.start_date, "2026-04-01");
        let teacher = view.role_options.iter().find(|o| o.value == "teacher").unwrap();
        assert!(teacher.selected);
        let coar = view.modality_options.iter().find(|o| o.value == "COAR").unwrap();
        assert!(coar.selected);
    }

    #[test]
    fn default_view_selects_first_options() {
        ensure_logging();

        let view = registration_view(&RegistrationForm::default(), None);
        assert!(view.role_options[0].selected);
        assert!(view.modality_options[0].selected);
        assert!(view.first_name.is_empty());
    }
}
