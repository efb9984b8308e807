/*!
The dashboard: one page composed of whichever sections the user's role
allows.

Every mount fetches the current user fresh; students additionally get
their leaderboards, fetched once and re-shaped locally when the exam
selector changes.
*/
use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    catalog::Modality,
    config::Glob,
    leaderboard::{self, Leaderboard, TableData},
    session::SessionStore,
    user::{Capabilities, Role, User},
};
use super::{
    error_page, redirect_to_login, serve_template,
    registration::{registration_view, RegistrationForm, RegistrationView},
    Feedback,
};

static LOAD_FALLBACK: &str = "Error al cargar los datos";

/// Outcome of a form submission, routed back into the section that
/// produced it on the next render.
#[derive(Debug)]
pub enum SectionFeedback {
    None,
    Registration {
        message: Feedback,
        form: RegistrationForm,
    },
    Upload {
        modality: Modality,
        message: Feedback,
        exam_name: String,
    },
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub exam: Option<String>,
}

#[derive(Debug, Serialize)]
struct ExamOption {
    name: String,
    selected: bool,
}

#[derive(Debug, Serialize)]
struct StudentSection {
    have_exams: bool,
    exam_options: Vec<ExamOption>,
    table: Option<TableData>,
}

#[derive(Debug, Serialize)]
struct PanelView {
    modality: &'static str,
    exam_name: String,
    message: Option<Feedback>,
}

#[derive(Debug, Serialize)]
struct DashboardData {
    role_name: String,
    role_class: String,
    no_access: bool,
    student: Option<StudentSection>,
    panels: Option<Vec<PanelView>>,
    registration: Option<RegistrationView>,
}

pub async fn dashboard(
    jar: CookieJar,
    Query(query): Query<DashboardQuery>,
    Extension(glob): Extension<Arc<Glob>>,
) -> Response {
    log::trace!("dashboard( exam: {:?} ) called.", &query.exam);

    compose(&glob, jar, query.exam.as_deref(), SectionFeedback::None).await
}

/**
The view composer. Fetches the current user (and, for students, the
leaderboards), derives capability flags, and renders the sections those
flags allow. A 401/403 from the API condemns the session: the token is
cleared and the browser sent back to login. Any other fetch failure gets
the error page and the token survives, since a flaky network is not
proof the session expired.
*/
pub async fn compose(
    glob: &Glob,
    jar: CookieJar,
    selected_exam: Option<&str>,
    feedback: SectionFeedback,
) -> Response {
    let session = SessionStore::from_jar(&jar);
    let token = match session.get() {
        Some(t) => t.to_owned(),
        None => { return redirect_to_login(); },
    };

    let user: User = match glob.api.me(&token).await {
        Ok(u) => u,
        Err(e) => {
            if e.is_auth_failure() {
                log::info!("Session token rejected by API; clearing session.");
                return (SessionStore::clear(jar), Redirect::to("/login"))
                    .into_response();
            }
            log::error!("Error fetching current user: {}", &e);
            return error_page(&glob.templates, &e.user_message(LOAD_FALLBACK));
        },
    };

    let role = user.role.tag();
    let caps = Capabilities::for_role(role);

    let student = if caps.is_student {
        let board = match glob.api.leaderboard(&token).await {
            Ok(b) => b,
            Err(e) => {
                if e.is_auth_failure() {
                    log::info!("Session token rejected by API; clearing session.");
                    return (SessionStore::clear(jar), Redirect::to("/login"))
                        .into_response();
                }
                log::error!("Error fetching leaderboard: {}", &e);
                return error_page(&glob.templates, &e.user_message(LOAD_FALLBACK));
            },
        };
        Some(student_section(&board, selected_exam))
    } else {
        None
    };

    let panels = if caps.is_admin {
        Some(panel_views(&feedback))
    } else {
        None
    };

    let registration = if caps.can_register {
        Some(match feedback {
            SectionFeedback::Registration { message, ref form } => {
                registration_view(form, Some(message))
            },
            _ => registration_view(&RegistrationForm::default(), None),
        })
    } else {
        None
    };

    let data = DashboardData {
        role_name: user.role.name.clone(),
        role_class: role_class(role),
        no_access: caps.none(),
        student,
        panels,
        registration,
    };

    serve_template(&glob.templates, StatusCode::OK, "dashboard", &data)
}

fn role_class(role: Role) -> String {
    match role {
        Role::Unknown => "role-default".to_owned(),
        known => format!("role-{}", known),
    }
}

/// Pick the selected exam (the requested one when it exists, else the
/// first key the server sent) and shape its table. Pure over the fetched
/// mapping; flipping the selector never costs another API call.
fn student_section(board: &Leaderboard, requested: Option<&str>) -> StudentSection {
    let selected = requested
        .filter(|name| board.contains_key(*name))
        .map(str::to_owned)
        .or_else(|| board.keys().next().cloned());

    let exam_options = board.keys()
        .map(|name| ExamOption {
            name: name.clone(),
            selected: Some(name.as_str()) == selected.as_deref(),
        })
        .collect();

    let table = selected.as_deref().and_then(|name| {
        board.get(name)
            .and_then(|entries| leaderboard::table_data(name, entries))
    });

    StudentSection {
        have_exams: !board.is_empty(),
        exam_options,
        table,
    }
}

fn panel_views(feedback: &SectionFeedback) -> Vec<PanelView> {
    Modality::ALL.iter()
        .map(|m| match feedback {
            SectionFeedback::Upload { modality, message, exam_name }
                if modality == m =>
            {
                PanelView {
                    modality: m.as_str(),
                    exam_name: exam_name.clone(),
                    message: Some(message.clone()),
                }
            },
            _ => PanelView {
                modality: m.as_str(),
                exam_name: String::new(),
                message: None,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::LeaderboardEntry;
    use crate::tests::ensure_logging;

    fn board() -> Leaderboard {
        let entry = |rank: u32, name: &str| LeaderboardEntry {
            id: rank as i64,
            student_name: name.to_owned(),
            rank,
            score: 20.0 - rank as f64,
        };

        let mut b = Leaderboard::new();
        b.insert("Simulacro A".to_owned(), vec![entry(1, "Ana"), entry(2, "Beto")]);
        b.insert("Simulacro B".to_owned(), vec![entry(1, "Carla")]);
        b.insert("Simulacro C".to_owned(), vec![]);
        b
    }

    #[test]
    fn first_exam_is_selected_by_default() {
        ensure_logging();

        let section = student_section(&board(), None);
        assert!(section.have_exams);
        assert!(section.exam_options[0].selected);
        assert_eq!(section.table.as_ref().unwrap().exam_name, "Simulacro A");
    }

    #[test]
    fn requested_exam_wins_when_it_exists() {
        ensure_logging();

        let section = student_section(&board(), Some("Simulacro B"));
        assert_eq!(section.table.as_ref().unwrap().exam_name, "Simulacro B");
        assert!(section.exam_options[1].selected);
        assert!(!section.exam_options[0].selected);

        // An unknown request falls back to the first key.
        let section = student_section(&board(), Some("Simulacro Z"));
        assert_eq!(section.table.as_ref().unwrap().exam_name, "Simulacro A");
    }

    #[test]
    fn exam_with_no_entries_gets_empty_state() {
        ensure_logging();

        let section = student_section(&board(), Some("Simulacro C"));
        assert!(section.have_exams);
        assert!(section.table.is_none());
    }

    #[test]
    fn no_exams_at_all() {
        ensure_logging();

        let section = student_section(&Leaderboard::new(), None);
        assert!(!section.have_exams);
        assert!(section.exam_options.is_empty());
        assert!(section.table.is_none());
    }

    #[test]
    fn switching_selection_and_back_reproduces_the_table() {
        ensure_logging();

        let b = board();
        let original = student_section(&b, Some("Simulacro A")).table;
        let _detour = student_section(&b, Some("Simulacro B"));
        let back = student_section(&b, Some("Simulacro A")).table;
        assert_eq!(original, back);
    }

    #[test]
    fn upload_feedback_lands_on_its_own_panel() {
        ensure_logging();

        let feedback = SectionFeedback::Upload {
            modality: Modality::Beca18,
            message: Feedback::error("Archivo corrupto".to_owned()),
            exam_name: "Simulacro A".to_owned(),
        };
        let panels = panel_views(&feedback);

        assert_eq!(panels.len(), Modality::ALL.len());
        let beca = panels.iter().find(|p| p.modality == "BECA_18").unwrap();
        assert!(beca.message.is_some());
        assert_eq!(beca.exam_name, "Simulacro A");
        let preu = panels.iter().find(|p| p.modality == "PRE_U").unwrap();
        assert!(preu.message.is_none());
        assert!(preu.exam_name.is_empty());
    }
}
