/*!
Users, roles, and what each role is allowed to see.
*/
use serde::{Deserialize, Serialize};

use crate::catalog::{Investment, Modality, Schedule};

/// The closed set of roles this front end distinguishes. Role names the
/// API serves that we don't know collapse into `Unknown`, which carries
/// no capabilities.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Student,
    Teacher,
    Admin,
    Matriculador,
    Unknown,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let token = match self {
            Role::Student      => "student",
            Role::Teacher      => "teacher",
            Role::Admin        => "admin",
            Role::Matriculador => "matriculador",
            Role::Unknown      => "unknown",
        };

        write!(f, "{}", token)
    }
}

/// Role object as the API serves it: `{ "name": "..." }`.
#[derive(Clone, Debug, Deserialize)]
pub struct RoleInfo {
    pub name: String,
}

impl RoleInfo {
    /// Collapse the server's role name into the closed set. This is the
    /// only place a role string is ever compared.
    pub fn tag(&self) -> Role {
        match self.name.as_str() {
            "student"      => Role::Student,
            "teacher"      => Role::Teacher,
            "admin"        => Role::Admin,
            "matriculador" => Role::Matriculador,
            _ => Role::Unknown,
        }
    }
}

/// The current user, fetched fresh from `/auth/me` on every dashboard
/// mount and never cached beyond it.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: RoleInfo,
}

/// Which dashboard sections a role may render. Derivable with no network
/// round-trip; sections are independent and may all be on at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub is_admin: bool,
    pub can_register: bool,
    pub is_student: bool,
}

impl Capabilities {
    pub fn for_role(role: Role) -> Capabilities {
        match role {
            Role::Admin => Capabilities {
                is_admin: true,
                can_register: true,
                is_student: false,
            },
            Role::Matriculador => Capabilities {
                can_register: true,
                ..Capabilities::default()
            },
            Role::Student => Capabilities {
                is_student: true,
                ..Capabilities::default()
            },
            Role::Teacher | Role::Unknown => Capabilities::default(),
        }
    }

    /// True when no section at all applies; the dashboard then shows the
    /// "no additional permissions" notice.
    pub fn none(&self) -> bool {
        !(self.is_admin || self.can_register || self.is_student)
    }
}

/// The only roles the registration form can create.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegisterRole {
    #[default]
    Student,
    Teacher,
}

impl RegisterRole {
    pub const ALL: [RegisterRole; 2] = [RegisterRole::Student, RegisterRole::Teacher];

    pub fn as_str(self) -> &'static str {
        match self {
            RegisterRole::Student => "student",
            RegisterRole::Teacher => "teacher",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RegisterRole::Student => "Estudiante",
            RegisterRole::Teacher => "Docente",
        }
    }
}

/// Role-dependent half of a registration payload. Exactly one variant is
/// ever attached, picked by an exhaustive match on the selected role.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProfileData {
    Student {
        modality: Modality,
        schedule: Schedule,
        investment: Investment,
    },
    #[serde(rename_all = "camelCase")]
    Teacher {
        start_date: String,
        employment_status: String,
        specialty: String,
        academic_degree: String,
    },
}

/// What `POST /users/create` expects.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role_name: RegisterRole,
    pub profile_data: ProfileData,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::ensure_logging;

    fn role_of(name: &str) -> Role {
        RoleInfo { name: name.to_owned() }.tag()
    }

    #[test]
    fn capabilities_per_role() {
        ensure_logging();

        let admin = Capabilities::for_role(role_of("admin"));
        assert!(admin.is_admin && admin.can_register && !admin.is_student);

        let matriculador = Capabilities::for_role(role_of("matriculador"));
        assert_eq!(
            matriculador,
            Capabilities { can_register: true, ..Capabilities::default() }
        );

        let student = Capabilities::for_role(role_of("student"));
        assert_eq!(
            student,
            Capabilities { is_student: true, ..Capabilities::default() }
        );

        assert!(Capabilities::for_role(role_of("teacher")).none());
        assert!(Capabilities::for_role(role_of("janitor")).none());
    }

    #[test]
    fn unknown_role_names_collapse() {
        ensure_logging();
        assert_eq!(role_of("janitor"), Role::Unknown);
        assert_eq!(role_of("ADMIN"), Role::Unknown);
        assert_eq!(role_of("matriculador"), Role::Matriculador);
    }

    #[test]
    fn teacher_payload_carries_only_teacher_fields() {
        ensure_logging();

        let payload = RegistrationPayload {
            first_name: "Rosa".to_owned(),
            last_name: "Quispe".to_owned(),
            email: "rosa@example.com".to_owned(),
            password: "secret".to_owned(),
            role_name: RegisterRole::Teacher,
            profile_data: ProfileData::Teacher {
                start_date: "2026-03-01".to_owned(),
                employment_status: "Tiempo completo".to_owned(),
                specialty: "Matemáticas".to_owned(),
                academic_degree: "Licenciada".to_owned(),
            },
        };

        let v = serde_json::to_value(&payload).unwrap();
        assert_eq!(v["roleName"], "teacher");

        let profile = v["profileData"].as_object().unwrap();
        let mut keys: Vec<&str> = profile.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            ["academicDegree", "employmentStatus", "specialty", "startDate"]
        );
    }

    #[test]
    fn student_payload_shape() {
        ensure_logging();

        let payload = RegistrationPayload {
            first_name: "Juan".to_owned(),
            last_name: "Pérez".to_owned(),
            email: "juan@example.com".to_owned(),
            password: "secret".to_owned(),
            role_name: RegisterRole::Student,
            profile_data: ProfileData::Student {
                modality: Modality::Beca18,
                schedule: Schedule::TurnoTarde,
                investment: Investment::Mensualidad,
            },
        };

        let v = serde_json::to_value(&payload).unwrap();
        assert_eq!(v["roleName"], "student");
        assert_eq!(v["profileData"]["modality"], "BECA_18");
        assert_eq!(v["profileData"]["schedule"], "TURNO_TARDE");
        assert_eq!(v["profileData"]["investment"], "MENSUALIDAD");
        assert!(v["profileData"].get("startDate").is_none());
    }
}
