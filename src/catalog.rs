/*!
The fixed enumerations backing the form controls.

These mirror the enums of the remote API's schema; the API remains the
authority on what it actually accepts.
*/
use serde::{Deserialize, Serialize};

/// Enrollment track a student belongs to. One upload panel exists per
/// modality, and every student profile names exactly one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modality {
    #[default]
    #[serde(rename = "PRE_U")]
    PreU,
    #[serde(rename = "BECA_18")]
    Beca18,
    #[serde(rename = "SECUNDARIA")]
    Secundaria,
    #[serde(rename = "PRIMARIA")]
    Primaria,
    #[serde(rename = "COAR")]
    Coar,
    #[serde(rename = "PRIMERA_OPCION")]
    PrimeraOpcion,
}

impl Modality {
    pub const ALL: [Modality; 6] = [
        Modality::PreU,
        Modality::Beca18,
        Modality::Secundaria,
        Modality::Primaria,
        Modality::Coar,
        Modality::PrimeraOpcion,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Modality::PreU          => "PRE_U",
            Modality::Beca18        => "BECA_18",
            Modality::Secundaria    => "SECUNDARIA",
            Modality::Primaria      => "PRIMARIA",
            Modality::Coar          => "COAR",
            Modality::PrimeraOpcion => "PRIMERA_OPCION",
        }
    }
}

impl std::fmt::Display for Modality {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Modality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PRE_U"          => Ok(Modality::PreU),
            "BECA_18"        => Ok(Modality::Beca18),
            "SECUNDARIA"     => Ok(Modality::Secundaria),
            "PRIMARIA"       => Ok(Modality::Primaria),
            "COAR"           => Ok(Modality::Coar),
            "PRIMERA_OPCION" => Ok(Modality::PrimeraOpcion),
            _ => Err(format!("{:?} is not a valid modality.", s)),
        }
    }
}

/// Class schedule a student signs up for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Schedule {
    #[default]
    #[serde(rename = "TURNO_MANANA")]
    TurnoManana,
    #[serde(rename = "TURNO_TARDE")]
    TurnoTarde,
}

impl Schedule {
    pub const ALL: [Schedule; 2] = [Schedule::TurnoManana, Schedule::TurnoTarde];

    pub fn as_str(self) -> &'static str {
        match self {
            Schedule::TurnoManana => "TURNO_MANANA",
            Schedule::TurnoTarde  => "TURNO_TARDE",
        }
    }
}

impl std::fmt::Display for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a student pays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Investment {
    #[default]
    #[serde(rename = "POR_PARTES")]
    PorPartes,
    #[serde(rename = "MENSUALIDAD")]
    Mensualidad,
    #[serde(rename = "UNO_SOLO")]
    UnoSolo,
}

impl Investment {
    pub const ALL: [Investment; 3] = [
        Investment::PorPartes,
        Investment::Mensualidad,
        Investment::UnoSolo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Investment::PorPartes   => "POR_PARTES",
            Investment::Mensualidad => "MENSUALIDAD",
            Investment::UnoSolo     => "UNO_SOLO",
        }
    }
}

impl std::fmt::Display for Investment {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::ensure_logging;

    #[test]
    fn modality_from_path_segment() {
        ensure_logging();
        let m: Modality = "BECA_18".parse().unwrap();
        assert_eq!(m, Modality::Beca18);
        assert!("beca_18".parse::<Modality>().is_err());
        assert!("CICLO_VERANO".parse::<Modality>().is_err());
    }

    #[test]
    fn defaults_are_first_options() {
        ensure_logging();
        assert_eq!(Modality::default(), Modality::ALL[0]);
        assert_eq!(Schedule::default(), Schedule::ALL[0]);
        assert_eq!(Investment::default(), Investment::ALL[0]);
    }
}
