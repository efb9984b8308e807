/*!
The upload-panel state machine.

Each modality gets its own independent panel; no state is shared between
them. All the checks here happen before any request goes out, so a panel
that refuses a submission has cost nothing on the wire.
*/
use crate::catalog::Modality;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelState {
    Idle,
    FileStaged,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StagedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PanelError {
    #[error("Por favor, selecciona un archivo Excel válido (.xlsx o .xls)")]
    InvalidExtension,
    #[error("Por favor, selecciona un archivo y escribe un nombre para el simulacro.")]
    MissingInput,
    #[error("Hay una subida en curso; espera a que termine.")]
    SubmissionInFlight,
}

/// What actually goes over the wire for one submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadRequest {
    pub modality: Modality,
    pub exam_name: String,
    pub file: StagedFile,
}

/// Case-sensitive suffix check; the API only ingests Excel spreadsheets.
pub fn is_excel_name(name: &str) -> bool {
    name.ends_with(".xlsx") || name.ends_with(".xls")
}

#[derive(Clone, Debug)]
pub struct UploadPanel {
    modality: Modality,
    exam_name: String,
    file: Option<StagedFile>,
    state: PanelState,
}

impl UploadPanel {
    pub fn new(modality: Modality) -> UploadPanel {
        UploadPanel {
            modality,
            exam_name: String::new(),
            file: None,
            state: PanelState::Idle,
        }
    }

    pub fn modality(&self) -> Modality { self.modality }

    pub fn state(&self) -> PanelState { self.state }

    pub fn exam_name(&self) -> &str { &self.exam_name }

    pub fn staged_file(&self) -> Option<&StagedFile> { self.file.as_ref() }

    pub fn set_exam_name<S: Into<String>>(&mut self, name: S) {
        self.exam_name = name.into();
    }

    /// Stage a file for submission. A name without an Excel extension is
    /// rejected and the panel stays where it was.
    pub fn stage_file(&mut self, name: &str, bytes: Vec<u8>) -> Result<(), PanelError> {
        if !is_excel_name(name) {
            return Err(PanelError::InvalidExtension);
        }
        self.file = Some(StagedFile { name: name.to_owned(), bytes });
        self.state = PanelState::FileStaged;
        Ok(())
    }

    /// Unstage without submitting. The exam name survives.
    pub fn remove_file(&mut self) {
        self.file = None;
        self.state = PanelState::Idle;
    }

    /// Check the local preconditions and hand back the request to send.
    /// The staged file and exam name stay on the panel so a failed
    /// submission can be retried.
    pub fn begin_submit(&mut self) -> Result<UploadRequest, PanelError> {
        if self.state == PanelState::Submitting {
            return Err(PanelError::SubmissionInFlight);
        }

        let file = match &self.file {
            Some(f) if !self.exam_name.is_empty() => f.clone(),
            _ => { return Err(PanelError::MissingInput); },
        };

        self.state = PanelState::Submitting;
        Ok(UploadRequest {
            modality: self.modality,
            exam_name: self.exam_name.clone(),
            file,
        })
    }

    /// The server took it; clear both inputs.
    pub fn succeed(&mut self) {
        self.file = None;
        self.exam_name.clear();
        self.state = PanelState::Succeeded;
    }

    /// The server refused; everything stays put for a retry.
    pub fn fail(&mut self) {
        self.state = PanelState::Failed;
    }
}
