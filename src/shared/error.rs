use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

/// Domain errors for ticket operations. Handlers map these to
/// `(StatusCode, String)` responses; none of them is fatal and a failed
/// operation leaves the store unchanged.
#[derive(Debug, Error)]
pub enum TicketError {
    #[error("{0}")]
    Validation(String),

    #[error("ticket {0} not found")]
    NotFound(Uuid),

    #[error("operation requires the it-staff role")]
    StaffOnly,

    #[error("no tickets match the current filter")]
    NothingToExport,

    #[error("export failed: {0}")]
    Export(#[source] anyhow::Error),
}

impl TicketError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) | Self::NothingToExport => StatusCode::NOT_FOUND,
            Self::StaffOnly => StatusCode::FORBIDDEN,
            Self::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TicketError> for (StatusCode, String) {
    fn from(err: TicketError) -> Self {
        (err.status_code(), err.to_string())
    }
}
