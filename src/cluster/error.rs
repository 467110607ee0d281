/// Failure reported by the remote cluster client: a status code plus the
/// free-text reason from the status body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cluster request failed with status {code}: {reason}")]
pub struct TransportError {
    pub code: u16,
    pub reason: String,
}

impl TransportError {
    pub fn new(code: u16, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("project `{project}` already exists")]
    DuplicateResource { project: String },
    #[error("quota exceeded while creating project `{project}`")]
    QuotaExceeded { project: String },
}

/// Either a recognised domain condition or the untouched transport failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClusterError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ClusterError {
    pub fn is_domain(&self) -> bool {
        matches!(self, Self::Domain(_))
    }
}
