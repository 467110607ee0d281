pub mod error;
pub mod error_mapping;

pub use error::{ClusterError, DomainError, TransportError};
pub use error_mapping::{
    map_project_error, ExceptionMapper, ExceptionRule, ProjectContext, PROJECT_ERRORS,
    PROJECT_RULES,
};

/// The slice of a remote cluster client that commands depend on.
pub trait ClusterClient: Send + Sync {
    fn create_project(&self, name: &str) -> Result<(), TransportError>;

    fn delete_project(&self, name: &str) -> Result<(), TransportError>;
}

/// Routes every transport failure through the project exception mapper so
/// callers see `DomainError`s for known conditions.
pub struct ProjectProvisioner<'a> {
    client: &'a dyn ClusterClient,
}

impl<'a> ProjectProvisioner<'a> {
    pub fn new(client: &'a dyn ClusterClient) -> Self {
        Self { client }
    }

    pub fn create(&self, project: &str) -> Result<(), ClusterError> {
        self.client
            .create_project(project)
            .map_err(|err| map_project_error(err, &ProjectContext::new(project)))
    }

    pub fn delete(&self, project: &str) -> Result<(), ClusterError> {
        self.client
            .delete_project(project)
            .map_err(|err| map_project_error(err, &ProjectContext::new(project)))
    }
}
