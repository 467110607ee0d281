use super::error::{ClusterError, DomainError, TransportError};

/// Context handed to domain error factories for project operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectContext {
    pub project: String,
}

impl ProjectContext {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
        }
    }
}

pub struct ExceptionRule<C> {
    pub status_code: u16,
    pub reason_fragment: &'static str,
    pub build: fn(&C) -> DomainError,
}

impl<C> ExceptionRule<C> {
    fn matches(&self, err: &TransportError) -> bool {
        err.code == self.status_code && err.reason.contains(self.reason_fragment)
    }
}

fn duplicate_project(context: &ProjectContext) -> DomainError {
    DomainError::DuplicateResource {
        project: context.project.clone(),
    }
}

fn project_quota_exceeded(context: &ProjectContext) -> DomainError {
    DomainError::QuotaExceeded {
        project: context.project.clone(),
    }
}

pub const PROJECT_RULES: &[ExceptionRule<ProjectContext>] = &[
    ExceptionRule {
        status_code: 409,
        reason_fragment: "AlreadyExists",
        build: duplicate_project,
    },
    ExceptionRule {
        status_code: 403,
        reason_fragment: "cannot create more",
        build: project_quota_exceeded,
    },
];

/// Ordered rule table; the first rule matching both status code and reason
/// fragment wins.
pub struct ExceptionMapper<C: 'static> {
    rules: &'static [ExceptionRule<C>],
}

impl<C: 'static> ExceptionMapper<C> {
    pub const fn new(rules: &'static [ExceptionRule<C>]) -> Self {
        Self { rules }
    }

    pub fn map(&self, err: TransportError, context: &C) -> ClusterError {
        match self.rules.iter().find(|rule| rule.matches(&err)) {
            Some(rule) => ClusterError::Domain((rule.build)(context)),
            None => ClusterError::Transport(err),
        }
    }
}

pub const PROJECT_ERRORS: ExceptionMapper<ProjectContext> = ExceptionMapper::new(PROJECT_RULES);

pub fn map_project_error(err: TransportError, context: &ProjectContext) -> ClusterError {
    PROJECT_ERRORS.map(err, context)
}
