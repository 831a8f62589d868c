use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::info;

use super::domain::{ApplicantId, Application, ApplicationId};
use super::error::GrantError;
use super::repository::{ApplicationRepository, RepositoryError};

/// Creates applications and indexes them by owner.
pub struct ApplicationRegistry<R> {
    repository: Arc<R>,
    sequence: AtomicU64,
}

impl<R> ApplicationRegistry<R>
where
    R: ApplicationRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            sequence: AtomicU64::new(1),
        }
    }

    /// Register a new application in the `Submitted` state.
    pub fn create(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
        applicant_id: ApplicantId,
    ) -> Result<Application, GrantError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(GrantError::InvalidTitle);
        }

        let id = ApplicationId(self.sequence.fetch_add(1, Ordering::Relaxed));
        let application = Application::new(id, title, description.into(), applicant_id);
        let stored = self.repository.insert(application)?;
        info!(application_id = %stored.id, %applicant_id, "application created");
        Ok(stored)
    }

    pub fn get(&self, id: ApplicationId) -> Result<Application, GrantError> {
        self.repository
            .fetch(id)?
            .ok_or(GrantError::NotFound(id))
    }

    pub fn list_by_applicant(
        &self,
        applicant_id: ApplicantId,
    ) -> Result<Vec<Application>, GrantError> {
        Ok(self.repository.by_applicant(applicant_id)?)
    }

    pub fn save(&self, application: &Application) -> Result<(), GrantError> {
        self.repository
            .update(application.clone())
            .map_err(|err| match err {
                RepositoryError::NotFound => GrantError::NotFound(application.id),
                other => GrantError::Repository(other),
            })
    }
}
