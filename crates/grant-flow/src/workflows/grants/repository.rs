use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::decision::{Decision, ExpertAssignment};
use super::domain::{ApplicantId, Application, ApplicationId, DecisionId, EvaluationId};
use super::evaluation::Evaluation;

/// Storage for applications so the registry and facade can be exercised in isolation.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError>;
    fn update(&self, application: Application) -> Result<(), RepositoryError>;
    fn fetch(&self, id: ApplicationId) -> Result<Option<Application>, RepositoryError>;
    /// Applications owned by `applicant_id`, ascending by id.
    fn by_applicant(&self, applicant_id: ApplicantId) -> Result<Vec<Application>, RepositoryError>;
}

/// Append-only store of expert evaluations.
pub trait EvaluationRepository: Send + Sync {
    fn insert(&self, evaluation: Evaluation) -> Result<Evaluation, RepositoryError>;
    fn for_application(&self, id: ApplicationId) -> Result<Vec<Evaluation>, RepositoryError>;
}

/// Append-only store of fund-holder decisions and expert assignments.
pub trait DecisionRepository: Send + Sync {
    fn insert(&self, decision: Decision) -> Result<Decision, RepositoryError>;
    fn for_application(&self, id: ApplicationId) -> Result<Vec<Decision>, RepositoryError>;
    fn record_assignment(&self, assignment: ExpertAssignment) -> Result<(), RepositoryError>;
    fn assignments_for(&self, id: ApplicationId)
        -> Result<Vec<ExpertAssignment>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
}

/// Process-local application store keyed by id.
#[derive(Debug, Default, Clone)]
pub struct InMemoryApplicationRepository {
    records: Arc<Mutex<BTreeMap<ApplicationId, Application>>>,
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.id, application.clone());
        Ok(application)
    }

    fn update(&self, application: Application) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.records)?;
        match guard.get_mut(&application.id) {
            Some(slot) => {
                *slot = application;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Ok(lock(&self.records)?.get(&id).cloned())
    }

    fn by_applicant(&self, applicant_id: ApplicantId) -> Result<Vec<Application>, RepositoryError> {
        Ok(lock(&self.records)?
            .values()
            .filter(|application| application.is_owned_by(applicant_id))
            .cloned()
            .collect())
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryEvaluationRepository {
    records: Arc<Mutex<BTreeMap<EvaluationId, Evaluation>>>,
}

impl InMemoryEvaluationRepository {
    pub fn len(&self) -> Result<usize, RepositoryError> {
        Ok(lock(&self.records)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.len()? == 0)
    }
}

impl EvaluationRepository for InMemoryEvaluationRepository {
    fn insert(&self, evaluation: Evaluation) -> Result<Evaluation, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.contains_key(&evaluation.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(evaluation.id, evaluation.clone());
        Ok(evaluation)
    }

    fn for_application(&self, id: ApplicationId) -> Result<Vec<Evaluation>, RepositoryError> {
        Ok(lock(&self.records)?
            .values()
            .filter(|evaluation| evaluation.application_id == id)
            .cloned()
            .collect())
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryDecisionRepository {
    decisions: Arc<Mutex<BTreeMap<DecisionId, Decision>>>,
    assignments: Arc<Mutex<Vec<ExpertAssignment>>>,
}

impl InMemoryDecisionRepository {
    pub fn len(&self) -> Result<usize, RepositoryError> {
        Ok(lock(&self.decisions)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.len()? == 0)
    }
}

impl DecisionRepository for InMemoryDecisionRepository {
    fn insert(&self, decision: Decision) -> Result<Decision, RepositoryError> {
        let mut guard = lock(&self.decisions)?;
        if guard.contains_key(&decision.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(decision.id, decision.clone());
        Ok(decision)
    }

    fn for_application(&self, id: ApplicationId) -> Result<Vec<Decision>, RepositoryError> {
        Ok(lock(&self.decisions)?
            .values()
            .filter(|decision| decision.application_id == id)
            .cloned()
            .collect())
    }

    fn record_assignment(&self, assignment: ExpertAssignment) -> Result<(), RepositoryError> {
        lock(&self.assignments)?.push(assignment);
        Ok(())
    }

    fn assignments_for(
        &self,
        id: ApplicationId,
    ) -> Result<Vec<ExpertAssignment>, RepositoryError> {
        Ok(lock(&self.assignments)?
            .iter()
            .filter(|assignment| assignment.application_id == id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn poison<T: Send + 'static>(mutex: Arc<Mutex<T>>) {
        let _ = thread::spawn(move || {
            let _guard = mutex.lock().expect("fresh lock");
            panic!("store poisoned while held");
        })
        .join();
    }

    #[test]
    fn poisoned_stores_report_unavailable_instead_of_empty() {
        let evaluations = InMemoryEvaluationRepository::default();
        poison(evaluations.records.clone());
        assert!(matches!(
            evaluations.len(),
            Err(RepositoryError::Unavailable(_))
        ));
        assert!(matches!(
            evaluations.is_empty(),
            Err(RepositoryError::Unavailable(_))
        ));

        let decisions = InMemoryDecisionRepository::default();
        poison(decisions.decisions.clone());
        assert!(matches!(
            decisions.is_empty(),
            Err(RepositoryError::Unavailable(_))
        ));
    }

    #[test]
    fn healthy_stores_count_their_records() {
        let decisions = InMemoryDecisionRepository::default();
        assert_eq!(decisions.len().expect("count"), 0);
        assert!(decisions.is_empty().expect("count"));
    }
}
