use super::common::*;
use crate::workflows::grants::decision::{DecisionPolicy, DecisionService, DecisionStatus};
use crate::workflows::grants::domain::ExpertId;
use crate::workflows::grants::lifecycle::LifecycleState;
use crate::workflows::grants::repository::{DecisionRepository, InMemoryDecisionRepository};
use crate::workflows::grants::GrantError;
use std::sync::Arc;

fn service(
    policy: DecisionPolicy,
) -> (
    DecisionService<InMemoryDecisionRepository>,
    Arc<InMemoryDecisionRepository>,
) {
    let repository = Arc::new(InMemoryDecisionRepository::default());
    (DecisionService::new(repository.clone(), policy), repository)
}

fn lenient() -> DecisionPolicy {
    DecisionPolicy {
        require_evaluated: false,
        strict_status: false,
    }
}

#[test]
fn approval_moves_evaluated_application_to_approved() {
    let (service, repository) = service(DecisionPolicy::default());
    let mut application = evaluated_application();

    let decision = service
        .record_decision(&mut application, CHARLIE, "APPROVED", "Excellent")
        .expect("decision recorded");

    assert_eq!(decision.status, DecisionStatus::Approved);
    assert_eq!(decision.application_id, application.id);
    assert_eq!(decision.notes, "Excellent");
    assert_eq!(application.state(), LifecycleState::Approved);
    assert_eq!(repository.len().expect("count"), 1);
}

#[test]
fn strict_status_accepts_case_insensitive_known_values() {
    assert_eq!(
        DecisionStatus::parse(" rejected ", true).expect("parses"),
        DecisionStatus::Rejected
    );
    assert_eq!(
        DecisionStatus::parse("Approved", true).expect("parses"),
        DecisionStatus::Approved
    );
    match DecisionStatus::parse("PENDING", true) {
        Err(GrantError::InvalidDecisionStatus(raw)) => assert_eq!(raw, "PENDING"),
        other => panic!("expected invalid status, got {other:?}"),
    }
}

#[test]
fn lenient_status_maps_unknown_literals_to_rejected() {
    for literal in ["PENDING", "approved", " APPROVED"] {
        assert_eq!(
            DecisionStatus::parse(literal, false).expect("lenient never fails"),
            DecisionStatus::Rejected
        );
    }
    assert_eq!(
        DecisionStatus::parse("APPROVED", false).expect("lenient never fails"),
        DecisionStatus::Approved
    );

    let (service, _) = service(lenient());
    let mut application = evaluated_application();
    let decision = service
        .record_decision(&mut application, CHARLIE, "on hold", "Unclear")
        .expect("lenient decision recorded");
    assert_eq!(decision.status, DecisionStatus::Rejected);
    assert_eq!(application.state(), LifecycleState::Rejected);
}

#[test]
fn lenient_decisions_keep_the_status_text_as_given() {
    let (service, repository) = service(lenient());
    let mut application = evaluated_application();

    service
        .record_decision(&mut application, CHARLIE, "on hold", "Unclear")
        .expect("lenient decision recorded");

    let stored = repository
        .for_application(application.id)
        .expect("listing");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].status_text, "on hold");
    assert_eq!(stored[0].status, DecisionStatus::Rejected);
    assert_eq!(application.state(), LifecycleState::Rejected);
}

#[test]
fn strict_decisions_record_the_literal_alongside_the_parsed_status() {
    let (service, _) = service(DecisionPolicy::default());
    let mut application = evaluated_application();

    let decision = service
        .record_decision(&mut application, CHARLIE, "approved", "Excellent")
        .expect("decision recorded");

    assert_eq!(decision.status, DecisionStatus::Approved);
    assert_eq!(decision.status_text, "approved");
    let value = serde_json::to_value(&decision).expect("serializes");
    assert_eq!(value["status"], "APPROVED");
    assert_eq!(value["status_text"], "approved");
}

#[test]
fn strict_decisions_require_evaluated_state() {
    let (service, repository) = service(DecisionPolicy::default());
    let mut application = under_review_application();

    match service.record_decision(&mut application, CHARLIE, "APPROVED", "Too early") {
        Err(GrantError::StateMismatch {
            expected, actual, ..
        }) => {
            assert_eq!(expected, LifecycleState::Evaluated);
            assert_eq!(actual, LifecycleState::UnderReview);
        }
        other => panic!("expected state mismatch, got {other:?}"),
    }
    assert_eq!(application.state(), LifecycleState::UnderReview);
    assert!(repository.is_empty().expect("count"));
}

#[test]
fn lenient_decisions_store_records_without_state_change() {
    let (service, repository) = service(lenient());
    let mut application = submitted_application();

    let decision = service
        .record_decision(&mut application, CHARLIE, "APPROVED", "Skipped review")
        .expect("record stored");

    assert_eq!(decision.status, DecisionStatus::Approved);
    assert_eq!(application.state(), LifecycleState::Submitted);
    assert_eq!(
        repository
            .for_application(application.id)
            .expect("listing")
            .len(),
        1
    );
}

#[test]
fn decision_ids_increase_from_one() {
    let (service, _) = service(DecisionPolicy::default());
    let ids: Vec<u64> = (0..3)
        .map(|_| {
            let mut application = evaluated_application();
            service
                .record_decision(&mut application, CHARLIE, "REJECTED", "")
                .expect("recorded")
                .id
                .0
        })
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn expert_assignment_is_advisory() {
    let (service, _) = service(DecisionPolicy::default());
    let application = submitted_application();

    let assignment = service
        .assign_experts(&application, CHARLIE, vec![BOB, ExpertId(5)])
        .expect("assignment recorded");

    assert_eq!(assignment.expert_ids, vec![BOB, ExpertId(5)]);
    assert_eq!(application.state(), LifecycleState::Submitted);
    assert_eq!(
        service
            .assignments_for(application.id)
            .expect("listing")
            .len(),
        1
    );

    match service.assign_experts(&application, CHARLIE, Vec::new()) {
        Err(GrantError::NoExpertsAssigned) => {}
        other => panic!("expected missing experts error, got {other:?}"),
    }
}
