use crate::infra::in_memory_facade;
use clap::Args;
use grant_flow::config::GrantPolicyConfig;
use grant_flow::error::AppError;
use grant_flow::workflows::grants::{
    ActorRole, ApplicantId, ApplicationId, ApplicationStatusView, Decision, Evaluation, ExpertId,
    FundHolderId, GrantError, InMemoryGrantFacade,
};
use serde::Serialize;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Withdraw the application once review has started instead of evaluating it.
    #[arg(long)]
    pub(crate) withdraw: bool,
    /// Decision status the fund holder records.
    #[arg(long, default_value = "APPROVED")]
    pub(crate) status: String,
    /// Score the expert awards.
    #[arg(long, default_value_t = 85)]
    pub(crate) score: i32,
    /// Skip validation of scores and decision statuses.
    #[arg(long)]
    pub(crate) permissive: bool,
}

struct DemoActor {
    id: u64,
    name: &'static str,
    email: &'static str,
    role: ActorRole,
    detail: &'static str,
}

const APPLICANT: DemoActor = DemoActor {
    id: 1,
    name: "Alice",
    email: "alice@mail.com",
    role: ActorRole::Applicant,
    detail: "",
};
const EXPERT: DemoActor = DemoActor {
    id: 2,
    name: "Bob",
    email: "bob@mail.com",
    role: ActorRole::Expert,
    detail: "Physics",
};
const FUND_HOLDER: DemoActor = DemoActor {
    id: 3,
    name: "Charlie",
    email: "charlie@mail.com",
    role: ActorRole::FundHolder,
    detail: "Manager",
};

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        withdraw,
        status,
        score,
        permissive,
    } = args;

    let policy = if permissive {
        GrantPolicyConfig {
            strict_evaluation: false,
            require_evaluated_decision: false,
            strict_decision_status: false,
        }
    } else {
        GrantPolicyConfig::default()
    };
    let facade = in_memory_facade(policy);

    println!("Grant lifecycle demo");
    for actor in [&APPLICANT, &EXPERT, &FUND_HOLDER] {
        let detail = if actor.detail.is_empty() {
            String::new()
        } else {
            format!(" ({})", actor.detail)
        };
        println!(
            "- {} <{}> acting as {}{}",
            actor.name,
            actor.email,
            actor.role.label(),
            detail
        );
    }

    let applicant = ApplicantId(APPLICANT.id);
    let expert = ExpertId(EXPERT.id);
    let fund_holder = FundHolderId(FUND_HOLDER.id);

    println!("\nSubmission");
    let application = facade.submit_application(applicant, "Project X", "Description X")?;
    println!(
        "- {} submitted \"{}\" as application {}",
        APPLICANT.name, application.title, application.id
    );
    print_status(&facade, applicant)?;

    println!("\nReview");
    let assignment = facade.assign_experts(fund_holder, application.id, vec![expert])?;
    println!(
        "- {} assigned experts {:?} to application {}",
        FUND_HOLDER.name,
        assignment
            .expert_ids
            .iter()
            .map(|id| id.0)
            .collect::<Vec<_>>(),
        application.id
    );
    facade.start_review(fund_holder, application.id)?;
    print_status(&facade, applicant)?;

    if withdraw {
        println!("\nWithdrawal");
        facade.withdraw_application(applicant, application.id)?;
        println!("- {} withdrew application {}", APPLICANT.name, application.id);
        report_refusal(
            "evaluation",
            facade.evaluate_application(expert, application.id, score, "Good work"),
        );
        report_refusal(
            "decision",
            facade.make_decision(fund_holder, application.id, &status, "Excellent"),
        );
        return print_status(&facade, applicant);
    }

    println!("\nEvaluation");
    match facade.evaluate_application(expert, application.id, score, "Good work") {
        Ok(evaluation) => println!(
            "- {} saved evaluation {} with score {}",
            EXPERT.name, evaluation.id, evaluation.score
        ),
        Err(err) => println!("- Evaluation refused: {err}"),
    }
    print_status(&facade, applicant)?;

    println!("\nDecision");
    match facade.make_decision(fund_holder, application.id, &status, "Excellent") {
        Ok(decision) => println!(
            "- {} saved decision {} with status {}",
            FUND_HOLDER.name, decision.id, decision.status
        ),
        Err(err) => println!("- Decision refused: {err}"),
    }
    print_status(&facade, applicant)?;
    print_history(&facade, application.id)
}

fn report_refusal<T>(step: &str, result: Result<T, GrantError>) {
    match result {
        Ok(_) => println!("- {step} accepted"),
        Err(err) => println!("- {step} refused ({}): {err}", err.kind()),
    }
}

fn print_status(facade: &InMemoryGrantFacade, applicant: ApplicantId) -> Result<(), AppError> {
    for view in facade.view_status(applicant)? {
        println!("  [Status] {}", view.summary());
    }
    Ok(())
}

#[derive(Serialize)]
struct History {
    application: ApplicationStatusView,
    evaluations: Vec<Evaluation>,
    decisions: Vec<Decision>,
}

fn print_history(
    facade: &InMemoryGrantFacade,
    application_id: ApplicationId,
) -> Result<(), AppError> {
    let history = History {
        application: facade.status_view(application_id)?,
        evaluations: facade.evaluations(application_id)?,
        decisions: facade.decisions(application_id)?,
    };
    match serde_json::to_string_pretty(&history) {
        Ok(json) => println!("\nRecorded history:\n{json}"),
        Err(err) => println!("\nRecorded history unavailable: {err}"),
    }
    Ok(())
}
