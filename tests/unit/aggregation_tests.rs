use geoprompt::models::intent::IntentType;
use geoprompt::models::plan::ResultStatus;
use geoprompt::models::response::StepReport;
use geoprompt::orchestrator::aggregate_status;

fn step(status: ResultStatus) -> StepReport {
    StepReport {
        intent: Some(IntentType::GotoAddress),
        status,
        message: None,
        map_actions: Vec::new(),
        choices: Vec::new(),
    }
}

#[test]
fn empty_step_list_is_ok() {
    assert_eq!(aggregate_status(&[]), ResultStatus::Ok);
}

#[test]
fn all_ok_is_ok() {
    let steps = [step(ResultStatus::Ok), step(ResultStatus::Ok)];
    assert_eq!(aggregate_status(&steps), ResultStatus::Ok);
}

#[test]
fn error_beats_everything() {
    let steps = [
        step(ResultStatus::Ok),
        step(ResultStatus::NeedsUserChoice),
        step(ResultStatus::NeedsClarification),
        step(ResultStatus::Error),
    ];
    assert_eq!(aggregate_status(&steps), ResultStatus::Error);
}

#[test]
fn needs_clarification_beats_needs_user_choice() {
    let steps = [
        step(ResultStatus::NeedsUserChoice),
        step(ResultStatus::NeedsClarification),
    ];
    assert_eq!(aggregate_status(&steps), ResultStatus::NeedsClarification);
}

#[test]
fn needs_user_choice_beats_ok() {
    let steps = [step(ResultStatus::Ok), step(ResultStatus::NeedsUserChoice)];
    assert_eq!(aggregate_status(&steps), ResultStatus::NeedsUserChoice);
}

#[test]
fn order_of_steps_does_not_matter() {
    let forward = [step(ResultStatus::Error), step(ResultStatus::Ok)];
    let backward = [step(ResultStatus::Ok), step(ResultStatus::Error)];
    assert_eq!(aggregate_status(&forward), aggregate_status(&backward));
}
