//! Tests for wizard step transitions
//!
//! These tests verify:
//! - The forward path Input -> Validate -> Recommend -> Done
//! - Guards that block advancing on bad input or failed validation
//! - Back and reset clear everything produced downstream
//! - Step history is recorded in order

mod common;

use common::{cmr_record, FakeApi};
use geoviz_wizard::config_file::WizardConfig;
use geoviz_wizard::logic::recommend_from_report;
use geoviz_wizard::validation::{ValidationReport, ValidationRunner};
use geoviz_wizard::wizard::{WizardSession, WizardStep, WizardTransitionError};

const COG_URL: &str = "https://example.com/cogs/dem.tif";

fn cog_api() -> FakeApi {
    FakeApi::new().with_cog(COG_URL, true).with_statistics(
        COG_URL,
        vec![1.0, 4.0, 2.0],
        vec![0.0, 1.0, 2.0, 3.0],
    )
}

fn validate(api: &FakeApi, session: &WizardSession) -> ValidationReport {
    ValidationRunner::new(api).run(&session.input, &mut |_| {})
}

/// Drive a session to the Recommend step
fn session_at_recommend(api: &FakeApi, input: &str) -> WizardSession {
    let mut session = WizardSession::with_input(input);
    session.submit_input().expect("input accepted");
    let report = validate(api, &session);
    let rec = recommend_from_report(&report, &WizardConfig::default()).expect("recommendation");
    session.set_report(report).expect("report stored");
    session.accept_report(rec).expect("report accepted");
    session
}

// =============================================================================
// Forward path
// =============================================================================

#[test]
fn test_full_cog_flow() {
    let api = cog_api();
    let mut session = session_at_recommend(&api, COG_URL);
    assert_eq!(session.step(), WizardStep::Recommend);
    assert!(session.recommendation().is_some());

    let stats = api
        .statistics_for(COG_URL)
        .expect("statistics configured");
    session.set_statistics(stats).expect("statistics stored");
    assert!(session.statistics().is_some());

    session.finish().expect("finish");
    assert_eq!(session.step(), WizardStep::Done);
    assert!(session.step().is_terminal());

    let steps: Vec<WizardStep> = session.history().iter().map(|(s, _)| *s).collect();
    assert_eq!(
        steps,
        vec![WizardStep::Validate, WizardStep::Recommend, WizardStep::Done]
    );
}

#[test]
fn test_full_cmr_flow() {
    let api = FakeApi::new().with_cmr(
        "C123-POCLOUD",
        Some(cmr_record("C123-POCLOUD", &["netCDF-4"], true)),
    );
    let session = session_at_recommend(&api, "  C123-POCLOUD  ");
    let reference = session.reference().expect("reference");
    assert!(reference.is_cmr());
    assert_eq!(reference.raw(), "C123-POCLOUD");
}

#[test]
fn test_history_timestamps_do_not_go_backwards() {
    let api = cog_api();
    let mut session = session_at_recommend(&api, COG_URL);
    session.finish().expect("finish");
    let stamps: Vec<u64> = session.history().iter().map(|(_, t)| *t).collect();
    assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
}

// =============================================================================
// Guards
// =============================================================================

#[test]
fn test_invalid_input_stays_on_input() {
    let mut session = WizardSession::with_input("not a reference");
    let err = session.submit_input().expect_err("rejected");
    assert!(matches!(err, WizardTransitionError::InvalidInput { .. }));
    assert_eq!(session.step(), WizardStep::Input);
    assert!(session.history().is_empty());
}

#[test]
fn test_cannot_accept_before_validation_finishes() {
    let api = cog_api();
    let mut session = WizardSession::with_input(COG_URL);
    session.submit_input().expect("input accepted");

    let report = validate(&api, &session);
    let rec = recommend_from_report(&report, &WizardConfig::default()).expect("recommendation");
    assert_eq!(
        session.accept_report(rec),
        Err(WizardTransitionError::ValidationPending)
    );
    assert_eq!(session.step(), WizardStep::Validate);
}

#[test]
fn test_failed_validation_blocks_recommend() {
    let url = "https://example.com/gone.tif";
    let api = FakeApi::new().with_head(url, 404, None);
    let mut session = WizardSession::with_input(url);
    session.submit_input().expect("input accepted");

    let report = validate(&api, &session);
    assert!(report.aborted);
    session.set_report(report).expect("report stored");

    match session.ensure_report_ok() {
        Err(WizardTransitionError::ValidationFailed { reason }) => {
            assert!(reason.starts_with("File reachable: HTTP 404"), "{}", reason);
        }
        other => panic!("expected ValidationFailed, got {:?}", other),
    }
    assert_eq!(session.step(), WizardStep::Validate);
}

#[test]
fn test_statistics_only_on_recommend_step() {
    let api = cog_api();
    let mut session = WizardSession::with_input(COG_URL);
    session.submit_input().expect("input accepted");
    let stats = api.statistics_for(COG_URL).expect("statistics configured");
    assert_eq!(
        session.set_statistics(stats),
        Err(WizardTransitionError::WrongStep {
            expected: WizardStep::Recommend,
            actual: WizardStep::Validate,
        })
    );
}

#[test]
fn test_done_is_terminal() {
    let api = cog_api();
    let mut session = session_at_recommend(&api, COG_URL);
    session.finish().expect("finish");

    assert_eq!(
        session.finish(),
        Err(WizardTransitionError::FromTerminalStep {
            from: WizardStep::Done
        })
    );
    assert_eq!(
        session.back(),
        Err(WizardTransitionError::NoPreviousStep {
            from: WizardStep::Done
        })
    );
}

#[test]
fn test_cannot_go_back_from_input() {
    let mut session = WizardSession::new();
    assert_eq!(
        session.back(),
        Err(WizardTransitionError::NoPreviousStep {
            from: WizardStep::Input
        })
    );
}

// =============================================================================
// Back and reset
// =============================================================================

#[test]
fn test_back_from_recommend_returns_to_input() {
    let api = cog_api();
    let mut session = session_at_recommend(&api, COG_URL);

    assert_eq!(session.back(), Ok(WizardStep::Input));
    assert_eq!(session.step(), WizardStep::Input);
    assert!(session.reference().is_none());
    assert!(session.report().is_none());
    assert!(session.recommendation().is_none());
    assert!(session.statistics().is_none());
    // The typed input survives for editing
    assert_eq!(session.input, COG_URL);
}

#[test]
fn test_back_from_validate_then_resubmit() {
    let mut session = WizardSession::with_input("s3://bucket-a/a.tif");
    session.submit_input().expect("input accepted");
    session.back().expect("back");

    session.input = "s3://bucket-b/b.tif".to_string();
    let reference = session.submit_input().expect("input accepted");
    assert_eq!(reference.raw(), "s3://bucket-b/b.tif");
}

#[test]
fn test_reset_from_done_keeps_input() {
    let api = cog_api();
    let mut session = session_at_recommend(&api, COG_URL);
    session.finish().expect("finish");

    session.reset();
    assert_eq!(session.step(), WizardStep::Input);
    assert_eq!(session.input, COG_URL);
    assert!(session.report().is_none());
    assert_eq!(session.history().last().map(|(s, _)| *s), Some(WizardStep::Input));
}

#[test]
fn test_reset_on_input_records_nothing() {
    let mut session = WizardSession::with_input("x");
    session.reset();
    assert!(session.history().is_empty());
}
