//! End-to-end registration scenarios
//!
//! Drives the workflow surface the way a form UI would: build records for a
//! selected championship, submit the batch, and check what reached the roster
//! file and the (mocked) sheet endpoint.

use chrono::NaiveDate;
use httpmock::prelude::*;
use karate_registration::{
    build_record, record::AFRICAN_OPEN, record::MASTER_COURSE, BeltDegree, Federation, PlayerForm,
    Registry, RegistryConfig, RetryPolicy, SharedFields, Sex, SubmitOutcome, ValidationError,
    WorkflowState,
};
use tempfile::tempdir;

fn config(dir: &std::path::Path, endpoint: &str) -> RegistryConfig {
    RegistryConfig {
        data_file: dir.join("athletes_data.csv"),
        sheet_endpoint: endpoint.to_string(),
        retry: RetryPolicy {
            max_attempts: 3,
            base_delay_ms: 10,
            request_timeout_secs: 5,
        },
        ..RegistryConfig::default()
    }
}

fn shared() -> SharedFields {
    SharedFields {
        club: "Cairo TKC".to_string(),
        nationality: "Egypt".to_string(),
        coach_name: "M. Badr".to_string(),
        phone_number: "+20100000000".to_string(),
    }
}

fn player(name: &str, code: &str) -> PlayerForm {
    PlayerForm {
        athlete_name: name.to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(2001, 5, 14).unwrap(),
        sex: Sex::Male,
        player_code: code.to_string(),
        belt_degree: BeltDegree::KyuSeniorBrown1,
        federation: Some(Federation::EgyptianTraditional),
        competitions: vec!["Individual Kumite".to_string()],
    }
}

#[tokio::test]
async fn master_course_record_without_competitions_is_accepted() {
    let dir = tempdir().unwrap();
    let registry = Registry::new(&config(dir.path(), ""));

    let mut state = WorkflowState::new();
    state.choose_championship(MASTER_COURSE).unwrap();
    let record = build_record(&state, &shared(), &player("A", "C1")).unwrap();
    assert!(record.competitions.is_empty());

    let outcome = registry.submit(&[record]).await.unwrap();
    assert!(matches!(
        outcome,
        SubmitOutcome::Accepted {
            saved: 1,
            total_rows: 1,
            ..
        }
    ));

    let table = registry.store().load().unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(
        table.rows()[0].championship(),
        "African Master Course - Master"
    );
}

#[tokio::test]
async fn duplicate_code_rejects_batch_and_leaves_store_unchanged() {
    let dir = tempdir().unwrap();
    let registry = Registry::new(&config(dir.path(), ""));

    let mut state = WorkflowState::new();
    state.choose_championship(AFRICAN_OPEN).unwrap();
    let first = build_record(&state, &shared(), &player("Old", "C1")).unwrap();
    registry.submit(&[first]).await.unwrap();

    let duplicate = build_record(&state, &shared(), &player("New", "C1")).unwrap();
    let outcome = registry.submit(&[duplicate]).await.unwrap();
    let SubmitOutcome::Rejected(errors) = outcome else {
        panic!("duplicate code was accepted");
    };
    assert_eq!(
        errors,
        vec![ValidationError::DuplicateCode {
            code: "C1".to_string(),
            athlete: "New".to_string()
        }]
    );

    let table = registry.store().load().unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.rows()[0].get("Athlete Name"), "Old");
}

#[tokio::test]
async fn missing_required_field_rejects_whole_batch() {
    let dir = tempdir().unwrap();
    let registry = Registry::new(&config(dir.path(), ""));

    let mut state = WorkflowState::new();
    state.choose_championship(AFRICAN_OPEN).unwrap();
    let good = build_record(&state, &shared(), &player("A", "C1")).unwrap();
    let mut bad = build_record(&state, &shared(), &player("B", "C2")).unwrap();
    bad.nationality = "  ".to_string();

    let outcome = registry.submit(&[good, bad]).await.unwrap();
    let SubmitOutcome::Rejected(errors) = outcome else {
        panic!("batch with missing field was accepted");
    };
    assert!(errors.contains(&ValidationError::MissingField {
        field: "Nationality",
        athlete: "B".to_string()
    }));

    // All-or-nothing: the valid record was not persisted either.
    assert!(registry.store().load().unwrap().is_empty());
}

#[tokio::test]
async fn non_master_course_requires_competitions_and_coach() {
    let dir = tempdir().unwrap();
    let registry = Registry::new(&config(dir.path(), ""));

    let mut state = WorkflowState::new();
    state.choose_championship(AFRICAN_OPEN).unwrap();
    let mut no_coach = shared();
    no_coach.coach_name = String::new();
    let mut form = player("A", "C1");
    form.competitions = Vec::new();
    let record = build_record(&state, &no_coach, &form).unwrap();

    let outcome = registry.submit(&[record]).await.unwrap();
    let SubmitOutcome::Rejected(errors) = outcome else {
        panic!("expected rejection");
    };
    assert_eq!(
        errors,
        vec![
            ValidationError::NoCompetitions {
                athlete: "A".to_string()
            },
            ValidationError::NoCoach {
                athlete: "A".to_string()
            },
        ]
    );
}

#[tokio::test]
async fn accepted_rows_are_mirrored_to_the_sheet() {
    let dir = tempdir().unwrap();
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/exec");
        then.status(200);
    });

    let registry = Registry::new(&config(dir.path(), &server.url("/exec")));
    let mut state = WorkflowState::new();
    state.choose_championship(AFRICAN_OPEN).unwrap();
    let batch = vec![
        build_record(&state, &shared(), &player("A", "C1")).unwrap(),
        build_record(&state, &shared(), &player("B", "C2")).unwrap(),
    ];

    let outcome = registry.submit(&batch).await.unwrap();
    assert!(matches!(
        outcome,
        SubmitOutcome::Accepted {
            saved: 2,
            replicated: 2,
            total_rows: 2,
        }
    ));
    assert!(outcome.is_fully_replicated());
    mock.assert_hits(2);
}

#[tokio::test]
async fn replication_failure_reports_partial_but_keeps_local_save() {
    let dir = tempdir().unwrap();
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/exec");
        then.status(500);
    });

    let registry = Registry::new(&config(dir.path(), &server.url("/exec")));
    let mut state = WorkflowState::new();
    state.choose_championship(AFRICAN_OPEN).unwrap();
    let batch = vec![build_record(&state, &shared(), &player("A", "C1")).unwrap()];

    let outcome = registry.submit(&batch).await.unwrap();
    let SubmitOutcome::Accepted {
        saved, replicated, ..
    } = outcome
    else {
        panic!("replication failure must not reject the batch");
    };
    assert_eq!(saved, 1);
    assert_eq!(replicated, 0);
    // 3 retry attempts for the single row.
    mock.assert_hits(3);

    // The local write is authoritative and survives.
    assert_eq!(registry.store().load().unwrap().len(), 1);
}

#[tokio::test]
async fn roster_file_round_trips_across_submissions() {
    let dir = tempdir().unwrap();
    let registry = Registry::new(&config(dir.path(), ""));

    let mut state = WorkflowState::new();
    state.choose_championship(AFRICAN_OPEN).unwrap();
    let first = vec![build_record(&state, &shared(), &player("A", "C1")).unwrap()];
    registry.submit(&first).await.unwrap();

    let second = vec![
        build_record(&state, &shared(), &player("B", "C2")).unwrap(),
        build_record(&state, &shared(), &player("C", "C3")).unwrap(),
    ];
    registry.submit(&second).await.unwrap();

    let table = registry.store().load().unwrap();
    let names: Vec<&str> = table.rows().iter().map(|r| r.get("Athlete Name")).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
}
