//! Database-backed integration tests.
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p labreg-server -- --ignored
//!
//! The business-hours trigger is live in these tests, so write assertions
//! account for runs happening outside the permitted window.

use chrono::NaiveDate;
use labreg_server::db::classify::{classify_write_error, WriteRejection};
use labreg_server::db::repos::{DbError, ResearcherRepo};
use labreg_server::db::store::PgStore;
use labreg_server::models::ResearcherForm;
use labreg_server::{create_pool, run_migrations};

async fn connect() -> PgStore {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let pool = create_pool(&url).await.expect("pool creation failed");
    run_migrations(&pool).await.expect("migrations failed");
    PgStore::new(pool)
}

#[tokio::test]
#[ignore = "requires database"]
async fn created_researcher_appears_in_subsequent_list() {
    let store = connect().await;
    let repo = ResearcherRepo::new(&store);

    let form = ResearcherForm {
        chnom: "integration-create-then-list".into(),
        ..Default::default()
    };
    match repo.create(&form).await {
        Ok(()) => {}
        Err(err) => match classify_write_error(err) {
            // Outside the permitted window the trigger rejects the write, so
            // visibility cannot be exercised in this run.
            WriteRejection::TimeWindow => return,
            WriteRejection::Other(err) => panic!("create failed: {err}"),
        },
    }

    let listed = repo.list().await.expect("list failed");
    assert!(listed.iter().any(|r| r.chnom == form.chnom));
}

#[tokio::test]
#[ignore = "requires database"]
async fn inverted_top_range_is_empty_not_an_error() {
    let store = connect().await;
    let repo = ResearcherRepo::new(&store);

    let start = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    let rows = repo
        .top_by_publications(start, end)
        .await
        .expect("report failed");
    assert!(rows.is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn unknown_identifier_reads_as_not_found() {
    let store = connect().await;
    let repo = ResearcherRepo::new(&store);

    match repo.get(i64::from(i32::MAX)).await {
        Err(DbError::NotFound { .. }) => {}
        other => panic!("expected NotFound, got {other:?}"),
    }
}
