//! Integration tests for the analysis record lifecycle:
//! - creation in `PENDING`
//! - single transition to a terminal status
//! - duplicate settlement is a no-op

use findoc_db::models::status::AnalysisStatus;
use findoc_db::repositories::AnalysisRepo;
use sqlx::PgPool;
use uuid::Uuid;

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_starts_pending_without_result(pool: PgPool) {
    let external_id = Uuid::new_v4();
    let record = AnalysisRepo::create(&pool, external_id, "Summarize risk")
        .await
        .unwrap();

    assert_eq!(record.external_id, external_id);
    assert_eq!(record.query, "Summarize risk");
    assert_eq!(record.status(), AnalysisStatus::Pending);
    assert!(record.result_text.is_none());
    assert!(record.completed_at.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_by_external_id_returns_none_for_unknown(pool: PgPool) {
    AnalysisRepo::create(&pool, Uuid::new_v4(), "q").await.unwrap();

    let found = AnalysisRepo::find_by_external_id(&pool, Uuid::new_v4())
        .await
        .unwrap();
    assert!(found.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn mark_success_settles_pending_record(pool: PgPool) {
    let record = AnalysisRepo::create(&pool, Uuid::new_v4(), "q").await.unwrap();

    let applied = AnalysisRepo::mark_success(&pool, record.id, "report text")
        .await
        .unwrap();
    assert!(applied);

    let stored = AnalysisRepo::find_by_external_id(&pool, record.external_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status(), AnalysisStatus::Success);
    assert_eq!(stored.result_text.as_deref(), Some("report text"));
    assert!(stored.completed_at.is_some());
    assert_eq!(stored.created_at, record.created_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn terminal_record_is_never_overwritten(pool: PgPool) {
    let record = AnalysisRepo::create(&pool, Uuid::new_v4(), "q").await.unwrap();

    assert!(AnalysisRepo::mark_failed(&pool, record.id, "boom").await.unwrap());

    // A second delivery of the same job must not change the outcome.
    assert!(!AnalysisRepo::mark_success(&pool, record.id, "late report")
        .await
        .unwrap());
    assert!(!AnalysisRepo::mark_failed(&pool, record.id, "other error")
        .await
        .unwrap());

    let stored = AnalysisRepo::find_by_id(&pool, record.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status(), AnalysisStatus::Failed);
    assert_eq!(stored.result_text.as_deref(), Some("boom"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn settling_missing_record_reports_no_change(pool: PgPool) {
    let applied = AnalysisRepo::mark_success(&pool, 9_999, "text").await.unwrap();
    assert!(!applied);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn settle_through_scoped_connection(pool: PgPool) {
    let record = AnalysisRepo::create(&pool, Uuid::new_v4(), "q").await.unwrap();

    {
        let mut conn = pool.acquire().await.unwrap();
        assert!(AnalysisRepo::mark_success(&mut *conn, record.id, "done")
            .await
            .unwrap());
    }

    let stored = AnalysisRepo::find_by_id(&pool, record.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status(), AnalysisStatus::Success);
}
