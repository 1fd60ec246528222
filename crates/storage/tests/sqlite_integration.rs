use atlas_core::model::{ProgressRecord, StepStatus};
use storage::repository::{PROGRESS_KEY, ProgressRepository};
use storage::sqlite::SqliteRepository;

async fn connect(name: &str) -> SqliteRepository {
    let repo = SqliteRepository::connect(&format!("sqlite:file:{name}?mode=memory&cache=shared"))
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_roundtrip_persists_progress() {
    let repo = connect("memdb_progress_roundtrip").await;
    assert!(repo.load_progress().await.unwrap().is_none());

    let mut record = ProgressRecord::new(8);
    record.set(0, StepStatus::Finished).unwrap();
    record.set(2, StepStatus::Unlocked).unwrap();
    repo.save_progress(&record).await.unwrap();

    let slots = repo.load_progress().await.unwrap().expect("persisted");
    assert_eq!(slots.len(), 8);
    assert_eq!(ProgressRecord::from_slots(slots, 8), record);
}

#[tokio::test]
async fn sqlite_save_overwrites_previous_value() {
    let repo = connect("memdb_progress_overwrite").await;

    let mut record = ProgressRecord::new(3);
    record.set(0, StepStatus::Unlocked).unwrap();
    repo.save_progress(&record).await.unwrap();
    record.set(0, StepStatus::Finished).unwrap();
    repo.save_progress(&record).await.unwrap();

    let slots = repo.load_progress().await.unwrap().unwrap();
    assert_eq!(slots, vec![Some(StepStatus::Finished), None, None]);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kv_store WHERE key = ?1")
        .bind(PROGRESS_KEY)
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn sqlite_reads_short_legacy_record() {
    let repo = connect("memdb_progress_legacy").await;
    sqlx::query("INSERT INTO kv_store (key, value) VALUES (?1, ?2)")
        .bind(PROGRESS_KEY)
        .bind(r#"["finished","unlocked"]"#)
        .execute(repo.pool())
        .await
        .unwrap();

    let slots = repo.load_progress().await.unwrap().unwrap();
    let record = ProgressRecord::from_slots(slots, 8);
    assert_eq!(record.len(), 8);
    assert_eq!(record.get(1).unwrap(), Some(StepStatus::Unlocked));
    assert_eq!(record.get(7).unwrap(), None);
}

#[tokio::test]
async fn sqlite_clear_and_migrate_are_idempotent() {
    let repo = connect("memdb_progress_clear").await;
    repo.migrate().await.expect("second migrate");

    repo.save_progress(&ProgressRecord::new(8)).await.unwrap();
    repo.clear_progress().await.unwrap();
    repo.clear_progress().await.unwrap();
    assert!(repo.load_progress().await.unwrap().is_none());
}
