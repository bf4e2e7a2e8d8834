use quiz_core::model::Theme;
use storage::repository::PreferenceRepository;
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_theme_round_trip_overwrites_single_row() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_theme?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.get_theme().await.unwrap(), None);

    repo.save_theme(Theme::Dark).await.unwrap();
    assert_eq!(repo.get_theme().await.unwrap(), Some(Theme::Dark));

    repo.save_theme(Theme::Light).await.unwrap();
    assert_eq!(repo.get_theme().await.unwrap(), Some(Theme::Light));

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ui_preferences")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_migrations")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(applied, 1);
}
