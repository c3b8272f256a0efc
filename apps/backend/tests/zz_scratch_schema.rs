use sea_orm::{ConnectionTrait, Database, Statement, TransactionTrait};

#[tokio::test]
async fn dump_schema() {
    let conn = Database::connect("sqlite::memory:").await.unwrap();
    migration::migrate(&conn, migration::MigrationCommand::Up)
        .await
        .unwrap();

    let txn = conn.begin().await.unwrap();
    let ident = backend::extractors::player_identity::PlayerIdentity {
        player_id: "u1".into(),
        name: "P1".into(),
        avatar: None,
    };
    let svc = backend::services::rooms::RoomService::new(backend::GameConfig::default());
    let room = svc.create_room(&txn, &ident).await.unwrap();
    println!("CREATED room id={}", room.id);

    let rows = txn
        .query_all(Statement::from_string(
            sea_orm::DatabaseBackend::Sqlite,
            "SELECT typeof(stage), quote(stage) FROM rooms".to_string(),
        ))
        .await
        .unwrap();
    for r in &rows {
        let t: String = r.try_get_by_index(0).unwrap();
        let v: String = r.try_get_by_index(1).unwrap();
        println!("STAGE typeof={t} value={v}");
    }
}
