//! Repository integration tests over in-memory SQLite

mod common;

use registre_core::domain::{Member, MemberInput, User};
use registre_core::repository::Db;
use std::time::Duration;

async fn repos() -> Db {
    let app = common::spawn_app().await;
    app.db
}

fn member(nom: &str, prenom: &str) -> Member {
    Member::new(
        nom.to_string(),
        prenom.to_string(),
        MemberInput::default(),
    )
}

#[tokio::test]
async fn test_insert_and_find_member() {
    let db = repos().await;
    let repo = db.member_repository();

    let mut record = member("Dupont", "Marie");
    record.phone = Some("0601020304".to_string());
    repo.insert(&record).await.unwrap();

    let found = repo.find_by_id(record.id).await.unwrap().unwrap();
    assert_eq!(found.id, record.id);
    assert_eq!(found.nom, "Dupont");
    assert_eq!(found.phone.as_deref(), Some("0601020304"));
    assert_eq!(found.created_at, record.created_at);
    assert_eq!(found.created_at, found.updated_at);

    assert!(repo
        .find_by_id(uuid::Uuid::new_v4())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_list_orders_newest_first() {
    let db = repos().await;
    let repo = db.member_repository();

    let first = member("Premier", "A");
    repo.insert(&first).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = member("Deuxième", "B");
    repo.insert(&second).await.unwrap();

    let all = repo.list().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, second.id);
    assert_eq!(all[1].id, first.id);
}

#[tokio::test]
async fn test_update_roundtrip() {
    let db = repos().await;
    let repo = db.member_repository();

    let record = member("Dupont", "Marie");
    repo.insert(&record).await.unwrap();

    tokio::time::sleep(Duration::from_millis(5)).await;
    let updated = record.apply_update(
        "Martin".to_string(),
        "Marie".to_string(),
        MemberInput::default(),
    );
    repo.update(&updated).await.unwrap();

    let found = repo.find_by_id(record.id).await.unwrap().unwrap();
    assert_eq!(found.nom, "Martin");
    assert_eq!(found.created_at, record.created_at);
    assert!(found.updated_at > found.created_at);
}

#[tokio::test]
async fn test_update_missing_row_is_not_found() {
    let db = repos().await;
    let repo = db.member_repository();

    let ghost = member("Fantôme", "X");
    let err = repo.update(&ghost).await.unwrap_err();
    assert!(matches!(err, registre_core::AppError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_twice_is_not_found() {
    let db = repos().await;
    let repo = db.member_repository();

    let record = member("Dupont", "Marie");
    repo.insert(&record).await.unwrap();

    repo.delete(record.id).await.unwrap();
    let err = repo.delete(record.id).await.unwrap_err();
    assert!(matches!(err, registre_core::AppError::NotFound(_)));
}

#[tokio::test]
async fn test_search_is_case_insensitive_across_fields() {
    let db = repos().await;
    let repo = db.member_repository();

    let by_nom = member("Smith", "John");
    repo.insert(&by_nom).await.unwrap();

    let mut by_email = member("Dupont", "Marie");
    by_email.email = Some("marie.SMITH@example.com".to_string());
    repo.insert(&by_email).await.unwrap();

    let mut by_phone = member("Martin", "Luc");
    by_phone.phone = Some("0601020304".to_string());
    repo.insert(&by_phone).await.unwrap();

    let hits = repo.search("smith").await.unwrap();
    assert_eq!(hits.len(), 2);

    let hits = repo.search("SMITH").await.unwrap();
    assert_eq!(hits.len(), 2);

    let hits = repo.search("luc").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, by_phone.id);

    let hits = repo.search("0601").await.unwrap();
    assert_eq!(hits.len(), 1);

    assert!(repo.search("introuvable").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_count_tracks_inserts_and_deletes() {
    let db = repos().await;
    let repo = db.member_repository();

    assert_eq!(repo.count().await.unwrap(), 0);

    let record = member("Dupont", "Marie");
    repo.insert(&record).await.unwrap();
    assert_eq!(repo.count().await.unwrap(), 1);

    repo.delete(record.id).await.unwrap();
    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_user_email_uniqueness_is_enforced() {
    let db = repos().await;
    let repo = db.user_repository();

    // The bootstrap admin exists already; a second insert with the same
    // email must hit the UNIQUE constraint.
    let duplicate = User {
        id: uuid::Uuid::new_v4(),
        email: common::ADMIN_EMAIL.to_string(),
        mot_de_passe: "$2b$10$irrelevant".to_string(),
        nom: "Doublon".to_string(),
        created_at: chrono::Utc::now(),
    };
    assert!(repo.insert(&duplicate).await.is_err());
}

#[tokio::test]
async fn test_user_lookup_by_email_and_id() {
    let db = repos().await;
    let repo = db.user_repository();

    let admin = repo
        .find_by_email(common::ADMIN_EMAIL)
        .await
        .unwrap()
        .expect("bootstrap admin is seeded");
    assert_eq!(admin.nom, "Administrateur");

    let by_id = repo.find_by_id(admin.id).await.unwrap().unwrap();
    assert_eq!(by_id.email, common::ADMIN_EMAIL);

    assert!(repo
        .find_by_email("nobody@eglise.com")
        .await
        .unwrap()
        .is_none());
}
