//! Tests against a live MySQL server.
//!
//! Run with: DB_HOST=... DB_USER=... DB_PASSWORD=... cargo test -p db -- --ignored --test-threads=1
//!
//! Each test bootstraps its own database (`DB_NAME`, default
//! `fatigue_detection_test`) from scratch, so they must run serially.

use db::{
    ensure_schema,
    models::{DriverPatch, NewDriver, Patch},
    Connector, DbConfig, DbError, DriverStore, MySqlDriverRepository,
};

fn test_config() -> DbConfig {
    let defaults = DbConfig::default();
    DbConfig {
        host: std::env::var("DB_HOST").unwrap_or(defaults.host),
        port: std::env::var("DB_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port),
        user: std::env::var("DB_USER").unwrap_or(defaults.user),
        password: std::env::var("DB_PASSWORD").unwrap_or(defaults.password),
        database: std::env::var("DB_NAME").unwrap_or_else(|_| "fatigue_detection_test".into()),
    }
}

async fn fresh_repository() -> MySqlDriverRepository {
    let config = test_config();
    let report = ensure_schema(&config, true).await.expect("bootstrap failed");
    assert!(report.is_complete(), "table failures: {:?}", report.failed);
    MySqlDriverRepository::new(Connector::new(&config))
}

fn ana() -> NewDriver {
    NewDriver {
        first_name: "Ana".into(),
        last_name: "Lopez".into(),
        license_number: "LIC-1".into(),
        email: "ana@x.com".into(),
        phone: None,
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn bootstrap_twice_is_idempotent() {
    let config = test_config();
    ensure_schema(&config, true).await.expect("first run failed");

    let report = ensure_schema(&config, false).await.expect("second run failed");

    assert!(report.is_complete());
    assert!(!report.dropped);
    assert_eq!(report.created, vec!["conductores", "sesiones", "telemetria"]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn create_get_delete_roundtrip() {
    let repo = fresh_repository().await;

    let created = repo.create_and_fetch(&ana()).await.expect("create failed");
    assert_eq!(created.id, 1);
    assert!(created.active);
    assert_eq!(repo.get(1).await.expect("get failed"), created);

    repo.soft_delete(1).await.expect("delete failed");
    assert!(matches!(repo.get(1).await, Err(DbError::NotFound)));
    assert!(matches!(repo.soft_delete(1).await, Err(DbError::NotFound)));
    assert!(repo.list_active().await.expect("list failed").is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn duplicate_email_is_rejected_by_the_store() {
    let repo = fresh_repository().await;
    repo.create(&ana()).await.expect("create failed");

    let clash = NewDriver {
        license_number: "LIC-2".into(),
        ..ana()
    };
    let err = repo.create(&clash).await.unwrap_err();

    assert!(matches!(err, DbError::Constraint(_)));
    assert_eq!(repo.list_active().await.unwrap().len(), 1);
}

#[tokio::test]
#[ignore = "requires database"]
async fn update_with_unchanged_values_still_succeeds() {
    let repo = fresh_repository().await;
    let id = repo.create(&ana()).await.expect("create failed");

    let patch = DriverPatch {
        first_name: Patch::Set("Ana".into()),
        ..DriverPatch::default()
    };
    let row = repo.update_and_fetch(id, &patch).await.expect("update failed");

    assert_eq!(row.first_name, "Ana");
    assert!(matches!(repo.update(id + 100, &patch).await, Err(DbError::NotFound)));
}

#[tokio::test]
#[ignore = "requires database"]
async fn phone_can_be_set_and_cleared() {
    let repo = fresh_repository().await;
    let id = repo.create(&ana()).await.expect("create failed");

    let set = DriverPatch {
        phone: Patch::Set(Some("555-0101".into())),
        ..DriverPatch::default()
    };
    assert_eq!(
        repo.update_and_fetch(id, &set).await.unwrap().phone.as_deref(),
        Some("555-0101")
    );

    let clear = DriverPatch {
        phone: Patch::Set(None),
        ..DriverPatch::default()
    };
    assert_eq!(repo.update_and_fetch(id, &clear).await.unwrap().phone, None);
}
