use chrono::Utc;
use clubdesk::{
    domain::{CertificateStatus, Event, Registration},
    repository::{
        EventRepository, RegistrationRepository, SqliteEventRepository,
        SqliteRegistrationRepository,
    },
};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

async fn setup() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await?;

    Ok(pool)
}

fn sample_event() -> Event {
    Event {
        id: Uuid::new_v4(),
        title: "SEO Bootcamp".to_string(),
        description: "Hands-on workshop".to_string(),
        starts_at: Utc::now(),
        location: None,
        image_url: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn sample_registration(event_id: Uuid) -> Registration {
    Registration {
        id: Uuid::new_v4(),
        event_id,
        student_name: "Jane Doe".to_string(),
        email: "jane@x.edu".to_string(),
        phone: None,
        branch: Some("Marketing".to_string()),
        year: Some("2nd".to_string()),
        attended: false,
        certificate_url: None,
        certificate_status: CertificateStatus::None,
        certificate_attempt: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_registration_crud() -> anyhow::Result<()> {
    let pool = setup().await?;
    let event_repo = SqliteEventRepository::new(pool.clone());
    let repo = SqliteRegistrationRepository::new(pool.clone());

    let event = event_repo.create(sample_event()).await?;
    let registration = repo.create(sample_registration(event.id)).await?;

    assert_eq!(registration.email, "jane@x.edu");
    assert!(!registration.attended);
    assert_eq!(registration.certificate_status, CertificateStatus::None);
    assert!(registration.certificate_url.is_none());

    let found = repo.find_by_id(registration.id).await?;
    assert_eq!(found.unwrap().id, registration.id);

    let listed = repo.list_by_event(event.id).await?;
    assert_eq!(listed.len(), 1);

    let updated = repo.set_attended(registration.id, true).await?;
    assert!(updated.attended);

    repo.delete(registration.id).await?;
    assert!(repo.find_by_id(registration.id).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_duplicate_email_per_event_rejected() -> anyhow::Result<()> {
    let pool = setup().await?;
    let event_repo = SqliteEventRepository::new(pool.clone());
    let repo = SqliteRegistrationRepository::new(pool.clone());

    let event = event_repo.create(sample_event()).await?;
    repo.create(sample_registration(event.id)).await?;

    let duplicate = repo.create(sample_registration(event.id)).await;
    assert!(duplicate.is_err());

    Ok(())
}

#[tokio::test]
async fn test_issuance_claim_is_exclusive() -> anyhow::Result<()> {
    let pool = setup().await?;
    let event_repo = SqliteEventRepository::new(pool.clone());
    let repo = SqliteRegistrationRepository::new(pool.clone());

    let event = event_repo.create(sample_event()).await?;
    let registration = repo.create(sample_registration(event.id)).await?;

    // First claim wins, second sees the in-flight attempt.
    assert!(repo.claim_for_issuance(registration.id).await?);
    assert!(!repo.claim_for_issuance(registration.id).await?);

    // A released claim can be retaken.
    repo.set_certificate_status(registration.id, CertificateStatus::Failed)
        .await?;
    assert!(repo.claim_for_issuance(registration.id).await?);

    Ok(())
}

#[tokio::test]
async fn test_stale_claim_can_be_retaken() -> anyhow::Result<()> {
    let pool = setup().await?;
    let event_repo = SqliteEventRepository::new(pool.clone());
    let repo = SqliteRegistrationRepository::new(pool.clone());

    let event = event_repo.create(sample_event()).await?;
    let registration = repo.create(sample_registration(event.id)).await?;

    assert!(repo.claim_for_issuance(registration.id).await?);
    assert!(!repo.claim_for_issuance(registration.id).await?);

    // Age the claim past the staleness cutoff, as if the process holding
    // it had crashed mid-pipeline.
    let stale = (Utc::now() - chrono::Duration::minutes(30)).naive_utc();
    sqlx::query("UPDATE registrations SET updated_at = ? WHERE id = ?")
        .bind(stale)
        .bind(registration.id.to_string())
        .execute(&pool)
        .await?;

    assert!(repo.claim_for_issuance(registration.id).await?);

    Ok(())
}

#[tokio::test]
async fn test_store_certificate_records_url_and_attempt() -> anyhow::Result<()> {
    let pool = setup().await?;
    let event_repo = SqliteEventRepository::new(pool.clone());
    let repo = SqliteRegistrationRepository::new(pool.clone());

    let event = event_repo.create(sample_event()).await?;
    let registration = repo.create(sample_registration(event.id)).await?;

    let issued = repo
        .store_certificate(registration.id, "https://storage.test/cert.png", "a1b2c3d4")
        .await?;

    assert_eq!(issued.certificate_url.as_deref(), Some("https://storage.test/cert.png"));
    assert_eq!(issued.certificate_status, CertificateStatus::Issued);
    assert_eq!(issued.certificate_attempt.as_deref(), Some("a1b2c3d4"));

    Ok(())
}
