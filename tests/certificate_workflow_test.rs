use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use clubdesk::{
    domain::{CertificateStatus, Event, Registration},
    email::fake::FakeMailer,
    error::{AppError, Result as AppResult},
    generation::fake::FakeImageGenerator,
    repository::{
        EventRepository, RegistrationRepository, SqliteEventRepository,
        SqliteRegistrationRepository,
    },
    service::certificate_service::CertificateService,
    storage::fake::FakeObjectStorage,
};
use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

struct Fixture {
    event: Event,
    registration: Registration,
    event_repo: Arc<SqliteEventRepository>,
    registration_repo: Arc<SqliteRegistrationRepository>,
    generator: Arc<FakeImageGenerator>,
    storage: Arc<FakeObjectStorage>,
    mailer: Arc<FakeMailer>,
    service: CertificateService,
}

async fn setup(
    attended: bool,
    generator: FakeImageGenerator,
    storage: FakeObjectStorage,
    mailer: FakeMailer,
) -> anyhow::Result<Fixture> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await?;

    let event_repo = Arc::new(SqliteEventRepository::new(pool.clone()));
    let registration_repo = Arc::new(SqliteRegistrationRepository::new(pool.clone()));

    let event = event_repo.create(Event {
        id: Uuid::new_v4(),
        title: "SEO Bootcamp".to_string(),
        description: "Hands-on workshop".to_string(),
        starts_at: Utc::now(),
        location: None,
        image_url: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }).await?;

    let registration = registration_repo.create(Registration {
        id: Uuid::new_v4(),
        event_id: event.id,
        student_name: "Jane Doe".to_string(),
        email: "jane@x.edu".to_string(),
        phone: None,
        branch: None,
        year: None,
        attended,
        certificate_url: None,
        certificate_status: CertificateStatus::None,
        certificate_attempt: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }).await?;

    let generator = Arc::new(generator);
    let storage = Arc::new(storage);
    let mailer = Arc::new(mailer);

    let service = CertificateService::new(
        event_repo.clone(),
        registration_repo.clone(),
        Some(generator.clone() as Arc<dyn clubdesk::generation::ImageGenerator>),
        storage.clone(),
        mailer.clone(),
    );

    Ok(Fixture {
        event,
        registration,
        event_repo,
        registration_repo,
        generator,
        storage,
        mailer,
        service,
    })
}

#[tokio::test]
async fn test_issuance_rejected_for_non_attendee() -> anyhow::Result<()> {
    let fx = setup(
        false,
        FakeImageGenerator::new(),
        FakeObjectStorage::new(),
        FakeMailer::new(),
    ).await?;

    let err = fx.service.issue(fx.registration.id).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    // Nothing was generated, stored, or mailed.
    assert!(fx.generator.calls.lock().unwrap().is_empty());
    assert!(fx.storage.objects.lock().unwrap().is_empty());
    assert!(fx.mailer.sent.lock().unwrap().is_empty());

    let registration = fx.registration_repo.find_by_id(fx.registration.id).await?.unwrap();
    assert_eq!(registration.certificate_status, CertificateStatus::None);

    Ok(())
}

#[tokio::test]
async fn test_successful_issuance_stores_url_and_sends_one_email() -> anyhow::Result<()> {
    let fx = setup(
        true,
        FakeImageGenerator::new(),
        FakeObjectStorage::new(),
        FakeMailer::new(),
    ).await?;

    let issued = fx.service.issue(fx.registration.id).await?;

    let expected_path = format!(
        "event-certificates/{}/{}.png",
        fx.event.id, fx.registration.id
    );
    let url = issued.certificate_url.clone().unwrap();
    assert!(url.ends_with(&expected_path));
    assert_eq!(issued.certificate_status, CertificateStatus::Delivered);
    assert!(issued.certificate_attempt.is_some());

    // The generator saw the registrant's name and the event title.
    let calls = fx.generator.calls.lock().unwrap();
    assert_eq!(calls.as_slice(), &[("Jane Doe".to_string(), "SEO Bootcamp".to_string())]);

    // Exactly one email, carrying the stored URL.
    let sent = fx.mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "jane@x.edu");
    assert_eq!(sent[0].certificate_url, url);

    let persisted = fx.registration_repo.find_by_id(fx.registration.id).await?.unwrap();
    assert_eq!(persisted.certificate_status, CertificateStatus::Delivered);
    assert_eq!(persisted.certificate_url, Some(url));

    Ok(())
}

#[tokio::test]
async fn test_generation_failure_touches_nothing_downstream() -> anyhow::Result<()> {
    let fx = setup(
        true,
        FakeImageGenerator::failing(),
        FakeObjectStorage::new(),
        FakeMailer::new(),
    ).await?;

    let err = fx.service.issue(fx.registration.id).await.unwrap_err();
    assert!(matches!(err, AppError::Generation(_)));

    assert!(fx.storage.objects.lock().unwrap().is_empty());
    assert!(fx.mailer.sent.lock().unwrap().is_empty());

    // The claim is released so the admin can retry.
    let registration = fx.registration_repo.find_by_id(fx.registration.id).await?.unwrap();
    assert_eq!(registration.certificate_status, CertificateStatus::Failed);
    assert!(registration.certificate_url.is_none());

    Ok(())
}

#[tokio::test]
async fn test_upload_failure_leaves_registration_without_url() -> anyhow::Result<()> {
    let fx = setup(
        true,
        FakeImageGenerator::new(),
        FakeObjectStorage::failing(),
        FakeMailer::new(),
    ).await?;

    let err = fx.service.issue(fx.registration.id).await.unwrap_err();
    assert!(matches!(err, AppError::Storage(_)));

    assert!(fx.mailer.sent.lock().unwrap().is_empty());

    let registration = fx.registration_repo.find_by_id(fx.registration.id).await?.unwrap();
    assert!(registration.certificate_url.is_none());
    assert_eq!(registration.certificate_status, CertificateStatus::Failed);

    Ok(())
}

#[tokio::test]
async fn test_email_failure_still_counts_as_issued() -> anyhow::Result<()> {
    let fx = setup(
        true,
        FakeImageGenerator::new(),
        FakeObjectStorage::new(),
        FakeMailer::failing(),
    ).await?;

    let issued = fx.service.issue(fx.registration.id).await?;

    assert!(issued.certificate_url.is_some());
    assert_eq!(issued.certificate_status, CertificateStatus::DeliveryFailed);

    let persisted = fx.registration_repo.find_by_id(fx.registration.id).await?.unwrap();
    assert_eq!(persisted.certificate_status, CertificateStatus::DeliveryFailed);
    assert!(persisted.certificate_url.is_some());

    Ok(())
}

#[tokio::test]
async fn test_reissuance_overwrites_at_the_same_path() -> anyhow::Result<()> {
    let fx = setup(
        true,
        FakeImageGenerator::new(),
        FakeObjectStorage::new(),
        FakeMailer::new(),
    ).await?;

    let first = fx.service.issue(fx.registration.id).await?;
    let second = fx.service.issue(fx.registration.id).await?;

    // Same fixed path, so the object is replaced, not duplicated.
    assert_eq!(first.certificate_url, second.certificate_url);
    assert_eq!(fx.storage.objects.lock().unwrap().len(), 1);

    // But each attempt mails the registrant again.
    assert_eq!(fx.mailer.sent.lock().unwrap().len(), 2);

    // And the attempt nonce changed.
    assert_ne!(first.certificate_attempt, second.certificate_attempt);

    Ok(())
}

#[tokio::test]
async fn test_inflight_issuance_rejects_second_attempt() -> anyhow::Result<()> {
    let fx = setup(
        true,
        FakeImageGenerator::new(),
        FakeObjectStorage::new(),
        FakeMailer::new(),
    ).await?;

    // Simulate an attempt that is still running.
    assert!(fx.registration_repo.claim_for_issuance(fx.registration.id).await?);

    let err = fx.service.issue(fx.registration.id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // The conflicting call must not have generated or mailed anything.
    assert!(fx.generator.calls.lock().unwrap().is_empty());
    assert!(fx.mailer.sent.lock().unwrap().is_empty());

    Ok(())
}

/// Delegates to the real repository but rejects writes of terminal
/// delivery statuses, as if the database dropped out after the email.
struct TerminalStatusWriteFailingRepo {
    inner: Arc<SqliteRegistrationRepository>,
}

#[async_trait]
impl RegistrationRepository for TerminalStatusWriteFailingRepo {
    async fn create(&self, registration: Registration) -> AppResult<Registration> {
        self.inner.create(registration).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Registration>> {
        self.inner.find_by_id(id).await
    }

    async fn list_by_event(&self, event_id: Uuid) -> AppResult<Vec<Registration>> {
        self.inner.list_by_event(event_id).await
    }

    async fn set_attended(&self, id: Uuid, attended: bool) -> AppResult<Registration> {
        self.inner.set_attended(id, attended).await
    }

    async fn claim_for_issuance(&self, id: Uuid) -> AppResult<bool> {
        self.inner.claim_for_issuance(id).await
    }

    async fn store_certificate(&self, id: Uuid, url: &str, attempt: &str) -> AppResult<Registration> {
        self.inner.store_certificate(id, url, attempt).await
    }

    async fn set_certificate_status(&self, id: Uuid, status: CertificateStatus) -> AppResult<()> {
        if matches!(
            status,
            CertificateStatus::Delivered | CertificateStatus::DeliveryFailed
        ) {
            return Err(AppError::Database("disk I/O error".to_string()));
        }
        self.inner.set_certificate_status(id, status).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.inner.delete(id).await
    }
}

#[tokio::test]
async fn test_final_status_write_failure_does_not_fail_issuance() -> anyhow::Result<()> {
    let fx = setup(
        true,
        FakeImageGenerator::new(),
        FakeObjectStorage::new(),
        FakeMailer::new(),
    ).await?;

    let service = CertificateService::new(
        fx.event_repo.clone(),
        Arc::new(TerminalStatusWriteFailingRepo {
            inner: fx.registration_repo.clone(),
        }),
        Some(fx.generator.clone() as Arc<dyn clubdesk::generation::ImageGenerator>),
        fx.storage.clone(),
        fx.mailer.clone(),
    );

    let issued = service.issue(fx.registration.id).await?;

    assert!(issued.certificate_url.is_some());
    assert_eq!(issued.certificate_status, CertificateStatus::Delivered);
    assert_eq!(fx.mailer.sent.lock().unwrap().len(), 1);

    // The stored row stopped at Issued; still a terminal, retryable state.
    let persisted = fx.registration_repo.find_by_id(fx.registration.id).await?.unwrap();
    assert_eq!(persisted.certificate_status, CertificateStatus::Issued);
    assert!(persisted.certificate_url.is_some());

    Ok(())
}

#[tokio::test]
async fn test_unconfigured_generator_is_service_unavailable() -> anyhow::Result<()> {
    let fx = setup(
        true,
        FakeImageGenerator::new(),
        FakeObjectStorage::new(),
        FakeMailer::new(),
    ).await?;

    let service = CertificateService::new(
        fx.event_repo.clone(),
        fx.registration_repo.clone(),
        None,
        fx.storage.clone(),
        fx.mailer.clone(),
    );

    let err = service.issue(fx.registration.id).await.unwrap_err();
    assert!(matches!(err, AppError::ServiceUnavailable(_)));

    // No claim was taken, so a configured deployment could still issue.
    let registration = fx.registration_repo.find_by_id(fx.registration.id).await?.unwrap();
    assert_eq!(registration.certificate_status, CertificateStatus::None);

    Ok(())
}
