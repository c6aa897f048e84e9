use std::sync::Arc;
use rand::{distributions::Alphanumeric, Rng};
use uuid::Uuid;

use crate::{
    domain::{CertificateStatus, Registration},
    email::CertificateMailer,
    error::{AppError, Result},
    generation::ImageGenerator,
    repository::{EventRepository, RegistrationRepository},
    storage::{certificate_object_path, ObjectStorage},
};

/// Runs the attendance-certificate pipeline for one registration:
/// claim, generate image, upload, persist URL, then best-effort email.
///
/// The claim is a compare-and-swap on `certificate_status`, so two
/// concurrent invocations for the same registration cannot both run the
/// side-effecting steps. Failure before the URL is stored releases the
/// claim (`Failed`) and a retry re-runs the whole sequence, overwriting
/// the prior storage object at the same path.
pub struct CertificateService {
    event_repo: Arc<dyn EventRepository>,
    registration_repo: Arc<dyn RegistrationRepository>,
    generator: Option<Arc<dyn ImageGenerator>>,
    storage: Arc<dyn ObjectStorage>,
    mailer: Arc<dyn CertificateMailer>,
}

impl CertificateService {
    pub fn new(
        event_repo: Arc<dyn EventRepository>,
        registration_repo: Arc<dyn RegistrationRepository>,
        generator: Option<Arc<dyn ImageGenerator>>,
        storage: Arc<dyn ObjectStorage>,
        mailer: Arc<dyn CertificateMailer>,
    ) -> Self {
        Self {
            event_repo,
            registration_repo,
            generator,
            storage,
            mailer,
        }
    }

    pub async fn issue(&self, registration_id: Uuid) -> Result<Registration> {
        let registration = self.registration_repo
            .find_by_id(registration_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Registration not found".to_string()))?;

        if !registration.attended {
            return Err(AppError::BadRequest(
                "Certificates can only be issued to attended registrants".to_string(),
            ));
        }

        let event = self.event_repo
            .find_by_id(registration.event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

        // Resolve the generator before taking the claim so a disabled
        // deployment never leaves a registration stuck in Generating.
        let generator = self.generator.as_ref().ok_or_else(|| {
            AppError::ServiceUnavailable("Certificate generation is not configured".to_string())
        })?;

        if !self.registration_repo.claim_for_issuance(registration_id).await? {
            return Err(AppError::Conflict(
                "Certificate issuance already in progress".to_string(),
            ));
        }

        let issued = match self
            .run_pipeline(generator.as_ref(), &registration, &event.title)
            .await
        {
            Ok(issued) => issued,
            Err(e) => {
                // Release the claim so the admin can retry. The original
                // error is what matters if this write fails too.
                if let Err(release_err) = self.registration_repo
                    .set_certificate_status(registration_id, CertificateStatus::Failed)
                    .await
                {
                    tracing::error!(
                        registration_id = %registration_id,
                        "Failed to release issuance claim: {}",
                        release_err
                    );
                }
                return Err(e);
            }
        };

        // Delivery is best-effort: the certificate counts as issued even
        // if the email never goes out.
        let final_status = match self.mailer
            .send_certificate(
                &issued.email,
                &issued.student_name,
                &event.title,
                issued.certificate_url.as_deref().unwrap_or_default(),
            )
            .await
        {
            Ok(()) => CertificateStatus::Delivered,
            Err(e) => {
                tracing::warn!(
                    registration_id = %registration_id,
                    "Certificate email failed: {}",
                    e
                );
                CertificateStatus::DeliveryFailed
            }
        };

        // The certificate is already stored and the email decided; a failed
        // status write must not fail the request and invite a re-issue.
        if let Err(e) = self.registration_repo
            .set_certificate_status(registration_id, final_status)
            .await
        {
            tracing::error!(
                registration_id = %registration_id,
                "Failed to record final certificate status: {}",
                e
            );
        }

        Ok(Registration {
            certificate_status: final_status,
            ..issued
        })
    }

    async fn run_pipeline(
        &self,
        generator: &dyn ImageGenerator,
        registration: &Registration,
        event_title: &str,
    ) -> Result<Registration> {
        let image = generator
            .generate_certificate(&registration.student_name, event_title)
            .await?;

        let path = certificate_object_path(registration.event_id, registration.id);
        let url = self.storage.put(&path, &image).await?;

        let attempt = attempt_nonce();
        let issued = self.registration_repo
            .store_certificate(registration.id, &url, &attempt)
            .await?;

        tracing::info!(
            registration_id = %registration.id,
            attempt = %attempt,
            "Certificate issued: {}",
            url
        );

        Ok(issued)
    }
}

fn attempt_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::attempt_nonce;

    #[test]
    fn nonces_are_distinct() {
        let a = attempt_nonce();
        let b = attempt_nonce();
        assert_eq!(a.len(), 8);
        assert_ne!(a, b);
    }
}
