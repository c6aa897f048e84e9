pub mod announcement_service;
pub mod blog_service;
pub mod certificate_service;

use std::sync::Arc;
use sqlx::SqlitePool;

use crate::email::CertificateMailer;
use crate::generation::{ImageGenerator, TextGenerator};
use crate::repository::*;
use crate::storage::ObjectStorage;
use announcement_service::AnnouncementService;
use blog_service::BlogService;
use certificate_service::CertificateService;

pub struct ServiceContext {
    pub event_repo: Arc<dyn EventRepository>,
    pub registration_repo: Arc<dyn RegistrationRepository>,
    pub announcement_repo: Arc<dyn AnnouncementRepository>,
    pub blog_repo: Arc<dyn BlogRepository>,
    pub member_repo: Arc<dyn MemberRepository>,
    pub resource_repo: Arc<dyn ResourceRepository>,
    pub report_repo: Arc<dyn ReportRepository>,
    pub testimonial_repo: Arc<dyn TestimonialRepository>,
    pub announcement_service: Arc<AnnouncementService>,
    pub certificate_service: Arc<CertificateService>,
    pub blog_service: Arc<BlogService>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    pub fn new(
        db_pool: SqlitePool,
        storage: Arc<dyn ObjectStorage>,
        image_generator: Option<Arc<dyn ImageGenerator>>,
        text_generator: Option<Arc<dyn TextGenerator>>,
        mailer: Arc<dyn CertificateMailer>,
    ) -> Self {
        let event_repo: Arc<dyn EventRepository> =
            Arc::new(SqliteEventRepository::new(db_pool.clone()));
        let registration_repo: Arc<dyn RegistrationRepository> =
            Arc::new(SqliteRegistrationRepository::new(db_pool.clone()));
        let announcement_repo: Arc<dyn AnnouncementRepository> =
            Arc::new(SqliteAnnouncementRepository::new(db_pool.clone()));
        let blog_repo: Arc<dyn BlogRepository> =
            Arc::new(SqliteBlogRepository::new(db_pool.clone()));
        let member_repo: Arc<dyn MemberRepository> =
            Arc::new(SqliteMemberRepository::new(db_pool.clone()));
        let resource_repo: Arc<dyn ResourceRepository> =
            Arc::new(SqliteResourceRepository::new(db_pool.clone()));
        let report_repo: Arc<dyn ReportRepository> =
            Arc::new(SqliteReportRepository::new(db_pool.clone()));
        let testimonial_repo: Arc<dyn TestimonialRepository> =
            Arc::new(SqliteTestimonialRepository::new(db_pool.clone()));

        let announcement_service = Arc::new(AnnouncementService::new(announcement_repo.clone()));
        let certificate_service = Arc::new(CertificateService::new(
            event_repo.clone(),
            registration_repo.clone(),
            image_generator,
            storage,
            mailer,
        ));
        let blog_service = Arc::new(BlogService::new(text_generator));

        Self {
            event_repo,
            registration_repo,
            announcement_repo,
            blog_repo,
            member_repo,
            resource_repo,
            report_repo,
            testimonial_repo,
            announcement_service,
            certificate_service,
            blog_service,
            db_pool,
        }
    }
}
