use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::*;
use crate::error::Result;

pub mod announcement_repository;
pub mod blog_repository;
pub mod event_repository;
pub mod member_repository;
pub mod registration_repository;
pub mod report_repository;
pub mod resource_repository;
pub mod testimonial_repository;

pub use announcement_repository::SqliteAnnouncementRepository;
pub use blog_repository::SqliteBlogRepository;
pub use event_repository::SqliteEventRepository;
pub use member_repository::SqliteMemberRepository;
pub use registration_repository::SqliteRegistrationRepository;
pub use report_repository::SqliteReportRepository;
pub use resource_repository::SqliteResourceRepository;
pub use testimonial_repository::SqliteTestimonialRepository;

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: Event) -> Result<Event>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>>;
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Event>>;
    async fn list_upcoming(&self, limit: i64) -> Result<Vec<Event>>;
    async fn update(&self, id: Uuid, event: Event) -> Result<Event>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    async fn create(&self, registration: Registration) -> Result<Registration>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Registration>>;
    async fn list_by_event(&self, event_id: Uuid) -> Result<Vec<Registration>>;
    async fn set_attended(&self, id: Uuid, attended: bool) -> Result<Registration>;
    /// Compare-and-swap claim on the issuance pipeline. Returns false if
    /// another attempt already holds the claim (status `Generating`),
    /// unless that claim has gone stale.
    async fn claim_for_issuance(&self, id: Uuid) -> Result<bool>;
    /// Records the generated certificate URL and attempt nonce, moving the
    /// registration to `Issued`.
    async fn store_certificate(&self, id: Uuid, url: &str, attempt: &str) -> Result<Registration>;
    async fn set_certificate_status(&self, id: Uuid, status: CertificateStatus) -> Result<()>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    async fn create(&self, announcement: Announcement) -> Result<Announcement>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Announcement>>;
    async fn find_active(&self) -> Result<Option<Announcement>>;
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Announcement>>;
    /// Deactivates every other announcement and activates this one, all
    /// inside a single transaction.
    async fn activate(&self, id: Uuid) -> Result<Announcement>;
    async fn deactivate(&self, id: Uuid) -> Result<Announcement>;
    async fn update(&self, id: Uuid, announcement: Announcement) -> Result<Announcement>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait BlogRepository: Send + Sync {
    async fn create(&self, post: BlogPost) -> Result<BlogPost>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<BlogPost>>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<BlogPost>>;
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<BlogPost>>;
    async fn list_published(&self, limit: i64, offset: i64) -> Result<Vec<BlogPost>>;
    async fn update(&self, id: Uuid, post: BlogPost) -> Result<BlogPost>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn create(&self, member: Member) -> Result<Member>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Member>>;
    async fn list(&self) -> Result<Vec<Member>>;
    async fn update(&self, id: Uuid, member: Member) -> Result<Member>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait ResourceRepository: Send + Sync {
    async fn create(&self, resource: Resource) -> Result<Resource>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Resource>>;
    async fn list(&self) -> Result<Vec<Resource>>;
    async fn update(&self, id: Uuid, resource: Resource) -> Result<Resource>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn create(&self, report: Report) -> Result<Report>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Report>>;
    async fn list(&self) -> Result<Vec<Report>>;
    async fn update(&self, id: Uuid, report: Report) -> Result<Report>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait TestimonialRepository: Send + Sync {
    async fn create(&self, testimonial: Testimonial) -> Result<Testimonial>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Testimonial>>;
    async fn list(&self) -> Result<Vec<Testimonial>>;
    async fn update(&self, id: Uuid, testimonial: Testimonial) -> Result<Testimonial>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}
