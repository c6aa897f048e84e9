use clubdesk::{
    domain::{
        Announcement, BlogPost, CertificateStatus, Event, Member, Registration, Resource,
        Testimonial, slugify,
    },
    repository::{
        AnnouncementRepository, BlogRepository, EventRepository, MemberRepository,
        RegistrationRepository, ResourceRepository, TestimonialRepository,
        SqliteAnnouncementRepository, SqliteBlogRepository, SqliteEventRepository,
        SqliteMemberRepository, SqliteRegistrationRepository, SqliteResourceRepository,
        SqliteTestimonialRepository,
    },
};
use chrono::{Duration, Utc};
use clap::Parser;
use fake::{Fake, faker::internet::en::SafeEmail, faker::name::en::Name};
use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

#[derive(Parser)]
#[command(about = "Seed the clubdesk database with demo data")]
struct Args {
    /// Database URL (falls back to DATABASE_URL, then sqlite:clubdesk.db)
    #[arg(long)]
    database_url: Option<String>,

    /// Registrations to create per event
    #[arg(long, default_value_t = 8)]
    registrations_per_event: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    println!("🌱 Starting database seeding...");

    let database_url = args.database_url
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| "sqlite:clubdesk.db".to_string());

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    println!("📋 Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    let event_repo = SqliteEventRepository::new(db_pool.clone());
    let registration_repo = SqliteRegistrationRepository::new(db_pool.clone());
    let announcement_repo = SqliteAnnouncementRepository::new(db_pool.clone());
    let blog_repo = SqliteBlogRepository::new(db_pool.clone());
    let member_repo = SqliteMemberRepository::new(db_pool.clone());
    let resource_repo = SqliteResourceRepository::new(db_pool.clone());
    let testimonial_repo = SqliteTestimonialRepository::new(db_pool.clone());

    println!("📅 Creating events...");
    let now = Utc::now();
    let event_specs = [
        ("SEO Bootcamp", "Hands-on workshop covering on-page and technical SEO.", now - Duration::days(14)),
        ("Social Media Strategy Night", "Panel discussion on building a content calendar.", now + Duration::days(7)),
        ("Google Ads Crash Course", "From campaign structure to conversion tracking.", now + Duration::days(21)),
    ];

    let mut events = Vec::new();
    for (title, description, starts_at) in event_specs {
        let event = event_repo.create(Event {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.to_string(),
            starts_at,
            location: Some("Seminar Hall B".to_string()),
            image_url: None,
            created_at: now,
            updated_at: now,
        }).await?;
        events.push(event);
    }

    println!("🧑‍🎓 Creating registrations...");
    for event in &events {
        for i in 0..args.registrations_per_event {
            let name: String = Name().fake();
            let email: String = SafeEmail().fake();
            registration_repo.create(Registration {
                id: Uuid::new_v4(),
                event_id: event.id,
                student_name: name,
                email,
                phone: None,
                branch: Some("Marketing".to_string()),
                year: Some("2nd".to_string()),
                // Past events get a few attendees so the certificate flow
                // has something to work with.
                attended: event.starts_at < now && i % 2 == 0,
                certificate_url: None,
                certificate_status: CertificateStatus::None,
                certificate_attempt: None,
                created_at: now,
                updated_at: now,
            }).await?;
        }
    }

    println!("📣 Creating announcements...");
    let active = announcement_repo.create(Announcement {
        id: Uuid::new_v4(),
        title: "Recruitment open".to_string(),
        message: "Applications for the new committee close Friday.".to_string(),
        is_active: false,
        created_at: now,
        updated_at: now,
    }).await?;
    announcement_repo.create(Announcement {
        id: Uuid::new_v4(),
        title: "Welcome back".to_string(),
        message: "First general meeting of the semester next week.".to_string(),
        is_active: false,
        created_at: now,
        updated_at: now,
    }).await?;
    announcement_repo.activate(active.id).await?;

    println!("✍️  Creating blog posts...");
    let post_title = "Five Analytics Mistakes Student Marketers Make";
    blog_repo.create(BlogPost {
        id: Uuid::new_v4(),
        title: post_title.to_string(),
        slug: slugify(post_title),
        content: "Measuring the wrong funnel stage is the most common one...".to_string(),
        author: "Priya Sharma".to_string(),
        tags: vec!["analytics".to_string(), "basics".to_string()],
        published: true,
        cover_image_url: None,
        created_at: now,
        updated_at: now,
    }).await?;

    println!("👥 Creating members...");
    for (name, role) in [("Priya Sharma", "President"), ("Rahul Mehta", "Content Lead"), ("Ananya Iyer", "Design Lead")] {
        member_repo.create(Member {
            id: Uuid::new_v4(),
            name: name.to_string(),
            role: role.to_string(),
            year: Some("3rd".to_string()),
            bio: None,
            photo_url: None,
            linkedin_url: None,
            created_at: now,
            updated_at: now,
        }).await?;
    }

    println!("🔗 Creating resources...");
    resource_repo.create(Resource {
        id: Uuid::new_v4(),
        title: "Keyword research template".to_string(),
        description: "The spreadsheet we use in the SEO bootcamp.".to_string(),
        url: "https://example.com/keyword-template".to_string(),
        category: "SEO".to_string(),
        created_at: now,
        updated_at: now,
    }).await?;

    println!("💬 Creating testimonials...");
    testimonial_repo.create(Testimonial {
        id: Uuid::new_v4(),
        author: "Arjun Rao".to_string(),
        role: "Alumnus, batch of 2024".to_string(),
        quote: "The club workshops got me my first internship.".to_string(),
        created_at: now,
        updated_at: now,
    }).await?;

    println!("✅ Seeding complete!");
    println!("   {} events, {} registrations each", events.len(), args.registrations_per_event);

    Ok(())
}
