use chrono::Utc;
use clubdesk::{
    domain::Announcement,
    repository::{AnnouncementRepository, SqliteAnnouncementRepository},
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

fn sample_announcement(title: &str) -> Announcement {
    Announcement {
        id: Uuid::new_v4(),
        title: title.to_string(),
        message: format!("{} message", title),
        is_active: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

async fn count_active(repo: &SqliteAnnouncementRepository) -> anyhow::Result<usize> {
    let all = repo.list(100, 0).await?;
    Ok(all.iter().filter(|a| a.is_active).count())
}

#[tokio::test]
async fn test_activation_keeps_exactly_one_active() -> anyhow::Result<()> {
    let pool = setup().await?;
    let repo = SqliteAnnouncementRepository::new(pool);

    let a = repo.create(sample_announcement("A")).await?;
    let b = repo.create(sample_announcement("B")).await?;

    let activated = repo.activate(a.id).await?;
    assert!(activated.is_active);
    assert_eq!(count_active(&repo).await?, 1);

    // Activating B while A is active leaves A inactive, B active.
    let activated = repo.activate(b.id).await?;
    assert!(activated.is_active);
    assert_eq!(count_active(&repo).await?, 1);

    let a = repo.find_by_id(a.id).await?.unwrap();
    assert!(!a.is_active);

    let active = repo.find_active().await?.unwrap();
    assert_eq!(active.id, b.id);

    Ok(())
}

#[tokio::test]
async fn test_activate_missing_announcement_is_not_found() -> anyhow::Result<()> {
    let pool = setup().await?;
    let repo = SqliteAnnouncementRepository::new(pool);

    let a = repo.create(sample_announcement("A")).await?;
    repo.activate(a.id).await?;

    // The failed activation must not deactivate the current one either.
    let missing = repo.activate(Uuid::new_v4()).await;
    assert!(missing.is_err());

    let active = repo.find_active().await?.unwrap();
    assert_eq!(active.id, a.id);

    Ok(())
}

#[tokio::test]
async fn test_deactivate_clears_the_banner() -> anyhow::Result<()> {
    let pool = setup().await?;
    let repo = SqliteAnnouncementRepository::new(pool);

    let a = repo.create(sample_announcement("A")).await?;
    repo.activate(a.id).await?;
    repo.deactivate(a.id).await?;

    assert!(repo.find_active().await?.is_none());
    assert_eq!(count_active(&repo).await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_create_never_activates_directly() -> anyhow::Result<()> {
    let pool = setup().await?;
    let repo = SqliteAnnouncementRepository::new(pool);

    let mut announcement = sample_announcement("A");
    announcement.is_active = true;

    // The repository inserts inactive regardless; activation always goes
    // through the transactional path.
    let created = repo.create(announcement).await?;
    assert!(!created.is_active);

    Ok(())
}
