use crate::db::category_repository::CategoryRepository;
use crate::models::category::CategoryProfile;
use crate::models::content::ContentKind;

/// Store the built-in category profiles that are not stored yet.
///
/// Failures are logged and skipped; the defaults still apply at runtime.
pub async fn seed_category_profiles(repo: &dyn CategoryRepository) -> usize {
    tracing::info!("Seeding category profiles...");

    let mut seeded = 0;
    for kind in ContentKind::ALL {
        match repo.find(kind).await {
            Ok(Some(_)) => {
                tracing::info!("Category '{}' already exists, skipping.", kind);
                continue;
            }
            Err(e) => {
                tracing::error!("Failed to check for existing category '{}': {}", kind, e);
                continue;
            }
            Ok(None) => {}
        }

        match repo.upsert(CategoryProfile::default_for(kind)).await {
            Ok(()) => {
                tracing::info!("Seeded category '{}'.", kind);
                seeded += 1;
            }
            Err(e) => tracing::error!("Failed to seed category '{}': {}", kind, e),
        }
    }

    tracing::info!("Category seeding completed ({} new).", seeded);
    seeded
}
