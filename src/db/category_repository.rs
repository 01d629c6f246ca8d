use async_trait::async_trait;

use crate::error::AppError;
use crate::models::category::CategoryProfile;
use crate::models::content::ContentKind;

/// Repository trait for category branding profiles.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// The stored profile of `kind`, or `None` when only the default applies.
    async fn find(&self, kind: ContentKind) -> Result<Option<CategoryProfile>, AppError>;

    async fn list(&self) -> Result<Vec<CategoryProfile>, AppError>;

    /// Create or replace the profile of its kind.
    async fn upsert(&self, profile: CategoryProfile) -> Result<(), AppError>;

    /// Remove a stored profile. Returns `false` when nothing was stored.
    async fn delete(&self, kind: ContentKind) -> Result<bool, AppError>;
}

/// Resolve the effective profile of `kind`: stored one, else the default.
pub async fn effective_profile(
    repo: &dyn CategoryRepository,
    kind: ContentKind,
) -> Result<CategoryProfile, AppError> {
    Ok(repo
        .find(kind)
        .await?
        .unwrap_or_else(|| CategoryProfile::default_for(kind)))
}

/// MongoDB implementation of the CategoryRepository.
pub struct MongoCategoryRepository {
    collection: mongodb::Collection<CategoryProfile>,
}

impl MongoCategoryRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("categories"),
        }
    }
}

#[async_trait]
impl CategoryRepository for MongoCategoryRepository {
    async fn find(&self, kind: ContentKind) -> Result<Option<CategoryProfile>, AppError> {
        use mongodb::bson::doc;

        self.collection
            .find_one(doc! { "_id": kind.as_str() })
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn list(&self) -> Result<Vec<CategoryProfile>, AppError> {
        use futures::TryStreamExt;
        use mongodb::bson::doc;
        use mongodb::options::FindOptions;

        let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();

        let mut cursor = self
            .collection
            .find(doc! {})
            .with_options(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut profiles = Vec::new();
        while let Some(profile) = cursor
            .try_next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            profiles.push(profile);
        }

        Ok(profiles)
    }

    async fn upsert(&self, profile: CategoryProfile) -> Result<(), AppError> {
        use mongodb::bson::doc;
        use mongodb::options::ReplaceOptions;

        let options = ReplaceOptions::builder().upsert(true).build();

        self.collection
            .replace_one(doc! { "_id": profile.kind.as_str() }, &profile)
            .with_options(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, kind: ContentKind) -> Result<bool, AppError> {
        use mongodb::bson::doc;

        let result = self
            .collection
            .delete_one(doc! { "_id": kind.as_str() })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.deleted_count > 0)
    }
}
