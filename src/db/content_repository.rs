use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::models::content::{ContentItem, ContentKind};
use crate::models::pagination::PageRequest;
use crate::models::slides::{SavedUrls, VideoSlide};

/// Repository trait for riddles, sites, topics and tutorials.
///
/// This trait allows mocking the database layer in tests.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Insert a freshly created item into the collection of its kind.
    async fn insert(&self, item: ContentItem) -> Result<(), AppError>;

    async fn find_by_id(&self, kind: ContentKind, id: &str)
        -> Result<Option<ContentItem>, AppError>;

    /// One page of items, newest first, plus the total number of matches.
    async fn list(
        &self,
        kind: ContentKind,
        page: &PageRequest,
    ) -> Result<(Vec<ContentItem>, u64), AppError>;

    /// Count items matching an optional search term.
    async fn count(&self, kind: ContentKind, search: Option<&str>) -> Result<u64, AppError>;

    /// Replace a stored item if its video slides are still at
    /// `expected_revision`.
    ///
    /// Fails with `NotFound` for an unknown id and `Conflict` when the video
    /// slides were rewritten in between.
    async fn replace(&self, item: ContentItem, expected_revision: i64) -> Result<(), AppError>;

    /// Returns `false` when no item has that id.
    async fn delete(&self, kind: ContentKind, id: &str) -> Result<bool, AppError>;

    /// Write the video slides if the stored revision still equals
    /// `expected_revision`, bumping it by one.
    ///
    /// Fails with `NotFound` for an unknown id and `Conflict` when another
    /// write changed the revision in between.
    async fn set_video_slides(
        &self,
        kind: ContentKind,
        id: &str,
        slides: Vec<VideoSlide>,
        expected_revision: i64,
        now: DateTime<Utc>,
    ) -> Result<ContentItem, AppError>;

    /// Set the saved render URLs on the `index`-th video slide.
    async fn set_saved_urls(
        &self,
        kind: ContentKind,
        id: &str,
        index: usize,
        urls: &SavedUrls,
    ) -> Result<ContentItem, AppError>;
}

/// MongoDB implementation of the ContentRepository.
///
/// Each content kind lives in its own collection named after its resource.
pub struct MongoContentRepository {
    db: mongodb::Database,
}

impl MongoContentRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self { db: db.clone() }
    }

    fn collection(&self, kind: ContentKind) -> mongodb::Collection<ContentItem> {
        self.db.collection(kind.resource())
    }
}

fn revision_conflict(kind: ContentKind, id: &str, current: i64, expected: i64) -> AppError {
    AppError::Conflict(format!(
        "Video slides of {} '{}' changed concurrently (revision {} != {})",
        kind, id, current, expected
    ))
}

/// Case-insensitive literal match on title or description.
fn search_filter(search: Option<&str>) -> mongodb::bson::Document {
    use mongodb::bson::doc;

    match search {
        Some(term) => {
            let pattern = regex::escape(term);
            doc! {
                "$or": [
                    { "title": { "$regex": &pattern, "$options": "i" } },
                    { "description": { "$regex": &pattern, "$options": "i" } },
                ]
            }
        }
        None => doc! {},
    }
}

#[async_trait]
impl ContentRepository for MongoContentRepository {
    async fn insert(&self, item: ContentItem) -> Result<(), AppError> {
        self.collection(item.kind())
            .insert_one(&item)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        kind: ContentKind,
        id: &str,
    ) -> Result<Option<ContentItem>, AppError> {
        use mongodb::bson::doc;

        self.collection(kind)
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn list(
        &self,
        kind: ContentKind,
        page: &PageRequest,
    ) -> Result<(Vec<ContentItem>, u64), AppError> {
        use futures::TryStreamExt;
        use mongodb::bson::doc;
        use mongodb::options::FindOptions;

        let filter = search_filter(page.search_term());
        let total = self
            .collection(kind)
            .count_documents(filter.clone())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // Hex ObjectIds sort in creation order
        let options = FindOptions::builder()
            .sort(doc! { "_id": -1 })
            .skip(page.skip())
            .limit(page.limit() as i64)
            .build();

        let mut cursor = self
            .collection(kind)
            .find(filter)
            .with_options(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut items = Vec::new();
        while let Some(item) = cursor
            .try_next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            items.push(item);
        }

        Ok((items, total))
    }

    async fn count(&self, kind: ContentKind, search: Option<&str>) -> Result<u64, AppError> {
        self.collection(kind)
            .count_documents(search_filter(search))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn replace(&self, item: ContentItem, expected_revision: i64) -> Result<(), AppError> {
        use mongodb::bson::doc;

        let kind = item.kind();
        let result = self
            .collection(kind)
            .replace_one(
                doc! { "_id": &item.id, "videoSlidesRevision": expected_revision },
                &item,
            )
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.matched_count > 0 {
            return Ok(());
        }
        match self.find_by_id(kind, &item.id).await? {
            None => Err(AppError::content_not_found(kind, &item.id)),
            Some(current) => Err(revision_conflict(
                kind,
                &item.id,
                current.video_slides_revision,
                expected_revision,
            )),
        }
    }

    async fn delete(&self, kind: ContentKind, id: &str) -> Result<bool, AppError> {
        use mongodb::bson::doc;

        let result = self
            .collection(kind)
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.deleted_count > 0)
    }

    async fn set_video_slides(
        &self,
        kind: ContentKind,
        id: &str,
        slides: Vec<VideoSlide>,
        expected_revision: i64,
        now: DateTime<Utc>,
    ) -> Result<ContentItem, AppError> {
        use mongodb::bson::{doc, to_bson};
        use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};

        let now_bson = to_bson(&now).map_err(|e| AppError::Database(e.to_string()))?;
        let mut set = doc! {};
        set.insert("videoSlidesRevision", expected_revision + 1);
        set.insert("videoSlidesUpdatedAt", now_bson.clone());
        set.insert("updatedAt", now_bson);

        let mut update = doc! {};
        if slides.is_empty() {
            update.insert("$unset", doc! { "videoSlides": "" });
        } else {
            let slides_bson = to_bson(&slides).map_err(|e| AppError::Database(e.to_string()))?;
            set.insert("videoSlides", slides_bson);
        }
        update.insert("$set", set);

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let updated = self
            .collection(kind)
            .find_one_and_update(
                doc! { "_id": id, "videoSlidesRevision": expected_revision },
                update,
            )
            .with_options(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        match updated {
            Some(item) => Ok(item),
            None => match self.find_by_id(kind, id).await? {
                None => Err(AppError::content_not_found(kind, id)),
                Some(current) => Err(revision_conflict(
                    kind,
                    id,
                    current.video_slides_revision,
                    expected_revision,
                )),
            },
        }
    }

    async fn set_saved_urls(
        &self,
        kind: ContentKind,
        id: &str,
        index: usize,
        urls: &SavedUrls,
    ) -> Result<ContentItem, AppError> {
        use mongodb::bson::doc;
        use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};

        let mut set = doc! {};
        if let Some(url) = &urls.saved_image_url {
            set.insert(format!("videoSlides.{index}.savedImageUrl"), url.as_str());
        }
        if let Some(url) = &urls.saved_slide_url {
            set.insert(format!("videoSlides.{index}.savedSlideUrl"), url.as_str());
        }
        if set.is_empty() {
            return Err(AppError::BadRequest(
                "Provide savedImageUrl and/or savedSlideUrl".into(),
            ));
        }

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let mut filter = doc! { "_id": id };
        filter.insert(format!("videoSlides.{index}"), doc! { "$exists": true });

        let updated = self
            .collection(kind)
            .find_one_and_update(filter, doc! { "$set": set })
            .with_options(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        match updated {
            Some(item) => Ok(item),
            None => match self.find_by_id(kind, id).await? {
                None => Err(AppError::content_not_found(kind, id)),
                Some(_) => Err(AppError::NotFound(format!(
                    "Video slide {} of {} '{}' not found",
                    index, kind, id
                ))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_filter_empty() {
        assert!(search_filter(None).is_empty());
    }

    #[test]
    fn test_search_filter_escapes_regex() {
        let filter = search_filter(Some("c++ (dasar)"));
        let clauses = filter.get_array("$or").unwrap();
        assert_eq!(clauses.len(), 2);

        let title = clauses[0]
            .as_document()
            .unwrap()
            .get_document("title")
            .unwrap();
        assert_eq!(title.get_str("$regex").unwrap(), r"c\+\+ \(dasar\)");
        assert_eq!(title.get_str("$options").unwrap(), "i");
    }
}
