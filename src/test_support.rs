//! In-memory repositories shared by the unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::db::category_repository::CategoryRepository;
use crate::db::content_repository::ContentRepository;
use crate::error::AppError;
use crate::models::category::CategoryProfile;
use crate::models::content::{ContentItem, ContentKind};
use crate::models::pagination::PageRequest;
use crate::models::slides::{SavedUrls, VideoSlide};
use crate::storage::client::StorageClient;

type StoredItemEdit = Box<dyn FnOnce(&mut ContentItem) + Send>;

pub struct MockContentRepo {
    pub items: Mutex<Vec<ContentItem>>,
    /// Applied to the stored item right after the next `find_by_id`, like a
    /// concurrent writer landing between a read and the following write.
    after_find: Mutex<Option<StoredItemEdit>>,
}

impl MockContentRepo {
    pub fn new() -> Self {
        Self::with(vec![])
    }

    pub fn with(items: Vec<ContentItem>) -> Self {
        Self {
            items: Mutex::new(items),
            after_find: Mutex::new(None),
        }
    }

    pub fn after_next_find(&self, edit: impl FnOnce(&mut ContentItem) + Send + 'static) {
        *self.after_find.lock().unwrap() = Some(Box::new(edit));
    }

    pub fn get(&self, id: &str) -> Option<ContentItem> {
        self.items
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id == id)
            .cloned()
    }

    fn matching(&self, kind: ContentKind, search: Option<&str>) -> Vec<ContentItem> {
        let needle = search.map(str::to_lowercase);
        let mut items: Vec<ContentItem> = self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.kind() == kind)
            .filter(|i| match &needle {
                Some(n) => {
                    i.title.to_lowercase().contains(n) || i.description.to_lowercase().contains(n)
                }
                None => true,
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| b.id.cmp(&a.id));
        items
    }
}

#[async_trait]
impl ContentRepository for MockContentRepo {
    async fn insert(&self, item: ContentItem) -> Result<(), AppError> {
        self.items.lock().unwrap().push(item);
        Ok(())
    }

    async fn find_by_id(
        &self,
        kind: ContentKind,
        id: &str,
    ) -> Result<Option<ContentItem>, AppError> {
        let found = self.get(id).filter(|i| i.kind() == kind);
        if found.is_some() {
            if let Some(edit) = self.after_find.lock().unwrap().take() {
                let mut items = self.items.lock().unwrap();
                if let Some(stored) = items.iter_mut().find(|i| i.id == id) {
                    edit(stored);
                }
            }
        }
        Ok(found)
    }

    async fn list(
        &self,
        kind: ContentKind,
        page: &PageRequest,
    ) -> Result<(Vec<ContentItem>, u64), AppError> {
        let items = self.matching(kind, page.search_term());
        let total = items.len() as u64;
        let page_items = items
            .into_iter()
            .skip(page.skip() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok((page_items, total))
    }

    async fn count(&self, kind: ContentKind, search: Option<&str>) -> Result<u64, AppError> {
        Ok(self.matching(kind, search).len() as u64)
    }

    async fn replace(&self, item: ContentItem, expected_revision: i64) -> Result<(), AppError> {
        let mut items = self.items.lock().unwrap();
        let existing = items
            .iter_mut()
            .find(|i| i.id == item.id && i.kind() == item.kind())
            .ok_or_else(|| AppError::content_not_found(item.kind(), &item.id))?;
        if existing.video_slides_revision != expected_revision {
            return Err(AppError::Conflict("revision changed".into()));
        }
        *existing = item;
        Ok(())
    }

    async fn delete(&self, kind: ContentKind, id: &str) -> Result<bool, AppError> {
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|i| !(i.id == id && i.kind() == kind));
        Ok(items.len() < before)
    }

    async fn set_video_slides(
        &self,
        kind: ContentKind,
        id: &str,
        slides: Vec<VideoSlide>,
        expected_revision: i64,
        now: DateTime<Utc>,
    ) -> Result<ContentItem, AppError> {
        let mut items = self.items.lock().unwrap();
        let item = items
            .iter_mut()
            .find(|i| i.id == id && i.kind() == kind)
            .ok_or_else(|| AppError::content_not_found(kind, id))?;
        if item.video_slides_revision != expected_revision {
            return Err(AppError::Conflict("revision changed".into()));
        }
        item.replace_video_slides(slides, now);
        Ok(item.clone())
    }

    async fn set_saved_urls(
        &self,
        kind: ContentKind,
        id: &str,
        index: usize,
        urls: &SavedUrls,
    ) -> Result<ContentItem, AppError> {
        let mut items = self.items.lock().unwrap();
        let item = items
            .iter_mut()
            .find(|i| i.id == id && i.kind() == kind)
            .ok_or_else(|| AppError::content_not_found(kind, id))?;
        let slide = item
            .video_slides
            .as_mut()
            .and_then(|slides| slides.get_mut(index))
            .ok_or_else(|| AppError::NotFound(format!("Video slide {index} not found")))?;
        urls.apply_to(slide);
        Ok(item.clone())
    }
}

pub struct MockCategoryRepo {
    pub profiles: Mutex<HashMap<ContentKind, CategoryProfile>>,
}

impl MockCategoryRepo {
    pub fn new() -> Self {
        Self {
            profiles: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl CategoryRepository for MockCategoryRepo {
    async fn find(&self, kind: ContentKind) -> Result<Option<CategoryProfile>, AppError> {
        Ok(self.profiles.lock().unwrap().get(&kind).cloned())
    }

    async fn list(&self) -> Result<Vec<CategoryProfile>, AppError> {
        let mut profiles: Vec<_> = self.profiles.lock().unwrap().values().cloned().collect();
        profiles.sort_by_key(|p| p.kind.as_str());
        Ok(profiles)
    }

    async fn upsert(&self, profile: CategoryProfile) -> Result<(), AppError> {
        self.profiles.lock().unwrap().insert(profile.kind, profile);
        Ok(())
    }

    async fn delete(&self, kind: ContentKind) -> Result<bool, AppError> {
        Ok(self.profiles.lock().unwrap().remove(&kind).is_some())
    }
}

pub struct MockStorage {
    pub objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl StorageClient for MockStorage {
    async fn put_object(
        &self,
        key: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<(), AppError> {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (content, content_type.to_string()));
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        Ok(self
            .objects
            .lock()
            .unwrap()
            .get(key)
            .map(|(bytes, _)| bytes.clone()))
    }
}
