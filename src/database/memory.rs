use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{Activity, ActivityPatch, NewActivity, User};
use super::repository::{ActivityRepository, RepositoryError};

#[derive(Default)]
struct Store {
    users: HashMap<Uuid, User>,
    // Stored with `owner` unset; the user is joined in on read
    activities: Vec<Activity>,
}

/// Process-local activity storage used by `serve --in-memory` and tests
#[derive(Clone, Default)]
pub struct MemoryActivityRepository {
    store: Arc<RwLock<Store>>,
}

impl MemoryActivityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, user: User) -> User {
        let mut store = self.store.write().await;
        store.users.insert(user.id, user.clone());
        user
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.activities.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Store {
    fn populate(&self, activity: &Activity) -> Activity {
        let mut populated = activity.clone();
        populated.owner = activity.owner_id.and_then(|id| self.users.get(&id).cloned());
        populated
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.activities.iter().position(|a| a.id == id)
    }
}

#[async_trait]
impl ActivityRepository for MemoryActivityRepository {
    async fn list_all(&self) -> Result<Vec<Activity>, RepositoryError> {
        let store = self.store.read().await;
        Ok(store
            .activities
            .iter()
            .map(|a| store.populate(a))
            .collect())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Activity>, RepositoryError> {
        let store = self.store.read().await;
        Ok(store
            .activities
            .iter()
            .find(|a| a.id == id)
            .map(|a| store.populate(a)))
    }

    async fn create(&self, new: NewActivity) -> Result<Activity, RepositoryError> {
        let mut store = self.store.write().await;

        let now = Utc::now();
        let activity = Activity {
            id: Uuid::new_v4(),
            owner_id: new.owner,
            owner: None,
            title: new.title,
            description: new.description,
            activity_type: new.activity_type,
            participants: new.participants,
            price: new.price,
            accessibility: new.accessibility,
            link: new.link,
            key: new.key,
            completed: new.completed,
            created_at: now,
            updated_at: now,
        };
        store.activities.push(activity.clone());
        Ok(store.populate(&activity))
    }

    async fn update_by_id(&self, id: Uuid, patch: ActivityPatch) -> Result<(), RepositoryError> {
        let mut store = self.store.write().await;
        let idx = store.position(id).ok_or(RepositoryError::NotFound(id))?;
        let activity = &mut store.activities[idx];
        patch.apply_to(activity);
        activity.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut store = self.store.write().await;
        let idx = store.position(id).ok_or(RepositoryError::NotFound(id))?;
        store.activities.remove(idx);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_activity(owner: Option<Uuid>, title: &str) -> NewActivity {
        NewActivity {
            owner,
            title: title.to_string(),
            description: None,
            activity_type: None,
            participants: None,
            price: None,
            accessibility: None,
            link: None,
            key: None,
            completed: false,
        }
    }

    #[tokio::test]
    async fn create_then_get_populates_owner() {
        let repo = MemoryActivityRepository::new();
        let owner = repo.insert_user(User::new("a@example.com")).await;

        let created = repo.create(new_activity(Some(owner.id), "run")).await.unwrap();
        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.owner, Some(owner));
    }

    #[tokio::test]
    async fn create_stores_missing_or_unknown_owner_as_given() {
        let repo = MemoryActivityRepository::new();
        let unknown = Uuid::new_v4();

        let ownerless = repo.create(new_activity(None, "run")).await.unwrap();
        let orphaned = repo.create(new_activity(Some(unknown), "swim")).await.unwrap();

        assert_eq!(ownerless.owner_id, None);
        assert_eq!(ownerless.owner, None);
        assert_eq!(orphaned.owner_id, Some(unknown));
        assert_eq!(orphaned.owner, None);
        assert_eq!(repo.list_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn list_all_keeps_insertion_order() {
        let repo = MemoryActivityRepository::new();
        let owner = repo.insert_user(User::new("a@example.com")).await;
        for title in ["one", "two", "three"] {
            repo.create(new_activity(Some(owner.id), title)).await.unwrap();
        }

        let titles: Vec<String> = repo.list_all().await.unwrap().into_iter().map(|a| a.title).collect();
        assert_eq!(titles, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn update_changes_fields_but_not_owner() {
        let repo = MemoryActivityRepository::new();
        let owner = repo.insert_user(User::new("a@example.com")).await;
        let created = repo.create(new_activity(Some(owner.id), "run")).await.unwrap();

        let patch = ActivityPatch {
            title: Some("walk".to_string()),
            ..Default::default()
        };
        repo.update_by_id(created.id, patch).await.unwrap();

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "walk");
        assert_eq!(fetched.owner_id, Some(owner.id));
        assert!(fetched.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn update_and_delete_missing_report_not_found() {
        let repo = MemoryActivityRepository::new();
        let id = Uuid::new_v4();
        assert!(matches!(
            repo.update_by_id(id, ActivityPatch::default()).await,
            Err(RepositoryError::NotFound(_))
        ));
        assert!(matches!(repo.delete_by_id(id).await, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_removes_activity() {
        let repo = MemoryActivityRepository::new();
        let owner = repo.insert_user(User::new("a@example.com")).await;
        let created = repo.create(new_activity(Some(owner.id), "run")).await.unwrap();

        repo.delete_by_id(created.id).await.unwrap();

        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
        assert!(repo.is_empty().await);
    }
}
