use async_trait::async_trait;
use hrms_application::{Page, PageRequest, UserRepository};
use hrms_core::{AppError, AppResult};
use hrms_domain::User;
use uuid::Uuid;

use super::InMemoryHrRepository;

#[async_trait]
impl UserRepository for InMemoryHrRepository {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|user| user.username.as_str() == username)
            .cloned())
    }

    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|user| user.id == user_id)
            .cloned())
    }

    async fn insert(&self, user: &User) -> AppResult<()> {
        let mut users = self.users.write().await;
        if users
            .iter()
            .any(|existing| existing.username == user.username || existing.email == user.email)
        {
            return Err(AppError::Conflict(
                "an account with this username or email already exists".to_owned(),
            ));
        }

        users.push(user.clone());
        Ok(())
    }

    async fn list(&self, page: PageRequest) -> AppResult<Page<User>> {
        let mut users = self.users.read().await.clone();
        users.sort_by(|left, right| left.username.as_str().cmp(right.username.as_str()));
        Ok(Page::from_ordered(users, page))
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.users.read().await.len() as u64)
    }
}
