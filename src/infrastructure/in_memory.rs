use crate::domain::access::AccessDetails;
use crate::domain::identity::{Application, Developer, User};
use crate::domain::job::{ChallengeAnswer, Job};
use crate::domain::ports::{AccessCatalog, IdentityStore, JobStore, SessionStore};
use crate::error::{Result, ServerError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Default)]
struct Tables {
    developers: HashMap<String, Developer>,
    applications: HashMap<String, Application>,
    users: HashMap<String, User>,
    /// Session token to user id.
    tokens: HashMap<String, String>,
    /// Access details indexed by provider id.
    providers: HashMap<String, AccessDetails>,
    jobs: HashMap<String, Job>,
}

/// A thread-safe in-memory store holding every table.
///
/// All tables sit behind a single `Mutex`, so each operation observes and
/// leaves a consistent snapshot. The lock is never held across an await
/// point other than its own acquisition. `Clone` shares the same tables.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityStore for InMemoryStore {
    async fn insert_developer(&self, developer: Developer) -> Result<()> {
        let mut tables = self.tables.lock().await;
        tables.developers.insert(developer.id.clone(), developer);
        Ok(())
    }

    async fn insert_application(&self, application: Application) -> Result<()> {
        let mut tables = self.tables.lock().await;
        if !tables.developers.contains_key(&application.developer_id) {
            return Err(ServerError::ResourceNotFound);
        }
        tables
            .applications
            .insert(application.id.clone(), application);
        Ok(())
    }

    async fn get_application(&self, id: &str) -> Result<Application> {
        let tables = self.tables.lock().await;
        tables
            .applications
            .get(id)
            .cloned()
            .ok_or(ServerError::ResourceNotFound)
    }

    async fn insert_user(&self, user: User) -> Result<()> {
        let mut tables = self.tables.lock().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(ServerError::DuplicateUsername(user.username));
        }
        tables.users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn get_user(&self, id: &str) -> Result<User> {
        let tables = self.tables.lock().await;
        tables
            .users
            .get(id)
            .cloned()
            .ok_or(ServerError::ResourceNotFound)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn insert_token(&self, token: String, user_id: String) -> Result<()> {
        let mut tables = self.tables.lock().await;
        tables.tokens.insert(token, user_id);
        Ok(())
    }

    async fn remove_token(&self, token: &str) -> Result<()> {
        let mut tables = self.tables.lock().await;
        tables.tokens.remove(token);
        Ok(())
    }

    async fn resolve_token(&self, token: &str) -> Result<Option<String>> {
        let tables = self.tables.lock().await;
        Ok(tables.tokens.get(token).cloned())
    }
}

#[async_trait]
impl AccessCatalog for InMemoryStore {
    async fn register(&self, details: AccessDetails) -> Result<()> {
        let mut tables = self.tables.lock().await;
        tables
            .providers
            .insert(details.provider_id().to_string(), details);
        Ok(())
    }

    async fn lookup(&self, provider_id: &str) -> Result<AccessDetails> {
        let tables = self.tables.lock().await;
        tables
            .providers
            .get(provider_id)
            .cloned()
            .ok_or_else(|| ServerError::UnknownProvider(provider_id.to_string()))
    }
}

#[async_trait]
impl JobStore for InMemoryStore {
    async fn get_job(&self, id: &str) -> Result<Option<Job>> {
        let tables = self.tables.lock().await;
        Ok(tables.jobs.get(id).cloned())
    }

    async fn save_job(&self, job: Job) -> Result<bool> {
        let mut tables = self.tables.lock().await;
        if tables.jobs.get(&job.id).is_some_and(Job::is_finished) {
            return Ok(false);
        }

        let mut linked = false;
        if let Some(access) = job.linked_access() {
            let user = tables
                .users
                .get_mut(&job.user_id)
                .ok_or(ServerError::ResourceNotFound)?;
            user.accesses.push(access.clone());
            linked = true;
        }

        tables.jobs.insert(job.id.clone(), job);
        Ok(linked)
    }

    async fn advance_job(&self, id: &str, answers: Vec<ChallengeAnswer>) -> Result<(Job, bool)> {
        let mut guard = self.tables.lock().await;
        let tables = &mut *guard;
        let job = tables.jobs.get_mut(id).ok_or(ServerError::ResourceNotFound)?;
        let user = tables
            .users
            .get_mut(&job.user_id)
            .ok_or(ServerError::ResourceNotFound)?;

        let linked = job.advance(answers);
        if linked && let Some(access) = job.linked_access() {
            user.accesses.push(access.clone());
        }
        Ok((job.clone(), linked))
    }
}
