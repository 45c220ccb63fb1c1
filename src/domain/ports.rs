use super::access::AccessDetails;
use super::identity::{Application, Developer, User};
use super::job::{ChallengeAnswer, Job};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn insert_developer(&self, developer: Developer) -> Result<()>;
    /// Fails with `ResourceNotFound` when the owning developer is unknown.
    async fn insert_application(&self, application: Application) -> Result<()>;
    async fn get_application(&self, id: &str) -> Result<Application>;
    /// Fails with `DuplicateUsername` if any user, in any application, has the same username.
    async fn insert_user(&self, user: User) -> Result<()>;
    async fn get_user(&self, id: &str) -> Result<User>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert_token(&self, token: String, user_id: String) -> Result<()>;
    async fn remove_token(&self, token: &str) -> Result<()>;
    async fn resolve_token(&self, token: &str) -> Result<Option<String>>;
}

#[async_trait]
pub trait AccessCatalog: Send + Sync {
    /// Replaces any entry already registered for the same provider.
    async fn register(&self, details: AccessDetails) -> Result<()>;
    async fn lookup(&self, provider_id: &str) -> Result<AccessDetails>;
}

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn get_job(&self, id: &str) -> Result<Option<Job>>;
    /// Persists `job`, and in the same critical section appends its access to
    /// the owning user if this save is the one that makes it succeed.
    ///
    /// A finished job already in the store is never replaced. Returns whether
    /// an access was linked.
    async fn save_job(&self, job: Job) -> Result<bool>;
    /// Loads job `id`, applies `answers` and writes it back as one atomic step,
    /// linking the access if this call makes the job succeed.
    ///
    /// Fails with `ResourceNotFound` when the job is unknown. Returns the
    /// updated job and whether an access was linked.
    async fn advance_job(&self, id: &str, answers: Vec<ChallengeAnswer>) -> Result<(Job, bool)>;
}

/// Every table the server needs, behind one implementation.
pub trait Store: IdentityStore + SessionStore + AccessCatalog + JobStore {}

impl<T> Store for T where T: IdentityStore + SessionStore + AccessCatalog + JobStore {}

pub type StoreHandle = Arc<dyn Store>;
