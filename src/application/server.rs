use super::authorization::{AuthorizationChain, RequestIdentity, UserContext};
use super::jobs::JobEngine;
use super::session::SessionManager;
use crate::config::Fixture;
use crate::domain::access::{Access, AccessDetails, Account, ChallengeMap};
use crate::domain::identity::{Application, Developer, User, UserCredentials, UserToken};
use crate::domain::job::{ChallengeAnswer, Job, JobReference, JobStatus};
use crate::domain::ports::{AccessCatalog, IdentityStore, StoreHandle};
use crate::error::{Result, ServerError};
use crate::infrastructure::in_memory::InMemoryStore;
use crate::infrastructure::sequence::IdSequence;
use std::sync::Arc;
use tracing::info;

/// The simulated banking backend.
///
/// `BankingServer` is the operation surface the transport calls into. Every
/// non-setup operation first runs the authorization chain, then hands the
/// resolved caller to the session manager, the identity tables or the job
/// engine. The `*_in`, `*_for` and `*_to` variants take a caller that was
/// already resolved through `authorization()`. Cloning is cheap and shares
/// all state.
#[derive(Clone)]
pub struct BankingServer {
    store: StoreHandle,
    ids: Arc<IdSequence>,
    sessions: SessionManager,
    auth: AuthorizationChain,
    jobs: JobEngine,
}

impl Default for BankingServer {
    fn default() -> Self {
        Self::new()
    }
}

impl BankingServer {
    /// Creates a server with empty in-memory tables.
    pub fn new() -> Self {
        Self::with_store(Arc::new(InMemoryStore::new()))
    }

    /// Creates a server on top of an existing store.
    pub fn with_store(store: StoreHandle) -> Self {
        let ids = Arc::new(IdSequence::new());
        let sessions = SessionManager::new(store.clone(), ids.clone());
        let auth = AuthorizationChain::new(store.clone(), sessions.clone());
        let jobs = JobEngine::new(store.clone(), ids.clone());
        Self {
            store,
            ids,
            sessions,
            auth,
            jobs,
        }
    }

    /// Creates a server seeded with `Fixture::default()`.
    pub async fn with_defaults() -> Result<Self> {
        let server = Self::new();
        server.seed(&Fixture::default()).await?;
        Ok(server)
    }

    /// The chain every non-setup operation runs first.
    pub fn authorization(&self) -> &AuthorizationChain {
        &self.auth
    }

    /// Registers the fixture's developer, application, user and provider.
    pub async fn seed(&self, fixture: &Fixture) -> Result<()> {
        self.register_developer(&fixture.developer_id).await?;
        self.register_application(&fixture.application_id, &fixture.developer_id)
            .await?;
        self.create_user(
            Some(&fixture.application_id),
            UserCredentials {
                username: fixture.username.clone(),
                password: fixture.password.clone(),
            },
        )
        .await?;
        self.register_access_provider(fixture.access.clone(), fixture.challenge_map.clone())
            .await
    }

    pub async fn register_developer(&self, developer_id: &str) -> Result<()> {
        self.store
            .insert_developer(Developer {
                id: developer_id.to_string(),
            })
            .await
    }

    pub async fn register_application(&self, application_id: &str, developer_id: &str) -> Result<()> {
        self.store
            .insert_application(Application {
                id: application_id.to_string(),
                developer_id: developer_id.to_string(),
            })
            .await?;
        info!(application_id, developer_id, "application registered");
        Ok(())
    }

    /// Makes `access` obtainable by answering every challenge in `challenge_map`.
    ///
    /// The entry is keyed by the access's provider id and replaces any earlier one.
    pub async fn register_access_provider(
        &self,
        access: Access,
        challenge_map: ChallengeMap,
    ) -> Result<()> {
        let provider_id = access.provider_id.clone();
        self.store
            .register(AccessDetails::new(access, challenge_map))
            .await?;
        info!(provider_id = %provider_id, "access provider registered");
        Ok(())
    }

    /// Creates a user in the calling application and logs them in.
    pub async fn create_user(
        &self,
        application_id: Option<&str>,
        credentials: UserCredentials,
    ) -> Result<UserToken> {
        let application = self.auth.require_app(application_id).await?;
        self.create_user_in(&application, credentials).await
    }

    pub async fn create_user_in(
        &self,
        application: &Application,
        credentials: UserCredentials,
    ) -> Result<UserToken> {
        let user = User::new(
            self.ids.next_id(),
            credentials.username,
            credentials.password,
            application.id.clone(),
        );
        let user_id = user.id.clone();
        self.store.insert_user(user).await?;
        info!(user_id = %user_id, "user created");

        let token = self.sessions.issue(&user_id).await?;
        Ok(UserToken { id: user_id, token })
    }

    pub async fn login(
        &self,
        application_id: Option<&str>,
        credentials: UserCredentials,
    ) -> Result<UserToken> {
        let application = self.auth.require_app(application_id).await?;
        self.login_in(&application, credentials).await
    }

    pub async fn login_in(
        &self,
        application: &Application,
        credentials: UserCredentials,
    ) -> Result<UserToken> {
        self.sessions
            .login(&application.id, &credentials.username, &credentials.password)
            .await
    }

    pub async fn logout(&self, identity: &RequestIdentity) -> Result<()> {
        let context = self.auth.require_user(identity).await?;
        self.sessions.logout(&context.token).await
    }

    pub async fn delete_user(&self, _identity: &RequestIdentity) -> Result<()> {
        Err(ServerError::NotImplemented("user deletion"))
    }

    pub async fn reset_password(&self, _application_id: Option<&str>) -> Result<()> {
        Err(ServerError::NotImplemented("password reset"))
    }

    /// Starts linking a new access for the caller.
    pub async fn create_job(
        &self,
        identity: &RequestIdentity,
        provider_id: &str,
        answers: Vec<ChallengeAnswer>,
    ) -> Result<JobReference> {
        let context = self.auth.require_user(identity).await?;
        self.create_job_for(&context, provider_id, answers).await
    }

    pub async fn create_job_for(
        &self,
        context: &UserContext,
        provider_id: &str,
        answers: Vec<ChallengeAnswer>,
    ) -> Result<JobReference> {
        self.jobs.create(&context.user.id, provider_id, answers).await
    }

    pub async fn job_status(&self, identity: &RequestIdentity, job_id: &str) -> Result<JobStatus> {
        let (_, job) = self.auth.require_job(identity, job_id).await?;
        Ok(self.jobs.status(&job))
    }

    pub async fn submit_job_answers(
        &self,
        identity: &RequestIdentity,
        job_id: &str,
        answers: Vec<ChallengeAnswer>,
    ) -> Result<JobStatus> {
        let (_, job) = self.auth.require_job(identity, job_id).await?;
        self.submit_answers_to(&job, answers).await
    }

    /// `job` must come from `AuthorizationChain::require_job`. Only its id is
    /// used; the stored job is advanced, not this copy.
    pub async fn submit_answers_to(
        &self,
        job: &Job,
        answers: Vec<ChallengeAnswer>,
    ) -> Result<JobStatus> {
        self.jobs.advance(&job.id, answers).await
    }

    /// Always fails, but only after the caller has been shown to own the job.
    pub async fn delete_job(&self, identity: &RequestIdentity, job_id: &str) -> Result<()> {
        self.auth.require_job(identity, job_id).await?;
        Err(ServerError::NotImplemented("job deletion"))
    }

    pub async fn list_accesses(&self, identity: &RequestIdentity) -> Result<Vec<Access>> {
        let context = self.auth.require_user(identity).await?;
        Ok(context.user.accesses)
    }

    pub async fn get_access(&self, identity: &RequestIdentity, access_id: i64) -> Result<Access> {
        let context = self.auth.require_user(identity).await?;
        self.get_access_for(&context, access_id)
    }

    pub fn get_access_for(&self, context: &UserContext, access_id: i64) -> Result<Access> {
        context
            .user
            .accesses
            .iter()
            .find(|access| access.id == access_id)
            .cloned()
            .ok_or(ServerError::ResourceNotFound)
    }

    /// Every account across all of the caller's accesses.
    pub async fn list_accounts(&self, identity: &RequestIdentity) -> Result<Vec<Account>> {
        let context = self.auth.require_user(identity).await?;
        Ok(context.user.accounts())
    }
}
