use super::session::SessionManager;
use crate::domain::identity::{Application, User};
use crate::domain::job::Job;
use crate::domain::ports::{IdentityStore, JobStore, StoreHandle};
use crate::error::{Result, ServerError};
use tracing::debug;

/// Caller-supplied credentials, as extracted by the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestIdentity {
    pub application_id: Option<String>,
    pub token: Option<String>,
}

impl RequestIdentity {
    pub fn new(application_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            application_id: Some(application_id.into()),
            token: Some(token.into()),
        }
    }
}

/// An authenticated caller.
#[derive(Debug, Clone)]
pub struct UserContext {
    pub application: Application,
    pub user: User,
    pub token: String,
}

/// Resolves application, then session, then owned job.
///
/// Every tier short-circuits: nothing past the first failure is consulted.
#[derive(Clone)]
pub struct AuthorizationChain {
    store: StoreHandle,
    sessions: SessionManager,
}

impl AuthorizationChain {
    pub fn new(store: StoreHandle, sessions: SessionManager) -> Self {
        Self { store, sessions }
    }

    pub async fn require_app(&self, application_id: Option<&str>) -> Result<Application> {
        let id = application_id
            .filter(|id| !id.is_empty())
            .ok_or(ServerError::AppIdInvalid)?;
        self.store.get_application(id).await.map_err(|err| match err {
            ServerError::ResourceNotFound => {
                debug!(application_id = id, "unknown application");
                ServerError::AppIdInvalid
            }
            other => other,
        })
    }

    /// A token issued for another application is rejected like an invalid one.
    pub async fn require_user(&self, identity: &RequestIdentity) -> Result<UserContext> {
        let application = self.require_app(identity.application_id.as_deref()).await?;

        let token = identity
            .token
            .as_deref()
            .ok_or(ServerError::AuthenticationFailed)?;
        let user_id = self.sessions.resolve(token).await?;
        let user = match self.store.get_user(&user_id).await {
            Ok(user) => user,
            Err(ServerError::ResourceNotFound) => return Err(ServerError::AuthenticationFailed),
            Err(other) => return Err(other),
        };
        if user.application_id != application.id {
            debug!(
                user_id = %user.id,
                application_id = %application.id,
                "token presented for a foreign application"
            );
            return Err(ServerError::AuthenticationFailed);
        }

        Ok(UserContext {
            application,
            user,
            token: token.to_string(),
        })
    }

    /// Existence is checked before ownership: a missing job is
    /// `ResourceNotFound`, someone else's job is `AuthenticationFailed`.
    pub async fn require_job(
        &self,
        identity: &RequestIdentity,
        job_id: &str,
    ) -> Result<(UserContext, Job)> {
        let context = self.require_user(identity).await?;

        let job = self
            .store
            .get_job(job_id)
            .await?
            .ok_or(ServerError::ResourceNotFound)?;
        if job.user_id != context.user.id {
            debug!(job_id, user_id = %context.user.id, "job owned by another user");
            return Err(ServerError::AuthenticationFailed);
        }

        Ok((context, job))
    }
}
