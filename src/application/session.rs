use crate::domain::identity::UserToken;
use crate::domain::ports::{IdentityStore, SessionStore, StoreHandle};
use crate::error::{Result, ServerError};
use crate::infrastructure::sequence::IdSequence;
use std::sync::Arc;
use tracing::{debug, info};

/// Issues, resolves and revokes session tokens.
///
/// A user may hold any number of concurrent tokens. Tokens never expire.
#[derive(Clone)]
pub struct SessionManager {
    store: StoreHandle,
    ids: Arc<IdSequence>,
}

impl SessionManager {
    pub fn new(store: StoreHandle, ids: Arc<IdSequence>) -> Self {
        Self { store, ids }
    }

    /// Mints a fresh token bound to `user_id`.
    pub async fn issue(&self, user_id: &str) -> Result<String> {
        let token = self.ids.next_id();
        self.store
            .insert_token(token.clone(), user_id.to_string())
            .await?;
        debug!(user_id, "session token issued");
        Ok(token)
    }

    /// Checks credentials against the users of `application_id`.
    ///
    /// Unknown username, wrong password and a user belonging to another
    /// application all fail identically with `AuthenticationFailed`.
    pub async fn login(
        &self,
        application_id: &str,
        username: &str,
        password: &str,
    ) -> Result<UserToken> {
        let user = self
            .store
            .find_user_by_username(username)
            .await?
            .filter(|user| user.password == password && user.application_id == application_id)
            .ok_or_else(|| {
                debug!(application_id, username, "login rejected");
                ServerError::AuthenticationFailed
            })?;

        let token = self.issue(&user.id).await?;
        info!(user_id = %user.id, application_id, "user logged in");
        Ok(UserToken { id: user.id, token })
    }

    /// Revokes `token`. Revoking an unknown token is not an error.
    pub async fn logout(&self, token: &str) -> Result<()> {
        self.store.remove_token(token).await?;
        debug!("session token revoked");
        Ok(())
    }

    pub async fn resolve(&self, token: &str) -> Result<String> {
        self.store
            .resolve_token(token)
            .await?
            .ok_or(ServerError::AuthenticationFailed)
    }
}
