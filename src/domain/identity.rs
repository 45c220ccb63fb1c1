use super::access::Access;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Developer {
    pub id: String,
}

/// A registered client of the simulated backend, scoped to one developer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    pub id: String,
    pub developer_id: String,
}

/// An end-user owned by exactly one application.
///
/// `accesses` only ever grows: the job engine appends to it when an
/// authentication job succeeds.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password: String,
    pub application_id: String,
    pub accesses: Vec<Access>,
}

impl User {
    pub fn new(id: String, username: String, password: String, application_id: String) -> Self {
        Self {
            id,
            username,
            password,
            application_id,
            accesses: Vec::new(),
        }
    }

    /// All accounts across every linked access, in link order.
    pub fn accounts(&self) -> Vec<super::access::Account> {
        self.accesses
            .iter()
            .flat_map(|access| access.accounts.iter().cloned())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCredentials {
    pub username: String,
    pub password: String,
}

/// Returned by user creation and login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserToken {
    pub id: String,
    pub token: String,
}
