use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single bank account exposed through an access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub number: String,
    pub iban: String,
    pub supported: bool,
}

/// A linked group of accounts at one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Access {
    pub id: i64,
    pub provider_id: String,
    pub name: String,
    #[serde(default)]
    pub accounts: Vec<Account>,
}

/// Challenge id to the one value that satisfies it.
pub type ChallengeMap = BTreeMap<String, String>;

/// What a provider hands out once every challenge has been answered.
///
/// Registered at setup and snapshotted into each job that targets the
/// provider, so re-registration never affects jobs already in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDetails {
    pub access: Access,
    pub challenge_map: ChallengeMap,
}

impl AccessDetails {
    pub fn new(access: Access, challenge_map: ChallengeMap) -> Self {
        Self {
            access,
            challenge_map,
        }
    }

    pub fn provider_id(&self) -> &str {
        &self.access.provider_id
    }
}
