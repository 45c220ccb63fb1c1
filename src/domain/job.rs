use super::access::{Access, AccessDetails, Account};
use crate::error::ErrorCode;
use serde::{Deserialize, Serialize};

/// A single answer to a provider challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeAnswer {
    pub id: String,
    pub value: String,
}

impl ChallengeAnswer {
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }
}

/// Progress of an authentication job.
///
/// The upstream API declares further stages (connecting, importing and so
/// on); this engine only ever produces these two.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum JobStage {
    Authenticating,
    Finished,
}

/// An access-linking attempt owned by one user.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: String,
    pub user_id: String,
    pub provider_id: String,
    pub stage: JobStage,
    pub error: Option<ErrorCode>,
    pub supplied_answers: Vec<ChallengeAnswer>,
    /// `None` only for jobs against an unknown provider.
    pub access_details: Option<AccessDetails>,
    pub succeeded: bool,
}

impl Job {
    /// Starts a job against a registered provider.
    pub fn authenticating(id: String, user_id: String, details: AccessDetails) -> Self {
        Self {
            id,
            user_id,
            provider_id: details.provider_id().to_string(),
            stage: JobStage::Authenticating,
            error: None,
            supplied_answers: Vec::new(),
            access_details: Some(details),
            succeeded: false,
        }
    }

    /// A job that is already over because nothing is registered under `provider_id`.
    pub fn unknown_provider(id: String, user_id: String, provider_id: String) -> Self {
        Self {
            id,
            user_id,
            provider_id,
            stage: JobStage::Finished,
            error: Some(ErrorCode::UnknownProvider),
            supplied_answers: Vec::new(),
            access_details: None,
            succeeded: false,
        }
    }

    pub fn uri(&self) -> String {
        format!("/jobs/{}", self.id)
    }

    pub fn is_finished(&self) -> bool {
        self.stage == JobStage::Finished
    }

    fn is_answered(&self, id: &str, value: &str) -> bool {
        self.supplied_answers
            .iter()
            .any(|answer| answer.id == id && answer.value == value)
    }

    /// Records `answers` and finishes the job once every challenge is satisfied.
    ///
    /// Answers accumulate across calls. A finished job keeps the answers but
    /// never transitions again. Returns `true` only on the call that moves the
    /// job into a successful `Finished` state.
    pub fn advance(&mut self, answers: Vec<ChallengeAnswer>) -> bool {
        self.supplied_answers.extend(answers);

        if self.is_finished() {
            return false;
        }
        let Some(details) = &self.access_details else {
            return false;
        };
        let complete = details
            .challenge_map
            .iter()
            .all(|(id, value)| self.is_answered(id, value));
        if !complete {
            return false;
        }

        self.stage = JobStage::Finished;
        self.succeeded = true;
        true
    }

    /// The access this job links once it has succeeded.
    pub fn linked_access(&self) -> Option<&Access> {
        if !self.succeeded {
            return None;
        }
        self.access_details.as_ref().map(|details| &details.access)
    }

    pub fn status(&self) -> JobStatus {
        JobStatus {
            finished: self.is_finished(),
            stage: self.stage,
            uri: self.uri(),
            errors: self
                .error
                .iter()
                .map(|code| ApiError { code: *code })
                .collect(),
            access: self.linked_access().map(JobAccess::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
}

/// Read-only projection of a job returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatus {
    pub finished: bool,
    pub stage: JobStage,
    pub uri: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ApiError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<JobAccess>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobAccess {
    pub id: i64,
    pub provider_id: String,
    pub name: String,
    #[serde(default)]
    pub accounts: Vec<JobAccount>,
}

impl From<&Access> for JobAccess {
    fn from(access: &Access) -> Self {
        Self {
            id: access.id,
            provider_id: access.provider_id.clone(),
            name: access.name.clone(),
            accounts: access.accounts.iter().map(JobAccount::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobAccount {
    pub id: i64,
    pub name: String,
    pub number: String,
    pub iban: String,
    pub supported: bool,
}

impl From<&Account> for JobAccount {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            number: account.number.clone(),
            iban: account.iban.clone(),
            supported: account.supported,
        }
    }
}

/// Handle returned when a job is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobReference {
    pub uri: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::access::ChallengeMap;

    fn details(challenges: &[(&str, &str)]) -> AccessDetails {
        let challenge_map: ChallengeMap = challenges
            .iter()
            .map(|(id, value)| (id.to_string(), value.to_string()))
            .collect();
        AccessDetails::new(
            Access {
                id: 1,
                provider_id: "bank1".into(),
                name: "default access".into(),
                accounts: vec![Account {
                    id: 10,
                    name: "checking".into(),
                    number: "1234567890".into(),
                    iban: "DE89370400440532013000".into(),
                    supported: true,
                }],
            },
            challenge_map,
        )
    }

    #[test]
    fn test_job_without_answers_stays_authenticating() {
        let mut job = Job::authenticating("1".into(), "u".into(), details(&[("pin", "1234")]));
        assert!(!job.advance(vec![]));
        assert_eq!(job.stage, JobStage::Authenticating);
        assert!(!job.succeeded);
    }

    #[test]
    fn test_empty_challenge_map_finishes_immediately() {
        let mut job = Job::authenticating("1".into(), "u".into(), details(&[]));
        assert!(job.advance(vec![]));
        assert_eq!(job.stage, JobStage::Finished);
        assert!(job.succeeded);
    }

    #[test]
    fn test_answers_accumulate_across_calls() {
        let mut job = Job::authenticating(
            "1".into(),
            "u".into(),
            details(&[("login", "u1"), ("pin", "1234")]),
        );
        assert!(!job.advance(vec![ChallengeAnswer::new("pin", "1234")]));
        assert!(job.advance(vec![ChallengeAnswer::new("login", "u1")]));
        assert_eq!(job.supplied_answers.len(), 2);
    }

    #[test]
    fn test_matching_is_exact() {
        let mut job = Job::authenticating("1".into(), "u".into(), details(&[("login", "u1")]));
        assert!(!job.advance(vec![
            ChallengeAnswer::new("Login", "u1"),
            ChallengeAnswer::new("login", " u1"),
            ChallengeAnswer::new("login", "U1"),
        ]));
        assert_eq!(job.stage, JobStage::Authenticating);
    }

    #[test]
    fn test_finished_job_is_not_reevaluated() {
        let mut job = Job::authenticating("1".into(), "u".into(), details(&[("pin", "1234")]));
        assert!(job.advance(vec![ChallengeAnswer::new("pin", "1234")]));
        assert!(!job.advance(vec![ChallengeAnswer::new("pin", "1234")]));
        assert!(job.succeeded);
        assert_eq!(job.supplied_answers.len(), 2);
    }

    #[test]
    fn test_unknown_provider_job_never_succeeds() {
        let mut job = Job::unknown_provider("1".into(), "u".into(), "bogus".into());
        assert!(!job.advance(vec![ChallengeAnswer::new("pin", "1234")]));
        assert!(job.is_finished());
        assert!(job.linked_access().is_none());
    }

    #[test]
    fn test_status_projection() {
        let mut job = Job::authenticating("0000000a".into(), "u".into(), details(&[]));
        let pending = job.status();
        assert!(!pending.finished);
        assert!(pending.access.is_none());
        assert_eq!(pending.uri, "/jobs/0000000a");

        job.advance(vec![]);
        let done = job.status();
        assert!(done.finished);
        assert!(done.errors.is_empty());
        let access = done.access.unwrap();
        assert_eq!(access.provider_id, "bank1");
        assert_eq!(access.accounts.len(), 1);
        assert_eq!(access.accounts[0].iban, "DE89370400440532013000");
    }

    #[test]
    fn test_unknown_provider_status_has_one_error() {
        let job = Job::unknown_provider("1".into(), "u".into(), "bogus".into());
        let status = job.status();
        assert_eq!(status.errors, vec![ApiError { code: ErrorCode::UnknownProvider }]);
        assert!(status.access.is_none());

        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["stage"], "finished");
        assert_eq!(json["errors"][0]["code"], "unknown_provider");
        assert!(json.get("access").is_none());
    }
}
