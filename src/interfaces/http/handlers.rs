use crate::application::authorization::RequestIdentity;
use crate::application::server::BankingServer;
use crate::domain::access::{Access, Account};
use crate::domain::identity::{UserCredentials, UserToken};
use crate::domain::job::{ChallengeAnswer, JobReference, JobStatus};
use crate::error::{Result, ServerError};
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const APPLICATION_ID_HEADER: &str = "x-application-id";
pub const TOKEN_HEADER: &str = "x-token";

#[derive(Debug, Deserialize)]
pub struct CreateAccessRequest {
    pub provider_id: String,
    #[serde(default)]
    pub challenge_answers: Vec<ChallengeAnswer>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    #[serde(default)]
    pub challenge_answers: Vec<ChallengeAnswer>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccountPage {
    pub accounts: Vec<Account>,
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn identity(headers: &HeaderMap) -> RequestIdentity {
    RequestIdentity {
        application_id: header(headers, APPLICATION_ID_HEADER),
        token: header(headers, TOKEN_HEADER),
    }
}

fn decode<T: DeserializeOwned>(route: &str, body: &Bytes) -> Result<T> {
    debug!(route, body = %String::from_utf8_lossy(body), "read");
    serde_json::from_slice(body).map_err(|err| {
        debug!(route, error = %err, "failed to decode body");
        ServerError::General(err.to_string())
    })
}

pub async fn create_user(
    State(server): State<BankingServer>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<UserToken>)> {
    let application = server
        .authorization()
        .require_app(identity(&headers).application_id.as_deref())
        .await?;

    let credentials: UserCredentials = decode("/v1/users", &body)?;
    let token = server.create_user_in(&application, credentials).await?;
    Ok((StatusCode::CREATED, Json(token)))
}

pub async fn delete_user(
    State(server): State<BankingServer>,
    headers: HeaderMap,
) -> Result<StatusCode> {
    server.delete_user(&identity(&headers)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn login(
    State(server): State<BankingServer>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<UserToken>> {
    let application = server
        .authorization()
        .require_app(identity(&headers).application_id.as_deref())
        .await?;

    let credentials: UserCredentials = decode("/v1/users/login", &body)?;
    Ok(Json(server.login_in(&application, credentials).await?))
}

pub async fn logout(
    State(server): State<BankingServer>,
    headers: HeaderMap,
) -> Result<StatusCode> {
    server.logout(&identity(&headers)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reset_password(
    State(server): State<BankingServer>,
    headers: HeaderMap,
) -> Result<StatusCode> {
    server
        .reset_password(identity(&headers).application_id.as_deref())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_access(
    State(server): State<BankingServer>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<JobReference>)> {
    let context = server.authorization().require_user(&identity(&headers)).await?;

    let request: CreateAccessRequest = decode("/v1/accesses", &body)?;
    let job = server
        .create_job_for(&context, &request.provider_id, request.challenge_answers)
        .await?;
    Ok((StatusCode::ACCEPTED, Json(job)))
}

pub async fn list_accesses(
    State(server): State<BankingServer>,
    headers: HeaderMap,
) -> Result<Json<Vec<Access>>> {
    Ok(Json(server.list_accesses(&identity(&headers)).await?))
}

pub async fn get_access(
    State(server): State<BankingServer>,
    headers: HeaderMap,
    Path(access_id): Path<String>,
) -> Result<Json<Access>> {
    let context = server.authorization().require_user(&identity(&headers)).await?;

    let access_id: i64 = access_id
        .parse()
        .map_err(|_| ServerError::ResourceNotFound)?;
    Ok(Json(server.get_access_for(&context, access_id)?))
}

pub async fn list_accounts(
    State(server): State<BankingServer>,
    headers: HeaderMap,
) -> Result<Json<AccountPage>> {
    let accounts = server.list_accounts(&identity(&headers)).await?;
    Ok(Json(AccountPage { accounts }))
}

pub async fn job_status(
    State(server): State<BankingServer>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> Result<Json<JobStatus>> {
    Ok(Json(server.job_status(&identity(&headers), &job_id).await?))
}

pub async fn answer_job(
    State(server): State<BankingServer>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
    body: Bytes,
) -> Result<Json<JobStatus>> {
    let (_, job) = server
        .authorization()
        .require_job(&identity(&headers), &job_id)
        .await?;

    let request: AnswerRequest = decode("/v1/jobs", &body)?;
    let status = server
        .submit_answers_to(&job, request.challenge_answers)
        .await?;
    Ok(Json(status))
}

pub async fn delete_job(
    State(server): State<BankingServer>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> Result<StatusCode> {
    server.delete_job(&identity(&headers), &job_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_identity_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-application-id", HeaderValue::from_static("app"));
        headers.insert("x-token", HeaderValue::from_static("00000002"));

        let identity = identity(&headers);
        assert_eq!(identity, RequestIdentity::new("app", "00000002"));
        assert_eq!(super::identity(&HeaderMap::new()), RequestIdentity::default());
    }

    #[test]
    fn test_decode_reports_general() {
        let result: Result<AnswerRequest> = decode("/v1/jobs", &Bytes::from_static(b"{not json"));
        assert!(matches!(result, Err(ServerError::General(_))));

        let empty: AnswerRequest = decode("/v1/jobs", &Bytes::from_static(b"{}")).unwrap();
        assert!(empty.challenge_answers.is_empty());
    }
}
