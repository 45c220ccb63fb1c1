//! HTTP transport for the simulated backend.
//!
//! Only translates between requests and `BankingServer` calls: the
//! application id travels in `X-Application-Id`, the session token in
//! `X-Token`, and failures are encoded as `{"errors":[{"code": ...}]}`.

pub mod error;
pub mod handlers;

use crate::application::server::BankingServer;
use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tracing::info;

pub fn router(server: BankingServer) -> Router {
    Router::new()
        .route(
            "/v1/users",
            post(handlers::create_user).delete(handlers::delete_user),
        )
        .route("/v1/users/login", post(handlers::login))
        .route("/v1/users/logout", post(handlers::logout))
        .route("/v1/users/reset_password", post(handlers::reset_password))
        .route(
            "/v1/accesses",
            get(handlers::list_accesses).post(handlers::create_access),
        )
        .route("/v1/accesses/{id}", get(handlers::get_access))
        .route("/v1/accounts", get(handlers::list_accounts))
        .route(
            "/v1/jobs/{id}",
            get(handlers::job_status)
                .put(handlers::answer_job)
                .delete(handlers::delete_job),
        )
        .with_state(server)
}

/// Serves `server` on `listener` until the process is stopped.
pub async fn serve(listener: TcpListener, server: BankingServer) -> std::io::Result<()> {
    info!(addr = ?listener.local_addr()?, "listening");
    axum::serve(listener, router(server)).await
}
