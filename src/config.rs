use crate::domain::access::{Access, Account, ChallengeMap};
use clap::Parser;
use std::net::SocketAddr;

/// Runtime configuration for the simulated banking backend.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    #[arg(long, env = "BANKSIM_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Start with empty tables instead of the default fixture
    #[arg(long, env = "BANKSIM_NO_DEFAULTS")]
    pub no_defaults: bool,

    /// Tracing filter used when RUST_LOG is not set
    #[arg(long, env = "BANKSIM_LOG", default_value = "info")]
    pub log_filter: String,
}

/// Records seeded into a server created with defaults.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub developer_id: String,
    pub application_id: String,
    pub username: String,
    pub password: String,
    pub access: Access,
    pub challenge_map: ChallengeMap,
}

pub const DEFAULT_DEVELOPER_ID: &str = "default-developer";
pub const DEFAULT_APPLICATION_ID: &str = "default-application";
pub const DEFAULT_USERNAME: &str = "default-user";
pub const DEFAULT_PASSWORD: &str = "default-password";
pub const DEFAULT_PROVIDER_ID: &str = "default-provider";
pub const DEFAULT_ACCESS_LOGIN: &str = "default-login";
pub const DEFAULT_ACCESS_PIN: &str = "default-pin";
pub const DEFAULT_ACCESS_NAME: &str = "default access";

impl Default for Fixture {
    fn default() -> Self {
        Self {
            developer_id: DEFAULT_DEVELOPER_ID.to_string(),
            application_id: DEFAULT_APPLICATION_ID.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            access: Access {
                id: 1,
                provider_id: DEFAULT_PROVIDER_ID.to_string(),
                name: DEFAULT_ACCESS_NAME.to_string(),
                accounts: vec![Account {
                    id: 1,
                    name: "Girokonto".to_string(),
                    number: "1234567890".to_string(),
                    iban: "DE89370400440532013000".to_string(),
                    supported: true,
                }],
            },
            challenge_map: ChallengeMap::from([
                ("login".to_string(), DEFAULT_ACCESS_LOGIN.to_string()),
                ("pin".to_string(), DEFAULT_ACCESS_PIN.to_string()),
            ]),
        }
    }
}
