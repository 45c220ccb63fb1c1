use banksim::application::authorization::RequestIdentity;
use banksim::application::server::BankingServer;
use banksim::domain::access::{Access, Account, ChallengeMap};
use banksim::domain::identity::UserCredentials;

pub const APP: &str = "app-x";
pub const OTHER_APP: &str = "app-y";
pub const PROVIDER: &str = "bank1";

pub fn credentials(username: &str, password: &str) -> UserCredentials {
    UserCredentials {
        username: username.to_string(),
        password: password.to_string(),
    }
}

pub fn bank1_access() -> Access {
    Access {
        id: 42,
        provider_id: PROVIDER.to_string(),
        name: "default access".to_string(),
        accounts: vec![
            Account {
                id: 1,
                name: "Girokonto".to_string(),
                number: "1111111111".to_string(),
                iban: "DE02120300000000202051".to_string(),
                supported: true,
            },
            Account {
                id: 2,
                name: "Sparkonto".to_string(),
                number: "2222222222".to_string(),
                iban: "DE02500105170137075030".to_string(),
                supported: false,
            },
        ],
    }
}

pub fn bank1_challenges() -> ChallengeMap {
    ChallengeMap::from([
        ("login".to_string(), "u1".to_string()),
        ("pin".to_string(), "1234".to_string()),
    ])
}

/// Two applications under one developer and the `bank1` provider.
pub async fn server() -> BankingServer {
    let server = BankingServer::new();
    server.register_developer("dev").await.unwrap();
    server.register_application(APP, "dev").await.unwrap();
    server.register_application(OTHER_APP, "dev").await.unwrap();
    server
        .register_access_provider(bank1_access(), bank1_challenges())
        .await
        .unwrap();
    server
}

pub async fn signed_up(server: &BankingServer, app: &str, username: &str) -> RequestIdentity {
    let token = server
        .create_user(Some(app), credentials(username, "secret"))
        .await
        .unwrap();
    RequestIdentity::new(app, token.token)
}

pub fn job_id(uri: &str) -> &str {
    uri.trim_start_matches("/jobs/")
}
