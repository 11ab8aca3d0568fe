use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;

use crate::{
    api::{ApiClient, BearerToken},
    model::{RecordId, User},
    session::Session,
};

/// Serve `router` on an ephemeral loopback port and return its base URL,
/// e.g. "http://127.0.0.1:49152".
///
/// The server runs until the test's runtime shuts down.
pub(crate) async fn spawn_mock_api(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Could not bind mock API listener");
    let address = listener
        .local_addr()
        .expect("Could not get mock API address");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Mock API server failed");
    });

    format!("http://{address}")
}

/// A client for the mock API at `base_url`.
pub(crate) fn mock_api_client(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, Duration::from_secs(5)).expect("Could not create API client")
}

/// The session the auth middleware would build for a signed-in user.
pub(crate) fn signed_in_session() -> Session {
    Session::Authenticated {
        token: BearerToken::new("good"),
        user: User {
            id: RecordId::new("u1"),
            full_name: "Asha Rao".to_owned(),
            email: "asha@example.com".to_owned(),
            profile_image_url: None,
        },
    }
}
