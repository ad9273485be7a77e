//! Shared harness: a full server on an ephemeral port over the in-memory
//! store.

#![allow(dead_code, clippy::panic)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use vidshare_gateway::api;
use vidshare_gateway::app_state::{AppState, WsSettings};
use vidshare_gateway::auth::{ExternalProfile, IdentityProvider, TokenService};
use vidshare_gateway::domain::{BroadcastHub, NewUser, UserId};
use vidshare_gateway::error::ShareError;
use vidshare_gateway::persistence::{InMemoryStore, UserRepository};
use vidshare_gateway::service::{UserService, VideoService};

pub const SECRET: &[u8] = b"integration-test-secret-key-0123456789";

/// Identity provider that accepts the code `"ok"` for Carol.
#[derive(Debug)]
pub struct StaticIdentity;

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn exchange(
        &self,
        code: &str,
        _redirect_url: &str,
    ) -> Result<ExternalProfile, ShareError> {
        if code != "ok" {
            return Err(ShareError::IdentityProvider("invalid_grant".into()));
        }
        Ok(ExternalProfile {
            name: "Carol".to_string(),
            email: "carol@example.com".to_string(),
            picture: "https://img.example.com/carol.png".to_string(),
        })
    }
}

#[derive(Debug)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub hub: BroadcastHub,
    pub tokens: Arc<TokenService>,
    pub store: Arc<InMemoryStore>,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn http(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// A valid bearer token for an existing user.
    pub async fn token_for(&self, id: u64) -> String {
        let Ok(Some(user)) = UserRepository::get(self.store.as_ref(), UserId::new(id)).await else {
            panic!("user {id} should exist");
        };
        let Ok(token) = self.tokens.issue(&user) else {
            panic!("token issue failed");
        };
        token
    }

    /// Waits until the registry holds `expected` entries.
    pub async fn wait_for_subscribers(&self, expected: usize) {
        for _ in 0..200 {
            if self.hub.subscriber_count().await == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "registry has {} subscribers, expected {expected}",
            self.hub.subscriber_count().await
        );
    }
}

/// Starts a server with users 1 (ada) and 2 (bob) already registered.
pub async fn spawn_server() -> TestServer {
    spawn_server_with(WsSettings {
        auth_timeout: Duration::from_secs(2),
        outbox_capacity: 32,
    })
    .await
}

pub async fn spawn_server_with(ws: WsSettings) -> TestServer {
    let store = Arc::new(InMemoryStore::new());
    for (name, email) in [("Ada", "ada@example.com"), ("Bob", "bob@example.com")] {
        let created = UserRepository::create(
            store.as_ref(),
            NewUser {
                name: name.to_string(),
                email: email.to_string(),
            },
        )
        .await;
        assert!(created.is_ok());
    }

    let (hub, intake) = BroadcastHub::new(100);
    tokio::spawn(intake.run());

    let tokens = Arc::new(TokenService::new(SECRET, Duration::from_secs(3600)));
    let video_service = Arc::new(VideoService::new(
        Arc::clone(&store) as Arc<dyn vidshare_gateway::persistence::VideoRepository>,
        Arc::clone(&store) as Arc<dyn UserRepository>,
        hub.clone(),
    ));
    let user_service = Arc::new(UserService::new(
        Arc::clone(&store) as Arc<dyn UserRepository>,
        Arc::new(StaticIdentity),
        Arc::clone(&tokens),
    ));

    let state = AppState {
        video_service,
        user_service,
        hub: hub.clone(),
        tokens: Arc::clone(&tokens),
        ws,
    };
    let app = api::build_app(state, api::cors_layer(None));

    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };
    tokio::spawn(async move {
        let _ = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await;
    });

    TestServer {
        addr,
        hub,
        tokens,
        store,
        client: reqwest::Client::new(),
    }
}
