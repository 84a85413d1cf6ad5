//! Shared fixtures for the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use axum_test::TestServer;
use chrono::{TimeZone, Utc};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use botlist_api::{
    config::{AssetsConfig, DatabaseConfig, WebhookConfig, WidgetConfig},
    database::{
        Database,
        repositories::{BotSeaOrmRepository, UserSeaOrmRepository},
    },
    errors::{WidgetError, WidgetResult},
    models::{BotRecord, UserSummary},
    services::WebhookClient,
    web::{AppState, create_router},
    widget::{AvatarSource, EncodedImage, StyleRegistry, WidgetAssets, WidgetService},
};

pub const AVATAR_PNG: &[u8] = include_bytes!("../../assets/images/logo.png");

/// Avatar source that never leaves the process
#[derive(Default)]
pub struct StubAvatar {
    pub calls: AtomicUsize,
    pub delay: Duration,
    pub fail: bool,
}

impl StubAvatar {
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AvatarSource for StubAvatar {
    async fn fetch(&self, bot: &BotRecord) -> WidgetResult<EncodedImage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(WidgetError::upstream_fetch(
                format!("stub://avatars/{}", bot.id),
                "HTTP 503 Service Unavailable",
            ));
        }
        Ok(EncodedImage::from_bytes("image/png", AVATAR_PNG))
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub database: Database,
    pub bots: BotSeaOrmRepository,
    pub users: UserSeaOrmRepository,
    pub avatars: Arc<StubAvatar>,
    pub widgets: Arc<WidgetService>,
}

pub fn repo_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

pub fn repo_assets_config() -> AssetsConfig {
    AssetsConfig {
        bold_font: repo_path("assets/fonts/bold.ttf"),
        regular_font: repo_path("assets/fonts/regular.ttf"),
        background: repo_path("assets/images/background.svg"),
        dark_background: repo_path("assets/images/background-dark.svg"),
        inverted_background: repo_path("assets/images/background-inverted.svg"),
        logo: repo_path("assets/images/logo.png"),
    }
}

pub async fn test_database() -> Database {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: Some(1),
    };
    let database = Database::new(&config).await.unwrap();
    database.migrate().await.unwrap();
    database
}

pub fn bot(id: &str, username: &str) -> BotRecord {
    let created = Utc.with_ymd_and_hms(2018, 3, 1, 12, 0, 0).unwrap();
    BotRecord {
        id: id.to_string(),
        username: username.to_string(),
        discriminator: "0001".to_string(),
        avatar: Some("abcdef".to_string()),
        approved: true,
        avatar_child_friendly: true,
        certified: false,
        short_description: format!("{username} keeps your server tidy."),
        full_description: format!("# {username}\n\nA longer description."),
        library: None,
        links: serde_json::json!({ "invite": null, "website": null }),
        prefix: "!".to_string(),
        tags: vec![],
        shards: None,
        server_count: None,
        owners: vec![],
        upvotes: vec![],
        vanity: None,
        created_at: created,
        updated_at: created,
    }
}

pub fn user(id: &str, username: &str) -> UserSummary {
    UserSummary {
        id: id.to_string(),
        username: username.to_string(),
        discriminator: "1234".to_string(),
        avatar: None,
        short_description: None,
    }
}

pub async fn spawn_app(avatars: StubAvatar) -> TestApp {
    spawn_app_with(avatars, WidgetConfig::default()).await
}

pub async fn spawn_app_with(avatars: StubAvatar, widget_config: WidgetConfig) -> TestApp {
    let webhooks = WebhookClient::new(&WebhookConfig::default()).unwrap();
    build_app(avatars, widget_config, webhooks).await
}

pub async fn spawn_app_with_webhooks(webhooks: WebhookClient) -> TestApp {
    build_app(StubAvatar::default(), WidgetConfig::default(), webhooks).await
}

async fn build_app(
    avatars: StubAvatar,
    widget_config: WidgetConfig,
    webhooks: WebhookClient,
) -> TestApp {
    let database = test_database().await;
    let avatars = Arc::new(avatars);
    let assets = WidgetAssets::load(&repo_assets_config()).unwrap();

    let widgets = Arc::new(WidgetService::new(
        BotSeaOrmRepository::new(database.connection()),
        avatars.clone(),
        assets,
        StyleRegistry::default(),
        &widget_config,
    ));

    let state = AppState::new(database.clone(), widgets.clone(), webhooks);
    let server = TestServer::new(create_router(state.clone())).unwrap();

    TestApp {
        server,
        bots: state.bots,
        users: state.users,
        database,
        avatars,
        widgets,
    }
}

/// Host name the receiver client resolves to the local receiver; loopback
/// names are refused by the webhook endpoint itself
pub const RECEIVER_HOST: &str = "hooks.test";

/// One request seen by a [`WebhookReceiver`]
#[derive(Debug, Clone)]
pub struct Delivery {
    pub user_agent: Option<String>,
    pub authorization: Option<String>,
    pub body: serde_json::Value,
}

/// Local HTTP endpoint recording every webhook it receives
#[derive(Clone)]
pub struct WebhookReceiver {
    pub addr: SocketAddr,
    status: StatusCode,
    deliveries: Arc<Mutex<Vec<Delivery>>>,
}

impl WebhookReceiver {
    pub async fn spawn(status: StatusCode) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let receiver = Self {
            addr: listener.local_addr().unwrap(),
            status,
            deliveries: Arc::default(),
        };

        let app = Router::new()
            .route("/upvote", post(receive))
            .with_state(receiver.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        receiver
    }

    /// URL of the receiver as a caller would submit it
    pub fn url(&self) -> String {
        format!("http://{}:{}/upvote", RECEIVER_HOST, self.addr.port())
    }

    /// Client that reaches this receiver through [`RECEIVER_HOST`]
    pub fn client(&self) -> WebhookClient {
        let client = reqwest::Client::builder()
            .no_proxy()
            .resolve(RECEIVER_HOST, self.addr)
            .build()
            .unwrap();
        WebhookClient::with_client(client, &WebhookConfig::default())
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().unwrap().clone()
    }
}

async fn receive(
    State(receiver): State<WebhookReceiver>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> StatusCode {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    receiver.deliveries.lock().unwrap().push(Delivery {
        user_agent: header("user-agent"),
        authorization: header("authorization"),
        body,
    });
    receiver.status
}
