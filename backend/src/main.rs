//! EekoAI Agricultural InsightEngine - Backend Server
//!
//! Turns hourly weather for a field into plain-language advice, and fronts
//! the farming chatbot and the weed/insect photo analyzers.

use axum::{routing::get, Router};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod error;
mod external;
mod handlers;
mod routes;
mod services;

pub use config::Config;

use external::{GroqClient, NasaPowerClient};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub weather: NasaPowerClient,
    /// `None` when no inference API key is configured
    pub inference: Option<GroqClient>,
}

impl AppState {
    fn from_config(config: Config) -> anyhow::Result<Self> {
        let weather = NasaPowerClient::new(&config.nasa_power)?;
        let inference = if config.groq.is_configured() {
            Some(GroqClient::new(&config.groq)?)
        } else {
            None
        };

        Ok(Self {
            config: Arc::new(config),
            weather,
            inference,
        })
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "eeko_server=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    init_tracing(&config);

    tracing::info!("Starting EekoAI InsightEngine server");
    tracing::info!("Environment: {}", config.environment);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let state = AppState::from_config(config)?;
    match &state.inference {
        Some(client) => tracing::info!("Inference enabled with model {}", client.model()),
        None => tracing::warn!("No inference API key configured; chat and detection are disabled"),
    }

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "EekoAI Agricultural InsightEngine API v1.0"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_app() -> Router {
        let state = AppState {
            config: Arc::new(Config::default()),
            weather: NasaPowerClient::with_base_url("http://127.0.0.1:9".to_string()),
            inference: None,
        };
        create_app(state)
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = test_app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_inference_state() {
        for uri in ["/health", "/api/v1/health"] {
            let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
            let (status, body) = send(request).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["status"], "healthy");
            assert_eq!(body["inference_configured"], false);
        }
    }

    #[tokio::test]
    async fn test_analyze_posted_bundle() {
        let bundle = json!({
            "T2M": {"2024010100": 300.15, "2024010101": 300.15},
            "PRECTOTCORR": {"2024010100": 0.0, "2024010101": -999.0},
            "WS2M": {"2024010100": 12.0, "2024010101": 14.0},
            "RH2M": {"2024010100": 80.0, "2024010101": 90.0},
            "ALLSKY_SFC_SW_DWN": {"2024010100": 700.0, "2024010101": 900.0}
        });

        let (status, body) = send(post_json("/api/v1/weather/insights", bundle)).await;

        assert_eq!(status, StatusCode::OK);
        let labels: Vec<&str> = body["insights"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["insight"].as_str().unwrap())
            .collect();
        assert_eq!(
            labels,
            vec!["Warm conditions", "High", "High humidity", "High solar radiation"]
        );
        assert_eq!(body["unavailable"][0]["param"], "precipitation");
        assert_eq!(body["data_unavailable"], false);
    }

    #[tokio::test]
    async fn test_malformed_bundle_is_unprocessable() {
        let bundle = json!({"T2M": {"2024010100": "hot"}});
        let (status, body) = send(post_json("/api/v1/weather/insights", bundle)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "INPUT_SHAPE_ERROR");
    }

    #[tokio::test]
    async fn test_out_of_range_location_rejected() {
        let request = Request::builder()
            .uri("/api/v1/weather/insights?latitude=91&longitude=0&preset=week")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_inference_routes_require_api_key() {
        let chat = json!({"messages": [{"role": "user", "content": {"type": "text", "text": "Hi"}}]});
        let (status, body) = send(post_json("/api/v1/chat", chat)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "INFERENCE_NOT_CONFIGURED");

        for uri in ["/api/v1/detect/weed", "/api/v1/detect/insect"] {
            let (status, _) = send(post_json(uri, json!({"image": "QUJD"}))).await;
            assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        }
    }
}
