/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use shift_api::app::{build_router, AppState};
/// use shift_api::config::Config;
/// use shift_shared::store::MemoryStore;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::from_config(Arc::new(MemoryStore::new()), config)?;
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post, put},
    Router,
};
use shift_assistant::generators::{HttpGeneratorConfig, HttpTextGenerator};
use shift_assistant::ShiftSuggester;
use shift_shared::auth::middleware::authenticate;
use shift_shared::store::DocumentStore;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

/// Shared application state, cloned into every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub config: Arc<Config>,

    /// `None` when no generator is configured
    pub suggester: Option<Arc<ShiftSuggester>>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
            suggester: None,
        }
    }

    /// Builds state and, when an API key is set, the HTTP suggestion generator
    pub fn from_config(store: Arc<dyn DocumentStore>, config: Config) -> anyhow::Result<Self> {
        let suggestions = &config.suggestions;

        let suggester = match &suggestions.api_key {
            Some(api_key) if suggestions.is_configured() => {
                let generator = HttpTextGenerator::new(HttpGeneratorConfig {
                    base_url: suggestions.base_url.clone(),
                    model: suggestions.model.clone(),
                    api_key: api_key.clone(),
                    request_timeout: suggestions.timeout(),
                })?;
                info!(model = %suggestions.model, "AI suggestions enabled");
                Some(ShiftSuggester::new(Arc::new(generator)).with_timeout(suggestions.timeout()))
            }
            _ => {
                info!("AI suggestions disabled, no API key configured");
                None
            }
        };

        let mut state = Self::new(store, config);
        state.suggester = suggester.map(Arc::new);
        Ok(state)
    }

    pub fn with_suggester(mut self, suggester: ShiftSuggester) -> Self {
        self.suggester = Some(Arc::new(suggester));
        self
    }

    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── /health                       # public
/// └── /v1/
///     ├── /auth/                    # public
///     │   ├── POST /signup
///     │   ├── POST /login
///     │   └── POST /refresh
///     ├── GET  /me
///     ├── /employees                GET, POST
///     │   └── /:id                  PUT, DELETE
///     ├── /locations                GET, POST
///     │   └── /:id                  PUT, DELETE
///     ├── /time-off                 GET
///     │   ├── /pending              GET
///     │   └── /balances             GET
///     ├── GET  /swaps
///     ├── GET  /schedule
///     ├── GET  /live/:collection    # SSE
///     └── POST /suggestions
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/signup", post(routes::auth::signup))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    let protected_routes = Router::new()
        .route("/me", get(routes::me::me))
        .route(
            "/employees",
            get(routes::employees::list_employees).post(routes::employees::create_employee),
        )
        .route(
            "/employees/:id",
            put(routes::employees::update_employee).delete(routes::employees::delete_employee),
        )
        .route(
            "/locations",
            get(routes::locations::list_locations).post(routes::locations::create_location),
        )
        .route(
            "/locations/:id",
            put(routes::locations::update_location).delete(routes::locations::delete_location),
        )
        .route("/time-off", get(routes::time_off::list_requests))
        .route("/time-off/pending", get(routes::time_off::pending))
        .route("/time-off/balances", get(routes::time_off::balances))
        .route("/swaps", get(routes::swaps::swap_board))
        .route("/schedule", get(routes::schedule::schedule))
        .route("/live/:collection", get(routes::live::live_collection))
        .route("/suggestions", post(routes::suggestions::suggest_shifts))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(protected_routes);

    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// Validates the bearer token and stores the `AuthContext` in the request
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth = authenticate(req.headers(), state.jwt_secret())?;
    req.extensions_mut().insert(auth);

    Ok(next.run(req).await)
}
