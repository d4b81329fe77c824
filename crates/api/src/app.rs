use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use persistence::cache::{CacheStrategy, MemoryCache, NoCache};
use persistence::entities::Entity;
use persistence::repositories::{
    CampaignRepository, DonationRepository, MessageRepository, ProfileRepository, Repository,
    SettingRepository,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{CacheConfig, Config};
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{campaigns, donations, health, messages, settings};
use crate::services::SettingsService;

/// Shared handler state. Every repository reads through the same cache.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<Config>,
    pub cache: Arc<dyn CacheStrategy>,
    pub settings: SettingsService,
    pub profiles: ProfileRepository,
    pub campaigns: CampaignRepository,
    pub donations: DonationRepository,
    pub messages: MessageRepository,
}

impl AppState {
    pub fn new(config: Arc<Config>, pool: SqlitePool, cache: Arc<dyn CacheStrategy>) -> Self {
        let ttl = config.cache.ttl();
        let setting_repo: SettingRepository = repository(&pool, &cache, ttl);
        let settings = SettingsService::new(setting_repo, config.settings.clone());

        Self {
            settings,
            profiles: repository(&pool, &cache, ttl),
            campaigns: repository(&pool, &cache, ttl),
            donations: repository(&pool, &cache, ttl),
            messages: repository(&pool, &cache, ttl),
            pool,
            config,
            cache,
        }
    }

    /// A repository for `E` sharing this state's pool and cache.
    pub fn repository<E: Entity>(&self) -> Repository<E> {
        repository(&self.pool, &self.cache, self.config.cache.ttl())
    }
}

fn repository<E: Entity>(
    pool: &SqlitePool,
    cache: &Arc<dyn CacheStrategy>,
    ttl: Option<Duration>,
) -> Repository<E> {
    Repository::with_cache(pool.clone(), Arc::clone(cache), ttl)
}

/// The in-memory cache when caching is enabled.
pub fn build_cache(config: &CacheConfig) -> Option<MemoryCache> {
    config.enabled.then(|| match config.ttl() {
        Some(ttl) => MemoryCache::with_default_ttl(ttl),
        None => MemoryCache::new(),
    })
}

/// Wrap an optional cache for the repositories; `None` disables caching.
pub fn cache_strategy(cache: Option<MemoryCache>) -> Arc<dyn CacheStrategy> {
    match cache {
        Some(cache) => Arc::new(cache),
        None => Arc::new(NoCache),
    }
}

pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    let cors = if config.server.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .server
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let api_routes = Router::new()
        .route("/api/v1/settings", get(settings::list_settings))
        .route(
            "/api/v1/settings/:key",
            get(settings::get_setting).put(settings::put_setting),
        )
        .route(
            "/api/v1/campaigns",
            get(campaigns::list_campaigns).post(campaigns::create_campaign),
        )
        .route(
            "/api/v1/campaigns/:id",
            get(campaigns::get_campaign)
                .put(campaigns::update_campaign)
                .delete(campaigns::delete_campaign),
        )
        .route(
            "/api/v1/campaigns/:id/status",
            put(campaigns::set_campaign_status),
        )
        .route(
            "/api/v1/campaigns/:id/donations",
            get(campaigns::list_campaign_donations),
        )
        .route("/api/v1/donations", post(donations::create_donation))
        .route("/api/v1/messages", post(messages::schedule_message))
        .route("/api/v1/messages/preview", post(messages::preview_message));

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
