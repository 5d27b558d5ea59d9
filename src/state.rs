//! Shared application state handed to every handler.

use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

use crate::application::services::{RedirectService, ShortenService, StatsService};
use crate::domain::repositories::UrlRepository;
use crate::domain::write_back::WriteBackPolicy;
use crate::infrastructure::cache::ClickCache;
use crate::utils::code_generator::{AlphanumericGenerator, CodeGenerator, DEFAULT_CODE_LENGTH};
use crate::utils::short_url::build_short_url;

/// Tunables for the services, usually derived from [`crate::config::Config`].
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: String,
    pub code_length: usize,
    pub code_max_attempts: usize,
    pub write_back: WriteBackPolicy,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            code_length: DEFAULT_CODE_LENGTH,
            code_max_attempts: crate::application::services::shorten_service::DEFAULT_MAX_ATTEMPTS,
            write_back: WriteBackPolicy::default(),
        }
    }
}

/// Services and store handles shared across requests.
///
/// The stores are injected, never global: the same state can be built over
/// PostgreSQL + Redis in production or over in-memory stores in tests.
#[derive(Clone)]
pub struct AppState {
    pub shorten_service: Arc<ShortenService>,
    pub redirect_service: Arc<RedirectService>,
    pub stats_service: Arc<StatsService>,
    pub repository: Arc<dyn UrlRepository>,
    pub cache: Arc<dyn ClickCache>,
    pub base_url: Arc<str>,
    /// Renders the Prometheus exposition for `GET /metrics`; `None` when
    /// metrics are disabled.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Builds the state with the random alphanumeric code generator.
    pub fn new(
        repository: Arc<dyn UrlRepository>,
        cache: Arc<dyn ClickCache>,
        settings: ServiceSettings,
    ) -> Self {
        let generator = Arc::new(AlphanumericGenerator::new(settings.code_length));
        Self::with_generator(repository, cache, generator, settings)
    }

    /// Builds the state with a caller-supplied code generator.
    pub fn with_generator(
        repository: Arc<dyn UrlRepository>,
        cache: Arc<dyn ClickCache>,
        generator: Arc<dyn CodeGenerator>,
        settings: ServiceSettings,
    ) -> Self {
        let shorten_service = ShortenService::new(
            repository.clone(),
            cache.clone(),
            generator,
            settings.code_max_attempts,
        );
        let redirect_service =
            RedirectService::new(repository.clone(), cache.clone(), settings.write_back);
        let stats_service = StatsService::new(repository.clone(), cache.clone());

        Self {
            shorten_service: Arc::new(shorten_service),
            redirect_service: Arc::new(redirect_service),
            stats_service: Arc::new(stats_service),
            repository,
            cache,
            base_url: Arc::from(settings.base_url.trim_end_matches('/')),
            metrics: None,
        }
    }

    /// Exposes the installed metrics recorder on `GET /metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Public short URL of `code`.
    pub fn short_url(&self, code: &str) -> String {
        build_short_url(&self.base_url, code)
    }
}
