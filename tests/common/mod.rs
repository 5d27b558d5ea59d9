#![allow(dead_code)]

use axum_test::TestServer;
use shorty::domain::write_back::WriteBackPolicy;
use shorty::prelude::{AppState, MemoryCache, MemoryUrlRepository, ServiceSettings};
use shorty::routes::router;
use shorty::utils::code_generator::{AlphanumericGenerator, CodeGenerator};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub const BASE_URL: &str = "http://s.test";

/// Hands out preset codes in order, then falls back to random ones.
pub struct SequenceGenerator {
    codes: Mutex<VecDeque<String>>,
    fallback: AlphanumericGenerator,
}

impl SequenceGenerator {
    pub fn new(codes: &[&str]) -> Self {
        Self {
            codes: Mutex::new(codes.iter().map(|c| c.to_string()).collect()),
            fallback: AlphanumericGenerator::default(),
        }
    }
}

impl CodeGenerator for SequenceGenerator {
    fn generate(&self) -> String {
        self.codes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.generate())
    }
}

/// Router over in-memory stores, with direct handles on both stores.
pub struct TestApp {
    pub server: TestServer,
    pub repository: Arc<MemoryUrlRepository>,
    pub cache: Arc<MemoryCache>,
}

pub fn test_settings() -> ServiceSettings {
    ServiceSettings {
        base_url: BASE_URL.to_string(),
        ..ServiceSettings::default()
    }
}

pub fn spawn_app(codes: &[&str]) -> TestApp {
    spawn_app_with(codes, test_settings())
}

pub fn spawn_app_without_seeding(codes: &[&str]) -> TestApp {
    let settings = ServiceSettings {
        write_back: WriteBackPolicy::new(10, false),
        ..test_settings()
    };
    spawn_app_with(codes, settings)
}

pub fn spawn_app_with(codes: &[&str], settings: ServiceSettings) -> TestApp {
    let repository = Arc::new(MemoryUrlRepository::new());
    let cache = Arc::new(MemoryCache::new());

    let state = AppState::with_generator(
        repository.clone(),
        cache.clone(),
        Arc::new(SequenceGenerator::new(codes)),
        settings,
    );

    TestApp {
        server: TestServer::new(router(state)).unwrap(),
        repository,
        cache,
    }
}

impl TestApp {
    pub async fn shorten(&self, long_url: &str) -> serde_json::Value {
        let response = self
            .server
            .post("/api/shorten")
            .json(&serde_json::json!({ "longUrl": long_url }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<serde_json::Value>()
    }

    pub async fn visit(&self, code: &str, times: usize) {
        for _ in 0..times {
            let response = self.server.get(&format!("/{code}")).await;
            response.assert_status(axum::http::StatusCode::FOUND);
        }
    }

    pub async fn clicks(&self, code: &str) -> i64 {
        let response = self.server.get(&format!("/api/stats/{code}")).await;
        response.assert_status_ok();
        response.json::<serde_json::Value>()["clicks"]
            .as_i64()
            .unwrap()
    }
}
