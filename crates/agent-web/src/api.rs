//! API Client
//!
//! Talks to the server the page was loaded from. Requests race a browser
//! timer so a stalled backend surfaces as an in-band message.

use std::future::Future;

use async_trait::async_trait;
use futures::future::{select, Either};

use agent_core::{
    chat::{ChatReply, ChatRequest},
    session::{ChatBackend, TransportError},
    Catalog,
};

/// Chat requests give up after this long
const CHAT_TIMEOUT_MS: i32 = 30_000;

/// Health probe gives up after this long
const HEALTH_TIMEOUT_MS: i32 = 5_000;

const FALLBACK_ORIGIN: &str = "http://127.0.0.1:9999";

/// Absolute URL for a backend path
fn endpoint(path: &str) -> String {
    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_else(|| FALLBACK_ORIGIN.into());
    format!("{origin}{path}")
}

/// Resolve after `ms` milliseconds on the browser event loop
async fn sleep(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms);
        }
    });
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}

/// `None` when the timer wins
async fn with_timeout<F: Future>(future: F, ms: i32) -> Option<F::Output> {
    let future = std::pin::pin!(future);
    let timer = std::pin::pin!(sleep(ms));
    match select(future, timer).await {
        Either::Left((output, _)) => Some(output),
        Either::Right(_) => None,
    }
}

/// `POST /chat` over reqwest's fetch backend
#[derive(Clone, Default)]
pub struct HttpBackend {
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new() -> Self {
        Self::default()
    }

    async fn post_chat(&self, request: &ChatRequest) -> Result<ChatReply, TransportError> {
        let response = self
            .client
            .post(endpoint("/chat"))
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Failed(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(TransportError::Status(status));
        }

        response
            .json::<ChatReply>()
            .await
            .map_err(|e| TransportError::Failed(e.to_string()))
    }
}

#[async_trait(?Send)]
impl ChatBackend for HttpBackend {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, TransportError> {
        with_timeout(self.post_chat(request), CHAT_TIMEOUT_MS)
            .await
            .unwrap_or_else(|| Err(TransportError::Failed("request timed out after 30s".into())))
    }
}

/// Whether `GET /health` answers 200 within five seconds
pub async fn check_health() -> bool {
    let probe = async {
        reqwest::Client::new()
            .get(endpoint("/health"))
            .send()
            .await
            .map(|r| r.status().as_u16() == 200)
            .unwrap_or(false)
    };
    with_timeout(probe, HEALTH_TIMEOUT_MS).await.unwrap_or(false)
}

/// The server's catalog, restricted to the providers it can serve
pub async fn fetch_catalog() -> Option<Catalog> {
    let fetch = async {
        let response = reqwest::Client::new().get(endpoint("/api/catalog")).send().await.ok()?;
        if response.status().as_u16() != 200 {
            return None;
        }
        response.json::<Catalog>().await.ok()
    };
    with_timeout(fetch, HEALTH_TIMEOUT_MS).await.flatten()
}
