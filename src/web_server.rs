use anyhow::{Context, Result};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse},
    routing::{get, post},
    serve, Json, Router,
};
use chrono::{Datelike, Local};
use minijinja::{path_loader, Environment};
use minijinja_autoreload::AutoReloader;
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info};

use crate::chat::ChatService;
use crate::config::ServerConfig;
use crate::conversation_log::Channel;
use crate::error::ApiError;
use crate::rate_limit::{rate_limit_middleware, RateLimiter};

// Shared application state
#[derive(Clone)]
pub struct AppState {
    templates: Arc<AutoReloader>,
    chat: Arc<ChatService>,
}

impl AppState {
    pub fn new(chat: Arc<ChatService>, template_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates: Arc::new(create_minijinja_env(template_dir.into())),
            chat,
        }
    }
}

/// Limits applied in front of the handlers.
#[derive(Clone)]
pub struct RateLimits {
    /// Shared by `/chat` and `/process_voice`.
    pub chat: Arc<RateLimiter>,
    /// Every route, including the page and static files.
    pub global: Arc<RateLimiter>,
}

impl RateLimits {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            chat: Arc::new(
                RateLimiter::per_minute(config.chat_limit_per_minute)
                    .trust_forwarded_for(config.trust_forwarded_for),
            ),
            global: Arc::new(
                RateLimiter::per_hour(config.limit_per_hour)
                    .trust_forwarded_for(config.trust_forwarded_for),
            ),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Deserialize)]
pub struct VoiceRequest {
    #[serde(default)]
    pub voice_input: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VoiceResponse {
    pub processed_text: String,
}

// Minijinja Environment setup
fn create_minijinja_env(template_dir: PathBuf) -> AutoReloader {
    // Use AutoReloader so template edits show up without a restart
    AutoReloader::new(move |notifier| {
        let mut env = Environment::new();
        env.set_loader(path_loader(&template_dir));
        notifier.watch_path(&template_dir, true);
        Ok(env)
    })
}

async fn index_handler(State(state): State<AppState>) -> Result<Html<String>, (StatusCode, Html<String>)> {
    state
        .templates
        .acquire_env()
        .and_then(|env| {
            env.get_template("index.html").and_then(|tmpl| {
                let context = minijinja::context! {
                    title => "AI pamoka / Урок ИИ / AI lesson",
                    year => Local::now().year(),
                };
                tmpl.render(context)
            })
        })
        .map(Html)
        .map_err(|e| {
            error!("Failed to get or render template: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("Internal Server Error".to_string()),
            )
        })
}

async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    // `null` and a missing field count as empty.
    let message = request.message.unwrap_or_default();
    if message.trim().is_empty() {
        return Err(ApiError::empty_message());
    }

    let reply = state.chat.handle(Channel::Text, &message).await?;
    Ok(Json(ChatResponse { reply: reply.text }))
}

async fn process_voice_handler(
    State(state): State<AppState>,
    payload: Result<Json<VoiceRequest>, JsonRejection>,
) -> Result<Json<VoiceResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    let voice_input = request.voice_input.unwrap_or_default();
    if voice_input.trim().is_empty() {
        return Err(ApiError::empty_voice_input());
    }

    let reply = state.chat.handle(Channel::Voice, &voice_input).await?;
    Ok(Json(VoiceResponse {
        processed_text: reply.text,
    }))
}

/// Builds the application router. `static_dir` is served under `/static`.
pub fn build_router(state: AppState, limits: RateLimits, static_dir: impl Into<PathBuf>) -> Router {
    let static_files_service = ServeDir::new(static_dir.into()).not_found_service(
        tower::service_fn(|_req: axum::extract::Request| async {
            Ok::<_, std::convert::Infallible>((StatusCode::NOT_FOUND, "Not Found").into_response())
        }),
    );

    let chat_routes = Router::new()
        .route("/chat", post(chat_handler))
        .route("/process_voice", post(process_voice_handler))
        .route_layer(middleware::from_fn_with_state(
            limits.chat,
            rate_limit_middleware,
        ));

    Router::new()
        .route("/", get(index_handler))
        .merge(chat_routes)
        // Route for static files must be nested under a path like /static
        // or it will conflict with other routes.
        .nest_service("/static", static_files_service)
        .with_state(state)
        .layer(middleware::from_fn_with_state(
            limits.global,
            rate_limit_middleware,
        ))
        .layer(TraceLayer::new_for_http()) // Add request logging
}

pub async fn start_web_server(config: &ServerConfig, state: AppState) -> Result<()> {
    let app = build_router(state, RateLimits::from_config(config), "static");

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.host, config.port))?;
    info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind to address {}", addr))?;

    serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Web server failed")?;

    info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {:?}", e);
        return;
    }
    info!("Ctrl-C received, initiating shutdown...");
}
