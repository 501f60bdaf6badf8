//! Route handlers.
//!
//! Every mutating request redirects back to `/`, which re-renders the whole transcript.

use crate::catalog::Catalog;
use crate::chat::ChatLoop;
use crate::web::error::WebError;
use crate::web::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

/// Cookie holding the visitor session id.
pub const SESSION_COOKIE: &str = "logis_session";

/// Read the visitor's session id, issuing a new one on first visit.
fn visitor_session(jar: CookieJar) -> (CookieJar, Uuid) {
    let existing = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());
    if let Some(id) = existing {
        return (jar, id);
    }

    let id = Uuid::new_v4();
    debug!(session = %id, "New visitor session");
    let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build();
    (jar.add(cookie), id)
}

/// A visitor who has not picked anything sees the first lodging selected.
fn ensure_selection(chat: &mut ChatLoop, catalog: &Catalog) -> Result<(), WebError> {
    if chat.selected().is_none() {
        if let Some(first) = catalog.first() {
            chat.select_lodging(first.clone())?;
        }
    }
    Ok(())
}

async fn load_catalog(state: &AppState) -> crate::Result<Arc<Catalog>> {
    state.catalogs.load_async(state.catalog_path.as_path()).await
}

/// GET / - the chat page.
pub async fn index(State(state): State<AppState>, jar: CookieJar) -> Result<Response, WebError> {
    let (jar, session) = visitor_session(jar);

    let catalog = match load_catalog(&state).await {
        Ok(catalog) => catalog,
        Err(e) => {
            error!(error = %e, "Failed to load catalog");
            let page = state.pages.render_catalog_error(&e.to_string())?;
            return Ok((StatusCode::INTERNAL_SERVER_ERROR, jar, Html(page)).into_response());
        }
    };

    // Unknown visitors get a throwaway chat; a session is stored on the first post.
    let page = match state.sessions.get(session) {
        Some(chat) => {
            let mut chat = chat.lock().await;
            ensure_selection(&mut chat, &catalog)?;
            state.pages.render_chat(&catalog, &chat)?
        }
        None => {
            let mut chat = state.sessions.transient();
            ensure_selection(&mut chat, &catalog)?;
            state.pages.render_chat(&catalog, &chat)?
        }
    };
    Ok((jar, Html(page)).into_response())
}

/// Form body for POST /select.
#[derive(Debug, Deserialize)]
pub struct SelectForm {
    pub lodging: String,
}

/// POST /select - pick a lodging by its label.
pub async fn select(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SelectForm>,
) -> Result<Response, WebError> {
    let (jar, session) = visitor_session(jar);

    if let Ok(catalog) = load_catalog(&state).await {
        let chat = state.sessions.get_or_create(session);
        chat.lock().await.select(&catalog, &form.lodging)?;
    }

    Ok((jar, Redirect::to("/")).into_response())
}

/// Form body for POST /chat.
#[derive(Debug, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub message: String,
}

/// POST /chat - run one turn. Waits for the completion before redirecting.
///
/// The turn runs in its own task, so it completes even if the visitor disconnects.
pub async fn chat(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ChatForm>,
) -> Result<Response, WebError> {
    let (jar, session) = visitor_session(jar);

    if let Ok(catalog) = load_catalog(&state).await {
        let chat = state.sessions.get_or_create(session);
        let broker = state.broker.clone();
        let turn = tokio::spawn(async move {
            let mut chat = chat.lock_owned().await;
            ensure_selection(&mut chat, &catalog)?;
            chat.submit(&broker, &form.message).await;
            Ok::<_, WebError>(())
        });
        turn.await
            .map_err(|e| WebError::Internal(format!("chat turn failed: {}", e)))??;
    }

    Ok((jar, Redirect::to("/")).into_response())
}

/// POST /reset - end the visitor's session state.
pub async fn reset(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, session) = visitor_session(jar);
    state.sessions.remove(session);
    (jar, Redirect::to("/")).into_response()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub lodgings: Option<usize>,
}

/// GET /health - liveness plus catalog availability.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let lodgings = load_catalog(&state).await.ok().map(|c| c.len());
    let status = if lodgings.is_some() { "healthy" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        lodgings,
    })
}
