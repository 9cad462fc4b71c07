//! Request handlers
//!
//! Each handler runs one interaction top to bottom against the caller's
//! session slot and answers with the freshly rendered page.

use std::sync::Arc;

use axum::{
    extract::{Form, Multipart, State},
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::core::assistant::{ask_about_route, chat_prompt, require_text};
use crate::core::error::{Error, Result};
use crate::core::planner::{submit, RouteForm};
use crate::core::provider::{DirectionsProvider, LanguageModel};
use crate::core::session::{ComparisonSession, SessionSlot, SessionStore};
use crate::core::stops::{parse_stop_lines, parse_stops_upload};
use crate::web::page::{render_page, Notice};
use crate::web::AppState;

pub const SESSION_COOKIE: &str = "routewise_session";

#[derive(Debug, Deserialize)]
pub struct AskForm {
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// The browser behind a request
///
/// Identifying a visitor never touches the [`SessionStore`].
struct Visitor {
    id: String,
    is_new: bool,
}

impl Visitor {
    fn identify(headers: &HeaderMap) -> Self {
        match session_cookie(headers) {
            Some(id) => Self { id, is_new: false },
            None => Self {
                id: SessionStore::new_session_id(),
                is_new: true,
            },
        }
    }

    /// Last stored comparison of this browser
    fn session(&self, sessions: &SessionStore) -> Option<Arc<ComparisonSession>> {
        sessions.get(&self.id).and_then(|slot| slot.get())
    }

    /// Attach the session cookie if this browser just got one
    fn respond(&self, status: StatusCode, body: String) -> Response {
        let mut response = (status, Html(body)).into_response();
        if self.is_new {
            let cookie = format!("{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", self.id);
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                response.headers_mut().insert(SET_COOKIE, value);
            }
        }
        response
    }
}

/// Session id from the request cookies, ignoring values that are not ours
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| uuid::Uuid::parse_str(value).ok())
        .map(|id| id.to_string())
}

/// HTTP status used when an interaction fails
pub fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::ValidationError(_) => StatusCode::BAD_REQUEST,
        Error::ProviderError(_) | Error::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
        Error::ConfigError(_) => StatusCode::SERVICE_UNAVAILABLE,
        Error::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn render_for<D, L>(state: &AppState<D, L>, visitor: &Visitor, notice: &Notice) -> String {
    let session = visitor.session(&state.sessions);
    render_page(session.as_deref(), notice, state.assistant.is_some())
}

/// Render the current session, or the error over it if the interaction failed
fn finish<D, L>(
    state: &AppState<D, L>,
    visitor: &Visitor,
    outcome: Result<Notice>,
) -> Response {
    match outcome {
        Ok(notice) => visitor.respond(StatusCode::OK, render_for(state, visitor, &notice)),
        Err(err) => {
            log::warn!("Interaction failed: {err}");
            let status = status_for(&err);
            let body = render_for(state, visitor, &Notice::Error(err.to_string()));
            visitor.respond(status, body)
        }
    }
}

pub async fn index<D, L>(State(state): State<Arc<AppState<D, L>>>, headers: HeaderMap) -> Response
where
    D: DirectionsProvider,
    L: LanguageModel,
{
    let visitor = Visitor::identify(&headers);
    finish(&state, &visitor, Ok(Notice::None))
}

pub async fn optimize<D, L>(
    State(state): State<Arc<AppState<D, L>>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response
where
    D: DirectionsProvider,
    L: LanguageModel,
{
    let visitor = Visitor::identify(&headers);
    let outcome = async {
        let form = read_route_form(multipart).await?;
        log::info!(
            "Optimizing {} stops from '{}' to '{}'",
            form.stops.len(),
            form.start,
            form.end
        );
        let slot = state
            .sessions
            .get(&visitor.id)
            .unwrap_or_else(|| Arc::new(SessionSlot::new()));
        submit(&state.directions, &form, &slot).await?;
        state.sessions.insert(&visitor.id, slot);
        Ok::<_, Error>(Notice::None)
    }
    .await;
    finish(&state, &visitor, outcome)
}

pub async fn ask<D, L>(
    State(state): State<Arc<AppState<D, L>>>,
    headers: HeaderMap,
    Form(form): Form<AskForm>,
) -> Response
where
    D: DirectionsProvider,
    L: LanguageModel,
{
    let visitor = Visitor::identify(&headers);
    let outcome = async {
        let model = state.assistant.as_ref().ok_or_else(qa_disabled)?;
        let session = visitor.session(&state.sessions).ok_or_else(|| {
            Error::ValidationError("Optimize a route before asking about it.".to_string())
        })?;
        let answer = ask_about_route(model, &session.comparison.optimized, &form.question).await?;
        Ok::<_, Error>(Notice::Answer {
            question: form.question.trim().to_string(),
            answer,
        })
    }
    .await;
    finish(&state, &visitor, outcome)
}

pub async fn chat<D, L>(
    State(state): State<Arc<AppState<D, L>>>,
    headers: HeaderMap,
    Form(form): Form<ChatForm>,
) -> Response
where
    D: DirectionsProvider,
    L: LanguageModel,
{
    let visitor = Visitor::identify(&headers);
    let outcome = async {
        let model = state.assistant.as_ref().ok_or_else(qa_disabled)?;
        let query = require_text(&form.query, "message")?;
        let reply = model.answer(&chat_prompt(&query)).await?;
        Ok::<_, Error>(Notice::Chat { query, reply })
    }
    .await;
    finish(&state, &visitor, outcome)
}

pub async fn session_json<D, L>(
    State(state): State<Arc<AppState<D, L>>>,
    headers: HeaderMap,
) -> Response
where
    D: DirectionsProvider,
    L: LanguageModel,
{
    let session = session_cookie(&headers)
        .and_then(|id| state.sessions.get(&id))
        .and_then(|slot| slot.get());
    match session {
        Some(session) => Json(&*session).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "no route has been optimized in this session".to_string(),
            }),
        )
            .into_response(),
    }
}

fn qa_disabled() -> Error {
    Error::ConfigError("route Q&A is disabled, GROQ_API_KEY is not set".to_string())
}

fn bad_upload(err: axum::extract::multipart::MultipartError) -> Error {
    Error::ValidationError(format!("Could not read form upload: {err}"))
}

/// Collect the multipart form into a [`RouteForm`]
///
/// A non-empty uploaded sheet takes precedence over pasted lines.
async fn read_route_form(mut multipart: Multipart) -> Result<RouteForm> {
    let mut form = RouteForm {
        submitted: true,
        ..RouteForm::default()
    };
    let mut sheet_stops = None;
    let mut pasted_stops = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(bad_upload)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "start" => form.start = field.text().await.map_err(bad_upload)?,
            "end" => form.end = field.text().await.map_err(bad_upload)?,
            "stops_file" => {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await.map_err(bad_upload)?;
                if !bytes.is_empty() {
                    let stops = parse_stops_upload(file_name.as_deref(), &bytes)?;
                    if !stops.is_empty() {
                        sheet_stops = Some(stops);
                    }
                }
            }
            "stops_text" => {
                let text = field.text().await.map_err(bad_upload)?;
                pasted_stops = parse_stop_lines(&text);
            }
            _ => {}
        }
    }

    form.stops = sheet_stops.unwrap_or(pasted_stops);
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_cookie(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_session_cookie_found_among_others() {
        let id = uuid::Uuid::new_v4().to_string();
        let headers = headers_with_cookie(&format!("theme=dark; {SESSION_COOKIE}={id}; x=1"));
        assert_eq!(session_cookie(&headers), Some(id));
    }

    #[test]
    fn test_garbage_session_cookie_ignored() {
        let headers = headers_with_cookie(&format!("{SESSION_COOKIE}=../../etc"));
        assert_eq!(session_cookie(&headers), None);
    }

    #[test]
    fn test_missing_cookie() {
        assert_eq!(session_cookie(&HeaderMap::new()), None);
    }

    #[test]
    fn test_status_for_errors() {
        assert_eq!(
            status_for(&Error::ValidationError("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&Error::ProviderError("x".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&Error::MalformedResponse("x".into())),
            StatusCode::BAD_GATEWAY
        );
    }
}
