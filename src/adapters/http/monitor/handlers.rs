//! Monitor WebSocket handlers.
//!
//! # Connection Flow
//! 1. Client POSTs to the monitor path and receives a single-use ticket in a
//!    short-lived HttpOnly cookie
//! 2. Client GETs the same path with upgrade headers, presenting the cookie
//! 3. Server validates the ticket, checks same-origin, and upgrades
//! 4. Server sends a greeting Ping envelope, then pipes the bus subscription
//!    into the socket, interleaved with a heartbeat Ping every 10 s
//! 5. On disconnect or shutdown, a normal close frame is attempted and both
//!    the subscription and the socket are released

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use futures::{SinkExt, StreamExt};

use crate::adapters::auth::TicketProvider;
use crate::domain::events::FamilyEvent;
use crate::ports::EventService;

/// Name of the cookie carrying the WebSocket ticket.
pub const TICKET_COOKIE: &str = "enduro-ws-ticket";

/// Reason sent in the normal-closure frame.
const CLOSE_REASON: &str = "server closing connection";

/// Deadline for writing the close control frame.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Default heartbeat period.
pub const PING_INTERVAL: Duration = Duration::from_secs(10);

// ════════════════════════════════════════════════════════════════════════════
// State
// ════════════════════════════════════════════════════════════════════════════

/// State required for one family's monitor endpoint.
pub struct MonitorState<T> {
    /// Event bus the endpoint subscribes to.
    pub bus: Arc<dyn EventService<T>>,
    /// Ticket provider gating the upgrade.
    pub tickets: Arc<TicketProvider>,
    /// Heartbeat period.
    pub ping_interval: Duration,
}

impl<T> MonitorState<T> {
    /// Create new monitor state with the default heartbeat period.
    pub fn new(bus: Arc<dyn EventService<T>>, tickets: Arc<TicketProvider>) -> Self {
        Self { bus, tickets, ping_interval: PING_INTERVAL }
    }
}

impl<T> Clone for MonitorState<T> {
    fn clone(&self) -> Self {
        Self {
            bus: Arc::clone(&self.bus),
            tickets: Arc::clone(&self.tickets),
            ping_interval: self.ping_interval,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Ticket request (POST)
// ════════════════════════════════════════════════════════════════════════════

/// Issues a WebSocket ticket as a short-lived secure cookie.
///
/// Route: `POST /{family}/monitor`
///
/// No cookie is set when the provider is disabled (authentication off).
pub async fn request_monitor<T: FamilyEvent>(
    State(state): State<MonitorState<T>>,
) -> Response {
    let ticket = state.tickets.request().await;

    let mut response = StatusCode::OK.into_response();
    if !ticket.is_empty() {
        let cookie = format!(
            "{TICKET_COOKIE}={ticket}; Max-Age={}; Path=/; HttpOnly; Secure; SameSite=Strict",
            state.tickets.ttl().as_secs(),
        );
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().insert(header::SET_COOKIE, value);
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to build ticket cookie");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        }
    }

    response
}

// ════════════════════════════════════════════════════════════════════════════
// Upgrade (GET)
// ════════════════════════════════════════════════════════════════════════════

/// Validates the ticket and upgrades to a WebSocket event stream.
///
/// Route: `GET /{family}/monitor`
///
/// The ticket is consumed whether or not the upgrade succeeds. The specific
/// failure reason (unknown, consumed, expired) is never revealed to clients.
pub async fn monitor<T: FamilyEvent>(
    ws: WebSocketUpgrade,
    headers: HeaderMap,
    State(state): State<MonitorState<T>>,
) -> Response {
    let ticket = ticket_from_cookies(&headers).unwrap_or_default();
    if let Err(err) = state.tickets.check(&ticket).await {
        tracing::debug!(family = T::FAMILY, error = %err, "failed to check ticket");
        return (StatusCode::SERVICE_UNAVAILABLE, "cannot perform operation").into_response();
    }

    if !same_origin(&headers) {
        return StatusCode::FORBIDDEN.into_response();
    }

    ws.on_upgrade(move |socket| stream_events(socket, state))
}

/// Pipes the bus subscription into the socket until either side ends.
///
/// All frame writes happen in this task; concurrent writers on one WebSocket
/// are a protocol error.
async fn stream_events<T: FamilyEvent>(mut socket: WebSocket, state: MonitorState<T>) {
    let mut sub = match state.bus.subscribe().await {
        Ok(sub) => sub,
        Err(err) => {
            tracing::error!(family = T::FAMILY, error = %err, "monitor subscription failed");
            let _ = socket.close().await;
            return;
        }
    };

    tracing::debug!(family = T::FAMILY, "monitor stream established");

    let (mut sender, mut receiver) = socket.split();

    // Greeting first; the ticker only fires after a full period.
    let start = tokio::time::Instant::now() + state.ping_interval;
    let mut ticker = tokio::time::interval_at(start, state.ping_interval);

    let mut open = send_event(&mut sender, &T::ping("Hello")).await;

    while open {
        tokio::select! {
            _ = ticker.tick() => {
                open = send_event(&mut sender, &T::ping("Ping")).await;
            }

            event = sub.recv() => {
                match event {
                    Some(event) => open = send_event(&mut sender, &event).await,
                    // Stream ended: bus teardown, no further events.
                    None => open = false,
                }
            }

            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => open = false,
                    Some(Ok(_)) => {} // clients have nothing to say here
                    Some(Err(err)) => {
                        tracing::debug!(family = T::FAMILY, error = %err, "websocket read error");
                        open = false;
                    }
                }
            }
        }
    }

    if let Err(err) = sub.close().await {
        tracing::debug!(family = T::FAMILY, error = %err, "subscription close failed");
    }

    let close = Message::Close(Some(CloseFrame {
        code: close_code::NORMAL,
        reason: CLOSE_REASON.into(),
    }));
    let _ = tokio::time::timeout(CLOSE_TIMEOUT, sender.send(close)).await;

    tracing::debug!(family = T::FAMILY, "monitor stream closed");
}

/// Serializes an envelope into one text frame and sends it.
///
/// Returns `false` when the connection should end. An envelope that fails to
/// encode is dropped for this transport and the stream continues.
async fn send_event<T: FamilyEvent>(
    sender: &mut (impl SinkExt<Message> + Unpin),
    event: &T,
) -> bool {
    let text = match serde_json::to_string(event) {
        Ok(text) => text,
        Err(err) => {
            tracing::error!(family = T::FAMILY, error = %err, "failed to encode monitor event");
            return true;
        }
    };

    sender.send(Message::Text(text)).await.is_ok()
}

// ════════════════════════════════════════════════════════════════════════════
// Request validation helpers
// ════════════════════════════════════════════════════════════════════════════

/// Same-origin policy for the upgrade request.
///
/// A request without an Origin header is admitted (non-browser client); when
/// the header is present its host must equal the request Host, compared as
/// case-folded ASCII.
fn same_origin(headers: &HeaderMap) -> bool {
    let Some(origin) = headers.get(header::ORIGIN).and_then(|v| v.to_str().ok()) else {
        return true;
    };
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    match origin_host(origin) {
        Some(origin_host) if origin_host.eq_ignore_ascii_case(host) => true,
        _ => {
            tracing::warn!(origin, host, "rejecting websocket upgrade: origin mismatch");
            false
        }
    }
}

/// Extracts `host[:port]` from an Origin header value.
fn origin_host(origin: &str) -> Option<&str> {
    let rest = origin
        .strip_prefix("https://")
        .or_else(|| origin.strip_prefix("http://"))?;
    let host = rest.split('/').next().unwrap_or(rest);

    (!host.is_empty()).then_some(host)
}

/// Extracts the ticket value from the Cookie header, if present.
fn ticket_from_cookies(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;

    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == TICKET_COOKIE).then(|| value.to_string())
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    mod origin_checks {
        use super::*;

        fn headers(origin: Option<&str>, host: Option<&str>) -> HeaderMap {
            let mut headers = HeaderMap::new();
            if let Some(origin) = origin {
                headers.insert(header::ORIGIN, origin.parse().unwrap());
            }
            if let Some(host) = host {
                headers.insert(header::HOST, host.parse().unwrap());
            }
            headers
        }

        #[test]
        fn missing_origin_is_admitted() {
            assert!(same_origin(&headers(None, Some("enduro.internal"))));
        }

        #[test]
        fn matching_origin_is_admitted() {
            assert!(same_origin(&headers(
                Some("https://enduro.internal"),
                Some("enduro.internal"),
            )));
        }

        #[test]
        fn origin_comparison_is_case_insensitive() {
            assert!(same_origin(&headers(
                Some("https://Enduro.Internal"),
                Some("enduro.internal"),
            )));
        }

        #[test]
        fn mismatched_origin_is_refused() {
            assert!(!same_origin(&headers(Some("http://a"), Some("b"))));
        }

        #[test]
        fn origin_with_port_must_match_host_with_port() {
            assert!(same_origin(&headers(
                Some("http://localhost:9000"),
                Some("localhost:9000"),
            )));
            assert!(!same_origin(&headers(
                Some("http://localhost:9000"),
                Some("localhost:9001"),
            )));
        }

        #[test]
        fn unparseable_origin_is_refused() {
            assert!(!same_origin(&headers(Some("file://x"), Some("x"))));
        }

        #[test]
        fn origin_without_host_header_is_refused() {
            assert!(!same_origin(&headers(Some("https://enduro.internal"), None)));
        }
    }

    mod cookie_parsing {
        use super::*;

        #[test]
        fn finds_the_ticket_among_other_cookies() {
            let mut headers = HeaderMap::new();
            headers.insert(
                header::COOKIE,
                "theme=dark; enduro-ws-ticket=abc123; lang=en".parse().unwrap(),
            );

            assert_eq!(ticket_from_cookies(&headers), Some("abc123".to_string()));
        }

        #[test]
        fn missing_cookie_header_yields_none() {
            assert_eq!(ticket_from_cookies(&HeaderMap::new()), None);
        }

        #[test]
        fn other_cookies_only_yields_none() {
            let mut headers = HeaderMap::new();
            headers.insert(header::COOKIE, "theme=dark".parse().unwrap());

            assert_eq!(ticket_from_cookies(&headers), None);
        }
    }
}
