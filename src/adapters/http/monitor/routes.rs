//! Route definitions for the monitor endpoints.

use axum::routing::get;
use axum::Router;

use crate::domain::events::{IngestEvent, StorageEvent};

use super::handlers::{monitor, request_monitor, MonitorState};

/// Builds the monitor router for both families.
///
/// - `POST /ingest/monitor`  - issue a ticket cookie
/// - `GET  /ingest/monitor`  - upgrade to the ingest event stream
/// - `POST /storage/monitor` - issue a ticket cookie
/// - `GET  /storage/monitor` - upgrade to the storage event stream
pub fn monitor_routes(
    ingest: MonitorState<IngestEvent>,
    storage: MonitorState<StorageEvent>,
) -> Router {
    let ingest_routes = Router::new()
        .route(
            "/ingest/monitor",
            get(monitor::<IngestEvent>).post(request_monitor::<IngestEvent>),
        )
        .with_state(ingest);

    let storage_routes = Router::new()
        .route(
            "/storage/monitor",
            get(monitor::<StorageEvent>).post(request_monitor::<StorageEvent>),
        )
        .with_state(storage);

    ingest_routes.merge(storage_routes)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::adapters::auth::{InMemTicketStore, TicketProvider};
    use crate::adapters::events::InMemoryEventService;

    // The upgrade path needs a live connection; it is covered end-to-end in
    // tests/monitor_integration.rs with a real WebSocket client.

    fn router(tickets: Arc<TicketProvider>) -> Router {
        let ingest = MonitorState::new(
            Arc::new(InMemoryEventService::<IngestEvent>::new()),
            Arc::clone(&tickets),
        );
        let storage = MonitorState::new(
            Arc::new(InMemoryEventService::<StorageEvent>::new()),
            tickets,
        );
        monitor_routes(ingest, storage)
    }

    async fn post(app: Router, path: &str) -> axum::response::Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn post_issues_a_ticket_cookie() {
        let app = router(Arc::new(TicketProvider::new(Arc::new(InMemTicketStore::new()))));

        let response = post(app, "/ingest/monitor").await;

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(cookie.starts_with("enduro-ws-ticket="));
        assert!(cookie.contains("Max-Age=5"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
    }

    #[tokio::test]
    async fn both_families_issue_tickets() {
        let app = router(Arc::new(TicketProvider::new(Arc::new(InMemTicketStore::new()))));

        let response = post(app, "/storage/monitor").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_some());
    }

    #[tokio::test]
    async fn post_with_disabled_provider_sets_no_cookie() {
        let app = router(Arc::new(TicketProvider::disabled()));

        let response = post(app, "/storage/monitor").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }
}
