use axum::{
    extract::Extension,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use std::sync::Arc;

use crate::{Activity, Randomly};

/// Liveness check; also tells you which build is answering.
async fn ping() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("RANDOMLY {version} IS PICKING")
}

/// Bot Framework posts every activity here. The reply travels back through
/// the connector, so all the channel hears from us is a status code.
async fn incoming(Extension(randomly): Extension<Arc<Randomly>>, Json(activity): Json<Activity>) -> StatusCode {
    match randomly.handle_activity(&activity).await {
        Ok(sent) => {
            log::debug!(
                "turn for {} in {} done; replied: {sent}",
                activity.activity_type,
                activity.conversation.id
            );
            StatusCode::OK
        }
        Err(e) => {
            log::error!(
                "turn failed in conversation {}: {:#}",
                activity.conversation.id,
                e
            );
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Put `route` under `prefix`. Slashes on either end of the prefix are
/// optional; axum refuses any route that doesn't start with one.
fn mount(prefix: &str, route: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        route.to_string()
    } else {
        format!("/{prefix}{route}")
    }
}

/// All our routes, mounted under `prefix`.
pub fn router(prefix: &str, randomly: Arc<Randomly>) -> Router {
    Router::new()
        .route(&mount(prefix, "/ping"), get(ping))
        .route(&mount(prefix, "/api/messages"), post(incoming))
        .layer(Extension(randomly))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::randomly::tests::{config, message, FakeConnector};
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use tower::ServiceExt;

    fn app(connector: &Arc<FakeConnector>, prefix: &str) -> Router {
        let randomly = Randomly::new(connector.clone(), &config());
        router(prefix, Arc::new(randomly))
    }

    fn post_activity(uri: &str, activity: &Activity) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(activity).unwrap()))
            .unwrap()
    }

    #[tokio::test]
    async fn ping_answers() {
        let connector = Arc::new(FakeConnector::default());
        let response = app(&connector, "")
            .oneshot(Request::builder().uri("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn team_messages_are_answered() {
        let connector = Arc::new(FakeConnector::with_roster(4));
        let response = app(&connector, "")
            .oneshot(post_activity("/api/messages", &message("team")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let sent = connector.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].attachments.len(), 1);
    }

    #[tokio::test]
    async fn routes_respect_the_prefix() {
        let connector = Arc::new(FakeConnector::with_roster(2));

        let response = app(&connector, "/randomly/")
            .oneshot(post_activity("/randomly/api/messages", &message("personal")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app(&connector, "/randomly/")
            .oneshot(post_activity("/api/messages", &message("personal")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        assert_eq!(connector.sent.lock().unwrap().len(), 1);
    }

    #[test]
    fn prefixes_are_normalized() {
        assert_eq!(mount("", "/ping"), "/ping");
        assert_eq!(mount("/", "/ping"), "/ping");
        assert_eq!(mount("randomly", "/ping"), "/randomly/ping");
        assert_eq!(mount("/randomly/", "/ping"), "/randomly/ping");
        assert_eq!(mount("bots/randomly", "/api/messages"), "/bots/randomly/api/messages");
    }

    #[tokio::test]
    async fn bare_prefixes_still_route() {
        let connector = Arc::new(FakeConnector::default());
        let response = app(&connector, "randomly")
            .oneshot(Request::builder().uri("/randomly/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn failed_turns_are_server_errors() {
        let connector = Arc::new(FakeConnector::default());
        let response = app(&connector, "")
            .oneshot(post_activity("/api/messages", &message("groupChat")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(connector.sent.lock().unwrap().is_empty());
    }
}
