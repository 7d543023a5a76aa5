use axum::{
    Json, Router,
    body::to_bytes,
    extract::{Query, Request, State},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::{
    error::{TodoError, TodoResult},
    handlers,
    router::Operation,
    state::AppState,
};

pub const NOT_FOUND_BODY: &str = "Not found";

/// Every request goes through [`dispatch`]; routing is done by the
/// [`RouteTable`](crate::router::RouteTable) held in state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .fallback(dispatch)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn dispatch(State(state): State<AppState>, request: Request) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let target = request_target(&uri);

    state.log.log(format!("{method} {target}"));

    let result = match to_bytes(request.into_body(), usize::MAX).await {
        Ok(body) => handle(&state, &method, &uri, &body).await,
        Err(err) => Err(TodoError::body(err.to_string())),
    };

    match result {
        Ok(response) => response,
        Err(err) => {
            if err.is_internal() {
                warn!(%method, target = %target, error = %err, "request failed");
                state.log.log(format!("ERROR on {method} {target}: {err}"));
            }
            err.into_response()
        }
    }
}

async fn handle(state: &AppState, method: &Method, uri: &Uri, body: &[u8]) -> TodoResult<Response> {
    let Some(route) = state.routes.resolve(method, uri.path()) else {
        debug!(%method, path = uri.path(), "no route");
        return Ok((StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response());
    };

    let store = state.store.as_ref();
    let id = route.id.as_deref().unwrap_or_default();

    let response = match route.operation {
        Operation::List => {
            let completed = completed_filter(uri)?;
            Json(handlers::list_todos(store, completed.as_deref()).await?).into_response()
        }
        Operation::Get => Json(handlers::get_todo(store, id).await?).into_response(),
        Operation::Create => Json(handlers::create_todo(store, body).await?).into_response(),
        Operation::Update => Json(handlers::update_todo(store, id, body).await?).into_response(),
        Operation::Delete => Json(handlers::delete_todo(store, id).await?).into_response(),
    };

    Ok(response)
}

/// First `completed` query value, if any.
fn completed_filter(uri: &Uri) -> TodoResult<Option<String>> {
    let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(uri)
        .map_err(|err| TodoError::invalid_input(err.body_text()))?;

    Ok(pairs
        .into_iter()
        .find(|(key, _)| key == "completed")
        .map(|(_, value)| value))
}

/// Path plus query string, as received.
fn request_target(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|target| target.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_filter_takes_first_occurrence() {
        let uri: Uri = "/todos?x=1&completed=true&completed=false".parse().unwrap();
        assert_eq!(completed_filter(&uri).unwrap(), Some("true".to_string()));

        let uri: Uri = "/todos".parse().unwrap();
        assert_eq!(completed_filter(&uri).unwrap(), None);
    }

    #[test]
    fn request_target_keeps_query() {
        let uri: Uri = "/todos?completed=false".parse().unwrap();
        assert_eq!(request_target(&uri), "/todos?completed=false");
    }
}
