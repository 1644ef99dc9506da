//! Similar songs endpoint
//!
//! GET /similares?acordes=A,B,C&generos=Rock&pagina=1
//!
//! Query parameters (at most one of the first three is used; a repeated
//! key keeps its first value):
//! - `sequencia`: registered sequence alias
//! - `acordes`: comma-separated chord list
//! - `id_unico_musica`: catalog song whose chords form the query
//! - `generos`: comma-separated genre filter
//! - `pagina`: 1-indexed page number (100 results per page)
//!
//! Responds with a JSON array of similar songs. Errors carry no body.

use axum::{
    extract::{rejection::QueryRejection, Query, RawQuery, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use crate::error::SearchError;
use crate::resolver::SimilarityParams;
use crate::AppState;

/// GET /similares
pub async fn get_similar(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response {
    let raw_query = raw_query.unwrap_or_default();

    let params = match pairs {
        Ok(Query(pairs)) => SimilarityParams::from_pairs(pairs),
        Err(rejection) => {
            warn!("Rejected query [{}]: {}", raw_query, rejection);
            return SearchError::BadRequest(rejection.body_text()).into_response();
        }
    };

    let page = match state.service.search(&raw_query, &params).await {
        Ok(page) => page,
        Err(e) => {
            if e.is_client_error() {
                warn!("Client error processing request [{}]: {}", raw_query, e);
            } else {
                error!("Error processing request [{}]: {}", raw_query, e);
            }
            return e.into_response();
        }
    };

    let body = match serde_json::to_vec(&page) {
        Ok(body) => body,
        Err(e) => {
            error!("Error serializing response for [{}]: {}", raw_query, e);
            return SearchError::Internal(e.to_string()).into_response();
        }
    };

    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )],
        body,
    )
        .into_response()
}
