use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::config::ServerConfig;
use crate::option::TimetableOption;
use crate::solver::GenerateRequest;

/// Body returned by the generate endpoint. A precondition failure gives no options and a
/// diagnostic instead of an error status.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub options: Vec<TimetableOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

async fn generate_handler(
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, (StatusCode, String)> {
    let outcome = tokio::task::spawn_blocking(move || request.try_generate())
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Generation task failed: {e}"),
            )
        })?;

    let response = match outcome {
        Ok(options) => GenerateResponse {
            options,
            diagnostic: None,
        },
        Err(e) => {
            error!("Timetable generation aborted: {e}");
            GenerateResponse {
                options: Vec::new(),
                diagnostic: Some(e.to_string()),
            }
        }
    };
    Ok(Json(response))
}

pub fn router() -> Router {
    Router::new()
        .route("/v1/timetable/generate", post(generate_handler))
        .route("/health", get(|| async { "ok" }))
}

pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Server running at http://{}", listener.local_addr()?);
    axum::serve(listener, router()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    async fn post_generate(body: serde_json::Value) -> (StatusCode, GenerateResponse) {
        let response = router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/timetable/generate")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_generate_endpoint_returns_options() {
        let (status, response) = post_generate(serde_json::json!({
            "roster": {
                "faculty": [{ "id": "F01", "name": "Dr. Alan Turing", "expertise": ["CS101"], "maxLoad": 10 }],
                "subjects": [{ "id": "CS101", "name": "Intro to Programming", "semester": 1, "hours": 4 }],
                "batches": [{ "id": "CSE25", "program": "UG", "semester": 1, "strength": 60, "subjects": ["CS101"] }]
            },
            "resources": { "classrooms": [{ "id": "R101", "capacity": 100, "type": "Lecture Hall" }] },
            "constraints": { "lunchBreak": "12-13", "maxConsecutiveFacultyHours": 2 },
            "settings": { "seed": 12 }
        }))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(response.diagnostic.is_none());
        assert_eq!(response.options.len(), 2);
        for option in &response.options {
            assert_eq!(option.schedule.len(), 4);
            assert!(option.schedule.assignments().all(|a| a.slot.period != 3));
        }
    }

    #[tokio::test]
    async fn test_missing_classrooms_gives_diagnostic() {
        let (status, response) = post_generate(serde_json::json!({
            "roster": { "batches": [] },
            "constraints": {}
        }))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(response.options.is_empty());
        assert_eq!(
            response.diagnostic.as_deref(),
            Some("No data: no classrooms supplied")
        );
    }

    #[tokio::test]
    async fn test_health() {
        let response = router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
