use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    registration::{register_full_occurrence, FullOccurrenceRequest},
    storage::{RecordId, Storage},
};

use super::{
    models::{
        ErrorResponse, HealthResponse, LanguageResponse, LanguagesResponse,
        OccurrenceDetailResponse, OccurrenceResponse, OccurrencesResponse, RegistrationResponse,
    },
    AppState,
};

pub async fn health<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
) -> impl IntoResponse {
    let uptime_secs = state.started_at.elapsed().map(|d| d.as_secs()).unwrap_or(0);
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            uptime_secs,
        }),
    )
}

pub async fn create_full_occurrence<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    payload: Result<Json<FullOccurrenceRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            log::warn!("Rejected full occurrence payload: {}", rejection.body_text());
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("invalid request body: {}", rejection.body_text()),
            );
        }
    };

    match register_full_occurrence(&state.storage, &request) {
        Ok(registered) => (
            StatusCode::CREATED,
            Json(RegistrationResponse {
                message: "occurrence registered".to_string(),
                occurrence_id: registered.occurrence_id,
            }),
        )
            .into_response(),
        Err(err) => {
            log::error!("Full occurrence registration failed: {}", err);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

pub async fn list_occurrences<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
) -> impl IntoResponse {
    match state.storage.list_occurrences() {
        Ok(rows) => Json(OccurrencesResponse {
            occurrences: rows.into_iter().map(OccurrenceResponse::from).collect(),
        })
        .into_response(),
        Err(err) => {
            log::error!("Failed to list occurrences: {:?}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn get_occurrence<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let occurrence_id = match id.trim().parse::<RecordId>() {
        Ok(occurrence_id) => occurrence_id,
        Err(err) => {
            log::warn!("Invalid occurrence id {}: {}", id, err);
            return error_response(StatusCode::BAD_REQUEST, "invalid occurrence id".to_string());
        }
    };

    match state.storage.load_occurrence_detail(occurrence_id) {
        Ok(Some(detail)) => Json(OccurrenceDetailResponse::from(detail)).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => {
            log::error!("Failed to load occurrence {}: {:?}", occurrence_id, err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn list_languages<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
) -> impl IntoResponse {
    match state.storage.list_languages() {
        Ok(rows) => Json(LanguagesResponse {
            languages: rows.into_iter().map(LanguageResponse::from).collect(),
        })
        .into_response(),
        Err(err) => {
            log::error!("Failed to list languages: {:?}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn not_found() -> impl IntoResponse {
    error_response(StatusCode::NOT_FOUND, "endpoint not found".to_string())
}

fn error_response(status: StatusCode, message: String) -> axum::response::Response {
    (status, Json(ErrorResponse { message })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, Bytes},
        http::{header, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    use crate::{
        registration::test_support::sample_request_json,
        rest::router,
        storage::{
            sqlite::test_support::{count_rows, seeded_storage},
            SqliteStorage,
        },
    };

    async fn send(
        storage: SqliteStorage,
        request: Request<Body>,
    ) -> (StatusCode, Bytes) {
        let response = router(storage).oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body)
    }

    fn decode<T: DeserializeOwned>(body: &[u8]) -> T {
        serde_json::from_slice(body).unwrap()
    }

    fn post_json(uri: &str, body: String) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .method("GET")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn full_occurrence_is_created_and_readable() {
        let (_dir, storage) = seeded_storage();

        let (status, body) = send(
            storage.clone(),
            post_json(
                "/api/v0_0_1/full-occurrence",
                sample_request_json().to_string(),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let created: RegistrationResponse = decode(&body);

        let (status, body) = send(
            storage.clone(),
            get(&format!("/api/v0_0_1/occurrences/{}", created.occurrence_id)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let detail: OccurrenceDetailResponse = decode(&body);
        assert_eq!(detail.occurrence.project_id, Some(7));
        assert_eq!(detail.occurrence.note, "found under bark");
        assert_eq!(detail.classification.unwrap()["family"], "Carabidae");
        let place = detail.place.unwrap();
        assert_eq!(place.coordinates.as_deref(), Some("POINT(139.02 37.91)"));
        assert_eq!(place.place_name.unwrap()["country"], "Japan");
        assert_eq!(detail.specimens.len(), 1);
        assert_eq!(detail.specimens[0].institution_id, Some(5));
        assert_eq!(detail.make_specimens[0].specimen_id, detail.specimens[0].specimen_id);
        assert_eq!(detail.identifications.len(), 1);
        assert_eq!(detail.observations[0].behavior, "walking");

        let (status, body) = send(storage, get("/api/v0_0_1/occurrences")).await;
        assert_eq!(status, StatusCode::OK);
        let listed: OccurrencesResponse = decode(&body);
        assert_eq!(listed.occurrences.len(), 1);
        assert_eq!(listed.occurrences[0].occurrence_id, created.occurrence_id);
    }

    #[tokio::test]
    async fn bad_observed_at_is_a_server_error_and_leaves_no_rows() {
        let (_dir, storage) = seeded_storage();
        let mut payload = sample_request_json();
        payload["observation"]["observed_at"] = "not-a-date".into();

        let (status, body) = send(
            storage.clone(),
            post_json("/api/v0_0_1/full-occurrence", payload.to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let error: ErrorResponse = decode(&body);
        assert!(error.message.contains("observation.observed_at"));
        assert_eq!(count_rows(&storage, "occurrence"), 0);
        assert_eq!(count_rows(&storage, "classification_json"), 0);
    }

    #[tokio::test]
    async fn structurally_invalid_body_is_rejected_before_registration() {
        let (_dir, storage) = seeded_storage();
        let mut payload = sample_request_json();
        payload.as_object_mut().unwrap().remove("specimen");

        let (status, body) = send(
            storage.clone(),
            post_json("/api/v0_0_1/full-occurrence", payload.to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ErrorResponse = decode(&body);
        assert!(error.message.contains("specimen"));
        assert_eq!(count_rows(&storage, "classification_json"), 0);
    }

    #[tokio::test]
    async fn unparseable_json_is_a_bad_request() {
        let (_dir, storage) = seeded_storage();
        let (status, _) = send(
            storage,
            post_json("/api/v0_0_1/full-occurrence", "{not json".to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_occurrence_rejects_non_numeric_id() {
        let (_dir, storage) = seeded_storage();
        let (status, body) = send(storage, get("/api/v0_0_1/occurrences/abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ErrorResponse = decode(&body);
        assert_eq!(error.message, "invalid occurrence id");
    }

    #[tokio::test]
    async fn get_occurrence_returns_404_when_missing() {
        let (_dir, storage) = seeded_storage();
        let (status, _) = send(storage, get("/api/v0_0_1/occurrences/42")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn languages_are_listed() {
        let (_dir, storage) = seeded_storage();
        let (status, body) = send(storage, get("/api/v0_0_1/languages")).await;
        assert_eq!(status, StatusCode::OK);
        let payload: LanguagesResponse = decode(&body);
        assert_eq!(payload.languages.len(), 2);
        assert_eq!(payload.languages[1].language_short, "ja");
    }

    #[tokio::test]
    async fn unknown_route_falls_back_to_json_404() {
        let (_dir, storage) = seeded_storage();
        let (status, body) = send(storage, get("/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let error: ErrorResponse = decode(&body);
        assert_eq!(error.message, "endpoint not found");
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (_dir, storage) = seeded_storage();
        let (status, body) = send(storage, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        let payload: HealthResponse = decode(&body);
        assert_eq!(payload.status, "ok");
    }
}
