//! HTTP routes.
//!
//! Thin transport over the ports: each handler resolves the operation,
//! calls the repository (or the category reader), and serializes the
//! result. The only logic that lives here beyond plumbing is category-code
//! resolution, which goes through the registry rather than re-deriving the
//! taxonomy.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Path, Query, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::app::App;
use crate::infrastructure::ports::RepoError;
use ordnance_domain::{resolve, Category, CategoryVariant, Weapon, WeaponPatch};

const JSON_UTF8: &str = "application/json; charset=UTF-8";

/// Create all HTTP routes. Unrouted methods on these paths get axum's
/// 405 method-not-allowed fallback.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/categories", get(categories))
        .route("/category", get(weapons_by_category))
        .route("/weapons", get(weapons))
        .route("/weapon", post(insert_weapon))
        .route(
            "/weapon/{name}",
            get(weapon_by_name).put(update_weapon).delete(delete_weapon),
        )
        .route("/search", get(search_weapons))
}

async fn health() -> &'static str {
    "OK"
}

#[derive(Serialize)]
struct CategoriesResponse {
    categories: Vec<Category>,
}

#[derive(Serialize)]
struct WeaponsResponse {
    weapons: Vec<Weapon>,
}

#[derive(Serialize)]
struct CategoryItemsResponse {
    category: CategoryVariant,
    weapons: Vec<Weapon>,
}

#[derive(Serialize)]
struct Empty {}

async fn categories(State(app): State<Arc<App>>) -> Result<Response, ApiError> {
    // Upstream failure is a 500 regardless of kind; the relational store
    // is opaque to us. Without it, fall back to the document collection.
    let categories = match &app.categories {
        Some(reader) => reader
            .list_categories()
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?,
        None => app
            .weapons
            .distinct_categories()
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?,
    };

    tracing::info!(count = categories.len(), "got categories");
    Ok(write_json(StatusCode::OK, &CategoriesResponse { categories }))
}

#[derive(Deserialize)]
struct CategoryParams {
    name: String,
}

async fn weapons_by_category(
    State(app): State<Arc<App>>,
    Query(params): Query<CategoryParams>,
) -> Result<Response, ApiError> {
    // Unknown code is "no content", never an error.
    let Some(variant) = resolve(&params.name) else {
        return Ok(StatusCode::OK.into_response());
    };

    let weapons = app.weapons.list_by_category(variant.code).await?;
    Ok(write_json(
        StatusCode::OK,
        &CategoryItemsResponse {
            category: variant,
            weapons,
        },
    ))
}

#[derive(Deserialize)]
struct SearchParams {
    search: Option<String>,
}

async fn weapons(
    State(app): State<Arc<App>>,
    Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
    let weapons = match params.search.as_deref() {
        Some(keyword) => app.weapons.search(keyword).await?,
        None => app.weapons.list().await?,
    };

    tracing::info!(count = weapons.len(), "got weapons");
    Ok(write_json(StatusCode::OK, &WeaponsResponse { weapons }))
}

async fn search_weapons(
    State(app): State<Arc<App>>,
    Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
    // A missing parameter behaves like an empty keyword: rejected by the
    // repository before any store call.
    let keyword = params.search.unwrap_or_default();
    let weapons = app.weapons.search(&keyword).await?;
    Ok(write_json(StatusCode::OK, &WeaponsResponse { weapons }))
}

async fn weapon_by_name(
    State(app): State<Arc<App>>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let weapon = app.weapons.get_by_name(&name).await?;
    Ok(write_json(StatusCode::OK, &weapon))
}

async fn insert_weapon(
    State(app): State<Arc<App>>,
    ApiJson(weapon): ApiJson<Weapon>,
) -> Result<Response, ApiError> {
    app.weapons.insert(&weapon).await?;
    tracing::info!(name = %weapon.name, "insert weapon");
    Ok(write_json(StatusCode::OK, &Empty {}))
}

async fn update_weapon(
    State(app): State<Arc<App>>,
    Path(name): Path<String>,
    ApiJson(patch): ApiJson<WeaponPatch>,
) -> Result<Response, ApiError> {
    app.weapons.update(&name, &patch).await.map_err(|e| match e {
        // Surface shape of the original API: a missing update target is a
        // 400, unlike the 404 of a missing lookup target.
        RepoError::NotFound { .. } => ApiError::BadRequest(format!("{name} doesn't exist")),
        other => other.into(),
    })?;

    tracing::info!(name = %name, "update weapon");
    Ok(write_json(StatusCode::OK, &Empty {}))
}

async fn delete_weapon(
    State(app): State<Arc<App>>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    app.weapons.delete(&name).await?;
    tracing::info!(name = %name, "delete weapon");
    Ok(write_json(StatusCode::OK, &Empty {}))
}

// =============================================================================
// Errors and encoding
// =============================================================================

/// JSON body extractor that rejects every undecodable body as a 400
/// validation error, before any store call is made. (axum's stock `Json`
/// answers 422 for type errors.)
struct ApiJson<T>(T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    #[serde(rename = "statusCode")]
    status_code: u16,
    msg: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ApiError::NotFound(msg) => {
                tracing::debug!(error = %msg, "not found");
                (StatusCode::NOT_FOUND, msg)
            }
            ApiError::BadRequest(msg) => {
                tracing::debug!(error = %msg, "bad request");
                (StatusCode::BAD_REQUEST, msg)
            }
            ApiError::Internal(msg) => {
                // Never leak internal error text to the client.
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        write_json(
            status,
            &ErrorBody {
                status_code: status.as_u16(),
                msg,
            },
        )
    }
}

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound { key, .. } => {
                ApiError::NotFound(format!("nothing found for {key}"))
            }
            RepoError::AlreadyExists { name } => {
                ApiError::BadRequest(format!("{name} already exists"))
            }
            RepoError::Validation(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

fn write_json<T: Serialize>(status: StatusCode, value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(body) => (status, [(header::CONTENT_TYPE, JSON_UTF8)], body).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode response body");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::infrastructure::in_memory::{InMemoryCategoryReader, InMemoryWeaponRepo};
    use crate::infrastructure::ports::CategoryReader;

    fn test_router(weapons: Vec<Weapon>, categories: Option<Vec<Category>>) -> Router {
        let repo = Arc::new(InMemoryWeaponRepo::with_weapons(weapons));
        let reader =
            categories.map(|c| Arc::new(InMemoryCategoryReader::new(c)) as Arc<dyn CategoryReader>);
        routes().with_state(Arc::new(App::new(repo, reader)))
    }

    fn seeded() -> Vec<Weapon> {
        vec![
            Weapon::new("AGM-65 Maverick", "tv-guided").with_stat("mass_kg", json!(210.0)),
            Weapon::new("AIM-9L", "ir-all-aspect").with_stat("mass_kg", json!(85.3)),
            Weapon::new("AIM-9B", "ir-rear-aspect"),
        ]
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn req_get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn with_json_body(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_endpoint_responds() {
        let response = test_router(vec![], None).oneshot(req_get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn get_weapon_returns_record_with_json_utf8_content_type() {
        let response = test_router(seeded(), None)
            .oneshot(req_get("/weapon/AIM-9L"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            JSON_UTF8
        );

        let body = body_json(response).await;
        assert_eq!(body["name"], "AIM-9L");
        assert_eq!(body["category"], "ir-all-aspect");
        assert_eq!(body["mass_kg"], json!(85.3));
    }

    #[tokio::test]
    async fn get_missing_weapon_is_structured_404() {
        let response = test_router(seeded(), None)
            .oneshot(req_get("/weapon/AIM-54A"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["statusCode"], 404);
        assert_eq!(body["msg"], "nothing found for AIM-54A");
    }

    #[tokio::test]
    async fn insert_then_get_round_trips() {
        let router = test_router(vec![], None);

        let response = router
            .clone()
            .oneshot(with_json_body(
                "POST",
                "/weapon",
                json!({"name": "AIM-7F", "category": "sarh", "range_km": 70}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({}));

        let response = router.oneshot(req_get("/weapon/AIM-7F")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["range_km"], json!(70));
    }

    #[tokio::test]
    async fn duplicate_insert_is_400_already_exists() {
        let response = test_router(seeded(), None)
            .oneshot(with_json_body(
                "POST",
                "/weapon",
                json!({"name": "AIM-9L", "category": "ir-all-aspect"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["statusCode"], 400);
        assert_eq!(body["msg"], "AIM-9L already exists");
    }

    #[tokio::test]
    async fn undecodable_insert_body_is_400_before_any_store_call() {
        let response = test_router(vec![], None)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/weapon")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_merges_and_missing_target_is_400() {
        let router = test_router(seeded(), None);

        let response = router
            .clone()
            .oneshot(with_json_body(
                "PUT",
                "/weapon/AIM-9L",
                json!({"category": "ir-rear-aspect"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router.clone().oneshot(req_get("/weapon/AIM-9L")).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(body["category"], "ir-rear-aspect");
        // Omitted field retains its prior value
        assert_eq!(body["mass_kg"], json!(85.3));

        let response = router
            .oneshot(with_json_body(
                "PUT",
                "/weapon/R-60",
                json!({"category": "ir-rear-aspect"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["msg"], "R-60 doesn't exist");
    }

    #[tokio::test]
    async fn delete_then_missing_delete_is_404() {
        let router = test_router(seeded(), None);

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/weapon/AIM-9B")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/weapon/AIM-9B")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn weapons_lists_all_and_delegates_to_search() {
        let router = test_router(seeded(), None);

        let response = router.clone().oneshot(req_get("/weapons")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["weapons"].as_array().unwrap().len(), 3);

        let response = router.oneshot(req_get("/weapons?search=mav")).await.unwrap();
        let body = body_json(response).await;
        let weapons = body["weapons"].as_array().unwrap();
        assert_eq!(weapons.len(), 1);
        assert_eq!(weapons[0]["name"], "AGM-65 Maverick");
    }

    #[tokio::test]
    async fn empty_collection_list_is_404() {
        let response = test_router(vec![], None).oneshot(req_get("/weapons")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn search_endpoint_matches_and_rejects_empty_keyword() {
        let router = test_router(seeded(), None);

        let response = router.clone().oneshot(req_get("/search?search=aim")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["weapons"].as_array().unwrap().len(), 2);

        let response = router.clone().oneshot(req_get("/search?search=exocet")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = router.oneshot(req_get("/search")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn categories_prefers_reader_and_falls_back_to_collection() {
        let taxonomy = vec![Category::new("ir-all-aspect"), Category::new("sarh")];
        let response = test_router(seeded(), Some(taxonomy))
            .oneshot(req_get("/categories"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(
            body["categories"],
            json!([{"name": "ir-all-aspect"}, {"name": "sarh"}])
        );

        // No relational store configured: distinct over the collection
        let response = test_router(seeded(), None).oneshot(req_get("/categories")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(
            body["categories"],
            json!([
                {"name": "ir-all-aspect"},
                {"name": "ir-rear-aspect"},
                {"name": "tv-guided"}
            ])
        );
    }

    #[tokio::test]
    async fn unknown_category_code_yields_empty_ok() {
        let response = test_router(seeded(), None)
            .oneshot(req_get("/category?name=wire-guided-torpedo"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn known_category_returns_variant_and_items() {
        let response = test_router(seeded(), None)
            .oneshot(req_get("/category?name=ir-all-aspect"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["category"]["code"], "ir-all-aspect");
        assert_eq!(body["category"]["renderer"], "ir-missile");
        assert_eq!(body["weapons"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn known_category_with_no_items_is_404() {
        let response = test_router(seeded(), None)
            .oneshot(req_get("/category?name=guided-bomb"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["msg"], "nothing found for guided-bomb");
    }

    #[tokio::test]
    async fn wrong_method_is_405() {
        let response = test_router(seeded(), None)
            .oneshot(with_json_body("POST", "/weapons", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let response = test_router(seeded(), None)
            .oneshot(req_get("/weapon"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
