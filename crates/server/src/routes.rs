use std::sync::Arc;

use api_types::{
    CreatePostRequest, ImageUploadResponse, PageResponse, PostResponse, ResolvedTargetResponse,
    TargetResponse,
};
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use otbp_core::prelude::*;
use otbp_core::spatial::bearing;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{ApiError, ApiResult};

pub type AppState = Arc<GameService>;

pub fn create_router(service: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/target/{location}", get(find_target))
        .route("/target/key/{key}", get(get_target))
        .route("/posts/{key}", get(first_posts_page).post(create_post))
        .route("/posts/{key}/{page}", get(posts_page))
        .route("/images", post(upload_image))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(service)
}

async fn index() -> &'static str {
    "otbp: GET /target/{lat},{lng} | GET /target/key/{key} | GET /posts/{key}/{page} | POST /posts/{key} | POST /images"
}

async fn health() -> &'static str {
    "OK"
}

/// `"<lat>,<lng>"` as used in `/target/{location}`
fn parse_location(location: &str) -> ApiResult<Coordinate> {
    let (lat, lng) = location
        .split_once(',')
        .ok_or_else(|| ApiError::BadRequest(format!("expected `lat,lng`, got `{location}`")))?;

    let parse = |value: &str| {
        value
            .trim()
            .parse::<f64>()
            .map_err(|_| ApiError::BadRequest(format!("`{value}` is not a number")))
    };

    Ok(Coordinate::new(parse(lat)?, parse(lng)?)?)
}

fn target_response(target: &TargetLocation) -> TargetResponse {
    TargetResponse {
        key: target.id.get(),
        lat: target.position.lat(),
        lng: target.position.lng(),
    }
}

fn post_response(view: PostView) -> PostResponse {
    PostResponse {
        timestamp: view.post.created_at.timestamp_micros() as f64 / 1_000_000.0,
        picture_url: view.picture_url,
        final_distance: view.post.final_distance,
        text: view.post.text,
    }
}

async fn find_target(
    State(service): State<AppState>,
    Path(location): Path<String>,
) -> ApiResult<Json<ResolvedTargetResponse>> {
    let source = parse_location(&location)?;
    let resolution = service.find_target_near(source)?;
    let target = resolution.target();

    Ok(Json(ResolvedTargetResponse {
        key: target.id.get(),
        lat: target.position.lat(),
        lng: target.position.lng(),
        created: resolution.is_generated(),
        distance: resolution.distance(),
        bearing: bearing(source, target.position),
    }))
}

async fn get_target(
    State(service): State<AppState>,
    Path(key): Path<u64>,
) -> ApiResult<Json<TargetResponse>> {
    let target = service.target(&TargetIdentifier::new(key))?;
    Ok(Json(target_response(&target)))
}

async fn first_posts_page(
    State(service): State<AppState>,
    Path(key): Path<u64>,
) -> ApiResult<Json<PageResponse<PostResponse>>> {
    render_posts_page(&service, key, None)
}

async fn posts_page(
    State(service): State<AppState>,
    Path((key, page)): Path<(u64, usize)>,
) -> ApiResult<Json<PageResponse<PostResponse>>> {
    render_posts_page(&service, key, Some(page))
}

fn render_posts_page(
    service: &GameService,
    key: u64,
    page_number: Option<usize>,
) -> ApiResult<Json<PageResponse<PostResponse>>> {
    let page = service
        .posts_page(&TargetIdentifier::new(key), page_number)?
        .map(post_response);

    Ok(Json(PageResponse {
        data: page.items,
        page_number: page.page_number,
        last_page: page.is_last_page,
    }))
}

async fn create_post(
    State(service): State<AppState>,
    Path(key): Path<u64>,
    Json(request): Json<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<PostResponse>)> {
    let submission = PostSubmission {
        target_id: TargetIdentifier::new(key),
        text: request.text,
        submitted_from: Coordinate::new(request.lat, request.lng)?,
        image_id: request.picture_id.map(ImageIdentifier::new),
    };

    let post = service.create_post(submission)?;
    let view = service.view(post)?;

    Ok((StatusCode::CREATED, Json(post_response(view))))
}

async fn upload_image(
    State(service): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<ImageUploadResponse>)> {
    if body.is_empty() {
        return Err(ApiError::BadRequest("image body is empty".into()));
    }

    let id = service.upload_image(body.to_vec())?;
    Ok((
        StatusCode::CREATED,
        Json(ImageUploadResponse {
            picture_id: id.get(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_types::ErrorResponse;
    use axum::body::Body;
    use axum::http::{Request, Response, header};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    fn app() -> (Router, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new().with_image_base_url("https://img.example"));
        let service =
            GameService::with_store(GameConfig::default(), StdRng::seed_from_u64(11), store.clone())
                .unwrap();
        (create_router(Arc::new(service)), store)
    }

    async fn get(app: &Router, uri: &str) -> Response<Body> {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    async fn post_json(app: &Router, uri: &str, json: serde_json::Value) -> Response<Body> {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    async fn body<T: DeserializeOwned>(response: Response<Body>) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app();
        let response = get(&app, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_find_target_then_lookup_by_key() {
        let (app, store) = app();

        let response = get(&app, "/target/1.0,1.0").await;
        assert_eq!(response.status(), StatusCode::OK);
        let resolved: ResolvedTargetResponse = body(response).await;
        assert!(resolved.created);
        assert!((100.0 - 1e-3..=200.0 + 1e-3).contains(&resolved.distance));
        assert!((0.0..360.0).contains(&resolved.bearing));
        assert_eq!(store.target_count().unwrap(), 1);

        let from_target = format!("/target/{},{}", resolved.lat, resolved.lng);
        let again: ResolvedTargetResponse = body(get(&app, &from_target).await).await;
        assert!(!again.created);
        assert_eq!(again.key, resolved.key);
        assert!(again.distance < 1e-6);

        let response = get(&app, &format!("/target/key/{}", resolved.key)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let target: TargetResponse = body(response).await;
        assert_eq!(target.lat, resolved.lat);
        assert_eq!(target.lng, resolved.lng);
    }

    #[tokio::test]
    async fn test_missing_target_is_404() {
        let (app, _) = app();

        let response = get(&app, "/target/key/0").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: ErrorResponse = body(response).await;
        assert_eq!(error.error, "target_not_found");
    }

    #[tokio::test]
    async fn test_bad_locations_are_rejected() {
        let (app, store) = app();

        assert_eq!(get(&app, "/target/nowhere").await.status(), StatusCode::BAD_REQUEST);
        assert_eq!(get(&app, "/target/1.0,east").await.status(), StatusCode::BAD_REQUEST);

        let response = get(&app, "/target/95.0,1.0").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ErrorResponse = body(response).await;
        assert_eq!(error.error, "invalid_coordinate");

        assert_eq!(store.target_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_and_list_posts() {
        let (app, store) = app();
        let target = store
            .insert_target_at(Coordinate::new(1.0, 1.0).unwrap(), chrono_now())
            .unwrap();
        let key = target.id.get();

        let upload = Request::builder()
            .method("POST")
            .uri("/images")
            .body(Body::from(vec![0xffu8, 0xd8, 0xff]))
            .unwrap();
        let response = app.clone().oneshot(upload).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let uploaded: ImageUploadResponse = body(response).await;

        let response = post_json(
            &app,
            &format!("/posts/{key}"),
            serde_json::json!({"text": "test", "lat": 1.0, "lng": 1.0, "pictureId": uploaded.picture_id}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: PostResponse = body(response).await;
        assert_eq!(created.final_distance, 0.0);
        assert_eq!(created.picture_url.as_deref(), Some("https://img.example/1"));

        let page: PageResponse<PostResponse> = body(get(&app, &format!("/posts/{key}/1")).await).await;
        assert_eq!(page.data, vec![created.clone()]);
        assert_eq!(page.page_number, 1);
        assert!(page.last_page);

        let default_page: PageResponse<PostResponse> =
            body(get(&app, &format!("/posts/{key}")).await).await;
        assert_eq!(default_page, page);
    }

    #[tokio::test]
    async fn test_post_validation() {
        let (app, store) = app();
        let target = store
            .insert_target_at(Coordinate::new(0.0, 0.0).unwrap(), chrono_now())
            .unwrap();
        let key = target.id.get();

        let too_long = "x".repeat(141);
        let response = post_json(
            &app,
            &format!("/posts/{key}"),
            serde_json::json!({"text": too_long, "lat": 0.0, "lng": 0.0}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = post_json(
            &app,
            "/posts/999",
            serde_json::json!({"text": "hi", "lat": 0.0, "lng": 0.0}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = post_json(
            &app,
            &format!("/posts/{key}"),
            serde_json::json!({"text": "hi", "lat": 0.0, "lng": 200.0}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        assert_eq!(store.post_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_page_zero_is_rejected_and_past_end_is_empty() {
        let (app, store) = app();
        let target = store
            .insert_target_at(Coordinate::new(0.0, 0.0).unwrap(), chrono_now())
            .unwrap();
        let key = target.id.get();

        let response = get(&app, &format!("/posts/{key}/0")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let page: PageResponse<PostResponse> = body(get(&app, &format!("/posts/{key}/11")).await).await;
        assert!(page.data.is_empty());
        assert!(page.last_page);
    }

    #[tokio::test]
    async fn test_empty_image_upload_is_400() {
        let (app, _) = app();

        let upload = Request::builder()
            .method("POST")
            .uri("/images")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(upload).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ErrorResponse = body(response).await;
        assert_eq!(error.error, "bad_request");
    }

    #[tokio::test]
    async fn test_store_outage_is_503() {
        let (app, store) = app();
        store.set_available(false);

        let response = get(&app, "/target/1.0,1.0").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    fn chrono_now() -> chrono::DateTime<chrono::Utc> {
        chrono::Utc::now()
    }
}
