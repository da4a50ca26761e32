use actix_files::Files;
use actix_web::http::header::ACCESS_CONTROL_ALLOW_ORIGIN;
use actix_web::{HttpResponse, web};
use serde_json::json;
use shared::{LabelRequest, LabelResponse};

use crate::error::LabelError;
use crate::service::LabelService;

pub fn configure_routes(
    cfg: &mut web::ServiceConfig,
    frontend_dir: Option<String>,
    max_request_bytes: usize,
) {
    cfg.service(
        web::resource("/label")
            .app_data(web::PayloadConfig::new(max_request_bytes))
            .route(web::post().to(label_image)),
    )
    .service(web::resource("/health").route(web::get().to(health)));

    // Registered last so it does not shadow the API routes.
    if let Some(dir) = frontend_dir {
        cfg.service(Files::new("/", dir).index_file("index.html"));
    }
}

async fn label_image(
    service: web::Data<LabelService>,
    body: web::Bytes,
) -> Result<HttpResponse, LabelError> {
    let request: LabelRequest = if body.iter().all(u8::is_ascii_whitespace) {
        LabelRequest::default()
    } else {
        serde_json::from_slice(&body)?
    };

    let labels = service.label(&request).await?;

    Ok(HttpResponse::Ok()
        .insert_header((ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .json(LabelResponse { labels }))
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MAX_REQUEST_BYTES;
    use crate::image_source::ImageFetcher;
    use crate::vision::LabelQuery;
    use crate::vision::fake_service::FakeVision;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use async_trait::async_trait;
    use serde_json::Value;
    use shared::Label;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct StubFetcher {
        response: Result<Vec<u8>, u16>,
        calls: AtomicUsize,
        urls: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        fn returning(bytes: &[u8]) -> Self {
            Self {
                response: Ok(bytes.to_vec()),
                calls: AtomicUsize::new(0),
                urls: Mutex::new(vec![]),
            }
        }

        fn failing_with_status(status: u16) -> Self {
            Self {
                response: Err(status),
                ..Self::returning(b"")
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ImageFetcher for StubFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, LabelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.urls.lock().unwrap().push(url.to_string());
            self.response.clone().map_err(LabelError::FetchStatus)
        }
    }

    async fn post_label(
        fetcher: Arc<StubFetcher>,
        vision: Arc<FakeVision>,
        request: test::TestRequest,
    ) -> (StatusCode, Option<String>, Value) {
        let service = LabelService::new(fetcher, vision, LabelQuery::default());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(service))
                .configure(|cfg| configure_routes(cfg, None, DEFAULT_MAX_REQUEST_BYTES)),
        )
        .await;

        let response = test::call_service(&app, request.uri("/label").to_request()).await;
        let status = response.status();
        let cors = response
            .headers()
            .get(ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|value| value.to_str().unwrap().to_string());
        let body: Value = test::read_body_json(response).await;
        (status, cors, body)
    }

    fn cat_vision() -> Arc<FakeVision> {
        Arc::new(FakeVision::new(vec![Label::new("Cat", 98.7)]))
    }

    #[actix_web::test]
    async fn test_url_request_returns_normalized_labels() {
        let fetcher = Arc::new(StubFetcher::returning(b"\xff\xd8jpeg"));
        let vision = cat_vision();

        let (status, cors, body) = post_label(
            fetcher.clone(),
            vision.clone(),
            test::TestRequest::post().set_json(json!({ "imageUrl": "https://example.com/cat.jpg" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(cors.as_deref(), Some("*"));
        assert_eq!(body, json!({ "labels": [{ "name": "Cat", "confidence": 98.7 }] }));
        assert_eq!(fetcher.urls.lock().unwrap().as_slice(), ["https://example.com/cat.jpg"]);
        assert_eq!(vision.last_image(), Some(b"\xff\xd8jpeg".to_vec()));
    }

    #[actix_web::test]
    async fn test_missing_image_is_rejected_without_outbound_calls() {
        let fetcher = Arc::new(StubFetcher::returning(b"unused"));
        let vision = cat_vision();

        let (status, cors, body) = post_label(
            fetcher.clone(),
            vision.clone(),
            test::TestRequest::post().set_json(json!({})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(cors.as_deref(), Some("*"));
        assert_eq!(body, json!({ "error": "Provide imageUrl or imageBase64" }));
        assert_eq!(vision.calls(), 0);
        assert_eq!(fetcher.calls(), 0);
    }

    #[actix_web::test]
    async fn test_empty_fields_and_empty_body_are_rejected() {
        for request in [
            test::TestRequest::post().set_json(json!({ "imageUrl": "", "imageBase64": "" })),
            test::TestRequest::post(),
        ] {
            let vision = cat_vision();
            let (status, _, _) =
                post_label(Arc::new(StubFetcher::returning(b"x")), vision.clone(), request).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(vision.calls(), 0);
        }
    }

    #[actix_web::test]
    async fn test_base64_takes_priority_over_url() {
        for body in [
            r#"{"imageUrl":"https://example.com/cat.jpg","imageBase64":"data:image/png;base64,aGVsbG8="}"#,
            r#"{"imageBase64":"data:image/png;base64,aGVsbG8=","imageUrl":"https://example.com/cat.jpg"}"#,
        ] {
            let fetcher = Arc::new(StubFetcher::returning(b"from-url"));
            let vision = cat_vision();

            let (status, _, _) = post_label(
                fetcher.clone(),
                vision.clone(),
                test::TestRequest::post()
                    .insert_header(("content-type", "application/json"))
                    .set_payload(body),
            )
            .await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(fetcher.calls(), 0);
            assert_eq!(vision.last_image(), Some(b"hello".to_vec()));
        }
    }

    #[actix_web::test]
    async fn test_malformed_base64_is_server_error() {
        let vision = cat_vision();
        let (status, cors, body) = post_label(
            Arc::new(StubFetcher::returning(b"x")),
            vision.clone(),
            test::TestRequest::post().set_json(json!({ "imageBase64": "data:image/png;base64,@@@" })),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(cors.as_deref(), Some("*"));
        assert!(body["error"].as_str().unwrap().starts_with("Invalid base64 image data"));
        assert_eq!(vision.calls(), 0);
    }

    #[actix_web::test]
    async fn test_invalid_json_is_server_error() {
        let (status, _, body) = post_label(
            Arc::new(StubFetcher::returning(b"x")),
            cat_vision(),
            test::TestRequest::post().set_payload("{not json"),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
    }

    #[actix_web::test]
    async fn test_fetch_failure_is_server_error() {
        let vision = cat_vision();
        let (status, cors, body) = post_label(
            Arc::new(StubFetcher::failing_with_status(404)),
            vision.clone(),
            test::TestRequest::post().set_json(json!({ "imageUrl": "https://example.com/missing.jpg" })),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(cors.as_deref(), Some("*"));
        assert_eq!(body, json!({ "error": "Image URL responded with status 404" }));
        assert_eq!(vision.calls(), 0);
    }

    #[actix_web::test]
    async fn test_empty_fetched_image_is_server_error() {
        let vision = cat_vision();
        let (status, _, body) = post_label(
            Arc::new(StubFetcher::returning(b"")),
            vision.clone(),
            test::TestRequest::post().set_json(json!({ "imageUrl": "https://example.com/empty.jpg" })),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Image payload is empty" }));
        assert_eq!(vision.calls(), 0);
    }

    #[actix_web::test]
    async fn test_vision_failure_exposes_message() {
        let vision = Arc::new(FakeVision::failing("InvalidImageFormatException"));
        let (status, cors, body) = post_label(
            Arc::new(StubFetcher::returning(b"not-an-image")),
            vision.clone(),
            test::TestRequest::post().set_json(json!({ "imageUrl": "https://example.com/cat.jpg" })),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(cors.as_deref(), Some("*"));
        assert_eq!(
            body,
            json!({ "error": "Vision service unavailable: InvalidImageFormatException" })
        );
        assert_eq!(vision.calls(), 1);
    }

    #[actix_web::test]
    async fn test_health() {
        let service = LabelService::new(
            Arc::new(StubFetcher::returning(b"x")),
            cat_vision(),
            LabelQuery::default(),
        );
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(service))
                .configure(|cfg| configure_routes(cfg, None, DEFAULT_MAX_REQUEST_BYTES)),
        )
        .await;

        let request = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(body, json!({ "status": "ok" }));
    }
}
