mod config;
mod error;
mod image_source;
mod routes;
mod service;
mod vision;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use aws_config::BehaviorVersion;
use aws_sdk_rekognition::Client as RekognitionClient;
use aws_sdk_rekognition::config::Region;
use config::{LabelerConfig, VisionProvider};
use image_source::HttpImageFetcher;
use routes::configure_routes;
use service::LabelService;
use std::path::Path;
use std::sync::Arc;
use vision::VisionClient;
use vision::fake_service::FakeVision;
use vision::rekognition_service::RekognitionService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = LabelerConfig::load().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    let vision: Arc<dyn VisionClient> = match config.vision_provider {
        VisionProvider::Rekognition => {
            let mut loader = aws_config::defaults(BehaviorVersion::latest());
            if let Some(region) = &config.aws_region {
                loader = loader.region(Region::new(region.clone()));
            }
            let aws_config = loader.load().await;
            log::info!(
                "Using Rekognition in region {}",
                aws_config
                    .region()
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "<unset>".to_string())
            );
            Arc::new(RekognitionService::new(RekognitionClient::new(&aws_config)))
        }
        VisionProvider::Fake => {
            log::warn!("Using the fake vision provider; labels are canned");
            Arc::new(FakeVision::sample())
        }
    };

    let fetcher = HttpImageFetcher::new(config.fetch_timeout(), config.max_image_bytes)
        .map_err(|e| std::io::Error::other(format!("HTTP client setup failed: {}", e)))?;

    let label_service = LabelService::new(Arc::new(fetcher), vision, config.label_query());
    log::info!(
        "Label limits: max_labels={}, min_confidence={}",
        config.max_labels,
        config.min_confidence
    );

    let frontend_dir = config.frontend_dir();
    let frontend_dir = if Path::new(&frontend_dir).is_dir() {
        log::info!("Serving frontend from {}", frontend_dir);
        Some(frontend_dir)
    } else {
        log::warn!("Frontend directory {} not found; serving the API only", frontend_dir);
        None
    };

    let max_request_bytes = config.max_request_bytes;
    let bind_address = config.bind_address();
    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .send_wildcard()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(web::Data::new(label_service.clone()))
            .configure(|cfg| configure_routes(cfg, frontend_dir.clone(), max_request_bytes))
    })
    .bind(&bind_address)?
    .run()
    .await
}
