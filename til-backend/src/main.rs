use actix_cors::Cors;
use actix_files::{Files, NamedFile};
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;

mod config;
mod controllers;
mod error;
mod til;

use config::Config;
use til::{CatalogCache, ContentStore, FsContentStore, RandomSource, ThreadRandom};

pub struct AppState {
    /// Timed snapshot of every note, used for random picks and listings
    pub cache: Arc<CatalogCache>,
    /// Direct access for lookups by path (always current)
    pub store: Arc<dyn ContentStore>,
    pub rng: Arc<dyn RandomSource>,
}

/// `index.html` of the built web UI
struct FrontendIndex(PathBuf);

/// Serve index.html for client-side routes like `/rust/my-cool-fact`
async fn spa_fallback(index: web::Data<FrontendIndex>) -> actix_web::Result<NamedFile> {
    Ok(NamedFile::open(&index.0)?)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            log::error!("{}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };
    let port = config.port;

    log::info!("TIL backend v{}", controllers::health::VERSION);
    log::info!("Content directory: {}", config.data_dir.display());
    log::info!("Catalog cache TTL: {}s", config.cache_ttl.as_secs());
    if !config.data_dir.is_dir() {
        log::warn!(
            "Content directory {} does not exist yet; every request will rescan until it does",
            config.data_dir.display()
        );
    }

    let store: Arc<dyn ContentStore> = Arc::new(FsContentStore::new(config.data_dir.clone()));
    let cache = Arc::new(CatalogCache::new(Arc::clone(&store), config.cache_ttl));
    let rng: Arc<dyn RandomSource> = Arc::new(ThreadRandom);

    let state = web::Data::new(AppState { cache, store, rng });

    let frontend_index = config.frontend_dist.join("index.html");
    let frontend_dist = if frontend_index.is_file() {
        log::info!("Serving frontend from: {}", config.frontend_dist.display());
        Some((config.frontend_dist.clone(), web::Data::new(FrontendIndex(frontend_index))))
    } else {
        log::info!("No frontend build at {}, serving API only", config.frontend_dist.display());
        None
    };

    log::info!("Listening on 0.0.0.0:{}", port);

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST"])
            .allow_any_header()
            .max_age(3600);

        let mut app = App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config_routes)
            .configure(controllers::til::config);

        // Serve static files only if frontend dist exists
        if let Some((dist, index)) = &frontend_dist {
            app = app.app_data(index.clone()).service(
                Files::new("/", dist.clone())
                    .index_file("index.html")
                    .default_handler(web::to(spa_fallback)),
            );
        }

        app
    })
    .bind(("0.0.0.0", port))?
    .run();

    let server_handle = server.handle();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            log::warn!("Failed to listen for Ctrl+C; graceful shutdown disabled");
            return;
        }
        log::info!("Received Ctrl+C, shutting down...");
        server_handle.stop(true).await;
        log::info!("Shutdown complete");
    });

    server.await
}
