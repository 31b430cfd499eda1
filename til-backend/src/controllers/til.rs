//! TIL REST API: read-only endpoints for the web UI.
//!
//! Random pick, filtered listing, and direct lookup by path. Listing and random
//! picks go through the catalog cache; lookups read the file directly.

use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use til_types::ErrorResponse;

use crate::error::TilError;
use crate::til::selection;
use crate::AppState;

#[derive(Debug, Deserialize)]
struct CategoriesQuery {
    categories: Option<String>,
}

// --- Random ---

/// One random TIL from the whole catalog
async fn random_til(data: web::Data<AppState>) -> impl Responder {
    let catalog = data.cache.get_catalog().await;

    match selection::pick_random(&catalog, None, data.rng.as_ref()) {
        Some(entry) => HttpResponse::Ok().json(entry),
        None => HttpResponse::NotFound().json(ErrorResponse::new("No TIL entries found")),
    }
}

/// One random TIL, optionally limited to `?categories=Go,Rust`
async fn random_til_filtered(
    data: web::Data<AppState>,
    query: web::Query<CategoriesQuery>,
) -> impl Responder {
    let filter = selection::parse_categories(query.categories.as_deref());
    let catalog = data.cache.get_catalog().await;

    match selection::pick_random(&catalog, filter.as_deref(), data.rng.as_ref()) {
        Some(entry) => HttpResponse::Ok().json(entry),
        None => {
            let message = if filter.is_some() {
                "No TIL entries found for selected categories"
            } else {
                "No TIL entries found"
            };
            HttpResponse::NotFound().json(ErrorResponse::new(message))
        }
    }
}

// --- List ---

async fn list_tils(
    data: web::Data<AppState>,
    query: web::Query<CategoriesQuery>,
) -> impl Responder {
    let filter = selection::parse_categories(query.categories.as_deref());
    let catalog = data.cache.get_catalog().await;

    HttpResponse::Ok().json(selection::list_filtered(&catalog, filter.as_deref()))
}

// --- Lookup ---

/// Read one TIL by its relative path; `.md` is optional
async fn get_til(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let requested = path.into_inner();

    match data.store.get_by_path(&requested).await {
        Ok(entry) => HttpResponse::Ok().json(entry),
        Err(e) if e.is_not_found() => {
            HttpResponse::NotFound().json(ErrorResponse::new("TIL not found"))
        }
        Err(TilError::InvalidPath(p)) => {
            log::warn!("[TIL] Rejected lookup path {:?}", p);
            HttpResponse::BadRequest().json(ErrorResponse::new("Invalid TIL path"))
        }
        Err(e) => {
            log::error!("[TIL] Failed to read {}: {}", requested, e);
            HttpResponse::InternalServerError().json(ErrorResponse::new("Failed to fetch TIL"))
        }
    }
}

// --- Cache ---

async fn catalog_info(data: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(data.cache.info())
}

/// Force a rescan of the content directory
async fn refresh_catalog(data: web::Data<AppState>) -> impl Responder {
    data.cache.invalidate();
    data.cache.get_catalog().await;
    HttpResponse::Ok().json(data.cache.info())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/til")
            .route("", web::get().to(random_til))
            .route("/all", web::get().to(list_tils))
            .route("/random", web::get().to(random_til_filtered))
            .route("/info", web::get().to(catalog_info))
            .route("/refresh", web::post().to(refresh_catalog))
            // Catch-all lookup must stay last
            .route("/{path:.*}", web::get().to(get_til)),
    );
}
