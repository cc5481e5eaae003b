use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::farmers::models::{RegisterFarmerRequest, UpdateFarmerRequest};
use crate::modules::farmers::services::FarmerService;
use crate::modules::history::controllers::history_controller;

/// Register a new farmer
/// POST /api/farmers
pub async fn register_farmer(
    service: web::Data<Arc<FarmerService>>,
    request: web::Json<RegisterFarmerRequest>,
) -> Result<HttpResponse, AppError> {
    let farmer = service.register_farmer(request.into_inner()).await?;

    Ok(HttpResponse::Created().json(farmer))
}

/// List all farmers
/// GET /api/farmers
pub async fn list_farmers(
    service: web::Data<Arc<FarmerService>>,
) -> Result<HttpResponse, AppError> {
    let farmers = service.list_farmers().await?;

    Ok(HttpResponse::Ok().json(farmers))
}

/// Get farmer by mobile number
/// GET /api/farmers/by-mobile/{number}
pub async fn get_by_mobile_number(
    service: web::Data<Arc<FarmerService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let farmer = service.get_by_mobile_number(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(farmer))
}

/// Update a farmer's name and/or mobile number
/// PUT /api/farmers/{id}
pub async fn update_farmer(
    service: web::Data<Arc<FarmerService>>,
    path: web::Path<String>,
    request: web::Json<UpdateFarmerRequest>,
) -> Result<HttpResponse, AppError> {
    let farmer = service
        .update_farmer(&path.into_inner(), request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(farmer))
}

/// Configure farmer routes
///
/// `/search` is registered ahead of `/{id}` so it is not captured as an id.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/farmers")
            .route("", web::post().to(register_farmer))
            .route("", web::get().to(list_farmers))
            .route("/search", web::get().to(history_controller::search_farmers))
            .route("/by-mobile/{number}", web::get().to(get_by_mobile_number))
            .route("/{id}", web::get().to(history_controller::get_farmer_with_bills))
            .route("/{id}", web::put().to(update_farmer)),
    );
}
