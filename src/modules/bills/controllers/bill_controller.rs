use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::bills::models::{CreateBillRequest, UpdateBillRequest};
use crate::modules::bills::services::BillService;

/// Create a bill for a registered farmer
/// POST /api/bills
pub async fn create_bill(
    service: web::Data<Arc<BillService>>,
    request: web::Json<CreateBillRequest>,
) -> Result<HttpResponse, AppError> {
    let bill = service.create_bill(request.into_inner()).await?;

    Ok(HttpResponse::Created().json(bill))
}

/// Get bill by ID
/// GET /api/bills/{id}
pub async fn get_bill(
    service: web::Data<Arc<BillService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let bill = service.get_bill(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(bill))
}

/// Replace a bill's transaction fields
/// PUT /api/bills/{id}
pub async fn update_bill(
    service: web::Data<Arc<BillService>>,
    path: web::Path<String>,
    request: web::Json<UpdateBillRequest>,
) -> Result<HttpResponse, AppError> {
    let bill = service
        .update_bill(&path.into_inner(), request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(bill))
}

/// Delete a bill and its history reference
/// DELETE /api/bills/{id}
pub async fn delete_bill(
    service: web::Data<Arc<BillService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.delete_bill(&path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Configure bill routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/bills")
            .route("", web::post().to(create_bill))
            .route("/{id}", web::get().to(get_bill))
            .route("/{id}", web::put().to(update_bill))
            .route("/{id}", web::delete().to(delete_bill)),
    );
}
