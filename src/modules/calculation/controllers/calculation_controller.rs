use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::calculation::models::CalculationRequest;
use crate::modules::calculation::services::BillCalculator;

/// Preview derived bill figures without storing anything
/// POST /api/calculations
pub async fn calculate(request: web::Json<CalculationRequest>) -> Result<HttpResponse, AppError> {
    let result = BillCalculator::new().calculate(&request.to_input());

    Ok(HttpResponse::Ok().json(result))
}

/// Configure calculation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/calculations", web::post().to(calculate));
}
