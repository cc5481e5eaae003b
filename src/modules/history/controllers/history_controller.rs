use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::history::services::HistoryService;

/// Query parameters for farmer search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Farmer with bills and summary
/// GET /api/farmers/{id}
pub async fn get_farmer_with_bills(
    service: web::Data<Arc<HistoryService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let history = service
        .get_farmer_with_bills(&path.into_inner(), Utc::now())
        .await?;

    Ok(HttpResponse::Ok().json(history))
}

/// Autocomplete search over the farmer directory
/// GET /api/farmers/search?q=
pub async fn search_farmers(
    service: web::Data<Arc<HistoryService>>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
    let result = service.search(&query.q).await?;

    Ok(HttpResponse::Ok().json(result))
}

// Routes are registered from the farmers scope so every /api/farmers path
// resolves through one resource table.
