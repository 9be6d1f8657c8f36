use actix_web::{get, web, HttpResponse};
use tokio::sync::RwLock;

use crate::{
    configuration::AnalysisVariant,
    domain::{
        listing::{tabulate_listings, ListingRow},
        session::Session,
    },
    services,
};

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";
const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[get("/export/csv")]
async fn export_csv(
    session: web::Data<RwLock<Session>>,
    variant: web::Data<AnalysisVariant>,
) -> HttpResponse {
    let rows = match exportable_rows(&session, *variant.get_ref()).await {
        Ok(rows) => rows,
        Err(message) => return HttpResponse::BadRequest().body(message),
    };

    match services::listings_to_csv(&rows) {
        Ok(bytes) => HttpResponse::Ok()
            .content_type(CSV_CONTENT_TYPE)
            .insert_header((
                "Content-Disposition",
                "attachment; filename=\"listings.csv\"",
            ))
            .body(bytes),
        Err(e) => {
            log::error!("CSV export failed: {}", e);
            HttpResponse::InternalServerError().body("Export failed")
        }
    }
}

#[get("/export/xlsx")]
async fn export_xlsx(
    session: web::Data<RwLock<Session>>,
    variant: web::Data<AnalysisVariant>,
) -> HttpResponse {
    let rows = match exportable_rows(&session, *variant.get_ref()).await {
        Ok(rows) => rows,
        Err(message) => return HttpResponse::BadRequest().body(message),
    };

    match services::listings_to_xlsx(&rows) {
        Ok(bytes) => HttpResponse::Ok()
            .content_type(XLSX_CONTENT_TYPE)
            .insert_header((
                "Content-Disposition",
                "attachment; filename=\"listings.xlsx\"",
            ))
            .body(bytes),
        Err(e) => {
            log::error!("XLSX export failed: {}", e);
            HttpResponse::InternalServerError().body("Export failed")
        }
    }
}

async fn exportable_rows(
    session: &RwLock<Session>,
    variant: AnalysisVariant,
) -> Result<Vec<ListingRow>, String> {
    if variant != AnalysisVariant::Listing {
        return Err("Exports are only available in listing mode".to_string());
    }

    let session = session.read().await;
    let rows = tabulate_listings(session.results());
    match rows.is_empty() {
        true => Err("Run an analysis before exporting".to_string()),
        false => Ok(rows),
    }
}
