use std::future::Future;

use actix_web::{get, post, web, HttpResponse};
use askama::Template;
use serde::Deserialize;
use thirtyfour::error::WebDriverResult;
use tokio::sync::RwLock;
use url::Url;

use crate::{
    configuration::{AnalysisVariant, WebdriverSettings},
    domain::{
        listing::tabulate_listings,
        session::{Phase, Session},
    },
    services,
};

#[derive(Debug, PartialEq)]
pub enum Flash {
    None,
    Success(String),
    Error(String),
}

struct ResultView {
    pub heading: String,
    pub text: String,
    pub failed: bool,
}

struct ListingView {
    pub section: String,
    pub location: String,
    pub price: String,
    pub property_type: String,
    pub size: String,
    pub developer: String,
}

#[derive(Template)]
#[template(path = "scraper.html")]
struct ScraperTemplate {
    variant_is_listing: bool,
    url: String,
    has_content: bool,
    content: String,
    busy_fetching: bool,
    busy_analyzing: bool,
    flash_success: String,
    flash_error: String,
    has_results: bool,
    results: Vec<ResultView>,
    listings: Vec<ListingView>,
}

pub fn render_workbench(
    session: &Session,
    variant: AnalysisVariant,
    flash: Flash,
) -> HttpResponse {
    let (flash_success, flash_error) = match flash {
        Flash::None => (String::new(), String::new()),
        Flash::Success(message) => (message, String::new()),
        Flash::Error(message) => (String::new(), message),
    };

    let variant_is_listing = variant == AnalysisVariant::Listing;

    let results: Vec<ResultView> = session
        .results()
        .iter()
        .map(|analysis| ResultView {
            heading: format!("Analysis Part {}", analysis.index),
            text: analysis.display_text(),
            failed: analysis.is_failed(),
        })
        .collect();

    let listings = match variant_is_listing {
        true => tabulate_listings(session.results())
            .into_iter()
            .map(|row| ListingView {
                section: row.section,
                location: row.record.location,
                price: row.record.price,
                property_type: row.record.property_type,
                size: row.record.size,
                developer: row.record.developer,
            })
            .collect(),
        false => vec![],
    };

    HttpResponse::Ok().body(
        ScraperTemplate {
            variant_is_listing,
            url: session.source_url().unwrap_or("").to_string(),
            has_content: session.cleaned_content().is_some(),
            content: session.cleaned_content().unwrap_or("").to_string(),
            busy_fetching: session.phase() == Phase::Fetching,
            busy_analyzing: session.phase() == Phase::Analyzing,
            flash_success,
            flash_error,
            has_results: !results.is_empty(),
            results,
            listings,
        }
        .render()
        .unwrap(),
    )
}

#[get("/scraper")]
async fn scraper_page(
    session: web::Data<RwLock<Session>>,
    variant: web::Data<AnalysisVariant>,
) -> HttpResponse {
    let session = session.read().await;
    render_workbench(&session, *variant.get_ref(), Flash::None)
}

#[derive(Deserialize)]
struct ScrapeForm {
    url: String,
}

/// Claims the session, runs the fetch, and records the outcome. Spawned
/// detached so a dropped request future cannot strand the session in
/// `Fetching` or skip the browser teardown.
async fn scrape_into_session<F>(
    session: web::Data<RwLock<Session>>,
    url: String,
    fetch: F,
) -> Flash
where
    F: Future<Output = WebDriverResult<String>>,
{
    // Claim the session before the slow part; the lock is not held while
    // the browser works.
    {
        let mut session = session.write().await;
        if let Err(e) = session.begin_fetch() {
            return Flash::Error(e.to_string());
        }
    }

    match fetch.await {
        Ok(html) => {
            let content = services::clean_page_text(&html);
            let mut session = session.write().await;
            session.complete_fetch(url, content);
            Flash::Success("Website scraped successfully!".to_string())
        }
        Err(e) => {
            log::error!("Failed to scrape {}: {}", url, e);
            let mut session = session.write().await;
            session.fail_fetch();
            Flash::Error("Failed to scrape the website. Please try again.".to_string())
        }
    }
}

#[post("/scrape")]
async fn scrape(
    form: web::Form<ScrapeForm>,
    session: web::Data<RwLock<Session>>,
    webdriver: web::Data<WebdriverSettings>,
    variant: web::Data<AnalysisVariant>,
) -> HttpResponse {
    let variant = *variant.get_ref();
    let url = form.url.trim().to_string();

    if Url::parse(&url).is_err() {
        let session = session.read().await;
        return render_workbench(
            &session,
            variant,
            Flash::Error("Please enter a valid URL".to_string()),
        );
    }

    log::info!("Scraping {}", url);

    // Actix drops this request future when the client disconnects; the
    // spawned task carries the fetch through to a terminal phase anyway.
    let page_url = url.clone();
    let fetch = async move { services::fetch_rendered_page(&webdriver, &page_url).await };
    let task = tokio::spawn(scrape_into_session(session.clone(), url, fetch));

    let flash = match task.await {
        Ok(flash) => flash,
        Err(e) => {
            log::error!("Scrape task failed: {}", e);
            Flash::Error("Failed to scrape the website. Please try again.".to_string())
        }
    };

    let session = session.read().await;
    render_workbench(&session, variant, flash)
}
