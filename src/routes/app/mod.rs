pub mod analysis_route;
pub mod listing_route;
pub mod scraper_route;
