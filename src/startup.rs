use std::net::TcpListener;

use actix_files::Files;
use actix_web::{
    dev::Server,
    middleware::Logger,
    web::{self, Data},
    App, HttpServer,
};
use tokio::sync::RwLock;

use crate::{
    configuration::{AnalysisVariant, WebdriverSettings},
    domain::session::Session,
    routes::{analysis_route, default_route, listing_route, scraper_route},
    services::OpenaiClient,
};

pub fn run(
    listener: TcpListener,
    openai_client: OpenaiClient,
    webdriver_settings: WebdriverSettings,
    variant: AnalysisVariant,
) -> Result<Server, std::io::Error> {
    let session = Data::new(RwLock::new(Session::new()));
    let openai_client = Data::new(openai_client);
    let webdriver_settings = Data::new(webdriver_settings);
    let variant = Data::new(variant);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .service(Files::new("/static", "./templates/static").prefer_utf8(true))
            .service(default_route::default)
            .service(
                web::scope("/app")
                    .service(scraper_route::scraper_page)
                    .service(scraper_route::scrape)
                    .service(analysis_route::analyze)
                    .service(listing_route::export_csv)
                    .service(listing_route::export_xlsx),
            )
            .app_data(session.clone())
            .app_data(openai_client.clone())
            .app_data(webdriver_settings.clone())
            .app_data(variant.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
