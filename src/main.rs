use std::net::TcpListener;

use env_logger::Env;
use probe::{configuration::get_configuration, services::OpenaiClient, startup::run};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().expect("Failed to read configuration.");

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(address)?;

    // An empty configured key falls back to the OPENAI_API_KEY variable.
    let openai_client = match configuration.api_keys.openai.is_empty() {
        true => OpenaiClient::default(),
        false => OpenaiClient::new(configuration.api_keys.openai),
    };

    log::info!(
        "Serving the {:?} workbench on {}:{}",
        configuration.application.variant,
        configuration.application.host,
        configuration.application.port
    );

    run(
        listener,
        openai_client,
        configuration.webdriver,
        configuration.application.variant,
    )?
    .await
}
