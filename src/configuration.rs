use serde::Deserialize;
use serde_aux::field_attributes::{
    deserialize_bool_from_anything, deserialize_number_from_string,
};

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub webdriver: WebdriverSettings,
    pub api_keys: ApiKeySettings,
}

#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub variant: AnalysisVariant,
}

// Picked once at startup, not per request.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisVariant {
    Query,
    Listing,
}

#[derive(Deserialize, Clone)]
pub struct WebdriverSettings {
    // Endpoint of a running chromedriver, e.g. http://localhost:9515
    pub server_url: String,
    #[serde(deserialize_with = "deserialize_bool_from_anything")]
    pub headless: bool,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub page_load_timeout_secs: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub initial_wait_secs: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub scroll_pause_secs: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_scroll_rounds: u8,
}

#[derive(Deserialize, Clone)]
pub struct ApiKeySettings {
    pub openai: String,
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let configuration_file = base_path.join("configuration.yaml");

    // APP_WEBDRIVER__SERVER_URL=... overrides webdriver.server_url etc.
    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_file))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
