use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use thirtyfour::{
    error::WebDriverResult, extensions::cdp::ChromeDevTools, ChromeCapabilities,
    ChromiumLikeCapabilities, DesiredCapabilities, WebDriver,
};

use crate::configuration::WebdriverSettings;

pub const STEALTH_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[async_trait]
pub trait ScrollSurface {
    async fn document_height(&self) -> WebDriverResult<u64>;
    async fn scroll_to_bottom(&self) -> WebDriverResult<()>;
}

struct DriverSurface<'a> {
    driver: &'a WebDriver,
}

#[async_trait]
impl ScrollSurface for DriverSurface<'_> {
    async fn document_height(&self) -> WebDriverResult<u64> {
        self.driver
            .execute("return document.body.scrollHeight;", Vec::new())
            .await?
            .convert()
    }

    async fn scroll_to_bottom(&self) -> WebDriverResult<()> {
        self.driver
            .execute("window.scrollTo(0, document.body.scrollHeight);", Vec::new())
            .await?;
        Ok(())
    }
}

/// Scrolls to the bottom until the document height stops changing. Gives
/// up after `max_rounds` on pages that grow forever.
pub async fn settle_dynamic_content<S>(
    surface: &S,
    pause: Duration,
    max_rounds: u8,
) -> WebDriverResult<u8>
where
    S: ScrollSurface + Send + Sync,
{
    let mut last_height = surface.document_height().await?;
    let mut rounds = 0;

    while rounds < max_rounds {
        surface.scroll_to_bottom().await?;
        tokio::time::sleep(pause).await;
        rounds += 1;

        let new_height = surface.document_height().await?;
        if new_height == last_height {
            return Ok(rounds);
        }
        last_height = new_height;
    }

    log::warn!(
        "Scroll cap of {} rounds reached, proceeding with current page state",
        max_rounds
    );
    Ok(rounds)
}

fn stealth_capabilities(settings: &WebdriverSettings) -> WebDriverResult<ChromeCapabilities> {
    let mut caps = DesiredCapabilities::chrome();
    caps.add_arg("--disable-blink-features=AutomationControlled")?;
    caps.add_arg("--disable-http2")?;
    caps.add_arg("--window-size=1920,1080")?;
    caps.add_arg(&format!("--user-agent={}", STEALTH_USER_AGENT))?;
    caps.add_experimental_option("excludeSwitches", ["enable-automation"])?;
    caps.add_experimental_option("useAutomationExtension", false)?;
    if settings.headless {
        caps.set_headless()?;
    }
    Ok(caps)
}

/// Returns the rendered page source once dynamic content has settled. The
/// browser session is closed on every path.
pub async fn fetch_rendered_page(
    settings: &WebdriverSettings,
    url: &str,
) -> WebDriverResult<String> {
    let caps = stealth_capabilities(settings)?;
    let driver = WebDriver::new(&settings.server_url, caps).await?;

    let outcome = navigate_and_capture(&driver, settings, url).await;

    if let Err(e) = driver.quit().await {
        log::error!("Failed to close browser session: {}", e);
    }

    outcome
}

async fn navigate_and_capture(
    driver: &WebDriver,
    settings: &WebdriverSettings,
    url: &str,
) -> WebDriverResult<String> {
    driver
        .set_page_load_timeout(Duration::from_secs(settings.page_load_timeout_secs))
        .await?;

    // Some requests ignore the --user-agent launch argument; the CDP
    // override covers those too.
    let dev_tools = ChromeDevTools::new(driver.handle.clone());
    dev_tools
        .execute_cdp_with_params(
            "Network.setUserAgentOverride",
            json!({ "userAgent": STEALTH_USER_AGENT }),
        )
        .await?;

    driver.goto(url).await?;
    tokio::time::sleep(Duration::from_secs(settings.initial_wait_secs)).await;

    let surface = DriverSurface { driver };
    let rounds = settle_dynamic_content(
        &surface,
        Duration::from_secs(settings.scroll_pause_secs),
        settings.max_scroll_rounds,
    )
    .await?;
    log::info!("Page settled after {} scroll rounds", rounds);

    driver.source().await
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct ScriptedPage {
        heights: Vec<u64>,
        reads: Mutex<usize>,
    }

    impl ScriptedPage {
        // Heights returned by successive reads; the last one repeats.
        fn new(heights: Vec<u64>) -> Self {
            ScriptedPage {
                heights,
                reads: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl ScrollSurface for ScriptedPage {
        async fn document_height(&self) -> WebDriverResult<u64> {
            let mut reads = self.reads.lock().unwrap();
            let height = self.heights[(*reads).min(self.heights.len() - 1)];
            *reads += 1;
            Ok(height)
        }

        async fn scroll_to_bottom(&self) -> WebDriverResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn stable_page_settles_after_one_round() {
        let page = ScriptedPage::new(vec![1000, 1000]);

        let rounds = settle_dynamic_content(&page, Duration::from_millis(0), 20)
            .await
            .unwrap();

        assert_eq!(rounds, 1);
    }

    #[tokio::test]
    async fn growing_page_scrolls_until_height_stops_changing() {
        let page = ScriptedPage::new(vec![1000, 1500, 2000, 2000]);

        let rounds = settle_dynamic_content(&page, Duration::from_millis(0), 20)
            .await
            .unwrap();

        assert_eq!(rounds, 3);
    }

    #[tokio::test]
    async fn runaway_page_stops_at_the_round_cap() {
        let page = ScriptedPage::new((0..100).map(|i| 1000 + i * 100).collect());

        let rounds = settle_dynamic_content(&page, Duration::from_millis(0), 4)
            .await
            .unwrap();

        assert_eq!(rounds, 4);
    }
}
