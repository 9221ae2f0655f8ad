use std::sync::Arc;

use headless_chrome::{Browser, LaunchOptions, Tab};
use miette::miette;
use tracing::{debug, info, warn};

use crate::{
    config::{Configuration, ScrollSettings},
    extractor::ClipLinkExtractor,
    result::{Error, Result},
};

use super::PageFetcher;

/// Elements holding one video each in a profile page
const VIDEO_ITEM: &str = ".video-item";

/// HTTP status of the main document, 0 when the browser does not tell
const NAVIGATION_STATUS: &str =
    "performance.getEntriesByType('navigation')[0]?.responseStatus ?? 0";

/// Interface for a Chrome session rendering the pages.
///
/// The browser is launched on creation and closed on drop.
pub struct ChromeFetcher {
    // Dropped last, killing the browser process
    _browser: Browser,
    tab: Arc<Tab>,
    scroll: ScrollSettings,
}

impl ChromeFetcher {
    pub fn launch(config: &Configuration) -> Result<Self> {
        info!(
            "Launching the browser ({})",
            if config.headless { "headless" } else { "visible" }
        );

        let options = LaunchOptions::default_builder()
            .headless(config.headless)
            .build()
            .map_err(|err| miette!("Invalid browser options: {err}"))?;
        let browser =
            Browser::new(options).map_err(|err| miette!("Could not launch the browser: {err}"))?;
        let tab = browser
            .new_tab()
            .map_err(|err| miette!("Could not open a browser tab: {err}"))?;
        tab.set_default_timeout(config.timeout());

        Ok(Self {
            _browser: browser,
            tab,
            scroll: config.scroll.clone(),
        })
    }

    fn navigation_status(&self, url: &str) -> Result<Option<u64>> {
        let status = self
            .tab
            .evaluate(NAVIGATION_STATUS, false)
            .map_err(|err| Error::fetch(url, err))?;
        Ok(status.value.and_then(|value| value.as_u64()))
    }
}

impl PageFetcher for ChromeFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        debug!("Opening {url} in the browser");
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|err| Error::fetch(url, err))?;
        check_status(url, self.navigation_status(url)?)?;

        let html = self.tab.get_content().map_err(|err| Error::fetch(url, err))?;

        match ClipLinkExtractor::default().declared_video_count(&html) {
            Some(expected) => {
                let page = TabPage { tab: &self.tab, url };
                scroll_until_visible(&page, &self.scroll, expected)?;
                self.tab.get_content().map_err(|err| Error::fetch(url, err))
            }
            None => Ok(html),
        }
    }
}

impl Drop for ChromeFetcher {
    fn drop(&mut self) {
        debug!("Closing the browser");
        if let Err(err) = self.tab.close(true) {
            // Happens when the user already closed the window
            debug!("Could not close the browser tab: {err}");
        }
    }
}

/// A rendered page loading more videos as it scrolls
trait Scrollable {
    fn scroll_down(&self) -> Result<()>;
    fn visible_videos(&self) -> usize;
}

struct TabPage<'a> {
    tab: &'a Tab,
    url: &'a str,
}

impl Scrollable for TabPage<'_> {
    fn scroll_down(&self) -> Result<()> {
        self.tab
            .press_key("PageDown")
            .map_err(|err| Error::fetch(self.url, err))?;
        Ok(())
    }

    fn visible_videos(&self) -> usize {
        // Finding nothing is an error for headless_chrome
        self.tab.find_elements(VIDEO_ITEM).map_or(0, |items| items.len())
    }
}

/// A redirect is followed by the browser, so only errors are left to reject
fn check_status(url: &str, status: Option<u64>) -> Result<()> {
    match status {
        None | Some(0) | Some(200..=399) => Ok(()),
        Some(code) => Err(Error::fetch(url, format!("HTTP status {code}"))),
    }
}

/// Scroll down until the expected count of videos is visible, the count stops
/// growing or too many scrolls were made.
///
/// Return the number of visible videos.
fn scroll_until_visible(
    page: &dyn Scrollable,
    settings: &ScrollSettings,
    expected: usize,
) -> Result<usize> {
    let ScrollSettings {
        max_iterations,
        check_every,
        max_unchanged,
        ..
    } = *settings;

    let mut previous = page.visible_videos();
    if previous >= expected {
        return Ok(previous);
    }
    debug!("{previous}/{expected} videos visible, scrolling down");

    let mut unchanged = 0;
    for i in 1..=max_iterations {
        page.scroll_down()?;
        std::thread::sleep(settings.delay());

        if i % check_every.max(1) != 0 {
            continue;
        }

        let visible = page.visible_videos();
        if visible >= expected {
            debug!("All {expected} videos visible after {i} scrolls");
            return Ok(visible);
        }

        if visible == previous {
            unchanged += 1;
            if unchanged >= max_unchanged {
                warn!("Stopped scrolling after {i} scrolls, found {visible}/{expected} videos");
                return Ok(visible);
            }
        } else {
            unchanged = 0;
        }
        previous = visible;
    }

    let visible = page.visible_videos();
    warn!("Reached the maximum of {max_iterations} scrolls, found {visible}/{expected} videos");
    Ok(visible)
}
