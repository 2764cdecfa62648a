// src/session.rs

//! Renderable browser session.
//!
//! The review listing is rendered client-side, so the crawler drives a
//! headless Chrome instance instead of fetching static HTML.

use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

use headless_chrome::{Browser, LaunchOptions, Tab};
use log::debug;

use crate::config::CrawlerConfig;
use crate::error::{AppError, Result};

/// Capability surface the crawler needs from a rendered page.
///
/// Object-safe so tests can drive the crawl with a scripted fake. Opening
/// the target URL happens at construction; a failure there is fatal to the
/// whole run, while every method here degrades instead of failing it.
pub trait RenderSession {
    /// Block until an element matching `selector` exists.
    ///
    /// Returns `false` when the wait times out.
    fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<bool>;

    /// Inner text of every element matching `selector`, in document order.
    fn collect_texts(&mut self, selector: &str) -> Result<Vec<String>>;

    /// Click the first element matching `selector`.
    ///
    /// Returns `false` when no such element exists or the click fails.
    fn click(&mut self, selector: &str) -> Result<bool>;
}

/// Headless Chrome implementation of [`RenderSession`].
///
/// The browser process is owned by this struct, so dropping it tears the
/// session down on every exit path from a crawl.
pub struct ChromeSession {
    // Kept alive for the lifetime of the tab.
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeSession {
    /// Launch a browser and open `url`.
    pub fn open(url: &str, config: &CrawlerConfig) -> Result<Self> {
        let args: Vec<&OsStr> = [
            "--no-sandbox",
            "--disable-gpu",
            "--disable-dev-shm-usage",
            "--disable-software-rasterizer",
        ]
        .iter()
        .map(OsStr::new)
        .collect();

        let options = LaunchOptions::default_builder()
            .headless(config.headless)
            .sandbox(false)
            .args(args)
            .build()
            .map_err(AppError::session)?;

        let browser = Browser::new(options).map_err(AppError::session)?;
        let tab = browser.new_tab().map_err(AppError::session)?;
        tab.set_user_agent(&config.user_agent, None, None)
            .map_err(AppError::session)?;
        tab.navigate_to(url).map_err(AppError::session)?;
        tab.wait_until_navigated().map_err(AppError::session)?;

        Ok(Self {
            _browser: browser,
            tab,
        })
    }
}

impl RenderSession for ChromeSession {
    fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<bool> {
        match self
            .tab
            .wait_for_element_with_custom_timeout(selector, timeout)
        {
            Ok(_) => Ok(true),
            Err(e) => {
                debug!("wait for '{selector}' gave up: {e}");
                Ok(false)
            }
        }
    }

    fn collect_texts(&mut self, selector: &str) -> Result<Vec<String>> {
        // headless_chrome reports "no matching elements" as an error; the
        // crawler treats that as an empty page, not a failure.
        let elements = match self.tab.find_elements(selector) {
            Ok(elements) => elements,
            Err(e) => {
                debug!("no elements for '{selector}': {e}");
                return Ok(Vec::new());
            }
        };

        let mut texts = Vec::with_capacity(elements.len());
        for element in elements {
            match element.get_inner_text() {
                Ok(text) => texts.push(text),
                // A single stale element must not lose the rest of the page.
                Err(e) => debug!("skipping unreadable card: {e}"),
            }
        }
        Ok(texts)
    }

    fn click(&mut self, selector: &str) -> Result<bool> {
        let Ok(element) = self.tab.find_element(selector) else {
            return Ok(false);
        };
        Ok(element.click().is_ok())
    }
}
