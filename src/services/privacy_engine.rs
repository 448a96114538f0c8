//! Privacy Engine for Prism.
//!
//! Handles ad and tracker blocking and the host privacy actions (clearing
//! the webview cache and cookies).
//!
//! With the `network` feature, blocking is done by Brave's `adblock` engine,
//! seeded with bundled rules and optionally upgraded to EasyList and
//! EasyPrivacy once those have been downloaded in the background. Without
//! it, a fixed list of tracker domains is matched instead.

use tracing::{error, info};

#[cfg(feature = "network")]
use tokio::runtime::Handle;
#[cfg(feature = "network")]
use tokio::sync::mpsc;
#[cfg(feature = "network")]
use tracing::warn;

use crate::host::HostSession;
#[cfg(feature = "network")]
use crate::types::errors::PrivacyError;
use crate::types::privacy::{AdBlockStatus, ClearDataResult, ResourceType};

/// Trait defining privacy engine operations.
pub trait PrivacyEngineTrait {
    fn set_ad_block_enabled(&mut self, enabled: bool);
    fn is_ad_block_enabled(&self) -> bool;
    /// Checks a request against the filters and counts it when blocked.
    fn should_block_request(&mut self, url: &str, source_url: &str, resource_type: ResourceType) -> bool;
    /// Swaps in downloaded filter lists if they have arrived. Returns true
    /// when the filters changed.
    fn poll_updates(&mut self) -> bool;
    fn status(&self) -> AdBlockStatus;
    fn clear_cache(&self, host: &dyn HostSession) -> ClearDataResult;
    fn clear_cookies(&self, host: &dyn HostSession) -> ClearDataResult;
}

/// Filter lists fetched when remote lists are enabled.
#[cfg(feature = "network")]
pub const FILTER_LIST_URLS: &[&str] = &[
    "https://easylist.to/easylist/easylist.txt",
    "https://easylist.to/easylist/easyprivacy.txt",
];

/// Rules the engine starts with before any list is downloaded.
#[cfg(feature = "network")]
pub const DEFAULT_RULES: &[&str] = &[
    // Google advertising
    "||doubleclick.net^",
    "||googlesyndication.com^",
    "||googleadservices.com^",
    "||adservice.google.com^",
    "||google-analytics.com^",
    "||googletagmanager.com^",
    // Social media ads/tracking
    "||ads.twitter.com^",
    "||facebook.com/tr^",
    "||connect.facebook.net^",
    "||pixel.facebook.com^",
    // Ad networks
    "||amazon-adsystem.com^",
    "||adnxs.com^",
    "||adsrvr.org^",
    "||taboola.com^",
    "||outbrain.com^",
    "||criteo.com^",
    "||rubiconproject.com^",
    "||pubmatic.com^",
    "||openx.net^",
    "||casalemedia.com^",
    // Analytics
    "||scorecardresearch.com^",
    "||quantserve.com^",
    "||hotjar.com^",
    "||mixpanel.com^",
    "||segment.io^",
    "||bat.bing.com^",
];

/// Known tracker domains for basic blocking without the adblock crate.
#[cfg(not(feature = "network"))]
const TRACKER_DOMAINS: &[&str] = &[
    "doubleclick.net", "googlesyndication.com", "googleadservices.com",
    "adservice.google.com", "google-analytics.com", "googletagmanager.com",
    "ads.twitter.com", "facebook.com/tr", "connect.facebook.net",
    "pixel.facebook.com", "amazon-adsystem.com", "adnxs.com", "adsrvr.org",
    "taboola.com", "outbrain.com", "criteo.com", "rubiconproject.com",
    "pubmatic.com", "openx.net", "casalemedia.com", "scorecardresearch.com",
    "quantserve.com", "hotjar.com", "mixpanel.com", "segment.io", "bat.bing.com",
];

/// Compiled filters.
#[cfg(feature = "network")]
struct AdBlocker {
    engine: adblock::Engine,
    rules: usize,
}

#[cfg(feature = "network")]
impl AdBlocker {
    fn with_default_rules() -> Self {
        Self::from_rules(DEFAULT_RULES.iter().copied())
    }

    fn from_rules<'a>(rules: impl Iterator<Item = &'a str>) -> Self {
        let rules: Vec<&str> = rules
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('!') && !l.starts_with('['))
            .collect();
        let count = rules.len();
        let engine = adblock::Engine::from_rules(rules, adblock::lists::ParseOptions::default());
        Self {
            engine,
            rules: count,
        }
    }

    /// Defaults plus the rules of a downloaded filter list.
    fn from_filter_list(list: &str) -> Self {
        Self::from_rules(DEFAULT_RULES.iter().copied().chain(list.lines()))
    }

    fn matches(&self, url: &str, source_url: &str, resource_type: ResourceType) -> bool {
        match adblock::request::Request::new(url, source_url, resource_type.as_str()) {
            Ok(request) => self.engine.check_network_request(&request).matched,
            Err(e) => {
                warn!(url, error = ?e, "unparseable request url");
                false
            }
        }
    }
}

#[cfg(not(feature = "network"))]
struct AdBlocker {
    rules: usize,
}

#[cfg(not(feature = "network"))]
impl AdBlocker {
    fn with_default_rules() -> Self {
        Self {
            rules: TRACKER_DOMAINS.len(),
        }
    }

    fn matches(&self, url: &str, _source_url: &str, _resource_type: ResourceType) -> bool {
        let url_lower = url.to_lowercase();
        TRACKER_DOMAINS.iter().any(|domain| url_lower.contains(domain))
    }
}

/// Privacy engine implementation.
pub struct PrivacyEngine {
    blocker: Option<AdBlocker>,
    requests_blocked: u64,
    #[cfg(feature = "network")]
    remote: Option<Handle>,
    #[cfg(feature = "network")]
    downloads: Option<mpsc::UnboundedReceiver<Result<String, PrivacyError>>>,
}

impl PrivacyEngine {
    /// A disabled engine. Call `set_ad_block_enabled(true)` to build filters.
    pub fn new() -> Self {
        Self {
            blocker: None,
            requests_blocked: 0,
            #[cfg(feature = "network")]
            remote: None,
            #[cfg(feature = "network")]
            downloads: None,
        }
    }

    /// Downloads EasyList and EasyPrivacy on `handle` whenever blocking is
    /// enabled.
    #[cfg(feature = "network")]
    pub fn with_remote_lists(mut self, handle: Handle) -> Self {
        self.remote = Some(handle);
        self
    }

    #[cfg(feature = "network")]
    fn start_download(&mut self) {
        let Some(handle) = &self.remote else {
            return;
        };
        let (tx, rx) = mpsc::unbounded_channel();
        handle.spawn(async move {
            // The receiver is gone if blocking was disabled meanwhile.
            let _ = tx.send(fetch_filter_lists().await);
        });
        self.downloads = Some(rx);
    }
}

impl Default for PrivacyEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "network")]
async fn fetch_filter_lists() -> Result<String, PrivacyError> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("prism/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| PrivacyError::FilterListError(e.to_string()))?;

    let mut combined = String::new();
    for url in FILTER_LIST_URLS {
        let text = client
            .get(*url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| PrivacyError::FilterListError(format!("{}: {}", url, e)))?
            .text()
            .await
            .map_err(|e| PrivacyError::FilterListError(format!("{}: {}", url, e)))?;
        combined.push_str(&text);
        combined.push('\n');
    }
    Ok(combined)
}

fn clear_result(action: &str, outcome: Result<(), crate::types::errors::HostError>) -> ClearDataResult {
    match outcome {
        Ok(()) => {
            info!(action, "browsing data cleared");
            ClearDataResult::ok()
        }
        Err(e) => {
            error!(action, error = %e, "failed to clear browsing data");
            ClearDataResult::failed(e.to_string())
        }
    }
}

impl PrivacyEngineTrait for PrivacyEngine {
    /// Enabling compiles the bundled rules immediately; disabling drops the
    /// filters and any download in flight.
    fn set_ad_block_enabled(&mut self, enabled: bool) {
        if enabled == self.blocker.is_some() {
            return;
        }
        if enabled {
            self.blocker = Some(AdBlocker::with_default_rules());
            #[cfg(feature = "network")]
            self.start_download();
        } else {
            self.blocker = None;
            #[cfg(feature = "network")]
            {
                self.downloads = None;
            }
        }
        info!(enabled, "ad blocking toggled");
    }

    fn is_ad_block_enabled(&self) -> bool {
        self.blocker.is_some()
    }

    fn should_block_request(&mut self, url: &str, source_url: &str, resource_type: ResourceType) -> bool {
        let Some(blocker) = &self.blocker else {
            return false;
        };
        let blocked = blocker.matches(url, source_url, resource_type);
        if blocked {
            self.requests_blocked += 1;
            tracing::debug!(url, "request blocked");
        }
        blocked
    }

    #[cfg(feature = "network")]
    fn poll_updates(&mut self) -> bool {
        let Some(rx) = &mut self.downloads else {
            return false;
        };
        match rx.try_recv() {
            Ok(Ok(list)) => {
                let blocker = AdBlocker::from_filter_list(&list);
                info!(rules = blocker.rules, "filter lists loaded");
                self.blocker = Some(blocker);
                self.downloads = None;
                true
            }
            Ok(Err(e)) => {
                warn!(error = %e, "filter list download failed; keeping bundled rules");
                self.downloads = None;
                false
            }
            Err(mpsc::error::TryRecvError::Empty) => false,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                self.downloads = None;
                false
            }
        }
    }

    #[cfg(not(feature = "network"))]
    fn poll_updates(&mut self) -> bool {
        false
    }

    fn status(&self) -> AdBlockStatus {
        AdBlockStatus {
            enabled: self.blocker.is_some(),
            rules: self.blocker.as_ref().map_or(0, |b| b.rules),
            requests_blocked: self.requests_blocked,
        }
    }

    fn clear_cache(&self, host: &dyn HostSession) -> ClearDataResult {
        clear_result("cache", host.clear_cache())
    }

    fn clear_cookies(&self, host: &dyn HostSession) -> ClearDataResult {
        clear_result("cookies", host.clear_cookies())
    }
}
