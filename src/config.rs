use log::{warn, Level};
use serde::Deserialize;
use web_sys::Document;

/// Id of the optional JSON block a page can use to override the defaults.
pub const CONFIG_ELEMENT_ID: &str = "page-interactions-config";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoiDefaults {
    pub sales_reps: i64,
    pub cs_reps: i64,
    pub avg_deal_size: i64,
    pub close_rate: i64,
    pub cs_efficiency: i64,
}

impl Default for RoiDefaults {
    fn default() -> Self {
        Self {
            sales_reps: 50,
            cs_reps: 20,
            avg_deal_size: 50_000,
            close_rate: 25,
            cs_efficiency: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DelayConfig {
    /// Opportunity cost of one month of delay, in dollars.
    pub monthly_cost: i64,
    pub default_months: i64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            monthly_cost: 52_000,
            default_months: 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RevealConfig {
    pub selector: String,
    pub class: String,
    /// Fraction of the element that must be inside the inset viewport.
    pub threshold: f64,
    /// How far the bottom edge of the viewport is pulled in.
    pub bottom_margin_px: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selector: ".metric, .card, .timeline-item, .quote-card, .video-card".to_string(),
            class: "animate-in".to_string(),
            threshold: 0.1,
            bottom_margin_px: 50.0,
        }
    }
}

impl RevealConfig {
    pub fn root_margin(&self) -> String {
        format!("0px 0px -{}px 0px", self.bottom_margin_px)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub roi: RoiDefaults,
    pub delay: DelayConfig,
    pub reveal: RevealConfig,
}

impl Config {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Reads the override block if the page has one. Anything unreadable falls
    /// back to the built-in defaults.
    pub fn load(document: &Document) -> Self {
        let raw = document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content())
            .unwrap_or_default();

        if raw.trim().is_empty() {
            return Self::default();
        }

        match Self::from_json(&raw) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring #{}: {}", CONFIG_ELEMENT_ID, e);
                Self::default()
            }
        }
    }
}
