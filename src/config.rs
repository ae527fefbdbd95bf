use log::warn;
use serde::de::Error as _;
use serde::Deserialize;
use web_sys::Document;

/// Id of the optional inline JSON block that overrides [`Settings`].
pub const CONFIG_ELEMENT_ID: &str = "site-config";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub section_offset: f64,
    pub home_section: String,
    pub highlight_debounce_ms: u32,
    pub navbar_scrolled_after: f64,
    pub fade_threshold: f64,
    pub fade_root_margin: String,
    pub swipe_threshold: f64,
    pub video_step: f64,
    pub gallery_step: f64,
    pub stats_threshold: f64,
    pub counter_duration_ms: f64,
    pub counter_frame_ms: f64,
    pub fallback_delay_ms: u32,
    pub lazy_threshold: f64,
    pub scroll_top_after: f64,
    pub preload: Vec<String>,
    pub contact_acknowledgement: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            section_offset: 100.0,
            home_section: "home".to_string(),
            highlight_debounce_ms: 50,
            navbar_scrolled_after: 50.0,
            fade_threshold: 0.1,
            fade_root_margin: "0px 0px -50px 0px".to_string(),
            swipe_threshold: 50.0,
            video_step: 500.0,
            gallery_step: 450.0,
            stats_threshold: 0.5,
            counter_duration_ms: 2000.0,
            counter_frame_ms: 16.0,
            fallback_delay_ms: 3000,
            lazy_threshold: 0.1,
            scroll_top_after: 500.0,
            preload: vec!["main.jpg".to_string(), "sub_main.jpg".to_string()],
            contact_acknowledgement: "Thank you for your message! I will get back to you soon."
                .to_string(),
        }
    }
}

impl Settings {
    /// Parses an override block. Counter timings must be positive.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let settings: Self = serde_json::from_str(raw)?;
        if settings.counter_duration_ms <= 0.0 {
            return Err(serde_json::Error::custom("counterDurationMs must be positive"));
        }
        if settings.counter_frame_ms <= 0.0 {
            return Err(serde_json::Error::custom("counterFrameMs must be positive"));
        }
        Ok(settings)
    }

    /// Reads overrides from `<script type="application/json" id="site-config">`.
    /// Falls back to the defaults when the block is missing or malformed.
    pub fn from_document(document: &Document) -> Self {
        let raw = document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content())
            .filter(|text| !text.trim().is_empty());

        match raw {
            Some(raw) => Self::from_json(&raw).unwrap_or_else(|e| {
                warn!("Ignoring invalid #{} block: {}", CONFIG_ELEMENT_ID, e);
                Self::default()
            }),
            None => Self::default(),
        }
    }
}

#[cfg(debug_assertions)]
pub fn log_level() -> log::Level {
    log::Level::Debug
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> log::Level {
    log::Level::Info
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_keeps_defaults() {
        assert_eq!(Settings::from_json("{}").unwrap(), Settings::default());
    }

    #[test]
    fn partial_override_only_touches_named_keys() {
        let settings =
            Settings::from_json(r#"{"videoStep": 640, "preload": ["hero.webp"]}"#).unwrap();
        assert_eq!(settings.video_step, 640.0);
        assert_eq!(settings.preload, vec!["hero.webp".to_string()]);
        assert_eq!(settings.gallery_step, 450.0);
        assert_eq!(settings.fallback_delay_ms, 3000);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(Settings::from_json("{videoStep: }").is_err());
        assert!(Settings::from_json(r#"{"videoStep": "wide"}"#).is_err());
    }

    #[test]
    fn non_positive_counter_timings_are_rejected() {
        assert!(Settings::from_json(r#"{"counterFrameMs": 0}"#).is_err());
        assert!(Settings::from_json(r#"{"counterDurationMs": 0}"#).is_err());
        assert!(Settings::from_json(r#"{"counterDurationMs": -5}"#).is_err());
        let ok = Settings::from_json(r#"{"counterDurationMs": 1, "counterFrameMs": 1}"#);
        assert!(ok.is_ok());
    }
}
