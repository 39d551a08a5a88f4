// src/config.rs

/// Stylesheet for the eight selectable families. Fetched once and embedded so
/// the PNG capture can read the font files.
pub const FONT_STYLESHEET_URL: &str = "https://fonts.googleapis.com/css2?family=Lato:wght@400;700;900&family=Montserrat:wght@400;700;900&family=Noto+Sans:wght@400;700&family=Nunito+Sans:wght@400;700;900&family=Open+Sans:wght@400;700&family=Poppins:wght@400;700;900&family=Roboto:wght@400;700;900&family=Source+Sans+Pro:wght@400;700&display=swap";

pub const TILE_URL_TEMPLATE: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";
pub const MAP_ZOOM: u8 = 17;

/// Width in pixels of every exported PNG, whatever the on-screen size.
pub const EXPORT_TARGET_WIDTH: f64 = 1200.0;
pub const FALLBACK_EXPORT_FILENAME: &str = "mapa_personalizado.png";
pub const SHARE_TEXT: &str = "Veja o mapa que eu criei com o Gerador de Mapa!";

/// On-screen card width at which typography uses its base sizes.
pub const TYPOGRAPHY_REFERENCE_WIDTH: f64 = 576.0;
pub const BASE_TITLE_SIZE_REM: f64 = 3.0;
pub const BASE_SUBTITLE_SIZE_REM: f64 = 2.2;
pub const BASE_SUBTITLE_MARGIN_REM: f64 = 0.5;

pub const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

pub const SERVICE_WORKER_SCRIPT: &str = "sw.js";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
}

impl AppConfig {
    /// Values baked in at build time (`GEMINI_API_KEY`, `GEMINI_MODEL`).
    pub fn from_env() -> Self {
        Self::new(option_env!("GEMINI_API_KEY"), option_env!("GEMINI_MODEL"))
    }

    fn new(api_key: Option<&str>, model: Option<&str>) -> Self {
        Self {
            gemini_api_key: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from),
            gemini_model: model
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .unwrap_or(DEFAULT_GEMINI_MODEL)
                .to_string(),
        }
    }

    pub fn generate_content_url(&self) -> String {
        format!("{}/{}:generateContent", GEMINI_ENDPOINT, self.gemini_model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_key_is_missing() {
        let config = AppConfig::new(Some("  "), None);
        assert_eq!(config.gemini_api_key, None);
        assert_eq!(config.gemini_model, "gemini-2.5-flash");
    }

    #[test]
    fn test_generate_content_url() {
        let config = AppConfig::new(Some("k"), Some("gemini-test"));
        assert_eq!(
            config.generate_content_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-test:generateContent"
        );
    }
}
