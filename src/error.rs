//! Error types for the map card editor.

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

/// Result type alias using EditorError.
pub type EditorResult<T> = Result<T, EditorError>;

/// Errors reported to the user. The message is shown as-is in an alert.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    /// Bad user input, rejected before any state change or network call.
    #[error("{0}")]
    Validation(String),

    /// Geocoding, credential or geolocation failure.
    #[error("{0}")]
    Service(String),

    /// The card could not be rasterized.
    #[error("{0}")]
    Capture(String),

    /// The platform lacks a capability (share, geolocation, secure context).
    #[error("{0}")]
    Unsupported(String),
}

impl EditorError {
    pub fn validation(msg: impl Into<String>) -> Self {
        EditorError::Validation(msg.into())
    }

    pub fn service(msg: impl Into<String>) -> Self {
        EditorError::Service(msg.into())
    }

    pub fn capture(msg: impl Into<String>) -> Self {
        EditorError::Capture(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        EditorError::Unsupported(msg.into())
    }

    /// Prefixes service and capture failures with what the user was doing.
    /// Validation and capability messages already stand on their own.
    pub fn with_context(self, context: &str) -> Self {
        match self {
            EditorError::Service(msg) => EditorError::Service(format!("{}: {}", context, msg)),
            EditorError::Capture(msg) => EditorError::Capture(format!("{}: {}", context, msg)),
            other => other,
        }
    }
}

impl From<gloo_net::Error> for EditorError {
    fn from(err: gloo_net::Error) -> Self {
        EditorError::Service(err.to_string())
    }
}

impl From<serde_json::Error> for EditorError {
    fn from(err: serde_json::Error) -> Self {
        EditorError::Service(err.to_string())
    }
}

/// Best-effort message from a thrown JS value.
pub fn js_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    if let Some(text) = value.as_string() {
        return text;
    }
    js_sys::Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| "Erro desconhecido".to_string())
}

/// True when a rejected promise came from the user dismissing a dialog.
pub fn is_abort(value: &JsValue) -> bool {
    js_sys::Reflect::get(value, &JsValue::from_str("name"))
        .ok()
        .and_then(|n| n.as_string())
        .is_some_and(|name| name == "AbortError")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_plain_message() {
        let err = EditorError::validation("Por favor, insira as coordenadas.");
        assert_eq!(err.to_string(), "Por favor, insira as coordenadas.");
    }

    #[test]
    fn test_with_context() {
        let err = EditorError::service("HTTP 500").with_context("Erro ao obter localização");
        assert_eq!(err, EditorError::Service("Erro ao obter localização: HTTP 500".into()));

        let err = EditorError::capture("sem imagem").with_context("Falha ao gerar a imagem");
        assert_eq!(err.to_string(), "Falha ao gerar a imagem: sem imagem");

        let err = EditorError::unsupported("sem suporte").with_context("Falha ao gerar a imagem");
        assert_eq!(err.to_string(), "sem suporte");
    }

    #[test]
    fn test_serde_error_is_service() {
        let err: EditorError = serde_json::from_str::<u32>("x").unwrap_err().into();
        assert!(matches!(err, EditorError::Service(_)));
    }
}
