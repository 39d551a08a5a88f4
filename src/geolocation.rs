// src/geolocation.rs
use crate::error::{EditorError, EditorResult};
use crate::map_content::MapCoordinates;
use js_sys::{Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Geolocation, GeolocationPosition, GeolocationPositionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionErrorKind {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Unknown,
}

impl PositionErrorKind {
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => PositionErrorKind::PermissionDenied,
            2 => PositionErrorKind::PositionUnavailable,
            3 => PositionErrorKind::Timeout,
            _ => PositionErrorKind::Unknown,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            PositionErrorKind::PermissionDenied => "Você negou a permissão para a localização.",
            PositionErrorKind::PositionUnavailable => {
                "A informação de localização não está disponível. Verifique as configurações do seu dispositivo."
            }
            PositionErrorKind::Timeout => "A requisição para obter a localização expirou.",
            PositionErrorKind::Unknown => "Ocorreu um erro desconhecido ao obter a localização.",
        }
    }
}

/// Checks the platform before asking for a position.
fn probe() -> EditorResult<Geolocation> {
    let window = gloo_utils::window();
    let navigator = window.navigator();
    let supported = Reflect::has(&navigator, &JsValue::from_str("geolocation")).unwrap_or(false);
    if !supported {
        return Err(EditorError::unsupported(
            "A geolocalização não é suportada por este navegador.",
        ));
    }
    if !window.is_secure_context() {
        return Err(EditorError::unsupported(
            "A geolocalização está disponível apenas em conexões seguras (HTTPS).",
        ));
    }
    navigator.geolocation().map_err(|_| {
        EditorError::unsupported("A geolocalização não é suportada por este navegador.")
    })
}

/// One reading of the device position.
pub async fn current_position() -> EditorResult<MapCoordinates> {
    let geolocation = probe()?;

    let mut request_err = None;
    let promise = Promise::new(&mut |resolve, reject| {
        if let Err(e) = geolocation.get_current_position_with_error_callback(&resolve, Some(&reject))
        {
            request_err = Some(e);
        }
    });
    if let Some(e) = request_err {
        return Err(EditorError::service(crate::error::js_message(&e)));
    }

    match JsFuture::from(promise).await {
        Ok(value) => {
            let position: GeolocationPosition = value.unchecked_into();
            let coords = position.coords();
            Ok(MapCoordinates::new(coords.latitude(), coords.longitude()))
        }
        Err(value) => {
            let kind = value
                .dyn_ref::<GeolocationPositionError>()
                .map(|e| {
                    log::error!(
                        "GPS position failed (code {}): {}",
                        e.code(),
                        e.message()
                    );
                    PositionErrorKind::from_code(e.code())
                })
                .unwrap_or(PositionErrorKind::Unknown);
            Err(EditorError::service(kind.message()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(PositionErrorKind::from_code(1), PositionErrorKind::PermissionDenied);
        assert_eq!(PositionErrorKind::from_code(2), PositionErrorKind::PositionUnavailable);
        assert_eq!(PositionErrorKind::from_code(3), PositionErrorKind::Timeout);
        assert_eq!(PositionErrorKind::from_code(0), PositionErrorKind::Unknown);
        assert_eq!(PositionErrorKind::from_code(42), PositionErrorKind::Unknown);
    }

    #[test]
    fn test_messages_are_distinct() {
        let kinds = [
            PositionErrorKind::PermissionDenied,
            PositionErrorKind::PositionUnavailable,
            PositionErrorKind::Timeout,
            PositionErrorKind::Unknown,
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(a.message(), b.message());
            }
        }
    }
}
