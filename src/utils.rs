// src/utils.rs
use web_sys::window;

const DEPLOY_PREFIX: &str = "/map-card-editor/";

/// Get the base URL for the application
/// This handles both root hosting and a sub-path deployment
pub fn get_base_url() -> String {
    let pathname = window().and_then(|w| w.location().pathname().ok());
    base_for_path(pathname.as_deref())
}

fn base_for_path(pathname: Option<&str>) -> String {
    match pathname {
        Some(path) if path.starts_with(DEPLOY_PREFIX) => DEPLOY_PREFIX.trim_end_matches('/').to_string(),
        _ => String::new(),
    }
}

fn join(base: &str, path: &str) -> String {
    format!("{}/{}", base, path.trim_start_matches('/'))
}

/// Build a resource URL with the correct base path
pub fn resource_url(path: &str) -> String {
    join(&get_base_url(), path)
}

/// Registers the offline cache worker if the browser has service workers.
pub fn register_service_worker(script: &str) {
    let Some(window) = window() else {
        return;
    };
    let navigator = window.navigator();
    let supported = js_sys::Reflect::has(&navigator, &"serviceWorker".into()).unwrap_or(false);
    if !supported {
        log::info!("Service workers are not available, skipping offline cache");
        return;
    }

    let promise = navigator.service_worker().register(&resource_url(script));
    wasm_bindgen_futures::spawn_local(async move {
        match wasm_bindgen_futures::JsFuture::from(promise).await {
            Ok(_) => log::info!("Service worker registered"),
            Err(e) => log::warn!(
                "Service worker registration failed: {}",
                crate::error::js_message(&e)
            ),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_url_formatting() {
        assert_eq!(join("", "/styles.css"), "/styles.css");
        assert_eq!(join("", "styles.css"), "/styles.css");
        assert_eq!(join("/map-card-editor", "/icon.svg"), "/map-card-editor/icon.svg");
    }

    #[test]
    fn test_base_for_path() {
        assert_eq!(base_for_path(Some("/map-card-editor/index.html")), "/map-card-editor");
        assert_eq!(base_for_path(Some("/")), "");
        assert_eq!(base_for_path(None), "");
    }
}
