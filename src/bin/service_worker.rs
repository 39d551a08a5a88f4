// src/bin/service_worker.rs
//! Offline cache for the editor's static assets: precache on install, drop
//! older caches on activate, cache-first for GET requests.
//!
//! The event listeners live in `public/sw.js`, which adds them during the
//! worker's first evaluation and forwards each event to the exports below
//! once the wasm module has loaded.

use js_sys::Array;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Cache, CacheStorage, Request, Response, ServiceWorkerGlobalScope};

const CACHE_NAME: &str = "map-card-editor-cache-v1";

/// Resolved against the worker script's location, so the app can be served
/// from a sub-path.
const ASSETS: [&str; 7] = [
    "./",
    "./index.html",
    "./map-card-editor.js",
    "./map-card-editor_bg.wasm",
    "./styles.css",
    "./icon.svg",
    "./manifest.json",
];

/// Caches from earlier versions.
fn stale_caches(names: &[String], current: &str) -> Vec<String> {
    names.iter().filter(|n| *n != current).cloned().collect()
}

/// Only complete responses fetched over http(s) are stored.
fn should_cache(status: u16, url: &str) -> bool {
    status == 200 && (url.starts_with("http://") || url.starts_with("https://"))
}

fn scope() -> ServiceWorkerGlobalScope {
    js_sys::global().unchecked_into()
}

fn caches() -> Result<CacheStorage, JsValue> {
    scope().caches()
}

async fn open_cache() -> Result<Cache, JsValue> {
    let cache = JsFuture::from(caches()?.open(CACHE_NAME)).await?;
    Ok(cache.unchecked_into())
}

#[wasm_bindgen]
pub async fn precache() -> Result<JsValue, JsValue> {
    let cache = open_cache().await?;
    log::info!("Opened cache {}", CACHE_NAME);
    let urls: Array = ASSETS.iter().map(|a| JsValue::from_str(a)).collect();
    JsFuture::from(cache.add_all_with_str_sequence(&urls)).await
}

#[wasm_bindgen]
pub async fn purge_stale() -> Result<JsValue, JsValue> {
    let storage = caches()?;
    let keys: Array = JsFuture::from(storage.keys()).await?.unchecked_into();
    let names: Vec<String> = keys.iter().filter_map(|k| k.as_string()).collect();

    for name in stale_caches(&names, CACHE_NAME) {
        log::info!("Deleting stale cache {}", name);
        JsFuture::from(storage.delete(&name)).await?;
    }
    Ok(JsValue::UNDEFINED)
}

/// Cache-first answer for a GET request. `sw.js` never forwards other methods.
#[wasm_bindgen]
pub async fn respond(request: Request) -> Result<JsValue, JsValue> {
    let cached = JsFuture::from(caches()?.match_with_request(&request)).await?;
    if cached.is_instance_of::<Response>() {
        return Ok(cached);
    }

    let network: Response = JsFuture::from(scope().fetch_with_request(&request.clone()?))
        .await?
        .unchecked_into();

    if should_cache(network.status(), &request.url()) {
        let copy = network.clone()?;
        spawn_local(async move {
            let stored = match open_cache().await {
                Ok(cache) => JsFuture::from(cache.put_with_request(&request, &copy)).await,
                Err(e) => Err(e),
            };
            if let Err(e) = stored {
                log::warn!("Could not cache {}: {:?}", request.url(), e);
            }
        });
    }

    Ok(network.into())
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
}
