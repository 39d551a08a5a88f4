// src/leaflet.rs
//! Bindings to the Leaflet global `L` loaded by index.html.

use crate::config::{MAP_ZOOM, TILE_ATTRIBUTION, TILE_URL_TEMPLATE};
use crate::error::{js_message, EditorError, EditorResult};
use crate::map_content::MapCoordinates;
use gloo::timers::callback::Timeout;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

#[wasm_bindgen]
extern "C" {
    #[derive(Debug, Clone)]
    pub type LeafletMap;

    #[wasm_bindgen(js_namespace = L, js_name = map, catch)]
    fn create_map(container: &HtmlElement, options: &JsValue) -> Result<LeafletMap, JsValue>;

    #[wasm_bindgen(method)]
    fn remove(this: &LeafletMap);

    #[wasm_bindgen(method, js_name = invalidateSize)]
    fn invalidate_size(this: &LeafletMap);

    #[derive(Debug, Clone)]
    pub type TileLayer;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    fn tile_layer(url_template: &str, options: &JsValue) -> TileLayer;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &TileLayer, map: &LeafletMap) -> TileLayer;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MapOptions {
    center: [f64; 2],
    zoom: u8,
    zoom_control: bool,
    attribution_control: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TileOptions {
    attribution: &'static str,
    cross_origin: &'static str,
}

impl MapOptions {
    fn centered_on(coords: MapCoordinates) -> Self {
        Self {
            center: [coords.lat, coords.lon],
            zoom: MAP_ZOOM,
            zoom_control: false,
            attribution_control: false,
        }
    }
}

fn to_js<T: Serialize>(value: &T) -> EditorResult<JsValue> {
    let json = serde_json::to_string(value)?;
    js_sys::JSON::parse(&json).map_err(|e| EditorError::service(js_message(&e)))
}

/// A live Leaflet map. Dropping it tears the instance down.
pub struct MapWidget {
    map: LeafletMap,
    _settle: Timeout,
}

impl MapWidget {
    pub fn mount(container: &HtmlElement, coords: MapCoordinates) -> EditorResult<Self> {
        let map = create_map(container, &to_js(&MapOptions::centered_on(coords))?)
            .map_err(|e| EditorError::service(js_message(&e)))?;

        let tiles = TileOptions {
            attribution: TILE_ATTRIBUTION,
            cross_origin: "anonymous",
        };
        tile_layer(TILE_URL_TEMPLATE, &to_js(&tiles)?).add_to(&map);

        // the container may still be laying out when Leaflet measures it
        let settle = {
            let map = map.clone();
            Timeout::new(100, move || map.invalidate_size())
        };

        log::info!("Map widget mounted at {}, {}", coords.lat, coords.lon);
        Ok(Self {
            map,
            _settle: settle,
        })
    }
}

impl Drop for MapWidget {
    fn drop(&mut self) {
        self.map.remove();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_options_shape() {
        let options = MapOptions::centered_on(MapCoordinates::new(-8.05, -34.88));
        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json["center"], serde_json::json!([-8.05, -34.88]));
        assert_eq!(json["zoom"], 17);
        assert_eq!(json["zoomControl"], false);
        assert_eq!(json["attributionControl"], false);
    }

    #[test]
    fn test_tile_options_shape() {
        let options = TileOptions {
            attribution: TILE_ATTRIBUTION,
            cross_origin: "anonymous",
        };
        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json["crossOrigin"], "anonymous");
    }
}
