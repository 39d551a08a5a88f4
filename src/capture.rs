// src/capture.rs
use crate::config::{EXPORT_TARGET_WIDTH, SHARE_TEXT};
use crate::error::{is_abort, js_message, EditorError, EditorResult};
use gloo::file::Blob;
use gloo_net::http::Request;
use js_sys::{Array, Object, Promise, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FilePropertyBag, HtmlAnchorElement, HtmlElement};
use yew::NodeRef;

const CAPTURE_FAILED: &str = "Falha ao preparar a imagem para captura. Verifique se a imagem do mapa pode ser acessada corretamente.";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = htmlToImage, js_name = toPng, catch)]
    fn html_to_png(node: &HtmlElement, options: &JsValue) -> Result<Promise, JsValue>;

    /// `navigator` with the Web Share methods web-sys keeps behind a cfg.
    type ShareNavigator;

    #[wasm_bindgen(method, js_name = canShare)]
    fn can_share(this: &ShareNavigator, data: &JsValue) -> bool;

    #[wasm_bindgen(method, catch)]
    fn share(this: &ShareNavigator, data: &JsValue) -> Result<Promise, JsValue>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CaptureOptions {
    pixel_ratio: f64,
    cache_bust: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    Completed,
    Cancelled,
}

/// Scale that takes the on-screen card to the export width.
pub fn pixel_ratio(target_width: f64, on_screen_width: f64) -> EditorResult<f64> {
    if on_screen_width > 0.0 && on_screen_width.is_finite() {
        Ok(target_width / on_screen_width)
    } else {
        Err(EditorError::capture("A área de visualização não está pronta."))
    }
}

/// Rasterizes the card to a PNG data URI `EXPORT_TARGET_WIDTH` pixels wide.
pub async fn capture_png(canvas: &NodeRef) -> EditorResult<String> {
    let node = canvas
        .cast::<HtmlElement>()
        .ok_or_else(|| EditorError::capture("A área de visualização não está pronta."))?;
    let ratio = pixel_ratio(EXPORT_TARGET_WIDTH, f64::from(node.offset_width()))?;

    let options = CaptureOptions {
        pixel_ratio: ratio,
        cache_bust: true,
    };
    let options = js_sys::JSON::parse(&serde_json::to_string(&options)?)
        .map_err(|e| EditorError::capture(js_message(&e)))?;

    let promise = html_to_png(&node, &options).map_err(|e| {
        log::error!("Rasterization could not start: {}", js_message(&e));
        EditorError::capture(CAPTURE_FAILED)
    })?;
    let value = JsFuture::from(promise).await.map_err(|e| {
        log::error!("Rasterization failed: {}", js_message(&e));
        EditorError::capture(CAPTURE_FAILED)
    })?;

    value
        .as_string()
        .ok_or_else(|| EditorError::capture(CAPTURE_FAILED))
}

/// Saves the PNG through a temporary `<a download>`.
pub fn download(data_url: &str, filename: &str) -> EditorResult<()> {
    let anchor: HtmlAnchorElement = gloo_utils::document()
        .create_element("a")
        .map_err(|e| EditorError::capture(js_message(&e)))?
        .unchecked_into();
    anchor.set_download(filename);
    anchor.set_href(data_url);
    anchor.click();
    log::info!("Downloaded {}", filename);
    Ok(())
}

pub fn share_supported() -> bool {
    let navigator = gloo_utils::window().navigator();
    Reflect::has(&navigator, &JsValue::from_str("share")).unwrap_or(false)
}

async fn png_file(data_url: &str, filename: &str) -> EditorResult<File> {
    let bytes = Request::get(data_url).send().await?.binary().await?;
    let blob: web_sys::Blob = Blob::new_with_options(bytes.as_slice(), Some("image/png")).into();

    let parts = Array::of1(&blob);
    let props = FilePropertyBag::new();
    props.set_type("image/png");
    File::new_with_blob_sequence_and_options(&parts, filename, &props)
        .map_err(|e| EditorError::capture(js_message(&e)))
}

fn set_prop(target: &Object, key: &str, value: &JsValue) -> EditorResult<()> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(|e| EditorError::capture(js_message(&e)))
}

/// `{ files: [file] }`, the shape asked of `canShare`.
fn share_files(file: &File) -> EditorResult<Object> {
    let data = Object::new();
    set_prop(&data, "files", &Array::of1(file))?;
    Ok(data)
}

fn share_data(file: &File, card_number: &str) -> EditorResult<Object> {
    let data = share_files(file)?;
    set_prop(
        &data,
        "title",
        &JsValue::from_str(&format!("Mapa Personalizado - {}", card_number.trim())),
    )?;
    set_prop(&data, "text", &JsValue::from_str(SHARE_TEXT))?;
    Ok(data)
}

/// Hands the PNG to the platform share sheet.
pub async fn share(data_url: &str, filename: &str, card_number: &str) -> EditorResult<ExportOutcome> {
    if !share_supported() {
        return Err(EditorError::unsupported(
            "O seu navegador não suporta a função de compartilhamento.",
        ));
    }

    let file = png_file(data_url, filename).await?;

    let navigator = gloo_utils::window().navigator();
    let has_can_share = Reflect::has(&navigator, &JsValue::from_str("canShare")).unwrap_or(false);
    let navigator: ShareNavigator = navigator.unchecked_into();
    let can_share = has_can_share && navigator.can_share(&JsValue::from(share_files(&file)?));
    if !can_share {
        return Err(EditorError::unsupported(
            "Não é possível compartilhar esta imagem neste dispositivo.",
        ));
    }

    let data = share_data(&file, card_number)?;
    let result = match navigator.share(&data) {
        Ok(promise) => JsFuture::from(promise).await.map(|_| ()),
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => {
            log::info!("Shared {}", filename);
            Ok(ExportOutcome::Completed)
        }
        Err(e) if is_abort(&e) => Ok(ExportOutcome::Cancelled),
        Err(e) => Err(EditorError::service(js_message(&e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_ratio() {
        assert_eq!(pixel_ratio(1200.0, 600.0).unwrap(), 2.0);
        assert_eq!(pixel_ratio(1200.0, 1200.0).unwrap(), 1.0);
        assert!((pixel_ratio(1200.0, 384.0).unwrap() - 3.125).abs() < 1e-9);
    }

    #[test]
    fn test_pixel_ratio_unmounted() {
        assert!(matches!(pixel_ratio(1200.0, 0.0), Err(EditorError::Capture(_))));
        assert!(pixel_ratio(1200.0, f64::NAN).is_err());
    }

    #[test]
    fn test_capture_options_shape() {
        let json = serde_json::to_value(CaptureOptions {
            pixel_ratio: 2.0,
            cache_bust: true,
        })
        .unwrap();
        assert_eq!(json["pixelRatio"], 2.0);
        assert_eq!(json["cacheBust"], true);
    }
}
