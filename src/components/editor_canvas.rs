// src/components/editor_canvas.rs
use crate::config::{
    BASE_SUBTITLE_MARGIN_REM, BASE_SUBTITLE_SIZE_REM, BASE_TITLE_SIZE_REM,
    TYPOGRAPHY_REFERENCE_WIDTH,
};
use crate::leaflet::MapWidget;
use crate::map_content::{FontChoice, MapContent, MapCoordinates};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, ResizeObserver, ResizeObserverEntry};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct EditorCanvasProps {
    pub content: MapContent,
    pub font: FontChoice,
    pub coordinates: Option<MapCoordinates>,
    /// The card node that gets rasterized on export.
    pub canvas_ref: NodeRef,
}

/// Typography multiplier for a card rendered `width` pixels wide.
pub fn typography_scale(width: f64) -> f64 {
    if width > 0.0 {
        width / TYPOGRAPHY_REFERENCE_WIDTH
    } else {
        1.0
    }
}

#[derive(Debug, Clone, PartialEq)]
struct TextStyles {
    title: String,
    subtitle: String,
    footer: String,
}

impl TextStyles {
    fn scaled(scale: f64) -> Self {
        Self {
            title: format!("font-size: {}rem;", BASE_TITLE_SIZE_REM * scale),
            subtitle: format!(
                "font-size: {}rem; margin-top: {}rem;",
                BASE_SUBTITLE_SIZE_REM * scale,
                BASE_SUBTITLE_MARGIN_REM * scale
            ),
            footer: format!("font-size: {}rem;", BASE_SUBTITLE_SIZE_REM * scale),
        }
    }
}

fn or_blank(text: &str) -> Html {
    if text.is_empty() {
        html! { {"\u{00a0}"} }
    } else {
        html! { {text.to_string()} }
    }
}

fn placeholder() -> Html {
    html! {
        <div class="map-placeholder">
            <div>
                <svg xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 24 24" stroke="currentColor">
                    <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M9 20l-5.447-2.724A1 1 0 013 16.382V5.618a1 1 0 011.447-.894L9 7m0 13v-6m0-4V3m6 17l5.447-2.724A1 1 0 0021 16.382V5.618a1 1 0 00-1.447-.894L15 7m0 13v-6m0-4V3m-6 4l6-3m-6 9l6-3" />
                </svg>
                <p class="placeholder-title">{"Importe ou gere um mapa"}</p>
                <p class="placeholder-text">{"A imagem ou o mapa aparecerá aqui."}</p>
            </div>
        </div>
    }
}

fn marker() -> Html {
    html! {
        <div class="map-marker">
            <svg viewBox="0 0 384 512" fill="#8b5cf6" xmlns="http://www.w3.org/2000/svg">
                <path d="M172.268 501.67C26.97 291.031 0 269.413 0 192 0 85.961 85.961 0 192 0s192 85.961 192 192c0 77.413-26.97 99.031-172.268 309.67a24 24 0 01-35.464 0zM192 256c35.346 0 64-28.654 64-64s-28.654-64-64-64-64 28.654-64 64 28.654 64 64 64z"/>
            </svg>
        </div>
    }
}

#[function_component(EditorCanvas)]
pub fn editor_canvas(props: &EditorCanvasProps) -> Html {
    let scale = use_state(|| 1.0f64);
    let wrapper_ref = use_node_ref();
    let map_ref = use_node_ref();

    // ------ RESPONSIVE TYPOGRAPHY ------
    {
        let scale = scale.clone();
        let wrapper_ref = wrapper_ref.clone();
        use_effect_with((), move |_| {
            let on_resize = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
                for entry in entries.iter() {
                    let entry: ResizeObserverEntry = entry.unchecked_into();
                    scale.set(typography_scale(entry.content_rect().width()));
                }
            });

            let observer = ResizeObserver::new(on_resize.as_ref().unchecked_ref()).ok();
            if let (Some(observer), Some(wrapper)) = (&observer, wrapper_ref.get()) {
                if let Ok(element) = wrapper.dyn_into::<web_sys::Element>() {
                    observer.observe(&element);
                }
            }

            move || {
                if let Some(observer) = observer {
                    observer.disconnect();
                }
                drop(on_resize);
            }
        });
    }

    // ------ MAP WIDGET ------
    {
        let map_ref = map_ref.clone();
        use_effect_with(props.coordinates, move |coords| {
            // the previous widget is dropped by the last cleanup before this runs
            let widget = coords.and_then(|coords| {
                let container = map_ref.cast::<HtmlElement>()?;
                MapWidget::mount(&container, coords)
                    .map_err(|e| log::warn!("Could not create the map widget: {}", e))
                    .ok()
            });
            move || drop(widget)
        });
    }

    let styles = TextStyles::scaled(*scale);
    let content = &props.content;
    let has_map_content = content.map_image.is_some() || props.coordinates.is_some();

    html! {
        <div ref={wrapper_ref} class="canvas-wrapper">
            <div
                ref={props.canvas_ref.clone()}
                class={classes!("card", props.font.class_name())}
                style={format!("font-family: {};", props.font.family())}
            >
                <header class="card-header">
                    <div class="card-header-left">
                        <h1 class="title" style={styles.title.clone()}>{content.top_left_line1.clone()}</h1>
                        <p class="subtitle" style={styles.subtitle.clone()}>{or_blank(&content.top_left_line2)}</p>
                    </div>
                    <div class="card-header-right">
                        <h2 class="title" style={styles.title.clone()}>{or_blank(&content.top_right_line1)}</h2>
                        <h2 class="subtitle" style={styles.subtitle.clone()}>{or_blank(&content.top_right_line2)}</h2>
                    </div>
                </header>

                <div class="card-map" data-map-area="true">
                    if !has_map_content {
                        { placeholder() }
                    }
                    if let Some(image) = content.map_image.clone() {
                        <img class="card-image" src={image} alt="Mapa" />
                    }
                    if props.coordinates.is_some() {
                        <div ref={map_ref} class="card-leaflet"></div>
                        { marker() }
                    }
                </div>

                <footer class="card-footer">
                    <p style={styles.footer}>{content.bottom_text.clone()}</p>
                </footer>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typography_scale() {
        assert_eq!(typography_scale(576.0), 1.0);
        assert_eq!(typography_scale(288.0), 0.5);
        assert_eq!(typography_scale(0.0), 1.0);
    }

    #[test]
    fn test_scaled_styles() {
        let styles = TextStyles::scaled(0.5);
        assert_eq!(styles.title, "font-size: 1.5rem;");
        assert_eq!(styles.subtitle, "font-size: 1.1rem; margin-top: 0.25rem;");
        assert_eq!(styles.footer, "font-size: 1.1rem;");
    }
}
