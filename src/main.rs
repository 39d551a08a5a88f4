// src/main.rs
mod capture;
mod components;
mod config;
mod editor_state;
mod error;
mod fonts;
mod geocoding;
mod geolocation;
mod leaflet;
mod map_content;
mod utils;

use capture::ExportOutcome;
use components::controls::Controls;
use components::editor_canvas::EditorCanvas;
use config::AppConfig;
use editor_state::{EditorState, Task};
use error::{EditorError, EditorResult};
use map_content::{ContentField, MapCoordinates, MapSource};
use web_sys::HtmlInputElement;
use yew::prelude::*;

pub enum AppMsg {
    FieldChanged(ContentField, String),
    FontChanged(String),
    SourceChanged(MapSource),
    FileSelected(web_sys::File),
    ImageLoaded(EditorResult<String>),
    RemoveImage,
    CoordinateInputChanged(String),
    GenerateFromAddress,
    GenerateFromCoordinates,
    GenerateFromGps,
    Resolved(Task, EditorResult<MapCoordinates>),
    Download,
    Share,
    Exported(Task, EditorResult<ExportOutcome>),
    Reset,
}

pub struct App {
    state: EditorState,
    config: AppConfig,
    share_supported: bool,
    canvas_ref: NodeRef,
    file_input_ref: NodeRef,
}

/// Shows an error the way every failed action does: logged, then alerted.
fn report(err: &EditorError) {
    log::error!("{:?}", err);
    gloo::dialogs::alert(&err.to_string());
}

impl Component for App {
    type Message = AppMsg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        // Runs once per session
        wasm_bindgen_futures::spawn_local(fonts::embed_fonts());

        Self {
            state: EditorState::new(),
            config: AppConfig::from_env(),
            share_supported: capture::share_supported(),
            canvas_ref: NodeRef::default(),
            file_input_ref: NodeRef::default(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            AppMsg::FieldChanged(field, value) => {
                self.state.set_field(field, value);
                true
            }
            AppMsg::FontChanged(name) => self.state.set_font(&name),
            AppMsg::SourceChanged(source) => {
                self.state.set_source(source);
                true
            }
            AppMsg::FileSelected(file) => {
                ctx.link().send_future(async move {
                    let file = gloo::file::File::from(file);
                    let result = gloo::file::futures::read_as_data_url(&file)
                        .await
                        .map_err(|e| EditorError::validation(format!("Falha ao ler a imagem: {}", e)));
                    AppMsg::ImageLoaded(result)
                });
                false
            }
            AppMsg::ImageLoaded(result) => match result {
                Ok(data_url) => {
                    log::info!("Image loaded ({} bytes as data URI)", data_url.len());
                    self.state.set_image(data_url);
                    true
                }
                Err(e) => {
                    report(&e);
                    false
                }
            },
            AppMsg::RemoveImage => {
                self.state.remove_image();
                self.clear_file_input();
                true
            }
            AppMsg::CoordinateInputChanged(input) => {
                self.state.set_coordinate_input(input);
                true
            }
            AppMsg::GenerateFromAddress => {
                let query = match self.state.address_query() {
                    Ok(query) => query,
                    Err(e) => {
                        report(&e);
                        return false;
                    }
                };
                if !self.state.try_begin(Task::Geocode) {
                    return false;
                }
                let config = self.config.clone();
                ctx.link().send_future(async move {
                    AppMsg::Resolved(Task::Geocode, geocoding::geocode(&config, &query).await)
                });
                true
            }
            AppMsg::GenerateFromCoordinates => match self.state.resolve_coordinate_input() {
                Ok(coords) => {
                    log::info!("Map set to {}, {}", coords.lat, coords.lon);
                    true
                }
                Err(e) => {
                    report(&e);
                    false
                }
            },
            AppMsg::GenerateFromGps => {
                if !self.state.try_begin(Task::Locate) {
                    return false;
                }
                ctx.link().send_future(async {
                    AppMsg::Resolved(Task::Locate, geolocation::current_position().await)
                });
                true
            }
            AppMsg::Resolved(task, result) => {
                if let Err(e) = self.state.apply_resolution(task, result) {
                    report(&e);
                }
                true
            }
            AppMsg::Download => self.start_export(ctx, Task::Download),
            AppMsg::Share => self.start_export(ctx, Task::Share),
            AppMsg::Exported(task, result) => {
                match self.state.complete(task, result) {
                    Ok(ExportOutcome::Completed) => {}
                    Ok(ExportOutcome::Cancelled) => log::info!("Share dialog dismissed"),
                    Err(e) => report(&e),
                }
                true
            }
            AppMsg::Reset => {
                self.state.reset();
                self.clear_file_input();
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let state = &self.state;

        html! {
            <div class="app-container">
                <aside class="app-sidebar">
                    <Controls
                        content={state.content.clone()}
                        font={state.font}
                        source={state.source}
                        coordinate_input={state.coordinate_input.clone()}
                        has_map_content={state.has_map_content()}
                        share_supported={self.share_supported}
                        downloading={state.is_busy(Task::Download)}
                        sharing={state.is_busy(Task::Share)}
                        generating={state.is_busy(Task::Geocode)}
                        locating={state.is_busy(Task::Locate)}
                        file_input={self.file_input_ref.clone()}
                        on_field_change={link.callback(|(field, value): (ContentField, String)| AppMsg::FieldChanged(field, value))}
                        on_font_change={link.callback(AppMsg::FontChanged)}
                        on_source_change={link.callback(AppMsg::SourceChanged)}
                        on_file_change={link.callback(AppMsg::FileSelected)}
                        on_remove_image={link.callback(|_: ()| AppMsg::RemoveImage)}
                        on_coordinate_input_change={link.callback(AppMsg::CoordinateInputChanged)}
                        on_generate_from_address={link.callback(|_: ()| AppMsg::GenerateFromAddress)}
                        on_generate_from_coordinates={link.callback(|_: ()| AppMsg::GenerateFromCoordinates)}
                        on_generate_from_gps={link.callback(|_: ()| AppMsg::GenerateFromGps)}
                        on_download={link.callback(|_: ()| AppMsg::Download)}
                        on_share={link.callback(|_: ()| AppMsg::Share)}
                        on_reset={link.callback(|_: ()| AppMsg::Reset)}
                    />
                </aside>
                <main class="app-main">
                    <EditorCanvas
                        content={state.content.clone()}
                        font={state.font}
                        coordinates={state.coordinates}
                        canvas_ref={self.canvas_ref.clone()}
                    />
                </main>
            </div>
        }
    }
}

impl App {
    fn clear_file_input(&self) {
        if let Some(input) = self.file_input_ref.cast::<HtmlInputElement>() {
            input.set_value("");
        }
    }

    fn start_export(&mut self, ctx: &Context<Self>, task: Task) -> bool {
        if let Err(e) = self.state.ensure_exportable() {
            report(&e);
            return false;
        }
        if task == Task::Share && !self.share_supported {
            report(&EditorError::unsupported(
                "O seu navegador não suporta a função de compartilhamento.",
            ));
            return false;
        }
        if !self.state.try_begin(task) {
            return false;
        }

        let canvas = self.canvas_ref.clone();
        let filename = self.state.export_filename();
        let card_number = self.state.content.top_left_line2.clone();
        ctx.link().send_future(async move {
            let result = match capture::capture_png(&canvas).await {
                Ok(data_url) if task == Task::Share => {
                    capture::share(&data_url, &filename, &card_number).await
                }
                Ok(data_url) => {
                    capture::download(&data_url, &filename).map(|()| ExportOutcome::Completed)
                }
                Err(e) => Err(e),
            };
            AppMsg::Exported(task, result)
        });
        true
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    utils::register_service_worker(config::SERVICE_WORKER_SCRIPT);
    yew::Renderer::<App>::new().render();
}
