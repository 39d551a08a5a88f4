// src/components/controls.rs
use crate::map_content::{ContentField, FontChoice, MapContent, MapSource};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ControlsProps {
    pub content: MapContent,
    pub font: FontChoice,
    pub source: MapSource,
    pub coordinate_input: String,
    pub has_map_content: bool,
    pub share_supported: bool,
    pub downloading: bool,
    pub sharing: bool,
    pub generating: bool,
    pub locating: bool,
    pub file_input: NodeRef,
    pub on_field_change: Callback<(ContentField, String)>,
    pub on_font_change: Callback<String>,
    pub on_source_change: Callback<MapSource>,
    pub on_file_change: Callback<web_sys::File>,
    pub on_remove_image: Callback<()>,
    pub on_coordinate_input_change: Callback<String>,
    pub on_generate_from_address: Callback<()>,
    pub on_generate_from_coordinates: Callback<()>,
    pub on_generate_from_gps: Callback<()>,
    pub on_download: Callback<()>,
    pub on_share: Callback<()>,
    pub on_reset: Callback<()>,
}

fn text_input(callback: Callback<String>) -> Callback<InputEvent> {
    Callback::from(move |e: InputEvent| {
        if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
            callback.emit(input.value());
        }
    })
}

fn field_input(on_change: &Callback<(ContentField, String)>, field: ContentField) -> Callback<InputEvent> {
    text_input(on_change.reform(move |value| (field, value)))
}

fn spinner(label: &str) -> Html {
    html! {
        <>
            <span class="spinner" aria-hidden="true"></span>
            {label.to_string()}
        </>
    }
}

#[derive(Properties, PartialEq)]
struct InputFieldProps {
    label: AttrValue,
    value: AttrValue,
    oninput: Callback<InputEvent>,
}

#[function_component(InputField)]
fn input_field(props: &InputFieldProps) -> Html {
    html! {
        <div class="input-field">
            <label>{props.label.clone()}</label>
            <input type="text" value={props.value.clone()} oninput={props.oninput.clone()} />
        </div>
    }
}

#[function_component(Controls)]
pub fn controls(props: &ControlsProps) -> Html {
    let address_filled = props.content.has_address();

    let onfontchange = {
        let on_font_change = props.on_font_change.clone();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<HtmlSelectElement>() {
                on_font_change.emit(select.value());
            }
        })
    };

    let onfilechange = {
        let on_file_change = props.on_file_change.clone();
        Callback::from(move |e: Event| {
            let file = e
                .target_dyn_into::<HtmlInputElement>()
                .and_then(|input| input.files())
                .and_then(|files| files.get(0));
            if let Some(file) = file {
                on_file_change.emit(file);
            }
        })
    };

    let source_panel = match props.source {
        MapSource::Image => html! {
            <div class="panel">
                <label class="file-picker">
                    <span>{"Escolher arquivo"}</span>
                    <input ref={props.file_input.clone()} type="file" accept="image/*" onchange={onfilechange} />
                </label>
                if props.content.map_image.is_some() {
                    <button class="btn btn-danger" onclick={props.on_remove_image.reform(|_: MouseEvent| ())}>
                        {"Apagar Imagem"}
                    </button>
                }
            </div>
        },
        MapSource::Address => html! {
            <div class="panel">
                <h2>{"Gerar por Endereço"}</h2>
                <p class="hint">{"Use os campos de detalhes do mapa para gerar."}</p>
                <button
                    class="btn btn-primary"
                    disabled={props.generating || !address_filled}
                    onclick={props.on_generate_from_address.reform(|_: MouseEvent| ())}
                >
                    { if props.generating { spinner("Gerando...") } else { html! {"Gerar Mapa"} } }
                </button>
                if !address_filled {
                    <p class="warning">{"Preencha o endereço para gerar."}</p>
                }
            </div>
        },
        MapSource::Coordinates => html! {
            <div class="panel">
                <h2>{"Gerar por Coordenadas"}</h2>
                <p class="hint">{"Use o formato: latitude, longitude."}</p>
                <input
                    type="text"
                    placeholder="-8.05428, -34.8813"
                    value={props.coordinate_input.clone()}
                    oninput={text_input(props.on_coordinate_input_change.clone())}
                />
                <button
                    class="btn btn-primary"
                    disabled={props.coordinate_input.trim().is_empty()}
                    onclick={props.on_generate_from_coordinates.reform(|_: MouseEvent| ())}
                >
                    {"Gerar Mapa"}
                </button>
            </div>
        },
        MapSource::Gps => html! {
            <div class="panel">
                <h2>{"Gerar por GPS"}</h2>
                <p class="hint">{"Use a localização atual do seu dispositivo."}</p>
                <button
                    class="btn btn-primary"
                    disabled={props.locating}
                    onclick={props.on_generate_from_gps.reform(|_: MouseEvent| ())}
                >
                    { if props.locating { spinner("Obtendo Localização...") } else { html! {"Gerar Mapa"} } }
                </button>
            </div>
        },
    };

    html! {
        <div class="controls">
            <header class="controls-header">
                <h1>{"Editor de Mapa"}</h1>
                <p>{"Personalize os textos e o mapa."}</p>
            </header>

            <div class="panel">
                <h2>{"Fonte"}</h2>
                <select onchange={onfontchange}>
                    {for FontChoice::ALL.iter().map(|font| html! {
                        <option value={font.name()} selected={*font == props.font}>{font.name()}</option>
                    })}
                </select>
            </div>

            <div class="panel">
                <h2>{"Detalhes do Mapa"}</h2>
                <div class="input-field">
                    <label>{"Número do Mapa"}</label>
                    <div class="prefixed">
                        <span class="prefix">{"Nº"}</span>
                        <input
                            type="text"
                            value={props.content.field(ContentField::CardNumber).to_string()}
                            oninput={field_input(&props.on_field_change, ContentField::CardNumber)}
                        />
                    </div>
                </div>
                <div class="row">
                    <InputField
                        label="Bairro"
                        value={props.content.field(ContentField::Neighborhood).to_string()}
                        oninput={field_input(&props.on_field_change, ContentField::Neighborhood)}
                    />
                    <InputField
                        label="Cidade"
                        value={props.content.field(ContentField::City).to_string()}
                        oninput={field_input(&props.on_field_change, ContentField::City)}
                    />
                </div>
                <InputField
                    label="Endereço"
                    value={props.content.field(ContentField::Address).to_string()}
                    oninput={field_input(&props.on_field_change, ContentField::Address)}
                />
            </div>

            <div class="panel">
                <h2>{"Origem do Mapa"}</h2>
                <div class="radio-group">
                    {for MapSource::ALL.iter().map(|source| {
                        let source = *source;
                        let onchange = props.on_source_change.reform(move |_: Event| source);
                        html! {
                            <label class="radio">
                                <input
                                    type="radio"
                                    name="mapSource"
                                    value={source.value()}
                                    checked={props.source == source}
                                    {onchange}
                                />
                                <span>{source.label()}</span>
                            </label>
                        }
                    })}
                </div>
            </div>

            { source_panel }

            <div class="actions">
                <button
                    class="btn btn-brand"
                    disabled={props.downloading || !props.has_map_content}
                    onclick={props.on_download.reform(|_: MouseEvent| ())}
                >
                    { if props.downloading { spinner("Baixando...") } else { html! {"Baixar Imagem"} } }
                </button>
                if props.share_supported {
                    <button
                        class="btn btn-share"
                        disabled={props.sharing || !props.has_map_content}
                        onclick={props.on_share.reform(|_: MouseEvent| ())}
                    >
                        { if props.sharing { spinner("Compartilhando...") } else { html! {"Compartilhar Imagem"} } }
                    </button>
                }
                <button class="btn btn-muted" onclick={props.on_reset.reform(|_: MouseEvent| ())}>{"Resetar"}</button>
                if !props.has_map_content {
                    <p class="warning">{"Importe ou gere um mapa para continuar."}</p>
                }
            </div>
        </div>
    }
}
