// src/geocoding.rs
use crate::config::AppConfig;
use crate::error::{EditorError, EditorResult};
use crate::map_content::MapCoordinates;
use gloo_net::http::Request;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const INVALID_COORDINATES: &str =
    "Não foi possível obter coordenadas válidas para o endereço fornecido.";

#[derive(Debug, Clone, PartialEq)]
pub struct AddressQuery {
    pub address: String,
    pub neighborhood: String,
    pub city: String,
}

impl AddressQuery {
    pub fn prompt(&self) -> String {
        format!(
            "Encontre as coordenadas geográficas (latitude e longitude) para o local a seguir. \
             A informação principal para a busca é o 'Endereço'. Use 'Bairro' e 'Cidade' como \
             informações de apoio para garantir a precisão. Dê prioridade máxima ao 'Endereço'. \
             Endereço: \"{}\", Bairro: \"{}\", Cidade: \"{}\". Responda apenas com um objeto JSON \
             com as chaves \"latitude\" e \"longitude\".",
            self.address, self.neighborhood, self.city
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeRequest {
    contents: Vec<RequestContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TextPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

impl GeocodeRequest {
    pub fn new(query: &AddressQuery) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![TextPart {
                    text: query.prompt(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: json!({
                    "type": "OBJECT",
                    "properties": {
                        "latitude": { "type": "NUMBER" },
                        "longitude": { "type": "NUMBER" }
                    },
                    "required": ["latitude", "longitude"]
                }),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Asks the model for the coordinates of `query`.
pub async fn geocode(config: &AppConfig, query: &AddressQuery) -> EditorResult<MapCoordinates> {
    let api_key = config
        .gemini_api_key
        .as_deref()
        .ok_or_else(|| EditorError::service("A chave da API do Gemini não está configurada."))?;

    let resp = Request::post(&config.generate_content_url())
        .header("x-goog-api-key", api_key)
        .json(&GeocodeRequest::new(query))?
        .send()
        .await?;

    let body = resp.text().await?;
    if !resp.ok() {
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.error.message)
            .unwrap_or_else(|_| format!("HTTP {}", resp.status()));
        return Err(EditorError::service(message));
    }

    let coords = parse_geocode_response(&body)?;
    log::info!("Geocoded address to {}, {}", coords.lat, coords.lon);
    Ok(coords)
}

/// Pulls `{latitude, longitude}` out of a generateContent reply. Numeric
/// strings are accepted; anything non-finite is rejected.
pub fn parse_geocode_response(body: &str) -> EditorResult<MapCoordinates> {
    let response: GenerateContentResponse = serde_json::from_str(body)?;
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().map(|p| p.text).collect())
        .ok_or_else(|| EditorError::service(INVALID_COORDINATES))?;

    parse_coordinate_object(&text)
}

fn parse_coordinate_object(text: &str) -> EditorResult<MapCoordinates> {
    let value: Value =
        serde_json::from_str(text).map_err(|_| EditorError::service(INVALID_COORDINATES))?;
    let lat = value.get("latitude").and_then(coerce_number);
    let lon = value.get("longitude").and_then(coerce_number);

    match (lat, lon) {
        (Some(lat), Some(lon)) => Ok(MapCoordinates::new(lat, lon)),
        _ => Err(EditorError::service(INVALID_COORDINATES)),
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}
