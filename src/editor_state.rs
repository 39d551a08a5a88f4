// src/editor_state.rs
use crate::config::FALLBACK_EXPORT_FILENAME;
use crate::error::{EditorError, EditorResult};
use crate::geocoding::AddressQuery;
use crate::map_content::{ContentField, FontChoice, MapContent, MapCoordinates, MapSource};

/// Long-running actions guarded by a busy flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Download,
    Share,
    Geocode,
    Locate,
}

impl Task {
    /// Prefix for alerts raised when this task fails.
    pub fn error_context(self) -> Option<&'static str> {
        match self {
            Task::Download => Some("Falha ao gerar a imagem"),
            Task::Share => Some("Falha ao compartilhar a imagem"),
            Task::Geocode => Some("Erro ao obter localização"),
            Task::Locate => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BusyFlags {
    downloading: bool,
    sharing: bool,
    geocoding: bool,
    locating: bool,
}

impl BusyFlags {
    fn slot(&mut self, task: Task) -> &mut bool {
        match task {
            Task::Download => &mut self.downloading,
            Task::Share => &mut self.sharing,
            Task::Geocode => &mut self.geocoding,
            Task::Locate => &mut self.locating,
        }
    }
}

/// Single source of truth for what the card shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorState {
    pub content: MapContent,
    pub coordinates: Option<MapCoordinates>,
    pub source: MapSource,
    pub coordinate_input: String,
    pub font: FontChoice,
    busy: BusyFlags,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_field(&mut self, field: ContentField, value: String) {
        self.content.set_field(field, value);
    }

    pub fn set_source(&mut self, source: MapSource) {
        self.source = source;
    }

    pub fn set_coordinate_input(&mut self, input: String) {
        self.coordinate_input = input;
    }

    /// Unknown names leave the selection untouched.
    pub fn set_font(&mut self, name: &str) -> bool {
        match FontChoice::from_name(name) {
            Some(font) => {
                self.font = font;
                true
            }
            None => false,
        }
    }

    pub fn set_image(&mut self, data_url: String) {
        self.content.map_image = Some(data_url);
        self.coordinates = None;
        self.source = MapSource::Image;
    }

    pub fn remove_image(&mut self) {
        self.content.map_image = None;
    }

    pub fn set_coordinates(&mut self, coords: MapCoordinates) {
        self.content.map_image = None;
        self.coordinates = Some(coords);
    }

    pub fn has_map_content(&self) -> bool {
        self.content.map_image.is_some() || self.coordinates.is_some()
    }

    pub fn address_query(&self) -> EditorResult<AddressQuery> {
        if !self.content.has_address() {
            return Err(EditorError::validation(
                "Por favor, preencha os campos de endereço, bairro e cidade para gerar o mapa.",
            ));
        }
        Ok(AddressQuery {
            address: self.content.bottom_text.clone(),
            neighborhood: self.content.top_right_line1.clone(),
            city: self.content.top_right_line2.clone(),
        })
    }

    /// Parses the coordinate input and, if valid, makes it the map.
    pub fn resolve_coordinate_input(&mut self) -> EditorResult<MapCoordinates> {
        let coords = parse_coordinates(&self.coordinate_input)?;
        self.set_coordinates(coords);
        Ok(coords)
    }

    pub fn ensure_exportable(&self) -> EditorResult<()> {
        if self.has_map_content() {
            Ok(())
        } else {
            Err(EditorError::validation(
                "Por favor, importe ou gere uma imagem de mapa primeiro.",
            ))
        }
    }

    pub fn export_filename(&self) -> String {
        export_filename(&self.content.top_left_line2)
    }

    /// Back to blank content. The chosen font is kept.
    pub fn reset(&mut self) {
        self.content = MapContent::default();
        self.coordinates = None;
        self.source = MapSource::Image;
        self.coordinate_input.clear();
    }

    /// Marks `task` as running. Returns false if it already was.
    pub fn try_begin(&mut self, task: Task) -> bool {
        let slot = self.busy.slot(task);
        if *slot {
            return false;
        }
        *slot = true;
        true
    }

    pub fn finish(&mut self, task: Task) {
        *self.busy.slot(task) = false;
    }

    /// Clears the busy flag of a completed task and puts its failure in context.
    pub fn complete<T>(&mut self, task: Task, result: EditorResult<T>) -> EditorResult<T> {
        self.finish(task);
        result.map_err(|e| match task.error_context() {
            Some(context) => e.with_context(context),
            None => e,
        })
    }

    /// Applies a geocoding or GPS result. A failure leaves the map untouched.
    pub fn apply_resolution(
        &mut self,
        task: Task,
        result: EditorResult<MapCoordinates>,
    ) -> EditorResult<()> {
        let coords = self.complete(task, result)?;
        self.set_coordinates(coords);
        Ok(())
    }

    pub fn is_busy(&self, task: Task) -> bool {
        match task {
            Task::Download => self.busy.downloading,
            Task::Share => self.busy.sharing,
            Task::Geocode => self.busy.geocoding,
            Task::Locate => self.busy.locating,
        }
    }
}

/// Parses `"<lat>, <lon>"`.
pub fn parse_coordinates(input: &str) -> EditorResult<MapCoordinates> {
    if input.trim().is_empty() {
        return Err(EditorError::validation("Por favor, insira as coordenadas."));
    }

    let parts: Vec<&str> = input.split(',').map(str::trim).collect();
    if parts.len() != 2 {
        return Err(EditorError::validation(
            "Formato de coordenadas inválido. Use o formato \"latitude, longitude\".",
        ));
    }

    match (parts[0].parse::<f64>(), parts[1].parse::<f64>()) {
        (Ok(lat), Ok(lon)) if lat.is_finite() && lon.is_finite() => {
            Ok(MapCoordinates::new(lat, lon))
        }
        _ => Err(EditorError::validation(
            "Coordenadas inválidas. Latitude e longitude devem ser números.",
        )),
    }
}

/// `mapa_<number>.png` with every non-alphanumeric ASCII char replaced by `_`.
pub fn export_filename(card_number: &str) -> String {
    let number = card_number.trim();
    if number.is_empty() {
        return FALLBACK_EXPORT_FILENAME.to_string();
    }
    let sanitized: String = number
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("mapa_{}.png", sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinates() {
        let coords = parse_coordinates("-8.05428, -34.8813").unwrap();
        assert_eq!(coords, MapCoordinates::new(-8.05428, -34.8813));
    }

    #[test]
    fn test_parse_coordinates_rejects() {
        for input in ["abc, 10", "1,2,3", "", "   ", "10", "NaN, 1", "1, inf"] {
            assert!(
                matches!(parse_coordinates(input), Err(EditorError::Validation(_))),
                "{:?}",
                input
            );
        }
    }

    #[test]
    fn test_bad_coordinate_input_leaves_state() {
        let mut state = EditorState::new();
        state.set_image("data:image/png;base64,AAAA".to_string());
        state.set_coordinate_input("1,2,3".to_string());
        let before = state.clone();
        assert!(state.resolve_coordinate_input().is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn test_sources_are_mutually_exclusive() {
        let mut state = EditorState::new();
        state.set_image("data:image/png;base64,AAAA".to_string());

        // coordinates mode
        state.set_source(MapSource::Coordinates);
        state.set_coordinate_input("-8.05428, -34.8813".to_string());
        state.resolve_coordinate_input().unwrap();
        assert!(state.content.map_image.is_none());
        assert!(state.coordinates.is_some());

        // uploading an image clears coordinates and switches back to image mode
        state.set_source(MapSource::Gps);
        state.set_image("data:image/png;base64,BBBB".to_string());
        assert!(state.coordinates.is_none());
        assert_eq!(state.source, MapSource::Image);

        // address / gps resolution
        for source in [MapSource::Address, MapSource::Gps] {
            state.set_image("data:image/png;base64,CCCC".to_string());
            state.set_source(source);
            state.set_coordinates(MapCoordinates::new(1.0, 2.0));
            assert!(state.content.map_image.is_none());
            assert_eq!(state.coordinates, Some(MapCoordinates::new(1.0, 2.0)));
        }
    }

    #[test]
    fn test_switching_mode_keeps_other_state() {
        let mut state = EditorState::new();
        state.set_field(ContentField::Address, "Rua da Aurora".to_string());
        state.set_coordinate_input("1, 2".to_string());
        state.set_coordinates(MapCoordinates::new(1.0, 2.0));

        state.set_source(MapSource::Address);
        state.set_source(MapSource::Image);
        state.set_source(MapSource::Coordinates);

        assert_eq!(state.coordinate_input, "1, 2");
        assert_eq!(state.content.bottom_text, "Rua da Aurora");
        assert_eq!(state.coordinates, Some(MapCoordinates::new(1.0, 2.0)));
    }

    #[test]
    fn test_remove_image_only_clears_image() {
        let mut state = EditorState::new();
        state.set_image("data:image/png;base64,AAAA".to_string());
        state.remove_image();
        assert!(state.content.map_image.is_none());
        assert!(!state.has_map_content());
    }

    #[test]
    fn test_address_query_requires_a_field() {
        let mut state = EditorState::new();
        assert!(matches!(state.address_query(), Err(EditorError::Validation(_))));

        state.set_field(ContentField::Neighborhood, "Boa Vista".to_string());
        let query = state.address_query().unwrap();
        assert_eq!(query.neighborhood, "Boa Vista");
        assert!(query.address.is_empty());
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(export_filename("12/A"), "mapa_12_A.png");
        assert_eq!(export_filename("  7 "), "mapa_7.png");
        assert_eq!(export_filename(""), "mapa_personalizado.png");
        assert_eq!(export_filename("nº3"), "mapa_n_3.png");
    }

    #[test]
    fn test_export_requires_map() {
        let mut state = EditorState::new();
        assert!(state.ensure_exportable().is_err());
        state.set_coordinates(MapCoordinates::new(0.0, 0.0));
        assert!(state.ensure_exportable().is_ok());
    }

    #[test]
    fn test_reset() {
        let mut state = EditorState::new();
        state.set_font("Poppins");
        state.set_field(ContentField::CardNumber, "12".to_string());
        state.set_field(ContentField::City, "Recife".to_string());
        state.set_coordinate_input("1, 2".to_string());
        state.resolve_coordinate_input().unwrap();
        state.set_source(MapSource::Gps);

        state.reset();

        assert_eq!(state.content, MapContent::default());
        assert!(state.coordinates.is_none());
        assert!(state.coordinate_input.is_empty());
        assert_eq!(state.source, MapSource::Image);
        assert_eq!(state.font, FontChoice::Poppins);
    }

    #[test]
    fn test_busy_flags() {
        let mut state = EditorState::new();
        assert!(state.try_begin(Task::Geocode));
        assert!(!state.try_begin(Task::Geocode));
        assert!(state.try_begin(Task::Download));
        assert!(state.is_busy(Task::Geocode));
        state.finish(Task::Geocode);
        assert!(!state.is_busy(Task::Geocode));
        assert!(state.try_begin(Task::Geocode));
    }

    #[test]
    fn test_failed_resolution_leaves_map() {
        let mut state = EditorState::new();
        state.set_image("data:image/png;base64,AAAA".to_string());
        assert!(state.try_begin(Task::Geocode));

        let body = r#"{"candidates":[{"content":{"parts":[{"text":"{\"latitude\": \"abc\", \"longitude\": -34.88}"}]}}]}"#;
        let bad_reply = crate::geocoding::parse_geocode_response(body);
        let err = state.apply_resolution(Task::Geocode, bad_reply).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Erro ao obter localização: Não foi possível obter coordenadas válidas para o endereço fornecido."
        );
        assert_eq!(state.content.map_image.as_deref(), Some("data:image/png;base64,AAAA"));
        assert!(state.coordinates.is_none());
        assert!(!state.is_busy(Task::Geocode));

        state.set_coordinates(MapCoordinates::new(1.0, 2.0));
        assert!(state.try_begin(Task::Locate));
        let denied = Err(EditorError::service("Permissão negada."));
        let err = state.apply_resolution(Task::Locate, denied).unwrap_err();
        assert_eq!(err.to_string(), "Permissão negada.");
        assert_eq!(state.coordinates, Some(MapCoordinates::new(1.0, 2.0)));
        assert!(!state.is_busy(Task::Locate));
    }

    #[test]
    fn test_resolution_sets_coordinates() {
        let mut state = EditorState::new();
        state.set_image("data:image/png;base64,AAAA".to_string());
        assert!(state.try_begin(Task::Geocode));
        state
            .apply_resolution(Task::Geocode, Ok(MapCoordinates::new(-8.0, -34.8)))
            .unwrap();
        assert_eq!(state.coordinates, Some(MapCoordinates::new(-8.0, -34.8)));
        assert!(state.content.map_image.is_none());
        assert!(!state.is_busy(Task::Geocode));
    }

    #[test]
    fn test_complete_adds_export_context() {
        let mut state = EditorState::new();
        assert!(state.try_begin(Task::Download));
        let failed: EditorResult<()> = Err(EditorError::capture("sem imagem"));
        let err = state.complete(Task::Download, failed).unwrap_err();
        assert_eq!(err.to_string(), "Falha ao gerar a imagem: sem imagem");
        assert!(!state.is_busy(Task::Download));

        assert!(state.try_begin(Task::Share));
        let failed: EditorResult<()> = Err(EditorError::service("NotAllowedError"));
        let err = state.complete(Task::Share, failed).unwrap_err();
        assert_eq!(err.to_string(), "Falha ao compartilhar a imagem: NotAllowedError");
    }

    #[test]
    fn test_unknown_font_is_ignored() {
        let mut state = EditorState::new();
        assert!(!state.set_font("Papyrus"));
        assert_eq!(state.font, FontChoice::Montserrat);
    }
}
