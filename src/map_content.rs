// src/map_content.rs

/// Everything printed on the card apart from the map itself.
#[derive(Debug, Clone, PartialEq)]
pub struct MapContent {
    pub top_left_line1: String,
    /// Card number.
    pub top_left_line2: String,
    /// Neighborhood.
    pub top_right_line1: String,
    /// City.
    pub top_right_line2: String,
    /// Street address, printed in the footer.
    pub bottom_text: String,
    /// Uploaded image as a data URI.
    pub map_image: Option<String>,
}

impl Default for MapContent {
    fn default() -> Self {
        Self {
            top_left_line1: String::from("Mapa"),
            top_left_line2: String::new(),
            top_right_line1: String::new(),
            top_right_line2: String::new(),
            bottom_text: String::new(),
            map_image: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentField {
    CardNumber,
    Neighborhood,
    City,
    Address,
}

impl MapContent {
    pub fn field(&self, field: ContentField) -> &str {
        match field {
            ContentField::CardNumber => &self.top_left_line2,
            ContentField::Neighborhood => &self.top_right_line1,
            ContentField::City => &self.top_right_line2,
            ContentField::Address => &self.bottom_text,
        }
    }

    pub fn set_field(&mut self, field: ContentField, value: String) {
        let slot = match field {
            ContentField::CardNumber => &mut self.top_left_line2,
            ContentField::Neighborhood => &mut self.top_right_line1,
            ContentField::City => &mut self.top_right_line2,
            ContentField::Address => &mut self.bottom_text,
        };
        *slot = value;
    }

    pub fn has_address(&self) -> bool {
        [&self.bottom_text, &self.top_right_line1, &self.top_right_line2]
            .iter()
            .any(|f| !f.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapCoordinates {
    pub lat: f64,
    pub lon: f64,
}

impl MapCoordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapSource {
    #[default]
    Image,
    Address,
    Coordinates,
    Gps,
}

impl MapSource {
    pub const ALL: [MapSource; 4] = [
        MapSource::Image,
        MapSource::Address,
        MapSource::Coordinates,
        MapSource::Gps,
    ];

    pub fn value(&self) -> &'static str {
        match self {
            MapSource::Image => "image",
            MapSource::Address => "address",
            MapSource::Coordinates => "coordinates",
            MapSource::Gps => "gps",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MapSource::Image => "Imagem",
            MapSource::Address => "Endereço",
            MapSource::Coordinates => "Coordenadas",
            MapSource::Gps => "GPS",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontChoice {
    #[default]
    Montserrat,
    Lato,
    NotoSans,
    NunitoSans,
    OpenSans,
    Poppins,
    Roboto,
    SourceSansPro,
}

impl FontChoice {
    pub const ALL: [FontChoice; 8] = [
        FontChoice::Montserrat,
        FontChoice::Lato,
        FontChoice::NotoSans,
        FontChoice::NunitoSans,
        FontChoice::OpenSans,
        FontChoice::Poppins,
        FontChoice::Roboto,
        FontChoice::SourceSansPro,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FontChoice::Montserrat => "Montserrat",
            FontChoice::Lato => "Lato",
            FontChoice::NotoSans => "Noto Sans",
            FontChoice::NunitoSans => "Nunito Sans",
            FontChoice::OpenSans => "Open Sans",
            FontChoice::Poppins => "Poppins",
            FontChoice::Roboto => "Roboto",
            FontChoice::SourceSansPro => "Source Sans Pro",
        }
    }

    pub fn class_name(&self) -> String {
        format!("font-{}", self.name().to_lowercase().replace(' ', "-"))
    }

    pub fn family(&self) -> String {
        format!("'{}', sans-serif", self.name())
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_content() {
        let content = MapContent::default();
        assert_eq!(content.top_left_line1, "Mapa");
        assert!(content.top_left_line2.is_empty());
        assert!(content.map_image.is_none());
        assert!(!content.has_address());
    }

    #[test]
    fn test_set_field() {
        let mut content = MapContent::default();
        content.set_field(ContentField::City, "Recife".to_string());
        content.set_field(ContentField::CardNumber, "12".to_string());
        assert_eq!(content.top_right_line2, "Recife");
        assert_eq!(content.field(ContentField::CardNumber), "12");
        assert!(content.has_address());
    }

    #[test]
    fn test_font_registry() {
        assert_eq!(FontChoice::default(), FontChoice::Montserrat);
        let font = FontChoice::from_name("Source Sans Pro").unwrap();
        assert_eq!(font.class_name(), "font-source-sans-pro");
        assert_eq!(font.family(), "'Source Sans Pro', sans-serif");
        assert!(FontChoice::from_name("Comic Sans").is_none());
    }

    #[test]
    fn test_source_values() {
        let values: Vec<_> = MapSource::ALL.iter().map(|s| s.value()).collect();
        assert_eq!(values, vec!["image", "address", "coordinates", "gps"]);
        assert_eq!(MapSource::default(), MapSource::Image);
    }
}
