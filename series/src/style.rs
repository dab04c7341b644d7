use crate::DigitizerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_LINE_COLOR: Rgb = Rgb {
    r: 0x1f,
    g: 0x77,
    b: 0xb4,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for Rgb {
    fn default() -> Self {
        DEFAULT_LINE_COLOR
    }
}

impl FromStr for Rgb {
    type Err = DigitizerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || DigitizerError::InvalidColor(value.to_string());
        let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                // #rgb expands each nibble: #1af -> #11aaff
                let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Ok(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = DigitizerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Marker drawn at each digitized point. Serialized with the short tokens
/// used by saved series files; tokens and names (any case) are accepted on
/// input, the same as on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MarkerStyle {
    None,
    #[default]
    Circle,
    Square,
    Triangle,
    Diamond,
    Plus,
    Cross,
}

impl MarkerStyle {
    pub const ALL: [MarkerStyle; 7] = [
        MarkerStyle::None,
        MarkerStyle::Circle,
        MarkerStyle::Square,
        MarkerStyle::Triangle,
        MarkerStyle::Diamond,
        MarkerStyle::Plus,
        MarkerStyle::Cross,
    ];

    pub fn token(self) -> &'static str {
        match self {
            MarkerStyle::None => "None",
            MarkerStyle::Circle => "o",
            MarkerStyle::Square => "s",
            MarkerStyle::Triangle => "^",
            MarkerStyle::Diamond => "D",
            MarkerStyle::Plus => "+",
            MarkerStyle::Cross => "x",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MarkerStyle::None => "none",
            MarkerStyle::Circle => "circle",
            MarkerStyle::Square => "square",
            MarkerStyle::Triangle => "triangle",
            MarkerStyle::Diamond => "diamond",
            MarkerStyle::Plus => "plus",
            MarkerStyle::Cross => "cross",
        }
    }
}

impl FromStr for MarkerStyle {
    type Err = DigitizerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|marker| {
                marker.token() == trimmed || marker.name().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| {
                DigitizerError::MalformedSeriesData(format!("unknown marker style '{trimmed}'"))
            })
    }
}

impl TryFrom<String> for MarkerStyle {
    type Error = DigitizerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MarkerStyle> for String {
    fn from(marker: MarkerStyle) -> Self {
        marker.token().to_string()
    }
}

impl fmt::Display for MarkerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
    #[serde(default)]
    pub weight: FontWeight,
}

impl FontSpec {
    pub fn axis_default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            size: 16.0,
            weight: FontWeight::Normal,
        }
    }

    pub fn title_default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            size: 16.0,
            weight: FontWeight::Bold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_hex() {
        assert_eq!("#1f77b4".parse::<Rgb>().unwrap(), DEFAULT_LINE_COLOR);
        assert_eq!("#fff".parse::<Rgb>().unwrap(), Rgb::new(255, 255, 255));
        assert!("1f77b4".parse::<Rgb>().is_err());
        assert!("#12345g".parse::<Rgb>().is_err());
    }

    #[test]
    fn marker_accepts_token_or_name() {
        assert_eq!("^".parse::<MarkerStyle>().unwrap(), MarkerStyle::Triangle);
        assert_eq!("Diamond".parse::<MarkerStyle>().unwrap(), MarkerStyle::Diamond);
        assert!("star".parse::<MarkerStyle>().is_err());
    }

    #[test]
    fn marker_serde_matches_parsing() {
        for raw in ["\"Circle\"", "\"circle\"", "\"o\"", "\"CIRCLE\""] {
            let marker: MarkerStyle = serde_json::from_str(raw).expect(raw);
            assert_eq!(marker, MarkerStyle::Circle);
        }
        let none: MarkerStyle = serde_json::from_str("\"None\"").expect("none");
        assert_eq!(none, MarkerStyle::None);
        assert_eq!(
            serde_json::to_string(&MarkerStyle::Diamond).expect("json"),
            "\"D\""
        );
        assert!(serde_json::from_str::<MarkerStyle>("\"star\"").is_err());
    }
}
