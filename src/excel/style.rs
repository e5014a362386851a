//! Cell styles for the title, header and data rows

use crate::error::{SheetError, SheetResult};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// 24-bit colour, written as `"#RRGGBB"` in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u32);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xFFFFFF);
    pub const BLACK: Rgb = Rgb(0x000000);
    pub const LIGHT_BLUE: Rgb = Rgb(0x3366FF);
    pub const ORANGE: Rgb = Rgb(0xFF6600);
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let hex = value.strip_prefix('#').unwrap_or(&value);
        if hex.len() != 6 {
            return Err(format!("colour '{}' must be #RRGGBB", value));
        }
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("colour '{}' is not hexadecimal", value));
        }
        u32::from_str_radix(hex, 16)
            .map(Rgb)
            .map_err(|_| format!("colour '{}' is not hexadecimal", value))
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

/// Border drawn on all four sides of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    None,
    #[default]
    Thin,
    Medium,
    Thick,
    Dashed,
    Dotted,
    Double,
}

impl From<BorderStyle> for FormatBorder {
    fn from(value: BorderStyle) -> Self {
        match value {
            BorderStyle::None => FormatBorder::None,
            BorderStyle::Thin => FormatBorder::Thin,
            BorderStyle::Medium => FormatBorder::Medium,
            BorderStyle::Thick => FormatBorder::Thick,
            BorderStyle::Dashed => FormatBorder::Dashed,
            BorderStyle::Dotted => FormatBorder::Dotted,
            BorderStyle::Double => FormatBorder::Double,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    General,
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    Center,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub color: Rgb,
    pub size: f64,
    #[serde(default)]
    pub bold: bool,
}

/// Visual style applied uniformly to every cell of one row role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSpec {
    pub fill: Rgb,
    #[serde(default)]
    pub border: BorderStyle,
    #[serde(default)]
    pub align: HorizontalAlign,
    #[serde(default)]
    pub vertical_align: Option<VerticalAlign>,
    pub font: FontSpec,
}

impl StyleSpec {
    /// Light-blue banner, white 24pt bold
    pub fn title() -> Self {
        Self {
            fill: Rgb::LIGHT_BLUE,
            border: BorderStyle::Thin,
            align: HorizontalAlign::Center,
            vertical_align: None,
            font: FontSpec {
                color: Rgb::WHITE,
                size: 24.0,
                bold: true,
            },
        }
    }

    /// Orange column headers, white 12pt bold
    pub fn header() -> Self {
        Self {
            fill: Rgb::ORANGE,
            border: BorderStyle::Thin,
            align: HorizontalAlign::Center,
            vertical_align: None,
            font: FontSpec {
                color: Rgb::WHITE,
                size: 12.0,
                bold: true,
            },
        }
    }

    /// White cells, black regular text, centred both ways
    pub fn data() -> Self {
        Self {
            fill: Rgb::WHITE,
            border: BorderStyle::Thin,
            align: HorizontalAlign::Center,
            vertical_align: Some(VerticalAlign::Center),
            font: FontSpec {
                color: Rgb::BLACK,
                size: 11.0,
                bold: false,
            },
        }
    }

    pub fn to_format(&self) -> Format {
        let mut format = Format::new()
            .set_background_color(Color::RGB(self.fill.0))
            .set_pattern(FormatPattern::Solid)
            .set_border(self.border.into())
            .set_font_color(Color::RGB(self.font.color.0))
            .set_font_size(self.font.size);

        format = match self.align {
            HorizontalAlign::General => format,
            HorizontalAlign::Left => format.set_align(FormatAlign::Left),
            HorizontalAlign::Center => format.set_align(FormatAlign::Center),
            HorizontalAlign::Right => format.set_align(FormatAlign::Right),
        };

        format = match self.vertical_align {
            None => format,
            Some(VerticalAlign::Top) => format.set_align(FormatAlign::Top),
            Some(VerticalAlign::Center) => format.set_align(FormatAlign::VerticalCenter),
            Some(VerticalAlign::Bottom) => format.set_align(FormatAlign::Bottom),
        };

        if self.font.bold {
            format = format.set_bold();
        }
        format
    }

    fn validate(&self, role: &str) -> SheetResult<()> {
        if !(1.0..=409.0).contains(&self.font.size) {
            return Err(SheetError::Theme(format!(
                "{} font size {} is outside 1..=409",
                role, self.font.size
            )));
        }
        Ok(())
    }
}

/// The three style bundles used by an export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetTheme {
    pub title: StyleSpec,
    pub header: StyleSpec,
    pub data: StyleSpec,
}

impl Default for SheetTheme {
    fn default() -> Self {
        Self {
            title: StyleSpec::title(),
            header: StyleSpec::header(),
            data: StyleSpec::data(),
        }
    }
}

impl SheetTheme {
    /// Parse a theme from YAML; roles left out keep their default style
    pub fn from_yaml_str(yaml: &str) -> SheetResult<Self> {
        let theme: SheetTheme =
            serde_yaml::from_str(yaml).map_err(|e| SheetError::Theme(e.to_string()))?;
        theme.validate()?;
        Ok(theme)
    }

    pub fn from_yaml_file(path: &Path) -> SheetResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    pub fn validate(&self) -> SheetResult<()> {
        self.title.validate("title")?;
        self.header.validate("header")?;
        self.data.validate("data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme_constants() {
        let theme = SheetTheme::default();
        assert_eq!(theme.title.fill, Rgb::LIGHT_BLUE);
        assert_eq!(theme.title.font.size, 24.0);
        assert!(theme.title.font.bold);
        assert_eq!(theme.header.fill, Rgb::ORANGE);
        assert_eq!(theme.header.font.size, 12.0);
        assert_eq!(theme.data.fill, Rgb::WHITE);
        assert_eq!(theme.data.font.color, Rgb::BLACK);
        assert!(!theme.data.font.bold);
        assert_eq!(theme.data.vertical_align, Some(VerticalAlign::Center));
        assert!(theme.validate().is_ok());
    }

    #[test]
    fn test_rgb_parsing() {
        assert_eq!(Rgb::try_from("#3366FF".to_string()), Ok(Rgb(0x3366FF)));
        assert_eq!(Rgb::try_from("ff6600".to_string()), Ok(Rgb(0xFF6600)));
        assert!(Rgb::try_from("#FFF".to_string()).is_err());
        assert!(Rgb::try_from("#GGGGGG".to_string()).is_err());
        // from_str_radix alone would take the sign
        assert!(Rgb::try_from("#+FFFFF".to_string()).is_err());
        assert!(Rgb::try_from("-12345".to_string()).is_err());
        assert_eq!(Rgb(0x0A0B0C).to_string(), "#0A0B0C");
    }

    #[test]
    fn test_theme_from_yaml_overrides_one_role() {
        let yaml = r##"
header:
  fill: "#008000"
  border: medium
  align: left
  font:
    color: "#FFFFFF"
    size: 14
    bold: true
"##;
        let theme = SheetTheme::from_yaml_str(yaml).unwrap();
        assert_eq!(theme.header.fill, Rgb(0x008000));
        assert_eq!(theme.header.border, BorderStyle::Medium);
        assert_eq!(theme.header.align, HorizontalAlign::Left);
        assert_eq!(theme.header.font.size, 14.0);
        assert_eq!(theme.title, StyleSpec::title());
        assert_eq!(theme.data, StyleSpec::data());
    }

    #[test]
    fn test_theme_rejects_bad_values() {
        let bad_colour = "title:\n  fill: \"blue\"\n  font: { color: \"#FFFFFF\", size: 20 }\n";
        assert!(matches!(
            SheetTheme::from_yaml_str(bad_colour),
            Err(SheetError::Theme(_))
        ));

        let bad_size = "data:\n  fill: \"#FFFFFF\"\n  font: { color: \"#000000\", size: 0 }\n";
        assert!(matches!(
            SheetTheme::from_yaml_str(bad_size),
            Err(SheetError::Theme(msg)) if msg.contains("data font size")
        ));
    }
}
