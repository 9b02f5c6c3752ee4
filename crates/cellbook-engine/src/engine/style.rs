//! Per-cell style attributes.
//!
//! Styles are sparse: every attribute is optional and unset by default.
//! Edits merge one [`StyleAttribute`] at a time into a [`CellStyle`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Horizontal alignment of a cell's text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

impl fmt::Display for Align {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        })
    }
}

impl FromStr for Align {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Align::Left),
            "center" => Ok(Align::Center),
            "right" => Ok(Align::Right),
            _ => Err(StyleError::InvalidValue {
                attribute: "align".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Errors from building a style attribute out of text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StyleError {
    #[error("unknown style attribute: {0}")]
    UnknownAttribute(String),

    #[error("invalid value {value:?} for style attribute {attribute}")]
    InvalidValue { attribute: String, value: String },
}

/// Optional style attributes of a cell.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellStyle {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub align: Option<Align>,
    pub font_family: Option<String>,
    pub font_size: Option<u32>,
    pub font_weight: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
}

/// A single style attribute with its value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StyleAttribute {
    Bold(bool),
    Italic(bool),
    Underline(bool),
    Align(Align),
    FontFamily(String),
    FontSize(u32),
    FontWeight(String),
    BackgroundColor(String),
    TextColor(String),
}

impl StyleAttribute {
    /// Attribute name as used in storage and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            StyleAttribute::Bold(_) => "bold",
            StyleAttribute::Italic(_) => "italic",
            StyleAttribute::Underline(_) => "underline",
            StyleAttribute::Align(_) => "align",
            StyleAttribute::FontFamily(_) => "font_family",
            StyleAttribute::FontSize(_) => "font_size",
            StyleAttribute::FontWeight(_) => "font_weight",
            StyleAttribute::BackgroundColor(_) => "background_color",
            StyleAttribute::TextColor(_) => "text_color",
        }
    }

    /// Build an attribute from its name and the unquoted value text.
    pub fn from_name_value(name: &str, value: &str) -> Result<StyleAttribute, StyleError> {
        let invalid = || StyleError::InvalidValue {
            attribute: name.to_string(),
            value: value.to_string(),
        };
        let flag = || value.parse::<bool>().map_err(|_| invalid());

        match name {
            "bold" => Ok(StyleAttribute::Bold(flag()?)),
            "italic" => Ok(StyleAttribute::Italic(flag()?)),
            "underline" => Ok(StyleAttribute::Underline(flag()?)),
            "align" => Ok(StyleAttribute::Align(value.parse()?)),
            "font_family" => Ok(StyleAttribute::FontFamily(value.to_string())),
            "font_size" => value
                .parse::<u32>()
                .map(StyleAttribute::FontSize)
                .map_err(|_| invalid()),
            "font_weight" => Ok(StyleAttribute::FontWeight(value.to_string())),
            "background_color" => Ok(StyleAttribute::BackgroundColor(value.to_string())),
            "text_color" => Ok(StyleAttribute::TextColor(value.to_string())),
            other => Err(StyleError::UnknownAttribute(other.to_string())),
        }
    }
}

impl CellStyle {
    /// Merge a single attribute, overwriting any previous value for it.
    pub fn apply(&mut self, attribute: StyleAttribute) {
        match attribute {
            StyleAttribute::Bold(v) => self.bold = Some(v),
            StyleAttribute::Italic(v) => self.italic = Some(v),
            StyleAttribute::Underline(v) => self.underline = Some(v),
            StyleAttribute::Align(v) => self.align = Some(v),
            StyleAttribute::FontFamily(v) => self.font_family = Some(v),
            StyleAttribute::FontSize(v) => self.font_size = Some(v),
            StyleAttribute::FontWeight(v) => self.font_weight = Some(v),
            StyleAttribute::BackgroundColor(v) => self.background_color = Some(v),
            StyleAttribute::TextColor(v) => self.text_color = Some(v),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == CellStyle::default()
    }

    /// The attributes that are set, in declaration order.
    pub fn attributes(&self) -> Vec<StyleAttribute> {
        let mut out = Vec::new();
        if let Some(v) = self.bold {
            out.push(StyleAttribute::Bold(v));
        }
        if let Some(v) = self.italic {
            out.push(StyleAttribute::Italic(v));
        }
        if let Some(v) = self.underline {
            out.push(StyleAttribute::Underline(v));
        }
        if let Some(v) = self.align {
            out.push(StyleAttribute::Align(v));
        }
        if let Some(v) = &self.font_family {
            out.push(StyleAttribute::FontFamily(v.clone()));
        }
        if let Some(v) = self.font_size {
            out.push(StyleAttribute::FontSize(v));
        }
        if let Some(v) = &self.font_weight {
            out.push(StyleAttribute::FontWeight(v.clone()));
        }
        if let Some(v) = &self.background_color {
            out.push(StyleAttribute::BackgroundColor(v.clone()));
        }
        if let Some(v) = &self.text_color {
            out.push(StyleAttribute::TextColor(v.clone()));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_apply_merges_single_attribute() {
        let mut style = CellStyle::default();
        style.apply(StyleAttribute::Bold(true));
        style.apply(StyleAttribute::TextColor("#8a6d1b".into()));
        style.apply(StyleAttribute::Bold(false));

        assert_eq!(style.bold, Some(false));
        assert_eq!(style.text_color.as_deref(), Some("#8a6d1b"));
        assert_eq!(style.italic, None);
    }

    #[test]
    fn test_attributes_lists_only_set_values() {
        let mut style = CellStyle::default();
        assert!(style.is_empty());
        style.apply(StyleAttribute::Align(Align::Center));
        style.apply(StyleAttribute::FontSize(14));
        assert_eq!(
            style.attributes(),
            vec![StyleAttribute::Align(Align::Center), StyleAttribute::FontSize(14)]
        );
    }

    #[test]
    fn test_from_name_value() {
        assert_eq!(
            StyleAttribute::from_name_value("align", "Right"),
            Ok(StyleAttribute::Align(Align::Right))
        );
        assert_eq!(
            StyleAttribute::from_name_value("font_size", "12"),
            Ok(StyleAttribute::FontSize(12))
        );
        assert!(matches!(
            StyleAttribute::from_name_value("bold", "yes"),
            Err(StyleError::InvalidValue { .. })
        ));
        assert_eq!(
            StyleAttribute::from_name_value("blink", "true"),
            Err(StyleError::UnknownAttribute("blink".into()))
        );
    }
}
