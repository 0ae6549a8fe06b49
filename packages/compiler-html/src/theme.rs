use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Accent color used when no theme has been chosen
pub const DEFAULT_ACCENT: &str = "#4361ee";

/// Per-channel decrement applied for hover states
pub const HOVER_DARKEN: u8 = 30;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThemeError {
    #[error("Invalid theme color `{0}`: expected #rgb or #rrggbb")]
    InvalidColor(String),
}

/// Document-level accent color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Theme {
    r: u8,
    g: u8,
    b: u8,
}

impl Theme {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or the `#rgb` shorthand (case-insensitive)
    pub fn parse(source: &str) -> Result<Self, ThemeError> {
        let invalid = || ThemeError::InvalidColor(source.to_string());
        let hex = source.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let doubled: String = hex.chars().flat_map(|c| [c, c]).collect();
                Self::parse(&format!("#{}", doubled))
            }
            _ => Err(invalid()),
        }
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Subtract `amount` from each channel, clamped at zero
    pub fn darken(&self, amount: u8) -> Self {
        Self::rgb(
            self.r.saturating_sub(amount),
            self.g.saturating_sub(amount),
            self.b.saturating_sub(amount),
        )
    }

    /// Variant used for hover states
    pub fn hover(&self) -> Self {
        self.darken(HOVER_DARKEN)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::rgb(0x43, 0x61, 0xee)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Theme {
    type Error = ThemeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Theme> for String {
    fn from(theme: Theme) -> Self {
        theme.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_format() {
        let theme = Theme::parse("#4361EE").unwrap();
        assert_eq!(theme.to_hex(), "#4361ee");
        assert_eq!(Theme::parse("#fa0").unwrap().to_hex(), "#ffaa00");
        assert_eq!(Theme::default().to_hex(), DEFAULT_ACCENT);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Theme::parse("4361ee").is_err());
        assert!(Theme::parse("#4361e").is_err());
        assert!(Theme::parse("#zzzzzz").is_err());
        assert!(Theme::parse("#+1+1+1").is_err());
    }

    #[test]
    fn test_darken_clamps_at_zero() {
        let theme = Theme::parse("#4361ee").unwrap();
        assert_eq!(theme.hover().to_hex(), "#2543d0");
        assert_eq!(Theme::parse("#10ff05").unwrap().darken(30).to_hex(), "#00e100");
    }

    #[test]
    fn test_serde_as_hex_string() {
        let theme = Theme::parse("#e63946").unwrap();
        let json = serde_json::to_string(&theme).unwrap();
        assert_eq!(json, "\"#e63946\"");
        let back: Theme = serde_json::from_str(&json).unwrap();
        assert_eq!(back, theme);
        assert!(serde_json::from_str::<Theme>("\"red\"").is_err());
    }
}
