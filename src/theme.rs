//! Form decoration: color swatches, style pulses and the color temperature
//! theme variable.

use std::time::Duration;

use crate::types::{Color, ColorTemp};

/// How long a style preview stays highlighted after the style changes.
pub const STYLE_PULSE: Duration = Duration::from_millis(200);

/// Theme variable that mirrors the color temperature slider.
pub const COLOR_TEMP_VAR: &str = "--color-temp";

/// Swatch colors for a color option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwatchStyle {
    pub background: &'static str,
    pub text: &'static str,
}

impl Color {
    /// Hex value of this color in the VIBGYOR palette.
    pub fn hex(&self) -> &'static str {
        match self {
            Self::Violet => "#8B00FF",
            Self::Indigo => "#4B0082",
            Self::Blue => "#0000FF",
            Self::Green => "#00FF00",
            Self::Yellow => "#FFFF00",
            Self::Orange => "#FFA500",
            Self::Red => "#FF0000",
        }
    }
}

/// Swatch for a color option value. Values outside the palette stay unstyled.
pub fn swatch_style(option_value: &str) -> Option<SwatchStyle> {
    let color: Color = option_value.parse().ok()?;
    Some(SwatchStyle {
        background: color.hex(),
        text: "#fff",
    })
}

/// Value written to [`COLOR_TEMP_VAR`], e.g. `6500K`.
pub fn color_temp_value(temp: &ColorTemp) -> String {
    format!("{}K", temp.kelvin())
}
