use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{LuminousError, Result};

/// One of the seven named wallpaper base colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Violet,
    Indigo,
    Blue,
    Green,
    Yellow,
    Orange,
    Red,
}

impl Color {
    /// All colors in palette order.
    pub const ALL: [Color; 7] = [
        Color::Violet,
        Color::Indigo,
        Color::Blue,
        Color::Green,
        Color::Yellow,
        Color::Orange,
        Color::Red,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Violet => "violet",
            Self::Indigo => "indigo",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Orange => "orange",
            Self::Red => "red",
        }
    }
}

impl FromStr for Color {
    type Err = LuminousError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| LuminousError::InvalidField {
                field: "color",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendering style understood by the generation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Gradient,
    Geometric,
    Abstract,
}

impl Style {
    pub const ALL: [Style; 3] = [Style::Gradient, Style::Geometric, Style::Abstract];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gradient => "gradient",
            Self::Geometric => "geometric",
            Self::Abstract => "abstract",
        }
    }
}

impl FromStr for Style {
    type Err = LuminousError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| LuminousError::InvalidField {
                field: "style",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output size as `WIDTHxHEIGHT`.
///
/// Any pair of positive integers is accepted. The text the form sent is kept
/// and serialized unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Resolution {
    width: u32,
    height: u32,
    raw: String,
}

impl Resolution {
    /// Sizes offered by the form's resolution selector.
    pub const PRESETS: [(u32, u32); 4] = [(1280, 720), (1920, 1080), (2560, 1440), (3840, 2160)];

    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(LuminousError::InvalidField {
                field: "resolution",
                value: format!("{}x{}", width, height),
            });
        }
        Ok(Self {
            width,
            height,
            raw: format!("{}x{}", width, height),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Pixel dimensions as `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            raw: "1920x1080".to_string(),
        }
    }
}

impl FromStr for Resolution {
    type Err = LuminousError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || LuminousError::InvalidField {
            field: "resolution",
            value: s.to_string(),
        };
        let (w, h) = s.split_once('x').ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self {
            width,
            height,
            raw: s.to_string(),
        })
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for Resolution {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Resolution {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Color temperature in kelvin.
///
/// Travels over the wire as a numeric string (`"6500"`), which is how the
/// form's range input reports it. Text parsed from the form is sent back
/// exactly as it arrived.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColorTemp {
    kelvin: u32,
    raw: String,
}

impl ColorTemp {
    pub fn new(kelvin: u32) -> Self {
        Self {
            kelvin,
            raw: kelvin.to_string(),
        }
    }

    pub fn kelvin(&self) -> u32 {
        self.kelvin
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl Default for ColorTemp {
    fn default() -> Self {
        Self::new(6500)
    }
}

impl FromStr for ColorTemp {
    type Err = LuminousError;

    fn from_str(s: &str) -> Result<Self> {
        let kelvin: u32 = s.trim().parse().map_err(|_| LuminousError::InvalidField {
            field: "colorTemp",
            value: s.to_string(),
        })?;
        Ok(Self {
            kelvin,
            raw: s.to_string(),
        })
    }
}

impl fmt::Display for ColorTemp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for ColorTemp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for ColorTemp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u32),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
            Raw::Number(n) => Ok(ColorTemp::new(n)),
        }
    }
}

/// Body of a `POST /generate` call.
///
/// Fields are private: a request is built once from the form and is not
/// changed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    color: Color,
    style: Style,
    description: String,
    resolution: Resolution,
    #[serde(rename = "colorTemp")]
    color_temp: ColorTemp,
}

impl GenerationRequest {
    /// Start a request with the default resolution and color temperature.
    pub fn new(color: Color, style: Style, description: impl Into<String>) -> Self {
        Self {
            color,
            style,
            description: description.into(),
            resolution: Resolution::default(),
            color_temp: ColorTemp::default(),
        }
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_color_temp(mut self, color_temp: ColorTemp) -> Self {
        self.color_temp = color_temp;
        self
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn style(&self) -> Style {
        self.style
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    pub fn color_temp(&self) -> &ColorTemp {
        &self.color_temp
    }
}

/// Raw values of the five form fields, as the form reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub color: String,
    pub style: String,
    pub description: String,
    pub resolution: String,
    pub color_temp: String,
}

impl TryFrom<&FormFields> for GenerationRequest {
    type Error = LuminousError;

    fn try_from(form: &FormFields) -> Result<Self> {
        Ok(GenerationRequest::new(
            form.color.parse()?,
            form.style.parse()?,
            form.description.clone(),
        )
        .with_resolution(form.resolution.parse()?)
        .with_color_temp(form.color_temp.parse()?))
    }
}

/// Opaque job identifier assigned by the generation service.
///
/// The service may send it as a string or a number; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for JobId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => JobId(s),
            Raw::Number(n) => JobId(n.to_string()),
        })
    }
}

/// Response to `POST /generate`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub status: String,
    #[serde(default)]
    pub job_id: Option<JobId>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Job status as reported by `GET /preview/{jobId}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum PreviewStatus {
    Success,
    /// Still in progress. Holds the raw status (`pending`, `processing`, ...).
    Pending(String),
    /// The service gave up on the job.
    Error(String),
}

impl From<String> for PreviewStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "success" | "completed" => Self::Success,
            "error" | "failed" => Self::Error(s),
            _ => Self::Pending(s),
        }
    }
}

impl From<&str> for PreviewStatus {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

/// Parsed `GET /preview/{jobId}` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResult {
    pub status: PreviewStatus,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl PreviewResult {
    pub fn pending() -> Self {
        Self {
            status: PreviewStatus::Pending("pending".into()),
            preview_url: None,
            message: None,
        }
    }

    pub fn success(url: impl Into<String>) -> Self {
        Self {
            status: PreviewStatus::Success,
            preview_url: Some(url.into()),
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: PreviewStatus::Error("failed".into()),
            preview_url: None,
            message: Some(message.into()),
        }
    }

    /// The preview URL, but only when the job succeeded and the URL is non-empty.
    pub fn ready_url(&self) -> Option<&str> {
        match self.status {
            PreviewStatus::Success => self
                .preview_url
                .as_deref()
                .filter(|url| !url.trim().is_empty()),
            _ => None,
        }
    }
}
