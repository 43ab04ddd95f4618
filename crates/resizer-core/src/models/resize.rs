use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Raw resize parameters as they arrive from a form or JSON body.
///
/// Every field is kept as text so the validator can report exactly which rule
/// a value broke. JSON numbers are accepted and converted to their decimal text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeRequest {
    #[serde(default, deserialize_with = "string_or_number")]
    pub width: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub height: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub quality: Option<String>,
    #[serde(default)]
    pub fit: Option<String>,
}

impl ResizeRequest {
    pub fn new(
        width: Option<&str>,
        height: Option<&str>,
        quality: Option<&str>,
        fit: Option<&str>,
    ) -> Self {
        Self {
            width: width.map(String::from),
            height: height.map(String::from),
            quality: quality.map(String::from),
            fit: fit.map(String::from),
        }
    }
}

/// Staged resize body: the object key plus the usual parameters.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StagedResizeRequest {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(flatten)]
    pub params: ResizeRequest,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::Text(s)) => Some(s),
        Some(Raw::Number(n)) => Some(n.to_string()),
    })
}

/// How the source aspect ratio is reconciled with the requested box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Scale to cover the box, then crop the overflow.
    #[default]
    Cover,
    /// Scale to fit inside the box, then letterbox to the exact size.
    Contain,
    /// Stretch to the exact size, ignoring the aspect ratio.
    Fill,
    /// Scale to fit inside the box without cropping or padding.
    Inside,
    /// Scale to cover the box without cropping.
    Outside,
}

impl FitMode {
    pub const ALL: [FitMode; 5] = [
        FitMode::Cover,
        FitMode::Contain,
        FitMode::Fill,
        FitMode::Inside,
        FitMode::Outside,
    ];

    /// Exact, case-sensitive match against the five accepted names.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cover" => Some(FitMode::Cover),
            "contain" => Some(FitMode::Contain),
            "fill" => Some(FitMode::Fill),
            "inside" => Some(FitMode::Inside),
            "outside" => Some(FitMode::Outside),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FitMode::Cover => "cover",
            FitMode::Contain => "contain",
            FitMode::Fill => "fill",
            FitMode::Inside => "inside",
            FitMode::Outside => "outside",
        }
    }
}

impl fmt::Display for FitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A target dimension after normalization.
///
/// `Infer` tells the codec to derive the value from the source aspect ratio;
/// callers must not compute it themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Pixels(u32),
    Infer,
}

impl Dimension {
    pub fn pixels(self) -> Option<u32> {
        match self {
            Dimension::Pixels(px) => Some(px),
            Dimension::Infer => None,
        }
    }

    pub fn is_infer(self) -> bool {
        matches!(self, Dimension::Infer)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Pixels(px) => write!(f, "{}", px),
            Dimension::Infer => f.write_str("auto"),
        }
    }
}

/// Validated, normalized resize parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResizeConfig {
    pub width: Dimension,
    pub height: Dimension,
    pub quality: u8,
    pub fit: FitMode,
}
