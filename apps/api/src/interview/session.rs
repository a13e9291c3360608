//! Inbound session snapshot types. The server keeps no session state between
//! calls; the client echoes the full snapshot on every turn and these types
//! give that payload a validated static shape with explicit defaulting rules.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Interview style selector. Controls which knowledge entries and evaluation
/// framing apply.
///
/// Deserialization is permissive: any unrecognized or non-string value
/// silently defaults to `Behavioral`. A malformed mode should not block the
/// user from getting a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Behavioral,
    Technical,
    Both,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Behavioral => "behavioral",
            Mode::Technical => "technical",
            Mode::Both => "both",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Mode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value.as_str() {
            Some("technical") => Mode::Technical,
            Some("both") => Mode::Both,
            _ => Mode::Behavioral,
        })
    }
}

/// One prior turn as supplied by the caller. Any role other than `assistant`
/// is treated as the candidate speaking.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HistoryMessage {
    pub role: String,
    pub content: String,
}

/// Full session snapshot for one interview turn. Every field is defaulted so
/// a sparse payload still deserializes; semantic validation (job description
/// length, credential presence) happens in the handler.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InterviewRequest {
    pub job_description: String,
    pub resume: String,
    pub mode: Mode,
    #[serde(deserialize_with = "deserialize_focus_areas")]
    pub focus_areas: Vec<String>,
    pub experience_level: String,
    pub target_role: String,
    pub questions_remaining: Option<u32>,
    pub history: Vec<HistoryMessage>,
    pub directive: String,
}

#[derive(Debug, Serialize)]
pub struct InterviewResponse {
    pub text: String,
}

/// Accepts either a JSON sequence of strings or a single comma-separated
/// string; normalizes to trimmed, non-empty items. Anything else yields an
/// empty list.
fn deserialize_focus_areas<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FocusAreasInput {
        Many(Vec<String>),
        Joined(String),
        Other(serde_json::Value),
    }

    let items = match FocusAreasInput::deserialize(deserializer)? {
        FocusAreasInput::Many(items) => items,
        FocusAreasInput::Joined(joined) => joined.split(',').map(str::to_string).collect(),
        FocusAreasInput::Other(_) => Vec::new(),
    };

    Ok(items
        .iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect())
}
