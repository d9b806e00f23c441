//! Action — the command a rule issues against one actuator.

use serde::{Deserialize, Deserializer, Serialize};

use crate::id::DeviceId;
use crate::time::Millis;

/// Command applied to an actuator, by rules or by a calling layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    TurnOn,
    TurnOff,
    Toggle,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TurnOn => f.write_str("turn_on"),
            Self::TurnOff => f.write_str("turn_off"),
            Self::Toggle => f.write_str("toggle"),
        }
    }
}

/// Buzzer duty-cycle pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuzzerPattern {
    /// 1000 ms cycle, sounding for the first 500 ms.
    Alarm,
    /// 2000 ms cycle, sounding for the first 100 ms.
    Beep,
}

impl BuzzerPattern {
    /// Length of one full cycle.
    #[must_use]
    pub fn cycle_ms(self) -> Millis {
        match self {
            Self::Alarm => 1_000,
            Self::Beep => 2_000,
        }
    }

    /// Sounding part at the start of each cycle.
    #[must_use]
    pub fn on_ms(self) -> Millis {
        match self {
            Self::Alarm => 500,
            Self::Beep => 100,
        }
    }

    /// Output level `elapsed` milliseconds after playback started.
    #[must_use]
    pub fn is_on_at(self, elapsed: Millis) -> bool {
        elapsed % self.cycle_ms() < self.on_ms()
    }
}

impl std::str::FromStr for BuzzerPattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alarm" => Ok(Self::Alarm),
            "beep" => Ok(Self::Beep),
            other => Err(format!("unknown buzzer pattern {other:?}")),
        }
    }
}

impl std::fmt::Display for BuzzerPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Alarm => f.write_str("alarm"),
            Self::Beep => f.write_str("beep"),
        }
    }
}

/// An operation a rule performs when it activates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub actuator_id: DeviceId,
    #[serde(rename = "action")]
    pub kind: ActionKind,
    /// Auto-off delay applied after `turn_on`; relays only.
    #[serde(default, alias = "duration")]
    pub duration_ms: Option<Millis>,
    /// Pattern started after `turn_on`; buzzers only. A blank string means
    /// no pattern.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub pattern: Option<BuzzerPattern>,
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<BuzzerPattern>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(name) => name.parse().map(Some).map_err(|_| {
            serde::de::Error::unknown_variant(name, &["alarm", "beep"])
        }),
    }
}

impl Action {
    #[must_use]
    pub fn new(actuator_id: impl Into<DeviceId>, kind: ActionKind) -> Self {
        Self {
            actuator_id: actuator_id.into(),
            kind,
            duration_ms: None,
            pattern: None,
        }
    }

    #[must_use]
    pub fn with_duration(mut self, duration_ms: Millis) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: BuzzerPattern) -> Self {
        self.pattern = Some(pattern);
        self
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.kind, self.actuator_id)
    }
}
