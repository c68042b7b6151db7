//! Shared types for nbfc-panel components.
//!
//! These are the messages exchanged with the NBFC service over its local
//! socket. Outbound requests are [`Command`] values; the answer to a
//! `status` request is a [`StatusSnapshot`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Lowest speed the daemon accepts, in percent
pub const MIN_SPEED: f64 = 0.0;

/// Highest speed the daemon accepts, in percent
pub const MAX_SPEED: f64 = 100.0;

/// Deserialize a value that may be null or missing (both become the default)
fn deserialize_null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let opt: Option<T> = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// Clamp a percentage into `[MIN_SPEED, MAX_SPEED]`. NaN becomes `MIN_SPEED`.
#[must_use]
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return MIN_SPEED;
    }
    value.clamp(MIN_SPEED, MAX_SPEED)
}

/// Requests understood by the daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandKind {
    Status,
    SetFanSpeed,
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandKind::Status => write!(f, "status"),
            CommandKind::SetFanSpeed => write!(f, "set-fan-speed"),
        }
    }
}

/// Requested fan speed: a fixed percentage or the daemon's own control
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FanSpeed {
    Percent(f64),
    Auto,
}

impl FanSpeed {
    /// Manual speed, clamped to the valid range.
    #[must_use]
    pub fn percent(value: f64) -> Self {
        Self::Percent(clamp_percent(value))
    }

    #[must_use]
    pub fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }

    #[must_use]
    pub fn as_percent(&self) -> Option<f64> {
        match self {
            Self::Percent(value) => Some(*value),
            Self::Auto => None,
        }
    }
}

impl std::fmt::Display for FanSpeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FanSpeed::Percent(value) => write!(f, "{value:.0}%"),
            FanSpeed::Auto => write!(f, "auto"),
        }
    }
}

impl std::str::FromStr for FanSpeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }

        let value: f64 = trimmed
            .trim_end_matches('%')
            .parse()
            .map_err(|_| format!("expected a percentage or 'auto', got '{s}'"))?;

        if !(MIN_SPEED..=MAX_SPEED).contains(&value) {
            return Err(format!("speed {value} is outside 0-100"));
        }
        Ok(Self::Percent(value))
    }
}

impl Serialize for FanSpeed {
    // Whole percentages are written as integers so the daemon sees `42`, not `42.0`.
    // The value is clamped to 0..=100 before the cast.
    #[allow(
        clippy::float_cmp,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            FanSpeed::Auto => serializer.serialize_str("auto"),
            FanSpeed::Percent(value) => {
                let value = clamp_percent(*value);
                if value.fract() == 0.0 {
                    serializer.serialize_u64(value as u64)
                } else {
                    serializer.serialize_f64(value)
                }
            }
        }
    }
}

impl<'de> Deserialize<'de> for FanSpeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum FanSpeedRaw {
            Number(f64),
            Text(String),
        }

        match FanSpeedRaw::deserialize(deserializer)? {
            FanSpeedRaw::Number(value) => Ok(Self::percent(value)),
            FanSpeedRaw::Text(text) if text.eq_ignore_ascii_case("auto") => Ok(Self::Auto),
            FanSpeedRaw::Text(text) => Err(D::Error::custom(format!(
                "invalid fan speed '{text}': expected a number or \"auto\""
            ))),
        }
    }
}

/// A request to the daemon.
///
/// Built fresh for every call through [`Command::status`] or
/// [`Command::set_fan_speed`]; fields are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    command: CommandKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fan: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    speed: Option<FanSpeed>,
}

impl Command {
    #[must_use]
    pub fn status() -> Self {
        Self {
            command: CommandKind::Status,
            fan: None,
            speed: None,
        }
    }

    #[must_use]
    pub fn set_fan_speed(fan: usize, speed: FanSpeed) -> Self {
        let speed = match speed {
            FanSpeed::Percent(value) => FanSpeed::percent(value),
            FanSpeed::Auto => FanSpeed::Auto,
        };
        Self {
            command: CommandKind::SetFanSpeed,
            fan: Some(fan),
            speed: Some(speed),
        }
    }

    #[must_use]
    pub fn kind(&self) -> CommandKind {
        self.command
    }

    #[must_use]
    pub fn fan(&self) -> Option<usize> {
        self.fan
    }

    #[must_use]
    pub fn speed(&self) -> Option<FanSpeed> {
        self.speed
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.fan, self.speed) {
            (Some(fan), Some(speed)) => write!(f, "{} fan={fan} speed={speed}", self.command),
            _ => write!(f, "{}", self.command),
        }
    }
}

/// Daemon state as reported by one `status` request
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatusSnapshot {
    #[serde(default)]
    pub pid: i64,

    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub config: String,

    #[serde(rename = "read-only", default)]
    pub read_only: bool,

    /// Degrees Celsius
    #[serde(default)]
    pub temperature: f64,

    /// In daemon index order: entry 0 is usually the CPU fan, entry 1 the GPU fan
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub fans: Vec<FanStatus>,
}

impl StatusSnapshot {
    #[must_use]
    pub fn fan(&self, index: usize) -> Option<&FanStatus> {
        self.fans.get(index)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FanStatus {
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub name: String,

    #[serde(rename = "automode", default)]
    pub auto_mode: bool,

    #[serde(default)]
    pub critical: bool,

    #[serde(default)]
    pub current_speed: f64,

    #[serde(default)]
    pub target_speed: f64,

    #[serde(default)]
    pub speed_steps: u32,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)] // Exact float comparisons are intentional in tests

    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_status_command_omits_fan_and_speed() {
        let json = serde_json::to_string(&Command::status()).unwrap();
        assert_eq!(json, r#"{"command":"status"}"#);
    }

    #[test]
    fn test_manual_speed_serializes_as_bare_number() {
        let cmd = Command::set_fan_speed(1, FanSpeed::percent(42.0));
        let json = serde_json::to_string(&cmd).unwrap();
        assert_eq!(json, r#"{"command":"set-fan-speed","fan":1,"speed":42}"#);

        let value = serde_json::to_value(&cmd).unwrap();
        assert!(value["speed"].is_number());
    }

    #[test]
    fn test_fractional_speed_keeps_fraction() {
        let cmd = Command::set_fan_speed(0, FanSpeed::percent(37.5));
        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(value["speed"], json!(37.5));
    }

    #[test]
    fn test_auto_speed_serializes_as_string() {
        let cmd = Command::set_fan_speed(0, FanSpeed::Auto);
        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(value["speed"], json!("auto"));
        assert_eq!(value["fan"], json!(0));
    }

    #[test]
    fn test_set_fan_speed_clamps_out_of_range() {
        let cmd = Command::set_fan_speed(0, FanSpeed::Percent(140.0));
        assert_eq!(cmd.speed(), Some(FanSpeed::Percent(100.0)));

        let cmd = Command::set_fan_speed(0, FanSpeed::Percent(-3.0));
        assert_eq!(cmd.speed(), Some(FanSpeed::Percent(0.0)));
    }

    #[test]
    fn test_fan_speed_deserialize() {
        let speed: FanSpeed = serde_json::from_value(json!("auto")).unwrap();
        assert!(speed.is_auto());

        let speed: FanSpeed = serde_json::from_value(json!("AUTO")).unwrap();
        assert!(speed.is_auto());

        let speed: FanSpeed = serde_json::from_value(json!(55)).unwrap();
        assert_eq!(speed.as_percent(), Some(55.0));

        assert!(serde_json::from_value::<FanSpeed>(json!("fast")).is_err());
        assert!(serde_json::from_value::<FanSpeed>(json!(true)).is_err());
    }

    #[test]
    fn test_fan_speed_from_str() {
        assert_eq!("auto".parse::<FanSpeed>(), Ok(FanSpeed::Auto));
        assert_eq!("Auto".parse::<FanSpeed>(), Ok(FanSpeed::Auto));
        assert_eq!("40".parse::<FanSpeed>(), Ok(FanSpeed::Percent(40.0)));
        assert_eq!("40%".parse::<FanSpeed>(), Ok(FanSpeed::Percent(40.0)));
        assert!("101".parse::<FanSpeed>().is_err());
        assert!("-1".parse::<FanSpeed>().is_err());
        assert!("loud".parse::<FanSpeed>().is_err());
    }

    #[test]
    fn test_command_display() {
        assert_eq!(Command::status().to_string(), "status");
        assert_eq!(
            Command::set_fan_speed(1, FanSpeed::Auto).to_string(),
            "set-fan-speed fan=1 speed=auto"
        );
        assert_eq!(
            Command::set_fan_speed(0, FanSpeed::percent(30.0)).to_string(),
            "set-fan-speed fan=0 speed=30%"
        );
    }

    #[test]
    fn test_status_snapshot_full() {
        let json = json!({
            "pid": 1423,
            "config": "HP Pavilion 15",
            "read-only": false,
            "temperature": 48.25,
            "fans": [
                {
                    "name": "CPU fan",
                    "automode": true,
                    "critical": false,
                    "current_speed": 37.5,
                    "target_speed": 40.0,
                    "speed_steps": 8
                },
                {
                    "name": "GPU fan",
                    "automode": false,
                    "critical": true,
                    "current_speed": 100.0,
                    "target_speed": 100.0,
                    "speed_steps": 4
                }
            ]
        });

        let snapshot: StatusSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(snapshot.pid, 1423);
        assert_eq!(snapshot.config, "HP Pavilion 15");
        assert!(!snapshot.read_only);
        assert_eq!(snapshot.temperature, 48.25);
        assert_eq!(snapshot.fans.len(), 2);

        let cpu = snapshot.fan(0).unwrap();
        assert_eq!(cpu.name, "CPU fan");
        assert!(cpu.auto_mode);
        assert_eq!(cpu.current_speed, 37.5);
        assert_eq!(cpu.speed_steps, 8);

        let gpu = snapshot.fan(1).unwrap();
        assert!(gpu.critical);
        assert!(!gpu.auto_mode);
        assert!(snapshot.fan(2).is_none());
    }

    #[test]
    fn test_status_snapshot_minimal() {
        let snapshot: StatusSnapshot = serde_json::from_str(r#"{"pid":1,"fans":[]}"#).unwrap();
        assert_eq!(snapshot.pid, 1);
        assert!(snapshot.fans.is_empty());
        assert!(snapshot.config.is_empty());
    }

    #[test]
    fn test_status_snapshot_null_fields() {
        let snapshot: StatusSnapshot =
            serde_json::from_str(r#"{"pid":7,"config":null,"fans":null}"#).unwrap();
        assert!(snapshot.config.is_empty());
        assert!(snapshot.fans.is_empty());
    }

    #[test]
    fn test_read_only_field_name() {
        let snapshot = StatusSnapshot {
            read_only: true,
            ..Default::default()
        };
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["read-only"], json!(true));
    }

    proptest! {
        #[test]
        fn prop_percent_is_always_in_range(value in proptest::num::f64::ANY) {
            let speed = FanSpeed::percent(value);
            let percent = speed.as_percent().unwrap();
            prop_assert!((MIN_SPEED..=MAX_SPEED).contains(&percent));
        }

        #[test]
        fn prop_manual_speed_encodes_as_number(value in 0.0f64..=100.0) {
            let cmd = Command::set_fan_speed(0, FanSpeed::percent(value));
            let encoded = serde_json::to_value(&cmd).unwrap();
            prop_assert!(encoded["speed"].is_number());
        }
    }
}
