use serde::{Deserialize, Serialize};

/// Unit vocabulary understood by the upstream provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
            UnitSystem::Standard => "standard",
        }
    }

    pub const fn all() -> &'static [UnitSystem] {
        &[UnitSystem::Metric, UnitSystem::Imperial, UnitSystem::Standard]
    }

    /// Parse a caller-supplied selector, falling back to [`UnitSystem::Metric`]
    /// for anything unrecognized. Never fails.
    pub fn normalize(value: &str) -> Self {
        let lower = value.trim().to_lowercase();

        match lower.as_str() {
            "metric" => UnitSystem::Metric,
            "imperial" => UnitSystem::Imperial,
            "standard" => UnitSystem::Standard,
            _ => {
                tracing::debug!(requested = value, "unknown unit system, using metric");
                UnitSystem::default()
            }
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The compact unit marker a user picks in the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemperatureSymbol {
    #[serde(rename = "°C")]
    Celsius,
    #[serde(rename = "°F")]
    Fahrenheit,
}

impl TemperatureSymbol {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureSymbol::Celsius => "°C",
            TemperatureSymbol::Fahrenheit => "°F",
        }
    }

    pub const fn all() -> &'static [TemperatureSymbol] {
        &[TemperatureSymbol::Celsius, TemperatureSymbol::Fahrenheit]
    }

    /// `°C` asks for metric, everything else for imperial.
    pub fn unit_system(&self) -> UnitSystem {
        match self {
            TemperatureSymbol::Celsius => UnitSystem::Metric,
            TemperatureSymbol::Fahrenheit => UnitSystem::Imperial,
        }
    }
}

impl std::fmt::Display for TemperatureSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TemperatureSymbol {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "°C" | "C" | "c" => Ok(TemperatureSymbol::Celsius),
            "°F" | "F" | "f" => Ok(TemperatureSymbol::Fahrenheit),
            _ => Err(anyhow::anyhow!(
                "Unknown unit '{value}'. Supported units: °C, °F."
            )),
        }
    }
}
