//! Product variants and the peripherals they expose.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::device::DeviceInfo;

/// A hardware feature available on a product variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Peripheral {
    Storage,
    Cpu,
    Network,
    Memory,
    History,
    Log,
    CpuTemperature,
    GpuTemperature,
    TemperatureUnit,
    ClearHistory,
    DeleteLogFile,
    Oled,
    WsRgb,
    GpioFan,
    GpioFanMode,
    GpioFanLed,
    /// Power-supply co-processor board.
    Spc,
}

impl Peripheral {
    /// Wire name, as serialized.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Storage => "storage",
            Self::Cpu => "cpu",
            Self::Network => "network",
            Self::Memory => "memory",
            Self::History => "history",
            Self::Log => "log",
            Self::CpuTemperature => "cpu_temperature",
            Self::GpuTemperature => "gpu_temperature",
            Self::TemperatureUnit => "temperature_unit",
            Self::ClearHistory => "clear_history",
            Self::DeleteLogFile => "delete_log_file",
            Self::Oled => "oled",
            Self::WsRgb => "ws_rgb",
            Self::GpioFan => "gpio_fan",
            Self::GpioFanMode => "gpio_fan_mode",
            Self::GpioFanLed => "gpio_fan_led",
            Self::Spc => "spc",
        }
    }
}

impl fmt::Display for Peripheral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of a product variant.
#[derive(Debug, Clone, Copy)]
pub struct Variant {
    /// Human readable product name.
    pub name: &'static str,
    /// Stable identifier, also used as the dashboard database name.
    pub id: &'static str,
    /// Hardware revision.
    pub product_version: &'static str,
    /// Peripherals fitted on this variant.
    pub peripherals: &'static [Peripheral],
    system_defaults: fn() -> Map<String, Value>,
}

impl Variant {
    /// Default `system` section for this variant.
    #[must_use]
    pub fn system_defaults(&self) -> Map<String, Value> {
        (self.system_defaults)()
    }

    #[must_use]
    pub fn has_peripheral(&self, peripheral: Peripheral) -> bool {
        self.peripherals.contains(&peripheral)
    }

    /// Whether the dashboard should expose power-board features.
    #[must_use]
    pub fn spc_enabled(&self) -> bool {
        self.has_peripheral(Peripheral::Spc)
    }

    /// Build the descriptor handed to the dashboard.
    #[must_use]
    pub fn device_info(&self, version: impl Into<String>) -> DeviceInfo {
        DeviceInfo {
            name: self.name.to_string(),
            id: self.id.to_string(),
            peripherals: self.peripherals.to_vec(),
            version: version.into(),
        }
    }
}

/// The Pironman 5 case.
pub const PIRONMAN5: Variant = Variant {
    name: "Pironman 5",
    id: "pironman5",
    product_version: "1.0",
    peripherals: &[
        Peripheral::Storage,
        Peripheral::Cpu,
        Peripheral::Network,
        Peripheral::Memory,
        Peripheral::History,
        Peripheral::Log,
        Peripheral::CpuTemperature,
        Peripheral::GpuTemperature,
        Peripheral::TemperatureUnit,
        Peripheral::ClearHistory,
        Peripheral::DeleteLogFile,
        Peripheral::Oled,
        Peripheral::WsRgb,
        Peripheral::GpioFan,
        Peripheral::GpioFanMode,
        Peripheral::GpioFanLed,
    ],
    system_defaults: pironman5_system_defaults,
};

fn pironman5_system_defaults() -> Map<String, Value> {
    let defaults = json!({
        "data_interval": 1,
        "rgb_color": "#0a1aff",
        "rgb_brightness": 50,
        "rgb_style": "breathing",
        "rgb_speed": 50,
        "rgb_enable": true,
        "rgb_led_count": 4,
        "temperature_unit": "C",
        "oled_enable": true,
        "oled_rotation": 0,
        "gpio_fan_pin": 6,
        "gpio_fan_mode": 1,
        "gpio_fan_led": "follow",
        "gpio_fan_led_pin": 5,
    });
    match defaults {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_expose_pironman5_identity() {
        assert_eq!(PIRONMAN5.name, "Pironman 5");
        assert_eq!(PIRONMAN5.id, "pironman5");
    }

    #[test]
    fn should_not_enable_spc_without_power_board() {
        assert!(!PIRONMAN5.has_peripheral(Peripheral::Spc));
        assert!(!PIRONMAN5.spc_enabled());
    }

    #[test]
    fn should_enable_spc_when_peripheral_fitted() {
        let variant = Variant {
            peripherals: &[Peripheral::Spc, Peripheral::Oled],
            ..PIRONMAN5
        };
        assert!(variant.spc_enabled());
    }

    #[test]
    fn should_provide_system_defaults() {
        let defaults = PIRONMAN5.system_defaults();
        assert_eq!(defaults.get("data_interval"), Some(&Value::from(1)));
        assert_eq!(defaults.get("gpio_fan_mode"), Some(&Value::from(1)));
        assert_eq!(defaults.get("rgb_style"), Some(&Value::from("breathing")));
    }

    #[test]
    fn should_build_device_info() {
        let info = PIRONMAN5.device_info("1.2.3");
        assert_eq!(info.id, "pironman5");
        assert_eq!(info.version, "1.2.3");
        assert_eq!(info.peripherals.len(), PIRONMAN5.peripherals.len());
    }

    #[test]
    fn should_serialize_peripheral_in_snake_case() {
        let json = serde_json::to_string(&Peripheral::CpuTemperature).unwrap();
        assert_eq!(json, "\"cpu_temperature\"");
        assert_eq!(Peripheral::GpioFanLed.to_string(), "gpio_fan_led");
    }
}
