use crate::error::{IndexadaError, Result};
use serde::{Deserialize, Serialize};

/// Household appliance with a nominal power draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub name: String,
    #[serde(alias = "power")]
    pub power_watts: f64,
}

impl Device {
    pub fn new(name: &str, power_watts: f64) -> Self {
        Self {
            name: name.to_string(),
            power_watts,
        }
    }
}

/// Cost of running a device for one hour
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceCost {
    pub name: String,
    pub cost: f64,
}

/// Project the one-hour running cost of each device at `price` per kWh.
///
/// Output keeps the order of `devices`.
pub fn project_costs(price: f64, devices: &[Device]) -> Result<Vec<DeviceCost>> {
    if !price.is_finite() {
        return Err(IndexadaError::validation(
            "price",
            format!("Cannot project costs from {}", price),
        ));
    }
    Ok(devices
        .iter()
        .map(|d| DeviceCost {
            name: d.name.clone(),
            cost: d.power_watts / 1000.0 * price,
        })
        .collect())
}
