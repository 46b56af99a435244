//! Shipping

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::offers::UnknownVariant;

/// Delivery speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingType {
    /// Default delivery
    Standard,

    /// Faster delivery
    Express,

    /// Delivered the same day
    SameDay,
}

impl ShippingType {
    /// Storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Express => "express",
            Self::SameDay => "same_day",
        }
    }
}

impl fmt::Display for ShippingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShippingType {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "standard" => Ok(Self::Standard),
            "express" => Ok(Self::Express),
            "same_day" => Ok(Self::SameDay),
            other => Err(UnknownVariant::new("shipping type", other)),
        }
    }
}

/// One delivery option for a city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingOption {
    /// Speed
    pub shipping_type: ShippingType,

    /// Cost in fils
    pub cost: u64,

    /// Free-text estimate, e.g. "2-3 days"
    pub delivery_time: Option<String>,

    /// Offered to customers
    pub is_active: bool,
}

/// Pick the option to charge for.
///
/// The requested type wins when active, otherwise active standard delivery.
/// `None` means no charge.
pub fn select_shipping(
    options: &[ShippingOption],
    requested: Option<ShippingType>,
) -> Option<&ShippingOption> {
    let active = |shipping_type: ShippingType| {
        options
            .iter()
            .find(|option| option.shipping_type == shipping_type && option.is_active)
    };

    requested
        .and_then(active)
        .or_else(|| active(ShippingType::Standard))
}
