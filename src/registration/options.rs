//! Enumerated choices offered by the business and payment steps.
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A selectable value with its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

const fn option(value: &'static str, label: &'static str) -> SelectOption {
    SelectOption { value, label }
}

pub const BUSINESS_TYPES: &[SelectOption] = &[
    option("retail", "Retail"),
    option("wholesale", "Wholesale"),
    option("service", "Service"),
    option("manufacturing", "Manufacturing"),
    option("technology", "Technology"),
    option("food_beverage", "Food & Beverage"),
    option("fashion", "Fashion"),
    option("other", "Other"),
];

pub const BUSINESS_CATEGORIES: &[SelectOption] = &[
    option("electronics", "Electronics"),
    option("clothing", "Clothing"),
    option("home_garden", "Home & Garden"),
    option("health_beauty", "Health & Beauty"),
    option("sports", "Sports & Recreation"),
    option("books_media", "Books & Media"),
    option("automotive", "Automotive"),
    option("jewelry", "Jewelry"),
    option("toys_games", "Toys & Games"),
    option("other", "Other"),
];

pub const DELIVERY_METHODS: &[SelectOption] = &[
    option("pickup", "Customer Pickup"),
    option("delivery", "Home Delivery"),
    option("shipping", "Shipping"),
    option("both", "Pickup & Delivery"),
];

/// Return true when `value` is one of the option values.
pub fn is_known(options: &[SelectOption], value: &str) -> bool {
    options.iter().any(|option| option.value == value)
}

/// Display label for `value`, falling back to the raw value.
pub fn label_or_value<'a>(options: &[SelectOption], value: &'a str) -> &'a str {
    options
        .iter()
        .find(|option| option.value == value)
        .map(|option| option.label)
        .unwrap_or(value)
}

/// Payment methods a merchant can accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentChannel {
    Bank,
    Mpesa,
    Cash,
}

impl PaymentChannel {
    pub const ALL: [PaymentChannel; 3] = [
        PaymentChannel::Bank,
        PaymentChannel::Mpesa,
        PaymentChannel::Cash,
    ];

    /// Return the wire identifier used in payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentChannel::Bank => "bank",
            PaymentChannel::Mpesa => "mpesa",
            PaymentChannel::Cash => "cash",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentChannel::Bank => "Bank Transfer",
            PaymentChannel::Mpesa => "M-Pesa",
            PaymentChannel::Cash => "Cash on Delivery",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        PaymentChannel::ALL
            .into_iter()
            .find(|channel| channel.as_str() == raw.trim())
    }
}

impl fmt::Display for PaymentChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split a channel field given either as a list or as a comma-joined string.
///
/// List items may themselves be comma-joined. Items are trimmed and empty
/// entries dropped; order is preserved.
pub fn split_channel_list(raw: &serde_json::Value) -> Vec<String> {
    let items: Vec<&str> = match raw {
        serde_json::Value::Array(items) => items.iter().filter_map(|item| item.as_str()).collect(),
        serde_json::Value::String(joined) => vec![joined.as_str()],
        _ => Vec::new(),
    };
    items
        .into_iter()
        .flat_map(|item| item.split(','))
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Deserialize a channel list from `["bank","mpesa"]` or `"bank,mpesa"`.
pub(crate) fn deserialize_channels<'de, D>(deserializer: D) -> Result<Vec<PaymentChannel>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    let mut channels = Vec::new();
    for item in split_channel_list(&raw) {
        let channel = PaymentChannel::parse(&item)
            .ok_or_else(|| de::Error::custom(format!("unknown payment channel {item:?}")))?;
        if !channels.contains(&channel) {
            channels.push(channel);
        }
    }
    Ok(channels)
}
