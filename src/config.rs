//! Environment configuration.

use std::{env, fmt::Display, str::FromStr};

use rust_decimal_macros::dec;
use thiserror::Error;
use tracing::info;

use crate::domain::value_objects::VatRate;

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub nats_url: Option<String>,
    pub nats_subject_prefix: String,
    /// Used for payout suggestions when a seller has no rate of its own.
    pub default_seller_vat_rate: VatRate,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8083,
            nats_url: None,
            nats_subject_prefix: "sneakerask".to_string(),
            default_seller_vat_rate: VatRate::standard(dec!(21)),
        }
    }
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let default_seller_vat_rate = match lookup("DEFAULT_SELLER_VAT_RATE") {
            Some(value) => VatRate::parse("DEFAULT_SELLER_VAT_RATE", &value).map_err(|e| ConfigError::Invalid {
                key: "DEFAULT_SELLER_VAT_RATE",
                value,
                reason: e.to_string(),
            })?,
            None => {
                info!("DEFAULT_SELLER_VAT_RATE not set, using default: {}", defaults.default_seller_vat_rate);
                defaults.default_seller_vat_rate
            }
        };

        Ok(Self {
            port: try_load(&lookup, "PORT", defaults.port)?,
            nats_url: lookup("NATS_URL").filter(|url| !url.trim().is_empty()),
            nats_subject_prefix: try_load(&lookup, "NATS_SUBJECT_PREFIX", defaults.nats_subject_prefix)?,
            default_seller_vat_rate,
        })
    }
}

fn try_load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
