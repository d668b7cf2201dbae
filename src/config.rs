use std::env;
use std::ffi::OsString;

use thiserror::Error;

use crate::fetch::{FetchConfig, DEVICE_ID_LEN};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("SIMPLICITY_DEVICE_ID is not set")]
    MissingDeviceId,
    #[error("SIMPLICITY_DEVICE_ID is {0} bytes long, expected {}", DEVICE_ID_LEN)]
    DeviceIdLength(usize),
    #[error("{name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Host-side settings. The watch face itself never looks at the environment.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub device_identifier: [u8; DEVICE_ID_LEN],
    pub clock_24h: bool,
    pub fetch: FetchConfig,
}

impl Config {
    /// Load `.env` (if present) and read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var_os(name).map(os_bytes))
    }

    /// Build the configuration from raw variable values. The device identifier is taken byte for
    /// byte; every other value must be UTF-8.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<Vec<u8>>) -> Result<Self, ConfigError> {
        let device_id = lookup("SIMPLICITY_DEVICE_ID").ok_or(ConfigError::MissingDeviceId)?;
        let mut device_identifier = [0; DEVICE_ID_LEN];
        if device_id.len() != DEVICE_ID_LEN {
            return Err(ConfigError::DeviceIdLength(device_id.len()));
        }
        device_identifier.copy_from_slice(&device_id);

        let text = |name: &'static str| {
            lookup(name)
                .map(|value| {
                    String::from_utf8(value).map_err(|e| ConfigError::Invalid {
                        name,
                        value: String::from_utf8_lossy(e.as_bytes()).into_owned(),
                    })
                })
                .transpose()
        };

        let clock_24h = match text("SIMPLICITY_CLOCK_24H")? {
            Some(value) => parse("SIMPLICITY_CLOCK_24H", value)?,
            None => true,
        };

        let mut fetch = FetchConfig::default();
        if let Some(base_path) = text("SIMPLICITY_BASE_PATH")? {
            fetch.base_path = base_path;
        }
        if let Some(capacity) = text("SIMPLICITY_PATH_CAPACITY")? {
            fetch.path_capacity = parse("SIMPLICITY_PATH_CAPACITY", capacity)?;
        }

        Ok(Self {
            device_identifier,
            clock_24h,
            fetch,
        })
    }
}

#[cfg(unix)]
fn os_bytes(value: OsString) -> Vec<u8> {
    use std::os::unix::ffi::OsStringExt;
    value.into_vec()
}

#[cfg(not(unix))]
fn os_bytes(value: OsString) -> Vec<u8> {
    value.to_string_lossy().into_owned().into_bytes()
}

fn parse<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}
