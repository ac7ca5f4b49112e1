// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0
// https://github.com/spkenv/spk

use std::sync::{Arc, RwLock};

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::{DEFAULT_BUFFER_SIZE, DigestAlgorithm, Error, Result};

#[cfg(test)]
#[path = "./config_test.rs"]
mod config_test;

static CONFIG: OnceCell<RwLock<Arc<Config>>> = OnceCell::new();

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct FingerprintConfig {
    /// The number of encoded bytes to collect before updating the digest
    pub buffer_size: usize,

    /// The hash algorithm used to compute new fingerprints
    ///
    /// Changing this invalidates every fingerprint that
    /// was stored with a different algorithm.
    pub algorithm: DigestAlgorithm,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            algorithm: DigestAlgorithm::default(),
        }
    }
}

impl FingerprintConfig {
    /// Check that these settings can be used to create an encoder
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(Error::InvalidBufferSize(self.buffer_size));
        }
        Ok(())
    }
}

/// Configuration values for fingerprinting.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    // These sub-types should aim to only have one level of
    // values within them, otherwise they become impossible to address
    // with environment variables.
    pub fingerprint: FingerprintConfig,
}

impl Config {
    /// Get the current loaded config, loading it if needed
    pub fn current() -> Result<Arc<Self>> {
        get_config()
    }

    /// Load the config from disk, even if it's already been loaded before
    pub fn load() -> Result<Self> {
        load_config()
    }

    /// Make this config the current global one
    pub fn make_current(self) -> Result<Arc<Self>> {
        // Note we don't know if we won the race to set the value here,
        // so we still need to try to update it.
        let config = CONFIG.get_or_try_init(|| -> Result<RwLock<Arc<Config>>> {
            Ok(RwLock::new(Arc::new(self.clone())))
        })?;

        let mut lock = config
            .write()
            .map_err(|err| Error::LockPoisonedWrite(err.to_string()))?;
        *Arc::make_mut(&mut lock) = self;
        Ok(Arc::clone(&lock))
    }
}

/// Get the current config, fetching it from disk if needed.
pub fn get_config() -> Result<Arc<Config>> {
    let config = CONFIG.get_or_try_init(|| -> Result<RwLock<Arc<Config>>> {
        Ok(RwLock::new(Arc::new(load_config()?)))
    })?;
    let lock = config
        .read()
        .map_err(|err| Error::LockPoisonedRead(err.to_string()))?;
    Ok(Arc::clone(&*lock))
}

/// Load the configuration from disk, even if it has already been loaded.
///
/// This includes the system and user configurations (if they exist),
/// and any `SPK_<SECTION>_<NAME>` environment variables.
pub fn load_config() -> Result<Config> {
    load_config_from_env(std::env::vars())
}

/// Load the configuration using the given variables in place of the environment.
pub fn load_config_from_env<I>(vars: I) -> Result<Config>
where
    I: IntoIterator<Item = (String, String)>,
{
    use config::{Config as RawConfig, File};

    let mut config_builder = RawConfig::builder()
        // the system config can also be in any support format: toml, yaml, json, ini, etc
        .add_source(File::with_name("/etc/spk").required(false));
    if let Some(config_dir) = dirs::config_dir() {
        let user_config = config_dir.join("spk").join("spk");
        // the user config can also be in any support format: toml, yaml, json, ini, etc
        config_builder = config_builder
            .add_source(File::with_name(&format!("{}", user_config.display())).required(false));
    }

    for (var, value) in vars {
        let Some(tail) = var.strip_prefix("SPK_") else {
            continue;
        };
        let Some((section, name)) = tail.split_once('_') else {
            // typically, a value with no section is not a configuration
            // value, and can be skipped (eg: SPK_LOG)
            continue;
        };

        let key = format!("{}.{}", section.to_lowercase(), name.to_lowercase());
        config_builder = config_builder.set_override(key, value)?;
    }

    let config = Config::deserialize(config_builder.build()?)?;
    config.fingerprint.validate()?;
    tracing::debug!(
        buffer_size = config.fingerprint.buffer_size,
        algorithm = %config.fingerprint.algorithm,
        "loaded fingerprint config"
    );
    Ok(config)
}
