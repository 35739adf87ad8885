// Copyright 2026 The trustm-pal developers
// See LICENSE.txt file for terms

use std::env;
use std::fs;

use crate::error::{Error, ErrorKind, Result};
use crate::objects;
use crate::{err_invalid, map_err};

use serde::{Deserialize, Serialize};

/// Name of the environment variable pointing at a TOML override file.
pub const CONF_ENV_VAR: &str = "TRUSTM_PAL_CONF";

/// Hardware object-identifier layout used by the facade.
///
/// The defaults match the OPTIGA Trust M data-object map the bridge
/// ships with; a TOML file can relocate slots on parts that were
/// provisioned differently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotConfig {
    pub hkdf_secret_slot: u16,
    pub hmac_key_slot: u16,
    pub pubkey_readback_slot: u16,
    pub ecdh_session_slot: u16,
    pub keygen_first_slot: u16,
    pub keygen_last_slot: u16,
}

impl Default for SlotConfig {
    fn default() -> SlotConfig {
        SlotConfig {
            hkdf_secret_slot: objects::OID_HKDF_SECRET,
            hmac_key_slot: objects::OID_HMAC_KEY,
            pubkey_readback_slot: objects::OID_PUBKEY_READBACK,
            ecdh_session_slot: objects::OID_ECDH_SESSION,
            keygen_first_slot: objects::OID_KEYGEN_FIRST,
            keygen_last_slot: objects::OID_KEYGEN_LAST,
        }
    }
}

impl SlotConfig {
    pub fn from_file(filename: &str) -> Result<SlotConfig> {
        let data = map_err!(fs::read_to_string(filename), ErrorKind::InvalidArgument)?;
        let conf: SlotConfig = match toml::from_str(&data) {
            Ok(c) => c,
            Err(e) => {
                return Err(Error::from_error(ErrorKind::InvalidArgument, e))
            }
        };
        conf.validate()?;
        Ok(conf)
    }

    /// Loads the file named by `TRUSTM_PAL_CONF`, or the defaults when
    /// the variable is not set.
    pub fn from_env() -> Result<SlotConfig> {
        match env::var(CONF_ENV_VAR) {
            Ok(filename) => SlotConfig::from_file(&filename),
            Err(_) => Ok(SlotConfig::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.keygen_first_slot > self.keygen_last_slot {
            return err_invalid!("empty keygen slot range");
        }
        Ok(())
    }
}
