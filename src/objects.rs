// Copyright 2026 The trustm-pal developers
// See LICENSE.txt file for terms

//! Object store adapter: staging of secrets and key material into the
//! element's numbered data-object slots.
//!
//! The element cannot take secret bytes inline on a derive or HMAC call;
//! they must be written server-side first and are then referenced by
//! slot. Every helper here performs a single blocking round trip with no
//! retry and requires an already open session.

use crate::error::{ErrorKind, Result};
use crate::hal::STATUS_SUCCESS;
use crate::session::HsmInner;

/* Default OPTIGA Trust M object-identifier layout */

/// Arbitrary data object holding the HKDF input secret
pub const OID_HKDF_SECRET: u16 = 0xF1D8;
/// Arbitrary data object holding the HMAC key
pub const OID_HMAC_KEY: u16 = 0xF1D9;
/// Arbitrary data object used to read a generated public key back out
pub const OID_PUBKEY_READBACK: u16 = 0xF1DA;
/// Session context used by the ECDH primitive
pub const OID_ECDH_SESSION: u16 = 0xE100;
/// First and last key slots available for per-node key generation.
/// 0xE0F0 holds the device identity key and is never allocated here.
pub const OID_KEYGEN_FIRST: u16 = 0xE0F2;
pub const OID_KEYGEN_LAST: u16 = 0xE0F3;

/// Change-access condition: writable while LcsO < operational (0x07)
pub const SLOT_METADATA: [u8; 7] = [0x20, 0x05, 0xD0, 0x03, 0xE1, 0xFC, 0x07];

/// Stages a secret into a data object slot: metadata first, then the
/// payload bytes.
pub fn stage_secret(
    inner: &mut HsmInner,
    slot: u16,
    payload: &[u8],
) -> Result<()> {
    if inner.element.write_metadata(slot, &SLOT_METADATA) != STATUS_SUCCESS {
        return Err(ErrorKind::Internal)?;
    }
    if inner.element.write_data(slot, payload) != STATUS_SUCCESS {
        return Err(ErrorKind::Internal)?;
    }
    log::debug!("staged {} bytes into slot {:#06x}", payload.len(), slot);
    Ok(())
}

/// Reads a generated public key back out of the readback data object
/// the keygen primitive exported it into.
pub fn read_public_key(
    inner: &mut HsmInner,
    slot: u16,
    out: &mut [u8],
) -> Result<usize> {
    let (status, len) = inner.element.read_public_key(slot, out);
    if status != STATUS_SUCCESS || len == 0 {
        return Err(ErrorKind::Internal)?;
    }
    Ok(len)
}
