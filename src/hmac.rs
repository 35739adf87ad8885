// Copyright 2026 The trustm-pal developers
// See LICENSE.txt file for terms

//! HMAC-SHA256 facade operation.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::backend::{hmac_backend, Backend};
use crate::buffers::SHA256_HASH_LENGTH;
use crate::error::{ErrorKind, Result};
use crate::hal::STATUS_SUCCESS;
use crate::misc::zeromem;
use crate::objects;
use crate::session::Hsm;
use crate::err_invalid;

/// Opaque 128-bit key handle form accepted by the protocol layer; it is
/// unwrapped to raw bytes before the byte-slice operation runs.
#[derive(Clone)]
pub struct Hmac128KeyHandle {
    bytes: [u8; 16],
}

impl Hmac128KeyHandle {
    pub fn new(bytes: [u8; 16]) -> Hmac128KeyHandle {
        Hmac128KeyHandle { bytes: bytes }
    }

    fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Drop for Hmac128KeyHandle {
    fn drop(&mut self) {
        zeromem(&mut self.bytes);
    }
}

/// Computes an HMAC-SHA256 tag truncated to `out.len()` bytes.
///
/// Keys longer than the element's 64-byte operand limit run on the
/// host; the output contract is identical on both paths. Requests
/// longer than the full tag are caller faults.
pub fn hmac_sha256(
    hsm: &Hsm,
    key: &[u8],
    message: &[u8],
    out: &mut [u8],
) -> Result<()> {
    if key.is_empty() || message.is_empty() || out.is_empty() {
        return err_invalid!("hmac requires key, message and output");
    }
    if out.len() > SHA256_HASH_LENGTH {
        return err_invalid!("hmac output exceeds tag length");
    }

    let backend = hmac_backend(key.len());
    log::debug!("hmac-sha256: {:?} path, {} byte key", backend, key.len());

    match backend {
        Backend::Software => soft_hmac(key, message, out),
        Backend::Hardware => {
            let mut inner = hsm.lock()?;
            inner.ensure_open();
            let result = (|| {
                objects::stage_secret(
                    &mut inner,
                    hsm.slots().hmac_key_slot,
                    key,
                )?;
                let status = inner.element.hmac_sha256(
                    hsm.slots().hmac_key_slot,
                    message,
                    out,
                );
                if status != STATUS_SUCCESS {
                    return Err(ErrorKind::Internal)?;
                }
                Ok(())
            })();
            if result.is_err() {
                inner.close_on_error();
            }
            result
        }
    }
}

/// Key-handle overload of [`hmac_sha256`].
pub fn hmac_sha256_with_handle(
    hsm: &Hsm,
    key: &Hmac128KeyHandle,
    message: &[u8],
    out: &mut [u8],
) -> Result<()> {
    hmac_sha256(hsm, key.as_bytes(), message, out)
}

fn soft_hmac(key: &[u8], message: &[u8], out: &mut [u8]) -> Result<()> {
    let mut mac = match Hmac::<Sha256>::new_from_slice(key) {
        Ok(m) => m,
        Err(_) => return Err(ErrorKind::Internal)?,
    };
    mac.update(message);
    let tag = mac.finalize().into_bytes();
    let n = out.len();
    out.copy_from_slice(&tag[..n]);
    Ok(())
}
