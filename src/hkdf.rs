// Copyright 2026 The trustm-pal developers
// See LICENSE.txt file for terms

//! HKDF-SHA256 facade operation.

use hkdf::Hkdf;
use sha2::Sha256;

use crate::backend::{hkdf_backend, Backend};
use crate::error::{Error, ErrorKind, Result};
use crate::hal::STATUS_SUCCESS;
use crate::objects;
use crate::session::Hsm;
use crate::err_invalid;

/// Derives `out.len()` bytes from `secret` with HKDF-SHA256.
///
/// An empty salt is accepted (RFC 5869 treats it as a hash-length zero
/// block); empty secret, info or output are caller faults. Inputs beyond
/// the element's operand limits transparently run on the host instead of
/// failing.
pub fn hkdf_sha256(
    hsm: &Hsm,
    secret: &[u8],
    salt: &[u8],
    info: &[u8],
    out: &mut [u8],
) -> Result<()> {
    if secret.is_empty() || info.is_empty() || out.is_empty() {
        return err_invalid!("hkdf requires secret, info and output");
    }

    let backend =
        hkdf_backend(secret.len(), salt.len(), info.len(), out.len());
    log::debug!("hkdf-sha256: {:?} path, {} bytes out", backend, out.len());

    match backend {
        Backend::Software => soft_hkdf(secret, salt, info, out),
        Backend::Hardware => {
            let mut inner = hsm.lock()?;
            inner.ensure_open();
            let result = (|| {
                objects::stage_secret(
                    &mut inner,
                    hsm.slots().hkdf_secret_slot,
                    secret,
                )?;
                let status = inner.element.derive_hkdf(
                    hsm.slots().hkdf_secret_slot,
                    salt,
                    info,
                    out,
                    true,
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

fn soft_hkdf(
    secret: &[u8],
    salt: &[u8],
    info: &[u8],
    out: &mut [u8],
) -> Result<()> {
    let salt = if salt.is_empty() { None } else { Some(salt) };
    let hk = Hkdf::<Sha256>::new(salt, secret);
    hk.expand(info, out)
        .map_err(|e| Error::from_error(ErrorKind::InvalidArgument, e.to_string()))
}
