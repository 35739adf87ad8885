// Copyright 2026 The trustm-pal developers
// See LICENSE.txt file for terms

//! Random byte generation through the element's TRNG.

use crate::error::{ErrorKind, Result};
use crate::hal::STATUS_SUCCESS;
use crate::session::Hsm;
use crate::err_invalid;

/// Fills `out` with random bytes from the element.
///
/// A vendor failure surfaces as `Internal`; earlier revisions of this
/// layer reported success unconditionally on this path, which hid TRNG
/// faults from callers.
pub fn rng_fill(hsm: &Hsm, out: &mut [u8]) -> Result<()> {
    if out.is_empty() {
        return err_invalid!("rng output buffer is empty");
    }
    let mut inner = hsm.lock()?;
    inner.ensure_open();
    let status = inner.element.rng_fill(out);
    if status != STATUS_SUCCESS {
        inner.close_on_error();
        return Err(ErrorKind::Internal)?;
    }
    Ok(())
}
