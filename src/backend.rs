// Copyright 2026 The trustm-pal developers
// See LICENSE.txt file for terms

//! Hardware/software path selection.
//!
//! Each facade operation evaluates its selection function exactly once
//! and then commits to that backend. Both backends honor the same error
//! taxonomy and output-length contract, so the test suite runs the same
//! assertions against either.

use crate::keyid::KeyRef;

/// Operand limits of the element's HKDF primitive.
pub const HKDF_MAX_SALT: usize = 64;
pub const HKDF_MAX_INFO: usize = 80;
pub const HKDF_MAX_SECRET: usize = 256;
pub const HKDF_MAX_OUT: usize = 768;

/// Longest key the element's HMAC primitive accepts.
pub const HMAC_MAX_KEY: usize = 64;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Backend {
    Hardware,
    Software,
}

pub fn hkdf_backend(
    secret_len: usize,
    salt_len: usize,
    info_len: usize,
    out_len: usize,
) -> Backend {
    if salt_len > HKDF_MAX_SALT
        || info_len > HKDF_MAX_INFO
        || secret_len > HKDF_MAX_SECRET
        || out_len > HKDF_MAX_OUT
    {
        return Backend::Software;
    }
    Backend::Hardware
}

pub fn hmac_backend(key_len: usize) -> Backend {
    if key_len > HMAC_MAX_KEY {
        return Backend::Software;
    }
    Backend::Hardware
}

/// A key that is not element-resident can only be used in software.
pub fn key_backend(key: &KeyRef) -> Backend {
    match key {
        KeyRef::Hardware(_) => Backend::Hardware,
        KeyRef::Software(_) => Backend::Software,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn hkdf_bounds() {
        assert_eq!(hkdf_backend(32, 64, 80, 768), Backend::Hardware);
        assert_eq!(hkdf_backend(32, 65, 16, 32), Backend::Software);
        assert_eq!(hkdf_backend(32, 16, 81, 32), Backend::Software);
        assert_eq!(hkdf_backend(257, 16, 16, 32), Backend::Software);
        assert_eq!(hkdf_backend(32, 16, 16, 769), Backend::Software);
    }

    #[test]
    fn hmac_boundary() {
        assert_eq!(hmac_backend(64), Backend::Hardware);
        assert_eq!(hmac_backend(65), Backend::Software);
    }

    #[test]
    fn key_routing() {
        assert_eq!(key_backend(&KeyRef::Hardware(1)), Backend::Hardware);
        assert_eq!(key_backend(&KeyRef::Software([0; 32])), Backend::Software);
    }
}
