// Copyright 2026 The trustm-pal developers
// See LICENSE.txt file for terms

//! Fixed-capacity buffers for secret material, wiped on drop.

use crate::error::Result;
use crate::misc::zeromem;
use crate::{err_invalid};

pub const P256_FE_LENGTH: usize = 32;
pub const P256_PRIVATE_KEY_LENGTH: usize = P256_FE_LENGTH;
pub const P256_POINT_LENGTH: usize = 2 * P256_FE_LENGTH + 1;
pub const P256_ECDSA_SIGNATURE_LENGTH_RAW: usize = 2 * P256_FE_LENGTH;
pub const P256_ECDH_SECRET_LENGTH: usize = P256_FE_LENGTH;
pub const SHA256_HASH_LENGTH: usize = 32;

/// A fixed-capacity byte buffer with an explicit length, zeroized when
/// dropped. Operations set the length to the number of bytes actually
/// produced; on error the content is unspecified.
#[derive(Debug)]
pub struct SensitiveBytes<const CAPACITY: usize> {
    bytes: [u8; CAPACITY],
    length: usize,
}

impl<const CAPACITY: usize> Default for SensitiveBytes<CAPACITY> {
    fn default() -> Self {
        SensitiveBytes {
            bytes: [0; CAPACITY],
            length: 0,
        }
    }
}

impl<const CAPACITY: usize> SensitiveBytes<CAPACITY> {
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn set_length(&mut self, length: usize) -> Result<()> {
        if length > CAPACITY {
            return err_invalid!("length exceeds buffer capacity");
        }
        self.length = length;
        Ok(())
    }

    pub const fn capacity(&self) -> usize {
        CAPACITY
    }

    /// The populated prefix of the buffer.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.length]
    }

    /// The whole backing buffer, for operations that fill it.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[..]
    }
}

impl<const CAPACITY: usize> Drop for SensitiveBytes<CAPACITY> {
    fn drop(&mut self) {
        zeromem(&mut self.bytes);
    }
}

impl<const CAPACITY: usize> Clone for SensitiveBytes<CAPACITY> {
    fn clone(&self) -> Self {
        let mut clone = Self::default();
        clone.bytes.copy_from_slice(&self.bytes);
        clone.length = self.length;
        clone
    }
}

pub type P256EcdsaSignature = SensitiveBytes<P256_ECDSA_SIGNATURE_LENGTH_RAW>;
pub type P256EcdhSecret = SensitiveBytes<P256_ECDH_SECRET_LENGTH>;
