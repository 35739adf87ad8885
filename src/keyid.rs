// Copyright 2026 The trustm-pal developers
// See LICENSE.txt file for terms

//! Key identity codec.
//!
//! A private key is either a raw 32-byte scalar held by the host, or a
//! reference to a key that never leaves the element. The serialized
//! keypair form carries an explicit 1-byte discriminant so the two can
//! never be confused. The in-buffer form (a 4-byte magic marker ahead
//! of the slot id, zero padded to scalar width) doubles as the payload
//! of the tagged hardware variant; its decode only succeeds on an
//! exact magic match.

use crate::buffers::P256_PRIVATE_KEY_LENGTH;
use crate::error::Result;
use crate::{err_internal, err_invalid};

/// Marker identifying a hardware key reference inside a raw scalar field.
pub const KEYREF_MAGIC: [u8; 4] = [0xA5, 0xA6, 0xB5, 0xB6];

const TAG_SOFTWARE: u8 = 0x01;
const TAG_HARDWARE: u8 = 0x02;

/// Serialized length of a tagged key reference: discriminant + payload.
pub const TAGGED_KEYREF_LENGTH: usize = 1 + P256_PRIVATE_KEY_LENGTH;

/// Private-key identity: exported scalar, or element-resident slot.
#[derive(Clone, Eq, PartialEq)]
pub enum KeyRef {
    Software([u8; P256_PRIVATE_KEY_LENGTH]),
    Hardware(u32),
}

/* scalar bytes stay out of debug output */
impl std::fmt::Debug for KeyRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyRef::Software(_) => write!(f, "KeyRef::Software(..)"),
            KeyRef::Hardware(slot) => {
                write!(f, "KeyRef::Hardware({:#06x})", slot)
            }
        }
    }
}

impl KeyRef {
    pub fn is_hardware(&self) -> bool {
        matches!(self, KeyRef::Hardware(_))
    }

    /// Serialized form with an explicit discriminant tag.
    pub fn to_tagged_bytes(&self) -> [u8; TAGGED_KEYREF_LENGTH] {
        let mut out = [0u8; TAGGED_KEYREF_LENGTH];
        match self {
            KeyRef::Software(scalar) => {
                out[0] = TAG_SOFTWARE;
                out[1..].copy_from_slice(scalar);
            }
            KeyRef::Hardware(slot) => {
                out[0] = TAG_HARDWARE;
                out[1..].copy_from_slice(&encode_raw(*slot));
            }
        }
        out
    }

    pub fn from_tagged_bytes(input: &[u8]) -> Result<KeyRef> {
        if input.len() != TAGGED_KEYREF_LENGTH {
            return err_invalid!("bad serialized key reference length");
        }
        match input[0] {
            TAG_SOFTWARE => {
                let mut scalar = [0u8; P256_PRIVATE_KEY_LENGTH];
                scalar.copy_from_slice(&input[1..]);
                Ok(KeyRef::Software(scalar))
            }
            TAG_HARDWARE => match decode_raw(&input[1..]) {
                Some(slot) => Ok(KeyRef::Hardware(slot)),
                None => err_internal!("hardware key reference lost its marker"),
            },
            _ => err_invalid!("unknown key reference tag"),
        }
    }
}

/// Encodes a slot id into a raw private-key sized buffer: magic marker,
/// then the slot id in the low bytes, zero filled to the end.
pub fn encode_raw(slot: u32) -> [u8; P256_PRIVATE_KEY_LENGTH] {
    let mut out = [0u8; P256_PRIVATE_KEY_LENGTH];
    out[..KEYREF_MAGIC.len()].copy_from_slice(&KEYREF_MAGIC);
    out[KEYREF_MAGIC.len()..KEYREF_MAGIC.len() + 4]
        .copy_from_slice(&slot.to_le_bytes());
    out
}

/// Recovers a slot id from a raw private-key sized buffer. Returns None
/// unless the leading bytes exactly match the magic marker, in which
/// case the buffer holds a software scalar instead.
pub fn decode_raw(buffer: &[u8]) -> Option<u32> {
    if buffer.len() < KEYREF_MAGIC.len() + 4 {
        return None;
    }
    if buffer[..KEYREF_MAGIC.len()] != KEYREF_MAGIC {
        return None;
    }
    let mut slot = [0u8; 4];
    slot.copy_from_slice(&buffer[KEYREF_MAGIC.len()..KEYREF_MAGIC.len() + 4]);
    Some(u32::from_le_bytes(slot))
}
