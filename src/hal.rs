// Copyright 2026 The trustm-pal developers
// See LICENSE.txt file for terms

//! This module defines the boundary to the vendor secure element.
//!
//! The trait mirrors the fixed signature set the OPTIGA Trust M host
//! library exposes: a blocking, synchronous call model with integer
//! status codes. No retries or timeouts happen at this level; a status
//! other than [`STATUS_SUCCESS`] is mapped to a generic internal error
//! by the layers above.

use std::fmt::Debug;

use bitflags::bitflags;

/// Vendor status code as returned by the element.
pub type VendorStatus = u16;

pub const STATUS_SUCCESS: VendorStatus = 0x0000;
pub const STATUS_INVALID_INPUT: VendorStatus = 0x0103;
pub const STATUS_INSUFFICIENT_MEMORY: VendorStatus = 0x0104;
pub const STATUS_DEVICE_ERROR: VendorStatus = 0x0107;
/// Signature/MAC did not match the supplied data
pub const STATUS_VERIFY_FAILED: VendorStatus = 0x012c;

bitflags! {
    /// Key usage bits programmed into a key slot at generation time.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct KeyUsage: u8 {
        const AUTH = 0x01;
        const ENC = 0x02;
        const SIGN = 0x10;
        const KEY_AGREE = 0x20;
    }
}

/// BIT STRING framing the element requires in front of a peer public
/// key handed to the ECDH primitive.
pub const PEER_KEY_HEADER: [u8; 3] = [0x03, 0x42, 0x00];

/// Maximum size of a DER encoded P-256 ECDSA signature coming back from
/// the element (SEQUENCE + two INTEGERs with worst-case 0x00 prefixes).
pub const MAX_DER_SIGNATURE_LENGTH: usize = 72;

/// The vendor transport boundary.
///
/// Implementations talk to the real part over I2C, or simulate it in
/// software ([`crate::sim::SimulatedElement`]). All secrets referenced by
/// slot must have been staged with [`SecureElement::write_data`] first;
/// the element owns the actual bytes.
pub trait SecureElement: Debug + Send {
    fn open(&mut self) -> VendorStatus;
    fn close(&mut self) -> VendorStatus;

    /// Writes the access-condition metadata of a data object slot.
    fn write_metadata(&mut self, slot: u16, metadata: &[u8]) -> VendorStatus;

    /// Writes a payload into a data object slot, replacing its content.
    fn write_data(&mut self, slot: u16, data: &[u8]) -> VendorStatus;

    /// Reads back a public key previously exported into a data object
    /// slot. On success the returned usize is the number of bytes
    /// written into `out`.
    fn read_public_key(
        &mut self,
        slot: u16,
        out: &mut [u8],
    ) -> (VendorStatus, usize);

    /// HKDF-SHA256 expand+extract over the secret staged in `secret_slot`.
    /// With `export_to_host` the derived bytes land in `out`, otherwise
    /// they stay inside the element.
    fn derive_hkdf(
        &mut self,
        secret_slot: u16,
        salt: &[u8],
        info: &[u8],
        out: &mut [u8],
        export_to_host: bool,
    ) -> VendorStatus;

    /// HMAC-SHA256 keyed by the secret staged in `key_slot`. Writes
    /// exactly `out.len()` bytes of the tag.
    fn hmac_sha256(
        &mut self,
        key_slot: u16,
        message: &[u8],
        out: &mut [u8],
    ) -> VendorStatus;

    /// Generates a P-256 keypair inside `slot`, programming `usage` into
    /// the slot and exporting the public part (uncompressed point) into
    /// the `readback_slot` data object for
    /// [`SecureElement::read_public_key`].
    fn ecc_keygen(
        &mut self,
        slot: u16,
        usage: KeyUsage,
        readback_slot: u16,
    ) -> VendorStatus;

    /// ECDSA-signs a 32-byte digest with the key in `slot`. The element
    /// speaks DER; the raw conversion happens on the host.
    fn ecdsa_sign(
        &mut self,
        slot: u16,
        digest: &[u8; 32],
        der_out: &mut [u8],
    ) -> (VendorStatus, usize);

    /// Verifies a DER signature over a 32-byte digest against a host
    /// supplied uncompressed public key.
    fn ecdsa_verify(
        &mut self,
        digest: &[u8; 32],
        der_sig: &[u8],
        pubkey: &[u8],
    ) -> VendorStatus;

    /// ECDH against the private key in `key_slot`. The peer key must
    /// carry the [`PEER_KEY_HEADER`] framing; the shared secret passes
    /// through the `session_slot` context object before export. Writes
    /// `out.len()` secret bytes.
    fn ecdh_derive(
        &mut self,
        key_slot: u16,
        session_slot: u16,
        peer_with_header: &[u8],
        out: &mut [u8],
    ) -> VendorStatus;

    /// Fills `out` from the element's TRNG.
    fn rng_fill(&mut self, out: &mut [u8]) -> VendorStatus;
}
