// Copyright 2026 The trustm-pal developers
// See LICENSE.txt file for terms

//! Software simulation of the secure element.
//!
//! Used by the test suite and by hosts without the part. The simulation
//! honors the element's observable contract: secrets must be staged into
//! a slot before a derive or HMAC can reference them, metadata must be
//! written before data, signatures cross the boundary in DER, and the
//! peer key handed to ECDH must carry the BIT STRING framing.

use std::collections::HashMap;

use hkdf::Hkdf;
use hmac::{Hmac, Mac};
use p256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;

use crate::buffers::P256_POINT_LENGTH;
use crate::hal::{
    KeyUsage, SecureElement, VendorStatus, PEER_KEY_HEADER,
    STATUS_DEVICE_ERROR, STATUS_INSUFFICIENT_MEMORY, STATUS_INVALID_INPUT,
    STATUS_SUCCESS, STATUS_VERIFY_FAILED,
};

#[derive(Debug)]
struct SlotKey {
    key: SigningKey,
    usage: KeyUsage,
}

#[derive(Debug, Default)]
pub struct SimulatedElement {
    open: bool,
    metadata: HashMap<u16, Vec<u8>>,
    data: HashMap<u16, Vec<u8>>,
    keys: HashMap<u16, SlotKey>,
    fail_rng: bool,
    fail_keygen: bool,
}

impl SimulatedElement {
    pub fn new() -> SimulatedElement {
        SimulatedElement::default()
    }

    /// Fault injection for tests: make the TRNG report a device error.
    pub fn set_rng_failure(&mut self, fail: bool) {
        self.fail_rng = fail;
    }

    /// Fault injection for tests: make the next key generation report a
    /// device error, then recover.
    pub fn fail_next_keygen(&mut self) {
        self.fail_keygen = true;
    }
}

impl SecureElement for SimulatedElement {
    fn open(&mut self) -> VendorStatus {
        self.open = true;
        STATUS_SUCCESS
    }

    fn close(&mut self) -> VendorStatus {
        self.open = false;
        STATUS_SUCCESS
    }

    fn write_metadata(&mut self, slot: u16, metadata: &[u8]) -> VendorStatus {
        if !self.open {
            return STATUS_DEVICE_ERROR;
        }
        self.metadata.insert(slot, metadata.to_vec());
        STATUS_SUCCESS
    }

    fn write_data(&mut self, slot: u16, data: &[u8]) -> VendorStatus {
        if !self.open {
            return STATUS_DEVICE_ERROR;
        }
        /* the part wants access conditions in place before content */
        if !self.metadata.contains_key(&slot) {
            return STATUS_INVALID_INPUT;
        }
        self.data.insert(slot, data.to_vec());
        STATUS_SUCCESS
    }

    fn read_public_key(
        &mut self,
        slot: u16,
        out: &mut [u8],
    ) -> (VendorStatus, usize) {
        if !self.open {
            return (STATUS_DEVICE_ERROR, 0);
        }
        let Some(bytes) = self.data.get(&slot) else {
            return (STATUS_INVALID_INPUT, 0);
        };
        if out.len() < bytes.len() {
            return (STATUS_INSUFFICIENT_MEMORY, 0);
        }
        out[..bytes.len()].copy_from_slice(bytes);
        (STATUS_SUCCESS, bytes.len())
    }

    fn derive_hkdf(
        &mut self,
        secret_slot: u16,
        salt: &[u8],
        info: &[u8],
        out: &mut [u8],
        export_to_host: bool,
    ) -> VendorStatus {
        if !self.open || !export_to_host {
            return STATUS_DEVICE_ERROR;
        }
        let Some(secret) = self.data.get(&secret_slot) else {
            return STATUS_INVALID_INPUT;
        };
        let salt = if salt.is_empty() { None } else { Some(salt) };
        let hk = Hkdf::<Sha256>::new(salt, secret);
        match hk.expand(info, out) {
            Ok(()) => STATUS_SUCCESS,
            Err(_) => STATUS_INVALID_INPUT,
        }
    }

    fn hmac_sha256(
        &mut self,
        key_slot: u16,
        message: &[u8],
        out: &mut [u8],
    ) -> VendorStatus {
        if !self.open {
            return STATUS_DEVICE_ERROR;
        }
        let Some(key) = self.data.get(&key_slot) else {
            return STATUS_INVALID_INPUT;
        };
        let mut mac = match Hmac::<Sha256>::new_from_slice(key) {
            Ok(m) => m,
            Err(_) => return STATUS_INVALID_INPUT,
        };
        mac.update(message);
        let tag = mac.finalize().into_bytes();
        if out.len() > tag.len() {
            return STATUS_INVALID_INPUT;
        }
        let n = out.len();
        out.copy_from_slice(&tag[..n]);
        STATUS_SUCCESS
    }

    fn ecc_keygen(
        &mut self,
        slot: u16,
        usage: KeyUsage,
        readback_slot: u16,
    ) -> VendorStatus {
        if !self.open {
            return STATUS_DEVICE_ERROR;
        }
        if self.fail_keygen {
            self.fail_keygen = false;
            return STATUS_DEVICE_ERROR;
        }
        let key = SigningKey::random(&mut OsRng);
        let point = key.verifying_key().to_encoded_point(false);
        self.data.insert(readback_slot, point.as_bytes().to_vec());
        self.keys.insert(slot, SlotKey { key, usage });
        STATUS_SUCCESS
    }

    fn ecdsa_sign(
        &mut self,
        slot: u16,
        digest: &[u8; 32],
        der_out: &mut [u8],
    ) -> (VendorStatus, usize) {
        if !self.open {
            return (STATUS_DEVICE_ERROR, 0);
        }
        let Some(entry) = self.keys.get(&slot) else {
            return (STATUS_INVALID_INPUT, 0);
        };
        if !entry.usage.contains(KeyUsage::SIGN) {
            return (STATUS_INVALID_INPUT, 0);
        }
        let sig: Signature = match entry.key.sign_prehash(digest) {
            Ok(s) => s,
            Err(_) => return (STATUS_DEVICE_ERROR, 0),
        };
        let der = sig.to_der();
        let bytes = der.as_bytes();
        if der_out.len() < bytes.len() {
            return (STATUS_INSUFFICIENT_MEMORY, 0);
        }
        der_out[..bytes.len()].copy_from_slice(bytes);
        (STATUS_SUCCESS, bytes.len())
    }

    fn ecdsa_verify(
        &mut self,
        digest: &[u8; 32],
        der_sig: &[u8],
        pubkey: &[u8],
    ) -> VendorStatus {
        if !self.open {
            return STATUS_DEVICE_ERROR;
        }
        let Ok(vk) = VerifyingKey::from_sec1_bytes(pubkey) else {
            return STATUS_INVALID_INPUT;
        };
        let Ok(sig) = Signature::from_der(der_sig) else {
            return STATUS_INVALID_INPUT;
        };
        match vk.verify_prehash(digest, &sig) {
            Ok(()) => STATUS_SUCCESS,
            Err(_) => STATUS_VERIFY_FAILED,
        }
    }

    fn ecdh_derive(
        &mut self,
        key_slot: u16,
        session_slot: u16,
        peer_with_header: &[u8],
        out: &mut [u8],
    ) -> VendorStatus {
        if !self.open {
            return STATUS_DEVICE_ERROR;
        }
        if peer_with_header.len() != PEER_KEY_HEADER.len() + P256_POINT_LENGTH
            || peer_with_header[..PEER_KEY_HEADER.len()] != PEER_KEY_HEADER
        {
            return STATUS_INVALID_INPUT;
        }
        let Some(entry) = self.keys.get(&key_slot) else {
            return STATUS_INVALID_INPUT;
        };
        if !entry.usage.contains(KeyUsage::KEY_AGREE) {
            return STATUS_INVALID_INPUT;
        }
        let Ok(peer) = p256::PublicKey::from_sec1_bytes(
            &peer_with_header[PEER_KEY_HEADER.len()..],
        ) else {
            return STATUS_INVALID_INPUT;
        };
        let shared = p256::ecdh::diffie_hellman(
            entry.key.as_nonzero_scalar(),
            peer.as_affine(),
        );
        let secret = shared.raw_secret_bytes();
        if out.len() > secret.len() {
            return STATUS_INVALID_INPUT;
        }
        /* the part keeps the secret in the session context while it is
         * exported */
        self.data.insert(session_slot, secret.to_vec());
        let n = out.len();
        out.copy_from_slice(&secret[..n]);
        STATUS_SUCCESS
    }

    fn rng_fill(&mut self, out: &mut [u8]) -> VendorStatus {
        if self.fail_rng {
            return STATUS_DEVICE_ERROR;
        }
        if !self.open {
            return STATUS_DEVICE_ERROR;
        }
        OsRng.fill_bytes(out);
        STATUS_SUCCESS
    }
}
