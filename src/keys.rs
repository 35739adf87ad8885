// Copyright 2026 The trustm-pal developers
// See LICENSE.txt file for terms

//! P-256 keypair lifecycle and the ECDSA/ECDH facade operations.
//!
//! A keypair is either element-resident (the private key never leaves
//! the part, operations reference it by slot) or a host-held scalar.
//! Message digests are always computed on the host; only the signing
//! primitive itself runs on the element.

use p256::ecdsa::signature::hazmat::PrehashSigner;
use p256::ecdsa::{Signature, SigningKey};
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use constant_time_eq::constant_time_eq;

use crate::backend::{key_backend, Backend};
use crate::buffers::{
    P256EcdhSecret, P256EcdsaSignature, SensitiveBytes,
    P256_ECDSA_SIGNATURE_LENGTH_RAW, P256_POINT_LENGTH,
    P256_PRIVATE_KEY_LENGTH,
};
use crate::csr;
use crate::der;
use crate::error::{Error, ErrorKind, Result};
use crate::hal::{
    KeyUsage, MAX_DER_SIGNATURE_LENGTH, PEER_KEY_HEADER, STATUS_SUCCESS,
};
use crate::keyid::{KeyRef, TAGGED_KEYREF_LENGTH};
use crate::misc::zeromem;
use crate::objects;
use crate::session::Hsm;
use crate::{err_internal, err_invalid};

const UNCOMPRESSED_POINT_MARKER: u8 = 0x04;

/// Intended use of a generated key; programmed into the slot's usage
/// bits on the hardware path.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EcpKeyTarget {
    Ecdsa,
    Ecdh,
}

impl EcpKeyTarget {
    fn usage(&self) -> KeyUsage {
        match self {
            EcpKeyTarget::Ecdsa => KeyUsage::SIGN | KeyUsage::AUTH,
            EcpKeyTarget::Ecdh => KeyUsage::KEY_AGREE,
        }
    }
}

/// Uncompressed P-256 public point.
#[derive(Clone, Debug)]
pub struct P256PublicKey {
    bytes: [u8; P256_POINT_LENGTH],
}

impl Default for P256PublicKey {
    fn default() -> P256PublicKey {
        P256PublicKey {
            bytes: [0; P256_POINT_LENGTH],
        }
    }
}

impl P256PublicKey {
    pub fn from_bytes(input: &[u8]) -> Result<P256PublicKey> {
        if input.len() != P256_POINT_LENGTH
            || input[0] != UNCOMPRESSED_POINT_MARKER
        {
            return err_invalid!("not an uncompressed P-256 point");
        }
        let mut key = P256PublicKey::default();
        key.bytes.copy_from_slice(input);
        Ok(key)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_uncompressed(&self) -> bool {
        self.bytes[0] == UNCOMPRESSED_POINT_MARKER
    }

    pub fn matches(&self, other: &P256PublicKey) -> bool {
        constant_time_eq(&self.bytes, &other.bytes)
    }

    /// Verifies a raw signature over a message; the digest is computed
    /// locally, the verify primitive runs on the element.
    pub fn ecdsa_verify_msg(
        &self,
        hsm: &Hsm,
        msg: &[u8],
        signature: &P256EcdsaSignature,
    ) -> Result<()> {
        if msg.is_empty() {
            return err_invalid!("cannot verify an empty message");
        }
        let digest: [u8; 32] = Sha256::digest(msg).into();
        self.ecdsa_verify_hash(hsm, &digest, signature)
    }

    /// Hash form: uses the caller supplied digest directly.
    pub fn ecdsa_verify_hash(
        &self,
        hsm: &Hsm,
        hash: &[u8; 32],
        signature: &P256EcdsaSignature,
    ) -> Result<()> {
        if signature.length() != P256_ECDSA_SIGNATURE_LENGTH_RAW {
            return err_invalid!("raw signature has wrong length");
        }
        let der_sig = der::raw_to_der(signature.as_slice())?;
        let mut inner = hsm.lock()?;
        inner.ensure_open();
        let status =
            inner.element.ecdsa_verify(hash, &der_sig, &self.bytes);
        if status != STATUS_SUCCESS {
            inner.close_on_error();
            return err_internal!("signature mismatch");
        }
        Ok(())
    }
}

pub const P256_SERIALIZED_KEYPAIR_LENGTH: usize =
    P256_POINT_LENGTH + TAGGED_KEYREF_LENGTH;

/// Serialized keypair: public point followed by the tagged private-key
/// form. Which of the two private forms it holds survives the round
/// trip exactly.
pub type P256SerializedKeypair =
    SensitiveBytes<P256_SERIALIZED_KEYPAIR_LENGTH>;

#[derive(Debug)]
pub struct P256Keypair {
    public: P256PublicKey,
    key_ref: KeyRef,
    initialized: bool,
}

impl Default for P256Keypair {
    fn default() -> P256Keypair {
        P256Keypair {
            public: P256PublicKey::default(),
            key_ref: KeyRef::Software([0; P256_PRIVATE_KEY_LENGTH]),
            initialized: false,
        }
    }
}

impl P256Keypair {
    pub fn new() -> P256Keypair {
        P256Keypair::default()
    }

    /// Generates the key. When a hardware key slot is still available
    /// the private key is created inside the element and only its slot
    /// id is recorded; the public point comes back out through the
    /// readback data object. Otherwise a host scalar is generated. A
    /// failed hardware generation returns the slot to the allocator.
    pub fn initialize(
        &mut self,
        hsm: &Hsm,
        target: EcpKeyTarget,
    ) -> Result<()> {
        let mut inner = hsm.lock()?;
        let Some(slot) = inner.take_keygen_slot() else {
            drop(inner);
            log::info!("no keygen slot available, generating host key");
            return self.initialize_software();
        };
        inner.ensure_open();
        let readback = hsm.slots().pubkey_readback_slot;
        let status = inner.element.ecc_keygen(slot, target.usage(), readback);
        if status != STATUS_SUCCESS {
            inner.return_keygen_slot(slot);
            inner.close_on_error();
            return err_internal!("hardware key generation failed");
        }
        let mut point = [0u8; P256_POINT_LENGTH];
        match objects::read_public_key(&mut inner, readback, &mut point) {
            Ok(len) if len == P256_POINT_LENGTH => {}
            _ => {
                inner.return_keygen_slot(slot);
                inner.close_on_error();
                return err_internal!("public key readback failed");
            }
        }
        self.public = P256PublicKey::from_bytes(&point)?;
        self.key_ref = KeyRef::Hardware(u32::from(slot));
        self.initialized = true;
        log::info!(
            "generated {:?} key in slot {:#06x}, pub {}",
            target,
            slot,
            hex::encode(&point[1..9])
        );
        Ok(())
    }

    fn initialize_software(&mut self) -> Result<()> {
        let key = SigningKey::random(&mut OsRng);
        let point = key.verifying_key().to_encoded_point(false);
        self.public = P256PublicKey::from_bytes(point.as_bytes())?;
        let mut scalar = [0u8; P256_PRIVATE_KEY_LENGTH];
        scalar.copy_from_slice(&key.to_bytes());
        self.key_ref = KeyRef::Software(scalar);
        self.initialized = true;
        Ok(())
    }

    pub fn public_key(&self) -> &P256PublicKey {
        &self.public
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_hardware_backed(&self) -> bool {
        self.key_ref.is_hardware()
    }

    pub(crate) fn key_ref(&self) -> &KeyRef {
        &self.key_ref
    }

    pub fn serialize(&self) -> Result<P256SerializedKeypair> {
        if !self.initialized {
            return Err(Error::uninitialized());
        }
        let mut out = P256SerializedKeypair::default();
        let buf = out.bytes_mut();
        buf[..P256_POINT_LENGTH].copy_from_slice(&self.public.bytes);
        let mut tagged = self.key_ref.to_tagged_bytes();
        buf[P256_POINT_LENGTH..].copy_from_slice(&tagged);
        zeromem(&mut tagged);
        out.set_length(P256_SERIALIZED_KEYPAIR_LENGTH)?;
        Ok(out)
    }

    pub fn deserialize(input: &[u8]) -> Result<P256Keypair> {
        if input.len() != P256_SERIALIZED_KEYPAIR_LENGTH {
            return err_invalid!("bad serialized keypair length");
        }
        let public = P256PublicKey::from_bytes(&input[..P256_POINT_LENGTH])?;
        let key_ref = KeyRef::from_tagged_bytes(&input[P256_POINT_LENGTH..])?;
        Ok(P256Keypair {
            public: public,
            key_ref: key_ref,
            initialized: true,
        })
    }

    /// Signs a message: SHA-256 on the host, then the signing primitive
    /// on whichever backend holds the private key. The output is always
    /// the raw 64-byte (r‖s) form.
    pub fn ecdsa_sign_msg(
        &self,
        hsm: &Hsm,
        msg: &[u8],
        out: &mut P256EcdsaSignature,
    ) -> Result<()> {
        if msg.is_empty() {
            return err_invalid!("cannot sign an empty message");
        }
        let digest: [u8; 32] = Sha256::digest(msg).into();
        self.ecdsa_sign_hash(hsm, &digest, out)
    }

    pub fn ecdsa_sign_hash(
        &self,
        hsm: &Hsm,
        digest: &[u8; 32],
        out: &mut P256EcdsaSignature,
    ) -> Result<()> {
        if !self.initialized {
            return Err(Error::uninitialized());
        }
        match key_backend(&self.key_ref) {
            Backend::Hardware => {
                let KeyRef::Hardware(slot) = self.key_ref else {
                    return Err(ErrorKind::Internal)?;
                };
                let slot = u16::try_from(slot)?;
                let mut der_sig = [0u8; MAX_DER_SIGNATURE_LENGTH];
                let mut inner = hsm.lock()?;
                inner.ensure_open();
                let (status, len) =
                    inner.element.ecdsa_sign(slot, digest, &mut der_sig);
                if status != STATUS_SUCCESS {
                    inner.close_on_error();
                    return err_internal!("hardware sign failed");
                }
                drop(inner);
                let mut raw = [0u8; P256_ECDSA_SIGNATURE_LENGTH_RAW];
                der::der_to_raw(&der_sig[..len], &mut raw)?;
                out.bytes_mut().copy_from_slice(&raw);
                out.set_length(P256_ECDSA_SIGNATURE_LENGTH_RAW)
            }
            Backend::Software => {
                let KeyRef::Software(ref scalar) = self.key_ref else {
                    return Err(ErrorKind::Internal)?;
                };
                let key = match SigningKey::from_slice(scalar) {
                    Ok(k) => k,
                    Err(_) => return err_internal!("corrupt host scalar"),
                };
                let sig: Signature = match key.sign_prehash(digest) {
                    Ok(s) => s,
                    Err(_) => return err_internal!("host sign failed"),
                };
                out.bytes_mut().copy_from_slice(&sig.to_bytes());
                out.set_length(P256_ECDSA_SIGNATURE_LENGTH_RAW)
            }
        }
    }

    /// ECDH against a remote public key. Element-resident keys derive
    /// on the part (the peer point gets the BIT STRING framing the
    /// element requires); host keys derive locally.
    pub fn ecdh_derive_secret(
        &self,
        hsm: &Hsm,
        remote: &P256PublicKey,
        out: &mut P256EcdhSecret,
    ) -> Result<()> {
        if !self.initialized {
            return Err(Error::uninitialized());
        }
        if !remote.is_uncompressed() {
            return err_invalid!("remote key is not an uncompressed point");
        }
        match key_backend(&self.key_ref) {
            Backend::Hardware => {
                let KeyRef::Hardware(slot) = self.key_ref else {
                    return Err(ErrorKind::Internal)?;
                };
                let slot = u16::try_from(slot)?;
                let mut framed =
                    [0u8; PEER_KEY_HEADER.len() + P256_POINT_LENGTH];
                framed[..PEER_KEY_HEADER.len()]
                    .copy_from_slice(&PEER_KEY_HEADER);
                framed[PEER_KEY_HEADER.len()..]
                    .copy_from_slice(&remote.bytes);
                let capacity = out.capacity();
                let session = hsm.slots().ecdh_session_slot;
                let mut inner = hsm.lock()?;
                inner.ensure_open();
                let status = inner.element.ecdh_derive(
                    slot,
                    session,
                    &framed,
                    &mut out.bytes_mut()[..capacity],
                );
                if status != STATUS_SUCCESS {
                    inner.close_on_error();
                    return err_internal!("hardware ecdh failed");
                }
                out.set_length(capacity)
            }
            Backend::Software => {
                let KeyRef::Software(ref scalar) = self.key_ref else {
                    return Err(ErrorKind::Internal)?;
                };
                let secret = match p256::SecretKey::from_slice(scalar) {
                    Ok(s) => s,
                    Err(_) => return err_internal!("corrupt host scalar"),
                };
                let peer =
                    match p256::PublicKey::from_sec1_bytes(&remote.bytes) {
                        Ok(p) => p,
                        Err(_) => {
                            return err_invalid!("remote point not on curve")
                        }
                    };
                let shared = p256::ecdh::diffie_hellman(
                    secret.to_nonzero_scalar(),
                    peer.as_affine(),
                );
                let capacity = out.capacity();
                out.bytes_mut()
                    .copy_from_slice(&shared.raw_secret_bytes()[..capacity]);
                out.set_length(capacity)
            }
        }
    }

    /// Emits a DER PKCS#10 CSR for this key into `out`, returning the
    /// encoded length.
    pub fn new_certificate_signing_request(
        &self,
        hsm: &Hsm,
        out: &mut [u8],
    ) -> Result<usize> {
        csr::new_certificate_signing_request(hsm, self, out)
    }
}

impl Drop for P256Keypair {
    fn drop(&mut self) {
        match &mut self.key_ref {
            KeyRef::Software(scalar) => zeromem(scalar),
            KeyRef::Hardware(slot) => {
                /* bookkeeping only, the element keeps the key */
                log::debug!("releasing keypair bound to slot {:#06x}", slot);
            }
        }
    }
}
