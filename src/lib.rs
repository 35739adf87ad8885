// Copyright 2026 The trustm-pal developers
// See LICENSE.txt file for terms

//! HSM-backed cryptographic key-operation layer for a Matter bridge.
//!
//! The facade routes each primitive (HKDF/HMAC-SHA256, ECDSA and ECDH
//! over P-256, CSR generation, RNG) either to an OPTIGA Trust M secure
//! element behind the [`hal::SecureElement`] boundary, or to a host
//! software backend when the element's operand limits are exceeded or
//! the key is not element-resident. Both paths share one error taxonomy
//! and output-length contract.

pub mod error;

pub mod backend;
pub mod buffers;
pub mod config;
pub mod csr;
pub mod der;
pub mod drbg;
pub mod hal;
pub mod hkdf;
pub mod hmac;
pub mod keyid;
pub mod keys;
mod log;
mod misc;
pub mod objects;
pub mod session;
pub mod sim;

pub use crate::error::{Error, ErrorKind, Result};
pub use crate::keys::{
    EcpKeyTarget, P256Keypair, P256PublicKey, P256SerializedKeypair,
};
pub use crate::session::Hsm;

#[cfg(test)]
mod tests;
