// Copyright 2026 The trustm-pal developers
// See LICENSE.txt file for terms

//! Minimal DER encoding support: a tiny TLV writer plus the raw (r‖s) to
//! ASN.1 signature transcoding the protocol layer needs.
//!
//! The element emits and consumes X9.62 DER signatures while the wire
//! format is two fixed-width big-endian field elements, so every sign
//! and verify crosses this converter. Only single-byte long-form lengths
//! are supported (content up to 255 bytes); nothing this layer produces
//! is allowed to grow past that.

use crate::buffers::{P256_ECDSA_SIGNATURE_LENGTH_RAW, P256_FE_LENGTH};
use crate::error::{ErrorKind, Result};

pub const TAG_INTEGER: u8 = 0x02;
pub const TAG_BIT_STRING: u8 = 0x03;
pub const TAG_OID: u8 = 0x06;
pub const TAG_UTF8_STRING: u8 = 0x0C;
pub const TAG_SEQUENCE: u8 = 0x30;
pub const TAG_SET: u8 = 0x31;
/// Context-specific constructed [0], used for the CSR attributes field
pub const TAG_CONTEXT_0: u8 = 0xA0;

/// Encodes one TLV. Fails `Internal` when the value needs a length
/// encoding beyond the single-byte long form.
pub fn tlv(tag: u8, value: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(value.len() + 3);
    out.push(tag);
    match value.len() {
        len if len < 0x80 => out.push(len as u8),
        len if len < 0x100 => {
            out.push(0x81);
            out.push(len as u8);
        }
        _ => return Err(ErrorKind::Internal)?,
    }
    out.extend_from_slice(value);
    Ok(out)
}

/// Growable TLV writer used to assemble nested DER structures front to
/// back, replacing the fixed-buffer backward arithmetic this layer was
/// historically built on.
#[derive(Debug, Default)]
pub struct DerWriter {
    buf: Vec<u8>,
}

impl DerWriter {
    pub fn new() -> DerWriter {
        DerWriter { buf: Vec::new() }
    }

    pub fn push_raw(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn push_tlv(&mut self, tag: u8, value: &[u8]) -> Result<()> {
        let encoded = tlv(tag, value)?;
        self.buf.extend_from_slice(&encoded);
        Ok(())
    }

    /// Pushes an INTEGER holding an unsigned big-endian number: leading
    /// zeros are stripped, and a 0x00 is prepended when the top bit of
    /// the first remaining byte is set, keeping the value non-negative
    /// under DER's signed interpretation.
    pub fn push_unsigned_integer(&mut self, bytes: &[u8]) -> Result<()> {
        let mut skip = 0;
        while skip + 1 < bytes.len() && bytes[skip] == 0 {
            skip += 1;
        }
        let trimmed = &bytes[skip..];
        let mut value = Vec::with_capacity(trimmed.len() + 1);
        if trimmed.is_empty() || trimmed[0] & 0x80 == 0x80 {
            value.push(0);
        }
        value.extend_from_slice(trimmed);
        self.push_tlv(TAG_INTEGER, &value)
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Converts a raw 64-byte (r‖s) P-256 signature into an X9.62 DER
/// SEQUENCE of two INTEGERs.
pub fn raw_to_der(raw: &[u8]) -> Result<Vec<u8>> {
    if raw.len() != P256_ECDSA_SIGNATURE_LENGTH_RAW {
        return Err(ErrorKind::Internal)?;
    }
    let mut inner = DerWriter::new();
    inner.push_unsigned_integer(&raw[..P256_FE_LENGTH])?;
    inner.push_unsigned_integer(&raw[P256_FE_LENGTH..])?;
    tlv(TAG_SEQUENCE, inner.as_bytes())
}

fn read_len(der: &[u8], idx: &mut usize) -> Result<usize> {
    if *idx >= der.len() {
        return Err(ErrorKind::Internal)?;
    }
    let first = der[*idx];
    *idx += 1;
    match first {
        len if len < 0x80 => Ok(usize::from(len)),
        0x81 => {
            if *idx >= der.len() {
                return Err(ErrorKind::Internal)?;
            }
            let len = usize::from(der[*idx]);
            *idx += 1;
            Ok(len)
        }
        /* multi-byte long forms never occur at P-256 sizes */
        _ => Err(ErrorKind::Internal)?,
    }
}

/// Reads one INTEGER and left-pads it into a fixed-width field element.
fn read_field_element(
    der: &[u8],
    idx: &mut usize,
    out: &mut [u8],
) -> Result<()> {
    if *idx >= der.len() || der[*idx] != TAG_INTEGER {
        return Err(ErrorKind::Internal)?;
    }
    *idx += 1;
    let len = read_len(der, idx)?;
    if len == 0 || *idx + len > der.len() {
        return Err(ErrorKind::Internal)?;
    }
    let mut value = &der[*idx..*idx + len];
    *idx += len;
    /* drop the sign byte a set top bit forced in */
    while value.len() > 1 && value[0] == 0 {
        value = &value[1..];
    }
    if value.len() > out.len() {
        return Err(ErrorKind::Internal)?;
    }
    out.fill(0);
    let pad = out.len() - value.len();
    out[pad..].copy_from_slice(value);
    Ok(())
}

/// Converts an X9.62 DER signature back into raw fixed-width (r‖s).
/// Malformed input fails `Internal`.
pub fn der_to_raw(
    der: &[u8],
    raw: &mut [u8; P256_ECDSA_SIGNATURE_LENGTH_RAW],
) -> Result<()> {
    let mut idx = 0;
    if der.is_empty() || der[idx] != TAG_SEQUENCE {
        return Err(ErrorKind::Internal)?;
    }
    idx += 1;
    let seq_len = read_len(der, &mut idx)?;
    if idx + seq_len != der.len() {
        return Err(ErrorKind::Internal)?;
    }
    let (r, s) = raw.split_at_mut(P256_FE_LENGTH);
    read_field_element(der, &mut idx, r)?;
    read_field_element(der, &mut idx, s)?;
    if idx != der.len() {
        return Err(ErrorKind::Internal)?;
    }
    Ok(())
}
