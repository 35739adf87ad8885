// Copyright 2026 The trustm-pal developers
// See LICENSE.txt file for terms

//! PKCS#10 certificate signing request builder.
//!
//! Assembles the CertificationRequestInfo, hashes it on the host, signs
//! the digest through the keypair (element slot or host scalar), and
//! wraps the result in the outer CertificationRequest envelope. Lengths
//! stay within the single-byte long form the writer supports, which
//! caps a CSR at 255 content bytes; a P-256 request with the fixed
//! subject fits with room to spare.

use sha2::{Digest, Sha256};

use crate::buffers::P256EcdsaSignature;
use crate::der::{
    tlv, DerWriter, TAG_BIT_STRING, TAG_CONTEXT_0, TAG_INTEGER,
    TAG_SEQUENCE, TAG_SET, TAG_UTF8_STRING,
};
use crate::error::{Error, ErrorKind, Result};
use crate::keys::P256Keypair;
use crate::session::Hsm;

/// X.501 AttributeType organizationName (2.5.4.10), pre-encoded
const ORGANIZATION_NAME_OID: [u8; 5] = [0x06, 0x03, 0x55, 0x04, 0x0A];
/// Literal subject the bridge puts in every request
const SUBJECT_ORGANIZATION: &[u8] = b"CSR";

/// AlgorithmIdentifier content for ecdsa-with-SHA256 (1.2.840.10045.4.3.2)
const ECDSA_WITH_SHA256_OID: [u8; 10] =
    [0x06, 0x08, 0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x04, 0x03, 0x02];

/// Fixed SubjectPublicKeyInfo algorithm for id-ecPublicKey over
/// prime256v1: SEQUENCE { OID 1.2.840.10045.2.1, OID 1.2.840.10045.3.1.7 }
const EC_P256_ALGORITHM: [u8; 21] = [
    0x30, 0x13, 0x06, 0x07, 0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x02, 0x01, 0x06,
    0x08, 0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x03, 0x01, 0x07,
];

fn request_info(keypair: &P256Keypair) -> Result<Vec<u8>> {
    let mut info = DerWriter::new();

    /* version v1 */
    info.push_tlv(TAG_INTEGER, &[0x00])?;

    /* subject: Name = SEQUENCE of one RDN SET holding O="CSR" */
    let mut atv = DerWriter::new();
    atv.push_raw(&ORGANIZATION_NAME_OID);
    atv.push_tlv(TAG_UTF8_STRING, SUBJECT_ORGANIZATION)?;
    let rdn = tlv(TAG_SET, &tlv(TAG_SEQUENCE, atv.as_bytes())?)?;
    info.push_tlv(TAG_SEQUENCE, &rdn)?;

    /* SubjectPublicKeyInfo with the raw uncompressed point */
    let mut spki = DerWriter::new();
    spki.push_raw(&EC_P256_ALGORITHM);
    let mut point_bits = Vec::with_capacity(66);
    point_bits.push(0x00);
    point_bits.extend_from_slice(keypair.public_key().as_bytes());
    spki.push_tlv(TAG_BIT_STRING, &point_bits)?;
    info.push_tlv(TAG_SEQUENCE, spki.as_bytes())?;

    /* empty attributes */
    info.push_tlv(TAG_CONTEXT_0, &[])?;

    tlv(TAG_SEQUENCE, info.as_bytes())
}

/// Builds and signs a CSR for `keypair`, writing the DER bytes into
/// `out` and returning the encoded length. The caller's buffer must
/// hold the whole request; a buffer even one byte short fails
/// `Internal` without touching memory past the end.
pub fn new_certificate_signing_request(
    hsm: &Hsm,
    keypair: &P256Keypair,
    out: &mut [u8],
) -> Result<usize> {
    if !keypair.is_initialized() {
        return Err(Error::uninitialized());
    }

    let info = request_info(keypair)?;
    let digest: [u8; 32] = Sha256::digest(&info).into();

    let mut signature = P256EcdsaSignature::default();
    keypair.ecdsa_sign_hash(hsm, &digest, &mut signature)?;
    let der_sig = crate::der::raw_to_der(signature.as_slice())?;

    let mut csr = DerWriter::new();
    csr.push_raw(&info);
    csr.push_tlv(TAG_SEQUENCE, &ECDSA_WITH_SHA256_OID)?;
    let mut sig_bits = Vec::with_capacity(der_sig.len() + 1);
    sig_bits.push(0x00);
    sig_bits.extend_from_slice(&der_sig);
    csr.push_tlv(TAG_BIT_STRING, &sig_bits)?;
    let encoded = tlv(TAG_SEQUENCE, csr.as_bytes())?;

    if encoded.len() > out.len() {
        log::debug!(
            "csr needs {} bytes, caller buffer holds {}",
            encoded.len(),
            out.len()
        );
        return Err(ErrorKind::Internal)?;
    }
    out[..encoded.len()].copy_from_slice(&encoded);
    Ok(encoded.len())
}
