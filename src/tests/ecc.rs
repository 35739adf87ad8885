// Copyright 2026 The trustm-pal developers
// See LICENSE.txt file for terms

use super::{exhaust_keygen_slots, sim_hsm, test_hsm};
use crate::buffers::{P256EcdsaSignature, P256_ECDSA_SIGNATURE_LENGTH_RAW};
use crate::config::SlotConfig;
use crate::error::ErrorKind;
use crate::keys::{EcpKeyTarget, P256Keypair};
use crate::session::Hsm;
use crate::sim::SimulatedElement;

#[test]
fn hardware_sign_and_verify() {
    /* scenario C */
    let hsm = test_hsm();
    let mut kp = P256Keypair::new();
    kp.initialize(&hsm, EcpKeyTarget::Ecdsa).unwrap();
    assert!(kp.is_hardware_backed());
    assert!(kp.public_key().is_uncompressed());

    let mut sig = P256EcdsaSignature::default();
    kp.ecdsa_sign_msg(&hsm, b"hello", &mut sig).unwrap();
    assert_eq!(sig.length(), P256_ECDSA_SIGNATURE_LENGTH_RAW);

    kp.public_key().ecdsa_verify_msg(&hsm, b"hello", &sig).unwrap();

    /* a different valid key must reject the signature, not crash */
    let mut other = P256Keypair::new();
    other.initialize(&hsm, EcpKeyTarget::Ecdsa).unwrap();
    let err = other
        .public_key()
        .ecdsa_verify_msg(&hsm, b"hello", &sig)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);
}

#[test]
fn software_sign_and_verify() {
    let hsm = test_hsm();
    exhaust_keygen_slots(&hsm);

    let mut kp = P256Keypair::new();
    kp.initialize(&hsm, EcpKeyTarget::Ecdsa).unwrap();
    assert!(!kp.is_hardware_backed());

    let mut sig = P256EcdsaSignature::default();
    kp.ecdsa_sign_msg(&hsm, b"host side", &mut sig).unwrap();
    kp.public_key()
        .ecdsa_verify_msg(&hsm, b"host side", &sig)
        .unwrap();
}

#[test]
fn bit_flip_rejected() {
    let hsm = test_hsm();
    let mut kp = P256Keypair::new();
    kp.initialize(&hsm, EcpKeyTarget::Ecdsa).unwrap();

    let mut sig = P256EcdsaSignature::default();
    kp.ecdsa_sign_msg(&hsm, b"flip me", &mut sig).unwrap();
    sig.bytes_mut()[17] ^= 0x01;
    let err = kp
        .public_key()
        .ecdsa_verify_msg(&hsm, b"flip me", &sig)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);
}

#[test]
fn wrong_message_rejected() {
    let hsm = test_hsm();
    let mut kp = P256Keypair::new();
    kp.initialize(&hsm, EcpKeyTarget::Ecdsa).unwrap();

    let mut sig = P256EcdsaSignature::default();
    kp.ecdsa_sign_msg(&hsm, b"signed text", &mut sig).unwrap();
    assert!(kp
        .public_key()
        .ecdsa_verify_msg(&hsm, b"other text", &sig)
        .is_err());
}

#[test]
fn hash_form_verify() {
    use sha2::{Digest, Sha256};

    let hsm = test_hsm();
    let mut kp = P256Keypair::new();
    kp.initialize(&hsm, EcpKeyTarget::Ecdsa).unwrap();

    let digest: [u8; 32] = Sha256::digest(b"prehashed").into();
    let mut sig = P256EcdsaSignature::default();
    kp.ecdsa_sign_hash(&hsm, &digest, &mut sig).unwrap();
    kp.public_key()
        .ecdsa_verify_hash(&hsm, &digest, &sig)
        .unwrap();
}

#[test]
fn empty_message_invalid() {
    let hsm = test_hsm();
    let mut kp = P256Keypair::new();
    kp.initialize(&hsm, EcpKeyTarget::Ecdsa).unwrap();

    let mut sig = P256EcdsaSignature::default();
    let err = kp.ecdsa_sign_msg(&hsm, &[], &mut sig).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn failed_keygen_does_not_burn_the_slot() {
    let mut element = SimulatedElement::new();
    element.fail_next_keygen();
    let hsm = sim_hsm(element);

    let mut kp = P256Keypair::new();
    let err = kp.initialize(&hsm, EcpKeyTarget::Ecdsa).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);

    /* both keygen slots must still be usable after the fault */
    let mut first = P256Keypair::new();
    first.initialize(&hsm, EcpKeyTarget::Ecdsa).unwrap();
    assert!(first.is_hardware_backed());
    let mut second = P256Keypair::new();
    second.initialize(&hsm, EcpKeyTarget::Ecdsa).unwrap();
    assert!(second.is_hardware_backed());
    let mut third = P256Keypair::new();
    third.initialize(&hsm, EcpKeyTarget::Ecdsa).unwrap();
    assert!(!third.is_hardware_backed());
}

#[test]
fn relocated_readback_slot_still_generates() {
    /* the public point travels through the configured readback object,
     * wherever the part was provisioned to put it */
    let mut slots = SlotConfig::default();
    slots.pubkey_readback_slot = 0xF1D2;
    let hsm =
        Hsm::with_config(Box::new(SimulatedElement::new()), slots);

    let mut kp = P256Keypair::new();
    kp.initialize(&hsm, EcpKeyTarget::Ecdsa).unwrap();
    assert!(kp.is_hardware_backed());

    let mut sig = P256EcdsaSignature::default();
    kp.ecdsa_sign_msg(&hsm, b"relocated", &mut sig).unwrap();
    kp.public_key()
        .ecdsa_verify_msg(&hsm, b"relocated", &sig)
        .unwrap();
}

#[test]
fn uninitialized_keypair_rejected() {
    let hsm = test_hsm();
    let kp = P256Keypair::new();
    let mut sig = P256EcdsaSignature::default();
    let err = kp.ecdsa_sign_msg(&hsm, b"msg", &mut sig).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Uninitialized);
}
