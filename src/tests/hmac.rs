// Copyright 2026 The trustm-pal developers
// See LICENSE.txt file for terms

use super::test_hsm;
use crate::error::ErrorKind;
use crate::hmac::{hmac_sha256, hmac_sha256_with_handle, Hmac128KeyHandle};

use hmac::{Hmac, Mac};
use sha2::Sha256;

fn reference_tag(key: &[u8], message: &[u8]) -> [u8; 32] {
    let mut mac = Hmac::<Sha256>::new_from_slice(key).unwrap();
    mac.update(message);
    mac.finalize().into_bytes().into()
}

#[test]
fn rfc4231_case_2() {
    let hsm = test_hsm();
    let mut out = [0u8; 32];
    hmac_sha256(
        &hsm,
        b"Jefe",
        b"what do ya want for nothing?",
        &mut out,
    )
    .unwrap();
    let expected = hex::decode(
        "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843",
    )
    .unwrap();
    assert_eq!(&out[..], &expected[..]);
}

#[test]
fn long_key_falls_back() {
    /* scenario B: a 65 byte key exceeds the element operand limit and
     * must run on the host with an identical output contract */
    let hsm = test_hsm();
    let key = [0u8; 65];
    let mut out = [0u8; 32];
    hmac_sha256(&hsm, &key, b"msg", &mut out).unwrap();
    assert_eq!(out, reference_tag(&key, b"msg"));
}

#[test]
fn boundary_key_stays_on_element() {
    let hsm = test_hsm();
    let key = [7u8; 64];
    let mut out = [0u8; 32];
    hmac_sha256(&hsm, &key, b"boundary", &mut out).unwrap();
    assert_eq!(out, reference_tag(&key, b"boundary"));
}

#[test]
fn truncated_tag() {
    let hsm = test_hsm();
    let mut out = [0u8; 16];
    hmac_sha256(&hsm, b"key", b"message", &mut out).unwrap();
    assert_eq!(out[..], reference_tag(b"key", b"message")[..16]);
}

#[test]
fn key_handle_form_matches_raw_form() {
    let hsm = test_hsm();
    let key = [0xa1u8; 16];
    let handle = Hmac128KeyHandle::new(key);

    let mut via_handle = [0u8; 32];
    hmac_sha256_with_handle(&hsm, &handle, b"payload", &mut via_handle)
        .unwrap();
    let mut via_bytes = [0u8; 32];
    hmac_sha256(&hsm, &key, b"payload", &mut via_bytes).unwrap();
    assert_eq!(via_handle, via_bytes);
}

#[test]
fn invalid_arguments() {
    let hsm = test_hsm();
    let mut out = [0u8; 32];
    let err = hmac_sha256(&hsm, &[], b"msg", &mut out).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let err = hmac_sha256(&hsm, b"key", &[], &mut out).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let mut oversized = [0u8; 33];
    let err = hmac_sha256(&hsm, b"key", b"msg", &mut oversized).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}
