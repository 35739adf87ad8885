// Copyright 2026 The trustm-pal developers
// See LICENSE.txt file for terms

use super::{sim_hsm, test_hsm};
use crate::drbg::rng_fill;
use crate::error::ErrorKind;
use crate::sim::SimulatedElement;

#[test]
fn fills_buffer() {
    let hsm = test_hsm();
    let mut out = [0u8; 32];
    rng_fill(&hsm, &mut out).unwrap();
    assert!(out.iter().any(|b| *b != 0));

    let mut other = [0u8; 32];
    rng_fill(&hsm, &mut other).unwrap();
    assert_ne!(out, other);
}

#[test]
fn empty_buffer_invalid() {
    let hsm = test_hsm();
    let err = rng_fill(&hsm, &mut []).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn vendor_failure_surfaces() {
    /* the historical always-success return on this path is not kept;
     * a TRNG fault must be visible to the caller */
    let mut element = SimulatedElement::new();
    element.set_rng_failure(true);
    let hsm = sim_hsm(element);

    let mut out = [0u8; 16];
    let err = rng_fill(&hsm, &mut out).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);

    /* the failed operation closed the session */
    assert!(!hsm.lock().unwrap().is_open());
}

#[test]
fn session_reopens_after_failure() {
    let mut element = SimulatedElement::new();
    element.set_rng_failure(true);
    let hsm = sim_hsm(element);

    let mut out = [0u8; 16];
    assert!(rng_fill(&hsm, &mut out).is_err());

    /* a later operation opens a fresh session and works */
    let mut okm = [0u8; 32];
    crate::hkdf::hkdf_sha256(&hsm, b"secret", &[], b"info", &mut okm)
        .unwrap();
}
