// Copyright 2026 The trustm-pal developers
// See LICENSE.txt file for terms

use crate::config::SlotConfig;
use crate::keys::EcpKeyTarget;
use crate::keys::P256Keypair;
use crate::session::Hsm;
use crate::sim::SimulatedElement;

mod drbg;
mod ecc;
mod hkdf;
mod hmac;

/// An HSM handle backed by the software simulation, with the default
/// slot layout (two keygen slots). The config is passed explicitly so
/// no test depends on the process environment.
pub fn test_hsm() -> Hsm {
    sim_hsm(SimulatedElement::new())
}

/// Same, wrapping a caller prepared element (fault injection, custom
/// state).
pub fn sim_hsm(element: SimulatedElement) -> Hsm {
    Hsm::with_config(Box::new(element), SlotConfig::default())
}

/// Burns every keygen slot so the next initialize lands on the
/// software backend.
pub fn exhaust_keygen_slots(hsm: &Hsm) {
    loop {
        let mut kp = P256Keypair::new();
        kp.initialize(hsm, EcpKeyTarget::Ecdsa).unwrap();
        if !kp.is_hardware_backed() {
            break;
        }
    }
}
