// Copyright 2026 The trustm-pal developers
// See LICENSE.txt file for terms

//! Session manager for the secure element.
//!
//! All shared element state is owned by [`Hsm`] and guarded by a single
//! mutex; facade calls lock for the duration of the hardware
//! interaction, which serializes concurrent crypto operations. The
//! session is opened lazily and left open across successful operations;
//! only error paths close it.

use std::sync::{Mutex, MutexGuard};

use crate::config::SlotConfig;
use crate::error::{ErrorKind, Result};
use crate::hal::{SecureElement, STATUS_SUCCESS};

#[derive(Debug)]
pub struct HsmInner {
    pub element: Box<dyn SecureElement>,
    open: bool,
    next_keygen: u16,
    last_keygen: u16,
}

impl HsmInner {
    /// Opens the session unless it already is open. Open failures are
    /// not surfaced here; the subsequent vendor call reports the only
    /// observable error.
    pub fn ensure_open(&mut self) {
        if !self.open {
            let status = self.element.open();
            if status == STATUS_SUCCESS {
                self.open = true;
            } else {
                log::warn!("session open returned {:#06x}", status);
            }
        }
    }

    /// Tears the session down after a failed operation. Close failures
    /// are swallowed for the same reason open failures are.
    pub fn close_on_error(&mut self) {
        if self.open {
            let status = self.element.close();
            if status != STATUS_SUCCESS {
                log::warn!("session close returned {:#06x}", status);
            }
            self.open = false;
        }
    }

    /// Hands out the next free key-generation slot, if any remain.
    pub fn take_keygen_slot(&mut self) -> Option<u16> {
        if self.next_keygen > self.last_keygen {
            return None;
        }
        let slot = self.next_keygen;
        self.next_keygen += 1;
        Some(slot)
    }

    /// Puts the most recently taken slot back when key generation in it
    /// failed, so a transient fault does not burn the slot for good.
    pub fn return_keygen_slot(&mut self, slot: u16) {
        if self.next_keygen == slot + 1 {
            self.next_keygen = slot;
        }
    }

    #[cfg(test)]
    pub fn is_open(&self) -> bool {
        self.open
    }
}

/// Owned handle to the secure element, passed into every facade call.
#[derive(Debug)]
pub struct Hsm {
    inner: Mutex<HsmInner>,
    slots: SlotConfig,
}

impl Hsm {
    /// Builds a handle with the slot layout named by `TRUSTM_PAL_CONF`,
    /// falling back to the stock layout when the variable is unset. A
    /// named file that does not load is the caller's error to see.
    pub fn new(element: Box<dyn SecureElement>) -> Result<Hsm> {
        let slots = SlotConfig::from_env()?;
        Ok(Hsm::with_config(element, slots))
    }

    pub fn with_config(
        element: Box<dyn SecureElement>,
        slots: SlotConfig,
    ) -> Hsm {
        crate::log::trustm_log_init();
        let inner = HsmInner {
            element: element,
            open: false,
            next_keygen: slots.keygen_first_slot,
            last_keygen: slots.keygen_last_slot,
        };
        Hsm {
            inner: Mutex::new(inner),
            slots: slots,
        }
    }

    pub fn slots(&self) -> &SlotConfig {
        &self.slots
    }

    /// Locks the element for one operation. A poisoned lock means a
    /// panic happened mid-operation on another thread; that state is
    /// not recoverable here.
    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, HsmInner>> {
        self.inner.lock().map_err(|_| ErrorKind::Internal.into())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sim::SimulatedElement;

    fn sim_hsm() -> Hsm {
        Hsm::with_config(
            Box::new(SimulatedElement::new()),
            SlotConfig::default(),
        )
    }

    #[test]
    fn open_is_idempotent() {
        let hsm = sim_hsm();
        let mut inner = hsm.lock().unwrap();
        assert!(!inner.is_open());
        inner.ensure_open();
        assert!(inner.is_open());
        inner.ensure_open();
        assert!(inner.is_open());
        inner.close_on_error();
        assert!(!inner.is_open());
    }

    #[test]
    fn keygen_slots_run_out() {
        let hsm = sim_hsm();
        let mut inner = hsm.lock().unwrap();
        assert_eq!(inner.take_keygen_slot(), Some(0xE0F2));
        assert_eq!(inner.take_keygen_slot(), Some(0xE0F3));
        assert_eq!(inner.take_keygen_slot(), None);
    }

    #[test]
    fn returned_keygen_slot_is_reissued() {
        let hsm = sim_hsm();
        let mut inner = hsm.lock().unwrap();
        assert_eq!(inner.take_keygen_slot(), Some(0xE0F2));
        inner.return_keygen_slot(0xE0F2);
        assert_eq!(inner.take_keygen_slot(), Some(0xE0F2));
        assert_eq!(inner.take_keygen_slot(), Some(0xE0F3));
        /* only the slot on top of the allocator can come back */
        inner.return_keygen_slot(0xE0F2);
        assert_eq!(inner.take_keygen_slot(), None);
    }

    #[test]
    fn malformed_config_file_is_an_error() {
        /* no other test reads TRUSTM_PAL_CONF; everything else builds
         * its handle with an explicit config */
        let path = std::env::temp_dir().join("trustm_pal_bad_conf.toml");
        std::fs::write(&path, "keygen_first_slot = \"not a number\"\n")
            .unwrap();
        std::env::set_var(crate::config::CONF_ENV_VAR, &path);
        let result = Hsm::new(Box::new(SimulatedElement::new()));
        std::env::remove_var(crate::config::CONF_ENV_VAR);
        std::fs::remove_file(&path).ok();
        assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidArgument);
    }
}
