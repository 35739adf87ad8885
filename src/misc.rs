// Copyright 2026 The trustm-pal developers
// See LICENSE.txt file for terms

/* misc utilities that do not really belong in any module */

use std::sync::atomic::{compiler_fence, Ordering};

/// Wipes a buffer in a way the optimizer cannot elide.
pub fn zeromem(mem: &mut [u8]) {
    let ptr = mem.as_mut_ptr();
    for i in 0..mem.len() {
        unsafe {
            std::ptr::write_volatile(ptr.add(i), 0);
        }
    }
    compiler_fence(Ordering::SeqCst);
}
