//! Local-core interrupt masking
//!
//! Masks interrupts on the calling core only. Exclusion against other cores
//! or host threads is the job of each lock's own flag.

/// Interrupt state saved on entry and restored on exit
#[derive(Debug, Clone, Copy)]
pub struct IrqState {
    was_enabled: bool,
}

#[cfg(all(target_arch = "arm", target_os = "none"))]
mod arch {
    use cortex_m::register::primask;

    pub fn disable() -> bool {
        let was_enabled = primask::read().is_active();
        cortex_m::interrupt::disable();
        was_enabled
    }

    /// # Safety
    ///
    /// Must undo the matching `disable` on the same core.
    pub unsafe fn restore(was_enabled: bool) {
        if was_enabled {
            cortex_m::interrupt::enable();
        }
    }
}

// Hosted targets run no interrupt handlers on the caller's thread.
#[cfg(not(target_os = "none"))]
mod arch {
    pub fn disable() -> bool {
        false
    }

    pub unsafe fn restore(_was_enabled: bool) {}
}

#[cfg(all(target_os = "none", not(target_arch = "arm")))]
compile_error!("critical-lock: no local-core interrupt mask for this bare-metal target");

/// Mask interrupts on the calling core
pub(crate) fn disable() -> IrqState {
    IrqState {
        was_enabled: arch::disable(),
    }
}

/// Restore the interrupt state captured by `disable`.
///
/// # Safety
///
/// `state` must come from the most recent unrestored `disable` on this core.
pub(crate) unsafe fn restore(state: IrqState) {
    arch::restore(state.was_enabled);
}
