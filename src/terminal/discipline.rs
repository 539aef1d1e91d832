//! Line discipline: raw interrupts in, completed lines out
//!
//! Assembles `Char` interrupts into a partial line, honors `Backspace`
//! editing, and materializes the buffer into the current
//! [`LineQueue`](crate::terminal::LineQueue) on `Enter`. Echo policy lives
//! here so password prompts can suppress input mirroring without the device
//! or the reader knowing why.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::device::{Interrupt, InterruptHandler, TerminalDevice};
use crate::terminal::QueueSlot;

/// Interrupt-side half of a [`Terminal`](crate::terminal::Terminal).
///
/// Invoked from the device's thread; all state is interior-mutable. The
/// partial line buffer is owned exclusively by the discipline and never
/// exposed.
pub struct LineDiscipline {
    /// In-progress line, cleared on every `Enter`.
    partial: Mutex<String>,
    /// Whether input is mirrored back to the device. Stores must be visible
    /// to the very next interrupt processed.
    echo: AtomicBool,
    /// Destination for completed lines; shared with the owning terminal,
    /// which swaps in a fresh queue on disconnect.
    queue: QueueSlot,
}

impl LineDiscipline {
    /// Create a discipline feeding the given queue slot. Echo starts off.
    pub fn new(queue: QueueSlot) -> Self {
        Self {
            partial: Mutex::new(String::new()),
            echo: AtomicBool::new(false),
            queue,
        }
    }

    /// Current echo state.
    pub fn echo(&self) -> bool {
        self.echo.load(Ordering::Acquire)
    }

    /// Set echo; takes effect for the next interrupt processed.
    pub fn set_echo(&self, on: bool) {
        self.echo.store(on, Ordering::Release);
    }

    fn on_char(&self, device: &dyn TerminalDevice) {
        let Some(c) = device.recv_char() else {
            warn!("CHAR interrupt with no pending character");
            return;
        };
        if self.echo() {
            device.send_char(c);
        }
        self.partial
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(c);
    }

    fn on_enter(&self, device: &dyn TerminalDevice) {
        if self.echo() {
            device.send_newline();
        }
        let line = std::mem::take(
            &mut *self.partial.lock().unwrap_or_else(PoisonError::into_inner),
        );
        trace!(len = line.len(), "line completed");
        self.queue.current().insert(line);
    }

    fn on_backspace(&self, device: &dyn TerminalDevice) {
        let mut partial = self.partial.lock().unwrap_or_else(PoisonError::into_inner);
        if partial.pop().is_none() {
            // Nothing to erase; the interrupt is a no-op.
            return;
        }
        drop(partial);
        if self.echo() {
            device.send_char('\u{8}');
            device.send_char(' ');
            device.send_char('\u{8}');
        }
    }
}

impl InterruptHandler for LineDiscipline {
    fn handle_interrupt(&self, device: &dyn TerminalDevice, interrupt: Interrupt) {
        match interrupt {
            Interrupt::Char => self.on_char(device),
            Interrupt::Enter => self.on_enter(device),
            Interrupt::Backspace => self.on_backspace(device),
        }
    }
}

impl std::fmt::Debug for LineDiscipline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineDiscipline")
            .field("echo", &self.echo())
            .finish_non_exhaustive()
    }
}
