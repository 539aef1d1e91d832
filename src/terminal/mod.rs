//! Terminal façade over the line discipline and completed-line queue
//!
//! A `Terminal` pairs one device with one [`LineDiscipline`] and one
//! [`LineQueue`]. Input flows device → discipline → queue → `read_line`;
//! output flows straight through to the device with no queueing.

pub mod discipline;
pub mod line_queue;

pub use discipline::LineDiscipline;
pub use line_queue::LineQueue;

use std::sync::{Arc, Mutex, PoisonError};

use crate::device::TerminalDevice;

/// Shared handle to the terminal's current queue.
///
/// The discipline resolves the slot on every completed line, so swapping in
/// a fresh queue on disconnect atomically redirects subsequent input.
#[derive(Debug, Clone, Default)]
pub struct QueueSlot(Arc<Mutex<Arc<LineQueue>>>);

impl QueueSlot {
    fn new() -> Self {
        Self(Arc::new(Mutex::new(Arc::new(LineQueue::new()))))
    }

    /// The queue currently receiving completed lines.
    pub fn current(&self) -> Arc<LineQueue> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = Arc::new(LineQueue::new());
    }
}

/// Line-oriented terminal endpoint.
///
/// Created around a device; installs its discipline as the device's
/// interrupt handler. Lives for the duration of one connected session.
pub struct Terminal {
    device: Arc<dyn TerminalDevice>,
    discipline: Arc<LineDiscipline>,
    queue: QueueSlot,
}

impl Terminal {
    /// Wire a terminal onto a device and install the interrupt handler.
    pub fn new(device: Arc<dyn TerminalDevice>) -> Self {
        let queue = QueueSlot::new();
        let discipline = Arc::new(LineDiscipline::new(queue.clone()));
        device.install_handler(discipline.clone());
        Self {
            device,
            discipline,
            queue,
        }
    }

    /// Open the device session.
    pub fn connect(&self) {
        debug!("terminal connect");
        self.device.connect();
    }

    /// Close the device session and discard any buffered completed lines.
    ///
    /// The queue is replaced rather than drained so a later reconnect never
    /// replays stale input. A reader already blocked in [`read_line`]
    /// remains blocked on the orphaned queue; there is no cancellation.
    ///
    /// [`read_line`]: Self::read_line
    pub fn disconnect(&self) {
        debug!("terminal disconnect, dropping buffered lines");
        self.device.disconnect();
        self.queue.replace();
    }

    /// Whether input characters are mirrored back to the device.
    pub fn echo(&self) -> bool {
        self.discipline.echo()
    }

    /// Toggle echo. Applies to the next interrupt processed, not to input
    /// already echoed.
    pub fn set_echo(&self, on: bool) {
        self.discipline.set_echo(on);
    }

    /// Return the next completed line, blocking until one is available.
    ///
    /// Lines are delivered in the exact order the discipline completed them.
    pub fn read_line(&self) -> String {
        // Resolve the slot before blocking; a disconnect during the wait
        // intentionally leaves this reader on the old queue.
        let queue = self.queue.current();
        queue.remove()
    }

    /// Send text to the device, one character at a time, no terminator.
    pub fn write(&self, text: &str) {
        for c in text.chars() {
            self.device.send_char(c);
        }
    }

    /// Send text followed by the device's newline sequence.
    pub fn write_line(&self, text: &str) {
        self.write(text);
        self.device.send_newline();
    }

    /// Number of completed lines waiting to be read (snapshot).
    pub fn pending_lines(&self) -> usize {
        self.queue.current().len()
    }
}

impl std::fmt::Debug for Terminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Terminal")
            .field("echo", &self.echo())
            .field("pending_lines", &self.pending_lines())
            .finish_non_exhaustive()
    }
}
