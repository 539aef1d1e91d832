//! Mock terminal device for testing
//!
//! A scripted, recording device: tests push characters and control
//! interrupts in from the "device side" and inspect everything the stack
//! wrote back out. Interrupts are delivered synchronously on the calling
//! thread, standing in for the driver's interrupt context.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use ttyshell::device::{Interrupt, InterruptHandler, TerminalDevice};

/// Recording in-memory device.
#[derive(Default)]
pub struct MockDevice {
    handler: Mutex<Option<Arc<dyn InterruptHandler>>>,
    pending: Mutex<VecDeque<char>>,
    output: Mutex<String>,
    connected: AtomicBool,
}

impl MockDevice {
    /// Create a disconnected mock device.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Deliver one interrupt to the installed handler.
    pub fn raise(&self, interrupt: Interrupt) {
        let handler = self
            .handler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(handler) = handler {
            handler.handle_interrupt(self, interrupt);
        }
    }

    /// Type a single character (CHAR interrupt).
    pub fn type_char(&self, c: char) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(c);
        self.raise(Interrupt::Char);
    }

    /// Type each character of `text` in order.
    pub fn type_str(&self, text: &str) {
        for c in text.chars() {
            self.type_char(c);
        }
    }

    /// Type `text` followed by an ENTER interrupt.
    pub fn type_line(&self, text: &str) {
        self.type_str(text);
        self.raise(Interrupt::Enter);
    }

    /// Deliver a BACKSPACE interrupt.
    pub fn backspace(&self) {
        self.raise(Interrupt::Backspace);
    }

    /// Everything written to the device so far.
    pub fn output(&self) -> String {
        self.output
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Discard recorded output.
    pub fn clear_output(&self) {
        self.output
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Whether `connect` was called more recently than `disconnect`.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

impl TerminalDevice for MockDevice {
    fn connect(&self) {
        self.connected.store(true, Ordering::SeqCst);
    }

    fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    fn install_handler(&self, handler: Arc<dyn InterruptHandler>) {
        *self.handler.lock().unwrap_or_else(PoisonError::into_inner) = Some(handler);
    }

    fn recv_char(&self) -> Option<char> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }

    fn send_char(&self, c: char) {
        self.output
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(c);
    }

    fn send_newline(&self) {
        self.output
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttyshell::Terminal;

    #[test]
    fn records_output() {
        let device = MockDevice::new();
        device.send_char('h');
        device.send_char('i');
        device.send_newline();
        assert_eq!(device.output(), "hi\n");
    }

    #[test]
    fn connect_state_tracks_calls() {
        let device = MockDevice::new();
        assert!(!device.is_connected());
        device.connect();
        assert!(device.is_connected());
        device.disconnect();
        assert!(!device.is_connected());
    }

    #[test]
    fn typed_lines_reach_the_terminal() {
        let device = MockDevice::new();
        let terminal = Terminal::new(device.clone());
        terminal.connect();

        device.type_line("hello");
        assert_eq!(terminal.read_line(), "hello");
    }
}
