//! Device abstraction for raw terminal I/O
//!
//! The line discipline never talks to hardware directly. A `TerminalDevice`
//! delivers discrete interrupts (character available, enter, backspace) to an
//! installed `InterruptHandler` and accepts single characters and newlines
//! for output. Interrupts may arrive from any thread; the handler must not
//! assume it runs on the consumer's thread.

use std::sync::Arc;

/// Interrupt kinds a device can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    /// A character is pending; the handler fetches it with [`TerminalDevice::recv_char`].
    Char,
    /// The current line was submitted.
    Enter,
    /// The last character should be erased.
    Backspace,
}

/// Receives interrupts from a device.
///
/// Implemented by the line discipline. The raising device passes itself in
/// so the handler can fetch the pending character and echo back output.
pub trait InterruptHandler: Send + Sync {
    /// Process one interrupt. Invoked from whatever thread represents the device.
    fn handle_interrupt(&self, device: &dyn TerminalDevice, interrupt: Interrupt);
}

/// A raw character device: interrupt source plus character-level output sink.
///
/// Output is fire-and-forget; a device that can fail mid-write is expected to
/// buffer or drop internally rather than surface errors into the discipline's
/// interrupt path.
pub trait TerminalDevice: Send + Sync {
    /// Begin a device session.
    fn connect(&self);

    /// End the device session. Does not unblock a pending reader.
    fn disconnect(&self);

    /// Install the handler that receives subsequent interrupts.
    fn install_handler(&self, handler: Arc<dyn InterruptHandler>);

    /// Fetch the character pending behind a [`Interrupt::Char`].
    ///
    /// Returns `None` if no character is pending, which the discipline
    /// treats as a device contract violation and ignores.
    fn recv_char(&self) -> Option<char>;

    /// Emit one character.
    fn send_char(&self, c: char);

    /// Emit the device's newline sequence.
    fn send_newline(&self);
}
