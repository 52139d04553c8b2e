//! Request lifecycle events.
//!
//! A mock request emits two kinds of event: `data`, carrying one body
//! chunk, and `end`, carrying nothing. Listeners are kept per kind in
//! registration order and are called synchronously when the event fires.

use bytes::Bytes;
use std::fmt;

/// Callback invoked for every `data` event.
pub type DataListener = Box<dyn FnMut(&Bytes)>;

/// Callback invoked for every `end` event.
pub type EndListener = Box<dyn FnMut()>;

/// The events a mock request can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestEvent {
    /// A chunk of the request body arrived.
    Data,
    /// The request body is complete.
    End,
}

impl RequestEvent {
    /// Returns the event name as used by Node-style emitters.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::End => "end",
        }
    }
}

impl fmt::Display for RequestEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registered listeners for one request.
#[derive(Default)]
pub struct Listeners {
    data: Vec<DataListener>,
    end: Vec<EndListener>,
}

impl Listeners {
    /// Creates an empty listener registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a `data` listener.
    pub fn add_data(&mut self, listener: impl FnMut(&Bytes) + 'static) {
        self.data.push(Box::new(listener));
    }

    /// Registers an `end` listener.
    pub fn add_end(&mut self, listener: impl FnMut() + 'static) {
        self.end.push(Box::new(listener));
    }

    /// Calls every `data` listener with `payload`, returning how many ran.
    pub fn emit_data(&mut self, payload: &Bytes) -> usize {
        for listener in &mut self.data {
            listener(payload);
        }
        self.data.len()
    }

    /// Calls every `end` listener, returning how many ran.
    pub fn emit_end(&mut self) -> usize {
        for listener in &mut self.end {
            listener();
        }
        self.end.len()
    }

    /// Number of listeners registered for `event`.
    #[must_use]
    pub fn count(&self, event: RequestEvent) -> usize {
        match event {
            RequestEvent::Data => self.data.len(),
            RequestEvent::End => self.end.len(),
        }
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("data", &self.data.len())
            .field("end", &self.end.len())
            .finish()
    }
}
