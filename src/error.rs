//! Link error types

/// Transport error with code and message
///
/// Every fallible operation in the crate returns one of these. `Timeout`,
/// `BufferFull` and `BufferEmpty` are expected steady-state outcomes on an
/// unreliable serial link, not exceptional ones; callers are expected to
/// retry or poll again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// E01: Bounded wait did not complete in time
    Timeout,
    /// E02: Producer-side capacity exceeded
    BufferFull,
    /// E03: Consumer-side underrun on non-blocking read/peek
    BufferEmpty,
    /// E04: Empty pattern or zero-capacity destination
    InvalidParam,
    /// E05: Pattern absent in a non-streaming search
    NotFound,
}

impl LinkError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Timeout => "E01",
            Self::BufferFull => "E02",
            Self::BufferEmpty => "E03",
            Self::InvalidParam => "E04",
            Self::NotFound => "E05",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::Timeout => "timed out",
            Self::BufferFull => "buffer full",
            Self::BufferEmpty => "buffer empty",
            Self::InvalidParam => "invalid parameter",
            Self::NotFound => "not found",
        }
    }
}

impl core::fmt::Display for LinkError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}
