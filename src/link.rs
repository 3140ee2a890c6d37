//! Foreground handle: byte I/O plus streaming token operations.
//!
//! [`SerialLink`] pairs a shared [`TransportChannel`] with the two external
//! collaborators (port, clock) so application code gets one object to talk
//! to, while the ISR keeps hitting the channel directly.
//!
//! The streaming operations consume the RX ring incrementally, one byte at
//! a time in whatever rhythm the interrupt delivers, feeding a
//! [`TokenMatcher`] and bounding every wait with a [`Timeout`].

use crate::channel::{TransportChannel, BUFFER_SIZE};
use crate::error::LinkError;
use crate::hal::SerialPort;
use crate::matcher::{find_token, TokenMatcher};
use crate::timeout::{Clock, Timeout};

/// Write backpressure timeout used when none is configured, in ms.
pub const DEFAULT_WRITE_TIMEOUT_MS: u32 = 500;

/// Outcome of [`SerialLink::copy_until_token`] that did not find the token.
///
/// Both variants preserve the best-effort partial copy already placed in the
/// destination; `copied` is its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyError {
    /// No byte arrived within the per-byte timeout.
    Timeout { copied: usize },
    /// The destination filled up before the token appeared.
    DestFull { copied: usize },
    /// Empty token or empty destination.
    InvalidParam,
}

impl CopyError {
    /// Bytes placed in the destination before the operation gave up.
    pub fn copied(&self) -> usize {
        match self {
            Self::Timeout { copied } | Self::DestFull { copied } => *copied,
            Self::InvalidParam => 0,
        }
    }
}

impl From<CopyError> for LinkError {
    fn from(err: CopyError) -> Self {
        match err {
            CopyError::Timeout { .. } => LinkError::Timeout,
            CopyError::DestFull { .. } => LinkError::BufferFull,
            CopyError::InvalidParam => LinkError::InvalidParam,
        }
    }
}

impl core::fmt::Display for CopyError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Timeout { copied } => write!(f, "timed out after {} bytes", copied),
            Self::DestFull { copied } => write!(f, "destination full after {} bytes", copied),
            Self::InvalidParam => f.write_str("invalid parameter"),
        }
    }
}

/// Application-side view of the transport.
///
/// Holds the channel by reference (the ISR shares it) and the collaborators
/// by value. Construction is cheap; a link can live on the stack of the
/// task that owns the dialog.
///
/// ```ignore
/// static CHANNEL: TransportChannel = TransportChannel::new();
///
/// let link = SerialLink::new(&CHANNEL, port, EspClock);
/// link.init();
/// link.write_str("AT\r\n")?;
/// link.wait_for_token(b"OK\r\n", 1000)?;
/// ```
pub struct SerialLink<'a, P, C, const N: usize = BUFFER_SIZE>
where
    P: SerialPort,
    C: Clock,
{
    channel: &'a TransportChannel<N>,
    port: P,
    clock: C,
    write_timeout_ms: u32,
}

impl<'a, P, C, const N: usize> SerialLink<'a, P, C, N>
where
    P: SerialPort,
    C: Clock,
{
    /// Create a link with the default write timeout.
    pub fn new(channel: &'a TransportChannel<N>, port: P, clock: C) -> Self {
        Self {
            channel,
            port,
            clock,
            write_timeout_ms: DEFAULT_WRITE_TIMEOUT_MS,
        }
    }

    /// Override the TX backpressure timeout.
    pub fn with_write_timeout(mut self, timeout_ms: u32) -> Self {
        self.write_timeout_ms = timeout_ms;
        self
    }

    /// Bring the link up. See [`TransportChannel::init`].
    pub fn init(&self) {
        self.channel.init(&self.port);
    }

    /// The shared channel, for direct access to stats or ISR wiring.
    pub fn channel(&self) -> &'a TransportChannel<N> {
        self.channel
    }

    /// Pop the oldest received byte. Non-blocking.
    #[inline]
    pub fn read_byte(&self) -> Result<u8, LinkError> {
        self.channel.read_byte()
    }

    /// Look at the oldest received byte without consuming it.
    #[inline]
    pub fn peek_byte(&self) -> Result<u8, LinkError> {
        self.channel.peek_byte()
    }

    /// Received bytes waiting to be read.
    #[inline]
    pub fn available(&self) -> usize {
        self.channel.available()
    }

    /// Discard all received bytes (masked; see [`TransportChannel::flush_rx`]).
    pub fn flush_rx(&self) {
        self.channel.flush_rx(&self.port);
    }

    /// Queue one byte, stalling under TX backpressure up to the configured
    /// write timeout.
    pub fn write_byte(&self, byte: u8) -> Result<(), LinkError> {
        self.channel
            .write_byte(&self.port, &self.clock, self.write_timeout_ms, byte)
    }

    /// Queue a byte slice, short-circuiting on the first error.
    ///
    /// Bytes already queued stay queued: the write is at-least-partial, not
    /// atomic, and is not rolled back on failure.
    pub fn write_bytes(&self, bytes: &[u8]) -> Result<(), LinkError> {
        for &byte in bytes {
            self.write_byte(byte)?;
        }
        Ok(())
    }

    /// Queue a string. Same partial-write semantics as [`write_bytes`].
    ///
    /// [`write_bytes`]: Self::write_bytes
    pub fn write_str(&self, s: &str) -> Result<(), LinkError> {
        self.write_bytes(s.as_bytes())
    }

    /// Block until `token` has arrived on the stream, or time out.
    ///
    /// Consumes the RX ring byte by byte. The timeout bounds the gap
    /// between consecutive bytes (re-armed for every availability wait) and
    /// is also re-armed whenever the matcher holds partial progress, so a
    /// steady trickle of partially matching bytes keeps the wait alive
    /// while a silent line fails within one `timeout_ms`.
    pub fn wait_for_token(&self, token: &[u8], timeout_ms: u32) -> Result<(), LinkError> {
        if token.is_empty() {
            return Err(LinkError::InvalidParam);
        }

        let mut matcher = TokenMatcher::new(token);
        let mut deadline = Timeout::start(&self.clock, timeout_ms);

        loop {
            self.wait_for_data(&mut deadline)?;

            let byte = match self.channel.read_byte() {
                Ok(byte) => byte,
                Err(_) => continue,
            };

            if matcher.feed(byte) {
                return Ok(());
            }

            if matcher.progress() > 0 {
                deadline.restart(&self.clock);
            }
        }
    }

    /// Copy inbound bytes into `dest` until `token` has been copied, or the
    /// destination fills, or the stream goes quiet.
    ///
    /// Every consumed byte lands in `dest`, including the token itself; on
    /// success the returned length covers payload plus token. At most
    /// `dest.len() - 1` bytes are stored and the slot after them is set to
    /// zero, also on the partial-result error paths, so the buffer is
    /// always sentinel-terminated for downstream consumers.
    pub fn copy_until_token(
        &self,
        token: &[u8],
        dest: &mut [u8],
        timeout_ms: u32,
    ) -> Result<usize, CopyError> {
        if token.is_empty() || dest.is_empty() {
            return Err(CopyError::InvalidParam);
        }

        let mut matcher = TokenMatcher::new(token);
        let mut deadline = Timeout::start(&self.clock, timeout_ms);
        let mut copied = 0;

        while copied < dest.len() - 1 {
            if self.wait_for_data(&mut deadline).is_err() {
                dest[copied] = 0;
                return Err(CopyError::Timeout { copied });
            }

            let byte = match self.channel.read_byte() {
                Ok(byte) => byte,
                Err(_) => continue,
            };

            dest[copied] = byte;
            copied += 1;

            if matcher.feed(byte) {
                dest[copied] = 0;
                return Ok(copied);
            }
        }

        dest[copied] = 0;
        Err(CopyError::DestFull { copied })
    }

    /// Wait until at least one byte is available, re-arming `deadline` at
    /// entry so each byte gets the full per-byte budget.
    fn wait_for_data(&self, deadline: &mut Timeout) -> Result<(), LinkError> {
        deadline.restart(&self.clock);

        while self.channel.available() == 0 {
            if deadline.is_expired(&self.clock) {
                return Err(LinkError::Timeout);
            }
            self.clock.relax();
        }

        Ok(())
    }
}

/// Extract the bytes strictly between `start` and `end` out of a
/// materialized buffer (typically one captured by
/// [`SerialLink::copy_until_token`]).
///
/// Not streaming: both delimiters are located with a literal search, `end`
/// strictly after the `start` match. The payload is truncated to
/// `dest.len() - 1` bytes (silently: trailing bytes are dropped) and the
/// slot after it is set to zero. Returns the payload length.
pub fn extract_between(
    start: &[u8],
    end: &[u8],
    source: &[u8],
    dest: &mut [u8],
) -> Result<usize, LinkError> {
    if start.is_empty() || end.is_empty() || dest.is_empty() {
        return Err(LinkError::InvalidParam);
    }

    let payload_start =
        find_token(source, start).ok_or(LinkError::NotFound)? + start.len();
    let payload_len =
        find_token(&source[payload_start..], end).ok_or(LinkError::NotFound)?;

    let copy_len = payload_len.min(dest.len() - 1);
    dest[..copy_len].copy_from_slice(&source[payload_start..payload_start + copy_len]);
    dest[copy_len] = 0;

    Ok(copy_len)
}
