//! RX/TX transport channel shared between ISR and foreground.
//!
//! This is the heart of RustUartLink. All bytes flow through here.
//!
//! # Architecture
//!
//! ```text
//! peripheral IRQ ──▶ on_interrupt ──▶ rx ring ──▶ read_byte / stream ops
//!                         ▲                            (foreground)
//!                         │
//! write_byte ──────▶ tx ring ──▶ on_interrupt ──▶ peripheral TX register
//! (foreground)                       (IRQ)
//! ```
//!
//! Per ring, exactly one context produces and one consumes, so no lock is
//! needed; the only cross-role operation (flush) runs inside the port's
//! masked section.

use crate::error::LinkError;
use crate::hal::SerialPort;
use crate::ring::RingBuffer;
use crate::stats::LinkStats;
use crate::timeout::{Clock, Timeout};

/// Default capacity of each ring, in physical slots. One slot is sacrificed,
/// so 1023 bytes of data fit. Applied identically to RX and TX.
pub const BUFFER_SIZE: usize = 1024;

/// Paired RX/TX ring buffers plus diagnostics, sized for `static` placement.
///
/// The ISR fills `rx` and drains `tx`; the foreground drains `rx` and fills
/// `tx`. Methods take `&self`, so a single `static CHANNEL` can be touched
/// from the interrupt vector and the application alike:
///
/// ```ignore
/// static CHANNEL: TransportChannel = TransportChannel::new();
///
/// // In the UART interrupt handler:
/// CHANNEL.on_interrupt(&PORT);
///
/// // In the application:
/// let byte = CHANNEL.read_byte()?;
/// ```
pub struct TransportChannel<const N: usize = BUFFER_SIZE> {
    /// Inbound ring. Producer: ISR. Consumer: foreground.
    rx: RingBuffer<N>,

    /// Outbound ring. Producer: foreground. Consumer: ISR.
    tx: RingBuffer<N>,

    stats: LinkStats,
}

impl<const N: usize> TransportChannel<N> {
    /// Create an empty channel.
    pub const fn new() -> Self {
        Self {
            rx: RingBuffer::new(),
            tx: RingBuffer::new(),
            stats: LinkStats::new(),
        }
    }

    /// Bring the link up: empty both rings and arm the RX interrupt.
    ///
    /// Call once at startup, before the interrupt vector is live. The rings
    /// are cleared inside the masked section anyway, so a re-init on a hot
    /// link stays safe.
    pub fn init<P: SerialPort>(&self, port: &P) {
        port.with_irq_masked(|| {
            self.rx.clear();
            self.tx.clear();
        });
        port.enable_rx_interrupt();
    }

    /// Pop the oldest received byte. Non-blocking.
    ///
    /// [`LinkError::BufferEmpty`] is the expected idle answer, not a fault.
    #[inline]
    pub fn read_byte(&self) -> Result<u8, LinkError> {
        self.rx.pop()
    }

    /// Look at the oldest received byte without consuming it.
    #[inline]
    pub fn peek_byte(&self) -> Result<u8, LinkError> {
        self.rx.peek()
    }

    /// Number of received bytes waiting to be read.
    #[inline]
    pub fn available(&self) -> usize {
        self.rx.available()
    }

    /// Number of outbound bytes the ISR has not drained yet.
    #[inline]
    pub fn tx_pending(&self) -> usize {
        self.tx.available()
    }

    /// Diagnostics counters.
    #[inline]
    pub fn stats(&self) -> &LinkStats {
        &self.stats
    }

    /// Discard all received bytes.
    ///
    /// Touches both RX indices from the foreground, which violates the
    /// single-writer rule, so the whole reset runs with the port's
    /// interrupt sources masked.
    pub fn flush_rx<P: SerialPort>(&self, port: &P) {
        port.with_irq_masked(|| self.rx.clear());
    }

    /// Queue one byte for transmission, waiting for space up to `timeout_ms`.
    ///
    /// Backpressure policy: a full TX ring stalls the caller (busy-poll with
    /// [`Clock::relax`] at each iteration) instead of dropping the byte.
    /// When the wait expires the byte is abandoned and
    /// [`LinkError::Timeout`] returned. After a successful push the TX-empty
    /// interrupt is armed so the ISR resumes draining.
    pub fn write_byte<P, C>(
        &self,
        port: &P,
        clock: &C,
        timeout_ms: u32,
        byte: u8,
    ) -> Result<(), LinkError>
    where
        P: SerialPort,
        C: Clock,
    {
        let deadline = Timeout::start(clock, timeout_ms);

        while self.tx.push(byte).is_err() {
            if deadline.is_expired(clock) {
                self.stats.note_tx_timeout();
                return Err(LinkError::Timeout);
            }
            clock.relax();
        }

        port.enable_tx_interrupt();
        Ok(())
    }

    /// Interrupt entry point. Call from the UART vector.
    ///
    /// RX-ready: moves the pending byte from the data register into the RX
    /// ring. On overflow the byte is dropped and counted; interrupt context
    /// has no error channel.
    ///
    /// TX-ready: pops one byte to the data register, or disarms the TX
    /// interrupt source once the ring is empty so it stops re-firing.
    ///
    /// # Timing
    ///
    /// O(1), never blocks, never allocates.
    pub fn on_interrupt<P: SerialPort>(&self, port: &P) {
        if port.rx_ready() {
            let byte = port.read_data();
            match self.rx.push(byte) {
                Ok(()) => self.stats.note_rx_byte(),
                Err(_) => self.stats.note_rx_dropped(),
            }
        }

        if port.tx_ready() {
            match self.tx.pop() {
                Ok(byte) => {
                    port.write_data(byte);
                    self.stats.note_tx_byte();
                }
                Err(_) => port.disable_tx_interrupt(),
            }
        }
    }
}

impl<const N: usize> Default for TransportChannel<N> {
    fn default() -> Self {
        Self::new()
    }
}
