//! Link diagnostics counters.
//!
//! The ISR boundary has no error channel: an RX byte that arrives while the
//! buffer is full is dropped on the floor. These counters make such events
//! visible without changing the drop behavior: the foreground can poll a
//! snapshot and decide whether the link is healthy.

use core::sync::atomic::{AtomicU32, Ordering};

/// Lock-free event counters shared by the ISR and foreground contexts.
///
/// All updates are relaxed atomic increments: safe from interrupt context,
/// never blocking. Counts accumulate from boot and are never cleared by the
/// transport itself.
pub struct LinkStats {
    /// Bytes the ISR moved from the data register into the RX buffer.
    rx_bytes: AtomicU32,

    /// RX bytes dropped because the buffer was full. Unrecoverable.
    rx_dropped: AtomicU32,

    /// Bytes the ISR drained from the TX buffer to the data register.
    tx_bytes: AtomicU32,

    /// Foreground writes that gave up waiting for TX space.
    tx_timeouts: AtomicU32,
}

impl LinkStats {
    /// Create zeroed counters.
    pub const fn new() -> Self {
        Self {
            rx_bytes: AtomicU32::new(0),
            rx_dropped: AtomicU32::new(0),
            tx_bytes: AtomicU32::new(0),
            tx_timeouts: AtomicU32::new(0),
        }
    }

    #[inline]
    pub(crate) fn note_rx_byte(&self) {
        self.rx_bytes.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn note_rx_dropped(&self) {
        self.rx_dropped.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn note_tx_byte(&self) {
        self.tx_bytes.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn note_tx_timeout(&self) {
        self.tx_timeouts.fetch_add(1, Ordering::Relaxed);
    }

    /// Bytes received into the RX buffer.
    #[inline]
    pub fn rx_bytes(&self) -> u32 {
        self.rx_bytes.load(Ordering::Relaxed)
    }

    /// Bytes silently dropped on RX overflow.
    #[inline]
    pub fn rx_dropped(&self) -> u32 {
        self.rx_dropped.load(Ordering::Relaxed)
    }

    /// Bytes drained from the TX buffer to the peripheral.
    #[inline]
    pub fn tx_bytes(&self) -> u32 {
        self.tx_bytes.load(Ordering::Relaxed)
    }

    /// Writes that timed out under backpressure.
    #[inline]
    pub fn tx_timeouts(&self) -> u32 {
        self.tx_timeouts.load(Ordering::Relaxed)
    }

    /// Snapshot of all counters at a point in time.
    ///
    /// Individual loads are relaxed; a snapshot taken while the ISR is
    /// active may mix counts from adjacent instants, which is fine for
    /// diagnostics.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            rx_bytes: self.rx_bytes(),
            rx_dropped: self.rx_dropped(),
            tx_bytes: self.tx_bytes(),
            tx_timeouts: self.tx_timeouts(),
        }
    }
}

impl Default for LinkStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of [`LinkStats`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub rx_bytes: u32,
    pub rx_dropped: u32,
    pub tx_bytes: u32,
    pub tx_timeouts: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let stats = LinkStats::new();

        stats.note_rx_byte();
        stats.note_rx_byte();
        stats.note_rx_dropped();
        stats.note_tx_byte();
        stats.note_tx_timeout();

        let snap = stats.snapshot();
        assert_eq!(snap.rx_bytes, 2);
        assert_eq!(snap.rx_dropped, 1);
        assert_eq!(snap.tx_bytes, 1);
        assert_eq!(snap.tx_timeouts, 1);
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let stats = LinkStats::new();

        let before = stats.snapshot();
        stats.note_rx_byte();
        let after = stats.snapshot();

        assert_eq!(before.rx_bytes, 0);
        assert_eq!(after.rx_bytes, 1);
    }
}
