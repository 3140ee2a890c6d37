//! Software serial port for host simulation.
//!
//! Stands in for the real peripheral in integration tests and host demos:
//! bytes injected onto the simulated wire become RX-ready data, bytes the
//! ISR writes to the data register are captured for inspection, and the
//! interrupt-enable and mask state is observable. The interrupt itself is
//! simulated by calling
//! [`TransportChannel::on_interrupt`](crate::channel::TransportChannel::on_interrupt)
//! wherever the vector would fire.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use super::SerialPort;
use crate::ring::RingBuffer;

/// Capacity of the simulated wire and of the output capture, in bytes.
pub const LOOPBACK_DEPTH: usize = 256;

/// In-memory serial port.
///
/// All state is atomics and SPSC rings, so a port can be shared by
/// reference between a simulated-ISR thread and the foreground under test,
/// the same way the register block is shared on hardware.
pub struct LoopbackPort {
    /// Inbound bytes waiting to be "received" (filled by `inject`).
    wire: RingBuffer<LOOPBACK_DEPTH>,

    /// Bytes written to the outbound data register.
    output: RingBuffer<LOOPBACK_DEPTH>,

    rx_irq_enabled: AtomicBool,
    tx_irq_enabled: AtomicBool,

    /// Nesting depth of `with_irq_masked` sections currently open.
    mask_depth: AtomicU32,

    /// Total masked sections entered. For assertions on flush discipline.
    masked_sections: AtomicU32,
}

impl LoopbackPort {
    /// Create an idle port: nothing on the wire, all interrupts disarmed.
    pub const fn new() -> Self {
        Self {
            wire: RingBuffer::new(),
            output: RingBuffer::new(),
            rx_irq_enabled: AtomicBool::new(false),
            tx_irq_enabled: AtomicBool::new(false),
            mask_depth: AtomicU32::new(0),
            masked_sections: AtomicU32::new(0),
        }
    }

    /// Put bytes on the simulated wire.
    ///
    /// Returns how many were accepted; the rest are lost, like line noise
    /// overrunning a one-byte data register.
    pub fn inject(&self, bytes: &[u8]) -> usize {
        let mut accepted = 0;
        for &byte in bytes {
            if self.wire.push(byte).is_err() {
                break;
            }
            accepted += 1;
        }
        accepted
    }

    /// Bytes still waiting on the wire.
    pub fn wire_pending(&self) -> usize {
        self.wire.available()
    }

    /// Move captured output into `dest`, returning the number of bytes.
    pub fn drain_output(&self, dest: &mut [u8]) -> usize {
        let mut n = 0;
        while n < dest.len() {
            match self.output.pop() {
                Ok(byte) => {
                    dest[n] = byte;
                    n += 1;
                }
                Err(_) => break,
            }
        }
        n
    }

    /// Captured output bytes not yet drained.
    pub fn output_pending(&self) -> usize {
        self.output.available()
    }

    /// Whether the RX interrupt source is armed.
    pub fn rx_interrupt_enabled(&self) -> bool {
        self.rx_irq_enabled.load(Ordering::Relaxed)
    }

    /// Whether the TX interrupt source is armed.
    pub fn tx_interrupt_enabled(&self) -> bool {
        self.tx_irq_enabled.load(Ordering::Relaxed)
    }

    /// Depth of currently open masked sections (0 when unmasked).
    pub fn mask_depth(&self) -> u32 {
        self.mask_depth.load(Ordering::Relaxed)
    }

    /// Total masked sections entered since construction.
    pub fn masked_sections(&self) -> u32 {
        self.masked_sections.load(Ordering::Relaxed)
    }
}

impl SerialPort for LoopbackPort {
    fn rx_ready(&self) -> bool {
        // Status flag, not gated by the enable bit: real hardware raises
        // RX-ready whenever the data register is occupied.
        !self.wire.is_empty()
    }

    fn read_data(&self) -> u8 {
        self.wire.pop().unwrap_or(0)
    }

    fn tx_ready(&self) -> bool {
        // The simulated data register always accepts, so TX-ready reduces
        // to the interrupt source being armed.
        self.tx_irq_enabled.load(Ordering::Relaxed)
    }

    fn write_data(&self, byte: u8) {
        // Capture overflow silently drops, like a disconnected probe.
        let _ = self.output.push(byte);
    }

    fn enable_rx_interrupt(&self) {
        self.rx_irq_enabled.store(true, Ordering::Relaxed);
    }

    fn enable_tx_interrupt(&self) {
        self.tx_irq_enabled.store(true, Ordering::Relaxed);
    }

    fn disable_tx_interrupt(&self) {
        self.tx_irq_enabled.store(false, Ordering::Relaxed);
    }

    fn with_irq_masked<R>(&self, f: impl FnOnce() -> R) -> R {
        self.mask_depth.fetch_add(1, Ordering::Relaxed);
        self.masked_sections.fetch_add(1, Ordering::Relaxed);
        let result = f();
        self.mask_depth.fetch_sub(1, Ordering::Relaxed);
        result
    }
}

impl Default for LoopbackPort {
    fn default() -> Self {
        Self::new()
    }
}
