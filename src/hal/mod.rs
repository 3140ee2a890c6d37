//! Hardware Abstraction Layer for RustUartLink.
//!
//! Thin wrappers around the serial peripheral. Business logic stays in the
//! core modules; the HAL is just register-level I/O behind a trait so the
//! core can be exercised on the host with a simulated port.

pub mod loopback;

#[cfg(target_os = "espidf")]
pub mod espidf;

pub use loopback::LoopbackPort;

/// Interface to the serial peripheral.
///
/// Methods take `&self` because hardware I/O is inherently shared state:
/// the same peripheral is touched from the interrupt handler and from the
/// foreground context. Implementations wrap volatile register access or,
/// for host simulation, interior-mutability state.
pub trait SerialPort {
    /// True when the data register holds an unread inbound byte.
    fn rx_ready(&self) -> bool;

    /// Read the inbound data register, clearing the RX-ready condition.
    fn read_data(&self) -> u8;

    /// True when the TX-empty interrupt is armed and the outbound data
    /// register can accept a byte.
    fn tx_ready(&self) -> bool;

    /// Write one byte to the outbound data register.
    fn write_data(&self, byte: u8);

    /// Arm the RX-ready interrupt source.
    fn enable_rx_interrupt(&self);

    /// Arm the TX-empty interrupt source so the ISR resumes draining.
    fn enable_tx_interrupt(&self);

    /// Disarm the TX-empty interrupt source. Called by the ISR once the TX
    /// buffer runs dry, so the interrupt stops re-firing against an empty
    /// queue.
    fn disable_tx_interrupt(&self);

    /// Run `f` with this peripheral's interrupt sources masked.
    ///
    /// This is the scoped critical section used by operations that must
    /// touch both ring-buffer indices from the foreground (flush). The
    /// closure shape guarantees the mask is released on every exit path.
    /// Not required to nest.
    fn with_irq_masked<R>(&self, f: impl FnOnce() -> R) -> R;
}

impl<T: SerialPort> SerialPort for &T {
    #[inline]
    fn rx_ready(&self) -> bool {
        (**self).rx_ready()
    }

    #[inline]
    fn read_data(&self) -> u8 {
        (**self).read_data()
    }

    #[inline]
    fn tx_ready(&self) -> bool {
        (**self).tx_ready()
    }

    #[inline]
    fn write_data(&self, byte: u8) {
        (**self).write_data(byte)
    }

    #[inline]
    fn enable_rx_interrupt(&self) {
        (**self).enable_rx_interrupt()
    }

    #[inline]
    fn enable_tx_interrupt(&self) {
        (**self).enable_tx_interrupt()
    }

    #[inline]
    fn disable_tx_interrupt(&self) {
        (**self).disable_tx_interrupt()
    }

    #[inline]
    fn with_irq_masked<R>(&self, f: impl FnOnce() -> R) -> R {
        (**self).with_irq_masked(f)
    }
}
