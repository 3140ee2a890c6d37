//! # RustUartLink
//!
//! Buffered, interrupt-driven byte transport for a serial peripheral, plus
//! streaming token matching for line- and token-oriented protocols.
//!
//! ## Architecture
//!
//! All bytes flow through one [`TransportChannel`] holding two lock-free
//! SPSC rings:
//!
//! ```text
//! IRQ context    ──▶ rx ring ──▶ read_byte / wait_for_token / copy_until
//! (on_interrupt)                              (foreground)
//!
//! write_byte / write_str ──▶ tx ring ──▶ on_interrupt ──▶ peripheral
//!       (foreground)                     (IRQ context)
//! ```
//!
//! No mutexes anywhere: per ring there is exactly one producer context and
//! one consumer context, coordinated by atomic indices. The interrupt
//! handler never blocks, never allocates, and never reports errors; RX
//! overflow is dropped and counted in [`LinkStats`].
//!
//! Hardware stays behind the [`hal::SerialPort`] and [`Clock`] traits, so
//! the whole core runs on the host against [`hal::LoopbackPort`] and
//! [`ManualClock`].

#![cfg_attr(not(test), no_std)]

pub mod channel;
pub mod error;
pub mod hal;
pub mod link;
pub mod matcher;
pub mod ring;
pub mod stats;
pub mod timeout;

pub use channel::{TransportChannel, BUFFER_SIZE};
pub use error::LinkError;
pub use hal::{LoopbackPort, SerialPort};
pub use link::{extract_between, CopyError, SerialLink, DEFAULT_WRITE_TIMEOUT_MS};
pub use matcher::{find_token, TokenMatcher};
pub use ring::RingBuffer;
pub use stats::{LinkStats, StatsSnapshot};
pub use timeout::{Clock, ManualClock, Timeout};
