//! ESP-IDF glue: tick source and UART wiring.
//!
//! Only compiled when targeting the chip. Everything here is a thin shim
//! over `esp_idf_svc`; the transport core never touches ESP APIs directly.

use esp_idf_svc::sys as esp_idf_sys;

use crate::timeout::Clock;

/// Millisecond clock over the ESP high-resolution timer.
///
/// `esp_timer_get_time` is a monotonic microsecond counter; divided down to
/// milliseconds it wraps a `u32` after ~49 days, which the wrapping
/// arithmetic in [`Timeout`](crate::timeout::Timeout) handles.
#[derive(Clone, Copy, Default)]
pub struct EspClock;

impl Clock for EspClock {
    fn now_ms(&self) -> u32 {
        // SAFETY: esp_timer_get_time is always safe to call after esp_timer
        // init, which esp-idf-svc performs during runtime startup.
        let us = unsafe { esp_idf_sys::esp_timer_get_time() };
        (us / 1000) as u32
    }

    fn relax(&self) {
        // Yield one FreeRTOS tick so busy-polling foreground waits do not
        // starve same-priority tasks.
        unsafe {
            esp_idf_sys::vTaskDelay(1);
        }
    }
}

/// UART peripheral selection and pin mapping for the transport link.
pub struct UartPortConfig {
    pub uart_num: u8,
    pub baud_rate: u32,
    pub tx_pin: i32,
    pub rx_pin: i32,
}

impl Default for UartPortConfig {
    fn default() -> Self {
        Self {
            uart_num: 1,
            baud_rate: 115_200,
            tx_pin: 17,
            rx_pin: 18,
        }
    }
}

// TODO: SerialPort implementation over the UART register block. The ESP-IDF
// default driver owns the UART interrupt; binding this transport requires
// uart_isr_free + a custom handler that forwards to
// TransportChannel::on_interrupt. Tracked for the first hardware bring-up.
