//! RustUartLink - Firmware entry point
//!
//! Wires the transport core to the ESP32 UART:
//! 1. Initialize the UART peripheral and claim its interrupt
//! 2. Point the vector at `CHANNEL.on_interrupt`
//! 3. Run the application dialog over a `SerialLink`
//!
//! Host builds get a stub `main` so `cargo test` can link the binary.

#![cfg_attr(target_os = "espidf", no_std)]
#![cfg_attr(target_os = "espidf", no_main)]

#[cfg(target_os = "espidf")]
mod firmware {
    use esp_idf_svc::sys as esp_idf_sys;

    use rust_uart_link::hal::espidf::{EspClock, UartPortConfig};
    use rust_uart_link::{SerialLink, TransportChannel};

    /// Version string (set by build.rs, includes git hash)
    const VERSION: &str = env!("VERSION_STRING");

    // Static channel shared between the UART vector and the application.
    static CHANNEL: TransportChannel = TransportChannel::new();

    #[no_mangle]
    fn main() {
        // Initialize ESP-IDF
        esp_idf_sys::link_patches();

        let _config = UartPortConfig::default();

        // TODO: bring up the UART with uart_isr_free and register a handler
        // that calls CHANNEL.on_interrupt(&PORT); blocked on the SerialPort
        // register binding in hal::espidf.

        // Placeholder: idle until the ISR wiring lands
        loop {
            unsafe {
                esp_idf_sys::vTaskDelay(1000);
            }
        }
    }

    /// Example modem dialog. Representative of the intended foreground use.
    #[allow(dead_code)]
    fn modem_task<P: rust_uart_link::SerialPort>(port: P) {
        let link = SerialLink::new(&CHANNEL, port, EspClock);
        link.init();

        let _ = link.write_str(VERSION);
        let _ = link.write_str("\r\nAT\r\n");

        if link.wait_for_token(b"OK\r\n", 1000).is_ok() {
            let mut line = [0u8; 128];
            match link.copy_until_token(b"\r\n", &mut line, 1000) {
                Ok(len) => {
                    let _ = link.write_bytes(&line[..len]);
                }
                Err(err) => {
                    // Best-effort: echo whatever partial line was captured
                    let _ = link.write_bytes(&line[..err.copied()]);
                }
            }
        }
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    // The transport core is a library; nothing to run on the host.
}
