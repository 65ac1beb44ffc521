//! Serial console command intake.
//!
//! [`LineBuffer`] assembles operator command lines from a raw byte stream
//! in a fixed-capacity `heapless::String`.  Lines longer than the buffer
//! are discarded whole and reported as [`CommandError::Overflow`] when
//! their terminator arrives.
//!
//! On the board, [`UartConsole`] drains the UART RX FIFO without blocking.

use heapless::String;

use crate::error::CommandError;

/// Longest accepted command line (bytes, terminator excluded).
pub const LINE_CAPACITY: usize = 128;

/// One complete command line.
pub type Line = String<LINE_CAPACITY>;

#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: Line,
    overflowed: bool,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte.  Returns a result when a terminator (`\n` or `\r`)
    /// ends a non-empty line.  Non-printable bytes are dropped.
    pub fn push(&mut self, byte: u8) -> Option<Result<Line, CommandError>> {
        match byte {
            b'\n' | b'\r' => {
                if self.overflowed {
                    self.overflowed = false;
                    self.buf.clear();
                    return Some(Err(CommandError::Overflow));
                }
                if self.buf.is_empty() {
                    return None;
                }
                Some(Ok(core::mem::take(&mut self.buf)))
            }
            0x20..=0x7e => {
                if !self.overflowed && self.buf.push(char::from(byte)).is_err() {
                    self.overflowed = true;
                }
                None
            }
            _ => None,
        }
    }
}

// ── UART (ESP-IDF) ────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use uart::UartConsole;

#[cfg(target_os = "espidf")]
mod uart {
    use esp_idf_svc::sys::*;
    use log::info;

    use crate::pins;

    const UART_PORT: uart_port_t = 0;
    const RX_BUFFER: i32 = 256;

    /// Non-blocking reader on the console UART.
    pub struct UartConsole;

    impl UartConsole {
        /// Install the UART driver on the console port.
        pub fn install() -> Result<Self, i32> {
            let cfg = uart_config_t {
                baud_rate: pins::UART_BAUD as i32,
                data_bits: uart_word_length_t_UART_DATA_8_BITS,
                parity: uart_parity_t_UART_PARITY_DISABLE,
                stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
                flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
                ..Default::default()
            };
            // SAFETY: called once from main before the loop; the driver
            // owns the port afterwards.
            unsafe {
                let ret = uart_param_config(UART_PORT, &cfg);
                if ret != ESP_OK { return Err(ret); }
                let ret = uart_set_pin(UART_PORT, pins::UART_TX_GPIO, pins::UART_RX_GPIO, -1, -1);
                if ret != ESP_OK { return Err(ret); }
                let ret = uart_driver_install(UART_PORT, RX_BUFFER, 0, 0, core::ptr::null_mut(), 0);
                if ret != ESP_OK { return Err(ret); }
            }
            info!("serial: console UART ready at {} baud", pins::UART_BAUD);
            Ok(Self)
        }

        /// Copy whatever is waiting into `buf`.  Returns the byte count.
        pub fn poll(&mut self, buf: &mut [u8]) -> usize {
            // SAFETY: driver installed in `install`; zero ticks = no wait.
            let n = unsafe {
                uart_read_bytes(UART_PORT, buf.as_mut_ptr().cast(), buf.len() as u32, 0)
            };
            n.max(0) as usize
        }
    }
}
