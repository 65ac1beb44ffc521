//! HomeWatch firmware: main Entry Point
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  HardwareAdapter     LogEventSink   UartConsole  MillisClock │
//! │  (Sensor+Actuator)   (EventSink)    (commands)   (time)      │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ───────────────────     │
//! │                                                              │
//! │  ┌──────────────────────────────────────────────────────┐    │
//! │  │             AppService (pure logic)                  │    │
//! │  │  commit · evaluate · arbitrate · alarm timer         │    │
//! │  └──────────────────────────────────────────────────────┘    │
//! │                         ▲                                    │
//! │              CAPTURE (static, atomics)                       │
//! │                ▲                  ▲                          │
//! │         GPIO pin-group ISR    1 Hz esp_timer                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Context, Result};
use esp_idf_hal::delay::FreeRtos;
use log::{info, warn};

use homewatch::adapters::hardware::{HardwareAdapter, IndicatorPins, SensorPins};
use homewatch::adapters::log_sink::LogEventSink;
use homewatch::adapters::serial::{LineBuffer, UartConsole};
use homewatch::adapters::time::MillisClock;
use homewatch::app::events::AppEvent;
use homewatch::app::ports::EventSink;
use homewatch::app::service::AppService;
use homewatch::config::SystemConfig;
use homewatch::drivers::hw_init::{self, AdcChannel, RawInput, RawOutput};
use homewatch::drivers::hw_timer;
use homewatch::events::CaptureFlags;
use homewatch::pins;

/// Flags shared with the GPIO ISR and the tick timer.
static CAPTURE: CaptureFlags = CaptureFlags::new();

/// Main-loop pacing.  Well under the debounce delay.
const LOOP_PERIOD_MS: u32 = 10;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  HomeWatch v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals().map_err(|e| anyhow::anyhow!("{e}")).context("HAL init")?;

    let config = SystemConfig::default();
    config.validate().map_err(|e| anyhow::anyhow!("{e}")).context("default config")?;

    let mut hw = HardwareAdapter::new(
        SensorPins {
            motion: RawInput::new(pins::MOTION_GPIO),
            gas_digital: RawInput::new(pins::GAS_DIGITAL_GPIO),
            temperature_adc: AdcChannel::new(pins::TEMP_ADC_CHANNEL),
            gas_adc: AdcChannel::new(pins::GAS_ADC_CHANNEL),
        },
        IndicatorPins {
            status_led: RawOutput::new(pins::STATUS_LED_GPIO),
            alarm_led: RawOutput::new(pins::ALARM_LED_GPIO),
            buzzer: RawOutput::new(pins::BUZZER_GPIO),
        },
    );
    hw.all_off();

    let mut console = match UartConsole::install() {
        Ok(c) => Some(c),
        Err(rc) => {
            warn!("UART console install failed (rc={}), commands disabled", rc);
            None
        }
    };

    // ── 3. App service ────────────────────────────────────────
    let clock = MillisClock::new();
    let mut sink = LogEventSink::new();
    let mut app = AppService::new(config.clone(), &CAPTURE);
    app.start(clock.now_ms(), &mut hw, &mut sink);

    // Interrupt sources come up only after the committed levels exist.
    if let Err(e) = hw_init::init_isr_service(&CAPTURE) {
        log::error!("ISR service init failed: {}, continuing without pin events", e);
    }
    hw_timer::start_tick_timer(&CAPTURE, config.tick_period_ms);

    info!("System ready. Send ARM / DISARM / STATUS over serial.");

    // ── 4. Control loop ───────────────────────────────────────
    let mut line = LineBuffer::new();
    let mut rx = [0u8; 64];
    loop {
        let now = clock.now_ms();

        if let Some(uart) = console.as_mut() {
            let n = uart.poll(&mut rx);
            for &byte in &rx[..n] {
                match line.push(byte) {
                    Some(Ok(text)) => {
                        // Rejections are already reported through the sink.
                        let _ = app.handle_line(&text, now, &mut hw, &mut sink);
                    }
                    Some(Err(e)) => sink.emit(&AppEvent::CommandRejected(e)),
                    None => {}
                }
            }
        }

        app.run_cycle(now, &mut hw, &mut sink);
        FreeRtos::delay_ms(LOOP_PERIOD_MS);
    }
}
