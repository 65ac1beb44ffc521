//! One-shot hardware peripheral initialization and raw pin handles.
//!
//! Configures ADC channels, GPIO directions and the pin-group interrupt
//! using raw ESP-IDF sys calls. Called once from `main()` before the
//! control loop starts.  The handles at the bottom wrap the configured
//! pins in the `embedded-hal` traits the hardware adapter is generic over.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;
#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::events::CaptureFlags;
#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error types ───────────────────────────────────────────────

/// Errors from peripheral setup and raw reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwError {
    AdcInitFailed(i32),
    AdcReadFailed(i32),
    GpioConfigFailed(i32),
    IsrInstallFailed(i32),
}

impl core::fmt::Display for HwError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc)    => write!(f, "ADC1 init failed (rc={})", rc),
            Self::AdcReadFailed(rc)    => write!(f, "ADC1 read failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
        }
    }
}

/// A GPIO level write was refused by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioError(pub i32);

impl embedded_hal::digital::Error for GpioError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

// ── Bring-up ──────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwError> {
    // SAFETY: Called once from main() before the loop; single-threaded.
    unsafe {
        init_adc()?;
        init_gpio_inputs()?;
        init_gpio_outputs()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC read path.  No concurrent access is possible because
/// `init_adc()` completes before the loop starts.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 { return Err(HwError::AdcInitFailed(ret)); }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    for channel in [pins::TEMP_ADC_CHANNEL, pins::GAS_ADC_CHANNEL] {
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
        if ret != ESP_OK as i32 { return Err(HwError::AdcInitFailed(ret)); }
    }

    info!(
        "hw_init: ADC1 configured (CH{}=temp, CH{}=gas)",
        pins::TEMP_ADC_CHANNEL,
        pins::GAS_ADC_CHANNEL
    );
    Ok(())
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwError> {
    // Both lines share one pin-group handler, any edge.
    let cfg = gpio_config_t {
        pin_bit_mask: (1u64 << pins::MOTION_GPIO) | (1u64 << pins::GAS_DIGITAL_GPIO),
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_ANYEDGE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 { return Err(HwError::GpioConfigFailed(ret)); }

    info!("hw_init: GPIO inputs configured (motion={}, gas={})", pins::MOTION_GPIO, pins::GAS_DIGITAL_GPIO);
    Ok(())
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwError> {
    let output_pins = [
        pins::STATUS_LED_GPIO,
        pins::ALARM_LED_GPIO,
        pins::BUZZER_GPIO,
    ];

    for &pin in &output_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 { return Err(HwError::GpioConfigFailed(ret)); }
        unsafe { gpio_set_level(pin, 0) };
    }

    info!("hw_init: GPIO outputs configured");
    Ok(())
}

// ── GPIO ISR Service ──────────────────────────────────────────

/// Pin-group edge handler.  `arg` is the `&'static CaptureFlags` passed to
/// [`init_isr_service`].
#[cfg(target_os = "espidf")]
unsafe extern "C" fn pin_group_isr(arg: *mut core::ffi::c_void) {
    // SAFETY: arg was produced from a &'static CaptureFlags in
    // init_isr_service(); CaptureFlags is Sync (atomics only).
    let capture = unsafe { &*(arg as *const CaptureFlags) };
    // SAFETY: gpio_get_level is a register read; safe in ISR context.
    let motion = unsafe { gpio_get_level(pins::MOTION_GPIO) } != 0;
    let gas = unsafe { gpio_get_level(pins::GAS_DIGITAL_GPIO) } != 0;
    capture.on_pin_edge(motion, gas);
}

/// Install the per-pin GPIO ISR service and register the pin-group handler.
/// Call after init_peripherals() and after the service has published its
/// seeded levels.
#[cfg(target_os = "espidf")]
pub fn init_isr_service(capture: &'static CaptureFlags) -> Result<(), HwError> {
    let arg = capture as *const CaptureFlags as *mut core::ffi::c_void;
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed (acceptable). The handler only touches
    // the atomics behind `arg`, which outlives every interrupt.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
            return Err(HwError::IsrInstallFailed(ret));
        }

        for pin in [pins::MOTION_GPIO, pins::GAS_DIGITAL_GPIO] {
            gpio_set_intr_type(pin, gpio_int_type_t_GPIO_INTR_ANYEDGE);
            gpio_isr_handler_add(pin, Some(pin_group_isr), arg);
            gpio_intr_enable(pin);
        }

        info!("hw_init: ISR service installed (motion, gas)");
    }
    Ok(())
}

// ── Raw pin handles ───────────────────────────────────────────

/// Configured input pin, read through `gpio_get_level`.
#[cfg(target_os = "espidf")]
pub struct RawInput(i32);

#[cfg(target_os = "espidf")]
impl RawInput {
    pub fn new(gpio: i32) -> Self {
        Self(gpio)
    }
}

#[cfg(target_os = "espidf")]
impl embedded_hal::digital::ErrorType for RawInput {
    type Error = core::convert::Infallible;
}

#[cfg(target_os = "espidf")]
impl embedded_hal::digital::InputPin for RawInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        // SAFETY: read-only register access on a configured input pin.
        Ok((unsafe { gpio_get_level(self.0) }) != 0)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|h| !h)
    }
}

/// Configured output pin, driven through `gpio_set_level`.
#[cfg(target_os = "espidf")]
pub struct RawOutput(i32);

#[cfg(target_os = "espidf")]
impl RawOutput {
    pub fn new(gpio: i32) -> Self {
        Self(gpio)
    }

    fn write(&mut self, level: u32) -> Result<(), GpioError> {
        // SAFETY: pin was configured in init_gpio_outputs(); main-loop only.
        let ret = unsafe { gpio_set_level(self.0, level) };
        if ret == ESP_OK { Ok(()) } else { Err(GpioError(ret)) }
    }
}

#[cfg(target_os = "espidf")]
impl embedded_hal::digital::ErrorType for RawOutput {
    type Error = GpioError;
}

#[cfg(target_os = "espidf")]
impl embedded_hal::digital::OutputPin for RawOutput {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(0)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(1)
    }
}

/// One ADC1 oneshot channel.
#[cfg(target_os = "espidf")]
pub struct AdcChannel(u32);

#[cfg(target_os = "espidf")]
impl AdcChannel {
    pub fn new(channel: u32) -> Self {
        Self(channel)
    }
}

#[cfg(target_os = "espidf")]
impl super::AnalogInput for AdcChannel {
    type Error = HwError;

    fn read_raw(&mut self) -> Result<u16, HwError> {
        let mut raw: i32 = 0;
        // SAFETY: adc1_handle() contract: single-threaded main-loop access only.
        let ret = unsafe { adc_oneshot_read(adc1_handle(), self.0, &mut raw) };
        if ret != ESP_OK as i32 {
            return Err(HwError::AdcReadFailed(ret));
        }
        Ok(raw.max(0) as u16)
    }
}
