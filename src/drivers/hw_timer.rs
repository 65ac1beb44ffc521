//! Hardware tick timer using ESP-IDF's esp_timer API.
//!
//! One periodic timer feeds [`CaptureFlags::on_tick`](crate::events::CaptureFlags::on_tick).
//! Timer callbacks execute in the ESP timer task context (not ISR), and
//! only touch the capture atomics.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;
#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::events::CaptureFlags;

#[cfg(target_os = "espidf")]
static mut TICK_TIMER: esp_timer_handle_t = core::ptr::null_mut();

/// SAFETY: TICK_TIMER is written once in `start_tick_timer()` before any
/// timer callbacks fire.  Only called from the single main task.
#[cfg(target_os = "espidf")]
unsafe fn tick_timer() -> esp_timer_handle_t { unsafe { TICK_TIMER } }

#[cfg(target_os = "espidf")]
unsafe extern "C" fn tick_cb(arg: *mut core::ffi::c_void) {
    // SAFETY: arg is the &'static CaptureFlags registered below.
    let capture = unsafe { &*(arg as *const CaptureFlags) };
    capture.on_tick();
}

/// Start the periodic tick timer.
#[cfg(target_os = "espidf")]
pub fn start_tick_timer(capture: &'static CaptureFlags, period_ms: u32) {
    // SAFETY: TICK_TIMER is written here once at boot from the single
    // main-task context before any callback fires.  The callback only
    // touches atomics.
    unsafe {
        let args = esp_timer_create_args_t {
            callback: Some(tick_cb),
            arg: capture as *const CaptureFlags as *mut core::ffi::c_void,
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: b"tick\0".as_ptr() as *const _,
            skip_unhandled_events: true,
        };
        let ret = esp_timer_create(&args, &raw mut TICK_TIMER);
        if ret != ESP_OK {
            log::error!("hw_timer: tick timer create failed (rc={}), continuing without ticks", ret);
            return;
        }
        let ret = esp_timer_start_periodic(tick_timer(), u64::from(period_ms) * 1_000);
        if ret != ESP_OK {
            log::error!("hw_timer: tick timer start failed (rc={})", ret);
            return;
        }

        info!("hw_timer: tick every {} ms", period_ms);
    }
}
