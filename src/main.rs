//! Airwarden: rogue WiFi network monitor firmware
//!
//! Runs the monitoring pipeline on the embassy executor and prints one NDJSON
//! record per observed network over serial. When the watchdog reports an
//! unresponsive task the chip is reset, so every generation starts cold.

#![no_std]
#![no_main]

use esp_backtrace as _;

esp_bootloader_esp_idf::esp_app_desc!();

use esp_hal::interrupt::software::SoftwareInterruptControl;
use esp_hal::peripherals::TIMG1;
use esp_hal::timer::timg::{MwdtStage, TimerGroup, Wdt};

use airwarden::board;
use airwarden::config::MonitorConfig;
use airwarden::defaults;
use airwarden::logger::LogSink;
use airwarden::monitor::Monitor;
use airwarden::protocol::VERSION;
use airwarden::scanner::DemoSensor;
use airwarden::watchdog::WatchdogTimer;

/// TIMG1 main watchdog. Fed by the watchdog task while every registered task
/// is healthy; resets the chip if the executor itself stops running.
struct HardwareWatchdog(Wdt<TIMG1<'static>>);

impl WatchdogTimer for HardwareWatchdog {
    fn feed(&mut self) {
        self.0.feed();
    }
}

#[esp_rtos::main]
async fn main(_spawner: embassy_executor::Spawner) {
    esp_println::logger::init_logger_from_env();

    let peripherals = esp_hal::init(esp_hal::Config::default());

    esp_alloc::heap_allocator!(size: 32 * 1024);

    // Start the RTOS (requires timer + software interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_int = SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_int.software_interrupt0);

    log::info!(
        "Airwarden v{} starting on {} ({})",
        VERSION,
        board::BOARD_NAME,
        board::CHIP
    );

    // Hold power on (M5StickC Plus2 needs GPIO4 HIGH to stay powered)
    #[cfg(feature = "m5stickc")]
    let _power_hold = esp_hal::gpio::Output::new(
        peripherals.GPIO4,
        esp_hal::gpio::Level::High,
        esp_hal::gpio::OutputConfig::default(),
    );

    let config = MonitorConfig::new();

    let monitor = match Monitor::new(config, DemoSensor::new(defaults::DEMO_SSIDS), LogSink) {
        Ok(monitor) => monitor,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            esp_hal::system::software_reset();
        }
    };

    // Backstop at twice the task deadline
    let timg1 = TimerGroup::new(peripherals.TIMG1);
    let mut wdt = timg1.wdt;
    wdt.set_timeout(
        MwdtStage::Stage0,
        esp_hal::time::Duration::from_millis(config.watchdog_timeout.as_millis() * 2),
    );
    wdt.enable();

    let mut monitor = monitor.with_timer(HardwareWatchdog(wdt));
    let restart = monitor.run_generation().await;

    log::error!(
        "{} task unresponsive for {} ms after {} records, resetting",
        restart.cause.task.as_str(),
        restart.cause.idle.as_millis(),
        restart.stats.emitted
    );
    esp_hal::system::software_reset();
}
