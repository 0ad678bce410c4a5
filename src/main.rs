//! People-counter firmware: main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter      LcdPresenter   NvsAdapter   Monotonic    │
//! │  (Distance + Relay)   LogEventSink   (Config +    Clock        │
//! │                       (EventSink)     Count)      (ClockPort)  │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  FlagTimeoutSupervisor · DirectionDetector · Counter   │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::gpio::{AnyIOPin, PinDriver, Pull};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use log::{info, warn};

use peoplecounter::adapters::hardware::HardwareAdapter;
use peoplecounter::adapters::lcd_presenter::LcdPresenter;
use peoplecounter::adapters::log_sink::LogEventSink;
use peoplecounter::adapters::nvs::NvsAdapter;
use peoplecounter::adapters::time::MonotonicClock;
use peoplecounter::app::ports::{ClockPort, ConfigError, ConfigPort};
use peoplecounter::app::service::AppService;
use peoplecounter::config::SystemConfig;
use peoplecounter::drivers::button::ResetButton;
use peoplecounter::drivers::hcsr04::HcSr04;
use peoplecounter::drivers::lcd1602::Lcd1602;
use peoplecounter::drivers::relay::Relay;
use peoplecounter::error::Error;
use peoplecounter::pins;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  PeopleCounter v{}                ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Load config from NVS (or defaults) ─────────────────
    let mut nvs = match NvsAdapter::new() {
        Ok(n) => n,
        Err(e) => {
            warn!("NVS init failed ({}), running with defaults and no persistence", e);
            NvsAdapter::default()
        }
    };
    let config = match nvs.load().and_then(|cfg| cfg.validate().map(|()| cfg)) {
        Ok(cfg) => cfg,
        Err(ConfigError::ValidationFailed(why)) => {
            warn!("{}, using defaults", Error::Config(why));
            SystemConfig::default()
        }
        Err(e) => {
            warn!("NVS config load failed ({}), using defaults", e);
            SystemConfig::default()
        }
    };
    info!(
        "config: threshold={}cm capacity={} timeout={}ms policy={:?} entry_first={:?}",
        config.detect_distance_threshold_cm,
        config.room_capacity,
        config.flag_timeout_ms,
        config.reset_policy,
        config.entry_sensor
    );

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let clock = MonotonicClock::new();

    // SAFETY: every GPIO number in `pins` is distinct and claimed exactly
    // once, here, before anything else touches the GPIO matrix.
    let (in_trig, in_echo, out_trig, out_echo, relay_pin, button_pin, sda, scl) = unsafe {
        (
            AnyIOPin::new(pins::INBOUND_TRIG_GPIO),
            AnyIOPin::new(pins::INBOUND_ECHO_GPIO),
            AnyIOPin::new(pins::OUTBOUND_TRIG_GPIO),
            AnyIOPin::new(pins::OUTBOUND_ECHO_GPIO),
            AnyIOPin::new(pins::RELAY_GPIO),
            AnyIOPin::new(pins::RESET_BUTTON_GPIO),
            AnyIOPin::new(pins::I2C_SDA_GPIO),
            AnyIOPin::new(pins::I2C_SCL_GPIO),
        )
    };

    let inbound = HcSr04::new(
        PinDriver::output(in_trig)?,
        PinDriver::input(in_echo)?,
        Ets,
        clock,
        config.echo_timeout_us,
    )
    .with_settle_ms(config.sensor_settle_ms);
    let outbound = HcSr04::new(
        PinDriver::output(out_trig)?,
        PinDriver::input(out_echo)?,
        Ets,
        clock,
        config.echo_timeout_us,
    )
    .with_settle_ms(config.sensor_settle_ms);
    let relay =
        Relay::new(PinDriver::output(relay_pin)?, config.relay_active_low).map_err(Error::from)?;
    let mut hw = HardwareAdapter::new(inbound, outbound, relay);

    let i2c = I2cDriver::new(
        peripherals.i2c0,
        sda,
        scl,
        &I2cConfig::new().baudrate(Hertz(pins::I2C_FREQ_HZ)),
    )?;
    let mut presenter = LcdPresenter::new(
        Lcd1602::new(i2c, Ets, pins::LCD_I2C_ADDR),
        config.display_mode,
        config.message_hold_ms,
    );
    presenter.reinit();

    let mut button_driver = PinDriver::input(button_pin)?;
    button_driver.set_pull(Pull::Up)?;
    let mut button = ResetButton::new(button_driver);

    // ── 4. Application service ────────────────────────────────
    let poll_interval_ms = config.poll_interval_ms;
    let mut sink = (LogEventSink::new(), presenter);
    let mut app = AppService::new(config);
    app.start(&mut nvs, &mut hw, &clock, &mut sink);

    info!("System ready. Entering polling loop.");

    // ── 5. Polling loop ───────────────────────────────────────
    loop {
        if button.poll(clock.now_ms()) {
            info!("reset button: reinitialising display");
            sink.1.reinit();
        }

        app.tick(&mut hw, &clock, &mut nvs, &mut sink);

        FreeRtos::delay_ms(poll_interval_ms);
    }
}
