//! Smart Carpet - pressure-sensing floor mat firmware
//!
//! Main firmware binary for the RP2040 carpet controller. Four pressure
//! pads drive an RGB indicator and a buzzer, an indoor environment sensor
//! is published through the network bridge, and an OLED cycles through
//! indoor and remote readings while someone is nearby.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{Config as I2cConfig, I2c};
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::spi::{Config as SpiConfig, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use carpet_core::config::{parse_config, CarpetConfig};
use carpet_core::cycle::{ControlCycle, Sensors};
use carpet_core::gate::ActivityGate;
use carpet_core::pages::PageScheduler;
use carpet_core::render::RenderLoop;
use carpet_display::ScreenGeometry;
use carpet_drivers::display::{sh1106, Sh1106};
use carpet_drivers::indicator::GpioRgbLed;
use carpet_drivers::sensor::{Bme280, Mcp3008, MotionPin, ADDRESS_PRIMARY};

use crate::board::{BridgeTransport, PwmBuzzer};
use crate::channels::TELEMETRY;

/// Embedded configuration (compiled into firmware)
/// Edit carpet.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../carpet.toml");

/// MCP3008 is rated to 1.35 MHz at 3.3 V
const ADC_SPI_FREQUENCY: u32 = 1_000_000;

/// Fast-mode I2C for the OLED refresh
const PANEL_I2C_FREQUENCY: u32 = 400_000;

mod board;
mod channels;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Smart carpet firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();
    info!(
        "Config: {} ms cycle, {} ms display timeout, {} pages, threshold {}",
        config.tick_ms,
        config.display_timeout_ms,
        config.pages.len(),
        config.pressure_threshold
    );

    // Bridge link
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default());
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("UART initialized for bridge communication");

    // Pressure pads
    let mut spi_config = SpiConfig::default();
    spi_config.frequency = ADC_SPI_FREQUENCY;
    let spi = Spi::new_blocking(p.SPI0, p.PIN_18, p.PIN_19, p.PIN_16, spi_config);
    let pads = Mcp3008::new(spi, Output::new(p.PIN_17, Level::High));

    // Indoor environment
    let env_i2c = I2c::new_blocking(p.I2C1, p.PIN_3, p.PIN_2, I2cConfig::default());
    let mut environment = Bme280::new(env_i2c, ADDRESS_PRIMARY);
    if let Err(e) = environment.init() {
        // Retried on every read
        warn!("BME280 not ready: {:?}", e);
    }

    // Display
    let mut panel_config = I2cConfig::default();
    panel_config.frequency = PANEL_I2C_FREQUENCY;
    let panel_i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, panel_config);
    let mut panel = Sh1106::new(panel_i2c, sh1106::ADDRESS);
    if let Err(e) = panel.init() {
        warn!("SH1106 not ready: {:?}", e);
    }

    let motion = MotionPin::active_high(Input::new(p.PIN_22, Pull::Down));

    let led = GpioRgbLed::common_cathode(
        Output::new(p.PIN_13, Level::Low),
        Output::new(p.PIN_14, Level::Low),
        Output::new(p.PIN_15, Level::Low),
    );

    let buzzer = PwmBuzzer::new(Pwm::new_output_a(
        p.PWM_SLICE2,
        p.PIN_20,
        PwmConfig::default(),
    ));
    info!("Sensors and outputs initialized");

    let render = RenderLoop::new(
        panel,
        ScreenGeometry::default(),
        ActivityGate::new(u64::from(config.display_timeout_ms), config.motion_trigger),
        PageScheduler::new(&config.pages, u64::from(config.page_dwell_ms)),
    )
    .with_scroll_step(config.scroll_step_px);

    let cycle = ControlCycle::new(
        Sensors {
            pressure: pads,
            environment,
            motion,
        },
        led,
        render,
        BridgeTransport,
        &TELEMETRY,
        config.pressure_threshold,
    );
    let timing = tasks::ControlTiming {
        tick_ms: config.tick_ms,
        scroll_frame_ms: config.scroll_frame_ms,
    };

    spawner.spawn(tasks::bridge_rx_task(rx)).unwrap();
    spawner.spawn(tasks::bridge_tx_task(tx)).unwrap();
    spawner.spawn(tasks::buzzer_task(buzzer)).unwrap();
    spawner.spawn(tasks::control_task(cycle, timing)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Parse the embedded carpet.toml, falling back to built-in defaults
///
/// build.rs rejects a broken file, so the fallback only guards against
/// the on-target parser disagreeing with the build-time check.
fn load_config() -> CarpetConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using built-in defaults");
            CarpetConfig::default()
        }
    }
}
