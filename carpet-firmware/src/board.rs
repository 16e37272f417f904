//! Board glue for the RP2040 carpet controller
//!
//! Pin map:
//!
//! | Function             | Peripheral   | Pins                          |
//! |----------------------|--------------|-------------------------------|
//! | MCP3008 pressure ADC | SPI0         | SCK 18, MOSI 19, MISO 16, CS 17 |
//! | BME280               | I2C1         | SDA 2, SCL 3                  |
//! | SH1106 OLED          | I2C0         | SDA 4, SCL 5                  |
//! | Motion detector      | GPIO         | 22                            |
//! | RGB indicator        | GPIO         | R 13, G 14, B 15              |
//! | Buzzer               | PWM slice 2A | 20                            |
//! | Network bridge       | UART0        | TX 0, RX 1                    |

use embassy_rp::gpio::{Input, Output};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{I2C0, I2C1, SPI0};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::spi::{self, Spi};
use heapless::Vec;
use portable_atomic::Ordering;

use carpet_core::cycle::ControlCycle;
use carpet_core::traits::{ActuatorError, BuzzerOutput, Transport, TransportError};
use carpet_drivers::display::Sh1106;
use carpet_drivers::indicator::GpioRgbLed;
use carpet_drivers::sensor::{Bme280, Mcp3008, MotionPin};
use carpet_protocol::OutboundTopic;

use crate::channels::{PublishRequest, BRIDGE_ONLINE, PUBLISH_CHANNEL};

pub type PadAdc = Mcp3008<Spi<'static, SPI0, spi::Blocking>, Output<'static>>;
pub type EnvSensor = Bme280<I2c<'static, I2C1, i2c::Blocking>>;
pub type MotionDetector = MotionPin<Input<'static>>;
pub type StatusLed = GpioRgbLed<Output<'static>, Output<'static>, Output<'static>>;
pub type Panel = Sh1106<I2c<'static, I2C0, i2c::Blocking>>;

/// The control cycle as wired on this board
pub type CarpetCycle = ControlCycle<
    'static,
    PadAdc,
    EnvSensor,
    MotionDetector,
    StatusLed,
    Panel,
    BridgeTransport,
>;

/// Hands publishes to the bridge TX task
///
/// The bridge owns the broker session; this side only queues.
pub struct BridgeTransport;

impl Transport for BridgeTransport {
    fn publish(&mut self, topic: OutboundTopic, payload: &[u8]) -> Result<(), TransportError> {
        if !self.is_connected() {
            return Err(TransportError::Offline);
        }
        let payload = Vec::from_slice(payload).map_err(|_| TransportError::PayloadTooLarge)?;
        PUBLISH_CHANNEL
            .try_send(PublishRequest { topic, payload })
            .map_err(|_| TransportError::QueueFull)
    }

    fn is_connected(&self) -> bool {
        BRIDGE_ONLINE.load(Ordering::Relaxed)
    }
}

/// Integer PWM clock divider
const BUZZER_DIVIDER: u32 = 16;

/// Passive buzzer on one PWM channel A, square wave at 50% duty
pub struct PwmBuzzer {
    pwm: Pwm<'static>,
    config: PwmConfig,
}

impl PwmBuzzer {
    pub fn new(mut pwm: Pwm<'static>) -> Self {
        let mut config = PwmConfig::default();
        config.divider = (BUZZER_DIVIDER as u8).into();
        config.compare_a = 0;
        pwm.set_config(&config);
        Self { pwm, config }
    }
}

impl BuzzerOutput for PwmBuzzer {
    fn tone_on(&mut self, frequency_hz: u16) -> Result<(), ActuatorError> {
        if frequency_hz == 0 {
            return Err(ActuatorError::UnsupportedFrequency);
        }
        let counts = embassy_rp::clocks::clk_sys_freq() / (BUZZER_DIVIDER * u32::from(frequency_hz));
        let top = counts
            .checked_sub(1)
            .and_then(|top| u16::try_from(top).ok())
            .ok_or(ActuatorError::UnsupportedFrequency)?;

        self.config.top = top;
        self.config.compare_a = top / 2;
        self.pwm.set_config(&self.config);
        Ok(())
    }

    fn tone_off(&mut self) -> Result<(), ActuatorError> {
        self.config.compare_a = 0;
        self.pwm.set_config(&self.config);
        Ok(())
    }
}
