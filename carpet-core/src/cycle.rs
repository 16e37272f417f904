//! One control cycle: sense, actuate, publish, render
//!
//! The cycle owns every device handle it touches. Sensor failures degrade
//! to the last good value and are reported in the [`CycleReport`] instead
//! of stopping the cycle.

use carpet_protocol::payload::{STATUS_BOOT, STATUS_ONLINE};
use carpet_protocol::OutboundTopic;

use crate::actuation::{evaluate, ActuationVector, PAD_COUNT};
use crate::environment::EnvironmentReading;
use crate::pages::PageContext;
use crate::render::{RenderLoop, RenderOutcome};
use crate::telemetry::TelemetryStore;
use crate::traits::{
    ActuatorError, EnvironmentSensor, LedOutput, MotionInput, PressureBus, SensorError,
    TextDisplay, Transport, TransportError,
};

/// Input devices read every cycle
pub struct Sensors<P, E, M> {
    pub pressure: P,
    pub environment: E,
    pub motion: M,
}

/// Collaborator failures seen during one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleFaults {
    pub pressure: Option<SensorError>,
    pub environment: Option<SensorError>,
    pub led: Option<ActuatorError>,
    pub publish: Option<TransportError>,
}

impl CycleFaults {
    pub fn any(&self) -> bool {
        self.pressure.is_some()
            || self.environment.is_some()
            || self.led.is_some()
            || self.publish.is_some()
    }
}

/// Everything one cycle observed and did
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub pads: [u16; PAD_COUNT],
    pub actuation: ActuationVector,
    pub environment: Option<EnvironmentReading>,
    pub motion: bool,
    /// Readings were published this cycle
    pub published: bool,
    pub render: RenderOutcome,
    pub faults: CycleFaults,
}

pub struct ControlCycle<'a, P, E, M, L, D, T> {
    sensors: Sensors<P, E, M>,
    led: L,
    render: RenderLoop<D>,
    transport: T,
    store: &'a TelemetryStore,
    threshold: u16,
    last_pads: [u16; PAD_COUNT],
    last_environment: Option<EnvironmentReading>,
    announced: bool,
}

impl<'a, P, E, M, L, D, T> ControlCycle<'a, P, E, M, L, D, T>
where
    P: PressureBus,
    E: EnvironmentSensor,
    M: MotionInput,
    L: LedOutput,
    D: TextDisplay,
    T: Transport,
{
    pub fn new(
        sensors: Sensors<P, E, M>,
        led: L,
        render: RenderLoop<D>,
        transport: T,
        store: &'a TelemetryStore,
        threshold: u16,
    ) -> Self {
        Self {
            sensors,
            led,
            render,
            transport,
            store,
            threshold,
            last_pads: [0; PAD_COUNT],
            last_environment: None,
            announced: false,
        }
    }

    /// Run one cycle at `now_ms`
    pub fn tick(&mut self, now_ms: u64) -> CycleReport {
        let mut faults = CycleFaults::default();

        match self.sensors.pressure.read_pads() {
            Ok(pads) => self.last_pads = pads,
            Err(e) => faults.pressure = Some(e),
        }
        let actuation = evaluate(self.last_pads, self.threshold);
        if let Err(e) = self.led.set(actuation.color()) {
            faults.led = Some(e);
        }

        match self.sensors.environment.read() {
            Ok(reading) => self.last_environment = Some(reading),
            Err(e) => faults.environment = Some(e),
        }

        let published = match self.publish() {
            Ok(published) => published,
            Err(e) => {
                faults.publish = Some(e);
                false
            }
        };

        let motion = self.sensors.motion.is_asserted();
        let ctx = PageContext {
            environment: self.last_environment.as_ref(),
            telemetry: self.store,
        };
        let render = self.render.tick(now_ms, motion, &ctx);

        CycleReport {
            pads: self.last_pads,
            actuation,
            environment: self.last_environment,
            motion,
            published,
            render,
            faults,
        }
    }

    /// Publish the indoor readings and the liveness marker
    ///
    /// The boot announcement goes out once per broker session.
    fn publish(&mut self) -> Result<bool, TransportError> {
        if !self.transport.is_connected() {
            self.announced = false;
            return Ok(false);
        }
        if !self.announced {
            self.transport
                .publish(OutboundTopic::Status, STATUS_BOOT.as_bytes())?;
            self.announced = true;
        }
        if let Some(env) = self.last_environment {
            self.transport
                .publish(OutboundTopic::Temperature, env.temperature().as_bytes())?;
            self.transport
                .publish(OutboundTopic::Humidity, env.humidity().as_bytes())?;
            self.transport
                .publish(OutboundTopic::Pressure, env.pressure().as_bytes())?;
        }
        self.transport
            .publish(OutboundTopic::Status, STATUS_ONLINE.as_bytes())?;
        Ok(true)
    }

    pub fn render_mut(&mut self) -> &mut RenderLoop<D> {
        &mut self.render
    }

    pub fn last_environment(&self) -> Option<&EnvironmentReading> {
        self.last_environment.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::{ActivityGate, MotionTrigger};
    use crate::pages::{PageId, PageScheduler};
    use crate::render::tests::{Call, RecordingDisplay};
    use crate::traits::Rgb;
    use carpet_display::ScreenGeometry;
    use std::collections::VecDeque;
    use std::vec::Vec;

    struct ScriptedPads(VecDeque<Result<[u16; 4], SensorError>>);

    impl PressureBus for ScriptedPads {
        fn read_channel(&mut self, _channel: u8) -> Result<u16, SensorError> {
            unreachable!()
        }

        fn read_pads(&mut self) -> Result<[u16; 4], SensorError> {
            self.0.pop_front().unwrap_or(Ok([0; 4]))
        }
    }

    struct ScriptedEnv(VecDeque<Result<EnvironmentReading, SensorError>>);

    impl EnvironmentSensor for ScriptedEnv {
        fn read(&mut self) -> Result<EnvironmentReading, SensorError> {
            self.0.pop_front().unwrap_or(Err(SensorError::Bus))
        }
    }

    struct Pir(bool);

    impl MotionInput for Pir {
        fn is_asserted(&mut self) -> bool {
            self.0
        }
    }

    #[derive(Default)]
    struct Led(Vec<Rgb>);

    impl LedOutput for Led {
        fn set(&mut self, color: Rgb) -> Result<(), ActuatorError> {
            self.0.push(color);
            Ok(())
        }
    }

    #[derive(Default)]
    struct Broker {
        online: bool,
        sent: Vec<(OutboundTopic, std::string::String)>,
    }

    impl Transport for Broker {
        fn publish(&mut self, topic: OutboundTopic, payload: &[u8]) -> Result<(), TransportError> {
            if !self.online {
                return Err(TransportError::Offline);
            }
            let text = core::str::from_utf8(payload).unwrap().into();
            self.sent.push((topic, text));
            Ok(())
        }

        fn is_connected(&self) -> bool {
            self.online
        }
    }

    const READING: EnvironmentReading = EnvironmentReading {
        temperature_centi_c: 2345,
        humidity_centi_pct: 4567,
        pressure_pa: 101_325,
    };

    type Cycle<'a> = ControlCycle<'a, ScriptedPads, ScriptedEnv, Pir, Led, RecordingDisplay, Broker>;

    fn cycle<'a>(
        store: &'a TelemetryStore,
        pads: Vec<Result<[u16; 4], SensorError>>,
        env: Vec<Result<EnvironmentReading, SensorError>>,
        online: bool,
    ) -> Cycle<'a> {
        let render = RenderLoop::new(
            RecordingDisplay::default(),
            ScreenGeometry::default(),
            ActivityGate::new(10_000, MotionTrigger::RisingEdge),
            PageScheduler::new(&PageId::ALL, 5_000),
        );
        ControlCycle::new(
            Sensors {
                pressure: ScriptedPads(pads.into()),
                environment: ScriptedEnv(env.into()),
                motion: Pir(false),
            },
            Led::default(),
            render,
            Broker {
                online,
                ..Default::default()
            },
            store,
            900,
        )
    }

    #[test]
    fn test_led_follows_pads() {
        let store = TelemetryStore::new();
        let mut c = cycle(&store, vec![Ok([1000, 0, 0, 0]), Ok([0, 0, 0, 950])], vec![], false);

        let report = c.tick(0);
        assert_eq!(report.actuation.color(), Rgb::new(255, 0, 0));
        assert_eq!(report.actuation.alerts.len(), 1);
        c.tick(1_000);
        assert_eq!(c.led.0, vec![Rgb::new(255, 0, 0), Rgb::new(255, 255, 0)]);
    }

    #[test]
    fn test_pad_failure_keeps_last_values() {
        let store = TelemetryStore::new();
        let mut c = cycle(&store, vec![Ok([0, 0, 1000, 0]), Err(SensorError::Bus)], vec![], false);
        c.tick(0);
        let report = c.tick(1_000);
        assert_eq!(report.faults.pressure, Some(SensorError::Bus));
        assert_eq!(report.pads, [0, 0, 1000, 0]);
        assert!(report.actuation.blue);
    }

    #[test]
    fn test_environment_falls_back_to_cache() {
        let store = TelemetryStore::new();
        let mut c = cycle(&store, vec![], vec![Ok(READING), Err(SensorError::Bus)], false);
        c.tick(0);
        let report = c.tick(1_000);
        assert_eq!(report.environment, Some(READING));
        assert_eq!(report.faults.environment, Some(SensorError::Bus));
        assert!(report.faults.any());
    }

    #[test]
    fn test_publishes_readings_without_units() {
        let store = TelemetryStore::new();
        let mut c = cycle(&store, vec![], vec![Ok(READING), Ok(READING)], true);
        assert!(c.tick(0).published);
        c.tick(1_000);

        let sent: Vec<(OutboundTopic, &str)> =
            c.transport.sent.iter().map(|(t, p)| (*t, p.as_str())).collect();
        assert_eq!(
            sent,
            vec![
                (OutboundTopic::Status, "Smart Carpet Online"),
                (OutboundTopic::Temperature, "23.45"),
                (OutboundTopic::Humidity, "45.67"),
                (OutboundTopic::Pressure, "1013.25"),
                (OutboundTopic::Status, "Online"),
                (OutboundTopic::Temperature, "23.45"),
                (OutboundTopic::Humidity, "45.67"),
                (OutboundTopic::Pressure, "1013.25"),
                (OutboundTopic::Status, "Online"),
            ]
        );
    }

    #[test]
    fn test_boot_announcement_once_per_session() {
        let store = TelemetryStore::new();
        let mut c = cycle(&store, vec![], vec![], true);
        c.tick(0);
        c.transport.online = false;
        assert!(!c.tick(1_000).published);
        c.transport.online = true;
        c.tick(2_000);

        let announcements = c
            .transport
            .sent
            .iter()
            .filter(|(_, p)| p == "Smart Carpet Online")
            .count();
        assert_eq!(announcements, 2);
    }

    #[test]
    fn test_motion_lights_display_with_cached_reading() {
        let store = TelemetryStore::new();
        let mut c = cycle(&store, vec![], vec![Ok(READING)], false);
        c.sensors.motion.0 = true;

        let report = c.tick(0);
        assert!(report.motion);
        assert_eq!(report.render, RenderOutcome::Drawn(PageId::InsideTemperature));
        assert!(c
            .render_mut()
            .display_mut()
            .calls
            .contains(&Call::Text("23.45C".into(), 40, 20)));
    }
}
