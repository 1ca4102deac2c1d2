//! Sensor acquisition loop
//!
//! Carries out the I/O for [`AcquisitionMachine`]: initialization, the
//! hardware reset sequence, frame-ready waits and segment transfers,
//! and the pauses the machine asks for. Completed frames are published
//! to the render loop; fault changes go to the control loop.

use embedded_hal_async::delay::DelayNs;

use thermavid_core::acquisition::{AcqState, AcquisitionMachine, FaultUpdate, Step};
use thermavid_core::config::AcquisitionConfig;
use thermavid_core::control::Notification;
use thermavid_core::frame::{FrameProducer, Publish};
use thermavid_core::traits::{SensorError, SensorInfo, SensorLink};

use crate::channels::Channels;

/// Acquisition loop state and collaborators
pub struct AcquisitionTask<S: SensorLink, D: DelayNs> {
    sensor: S,
    delay: D,
    machine: AcquisitionMachine,
    producer: FrameProducer,
    channels: &'static Channels,
    info: SensorInfo,
    /// Emissivity to apply after every (re)initialization
    emissivity: u8,
}

impl<S: SensorLink, D: DelayNs> AcquisitionTask<S, D> {
    /// `emissivity` is the persisted value in percent
    pub fn new(
        sensor: S,
        delay: D,
        producer: FrameProducer,
        channels: &'static Channels,
        config: AcquisitionConfig,
        emissivity: u8,
    ) -> Self {
        Self {
            sensor,
            delay,
            machine: AcquisitionMachine::new(config),
            producer,
            channels,
            info: SensorInfo::default(),
            emissivity,
        }
    }

    pub fn state(&self) -> AcqState {
        self.machine.state()
    }

    pub fn machine(&self) -> &AcquisitionMachine {
        &self.machine
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    /// Run one action of the current state, then its pause
    pub async fn step(&mut self) {
        let step = match self.machine.state() {
            AcqState::Init => self.initialize().await,
            AcqState::ReInit => {
                self.reset().await;
                self.initialize().await
            }
            AcqState::Run => self.acquire().await,
            AcqState::Error => self.machine.cooldown_tick(),
        };
        self.finish(step).await;
    }

    /// Acquisition loop; waits the power-on settle time first
    pub async fn run(mut self) -> ! {
        info!("Acquisition task started");
        self.delay.delay_ms(self.machine.config().power_on_settle_ms).await;

        loop {
            self.step().await;
        }
    }

    async fn initialize(&mut self) -> Step {
        match self.sensor.initialize().await {
            Ok(info) => {
                info!("Sensor initialized (radiometric: {})", info.radiometric);
                self.info = info;
                let step = self.machine.init_finished(Ok(()));
                self.apply_emissivity().await;
                self.check_status().await;
                step
            }
            Err(e) => self.machine.init_finished(Err(e.kind())),
        }
    }

    /// Pulse the reset line and wait for the sensor to boot
    async fn reset(&mut self) {
        let config = *self.machine.config();
        debug!("Resetting sensor");
        self.sensor.set_reset(true);
        self.delay.delay_ms(config.reset_assert_ms).await;
        self.sensor.set_reset(false);
        self.delay.delay_ms(config.power_on_settle_ms).await;
    }

    async fn acquire(&mut self) -> Step {
        if let Some(percent) = self.channels.emissivity.try_take() {
            self.emissivity = percent;
            self.apply_emissivity().await;
        }

        let timestamp = self.sensor.wait_frame_ready().await;
        match self.sensor.transfer_segment(timestamp).await {
            Ok(true) => {
                self.deliver();
                self.machine.frame_delivered()
            }
            Ok(false) => self.machine.frame_missed(),
            Err(e) => {
                trace!("Segment transfer failed: {:?}", e.kind());
                self.machine.frame_missed()
            }
        }
    }

    fn deliver(&mut self) {
        let frame = self.producer.frame_mut();
        self.sensor.fetch_frame(frame);
        frame.telemetry.radiometric = self.info.radiometric;

        if let Publish::Dropped(slot) = self.producer.publish() {
            debug!("Render busy, dropped frame in {:?}", slot);
        }
    }

    async fn apply_emissivity(&mut self) {
        if let Err(e) = self.sensor.set_emissivity(self.emissivity).await {
            warn!("Failed to set emissivity {}: {:?}", self.emissivity, e.kind());
        }
    }

    async fn check_status(&mut self) {
        match self.sensor.query_status_flags().await {
            Ok(status) => {
                if status.overtemp_shutdown_imminent() {
                    warn!("Sensor reports imminent over-temperature shutdown");
                }
                debug!("Sensor status {:x}", status.word());
            }
            Err(e) => warn!("Status query failed: {:?}", e.kind()),
        }
    }

    async fn finish(&mut self, step: Step) {
        match step.fault {
            Some(FaultUpdate::Raise(code)) => self.channels.notify(Notification::FaultRaised(code)),
            Some(FaultUpdate::Clear) => self.channels.notify(Notification::FaultCleared),
            None => {}
        }

        if step.pause_ms > 0 {
            self.delay.delay_ms(step.pause_ms).await;
        }
    }
}
