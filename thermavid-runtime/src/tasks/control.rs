//! Control loop
//!
//! Samples the active-low button, drains status notifications into the
//! supervisor, forwards debounced presses to the render loop while the
//! system is running and drives the status LED.

use embedded_hal_async::delay::DelayNs;

use thermavid_core::config::ControlConfig;
use thermavid_core::control::{ButtonDebouncer, MenuCommand, StatusLed, Supervisor};
use thermavid_hal::InputPin;

use crate::channels::Channels;

/// Control loop state and collaborators
pub struct ControlTask<B: InputPin, L: StatusLed, D: DelayNs> {
    button: B,
    led: L,
    delay: D,
    supervisor: Supervisor,
    debouncer: ButtonDebouncer,
    channels: &'static Channels,
    config: ControlConfig,
}

impl<B: InputPin, L: StatusLed, D: DelayNs> ControlTask<B, L, D> {
    /// Create the loop and show the startup color
    pub fn new(button: B, mut led: L, delay: D, channels: &'static Channels, config: ControlConfig) -> Self {
        let supervisor = Supervisor::new(&config);
        led.show(supervisor.color());
        Self {
            button,
            led,
            delay,
            supervisor,
            debouncer: ButtonDebouncer::new(config.long_press_ticks),
            channels,
            config,
        }
    }

    pub fn supervisor(&self) -> &Supervisor {
        &self.supervisor
    }

    pub fn led(&self) -> &L {
        &self.led
    }

    /// One evaluation tick
    pub fn tick(&mut self) {
        while let Ok(notification) = self.channels.notifications.try_receive() {
            if let Some(color) = self.supervisor.handle(notification) {
                self.led.show(color);
            }
        }

        if let Some(press) = self.debouncer.sample(self.button.is_low()) {
            if self.supervisor.forwards_buttons() {
                debug!("Button {:?}", press);
                self.channels.send_menu(MenuCommand::from(press));
            } else {
                debug!("Button {:?} ignored in {:?}", press, self.supervisor.state());
            }
        }

        if let Some(color) = self.supervisor.tick(self.config.eval_interval_ms) {
            self.led.show(color);
        }
    }

    /// Control loop
    pub async fn run(mut self) -> ! {
        info!("Control task started");
        loop {
            self.tick();
            self.delay.delay_ms(self.config.eval_interval_ms).await;
        }
    }
}
