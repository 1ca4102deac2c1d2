mod common;

use thermavid_core::config::ControlConfig;
use thermavid_core::control::{LedColor, MenuCommand, Notification, SystemState};
use thermavid_core::FaultCode;
use thermavid_runtime::{Channels, ControlTask};

use common::{channels, AccountingDelay, RecordingLed, ScriptedPin};

type Task = ControlTask<ScriptedPin, RecordingLed, AccountingDelay>;

struct Rig {
    channels: &'static Channels,
    button: ScriptedPin,
    led: RecordingLed,
    task: Task,
}

impl Rig {
    fn new() -> Self {
        let channels = channels();
        let button = ScriptedPin::released();
        let led = RecordingLed::default();
        let task = ControlTask::new(
            button.clone(),
            led.clone(),
            AccountingDelay::default(),
            channels,
            ControlConfig::default(),
        );
        Self {
            channels,
            button,
            led,
            task,
        }
    }

    fn running() -> Self {
        let mut rig = Self::new();
        rig.channels.notify(Notification::StartupComplete);
        rig.task.tick();
        rig
    }

    fn ticks(&mut self, n: usize) {
        for _ in 0..n {
            self.task.tick();
        }
    }

    fn short_press(&mut self) {
        self.button.press();
        self.ticks(2);
        self.button.release();
        self.ticks(2);
    }

    fn menu(&self) -> Vec<MenuCommand> {
        let mut out = Vec::new();
        while let Ok(command) = self.channels.menu.try_receive() {
            out.push(command);
        }
        out
    }
}

#[test]
fn test_startup_then_running_colors() {
    let mut rig = Rig::new();
    assert_eq!(rig.led.current(), Some(LedColor::Yellow));
    assert_eq!(rig.task.supervisor().state(), SystemState::Startup);

    rig.channels.notify(Notification::StartupComplete);
    rig.task.tick();
    assert_eq!(rig.led.current(), Some(LedColor::Green));
    assert_eq!(rig.task.supervisor().state(), SystemState::Running);
}

#[test]
fn test_buttons_ignored_before_startup_complete() {
    let mut rig = Rig::new();
    rig.short_press();
    assert!(rig.menu().is_empty());

    rig.channels.notify(Notification::StartupComplete);
    rig.task.tick();
    rig.short_press();
    assert_eq!(rig.menu(), vec![MenuCommand::ChangeValue]);
}

#[test]
fn test_long_press_fires_once_while_held() {
    let mut rig = Rig::running();
    let config = ControlConfig::default();

    rig.button.press();
    rig.ticks(config.long_press_ticks as usize);
    assert!(rig.menu().is_empty());

    // Fires on the tick the countdown expires, before release
    rig.ticks(1);
    assert_eq!(rig.menu(), vec![MenuCommand::NextParameter]);

    rig.ticks(40);
    rig.button.release();
    rig.ticks(2);
    assert!(rig.menu().is_empty());
}

#[test]
fn test_fault_blinks_code_then_restores() {
    let mut rig = Rig::running();
    let before = rig.led.shown.borrow().len();

    rig.channels
        .notify(Notification::FaultRaised(FaultCode::SensorSync));
    // Raise tick plus one full 6-blink group and most of the idle pause
    rig.ticks(99);
    let reds = rig.led.shown.borrow()[before..]
        .iter()
        .filter(|&&c| c == LedColor::Red)
        .count();
    assert_eq!(reds, 6);
    assert_eq!(rig.led.current(), Some(LedColor::Off));

    rig.ticks(1);
    assert_eq!(rig.led.current(), Some(LedColor::Red));

    // Buttons are not forwarded while faulted
    rig.short_press();
    assert!(rig.menu().is_empty());

    rig.channels.notify(Notification::FaultCleared);
    rig.task.tick();
    assert_eq!(rig.led.current(), Some(LedColor::Green));
    assert_eq!(rig.task.supervisor().state(), SystemState::Running);
}

#[test]
fn test_fault_during_startup_restores_running() {
    let mut rig = Rig::new();
    rig.channels
        .notify(Notification::FaultRaised(FaultCode::SensorControl));
    rig.channels.notify(Notification::StartupComplete);
    rig.task.tick();
    assert_eq!(rig.task.supervisor().state(), SystemState::Fault);
    assert_eq!(rig.task.supervisor().fault(), FaultCode::SensorControl);

    rig.channels.notify(Notification::FaultCleared);
    rig.task.tick();
    assert_eq!(rig.task.supervisor().state(), SystemState::Running);
}
