mod common;

use embassy_futures::block_on;

use thermavid_core::acquisition::AcqState;
use thermavid_core::config::AcquisitionConfig;
use thermavid_core::control::Notification;
use thermavid_core::traits::SensorErrorKind;
use thermavid_core::FaultCode;
use thermavid_runtime::AcquisitionTask;

use common::{channels, drain_notifications, resources, AccountingDelay, ScriptedSensor, Wait};

type Task = AcquisitionTask<ScriptedSensor, AccountingDelay>;

fn task(sensor: &ScriptedSensor, delay: &AccountingDelay) -> (Task, &'static thermavid_runtime::Channels) {
    let channels = channels();
    let resources = resources(channels);
    let task = AcquisitionTask::new(
        sensor.clone(),
        delay.clone(),
        resources.producer,
        channels,
        AcquisitionConfig::default(),
        97,
    );
    (task, channels)
}

#[test]
fn test_sync_loss_resets_once_then_cools_down() {
    let sensor = ScriptedSensor::default();
    let delay = AccountingDelay::default();
    let (mut task, channels) = task(&sensor, &delay);
    let config = AcquisitionConfig::default();

    block_on(task.step());
    assert_eq!(task.state(), AcqState::Run);
    assert_eq!(sensor.log.borrow().emissivity, vec![97]);

    // 36 missed waits per resync, 10 resyncs per fault
    let waits = config.missed_frame_limit as usize * config.sync_fault_limit as usize;
    for _ in 0..waits - 1 {
        block_on(task.step());
        assert_eq!(task.state(), AcqState::Run);
    }
    assert!(drain_notifications(channels).is_empty());

    block_on(task.step());
    assert_eq!(task.state(), AcqState::ReInit);
    assert_eq!(
        drain_notifications(channels),
        vec![Notification::FaultRaised(FaultCode::SensorSync)]
    );
    assert_eq!(delay.elapsed_ms(), 10 * 185);

    // Reset pulse, settle and re-initialize
    block_on(task.step());
    assert_eq!(task.state(), AcqState::Run);
    {
        let log = sensor.log.borrow();
        assert_eq!(log.reset_line, vec![true, false]);
        assert_eq!(log.inits, 2);
        assert_eq!(log.emissivity, vec![97, 97]);
    }
    assert_eq!(delay.elapsed_ms(), 10 * 185 + 10 + 1000);

    // Second failure run without a good frame gives up on resets
    for _ in 0..waits {
        block_on(task.step());
    }
    assert_eq!(task.state(), AcqState::Error);
    assert_eq!(
        drain_notifications(channels),
        vec![Notification::FaultRaised(FaultCode::SensorSync)]
    );
    assert_eq!(sensor.log.borrow().reset_line.len(), 2);

    // Cooldown, then reset and recover
    for _ in 0..config.error_cooldown_ticks {
        assert_eq!(task.state(), AcqState::Error);
        block_on(task.step());
    }
    assert_eq!(task.state(), AcqState::ReInit);
    block_on(task.step());
    assert_eq!(task.state(), AcqState::Run);
    assert_eq!(sensor.log.borrow().reset_line.len(), 4);

    sensor.push_waits(Wait::Frame, 1);
    block_on(task.step());
    assert_eq!(drain_notifications(channels), vec![Notification::FaultCleared]);
    assert_eq!(task.machine().fault(), None);
}

#[test]
fn test_init_failure_enters_cooldown() {
    let sensor = ScriptedSensor::default();
    sensor
        .log
        .borrow_mut()
        .init_results
        .push_back(Err(SensorErrorKind::Control));
    let delay = AccountingDelay::default();
    let (mut task, channels) = task(&sensor, &delay);

    block_on(task.step());
    assert_eq!(task.state(), AcqState::Error);
    assert_eq!(
        drain_notifications(channels),
        vec![Notification::FaultRaised(FaultCode::SensorControl)]
    );
    assert!(sensor.log.borrow().emissivity.is_empty());

    while task.state() == AcqState::Error {
        block_on(task.step());
    }
    assert_eq!(task.state(), AcqState::ReInit);
    assert_eq!(delay.elapsed_ms(), 59 * 1000);

    block_on(task.step());
    assert_eq!(task.state(), AcqState::Run);
    assert_eq!(sensor.log.borrow().emissivity, vec![97]);
}

#[test]
fn test_transfer_errors_count_as_misses() {
    let sensor = ScriptedSensor::default();
    let delay = AccountingDelay::default();
    let (mut task, channels) = task(&sensor, &delay);
    block_on(task.step());

    sensor.push_waits(Wait::Fail, 35);
    for _ in 0..35 {
        block_on(task.step());
    }
    assert_eq!(delay.elapsed_ms(), 0);

    sensor.push_waits(Wait::Fail, 1);
    block_on(task.step());
    assert_eq!(delay.elapsed_ms(), 185);
    assert_eq!(task.state(), AcqState::Run);
    assert!(drain_notifications(channels).is_empty());
}

#[test]
fn test_good_frame_resets_miss_count() {
    let sensor = ScriptedSensor::default();
    let delay = AccountingDelay::default();
    let (mut task, _channels) = task(&sensor, &delay);
    block_on(task.step());

    sensor.push_waits(Wait::Miss, 35);
    sensor.push_waits(Wait::Frame, 1);
    sensor.push_waits(Wait::Miss, 35);
    for _ in 0..71 {
        block_on(task.step());
    }

    // Only the post-frame idle was paused
    assert_eq!(delay.elapsed_ms(), 30);
    assert_eq!(sensor.log.borrow().frames_fetched, 1);
}

#[test]
fn test_emissivity_signal_applied_between_frames() {
    let sensor = ScriptedSensor::default();
    let delay = AccountingDelay::default();
    let (mut task, channels) = task(&sensor, &delay);
    block_on(task.step());

    channels.emissivity.signal(84);
    block_on(task.step());
    assert_eq!(sensor.log.borrow().emissivity, vec![97, 84]);

    // Re-applied after a reset
    sensor.log.borrow_mut().waits.clear();
    while task.state() == AcqState::Run {
        block_on(task.step());
    }
    block_on(task.step());
    assert_eq!(sensor.log.borrow().emissivity, vec![97, 84, 84]);
}
