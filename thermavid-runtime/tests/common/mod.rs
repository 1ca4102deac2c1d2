//! Host fakes for the pipeline collaborators

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use embedded_hal_async::delay::DelayNs;

use thermavid_core::control::{LedColor, Notification, StatusLed};
use thermavid_core::frame::{RawFrame, SpotRegion, StatusFlags};
use thermavid_core::traits::{emissivity_to_sensor_scale, PixelFormat, SensorErrorKind, SensorInfo, SensorLink, VideoOutput, VideoStandard};
use thermavid_hal::{FlashError, FlashStorage, InputPin, StorageKey};
use thermavid_runtime::{Channels, Resources};
use thermavid_video::{Compositor, DisplayFrame, DISPLAY_PIXELS};

/// Result of one frame-ready wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wait {
    /// Segment completed a frame
    Frame,
    /// Segment did not complete a frame
    Miss,
    /// Transfer failed
    Fail,
}

/// Shared script and log of a [`ScriptedSensor`]
#[derive(Default)]
pub struct SensorLog {
    /// Outcomes of upcoming waits; misses when empty
    pub waits: VecDeque<Wait>,
    /// Outcomes of upcoming initializations; succeeds when empty
    pub init_results: VecDeque<Result<SensorInfo, SensorErrorKind>>,
    pub inits: usize,
    pub frames_fetched: usize,
    pub reset_line: Vec<bool>,
    pub emissivity: Vec<u8>,
    /// Fixed-point values written to the radiometry control
    pub emissivity_register: Vec<u16>,
}

#[derive(Clone, Default)]
pub struct ScriptedSensor {
    pub log: Rc<RefCell<SensorLog>>,
}

impl ScriptedSensor {
    pub fn push_waits(&self, wait: Wait, count: usize) {
        let mut log = self.log.borrow_mut();
        for _ in 0..count {
            log.waits.push_back(wait);
        }
    }
}

impl SensorLink for ScriptedSensor {
    type Error = SensorErrorKind;

    async fn initialize(&mut self) -> Result<SensorInfo, SensorErrorKind> {
        let mut log = self.log.borrow_mut();
        log.inits += 1;
        log.init_results
            .pop_front()
            .unwrap_or(Ok(SensorInfo { radiometric: true }))
    }

    async fn wait_frame_ready(&mut self) -> u32 {
        0
    }

    async fn transfer_segment(&mut self, _timestamp_us: u32) -> Result<bool, SensorErrorKind> {
        match self.log.borrow_mut().waits.pop_front().unwrap_or(Wait::Miss) {
            Wait::Frame => Ok(true),
            Wait::Miss => Ok(false),
            Wait::Fail => Err(SensorErrorKind::Stream),
        }
    }

    fn fetch_frame(&mut self, frame: &mut RawFrame) {
        let mut log = self.log.borrow_mut();
        log.frames_fetched += 1;
        let offset = log.frames_fetched as u16;
        for (i, p) in frame.pixels_mut().iter_mut().enumerate() {
            *p = 8000 + (i % 160) as u16 + offset;
        }
        frame.update_extrema();
        frame.telemetry.spot = SpotRegion::new(79, 59, 80, 60);
        frame.telemetry.spot_mean = 30_000;
        frame.telemetry.tlinear_high_res = true;
    }

    async fn set_emissivity(&mut self, percent: u8) -> Result<(), SensorErrorKind> {
        let mut log = self.log.borrow_mut();
        log.emissivity.push(percent);
        log.emissivity_register.push(emissivity_to_sensor_scale(percent));
        Ok(())
    }

    async fn query_status_flags(&mut self) -> Result<StatusFlags, SensorErrorKind> {
        Ok(StatusFlags::from_word(0))
    }

    fn set_reset(&mut self, asserted: bool) {
        self.log.borrow_mut().reset_line.push(asserted);
    }
}

/// Video sink that keeps the scan-out buffer
pub struct RecordingVideo {
    pub buffer: Vec<u8>,
    pub mode: Option<(u16, u16, PixelFormat, VideoStandard)>,
    pub vsyncs: usize,
    pub fail_init: bool,
}

impl Default for RecordingVideo {
    fn default() -> Self {
        Self {
            buffer: vec![0; DISPLAY_PIXELS],
            mode: None,
            vsyncs: 0,
            fail_init: false,
        }
    }
}

impl VideoOutput for RecordingVideo {
    type Error = ();

    fn initialize(
        &mut self,
        width: u16,
        height: u16,
        format: PixelFormat,
        standard: VideoStandard,
    ) -> Result<(), ()> {
        if self.fail_init {
            return Err(());
        }
        self.mode = Some((width, height, format, standard));
        Ok(())
    }

    fn frame_buffer(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    async fn wait_vsync(&mut self) {
        self.vsyncs += 1;
    }
}

/// In-memory key-value flash
#[derive(Default)]
pub struct MemoryFlash {
    pub entries: HashMap<StorageKey, Vec<u8>>,
    pub dead: bool,
}

impl FlashStorage for MemoryFlash {
    async fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
        if self.dead {
            return Err(FlashError::Flash);
        }
        let data = self.entries.get(&key).ok_or(FlashError::NotFound)?;
        buffer[..data.len()].copy_from_slice(data);
        Ok(data.len())
    }

    async fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError> {
        if self.dead {
            return Err(FlashError::Flash);
        }
        self.entries.insert(key, data.to_vec());
        Ok(())
    }
}

/// Input pin whose level the test drives
#[derive(Clone)]
pub struct ScriptedPin {
    pub level: Rc<Cell<bool>>,
}

impl ScriptedPin {
    /// Idle-high button (active low)
    pub fn released() -> Self {
        Self {
            level: Rc::new(Cell::new(true)),
        }
    }

    pub fn press(&self) {
        self.level.set(false);
    }

    pub fn release(&self) {
        self.level.set(true);
    }
}

impl InputPin for ScriptedPin {
    fn is_high(&self) -> bool {
        self.level.get()
    }
}

/// LED that records every color shown
#[derive(Clone, Default)]
pub struct RecordingLed {
    pub shown: Rc<RefCell<Vec<LedColor>>>,
}

impl RecordingLed {
    pub fn current(&self) -> Option<LedColor> {
        self.shown.borrow().last().copied()
    }
}

impl StatusLed for RecordingLed {
    fn show(&mut self, color: LedColor) {
        self.shown.borrow_mut().push(color);
    }
}

/// Delay that only accounts the requested time
#[derive(Clone, Default)]
pub struct AccountingDelay {
    pub elapsed_ns: Rc<Cell<u64>>,
}

impl AccountingDelay {
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ns.get() / 1_000_000
    }
}

impl DelayNs for AccountingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns.set(self.elapsed_ns.get() + ns as u64);
    }

    async fn delay_us(&mut self, us: u32) {
        self.elapsed_ns.set(self.elapsed_ns.get() + us as u64 * 1_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.elapsed_ns.set(self.elapsed_ns.get() + ms as u64 * 1_000_000);
    }
}

/// Channels for one test
pub fn channels() -> &'static Channels {
    Box::leak(Box::new(Channels::new()))
}

/// Heap-backed buffers wired to `channels`
pub fn resources(channels: &'static Channels) -> Resources {
    let raw = Box::leak(Box::new([RawFrame::new(), RawFrame::new()]));
    let display = Box::leak(Box::new([DisplayFrame::new(), DisplayFrame::new()]));
    let compositor = Box::leak(Box::new(Compositor::new()));
    Resources::from_buffers(channels, raw, display, compositor)
}

/// Drain all queued notifications
pub fn drain_notifications(channels: &Channels) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(n) = channels.notifications.try_receive() {
        out.push(n);
    }
    out
}
