//! Render loop
//!
//! Owns the display frames, the compositor, the parameter store and the
//! parameter editor. Each evaluation tick it applies pending menu commands,
//! advances the edit timeout and, when a raw frame is ready, shows the
//! previously composited frame before compositing the new one into the
//! slot just vacated.

use embedded_hal_async::delay::DelayNs;

use thermavid_core::config::RenderConfig;
use thermavid_core::control::MenuCommand;
use thermavid_core::editor::{Effects, ParameterEditor};
use thermavid_core::frame::{FrameConsumer, ReadyFrame};
use thermavid_core::params::ParameterStore;
use thermavid_core::traits::{PixelFormat, VideoOutput, VideoStandard};
use thermavid_hal::FlashStorage;
use thermavid_video::pattern::draw_test_pattern;
use thermavid_video::{Compositor, DisplayFrame, GuiState, DISPLAY_HEIGHT, DISPLAY_WIDTH};

use crate::channels::Channels;
use crate::startup::{halt, RenderBuffers, StartupError};

/// Render loop state and collaborators
pub struct RenderTask<V: VideoOutput, F: FlashStorage, D: DelayNs> {
    video: V,
    delay: D,
    consumer: FrameConsumer,
    display: &'static mut [DisplayFrame; 2],
    compositor: &'static mut Compositor,
    store: ParameterStore<F>,
    editor: ParameterEditor,
    channels: &'static Channels,
    config: RenderConfig,
    standard: VideoStandard,
    frames_rendered: u32,
}

impl<V: VideoOutput, F: FlashStorage, D: DelayNs> RenderTask<V, F, D> {
    pub fn new(
        video: V,
        delay: D,
        buffers: RenderBuffers,
        store: ParameterStore<F>,
        channels: &'static Channels,
        config: RenderConfig,
        standard: VideoStandard,
    ) -> Self {
        let editor = ParameterEditor::new(store.snapshot(), config.edit_timeout_ms);
        Self {
            video,
            delay,
            consumer: buffers.consumer,
            display: buffers.display,
            compositor: buffers.compositor,
            store,
            editor,
            channels,
            config,
            standard,
            frames_rendered: 0,
        }
    }

    pub fn editor(&self) -> &ParameterEditor {
        &self.editor
    }

    pub fn store(&self) -> &ParameterStore<F> {
        &self.store
    }

    pub fn video(&self) -> &V {
        &self.video
    }

    /// Composited frame in a display slot
    pub fn display(&self, index: usize) -> &DisplayFrame {
        &self.display[index]
    }

    pub fn frames_rendered(&self) -> u32 {
        self.frames_rendered
    }

    /// Configure the video output and show the test card
    pub fn start(&mut self) -> Result<(), StartupError> {
        let format = PixelFormat::Gray8;
        self.video
            .initialize(DISPLAY_WIDTH as u16, DISPLAY_HEIGHT as u16, format, self.standard)
            .map_err(|_| StartupError::Peripheral)?;

        let needed = DISPLAY_WIDTH * DISPLAY_HEIGHT * format.bytes_per_pixel();
        let len = self.video.frame_buffer().len();
        if len < needed {
            error!("Video frame buffer too small: {} < {}", len, needed);
            return Err(StartupError::Peripheral);
        }

        for frame in self.display.iter_mut() {
            // DisplayFrame drawing is infallible
            let _ = draw_test_pattern(frame, self.standard);
        }
        self.display[0].copy_to(self.video.frame_buffer());

        info!("Video output started ({:?})", self.standard);
        Ok(())
    }

    /// One evaluation tick
    pub async fn poll(&mut self) {
        while let Ok(command) = self.channels.menu.try_receive() {
            let effects = match command {
                MenuCommand::ChangeValue => self.editor.on_short_press(),
                MenuCommand::NextParameter => self.editor.on_long_press(),
            };
            self.apply(effects).await;
        }

        let effects = self.editor.tick(self.config.eval_interval_ms);
        self.apply(effects).await;

        if let Some(frame) = self.consumer.try_take() {
            self.present(frame).await;
        }
    }

    /// Render loop; halts if the video output cannot start
    pub async fn run(mut self) -> ! {
        info!("Render task started");
        if let Err(e) = self.start() {
            halt(self.channels, e).await;
        }

        loop {
            self.poll().await;
            self.delay.delay_ms(self.config.eval_interval_ms).await;
        }
    }

    /// Show the other slot's finished frame, then composite this one
    async fn present(&mut self, frame: ReadyFrame) {
        let slot = frame.slot();

        self.video.wait_vsync().await;
        self.display[slot.other().index()].copy_to(self.video.frame_buffer());

        let gui = GuiState::derive(self.editor.values(), &frame.telemetry);
        let label = self.editor.label();
        self.compositor
            .render(&frame, &gui, label.as_deref(), &mut self.display[slot.index()]);
        self.frames_rendered = self.frames_rendered.wrapping_add(1);
        trace!("Rendered {:?}", slot);
    }

    async fn apply(&mut self, effects: Effects) {
        if let Some((id, value)) = effects.persist {
            // Stale values are an acceptable degradation; log only
            if let Err(e) = self.store.set(id, value).await {
                warn!("Failed to persist {:?} = {}: {:?}", id, value, e);
            }
        }
        if let Some(percent) = effects.emissivity {
            self.channels.emissivity.signal(percent);
        }
    }
}
