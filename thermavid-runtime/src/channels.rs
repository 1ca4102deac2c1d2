//! Inter-loop communication
//!
//! Everything the loops share lives in one [`Channels`] bundle that the
//! board places in a `static` and passes to each task at construction.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use thermavid_core::control::{MenuCommand, Notification};
use thermavid_core::frame::FrameExchange;

/// Channel capacity for status notifications
const NOTIFICATION_CHANNEL_SIZE: usize = 8;

/// Channel capacity for menu commands
const MENU_CHANNEL_SIZE: usize = 4;

pub type NotificationChannel = Channel<CriticalSectionRawMutex, Notification, NOTIFICATION_CHANNEL_SIZE>;
pub type MenuChannel = Channel<CriticalSectionRawMutex, MenuCommand, MENU_CHANNEL_SIZE>;

/// Shared signalling between the acquisition, render and control loops
pub struct Channels {
    /// Startup and fault notifications (any loop to control)
    pub notifications: NotificationChannel,
    /// Debounced button commands (control to render)
    pub menu: MenuChannel,
    /// Latest emissivity in percent (render to acquisition)
    pub emissivity: Signal<CriticalSectionRawMutex, u8>,
    /// Raw frame hand-off (acquisition to render)
    pub frames: FrameExchange,
}

impl Default for Channels {
    fn default() -> Self {
        Self::new()
    }
}

impl Channels {
    pub const fn new() -> Self {
        Self {
            notifications: Channel::new(),
            menu: Channel::new(),
            emissivity: Signal::new(),
            frames: FrameExchange::new(),
        }
    }

    /// Queue a notification for the control loop without blocking
    pub fn notify(&self, notification: Notification) {
        if self.notifications.try_send(notification).is_err() {
            warn!("Notification queue full, dropped {:?}", notification);
        }
    }

    /// Forward a menu command to the render loop without blocking
    pub fn send_menu(&self, command: MenuCommand) {
        if self.menu.try_send(command).is_err() {
            warn!("Menu queue full, dropped {:?}", command);
        }
    }
}
