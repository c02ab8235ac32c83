//! Inter-task communication channels
//!
//! The bridge task owns all bridge state. Everything else talks to it, and
//! it talks back, through the statics below.

use core::cell::Cell;
use core::sync::atomic::{AtomicBool, Ordering};

use alloc::string::String;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use heapless::Vec;

use linetap_core::notify::Resync;
use linetap_core::state::ButtonEvent;
use linetap_core::SettingsRecord;
use linetap_display::Screen;
use linetap_protocol::LinkId;

/// Largest JSON request accepted from a link
pub const REQUEST_CAPACITY: usize = 256;

/// Channel capacity for button presses
const BUTTON_CHANNEL_SIZE: usize = 8;

/// Channel capacity for link events and requests
const INBOUND_CHANNEL_SIZE: usize = 4;

/// Channel capacity for messages to the companion
const OUTBOUND_CHANNEL_SIZE: usize = 16;

/// Link traffic for the bridge task
pub enum Inbound {
    Connected(LinkId),
    Disconnected(LinkId),
    Request {
        from: LinkId,
        payload: Vec<u8, REQUEST_CAPACITY>,
    },
    /// A request too large to reassemble
    Oversized(LinkId),
}

/// Link traffic for the companion
pub enum Outbound {
    Json { link: LinkId, text: String },
    Connect(LinkId),
}

/// Debounced button presses
pub static BUTTON_CHANNEL: Channel<CriticalSectionRawMutex, ButtonEvent, BUTTON_CHANNEL_SIZE> =
    Channel::new();

/// Link events and requests from the companion
pub static INBOUND_CHANNEL: Channel<CriticalSectionRawMutex, Inbound, INBOUND_CHANNEL_SIZE> =
    Channel::new();

/// JSON and connect requests for the companion
pub static OUTBOUND_CHANNEL: Channel<CriticalSectionRawMutex, Outbound, OUTBOUND_CHANNEL_SIZE> =
    Channel::new();

/// Latest settings record waiting to be written to flash
pub static SETTINGS_SAVE: Signal<CriticalSectionRawMutex, SettingsRecord> = Signal::new();

/// Raised by the settings task when a flash write failed
pub static STORAGE_FAULT: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Screen composed by the bridge task, sent by the companion task
pub static SCREEN_BUFFER: Mutex<CriticalSectionRawMutex, Screen> = Mutex::new(Screen::new());

/// Signal that a screen update is ready to be sent
pub static SCREEN_UPDATE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Broker link up (true) or down (false), for the supervisor
pub static BROKER_LINK: Signal<CriticalSectionRawMutex, bool> = Signal::new();

static LINK_UP: [AtomicBool; 2] = [AtomicBool::new(false), AtomicBool::new(false)];

pub fn set_link_up(link: LinkId, up: bool) {
    LINK_UP[link.index()].store(up, Ordering::Relaxed);
}

pub fn is_link_up(link: LinkId) -> bool {
    LINK_UP[link.index()].load(Ordering::Relaxed)
}

static LINK_RESYNC: [BlockingMutex<CriticalSectionRawMutex, Cell<Resync>>; 2] = [
    BlockingMutex::new(Cell::new(Resync::new())),
    BlockingMutex::new(Cell::new(Resync::new())),
];

/// Run `f` on the log delivery state of `link`
pub fn with_resync<R>(link: LinkId, f: impl FnOnce(&mut Resync) -> R) -> R {
    LINK_RESYNC[link.index()].lock(|cell| {
        let mut resync = cell.get();
        let result = f(&mut resync);
        cell.set(resync);
        result
    })
}

/// Room left in the outbound queue
pub fn outbound_free() -> usize {
    OUTBOUND_CHANNEL.free_capacity()
}
