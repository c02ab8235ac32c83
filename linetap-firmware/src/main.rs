//! Linetap - UART serial bridge firmware
//!
//! Main firmware binary for RP2040-based boards. Taps one serial line,
//! logs what crosses it and mirrors the log to a character display, a web
//! page and a message broker. The display and the network links live on a
//! companion module reached over a second UART.

#![no_std]
#![no_main]

extern crate alloc;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::{UART0, UART1};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embedded_alloc::LlffHeap as Heap;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use linetap_core::settings::RECORD_LEN;
use linetap_core::state::Button;
use linetap_core::LoadOutcome;
use linetap_hal::{FlashStorage, StorageKey};
use linetap_hal_rp2040::{BridgeUartTx, Button as PanelButton, Rp2040FlashStorage};

// Board constants and pin macros generated from bridge.toml
include!(concat!(env!("OUT_DIR"), "/bridge_config.rs"));

mod channels;
mod companion;
mod subscribers;
mod tasks;

// Heap allocator for JSON serialization
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 32KB
const HEAP_SIZE: usize = 32 * 1024;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    UART1_IRQ => BufferedInterruptHandler<UART1>;
});

// Static cells for UART buffers (must live forever)
static SERIAL_TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static SERIAL_RX_BUF: StaticCell<[u8; 1024]> = StaticCell::new();
static COMPANION_TX_BUF: StaticCell<[u8; 1024]> = StaticCell::new();
static COMPANION_RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Linetap firmware starting...");

    init_heap();

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let mut storage = Rp2040FlashStorage::new(p.FLASH, p.DMA_CH0);
    let outcome = load_settings(&mut storage).await;
    let baud = outcome.settings.baud_rate.value();

    // Bridged serial line
    let (tx_pin, rx_pin) = serial_pins!(p);
    let mut serial_config = UartConfig::default();
    serial_config.baudrate = baud;
    let serial = Uart::new_blocking(p.UART0, tx_pin, rx_pin, serial_config).into_buffered(
        Irqs,
        SERIAL_TX_BUF.init([0u8; 256]),
        SERIAL_RX_BUF.init([0u8; 1024]),
    );
    let (serial_tx, serial_rx) = serial.split();
    let serial_tx = BridgeUartTx::new(serial_tx, baud);
    info!("Serial line UART initialized at {} baud", baud);

    // Companion module
    let (tx_pin, rx_pin) = companion_pins!(p);
    let mut companion_config = UartConfig::default();
    companion_config.baudrate = COMPANION_BAUD;
    let companion = Uart::new_blocking(p.UART1, tx_pin, rx_pin, companion_config).into_buffered(
        Irqs,
        COMPANION_TX_BUF.init([0u8; 1024]),
        COMPANION_RX_BUF.init([0u8; 256]),
    );
    let (companion_tx, companion_rx) = companion.split();
    info!("Companion UART initialized at {} baud", COMPANION_BAUD);

    let [prev, select, next] = button_pins!(p);

    spawner.spawn(tasks::settings_task(storage)).unwrap();
    spawner.spawn(tasks::companion_tx_task(companion_tx)).unwrap();
    spawner.spawn(tasks::companion_rx_task(companion_rx)).unwrap();
    spawner
        .spawn(tasks::button_task(PanelButton::new(prev), Button::Prev))
        .unwrap();
    spawner
        .spawn(tasks::button_task(PanelButton::new(select), Button::Select))
        .unwrap();
    spawner
        .spawn(tasks::button_task(PanelButton::new(next), Button::Next))
        .unwrap();
    spawner
        .spawn(tasks::broker_supervisor_task(
            BROKER_RESET_ENABLED,
            BROKER_MAX_FAILURES,
        ))
        .unwrap();
    spawner
        .spawn(tasks::bridge_task(serial_rx, serial_tx, outcome, BRIDGE_CONFIG))
        .unwrap();

    info!("All tasks spawned, firmware running");
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}

/// Read the settings record and decide what to boot with
async fn load_settings(storage: &mut Rp2040FlashStorage<'static>) -> LoadOutcome {
    let mut buf = [0u8; RECORD_LEN];
    let read = storage.read(StorageKey::Settings, &mut buf).await;
    let outcome = LoadOutcome::from_read(read.map(|len| &buf[..len]));

    match outcome.error {
        Some(kind) => warn!("Stored settings rejected ({:?}), using defaults", kind),
        None if outcome.needs_save => info!("No stored settings, using defaults"),
        None => info!("Loaded settings from flash"),
    }
    outcome
}
