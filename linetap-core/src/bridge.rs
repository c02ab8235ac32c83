//! The bridge aggregate
//!
//! [`Bridge`] owns every piece of mutable bridge state and is driven by a
//! single task. Each operation runs to completion; transports, buttons and
//! timers only ever reach it through that task.

use alloc::string::String;

use linetap_display::Screen;
use linetap_hal::SerialLine;
use linetap_protocol::{Command, LogMode, Origin};

use crate::assembler::LineAssembler;
use crate::config::{BridgeConfig, LINE_TERMINATOR, SENT_MARKER};
use crate::error::{BridgeError, ErrorKind};
use crate::line::{Line, SendText};
use crate::notify::{ChangeNotifier, LogEvent, Subscriber};
use crate::render::{self, View};
use crate::ringlog::DefaultRingLog;
use crate::settings::{BaudRate, LoadOutcome, Settings, SettingsRecord, SettingsStore};
use crate::state::{Action, Button, Interaction, Mode, State};

/// Serial bridge state and the collaborators it drives
pub struct Bridge<U, St, S> {
    uart: U,
    store: St,
    subscriber: S,
    assembler: LineAssembler,
    log: DefaultRingLog,
    settings: Settings,
    interaction: Interaction,
    notifier: ChangeNotifier,
    compose: SendText,
}

impl<U, St, S> Bridge<U, St, S>
where
    U: SerialLine,
    St: SettingsStore,
    S: Subscriber,
{
    /// Create a bridge running at the baud rate in `settings`
    pub fn new(uart: U, store: St, subscriber: S, settings: Settings, config: &BridgeConfig) -> Self {
        let mut bridge = Self {
            uart,
            store,
            subscriber,
            assembler: LineAssembler::new(config.idle_timeout_ms),
            log: DefaultRingLog::new(),
            settings,
            interaction: Interaction::new(config),
            notifier: ChangeNotifier::new(config.display_refresh_ms),
            compose: SendText::new(),
        };
        bridge.uart.set_baudrate(settings.baud_rate.value());
        bridge
    }

    /// Create a bridge from what storage returned at boot
    ///
    /// Rewrites storage when the record was missing or rejected and shows
    /// the overlay when it was rejected.
    pub fn boot(
        uart: U,
        store: St,
        subscriber: S,
        outcome: LoadOutcome,
        config: &BridgeConfig,
        now_ms: u32,
    ) -> Self {
        let mut bridge = Self::new(uart, store, subscriber, outcome.settings, config);

        if outcome.needs_save && bridge.persist().is_err() {
            bridge.raise_error(ErrorKind::StorageIntegrityFailure, now_ms);
        }
        if let Some(kind) = outcome.error {
            bridge.raise_error(kind, now_ms);
        }
        bridge
    }

    /// Run received bytes through the assembler
    pub fn feed_serial(&mut self, bytes: &[u8], now_ms: u32) {
        for &byte in bytes {
            if let Some(line) = self.assembler.feed(byte, now_ms) {
                self.append(line, Origin::Received);
            }
        }
    }

    /// Time-driven work: idle flush and overlay expiry
    pub fn poll(&mut self, now_ms: u32) {
        if let Some(line) = self.assembler.flush_if_idle(now_ms) {
            self.append(line, Origin::Received);
        }
        if self.interaction.poll(now_ms) {
            self.notifier.mark_dirty();
        }
    }

    /// Handle a button press
    pub fn press(&mut self, button: Button, now_ms: u32) -> Action {
        let action = self
            .interaction
            .press(button, now_ms, self.settings.baud_rate);
        self.notifier.mark_dirty();

        match action {
            Action::None => {}
            Action::BeginScroll => {
                self.log.begin_scroll();
            }
            Action::Scroll(pages) => {
                self.log.scroll_by(pages);
            }
            Action::EndScroll => {
                self.log.end_scroll();
            }
            Action::CommitBaud(rate) => {
                if let Err(e) = self.set_baud_rate(rate.value(), now_ms) {
                    self.raise_error(e.kind(), now_ms);
                }
            }
            Action::Type(ch) => {
                self.compose.push_char(ch);
            }
            Action::Delete => {
                self.compose.pop();
            }
            Action::Discard => self.compose.clear(),
            Action::Send => {
                let text = core::mem::take(&mut self.compose);
                if let Err(e) = self.transmit(text.as_str()) {
                    self.raise_error(e.kind(), now_ms);
                }
            }
        }
        action
    }

    /// Switch the bridged line to `value` bits per second
    ///
    /// Setting the active rate is a no-op apart from the acknowledgement.
    /// A persistence failure is reported on the overlay but the new rate
    /// stays in effect.
    pub fn set_baud_rate(&mut self, value: u32, now_ms: u32) -> Result<(), BridgeError> {
        let rate = BaudRate::from_value(value).ok_or(BridgeError::InvalidBaudRate(value))?;

        if rate != self.settings.baud_rate {
            self.settings.baud_rate = rate;
            self.uart.set_baudrate(value);

            if self.persist().is_err() {
                self.raise_error(ErrorKind::StorageIntegrityFailure, now_ms);
            }

            self.log.reset();
            self.assembler.reset();
            // The cursor stays detached while scrolling, even behind the overlay
            if self.interaction.state().mode() == Mode::Scrolling {
                self.log.begin_scroll();
            }
        }

        self.notifier.baud_changed(&mut self.subscriber, value);
        Ok(())
    }

    /// Write a line to the bridged serial port and log it
    pub fn transmit(&mut self, text: &str) -> Result<(), BridgeError> {
        if text.is_empty() {
            return Ok(());
        }
        let text = SendText::from_text(text);

        self.uart.flush().map_err(|_| BridgeError::Uart)?;
        self.uart
            .write_blocking(text.as_bytes())
            .map_err(|_| BridgeError::Uart)?;
        self.uart
            .write_blocking(LINE_TERMINATOR)
            .map_err(|_| BridgeError::Uart)?;

        let mut line = Line::from_text(SENT_MARKER);
        line.push_str_truncating(text.as_str());
        self.append(line, Origin::Sent);
        Ok(())
    }

    /// Execute a JSON request from a transport
    ///
    /// Failures raise the overlay; the error is returned so the transport
    /// can reply to the sender.
    pub fn handle_request(&mut self, payload: &[u8], now_ms: u32) -> Result<(), BridgeError> {
        let result = Command::parse(payload)
            .map_err(BridgeError::from)
            .and_then(|command| match command {
                Command::SetBaud(value) => self.set_baud_rate(value, now_ms),
                Command::Send(text) => self.transmit(&text),
            });

        if let Err(e) = result {
            self.raise_error(e.kind(), now_ms);
        }
        result
    }

    /// Show an error and tell subscribers
    pub fn raise_error(&mut self, kind: ErrorKind, now_ms: u32) {
        self.interaction.raise(kind, now_ms);
        self.notifier.error_raised(&mut self.subscriber, kind);
    }

    /// Send the full history and the active rate to a new subscriber
    pub fn replay<T: Subscriber + ?Sized>(&self, target: &mut T) {
        let mut text = String::new();
        for (i, line) in self.log.iter_oldest_first().enumerate() {
            if i > 0 {
                text.push('\n');
            }
            text.push_str(line.as_str());
        }

        target.on_log_event(&LogEvent {
            mode: LogMode::Full,
            text: &text,
            origin: Origin::Received,
        });
        target.on_baud_change(self.settings.baud_rate.value());
    }

    /// Claim a redraw if one is due
    pub fn take_redraw(&mut self, now_ms: u32) -> bool {
        self.notifier.take_redraw(now_ms)
    }

    /// Compose the screen for the current state
    pub fn render(&self, screen: &mut Screen) {
        render::draw(
            screen,
            &View {
                log: &self.log,
                state: self.interaction.state(),
                compose: &self.compose,
                active_baud: self.settings.baud_rate,
            },
        );
    }

    pub fn state(&self) -> State {
        self.interaction.state()
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn log(&self) -> &DefaultRingLog {
        &self.log
    }

    /// Send buffer contents
    pub fn compose(&self) -> &str {
        self.compose.as_str()
    }

    /// Partial line waiting for a terminator or timeout
    pub fn pending(&self) -> &str {
        self.assembler.pending()
    }

    pub fn subscriber_mut(&mut self) -> &mut S {
        &mut self.subscriber
    }

    pub fn uart(&self) -> &U {
        &self.uart
    }

    pub fn store(&self) -> &St {
        &self.store
    }

    fn append(&mut self, line: Line, origin: Origin) {
        let slot = self.log.append(line);
        let text = self.log.read(slot).as_str();
        self.notifier.line_appended(&mut self.subscriber, text, origin);
    }

    fn persist(&mut self) -> Result<(), BridgeError> {
        let record = SettingsRecord::encode(&self.settings);
        self.store.save(&record)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IDLE_TIMEOUT_MS, RING_CAPACITY};
    use crate::notify::tests::Recorder;
    use alloc::string::ToString;
    use alloc::vec::Vec;
    use linetap_hal::{BaudRateControl, FlashError, UartTx};

    #[derive(Default)]
    struct MockUart {
        baud: u32,
        written: Vec<u8>,
        flushes: usize,
        fail: bool,
    }

    impl UartTx for MockUart {
        type Error = ();

        fn write_blocking(&mut self, data: &[u8]) -> Result<(), ()> {
            if self.fail {
                return Err(());
            }
            self.written.extend_from_slice(data);
            Ok(())
        }

        fn flush(&mut self) -> Result<(), ()> {
            self.flushes += 1;
            Ok(())
        }
    }

    impl BaudRateControl for MockUart {
        fn set_baudrate(&mut self, baudrate: u32) {
            self.baud = baudrate;
        }

        fn baudrate(&self) -> u32 {
            self.baud
        }
    }

    #[derive(Default)]
    struct MockStore {
        saved: Vec<SettingsRecord>,
        fail: bool,
    }

    impl SettingsStore for MockStore {
        fn save(&mut self, record: &SettingsRecord) -> Result<(), FlashError> {
            if self.fail {
                return Err(FlashError::Flash);
            }
            self.saved.push(*record);
            Ok(())
        }
    }

    type TestBridge = Bridge<MockUart, MockStore, Recorder>;

    fn bridge_at(baud: u32) -> TestBridge {
        let settings = Settings {
            baud_rate: BaudRate::from_value(baud).unwrap(),
        };
        Bridge::new(
            MockUart::default(),
            MockStore::default(),
            Recorder::default(),
            settings,
            &BridgeConfig::default(),
        )
    }

    fn received(bridge: &mut TestBridge, text: &str, now: u32) {
        bridge.feed_serial(text.as_bytes(), now);
        bridge.feed_serial(b"\r\n", now);
    }

    #[test]
    fn test_new_programs_uart() {
        let bridge = bridge_at(9600);
        assert_eq!(bridge.uart().baudrate(), 9600);
    }

    #[test]
    fn test_received_line_notifies_subscribers() {
        let mut bridge = bridge_at(9600);
        received(&mut bridge, "OK", 0);

        assert_eq!(bridge.log().last().as_str(), "OK");
        assert_eq!(
            bridge.subscriber_mut().logs,
            [(LogMode::Increment, "OK".to_string(), Origin::Received)]
        );
    }

    #[test]
    fn test_poll_flushes_idle_line() {
        let mut bridge = bridge_at(9600);
        bridge.feed_serial(b"partial", 100);
        bridge.poll(100 + IDLE_TIMEOUT_MS);
        assert_eq!(bridge.pending(), "partial");
        bridge.poll(101 + IDLE_TIMEOUT_MS);
        assert_eq!(bridge.pending(), "");
        assert_eq!(bridge.log().last().as_str(), "partial");
    }

    #[test]
    fn test_baud_picker_scenario() {
        let mut bridge = bridge_at(9600);
        for i in 0..5 {
            received(&mut bridge, "noise", i);
        }

        bridge.press(Button::Next, 1000);
        assert_eq!(bridge.state(), State::BaudPicker { cursor: 3 });
        bridge.press(Button::Next, 1100);
        bridge.press(Button::Next, 1200);
        assert_eq!(bridge.state(), State::BaudPicker { cursor: 6 });

        let action = bridge.press(Button::Select, 1300);
        assert_eq!(action, Action::CommitBaud(BaudRate::from_value(57600).unwrap()));
        assert_eq!(bridge.state(), State::Receiving);
        assert_eq!(bridge.settings().baud_rate.value(), 57600);
        assert_eq!(bridge.uart().baudrate(), 57600);
        assert_eq!(bridge.log().history_len(), 0);
        assert_eq!(bridge.log().write_index(), 0);

        let saved = &bridge.store().saved;
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].decode().map(|s| s.baud_rate.value()), Ok(57600));
    }

    #[test]
    fn test_set_active_rate_is_idempotent() {
        let mut bridge = bridge_at(9600);
        received(&mut bridge, "keep me", 0);

        bridge.set_baud_rate(9600, 10).unwrap();

        assert_eq!(bridge.log().last().as_str(), "keep me");
        assert!(bridge.store().saved.is_empty());
        assert_eq!(bridge.subscriber_mut().bauds, [9600]);
    }

    #[test]
    fn test_invalid_rate_rejected() {
        let mut bridge = bridge_at(9600);
        assert_eq!(
            bridge.set_baud_rate(300, 0),
            Err(BridgeError::InvalidBaudRate(300))
        );
        assert_eq!(bridge.settings().baud_rate.value(), 9600);
        assert!(bridge.subscriber_mut().bauds.is_empty());
    }

    #[test]
    fn test_persist_failure_keeps_new_rate() {
        let mut bridge = bridge_at(9600);
        bridge.store.fail = true;

        bridge.set_baud_rate(19200, 0).unwrap();

        assert_eq!(bridge.settings().baud_rate.value(), 19200);
        assert!(matches!(
            bridge.state(),
            State::ErrorOverlay {
                kind: ErrorKind::StorageIntegrityFailure,
                ..
            }
        ));
        assert_eq!(bridge.subscriber_mut().bauds, [19200]);
    }

    #[test]
    fn test_character_entry_scenario() {
        let mut bridge = bridge_at(9600);
        bridge.press(Button::Select, 0);
        assert_eq!(bridge.state(), State::CharacterEntry { cursor: 0 });

        // Walk back to DELETE (86) from 'A' (0): three slow presses
        for i in 0..3 {
            bridge.press(Button::Prev, 1000 * (i + 1));
        }
        assert_eq!(bridge.state(), State::CharacterEntry { cursor: 86 });
        assert_eq!(bridge.press(Button::Select, 4000), Action::Delete);
        assert_eq!(bridge.compose(), "");

        for i in 0..3 {
            bridge.press(Button::Next, 5000 + 1000 * i);
        }
        assert_eq!(bridge.press(Button::Select, 9000), Action::Type('A'));
        assert_eq!(bridge.compose(), "A");

        // 'A' (0) wraps back to SEND (88)
        bridge.press(Button::Prev, 10_000);
        assert_eq!(bridge.state(), State::CharacterEntry { cursor: 88 });
        assert_eq!(bridge.press(Button::Select, 11_000), Action::Send);

        assert_eq!(bridge.state(), State::Receiving);
        assert_eq!(bridge.compose(), "");
        assert_eq!(bridge.uart().written, b"A\r\n");
        assert_eq!(bridge.log().last().as_str(), "> A");
        assert_eq!(
            bridge.subscriber_mut().logs.last(),
            Some(&(LogMode::Increment, "> A".to_string(), Origin::Sent))
        );
    }

    #[test]
    fn test_cancel_discards_buffer() {
        let mut bridge = bridge_at(9600);
        bridge.press(Button::Select, 0);
        bridge.press(Button::Select, 1000);
        assert_eq!(bridge.compose(), "A");

        bridge.press(Button::Prev, 2000);
        bridge.press(Button::Prev, 3000);
        assert_eq!(bridge.press(Button::Select, 4000), Action::Discard);
        assert_eq!(bridge.compose(), "");
        assert_eq!(bridge.state(), State::Receiving);
        assert!(bridge.uart().written.is_empty());
    }

    #[test]
    fn test_compose_stops_at_capacity() {
        let mut bridge = bridge_at(9600);
        bridge.press(Button::Select, 0);
        for i in 0..40 {
            bridge.press(Button::Select, 1000 * (i + 1));
        }
        assert_eq!(bridge.compose().len(), crate::config::SEND_CAPACITY);
    }

    #[test]
    fn test_transmit_truncates_and_waits_for_drain() {
        let mut bridge = bridge_at(9600);
        let long = "x".repeat(40);
        bridge.transmit(&long).unwrap();

        assert_eq!(bridge.uart().flushes, 1);
        let mut expected = "x".repeat(crate::config::SEND_CAPACITY).into_bytes();
        expected.extend_from_slice(b"\r\n");
        assert_eq!(bridge.uart().written, expected);
        assert_eq!(bridge.log().last().len(), crate::config::ROW_CAPACITY);
    }

    #[test]
    fn test_transmit_empty_is_noop() {
        let mut bridge = bridge_at(9600);
        bridge.transmit("").unwrap();
        assert_eq!(bridge.uart().flushes, 0);
        assert_eq!(bridge.log().history_len(), 0);
    }

    #[test]
    fn test_transmit_failure() {
        let mut bridge = bridge_at(9600);
        bridge.uart.fail = true;
        assert_eq!(bridge.transmit("AT"), Err(BridgeError::Uart));
        assert_eq!(bridge.log().history_len(), 0);
    }

    #[test]
    fn test_scroll_through_history() {
        let mut bridge = bridge_at(9600);
        for i in 0..20 {
            received(&mut bridge, &alloc::format!("line {}", i), i);
        }

        bridge.press(Button::Prev, 1000);
        assert_eq!(bridge.state(), State::Scrolling);
        assert!(bridge.log().is_scrolling());

        bridge.press(Button::Prev, 2000);
        assert_eq!(bridge.log().read(bridge.log().read_index()).as_str(), "line 11");

        // New lines do not move the viewport while scrolling
        received(&mut bridge, "late", 2500);
        assert_eq!(bridge.log().read(bridge.log().read_index()).as_str(), "line 11");

        bridge.press(Button::Select, 3000);
        assert_eq!(bridge.state(), State::Receiving);
        assert_eq!(bridge.log().read(bridge.log().read_index()).as_str(), "late");
    }

    #[test]
    fn test_remote_baud_change_keeps_scroll_cursor() {
        let mut bridge = bridge_at(9600);
        for i in 0..20 {
            received(&mut bridge, &alloc::format!("line {}", i), i);
        }
        bridge.press(Button::Prev, 1000);
        assert_eq!(bridge.state(), State::Scrolling);

        bridge
            .handle_request(br#"{"command":"setBaud","value":57600}"#, 1100)
            .unwrap();
        assert_eq!(bridge.state(), State::Scrolling);
        assert!(bridge.log().is_scrolling());

        let parked = bridge.log().read_index();
        for i in 0..3 {
            received(&mut bridge, "after", 1200 + i);
        }
        assert!(bridge.log().is_scrolling());
        assert_eq!(bridge.log().read_index(), parked);
        assert_ne!(bridge.log().read_index(), bridge.log().tail());

        bridge.press(Button::Select, 2000);
        assert_eq!(bridge.state(), State::Receiving);
        assert_eq!(bridge.log().read_index(), bridge.log().tail());
    }

    #[test]
    fn test_baud_change_behind_overlay_keeps_scroll_cursor() {
        let mut bridge = bridge_at(9600);
        for i in 0..20 {
            received(&mut bridge, &alloc::format!("line {}", i), i);
        }
        bridge.press(Button::Prev, 1000);
        bridge.raise_error(ErrorKind::TransportUnavailable, 1100);

        bridge.set_baud_rate(19200, 1200).unwrap();
        assert!(bridge.log().is_scrolling());

        received(&mut bridge, "after", 1300);
        assert_ne!(bridge.log().read_index(), bridge.log().tail());

        bridge.poll(1100 + 5001);
        assert_eq!(bridge.state(), State::Scrolling);
        assert!(bridge.log().is_scrolling());
    }

    #[test]
    fn test_handle_request_commands() {
        let mut bridge = bridge_at(9600);
        bridge
            .handle_request(br#"{"command":"send","value":"AT"}"#, 0)
            .unwrap();
        assert_eq!(bridge.uart().written, b"AT\r\n");

        bridge
            .handle_request(br#"{"command":"setBaud","value":57600}"#, 0)
            .unwrap();
        assert_eq!(bridge.settings().baud_rate.value(), 57600);
    }

    #[test]
    fn test_handle_request_errors_raise_overlay() {
        let mut bridge = bridge_at(9600);

        let err = bridge.handle_request(b"not json", 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRequest);

        let err = bridge
            .handle_request(br#"{"command":"reboot"}"#, 100)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownCommand);

        assert_eq!(
            bridge.subscriber_mut().errors,
            [ErrorKind::MalformedRequest, ErrorKind::UnknownCommand]
        );
        assert!(matches!(
            bridge.state(),
            State::ErrorOverlay {
                kind: ErrorKind::UnknownCommand,
                since_ms: 100,
                ..
            }
        ));
    }

    #[test]
    fn test_overlay_dismisses_after_timeout() {
        let mut bridge = bridge_at(9600);
        bridge.press(Button::Next, 0);
        bridge.raise_error(ErrorKind::TransportUnavailable, 100);
        assert_eq!(bridge.press(Button::Select, 200), Action::None);

        bridge.poll(5100);
        assert_eq!(bridge.state(), State::BaudPicker { cursor: 3 });
    }

    #[test]
    fn test_replay_joins_history() {
        let mut bridge = bridge_at(9600);
        for i in 0..(RING_CAPACITY + 2) {
            received(&mut bridge, &alloc::format!("{}", i), 0);
        }

        let mut late = Recorder::default();
        bridge.replay(&mut late);

        let (mode, text, origin) = &late.logs[0];
        assert_eq!(*mode, LogMode::Full);
        assert_eq!(*origin, Origin::Received);
        let lines: Vec<&str> = text.split('\n').collect();
        assert_eq!(lines.len(), RING_CAPACITY);
        assert_eq!(lines[0], "2");
        assert_eq!(lines[RING_CAPACITY - 1], "41");
        assert_eq!(late.bauds, [9600]);
    }

    /// Subscriber behind a queue with a fixed number of free slots
    #[derive(Default)]
    struct QueuedSubscriber {
        room: usize,
        resync: crate::notify::Resync,
        delivered: Vec<(LogMode, String)>,
    }

    impl Subscriber for QueuedSubscriber {
        fn on_log_event(&mut self, event: &LogEvent<'_>) {
            if !self.resync.admits(event.mode) {
                return;
            }
            let queued = self.room > 0;
            if queued {
                self.room -= 1;
                self.delivered.push((event.mode, event.text.to_string()));
            }
            self.resync.record(event.mode, queued);
        }

        fn on_baud_change(&mut self, _baud: u32) {}
    }

    #[test]
    fn test_dropped_increment_recovered_by_replay() {
        let settings = Settings::default();
        let mut bridge = Bridge::new(
            MockUart::default(),
            MockStore::default(),
            QueuedSubscriber {
                room: 2,
                ..Default::default()
            },
            settings,
            &BridgeConfig::default(),
        );

        for i in 0..4 {
            bridge.feed_serial(alloc::format!("burst {}\r\n", i).as_bytes(), i);
        }
        assert!(bridge.subscriber_mut().resync.is_stale());
        assert_eq!(bridge.subscriber_mut().delivered.len(), 2);

        // Queue drained; later increments stay held back until the replay
        bridge.subscriber_mut().room = 8;
        bridge.feed_serial(b"burst 4\r\n", 10);
        assert_eq!(bridge.subscriber_mut().delivered.len(), 2);

        let mut subscriber = core::mem::take(bridge.subscriber_mut());
        bridge.replay(&mut subscriber);
        assert!(!subscriber.resync.is_stale());
        let (mode, text) = subscriber.delivered.last().unwrap();
        assert_eq!(*mode, LogMode::Full);
        assert_eq!(text, "burst 0\nburst 1\nburst 2\nburst 3\nburst 4");

        *bridge.subscriber_mut() = subscriber;
        bridge.feed_serial(b"burst 5\r\n", 20);
        assert_eq!(
            bridge.subscriber_mut().delivered.last(),
            Some(&(LogMode::Increment, "burst 5".to_string()))
        );
    }

    #[test]
    fn test_replay_empty_log() {
        let bridge = bridge_at(115200);
        let mut late = Recorder::default();
        bridge.replay(&mut late);
        assert_eq!(late.logs[0].1, "");
        assert_eq!(late.bauds, [115200]);
    }

    #[test]
    fn test_boot_first_run_persists_default() {
        let bridge: TestBridge = Bridge::boot(
            MockUart::default(),
            MockStore::default(),
            Recorder::default(),
            LoadOutcome::from_read(Err(FlashError::NotFound)),
            &BridgeConfig::default(),
            0,
        );
        assert_eq!(bridge.uart().baudrate(), 115200);
        assert_eq!(bridge.store().saved.len(), 1);
        assert_eq!(bridge.state(), State::Receiving);
    }

    #[test]
    fn test_boot_corrupt_record_shows_overlay() {
        let mut bytes = *SettingsRecord::encode(&Settings::default()).as_bytes();
        bytes[5] ^= 0x10;

        let bridge: TestBridge = Bridge::boot(
            MockUart::default(),
            MockStore::default(),
            Recorder::default(),
            LoadOutcome::from_read(Ok(&bytes)),
            &BridgeConfig::default(),
            0,
        );
        assert_eq!(bridge.settings(), Settings::default());
        assert_eq!(bridge.store().saved.len(), 1);
        assert!(matches!(
            bridge.state(),
            State::ErrorOverlay {
                kind: ErrorKind::StorageIntegrityFailure,
                ..
            }
        ));
    }

    #[test]
    fn test_redraw_after_input() {
        let mut bridge = bridge_at(9600);
        assert!(bridge.take_redraw(0));
        assert!(!bridge.take_redraw(200));

        bridge.press(Button::Next, 300);
        assert!(bridge.take_redraw(300));

        let mut screen = Screen::new();
        bridge.render(&mut screen);
        assert_eq!(screen.line(3), Some("*   9600"));
    }
}
