//! Screen composition for each interaction state
//!
//! Rendering only reads bridge state; the firmware decides when to push
//! the composed [`Screen`] to the display.

use core::fmt::Write;

use heapless::String;
use linetap_display::{Screen, SCREEN_COLS, SCREEN_ROWS};

use crate::config::{PAGE_LINES, SEND_CAPACITY};
use crate::keyboard::{Key, PALETTE_LEN};
use crate::line::SendText;
use crate::ringlog::RingLog;
use crate::settings::{BaudRate, BAUD_RATES};
use crate::state::State;

/// Keys either side of the cursor in the keyboard strip
const STRIP_RADIUS: usize = 2;

type Row = String<SCREEN_COLS>;

/// Everything a redraw needs
pub struct View<'a, const N: usize> {
    pub log: &'a RingLog<N>,
    pub state: State,
    pub compose: &'a SendText,
    pub active_baud: BaudRate,
}

/// Compose the screen for the current state
pub fn draw<const N: usize>(screen: &mut Screen, view: &View<'_, N>) {
    screen.clear();

    match view.state {
        State::Receiving => draw_log(screen, view.log, false),
        State::Scrolling => draw_log(screen, view.log, true),
        State::BaudPicker { cursor } => draw_baud_picker(screen, cursor, view.active_baud),
        State::CharacterEntry { cursor } => draw_keyboard(screen, cursor, view.compose),
        State::ErrorOverlay { kind, .. } => {
            screen.set_centered(3, "ERROR");
            screen.highlight_row(3);
            screen.set_centered(4, kind.message());
        }
    }
}

/// Boot splash, shown until the first redraw
pub fn draw_splash(screen: &mut Screen, baud: u32) {
    screen.clear();
    screen.set_centered(2, "LINETAP");
    screen.set_centered(3, "serial bridge");

    let mut row = Row::new();
    let _ = write!(row, "{} baud", baud);
    screen.set_centered(5, &row);
}

fn draw_log<const N: usize>(screen: &mut Screen, log: &RingLog<N>, scrolling: bool) {
    let rows = PAGE_LINES.min(SCREEN_ROWS);
    for (row, line) in log.window(rows).enumerate() {
        screen.set_line(row, line.as_str());
    }
    if scrolling {
        screen.highlight_row(rows - 1);
    }
}

fn draw_baud_picker(screen: &mut Screen, cursor: u8, active: BaudRate) {
    for (index, rate) in BAUD_RATES.iter().enumerate().take(SCREEN_ROWS) {
        let marker = if index == active.index() { '*' } else { ' ' };
        let mut row = Row::new();
        let _ = write!(row, "{} {:>6}", marker, rate);
        screen.set_line(index, &row);
    }
    screen.highlight_row(cursor as usize);
}

fn draw_keyboard(screen: &mut Screen, cursor: u8, compose: &SendText) {
    let mut header = Row::new();
    let _ = write!(header, "Send {:>2}/{}", compose.len(), SEND_CAPACITY);
    screen.set_line(0, &header);

    // Show the end of the buffer when it is wider than the screen
    let text = compose.as_str();
    let start = text.len().saturating_sub(SCREEN_COLS);
    screen.set_line(1, &text[start..]);

    let (strip, selected) = key_strip(cursor as usize);
    screen.set_line(4, &strip);
    if let Some((from, to)) = selected {
        screen.set_highlight(4, from, to);
    }

    screen.set_centered(6, Key::at(cursor as usize).label());
}

/// Labels around the cursor and the column span of the selected one
fn key_strip(cursor: usize) -> (Row, Option<(u8, u8)>) {
    let mut strip = Row::new();
    let mut selected = None;

    for offset in 0..=2 * STRIP_RADIUS {
        let index = (cursor + PALETTE_LEN + offset - STRIP_RADIUS) % PALETTE_LEN;
        if offset > 0 {
            let _ = strip.push(' ');
        }
        let from = strip.len() as u8;
        let _ = strip.push_str(Key::at(index).label());
        if offset == STRIP_RADIUS {
            selected = Some((from, strip.len() as u8));
        }
    }

    (strip, selected)
}
