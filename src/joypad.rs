//! Joypad driver: polls both pad ports and exposes them in RetroPad terms.

use crate::hal::{PadButtons, PadHal};

/// Number of pad ports.
pub const MAX_PADS: usize = 2;

const STICKS: usize = 2;
const AXES_PER_STICK: usize = 2;

/// RetroPad button ids. The discriminant is the bit index in a pad's button mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RetroButton {
    B = 0,
    Y = 1,
    Select = 2,
    Start = 3,
    Up = 4,
    Down = 5,
    Left = 6,
    Right = 7,
    A = 8,
    X = 9,
    L = 10,
    R = 11,
    L2 = 12,
    R2 = 13,
    L3 = 14,
    R3 = 15,
}

impl RetroButton {
    /// Bit of this button in a pad's button mask.
    pub fn bit(self) -> u16 {
        1 << self as u8
    }
}

const BUTTON_MAP: [(PadButtons, RetroButton); 16] = [
    (PadButtons::LEFT, RetroButton::Left),
    (PadButtons::DOWN, RetroButton::Down),
    (PadButtons::RIGHT, RetroButton::Right),
    (PadButtons::UP, RetroButton::Up),
    (PadButtons::START, RetroButton::Start),
    (PadButtons::SELECT, RetroButton::Select),
    (PadButtons::TRIANGLE, RetroButton::X),
    (PadButtons::SQUARE, RetroButton::Y),
    (PadButtons::CROSS, RetroButton::B),
    (PadButtons::CIRCLE, RetroButton::A),
    (PadButtons::R1, RetroButton::R),
    (PadButtons::L1, RetroButton::L),
    (PadButtons::R2, RetroButton::R2),
    (PadButtons::L2, RetroButton::L2),
    (PadButtons::R3, RetroButton::R3),
    (PadButtons::L3, RetroButton::L3),
];

/// One half of an analog axis. Axes 0/1 are the left stick X/Y, 2/3 the right stick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisBinding {
    /// Values below center.
    Negative(u8),
    /// Values above center.
    Positive(u8),
}

/// What a frontend action is bound to on a pad.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bind {
    pub button: Option<RetroButton>,
    pub axis: Option<AxisBinding>,
}

/// Normalize a raw stick byte (0x80 centered) to a signed 16-bit axis value.
pub fn analog_to_i16(raw: u8) -> i16 {
    if raw == 0 {
        return -0x7fff;
    }
    (i32::from(raw) * 0x0101 - 0x8000) as i16
}

/// Operations the frontend performs on a joypad driver.
pub trait JoypadDriver {
    /// Refresh every port from the hardware.
    fn poll(&mut self);
    /// Whether `button` is held on `port`.
    fn button(&self, port: usize, button: RetroButton) -> bool;
    /// Value of one half-axis, 0 unless the axis leans that way.
    fn axis(&self, port: usize, axis: AxisBinding) -> i16;
    /// Mask of `binds` indices currently active on `port`.
    fn state(&self, port: usize, binds: &[Bind], threshold: f32) -> u16;
    /// Whether `port` exists and has any button held.
    fn query_pad(&self, port: usize) -> bool;
    fn rumble(&mut self, port: usize, strength: u16) -> bool;
    fn name(&self, port: usize) -> &'static str;
}

/// Joypad driver for the two console pad ports.
#[derive(Debug)]
pub struct PsxJoypad<P: PadHal> {
    hal: P,
    buttons: [u16; MAX_PADS],
    analog: [[[i16; AXES_PER_STICK]; STICKS]; MAX_PADS],
}

impl<P: PadHal> PsxJoypad<P> {
    pub fn init(hal: P) -> Self {
        tracing::info!(ports = MAX_PADS, "initializing joypads");
        Self {
            hal,
            buttons: [0; MAX_PADS],
            analog: [[[0; AXES_PER_STICK]; STICKS]; MAX_PADS],
        }
    }

    /// Raw RetroPad mask of `port` from the last poll.
    pub fn buttons(&self, port: usize) -> u16 {
        self.buttons.get(port).copied().unwrap_or(0)
    }

    fn axis_value(&self, port: usize, axis: u8) -> i16 {
        let axis = usize::from(axis);
        if axis >= STICKS * AXES_PER_STICK {
            return 0;
        }
        self.analog
            .get(port)
            .map_or(0, |sticks| sticks[axis / AXES_PER_STICK][axis % AXES_PER_STICK])
    }
}

impl<P: PadHal> JoypadDriver for PsxJoypad<P> {
    fn poll(&mut self) {
        for port in 0..MAX_PADS {
            let pad = self.hal.poll_pad(port & 1);
            self.buttons[port] = BUTTON_MAP
                .iter()
                .filter(|(raw, _)| pad.buttons.contains(*raw))
                .fold(0, |mask, (_, id)| mask | id.bit());
            for (stick, raw) in pad.analog.iter().enumerate() {
                for (axis, &v) in raw.iter().enumerate() {
                    self.analog[port][stick][axis] = analog_to_i16(v);
                }
            }
        }
    }

    fn button(&self, port: usize, button: RetroButton) -> bool {
        self.buttons(port) & button.bit() != 0
    }

    fn axis(&self, port: usize, axis: AxisBinding) -> i16 {
        match axis {
            AxisBinding::Negative(a) => self.axis_value(port, a).min(0),
            AxisBinding::Positive(a) => self.axis_value(port, a).max(0),
        }
    }

    fn state(&self, port: usize, binds: &[Bind], threshold: f32) -> u16 {
        if port >= MAX_PADS {
            return 0;
        }
        let mut mask = 0u16;
        for (i, bind) in binds.iter().take(16).enumerate() {
            let pressed = bind.button.is_some_and(|b| self.button(port, b));
            let tilted = bind.axis.is_some_and(|a| {
                f32::from(self.axis(port, a)).abs() / 32768.0 > threshold
            });
            if pressed || tilted {
                mask |= 1 << i;
            }
        }
        mask
    }

    fn query_pad(&self, port: usize) -> bool {
        port < MAX_PADS && self.buttons[port] != 0
    }

    fn rumble(&mut self, _port: usize, _strength: u16) -> bool {
        false
    }

    fn name(&self, _port: usize) -> &'static str {
        "PSX Controller"
    }
}
