// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input event types delivered to item handlers.

use kurbo::{Point, Vec2};

bitflags::bitflags! {
    /// Keyboard modifiers held while an event occurred.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Either shift key.
        const SHIFT = 1 << 0;
        /// Either control key.
        const CTRL  = 1 << 1;
        /// Either alt/option key.
        const ALT   = 1 << 2;
        /// Either logo/command key.
        const LOGO  = 1 << 3;
    }
}

bitflags::bitflags! {
    /// Mouse buttons held during a motion event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MouseButtons: u8 {
        /// Primary button.
        const LEFT   = 1 << 0;
        /// Secondary button.
        const RIGHT  = 1 << 1;
        /// Wheel button.
        const MIDDLE = 1 << 2;
    }
}

/// A single mouse button.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
    /// Wheel button.
    Middle,
    /// Any other button, by platform index.
    Other(u16),
}

impl MouseButton {
    /// The held-button flag for this button, empty for [`MouseButton::Other`].
    #[must_use]
    pub fn flag(self) -> MouseButtons {
        match self {
            Self::Left => MouseButtons::LEFT,
            Self::Right => MouseButtons::RIGHT,
            Self::Middle => MouseButtons::MIDDLE,
            Self::Other(_) => MouseButtons::empty(),
        }
    }
}

/// Whether a button or key went down or up.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ButtonState {
    /// Went down.
    Pressed,
    /// Went up.
    Released,
}

/// Mouse button press or release.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MouseEvent {
    /// Pointer position in window coordinates.
    pub pos: Point,
    /// Button that changed.
    pub button: MouseButton,
    /// New state of the button.
    pub state: ButtonState,
    /// Held modifiers.
    pub modifiers: Modifiers,
    /// Timestamp in milliseconds, from the input source's clock.
    pub timestamp: u64,
}

impl MouseEvent {
    /// A press of `button` at `pos` with no modifiers.
    #[must_use]
    pub fn press(pos: Point, button: MouseButton) -> Self {
        Self {
            pos,
            button,
            state: ButtonState::Pressed,
            modifiers: Modifiers::empty(),
            timestamp: 0,
        }
    }

    /// A release of `button` at `pos` with no modifiers.
    #[must_use]
    pub fn release(pos: Point, button: MouseButton) -> Self {
        Self {
            state: ButtonState::Released,
            ..Self::press(pos, button)
        }
    }
}

/// How a motion event relates to the receiving item.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum MotionType {
    /// Ordinary movement.
    #[default]
    None,
    /// The pointer has just entered the item's area.
    Enter,
    /// The pointer has just left the item's area.
    Leave,
}

/// Pointer movement.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MotionEvent {
    /// Pointer position in window coordinates.
    pub pos: Point,
    /// Movement since the previous motion event.
    pub motion: Vec2,
    /// Enter/leave marker, set by the dispatcher for synthesized events.
    pub kind: MotionType,
    /// Held mouse buttons.
    pub buttons: MouseButtons,
    /// Held modifiers.
    pub modifiers: Modifiers,
}

impl MotionEvent {
    /// Movement to `pos` with nothing held.
    #[must_use]
    pub fn moved(pos: Point, motion: Vec2) -> Self {
        Self {
            pos,
            motion,
            kind: MotionType::None,
            buttons: MouseButtons::empty(),
            modifiers: Modifiers::empty(),
        }
    }
}

/// Scroll wheel or touchpad scroll.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WheelEvent {
    /// Pointer position in window coordinates.
    pub pos: Point,
    /// Scroll amount.
    pub offset: Vec2,
    /// Held modifiers.
    pub modifiers: Modifiers,
}

impl WheelEvent {
    /// A scroll of `offset` at `pos` with no modifiers.
    #[must_use]
    pub fn new(pos: Point, offset: Vec2) -> Self {
        Self {
            pos,
            offset,
            modifiers: Modifiers::empty(),
        }
    }
}

/// Platform key code.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyCode(pub u32);

/// Key press, repeat, or release.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KeyEvent {
    /// Key that changed.
    pub key: KeyCode,
    /// Held modifiers.
    pub modifiers: Modifiers,
    /// New state of the key.
    pub state: ButtonState,
    /// True for auto-repeated presses.
    pub repeat: bool,
}

impl KeyEvent {
    /// A non-repeated press of `key`.
    #[must_use]
    pub fn press(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
            state: ButtonState::Pressed,
            repeat: false,
        }
    }
}

/// Event category; each category has its own handler table and lock.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventCategory {
    /// [`MouseEvent`]s.
    Mouse,
    /// [`MotionEvent`]s.
    Motion,
    /// [`WheelEvent`]s.
    Wheel,
    /// [`KeyEvent`]s.
    Key,
}

impl EventCategory {
    /// All categories.
    pub const ALL: [Self; 4] = [Self::Mouse, Self::Motion, Self::Wheel, Self::Key];

    /// Name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mouse => "mouse",
            Self::Motion => "motion",
            Self::Wheel => "wheel",
            Self::Key => "key",
        }
    }

    pub(crate) const fn slot(self) -> usize {
        match self {
            Self::Mouse => 0,
            Self::Motion => 1,
            Self::Wheel => 2,
            Self::Key => 3,
        }
    }
}

/// Any input event, as batched by the input source for one tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// Button press or release.
    Mouse(MouseEvent),
    /// Pointer movement.
    Motion(MotionEvent),
    /// Scrolling.
    Wheel(WheelEvent),
    /// Keyboard input.
    Key(KeyEvent),
}

impl InputEvent {
    /// Category of this event.
    #[must_use]
    pub fn category(&self) -> EventCategory {
        match self {
            Self::Mouse(_) => EventCategory::Mouse,
            Self::Motion(_) => EventCategory::Motion,
            Self::Wheel(_) => EventCategory::Wheel,
            Self::Key(_) => EventCategory::Key,
        }
    }

    /// Pointer position, `None` for keyboard input.
    #[must_use]
    pub fn pos(&self) -> Option<Point> {
        match self {
            Self::Mouse(e) => Some(e.pos),
            Self::Motion(e) => Some(e.pos),
            Self::Wheel(e) => Some(e.pos),
            Self::Key(_) => None,
        }
    }
}

impl From<MouseEvent> for InputEvent {
    fn from(e: MouseEvent) -> Self {
        Self::Mouse(e)
    }
}

impl From<MotionEvent> for InputEvent {
    fn from(e: MotionEvent) -> Self {
        Self::Motion(e)
    }
}

impl From<WheelEvent> for InputEvent {
    fn from(e: WheelEvent) -> Self {
        Self::Wheel(e)
    }
}

impl From<KeyEvent> for InputEvent {
    fn from(e: KeyEvent) -> Self {
        Self::Key(e)
    }
}
