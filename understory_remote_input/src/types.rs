// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types: source ids, button transitions, event kinds, capabilities, and the event payload.

use crate::state::SourceEventState;

/// Identity of an input source.
///
/// The engine keys registration and per-source event state by this id; two
/// sources with the same id are the same source.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct SourceId(pub u32);

bitflags::bitflags! {
    /// One-tick select button transition.
    ///
    /// Empty means no change since the last tick. The engine consumes the
    /// transition during dispatch and forces it back to empty once per tick.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ButtonDelta: u8 {
        /// Select went down since the last tick.
        const PRESSED  = 1 << 0;
        /// Select went up since the last tick.
        const RELEASED = 1 << 1;
    }
}

impl ButtonDelta {
    /// No transition.
    pub const NO_CHANGE: Self = Self::empty();
}

bitflags::bitflags! {
    /// Event handler capabilities of a target.
    ///
    /// A target only receives an event whose [`EventKind::capability`] it has.
    /// Ancestor searches (nearest press handler, nearest drag handler, ...)
    /// look for the first target on the ancestry with the capability.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Capabilities: u16 {
        /// Receives [`EventKind::Enter`].
        const ENTER           = 1 << 0;
        /// Receives [`EventKind::Exit`].
        const EXIT            = 1 << 1;
        /// Receives [`EventKind::Press`].
        const PRESS           = 1 << 2;
        /// Receives [`EventKind::Release`].
        const RELEASE         = 1 << 3;
        /// Receives [`EventKind::Click`].
        const CLICK           = 1 << 4;
        /// Receives [`EventKind::InitializeDrag`].
        const INITIALIZE_DRAG = 1 << 5;
        /// Receives [`EventKind::BeginDrag`].
        const BEGIN_DRAG      = 1 << 6;
        /// Receives [`EventKind::Drag`]; marks the target as draggable.
        const DRAG            = 1 << 7;
        /// Receives [`EventKind::EndDrag`].
        const END_DRAG        = 1 << 8;
        /// Receives [`EventKind::Drop`].
        const DROP            = 1 << 9;
        /// Receives [`EventKind::Scroll`].
        const SCROLL          = 1 << 10;
        /// Takes part in selection; receives [`EventKind::Deselect`].
        const SELECT          = 1 << 11;

        /// Enter and exit.
        const HOVER = Self::ENTER.bits() | Self::EXIT.bits();
        /// Press, release, and click.
        const BUTTON = Self::PRESS.bits() | Self::RELEASE.bits() | Self::CLICK.bits();
        /// The full drag lifecycle.
        const DRAGGABLE = Self::INITIALIZE_DRAG.bits()
            | Self::BEGIN_DRAG.bits()
            | Self::DRAG.bits()
            | Self::END_DRAG.bits();
    }
}

/// Kinds of events dispatched to targets.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EventKind {
    /// Pointer entered the target or one of its descendants.
    Enter,
    /// Pointer left the target and its descendants.
    Exit,
    /// Select went down over the target.
    Press,
    /// Select went up for the target that received the press.
    Release,
    /// Press and release on the same click handler.
    Click,
    /// A press landed on a draggable target; a drag may begin.
    InitializeDrag,
    /// The drag threshold was crossed.
    BeginDrag,
    /// Ongoing drag movement.
    Drag,
    /// The drag finished.
    EndDrag,
    /// A drag was released over the target.
    Drop,
    /// Scroll input while hovering.
    Scroll,
    /// The target lost selection.
    Deselect,
}

impl EventKind {
    /// Capability a target needs to receive this event.
    pub const fn capability(self) -> Capabilities {
        match self {
            Self::Enter => Capabilities::ENTER,
            Self::Exit => Capabilities::EXIT,
            Self::Press => Capabilities::PRESS,
            Self::Release => Capabilities::RELEASE,
            Self::Click => Capabilities::CLICK,
            Self::InitializeDrag => Capabilities::INITIALIZE_DRAG,
            Self::BeginDrag => Capabilities::BEGIN_DRAG,
            Self::Drag => Capabilities::DRAG,
            Self::EndDrag => Capabilities::END_DRAG,
            Self::Drop => Capabilities::DROP,
            Self::Scroll => Capabilities::SCROLL,
            Self::Deselect => Capabilities::SELECT,
        }
    }
}

/// Event payload handed to [`PointerTargets::deliver`](crate::targets::PointerTargets::deliver).
///
/// Handlers read pointer details (screen position, click count, current hit,
/// scroll delta, ...) from the source's event state.
#[derive(Debug)]
pub struct PointerEvent<'a, T> {
    /// What happened.
    pub kind: EventKind,
    /// Source that produced the event.
    pub source: SourceId,
    /// The source's event state at dispatch time.
    pub state: &'a SourceEventState<T>,
}

impl<'a, T> PointerEvent<'a, T> {
    /// Create an event payload.
    pub fn new(kind: EventKind, source: SourceId, state: &'a SourceEventState<T>) -> Self {
        Self {
            kind,
            source,
            state,
        }
    }
}
