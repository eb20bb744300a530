// Copyright 2025 the SliceView Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Select modes and the modifier keys that choose them.

bitflags::bitflags! {
    /// Keyboard modifiers held during a pointer or key event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift key.
        const SHIFT   = 0b0000_0001;
        /// Control key.
        const CONTROL = 0b0000_0010;
        /// Alt / Option key.
        const ALT     = 0b0000_0100;
        /// Meta / Command / Super key.
        const META    = 0b0000_1000;
    }
}

/// How a selection update treats the existing selection.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SelectMode {
    /// Leave the selection untouched.
    NoSelect,
    /// Clear the selection and select only the target.
    #[default]
    SelectOne,
    /// Extend the contiguous selected run so it reaches the target.
    ExtendContinuous,
    /// Toggle the target in or out of the selection.
    ExtendOne,
    /// Remove the target from the selection.
    Unselect,
    /// Add the target without requesting a notification.
    SelectQuiet,
    /// Remove the target without requesting a notification.
    UnselectQuiet,
}

impl SelectMode {
    /// Resolves the select mode for a click or key press with the given modifiers.
    ///
    /// Shift extends the continuous run; Control or Meta toggles a single index.
    #[must_use]
    pub fn from_modifiers(modifiers: Modifiers) -> Self {
        if modifiers.contains(Modifiers::SHIFT) {
            Self::ExtendContinuous
        } else if modifiers.intersects(Modifiers::CONTROL | Modifiers::META) {
            Self::ExtendOne
        } else {
            Self::SelectOne
        }
    }
}
