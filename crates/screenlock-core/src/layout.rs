//! Vertical placement of the app icon
//!
//! The icon sits high on the screen while authentication is pending and
//! drops as the error block below it grows. Offsets are in points relative
//! to the vertical center; front-ends scale them to their own units.

use crate::outcome::PromptViewState;

/// Logout is always offered as an escape hatch
pub const CAN_LOGOUT: bool = true;

const OFFSET_NO_ERROR: i16 = -470;
const OFFSET_RETRY_AND_LOGOUT: i16 = -290;
const OFFSET_ONE_ACTION: i16 = -350;
const OFFSET_NO_ACTIONS: i16 = -410;

/// Icon offset for the given view state
pub fn icon_offset(state: &PromptViewState, can_logout: bool) -> i16 {
    if !state.has_error {
        return OFFSET_NO_ERROR;
    }
    match (can_logout, state.can_retry) {
        (true, true) => OFFSET_RETRY_AND_LOGOUT,
        (true, false) | (false, true) => OFFSET_ONE_ACTION,
        (false, false) => OFFSET_NO_ACTIONS,
    }
}
