//! Screen layout for the two-line character display.

use crate::menu::Mode;
use keylock_core::constants::{
    LABEL_CHANGE_GUEST, LABEL_CHANGE_MASTER, LABEL_MAIN_MENU, LABEL_MAIN_MENU_HINT,
    LABEL_SETTINGS_HINT, LABEL_SETTINGS_MENU, LABEL_SYSTEM_LOCKED, LABEL_UNLOCK_ENTRY,
    LABEL_VERIFY_MASTER, MASK_CHAR,
};
use keylock_core::types::{CredentialKind, PinBuffer};

/// Compose the two display rows for a mode.
///
/// Menu modes pair a title with a hint line; entry modes pair their
/// prompt with the masked PIN buffer, one mask character per digit.
pub fn screen(mode: Mode, buffer: &PinBuffer) -> (&'static str, String) {
    match mode {
        Mode::MainMenu => (LABEL_MAIN_MENU, LABEL_MAIN_MENU_HINT.to_string()),
        Mode::SettingsMenu => (LABEL_SETTINGS_MENU, LABEL_SETTINGS_HINT.to_string()),
        Mode::UnlockEntry => (LABEL_UNLOCK_ENTRY, mask(buffer)),
        Mode::VerifyMaster { .. } => (LABEL_VERIFY_MASTER, mask(buffer)),
        Mode::ChangeCredential {
            kind: CredentialKind::Master,
        } => (LABEL_CHANGE_MASTER, mask(buffer)),
        Mode::ChangeCredential {
            kind: CredentialKind::Guest,
        } => (LABEL_CHANGE_GUEST, mask(buffer)),
        Mode::SystemLocked => (LABEL_SYSTEM_LOCKED, mask(buffer)),
    }
}

fn mask(buffer: &PinBuffer) -> String {
    std::iter::repeat_n(MASK_CHAR, buffer.len()).collect()
}
