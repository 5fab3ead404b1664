//! Menu and authentication state machine.
//!
//! This module is the decision core of the controller: given the current
//! mode, the PIN entry buffer, and the credential snapshot, it maps one
//! key press to a mode transition plus a list of [`Effect`]s. It performs
//! no I/O and never sleeps, which keeps every access-control decision
//! unit-testable without a runtime; the controller task executes the
//! effects against real devices.
//!
//! # Modes
//!
//! - `MainMenu`: top-level choice between unlock, settings, and exit
//! - `UnlockEntry`: masked PIN entry for a door-open attempt
//! - `SettingsMenu`: choice of which credential to change
//! - `VerifyMaster`: master re-authentication guarding a change
//! - `ChangeCredential`: masked entry of the replacement code
//! - `SystemLocked`: exited state; only a valid credential re-enters the menu
//!
//! # Mode transitions
//!
//! - MainMenu → UnlockEntry (`1`) / SettingsMenu (`2`) / SystemLocked (`3`)
//! - UnlockEntry → MainMenu (on confirm, whatever the outcome, or cancel)
//! - SettingsMenu → VerifyMaster (`A`/`B`) / MainMenu (`C`)
//! - VerifyMaster → ChangeCredential (verified) / SettingsMenu (failed or cancel)
//! - ChangeCredential → SettingsMenu (accepted, rejected, or cancel)
//! - SystemLocked → MainMenu (valid credential or cancel); stays on a bad code

use keylock_core::constants::{
    MESSAGE_HOLD_MS, MIN_REPLACEMENT_LENGTH, MSG_ACCESS_GRANTED, MSG_ENTER_NEW_CODE,
    MSG_GUEST_CHANGED, MSG_GUEST_PASS_USED, MSG_MASTER_CHANGED, MSG_MIN_DIGITS,
    MSG_SYSTEM_UNLOCKED, MSG_WRONG_PASSWORD, PROMPT_HOLD_MS,
};
use keylock_core::types::{Credential, CredentialKind, Key, PinBuffer};
use keylock_hardware::IndicatorChannel;
use keylock_store::CredentialSet;
use std::fmt;
use std::time::Duration;

/// The menu mode the controller is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Top-level menu.
    MainMenu,

    /// Masked PIN entry for a door-open attempt.
    UnlockEntry,

    /// Credential-change submenu.
    SettingsMenu,

    /// Master re-authentication before changing `target`.
    VerifyMaster { target: CredentialKind },

    /// Entry of the replacement code for `kind`.
    ChangeCredential { kind: CredentialKind },

    /// The menu system has been exited; a valid credential re-enters it.
    SystemLocked,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::MainMenu => write!(f, "MainMenu"),
            Mode::UnlockEntry => write!(f, "UnlockEntry"),
            Mode::SettingsMenu => write!(f, "SettingsMenu"),
            Mode::VerifyMaster { target } => write!(f, "VerifyMaster({target})"),
            Mode::ChangeCredential { kind } => write!(f, "ChangeCredential({kind})"),
            Mode::SystemLocked => write!(f, "SystemLocked"),
        }
    }
}

/// A side effect the controller task must execute after a key press.
///
/// Effects are executed in order; the screen for the (possibly new) mode
/// is redrawn after the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Show a transient message, holding it on screen for `hold` before
    /// the next effect runs. The message stays visible until something
    /// else draws over it.
    ShowMessage { text: &'static str, hold: Duration },

    /// Flash an indicator lamp through its grant pattern.
    FlashIndicator(IndicatorChannel),

    /// Energise the lock for the unlock window, then secure it again.
    CycleLock,

    /// Write the credential snapshot to durable storage.
    Persist,
}

impl Effect {
    fn message(text: &'static str) -> Self {
        Effect::ShowMessage {
            text,
            hold: Duration::from_millis(MESSAGE_HOLD_MS),
        }
    }
}

/// Outcome of checking an entry against the credential snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verification {
    Master,
    Guest,
    GuestAlreadyUsed,
    NoMatch,
}

/// The pure menu/authentication state machine.
///
/// Owns the in-memory credential snapshot; the controller persists it
/// whenever a [`Effect::Persist`] is emitted.
#[derive(Debug, Clone)]
pub struct MenuState {
    mode: Mode,
    buffer: PinBuffer,
    credentials: CredentialSet,
}

impl MenuState {
    /// Start in the main menu with the given credential snapshot.
    pub fn new(credentials: CredentialSet) -> Self {
        Self {
            mode: Mode::MainMenu,
            buffer: PinBuffer::new(),
            credentials,
        }
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Current PIN entry buffer.
    pub fn buffer(&self) -> &PinBuffer {
        &self.buffer
    }

    /// Current credential snapshot.
    pub fn credentials(&self) -> &CredentialSet {
        &self.credentials
    }

    /// Process one key press.
    ///
    /// Returns the effects the controller must execute, in order. Keys
    /// with no meaning in the current mode are absorbed silently.
    pub fn handle_key(&mut self, key: Key) -> Vec<Effect> {
        match self.mode {
            Mode::MainMenu => self.handle_main_menu(key),
            Mode::UnlockEntry => self.handle_unlock_entry(key),
            Mode::SettingsMenu => self.handle_settings_menu(key),
            Mode::VerifyMaster { target } => self.handle_verify_master(key, target),
            Mode::ChangeCredential { kind } => self.handle_change_credential(key, kind),
            Mode::SystemLocked => self.handle_system_locked(key),
        }
    }

    fn handle_main_menu(&mut self, key: Key) -> Vec<Effect> {
        match key {
            Key::Digit(1) => self.enter(Mode::UnlockEntry),
            Key::Digit(2) => self.enter(Mode::SettingsMenu),
            Key::Digit(3) => self.enter(Mode::SystemLocked),
            _ => {}
        }
        Vec::new()
    }

    fn handle_unlock_entry(&mut self, key: Key) -> Vec<Effect> {
        match key {
            Key::Digit(d) => {
                self.buffer.push(d);
                Vec::new()
            }
            Key::Delete => {
                self.buffer.pop_digit();
                Vec::new()
            }
            Key::Cancel => {
                self.enter(Mode::MainMenu);
                Vec::new()
            }
            Key::Confirm => {
                // The lock cycle runs before the feedback message and
                // flash: the door must open the moment access is granted.
                let effects = match self.verify_entry() {
                    Verification::Master => vec![
                        Effect::CycleLock,
                        Effect::message(MSG_ACCESS_GRANTED),
                        Effect::FlashIndicator(IndicatorChannel::Master),
                    ],
                    Verification::Guest => {
                        self.credentials.consume_guest();
                        vec![
                            Effect::Persist,
                            Effect::CycleLock,
                            Effect::message(MSG_ACCESS_GRANTED),
                            Effect::FlashIndicator(IndicatorChannel::Guest),
                        ]
                    }
                    Verification::GuestAlreadyUsed => vec![Effect::message(MSG_GUEST_PASS_USED)],
                    Verification::NoMatch => vec![Effect::message(MSG_WRONG_PASSWORD)],
                };
                self.enter(Mode::MainMenu);
                effects
            }
            _ => Vec::new(),
        }
    }

    fn handle_settings_menu(&mut self, key: Key) -> Vec<Effect> {
        match key {
            Key::A => self.enter(Mode::VerifyMaster {
                target: CredentialKind::Master,
            }),
            Key::B => self.enter(Mode::VerifyMaster {
                target: CredentialKind::Guest,
            }),
            Key::Cancel => self.enter(Mode::MainMenu),
            _ => {}
        }
        Vec::new()
    }

    fn handle_verify_master(&mut self, key: Key, target: CredentialKind) -> Vec<Effect> {
        match key {
            Key::Digit(d) => {
                self.buffer.push(d);
                Vec::new()
            }
            Key::Delete => {
                self.buffer.pop_digit();
                Vec::new()
            }
            Key::Cancel => {
                self.enter(Mode::SettingsMenu);
                Vec::new()
            }
            Key::Confirm => {
                if self.credentials.master.matches(self.buffer.as_str()) {
                    self.enter(Mode::ChangeCredential { kind: target });
                    vec![Effect::ShowMessage {
                        text: MSG_ENTER_NEW_CODE,
                        hold: Duration::from_millis(PROMPT_HOLD_MS),
                    }]
                } else {
                    self.enter(Mode::SettingsMenu);
                    vec![Effect::message(MSG_WRONG_PASSWORD)]
                }
            }
            _ => Vec::new(),
        }
    }

    fn handle_change_credential(&mut self, key: Key, kind: CredentialKind) -> Vec<Effect> {
        match key {
            Key::Digit(d) => {
                self.buffer.push(d);
                Vec::new()
            }
            Key::Delete => {
                self.buffer.pop_digit();
                Vec::new()
            }
            Key::Cancel => {
                self.enter(Mode::SettingsMenu);
                Vec::new()
            }
            Key::Confirm => {
                if self.buffer.len() < MIN_REPLACEMENT_LENGTH {
                    self.enter(Mode::SettingsMenu);
                    return vec![Effect::message(MSG_MIN_DIGITS)];
                }
                match Credential::new(self.buffer.as_str()) {
                    Ok(credential) => {
                        self.credentials.set_credential(kind, credential);
                        self.enter(Mode::SettingsMenu);
                        let text = match kind {
                            CredentialKind::Master => MSG_MASTER_CHANGED,
                            CredentialKind::Guest => MSG_GUEST_CHANGED,
                        };
                        vec![Effect::Persist, Effect::message(text)]
                    }
                    // The buffer only ever holds 0-5 digits, so this arm
                    // is unreachable; treat it like a length failure.
                    Err(_) => {
                        self.enter(Mode::SettingsMenu);
                        vec![Effect::message(MSG_MIN_DIGITS)]
                    }
                }
            }
            _ => Vec::new(),
        }
    }

    fn handle_system_locked(&mut self, key: Key) -> Vec<Effect> {
        match key {
            Key::Digit(d) => {
                self.buffer.push(d);
                Vec::new()
            }
            Key::Delete => {
                self.buffer.pop_digit();
                Vec::new()
            }
            Key::Cancel => {
                self.enter(Mode::MainMenu);
                Vec::new()
            }
            Key::Confirm => match self.verify_entry() {
                Verification::Master => {
                    self.enter(Mode::MainMenu);
                    vec![
                        Effect::message(MSG_SYSTEM_UNLOCKED),
                        Effect::FlashIndicator(IndicatorChannel::Master),
                    ]
                }
                Verification::Guest => {
                    self.credentials.consume_guest();
                    self.enter(Mode::MainMenu);
                    vec![
                        Effect::Persist,
                        Effect::message(MSG_SYSTEM_UNLOCKED),
                        Effect::FlashIndicator(IndicatorChannel::Guest),
                    ]
                }
                Verification::GuestAlreadyUsed => {
                    self.buffer.clear();
                    vec![Effect::message(MSG_GUEST_PASS_USED)]
                }
                Verification::NoMatch => {
                    self.buffer.clear();
                    vec![Effect::message(MSG_WRONG_PASSWORD)]
                }
            },
            _ => Vec::new(),
        }
    }

    fn verify_entry(&self) -> Verification {
        let entry = self.buffer.as_str();
        if self.credentials.master.matches(entry) {
            Verification::Master
        } else if self.credentials.guest.matches(entry) {
            if self.credentials.guest_used {
                Verification::GuestAlreadyUsed
            } else {
                Verification::Guest
            }
        } else {
            Verification::NoMatch
        }
    }

    fn enter(&mut self, mode: Mode) {
        self.mode = mode;
        self.buffer.clear();
    }
}
