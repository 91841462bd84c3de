//! # Feature: Prayer Requests
//!
//! Admins point a guild at a public channel and a private log channel. Members press a
//! persistent button, fill in a modal, and the request is relayed only to the log channel.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.5.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.1.0: Log channel stored per guild instead of a single environment value
//! - 1.0.0: Button, modal and relay

pub mod components;
pub mod setup;
pub mod store;
pub mod submission;

pub use components::{call_to_action, PRAYER_BUTTON, PRAYER_BUTTON_ID, PRAYER_MODAL, PRAYER_MODAL_ID};
pub use setup::{parse_setup_args, SetupArgs, SETUP_COMMAND, SETUP_USAGE};
pub use store::{GuildConfigStore, GuildPrayerConfig, MemoryConfigStore};
pub use submission::PrayerSubmission;
