//! **smarttab** — the core of a hotkey-triggered keyboard-grid launcher.
//!
//! A global chord toggles an overlay showing a grid of buttons laid out like
//! the keyboard (`QWERTYUIOP` / `ASDFGHJKL;` / `ZXCVBNM,.-`).  Pressing a
//! key while the overlay is up activates the button bound to it: launch an
//! application or open a folder.
//!
//! # Architecture
//!
//! * [`hotkey`] — chords and the exact-match predicate.
//! * [`reconcile`] — merging a stored [`grid::Grid`] with the evolving
//!   default [`template::Template`] without losing user edits.
//! * [`manager::ConfigManager`] — loads, reconciles and persists
//!   configuration through a [`traits::PreferenceStore`].
//! * [`launcher::Launcher`] — overlay visibility and key routing.
//! * [`ipc`] — a Unix-socket [`traits::CommandSource`] through which the
//!   host OS shim drives the launcher.
//!
//! Windows, input monitors and process launching belong to the OS shim;
//! this crate only decides *what* should happen.

pub mod binding;
pub mod command;
pub mod config;
pub mod grid;
pub mod hotkey;
pub mod ipc;
pub mod launcher;
pub mod manager;
pub mod reconcile;
pub mod store;
pub mod template;
pub mod traits;
