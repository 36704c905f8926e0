#![warn(clippy::all, rust_2018_idioms)]
//! egui front end of Roster: one page listing users, with a create/edit form
//! and delete confirmation, backed by `roster-business`.

pub mod app;
pub mod state;
pub mod utils;
pub mod widgets;

pub use app::RosterApp;
