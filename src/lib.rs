#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod ai;
mod attack;
mod bitboard;
mod board;
mod common;
mod config;
mod game;
#[cfg(feature = "std")]
mod logging;
mod match_service;
pub mod prelude;
mod profile;
#[cfg(feature = "std")]
mod session;
mod ship;
mod store;
mod strategy;

pub use ai::*;
pub use attack::*;
pub use bitboard::{BitBoard, BitBoardError};
pub use board::*;
pub use common::*;
pub use config::*;
pub use game::*;
#[cfg(feature = "std")]
pub use logging::{init_logging, level_from};
pub use match_service::*;
pub use profile::*;
#[cfg(feature = "std")]
pub use session::*;
pub use ship::*;
pub use store::*;
pub use strategy::Strategy;
