#![cfg_attr(not(test), no_std)]

pub mod calendar;
pub mod config;
pub mod error;
pub mod face;
pub mod input;
pub mod layer;
pub mod moon;
pub mod sprite;

#[cfg(feature = "esp32s3")]
pub mod wiring;

#[cfg(feature = "devkit-esp32s3-disp128")]
pub mod display;
