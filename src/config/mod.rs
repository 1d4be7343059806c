//! # Configuration Module
//!
//! Send, broker and file-level configuration shared by the library and the
//! `mbox` binary.

pub mod config;

pub use config::{AppConfig, BrokerConfig, PictureFraming, SendConfig};
