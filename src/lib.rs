//! Deeplinker - device-aware URL shortener core
//!
//! This library provides the link resolution and analytics core of a
//! URL-shortening service: alias generation and lifecycle, device-aware
//! redirect selection, crawler preview rendering, click recording, and
//! aggregate analytics over the click log.
//!
//! # Architecture
//! - `storage`: SeaORM access layer over the embedded relational store
//! - `services`: link registry, device classifier, redirect resolver,
//!   click recorder, analytics aggregator, preview renderer
//! - `config`: TOML + environment configuration
//! - `system`: logging initialization
//! - `utils`: alias generation and URL validation
//!
//! The HTTP layer is deliberately absent; callers embed these services
//! behind their own framework wiring.

pub mod config;
pub mod errors;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
