// lib.rs - Library exports for integration tests

pub mod config;
pub mod bootstrap;
pub mod error;
pub mod models;
pub mod params;
pub mod chain;
pub mod math;
pub mod engine;
pub mod web;
