//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in carpet-core, written against `embedded-hal` 1.0 so any HAL can
//! supply the bus and pins:
//!
//! - MCP3008 8-channel ADC for the pressure pads (SPI)
//! - BME280 temperature, humidity and pressure sensor (I2C)
//! - Three-pin RGB indicator LED
//! - Motion detector input
//! - SH1106 OLED panel (I2C) behind the `TextDisplay` trait

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod display;
pub mod indicator;
pub mod sensor;
