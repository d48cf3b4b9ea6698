//! Sensor acquisition layer.
//!
//! One sensor is supported today: the HS300x relative-humidity/temperature
//! peripheral, driven over the bus transaction driver. The acquisition
//! sequence and the fixed-point decoding both live in [`hs300x`].
//!
//! Acquisition failures are bus failures: the sequencer adds no failure modes
//! of its own and propagates [`crate::bus::error::Error`] untouched. After a
//! failed transaction the bus binding is gone and the driver must be
//! reinitialized before the sensor is usable again.

/// HS300x humidity/temperature sensor sequencer and decoder.
pub mod hs300x;
