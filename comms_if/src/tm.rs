//! # Telemetry sink
//!
//! Control modules publish named values into a sink after their control computation. The sink is
//! one-way: nothing written here feeds back into control.

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A one-way output for named telemetry fields.
pub trait TmSink {
    fn put_number(&mut self, key: &str, value: f64);

    fn put_bool(&mut self, key: &str, value: bool);

    fn put_string(&mut self, key: &str, value: &str);
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Sink that discards everything written to it.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTmSink;

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl TmSink for NullTmSink {
    fn put_number(&mut self, _key: &str, _value: f64) {}

    fn put_bool(&mut self, _key: &str, _value: bool) {}

    fn put_string(&mut self, _key: &str, _value: &str) {}
}
