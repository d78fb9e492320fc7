pub mod configuration;
pub mod device;
pub mod identity;
pub mod runtime;
pub mod sequencer;
pub mod telemetry;
