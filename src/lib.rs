//! VCT onboarding — milestone stepper, intake form, placement, confirmation.

pub mod config;
pub mod confirmation;
pub mod driver;
pub mod error;
pub mod gateway;
pub mod intake;
pub mod session;
pub mod stepper;
pub mod store;
