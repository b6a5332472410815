//! Conversational business-onboarding session: transcript, phase, controller.

pub mod controller;
pub mod model;
pub mod phase;

pub use controller::{
    IgnoreReason, SaveIgnoreReason, SaveOutcome, SendOutcome, SessionController,
    WhatsAppHandshake,
};
pub use model::{Business, BusinessProfile, Role, Transcript, Turn};
pub use phase::Phase;
