//! BotBuilder — conversational WhatsApp storefront onboarding.

pub mod api;
pub mod auth;
pub mod config;
pub mod connect;
pub mod error;
pub mod i18n;
pub mod session;
pub mod store;
