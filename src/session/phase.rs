//! Onboarding phase — derived, never stored.

use serde::{Deserialize, Serialize};

use super::model::{Business, BusinessProfile};

/// Progress of the onboarding session.
///
/// Progresses linearly: Collecting → ProfileReady → Saved →
/// WhatsAppConnecting → Connected. A phase value is always computed from the
/// session fields by [`Phase::derive`]; it is never persisted on its own, so
/// stored phase and actual state cannot diverge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Collecting,
    ProfileReady,
    Saved,
    WhatsAppConnecting,
    Connected,
}

impl Phase {
    /// Compute the phase from the current session fields.
    pub fn derive(
        profile: Option<&BusinessProfile>,
        business: Option<&Business>,
        connecting: bool,
    ) -> Phase {
        match business {
            Some(b) if b.whatsapp_connected => Phase::Connected,
            Some(_) if connecting => Phase::WhatsAppConnecting,
            Some(_) => Phase::Saved,
            None => match profile {
                Some(p) if p.is_complete() => Phase::ProfileReady,
                _ => Phase::Collecting,
            },
        }
    }

    /// Whether the user may still type onboarding messages.
    pub fn input_enabled(&self) -> bool {
        matches!(self, Phase::Collecting | Phase::ProfileReady)
    }

    /// Whether the save action is available.
    pub fn can_save(&self) -> bool {
        matches!(self, Phase::ProfileReady)
    }

    /// Whether the WhatsApp connect action is available.
    pub fn can_connect(&self) -> bool {
        matches!(self, Phase::Saved)
    }

    /// Whether onboarding is fully done.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Connected)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Collecting => "collecting",
            Self::ProfileReady => "profile_ready",
            Self::Saved => "saved",
            Self::WhatsAppConnecting => "whats_app_connecting",
            Self::Connected => "connected",
        };
        write!(f, "{s}")
    }
}
