//! SessionController — drives the onboarding conversation to completion and
//! hands off a persisted business plus a connected WhatsApp number.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::api::BusinessApi;
use crate::auth::AuthSession;
use crate::config::OAuthConfig;
use crate::connect::{authorize_url, ConnectHub, ConnectSubscription};
use crate::i18n::Translator;
use crate::store::ChatStore;

use super::model::{Business, BusinessProfile, Transcript, Turn};
use super::phase::Phase;

/// Result of a `send_message` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Input was rejected without touching the transcript or the network.
    Ignored(IgnoreReason),
    /// Assistant replied; onboarding continues.
    Replied,
    /// Assistant replied and delivered a business profile.
    ProfileCaptured,
    /// The completion call failed; a fallback turn was appended and the user
    /// may retry.
    ServiceFailed,
}

/// Why a `send_message` call was a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    EmptyInput,
    RequestInFlight,
    /// Onboarding input is closed once a business exists.
    InputClosed,
    /// The session was reset while the call was in flight.
    SessionReset,
}

/// Result of a `save_business` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Ignored(SaveIgnoreReason),
    Saved,
    /// The create call failed; the profile is retained for retry.
    ServiceFailed,
}

/// Why a `save_business` call was a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveIgnoreReason {
    NoProfile,
    ProfileIncomplete,
    SaveInFlight,
    AlreadySaved,
    SessionReset,
}

/// A started WhatsApp connect handshake.
///
/// The caller opens `authorize_url` in a browser and then either awaits the
/// connection via [`SessionController::await_connection`] or tears the
/// listener down with [`SessionController::cancel_connection`]. Dropping the
/// handshake has the same effect as cancelling: the listener is
/// deregistered, the phase returns to Saved, and a new handshake may be
/// started.
pub struct WhatsAppHandshake {
    pub authorize_url: String,
    pub(crate) subscription: ConnectSubscription,
}

impl WhatsAppHandshake {
    pub fn business_id(&self) -> &str {
        self.subscription.business_id()
    }
}

#[derive(Default)]
struct SessionState {
    transcript: Transcript,
    profile: Option<BusinessProfile>,
    business: Option<Business>,
    chat_in_flight: bool,
    save_in_flight: bool,
    restored: bool,
    /// Bumped on reset so in-flight calls from the old session are discarded.
    epoch: u64,
}

/// Owns the chat transcript, derives the UI phase, and orchestrates the
/// chat-completion, persistence, and WhatsApp-connect collaborators.
pub struct SessionController {
    api: Arc<dyn BusinessApi>,
    store: Arc<dyn ChatStore>,
    translator: Arc<dyn Translator>,
    auth: AuthSession,
    hub: Arc<ConnectHub>,
    oauth: Option<OAuthConfig>,
    state: RwLock<SessionState>,
}

impl SessionController {
    pub fn new(
        api: Arc<dyn BusinessApi>,
        store: Arc<dyn ChatStore>,
        translator: Arc<dyn Translator>,
        auth: AuthSession,
        hub: Arc<ConnectHub>,
        oauth: Option<OAuthConfig>,
    ) -> Self {
        let transcript = Transcript::seeded(translator.greeting());
        Self {
            api,
            store,
            translator,
            auth,
            hub,
            oauth,
            state: RwLock::new(SessionState {
                transcript,
                ..Default::default()
            }),
        }
    }

    /// Load a previously persisted transcript for the user.
    ///
    /// Applied at most once per controller lifetime; a second call is a
    /// no-op. Saved chats holding only the seed turn are ignored. Failure is
    /// logged, never surfaced — restoration is a convenience.
    pub async fn restore(&self) -> Transcript {
        let already = {
            let mut st = self.state.write().await;
            let already = st.restored;
            st.restored = true;
            already
        };
        if !already {
            match self.store.load(&self.auth.user_id).await {
                Ok(Some(saved)) if saved.messages.len() > 1 => {
                    let mut st = self.state.write().await;
                    st.transcript = Transcript::from_turns(saved.messages);
                    tracing::info!(
                        turns = st.transcript.len(),
                        "Restored previous onboarding chat"
                    );
                }
                Ok(_) => tracing::debug!("No previous chat to restore"),
                Err(e) => tracing::debug!(error = %e, "Chat restore skipped"),
            }
        }
        self.state.read().await.transcript.clone()
    }

    /// Append a user turn and run one completion over the full transcript.
    ///
    /// The user turn is appended optimistically and is never rolled back; a
    /// service failure only suppresses the expected assistant reply and
    /// appends a fixed fallback turn instead.
    pub async fn send_message(&self, text: &str) -> SendOutcome {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return SendOutcome::Ignored(IgnoreReason::EmptyInput);
        }

        let (messages, epoch) = {
            let mut st = self.state.write().await;
            if st.chat_in_flight {
                return SendOutcome::Ignored(IgnoreReason::RequestInFlight);
            }
            if st.business.is_some() {
                return SendOutcome::Ignored(IgnoreReason::InputClosed);
            }
            st.transcript.push(Turn::user(trimmed));
            st.chat_in_flight = true;
            (st.transcript.turns().to_vec(), st.epoch)
        };

        let result = self.api.chat(&messages).await;

        let (snapshot, outcome) = {
            let mut st = self.state.write().await;
            if st.epoch != epoch {
                tracing::debug!("Discarding completion that outlived a reset");
                return SendOutcome::Ignored(IgnoreReason::SessionReset);
            }
            st.chat_in_flight = false;
            match result {
                Ok(reply) => {
                    st.transcript.push(Turn::assistant(reply.reply));
                    let mut outcome = SendOutcome::Replied;
                    if reply.complete {
                        if let Some(profile) = reply.business_data {
                            if !profile.is_complete() {
                                tracing::warn!(
                                    "Profile payload is missing required fields; save stays gated"
                                );
                            }
                            st.profile = Some(profile);
                            outcome = SendOutcome::ProfileCaptured;
                        }
                    }
                    (st.transcript.turns().to_vec(), outcome)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Chat completion failed");
                    st.transcript
                        .push(Turn::assistant(self.translator.chat_failed()));
                    return SendOutcome::ServiceFailed;
                }
            }
        };

        self.persist(snapshot, None).await;
        outcome
    }

    /// Persist the captured profile as a business.
    ///
    /// No-op without a complete profile, while a save is in flight, or once
    /// a business already exists. On failure the profile is retained so the
    /// user may retry.
    pub async fn save_business(&self) -> SaveOutcome {
        let (profile, epoch) = {
            let mut st = self.state.write().await;
            if st.business.is_some() {
                return SaveOutcome::Ignored(SaveIgnoreReason::AlreadySaved);
            }
            if st.save_in_flight {
                return SaveOutcome::Ignored(SaveIgnoreReason::SaveInFlight);
            }
            let Some(profile) = st.profile.clone() else {
                return SaveOutcome::Ignored(SaveIgnoreReason::NoProfile);
            };
            if !profile.is_complete() {
                return SaveOutcome::Ignored(SaveIgnoreReason::ProfileIncomplete);
            }
            st.save_in_flight = true;
            (profile, st.epoch)
        };

        let result = self.api.create_business(&profile, &self.auth.user_id).await;

        let (snapshot, business_id) = {
            let mut st = self.state.write().await;
            if st.epoch != epoch {
                tracing::debug!("Discarding business save that outlived a reset");
                return SaveOutcome::Ignored(SaveIgnoreReason::SessionReset);
            }
            st.save_in_flight = false;
            match result {
                Ok(business) => {
                    st.transcript.push(Turn::assistant(
                        self.translator.saved_confirmation(&business.name),
                    ));
                    let id = business.id.clone();
                    st.business = Some(business);
                    (st.transcript.turns().to_vec(), id)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Business save failed");
                    st.transcript
                        .push(Turn::assistant(self.translator.save_failed()));
                    return SaveOutcome::ServiceFailed;
                }
            }
        };

        self.persist(snapshot, Some(business_id)).await;
        SaveOutcome::Saved
    }

    /// Start the WhatsApp OAuth handshake.
    ///
    /// Returns `None` when the action is unavailable: OAuth not configured,
    /// no saved business, already connected, or a handshake already pending.
    pub async fn connect_whatsapp(&self) -> Option<WhatsAppHandshake> {
        let Some(oauth) = self.oauth.as_ref() else {
            tracing::debug!("WhatsApp connect disabled: no OAuth client configured");
            return None;
        };

        let st = self.state.read().await;
        let Some(business) = st.business.as_ref() else {
            tracing::debug!("WhatsApp connect unavailable: no saved business");
            return None;
        };
        if business.whatsapp_connected {
            tracing::debug!(business_id = %business.id, "WhatsApp already connected");
            return None;
        }
        if self.hub.has_pending(&business.id) {
            tracing::debug!(business_id = %business.id, "Connect handshake already pending");
            return None;
        }

        let url = authorize_url(oauth, &business.id);
        let subscription = self.hub.subscribe(&business.id);
        Some(WhatsAppHandshake {
            authorize_url: url,
            subscription,
        })
    }

    /// Wait for the handshake's connected signal.
    ///
    /// On receipt, marks the business connected (phase becomes Connected)
    /// and returns true. Returns false if the subscription was cancelled,
    /// replaced, or no longer matches the held business.
    pub async fn await_connection(&self, handshake: WhatsAppHandshake) -> bool {
        match handshake.subscription.connected().await {
            Ok(signal) => {
                let mut st = self.state.write().await;
                match st.business.as_mut() {
                    Some(b) if b.id == signal.business_id => {
                        b.whatsapp_connected = true;
                        tracing::info!(business_id = %b.id, "WhatsApp connected");
                        true
                    }
                    _ => {
                        tracing::warn!(
                            business_id = %signal.business_id,
                            "Connected signal for a business this session no longer holds"
                        );
                        false
                    }
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "Connect handshake ended without a signal");
                false
            }
        }
    }

    /// Tear down a pending handshake without waiting for the signal.
    pub fn cancel_connection(&self, handshake: WhatsAppHandshake) {
        handshake.subscription.cancel();
    }

    /// Adopt an already-persisted business (e.g. found via the list call at
    /// startup). Closes onboarding input; no-op if one is already held.
    pub async fn attach_business(&self, business: Business) {
        let mut st = self.state.write().await;
        if st.business.is_some() {
            tracing::warn!("Session already holds a business; attach ignored");
            return;
        }
        tracing::info!(business_id = %business.id, "Adopted existing business");
        st.business = Some(business);
    }

    /// Discard profile, business, and connection state; reseed the
    /// transcript with the greeting. Always available.
    pub async fn reset(&self) {
        let snapshot = {
            let mut st = self.state.write().await;
            st.profile = None;
            st.business = None;
            st.chat_in_flight = false;
            st.save_in_flight = false;
            st.epoch += 1;
            st.transcript = Transcript::seeded(self.translator.greeting());
            st.transcript.turns().to_vec()
        };
        self.persist(snapshot, None).await;
    }

    /// Current phase, derived from the session fields. The connecting state
    /// comes from the hub's listener registry, so an abandoned handshake
    /// falls back to Saved as soon as its subscription is dropped.
    pub async fn phase(&self) -> Phase {
        let st = self.state.read().await;
        let connecting = st
            .business
            .as_ref()
            .is_some_and(|b| self.hub.has_pending(&b.id));
        Phase::derive(st.profile.as_ref(), st.business.as_ref(), connecting)
    }

    pub async fn transcript(&self) -> Transcript {
        self.state.read().await.transcript.clone()
    }

    pub async fn profile(&self) -> Option<BusinessProfile> {
        self.state.read().await.profile.clone()
    }

    pub async fn business(&self) -> Option<Business> {
        self.state.read().await.business.clone()
    }

    /// Best-effort transcript persistence; failures are logged, not surfaced.
    async fn persist(&self, messages: Vec<Turn>, business_id: Option<String>) {
        if let Err(e) = self
            .store
            .save(&self.auth.user_id, &messages, business_id.as_deref())
            .await
        {
            tracing::warn!(error = %e, "Chat save skipped");
        }
    }
}

// Note: SessionController behavior is covered by tests/session_flow.rs with
// mocked BusinessApi and ChatStore collaborators.
