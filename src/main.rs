use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use botbuilder::api::{BusinessApi, HttpBusinessApi};
use botbuilder::auth::AuthSession;
use botbuilder::config::Config;
use botbuilder::connect::{callback_routes, CallbackState, ConnectHub};
use botbuilder::i18n;
use botbuilder::session::{Phase, Role, SessionController};
use botbuilder::store::{ChatStore, NullStore, SupabaseStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = Config::from_env()?;

    let user_id = std::env::var("BOTBUILDER_USER_ID")
        .unwrap_or_else(|_| uuid::Uuid::new_v4().to_string());
    let auth = AuthSession::new(user_id.clone());

    let lang = std::env::var("BOTBUILDER_LANG").unwrap_or_else(|_| "en".to_string());
    let translator = i18n::catalog_for(&lang);

    eprintln!("🤖 BotBuilder v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: {}", config.api_base_url);
    eprintln!("   User: {user_id}");

    let api: Arc<dyn BusinessApi> = Arc::new(HttpBusinessApi::new(&config.api_base_url));

    let store: Arc<dyn ChatStore> = match &config.chat_store {
        Some(store_config) => {
            eprintln!("   Chat store: {}", store_config.base_url);
            Arc::new(SupabaseStore::new(store_config))
        }
        None => {
            eprintln!("   Chat store: disabled (set SUPABASE_URL to persist chats)");
            Arc::new(NullStore)
        }
    };

    let hub = ConnectHub::new();

    // Spawn the OAuth callback server only when connect is configured.
    if config.oauth.is_some() {
        let callback_state = CallbackState {
            api: Arc::clone(&api),
            hub: Arc::clone(&hub),
        };
        let app = callback_routes(callback_state);
        let port = config.callback_port;
        eprintln!("   WhatsApp connect: enabled (callback on http://localhost:{port})");
        tokio::spawn(async move {
            let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
                .await
                .expect("Failed to bind callback port");
            tracing::info!(port, "OAuth callback server started");
            axum::serve(listener, app).await.ok();
        });
    } else {
        eprintln!("   WhatsApp connect: disabled (set WHATSAPP_CLIENT_ID to enable)");
    }

    let controller = Arc::new(SessionController::new(
        api.clone(),
        store,
        translator,
        auth,
        hub,
        config.oauth.clone(),
    ));

    // Adopt an existing business so a finished setup isn't repeated.
    match api.list_businesses(&user_id).await {
        Ok(businesses) => {
            if let Some(business) = businesses.into_iter().next() {
                eprintln!("   Existing business: {}", business.name);
                controller.attach_business(business).await;
            }
        }
        Err(e) => tracing::debug!(error = %e, "Business list skipped"),
    }

    let transcript = controller.restore().await;
    eprintln!("   Commands: /save /connect /reset /status /quit\n");
    for turn in transcript.turns() {
        print_turn(&turn.role, &turn.content);
    }

    let stdin = tokio::io::stdin();
    let reader = BufReader::new(stdin);
    let mut lines = reader.lines();

    eprint!("> ");
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            eprint!("> ");
            continue;
        }

        match line.as_str() {
            "/quit" | "/exit" => break,
            "/reset" => {
                controller.reset().await;
                let transcript = controller.transcript().await;
                if let Some(turn) = transcript.last() {
                    print_turn(&turn.role, &turn.content);
                }
            }
            "/status" => {
                let phase = controller.phase().await;
                eprintln!("Phase: {phase}");
                if let Some(business) = controller.business().await {
                    eprintln!(
                        "Business: {} (WhatsApp {})",
                        business.name,
                        if business.whatsapp_connected {
                            "connected"
                        } else {
                            "not connected"
                        }
                    );
                }
            }
            "/save" => {
                use botbuilder::session::{SaveIgnoreReason, SaveOutcome};
                match controller.save_business().await {
                    SaveOutcome::Saved => {
                        let transcript = controller.transcript().await;
                        if let Some(turn) = transcript.last() {
                            print_turn(&turn.role, &turn.content);
                        }
                    }
                    SaveOutcome::ServiceFailed => {
                        let transcript = controller.transcript().await;
                        if let Some(turn) = transcript.last() {
                            print_turn(&turn.role, &turn.content);
                        }
                    }
                    SaveOutcome::Ignored(SaveIgnoreReason::AlreadySaved) => {
                        eprintln!("Business already saved.");
                    }
                    SaveOutcome::Ignored(_) => {
                        eprintln!("Nothing to save yet — finish the onboarding chat first.");
                    }
                }
            }
            "/connect" => match controller.connect_whatsapp().await {
                Some(handshake) => {
                    eprintln!("Open this URL in your browser to connect WhatsApp:");
                    eprintln!("  {}", handshake.authorize_url);
                    let controller = Arc::clone(&controller);
                    tokio::spawn(async move {
                        if controller.await_connection(handshake).await {
                            eprintln!("\n✅ WhatsApp connected!");
                            eprint!("> ");
                        }
                    });
                }
                None => {
                    let phase = controller.phase().await;
                    if phase.can_connect() {
                        eprintln!("Connect is not configured (set WHATSAPP_CLIENT_ID).");
                    } else {
                        eprintln!("Save your business before connecting WhatsApp.");
                    }
                }
            },
            _ => {
                use botbuilder::session::{IgnoreReason, SendOutcome};
                match controller.send_message(&line).await {
                    SendOutcome::Ignored(IgnoreReason::InputClosed) => {
                        eprintln!("Setup is complete — use /connect or /reset.");
                    }
                    SendOutcome::Ignored(_) => {}
                    _ => {
                        let transcript = controller.transcript().await;
                        if let Some(turn) = transcript.last() {
                            print_turn(&turn.role, &turn.content);
                        }
                        if controller.phase().await == Phase::ProfileReady {
                            eprintln!("📋 Business profile ready — type /save to create your bot.");
                        }
                    }
                }
            }
        }
        eprint!("> ");
    }

    Ok(())
}

fn print_turn(role: &Role, content: &str) {
    match role {
        Role::Assistant => println!("\n{content}\n"),
        Role::User => println!("you: {content}"),
    }
}
