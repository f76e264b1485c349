//! Per-connection handler: registration and message routing.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Derive the participant identity from the connection id
//!   2. Register the participant in the session registry
//!   3. Loop: relay inbound frames to chat or the engine, and write
//!      everything queued for the participant back to the socket

use std::sync::Arc;

use clash_protocol::{ClientMessage, Codec, Envelope, PlayerId, ServerMessage};
use clash_session::Participant;
use clash_transport::{Connection, WebSocketConnection};

use crate::ClashError;
use crate::server::ServerState;

/// Drop guard that tells the engine and the session registry that the
/// participant is gone.
///
/// This ensures cleanup happens even if the handler panics. Since `Drop`
/// is synchronous, we spawn a fire-and-forget task for the async work.
struct SessionGuard<C: Codec> {
    player_id: PlayerId,
    state: Arc<ServerState<C>>,
}

impl<C: Codec> Drop for SessionGuard<C> {
    fn drop(&mut self) {
        let player_id = self.player_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            if let Err(e) = state.engine.disconnect(player_id).await {
                tracing::debug!(%player_id, error = %e, "engine gone before disconnect");
            }
            let _ = state.sessions.lock().await.disconnect(player_id);
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), ClashError> {
    let conn_id = conn.id();
    let player_id = PlayerId(conn_id.into_inner());
    let (participant, mut outbound) = Participant::channel(player_id);

    // Create session and guard together: if registration fails no guard is
    // needed, and once it succeeds the guard is immediately active.
    state.sessions.lock().await.create(participant.clone())?;
    let _guard = SessionGuard {
        player_id,
        state: Arc::clone(&state),
    };
    tracing::info!(%conn_id, %player_id, "client connected");

    loop {
        tokio::select! {
            inbound = conn.recv() => match inbound {
                Ok(Some(data)) => dispatch(&state, &participant, &data).await?,
                Ok(None) => {
                    tracing::info!(%player_id, "client disconnected");
                    break;
                }
                Err(e) => {
                    tracing::info!(%player_id, error = %e, "client disconnected");
                    break;
                }
            },
            Some(msg) = outbound.recv() => {
                let bytes = state.codec.encode(&msg)?;
                if let Err(e) = conn.send(&bytes).await {
                    tracing::debug!(%player_id, error = %e, "send failed, closing");
                    break;
                }
            }
        }
    }

    let _ = conn.close().await;
    // _guard drops here → engine and session cleanup fire.
    Ok(())
}

/// Decodes one inbound frame and routes it.
///
/// Frames that cannot be decoded, carry an unknown `type`, or have a
/// payload of the wrong shape are dropped; the connection stays open.
async fn dispatch<C: Codec>(
    state: &ServerState<C>,
    participant: &Participant,
    data: &[u8],
) -> Result<(), ClashError> {
    let player_id = participant.id();

    let envelope: Envelope = match state.codec.decode(data) {
        Ok(env) => env,
        Err(e) => {
            tracing::debug!(%player_id, error = %e, "dropping malformed frame");
            return Ok(());
        }
    };

    let kind = envelope.kind.clone();
    let msg = match ClientMessage::from_envelope(envelope) {
        Ok(Some(msg)) => msg,
        Ok(None) => {
            tracing::debug!(%player_id, %kind, "ignoring unknown message type");
            return Ok(());
        }
        Err(e) => {
            tracing::debug!(%player_id, %kind, error = %e, "dropping invalid message");
            return Ok(());
        }
    };

    match msg {
        ClientMessage::Chat(payload) => {
            let delivered = state
                .sessions
                .lock()
                .await
                .broadcast(&ServerMessage::Chat(payload));
            tracing::debug!(%player_id, delivered, "chat relayed");
        }
        ClientMessage::Join => {
            let outcome = state.engine.join(participant.clone()).await?;
            tracing::debug!(%player_id, ?outcome, "join handled");
        }
        ClientMessage::Move(choice) => {
            state.engine.submit_move(player_id, choice).await?;
        }
    }

    Ok(())
}
