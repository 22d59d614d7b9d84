//! Client execution logic with reconnection support.
//!
//! The mirror state is created once and survives reconnections, so an
//! admin that reconnects can re-push its authoritative roster and a
//! viewer re-requests the current snapshot (the session does both on
//! connect).

use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;

use crate::{
    error::ClientError,
    session::run_client_session,
    state::{ClientState, Role},
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Check if the client should exit immediately based on the error type.
///
/// A rejected room id will be rejected again; reconnecting is pointless.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::ConnectionRejected(_))
}

/// Check if the client should attempt another reconnect.
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}

/// Run the raffle client with reconnection logic.
pub async fn run_client(
    url: String,
    room: String,
    role: Role,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(Mutex::new(ClientState::new(role)));
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} (room '{}', attempt {}/{})",
            url,
            room,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&url, &room, state.clone()).await {
            Ok(_) => {
                tracing::info!("Client session ended normally");
                break;
            }
            Err(e) => {
                if let Some(client_err) = e.downcast_ref::<ClientError>()
                    && should_exit_immediately(client_err)
                {
                    tracing::error!("{}", e);
                    tracing::error!("Room '{}' was rejected by the relay. Exiting.", room);
                    std::process::exit(1);
                }

                tracing::warn!("Connection lost: {}", e);
                reconnect_count += 1;

                if reconnect_count >= MAX_RECONNECT_ATTEMPTS {
                    tracing::error!(
                        "Failed to reconnect after {} attempts. Exiting.",
                        MAX_RECONNECT_ATTEMPTS
                    );
                    std::process::exit(1);
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_exit_immediately_on_rejected_room() {
        // テスト項目: ルーム拒否エラーでは即座に終了する
        // given (前提条件):
        let error = ClientError::ConnectionRejected("bad room".to_string());

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_not_exit_immediately_on_connection_error() {
        // テスト項目: 通信エラーでは即座に終了しない
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_attempt_reconnect_within_limit() {
        // テスト項目: 試行回数が上限未満なら再接続する
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作) / then (期待する結果):
        assert!(should_attempt_reconnect(&error, 0, 5));
        assert!(should_attempt_reconnect(&error, 4, 5));
    }

    #[test]
    fn test_should_not_attempt_reconnect_at_limit() {
        // テスト項目: 試行回数が上限に達したら再接続しない
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 5, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_not_attempt_reconnect_on_rejected_room() {
        // テスト項目: ルーム拒否エラーでは再接続しない
        // given (前提条件):
        let error = ClientError::ConnectionRejected("bad room".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 0, 5);

        // then (期待する結果):
        assert!(!result);
    }
}
