//! End-to-end tests driving the compiled relay binary over real
//! WebSocket and HTTP connections.

use std::process::{Child, Command, Stdio};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use fukubiki_server::infrastructure::dto::websocket::{ClientEvent, ParticipantDto, ServerEvent};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Helper struct to manage the server process lifecycle
struct TestServer {
    process: Child,
    port: u16,
}

impl TestServer {
    /// Start a relay server on the specified port
    fn start(port: u16) -> Self {
        let process = Command::new(env!("CARGO_BIN_EXE_fukubiki-server"))
            .args(["--port", &port.to_string()])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to start server");

        TestServer { process, port }
    }

    fn ws_url(&self, room: &str) -> String {
        format!("ws://127.0.0.1:{}/ws?room={}", self.port, room)
    }

    fn http_url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }

    /// Connect a WebSocket client, retrying while the server boots.
    async fn connect(&self, room: &str) -> WsStream {
        let url = self.ws_url(room);
        for _ in 0..100 {
            if let Ok((stream, _)) = connect_async(&url).await {
                return stream;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        panic!("Server did not accept connections on port {}", self.port);
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

/// Read the next text frame as a `ServerEvent`, with a timeout.
async fn next_event(stream: &mut WsStream) -> ServerEvent {
    let deadline = Duration::from_secs(5);
    loop {
        let frame = tokio::time::timeout(deadline, stream.next())
            .await
            .expect("timed out waiting for an event")
            .expect("stream ended")
            .expect("websocket error");
        if let Message::Text(text) = frame {
            return serde_json::from_str(&text).expect("unparsable server event");
        }
    }
}

/// Assert that no event arrives within a short grace period.
async fn expect_silence(stream: &mut WsStream) {
    let result = tokio::time::timeout(Duration::from_millis(500), stream.next()).await;
    assert!(result.is_err(), "expected no event, got {:?}", result);
}

async fn send(stream: &mut WsStream, event: &ClientEvent) {
    let json = serde_json::to_string(event).unwrap();
    stream.send(Message::Text(json.into())).await.unwrap();
}

fn participant(id: &str, sequence: u32, name: &str) -> ParticipantDto {
    ParticipantDto {
        id: id.to_string(),
        sequence,
        name: name.to_string(),
        group: "unspecified".to_string(),
        added_at: 1_000,
    }
}

#[tokio::test]
async fn test_viewer_counts_are_broadcast_to_the_whole_room() {
    // テスト項目: join のたびに自分を含む視聴者数が全員に届く
    // given (前提条件):
    let server = TestServer::start(18191);

    // when (操作): 1 人目が参加
    let mut first = server.connect("e2e-room").await;

    // then (期待する結果): 本人にも count=1 が届く
    assert_eq!(next_event(&mut first).await, ServerEvent::ViewersCount { count: 1 });

    // when (操作): 2 人目が参加
    let mut second = server.connect("e2e-room").await;

    // then (期待する結果): 両方に count=2 が届く
    assert_eq!(next_event(&mut second).await, ServerEvent::ViewersCount { count: 2 });
    assert_eq!(next_event(&mut first).await, ServerEvent::ViewersCount { count: 2 });
}

#[tokio::test]
async fn test_updates_fan_out_to_room_minus_sender() {
    // テスト項目: update-participants は同室の他接続に届き、送信者には戻らない
    // given (前提条件):
    let server = TestServer::start(18192);
    let mut admin = server.connect("fan-out-room").await;
    let mut viewer = server.connect("fan-out-room").await;
    // join 時の viewers-count を読み捨てる
    next_event(&mut admin).await;
    next_event(&mut admin).await;
    next_event(&mut viewer).await;

    // when (操作):
    let roster = vec![participant("a", 1, "Ana"), participant("b", 2, "Beto")];
    send(
        &mut admin,
        &ClientEvent::UpdateParticipants {
            participants: roster.clone(),
        },
    )
    .await;

    // then (期待する結果):
    assert_eq!(
        next_event(&mut viewer).await,
        ServerEvent::ParticipantsUpdated {
            participants: roster
        }
    );
    expect_silence(&mut admin).await;
}

#[tokio::test]
async fn test_late_joiner_recovers_state_after_completed_draw() {
    // テスト項目: 抽選完了後に参加した視聴者が権威スナップショットを取得できる
    // given (前提条件): 管理者が Ana/Beto/Carla を同期し、Beto の当選まで進める
    let server = TestServer::start(18193);
    let mut admin = server.connect("late-room").await;
    next_event(&mut admin).await; // viewers-count 1

    let roster = vec![
        participant("a", 1, "Ana"),
        participant("b", 2, "Beto"),
        participant("c", 3, "Carla"),
    ];
    send(
        &mut admin,
        &ClientEvent::SyncState {
            participants: roster.clone(),
            winners: vec![],
        },
    )
    .await;
    send(
        &mut admin,
        &ClientEvent::StartRaffle {
            participants: roster.clone(),
            winner_id: "b".to_string(),
        },
    )
    .await;
    send(
        &mut admin,
        &ClientEvent::CompleteRaffle {
            winner: roster[1].clone(),
        },
    )
    .await;

    // when (操作): 遅参加の視聴者が現在状態を要求する
    let mut viewer = server.connect("late-room").await;
    next_event(&mut viewer).await; // viewers-count 2
    send(&mut viewer, &ClientEvent::RequestCurrentState).await;

    // admin 側にも viewers-count 2 が届いている
    next_event(&mut admin).await;

    // then (期待する結果):
    loop {
        match next_event(&mut viewer).await {
            ServerEvent::CurrentState {
                participants,
                winners,
                current_display,
            } => {
                let names: Vec<&str> =
                    participants.iter().map(|p| p.name.as_str()).collect();
                assert_eq!(names, vec!["Ana", "Carla"]);
                assert_eq!(winners.len(), 1);
                assert_eq!(winners[0].name, "Beto");
                assert_eq!(winners[0].position, 1);
                assert_eq!(current_display, "");
                break;
            }
            ServerEvent::ViewersCount { .. } => continue,
            other => panic!("unexpected event: {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_health_endpoint_reports_rooms_and_viewers() {
    // テスト項目: ヘルスチェックが稼働時間・ルーム数・視聴者数を返す
    // given (前提条件):
    let server = TestServer::start(18194);
    let _first = server.connect("health-room").await;
    let _second = server.connect("health-room").await;

    // when (操作):
    let health: serde_json::Value = reqwest::get(server.http_url("/api/health"))
        .await
        .expect("health request failed")
        .json()
        .await
        .expect("health response was not json");

    // then (期待する結果):
    assert_eq!(health["status"], "ok");
    assert_eq!(health["activeRooms"], 1);
    assert_eq!(health["totalViewers"], 2);
    assert!(health["uptimeSecs"].is_u64());
}

#[tokio::test]
async fn test_empty_room_is_deleted_and_listed_rooms_shrink() {
    // テスト項目: 全員が退出したルームは一覧から消える
    // given (前提条件):
    let server = TestServer::start(18195);
    let mut viewer = server.connect("ephemeral-room").await;
    next_event(&mut viewer).await; // viewers-count 1

    let rooms: serde_json::Value = reqwest::get(server.http_url("/api/rooms"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(rooms.as_array().unwrap().len(), 1);

    // when (操作): 接続を閉じる
    viewer.close(None).await.unwrap();

    // then (期待する結果): ルームの削除は非同期なのでポーリングで確認する
    for attempt in 0..50 {
        let rooms: serde_json::Value = reqwest::get(server.http_url("/api/rooms"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        if rooms.as_array().unwrap().is_empty() {
            return;
        }
        assert!(attempt < 49, "room was not deleted: {:?}", rooms);
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}
