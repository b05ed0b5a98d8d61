use frames::BoardMatrix;
use tokio::sync::mpsc::UnboundedReceiver;

use super::*;
use crate::events;

fn connection(events: EventSender) -> SimulatedConnection {
    SimulatedConnection::new("sim-board", 8, 4, Duration::from_millis(100), events)
}

fn drain(rx: &mut UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        out.push(event);
    }
    out
}

#[test]
fn random_update_stays_on_board() {
    for _ in 0..50 {
        let Some(Message::Update(BoardUpdate::Delta(points))) = random_update(8, 4) else {
            panic!("expected delta");
        };
        assert_eq!(points.len(), POINTS_PER_BROADCAST);
        assert!(points.iter().all(|p| (0..8).contains(&p.x) && (0..4).contains(&p.y)));
    }
}

#[test]
fn random_update_on_empty_board_is_none() {
    assert_eq!(random_update(0, 4), None);
}

#[tokio::test]
async fn connect_always_succeeds() {
    let (events, _rx) = events::channel();
    let mut connection = connection(events);
    connection.connect().await.unwrap();
    assert_eq!(connection.state(), ConnectionState::Open);
    connection.close().await;
}

#[tokio::test]
async fn send_before_connect_is_not_open() {
    let (events, mut rx) = events::channel();
    let mut connection = connection(events);
    let draw = encode_message(&Message::Draw { points: vec![Point::new(1, 1, Pen::Ink)] });
    assert!(matches!(connection.send(&draw).await, Err(ConnectionError::NotOpen)));
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn draw_is_looped_back_verbatim() {
    let (events, mut rx) = events::channel();
    let mut connection = connection(events);
    connection.connect().await.unwrap();

    let draw = encode_message(&Message::Draw { points: vec![Point::new(1, 2, Pen::Ink)] });
    connection.send(&draw).await.unwrap();

    let echoed = drain(&mut rx);
    assert_eq!(echoed.len(), 1);
    assert!(matches!(&echoed[0], SessionEvent::Inbound(text) if *text == draw));
    connection.close().await;
}

#[tokio::test]
async fn other_kinds_are_not_echoed() {
    let (events, mut rx) = events::channel();
    let mut connection = connection(events);
    connection.connect().await.unwrap();

    connection.send(&encode_message(&Message::Join { username: "ada".into() })).await.unwrap();
    connection.send(&encode_message(&Message::RequestUpdate)).await.unwrap();
    connection
        .send(&encode_message(&Message::Update(BoardUpdate::Snapshot(BoardMatrix::blank(1, 1)))))
        .await
        .unwrap();
    connection.send("garbage").await.unwrap();

    assert!(drain(&mut rx).is_empty());
    connection.close().await;
}

#[tokio::test(start_paused = true)]
async fn broadcaster_posts_updates_each_interval_after_the_first() {
    let (events, mut rx) = events::channel();
    let mut connection = connection(events);
    connection.connect().await.unwrap();

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(drain(&mut rx).is_empty());

    tokio::time::sleep(Duration::from_millis(200)).await;
    let updates = drain(&mut rx);
    assert_eq!(updates.len(), 2);
    for event in updates {
        let SessionEvent::Inbound(text) = event else {
            panic!("expected inbound frame");
        };
        assert!(matches!(decode_message(&text), Ok(Message::Update(BoardUpdate::Delta(_)))));
    }
    connection.close().await;
}

#[tokio::test(start_paused = true)]
async fn close_stops_broadcaster() {
    let (events, mut rx) = events::channel();
    let mut connection = connection(events);
    connection.connect().await.unwrap();
    connection.close().await;
    connection.close().await;

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(drain(&mut rx).is_empty());
    assert_eq!(connection.state(), ConnectionState::Closed);
    assert!(matches!(connection.connect().await, Err(ConnectionError::NotOpen)));
}

#[test]
fn connector_uses_configured_board_size() {
    let config = ClientConfig { board_width: 3, board_height: 2, ..ClientConfig::default() };
    let connector = SimulatedConnector::new(&config);
    assert_eq!((connector.width, connector.height), (3, 2));
}
