//! Send sessions driven through injected transports, checked from the
//! receiving side.

mod common;

use async_trait::async_trait;
use common::test_images::{BLACK, WHITE, checkerboard, horizontal_gradient, solid};
use image::DynamicImage;
use messagebox::processing::encode_picture;
use messagebox::{
    Inbound, MemoryTransport, PictureFraming, PipelineResult, Reassembler, SendAction, SendConfig,
    SendMode, SendSession, Transport,
};
use tokio::sync::mpsc;

/// Transport that forwards payloads over a channel, like a broker would.
struct ChannelTransport {
    tx: mpsc::UnboundedSender<String>,
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn publish(&self, _topic: &str, payload: &str) -> PipelineResult<()> {
        self.tx.send(payload.to_string()).map_err(|e| {
            messagebox::PipelineError::transport("publish")
                .with_address("channel")
                .with_source(e)
        })
    }

    fn describe(&self) -> String {
        "channel".to_string()
    }
}

#[tokio::test]
async fn test_picture_then_text_arrive_in_order() {
    let transport = MemoryTransport::new();
    let session = SendSession::builder()
        .with_transport(transport.clone())
        .with_topic("box/42")
        .build()
        .unwrap();

    session.send_picture(solid(640, 480, BLACK)).await.unwrap();
    session.send_text("hi").await.unwrap();

    assert_eq!(transport.payloads(), vec!["0:16$", "384,", "hi$&#"]);
    assert!(transport.published().iter().all(|p| p.topic == "box/42"));
}

#[tokio::test]
async fn test_receiver_rebuilds_what_the_session_sent() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let session = SendSession::builder()
        .with_transport(ChannelTransport { tx })
        .build()
        .unwrap();

    let photo = horizontal_gradient(320, 240);
    let expected = encode_picture(&photo).unwrap().bitmap;

    let receiver = tokio::spawn(async move {
        let mut reassembler = Reassembler::new();
        let mut received = Vec::new();
        while let Some(payload) = rx.recv().await {
            if let Some(inbound) = reassembler.accept(&payload).unwrap() {
                received.push(inbound);
            }
        }
        received
    });

    session.send_text("before").await.unwrap();
    session.send_picture(photo).await.unwrap();
    session.send_text("after").await.unwrap();
    drop(session);

    let received = receiver.await.unwrap();
    assert_eq!(
        received,
        vec![
            Inbound::Text("before".to_string()),
            Inbound::Picture(expected),
            Inbound::Text("after".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_single_framing_is_one_publish() {
    let transport = MemoryTransport::new();
    let config = SendConfig {
        framing: PictureFraming::Single,
        ..SendConfig::default()
    };
    let session = SendSession::builder()
        .with_transport(transport.clone())
        .with_config(config)
        .build()
        .unwrap();

    let photo = DynamicImage::ImageRgba8(checkerboard(200, 200, 25));
    let report = session.send_picture(photo.clone()).await.unwrap();
    assert_eq!(report.publishes(), 1);
    let expected = encode_picture(&photo).unwrap().bitmap;
    assert_eq!(report.bitmap.as_ref(), Some(&expected));

    let mut reassembler = Reassembler::new();
    let inbound = reassembler.accept(&transport.payloads()[0]).unwrap();
    assert_eq!(inbound, Some(Inbound::Picture(expected)));
}

#[tokio::test]
async fn test_report_matches_published_payloads() {
    let transport = MemoryTransport::new();
    let session = SendSession::builder()
        .with_transport(transport.clone())
        .build()
        .unwrap();

    let report = session
        .send(SendAction::Picture(solid(64, 64, WHITE)))
        .await
        .unwrap();
    assert_eq!(report.mode, SendMode::Picture);
    assert_eq!(report.payloads, transport.payloads());
    assert_eq!(report.total_bytes(), "1:16384,".len() + 1);
}

#[tokio::test]
async fn test_failed_first_publish_sends_nothing_more() {
    let transport = MemoryTransport::failing_at(0);
    let session = SendSession::builder()
        .with_transport(transport.clone())
        .build()
        .unwrap();

    let err = session.send_picture(solid(10, 10, BLACK)).await.unwrap_err();
    assert_eq!(err.category(), "transport");
    assert!(transport.published().is_empty());
}

#[tokio::test]
async fn test_text_with_reserved_sequence_is_sent_verbatim() {
    let transport = MemoryTransport::new();
    let session = SendSession::builder()
        .with_transport(transport.clone())
        .build()
        .unwrap();

    session.send_text("price: 5$").await.unwrap();
    assert_eq!(transport.payloads(), vec!["price: 5$$&#"]);

    session.send_text("").await.unwrap();
    assert_eq!(transport.payloads()[1], "$&#");
}
