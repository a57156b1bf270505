use base::Vec2;
use image::Image;
use tokio::time::{Duration, sleep, timeout};
use video::{FrameSource, StillImageConfig, TestPatternConfig, VideoError, VideoIn, VideoInConfig};

async fn wait_for_frame(video: &VideoIn) -> std::sync::Arc<Image> {
    timeout(Duration::from_secs(5), async {
        loop {
            if let Some(frame) = video.snapshot() {
                return frame;
            }
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("no frame produced")
}

#[tokio::test(flavor = "multi_thread")]
async fn test_test_pattern_produces_frames() {
    let config = VideoInConfig::TestPattern(TestPatternConfig {
        size: Vec2::new(64, 48),
        frame_rate: 100.0,
    });
    let mut video = VideoIn::open(config).await.expect("open failed");

    assert!(video.is_ready());
    assert_eq!(video.size(), Some(Vec2::new(64, 48)));

    let frame = wait_for_frame(&video).await;
    assert_eq!(frame.size, Vec2::new(64, 48));
    assert_eq!(frame.data.len(), 64 * 48 * 3);

    video.close().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_stop_hides_frames() {
    let config = VideoInConfig::TestPattern(TestPatternConfig {
        size: Vec2::new(16, 16),
        frame_rate: 100.0,
    });
    let mut video = VideoIn::open(config).await.expect("open failed");
    wait_for_frame(&video).await;

    video.stop();
    assert!(video.snapshot().is_none());
    assert!(video.is_ready());

    video.close().await;
}

#[tokio::test]
async fn test_test_pattern_rejects_empty_size() {
    let config = VideoInConfig::TestPattern(TestPatternConfig {
        size: Vec2::new(0, 0),
        frame_rate: 30.0,
    });
    let result = VideoIn::open(config).await;
    assert!(matches!(result, Err(VideoError::Device(_))));
}

#[tokio::test]
async fn test_still_image_missing_file() {
    let config = VideoInConfig::StillImage(StillImageConfig::new("/nonexistent/frame.jpg"));
    let result = VideoIn::open(config).await;
    assert!(matches!(result, Err(VideoError::Device(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_still_image_replays_file() {
    let path = std::env::temp_dir().join(format!("video-still-{}.jpg", std::process::id()));
    let source = Image::solid_rgb(Vec2::new(20, 10), [50, 100, 150]);
    std::fs::write(&path, image::encode_jpeg(&source, 90).unwrap()).unwrap();

    let mut video = VideoIn::open(VideoInConfig::StillImage(StillImageConfig {
        path: path.clone(),
        frame_rate: 100.0,
    }))
    .await
    .expect("open failed");

    let frame = wait_for_frame(&video).await;
    assert_eq!(frame.size, Vec2::new(20, 10));

    video.close().await;
    std::fs::remove_file(&path).ok();
}
