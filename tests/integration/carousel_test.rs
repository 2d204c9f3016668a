// Featured carousel driven on real (shortened) timers.

use cinebrowse::core::carousel::{CarouselTiming, Direction};
use cinebrowse::core::viewmodels::CarouselViewModel;
use cinebrowse::models::Catalog;
use std::sync::Arc;
use std::time::Duration;

use crate::common::fixtures::Fixtures;
use crate::common::mocks::MockMetadataSource;
use crate::common::wait_for_async;

fn timing(autoplay_ms: u64) -> CarouselTiming {
    CarouselTiming {
        autoplay: Duration::from_millis(autoplay_ms),
        content_fade: Duration::from_millis(2),
        slide: Duration::from_millis(10),
    }
}

fn source() -> Arc<MockMetadataSource> {
    Arc::new(MockMetadataSource::new().with_details(Fixtures::featured_details()))
}

#[tokio::test]
async fn test_stale_detail_is_discarded() {
    let source = source();
    let first = Fixtures::featured()[0].id;
    let second = Fixtures::featured()[1].id;
    let gate = source.gate_detail(first);

    let carousel = CarouselViewModel::new(source.clone(), Fixtures::featured(), timing(60_000));
    let _driver = carousel.start();
    assert!(wait_for_async(|| async { source.detail_calls() == vec![first] }, Duration::from_secs(2)).await);

    assert!(carousel.next().await);
    assert!(
        wait_for_async(
            || async {
                carousel.state().current_detail.map(|d| d.summary.id) == Some(second)
            },
            Duration::from_secs(2)
        )
        .await
    );

    // the first item's detail finally arrives, after focus moved on
    gate.notify_one();
    tokio::time::sleep(Duration::from_millis(30)).await;

    let state = carousel.state();
    assert_eq!(state.current_index, 1);
    assert_eq!(state.current_detail.map(|d| d.summary.id), Some(second));
    assert!(carousel.trailer_url().is_some());
}

#[tokio::test]
async fn test_trailer_requires_youtube_trailer() {
    let source = source();
    let carousel = CarouselViewModel::new(source.clone(), Fixtures::featured(), timing(60_000));
    let _driver = carousel.start();

    assert!(
        wait_for_async(|| async { carousel.trailer_url().is_some() }, Duration::from_secs(2)).await
    );
    assert_eq!(
        carousel.trailer_url().unwrap().as_str(),
        "https://www.youtube.com/watch?v=n9xhJrPXop4"
    );

    // the last item only has a teaser
    assert!(carousel.select(2).await);
    assert_eq!(carousel.state().direction, Direction::Forward);
    assert!(
        wait_for_async(
            || async {
                let state = carousel.state();
                state.current_index == 2 && state.current_detail.is_some_and(|d| d.summary.id == 27205)
            },
            Duration::from_secs(2)
        )
        .await
    );
    assert!(!carousel.state().can_play_trailer());
}

#[tokio::test]
async fn test_prev_wraps_to_last_item() {
    let carousel = CarouselViewModel::new(source(), Fixtures::featured(), timing(60_000));
    let _driver = carousel.start();

    assert!(carousel.prev().await);
    assert_eq!(carousel.state().direction, Direction::Backward);
    assert!(
        wait_for_async(
            || async {
                let state = carousel.state();
                state.current_index == 2 && !state.transitioning
            },
            Duration::from_secs(2)
        )
        .await
    );
}

#[tokio::test]
async fn test_autoplay_advances_and_stops_on_shutdown() {
    let carousel = CarouselViewModel::new(source(), Fixtures::featured(), timing(30));
    let driver = carousel.start();

    assert!(
        wait_for_async(|| async { carousel.state().current_index != 0 }, Duration::from_secs(2))
            .await
    );

    carousel.shutdown().await;
    driver.await.unwrap();

    let index = carousel.state().current_index;
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(carousel.state().current_index, index);
    assert!(!carousel.next().await);
}

#[tokio::test]
async fn test_load_featured_respects_limit() {
    let source = Arc::new(
        MockMetadataSource::new()
            .with_pages(Catalog::NowPlaying, vec![Fixtures::featured()])
            .with_details(Fixtures::featured_details()),
    );

    let carousel = CarouselViewModel::load(source.clone(), timing(60_000), Some(2))
        .await
        .unwrap();

    let state = carousel.state();
    assert_eq!(state.items.len(), 2);
    assert_eq!(state.current_index, 0);
    assert!(!state.transitioning);
}
