//! Contract tests for the stream handle and the engine adapter.

use shelfscan::testing::{ManualEngine, ScriptedStreamSource};
use shelfscan::{
    DecoderConfig, EngineAdapter, Facing, ScanError, StreamHandle, StreamTarget,
};

#[tokio::test]
async fn acquire_releases_previous_stream_first() {
    let source = ScriptedStreamSource::always_ok();
    let handle = StreamHandle::new();

    let targets = [
        StreamTarget::ById("0".to_string()),
        StreamTarget::Facing(Facing::Back),
        StreamTarget::Unconstrained,
    ];
    for (i, target) in targets.iter().enumerate() {
        handle.acquire(source.as_ref(), target).await.unwrap();
        // Never more than one live stream, and every prior acquisition got
        // exactly one release before the next open.
        assert_eq!(source.live_streams(), 1);
        assert_eq!(source.stopped_streams(), i);
    }

    handle.release().await;
    assert_eq!(source.live_streams(), 0);
    assert_eq!(source.stopped_streams(), targets.len());
}

#[tokio::test]
async fn release_is_idempotent() {
    let source = ScriptedStreamSource::always_ok();
    let handle = StreamHandle::new();

    // Releasing an empty handle never raises.
    handle.release().await;
    assert_eq!(source.stopped_streams(), 0);

    handle
        .acquire(source.as_ref(), &StreamTarget::Unconstrained)
        .await
        .unwrap();
    handle.release().await;
    handle.release().await;
    assert_eq!(source.stopped_streams(), 1);
    assert!(!handle.is_held().await);
}

#[tokio::test]
async fn failed_acquire_leaves_handle_empty() {
    let source = ScriptedStreamSource::with_outcomes(vec![
        Ok(()),
        Err(ScanError::AcquisitionError("device busy".to_string())),
    ]);
    let handle = StreamHandle::new();

    handle
        .acquire(source.as_ref(), &StreamTarget::Unconstrained)
        .await
        .unwrap();
    assert!(handle.is_held().await);

    let err = handle
        .acquire(source.as_ref(), &StreamTarget::Unconstrained)
        .await
        .unwrap_err();
    assert!(matches!(err, ScanError::AcquisitionError(_)));

    // The old stream was released for the replacement attempt and the new
    // one never opened.
    assert!(!handle.is_held().await);
    assert_eq!(source.live_streams(), 0);
}

#[tokio::test]
async fn engine_start_requires_held_stream() {
    let engine = ManualEngine::ready();
    let adapter = EngineAdapter::new(engine.clone());
    let handle = StreamHandle::new();

    let err = adapter
        .start(&handle, &DecoderConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ScanError::EngineError(_)));
    assert!(!adapter.is_running());
    assert_eq!(engine.start_count(), 0);
}

#[tokio::test]
async fn engine_stop_is_idempotent() {
    let source = ScriptedStreamSource::always_ok();
    let handle = StreamHandle::new();
    handle
        .acquire(source.as_ref(), &StreamTarget::Unconstrained)
        .await
        .unwrap();

    let engine = ManualEngine::ready();
    let adapter = EngineAdapter::new(engine.clone());
    adapter
        .start(&handle, &DecoderConfig::default())
        .await
        .unwrap();
    assert!(adapter.is_running());

    adapter.stop().await;
    adapter.stop().await;
    assert!(!adapter.is_running());
    assert_eq!(engine.stop_count(), 1);
}

#[tokio::test]
async fn double_start_is_rejected() {
    let source = ScriptedStreamSource::always_ok();
    let handle = StreamHandle::new();
    handle
        .acquire(source.as_ref(), &StreamTarget::Unconstrained)
        .await
        .unwrap();

    let adapter = EngineAdapter::new(ManualEngine::ready());
    adapter
        .start(&handle, &DecoderConfig::default())
        .await
        .unwrap();

    let err = adapter
        .start(&handle, &DecoderConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ScanError::EngineError(_)));
    assert!(adapter.is_running());
}

#[tokio::test]
async fn failed_engine_start_clears_running_flag() {
    let source = ScriptedStreamSource::always_ok();
    let handle = StreamHandle::new();
    handle
        .acquire(source.as_ref(), &StreamTarget::Unconstrained)
        .await
        .unwrap();

    let engine = ManualEngine::failing("decoder could not bind");
    let adapter = EngineAdapter::new(engine.clone());

    let err = adapter
        .start(&handle, &DecoderConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ScanError::EngineError(_)));
    assert!(!adapter.is_running());

    // The failure consumed, a later start binds cleanly.
    adapter
        .start(&handle, &DecoderConfig::default())
        .await
        .unwrap();
    assert!(adapter.is_running());
    assert_eq!(engine.start_count(), 1);
}

#[tokio::test]
async fn adapter_reports_engine_name() {
    let adapter = EngineAdapter::new(ManualEngine::ready());
    assert_eq!(adapter.engine_name(), "manual");
}
