use crate::{
    ArtifactStatus, Corner, RecorderError, RecorderEvent, RecorderPhase, RecorderProfile,
    TickOutcome,
    tests::fakes::{Grant, HarnessBuilder, SCREEN_COLOR, StopBehaviour, WEBCAM_COLOR},
};

use std::time::Duration;

use tokio::sync::broadcast;

/// Device tracks acquired by the default harness: screen video, screen
/// audio, webcam and microphone.
const DEVICE_TRACKS: usize = 4;

fn phases(events: &mut broadcast::Receiver<RecorderEvent>) -> Vec<RecorderPhase> {
    let mut phases = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let RecorderEvent::PhaseChanged { phase, .. } = event {
            phases.push(phase);
        }
    }
    phases
}

/// WHAT: Operations outside their phase are rejected without side effects
/// WHY: Buttons not shown for a phase must not be reachable through the API
#[tokio::test]
async fn given_idle_controller_when_stop_download_delete_restart_then_all_rejected() {
    // Given: An idle controller
    let mut harness = HarnessBuilder::new().build();

    // When / Then: Each stopped-only or recording-only operation is rejected
    assert!(matches!(
        harness.controller.stop().await,
        Err(RecorderError::InvalidTransition { operation: "stop", phase: "idle", .. })
    ));
    assert!(matches!(
        harness.controller.download().await,
        Err(RecorderError::InvalidTransition { .. })
    ));
    assert!(matches!(
        harness.controller.delete(),
        Err(RecorderError::InvalidTransition { .. })
    ));
    assert!(matches!(
        harness.controller.restart().await,
        Err(RecorderError::InvalidTransition { .. })
    ));

    assert_eq!(harness.controller.phase(), RecorderPhase::Idle);
    assert!(harness.encoder.log().started.is_empty());
}

/// WHAT: Start while recording is rejected and the recording continues
/// WHY: A double click must not acquire the devices twice
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_recording_when_started_again_then_rejected_and_still_recording() {
    let mut harness = HarnessBuilder::new().build();
    harness.controller.start().await.unwrap();

    let result = harness.controller.start().await;

    assert!(matches!(
        result,
        Err(RecorderError::InvalidTransition { operation: "start", phase: "recording", .. })
    ));
    assert_eq!(harness.controller.phase(), RecorderPhase::Recording);
    assert_eq!(harness.encoder.log().started.len(), 1);
    assert_eq!(harness.stops.count(), 0);
}

/// WHAT: A full combined recording yields the ordered chunks as one artifact
/// WHY: This is the main user flow: record, stop, get a playable file
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_three_frames_recorded_when_stopped_then_artifact_sealed_and_devices_released() {
    // Given: A recording with the webcam top-right
    let mut harness = HarnessBuilder::new().build();
    harness.controller.start().await.unwrap();

    // When: Three frames render while the encoder emits slices
    for chunk in [&b"a"[..], b"bb", b"ccc"] {
        harness.encoder.emit(chunk);
        assert_eq!(harness.controller.render_tick(), TickOutcome::Continue);
    }

    // Then: Three frames were composited with the overlay top-right
    let compositor = harness.controller.compositor().unwrap();
    assert_eq!(compositor.frames_drawn(), 3);
    assert_eq!(compositor.canvas().get_pixel(260, 50).0, WEBCAM_COLOR);
    assert_eq!(compositor.canvas().get_pixel(10, 200).0, SCREEN_COLOR);

    // And: The encoder got one video track, screen + mic audio, 500ms slices
    {
        let log = harness.encoder.log();
        let (options, video, audio) = &log.started[0];
        assert_eq!((*video, *audio), (1, 2));
        assert_eq!(options.mime_type, "video/webm;codecs=vp8,opus");
        assert_eq!(options.timeslice, Some(Duration::from_millis(500)));
        assert_eq!(options.video_bits_per_second, Some(1_500_000));
    }

    // When: Stopping
    let sealed = harness.controller.stop().await.unwrap();

    // Then: The artifact holds every chunk in order, including the final flush
    assert_eq!(sealed.blob().bytes(), b"abbccctail");
    assert_eq!(sealed.blob().size(), 1 + 2 + 3 + 4);
    assert_eq!(harness.controller.phase(), RecorderPhase::Stopped);
    assert!(harness.controller.preview_url().is_some());
    assert_eq!(harness.controller.object_urls().live_count(), 1);

    // And: Every device was released and the encoder was asked to stop once
    assert_eq!(harness.stops.count(), DEVICE_TRACKS);
    assert_eq!(harness.encoder.log().stop_requests, 1);
    assert_eq!(harness.encoder.log().force_stops, 0);
    assert_eq!(harness.controller.render_tick(), TickOutcome::Halted);
}

/// WHAT: Webcam denial leaves the controller idle with nothing captured
/// WHY: A refused permission must not leave the screen share running
#[tokio::test]
async fn given_webcam_denied_when_starting_then_idle_and_screen_released() {
    // Given: A webcam that refuses permission
    let mut builder = HarnessBuilder::new();
    builder.devices.webcam = Grant::Deny;
    let mut harness = builder.build();
    let mut events = harness.controller.subscribe();

    // When: Starting
    let result = harness.controller.start().await;

    // Then: PermissionDenied, still idle, screen tracks released, no encoding
    assert!(matches!(result, Err(RecorderError::PermissionDenied { .. })));
    assert_eq!(harness.controller.phase(), RecorderPhase::Idle);
    assert_eq!(harness.stops.count(), 2);
    assert!(harness.encoder.log().started.is_empty());
    assert!(matches!(events.try_recv(), Ok(RecorderEvent::Failed { session_id: None, .. })));
}

/// WHAT: An encoder that cannot start releases every device
/// WHY: Capture must never outlive a recording that never began
#[tokio::test]
async fn given_encoder_start_failure_when_starting_then_idle_and_all_released() {
    let mut builder = HarnessBuilder::new();
    builder.encoder.fail_start = true;
    let mut harness = builder.build();

    let result = harness.controller.start().await;

    assert!(matches!(result, Err(RecorderError::Encoder { .. })));
    assert_eq!(harness.controller.phase(), RecorderPhase::Idle);
    assert_eq!(harness.stops.count(), DEVICE_TRACKS);
}

/// WHAT: A recording with no data is stopped but unusable
/// WHY: A zero-byte file must not be offered for preview or download
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_encoder_flushes_nothing_when_stopping_then_empty_artifact_and_unusable() {
    // Given: An encoder that finalizes without producing data
    let mut builder = HarnessBuilder::new();
    builder.encoder.on_stop = StopBehaviour::Flush(Vec::new());
    let mut harness = builder.build();
    harness.controller.start().await.unwrap();
    harness.controller.render_tick();

    // When: Stopping
    let result = harness.controller.stop().await;

    // Then: EmptyArtifact, stopped with an unusable artifact, devices released
    assert!(matches!(result, Err(RecorderError::EmptyArtifact { .. })));
    assert_eq!(harness.controller.phase(), RecorderPhase::Stopped);
    assert!(matches!(
        harness.controller.artifact_status(),
        Some(ArtifactStatus::Unusable { .. })
    ));
    assert!(harness.controller.preview_url().is_none());
    assert_eq!(harness.stops.count(), DEVICE_TRACKS);

    // And: Download reports there is nothing to save
    assert!(matches!(
        harness.controller.download().await,
        Err(RecorderError::NoArtifact { .. })
    ));
    assert!(harness.saver.saved().is_empty());
}

/// WHAT: Encoder failure during finalization still releases devices
/// WHY: The camera light must go off however the recording ends
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_encoder_fails_on_stop_when_stopping_then_finalization_error_and_released() {
    let mut builder = HarnessBuilder::new();
    builder.encoder.on_stop = StopBehaviour::Fail("muxer crashed".to_string());
    let mut harness = builder.build();
    harness.controller.start().await.unwrap();
    harness.encoder.emit(b"data");
    harness.controller.render_tick();

    let result = harness.controller.stop().await;

    assert!(matches!(result, Err(RecorderError::Finalization { .. })));
    assert_eq!(harness.controller.phase(), RecorderPhase::Stopped);
    assert_eq!(harness.stops.count(), DEVICE_TRACKS);
    assert_eq!(harness.controller.object_urls().live_count(), 0);
}

/// WHAT: An encoder that dies mid-recording is reported once
/// WHY: The user must learn nothing is being encoded before pressing stop
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_encoder_disconnects_while_recording_when_ticking_then_failure_reported_once() {
    // Given: A recording whose encoder delivered one chunk and then went away
    let mut harness = HarnessBuilder::new().build();
    let mut events = harness.controller.subscribe();
    let session_id = harness.controller.start().await.unwrap();
    while events.try_recv().is_ok() {}
    harness.encoder.emit(b"data");
    harness.encoder.disconnect();

    // When: The render loop keeps running
    let ticks: Vec<TickOutcome> = (0..5).map(|_| harness.controller.render_tick()).collect();

    // Then: Still recording with devices held, and exactly one failure event
    assert!(ticks.iter().all(|t| *t == TickOutcome::Continue));
    assert_eq!(harness.controller.phase(), RecorderPhase::Recording);
    assert_eq!(harness.stops.count(), 0);

    let mut failures = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let RecorderEvent::Failed { session_id, .. } = event {
            failures.push(session_id);
        }
    }
    assert_eq!(failures, vec![Some(session_id)]);

    // And: Stopping still releases everything and reports finalization
    let result = harness.controller.stop().await;
    assert!(matches!(result, Err(RecorderError::Finalization { .. })));
    assert_eq!(harness.stops.count(), DEVICE_TRACKS);
    assert_eq!(harness.controller.phase(), RecorderPhase::Stopped);
}

/// WHAT: A hung encoder is force-stopped after the finalize timeout
/// WHY: Stop must always complete
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_encoder_never_finalizes_when_stopping_then_forced_after_timeout() {
    // Given: An encoder that ignores stop requests and a short timeout
    let mut builder = HarnessBuilder::new();
    builder.encoder.on_stop = StopBehaviour::Hang;
    builder.options.finalize_timeout = Duration::from_millis(50);
    let mut harness = builder.build();
    harness.controller.start().await.unwrap();

    // When: Stopping
    let result = harness.controller.stop().await;

    // Then: Finalization error, the encoder was aborted, devices released
    assert!(matches!(result, Err(RecorderError::Finalization { .. })));
    assert_eq!(harness.encoder.log().force_stops, 1);
    assert_eq!(harness.stops.count(), DEVICE_TRACKS);
    assert_eq!(harness.controller.phase(), RecorderPhase::Stopped);
}

/// WHAT: Restart passes through Idle and revokes the old preview
/// WHY: Observers must see the old recording discarded before the new one
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_stopped_recording_when_restarted_then_phases_pass_through_idle() {
    // Given: A stopped recording, with a subscriber attached from the start
    let mut harness = HarnessBuilder::new().build();
    let mut events = harness.controller.subscribe();
    harness.controller.start().await.unwrap();
    harness.encoder.emit(b"first");
    harness.controller.stop().await.unwrap();
    assert_eq!(harness.controller.object_urls().live_count(), 1);

    // When: Restarting
    let new_session = harness.controller.restart().await.unwrap();

    // Then: Recording -> Stopped -> Idle -> Recording
    assert_eq!(
        phases(&mut events),
        vec![
            RecorderPhase::Recording,
            RecorderPhase::Stopped,
            RecorderPhase::Idle,
            RecorderPhase::Recording,
        ]
    );
    assert_eq!(harness.controller.phase(), RecorderPhase::Recording);
    assert_eq!(harness.controller.object_urls().live_count(), 0);
    assert_eq!(harness.controller.capture_session().map(|s| s.id()), Some(new_session));
    assert_eq!(harness.encoder.log().started.len(), 2);
}

/// WHAT: Download saves the artifact and revokes its temporary URL
/// WHY: Each download would otherwise leak a blob URL
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_stopped_recording_when_downloaded_then_saved_and_temp_url_revoked() {
    // Given: A stopped recording
    let mut harness = HarnessBuilder::new().build();
    harness.controller.start().await.unwrap();
    harness.encoder.emit(b"frames");
    harness.controller.stop().await.unwrap();

    // When: Downloading
    let path = harness.controller.download().await.unwrap();

    // Then: The saver got the artifact under a timestamped name
    let saved = harness.saver.saved();
    assert_eq!(saved.len(), 1);
    let (filename, blob) = &saved[0];
    assert!(filename.starts_with("screen-recording-"));
    assert!(filename.ends_with(".webm"));
    assert_eq!(blob.bytes(), b"framestail");
    assert!(path.ends_with(filename));

    // And: Only the preview URL is still live and the controller stays stopped
    assert_eq!(harness.controller.object_urls().live_count(), 1);
    assert_eq!(harness.controller.phase(), RecorderPhase::Stopped);
}

/// WHAT: Delete drops the preview and returns to idle without recording
/// WHY: Delete is not restart; no device may be requested
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_stopped_recording_when_deleted_then_idle_and_preview_revoked() {
    let mut harness = HarnessBuilder::new().build();
    harness.controller.start().await.unwrap();
    harness.encoder.emit(b"frames");
    harness.controller.stop().await.unwrap();

    harness.controller.delete().unwrap();

    assert_eq!(harness.controller.phase(), RecorderPhase::Idle);
    assert!(harness.controller.artifact_status().is_none());
    assert_eq!(harness.controller.object_urls().live_count(), 0);
    assert_eq!(harness.encoder.log().started.len(), 1);
}

/// WHAT: Overlay changes while recording reach the live compositor
/// WHY: Users move or hide the webcam mid-recording
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_recording_when_overlay_hidden_and_moved_then_next_frames_follow() {
    let mut harness = HarnessBuilder::new().build();
    harness.controller.start().await.unwrap();
    harness.controller.render_tick();

    harness.controller.set_webcam_visible(false);
    harness.controller.render_tick();
    let hidden = harness.controller.compositor().unwrap().canvas().get_pixel(260, 50).0;

    harness.controller.set_webcam_visible(true);
    harness.controller.set_webcam_corner(Corner::BottomLeft);
    harness.controller.render_tick();
    let moved = harness.controller.compositor().unwrap().canvas().get_pixel(60, 190).0;

    assert_eq!(hidden, SCREEN_COLOR);
    assert_eq!(moved, WEBCAM_COLOR);
    assert_eq!(harness.controller.options().webcam_corner, Corner::BottomLeft);
    assert_eq!(harness.controller.compositor().unwrap().frames_drawn(), 3);
}

/// WHAT: The screen-only recorder skips the webcam and the compositor
/// WHY: The basic recorder encodes the screen track directly
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_screen_only_profile_when_recording_then_no_compositor_and_no_timeslice() {
    // Given: The screen-only profile
    let mut builder = HarnessBuilder::new();
    builder.options.profile = RecorderProfile::ScreenOnly;
    let device_requests = std::sync::Arc::clone(&builder.devices.requests);
    let mut harness = builder.build();

    // When: Recording and stopping
    harness.controller.start().await.unwrap();
    assert!(harness.controller.compositor().is_none());
    assert_eq!(harness.controller.render_tick(), TickOutcome::Continue);
    let sealed = harness.controller.stop().await.unwrap();

    // Then: No webcam request, screen track encoded directly, one final chunk
    assert_eq!(device_requests.lock().unwrap().len(), 1);
    {
        let log = harness.encoder.log();
        let (options, video, audio) = &log.started[0];
        assert_eq!((*video, *audio), (1, 2));
        assert_eq!(options.timeslice, None);
        assert_eq!(options.video_bits_per_second, None);
    }
    assert_eq!(sealed.blob().bytes(), b"tail");
    assert_eq!(harness.stops.count(), 3);
}

/// WHAT: Shutdown stops a running recording and drops its preview
/// WHY: Quitting must release devices and blob URLs
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_recording_when_shutdown_then_idle_and_everything_released() {
    let mut harness = HarnessBuilder::new().build();
    harness.controller.start().await.unwrap();
    harness.encoder.emit(b"frames");

    harness.controller.shutdown().await;

    assert_eq!(harness.controller.phase(), RecorderPhase::Idle);
    assert_eq!(harness.stops.count(), DEVICE_TRACKS);
    assert_eq!(harness.controller.object_urls().live_count(), 0);
}
