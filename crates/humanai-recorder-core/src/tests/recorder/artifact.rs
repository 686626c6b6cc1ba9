use crate::{RecorderError, RecordingArtifact, artifact_filename};

use chrono::{TimeZone, Utc};

/// WHAT: Sealing concatenates chunks in arrival order
/// WHY: Reordered container slices produce an unplayable file
#[test]
#[allow(clippy::unwrap_used)]
fn given_chunks_when_sealed_then_blob_is_ordered_concatenation() {
    // Given: Three chunks appended in order
    let mut artifact = RecordingArtifact::new("video/webm;codecs=vp8,opus");
    artifact.append(b"head".to_vec());
    artifact.append(b"-mid-".to_vec());
    artifact.append(b"tail".to_vec());

    // When: Sealing
    let sealed = artifact.seal().unwrap();

    // Then: Bytes are in order and the size is the sum of the chunks
    assert_eq!(sealed.blob().bytes(), b"head-mid-tail");
    assert_eq!(sealed.blob().size(), 13);
    assert_eq!(sealed.chunk_count(), 3);
    assert_eq!(sealed.blob().mime(), "video/webm;codecs=vp8,opus");
}

/// WHAT: Zero-length chunks are dropped
/// WHY: Empty slices carry no data and would inflate the chunk count
#[test]
fn given_empty_chunk_when_appended_then_ignored() {
    let mut artifact = RecordingArtifact::new("video/webm");

    let kept = artifact.append(Vec::new());

    assert!(!kept);
    assert_eq!(artifact.chunk_count(), 0);
    assert_eq!(artifact.total_bytes(), 0);
}

/// WHAT: An artifact with no bytes cannot be sealed
/// WHY: A zero-byte recording must be reported, not offered for download
#[test]
fn given_no_data_when_sealed_then_empty_artifact_error() {
    let mut artifact = RecordingArtifact::new("video/webm");
    artifact.append(Vec::new());

    let result = artifact.seal();

    assert!(matches!(result, Err(RecorderError::EmptyArtifact { .. })));
}

/// WHAT: Download names carry the save time and container extension
/// WHY: Repeated downloads must not overwrite each other
#[test]
#[allow(clippy::unwrap_used)]
fn given_save_time_when_naming_download_then_timestamped_webm_name() {
    let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();

    assert_eq!(
        artifact_filename(at, "video/webm;codecs=vp9,opus"),
        "screen-recording-1700000000123.webm"
    );
    assert_eq!(
        artifact_filename(at, "video/mp4"),
        "screen-recording-1700000000123.mp4"
    );
}
