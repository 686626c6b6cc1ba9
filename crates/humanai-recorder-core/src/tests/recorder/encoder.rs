use crate::{
    FALLBACK_MIME_TYPE, MIME_CANDIDATES, container_extension, select_mime_type,
    tests::fakes::{EncoderHandle, FakeEncoder},
};

/// WHAT: The first supported candidate wins
/// WHY: Candidates are listed in order of preference
#[test]
fn given_encoder_supporting_vp9_only_when_selecting_then_vp9_with_opus_chosen() {
    // Given: An encoder that supports only vp9 variants
    let mut encoder = FakeEncoder::new(&EncoderHandle::default());
    encoder.supported = vec![
        "video/webm;codecs=vp9".to_string(),
        "video/webm;codecs=vp9,opus".to_string(),
    ];

    // When: Selecting
    let selected = select_mime_type(&encoder);

    // Then: The preferred vp9 candidate is chosen
    assert_eq!(selected, "video/webm;codecs=vp9,opus");
}

/// WHAT: No supported candidate falls back to plain webm
/// WHY: Recording should still be attempted with the encoder's default
#[test]
fn given_encoder_supporting_nothing_when_selecting_then_fallback() {
    let mut encoder = FakeEncoder::new(&EncoderHandle::default());
    encoder.supported.clear();

    assert_eq!(select_mime_type(&encoder), FALLBACK_MIME_TYPE);
}

/// WHAT: Every candidate maps to the webm extension
/// WHY: Downloads must open in players that go by extension
#[test]
fn given_mime_types_when_mapping_extension_then_container_extension() {
    for candidate in MIME_CANDIDATES {
        assert_eq!(container_extension(candidate), "webm", "{candidate}");
    }
    assert_eq!(container_extension("video/x-matroska;codecs=avc1"), "mkv");
    assert_eq!(container_extension("video/ogg"), "ogv");
    assert_eq!(container_extension(""), "bin");
}
