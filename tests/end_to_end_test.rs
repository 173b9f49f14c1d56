mod common;

use common::MemoryStore;
use gmail_mime::{
    ExtractOptions, MimePartNode, RawMessage, build_attachment_message, build_plain_message,
    extract_summary,
};

// --- Builder output through the summary path ---

#[test]
fn test_plain_message_summarizes_to_its_inputs() {
    let outbound = build_plain_message("a@x.com", "b@x.com", "Hi", "Hello").unwrap();
    let mime = outbound.decode().unwrap();
    let (message, attachments) = RawMessage::from_mime(&mime).unwrap();

    let store = MemoryStore::default();
    let summary =
        extract_summary(&message, &attachments, &store, &ExtractOptions::default()).unwrap();

    assert_eq!(summary.from, "a@x.com");
    assert_eq!(summary.subject, "Hi");
    assert_eq!(summary.body_text.trim_end(), "Hello");
    assert!(summary.attachment_ref.is_none());
    assert!(store.files.borrow().is_empty());
}

#[test]
fn test_attachment_message_summarizes_with_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.pdf");
    let bytes: Vec<u8> = (0..=255u8).rev().cycle().take(700).collect();
    std::fs::write(&path, &bytes).unwrap();

    let outbound =
        build_attachment_message("a@x.com", "b@x.com", "Report", "See attached", &path).unwrap();
    let mime = outbound.decode().unwrap();
    let (message, attachments) = RawMessage::from_mime(&mime).unwrap();

    assert_eq!(attachments.len(), 1);
    assert!(matches!(
        &message.payload.parts[1],
        MimePartNode::Attachment { mime_type, .. } if mime_type == "application/pdf"
    ));

    let store = MemoryStore::default();
    let summary =
        extract_summary(&message, &attachments, &store, &ExtractOptions::default()).unwrap();

    let filename = path.to_string_lossy().into_owned();
    assert_eq!(summary.subject, "Report");
    assert_eq!(summary.body_text.trim_end(), "See attached");
    assert_eq!(summary.attachment_ref.as_deref(), Some(filename.as_str()));

    let files = store.files.borrow();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].0, filename);
    assert_eq!(files[0].1, bytes);
}

#[test]
fn test_utf8_message_summarizes() {
    let outbound = build_plain_message("a@x.com", "b@x.com", "Grüße", "Schöne Grüße").unwrap();
    let mime = outbound.decode().unwrap();
    let (message, attachments) = RawMessage::from_mime(&mime).unwrap();

    let summary = extract_summary(
        &message,
        &attachments,
        &MemoryStore::default(),
        &ExtractOptions::default(),
    )
    .unwrap();

    assert_eq!(summary.subject, "Grüße");
    assert_eq!(summary.body_text.trim_end(), "Schöne Grüße");
}

#[test]
fn test_attachment_name_survives_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["résumé.pdf", "a b,c.pdf"] {
        let path = dir.path().join(name);
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let outbound = build_attachment_message("a@x.com", "b@x.com", "Files", "x", &path).unwrap();
        let (message, attachments) = RawMessage::from_mime(&outbound.decode().unwrap()).unwrap();
        let store = MemoryStore::default();
        let summary =
            extract_summary(&message, &attachments, &store, &ExtractOptions::default()).unwrap();

        let filename = path.to_string_lossy().into_owned();
        assert_eq!(summary.attachment_ref.as_deref(), Some(filename.as_str()));
        assert_eq!(store.files.borrow()[0].0, filename);
    }
}
