//! Token matcher tests

use rust_uart_link::{find_token, TokenMatcher};

#[test]
fn test_ok_crlf_matches_on_fourth_byte_only() {
    let mut matcher = TokenMatcher::new(b"OK\r\n");
    let feed = [b'O', b'K', b'\r', b'\n'];

    for (i, byte) in feed.iter().enumerate() {
        let matched = matcher.feed(*byte);
        if i < 3 {
            assert!(!matched, "matched early at byte {}", i);
        } else {
            assert!(matched);
        }
    }
}

#[test]
fn test_progress_survives_byte_by_byte_delivery() {
    let mut matcher = TokenMatcher::new(b"CONNECT");

    // Arbitrary chunking makes no difference: state lives across calls
    for byte in b"CON" {
        matcher.feed(*byte);
    }
    assert_eq!(matcher.progress(), 3);

    for byte in b"NEC" {
        matcher.feed(*byte);
    }
    assert_eq!(matcher.progress(), 6);
    assert!(matcher.feed(b'T'));
}

#[test]
fn test_token_embedded_in_noise() {
    let mut matcher = TokenMatcher::new(b"READY");
    let mut matched_at = None;

    for (i, byte) in b"\r\nbooting...READY\r\n".iter().enumerate() {
        if matcher.feed(*byte) {
            matched_at = Some(i);
            break;
        }
    }

    // Matches exactly when the final 'Y' is consumed
    assert_eq!(matched_at, Some(16));
}

#[test]
fn test_repeated_first_byte_restarts_match() {
    let mut matcher = TokenMatcher::new(b"ATOK");

    // "AATOK": the second 'A' restarts rather than kills the match
    assert!(!matcher.feed(b'A'));
    assert!(!matcher.feed(b'A'));
    assert!(!matcher.feed(b'T'));
    assert!(!matcher.feed(b'O'));
    assert!(matcher.feed(b'K'));
}

#[test]
fn test_find_token_positions() {
    let source = b"x<a>42</a>y";

    assert_eq!(find_token(source, b"<a>"), Some(1));
    assert_eq!(find_token(source, b"</a>"), Some(6));
    assert_eq!(find_token(source, b"y"), Some(10));
    assert_eq!(find_token(source, b"<b>"), None);
}

#[test]
fn test_find_token_first_occurrence_wins() {
    assert_eq!(find_token(b"abab", b"ab"), Some(0));
}
