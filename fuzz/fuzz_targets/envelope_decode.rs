//! Fuzz target for server envelope decoding
//!
//! # Strategy
//!
//! - Raw text: arbitrary strings fed straight to the decoder
//! - Shaped envelopes: a known or unknown tag around arbitrary `data`
//!
//! # Invariants
//!
//! - NEVER panic on malformed JSON
//! - A decoded event re-encodes, and decoding that text gives the same event

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tambola_proto::ServerEvent;

#[derive(Debug, Arbitrary)]
enum Input {
    Raw(String),
    Shaped { tag: u8, unknown_tag: String, data: String },
}

fuzz_target!(|input: Input| {
    let text = match input {
        Input::Raw(text) => text,
        Input::Shaped { tag, unknown_tag, data } => {
            let tag = ServerEvent::TAGS
                .get(usize::from(tag) % (ServerEvent::TAGS.len() + 1))
                .map_or(unknown_tag, |t| (*t).to_string());
            format!(r#"{{"type":{},"data":{data}}}"#, quote(&tag))
        },
    };

    if let Ok(Some(event)) = ServerEvent::decode(&text) {
        let encoded = event.encode().unwrap();
        let again = ServerEvent::decode(&encoded).unwrap();
        assert_eq!(again, Some(event));
    }
});

/// Quote `s` as a JSON string, dropping control characters.
fn quote(s: &str) -> String {
    let escaped: String = s
        .chars()
        .flat_map(|c| match c {
            '"' => vec!['\\', '"'],
            '\\' => vec!['\\', '\\'],
            c if c.is_control() => vec![],
            c => vec![c],
        })
        .collect();
    format!("\"{escaped}\"")
}
