
mod client;
pub mod config;
pub mod error;
pub mod playback;
pub mod transport;
pub mod types;

pub mod deps {
    pub use serde_json;
    pub use serde;
    pub use ureq;
}

pub use client::*;

pub use config::ClientConfig;
pub use playback::Player;
pub use transport::{HttpTransport, Transport};

pub use error::{
    Error,
    ErrorDescription,
    GenericError,
    ProtocolError,
    ProtocolFailure,
    Result,
};

pub struct TextSplitter {
    sentence_splitter: Vec<String>,
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self {
            sentence_splitter: vec!["。".to_string(), "？".to_string(), "！".to_string(), "!".to_string(), "?".to_string(), "\n".to_string()],
        }
    }
}

impl TextSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut current = String::new();
        for ch in text.chars() {
            current.push(ch);
            if self.sentence_splitter.iter().any(|s| current.ends_with(s.as_str())) {
                let sentence = current.trim();
                if !sentence.is_empty() {
                    sentences.push(sentence.to_owned());
                }
                current.clear();
            }
        }
        let rest = current.trim();
        if !rest.is_empty() {
            sentences.push(rest.to_owned());
        }

        sentences
    }
}
