
use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::{ClientConfig, DEFAULT_PLAY_COMMAND};
use crate::error::{ProtocolError, ProtocolFailure, Result};
use crate::playback::Player;
use crate::transport::{HttpTransport, Request, Response, Transport};
use crate::types::{AccentPhrase, AudioQuery, AudioStream, Speaker, StyleEntry, UserDictWord};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Expect {
    Ok,
    NoContent,
}

impl Expect {
    fn status(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::NoContent => 204,
        }
    }
}

fn check(response: Response, expect: Expect) -> Result<Response> {
    if response.status == expect.status() {
        return Ok(response);
    }
    log::warn!("Engine answered {} where {} was expected", response.status, expect.status());
    let failure = ProtocolFailure::from_response(response.status, response.reason(), &response.body);
    Err(ProtocolError::new(failure).into())
}

pub struct VoicevoxClient<T = HttpTransport> {
    transport: T,
    player: Player,
    config: ClientConfig,
}

impl VoicevoxClient<HttpTransport> {
    pub fn new(config: ClientConfig) -> Self {
        let transport = HttpTransport::new(&config);
        let player = match Player::from_command_line(&config.play_command) {
            Some(player) => player,
            None => {
                log::warn!("Play command is empty, falling back to `{}`", DEFAULT_PLAY_COMMAND);
                Player::default()
            },
        };
        log::debug!("Engine at {}, playing with {:?}", config.base_url(), player);
        Self {
            transport,
            player,
            config,
        }
    }

    pub fn from_env() -> Self {
        Self::new(ClientConfig::from_env())
    }
}

impl Default for VoicevoxClient<HttpTransport> {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl<T: Transport> VoicevoxClient<T> {
    pub fn with_transport(transport: T, player: Player, config: ClientConfig) -> Self {
        Self {
            transport,
            player,
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn close(self) {
        log::debug!("Closing connection to {}", self.config.base_url());
    }

    fn call(&self, request: Request, expect: Expect) -> Result<Response> {
        let response = self.transport.send(request)?;
        check(response, expect)
    }

    fn call_json<R: DeserializeOwned>(&self, request: Request) -> Result<R> {
        let response = self.call(request, Expect::Ok)?;
        Ok(serde_json::from_slice(&response.body)?)
    }

    pub fn audio_query(&self, speaker: u32, text: &str) -> Result<AudioQuery> {
        let request = Request::post("/audio_query")
            .param("speaker", speaker)
            .param("text", text);
        self.call_json(request)
    }

    /// Like [`audio_query`](Self::audio_query), but lets `mutate` rewrite the
    /// kana reading. The accent phrases are then regenerated from the new kana,
    /// since synthesis follows the accent phrases rather than the kana.
    pub fn audio_query_with<F>(&self, speaker: u32, text: &str, mutate: F) -> Result<AudioQuery>
    where
        F: FnOnce(&str) -> String,
    {
        let mut query = self.audio_query(speaker, text)?;
        let kana = mutate(query.kana.as_deref().unwrap_or_default());
        log::debug!("Regenerating accent phrases from edited kana: {}", kana);
        query.accent_phrases = self.accent_phrases(speaker, &kana, true)?;
        query.kana = Some(kana);
        Ok(query)
    }

    /// Analyses `text` into accent phrases.
    ///
    /// With `is_kana` set, `text` is read as AquesTalk-like kana notation:
    /// katakana only, phrases split by `/` or `、` (the latter inserts a pause),
    /// `_` devoices the next mora, `'` marks the accent nucleus (one per phrase)
    /// and a trailing `？` makes the phrase interrogative.
    pub fn accent_phrases(&self, speaker: u32, text: &str, is_kana: bool) -> Result<Vec<AccentPhrase>> {
        let request = Request::post("/accent_phrases")
            .param("speaker", speaker)
            .param("text", text)
            .param("is_kana", is_kana);
        self.call_json(request)
    }

    pub fn synthesis(&self, speaker: u32, query: &AudioQuery) -> Result<AudioStream> {
        let request = Request::post("/synthesis")
            .param("speaker", speaker)
            .json(query)?;
        Ok(self.call(request, Expect::Ok)?.body)
    }

    /// Same as [`synthesis`](Self::synthesis) on an endpoint the engine aborts
    /// when the connection drops. Engines started without
    /// `--enable_cancellable_synthesis` reject this endpoint.
    pub fn cancellable_synthesis(&self, speaker: u32, query: &AudioQuery) -> Result<AudioStream> {
        let request = Request::post("/cancellable_synthesis")
            .param("speaker", speaker)
            .json(query)?;
        Ok(self.call(request, Expect::Ok)?.body)
    }

    /// Synthesizes with `base_speaker`'s voice moved towards `target_speaker`
    /// by `morph_rate` (0.0 to 1.0). The rate is passed through unchecked and
    /// the engine decides what to do with values out of range.
    pub fn synthesis_morphing(&self, base_speaker: u32, target_speaker: u32, morph_rate: f64, query: &AudioQuery) -> Result<AudioStream> {
        let request = Request::post("/synthesis_morphing")
            .param("base_speaker", base_speaker)
            .param("target_speaker", target_speaker)
            .param("morph_rate", morph_rate)
            .json(query)?;
        Ok(self.call(request, Expect::Ok)?.body)
    }

    pub fn speakers(&self) -> Result<Vec<Speaker>> {
        self.call_json(Request::get("/speakers"))
    }

    pub fn styles(&self) -> Result<Vec<StyleEntry>> {
        let speakers = self.speakers()?;
        Ok(speakers.iter().flat_map(Speaker::style_entries).collect())
    }

    pub fn speaker_info(&self, speaker_uuid: &str) -> Result<Value> {
        self.call_json(Request::get("/speaker_info").param("speaker_uuid", speaker_uuid))
    }

    pub fn user_dict(&self) -> Result<BTreeMap<String, UserDictWord>> {
        self.call_json(Request::get("/user_dict"))
    }

    pub fn add_user_dict_word(&self, surface: &str, pronunciation: &str, accent_type: i32) -> Result<String> {
        let request = Request::post("/user_dict_word")
            .param("surface", surface)
            .param("pronunciation", pronunciation)
            .param("accent_type", accent_type);
        let response = self.call(request, Expect::Ok)?;
        let uuid = match serde_json::from_slice::<String>(&response.body) {
            Ok(uuid) => uuid,
            Err(_) => String::from_utf8_lossy(&response.body).trim().to_owned(),
        };
        Ok(uuid)
    }

    pub fn update_user_dict_word(&self, uuid: &str, surface: &str, pronunciation: &str, accent_type: i32) -> Result<bool> {
        let request = Request::put(format!("/user_dict_word/{}", uuid))
            .param("surface", surface)
            .param("pronunciation", pronunciation)
            .param("accent_type", accent_type);
        self.call(request, Expect::NoContent)?;
        Ok(true)
    }

    pub fn delete_user_dict_word(&self, uuid: &str) -> Result<bool> {
        self.call(Request::delete(format!("/user_dict_word/{}", uuid)), Expect::NoContent)?;
        Ok(true)
    }

    pub fn presets(&self) -> Result<Vec<Value>> {
        self.call_json(Request::get("/presets"))
    }

    pub fn version(&self) -> Result<String> {
        let version: Value = self.call_json(Request::get("/version"))?;
        Ok(match version {
            Value::String(version) => version,
            other => other.to_string(),
        })
    }

    pub fn play(&self, stream: &[u8]) -> Result<()> {
        self.player.play(stream)
    }

    pub fn synthesize_wav(&self, speaker: u32, text: &str) -> Result<AudioStream> {
        let query = self.audio_query(speaker, text)?;
        self.synthesis(speaker, &query)
    }

    pub fn synthesize_wav_with<F>(&self, speaker: u32, text: &str, mutate: F) -> Result<AudioStream>
    where
        F: FnOnce(&str) -> String,
    {
        let query = self.audio_query_with(speaker, text, mutate)?;
        self.synthesis(speaker, &query)
    }

    pub fn speak(&self, speaker: u32, text: &str) -> Result<()> {
        let wav = self.synthesize_wav(speaker, text)?;
        self.play(&wav)
    }

    pub fn speak_with<F>(&self, speaker: u32, text: &str, mutate: F) -> Result<()>
    where
        F: FnOnce(&str) -> String,
    {
        let wav = self.synthesize_wav_with(speaker, text, mutate)?;
        self.play(&wav)
    }
}
