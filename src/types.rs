
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw WAV bytes as returned by the synthesis endpoints (S16LE, 24 kHz, mono).
pub type AudioStream = Vec<u8>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct AudioQuery {
    pub accent_phrases: Vec<AccentPhrase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch_scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intonation_scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_phoneme_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_phoneme_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_sampling_rate: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_stereo: Option<bool>,
    #[serde(default)]
    pub kana: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AccentPhrase {
    pub moras: Vec<Mora>,
    pub accent: i32,
    #[serde(default)]
    pub pause_mora: Option<Mora>,
    #[serde(default)]
    pub is_interrogative: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Mora {
    pub text: String,
    pub vowel: String,
    pub vowel_length: f64,
    pub pitch: f64,
    #[serde(default)]
    pub consonant: Option<String>,
    #[serde(default)]
    pub consonant_length: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Speaker {
    pub name: String,
    pub speaker_uuid: String,
    pub styles: Vec<SpeakerStyle>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SpeakerStyle {
    pub name: String,
    pub id: u32,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StyleEntry {
    pub speaker_id: u32,
    pub speaker_name: String,
    pub style_name: String,
    pub speaker_uuid: String,
}

impl Speaker {
    pub fn style_entries(&self) -> impl Iterator<Item = StyleEntry> + '_ {
        self.styles.iter().map(move |style| StyleEntry {
            speaker_id: style.id,
            speaker_name: self.name.clone(),
            style_name: style.name.clone(),
            speaker_uuid: self.speaker_uuid.clone(),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserDictWord {
    pub surface: String,
    pub pronunciation: String,
    pub accent_type: i32,
    #[serde(default)]
    pub priority: Option<u32>,
    #[serde(default)]
    pub mora_count: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minimal_query_parses() {
        let query: AudioQuery = serde_json::from_value(json!({"kana": "コンニチワ", "accent_phrases": []})).unwrap();
        assert_eq!(query.kana.as_deref(), Some("コンニチワ"));
        assert!(query.accent_phrases.is_empty());
        assert!(query.speed_scale.is_none());
    }

    #[test]
    fn unknown_query_fields_survive_reserialization() {
        let source = json!({
            "accent_phrases": [],
            "speedScale": 1.0,
            "speed_scale": 1.2,
            "pauseLengthScale": 1.0,
            "kana": "ア'",
        });
        let query: AudioQuery = serde_json::from_value(source).unwrap();
        assert_eq!(query.speed_scale, Some(1.2));
        let back = serde_json::to_value(&query).unwrap();
        assert_eq!(back["pauseLengthScale"], json!(1.0));
        assert_eq!(back["speedScale"], json!(1.0));
        assert_eq!(back["speed_scale"], json!(1.2));
    }

    #[test]
    fn unknown_mora_fields_survive_reserialization() {
        let phrase: AccentPhrase = serde_json::from_value(json!({
            "moras": [{"text": "ア", "vowel": "a", "vowel_length": 0.1, "pitch": 5.5, "vowel_pitch_shift": 0.25}],
            "accent": 1,
            "pause_mora": {"text": "、", "vowel": "pau", "vowel_length": 0.3, "pitch": 0.0, "pause_kind": "comma"},
        }))
        .unwrap();
        assert_eq!(phrase.moras[0].extra["vowel_pitch_shift"], json!(0.25));

        let back = serde_json::to_value(&phrase).unwrap();
        assert_eq!(back["moras"][0]["vowel_pitch_shift"], json!(0.25));
        assert_eq!(back["pause_mora"]["pause_kind"], json!("comma"));
        assert_eq!(back["moras"][0]["text"], json!("ア"));
    }

    #[test]
    fn speaker_styles_flatten_with_character_name() {
        let speaker: Speaker = serde_json::from_value(json!({
            "name": "四国めたん",
            "speaker_uuid": "7ffcb7ce-00ec-4bdc-82cd-45a8889e43ff",
            "styles": [{"name": "ノーマル", "id": 2}, {"name": "あまあま", "id": 0}],
            "version": "0.14.0",
        }))
        .unwrap();
        let entries: Vec<_> = speaker.style_entries().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].speaker_id, 0);
        assert_eq!(entries[1].speaker_name, "四国めたん");
        assert_eq!(entries[1].style_name, "あまあま");
    }
}
