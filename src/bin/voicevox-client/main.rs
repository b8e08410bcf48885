
use voicevox_client::{ClientConfig, TextSplitter, VoicevoxClient};
use voicevox_client::types::AudioQuery;

use std::io::Write;
use std::io::Read;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(about = "VOICEVOX engine client", long_about = None, version)]
struct Cli {
    /// Engine host (default: $VOICEVOX_HOST or 127.0.0.1)
    #[arg(long, global = true)]
    host: Option<String>,

    /// Engine port (default: $VOICEVOX_PORT or 50021)
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Command fed the WAV stream on stdin (default: $VOICEVOX_PLAY_CMD or aplay)
    #[arg(long, global = true)]
    play_cmd: Option<String>,

    #[command(subcommand)]
    subcommand: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Reads text (argument or stdin) aloud, sentence by sentence
    Speak {
        /// Speaker ID
        #[arg(long, default_value = "1")]
        speaker_id: u32,

        /// Replace the kana reading (AquesTalk-like notation) before synthesis
        #[arg(long)]
        kana: Option<String>,

        /// Text to speak; read from stdin when omitted
        text: Option<String>,
    },

    /// Writes synthesized WAV to stdout
    Synth {
        /// Speaker ID
        #[arg(long, default_value = "1")]
        speaker_id: u32,

        /// Replace the kana reading (AquesTalk-like notation) before synthesis
        #[arg(long)]
        kana: Option<String>,

        /// Use the cancellable synthesis endpoint
        #[arg(long)]
        cancellable: bool,

        /// Text to synthesize; read from stdin when omitted
        text: Option<String>,
    },

    /// Writes WAV morphed between two speakers to stdout
    #[command(arg_required_else_help = true)]
    Morph {
        #[arg(long)]
        base_speaker: u32,

        #[arg(long)]
        target_speaker: u32,

        /// 0.0 (base) to 1.0 (target)
        #[arg(long, default_value_t = 0.5)]
        morph_rate: f64,

        /// Text to synthesize; read from stdin when omitted
        text: Option<String>,
    },

    /// List speakers
    #[command()]
    Speakers {
        /// JSON output
        #[arg(long)]
        json: bool,
    },

    /// Print the detail document of a speaker
    #[command(arg_required_else_help = true)]
    SpeakerInfo {
        speaker_uuid: String,
    },

    /// Print the engine presets as JSON
    Presets,

    /// Print the engine version
    Version,

    /// Manage the user dictionary
    #[command(subcommand)]
    Dict(DictCommand),
}

#[derive(Debug, Subcommand)]
enum DictCommand {
    /// List registered words
    List,

    /// Register a word and print its UUID
    Add {
        surface: String,
        /// Reading in katakana
        pronunciation: String,
        /// Position of the accent nucleus
        accent_type: i32,
    },

    /// Rewrite a registered word
    Update {
        uuid: String,
        surface: String,
        pronunciation: String,
        accent_type: i32,
    },

    /// Remove a registered word
    Delete {
        uuid: String,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(play_cmd) = args.play_cmd {
        config.play_command = play_cmd;
    }
    log::debug!("Using engine at {}", config.base_url());
    let client = VoicevoxClient::new(config);

    match args.subcommand {
        Command::Speak { speaker_id, kana, text } => {
            let speaker_id = resolve_speaker(&client, speaker_id)?;
            let text = input_text(text)?;

            if let Some(kana) = kana {
                log::info!("Speaking with kana: {}", kana);
                client.speak_with(speaker_id, &text, |_| kana)?;
            } else {
                for sentence in TextSplitter::new().split_text(&text) {
                    log::info!("Speaking: {}", sentence);
                    client.speak(speaker_id, &sentence)?;
                }
            }
        },

        Command::Synth { speaker_id, kana, cancellable, text } => {
            let text = input_text(text)?;
            let query = match kana {
                Some(kana) => client.audio_query_with(speaker_id, &text, |_| kana)?,
                None => client.audio_query(speaker_id, &text)?,
            };
            log::debug!("Query kana: {:?}", query.kana);

            let wav = if cancellable {
                client.cancellable_synthesis(speaker_id, &query)?
            } else {
                client.synthesis(speaker_id, &query)?
            };
            std::io::stdout().write_all(wav.as_slice())?;
        },

        Command::Morph { base_speaker, target_speaker, morph_rate, text } => {
            if !(0.0..=1.0).contains(&morph_rate) {
                log::warn!("Morph rate {} is outside 0.0..=1.0; the engine may reject it.", morph_rate);
            }
            let text = input_text(text)?;
            let query: AudioQuery = client.audio_query(base_speaker, &text)?;
            let wav = client.synthesis_morphing(base_speaker, target_speaker, morph_rate, &query)?;
            std::io::stdout().write_all(wav.as_slice())?;
        },

        Command::Speakers { json } => {
            if json {
                print_json(&client.speakers()?)?;
            } else {
                println!("SPEAKER_ID\tSPEAKER_NAME\tSTYLE_NAME");
                for style in client.styles()? {
                    println!("{}\t{}\t{}", style.speaker_id, style.speaker_name, style.style_name);
                }
            }
        },

        Command::SpeakerInfo { speaker_uuid } => {
            print_json(&client.speaker_info(&speaker_uuid)?)?;
        },

        Command::Presets => {
            print_json(&client.presets()?)?;
        },

        Command::Version => {
            println!("{}", client.version()?);
        },

        Command::Dict(DictCommand::List) => {
            println!("UUID\tSURFACE\tPRONUNCIATION\tACCENT_TYPE");
            for (uuid, word) in client.user_dict()? {
                println!("{}\t{}\t{}\t{}", uuid, word.surface, word.pronunciation, word.accent_type);
            }
        },

        Command::Dict(DictCommand::Add { surface, pronunciation, accent_type }) => {
            let uuid = client.add_user_dict_word(&surface, &pronunciation, accent_type)?;
            println!("{}", uuid);
        },

        Command::Dict(DictCommand::Update { uuid, surface, pronunciation, accent_type }) => {
            client.update_user_dict_word(&uuid, &surface, &pronunciation, accent_type)?;
            log::info!("Updated {}", uuid);
        },

        Command::Dict(DictCommand::Delete { uuid }) => {
            client.delete_user_dict_word(&uuid)?;
            log::info!("Deleted {}", uuid);
        },
    }

    client.close();

    Ok(())
}

fn input_text(text: Option<String>) -> anyhow::Result<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut text = String::new();
            let _ = std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        },
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    std::io::stdout().write_all(json.as_bytes())?;
    Ok(())
}

fn resolve_speaker(client: &VoicevoxClient, speaker_id: u32) -> anyhow::Result<u32> {
    let styles = client.styles()?;

    if let Some(style) = styles.iter().find(|s| s.speaker_id == speaker_id) {
        log::info!("Speaker: {}、スタイル {}", style.speaker_name, style.style_name);
        Ok(speaker_id)
    } else if let Some(style) = styles.first() {
        log::warn!("Speaker ID {} not found. Using the first speaker ID {}.", speaker_id, style.speaker_id);
        Ok(style.speaker_id)
    } else {
        log::error!("No speakers found.");
        Err(anyhow::anyhow!("No speakers found."))
    }
}
