use voicevox_client::{Error, Player};

#[test]
fn whole_stream_is_delivered_before_play_returns() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("received.wav");
    let done = dir.path().join("done");
    let script = format!(
        "cat > '{}'; sleep 0.2; touch '{}'",
        out.display(),
        done.display(),
    );
    let player = Player::new("sh", ["-c".to_owned(), script]);

    let stream: Vec<u8> = (0..=255u8).cycle().take(1 << 20).collect();
    player.play(&stream).unwrap();

    assert!(done.exists(), "play returned before the player exited");
    assert_eq!(std::fs::read(&out).unwrap(), stream);
}

#[test]
fn non_zero_exit_is_reported() {
    let player = Player::new("sh", ["-c", "cat > /dev/null; exit 3"]);
    let err = player.play(b"RIFF").unwrap_err();
    match err {
        Error::PlaybackExit(status) => assert_eq!(status.code(), Some(3)),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn player_that_stops_reading_but_succeeds_is_ok() {
    let player = Player::new("true", Vec::<String>::new());
    let stream = vec![0u8; 4 << 20];
    player.play(&stream).unwrap();
}

#[test]
fn early_exit_of_player_never_races() {
    let player = Player::new("true", Vec::<String>::new());
    for _ in 0..200 {
        player.play(b"RIFF").unwrap();
    }
}

#[test]
fn player_that_stops_reading_and_fails_reports_exit() {
    let player = Player::new("sh", ["-c", "exit 4"]);
    let stream = vec![0u8; 4 << 20];
    match player.play(&stream).unwrap_err() {
        Error::PlaybackExit(status) => assert_eq!(status.code(), Some(4)),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn missing_program_fails_to_spawn() {
    let player = Player::new("voicevox-client-no-such-player", Vec::<String>::new());
    assert!(matches!(player.play(b"RIFF"), Err(Error::Io(_))));
}
