//! Integration tests for call handler greetings, caller input and
//! transfer options, including the recording upload workflow.

mod common;

use std::io::Write;

use cupi_api::{
    ApiOutcome, GreetingKind, GreetingUpdate, MenuEntryUpdate, MenuKey, Oid, PlayWhat, Resource, Stage,
    TransferAction, TransferOptionUpdate, TransferRule, WorkflowOutcome,
};
use serde_json::json;
use tempfile::NamedTempFile;
use wiremock::matchers::{body_bytes, body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

const LANGUAGE: u32 = 1033;

fn wav_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("failed to create temp file");
    file.write_all(b"RIFF\x24\x00\x00\x00WAVEfmt ").expect("failed to write temp file");
    file
}

// ---- recording upload ----

#[tokio::test]
async fn missing_recording_sends_nothing() {
    let (server, client) = common::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let missing = std::env::temp_dir().join(format!("{}.wav", common::fake_oid()));
    let outcome = client
        .update_call_handler_greeting_recording(&Oid::from("h-1"), GreetingKind::Standard, LANGUAGE, &missing)
        .await
        .unwrap();

    assert_eq!(outcome, WorkflowOutcome::FileNotFound { path: missing.clone() });
    assert_eq!(outcome.message(), format!("File not found: {}", missing.display()));
}

#[tokio::test]
async fn recording_upload_runs_three_stages() {
    let (server, client) = common::start().await;
    let file = wav_file();

    Mock::given(method("POST"))
        .and(path("/vmrest/voicefiles"))
        .respond_with(ResponseTemplate::new(201).set_body_string("tmp-token.wav"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/vmrest/voicefiles/tmp-token.wav"))
        .and(header("content-type", "audio/wav"))
        .and(body_bytes(b"RIFF\x24\x00\x00\x00WAVEfmt ".to_vec()))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/vmrest/handlers/callhandlers/h-1/greetings/Off%20Hours/greetingstreamfiles/1033"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"StreamFile": "tmp-token.wav"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client
        .update_call_handler_greeting_recording(&Oid::from("h-1"), GreetingKind::OffHours, LANGUAGE, file.path())
        .await
        .unwrap();

    assert!(outcome.is_completed());
    assert_eq!(outcome.message(), "Greeting Off Hours updated");
    assert!(outcome.created_oids().is_empty());
}

#[tokio::test]
async fn json_requests_after_upload_keep_json_content_type() {
    let (server, client) = common::start().await;

    Mock::given(method("PUT"))
        .and(path("/vmrest/voicefiles/abc.wav"))
        .and(header("content-type", "audio/wav"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/vmrest/handlers/callhandlers/h-1/greetings/Standard"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let uploaded = client
        .upload_voice_file("abc.wav", vec![0u8; 16], "audio/wav")
        .await
        .unwrap();
    assert!(uploaded.is_success());

    let update = GreetingUpdate {
        enabled: Some(true),
        play_what: Some(PlayWhat::Recording),
        time_expires: None,
    };
    let outcome = client
        .update_greeting(&Oid::from("h-1"), GreetingKind::Standard, &update)
        .await
        .unwrap();
    assert_eq!(outcome, ApiOutcome::Success("Greeting Standard updated".to_string()));
}

#[tokio::test]
async fn failed_upload_stops_before_assignment() {
    let (server, client) = common::start().await;
    let file = wav_file();

    Mock::given(method("POST"))
        .and(path("/vmrest/voicefiles"))
        .respond_with(ResponseTemplate::new(201).set_body_string("tmp-token.wav"))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/vmrest/voicefiles/tmp-token.wav"))
        .respond_with(ResponseTemplate::new(415).set_body_string("unsupported codec"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/vmrest/handlers/callhandlers/h-1/greetings/Standard/greetingstreamfiles/1033"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = client
        .update_call_handler_greeting_recording(&Oid::from("h-1"), GreetingKind::Standard, LANGUAGE, file.path())
        .await
        .unwrap();

    assert_eq!(outcome.failed_stage(), Some(Stage::VoiceFileUpload));
    assert_eq!(
        outcome.message(),
        "Failed to upload voice file: Unknown Result: 415 Unsupported Media Type unsupported codec"
    );
}

#[tokio::test]
async fn empty_voice_file_token_is_a_failure() {
    let (server, client) = common::start().await;
    let file = wav_file();

    Mock::given(method("POST"))
        .and(path("/vmrest/voicefiles"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = client
        .update_call_handler_greeting_recording(&Oid::from("h-1"), GreetingKind::Busy, LANGUAGE, file.path())
        .await
        .unwrap();

    assert_eq!(outcome.failed_stage(), Some(Stage::TempVoiceFile));
}

#[tokio::test]
async fn rejected_temp_voice_file_stops_before_upload() {
    let (server, client) = common::start().await;
    let file = wav_file();

    Mock::given(method("POST"))
        .and(path("/vmrest/voicefiles"))
        .respond_with(ResponseTemplate::new(403).set_body_string("no rights"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = client
        .update_call_handler_greeting_recording(&Oid::from("h-1"), GreetingKind::Standard, LANGUAGE, file.path())
        .await
        .unwrap();

    assert_eq!(outcome.failed_stage(), Some(Stage::TempVoiceFile));
    assert_eq!(
        outcome.message(),
        "Failed to create temporary voice file: Unknown Result: 403 Forbidden no rights"
    );
}

#[tokio::test]
async fn missing_stream_file_fails_assignment() {
    let (server, client) = common::start().await;
    let file = wav_file();

    Mock::given(method("POST"))
        .and(path("/vmrest/voicefiles"))
        .respond_with(ResponseTemplate::new(201).set_body_string("tmp-token.wav"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/vmrest/voicefiles/tmp-token.wav"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/vmrest/handlers/callhandlers/h-1/greetings/Holiday/greetingstreamfiles/1033"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client
        .update_call_handler_greeting_recording(&Oid::from("h-1"), GreetingKind::Holiday, LANGUAGE, file.path())
        .await
        .unwrap();

    assert_eq!(outcome.failed_stage(), Some(Stage::GreetingStreamFile));
    assert_eq!(
        outcome.message(),
        "Failed to assign greeting stream file: Greeting stream file not found"
    );
}

// ---- recorded audio ----

#[tokio::test]
async fn greeting_audio_download() {
    let (server, client) = common::start().await;
    let audio = b"RIFF\x24\x00\x00\x00WAVEfmt ".to_vec();

    Mock::given(method("GET"))
        .and(path("/vmrest/handlers/callhandlers/h-1/greetings/Off%20Hours/greetingstreamfiles/1033/audio"))
        .and(header("accept", "audio/wav"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(audio.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client
        .greeting_stream_file_audio(&Oid::from("h-1"), GreetingKind::OffHours, LANGUAGE)
        .await
        .unwrap();
    assert_eq!(outcome, ApiOutcome::Success(audio));
}

#[tokio::test]
async fn greeting_audio_not_found() {
    let (server, client) = common::start().await;

    Mock::given(method("GET"))
        .and(path("/vmrest/handlers/callhandlers/h-1/greetings/Busy/greetingstreamfiles/1036/audio"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client
        .greeting_stream_file_audio(&Oid::from("h-1"), GreetingKind::Busy, 1036)
        .await
        .unwrap();
    assert_eq!(outcome, ApiOutcome::NotFound(Resource::GreetingStreamFile));
    assert_eq!(outcome.rejection_message().unwrap(), "Greeting stream file not found");
}

// ---- greetings, menu entries, transfer options ----

#[tokio::test]
async fn greetings_list_is_normalized() {
    let (server, client) = common::start().await;

    Mock::given(method("GET"))
        .and(path("/vmrest/handlers/callhandlers/h-1/greetings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "@total": "2",
            "Greeting": [
                {"GreetingType": "Standard", "Enabled": "true"},
                {"GreetingType": "Alternate", "Enabled": "false"}
            ]
        })))
        .mount(&server)
        .await;

    let greetings = client.greetings(&Oid::from("h-1")).await.unwrap().success().unwrap();
    assert_eq!(greetings.len(), 2);
    assert_eq!(greetings[1]["GreetingType"], "Alternate");
}

#[tokio::test]
async fn pound_key_menu_entry_is_path_encoded() {
    let (server, client) = common::start().await;

    Mock::given(method("PUT"))
        .and(path("/vmrest/handlers/callhandlers/h-1/menuentries/%23"))
        .and(body_json(json!({
            "Action": "2",
            "TargetConversation": "PHTransfer",
            "TargetHandlerObjectId": "h-2"
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let key: MenuKey = "#".parse().unwrap();
    let outcome = client
        .update_menu_entry(&Oid::from("h-1"), key, &MenuEntryUpdate::transfer_to(Oid::from("h-2")))
        .await
        .unwrap();
    assert_eq!(outcome.message(), "Menu entry # updated");
}

#[tokio::test]
async fn transfer_option_update() {
    let (server, client) = common::start().await;

    Mock::given(method("PUT"))
        .and(path("/vmrest/handlers/callhandlers/h-1/transferoptions/Standard"))
        .and(body_json(json!({"Action": "1", "Extension": "5001"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let update = TransferOptionUpdate {
        action: Some(TransferAction::Extension),
        extension: Some("5001".into()),
        ..TransferOptionUpdate::default()
    };
    let outcome = client
        .update_transfer_option(&Oid::from("h-1"), TransferRule::Standard, &update)
        .await
        .unwrap();
    assert_eq!(outcome.message(), "Transfer option Standard updated");
}
