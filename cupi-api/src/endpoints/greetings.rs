//! Call handler greeting endpoints.

use std::fmt;
use std::io;
use std::path::Path;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use serde_json::{json, Value};
use tracing::{info, warn};

use cupi_core::constants::AUDIO_CONTENT_TYPE;
use cupi_core::error::{CuError, CuResult};

use crate::client::ApiClient;
use crate::response::{collection, ApiOutcome, Oid, Resource};
use crate::wire;
use crate::workflow::{Pipeline, Stage, WorkflowOutcome};

/// Greeting slots every call handler has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GreetingKind {
    Standard,
    OffHours,
    Alternate,
    Busy,
    Internal,
    Error,
    Holiday,
}

impl GreetingKind {
    pub const ALL: [GreetingKind; 7] = [
        GreetingKind::Standard,
        GreetingKind::OffHours,
        GreetingKind::Alternate,
        GreetingKind::Busy,
        GreetingKind::Internal,
        GreetingKind::Error,
        GreetingKind::Holiday,
    ];

    /// Name the server uses for the greeting.
    pub fn name(&self) -> &'static str {
        match self {
            GreetingKind::Standard => "Standard",
            GreetingKind::OffHours => "Off Hours",
            GreetingKind::Alternate => "Alternate",
            GreetingKind::Busy => "Busy",
            GreetingKind::Internal => "Internal",
            GreetingKind::Error => "Error",
            GreetingKind::Holiday => "Holiday",
        }
    }

    fn path(&self, handler_oid: &Oid) -> String {
        format!(
            "/handlers/callhandlers/{handler_oid}/greetings/{}",
            wire::path_segment(self.name())
        )
    }
}

impl fmt::Display for GreetingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GreetingKind {
    type Err = CuError;

    /// Case-insensitive; "offhours", "off-hours" and "off hours" all work.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        GreetingKind::ALL
            .into_iter()
            .find(|kind| kind.name().replace(' ', "").to_ascii_lowercase() == folded)
            .ok_or_else(|| CuError::InvalidInput(format!("unknown greeting: {s}")))
    }
}

/// What a greeting plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayWhat {
    /// The system-generated greeting.
    System = 0,
    /// The recorded greeting.
    Recording = 1,
    /// Nothing.
    Nothing = 2,
}

impl Serialize for PlayWhat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&(*self as u8))
    }
}

/// Changes to a greeting. Unset fields are left alone.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GreetingUpdate {
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "wire::opt_bool_token")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub play_what: Option<PlayWhat>,
    /// When an enabled greeting switches itself off, as the server's
    /// timestamp text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_expires: Option<String>,
}

impl ApiClient {
    /// All greetings of a call handler.
    pub async fn greetings(&self, handler_oid: &Oid) -> CuResult<ApiOutcome<Vec<Value>>> {
        let outcome = self
            .get(&format!("/handlers/callhandlers/{handler_oid}/greetings"))
            .await?
            .expect_json(Resource::CallHandler)?;
        Ok(outcome.map(|v| collection(v, "Greeting")))
    }

    /// One greeting of a call handler.
    pub async fn greeting(&self, handler_oid: &Oid, kind: GreetingKind) -> CuResult<ApiOutcome<Value>> {
        Ok(self.get(&kind.path(handler_oid)).await?.expect_json(Resource::Greeting)?)
    }

    /// Enable, disable or change what a greeting plays.
    pub async fn update_greeting(
        &self,
        handler_oid: &Oid,
        kind: GreetingKind,
        update: &GreetingUpdate,
    ) -> CuResult<ApiOutcome<String>> {
        Ok(self
            .put(&kind.path(handler_oid), update)
            .await?
            .expect_no_content(Resource::Greeting, format!("Greeting {kind} updated")))
    }

    /// Stream file metadata of a greeting in one language.
    pub async fn greeting_stream_file(
        &self,
        handler_oid: &Oid,
        kind: GreetingKind,
        language: u32,
    ) -> CuResult<ApiOutcome<Value>> {
        Ok(self
            .get(&format!("{}/greetingstreamfiles/{language}", kind.path(handler_oid)))
            .await?
            .expect_json(Resource::GreetingStreamFile)?)
    }

    /// The recorded audio of a greeting in one language.
    pub async fn greeting_stream_file_audio(
        &self,
        handler_oid: &Oid,
        kind: GreetingKind,
        language: u32,
    ) -> CuResult<ApiOutcome<Vec<u8>>> {
        Ok(self
            .get_bytes(
                &format!("{}/greetingstreamfiles/{language}/audio", kind.path(handler_oid)),
                AUDIO_CONTENT_TYPE,
            )
            .await?
            .expect(200, Resource::GreetingStreamFile))
    }

    /// Point a greeting's stream file at an uploaded temporary voice file.
    pub async fn assign_greeting_stream_file(
        &self,
        handler_oid: &Oid,
        kind: GreetingKind,
        language: u32,
        token: &str,
    ) -> CuResult<ApiOutcome<String>> {
        Ok(self
            .put(
                &format!("{}/greetingstreamfiles/{language}", kind.path(handler_oid)),
                &json!({ "StreamFile": token }),
            )
            .await?
            .expect_no_content(Resource::GreetingStreamFile, format!("Greeting {kind} updated")))
    }

    /// Replace a greeting's recording with a local audio file.
    ///
    /// The file is read first; if it does not exist the outcome is
    /// `FileNotFound` and nothing is sent. Otherwise: create a temporary
    /// voice file, upload the audio to it as `audio/wav`, and assign it to
    /// the greeting in `language`. The first rejected step ends the
    /// workflow.
    pub async fn update_call_handler_greeting_recording(
        &self,
        handler_oid: &Oid,
        kind: GreetingKind,
        language: u32,
        path: &Path,
    ) -> CuResult<WorkflowOutcome> {
        let audio = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "greeting recording not found");
                return Ok(WorkflowOutcome::FileNotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let pipeline = Pipeline::new();

        let outcome = self.create_temp_voice_file().await?;
        let token = match pipeline.stage(Stage::TempVoiceFile, outcome) {
            Ok(token) => token,
            Err(failed) => return Ok(failed),
        };

        let outcome = self.upload_voice_file(&token, audio, AUDIO_CONTENT_TYPE).await?;
        if let Err(failed) = pipeline.stage(Stage::VoiceFileUpload, outcome) {
            return Ok(failed);
        }

        let outcome = self
            .assign_greeting_stream_file(handler_oid, kind, language, &token)
            .await?;
        if let Err(failed) = pipeline.stage(Stage::GreetingStreamFile, outcome) {
            return Ok(failed);
        }

        info!(handler = %handler_oid, greeting = %kind, language, "greeting recording updated");
        Ok(pipeline.complete(format!("Greeting {kind} updated")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_path_is_encoded() {
        let oid = Oid::from("h-1");
        assert_eq!(
            GreetingKind::OffHours.path(&oid),
            "/handlers/callhandlers/h-1/greetings/Off%20Hours"
        );
    }

    #[test]
    fn test_greeting_kind_from_str() {
        assert_eq!("off-hours".parse::<GreetingKind>().unwrap(), GreetingKind::OffHours);
        assert_eq!("Off Hours".parse::<GreetingKind>().unwrap(), GreetingKind::OffHours);
        assert_eq!("STANDARD".parse::<GreetingKind>().unwrap(), GreetingKind::Standard);
        assert!("weekend".parse::<GreetingKind>().is_err());
    }

    #[test]
    fn test_greeting_update_serialize() {
        let update = GreetingUpdate {
            enabled: Some(true),
            play_what: Some(PlayWhat::Recording),
            time_expires: None,
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"Enabled": "true", "PlayWhat": "1"}));
    }
}
