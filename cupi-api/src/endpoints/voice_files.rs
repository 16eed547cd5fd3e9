//! Temporary voice file endpoints.
//!
//! Audio reaches the server in two requests: create a placeholder, then
//! PUT the bytes to it. The placeholder's token can then be assigned to a
//! greeting stream file.

use cupi_core::error::CuResult;

use crate::client::ApiClient;
use crate::response::{ApiOutcome, Resource};
use crate::wire;

impl ApiClient {
    /// Create a temporary voice file placeholder and return its token.
    pub async fn create_temp_voice_file(&self) -> CuResult<ApiOutcome<String>> {
        let raw = self.post_empty("/voicefiles").await?;
        let token = raw.body.trim().trim_matches('"').to_string();
        if raw.status == 201 && token.is_empty() {
            return Ok(ApiOutcome::Failure(raw.into_failure()));
        }
        Ok(raw.expect(201, Resource::VoiceFile).map(|_| token))
    }

    /// Upload audio to a temporary voice file.
    pub async fn upload_voice_file(
        &self,
        token: &str,
        audio: Vec<u8>,
        content_type: &str,
    ) -> CuResult<ApiOutcome<String>> {
        let path = format!("/voicefiles/{}", wire::path_segment(token));
        Ok(self
            .put_bytes(&path, audio, content_type)
            .await?
            .expect_no_content(Resource::VoiceFile, "Voice file uploaded".into()))
    }
}
