//! User and credential endpoints.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use cupi_core::error::CuResult;

use crate::client::ApiClient;
use crate::response::{ApiOutcome, Created, Listing, Oid, Projection, Resource};
use crate::wire;
use crate::workflow::{Pipeline, Stage, WorkflowOutcome};

/// Parameters for creating a user from a template.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewUser {
    pub alias: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Extension callers dial to reach the user.
    pub dtmf_access_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Server time zone id; the template's when `None`.
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "wire::opt_num_token")]
    pub time_zone: Option<u32>,
    /// Locale id such as 1033; the template's when `None`.
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "wire::opt_num_token")]
    pub language: Option<u32>,
    /// Play the first-time enrollment conversation at first login.
    #[serde(serialize_with = "wire::bool_token")]
    pub is_set_for_vm_enrollment: bool,
    /// Alias of the user template, sent as a query parameter.
    #[serde(skip)]
    pub template_alias: String,
    /// When false, the template's "pin must change" flag is cleared right
    /// after the user is created.
    #[serde(skip)]
    pub cred_must_change: bool,
}

impl NewUser {
    pub fn new(alias: &str, dtmf_access_id: &str, template_alias: &str) -> Self {
        Self {
            alias: alias.to_string(),
            display_name: None,
            dtmf_access_id: dtmf_access_id.to_string(),
            first_name: None,
            last_name: None,
            time_zone: None,
            language: None,
            is_set_for_vm_enrollment: true,
            template_alias: template_alias.to_string(),
            cred_must_change: true,
        }
    }
}

/// Changes to a pin or password credential. Unset fields are left alone.
#[derive(Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CredentialUpdate {
    /// The new pin or password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<String>,
    #[serde(
        rename = "CredMustChange",
        skip_serializing_if = "Option::is_none",
        serialize_with = "wire::opt_bool_token"
    )]
    pub must_change: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "wire::opt_bool_token")]
    pub locked: Option<bool>,
    #[serde(
        rename = "DoesntExpire",
        skip_serializing_if = "Option::is_none",
        serialize_with = "wire::opt_bool_token"
    )]
    pub does_not_expire: Option<bool>,
}

impl CredentialUpdate {
    /// Only set or clear the "must change at next login" flag.
    pub fn must_change(value: bool) -> Self {
        Self {
            must_change: Some(value),
            ..Self::default()
        }
    }

    /// Replace the credential value.
    pub fn credentials(value: &str) -> Self {
        Self {
            credentials: Some(value.to_string()),
            ..Self::default()
        }
    }
}

impl fmt::Debug for CredentialUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialUpdate")
            .field("credentials", &self.credentials.as_ref().map(|_| "<redacted>"))
            .field("must_change", &self.must_change)
            .field("locked", &self.locked)
            .field("does_not_expire", &self.does_not_expire)
            .finish()
    }
}

impl ApiClient {
    /// List users. The mini view pairs each alias with its OID.
    pub async fn users(&self, projection: Projection) -> CuResult<ApiOutcome<Listing>> {
        let outcome = self.get("/users").await?.expect_json(Resource::User)?;
        Ok(outcome.map(|v| Listing::project(v, "User", "Alias", projection)))
    }

    /// Get a user by OID.
    pub async fn user(&self, oid: &Oid) -> CuResult<ApiOutcome<Value>> {
        Ok(self.get(&format!("/users/{oid}")).await?.expect_json(Resource::User)?)
    }

    /// OID of the call handler that belongs to a user.
    pub async fn user_call_handler_oid(&self, user_oid: &Oid) -> CuResult<ApiOutcome<Oid>> {
        let outcome = self.user(user_oid).await?;
        Ok(match outcome {
            ApiOutcome::Success(user) => user
                .get("CallHandlerObjectId")
                .and_then(Value::as_str)
                .map(|oid| ApiOutcome::Success(Oid::from(oid)))
                .unwrap_or(ApiOutcome::NotFound(Resource::CallHandler)),
            ApiOutcome::NotFound(resource) => ApiOutcome::NotFound(resource),
            ApiOutcome::Failure(failure) => ApiOutcome::Failure(failure),
        })
    }

    /// Create the user record only. See [`ApiClient::add_user`].
    pub async fn create_user(&self, user: &NewUser) -> CuResult<ApiOutcome<Created>> {
        let path = format!("/users?templateAlias={}", wire::path_segment(&user.template_alias));
        Ok(self
            .post(&path, user)
            .await?
            .expect_created(Resource::User, "User created"))
    }

    /// Create a user, then clear the pin must-change flag when the caller
    /// asked for that.
    ///
    /// Issues one request when `cred_must_change` is true and two when it
    /// is false. If the pin update is rejected the user still exists and
    /// its OID is reported in the outcome.
    pub async fn add_user(&self, user: &NewUser) -> CuResult<WorkflowOutcome> {
        let mut pipeline = Pipeline::new();

        let created = match pipeline.stage(Stage::User, self.create_user(user).await?) {
            Ok(created) => created,
            Err(failed) => return Ok(failed),
        };
        pipeline.record(created.oid.clone());

        if !user.cred_must_change {
            let outcome = self
                .update_user_pin(&created.oid, &CredentialUpdate::must_change(false))
                .await?;
            if let Err(failed) = pipeline.stage(Stage::UserPin, outcome) {
                return Ok(failed);
            }
        }

        info!(alias = %user.alias, oid = %created.oid, "user added");
        Ok(pipeline.complete("User added"))
    }

    /// Update arbitrary user fields.
    pub async fn update_user(&self, oid: &Oid, fields: &Value) -> CuResult<ApiOutcome<String>> {
        Ok(self
            .put(&format!("/users/{oid}"), fields)
            .await?
            .expect_no_content(Resource::User, "User updated".into()))
    }

    /// Delete a user.
    pub async fn delete_user(&self, oid: &Oid) -> CuResult<ApiOutcome<String>> {
        Ok(self
            .delete(&format!("/users/{oid}"))
            .await?
            .expect_no_content(Resource::User, "User deleted".into()))
    }

    /// Get a user's pin settings (expiry, lock state, must-change flag).
    pub async fn user_pin_settings(&self, oid: &Oid) -> CuResult<ApiOutcome<Value>> {
        Ok(self
            .get(&format!("/users/{oid}/credential/pin"))
            .await?
            .expect_json(Resource::Credential)?)
    }

    /// Get a user's web password settings.
    pub async fn user_password_settings(&self, oid: &Oid) -> CuResult<ApiOutcome<Value>> {
        Ok(self
            .get(&format!("/users/{oid}/credential/password"))
            .await?
            .expect_json(Resource::Credential)?)
    }

    /// Change a user's voicemail pin or its flags.
    pub async fn update_user_pin(&self, oid: &Oid, update: &CredentialUpdate) -> CuResult<ApiOutcome<String>> {
        Ok(self
            .put(&format!("/users/{oid}/credential/pin"), update)
            .await?
            .expect_no_content(Resource::Credential, "Pin updated".into()))
    }

    /// Change a user's web password or its flags.
    pub async fn update_user_password(
        &self,
        oid: &Oid,
        update: &CredentialUpdate,
    ) -> CuResult<ApiOutcome<String>> {
        Ok(self
            .put(&format!("/users/{oid}/credential/password"), update)
            .await?
            .expect_no_content(Resource::Credential, "Password updated".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_serialize() {
        let mut user = NewUser::new("jsmith", "5001", "voicemailusertemplate");
        user.first_name = Some("Jane".into());
        user.language = Some(1033);
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["Alias"], "jsmith");
        assert_eq!(json["DtmfAccessId"], "5001");
        assert_eq!(json["FirstName"], "Jane");
        assert_eq!(json["Language"], "1033");
        assert_eq!(json["IsSetForVmEnrollment"], "true");
        assert!(json.get("LastName").is_none());
        assert!(json.get("TemplateAlias").is_none());
        assert!(json.get("CredMustChange").is_none());
    }

    #[test]
    fn test_credential_update_serialize() {
        let json = serde_json::to_value(CredentialUpdate::must_change(false)).unwrap();
        assert_eq!(json, serde_json::json!({"CredMustChange": "false"}));

        let mut update = CredentialUpdate::credentials("8675309");
        update.does_not_expire = Some(true);
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["Credentials"], "8675309");
        assert_eq!(json["DoesntExpire"], "true");
    }

    #[test]
    fn test_credential_update_debug_redacts() {
        let update = CredentialUpdate::credentials("8675309");
        assert!(!format!("{update:?}").contains("8675309"));
    }
}
