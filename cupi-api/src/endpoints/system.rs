//! Cluster and system endpoints.

use serde_json::Value;

use cupi_core::error::CuResult;

use crate::client::ApiClient;
use crate::response::{ApiOutcome, Resource};

impl ApiClient {
    /// Check the server answers, returning the raw status of `GET /cluster`.
    ///
    /// A 200 means the host is reachable and the credentials are accepted;
    /// a 401 means reachable but rejected.
    pub async fn online_test(&self) -> CuResult<u16> {
        Ok(self.get("/cluster").await?.status)
    }

    /// Get the cluster description.
    pub async fn cluster(&self) -> CuResult<ApiOutcome<Value>> {
        Ok(self.get("/cluster").await?.expect_json(Resource::Cluster)?)
    }

    /// Get the installed language map.
    pub async fn language_map(&self) -> CuResult<ApiOutcome<Value>> {
        Ok(self.get("/languagemap").await?.expect_json(Resource::LanguageMap)?)
    }
}
