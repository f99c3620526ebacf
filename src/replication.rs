//! Remote Replication Client
//!
//! Best-effort mirroring of newly accepted rows to the spreadsheet webhook.
//! Each row is posted as a JSON object keyed by the schema column names, with
//! a refreshed timestamp. Delivery is bounded by an explicit [`RetryPolicy`]:
//! a fixed number of attempts with linearly increasing backoff in between.
//!
//! The local roster file is authoritative; replication never fails the
//! submission. A row that exhausts its attempts is reported as unsynced and
//! there is no durable retry queue.

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::RetryPolicy;
use crate::record::AthleteRecord;

pub struct SheetReplicator {
    endpoint: String,
    policy: RetryPolicy,
    client: reqwest::Client,
}

impl SheetReplicator {
    pub fn new(endpoint: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            endpoint: endpoint.into(),
            policy,
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Push one accepted row to the webhook. Returns whether any attempt got
    /// a success status; transport errors and error statuses only burn an
    /// attempt, they never surface as errors.
    pub async fn replicate(&self, record: &AthleteRecord) -> bool {
        let mut payload = match serde_json::to_value(record) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to encode row for replication: {}", e);
                return false;
            }
        };
        // The sheet keeps its own arrival time, distinct from the row's
        // registration timestamp.
        payload["Timestamp"] = Value::String(Utc::now().to_rfc3339());

        for attempt in 1..=self.policy.max_attempts {
            match self
                .client
                .post(&self.endpoint)
                .timeout(self.policy.request_timeout())
                .json(&payload)
                .send()
                .await
            {
                Ok(resp) if resp.status().is_success() => {
                    debug!(
                        "Replicated '{}' on attempt {}/{}",
                        record.athlete_name, attempt, self.policy.max_attempts
                    );
                    return true;
                }
                Ok(resp) => {
                    warn!(
                        "Sheet endpoint returned {} for '{}' (attempt {}/{})",
                        resp.status(),
                        record.athlete_name,
                        attempt,
                        self.policy.max_attempts
                    );
                }
                Err(e) => {
                    warn!(
                        "Sheet delivery failed for '{}' (attempt {}/{}): {}",
                        record.athlete_name, attempt, self.policy.max_attempts, e
                    );
                }
            }

            if attempt < self.policy.max_attempts {
                tokio::time::sleep(self.policy.backoff_after(attempt)).await;
            }
        }

        false
    }
}
