//! Asynchronous task protocol: submit, obtain a handle, poll to completion
//!
//! The service answers a long-running action with a `Location` header naming
//! a task resource. The task resource reports `{"TaskState": "Running"}`
//! until it finishes; the first body with any other state (or none) is the
//! result. Polling is bounded by [`PollPolicy`] and can be cancelled by the
//! caller.

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use redfish_core::{ResourceReference, TaskHandle, TaskOutcome, TaskState, TaskStatus};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::error::{RedfishError, Result};
use crate::resolver::ResourceResolver;

/// How long and how often to poll a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Wait between polls
    pub interval: Duration,
    /// Overall wait budget (`None` = unbounded)
    pub timeout: Option<Duration>,
    /// Maximum number of status requests (`None` = unbounded)
    pub max_polls: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            timeout: Some(Duration::from_secs(30 * 60)),
            max_polls: None,
        }
    }
}

/// Drives one asynchronous action to completion
#[derive(Debug, Clone, Copy)]
pub struct TaskPoller<'a> {
    resolver: &'a ResourceResolver,
    policy: PollPolicy,
}

impl<'a> TaskPoller<'a> {
    pub fn new(resolver: &'a ResourceResolver, policy: PollPolicy) -> Self {
        Self { resolver, policy }
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// POST `body` to `action` and take the task handle from `Location`
    #[instrument(skip(self, body))]
    pub async fn submit<B>(&self, action: &ResourceReference, body: &B) -> Result<TaskHandle>
    where
        B: Serialize + ?Sized,
    {
        let payload = ResourceResolver::encode(action, body)?;
        let response = match self
            .resolver
            .fetch(Method::POST, action, Some(payload))
            .await
        {
            Ok(response) => response,
            Err(RedfishError::Transport(e)) => {
                warn!(%action, error = %e, "Task submission rejected");
                return Err(RedfishError::Submission {
                    message: format!("POST {} failed: {}", action, e),
                    source: Some(e),
                });
            }
            Err(e) => return Err(e),
        };

        let location = response
            .header("location")
            .ok_or_else(|| RedfishError::Submission {
                message: format!(
                    "{} answered {} without a Location header",
                    action, response.status
                ),
                source: None,
            })?;

        let handle = TaskHandle::new(location_path(location));
        info!(%handle, "Task submitted");
        Ok(handle)
    }

    /// Fetch the task resource once
    ///
    /// An empty body carries no `TaskState` and counts as terminal.
    pub async fn poll(&self, handle: &TaskHandle) -> Result<(TaskState, Bytes)> {
        let response = self
            .resolver
            .fetch(Method::GET, handle.reference(), None)
            .await?;
        let status: TaskStatus = if response.body.is_empty() {
            TaskStatus::default()
        } else {
            self.resolver.decode(handle.reference(), &response.body)?
        };
        Ok((status.state, response.body))
    }

    /// Poll until the task leaves `Running`, the policy runs out, or `cancel`
    /// resolves
    #[instrument(skip(self, cancel))]
    pub async fn poll_until<T, F>(&self, handle: &TaskHandle, cancel: F) -> Result<TaskOutcome<T>>
    where
        T: DeserializeOwned + Default,
        F: Future<Output = ()>,
    {
        tokio::pin!(cancel);
        let start = Instant::now();
        let mut polls: u32 = 0;

        loop {
            let (state, body) = tokio::select! {
                biased;
                _ = &mut cancel => return Err(RedfishError::Cancelled(handle.to_string())),
                polled = self.poll(handle) => polled?,
            };
            polls += 1;

            if !state.is_running() {
                if state.is_failure() {
                    warn!(%handle, %state, polls, "Task ended in a failure state");
                } else {
                    info!(%handle, %state, polls, "Task finished");
                }
                let result = if body.is_empty() {
                    T::default()
                } else {
                    self.resolver.decode(handle.reference(), &body)?
                };
                return Ok(TaskOutcome { state, result });
            }

            if self.policy.max_polls.is_some_and(|max| polls >= max) {
                return Err(self.timeout(handle, polls));
            }

            let wait = match self.policy.timeout {
                Some(timeout) => {
                    let remaining = timeout.saturating_sub(start.elapsed());
                    if remaining.is_zero() {
                        return Err(self.timeout(handle, polls));
                    }
                    self.policy.interval.min(remaining)
                }
                None => self.policy.interval,
            };

            debug!(%handle, polls, ?wait, "Task still running");
            tokio::select! {
                biased;
                _ = &mut cancel => return Err(RedfishError::Cancelled(handle.to_string())),
                _ = tokio::time::sleep(wait) => {}
            }
        }
    }

    /// Submit and wait without cancellation
    pub async fn run<B, T>(&self, action: &ResourceReference, body: &B) -> Result<TaskOutcome<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        self.run_until(action, body, std::future::pending()).await
    }

    /// Submit and wait until completion or `cancel`
    pub async fn run_until<B, T, F>(
        &self,
        action: &ResourceReference,
        body: &B,
        cancel: F,
    ) -> Result<TaskOutcome<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
        F: Future<Output = ()>,
    {
        let handle = self.submit(action, body).await?;
        self.poll_until(&handle, cancel).await
    }

    fn timeout(&self, handle: &TaskHandle, polls: u32) -> RedfishError {
        warn!(%handle, polls, "Gave up waiting for task");
        RedfishError::Timeout {
            operation: handle.to_string(),
            polls,
        }
    }
}

/// Path of a `Location` value, which may be relative or a full URL
fn location_path(location: &str) -> String {
    match Url::parse(location) {
        Ok(url) => url.path().to_string(),
        Err(_) => location.to_string(),
    }
}
