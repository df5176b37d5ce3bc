// src/discovery/mod.rs
mod addresses;
mod fanout;
mod groups;
mod tags;
mod vms;

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::azure::ArmApi;
use crate::error::{Error, Result};

pub use fanout::fan_out;
pub use tags::TagFilter;

/// Default cap on concurrent ARM requests per fan-out
pub const DEFAULT_CONCURRENCY: usize = 16;

/// VM resource as returned by the group listing, before any power-state check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmCandidate {
    pub name: String,
    pub tags: HashMap<String, String>,
    pub resource_id: String,
}

/// Candidate whose instance view reported `PowerState/running`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningVm {
    pub name: String,
    pub instance_id: String,
    pub network_interface_id: Option<String>,
}

/// Resource group, VM and address discovery over a shared ARM client
#[derive(Clone)]
pub struct Discoverer {
    api: Arc<dyn ArmApi>,
    concurrency: usize,
    shutdown: CancellationToken,
}

impl Discoverer {
    pub fn new(api: Arc<dyn ArmApi>) -> Self {
        Self {
            api,
            concurrency: DEFAULT_CONCURRENCY,
            shutdown: CancellationToken::new(),
        }
    }

    /// Maximum number of in-flight requests per fan-out (at least one)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Parent token for every fan-out; cancelling it ends discovery early
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Drive `work` unless shutdown is requested first, in which case it is
    /// dropped and [`Error::Cancelled`] is returned
    async fn until_shutdown<T>(&self, work: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => Err(Error::Cancelled),
            result = work => result,
        }
    }
}
