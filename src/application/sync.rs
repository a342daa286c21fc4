//! # Sync Engine
//!
//! Reconciles the local command registry against the gateway's registered
//! command set for one scope. Runs once at startup (and once at shutdown
//! for teardown) and is never concurrent with steady-state dispatch.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::registry::CommandRegistry;
use crate::domain::errors::{SyncAction, SyncError};
use crate::domain::traits::Gateway;
use crate::domain::types::{RemoteCommand, Scope};

/// Remote calls issued by one `sync` pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub unchanged: usize,
}

impl SyncReport {
    pub fn remote_calls(&self) -> usize {
        self.created + self.updated + self.deleted
    }
}

pub struct SyncEngine {
    gateway: Arc<dyn Gateway>,
}

impl SyncEngine {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// Makes the remote command set under `scope` match the registry
    /// exactly: one create, update, or delete per differing name; commands
    /// identical in name, description, and schema are left untouched.
    /// Stops at the first remote failure without rolling back; re-running
    /// converges.
    pub async fn sync(
        &self,
        registry: &CommandRegistry,
        scope: &Scope,
    ) -> Result<SyncReport, SyncError> {
        let remote = self
            .gateway
            .list_commands(scope)
            .await
            .map_err(|cause| SyncError {
                action: SyncAction::List,
                name: scope.to_string(),
                cause,
            })?;

        let mut remote_by_name: HashMap<String, RemoteCommand> =
            remote.into_iter().map(|c| (c.name.clone(), c)).collect();

        let mut report = SyncReport::default();
        for definition in registry.list() {
            match remote_by_name.remove(&definition.name) {
                Some(existing) if existing.matches(&definition) => {
                    report.unchanged += 1;
                }
                Some(existing) => {
                    self.gateway
                        .update_command(scope, &existing.id, &definition)
                        .await
                        .map_err(|cause| SyncError {
                            action: SyncAction::Update,
                            name: definition.name.clone(),
                            cause,
                        })?;
                    info!(command = %definition.name, "updated remote command");
                    report.updated += 1;
                }
                None => {
                    self.gateway
                        .create_command(scope, &definition)
                        .await
                        .map_err(|cause| SyncError {
                            action: SyncAction::Create,
                            name: definition.name.clone(),
                            cause,
                        })?;
                    info!(command = %definition.name, "created remote command");
                    report.created += 1;
                }
            }
        }

        // Whatever is left remotely has no local counterpart.
        for (name, stale) in remote_by_name {
            self.gateway
                .delete_command(scope, &stale.id)
                .await
                .map_err(|cause| SyncError {
                    action: SyncAction::Delete,
                    name: name.clone(),
                    cause,
                })?;
            info!(command = %name, "deleted stale remote command");
            report.deleted += 1;
        }

        info!(
            scope = %scope,
            created = report.created,
            updated = report.updated,
            deleted = report.deleted,
            unchanged = report.unchanged,
            "command sync complete"
        );
        Ok(report)
    }

    /// Removes every remote command under `scope`, whether or not it is
    /// known locally. Best-effort: individual delete failures are logged
    /// and skipped. Returns how many commands were removed.
    pub async fn teardown(&self, scope: &Scope) -> anyhow::Result<usize> {
        let remote = self.gateway.list_commands(scope).await?;
        let mut removed = 0;
        for command in remote {
            match self.gateway.delete_command(scope, &command.id).await {
                Ok(()) => removed += 1,
                Err(err) => {
                    warn!(command = %command.name, error = %err, "failed to delete remote command");
                }
            }
        }
        info!(scope = %scope, removed, "command teardown complete");
        Ok(removed)
    }
}
