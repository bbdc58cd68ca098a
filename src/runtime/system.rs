use super::host::HostDriver;
use crate::config::EngineConfig;
use crate::engine::ReconciliationEngine;
use crate::simulator::{ReservationActor, SimulatorClient, SimulatorSettings};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{error, info};

/// Engine, host and simulator wired together in one process.
///
/// # Example
///
/// ```ignore
/// let system = LocalSystem::new(SimulatorSettings::default(), EngineConfig::default());
/// let event = system.host.run(Action::Create, HandlerRequest::new(model)).await;
/// system.shutdown().await?;
/// ```
pub struct LocalSystem {
    pub host: HostDriver,
    pub engine: ReconciliationEngine,
    /// Direct access to the simulated service, for inspecting state behind the engine.
    pub client: SimulatorClient,
    handle: tokio::task::JoinHandle<()>,
}

impl LocalSystem {
    /// Spawns the simulator and builds an engine on top of it. Requires a Tokio runtime.
    pub fn new(settings: SimulatorSettings, config: EngineConfig) -> Self {
        let id_counter = Arc::new(AtomicU64::new(1));
        let next_id = move || {
            let id = id_counter.fetch_add(1, Ordering::SeqCst);
            format!("cr-{id:017x}")
        };

        let (actor, client) = ReservationActor::new(settings, next_id);
        let handle = tokio::spawn(actor.run());

        let engine = ReconciliationEngine::new(Arc::new(client.clone()), config);
        let host = HostDriver::new(engine.clone());
        info!("Local system started");

        Self {
            host,
            engine,
            client,
            handle,
        }
    }

    /// Drops every handle to the simulator and waits for its task to finish.
    ///
    /// Engines cloned out of this system keep the simulator alive; drop them first.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down local system...");

        drop(self.host);
        drop(self.engine);
        drop(self.client);

        if let Err(e) = self.handle.await {
            error!("Simulator task failed: {:?}", e);
            return Err(format!("Simulator task failed: {:?}", e));
        }

        info!("Local system shutdown complete.");
        Ok(())
    }
}
