//! Module serving loop.
//!
//! The host connects over a local socket and sends one JSON request per line; every request
//! gets exactly one JSON response line back, `{"ok": ...}` or `{"error": "..."}`.
//!
//! ```text
//! {"method":"add_resource","config":{"name":"sander","attributes":{"fancy":true}}}
//! {"method":"geometries","name":"sander"}
//! {"method":"remove_resource","name":"sander"}
//! ```

use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Write};
use std::sync::Arc;

use interprocess::local_socket::{LocalSocketListener, LocalSocketStream};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::runtime::Handle;
use tokio::sync::{oneshot, RwLock};
use tracing::{debug, info, warn};

use crate::config::ResourceConfig;
use crate::error::{Result, ToolError};
use crate::gripper::{Extra, Gripper};
use crate::registry::Registry;

/// A request from the host.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Request {
    /// Handshake; answers with the models this module provides.
    Ready,
    AddResource {
        config: ResourceConfig,
    },
    RemoveResource {
        name: String,
    },
    Open {
        name: String,
        #[serde(default)]
        extra: Extra,
    },
    Grab {
        name: String,
        #[serde(default)]
        extra: Extra,
    },
    Stop {
        name: String,
        #[serde(default)]
        extra: Extra,
    },
    IsMoving {
        name: String,
    },
    Geometries {
        name: String,
        #[serde(default)]
        extra: Extra,
    },
    ModelFrame {
        name: String,
    },
    DoCommand {
        name: String,
        #[serde(default)]
        command: Extra,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    Ok(Value),
    Error(String),
}

/// The registered models plus the resources built from them so far.
pub struct Module {
    registry: Registry,
    resources: RwLock<HashMap<String, Arc<dyn Gripper>>>,
}

impl std::fmt::Debug for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Module")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl Module {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            resources: RwLock::new(HashMap::new()),
        }
    }

    async fn resource(&self, name: &str) -> Result<Arc<dyn Gripper>> {
        self.resources
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| ToolError::UnknownResource(name.to_string()))
    }

    /// Executes one request.
    pub async fn handle(&self, request: Request) -> Result<Value> {
        match request {
            Request::Ready => {
                let models: Vec<Value> = self
                    .registry
                    .models()
                    .map(|(api, model)| json!({ "api": api, "model": model }))
                    .collect();
                Ok(json!({ "models": models }))
            }
            Request::AddResource { config } => {
                let mut resources = self.resources.write().await;
                if resources.contains_key(&config.name) {
                    return Err(ToolError::DuplicateResource(config.name));
                }
                let resource = self.registry.construct(&config)?;
                info!(name = %config.name, model = %config.model, "resource added");
                resources.insert(config.name, resource);
                Ok(Value::Null)
            }
            Request::RemoveResource { name } => {
                let resource = self
                    .resources
                    .write()
                    .await
                    .remove(&name)
                    .ok_or_else(|| ToolError::UnknownResource(name.clone()))?;
                resource.close().await?;
                info!(%name, "resource removed");
                Ok(Value::Null)
            }
            Request::Open { name, extra } => {
                self.resource(&name).await?.open(&extra).await?;
                Ok(Value::Null)
            }
            Request::Grab { name, extra } => {
                let grabbed = self.resource(&name).await?.grab(&extra).await?;
                Ok(Value::Bool(grabbed))
            }
            Request::Stop { name, extra } => {
                self.resource(&name).await?.stop(&extra).await?;
                Ok(Value::Null)
            }
            Request::IsMoving { name } => {
                let moving = self.resource(&name).await?.is_moving().await?;
                Ok(Value::Bool(moving))
            }
            Request::Geometries { name, extra } => {
                let geometries = self.resource(&name).await?.geometries(&extra).await?;
                Ok(serde_json::to_value(&*geometries)?)
            }
            Request::ModelFrame { name } => {
                let frame = self.resource(&name).await?.model_frame();
                Ok(serde_json::to_value(frame)?)
            }
            Request::DoCommand { name, command } => {
                let out = self.resource(&name).await?.do_command(&command).await?;
                Ok(Value::Object(out))
            }
        }
    }

    /// Parses and executes one request line. Never fails; errors become [`Response::Error`].
    pub async fn respond(&self, line: &str) -> Response {
        let result = match serde_json::from_str::<Request>(line) {
            Ok(request) => self.handle(request).await,
            Err(e) => Err(e.into()),
        };
        match result {
            Ok(value) => Response::Ok(value),
            Err(e) => {
                warn!(error = %e, "request failed");
                Response::Error(e.to_string())
            }
        }
    }

    /// Closes and drops every resource.
    pub async fn shutdown(&self) {
        let resources: Vec<_> = self.resources.write().await.drain().collect();
        for (name, resource) in resources {
            if let Err(e) = resource.close().await {
                warn!(%name, error = %e, "failed to close resource");
            }
        }
    }

    /// Binds `socket` and serves connections until accepting fails.
    ///
    /// Each connection is handled on its own thread; requests are driven on the current
    /// tokio runtime.
    pub async fn serve(self: Arc<Self>, socket: &str) -> Result<()> {
        // A previous run may have left the socket path behind.
        #[cfg(unix)]
        {
            let _ = std::fs::remove_file(socket);
        }

        let listener = LocalSocketListener::bind(socket)?;
        info!(%socket, "module listening");

        let handle = Handle::current();
        let (failed_tx, failed_rx) = oneshot::channel::<io::Error>();

        std::thread::spawn(move || {
            for conn in listener.incoming() {
                let stream = match conn {
                    Ok(stream) => stream,
                    Err(e) => {
                        let _ = failed_tx.send(e);
                        return;
                    }
                };
                let module = Arc::clone(&self);
                let handle = handle.clone();
                std::thread::spawn(move || {
                    if let Err(e) = module.serve_connection(stream, &handle) {
                        warn!(error = %e, "connection closed with error");
                    }
                });
            }
        });

        match failed_rx.await {
            Ok(e) => Err(e.into()),
            Err(_) => Ok(()),
        }
    }

    fn serve_connection(&self, stream: LocalSocketStream, handle: &Handle) -> io::Result<()> {
        debug!("host connected");
        let mut conn = BufReader::new(stream);
        let mut line = String::new();

        loop {
            line.clear();
            if conn.read_line(&mut line)? == 0 {
                debug!("host disconnected");
                return Ok(());
            }
            let request = line.trim();
            if request.is_empty() {
                continue;
            }

            let response = handle.block_on(self.respond(request));
            let mut out = serde_json::to_vec(&response)?;
            out.push(b'\n');
            conn.get_mut().write_all(&out)?;
            conn.get_mut().flush()?;
        }
    }
}
