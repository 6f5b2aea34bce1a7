use geofinder_logic::{
    LocationController, LocationFix, LocationService, PositionError, PositionOptions,
    StateUpdateSender,
};
use geofinder_test_shared::*;
use log::{debug, error, info, warn};
use std::{
    collections::VecDeque,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};
use tokio::{
    io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader},
    sync::{Mutex, mpsc, oneshot},
};

type Answer = Result<LocationFix, PositionError>;

#[derive(Default)]
struct Script {
    unsupported: AtomicBool,
    pending: Mutex<VecDeque<oneshot::Sender<Answer>>>,
}

/// Location service whose queries stay pending until the driver answers them
#[derive(Clone, Default)]
struct ScriptedLocation(Arc<Script>);

impl ScriptedLocation {
    fn set_supported(&self, supported: bool) {
        self.0.unsupported.store(!supported, Ordering::SeqCst);
    }

    /// Answer the oldest pending query, returns `false` if nothing was waiting
    async fn resolve(&self, answer: Answer) -> bool {
        let mut pending = self.0.pending.lock().await;
        while let Some(tx) = pending.pop_front() {
            // The controller never drops a query, but skip it if it somehow did
            if tx.send(answer.clone()).is_ok() {
                return true;
            }
        }
        false
    }
}

impl LocationService for ScriptedLocation {
    fn is_supported(&self) -> bool {
        !self.0.unsupported.load(Ordering::SeqCst)
    }

    async fn current_position(&self, options: PositionOptions) -> Answer {
        debug!("Query received with {options:?}, waiting for the driver");
        let (tx, rx) = oneshot::channel();
        self.0.pending.lock().await.push_back(tx);
        rx.await
            .unwrap_or_else(|_| Err(PositionError::Unknown("daemon shut down".to_string())))
    }
}

struct UpdateSender(mpsc::Sender<()>);

impl StateUpdateSender for UpdateSender {
    fn send_update(&self) {
        if self.0.try_send(()).is_err() {
            warn!("Dropped a state update, the driver isn't keeping up");
        }
    }
}

type Controller = LocationController<ScriptedLocation, UpdateSender>;

struct DaemonState {
    controller: Arc<Controller>,
    location: ScriptedLocation,
}

impl DaemonState {
    pub fn new(updates: mpsc::Sender<()>) -> Self {
        let location = ScriptedLocation::default();
        let controller = Arc::new(Controller::new(location.clone(), UpdateSender(updates)));
        Self {
            controller,
            location,
        }
    }

    pub async fn process_req(&self, req: TestingRequest) -> TestingResponse {
        match req {
            TestingRequest::RequestLocation => {
                self.controller.request_location().await;
                TestingResponse::Complete
            }
            TestingRequest::Resolve(answer) => {
                if self.location.resolve(answer.into()).await {
                    TestingResponse::Complete
                } else {
                    TestingResponse::NothingPending
                }
            }
            TestingRequest::SetSupported(supported) => {
                self.location.set_supported(supported);
                TestingResponse::Complete
            }
            TestingRequest::GetState => TestingResponse::State(self.controller.get_state().await),
        }
    }
}

use interprocess::local_socket::{ListenerOptions, tokio::prelude::*};

const CLI_MSG: &str = "Usage: geofinder-test-daemon SOCKET_NAME";

async fn write_resp(send: &mut (impl AsyncWrite + Unpin), resp: &TestingResponse) -> Result {
    let mut encoded = serde_json::to_vec(resp).context("Failed to encode response")?;
    encoded.push(b'\n');
    send.write_all(&encoded)
        .await
        .context("Failed to send response")
}

#[tokio::main(flavor = "current_thread")]
pub async fn main() -> Result {
    colog::init();

    let raw_socket_name = std::env::args().nth(1).context(CLI_MSG)?;
    let socket_name = get_socket_name(raw_socket_name)?;
    let opts = ListenerOptions::new().name(socket_name);
    let listener = opts.create_tokio().context("Failed to bind to socket")?;
    let (update_tx, mut update_rx) = mpsc::channel::<()>(40);

    let state = DaemonState::new(update_tx);

    info!("Testing Daemon Ready");

    'server: loop {
        let res = tokio::select! {
            res = listener.accept() => {
                res
            },
            Ok(_) = tokio::signal::ctrl_c() => {
                break 'server;
            }
        };

        let stream = match res {
            Ok(stream) => stream,
            Err(why) => {
                error!("Error from connection: {why:?}");
                continue;
            }
        };

        let mut recv = BufReader::new(&stream);
        let mut send = &stream;
        let mut buffer = String::with_capacity(256);

        loop {
            let resp = tokio::select! {
                Ok(_) = tokio::signal::ctrl_c() => {
                    break 'server;
                }
                res = recv.read_line(&mut buffer) => {
                    match res {
                        Ok(0) => break,
                        Ok(_amnt) => {
                            let resp = match serde_json::from_str::<TestingRequest>(&buffer) {
                                Ok(req) => {
                                    debug!("Processing {req:?}");
                                    state.process_req(req).await
                                }
                                Err(why) => TestingResponse::Error(format!("Bad request: {why}")),
                            };
                            buffer.clear();
                            resp
                        }
                        Err(why) => {
                            error!("Read Error: {why:?}");
                            break;
                        }
                    }
                }
                Some(()) = update_rx.recv() => {
                    TestingResponse::StateUpdate(state.controller.get_state().await)
                }
            };

            if let Err(why) = write_resp(&mut send, &resp).await {
                error!("{why:?}");
                break;
            }
        }
    }

    Ok(())
}
