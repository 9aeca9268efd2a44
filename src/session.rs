//! The top-level per-connection loop: reads frames, dispatches Calls to
//! handlers, and correlates outbound Calls with their responses.
//!
//! Grounded in two sources: the single-outstanding-call discipline and
//! `_get_specific_response`'s discard-and-retry loop are ported from
//! `charge_point.py::ChargePoint`; the `tokio`/`mpsc`-based concurrency
//! realization (lock around send-and-wait, a bounded response mailbox,
//! `tokio::time::timeout`) is adapted from `Ali-0211-TR-ocpp-service`'s
//! `CommandSender`.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::{mpsc, Mutex};
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::envelope::Envelope;
use crate::error::OcppError;
use crate::handler::{HandlerArgs, HandlerRegistry};
use crate::schema_registry::{self, Action, Direction, OcppVersion};
use crate::transport::Transport;
use crate::translate;

/// Construction-time configuration the engine reads no further outside of
/// itself — loading it from file or env is the host application's job, not
/// this crate's.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub ocpp_version: OcppVersion,
    pub response_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { ocpp_version: OcppVersion::V1_6, response_timeout: Duration::from_secs(30) }
    }
}

struct PendingCall {
    unique_id: String,
    deadline: Instant,
}

/// A session bound to one `Transport`. `T` is generic rather than a trait
/// object so the engine never pays a vtable hop on the hot send/recv path.
pub struct Session<T: Transport> {
    transport: Arc<T>,
    registry: Arc<HandlerRegistry>,
    config: SessionConfig,
    call_lock: Mutex<()>,
    pending: Mutex<Option<PendingCall>>,
    response_tx: mpsc::Sender<Envelope>,
    response_rx: Mutex<mpsc::Receiver<Envelope>>,
}

impl<T: Transport + 'static> Session<T> {
    pub fn new(transport: T, registry: HandlerRegistry, config: SessionConfig) -> Self {
        // Capacity 1: under the single-outstanding-call invariant this
        // suffices — it's a single-producer/single-consumer mailbox, the
        // consumer being whichever call is currently waiting.
        let (response_tx, response_rx) = mpsc::channel(1);
        Self {
            transport: Arc::new(transport),
            registry: Arc::new(registry),
            config,
            call_lock: Mutex::new(()),
            pending: Mutex::new(None),
            response_tx,
            response_rx: Mutex::new(response_rx),
        }
    }

    /// Runs the inbound loop until the transport closes. Never suspends
    /// while holding `call_lock` or `pending`.
    pub async fn run(&self) {
        loop {
            match self.transport.recv().await {
                Ok(Some(frame)) => {
                    info!(%frame, "received frame");
                    self.route_message(&frame).await;
                }
                Ok(None) => {
                    debug!("transport closed, exiting inbound loop");
                    break;
                }
                Err(err) => {
                    warn!(%err, "transport read failed, exiting inbound loop");
                    break;
                }
            }
        }
    }

    async fn route_message(&self, frame: &str) {
        let envelope = match Envelope::decode(frame) {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!(%err, raw = %frame, "unable to parse message, dropping it");
                return;
            }
        };

        match envelope {
            Envelope::Call { .. } => self.dispatch_call(envelope).await,
            Envelope::CallResult { .. } | Envelope::CallError { .. } => {
                self.deliver_response(envelope).await;
            }
        }
    }

    /// Enqueues a CallResult/CallError onto the response channel only if it
    /// matches the unique id currently pending; otherwise logs and drops it.
    /// This covers both an unsolicited response arriving while idle and a
    /// stale id arriving mid-wait — neither ever fails the session.
    async fn deliver_response(&self, envelope: Envelope) {
        let expected = self.pending.lock().await;
        match expected.as_ref() {
            Some(pending) if pending.unique_id == envelope.unique_id() => {
                drop(expected);
                if self.response_tx.try_send(envelope).is_err() {
                    warn!("response channel full, dropping message (should not occur under the single-outstanding-call invariant)");
                }
            }
            Some(_) => {
                warn!(unique_id = %envelope.unique_id(), "discarding response with unknown unique id");
            }
            None => {
                warn!(unique_id = %envelope.unique_id(), "discarding unsolicited response, no call is pending");
            }
        }
    }

    async fn dispatch_call(&self, envelope: Envelope) {
        let Envelope::Call { unique_id, action: action_name, payload } = envelope else {
            unreachable!("dispatch_call called with a non-Call envelope");
        };

        // `into_call_result`/`into_call_error` only read `unique_id` off a
        // `Call`, so a bare stand-in with an empty payload correlates the
        // reply without re-deriving that logic here.
        let call_for_error = Envelope::Call {
            unique_id: unique_id.clone(),
            action: action_name.clone(),
            payload: serde_json::Map::new(),
        };

        // after_action's contract is "the data that is in the payload for
        // the specific action", same as on_action's — snapshot it (snake_case,
        // like on_action receives it) before `handle_call` consumes `payload`.
        let after_action_payload = translate::camel_to_snake_case(&Value::Object(payload.clone()))
            .as_object()
            .cloned()
            .unwrap_or_default();

        let outcome = self.handle_call(&unique_id, &action_name, payload).await;
        let reply = match outcome {
            Ok(payload) => call_for_error.into_call_result(payload),
            Err(err) => call_for_error.into_call_error(&err),
        };

        if let Err(err) = self.transport.send(reply.encode()).await {
            warn!(%err, "failed to send reply");
        }

        if let Ok(action) = action_name.parse::<Action>() {
            if let Some(binding) = self.registry.get(action) {
                if let Some(after_action) = binding.after_action.clone() {
                    let args = HandlerArgs { payload: after_action_payload, call_unique_id: Some(unique_id) };
                    // Dispatched off the inbound loop so a slow after_action
                    // can't stall subsequent inbound frames.
                    tokio::spawn(async move {
                        if let Err(err) = (after_action)(args).await {
                            warn!(%err, "after_action handler failed");
                        }
                    });
                }
            }
        }
    }

    async fn handle_call(
        &self,
        unique_id: &str,
        action_name: &str,
        payload: serde_json::Map<String, Value>,
    ) -> Result<serde_json::Map<String, Value>, OcppError> {
        let action: Action = action_name.parse().map_err(|_| OcppError::NotSupported {
            action: action_name.to_string(),
            version: self.config.ocpp_version.to_string(),
        })?;

        let binding = match self.registry.get(action) {
            Some(binding) => binding,
            None if action.is_known_in(self.config.ocpp_version) => {
                return Err(OcppError::NotImplemented(action_name.to_string()))
            }
            None => {
                return Err(OcppError::NotSupported {
                    action: action_name.to_string(),
                    version: self.config.ocpp_version.to_string(),
                })
            }
        };

        let snake_payload = translate::camel_to_snake_case(&Value::Object(payload));
        let snake_map = snake_payload.as_object().cloned().unwrap_or_default();

        if !binding.skip_schema_validation {
            if let Some(schema) = schema_registry::lookup(self.config.ocpp_version, action, Direction::Request) {
                schema.validate(&snake_map)?;
            }
        }

        let args = HandlerArgs {
            payload: snake_map,
            call_unique_id: binding.call_unique_id_required.then(|| unique_id.to_string()),
        };

        let result = (binding.on_action)(args).await?;
        let stripped = translate::strip_nulls(&result);
        let response_map = stripped.as_object().cloned().unwrap_or_default();

        if !binding.skip_schema_validation {
            if let Some(schema) = schema_registry::lookup(self.config.ocpp_version, action, Direction::Response) {
                schema.validate(&response_map)?;
            }
        }

        let camel = translate::snake_to_camel_case(&Value::Object(response_map));
        Ok(camel.as_object().cloned().unwrap_or_default())
    }

    /// Sends a Call and waits for its correlated response.
    ///
    /// `Ok(Some(payload))` is a normal CallResult; `Ok(None)` is a
    /// suppressed CallError (`suppress = true`, kept for backwards
    /// compatibility with callers that don't want a CallError raised);
    /// `Err` covers an unsuppressed CallError, `Timeout`,
    /// `UnknownCallErrorCode`, or `TransportClosed`.
    pub async fn call(
        &self,
        action: Action,
        payload: Value,
        suppress: bool,
        unique_id: Option<String>,
    ) -> Result<Option<Value>, OcppError> {
        let stripped = translate::strip_nulls(&payload);
        let snake_map = stripped.as_object().cloned().unwrap_or_default();

        if let Some(schema) = schema_registry::lookup(self.config.ocpp_version, action, Direction::Request) {
            schema.validate(&snake_map)?;
        }

        let camel = translate::snake_to_camel_case(&Value::Object(snake_map));
        let camel_map = camel.as_object().cloned().unwrap_or_default();

        let unique_id = unique_id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let call = Envelope::Call { unique_id: unique_id.clone(), action: action.to_string(), payload: camel_map };

        // Holding `call_lock` across send-and-wait is what enforces OCPP's
        // no-second-call-in-flight rule.
        let _call_guard = self.call_lock.lock().await;

        let deadline = Instant::now() + self.config.response_timeout;
        *self.pending.lock().await = Some(PendingCall { unique_id: unique_id.clone(), deadline });

        let result = self.send_and_wait(call, &unique_id, deadline, action, suppress).await;
        *self.pending.lock().await = None;
        result
    }

    async fn send_and_wait(
        &self,
        call: Envelope,
        unique_id: &str,
        deadline: Instant,
        action: Action,
        suppress: bool,
    ) -> Result<Option<Value>, OcppError> {
        self.transport
            .send(call.encode())
            .await
            .map_err(|err| OcppError::InternalError(err.to_string()))?;

        let response = self.wait_for_response(unique_id, deadline).await?;

        match response {
            Envelope::CallResult { payload, .. } => {
                let snake = translate::camel_to_snake_case(&Value::Object(payload));
                let snake_map = snake.as_object().cloned().unwrap_or_default();
                if let Some(schema) = schema_registry::lookup(self.config.ocpp_version, action, Direction::Response) {
                    schema.validate(&snake_map)?;
                }
                Ok(Some(Value::Object(snake_map)))
            }
            Envelope::CallError { error_code, error_description, error_details, .. } => {
                warn!(code = %error_code, description = %error_description, "received a CallError");
                if suppress {
                    return Ok(None);
                }
                let code = crate::error::parse_error_code(&error_code)?;
                let wire = crate::error::WireError::new(code)
                    .with_description(error_description)
                    .with_details(error_details);
                Err(OcppError::from_wire_error(wire))
            }
            Envelope::Call { .. } => unreachable!("response channel never carries a Call"),
        }
    }

    /// Mirrors `_get_specific_response`: take from the response channel,
    /// and if the message's unique id doesn't match, log and keep waiting
    /// with whatever deadline remains.
    async fn wait_for_response(&self, unique_id: &str, deadline: Instant) -> Result<Envelope, OcppError> {
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(OcppError::Timeout);
            }

            let mut rx = self.response_rx.lock().await;
            let received = tokio::time::timeout(remaining, rx.recv()).await;
            drop(rx);

            match received {
                Ok(Some(envelope)) if envelope.unique_id() == unique_id => return Ok(envelope),
                Ok(Some(envelope)) => {
                    warn!(unique_id = %envelope.unique_id(), "ignoring response with unknown unique id");
                    continue;
                }
                Ok(None) => return Err(OcppError::TransportClosed),
                Err(_elapsed) => return Err(OcppError::Timeout),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::HandlerRegistry;
    use crate::transport::TransportError;
    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::mpsc as tmpsc;

    /// An in-memory transport wired to two channel pairs, so a test can
    /// feed inbound frames and observe outbound ones independently of a
    /// real socket.
    struct ChannelTransport {
        inbound: Mutex<tmpsc::Receiver<String>>,
        outbound: tmpsc::Sender<String>,
    }

    #[async_trait]
    impl Transport for ChannelTransport {
        async fn recv(&self) -> Result<Option<String>, TransportError> {
            Ok(self.inbound.lock().await.recv().await)
        }

        async fn send(&self, frame: String) -> Result<(), TransportError> {
            self.outbound.send(frame).await.map_err(|e| TransportError(e.to_string()))
        }

        async fn close(&self) -> Result<(), TransportError> {
            Ok(())
        }
    }

    fn test_session(registry: HandlerRegistry) -> (Session<ChannelTransport>, tmpsc::Sender<String>, tmpsc::Receiver<String>) {
        let (inbound_tx, inbound_rx) = tmpsc::channel(8);
        let (outbound_tx, outbound_rx) = tmpsc::channel(8);
        let transport = ChannelTransport { inbound: Mutex::new(inbound_rx), outbound: outbound_tx };
        let config = SessionConfig { ocpp_version: OcppVersion::V1_6, response_timeout: Duration::from_millis(200) };
        (Session::new(transport, registry, config), inbound_tx, outbound_rx)
    }

    #[tokio::test]
    async fn boot_notification_happy_path() {
        let registry = HandlerRegistry::builder()
            .on_action(
                Action::BootNotification,
                false,
                false,
                Arc::new(|_args| {
                    Box::pin(async move {
                        Ok(json!({
                            "status": "Accepted",
                            "current_time": "2013-02-01T20:53:32.486Z",
                            "interval": 300,
                        }))
                    })
                }),
            )
            .unwrap()
            .build();

        let (session, inbound_tx, mut outbound_rx) = test_session(registry);
        let session = Arc::new(session);
        let runner = tokio::spawn({
            let session = session.clone();
            async move { session.run().await }
        });

        inbound_tx
            .send(r#"[2,"19223201","BootNotification",{"chargePointVendor":"VendorX","chargePointModel":"SingleSocketCharger"}]"#.to_string())
            .await
            .unwrap();

        let reply = outbound_rx.recv().await.unwrap();
        assert_eq!(
            Envelope::decode(&reply).unwrap(),
            Envelope::CallResult {
                unique_id: "19223201".to_string(),
                payload: json!({
                    "status": "Accepted",
                    "currentTime": "2013-02-01T20:53:32.486Z",
                    "interval": 300,
                })
                .as_object()
                .unwrap()
                .clone(),
            }
        );

        drop(inbound_tx);
        runner.await.unwrap();
    }

    #[tokio::test]
    async fn after_action_receives_the_requests_snake_case_payload() {
        let seen: Arc<std::sync::Mutex<Option<serde_json::Map<String, Value>>>> =
            Arc::new(std::sync::Mutex::new(None));

        let registry = HandlerRegistry::builder()
            .on_action(
                Action::BootNotification,
                false,
                false,
                Arc::new(|_args| {
                    Box::pin(async move {
                        Ok(json!({
                            "status": "Accepted",
                            "current_time": "2013-02-01T20:53:32.486Z",
                            "interval": 300,
                        }))
                    })
                }),
            )
            .unwrap()
            .after_action(Action::BootNotification, {
                let seen = seen.clone();
                Arc::new(move |args| {
                    let seen = seen.clone();
                    Box::pin(async move {
                        *seen.lock().unwrap() = Some(args.payload);
                        Ok(Value::Null)
                    })
                })
            })
            .build();

        let (session, inbound_tx, mut outbound_rx) = test_session(registry);
        let session = Arc::new(session);
        let runner = tokio::spawn({
            let session = session.clone();
            async move { session.run().await }
        });

        inbound_tx
            .send(r#"[2,"19223201","BootNotification",{"chargePointVendor":"VendorX","chargePointModel":"SingleSocketCharger"}]"#.to_string())
            .await
            .unwrap();

        // Wait for the reply before asserting: the after_action is spawned
        // only once the reply has been sent, and the spawned task itself
        // races the test, so give it a beat to run.
        outbound_rx.recv().await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        let payload = seen.lock().unwrap().clone().expect("after_action was not invoked");
        assert_eq!(
            payload,
            json!({
                "charge_point_vendor": "VendorX",
                "charge_point_model": "SingleSocketCharger",
            })
            .as_object()
            .unwrap()
            .clone()
        );

        drop(inbound_tx);
        runner.await.unwrap();
    }

    #[tokio::test]
    async fn unknown_action_known_in_version_returns_not_implemented() {
        let registry = HandlerRegistry::builder().build();
        let (session, inbound_tx, mut outbound_rx) = test_session(registry);
        let session = Arc::new(session);
        let runner = tokio::spawn({
            let session = session.clone();
            async move { session.run().await }
        });

        inbound_tx
            .send(r#"[2,"u-1","ChangeAvailability",{"connectorId":1,"type":"Operative"}]"#.to_string())
            .await
            .unwrap();

        let reply = outbound_rx.recv().await.unwrap();
        assert!(reply.contains(r#""NotImplemented""#));
        assert!(reply.contains("No handler for ChangeAvailability registered."));

        drop(inbound_tx);
        runner.await.unwrap();
    }

    #[tokio::test]
    async fn unknown_action_not_in_version_returns_not_supported() {
        let registry = HandlerRegistry::builder().build();
        let (session, inbound_tx, mut outbound_rx) = test_session(registry);
        let session = Arc::new(session);
        let runner = tokio::spawn({
            let session = session.clone();
            async move { session.run().await }
        });

        inbound_tx.send(r#"[2,"u-2","Nonsense",{}]"#.to_string()).await.unwrap();

        let reply = outbound_rx.recv().await.unwrap();
        assert!(reply.contains(r#""NotSupported""#));
        assert!(reply.contains("Nonsense not supported by OCPP1.6."));

        drop(inbound_tx);
        runner.await.unwrap();
    }

    #[tokio::test]
    async fn missing_required_property_returns_protocol_error() {
        let registry = HandlerRegistry::builder()
            .on_action(Action::BootNotification, false, false, Arc::new(|_args| Box::pin(async { Ok(json!({})) })))
            .unwrap()
            .build();
        let (session, inbound_tx, mut outbound_rx) = test_session(registry);
        let session = Arc::new(session);
        let runner = tokio::spawn({
            let session = session.clone();
            async move { session.run().await }
        });

        inbound_tx
            .send(r#"[2,"u-3","BootNotification",{"chargePointVendor":"X"}]"#.to_string())
            .await
            .unwrap();

        let reply = outbound_rx.recv().await.unwrap();
        assert!(reply.contains(r#""ProtocolError""#));

        drop(inbound_tx);
        runner.await.unwrap();
    }

    #[tokio::test]
    async fn outbound_call_times_out_when_no_response_arrives() {
        let registry = HandlerRegistry::builder().build();
        let (session, _inbound_tx, _outbound_rx) = test_session(registry);

        let result = session.call(Action::Heartbeat, json!({}), true, Some("u-timeout".to_string())).await;
        assert!(matches!(result, Err(OcppError::Timeout)));
    }

    #[tokio::test]
    async fn outbound_call_returns_the_correlated_call_results_payload() {
        let registry = HandlerRegistry::builder().build();
        let (session, inbound_tx, mut outbound_rx) = test_session(registry);
        let session = Arc::new(session);
        let runner = tokio::spawn({
            let session = session.clone();
            async move { session.run().await }
        });

        let caller = tokio::spawn({
            let session = session.clone();
            async move {
                session.call(Action::Heartbeat, json!({}), false, Some("u-99".to_string())).await
            }
        });

        // Wait for the Call to hit the transport, then answer it with its
        // correlated CallResult.
        let sent = outbound_rx.recv().await.unwrap();
        assert!(sent.contains(r#""Heartbeat""#));
        assert!(sent.contains(r#""u-99""#));

        inbound_tx
            .send(r#"[3,"u-99",{"currentTime":"2013-02-01T20:53:32.486Z"}]"#.to_string())
            .await
            .unwrap();

        let result = caller.await.unwrap().unwrap();
        assert_eq!(result, Some(json!({"current_time": "2013-02-01T20:53:32.486Z"})));

        drop(inbound_tx);
        runner.await.unwrap();
    }

    #[tokio::test]
    async fn unsolicited_response_while_idle_is_discarded_without_error() {
        let registry = HandlerRegistry::builder().build();
        let (session, inbound_tx, _outbound_rx) = test_session(registry);
        let session = Arc::new(session);
        let runner = tokio::spawn({
            let session = session.clone();
            async move { session.run().await }
        });

        inbound_tx.send(r#"[3,"unknown-id",{}]"#.to_string()).await.unwrap();
        drop(inbound_tx);
        runner.await.unwrap();
    }
}
