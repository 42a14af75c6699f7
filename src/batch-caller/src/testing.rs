use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use evm_rpc_client::{Call, Client, Output, Request, Response, Success, Version};
use serde_json::Value;

/// Transport stub replying to each method with a canned value, in the same
/// shape the node would return it.
#[derive(Clone, Default)]
pub struct StubClient {
    responses: Arc<Mutex<HashMap<String, Value>>>,
}

impl StubClient {
    pub fn with_response(self, method: &str, value: Value) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(method.to_string(), value);
        self
    }
}

impl Client for StubClient {
    fn send_rpc_request(
        &self,
        request: Request,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<Response>> + Send>> {
        let call = match &request {
            Request::Single(Call::MethodCall(call)) => call.clone(),
            other => panic!("unexpected request shape: {other:?}"),
        };
        let result = self
            .responses
            .lock()
            .unwrap()
            .get(&call.method)
            .cloned()
            .unwrap_or_else(|| panic!("no canned response for {}", call.method));
        let output = Output::Success(Success {
            jsonrpc: Some(Version::V2),
            result,
            id: call.id,
        });

        Box::pin(async move { Ok(Response::Single(output)) })
    }
}
