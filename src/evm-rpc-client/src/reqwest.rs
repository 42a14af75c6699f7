use std::future::Future;
use std::pin::Pin;

use anyhow::Context;
use jsonrpc_core::{Request, Response};
pub use reqwest;

use crate::Client;

/// Reqwest transport implementation.
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
    endpoint_url: String,
}

impl ReqwestClient {
    /// Creates a new client.
    pub fn new(endpoint_url: String) -> Self {
        Self::new_with_client(endpoint_url, Default::default())
    }

    /// Creates a new client with a custom reqwest client.
    pub fn new_with_client(endpoint_url: String, client: reqwest::Client) -> Self {
        Self {
            endpoint_url,
            client,
        }
    }
}

impl Client for ReqwestClient {
    fn send_rpc_request(
        &self,
        request: Request,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<Response>> + Send>> {
        let client = self.client.clone();
        let endpoint_url = self.endpoint_url.clone();
        Box::pin(async move {
            log::trace!("sending rpc request {request:?}");

            let response = client
                .post(&endpoint_url)
                .json(&request)
                .send()
                .await
                .context("failed to send RPC request")?
                .json::<Response>()
                .await
                .context("failed to decode RPC response")?;

            log::trace!("rpc response: {response:?}");

            Ok(response)
        })
    }
}
