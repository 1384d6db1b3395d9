//! Scripted transport for exercising the client and the loaders without a
//! backend. Replies are consumed in order; every request is recorded.

use std::collections::VecDeque;
use std::sync::Mutex;

use http::StatusCode;

use crate::transport::{BackendRequest, BackendResponse, Transport, TransportError};

enum Reply {
    Response(BackendResponse),
    Fail(TransportError),
}

#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<BackendRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, status: u16, body: serde_json::Value) -> Self {
        self.reply_raw(status, &body.to_string())
    }

    pub fn reply_raw(self, status: u16, body: &str) -> Self {
        let status = StatusCode::from_u16(status).expect("scripted status must be valid");
        self.push(Reply::Response(BackendResponse {
            status,
            body: body.as_bytes().to_vec(),
        }))
    }

    pub fn fail(self, error: TransportError) -> Self {
        self.push(Reply::Fail(error))
    }

    fn push(self, reply: Reply) -> Self {
        self.replies
            .lock()
            .expect("scripted transport poisoned")
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<BackendRequest> {
        self.calls.lock().expect("scripted transport poisoned").clone()
    }

    /// Requests as `"METHOD url"` strings, in the order they were sent.
    pub fn requested(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|c| format!("{} {}", c.method, c.url))
            .collect()
    }

    pub fn remaining(&self) -> usize {
        self.replies.lock().expect("scripted transport poisoned").len()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: BackendRequest) -> Result<BackendResponse, TransportError> {
        self.calls
            .lock()
            .expect("scripted transport poisoned")
            .push(request);

        let next = self
            .replies
            .lock()
            .expect("scripted transport poisoned")
            .pop_front();

        match next {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::Fail(error)) => Err(error),
            None => Err(TransportError::Other("no scripted reply left".into())),
        }
    }
}
