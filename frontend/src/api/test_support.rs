pub mod mock {
    use crate::api::client::{PreparedRequest, RawResponse, Transport, TransportError};
    use async_trait::async_trait;
    use reqwest::Method;
    use serde_json::Value;
    use std::{cell::RefCell, rc::Rc, time::Duration};

    pub const GET: Method = Method::GET;
    pub const POST: Method = Method::POST;
    pub const PUT: Method = Method::PUT;
    pub const PATCH: Method = Method::PATCH;
    pub const DELETE: Method = Method::DELETE;

    #[derive(Clone)]
    enum Reply {
        Respond(RawResponse),
        Unreachable,
        TimedOut,
    }

    #[derive(Clone)]
    struct Route {
        method: Method,
        url: String,
        reply: Reply,
    }

    #[derive(Default)]
    struct Inner {
        routes: Vec<Route>,
        sent: Vec<PreparedRequest>,
    }

    /// In-process transport: answers from scripted routes (last match wins)
    /// and records every attempt. Unscripted URLs are unreachable.
    #[derive(Clone, Default)]
    pub struct RecordingTransport {
        inner: Rc<RefCell<Inner>>,
    }

    impl RecordingTransport {
        pub fn new() -> Self {
            Self::default()
        }

        fn push(&self, method: Method, url: &str, reply: Reply) {
            self.inner.borrow_mut().routes.push(Route {
                method,
                url: url.to_string(),
                reply,
            });
        }

        pub fn respond(&self, method: Method, url: &str, status: u16, body: &str) -> &Self {
            self.push(
                method,
                url,
                Reply::Respond(RawResponse {
                    status,
                    body: body.to_string(),
                }),
            );
            self
        }

        pub fn respond_json(&self, method: Method, url: &str, status: u16, body: Value) -> &Self {
            self.respond(method, url, status, &body.to_string())
        }

        pub fn unreachable(&self, method: Method, url: &str) -> &Self {
            self.push(method, url, Reply::Unreachable);
            self
        }

        pub fn time_out(&self, method: Method, url: &str) -> &Self {
            self.push(method, url, Reply::TimedOut);
            self
        }

        pub fn requests(&self) -> Vec<PreparedRequest> {
            self.inner.borrow().sent.clone()
        }

        pub fn urls(&self) -> Vec<String> {
            self.inner
                .borrow()
                .sent
                .iter()
                .map(|r| r.url.clone())
                .collect()
        }

        pub fn last(&self) -> Option<PreparedRequest> {
            self.inner.borrow().sent.last().cloned()
        }
    }

    #[async_trait(?Send)]
    impl Transport for RecordingTransport {
        async fn send(&self, request: PreparedRequest) -> Result<RawResponse, TransportError> {
            let reply = {
                let mut inner = self.inner.borrow_mut();
                inner.sent.push(request.clone());
                inner
                    .routes
                    .iter()
                    .rev()
                    .find(|route| route.method == request.method && route.url == request.url)
                    .map(|route| route.reply.clone())
            };
            match reply {
                Some(Reply::Respond(raw)) => Ok(raw),
                Some(Reply::TimedOut) => Err(TransportError::Timeout(request.timeout)),
                Some(Reply::Unreachable) | None => Err(TransportError::Connect(format!(
                    "no route to {}",
                    request.url
                ))),
            }
        }
    }

    pub fn short_deadline() -> Duration {
        Duration::from_millis(200)
    }
}
