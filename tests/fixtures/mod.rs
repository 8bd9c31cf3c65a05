//! Test fixtures for integration tests.

use peercode::ui::{app, default_state};

/// A server instance bound to a local port, serving in a background task.
pub struct TestServer {
    port: u16,
}

impl TestServer {
    /// Bind the port and start serving.
    ///
    /// The listener is bound before this returns, so requests can be sent
    /// immediately.
    pub async fn start(port: u16) -> Self {
        let state = default_state();
        let router = app(state);
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .expect("failed to bind test server port");

        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("test server failed");
        });

        Self { port }
    }

    #[allow(dead_code)]
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    #[allow(dead_code)]
    pub fn ws_url(&self, code_block_id: &str) -> String {
        format!(
            "ws://127.0.0.1:{}/ws?code_block_id={}",
            self.port, code_block_id
        )
    }
}
