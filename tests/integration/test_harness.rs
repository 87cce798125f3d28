// Test harness for integration tests
// Starts and stops the release binary with a given environment

use std::path::PathBuf;
use std::process::{Child, Command};
use std::thread;
use std::time::Duration;

/// Test server instance that automatically starts and stops
pub struct ServerTestHarness {
    process: Option<Child>,
    pub port: u16,
    pub base_url: String,
}

impl ServerTestHarness {
    /// Start a new server instance listening on `127.0.0.1:{port}`.
    ///
    /// `env` is added on top of the inherited environment; `LISTEN_ADDRESS`
    /// and `PORT` are set by the harness.
    pub fn start(env: &[(&str, String)], port: u16) -> Result<Self, String> {
        let binary_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("target")
            .join("release")
            .join("shrinkray");

        if !binary_path.exists() {
            return Err(format!(
                "Binary not found at {:?}. Run 'cargo build --release' first.",
                binary_path
            ));
        }

        let mut command = Command::new(&binary_path);
        command
            .env("LISTEN_ADDRESS", "127.0.0.1")
            .env("PORT", port.to_string());
        for (name, value) in env {
            command.env(name, value);
        }

        let mut child = command
            .spawn()
            .map_err(|e| format!("Failed to start server: {}", e))?;

        // Wait for the server to start
        thread::sleep(Duration::from_secs(1));

        match child.try_wait() {
            Ok(Some(status)) => {
                return Err(format!("Server exited immediately with status: {}", status));
            }
            Ok(None) => {}
            Err(e) => {
                return Err(format!("Error checking server status: {}", e));
            }
        }

        let base_url = format!("http://127.0.0.1:{}", port);
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        for attempt in 1..=10 {
            if let Ok(response) = client.get(format!("{}/health", base_url)).send() {
                if response.status().is_success() {
                    tracing::info!(port, "Server started");
                    return Ok(ServerTestHarness {
                        process: Some(child),
                        port,
                        base_url,
                    });
                }
            }

            if attempt < 10 {
                thread::sleep(Duration::from_millis(500));
            }
        }

        let _ = child.kill();
        Err(format!("Server did not respond after 10 attempts on port {}", port))
    }

    /// Get the full URL for a path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Stop the server (called automatically on drop)
    pub fn stop(&mut self) {
        if let Some(mut child) = self.process.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Drop for ServerTestHarness {
    fn drop(&mut self) {
        self.stop();
    }
}
