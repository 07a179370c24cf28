use std::{fmt::Display, path::PathBuf, time::Duration};

use anyhow::{Result, anyhow};
use figures_app::state::AppState;
use figures_server::{
    config::{Parser, ServerConfig},
    run::{build_state, run_graceful_with_state},
};
use rand::Rng as _;
use reqwest::Url;
use tempfile::TempDir;
use tokio::sync::oneshot;
use tracing::{debug, error};

fn random_port() -> Result<u16> {
    let mut rng = rand::rng();

    let mut retries = 3;
    while retries > 0 {
        let port: u16 = rng.random_range(3030..4030);
        let addr: std::net::SocketAddr = format!("127.0.0.1:{}", port).parse()?;
        match std::net::TcpStream::connect_timeout(&addr, std::time::Duration::from_millis(100)) {
            Err(e) if e.kind() == std::io::ErrorKind::ConnectionRefused => return Ok(port),
            Err(_) => retries -= 1,
            Ok(_) => retries -= 1,
        }
    }

    Err(anyhow!("Could not find a free port"))
}

/// Server configuration on a random free port, `extra_args` are appended to the command line.
pub fn test_config(extra_args: &[&str]) -> Result<ServerConfig> {
    let port = random_port()?.to_string();
    let mut args = vec!["figures-e2e-tests", "--port", &port, "--no-cors"];
    args.extend_from_slice(extra_args);
    let config = ServerConfig::try_parse_from(args)?;
    Ok(config)
}

pub struct SeedGuard {
    #[allow(dead_code)]
    dir: TempDir,
    pub path: PathBuf,
}

/// Writes characters into a temporary seed file.
pub fn seed_file(test_name: &str, characters: &serde_json::Value) -> Result<SeedGuard> {
    let dir = TempDir::with_prefix(format!("{}_", test_name))?;
    let path = dir.path().join("characters.json");
    std::fs::write(&path, serde_json::to_vec_pretty(characters)?)?;
    Ok(SeedGuard { dir, path })
}

pub struct TestEnv {
    pub client: reqwest::Client,
    pub base_url: Url,
    pub state: AppState,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestEnv {
    pub fn api_url(&self, path: &str) -> Url {
        self.base_url
            .join(path)
            .unwrap_or_else(|e| panic!("Invalid path {path}: {e}"))
    }
}

impl Drop for TestEnv {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

pub async fn launch_env(config: ServerConfig) -> Result<TestEnv> {
    let base_url = Url::parse(&format!("http://127.0.0.1:{}/", config.port))?;
    let state = build_state(&config).await?;
    let (shutdown, stopped) = oneshot::channel::<()>();
    let server_state = state.clone();
    tokio::spawn(async move {
        let signal = async {
            let _ = stopped.await;
        };
        if let Err(e) = run_graceful_with_state(config, server_state, signal).await {
            error!("Test server failed: {e}");
        }
    });

    let client = reqwest::Client::new();
    wait_until_healthy(&client, &base_url).await?;
    Ok(TestEnv {
        client,
        base_url,
        state,
        shutdown: Some(shutdown),
    })
}

async fn wait_until_healthy(client: &reqwest::Client, base_url: &Url) -> Result<()> {
    let url = base_url.join("health")?;
    for _ in 0..50 {
        match client.get(url.clone()).send().await {
            Ok(response) if response.status().is_success() => return Ok(()),
            Ok(response) => debug!("Server not ready: {}", response.status()),
            Err(e) => debug!("Server not ready: {e}"),
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    Err(anyhow!("Server did not start"))
}

pub fn extend_url(url: &Url, segment: impl Display) -> Url {
    let mut url = url.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(&segment.to_string());
    }
    url
}
