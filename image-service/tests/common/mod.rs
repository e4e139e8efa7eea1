#![allow(dead_code)]

use image_service::config::ImageConfig;
use image_service::startup::Application;
use reqwest::multipart;
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub upload_dir: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Spawn with a config tweak applied after the test defaults.
    pub async fn spawn_with(customize: impl FnOnce(&mut ImageConfig)) -> Self {
        let upload_dir = format!("target/test-uploads-{}", Uuid::new_v4());

        let mut config = ImageConfig::load().expect("Failed to load configuration");
        config.common.port = 0; // Random port for testing
        config.storage.upload_dir = upload_dir.clone();
        customize(&mut config);

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        TestApp {
            address,
            port,
            upload_dir,
            client: reqwest::Client::new(),
        }
    }

    pub async fn upload(&self, filename: &str, data: Vec<u8>) -> reqwest::Response {
        let form = multipart::Form::new().percent_encode_noop().part(
            "file",
            multipart::Part::bytes(data).file_name(filename.to_string()),
        );

        self.client
            .post(format!("{}/upload", self.address))
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_image(&self, filename: &str) -> reqwest::Response {
        self.client
            .get(format!("{}/images/{}", self.address, filename))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn metrics_text(&self) -> String {
        self.client
            .get(format!("{}/metrics", self.address))
            .send()
            .await
            .expect("Failed to execute request")
            .text()
            .await
            .expect("Failed to get response body")
    }

    /// Current value of `image_upload_total` as reported by `/metrics`.
    pub async fn upload_count(&self) -> u64 {
        let body = self.metrics_text().await;
        body.lines()
            .find_map(|line| line.strip_prefix("image_upload_total "))
            .unwrap_or_else(|| panic!("image_upload_total missing from metrics:\n{}", body))
            .trim()
            .parse()
            .expect("counter value should be an integer")
    }

    pub async fn cleanup(&self) {
        let _ = tokio::fs::remove_dir_all(&self.upload_dir).await;
    }
}
