//! Shared harness: a real server on a random port backed by the in-memory
//! repositories.

#![allow(dead_code)]

use std::net::TcpListener;

use restaurant_api::auth::{TokenIssuer, TokenValidator};
use restaurant_api::configuration::JwtSettings;
use restaurant_api::repository::Repositories;
use restaurant_api::startup::run;
use serde_json::{json, Value};

pub struct TestApp {
    pub address: String,
    pub repositories: Repositories,
    pub issuer: TokenIssuer,
    pub client: reqwest::Client,
}

pub fn jwt_settings() -> JwtSettings {
    JwtSettings {
        // distinct per test run so tokens never leak between apps
        secret: format!("test-secret-{}", uuid::Uuid::new_v4()),
        access_token_expiry: 6 * 3600,
        refresh_token_expiry: 24 * 3600,
        issuer: "restaurant-api".to_string(),
    }
}

pub fn spawn_app() -> TestApp {
    spawn_app_with(jwt_settings())
}

pub fn spawn_app_with(jwt: JwtSettings) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let repositories = Repositories::in_memory();
    let issuer = TokenIssuer::new(&jwt).expect("Invalid JWT settings");
    let validator = TokenValidator::new(&jwt);

    let server = run(listener, repositories.clone(), issuer.clone(), validator, 1)
        .expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        repositories,
        issuer,
        client: reqwest::Client::new(),
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn signup(&self, email: &str, phone: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/v1/users/signup"))
            .json(&json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": email,
                "password": "secret123",
                "phone": phone,
            }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/v1/users/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Sign up a fresh user and return its access token
    pub async fn access_token(&self) -> String {
        let email = format!("{}@example.com", uuid::Uuid::new_v4().simple());
        let phone = format!("555{:07}", rand_digits());
        assert_eq!(201, self.signup(&email, &phone).await.status().as_u16());

        let body: Value = self.login(&email, "secret123").await.json().await.unwrap();
        body["accessToken"].as_str().unwrap().to_string()
    }

    pub async fn get(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post(&self, path: &str, token: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn patch(&self, path: &str, token: &str, body: &Value) -> reqwest::Response {
        self.client
            .patch(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

fn rand_digits() -> u32 {
    (uuid::Uuid::new_v4().as_u128() % 10_000_000) as u32
}
