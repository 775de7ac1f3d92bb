use reqwest::Client;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::{json, Value};
use std::sync::Arc;

use cupcakes::api::create_api_router;
use cupcakes::config::Config;
use cupcakes::entities::setup_schema;
use cupcakes::service::{CupcakeMutation, CupcakeQuery, NewCupcake};

pub struct TestApp {
    pub client: Client,
    pub base_url: String,
    pub db: Arc<DatabaseConnection>,
    pub cupcake_id: i32,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn count(&self) -> u64 {
        CupcakeQuery::count(&*self.db)
            .await
            .expect("Failed to count cupcakes")
    }

    pub async fn create(&self, payload: &Value) -> i32 {
        let response = self
            .client
            .post(self.url("/api/cupcakes"))
            .json(payload)
            .send()
            .await
            .expect("Failed to send request");
        let body = response
            .json::<Value>()
            .await
            .expect("Failed to parse response JSON");
        body["cupcake"]["id"].as_i64().expect("Cupcake id is not an integer") as i32
    }
}

pub fn cupcake_data() -> Value {
    json!({
        "flavor": "TestFlavor",
        "size": "TestSize",
        "rating": 5,
        "image_url": "http://test.com/cupcake.jpg"
    })
}

pub fn cupcake_data_2() -> Value {
    json!({
        "flavor": "TestFlavor2",
        "size": "TestSize2",
        "rating": 10,
        "image_url": "http://test.com/cupcake2.jpg"
    })
}

/// Serves the api over a fresh in-memory database seeded with one cupcake.
pub async fn spawn_app(update_empty_image_url: &str) -> TestApp {
    let update_empty_image_url = update_empty_image_url.to_owned();
    let config = Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some("sqlite::memory:".to_owned()),
        "BIND_ADDR" => Some("127.0.0.1:0".to_owned()),
        "APP_ENV" => Some("test".to_owned()),
        "UPDATE_EMPTY_IMAGE_URL" => Some(update_empty_image_url.clone()),
        _ => None,
    })
    .expect("Failed to build config");

    // one connection, every pooled connection would get its own memory db
    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to connect to database");
    setup_schema(&db).await.expect("Failed to create schema");

    let seeded = CupcakeMutation::create(
        &db,
        NewCupcake {
            flavor: "TestFlavor".to_owned(),
            size: "TestSize".to_owned(),
            rating: 5.0,
            image_url: Some("http://test.com/cupcake.jpg".to_owned()),
        },
    )
    .await
    .expect("Failed to seed cupcake");

    let db = Arc::new(db);
    let app = create_api_router(db.clone(), &config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        client: Client::new(),
        base_url: format!("http://{}", addr),
        db,
        cupcake_id: seeded.id,
    }
}
