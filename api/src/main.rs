mod routes;

use qna_system::{GeminiService, QnaService};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize environment variables and logging
    dotenv::dotenv().ok();
    env_logger::init();

    let gateway = match GeminiService::new() {
        Ok(model) => Arc::new(QnaService::new(Arc::new(model))),
        Err(e) => {
            eprintln!("Failed to initialize Gemini client: {}", e);
            std::process::exit(1);
        }
    };

    let app = routes::router(gateway);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    println!("Listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.unwrap();
}
