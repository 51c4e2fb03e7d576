use qna_system::{DataUri, PDF_MIME_TYPE};
use reqwest::Client;
use serde_json::json;
use tokio;

// Tiny but structurally valid PDF, enough for the model to open.
const SAMPLE_PDF: &[u8] = b"%PDF-1.4\n1 0 obj<</Type/Catalog/Pages 2 0 R>>endobj\n2 0 obj<</Type/Pages/Kids[3 0 R]/Count 1>>endobj\n3 0 obj<</Type/Page/Parent 2 0 R/MediaBox[0 0 612 792]>>endobj\ntrailer<</Root 1 0 R>>\n%%EOF";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = Client::new();
    let base_url = "http://127.0.0.1:3000";

    println!("🔍 Testing PDF Q&A API");

    println!("\n📋 Health Check:");
    let health_response = client
        .get(format!("{}/health", base_url))
        .send()
        .await?;

    println!("Status: {}", health_response.status());
    let health_json: serde_json::Value = health_response.json().await?;
    println!("Response: {}", serde_json::to_string_pretty(&health_json)?);

    println!("\n❓ Question Test:");
    let pdf_data_uri = DataUri::encode(PDF_MIME_TYPE, SAMPLE_PDF).to_string();
    let payload = json!({
        "pdfDataUri": pdf_data_uri,
        "question": "What is the title of this document?"
    });

    let answer_response = client
        .post(format!("{}/answer", base_url))
        .header("Content-Type", "application/json")
        .json(&payload)
        .send()
        .await?;

    println!("Status: {}", answer_response.status());
    let answer_json: serde_json::Value = answer_response.json().await?;
    println!("Response: {}", serde_json::to_string_pretty(&answer_json)?);

    println!("\n✅ Client test completed!");
    Ok(())
}
