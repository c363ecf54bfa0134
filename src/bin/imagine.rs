// Manual test client for the /imagine endpoint.
use std::env;
use std::io::{self, Write};

use dotenv::dotenv;
use reqwest::Client;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let base_url =
        env::var("IMAGINE_URL").unwrap_or_else(|_| "http://127.0.0.1:8800/imagine".to_string());

    print!("Enter your prompt: ");
    io::stdout().flush()?;
    let mut prompt = String::new();
    io::stdin().read_line(&mut prompt)?;
    let prompt = prompt.trim().to_string();

    let mut query = vec![("user_prompt", prompt)];
    if let Ok(address) = env::var("RECIPIENT_ADDRESS") {
        query.push(("address", address));
    }

    let mut request = Client::new().get(&base_url).query(&query);
    if let Ok(api_key) = env::var("SERVICE_API_KEY") {
        request = request.bearer_auth(api_key);
    }

    let response = request.send().await?;
    println!("Status: {}", response.status());
    println!("Response: {}", response.text().await?);

    Ok(())
}
