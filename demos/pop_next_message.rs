use spirius::{Credentials, SpiriusClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let client = SpiriusClient::new(Credentials::from_env()?)?;
    let response = client.pop_next_message().await?.error_for_status()?;
    println!("{}", response.body);

    Ok(())
}
