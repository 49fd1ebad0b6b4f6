use std::io;

use spirius::{Credentials, MessageText, RawPhoneNumber, SendSms, SenderId, SpiriusClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let to = std::env::var("SPIRIUS_TO").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SPIRIUS_TO environment variable is required",
        )
    })?;
    let from = std::env::var("SPIRIUS_FROM").unwrap_or_else(|_| "SPIRIUS".to_owned());
    let message = std::env::var("SPIRIUS_MESSAGE")
        .unwrap_or_else(|_| "Hello from the spirius example.".to_owned());

    // SPIRIUS_SHARED_KEY / SPIRIUS_USERNAME, from the account page on portal.spirius.com
    let client = SpiriusClient::new(Credentials::from_env()?)?;
    let request = SendSms::new(
        MessageText::new(message)?,
        SenderId::new(from)?,
        RawPhoneNumber::new(to)?,
    );

    let response = client.send_sms(request).await?;
    println!("status: {}, body: {}", response.status, response.body);

    Ok(())
}
