use std::process::exit;

use torn_api_client::{timestamp, CancellationToken, Client, ClientError, ResourceQuery, Result};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Expect the API key as the first argument and an optional user id after
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <api_key> [user_id]", args[0]);
        exit(1);
    }
    let key = args[1].as_str();
    let user_id = args.get(2).cloned();

    let client = Client::builder().user_agent("torn-api-client demo").build()?;
    let cancel = CancellationToken::new();

    // Check what the key is allowed to do
    match client.key(key, ResourceQuery::new(), &cancel).await {
        Ok(Some(info)) => println!(
            "Key access level: {}",
            info.get("access_level").cloned().unwrap_or_default()
        ),
        Ok(None) => println!("Key info unavailable (HTTP failure)"),
        Err(ClientError::Api(err)) => {
            eprintln!("API rejected the key: {}", err);
            exit(1);
        }
        Err(err) => return Err(err),
    }

    // Basic profile of the key owner or of the given user
    let mut query = ResourceQuery::new()
        .selections(["basic", "profile"])
        .comment("demo");
    if let Some(id) = user_id {
        query = query.id(id);
    }
    if let Some(user) = client.user(key, query, &cancel).await? {
        println!(
            "User: {} [{}] level {}",
            user.get("name").cloned().unwrap_or_default(),
            user.get("player_id").cloned().unwrap_or_default(),
            user.get("level").cloned().unwrap_or_default(),
        );
    }

    // Server time from the aggregate endpoint
    let torn = client
        .torn(key, ResourceQuery::new().selections(["timestamp"]), &cancel)
        .await?;
    if let Some(torn) = torn {
        if let Some(ts) = torn.field::<i64>("timestamp")? {
            if let Some(time) = timestamp::from_secs(ts) {
                println!("Server time: {}", time.to_rfc3339());
            }
        }
    }

    Ok(())
}
