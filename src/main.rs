#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = eduhub_api::run().await {
        eprintln!("eduhub-api fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
