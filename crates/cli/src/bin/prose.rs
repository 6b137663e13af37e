use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    prose_cli::main_entry().await
}
