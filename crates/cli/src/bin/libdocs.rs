use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    libdocs_cli::main_entry().await
}
