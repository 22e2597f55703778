#[tokio::main]
async fn main() -> anyhow::Result<()> {
    azure_chat_proxy::run().await
}
