#[tokio::main]
async fn main() -> anyhow::Result<()> {
    launchpad_rpc::app::run_cli().await
}
