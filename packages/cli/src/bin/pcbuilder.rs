// ABOUTME: Entry point for the PC Builder API server binary
// ABOUTME: Delegates to the library's run_server

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pcbuilder_cli::run_server().await
}
