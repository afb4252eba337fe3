//! Binary entrypoint for recovery-mode

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    recovery_mode::cli::run().await
}
