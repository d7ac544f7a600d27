use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
  training_sync_lib::run().await
}
