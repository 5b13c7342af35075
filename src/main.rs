#[tokio::main]
async fn main() {
    if let Err(error) = game_sim::run_with_config().await {
        eprintln!("fatal: {error}");
        std::process::exit(1);
    }
}
