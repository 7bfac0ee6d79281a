#[tokio::main]
async fn main() {
    std::process::exit(mqproducer::app::startup::startup().await);
}
