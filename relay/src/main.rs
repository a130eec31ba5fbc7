use tracerelay::core::RelayApp;

#[tokio::main]
async fn main() {
    if let Err(e) = RelayApp::run().await {
        eprintln!("\nError: {}\n", e);
        std::process::exit(1);
    }
}
