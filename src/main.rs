#[tokio::main]
async fn main() {
    if let Err(e) = clinic_portal_lib::run().await {
        tracing::error!("Startup failed: {e}");
        eprintln!("clinic-portal: {e}");
        std::process::exit(1);
    }
}
