#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = radclinic_lib::run().await {
        tracing::error!(error = %e, "Console failed to start");
        eprintln!("radclinic: {e}");
        std::process::exit(1);
    }
}
