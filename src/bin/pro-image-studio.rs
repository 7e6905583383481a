//! Pro Image Studio CLI
//!
//! Batch product-photo compositing and prompt generation from the command line.

#[cfg(feature = "cli")]
use pro_image_studio::cli;

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::main().await
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Please rebuild with --features cli");
    std::process::exit(2);
}
