use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real environments set variables directly
    let _ = dotenvy::dotenv();
    env_logger::init();

    interviewiq::cli::run().await
}
