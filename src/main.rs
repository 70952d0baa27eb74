#[tokio::main]
async fn main() -> std::io::Result<()> {
    event_planner::run().await
}
