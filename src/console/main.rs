use nanoid::nanoid;
use tokio::io::BufReader;
use tracing::info;

use buzzer::{Config, Desk};

mod session;

#[tokio::main]
async fn main() -> buzzer::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    tracing_subscriber::fmt()
        .with_max_level(config.level()?)
        .with_writer(std::io::stderr)
        .init();

    let name = config.desk_name.clone().unwrap_or_else(|| nanoid!());
    let desk = Desk::new(name, config.mailbox_capacity);

    let stdin = BufReader::new(tokio::io::stdin());
    session::run(&desk, &config, stdin, tokio::io::stdout()).await?;
    info!("session ended");

    Ok(())
}
