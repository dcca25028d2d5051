use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use nightsong_giveaways::commands::CommandHandler;
use nightsong_giveaways::console::{parse_line, render, render_error};
use nightsong_giveaways::error::{Error, Result};
use nightsong_giveaways::{Config, GiveawayManager};

fn init_tracing(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_new(config.log_filter())
        .map_err(|err| Error::Config(format!("Invalid log filter: {}", err)))?;

    // Logs go to stderr, so they don't mix with the command output.
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    init_tracing(&config)?;

    let handler = CommandHandler::new(GiveawayManager::new(&config), &config);
    info!(
        prefix = handler.prefix(),
        roll_policy = config.roll_policy().as_str(),
        "Giveaway console is ready"
    );

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let text = match parse_line(&line) {
            Ok(parsed) => match handler.execute(&parsed.context, &parsed.command) {
                Ok(output) => render(&output),
                Err(err) => render_error(&err),
            },
            Err(err) => {
                error!("Can't read the console line: {}", err);
                render_error(&err)
            }
        };

        stdout.write_all(format!("{}\n", text).as_bytes()).await?;
        stdout.flush().await?;
    }

    Ok(())
}
