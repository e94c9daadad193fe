use clap::{Args, Subcommand};
use relay_mailjet::MailjetMailer;

use crate::OutputFormat;
use crate::config::RelayConfig;

#[derive(Args, Debug)]
pub struct TrackingArgs {
    #[command(subcommand)]
    pub command: TrackingCommand,
}

#[derive(Subcommand, Debug)]
pub enum TrackingCommand {
    /// Show the configured tracking callbacks.
    Show,
    /// Register callbacks with Mailjet. Without arguments, every configured
    /// event is activated.
    Activate {
        /// Event name (sent, open, click, bounce, spam, blocked, unsub).
        #[arg(requires = "url")]
        event: Option<String>,
        /// Callback URL for the event.
        url: Option<String>,
    },
    /// Remove callbacks from Mailjet. Without an event, every configured
    /// event is cleared.
    Clear {
        /// Event name (sent, open, click, bounce, spam, blocked, unsub).
        event: Option<String>,
    },
}

pub async fn run(
    config: &RelayConfig,
    args: &TrackingArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let mailer = MailjetMailer::new(&config.mailjet)?;

    match &args.command {
        TrackingCommand::Show => match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(mailer.tracking())?);
            }
            OutputFormat::Text => {
                if mailer.tracking().is_empty() {
                    println!("No tracking configured.");
                }
                for (event, url) in mailer.tracking() {
                    println!("{event:<8} {url}");
                }
            }
        },
        TrackingCommand::Activate {
            event: Some(event),
            url: Some(url),
        } => {
            mailer.activate_tracking(event, url).await?;
            println!("Tracking for {event} is active.");
        }
        TrackingCommand::Activate { .. } => {
            mailer.activate_all_trackings().await?;
            println!("Activated {} tracking event(s).", mailer.tracking().len());
        }
        TrackingCommand::Clear { event: Some(event) } => {
            mailer.clear_tracking(event).await?;
            println!("Tracking for {event} cleared.");
        }
        TrackingCommand::Clear { event: None } => {
            mailer.clear_all_trackings().await?;
            println!("Cleared {} tracking event(s).", mailer.tracking().len());
        }
    }

    Ok(())
}
