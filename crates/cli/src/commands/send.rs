use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use relay_mail::{
    Address, AttachmentOptions, LogMailer, MailMessage, Mailer, Message, Recipients,
};
use relay_mailjet::MailjetMailer;

use crate::OutputFormat;
use crate::config::{RelayConfig, SenderConfig};

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Sender address. Falls back to `[sender]` in the config file.
    #[arg(long)]
    pub from: Option<String>,
    /// Sender display name.
    #[arg(long)]
    pub from_name: Option<String>,
    /// Recipient (`email` or `Name=email`). Repeatable.
    #[arg(long, required = true, value_parser = parse_address)]
    pub to: Vec<Address>,
    /// Carbon-copy recipient (`email` or `Name=email`). Repeatable.
    #[arg(long, value_parser = parse_address)]
    pub cc: Vec<Address>,
    /// Blind carbon-copy recipient (`email` or `Name=email`). Repeatable.
    #[arg(long, value_parser = parse_address)]
    pub bcc: Vec<Address>,
    /// Reply-To address.
    #[arg(long)]
    pub reply_to: Option<String>,
    /// Subject line.
    #[arg(long)]
    pub subject: String,
    /// Plain-text body (string or @file path).
    #[arg(long)]
    pub text: Option<String>,
    /// HTML body (string or @file path).
    #[arg(long)]
    pub html: Option<String>,
    /// File to attach. Repeatable.
    #[arg(long)]
    pub attach: Vec<PathBuf>,
    /// File to embed inline. Repeatable; reference it as `cid:<file name>`.
    #[arg(long)]
    pub embed: Vec<PathBuf>,
    /// Log the message instead of sending it.
    #[arg(long)]
    pub dry_run: bool,
}

fn parse_address(s: &str) -> Result<Address, String> {
    match s.split_once('=') {
        Some((name, email)) if !email.is_empty() => Ok(Address::named(email, name)),
        Some(_) => Err(format!("invalid Name=email: no email in `{s}`")),
        None => Ok(Address::from(s)),
    }
}

fn read_body(value: &str) -> anyhow::Result<String> {
    match value.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading {path}")),
        None => Ok(value.to_owned()),
    }
}

/// Build the message described by `args`.
pub fn build_message(args: &SendArgs, sender: &SenderConfig) -> anyhow::Result<Message> {
    let mut message = Message::new();

    let from = args
        .from
        .clone()
        .or_else(|| sender.email.clone())
        .context("no sender: pass --from or set [sender] email in the config file")?;
    match args.from_name.clone().or_else(|| sender.name.clone()) {
        Some(name) => message.set_from(Address::named(from, name)),
        None => message.set_from(from),
    };

    message
        .set_to(args.to.iter().cloned().collect::<Recipients>())
        .set_cc(args.cc.iter().cloned().collect::<Recipients>())
        .set_bcc(args.bcc.iter().cloned().collect::<Recipients>())
        .set_subject(&args.subject);

    if let Some(reply_to) = &args.reply_to {
        message.set_reply_to(reply_to);
    }
    if let Some(text) = &args.text {
        message.set_text_body(read_body(text)?);
    }
    if let Some(html) = &args.html {
        message.set_html_body(read_body(html)?);
    }
    for path in &args.attach {
        message.attach(path, AttachmentOptions::default())?;
    }
    for path in &args.embed {
        let cid = message.embed(path, AttachmentOptions::default())?;
        tracing::debug!(%cid, "embedded inline attachment");
    }

    Ok(message)
}

pub async fn run(
    config: &RelayConfig,
    args: &SendArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let message = build_message(args, &config.sender)?;

    if args.dry_run {
        let mailer: LogMailer = LogMailer::new("dry-run");
        mailer.send(&message).await?;
        println!("{message}");
        return Ok(());
    }

    let mailer = MailjetMailer::new(&config.mailjet)?;
    let sent = mailer.send(&message).await?;
    let response = mailer.last_response();

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({ "sent": sent, "response": response });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            if sent {
                println!("Message accepted by {}.", mailer.name());
            } else {
                eprintln!("Message rejected by {}.", mailer.name());
            }
            if let Some(response) = response {
                println!("HTTP {}: {}", response.status, response.body);
            }
        }
    }

    if !sent {
        std::process::exit(1);
    }
    Ok(())
}
