use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use extractors::normalizer::normalize_amount;
use extractors::{extractor_for, LocalizationContext};
use shared_types::{DocumentClass, Extractor, RawMessage};
use std::path::PathBuf;
use tracing_subscriber::prelude::*;

mod config;
mod message;

#[derive(Parser, Debug)]
#[command(
    name = "mailcheck",
    author,
    version,
    about = "Read structured fields out of client emails"
)]
struct Cli {
    /// Config file (defaults to <config dir>/mailcheck/cli.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    log_file_path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the fields of a document class and print them as JSON
    #[command(group(
        ArgGroup::new("input")
            .required(true)
            .args(["eml", "html"]),
    ))]
    Extract {
        /// Document class, e.g. order-confirmation or gift-sent
        #[arg(long)]
        class: DocumentClass,

        /// Path to a .eml file
        #[arg(long, value_name = "PATH")]
        eml: Option<PathBuf>,

        /// Path to a saved HTML body
        #[arg(long, value_name = "PATH")]
        html: Option<PathBuf>,

        /// Subject line (overrides the one in the .eml file)
        #[arg(long)]
        subject: Option<String>,
    },

    /// Print the canonical form of a localized number
    Normalize { raw: String },

    /// List the known document classes and their fields
    Classes,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file_path.as_deref());

    let (config, config_path) =
        config::CliConfig::load(cli.config.clone()).context("Failed to load mailcheck config")?;
    tracing::debug!("Using config at {:?}", config_path);

    let localization = config.localization_context()?;
    let output = run(cli.command, &localization, config.pretty_output())?;

    println!("{output}");
    Ok(())
}

fn run(command: Command, localization: &LocalizationContext, pretty: bool) -> Result<String> {
    match command {
        Command::Extract {
            class,
            eml,
            html,
            subject,
        } => {
            let message = match (eml, html) {
                (Some(path), None) => message::load_eml(&path, subject.as_deref())?,
                (None, Some(path)) => message::load_html(&path, subject.as_deref())?,
                _ => unreachable!("clap enforces exactly one input"),
            };
            extract(class, &message, localization, pretty)
        }
        Command::Normalize { raw } => Ok(normalize_amount(&raw)),
        Command::Classes => Ok(list_classes(localization)),
    }
}

fn extract(
    class: DocumentClass,
    message: &RawMessage,
    localization: &LocalizationContext,
    pretty: bool,
) -> Result<String> {
    if !message.is_html() {
        tracing::warn!(
            class = %class,
            content_type = %message.content_type,
            "Message is not HTML, no fields can be extracted"
        );
    }

    let extractor = extractor_for(class, localization);
    let fields = extractor
        .extract(message)
        .with_context(|| format!("Failed to extract {class} fields"))?;

    tracing::info!(
        class = %class,
        extractor_version = %extractor.version(),
        found = fields.len(),
        queried = extractor.queries().len(),
        "Extraction finished"
    );

    let json = if pretty {
        serde_json::to_string_pretty(&fields)?
    } else {
        serde_json::to_string(&fields)?
    };
    Ok(json)
}

fn list_classes(localization: &LocalizationContext) -> String {
    DocumentClass::ALL
        .into_iter()
        .map(|class| {
            let extractor = extractor_for(class, localization);
            let names: Vec<&str> = extractor.queries().iter().map(|q| q.name.as_str()).collect();
            format!("{class}: {}", names.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn init_tracing(log_file_path: Option<&str>) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = log_file_path {
        let log_path = std::path::Path::new(log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("mailcheck.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIFT_RECEIVED: &str = r#"<table>
  <tr><td>Gift from: AliceGamer</td></tr>
  <tr><td>Product:</td><td>Mass Effect Andromeda</td></tr>
</table>"#;

    #[test]
    fn test_cli_parses_extract() {
        let cli = Cli::try_parse_from([
            "mailcheck",
            "extract",
            "--class",
            "gift-received",
            "--html",
            "body.html",
        ])
        .unwrap();

        match cli.command {
            Command::Extract { class, html, eml, .. } => {
                assert_eq!(class, DocumentClass::GiftReceived);
                assert_eq!(html, Some(PathBuf::from("body.html")));
                assert!(eml.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_requires_one_input() {
        assert!(Cli::try_parse_from(["mailcheck", "extract", "--class", "gift-sent"]).is_err());
        assert!(Cli::try_parse_from([
            "mailcheck", "extract", "--class", "gift-sent", "--eml", "a.eml", "--html", "b.html",
        ])
        .is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_class() {
        assert!(
            Cli::try_parse_from(["mailcheck", "extract", "--class", "newsletter", "--html", "x"])
                .is_err()
        );
    }

    #[test]
    fn test_extract_prints_ordered_json() {
        let message = RawMessage::html("You received a gift", GIFT_RECEIVED);
        let json = extract(
            DocumentClass::GiftReceived,
            &message,
            &LocalizationContext::english(),
            false,
        )
        .unwrap();

        assert_eq!(
            json,
            r#"{"sender":"AliceGamer","product_name":"Mass Effect Andromeda"}"#
        );
    }

    #[test]
    fn test_extract_plain_message_prints_empty_object() {
        let message = RawMessage::plain("You received a gift", GIFT_RECEIVED);
        let json = extract(
            DocumentClass::GiftReceived,
            &message,
            &LocalizationContext::english(),
            false,
        )
        .unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_normalize_command() {
        let output = run(
            Command::Normalize {
                raw: "1.234,56 €".to_string(),
            },
            &LocalizationContext::english(),
            true,
        )
        .unwrap();
        assert_eq!(output, "1234.56");
    }

    #[test]
    fn test_extract_command_from_html_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gift.html");
        std::fs::write(&path, GIFT_RECEIVED).unwrap();

        let output = run(
            Command::Extract {
                class: DocumentClass::GiftReceived,
                eml: None,
                html: Some(path),
                subject: None,
            },
            &LocalizationContext::english(),
            false,
        )
        .unwrap();
        assert!(output.contains(r#""sender":"AliceGamer""#));
    }

    // the only test that installs the global subscriber
    #[test]
    fn test_init_tracing_with_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("mailcheck.log");

        init_tracing(Some(log_path.to_str().unwrap()));
        assert!(tracing::dispatcher::has_been_set());
        tracing::info!("tracing installed");
    }

    #[test]
    fn test_classes_lists_every_class() {
        let listing = list_classes(&LocalizationContext::english());
        assert_eq!(listing.lines().count(), DocumentClass::ALL.len());
        assert!(listing.contains("order-confirmation: order_number, order_date"));
    }
}
