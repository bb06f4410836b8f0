mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries command output only
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "char_tokenizer=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Train {
            corpus,
            out,
            ignored,
        }) => {
            cli::note_ignored(&ignored);
            cli::train(corpus, &out)?;
        }
        Some(Commands::Encode {
            vocab,
            text,
            add_new,
            ignored,
        }) => {
            cli::note_ignored(&ignored);
            cli::encode(vocab, text, add_new)?;
        }
        Some(Commands::Decode {
            vocab,
            ids,
            ignored,
        }) => {
            cli::note_ignored(&ignored);
            cli::decode(vocab, ids)?;
        }
        Some(Commands::Other(args)) => {
            cli::unknown_command(&args);
        }
        None => {
            cli::print_usage();
        }
    }

    Ok(())
}
