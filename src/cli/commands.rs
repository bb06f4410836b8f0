use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use char_tokenizer::{EncodeOptions, TokenId, VocabStore};

pub const TRAIN_USAGE: &str = "Usage: char-tokenizer train <corpus.txt> [out.json]";
pub const ENCODE_USAGE: &str = "Usage: char-tokenizer encode <vocab.json> \"text\" [addNew]";
pub const DECODE_USAGE: &str = "Usage: char-tokenizer decode <vocab.json> \"id1,id2,...\"";

pub const GENERAL_USAGE: &str = r#"char-tokenizer CLI
Commands:
  train <corpus.txt> [out.json]        Build vocab from corpus and save vocab
  encode <vocab.json> "text" [addNew]  Encode text (optionally add unseen chars)
  decode <vocab.json> "id,id,..."      Decode ids to text
"#;

#[derive(Parser)]
#[command(name = "char-tokenizer")]
#[command(about = "Character-level tokenizer with a JSON vocabulary file")]
#[command(version)]
#[command(after_long_help = r#"
EXAMPLES:
    # Build a vocabulary from a corpus
    char-tokenizer train corpus.txt vocab.json

    # Encode text, mapping unseen characters to <UNK>
    char-tokenizer encode vocab.json "hello"

    # Encode text, assigning ids to unseen characters
    char-tokenizer encode vocab.json "hello!" addNew

    # Decode ids back to text
    char-tokenizer decode vocab.json "4,5,6,1"
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// Positionals are optional so that a missing one prints the usage line
// instead of failing the process. Subcommands have no `-h` flag so that any
// text can be encoded; `char-tokenizer help <command>` still shows help.
// Extra trailing arguments are accepted and ignored.
#[derive(Subcommand)]
pub enum Commands {
    /// Build a vocabulary from a corpus file and save it
    #[command(disable_help_flag = true)]
    Train {
        /// Path to the corpus text file
        #[arg(allow_hyphen_values = true)]
        corpus: Option<PathBuf>,

        /// Where to write the vocabulary
        #[arg(default_value = "vocab.json", allow_hyphen_values = true)]
        out: PathBuf,

        #[arg(hide = true, allow_hyphen_values = true)]
        ignored: Vec<String>,
    },

    /// Encode text to comma-separated ids
    #[command(disable_help_flag = true)]
    Encode {
        /// Path to the vocabulary file
        #[arg(allow_hyphen_values = true)]
        vocab: Option<PathBuf>,

        /// Text to encode
        #[arg(allow_hyphen_values = true)]
        text: Option<String>,

        /// `true` or `addNew` assigns ids to unseen characters
        #[arg(allow_hyphen_values = true)]
        add_new: Option<String>,

        #[arg(hide = true, allow_hyphen_values = true)]
        ignored: Vec<String>,
    },

    /// Decode comma-separated ids to text
    #[command(disable_help_flag = true)]
    Decode {
        /// Path to the vocabulary file
        #[arg(allow_hyphen_values = true)]
        vocab: Option<PathBuf>,

        /// Comma-separated ids, e.g. "4,5,6"
        #[arg(allow_hyphen_values = true)]
        ids: Option<String>,

        #[arg(hide = true, allow_hyphen_values = true)]
        ignored: Vec<String>,
    },

    #[command(external_subcommand)]
    Other(Vec<String>),
}

fn present<T: AsRef<std::ffi::OsStr>>(arg: Option<T>) -> Option<T> {
    arg.filter(|a| !a.as_ref().is_empty())
}

pub fn print_usage() {
    print!("{}", GENERAL_USAGE);
}

/// Prints the general usage for a command name that is not recognized.
pub fn unknown_command(args: &[String]) {
    if let Some(name) = args.first() {
        tracing::warn!("Unknown command: {}", name);
    }
    print_usage();
}

pub fn note_ignored(args: &[String]) {
    if !args.is_empty() {
        tracing::debug!("Ignoring extra arguments: {:?}", args);
    }
}

pub fn train(corpus: Option<PathBuf>, out: &Path) -> anyhow::Result<()> {
    let Some(corpus) = present(corpus) else {
        println!("{}", TRAIN_USAGE);
        return Ok(());
    };

    let text = fs::read_to_string(&corpus)
        .with_context(|| format!("Failed to read corpus {}", corpus.display()))?;

    let mut store = VocabStore::new();
    let size = store.grow(&text);
    store
        .save(out)
        .with_context(|| format!("Failed to save vocabulary to {}", out.display()))?;

    println!("Trained. Vocab size: {}. Saved -> {}", size, out.display());
    Ok(())
}

pub fn encode(
    vocab: Option<PathBuf>,
    text: Option<String>,
    add_new: Option<String>,
) -> anyhow::Result<()> {
    let (Some(vocab), Some(text)) = (present(vocab), present(text)) else {
        println!("{}", ENCODE_USAGE);
        return Ok(());
    };

    let mut store = load_vocab(&vocab)?;
    let options = EncodeOptions {
        add_new: is_add_new_flag(add_new.as_deref()),
    };
    let ids = store.encode(&text, &options);

    println!("{}", join_ids(&ids));
    Ok(())
}

pub fn decode(vocab: Option<PathBuf>, ids: Option<String>) -> anyhow::Result<()> {
    let (Some(vocab), Some(ids)) = (present(vocab), present(ids)) else {
        println!("{}", DECODE_USAGE);
        return Ok(());
    };

    let store = load_vocab(&vocab)?;
    println!("{}", store.decode_lossy(parse_id_list(&ids)));
    Ok(())
}

fn load_vocab(path: &Path) -> anyhow::Result<VocabStore> {
    VocabStore::load(path)
        .with_context(|| format!("Failed to load vocabulary from {}", path.display()))
}

fn is_add_new_flag(arg: Option<&str>) -> bool {
    matches!(arg, Some("true") | Some("addNew"))
}

fn join_ids(ids: &[TokenId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Splits `"4, 5,x"` into ids; pieces that are not a decimal id become `None`.
pub fn parse_id_list(ids: &str) -> Vec<Option<TokenId>> {
    ids.split(',')
        .map(|piece| piece.trim().parse::<TokenId>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_list() {
        assert_eq!(parse_id_list("4,5,6,1"), vec![Some(4), Some(5), Some(6), Some(1)]);
        assert_eq!(parse_id_list(" 4 ,5"), vec![Some(4), Some(5)]);
        assert_eq!(parse_id_list("4,x,-1,"), vec![Some(4), None, None, None]);
        assert_eq!(parse_id_list("99999999999"), vec![None]);
    }

    #[test]
    fn test_add_new_flag() {
        assert!(is_add_new_flag(Some("true")));
        assert!(is_add_new_flag(Some("addNew")));
        assert!(!is_add_new_flag(Some("false")));
        assert!(!is_add_new_flag(Some("addnew")));
        assert!(!is_add_new_flag(None));
    }

    #[test]
    fn test_join_ids() {
        assert_eq!(join_ids(&[4, 5, 6, 1]), "4,5,6,1");
        assert_eq!(join_ids(&[]), "");
    }

    #[test]
    fn test_cli_parses_optional_positionals() {
        let cli = Cli::try_parse_from(["char-tokenizer", "encode", "vocab.json"]).unwrap();
        match cli.command {
            Some(Commands::Encode {
                vocab,
                text,
                add_new,
                ignored,
            }) => {
                assert_eq!(vocab, Some(PathBuf::from("vocab.json")));
                assert_eq!(text, None);
                assert_eq!(add_new, None);
                assert!(ignored.is_empty());
            }
            _ => panic!("expected encode command"),
        }

        let cli = Cli::try_parse_from(["char-tokenizer", "train", "corpus.txt"]).unwrap();
        match cli.command {
            Some(Commands::Train { corpus, out, .. }) => {
                assert_eq!(corpus, Some(PathBuf::from("corpus.txt")));
                assert_eq!(out, PathBuf::from("vocab.json"));
            }
            _ => panic!("expected train command"),
        }
    }

    #[test]
    fn test_cli_unknown_command() {
        let cli = Cli::try_parse_from(["char-tokenizer", "frobnicate", "x"]).unwrap();
        match cli.command {
            Some(Commands::Other(args)) => assert_eq!(args, vec!["frobnicate", "x"]),
            _ => panic!("expected unrecognized command"),
        }

        let cli = Cli::try_parse_from(["char-tokenizer"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_ignores_extra_arguments() {
        let cli = Cli::try_parse_from([
            "char-tokenizer",
            "encode",
            "vocab.json",
            "abc",
            "addNew",
            "extra",
            "--more",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Encode {
                add_new, ignored, ..
            }) => {
                assert_eq!(add_new.as_deref(), Some("addNew"));
                assert_eq!(ignored, vec!["extra", "--more"]);
            }
            _ => panic!("expected encode command"),
        }

        let cli = Cli::try_parse_from(["char-tokenizer", "decode", "vocab.json", "4,5", "x"])
            .unwrap();
        assert!(matches!(cli.command, Some(Commands::Decode { .. })));
    }

    #[test]
    fn test_cli_encodes_help_flag_text() {
        for text in ["-h", "--help"] {
            let cli = Cli::try_parse_from(["char-tokenizer", "encode", "vocab.json", text])
                .unwrap();
            match cli.command {
                Some(Commands::Encode { text: parsed, .. }) => {
                    assert_eq!(parsed.as_deref(), Some(text));
                }
                _ => panic!("expected encode command"),
            }
        }
    }
}
