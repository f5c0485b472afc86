use std::io::Read;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use blindex::{canon, terms_from_json, BlindIndex, Deriver, Scheme};

#[derive(Parser, Debug)]
#[command(name = "blindex")]
struct Cli {
    /// Index scheme: "v1" (partial Latin accent fold, default) or
    /// "v2" (full transliteration to ASCII)
    #[arg(long, global = true, default_value = "v1")]
    scheme: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the canonical form of each term
    Canon(TermsArgs),
    /// Derive one blind-index token per term
    Derive(TermsArgs),
    /// Build a deduplicated blind-index list from many terms
    List(ListArgs),
    /// Validate pre-built tokens (marker + 64 lowercase hex characters)
    Check(TermsArgs),
}

#[derive(Args, Debug)]
struct TermsArgs {
    #[arg(value_name = "TERM", required = true)]
    terms: Vec<String>,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Read a JSON array of strings from stdin and emit a JSON array of
    /// tokens (the shape request handlers pass to the query layer)
    #[arg(long)]
    json: bool,

    #[arg(value_name = "TERM")]
    terms: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let scheme = Scheme::from_tag(&cli.scheme)?;
    let deriver = Deriver::new(scheme);

    match cli.command {
        Command::Canon(args) => {
            for term in &args.terms {
                println!("{}", canon(scheme, term));
            }
        }
        Command::Derive(args) => {
            for term in &args.terms {
                println!("{}", deriver.derive(term));
            }
        }
        Command::List(args) => handle_list(&deriver, args)?,
        Command::Check(args) => {
            for token in &args.terms {
                BlindIndex::parse(token)?;
            }
            println!("ok");
        }
    }

    Ok(())
}

fn handle_list(deriver: &Deriver, args: ListArgs) -> Result<()> {
    if args.json {
        if !args.terms.is_empty() {
            bail!("--json reads terms from stdin; drop the positional terms");
        }
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("failed to read terms from stdin")?;
        let value: serde_json::Value =
            serde_json::from_str(&input).context("stdin is not valid JSON")?;
        let terms = terms_from_json(&value)?;
        let list = deriver.derive_list(&terms);
        println!("{}", serde_json::to_string(&list)?);
    } else {
        for bi in deriver.derive_list(&args.terms) {
            println!("{}", bi);
        }
    }
    Ok(())
}
