use clap::Args;

use crate::cli::OutputFormat;
use crate::core::naming::{convert, ChromNaming};

#[derive(Args)]
pub struct ChromArgs {
    /// Chromosome names to convert
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Naming convention of the given names (ucsc or ensembl)
    #[arg(long, default_value = "ensembl")]
    pub from: ChromNaming,

    /// Naming convention to convert to (ucsc or ensembl)
    #[arg(long, default_value = "ucsc")]
    pub to: ChromNaming,
}

/// Execute chrom subcommand
///
/// # Errors
///
/// Returns an error if any name is not known under the source convention or
/// the conversion direction is unsupported.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ChromArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let converted = args
        .names
        .iter()
        .map(|name| convert(name, args.from, args.to).map(|c| (name.as_str(), c)))
        .collect::<Result<Vec<_>, _>>()?;

    if verbose {
        eprintln!(
            "Converted {} names from {} to {}",
            converted.len(),
            args.from,
            args.to
        );
    }

    match format {
        OutputFormat::Text => {
            for (_, to) in &converted {
                println!("{to}");
            }
        }
        OutputFormat::Tsv => {
            println!("{}\t{}", args.from, args.to);
            for (from, to) in &converted {
                println!("{from}\t{to}");
            }
        }
        OutputFormat::Json => {
            let pairs: Vec<serde_json::Map<String, serde_json::Value>> = converted
                .iter()
                .map(|&(from, to)| {
                    let mut pair = serde_json::Map::new();
                    pair.insert(args.from.to_string(), from.into());
                    pair.insert(args.to.to_string(), to.into());
                    pair
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&pairs)?);
        }
    }

    Ok(())
}
