//! Schema command - describe the available data sources.

use anyhow::Result;
use clap::Args;
use covgate_provider::{DataSource, ProviderError, SourceRegistry};

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the schema command.
#[derive(Args, Default)]
pub struct SchemaArgs {
    /// Data source to describe; all sources when omitted.
    #[arg(long, short)]
    pub source: Option<String>,
}

/// Runs the schema command.
pub fn run(args: &SchemaArgs, cli: &Cli) -> Result<()> {
    let sources: Vec<&'static dyn DataSource> = match &args.source {
        Some(name) => vec![SourceRegistry::get(name)
            .ok_or_else(|| ProviderError::UnknownSource(name.clone()))?],
        None => SourceRegistry::all().iter().map(|s| s.as_ref()).collect(),
    };

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);

            let mut first = true;
            for source in sources {
                if !first {
                    println!(); // Blank line between sources
                }
                first = false;
                println!("{}", formatter.format_schema(source.schema()));
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            let schemas: Vec<_> = sources.iter().map(|s| s.schema()).collect();
            if schemas.len() == 1 {
                println!("{}", formatter.format(schemas[0])?);
            } else {
                println!("{}", formatter.format(&schemas)?);
            }
        }
    }

    Ok(())
}
