use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use alembic_nnue::{HalfKav2Variants, NetworkHeader};
use alembic_variant::{FinalVariant, VariantMap};
use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{info, warn};

/// Load variant definitions and report their feature layouts.
#[derive(Parser, Debug)]
struct Cli {
    /// INI-style variants file loaded after the built-in templates.
    #[arg(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    variants: Option<PathBuf>,

    /// Only report configuration problems; do not keep the parsed variants.
    #[arg(long)]
    check: bool,

    /// Evaluation file whose header is verified against the selected variant.
    #[arg(long = "eval-file", value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    eval_file: Option<PathBuf>,

    /// Hidden size of the feature transformer in the evaluation file.
    #[arg(long, default_value = "1024")]
    hidden: u32,

    /// Variant to report; all registered variants when omitted.
    variant: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Cli::parse();

    let mut variants = VariantMap::with_builtins();
    if let Some(path) = &args.variants {
        let diagnostics = variants
            .parse_file(path, args.check)
            .with_context(|| format!("reading {}", path.display()))?;
        if args.check {
            info!(problems = diagnostics.len(), "checked {}", path.display());
            return Ok(());
        }
    }

    let selected: Vec<(&str, &FinalVariant)> = match &args.variant {
        Some(name) => match variants.get(name) {
            Some(v) => vec![(name.as_str(), &**v)],
            None => bail!("unknown variant '{name}'"),
        },
        None => variants.iter().map(|(name, v)| (name, &**v)).collect(),
    };

    for (name, v) in &selected {
        report(name, v);
    }

    if let Some(path) = &args.eval_file {
        let [(name, v)] = selected.as_slice() else {
            bail!("--eval-file needs a single variant");
        };
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let header = NetworkHeader::read(&mut BufReader::new(file))?;
        match header.verify(v.layout(), args.hidden) {
            Ok(()) => info!(variant = name, description = %header.description, "evaluation file matches"),
            Err(e) => {
                warn!(variant = name, "{e}");
                return Err(e.into());
            }
        }
    }

    Ok(())
}

fn report(name: &str, v: &FinalVariant) {
    let layout = v.layout();
    info!(
        variant = name,
        anchor = layout.nnue_king().map_or("none", |pt| pt.name()),
        king_squares = layout.king_squares(),
        piece_indices = layout.piece_indices(),
        dimensions = HalfKav2Variants::dimensions(layout),
        hash = %format!("{:#010x}", HalfKav2Variants::hash_value(layout)),
        max_pieces = layout.max_pieces(),
        "feature layout"
    );
}
