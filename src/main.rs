//! `foldshift` command-line front end.

use std::cell::RefCell;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use clap::{Parser, Subcommand};
use foldshift::compare::{
    compute_displacement, ComparisonReport, DisplacementSummary,
};
use foldshift::mutation::Mutation;
use foldshift::options::Options;
use foldshift::render::{
    AssetCompletion, ComparisonInput, ComparisonView, EngineAsset,
    HeadlessEngine, HeadlessSurface,
};
use foldshift::services::{
    clean_sequence, AlphaFoldClient, EsmFoldClient, FoldingService,
    StructureSource,
};
use foldshift::structure::parse_structure;
use foldshift::FoldshiftError;

#[derive(Parser)]
#[command(name = "foldshift")]
#[command(about = "Compare wild-type and mutant protein structures", long_about = None)]
struct Cli {
    /// Options TOML file (missing fields use defaults)
    #[arg(short, long, global = true, value_name = "TOML")]
    options: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a comparison report as JSON
    Compare {
        /// Mutation, e.g. "TP53 R175H"
        #[arg(short, long)]
        mutation: String,
        /// Wild-type PDB file
        #[arg(short, long)]
        wild: PathBuf,
        /// Mutant PDB file; omit for a wild-type-only report
        #[arg(short = 't', long)]
        mutant: Option<PathBuf>,
        /// Print a one-paragraph summary instead of JSON
        #[arg(long)]
        text: bool,
    },
    /// Run a rendering cycle on the headless engine and print the scene
    Render {
        /// Mutation, e.g. "TP53 R175H"
        #[arg(short, long)]
        mutation: String,
        /// Wild-type PDB file
        #[arg(short, long)]
        wild: PathBuf,
        /// Mutant PDB file; omit for a single view
        #[arg(short = 't', long)]
        mutant: Option<PathBuf>,
    },
    /// Download an AlphaFold DB model by UniProt accession
    Fetch {
        /// UniProt accession, e.g. P04637
        accession: String,
        /// Output file (stdout if omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Predict a structure with ESMFold
    Fold {
        /// Sequence file (plain or FASTA)
        sequence: PathBuf,
        /// Apply this mutation to the sequence before folding
        #[arg(short, long)]
        mutation: Option<String>,
        /// Output file (stdout if omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn read(path: &Path) -> Result<String, FoldshiftError> {
    std::fs::read_to_string(path).map_err(|e| {
        FoldshiftError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {e}", path.display()),
        ))
    })
}

fn emit(text: &str, out: Option<&Path>) -> Result<(), FoldshiftError> {
    if let Some(path) = out {
        std::fs::write(path, text)?;
        log::info!("Wrote {}", path.display());
        return Ok(());
    }
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        writeln!(stdout)?;
    }
    Ok(())
}

fn to_json(value: &impl serde::Serialize) -> Result<String, FoldshiftError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| FoldshiftError::InvalidInput(e.to_string()))
}

fn compare(
    options: &Options,
    mutation: &Mutation,
    wild: &Path,
    mutant: Option<&Path>,
    text: bool,
) -> Result<(), FoldshiftError> {
    let wild = parse_structure(&read(wild)?);
    let site = mutation.residue();
    let displacement = match mutant {
        Some(path) => {
            let mutant = parse_structure(&read(path)?);
            let map = compute_displacement(&wild.coordinates, &mutant.coordinates);
            Some(DisplacementSummary::new(
                &map,
                &wild.coordinates,
                site,
                options.comparison.neighborhood_radius,
            ))
        }
        None => None,
    };
    let report = ComparisonReport::new(
        mutation.to_string(),
        site,
        &wild.coordinates,
        &wild.confidence,
        displacement,
    );
    if text {
        emit(&report.describe(), None)
    } else {
        emit(&to_json(&report)?, None)
    }
}

fn render(
    options: &Options,
    mutation: &Mutation,
    wild: &Path,
    mutant: Option<&Path>,
) -> Result<(), FoldshiftError> {
    let engine = Rc::new(RefCell::new(HeadlessEngine::new()));
    let surface = Rc::new(RefCell::new(HeadlessSurface::new()));
    let asset = EngineAsset::session();
    let engine_for_fetch = Rc::clone(&engine);
    let fetch = Rc::new(move |completion: AssetCompletion| {
        completion.resolve(engine_for_fetch.clone());
    });
    let mut view =
        ComparisonView::new(surface.clone(), asset, fetch, options)?;

    let wild = read(wild)?;
    let input = match mutant {
        Some(path) => ComparisonInput::dual(
            wild,
            read(path)?,
            mutation.residue(),
            mutation.original,
            mutation.substituted,
        ),
        None => ComparisonInput::single(
            wild,
            mutation.residue(),
            mutation.original,
            mutation.substituted,
        ),
    };
    let _ = view.update(input)?;
    log::info!("Cycle {:?} reached {:?}", view.cycle_id(), view.state());

    let violations = engine.borrow().violations();
    for violation in &violations {
        log::warn!("{violation}");
    }
    let snapshot = serde_json::json!({
        "state": format!("{:?}", view.state()),
        "panes": surface.borrow().live_panes(),
        "viewers": engine.borrow().snapshot(),
        "violations": violations,
    });
    emit(&to_json(&snapshot)?, None)
}

fn fold(
    options: &Options,
    sequence: &Path,
    mutation: Option<&str>,
    out: Option<&Path>,
) -> Result<(), FoldshiftError> {
    let mut sequence = clean_sequence(&read(sequence)?)?;
    if let Some(mutation) = mutation {
        let mutation: Mutation = mutation.parse()?;
        sequence = mutation.apply(&sequence)?;
        log::info!("Applied {mutation}");
    }
    let client = EsmFoldClient::new(&options.services);
    emit(&client.fold(&sequence)?, out)
}

fn run(cli: Cli) -> Result<(), FoldshiftError> {
    let options = match &cli.options {
        Some(path) => Options::load(path)?,
        None => Options::default(),
    };

    match cli.command {
        Command::Compare {
            mutation,
            wild,
            mutant,
            text,
        } => compare(
            &options,
            &mutation.parse()?,
            &wild,
            mutant.as_deref(),
            text,
        ),
        Command::Render {
            mutation,
            wild,
            mutant,
        } => render(&options, &mutation.parse()?, &wild, mutant.as_deref()),
        Command::Fetch { accession, out } => {
            let client = AlphaFoldClient::new(&options.services);
            emit(&client.fetch_structure(&accession)?, out.as_deref())
        }
        Command::Fold {
            sequence,
            mutation,
            out,
        } => fold(&options, &sequence, mutation.as_deref(), out.as_deref()),
    }
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
