use std::env;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use log::{debug, info, warn};

use rs_textgen_core::{
    generate, prepare_file, Checkpoint, GenerationConfig, NGramPredictor, StartSeed, TextGenError,
};

/// Generate text one character at a time from a trained checkpoint.
#[derive(Parser, Debug)]
#[command(name = "textgen")]
struct Args {
    /// Model checkpoint to load
    checkpoint: PathBuf,
    /// Plain-text corpus used for the vocabulary and the seed window
    data_file: PathBuf,
    /// Number of characters to generate
    output_length: usize,
    /// Window length, must match the one the checkpoint was fitted with
    #[arg(long, default_value_t = rs_textgen_core::config::DEFAULT_SEQ_LEN)]
    seq_len: usize,
    /// Longest context of the reference model (only used with --fit)
    #[arg(long)]
    order: Option<usize>,
    /// Seed for the random choice of the starting window
    #[arg(long, conflicts_with_all = ["seed_index", "seed_text"])]
    seed: Option<u64>,
    /// Start from the corpus window at this position
    #[arg(long, conflicts_with = "seed_text")]
    seed_index: Option<usize>,
    /// Start from the last seq_len characters of this text
    #[arg(long)]
    seed_text: Option<String>,
    /// Fit the reference model on the data file if the checkpoint does not exist
    #[arg(long)]
    fit: bool,
}

impl Args {
    fn config(&self) -> Result<GenerationConfig, TextGenError> {
        let mut config = GenerationConfig::default();
        config.set_seq_len(self.seq_len)?;
        if let Some(order) = self.order {
            config.set_order(order)?;
        }
        config.length = self.output_length;
        config.start_seed = match (&self.seed_text, self.seed_index) {
            (Some(text), _) => StartSeed::Custom(text.clone()),
            (None, Some(index)) => StartSeed::Index(index),
            (None, None) => StartSeed::Random(self.seed),
        };
        Ok(config)
    }

    /// `--order` only shapes a model fitted by this run.
    fn order_is_ignored(&self) -> bool {
        self.order.is_some() && !self.fit
    }
}

/// Missing positionals are reported as `MissingArgument`; every other
/// parse error (and `--help`) is handled by clap directly.
fn parse_args<I>(argv: I) -> Result<Args, TextGenError>
where
    I: IntoIterator<Item = String>,
{
    match Args::try_parse_from(argv) {
        Ok(args) => Ok(args),
        Err(e) if e.kind() == ErrorKind::MissingRequiredArgument => {
            Err(TextGenError::MissingArgument(e.to_string()))
        }
        Err(e) => e.exit(),
    }
}

fn run(args: &Args) -> Result<(), TextGenError> {
    let config = args.config()?;
    if args.order_is_ignored() {
        warn!("--order only applies when fitting, pass --fit to use it");
    }

    // Load the data file for statistics and seeding
    let (vocabulary, corpus) = prepare_file(&args.data_file, config.seq_len())?;

    let model = if args.fit {
        NGramPredictor::load_or_fit(&args.checkpoint, corpus.codes(), vocabulary.len(), config.order())?
    } else {
        NGramPredictor::load(&args.checkpoint)?
    };
    info!("model expects a vocabulary of {}, corpus has {}", model.vocab_size(), vocabulary.len());

    let seed = config.start_seed.select(&corpus, &vocabulary)?;
    println!("{}", vocabulary.decode(&seed.to_vec())?);

    let result = generate(&model, seed, vocabulary.len(), &vocabulary, config.length)?;
    println!("{}", result);

    Ok(())
}

/// Parses `argv` and runs the generation.
///
/// Fewer than three positional arguments prints the usage and succeeds.
fn run_from<I>(argv: I) -> Result<(), TextGenError>
where
    I: IntoIterator<Item = String>,
{
    let argv: Vec<String> = argv.into_iter().collect();
    println!("{:?}", argv);

    let args = match parse_args(argv) {
        Ok(args) => args,
        Err(TextGenError::MissingArgument(message)) => {
            // Not enough arguments is not a failure: print the usage and stop.
            debug!("{message}");
            println!("{}", Args::command().render_usage());
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    run(&args)
}

fn main() -> Result<(), TextGenError> {
    env_logger::init();
    run_from(env::args())
}
