// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap, loads the model once, and hands each request to the
// PredictUseCase (Layer 2). No validation or inference happens
// here.
//
//   serve    → tokio runtime + axum router  (api module)
//   form     → terminal questionnaire       (form module)
//   predict  → one JSON object in, one JSON response out

pub mod commands;
pub mod form;

use std::{fs, io, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::{Map, Value};

use commands::{Commands, FormArgs, InitModelArgs, PredictArgs, ServeArgs};

use crate::api::{self, handlers::PredictResponse, ServeConfig};
use crate::application::predict_use_case::PredictUseCase;
use crate::domain::FeatureSchema;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::inferencer::{self, Inferencer};

#[derive(Parser, Debug)]
#[command(
    name = "census-income",
    version,
    about = "Predict whether income exceeds $50K/yr from 1994 census attributes."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Serve(args)     => run_serve(args),
            Commands::Form(args)      => run_form(args),
            Commands::Predict(args)   => run_predict(args),
            Commands::InitModel(args) => run_init_model(args),
            Commands::Schema          => run_schema(),
        }
    }
}

/// Load the model directory and wrap it in the service object.
/// Any failure here is fatal for the command.
fn load_use_case(model_dir: &str) -> Result<PredictUseCase> {
    let schema = FeatureSchema::census();
    let ckpt   = CheckpointManager::new(model_dir);

    let inferencer = Inferencer::from_checkpoint(&ckpt, &schema)
        .with_context(|| format!("Cannot load model from '{model_dir}'"))?;

    Ok(PredictUseCase::new(schema, Arc::new(inferencer)))
}

fn run_serve(args: ServeArgs) -> Result<()> {
    let config: ServeConfig = args.into();
    let use_case = load_use_case(&config.model_dir)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Cannot start the async runtime")?;

    runtime.block_on(api::serve(config.addr, Arc::new(use_case)))
}

fn run_form(args: FormArgs) -> Result<()> {
    let use_case = load_use_case(&args.model_dir)?;

    let values = form::IncomeForm::new(use_case.schema(), io::stdin().lock(), io::stdout().lock())
        .collect()?;
    let result = use_case.execute(&values)?;

    form::render(&mut io::stdout(), &result)?;
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    let use_case = load_use_case(&args.model_dir)?;
    let input    = read_predict_input(&args)?;

    let result   = use_case.execute(&input)?;
    let response = PredictResponse { prediction: vec![result.label] };

    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

/// The JSON object given by --input or --file.
fn read_predict_input(args: &PredictArgs) -> Result<Map<String, Value>> {
    let text = match (&args.input, &args.file) {
        (Some(json), _) => json.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?,
        (None, None) => bail!("one of --input or --file is required"),
    };

    match serde_json::from_str(&text).context("Input is not valid JSON")? {
        Value::Object(fields) => Ok(fields),
        _ => bail!("Input must be a JSON object of field values"),
    }
}

fn run_init_model(args: InitModelArgs) -> Result<()> {
    let ckpt = CheckpointManager::new(&args.model_dir);
    inferencer::init_untrained(&ckpt, &FeatureSchema::census(), args.hidden_dim)?;

    tracing::warn!("Weights in '{}' are untrained; predictions are arbitrary", args.model_dir);
    println!("Model written to '{}'", args.model_dir);
    Ok(())
}

fn run_schema() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&FeatureSchema::census())?);
    Ok(())
}
