// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Five subcommands:
//   serve       — REST API on a local port
//   form        — interactive terminal form
//   predict     — one prediction from a JSON object, printed as JSON
//   init-model  — write an untrained model directory for the schema
//   schema      — print the feature schema as JSON
//
// Every command that predicts takes --model-dir; the model is
// loaded once before any input is read.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::api::ServeConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve predictions over HTTP
    Serve(ServeArgs),

    /// Fill in the census fields interactively and see the prediction
    Form(FormArgs),

    /// Predict once from a JSON object of field values
    Predict(PredictArgs),

    /// Write a model directory with untrained weights
    InitModel(InitModelArgs),

    /// Print the feature schema
    Schema,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8000")]
    pub addr: SocketAddr,

    /// Directory holding pipeline.json and the model weights
    #[arg(long, default_value = "model")]
    pub model_dir: String,
}

/// The HTTP layer never sees clap types.
impl From<ServeArgs> for ServeConfig {
    fn from(a: ServeArgs) -> Self {
        ServeConfig {
            addr:      a.addr,
            model_dir: a.model_dir,
        }
    }
}

#[derive(Args, Debug)]
pub struct FormArgs {
    /// Directory holding pipeline.json and the model weights
    #[arg(long, default_value = "model")]
    pub model_dir: String,
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Directory holding pipeline.json and the model weights
    #[arg(long, default_value = "model")]
    pub model_dir: String,

    /// JSON object of field values, e.g. '{"age": 39, ...}'
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub input: Option<String>,

    /// File containing the JSON object
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct InitModelArgs {
    /// Directory to write the model into
    #[arg(long, default_value = "model")]
    pub model_dir: String,

    /// Width of the hidden layer
    #[arg(long, default_value_t = 16)]
    pub hidden_dim: usize,
}
