// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! `rendrs-compose`: submit one render request and describe the preview.

use clap::Parser;
use rendrs::composer::blob::BlobStore;
use rendrs::composer::client::ComposerClient;
use rendrs::composer::form::RenderForm;
use rendrs::composer::preview::Preview;
use rendrs::composer::session::{Composer, SubmitOutcome};
use rendrs::domain::models::render_option::RenderOption;
use rendrs::utils::telemetry;
use std::path::PathBuf;
use std::process::ExitCode;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "rendrs-compose", version, about = "Submit a browser rendering request", long_about = None)]
struct Cli {
    /// Render endpoint of a running rendrs server
    #[arg(long, env = "RENDRS_ENDPOINT", default_value = "http://127.0.0.1:3000/api/render")]
    endpoint: Url,

    /// Rendering option, e.g. /markdown
    #[arg(long, default_value = "/content")]
    option: String,

    /// Target page
    #[arg(long, default_value = "")]
    url: String,

    /// Prompt for /json extraction
    #[arg(long, default_value = "")]
    prompt: String,

    /// Directory for screenshot and PDF results
    #[arg(long, default_value_os_t = std::env::temp_dir().join("rendrs"))]
    out_dir: PathBuf,

    /// List the available options and exit
    #[arg(long)]
    list_options: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    telemetry::init_telemetry();
    let cli = Cli::parse();

    if cli.list_options {
        for option in RenderOption::ALL {
            println!("{:<12} {}", option.as_str(), option.description());
        }
        return ExitCode::SUCCESS;
    }

    let mut composer = Composer::new(
        ComposerClient::new(cli.endpoint),
        BlobStore::new(cli.out_dir),
    );
    let form = RenderForm::new(cli.option, cli.url, cli.prompt);

    match composer.submit(&form).await {
        SubmitOutcome::Previewed(preview) => {
            print_preview(&preview);
            ExitCode::SUCCESS
        }
        SubmitOutcome::Invalid(errors) => {
            for (field, message) in &errors.0 {
                eprintln!("{}: {}", field, message);
            }
            ExitCode::from(2)
        }
        SubmitOutcome::Failed(notification) => {
            eprintln!("{}", notification.message);
            ExitCode::FAILURE
        }
    }
}

fn print_preview(preview: &Preview) {
    match preview {
        Preview::LivePage { src } => println!("live preview: {}", src),
        Preview::DocumentFrame { src } => println!("document: {}", src),
        Preview::CodeViewer {
            language,
            filename,
            text,
        } => {
            println!("--- {} ({}) ---", filename, language.hint());
            println!("{}", text);
        }
    }
}
