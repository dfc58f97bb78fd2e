mod chat;
mod config;
mod corpus;
mod embeddings;
mod logging;
mod providers;
mod retrieval;

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::Context;

use crate::chat::{AnswerLanguage, Assistant};
use crate::embeddings::SentenceEncoder;
use crate::providers::{Availability, GeminiClient, GoogleTranslator};
use crate::retrieval::Retriever;

fn main() {
    if let Err(e) = real_main() {
        // Keep stderr noisy for bug reports; logs also go to file.
        eprintln!("[AgriGPT] fatal error: {e:?}");
        log::error!("Fatal error: {:?}", e);
        std::process::exit(1);
    }
}

fn real_main() -> anyhow::Result<()> {
    logging::init_logging()?;

    let args: Vec<String> = std::env::args().collect();

    // The key is required up front; nothing works without the model backend.
    let api_key = std::env::var("GEMINI_API_KEY")
        .ok()
        .filter(|k| !k.is_empty())
        .context("GEMINI_API_KEY is not set")?;

    let language = match read_arg_value(&args, "--lang") {
        Some(code) if code == "auto" => AnswerLanguage::Detect,
        Some(code) => AnswerLanguage::Fixed(code),
        None => AnswerLanguage::Fixed(config::chat::DEFAULT_LANGUAGE.to_string()),
    };

    let facts = match read_arg_value(&args, "--corpus") {
        Some(path) => corpus::load_corpus_file(Path::new(&path))?,
        None => corpus::default_facts(),
    };

    let model_dir = embeddings::download::ensure_model_files()?;
    let encoder = SentenceEncoder::load(&model_dir)?;

    let mut retriever = Retriever::new(Box::new(encoder));
    retriever.initialize(&facts)?;
    log::info!("Knowledge base ready: {} entries", retriever.corpus_len());

    let mut assistant = Assistant::new(
        retriever,
        Box::new(GeminiClient::new(api_key)),
        Box::new(GoogleTranslator),
        language,
    );
    assistant.set_conditions(startup_conditions());
    if let Some(persona) = read_arg_value(&args, "--persona") {
        assistant.set_persona(persona);
    }

    println!("AgriGPT — ask anything about agriculture, farming, or crop management.");
    println!("Type 'exit' to quit.");

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut stdout = std::io::stdout();

    loop {
        print!("you> ");
        stdout.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            // EOF: the terminal or pipe closed.
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
            break;
        }

        log::info!("Question: {question}");
        match assistant.answer(question) {
            Ok(answer) => println!("\n{answer}\n"),
            Err(e) => {
                log::error!("answer failed: {:?}", e);
                eprintln!("[AgriGPT] could not answer: {e}");
            }
        }
    }

    log::info!("AgriGPT session ended after {} turns", assistant.session().len());
    Ok(())
}

/// Startup enrichment: location, then weather for that location. Either can
/// be unavailable; the prompt block simply shrinks.
fn startup_conditions() -> String {
    let Some(location) = providers::geo::lookup_location().available() else {
        log::info!("location unavailable, prompts will carry no field conditions");
        return String::new();
    };

    let mut block = format!("Location: {}", location.describe());
    match providers::weather::fetch_weather(location.lat, location.lon) {
        Availability::Available(report) => {
            block.push('\n');
            block.push_str(&report.summary());
        }
        Availability::Unavailable => {
            log::info!("weather unavailable, conditions block carries location only");
        }
    }
    block
}

/// Value following a `--flag` argument, if present.
fn read_arg_value(args: &[String], name: &str) -> Option<String> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
