use std::{env, io, process};

use acceptance_engine::{
    EngineConfig, ModelManager, SubScores,
    storage::{BlobStore, FileStore},
};
use log::{info, warn};
use machine_learning::arch::Network;
use serde_json::json;

const USAGE: &str = "usage: acceptance_engine <predict SKILLS EXPERIENCE LOCATION SALARY | retrain | state>";

#[tokio::main]
async fn main() -> io::Result<()> {
    env_logger::init();

    let config = EngineConfig::from_env().map_err(io::Error::other)?;
    info!(dir:? = config.model_dir, key:% = config.model_key; "using model store");

    let store = FileStore::new(&config.model_dir);
    let args: Vec<String> = env::args().skip(1).collect();

    let output = match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["predict", scores @ ..] if scores.len() == 4 => {
            let scores = parse_scores(scores)?;
            let manager = ModelManager::new(store, config);
            let prediction = manager.predict(scores).await.map_err(io::Error::other)?;
            serde_json::to_value(prediction)?
        }
        ["retrain"] => {
            let manager = ModelManager::new(store, config);
            let report = manager.retrain().await.map_err(io::Error::other)?;

            if let Some(e) = &report.persist_error {
                warn!(error:% = e; "retrained model wasn't persisted");
            }

            json!({
                "stats": report.stats,
                "persisted": report.persist_error.is_none(),
            })
        }
        ["state"] => {
            let stored = match store.read(&config.model_key) {
                Ok(bytes) => match Network::from_bytes(&bytes) {
                    Ok(_) => "valid",
                    Err(e) => {
                        warn!(error:% = e; "persisted model is unusable");
                        "corrupt"
                    }
                },
                Err(_) => "missing",
            };

            json!({
                "model_key": config.model_key,
                "model_dir": config.model_dir,
                "stored": stored,
            })
        }
        _ => {
            eprintln!("{USAGE}");
            process::exit(2);
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn parse_scores(raw: &[&str]) -> io::Result<SubScores> {
    let mut values = [0.; 4];

    for (value, raw) in values.iter_mut().zip(raw) {
        *value = raw.parse().map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("bad score {raw:?}: {e}"))
        })?;
    }

    let [skills, experience, location, salary] = values;
    Ok(SubScores::new(skills, experience, location, salary))
}
