use osteo_predict::pipeline::orchestration::probability_breakdown;
use osteo_predict::pipeline::DIAGNOSTIC_CLASSES;
use osteo_predict::{AppError, Configuration, PredictionOrchestrator, PresentationSnapshot};
use tracing::{info, warn, Level};

fn init_logging(level: Level) {
    tracing_subscriber::fmt().with_max_level(level).init();
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let configuration = Configuration::load()?;
    init_logging(configuration.log_level());

    let mut orchestrator = PredictionOrchestrator::builder(configuration).build()?;
    // A rejected path already carries its message in the snapshot.
    let selected = match std::env::args().nth(1) {
        Some(path) => orchestrator.select_path(path).await.is_ok(),
        None => {
            warn!("No image path given");
            true
        }
    };

    let snapshot = if selected {
        orchestrator.submit().await
    } else {
        orchestrator.snapshot()
    };
    report(&snapshot);
    Ok(())
}

fn report(snapshot: &PresentationSnapshot) {
    info!("{}", snapshot.message);
    for prediction in &snapshot.predictions {
        let breakdown = probability_breakdown(prediction, &DIAGNOSTIC_CLASSES)
            .iter()
            .map(|(label, value)| format!("{}: {}", label, value))
            .collect::<Vec<_>>()
            .join(", ");
        info!(
            "{} | {} | winning class: {}",
            prediction.model, breakdown, prediction.winning_class
        );
    }
    if let Some(ensemble) = &snapshot.ensemble {
        info!(
            "Ensemble weights | {} | {} | {} | {}",
            ensemble.model, ensemble.predicted_class, ensemble.probabilities, ensemble.winning_class
        );
    }
}
