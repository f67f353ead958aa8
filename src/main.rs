use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use formlogic_rs::forms::lint::lint;
use formlogic_rs::forms::{
    EngineConfig, FormEngine, FormSession, FormTemplate, SubmitOutcome, TemplateError,
    TemplateLoader,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the visible fields for a set of values
    Visible {
        /// Path to the form template (.json, .yaml, .yml)
        #[arg(short, long)]
        template: PathBuf,

        /// Path to the value map
        #[arg(short, long)]
        values: PathBuf,

        /// Evaluate the template even if it is not active
        #[arg(long)]
        allow_inactive: bool,
    },
    /// Resolve visibility and validate a set of values
    Validate {
        /// Path to the form template (.json, .yaml, .yml)
        #[arg(short, long)]
        template: PathBuf,

        /// Path to the value map
        #[arg(short, long)]
        values: PathBuf,

        /// Evaluate the template even if it is not active
        #[arg(long)]
        allow_inactive: bool,
    },
    /// Report authoring problems in a template
    Lint {
        /// Path to the form template (.json, .yaml, .yml)
        #[arg(short, long)]
        template: PathBuf,
    },
    /// Print the JSON Schema of the template format
    Schema,
    /// Replay a list of edits through a debounced session, then submit
    Replay {
        /// Path to the form template (.json, .yaml, .yml)
        #[arg(short, long)]
        template: PathBuf,

        /// JSON list of {"field", "value", "delay_ms"} edits
        #[arg(short, long)]
        events: PathBuf,

        /// Debounce delay in milliseconds (overrides FORMLOGIC_DEBOUNCE_MS)
        #[arg(long)]
        debounce_ms: Option<String>,

        /// Evaluate the template even if it is not active
        #[arg(long)]
        allow_inactive: bool,
    },
}

/// One recorded user edit
#[derive(Debug, Deserialize)]
struct EditEvent {
    field: String,
    /// Missing or null clears the field
    #[serde(default)]
    value: Option<Value>,
    /// Pause before applying this edit
    #[serde(default)]
    delay_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let loader = TemplateLoader::new();

    match args.command {
        Commands::Visible {
            template,
            values,
            allow_inactive,
        } => {
            let engine = FormEngine::new(load_template(&loader, &template, allow_inactive)?);
            let values = loader
                .load_values(&values)
                .with_context(|| format!("Failed to load values from {}", values.display()))?;

            let visible = engine.visible_fields(&values);
            for name in visible.in_template_order(&engine.template().fields) {
                println!("{}", name);
            }
        }
        Commands::Validate {
            template,
            values,
            allow_inactive,
        } => {
            let engine = FormEngine::new(load_template(&loader, &template, allow_inactive)?);
            let values = loader
                .load_values(&values)
                .with_context(|| format!("Failed to load values from {}", values.display()))?;

            let result = engine.evaluate(&values);
            let report = json!({
                "visible": result.visible.in_template_order(&engine.template().fields),
                "errors": result.errors,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Lint { template } => {
            let template = load_template(&loader, &template, true)?;
            let diagnostics = lint(&template);
            if diagnostics.is_empty() {
                println!("No problems found in '{}'", template.slug);
            }
            for diagnostic in &diagnostics {
                println!("{}", diagnostic);
            }
        }
        Commands::Schema => {
            let schema = schemars::schema_for!(FormTemplate);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        Commands::Replay {
            template,
            events,
            debounce_ms,
            allow_inactive,
        } => {
            let mut config = EngineConfig::from_env()?;
            if let Some(raw) = debounce_ms {
                config = config.with_debounce_ms(&raw)?;
            }
            log::info!("Replaying with debounce of {:?}", config.debounce);

            let engine = FormEngine::new(load_template(&loader, &template, allow_inactive)?);
            let content = std::fs::read_to_string(&events)
                .with_context(|| format!("Failed to read events from {}", events.display()))?;
            let edits: Vec<EditEvent> = serde_json::from_str(&content)?;

            let mut session = FormSession::new(engine, &config);
            for edit in edits {
                if edit.delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(edit.delay_ms)).await;
                }
                match edit.value {
                    Some(value) => session.set_value(&edit.field, value),
                    None => session.clear_value(&edit.field),
                }
            }

            let outcome = session.submit();
            let fields = &session.engine().template().fields;
            let report = match outcome {
                SubmitOutcome::Accepted(data) => json!({
                    "status": "accepted",
                    "evaluations": session.evaluations(),
                    "visible": session.visible().in_template_order(fields),
                    "data": data,
                }),
                SubmitOutcome::Rejected(errors) => json!({
                    "status": "rejected",
                    "evaluations": session.evaluations(),
                    "visible": session.visible().in_template_order(fields),
                    "errors": errors,
                }),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn load_template(
    loader: &TemplateLoader,
    path: &Path,
    allow_inactive: bool,
) -> anyhow::Result<FormTemplate> {
    let template = loader
        .load_template(path)
        .with_context(|| format!("Failed to load template from {}", path.display()))?;

    if !template.is_active && !allow_inactive {
        bail!(TemplateError::Inactive(template.slug));
    }
    Ok(template)
}
