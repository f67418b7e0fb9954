// crates/alertcli/src/main.rs

use alertcore::{
    Edge, EmailTemplate, ExecutePayload, ExecutionEvent, Node, NodeKind, NodeMetadata,
    WorkflowDefinition, CONDITION_MET_LABEL, CONDITION_NOT_MET_LABEL,
};
use alertnodes::{default_registry, OpenMeteoConfig, DEFAULT_GEOCODING_URL};
use alertruntime::{FlowRuntime, RuntimeConfig, WorkflowGraph};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "alertflow")]
#[command(about = "Weather alert workflow engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a workflow file
    Run {
        /// Path to workflow JSON file
        #[arg(short, long)]
        workflow: PathBuf,

        /// Execution payload: a JSON file path or an inline JSON object
        #[arg(short, long)]
        payload: String,

        /// Show per-node progress and debug logs
        #[arg(short, long)]
        verbose: bool,

        /// Pretty-print the execution result
        #[arg(long)]
        pretty: bool,

        #[command(flatten)]
        service: ServiceArgs,
    },

    /// Check a workflow file's structure without running it
    Validate {
        /// Path to workflow JSON file
        file: PathBuf,
    },

    /// List available node types
    Nodes,

    /// Write the example weather alert workflow
    Init {
        /// Output file path
        #[arg(short, long, default_value = "workflow.json")]
        output: PathBuf,
    },
}

#[derive(Args)]
struct ServiceArgs {
    /// Geocoding search endpoint
    #[arg(long, env = "ALERTFLOW_GEOCODING_URL", default_value = DEFAULT_GEOCODING_URL)]
    geocoding_url: String,

    /// Timeout for each external request, in seconds (default: none)
    #[arg(long, env = "ALERTFLOW_HTTP_TIMEOUT")]
    timeout_secs: Option<u64>,
}

impl ServiceArgs {
    fn config(&self) -> OpenMeteoConfig {
        OpenMeteoConfig {
            geocoding_url: self.geocoding_url.clone(),
            timeout: self.timeout_secs.map(Duration::from_secs),
            ..OpenMeteoConfig::default()
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            workflow,
            payload,
            verbose,
            pretty,
            service,
        } => {
            init_logging(verbose);
            run_workflow(&workflow, &payload, verbose, pretty, service.config()).await?;
        }

        Commands::Validate { file } => {
            validate_workflow(&file)?;
        }

        Commands::Nodes => {
            list_nodes()?;
        }

        Commands::Init { output } => {
            create_example_workflow(&output)?;
        }
    }

    Ok(())
}

fn load_workflow(file: &Path) -> Result<WorkflowDefinition> {
    WorkflowDefinition::from_file(file)
        .with_context(|| format!("loading workflow {}", file.display()))
}

/// Accept either inline JSON or a path to a JSON file
fn load_payload(raw: &str) -> Result<ExecutePayload> {
    let trimmed = raw.trim_start();
    let json = if trimmed.starts_with('{') {
        raw.to_string()
    } else {
        std::fs::read_to_string(raw).with_context(|| format!("reading payload {}", raw))?
    };
    serde_json::from_str(&json).context("decoding execution payload")
}

async fn run_workflow(
    file: &Path,
    payload: &str,
    verbose: bool,
    pretty: bool,
    service: OpenMeteoConfig,
) -> Result<()> {
    let workflow = load_workflow(file)?;
    let payload = load_payload(payload)?;

    let registry = default_registry(service)?;
    let runtime = FlowRuntime::with_registry(registry, RuntimeConfig::default());

    let mut events = runtime.subscribe_events();
    let result = runtime.execute(&workflow, &payload).await?;

    if verbose {
        // Everything was emitted during the run; drain what the buffer kept
        while let Ok(event) = events.try_recv() {
            print_event(&event);
        }
    }

    let json = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", json);

    if let Some(failure) = &result.failure {
        tracing::error!("Workflow failed at node {}: {}", failure.node_id, failure.message);
    }

    Ok(())
}

fn print_event(event: &ExecutionEvent) {
    match event {
        ExecutionEvent::WorkflowStarted { workflow_id, .. } => {
            eprintln!("▶️  Workflow {} started", workflow_id);
        }
        ExecutionEvent::NodeStarted {
            node_id, node_type, ..
        } => {
            eprintln!("  ⚡ Starting node: {} ({})", node_id, node_type);
        }
        ExecutionEvent::NodeCompleted {
            node_id,
            duration_ms,
            ..
        } => {
            eprintln!("  ✅ Node {} completed in {}ms", node_id, duration_ms);
        }
        ExecutionEvent::NodeFailed { node_id, error, .. } => {
            eprintln!("  ❌ Node {} failed: {}", node_id, error);
        }
        ExecutionEvent::WorkflowCompleted {
            status,
            steps,
            duration_ms,
            ..
        } => {
            eprintln!(
                "✨ Workflow finished ({:?}) after {} step(s) in {}ms",
                status, steps, duration_ms
            );
        }
    }
}

fn validate_workflow(file: &Path) -> Result<()> {
    println!("🔍 Validating workflow: {}", file.display());

    let workflow = load_workflow(file)?;
    let graph = WorkflowGraph::build(&workflow)?;

    println!("✅ Workflow is valid:");
    println!("   Id: {}", workflow.id);
    println!("   Nodes: {}", graph.len());
    println!("   Edges: {}", workflow.edges.len());

    Ok(())
}

fn list_nodes() -> Result<()> {
    println!("📦 Available Node Types:");
    println!();

    let registry = default_registry(OpenMeteoConfig::default())?;
    for kind in registry.list_node_types() {
        println!("  • {}", kind);
        if let Some(description) = registry.description(kind) {
            println!("    {}", description);
        }
    }

    Ok(())
}

fn example_workflow() -> WorkflowDefinition {
    WorkflowDefinition::new("weather-alert")
        .with_node(
            Node::new("start", NodeKind::Start)
                .with_label("Start")
                .with_description("Begin weather check workflow")
                .with_position(-160.0, 300.0),
        )
        .with_node(
            Node::new("form", NodeKind::Form)
                .with_label("User Input")
                .with_description("Process collected data - name, email, location")
                .with_position(152.0, 304.0)
                .with_metadata(NodeMetadata {
                    input_fields: vec!["name".into(), "email".into(), "city".into()],
                    output_variables: vec!["name".into(), "email".into(), "city".into()],
                    ..Default::default()
                }),
        )
        .with_node(
            Node::new("weather-api", NodeKind::WeatherLookup)
                .with_label("Weather API")
                .with_description("Fetch current temperature for {{city}}")
                .with_position(460.0, 304.0)
                .with_metadata(NodeMetadata {
                    input_variables: vec!["city".into()],
                    output_variables: vec!["temperature".into()],
                    api_endpoint: Some(
                        "https://api.open-meteo.com/v1/forecast?latitude={lat}&longitude={lon}&current_weather=true"
                            .into(),
                    ),
                    ..Default::default()
                }),
        )
        .with_node(
            Node::new("condition", NodeKind::Condition)
                .with_label("Check Condition")
                .with_description("Evaluate temperature threshold")
                .with_position(794.0, 304.0)
                .with_metadata(NodeMetadata {
                    condition_expression: Some("temperature {{operator}} {{threshold}}".into()),
                    ..Default::default()
                }),
        )
        .with_node(
            Node::new("email", NodeKind::Email)
                .with_label("Send Alert")
                .with_description("Email weather alert notification")
                .with_position(1096.0, 88.0)
                .with_metadata(NodeMetadata {
                    input_variables: vec!["name".into(), "city".into(), "temperature".into()],
                    email_template: Some(EmailTemplate {
                        subject: "Weather Alert".into(),
                        body: "Weather alert for {{city}}! Temperature is {{temperature}}°C!".into(),
                    }),
                    ..Default::default()
                }),
        )
        .with_node(
            Node::new("end", NodeKind::End)
                .with_label("Complete")
                .with_description("Workflow execution finished")
                .with_position(1360.0, 302.0),
        )
        .connect("start", "form")
        .connect("form", "weather-api")
        .connect("weather-api", "condition")
        .with_edge(Edge::new("condition", "email").with_label(CONDITION_MET_LABEL))
        .with_edge(Edge::new("condition", "end").with_label(CONDITION_NOT_MET_LABEL))
        .connect("email", "end")
}

fn create_example_workflow(output: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&example_workflow())?;
    std::fs::write(output, json)?;

    println!("✨ Created example workflow: {}", output.display());
    println!();
    println!("Run it with:");
    println!(
        "  alertflow run --workflow {} --payload '{{\"formData\": {{\"name\": \"Jane\", \"email\": \"jane@example.com\", \"city\": \"Melbourne\"}}, \"condition\": {{\"operator\": \"greater_than\", \"threshold\": 25}}}}'",
        output.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_workflow_is_structurally_valid() {
        let workflow = example_workflow();
        let graph = WorkflowGraph::build(&workflow).unwrap();
        assert_eq!(graph.len(), 6);
    }

    #[test]
    fn example_workflow_survives_json() {
        let json = serde_json::to_string(&example_workflow()).unwrap();
        let decoded: WorkflowDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, example_workflow());
    }

    #[test]
    fn inline_payload_is_parsed() {
        let payload = load_payload(
            r#"{"formData": {"name": "A", "email": "a@b.c", "city": "Perth"}, "condition": {"operator": "equals", "threshold": 1}}"#,
        )
        .unwrap();
        assert_eq!(payload.form_data.city, "Perth");
        assert_eq!(payload.condition.threshold, 1.0);
    }
}
