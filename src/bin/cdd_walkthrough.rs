use anyhow::Result;
use clap::Parser;
use mcp_adapters::cdd::{CddTools, ChainEvent, ChainWalker, ToolKind};
use mcp_adapters::config::Config;

#[derive(Parser, Debug)]
#[command(author, version, about = "Exercise the simulated CDD tools and follow their next_steps", long_about = None)]
struct Args {
    /// Base customer id; -POS and -NEG variants are derived from it
    #[arg(long, default_value = "CUST-12345")]
    customer_id: String,

    /// Chain depth limit (defaults to cdd.max_chain_depth)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Skip the positive/negative scenario runs
    #[arg(long)]
    base_only: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load().unwrap_or_default();
    mcp_adapters::init_tracing(&config.runtime);
    let max_depth = args.max_depth.unwrap_or(config.cdd.max_chain_depth);

    let tools = CddTools::new();
    run(&tools, &args.customer_id, max_depth, "BASE").await?;

    if !args.base_only {
        let pos = format!("{}-POS", args.customer_id);
        let neg = format!("{}-NEG", args.customer_id);
        run(&tools, &pos, max_depth, "POSITIVE SCENARIO").await?;
        run(&tools, &neg, max_depth, "NEGATIVE SCENARIO").await?;
    }

    Ok(())
}

async fn run(tools: &CddTools, customer_id: &str, max_depth: usize, label: &str) -> Result<()> {
    println!("\n================== {} ({}) ==================", label, customer_id);

    let mut profile = None;
    for kind in ToolKind::ALL {
        let result = serde_json::to_value(tools.run(kind, customer_id))?;
        println!("\n{}:\n{}", kind.tool_name(), serde_json::to_string_pretty(&result)?);
        if kind == ToolKind::Profile {
            profile = Some(result);
        }
    }

    let Some(profile) = profile else {
        return Ok(());
    };
    println!("\n--- Following next_steps from get_customer_profile ---");
    let events = ChainWalker::new(tools, max_depth).walk(&profile).await;
    for event in &events {
        print_event(event)?;
    }
    Ok(())
}

fn print_event(event: &ChainEvent) -> Result<()> {
    match event {
        ChainEvent::Action { text, .. } => println!("Next action (human): {}", text),
        ChainEvent::Call {
            depth,
            tool,
            params,
            result,
        } => {
            println!(
                "\n-- Following next_step: calling {} with params={} (depth {})",
                tool,
                serde_json::Value::Object(params.clone()),
                depth
            );
            println!("Result from {}: {}", tool, serde_json::to_string_pretty(result)?);
        }
        ChainEvent::UnknownTool { tool, .. } => {
            println!("Unknown tool referenced in next_steps: {}", tool)
        }
        ChainEvent::Failed { tool, error, .. } => {
            println!("Error when calling {}: {}", tool, error)
        }
        ChainEvent::DepthLimit { depth } => {
            println!("Max next-step depth {} reached, stopping further chaining.", depth)
        }
    }
    Ok(())
}
