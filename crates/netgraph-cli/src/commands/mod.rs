//! CLI command implementations.

use anyhow::{Context, Result};
use chrono::Utc;
use netgraph_config::{ReplacementTable, build_replacements_from_str, render_text};
use netgraph_core::NetworkGraph;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

use crate::InputArgs;

/// Raw text of both input documents.
struct Inputs {
    network: String,
    replacements: String,
}

fn read_inputs(args: &InputArgs) -> Result<Inputs> {
    let replacements = std::fs::read_to_string(&args.replacements).with_context(|| {
        format!(
            "Failed to read replacements file: {}",
            args.replacements.display()
        )
    })?;
    let network = std::fs::read_to_string(&args.network)
        .with_context(|| format!("Failed to read network file: {}", args.network.display()))?;
    Ok(Inputs {
        network,
        replacements,
    })
}

fn replacement_table(inputs: &Inputs, args: &InputArgs) -> Result<ReplacementTable> {
    build_replacements_from_str(&inputs.replacements).with_context(|| {
        format!(
            "Failed to parse replacements file: {}",
            args.replacements.display()
        )
    })
}

pub fn resolve(args: &InputArgs, out: Option<&Path>) -> Result<()> {
    let inputs = read_inputs(args)?;
    let resolution = netgraph_config::resolve_documents(&inputs.replacements, &inputs.network)
        .with_context(|| format!("Failed to resolve {}", args.network.display()))?;

    let json = resolution
        .into_json_pretty(Utc::now())
        .context("Failed to serialize network graph")?;

    match out {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            info!(path = %path.display(), "Wrote output");
            println!("Wrote resolved network graph to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").context("Failed to write to stdout")?;
        }
    }

    Ok(())
}

pub fn render(args: &InputArgs) -> Result<()> {
    let inputs = read_inputs(args)?;
    let table = replacement_table(&inputs, args)?;

    let rendered = render_text(&inputs.network, &table);
    for name in netgraph_config::unresolved_placeholders(&rendered) {
        warn!(placeholder = %name, "Placeholder has no replacement value");
    }

    print!("{rendered}");
    Ok(())
}

pub fn validate(args: &InputArgs) -> Result<()> {
    let inputs = read_inputs(args)?;
    match netgraph_config::resolve_documents(&inputs.replacements, &inputs.network) {
        Ok(resolution) => {
            println!("Configuration is valid");
            println!("Replacements: {}", resolution.replacements.len());
            print!("{}", summary(&resolution.graph));
            Ok(())
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            std::process::exit(1);
        }
    }
}

fn summary(graph: &NetworkGraph) -> String {
    let rows = [
        ("Transit gateways", graph.transit_gateways.len()),
        ("VPCs", graph.vpcs.len()),
        ("Subnets", graph.subnet_count()),
        ("TGW attachments", graph.tgw_attachments.len()),
        ("DX gateways", graph.dx_gateways.len()),
        ("VPN connections", graph.vpn_connections.len()),
        ("CNFGW endpoints", graph.cnfgw_endpoints.len()),
    ];
    rows.iter()
        .map(|(label, count)| format!("{label}: {count}\n"))
        .collect()
}
