//! Command-line interface for wsdlschema

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use wsdlschema::loaders::Loader;
#[cfg(feature = "cli")]
use wsdlschema::locations::Location;
#[cfg(feature = "cli")]
use wsdlschema::{TypeDefinition, WsdlDefinition};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "wsdlschema")]
#[command(author, version, about = "WSDL service description inspector", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Summarize a WSDL document
    Inspect {
        /// Path to the WSDL file
        #[arg(value_name = "WSDL")]
        wsdl: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// List the operations of a WSDL document
    Operations {
        /// Path to the WSDL file
        #[arg(value_name = "WSDL")]
        wsdl: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// List the type catalog of a WSDL document
    Types {
        /// Path to the WSDL file
        #[arg(value_name = "WSDL")]
        wsdl: String,

        /// Only show types in this namespace
        #[arg(short, long)]
        namespace: Option<String>,

        /// Include RPC pseudo types
        #[arg(long)]
        pseudo: bool,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Inspect { wsdl, json } => cmd_inspect(&wsdl, json),
        Commands::Operations { wsdl, json } => cmd_operations(&wsdl, json),
        Commands::Types {
            wsdl,
            namespace,
            pseudo,
            json,
        } => cmd_types(&wsdl, namespace.as_deref(), pseudo, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn load(wsdl: &str) -> Result<WsdlDefinition, Box<dyn std::error::Error>> {
    let location = Location::parse(wsdl);
    Ok(WsdlDefinition::from_location(&location, &Loader::new())?)
}

#[cfg(feature = "cli")]
fn cmd_inspect(path: &str, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let wsdl = load(path)?;

    if json_output {
        use serde_json::json;

        let output = json!({
            "namespace": wsdl.namespace,
            "serviceName": wsdl.service_name,
            "endpoint": wsdl.endpoint.as_ref().map(|u| u.to_string()),
            "style": wsdl.style.to_string(),
            "elementFormDefault": wsdl.element_form_default.to_string(),
            "statistics": {
                "operations": wsdl.operations.len(),
                "types": wsdl.types.len(),
                "pseudoTypes": wsdl.pseudo_types.len(),
                "topLevelElements": wsdl.top_level_elements.len(),
                "unresolvedExtensions": wsdl.unresolved_extensions.len(),
            },
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("wsdlschema v{}", wsdlschema::VERSION);
    println!();
    println!("Service Information:");
    if wsdl.service_name.is_empty() {
        println!("  Name: (none)");
    } else {
        println!("  Name: {}", wsdl.service_name);
    }
    println!(
        "  Target Namespace: {}",
        wsdl.namespace.as_deref().unwrap_or("(none)")
    );
    match &wsdl.endpoint {
        Some(endpoint) => println!("  Endpoint: {}", endpoint),
        None => println!("  Endpoint: (none)"),
    }
    println!("  Style: {}", wsdl.style);
    println!("  Element Form Default: {}", wsdl.element_form_default);
    println!();
    println!("Statistics:");
    println!("  Operations: {}", wsdl.operations.len());
    println!("  Types: {}", wsdl.types.len());
    println!("  Pseudo Types: {}", wsdl.pseudo_types.len());
    println!("  Top-level Elements: {}", wsdl.top_level_elements.len());

    if !wsdl.unresolved_extensions.is_empty() {
        println!();
        println!("Unresolved Extensions:");
        for ext in &wsdl.unresolved_extensions {
            println!("  {} extends {}", ext.type_name, ext.base);
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_operations(path: &str, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let wsdl = load(path)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&wsdl.operations)?);
        return Ok(());
    }

    println!("=== Operations ===");
    for (name, operation) in &wsdl.operations {
        println!("  {}", name);
        println!("    Action: {}", operation.action);
        println!("    Input: {}", operation.input);
        match &operation.output {
            Some(output) => println!("    Output: {}", output),
            None => println!("    Output: (placeholder)"),
        }
        for (param_name, param) in &operation.parameters {
            let type_name = match &param.namespace_prefix {
                Some(prefix) => format!("{}:{}", prefix, param.type_name),
                None => param.type_name.clone(),
            };
            println!("    - {} : {}", param_name, type_name);
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_types(
    path: &str,
    namespace: Option<&str>,
    include_pseudo: bool,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let wsdl = load(path)?;
    let catalog = if include_pseudo {
        wsdl.all_types()
    } else {
        wsdl.types.clone()
    };

    let selected: Vec<(Option<&str>, &str, &TypeDefinition)> = catalog
        .iter()
        .filter(|(ns, _, _)| namespace.map_or(true, |wanted| *ns == Some(wanted)))
        .collect();

    if json_output {
        let mut output = serde_json::Map::new();
        for (ns, name, definition) in &selected {
            let entry = output
                .entry(ns.unwrap_or("").to_string())
                .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
            if let serde_json::Value::Object(types) = entry {
                types.insert(name.to_string(), serde_json::to_value(definition)?);
            }
        }
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("=== Types ===");
    for (ns, name, definition) in selected {
        let group = match (&definition.order, &definition.unordered) {
            (Some(order), _) => format!("sequence of {}", order.len()),
            (None, Some(unordered)) => format!("all of {}", unordered.len()),
            (None, None) => "no members".to_string(),
        };
        match ns {
            Some(ns) => println!("  {{{}}}{} ({})", ns, name, group),
            None => println!("  {} ({})", name, group),
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
