use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use serde_json::{json, Map, Value};
use vml_ledger::Ledger;
use vml_protocol::{schema, Dispatcher, InvokeOp, OperationKind};
use vml_server::{ServerConfig, VmlServer};
use vml_store::{load_snapshot, save_snapshot, InMemoryKvStore, KvStore};

use crate::cli::*;
use crate::config::CliConfig;

pub fn run_command(cli: Cli, config: &CliConfig) -> anyhow::Result<()> {
    let state = config.state_path(cli.state.as_deref());
    let format = cli.format;
    let output = match cli.command {
        Command::Init(args) => cmd_invoke(&state, format, InvokeOp::Init.name(), &[args.total])?,
        Command::Invoke(args) => cmd_invoke(&state, format, &args.operation, &args.args)?,
        Command::Query(args) => cmd_query(&state, format, &args.operation, &args.args)?,
        Command::Operations => cmd_operations(format)?,
        Command::Dump(args) => cmd_dump(&state, format, args.prefix.as_deref())?,
        Command::Serve(args) => return cmd_serve(&state, args),
    };
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

/// Run one invoke against the snapshot at `state` and write it back.
fn cmd_invoke(
    state: &Path,
    format: OutputFormat,
    operation: &str,
    args: &[String],
) -> anyhow::Result<String> {
    let store = Arc::new(open_state(state)?);
    let dispatcher = Dispatcher::new(Ledger::new(store.clone()));
    let output = dispatcher.invoke(operation, args)?;
    save_snapshot(&store, state).with_context(|| format!("saving {}", state.display()))?;
    tracing::info!(operation, state = %state.display(), "invoke committed");

    if output.is_empty() {
        return Ok(match format {
            OutputFormat::Text => format!("{} {}", "✓".green().bold(), operation),
            OutputFormat::Json => json!({ "operation": operation, "ok": true }).to_string(),
        });
    }
    render(format, &output)
}

fn cmd_query(
    state: &Path,
    format: OutputFormat,
    operation: &str,
    args: &[String],
) -> anyhow::Result<String> {
    let store = open_state(state)?;
    let dispatcher = Dispatcher::new(Ledger::new(Arc::new(store)));
    let output = dispatcher.query(operation, args)?;
    render(format, &output)
}

fn cmd_operations(format: OutputFormat) -> anyhow::Result<String> {
    let operations = schema();
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(&operations)?);
    }
    let lines: Vec<String> = operations
        .iter()
        .map(|op| {
            let kind = match op.kind {
                OperationKind::Invoke => "invoke".yellow(),
                OperationKind::Query => "query ".cyan(),
            };
            format!("{kind}  {}({})", op.name.bold(), op.params.join(", "))
        })
        .collect();
    Ok(lines.join("\n"))
}

fn cmd_dump(state: &Path, format: OutputFormat, prefix: Option<&str>) -> anyhow::Result<String> {
    let store = open_state(state)?;
    let entries = store.scan_prefix(prefix.unwrap_or(""))?;
    let entries: Vec<(String, String)> = entries
        .into_iter()
        .map(|(key, value)| (key, String::from_utf8_lossy(&value).into_owned()))
        .collect();

    match format {
        OutputFormat::Json => {
            let object: Map<String, Value> = entries
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect();
            Ok(serde_json::to_string_pretty(&Value::Object(object))?)
        }
        OutputFormat::Text => Ok(entries
            .iter()
            .map(|(key, value)| format!("{} = {value}", key.bold()))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

fn cmd_serve(state: &Path, args: ServeArgs) -> anyhow::Result<()> {
    let mut config = ServerConfig {
        state_path: Some(state.to_path_buf()),
        ..ServerConfig::default()
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind
            .parse()
            .with_context(|| format!("invalid bind address {bind:?}"))?;
    }
    let server = VmlServer::new(config)?;
    println!("Vending ledger server on {}", server.config().bind_addr.to_string().bold());
    tokio::runtime::Runtime::new()?.block_on(server.serve())?;
    Ok(())
}

fn open_state(path: &Path) -> anyhow::Result<InMemoryKvStore> {
    load_snapshot(path).with_context(|| format!("loading {}", path.display()))
}

/// JSON payloads are pretty-printed in text mode and passed through in JSON
/// mode; scalar payloads are printed as-is or wrapped as `{"value": ..}`.
fn render(format: OutputFormat, output: &[u8]) -> anyhow::Result<String> {
    let text = String::from_utf8_lossy(output).into_owned();
    let parsed: Option<Value> = match output.first() {
        Some(b'{') | Some(b'[') => serde_json::from_slice(output).ok(),
        _ => None,
    };
    Ok(match (format, parsed) {
        (OutputFormat::Text, Some(value)) => serde_json::to_string_pretty(&value)?,
        (OutputFormat::Text, None) => text,
        (OutputFormat::Json, Some(value)) => value.to_string(),
        (OutputFormat::Json, None) => json!({ "value": text }).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn invoke_persists_between_runs() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("ledger.json");
        let json = OutputFormat::Json;

        cmd_invoke(&state, json, "addCSP", &args(&["C", "0.1", "0"])).unwrap();
        cmd_invoke(&state, json, "addSupplier", &args(&["S", "0.2", "0"])).unwrap();
        cmd_invoke(&state, json, "addVMC", &args(&["V", "0"])).unwrap();
        cmd_invoke(&state, json, "init", &args(&["0"])).unwrap();
        let out = cmd_invoke(
            &state,
            json,
            "recordTransaction",
            &args(&["T1", "100", "S", "C", "V"]),
        )
        .unwrap();
        let record: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(record["transactionId"], "T1");

        let balance = cmd_query(&state, json, "getBalance", &args(&["V"])).unwrap();
        assert_eq!(balance, r#"{"value":"70"}"#);
        assert_eq!(
            cmd_query(&state, OutputFormat::Text, "getBalance", &args(&["S"])).unwrap(),
            "20"
        );
    }

    #[test]
    fn failed_invoke_leaves_state_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("ledger.json");
        assert!(cmd_invoke(&state, OutputFormat::Json, "addVMC", &args(&["V"])).is_err());
        assert!(!state.exists());
    }

    #[test]
    fn empty_invoke_output_in_json() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("ledger.json");
        let out = cmd_invoke(&state, OutputFormat::Json, "addVMC", &args(&["V", "5"])).unwrap();
        assert_eq!(out, r#"{"ok":true,"operation":"addVMC"}"#);
    }

    #[test]
    fn dump_filters_by_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("ledger.json");
        cmd_invoke(&state, OutputFormat::Json, "addVMC", &args(&["V", "5"])).unwrap();
        cmd_invoke(
            &state,
            OutputFormat::Json,
            "updateInventory",
            &args(&["E1", "L1", "P1", "2"]),
        )
        .unwrap();

        let out = cmd_dump(&state, OutputFormat::Json, Some("Inventory")).unwrap();
        let entries: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(entries.as_object().unwrap().len(), 2);
        assert_eq!(entries["InventoryByProduct##E1##P1"], "2");

        let out = cmd_dump(&state, OutputFormat::Json, None).unwrap();
        let entries: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(entries["V_Balance"], "5");
    }

    #[test]
    fn operations_listing_in_json() {
        let out = cmd_operations(OutputFormat::Json).unwrap();
        let ops: Value = serde_json::from_str(&out).unwrap();
        assert!(ops.as_array().unwrap().iter().any(|op| op["name"] == "reconcileInventory"));
    }

    #[test]
    fn render_wraps_scalars() {
        assert_eq!(render(OutputFormat::Json, b"10").unwrap(), r#"{"value":"10"}"#);
        assert_eq!(render(OutputFormat::Text, b"10").unwrap(), "10");
        assert_eq!(render(OutputFormat::Json, b"[]").unwrap(), "[]");
    }
}
