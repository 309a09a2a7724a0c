use openvox_bootstrap_core::BootstrapError;
use serde_json::{json, Map, Value};

const CLI_ERROR_KIND: &str = "openvox-bootstrap/cli-error";

/// Result of one subcommand: the JSON document to print and whether the
/// process should exit zero.
#[derive(Debug)]
pub(crate) struct CommandOutcome {
    pub(crate) document: Value,
    pub(crate) success: bool,
}

impl CommandOutcome {
    pub(crate) fn succeeded(document: Value) -> Self {
        Self {
            document,
            success: true,
        }
    }
}

/// `{"_error": {"kind", "msg", "details"}}`. Engine failures keep their kind
/// plus the exit status and output of the command behind them.
pub(crate) fn error_document(err: &anyhow::Error) -> Value {
    let mut details = Map::new();
    let (kind, msg) = match err.downcast_ref::<BootstrapError>() {
        Some(bootstrap) => {
            if let Some(status) = bootstrap.exit_status() {
                details.insert("exit_status".to_string(), json!(status));
            }
            if let Some(output) = bootstrap.output() {
                details.insert("output".to_string(), json!(output));
            }
            (bootstrap.kind(), bootstrap.to_string())
        }
        None => (CLI_ERROR_KIND, format!("{err:#}")),
    };

    json!({
        "_error": {
            "kind": kind,
            "msg": msg,
            "details": details,
        }
    })
}

pub(crate) fn print_document(document: &Value) {
    match serde_json::to_string_pretty(document) {
        Ok(rendered) => println!("{rendered}"),
        Err(_) => println!("{document}"),
    }
}
