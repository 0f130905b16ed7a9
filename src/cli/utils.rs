use serde_json::{json, Map, Value};

use crate::cli::OutputFormat;
use crate::error::{SubmitError, ValidationErrors};
use crate::resource::{FetchOutcome, LogNotifier, Notification, NotificationLevel, Notifier};
use crate::table::RenderedTable;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = Map::new();
            response.insert("success".to_string(), json!(true));
            response.insert("message".to_string(), json!(message));

            match data {
                Some(Value::Object(fields)) => response.extend(fields),
                Some(other) => {
                    response.insert("data".to_string(), other);
                }
                None => {}
            }

            println!("{}", serde_json::to_string_pretty(&Value::Object(response))?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str, error_code: Option<&str>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Output a rendered table, or the raw rows and page info in JSON mode
pub fn output_table(
    output_format: &OutputFormat,
    collection_name: &str,
    table: &RenderedTable,
    rows: Value,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = Map::new();
            response.insert(collection_name.to_string(), rows);
            response.insert("rowCount".to_string(), json!(table.row_count));
            response.insert("page".to_string(), json!(table.page));
            response.insert("pageCount".to_string(), json!(table.page_count));
            response.insert("controls".to_string(), serde_json::to_value(table.controls)?);
            println!("{}", serde_json::to_string_pretty(&Value::Object(response))?);
        }
        OutputFormat::Text => {
            println!("{}", table.to_text());
        }
    }
    Ok(())
}

/// Output free-form detail text, or the underlying value in JSON mode
pub fn output_details(output_format: &OutputFormat, text: &str, data: Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&data)?),
        OutputFormat::Text => println!("{}", text),
    }
    Ok(())
}

/// Output per-field validation messages
pub fn output_validation(output_format: &OutputFormat, errors: &ValidationErrors) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "success": false,
                    "error": "validation failed",
                    "field_errors": errors.field_errors,
                }))?
            );
        }
        OutputFormat::Text => {
            for (field, message) in &errors.field_errors {
                eprintln!("  {}: {}", field, message);
            }
        }
    }
    Ok(())
}

/// Report a failed submit and turn it into the command's error.
/// Fetch failures were already shown through the notifier.
pub fn submit_failure(output_format: &OutputFormat, err: SubmitError) -> anyhow::Error {
    match &err {
        SubmitError::Invalid(errors) => {
            if let Err(e) = output_validation(output_format, errors) {
                return e;
            }
        }
        SubmitError::InFlight => {
            if let Err(e) = output_error(output_format, &err.to_string(), Some("in_flight")) {
                return e;
            }
        }
        SubmitError::Failed(_) => {}
    }
    anyhow::Error::new(err)
}

/// A fetch that ended in failure becomes the command's error
pub fn require_loaded(outcome: FetchOutcome) -> anyhow::Result<()> {
    outcome.into_result().map_err(anyhow::Error::new)
}

/// Prints notices the same way [`output_success`] and [`output_error`] do.
/// JSON output stays machine-readable, so notices only reach the log there.
#[derive(Debug, Clone)]
pub struct ConsoleNotifier {
    output_format: OutputFormat,
}

impl ConsoleNotifier {
    pub fn new(output_format: OutputFormat) -> Self {
        Self { output_format }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        LogNotifier.notify(notification.clone());
        if let OutputFormat::Text = self.output_format {
            match notification.level {
                NotificationLevel::Success => println!("✓ {}", notification.message),
                NotificationLevel::Error => eprintln!("Error: {}", notification.message),
            }
        }
    }
}
