use std::io::{self, Write};

use serde_json::Value;
use tickerscope_core::Envelope;

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(
    envelope: &Envelope<Value>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_to(&mut out, envelope, format, pretty)?;
    out.flush()?;
    Ok(())
}

pub fn render_to<W: Write>(
    out: &mut W,
    envelope: &Envelope<Value>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Ndjson => {
            let payload = serde_json::to_string(envelope)?;
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Table => render_table(out, envelope)?,
    }

    Ok(())
}

fn render_table<W: Write>(out: &mut W, envelope: &Envelope<Value>) -> Result<(), CliError> {
    writeln!(out, "request_id  : {}", envelope.meta.request_id)?;
    writeln!(out, "schema      : {}", envelope.meta.schema_version)?;
    writeln!(out, "generated_at: {}", envelope.meta.generated_at)?;
    writeln!(out, "provider    : {}", envelope.meta.provider)?;
    writeln!(out, "latency_ms  : {}", envelope.meta.latency_ms)?;

    if !envelope.meta.warnings.is_empty() {
        writeln!(out, "warnings:")?;
        for warning in &envelope.meta.warnings {
            writeln!(out, "  - {warning}")?;
        }
    }

    writeln!(out, "data:")?;
    match envelope.data.get("metrics").and_then(Value::as_array) {
        Some(rows) => render_metrics(out, rows)?,
        None => {
            let pretty_data = serde_json::to_string_pretty(&envelope.data)?;
            for line in pretty_data.lines() {
                writeln!(out, "  {line}")?;
            }
        }
    }

    if !envelope.errors.is_empty() {
        writeln!(out, "errors:")?;
        for error in &envelope.errors {
            writeln!(out, "  - {}: {}", error.code, error.message)?;
        }
    }

    Ok(())
}

const METRIC_COLUMNS: [(&str, &str); 7] = [
    ("current_price", "Current Price"),
    ("market_cap", "Market Cap"),
    ("pe_ratio", "P/E Ratio"),
    ("volume", "Volume"),
    ("avg_volume", "Avg Volume"),
    ("dividend_yield", "Dividend Yield"),
    ("beta", "Beta"),
];

/// Key metrics as a label column followed by one column per symbol.
fn render_metrics<W: Write>(out: &mut W, rows: &[Value]) -> Result<(), CliError> {
    let cell = |row: &Value, key: &str| {
        row.get(key)
            .and_then(Value::as_str)
            .unwrap_or("N/A")
            .to_owned()
    };

    let mut header = format!("  {:<16}", "");
    for row in rows {
        header.push_str(&format!("{:>14}", cell(row, "symbol")));
    }
    writeln!(out, "{}", header.trim_end())?;

    for (key, label) in METRIC_COLUMNS {
        let mut line = format!("  {label:<16}");
        for row in rows {
            line.push_str(&format!("{:>14}", cell(row, key)));
        }
        writeln!(out, "{line}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tickerscope_core::{EnvelopeError, EnvelopeMeta, ProviderId};

    use super::*;

    fn envelope(data: Value) -> Envelope<Value> {
        let meta = EnvelopeMeta::new("req-12345678", ProviderId::Fixture, 7).expect("valid meta");
        Envelope::success(meta, data)
    }

    fn rendered(envelope: &Envelope<Value>, format: OutputFormat) -> String {
        let mut buffer = Vec::new();
        render_to(&mut buffer, envelope, format, false).expect("render");
        String::from_utf8(buffer).expect("utf8 output")
    }

    #[test]
    fn json_is_a_single_line() {
        let output = rendered(&envelope(json!({ "symbols": ["TCS.NS"] })), OutputFormat::Json);
        assert_eq!(output.lines().count(), 1);
        let parsed: Value = serde_json::from_str(&output).expect("valid json");
        assert_eq!(parsed["data"]["symbols"][0], "TCS.NS");
    }

    #[test]
    fn table_lists_errors_after_data() {
        let mut envelope = envelope(json!({ "series": [] }));
        envelope.errors.push(
            EnvelopeError::new("fetch.no_data", "no data found for ZZZNOPE").expect("valid error"),
        );

        let output = rendered(&envelope, OutputFormat::Table);

        assert!(output.contains("provider    : fixture"));
        assert!(output.contains("  - fetch.no_data: no data found for ZZZNOPE"));
    }

    #[test]
    fn metrics_render_as_label_rows() {
        let envelope = envelope(json!({
            "metrics": [{ "symbol": "AAPL", "market_cap": "$2.90T", "beta": "1.20" }]
        }));

        let output = rendered(&envelope, OutputFormat::Table);

        let market_cap = output
            .lines()
            .find(|line| line.trim_start().starts_with("Market Cap"))
            .expect("market cap row");
        assert!(market_cap.ends_with("$2.90T"));
        assert!(output.contains("P/E Ratio"));
    }
}
