#[cfg(test)]
#[path = "chart_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use serde_json::Value;

/// Text rendition of a Chart.js style config, for surfaces that can't draw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartSummary {
    pub chart_type: String,
    pub title: Option<String>,
    pub labels: Vec<String>,
    pub datasets: Vec<(String, Vec<String>)>,
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => return s.to_string(),
        Value::Null => return "-".to_string(),
        other => return other.to_string(),
    }
}

impl ChartSummary {
    pub fn parse(config: &Value) -> Result<ChartSummary> {
        let obj = match config.as_object() {
            Some(obj) => obj,
            None => bail!("Chart config must be an object"),
        };

        let data = match obj.get("data").and_then(|e| return e.as_object()) {
            Some(data) => data,
            None => bail!("Chart config has no data"),
        };

        let chart_type = obj
            .get("type")
            .and_then(|e| return e.as_str())
            .unwrap_or("")
            .to_string();

        let title = obj
            .get("options")
            .and_then(|e| return e.pointer("/plugins/title/text"))
            .and_then(|e| return e.as_str())
            .map(|e| return e.to_string());

        let labels = data
            .get("labels")
            .and_then(|e| return e.as_array())
            .map(|labels| {
                return labels.iter().map(scalar_to_string).collect::<Vec<String>>();
            })
            .unwrap_or_default();

        let datasets = data
            .get("datasets")
            .and_then(|e| return e.as_array())
            .map(|datasets| {
                return datasets
                    .iter()
                    .enumerate()
                    .map(|(idx, dataset)| {
                        let label = dataset
                            .get("label")
                            .and_then(|e| return e.as_str())
                            .map(|e| return e.to_string())
                            .unwrap_or_else(|| return format!("Dataset {}", idx + 1));
                        let values = dataset
                            .get("data")
                            .and_then(|e| return e.as_array())
                            .map(|values| {
                                return values
                                    .iter()
                                    .map(scalar_to_string)
                                    .collect::<Vec<String>>();
                            })
                            .unwrap_or_default();

                        return (label, values);
                    })
                    .collect::<Vec<(String, Vec<String>)>>();
            })
            .unwrap_or_default();

        if datasets.is_empty() {
            bail!("Chart config has no datasets");
        }

        return Ok(ChartSummary {
            chart_type,
            title,
            labels,
            datasets,
        });
    }

    pub fn as_lines(&self) -> Vec<String> {
        let mut heading = "[chart]".to_string();
        if !self.chart_type.is_empty() {
            heading = format!("[{} chart]", self.chart_type);
        }
        if let Some(title) = &self.title {
            heading = format!("{heading} {title}");
        }

        let mut lines = vec![heading];
        for (label, values) in &self.datasets {
            let points = values
                .iter()
                .enumerate()
                .map(|(idx, value)| {
                    if let Some(x) = self.labels.get(idx) {
                        return format!("{x}={value}");
                    }
                    return value.to_string();
                })
                .collect::<Vec<String>>()
                .join(", ");

            lines.push(format!("{label}: {points}"));
        }

        return lines;
    }
}
