use std::path;

use tempfile::TempDir;

/// A directory unique to the calling test. It is removed once the returned
/// guard is dropped, so keep it alive for the whole test.
pub fn temp_dir() -> TempDir {
    return tempfile::Builder::new()
        .prefix("hookchat-test-")
        .tempdir()
        .unwrap();
}

pub fn history_path(dir: &TempDir) -> path::PathBuf {
    return dir.path().join("history.json");
}

pub fn chart_config_fixture() -> serde_json::Value {
    return serde_json::json!({
        "type": "bar",
        "data": {
            "labels": ["Q1", "Q2", "Q3"],
            "datasets": [
                {
                    "label": "Revenue",
                    "data": [120, 135.5, 160]
                },
                {
                    "label": "Costs",
                    "data": [80, 90, 95]
                }
            ]
        },
        "options": {
            "plugins": {
                "title": {
                    "display": true,
                    "text": "Quarterly sales"
                }
            }
        }
    });
}
