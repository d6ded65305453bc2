//! Invokes the external extraction tool and auxiliary info tool (§4.4).

use crate::domain::ScanResult;
use crate::domain::services::LabelClassifier;
use crate::infrastructure::scanner::scan_parser::{extract_error_message, BdInfoParser, ScanParser};
use crate::interfaces::command_executor::CommandExecutor;
use crate::shared::error::{ExternalToolError, ScanError};

/// Normalizes a device identifier (§4.4): `disc:N` and `dev:*` pass through;
/// `/dev/*` is rewritten to `dev:/dev/*`; empty becomes `disc:0`.
pub fn normalize_device(device: &str) -> String {
    if device.is_empty() {
        "disc:0".to_string()
    } else if device.starts_with("disc:") || device.starts_with("dev:") {
        device.to_string()
    } else if device.starts_with("/dev/") {
        format!("dev:{device}")
    } else {
        device.to_string()
    }
}

/// Raw device path for tools that need it; empty for `disc:N` forms.
pub fn device_path(device: &str) -> String {
    let normalized = normalize_device(device);
    if let Some(path) = normalized.strip_prefix("dev:") {
        path.to_string()
    } else {
        String::new()
    }
}

pub struct DiscScanner<'a> {
    makemkv_binary: &'a str,
    executor: &'a dyn CommandExecutor,
}

impl<'a> DiscScanner<'a> {
    pub fn new(makemkv_binary: &'a str, executor: &'a dyn CommandExecutor) -> Self {
        Self { makemkv_binary, executor }
    }

    pub async fn scan(&self, device: &str) -> Result<ScanResult, ScanError> {
        let normalized = normalize_device(device);
        let output = self
            .executor
            .run(self.makemkv_binary, &["-r", "--cache=1", "info", &normalized, "--robot"], None)
            .await?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();

        if output.exit_code != 0 {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let combined = format!("{stdout}\n{stderr}");
            let message = extract_error_message(&combined);
            return Err(ScanError::ExternalTool(ExternalToolError::NonZeroExit {
                binary: self.makemkv_binary.to_string(),
                code: output.exit_code,
                message,
            }));
        }

        let mut result = ScanParser::parse(&stdout)?;

        let needs_aux = result.titles.is_empty()
            || result
                .first_title_name()
                .map(LabelClassifier::is_generic_label)
                .unwrap_or(true);

        if needs_aux {
            let path = device_path(device);
            if let Ok(aux_output) = self.executor.run("bd_info", &[path.as_str()], None).await {
                let aux_stdout = String::from_utf8_lossy(&aux_output.stdout);
                if let Some(bd_info) = BdInfoParser::parse(&aux_stdout) {
                    if !bd_info.disc_name.is_empty() {
                        if let Some(first) = result.titles.first_mut() {
                            if first.name.is_empty() || LabelClassifier::is_generic_label(&first.name) {
                                first.name = bd_info.disc_name.clone();
                            }
                        }
                    }
                    result.bd_info = Some(bd_info);
                }
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_dev_and_disc_forms() {
        assert_eq!(normalize_device(""), "disc:0");
        assert_eq!(normalize_device("disc:1"), "disc:1");
        assert_eq!(normalize_device("dev:/dev/sr0"), "dev:/dev/sr0");
        assert_eq!(normalize_device("/dev/sr0"), "dev:/dev/sr0");
    }

    #[test]
    fn device_path_empty_for_disc_form() {
        assert_eq!(device_path("disc:0"), "");
        assert_eq!(device_path("/dev/sr0"), "/dev/sr0");
    }
}
