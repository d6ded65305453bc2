//! Drive Controller (§4.5): CD-ROM ioctl drive status, wait-for-ready
//! polling, and eject. Linux-only; other platforms get a stub that always
//! returns a configuration error (§6).

use std::time::Duration;
use tracing::warn;

use crate::interfaces::command_executor::CommandExecutor;
use crate::shared::error::DriveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveStatus {
    NoInfo,
    NoDisc,
    TrayOpen,
    NotReady,
    DiscOk,
    Unknown(i32),
}

impl DriveStatus {
    fn from_code(code: i32) -> Self {
        match code {
            0 => DriveStatus::NoInfo,
            1 => DriveStatus::NoDisc,
            2 => DriveStatus::TrayOpen,
            3 => DriveStatus::NotReady,
            4 => DriveStatus::DiscOk,
            other => DriveStatus::Unknown(other),
        }
    }
}

impl std::fmt::Display for DriveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DriveStatus::NoInfo => write!(f, "no_info"),
            DriveStatus::NoDisc => write!(f, "no_disc"),
            DriveStatus::TrayOpen => write!(f, "tray_open"),
            DriveStatus::NotReady => write!(f, "not_ready"),
            DriveStatus::DiscOk => write!(f, "disc_ok"),
            DriveStatus::Unknown(n) => write!(f, "unknown({n})"),
        }
    }
}

pub struct DriveController<'a> {
    executor: &'a dyn CommandExecutor,
    poll_interval: Duration,
    max_attempts: u32,
}

impl<'a> DriveController<'a> {
    pub fn new(executor: &'a dyn CommandExecutor, poll_interval: Duration, max_attempts: u32) -> Self {
        Self {
            executor,
            poll_interval,
            max_attempts,
        }
    }

    #[cfg(target_os = "linux")]
    pub fn status(device: &str) -> Result<DriveStatus, DriveError> {
        use std::fs::OpenOptions;
        use std::os::unix::fs::OpenOptionsExt;
        use std::os::unix::io::AsRawFd;

        const CDROM_DRIVE_STATUS: libc::c_ulong = 0x5326;

        let file = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(device)
            .map_err(|e| DriveError::Open(device.to_string(), e))?;

        let code = unsafe { libc::ioctl(file.as_raw_fd(), CDROM_DRIVE_STATUS, 0) };
        if code < 0 {
            return Err(DriveError::Ioctl(device.to_string(), std::io::Error::last_os_error()));
        }

        Ok(DriveStatus::from_code(code))
    }

    #[cfg(not(target_os = "linux"))]
    pub fn status(_device: &str) -> Result<DriveStatus, DriveError> {
        Err(DriveError::Unsupported)
    }

    /// Polls at 1 Hz up to `max_attempts`; returns early on `DiscOk` or on
    /// any status error (§4.5).
    pub async fn wait_for_ready(&self, device: &str) -> Result<DriveStatus, DriveError> {
        let mut last_status = DriveStatus::NoInfo;

        for attempt in 1..=self.max_attempts {
            match Self::status(device) {
                Ok(DriveStatus::DiscOk) => return Ok(DriveStatus::DiscOk),
                Ok(status) => last_status = status,
                Err(e) => return Err(e),
            }

            if attempt < self.max_attempts {
                tokio::time::sleep(self.poll_interval).await;
            }
        }

        Err(DriveError::NotReady(self.max_attempts, last_status.to_string()))
    }

    pub async fn eject(&self, device: &str) -> Result<(), DriveError> {
        let output = self
            .executor
            .run("eject", &[device], None)
            .await
            .map_err(|e| DriveError::EjectFailed(device.to_string(), e.to_string()))?;

        if output.exit_code != 0 {
            warn!(device, exit_code = output.exit_code, "eject exited non-zero");
            return Err(DriveError::EjectFailed(
                device.to_string(),
                String::from_utf8_lossy(&output.stderr).to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_named_variants() {
        assert_eq!(DriveStatus::from_code(0), DriveStatus::NoInfo);
        assert_eq!(DriveStatus::from_code(4), DriveStatus::DiscOk);
        assert_eq!(DriveStatus::from_code(9), DriveStatus::Unknown(9));
    }
}
