use crate::error::{RunnerError, RunnerResult};
use crate::tfvc::command::Dialect;

/// Version of a TF command line tool
///
/// The tool reports four components (`14.0.3.201603291047`); the build
/// component does not take part in comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TfVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl TfVersion {
    /// Oldest supported cross-platform client
    pub const CLC_MIN: TfVersion = TfVersion::new(14, 0, 4);

    /// Oldest supported `tf.exe`
    pub const EXE_MIN: TfVersion = TfVersion::new(14, 102, 0);

    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// Minimum version for a dialect
    pub fn minimum_for(dialect: Dialect) -> Self {
        match dialect {
            Dialect::Clc => Self::CLC_MIN,
            Dialect::NativeExe => Self::EXE_MIN,
        }
    }

    /// Parse a version string like "14.0.3.201603291047"
    pub fn parse(version_str: &str) -> RunnerResult<Self> {
        let nums: Vec<&str> = version_str.trim().split('.').collect();

        if nums.len() < 2 {
            return Err(RunnerError::VersionDetectionFailed(format!(
                "Invalid version number format: {}",
                version_str
            )));
        }

        let component = |value: &str, name: &str| {
            value.parse::<u32>().map_err(|_| {
                RunnerError::VersionDetectionFailed(format!("Invalid {} version: {}", name, value))
            })
        };

        let major = component(nums[0], "major")?;
        let minor = component(nums[1], "minor")?;
        let patch = match nums.get(2) {
            Some(patch) => component(patch, "patch")?,
            None => 0,
        };

        Ok(Self::new(major, minor, patch))
    }

    pub fn is_at_least(&self, minimum: &TfVersion) -> bool {
        self >= minimum
    }
}

impl std::fmt::Display for TfVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
