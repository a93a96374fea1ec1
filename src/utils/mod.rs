//! Miscellaneous helpers.

pub mod file_system;

/// Converts a vector of string slices into owned strings.
pub fn to_owned(args: Vec<&str>) -> Vec<String> {
    args.into_iter().map(String::from).collect()
}

/// Returns the platform-specific name of an executable.
#[cfg(target_os = "windows")]
pub fn find_executable(name: &str) -> String {
    format!("{}.exe", name)
}

/// Returns the platform-specific name of an executable.
#[cfg(not(target_os = "windows"))]
pub fn find_executable(name: &str) -> String {
    name.to_string()
}
