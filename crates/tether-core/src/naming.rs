//! Package file naming: `<name>-<version>`.

use crate::version::Version;

/// Split a file stem such as `rings-of-power-1.0.0` into name and version.
///
/// The split happens at the last `-` whose suffix is a valid version. A stem
/// without such a suffix is returned whole with no version.
pub fn split_package_file_name(stem: &str) -> (String, Option<Version>) {
    if let Some((name, version)) = stem.rsplit_once('-') {
        if !name.is_empty() {
            if let Ok(version) = Version::parse(version) {
                return (name.to_string(), Some(version));
            }
        }
    }
    (stem.to_string(), None)
}

/// The file stem a package is published under.
pub fn package_file_stem(name: &str, version: &Version) -> String {
    format!("{name}-{version}")
}
