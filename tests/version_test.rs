use pkgbaker::version::{version_floor, Version};

fn floor(version: &str) -> String {
    version_floor(&version.parse::<Version>().unwrap())
}

#[test]
fn test_version_floor_without_prerelease() {
    assert_eq!(floor("1.2.0"), "1.2");
    assert_eq!(floor("1.2.3"), "1.2");
    assert_eq!(floor("0.7.0"), "0.7");
}

#[test]
fn test_version_floor_with_prerelease() {
    assert_eq!(floor("1.3.0-beta"), "1.3-");
    assert_eq!(floor("1.3.1-beta"), "1.3");
    assert_eq!(floor("1.0.0-rc1+build"), "1.0-");
}

#[test]
fn test_major_minor_drops_prerelease() {
    let version: Version = "1.3.0-beta".parse().unwrap();
    assert_eq!(version.major_minor(), "1.3");
}

#[test]
fn test_version_deserializes_from_string() {
    let version: Version = serde_json::from_str("\"1.1.0\"").unwrap();
    assert_eq!(version, Version::new(1, 1, 0));

    assert!(serde_json::from_str::<Version>("\"one\"").is_err());
}
