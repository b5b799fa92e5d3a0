#[cfg(test)]
mod manifest_tests;

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::config::ConfigFormat;

    #[test]
    fn test_format_from_path() {
        assert_eq!(ConfigFormat::from_path(Path::new("subs.json")), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_path(Path::new("subs.JSON")), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_path(Path::new("subs.ini")), None);
        assert_eq!(ConfigFormat::from_path(Path::new("subs")), None);
    }

    #[test]
    fn test_format_extension() {
        assert_eq!(ConfigFormat::Json.extension(), "json");
    }

    #[cfg(feature = "yaml-config")]
    #[test]
    fn test_yaml_format() {
        assert_eq!(ConfigFormat::from_path(Path::new("subs.yml")), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_path(Path::new("subs.yaml")), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::Yaml.extension(), "yaml");
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_toml_format() {
        assert_eq!(ConfigFormat::from_path(Path::new("subs.toml")), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::Toml.extension(), "toml");
    }
}
