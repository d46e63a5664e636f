#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use dbsync::config::{IncludeTable, ReverseEngineering, Schema, Settings, SettingsError, SourceLocation};
    use dbsync::filters::{compile, PatternFilter};

    const CONFIG: &str = r#"
[source]
snapshot = "${DBSYNC_SETTINGS_TEST_DIR}/gallery.json"

[map]
name = "gallery"

[reverse_engineering]
table_types = ["TABLE"]
case_sensitive = false
exclude_tables = ["sys_.*"]

[[reverse_engineering.catalogs]]
name = "APP"
include_procedures = ["get_.*"]

[[reverse_engineering.catalogs.schemas]]
name = "PUBLIC"
include_tables = [
    { pattern = "ARTIST", exclude_columns = ["SECRET"] },
    { pattern = "PAINTING.*" },
]

[[reverse_engineering.catalogs.schemas]]
name = "AUDIT"
"#;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_settings_from_file() {
        let file = write_config(CONFIG);
        let settings = Settings::from_file(file.path()).unwrap();

        assert_eq!(settings.map.name, "gallery");

        let tree = &settings.reverse_engineering;
        assert_eq!(tree.table_types, vec!["TABLE"]);
        assert!(!tree.case_sensitive);
        assert_eq!(tree.catalogs.len(), 1);

        let app = &tree.catalogs[0];
        assert_eq!(app.filters.include_procedures, vec!["get_.*"]);
        assert_eq!(app.schemas[0].name.as_deref(), Some("PUBLIC"));
        assert_eq!(
            app.schemas[0].filters.include_tables,
            vec![
                IncludeTable::new("ARTIST").exclude_column("SECRET"),
                IncludeTable::new("PAINTING.*"),
            ]
        );
        assert_eq!(app.schemas[1], Schema::new("AUDIT"));
    }

    #[test]
    fn test_source_location_expands_env() {
        std::env::set_var("DBSYNC_SETTINGS_TEST_DIR", "/var/lib/dbsync");
        let file = write_config(CONFIG);
        let settings = Settings::from_file(file.path()).unwrap();

        assert_eq!(
            settings.source.location().unwrap(),
            SourceLocation::Snapshot(PathBuf::from("/var/lib/dbsync/gallery.json"))
        );
        std::env::remove_var("DBSYNC_SETTINGS_TEST_DIR");
    }

    #[test]
    fn test_parsed_tree_compiles() {
        let file = write_config(CONFIG);
        let settings = Settings::from_file(file.path()).unwrap();
        let filters = compile(&settings.reverse_engineering).unwrap();

        let public = filters.table_filter(Some("APP"), Some("PUBLIC")).unwrap();
        assert!(public.is_include_table("artist"));
        assert!(public.is_include_table("PAINTING_DETAIL"));
        assert!(!public.is_include_table("SYS_LOG"));
        assert!(!public.is_include_table("GALLERY"));

        let columns = public.include_table_column_filter("ARTIST").unwrap();
        assert!(columns.is_included("NAME"));
        assert!(!columns.is_included("secret"));

        let audit = filters.table_filter(Some("APP"), Some("AUDIT")).unwrap();
        assert!(audit.is_include_table("ANYTHING"));
        assert!(!audit.is_include_table("SYS_AUDIT"));

        let procedures = filters.procedures_filter(Some("APP"), Some("AUDIT")).unwrap();
        assert!(procedures.is_included("GET_LOG"));
        assert_ne!(procedures, &PatternFilter::IncludeNothing);
    }

    #[test]
    fn test_missing_file() {
        let err = Settings::from_file("/nonexistent/dbsync.toml").unwrap_err();
        assert!(matches!(err, SettingsError::FileNotFound(ref p) if p.ends_with("dbsync.toml")));
    }

    #[test]
    fn test_malformed_file() {
        let file = write_config("[reverse_engineering\nskip_procedures = true");
        let err = Settings::from_file(file.path()).unwrap_err();
        assert!(matches!(err, SettingsError::ParseError(_)));
    }

    #[test]
    fn test_empty_file_is_default() {
        let file = write_config("");
        let settings = Settings::from_file(file.path()).unwrap();

        assert_eq!(settings.reverse_engineering, ReverseEngineering::new());
        assert_eq!(settings.map.name, dbsync::config::DEFAULT_MAP_NAME);
    }
}
