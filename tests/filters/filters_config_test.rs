#[cfg(test)]
mod tests {
    use dbsync::config::{Catalog, IncludeTable, ReverseEngineering, Schema};
    use dbsync::filters::{compile, FilterError, FiltersConfig, PatternFilter, TableFilter};

    #[test]
    fn test_empty_tree_imports_everything() {
        let filters = compile(&ReverseEngineering::new()).unwrap();
        assert_eq!(filters, FiltersConfig::everything());

        let tables = filters.table_filter(None, None).unwrap();
        assert!(tables.is_include_table("ANYTHING"));
        assert_eq!(
            tables.include_table_column_filter("ANYTHING"),
            Some(&PatternFilter::IncludeEverything)
        );
        assert_eq!(
            filters.procedures_filter(None, None),
            Some(&PatternFilter::IncludeNothing)
        );
    }

    #[test]
    fn test_undeclared_scope_has_no_filter() {
        let tree = ReverseEngineering::new().schema(Schema::new("PUBLIC"));
        let filters = compile(&tree).unwrap();

        assert!(filters.table_filter(None, Some("PUBLIC")).is_some());
        assert!(filters.table_filter(None, Some("OTHER")).is_none());
        assert!(filters.table_filter(None, None).is_none());
        assert!(filters.table_filter(Some("APP"), Some("PUBLIC")).is_none());
    }

    #[test]
    fn test_patterns_match_whole_names() {
        let tree = ReverseEngineering::new().include_table(IncludeTable::new("ART.*"));
        let tables = compile(&tree).unwrap();
        let tables = tables.table_filter(None, None).unwrap();

        assert!(tables.is_include_table("ARTIST"));
        assert!(tables.is_include_table("ART"));
        assert!(!tables.is_include_table("XARTIST"));
        assert!(!tables.is_include_table("artist"));
    }

    #[test]
    fn test_first_matching_include_supplies_columns() {
        let tree = ReverseEngineering::new()
            .include_table(IncludeTable::new("ARTIST").exclude_column("SECRET"))
            .include_table(IncludeTable::new("ART.*").include_column("NAME"));
        let filters = compile(&tree).unwrap();
        let tables = filters.table_filter(None, None).unwrap();

        let artist = tables.include_table_column_filter("ARTIST").unwrap();
        assert!(artist.is_included("NAME"));
        assert!(artist.is_included("BIRTH_DATE"));
        assert!(!artist.is_included("SECRET"));

        let artwork = tables.include_table_column_filter("ARTWORK").unwrap();
        assert!(artwork.is_included("NAME"));
        assert!(!artwork.is_included("BIRTH_DATE"));
    }

    #[test]
    fn test_excludes_win_over_includes() {
        let tree = ReverseEngineering::new()
            .include_table(IncludeTable::new("SYS_LOG"))
            .include_table(IncludeTable::all())
            .exclude_table("SYS_.*");
        let filters = compile(&tree).unwrap();
        let tables = filters.table_filter(None, None).unwrap();

        assert!(!tables.is_include_table("SYS_LOG"));
        assert!(!tables.is_include_table("SYS_USERS"));
        assert!(tables.is_include_table("ARTIST"));
    }

    #[test]
    fn test_catalog_rules_stay_in_catalog() {
        let tree = ReverseEngineering::new()
            .catalog(Catalog::new("APP1").exclude_table("TMP_.*"))
            .catalog(Catalog::new("APP2"));
        let filters = compile(&tree).unwrap();

        let app1 = filters.table_filter(Some("APP1"), None).unwrap();
        let app2 = filters.table_filter(Some("APP2"), None).unwrap();
        assert!(!app1.is_include_table("TMP_X"));
        assert!(app2.is_include_table("TMP_X"));
    }

    #[test]
    fn test_case_insensitive_hint() {
        let tree = ReverseEngineering::new()
            .case_sensitive(false)
            .include_table(IncludeTable::new("artist"))
            .include_table(IncludeTable::new("painting").case_sensitive(true));
        let filters = compile(&tree).unwrap();
        let tables = filters.table_filter(None, None).unwrap();

        assert!(tables.is_include_table("ARTIST"));
        assert!(tables.is_include_table("painting"));
        assert!(!tables.is_include_table("PAINTING"));
    }

    #[test]
    fn test_procedure_rules() {
        let tree = ReverseEngineering::new()
            .include_procedure("get_.*")
            .exclude_procedure("get_secret");
        let filters = compile(&tree).unwrap();
        let procedures = filters.procedures_filter(None, None).unwrap();

        assert!(procedures.is_included("get_artist"));
        assert!(!procedures.is_included("get_secret"));
        assert!(!procedures.is_included("set_artist"));
    }

    #[test]
    fn test_invalid_pattern_fails_before_loading() {
        let tree = ReverseEngineering::new().schema(Schema::new("PUBLIC").exclude_table("SYS_("));
        let err = compile(&tree).unwrap_err();
        assert!(matches!(err, FilterError::InvalidPattern { ref pattern, .. } if pattern == "SYS_("));
    }

    #[test]
    fn test_helpers() {
        let filters = FiltersConfig::create(
            Some("APP"),
            Some("PUBLIC"),
            TableFilter::include(Some("ARTIST")).unwrap(),
            PatternFilter::IncludeNothing,
        );
        let tables = filters.table_filter(Some("APP"), Some("PUBLIC")).unwrap();
        assert!(tables.is_include_table("ARTIST"));
        assert!(!tables.is_include_table("PAINTING"));
        assert!(TableFilter::include(None).unwrap().is_include_table("PAINTING"));
    }

    #[test]
    fn test_compiled_display() {
        let tree = ReverseEngineering::new()
            .catalog(Catalog::new("APP").schema(Schema::new("PUBLIC")))
            .exclude_table("SYS_.*")
            .include_procedure("p1");
        let filters = compile(&tree).unwrap();

        insta::assert_snapshot!(filters.to_string(), @r"
        FiltersConfig:
          Catalog: APP
            Schema: PUBLIC
              IncludeTable: null
              ExcludeTable: SYS_.*
              IncludeProcedure: p1
        ");
    }
}
