#[cfg(test)]
mod tests {
    use dbsync::config::{Catalog, IncludeTable, ReverseEngineering, Schema};
    use dbsync::filters::{compact, FiltersConfigBuilder};

    /// Join rendered lines; the header keeps its trailing space.
    fn lines(lines: &[&str]) -> String {
        let mut out = String::new();
        for line in lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    fn include_table(name: &str, include_column: &str, exclude_column: &str) -> IncludeTable {
        IncludeTable::new(name)
            .include_column(include_column)
            .exclude_column(exclude_column)
    }

    #[test]
    fn test_global_tables_get_global_columns() {
        let tree = ReverseEngineering::new()
            .include_table(IncludeTable::new("table1"))
            .include_table(IncludeTable::new("table2"))
            .include_table(IncludeTable::new("table3"))
            .include_column("includeColumn");

        assert_eq!(
            compact(&tree).to_string(),
            lines(&[
                "ReverseEngineering: ",
                "  Catalog: null",
                "    Schema: null",
                "      IncludeTable: table1",
                "        IncludeColumn: includeColumn",
                "      IncludeTable: table2",
                "        IncludeColumn: includeColumn",
                "      IncludeTable: table3",
                "        IncludeColumn: includeColumn",
            ])
        );
    }

    #[test]
    fn test_root_schemas_move_under_catalog() {
        let tree = ReverseEngineering::new()
            .catalog(Catalog::new("catalogName"))
            .schema(Schema::new("schemaName01"))
            .schema(Schema::new("schemaName02"))
            .include_table(IncludeTable::new("table1"))
            .exclude_table("table2")
            .include_column("includeColumn");

        assert_eq!(
            compact(&tree).to_string(),
            lines(&[
                "ReverseEngineering: ",
                "  Catalog: catalogName",
                "    Schema: schemaName01",
                "      IncludeTable: table1",
                "        IncludeColumn: includeColumn",
                "      ExcludeTable: table2",
                "    Schema: schemaName02",
                "      IncludeTable: table1",
                "        IncludeColumn: includeColumn",
                "      ExcludeTable: table2",
            ])
        );
    }

    #[test]
    fn test_global_excludes_reach_every_catalog() {
        let tree = ReverseEngineering::new()
            .catalog(Catalog::new("APP1"))
            .catalog(Catalog::new("APP2"))
            .exclude_table("SYS_.*")
            .exclude_column("calculated_.*");

        assert_eq!(
            compact(&tree).to_string(),
            lines(&[
                "ReverseEngineering: ",
                "  Catalog: APP1",
                "    Schema: null",
                "      IncludeTable: null",
                "        ExcludeColumn: calculated_.*",
                "      ExcludeTable: SYS_.*",
                "  Catalog: APP2",
                "    Schema: null",
                "      IncludeTable: null",
                "        ExcludeColumn: calculated_.*",
                "      ExcludeTable: SYS_.*",
            ])
        );
    }

    #[test]
    fn test_bare_schema_includes_everything() {
        let tree = ReverseEngineering::new().schema(Schema::new("s"));

        assert_eq!(
            compact(&tree).to_string(),
            lines(&[
                "ReverseEngineering: ",
                "  Catalog: null",
                "    Schema: s",
                "      IncludeTable: null",
            ])
        );
    }

    fn full_tree() -> ReverseEngineering {
        let sch01 = Schema::new("sch_01")
            .include_table(include_table("t1", "c11", "c12"))
            .exclude_table("t2")
            .include_procedure("p1")
            .exclude_procedure("p2")
            .include_column("c_x1")
            .exclude_column("c_x2");

        let cat01 = Catalog::new("cat_01")
            .schema(sch01)
            .include_table(include_table("t3", "c31", "c32"))
            .exclude_table("t4")
            .include_procedure("p3")
            .exclude_procedure("p4")
            .include_column("c_xx1")
            .exclude_column("c_xx2");

        let sch02 = Schema::new("sch_02")
            .include_table(include_table("t5", "c51", "c52"))
            .exclude_table("t6")
            .include_procedure("p5")
            .exclude_procedure("p6")
            .include_column("c2_x1")
            .exclude_column("c2_x2");

        ReverseEngineering::new()
            .catalog(cat01)
            .schema(sch02)
            .include_table(include_table("t7", "c71", "c72"))
            .exclude_table("t8")
            .include_procedure("p7")
            .exclude_procedure("p8")
            .include_column("c_xxx1")
            .exclude_column("c_xxx2")
    }

    #[test]
    fn test_full_tree_rendering() {
        assert_eq!(
            full_tree().to_string(),
            lines(&[
                "ReverseEngineering: ",
                "  Catalog: cat_01",
                "    Schema: sch_01",
                "      IncludeTable: t1",
                "        IncludeColumn: c11",
                "        ExcludeColumn: c12",
                "      ExcludeTable: t2",
                "      IncludeColumn: c_x1",
                "      ExcludeColumn: c_x2",
                "      IncludeProcedure: p1",
                "      ExcludeProcedure: p2",
                "    IncludeTable: t3",
                "      IncludeColumn: c31",
                "      ExcludeColumn: c32",
                "    ExcludeTable: t4",
                "    IncludeColumn: c_xx1",
                "    ExcludeColumn: c_xx2",
                "    IncludeProcedure: p3",
                "    ExcludeProcedure: p4",
                "  Schema: sch_02",
                "    IncludeTable: t5",
                "      IncludeColumn: c51",
                "      ExcludeColumn: c52",
                "    ExcludeTable: t6",
                "    IncludeColumn: c2_x1",
                "    ExcludeColumn: c2_x2",
                "    IncludeProcedure: p5",
                "    ExcludeProcedure: p6",
                "  IncludeTable: t7",
                "    IncludeColumn: c71",
                "    ExcludeColumn: c72",
                "  ExcludeTable: t8",
                "  IncludeColumn: c_xxx1",
                "  ExcludeColumn: c_xxx2",
                "  IncludeProcedure: p7",
                "  ExcludeProcedure: p8",
            ])
        );
    }

    #[test]
    fn test_full_tree_compaction() {
        let compacted = FiltersConfigBuilder::new(&full_tree()).compact();

        assert_eq!(
            compacted.to_string(),
            lines(&[
                "ReverseEngineering: ",
                "  Catalog: cat_01",
                "    Schema: sch_01",
                "      IncludeTable: t1",
                "        IncludeColumn: c11",
                "        IncludeColumn: c_xxx1",
                "        IncludeColumn: c_xx1",
                "        IncludeColumn: c_x1",
                "        ExcludeColumn: c12",
                "        ExcludeColumn: c_xxx2",
                "        ExcludeColumn: c_xx2",
                "        ExcludeColumn: c_x2",
                "      IncludeTable: t7",
                "        IncludeColumn: c71",
                "        IncludeColumn: c_xxx1",
                "        ExcludeColumn: c72",
                "        ExcludeColumn: c_xxx2",
                "      IncludeTable: t3",
                "        IncludeColumn: c31",
                "        IncludeColumn: c_xxx1",
                "        IncludeColumn: c_xx1",
                "        ExcludeColumn: c32",
                "        ExcludeColumn: c_xxx2",
                "        ExcludeColumn: c_xx2",
                "      ExcludeTable: t2",
                "      ExcludeTable: t8",
                "      ExcludeTable: t4",
                "      IncludeProcedure: p1",
                "      IncludeProcedure: p7",
                "      IncludeProcedure: p3",
                "      ExcludeProcedure: p2",
                "      ExcludeProcedure: p8",
                "      ExcludeProcedure: p4",
                "    Schema: sch_02",
                "      IncludeTable: t5",
                "        IncludeColumn: c51",
                "        IncludeColumn: c_xxx1",
                "        IncludeColumn: c2_x1",
                "        ExcludeColumn: c52",
                "        ExcludeColumn: c_xxx2",
                "        ExcludeColumn: c2_x2",
                "      IncludeTable: t7",
                "        IncludeColumn: c71",
                "        IncludeColumn: c_xxx1",
                "        ExcludeColumn: c72",
                "        ExcludeColumn: c_xxx2",
                "      ExcludeTable: t6",
                "      ExcludeTable: t8",
                "      IncludeProcedure: p5",
                "      IncludeProcedure: p7",
                "      ExcludeProcedure: p6",
                "      ExcludeProcedure: p8",
            ])
        );
    }

    #[test]
    fn test_compaction_is_idempotent() {
        let trees = [
            full_tree(),
            ReverseEngineering::new().schema(Schema::new("s")),
            ReverseEngineering::new()
                .catalog(Catalog::new("APP1"))
                .catalog(Catalog::new("APP2"))
                .exclude_table("SYS_.*"),
        ];
        for tree in &trees {
            let once = compact(tree);
            assert_eq!(compact(&once), once);
        }
    }

    #[test]
    fn test_compaction_leaves_input_alone() {
        let tree = full_tree();
        let before = tree.to_string();
        let _ = compact(&tree);
        assert_eq!(tree.to_string(), before);
    }
}
