#[cfg(test)]
mod tests {
    use dbsync::config::{IncludeTable, ReverseEngineering, Schema};
    use dbsync::loader::{
        CancellationFlag, DbLoader, Diagnostic, LoadContext, LoadError, LoadStatus, LoaderDelegate,
        LoaderStage,
    };
    use dbsync::metadata::{MetadataError, SqliteMetadataSource};
    use dbsync::model::{DataMap, DbAttribute, DbEntity, DbType};
    use rusqlite::Connection;

    const ART_SCHEMA: &str = "
        CREATE TABLE ARTIST (
            ARTIST_ID INTEGER PRIMARY KEY AUTOINCREMENT,
            ARTIST_NAME VARCHAR(255) NOT NULL,
            DATE_OF_BIRTH DATE
        );
        CREATE TABLE PAINTING (
            PAINTING_ID INTEGER PRIMARY KEY,
            ARTIST_ID INTEGER REFERENCES ARTIST,
            PAINTING_TITLE VARCHAR(255) NOT NULL,
            ESTIMATED_PRICE DECIMAL(10, 2)
        );
        CREATE VIEW PAINTING_VIEW AS SELECT PAINTING_ID, PAINTING_TITLE FROM PAINTING;
    ";

    fn database(extra: &str) -> SqliteMetadataSource {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(ART_SCHEMA).unwrap();
        conn.execute_batch(extra).unwrap();
        SqliteMetadataSource::from_connection(conn)
    }

    fn load(source: &SqliteMetadataSource, tree: &ReverseEngineering) -> (DataMap, Vec<Diagnostic>) {
        let mut loader = DbLoader::from_config(source, tree).unwrap();
        let mut ctx = LoadContext::new(DataMap::new("art"));
        loader.run(&mut ctx).unwrap();
        let diagnostics = ctx.diagnostics().to_vec();
        (ctx.into_data_map(), diagnostics)
    }

    #[test]
    fn test_artist_painting() {
        let source = database("");
        let (map, diagnostics) = load(&source, &ReverseEngineering::new());

        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        let names: Vec<_> = map.entities().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["ARTIST", "PAINTING", "PAINTING_VIEW"]);

        let artist = map.entity("ARTIST").unwrap();
        assert_eq!(artist.table_type, "TABLE");
        let id = artist.attribute("ARTIST_ID").unwrap();
        assert_eq!(id.db_type, DbType::Integer);
        assert!(id.primary_key);
        assert!(id.mandatory);
        assert!(id.generated);

        let name = artist.attribute("ARTIST_NAME").unwrap();
        assert_eq!(name.db_type, DbType::Varchar);
        assert_eq!(name.max_length, Some(255));
        assert!(name.mandatory);
        assert!(!artist.attribute("DATE_OF_BIRTH").unwrap().mandatory);

        let paintings = artist.relationship("paintings").unwrap();
        assert!(paintings.to_many);
        assert_eq!(paintings.target_entity, "PAINTING");

        let painting = map.entity("PAINTING").unwrap();
        let price = painting.attribute("ESTIMATED_PRICE").unwrap();
        assert_eq!(price.db_type, DbType::Decimal);
        assert_eq!((price.max_length, price.scale), (Some(10), Some(2)));

        let to_artist = painting.relationship("artist").unwrap();
        assert!(!to_artist.to_many);
        assert_eq!(to_artist.target_entity, "ARTIST");
        assert_eq!(to_artist.fk_name.as_deref(), Some("fk_PAINTING_0"));
        assert_eq!(to_artist.joins.len(), 1);
        assert_eq!(to_artist.joins[0].source, "ARTIST_ID");

        let view = map.entity("PAINTING_VIEW").unwrap();
        assert!(view.is_view());
        assert!(view.relationships.is_empty());
    }

    #[test]
    fn test_summary() {
        let source = database("");
        let (map, _) = load(&source, &ReverseEngineering::new());

        insta::assert_snapshot!(map.to_string(), @r"
        DataMap: art
          ARTIST (3 attributes) paintings ->> PAINTING
          PAINTING (4 attributes) artist -> ARTIST
          PAINTING_VIEW (2 attributes)
        ");
    }

    #[test]
    fn test_excluded_tables_are_not_related() {
        let source = database(
            "CREATE TABLE SYS_AUDIT (ID INTEGER PRIMARY KEY, ARTIST_ID INTEGER REFERENCES ARTIST);",
        );
        let tree = ReverseEngineering::new().exclude_table("SYS_.*");
        let (map, diagnostics) = load(&source, &tree);

        assert!(map.entity("SYS_AUDIT").is_none());
        let artist = map.entity("ARTIST").unwrap();
        assert_eq!(artist.relationships.len(), 1);
        assert!(diagnostics.iter().any(|d| matches!(
            d,
            Diagnostic::ExportedKeySkipped { reason, .. } if reason.contains("SYS_AUDIT")
        )));
    }

    #[test]
    fn test_composite_foreign_key() {
        let source = database(
            "
            CREATE TABLE EXHIBIT (
                GALLERY_ID INTEGER NOT NULL,
                EXHIBIT_NO INTEGER NOT NULL,
                PRIMARY KEY (GALLERY_ID, EXHIBIT_NO)
            );
            CREATE TABLE EXHIBIT_ITEM (
                ITEM_ID INTEGER PRIMARY KEY,
                GALLERY_ID INTEGER,
                EXHIBIT_NO INTEGER,
                FOREIGN KEY (GALLERY_ID, EXHIBIT_NO) REFERENCES EXHIBIT (GALLERY_ID, EXHIBIT_NO)
            );
            ",
        );
        let (map, _) = load(&source, &ReverseEngineering::new());

        let exhibit = map.entity("EXHIBIT").unwrap();
        assert_eq!(exhibit.primary_keys().count(), 2);
        let items = exhibit.relationship("exhibitItems").unwrap();
        assert!(items.to_many);
        let joins: Vec<_> = items.joins.iter().map(|j| j.source.as_str()).collect();
        assert_eq!(joins, ["GALLERY_ID", "EXHIBIT_NO"]);

        let item = map.entity("EXHIBIT_ITEM").unwrap();
        let to_exhibit = item.relationship("exhibit").unwrap();
        assert!(!to_exhibit.to_many);
        assert_eq!(to_exhibit.joins.len(), 2);
    }

    #[test]
    fn test_dependent_primary_key_is_one_to_one() {
        let source = database(
            "CREATE TABLE ARTIST_DETAIL (
                ARTIST_ID INTEGER PRIMARY KEY REFERENCES ARTIST,
                BIOGRAPHY TEXT
            );",
        );
        let (map, _) = load(&source, &ReverseEngineering::new());

        let artist = map.entity("ARTIST").unwrap();
        let detail = artist.relationship("artistDetail").unwrap();
        assert!(!detail.to_many);
        assert!(detail.to_dependent_pk);

        let back = map.entity("ARTIST_DETAIL").unwrap().relationship("artist").unwrap();
        assert!(!back.to_many);
        assert!(!back.to_dependent_pk);
    }

    #[test]
    fn test_self_reference_gets_distinct_names() {
        let source = database(
            "CREATE TABLE CATEGORY (
                CATEGORY_ID INTEGER PRIMARY KEY,
                PARENT_ID INTEGER REFERENCES CATEGORY
            );",
        );
        let (map, _) = load(&source, &ReverseEngineering::new());

        let category = map.entity("CATEGORY").unwrap();
        let parent = category.relationship("parent").unwrap();
        assert!(!parent.to_many);
        let children = category.relationship("categories").unwrap();
        assert!(children.to_many);
        assert_eq!(children.target_entity, "CATEGORY");
    }

    #[test]
    fn test_table_types_and_columns() {
        let source = database("");
        let tree = ReverseEngineering::new()
            .table_type("TABLE")
            .include_table(IncludeTable::all().exclude_column("DATE_OF_BIRTH|ESTIMATED_.*"));
        let (map, _) = load(&source, &tree);

        assert!(map.entity("PAINTING_VIEW").is_none());
        assert!(map.entity("ARTIST").unwrap().attribute("DATE_OF_BIRTH").is_none());
        assert!(map.entity("PAINTING").unwrap().attribute("ESTIMATED_PRICE").is_none());
        assert!(map.entity("PAINTING").unwrap().attribute("PAINTING_TITLE").is_some());
    }

    #[test]
    fn test_case_insensitive_patterns() {
        let source = database("");
        let tree = ReverseEngineering::new()
            .case_sensitive(false)
            .include_table(IncludeTable::new("artist"));
        let (map, _) = load(&source, &tree);

        let names: Vec<_> = map.entities().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["ARTIST"]);
    }

    #[test]
    fn test_main_schema_uses_requested_rules() {
        let source = database("");
        let tree = ReverseEngineering::new()
            .schema(Schema::new("main").include_table(IncludeTable::new("PAINTING")));
        let (map, _) = load(&source, &tree);

        let names: Vec<_> = map.entities().map(|e| e.qualified_name()).collect();
        assert_eq!(names, ["PAINTING"]);
    }

    #[test]
    fn test_unknown_schema_is_fatal() {
        let source = database("");
        let tree = ReverseEngineering::new().schema(Schema::new("warehouse"));
        let mut loader = DbLoader::from_config(&source, &tree).unwrap();
        let mut ctx = LoadContext::new(DataMap::new("art"));

        let err = loader.run(&mut ctx).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Metadata {
                stage: LoaderStage::Entities,
                source: MetadataError::UnknownSchema(ref s),
            } if s == "warehouse"
        ));
        assert_eq!(
            ctx.status(),
            LoadStatus::Incomplete {
                stage: LoaderStage::Entities
            }
        );
    }

    fn existing_map() -> DataMap {
        let mut artist = DbEntity::new("ARTIST", None, None, "TABLE");
        artist.add_attribute(DbAttribute::new("LEGACY", DbType::Char));
        let mut map = DataMap::new("art");
        map.add_entity(artist);
        map
    }

    #[test]
    fn test_merge_keeps_existing_entities() {
        let source = database("");
        let mut loader = DbLoader::from_config(&source, &ReverseEngineering::new()).unwrap();
        let mut ctx = LoadContext::new(existing_map());
        loader.run(&mut ctx).unwrap();

        assert_eq!(
            ctx.diagnostics(),
            [
                Diagnostic::EntitySkipped {
                    entity: "ARTIST".to_string()
                },
                Diagnostic::MissingPrimaryKey {
                    entity: "ARTIST".to_string()
                },
                Diagnostic::InvalidJoin {
                    entity: "ARTIST".to_string(),
                    column: "ARTIST_ID".to_string()
                },
            ]
        );
        let map = ctx.into_data_map();
        let artist = map.entity("ARTIST").unwrap();
        assert!(artist.attribute("LEGACY").is_some());
        assert!(artist.attribute("ARTIST_ID").is_none());
        assert!(map.entity("PAINTING").unwrap().relationships.is_empty());
    }

    #[test]
    fn test_merge_relates_new_entities_to_kept_ones() {
        let mut id = DbAttribute::new("ARTIST_ID", DbType::Integer);
        id.primary_key = true;
        let mut artist = DbEntity::new("ARTIST", None, None, "TABLE");
        artist.add_attribute(id);
        let mut existing = DataMap::new("art");
        existing.add_entity(artist);

        let source = database("");
        let map = DbLoader::from_config(&source, &ReverseEngineering::new())
            .unwrap()
            .load(Some(existing))
            .unwrap();

        let to_artist = map.entity("PAINTING").unwrap().relationship("artist").unwrap();
        assert_eq!(to_artist.target_entity, "ARTIST");
        assert!(!to_artist.to_many);
        assert_eq!(to_artist.joins[0].source, "ARTIST_ID");

        let artist = map.entity("ARTIST").unwrap();
        assert!(artist.relationships.is_empty());
        assert_eq!(artist.attributes.len(), 1);
    }

    #[test]
    fn test_merge_leaves_keys_between_kept_entities() {
        let mut existing = DataMap::new("art");
        for name in ["ARTIST", "PAINTING"] {
            let mut id = DbAttribute::new("ARTIST_ID", DbType::Integer);
            id.primary_key = name == "ARTIST";
            let mut entity = DbEntity::new(name, None, None, "TABLE");
            entity.add_attribute(id);
            existing.add_entity(entity);
        }

        let source = database("");
        let mut loader = DbLoader::from_config(&source, &ReverseEngineering::new()).unwrap();
        let mut ctx = LoadContext::new(existing);
        loader.run(&mut ctx).unwrap();

        assert_eq!(ctx.store().exported_keys().count(), 0);
        let map = ctx.into_data_map();
        assert!(map.entity("ARTIST").unwrap().relationships.is_empty());
        assert!(map.entity("PAINTING").unwrap().relationships.is_empty());
        assert!(map.entity("PAINTING_VIEW").is_some());
    }

    struct Overwrite;

    impl LoaderDelegate for Overwrite {
        fn overwrite_entity(&mut self, _existing: &DbEntity) -> bool {
            true
        }
    }

    #[test]
    fn test_merge_overwrites_when_asked() {
        let source = database("");
        let mut delegate = Overwrite;
        let map = DbLoader::from_config(&source, &ReverseEngineering::new())
            .unwrap()
            .with_delegate(&mut delegate)
            .load(Some(existing_map()))
            .unwrap();

        assert_eq!(map.name, "art");
        let artist = map.entity("ARTIST").unwrap();
        assert!(artist.attribute("LEGACY").is_none());
        assert!(artist.relationship("paintings").is_some());
    }

    struct CancelAfterFirst(CancellationFlag);

    impl LoaderDelegate for CancelAfterFirst {
        fn entity_added(&mut self, _entity: &DbEntity) {
            self.0.cancel();
        }
    }

    #[test]
    fn test_cancellation_stops_at_stage_boundary() {
        let source = database("");
        let flag = CancellationFlag::new();
        let mut delegate = CancelAfterFirst(flag.clone());
        let mut loader = DbLoader::from_config(&source, &ReverseEngineering::new())
            .unwrap()
            .with_cancellation(flag)
            .with_delegate(&mut delegate);
        let mut ctx = LoadContext::new(DataMap::new("art"));

        let err = loader.run(&mut ctx).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Cancelled { ref completed } if completed == &[LoaderStage::Entities]
        ));
        assert_eq!(
            ctx.status(),
            LoadStatus::Incomplete {
                stage: LoaderStage::Attributes
            }
        );
        assert_eq!(ctx.store().entities().count(), 3);
        assert_eq!(ctx.map().entities().count(), 0);
    }

    #[test]
    fn test_open_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("art.db");
        Connection::open(&path).unwrap().execute_batch(ART_SCHEMA).unwrap();

        let source = SqliteMetadataSource::open(&path).unwrap();
        let map = DbLoader::from_config(&source, &ReverseEngineering::new())
            .unwrap()
            .load(None)
            .unwrap();

        assert_eq!(map.name, "dbsync_import");
        assert_eq!(map.entities().count(), 3);

        let json = serde_json::to_string(&map).unwrap();
        let back: DataMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }
}
