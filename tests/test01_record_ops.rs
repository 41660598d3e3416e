use table_dao::prelude::*;

fn people_dao() -> Result<(Dao, TableConfig), Box<dyn std::error::Error>> {
    let dao = Dao::open(&DaoOptions::in_memory())?;
    dao.execute_batch(
        r#"
        CREATE TABLE people (
            id_people INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            age INTEGER,
            status TEXT
        );
        "#,
    )?;
    Ok((dao, TableConfig::new("people")))
}

#[test]
fn insert_then_select_id_round_trips() -> Result<(), Box<dyn std::error::Error>> {
    let (dao, people) = people_dao()?;
    let table = dao.table(&people);

    let id = table.insert(&Criteria::new().with("name", "a").with("age", 5_i64))?;
    let row = table.select_id(id)?.ok_or("inserted row not found")?;

    assert_eq!(row.get("id_people"), Some(&RowValues::Int(id)));
    assert_eq!(row.get("name"), Some(&RowValues::Text("a".into())));
    assert_eq!(row.get("age"), Some(&RowValues::Int(5)));
    assert_eq!(row.get("status"), Some(&RowValues::Null));
    Ok(())
}

#[test]
fn select_id_missing_is_none() -> Result<(), Box<dyn std::error::Error>> {
    let (dao, people) = people_dao()?;
    assert!(dao.table(&people).select_id(42_i64)?.is_none());
    Ok(())
}

#[test]
fn select_id_rejects_multiple_matches() -> Result<(), Box<dyn std::error::Error>> {
    let dao = Dao::open(&DaoOptions::in_memory())?;
    dao.execute_batch(
        "CREATE TABLE tags (id_tags INTEGER, label TEXT);
         INSERT INTO tags VALUES (1, 'x'), (1, 'y');",
    )?;
    let tags = TableConfig::new("tags");
    match dao.table(&tags).select_id(1_i64) {
        Err(TableDaoError::Cardinality { expected, found }) => {
            assert_eq!(expected, 1);
            assert_eq!(found, 2);
        }
        other => panic!("expected cardinality error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn update_and_delete_by_id() -> Result<(), Box<dyn std::error::Error>> {
    let (dao, people) = people_dao()?;
    let table = dao.table(&people);
    let id = table.insert(&Criteria::new().with("name", "b").with("age", 30_i64))?;

    let changed = table.update(id, &Criteria::new().with("age", 31_i64))?;
    assert_eq!(changed, 1);
    let row = table.select_id(id)?.ok_or("row vanished")?;
    assert_eq!(row.get("age"), Some(&RowValues::Int(31)));
    assert_eq!(row.get("name"), Some(&RowValues::Text("b".into())));

    assert_eq!(table.delete_id(id)?, 1);
    assert!(table.select_id(id)?.is_none());
    assert_eq!(table.delete_id(id)?, 0);
    Ok(())
}

#[test]
fn where_operations_with_in_lists() -> Result<(), Box<dyn std::error::Error>> {
    let (dao, people) = people_dao()?;
    let table = dao.table(&people);
    for (name, status) in [("a", "active"), ("b", "active"), ("c", "banned"), ("d", "new")] {
        table.insert(&Criteria::new().with("name", name).with("status", status))?;
    }

    let active = table.select_where(&Criteria::new().with("status", "active"))?;
    assert_eq!(active.len(), 2);

    let some = table.select_where(&Criteria::new().with("status", vec!["banned", "new"]))?;
    let names: Vec<_> = some.iter().filter_map(|r| r.get("name").cloned()).collect();
    assert_eq!(
        names,
        vec![RowValues::Text("c".into()), RowValues::Text("d".into())]
    );

    assert_eq!(table.count_where(None)?, 4);
    assert_eq!(
        table.count_where(Some(&Criteria::new().with("status", "active")))?,
        2
    );

    let changed = table.update_where(
        &Criteria::new().with("status", "archived"),
        &Criteria::new().with("status", "active"),
    )?;
    assert_eq!(changed, 2);

    let removed = table.delete_where(&Criteria::new().with("status", "archived"))?;
    assert_eq!(removed, 2);
    assert_eq!(table.select()?.len(), 2);
    Ok(())
}

#[test]
fn select_where_is_repeatable() -> Result<(), Box<dyn std::error::Error>> {
    let (dao, people) = people_dao()?;
    let table = dao.table(&people);
    table.insert(&Criteria::new().with("name", "x").with("age", 1_i64))?;
    table.insert(&Criteria::new().with("name", "y").with("age", 1_i64))?;

    let criteria = Criteria::new().with("age", 1_i64);
    let first = table.select_where(&criteria)?;
    let second = table.select_where(&criteria)?;
    assert_eq!(first.results, second.results);
    assert_eq!(first.len(), 2);
    Ok(())
}

#[test]
fn delete_range_binds_every_id() -> Result<(), Box<dyn std::error::Error>> {
    let (dao, people) = people_dao()?;
    let table = dao.table(&people);
    let ids: Vec<RowValues> = ["a", "b", "c"]
        .into_iter()
        .map(|n| table.insert(&Criteria::new().with("name", n)).map(RowValues::Int))
        .collect::<Result<_, _>>()?;

    assert_eq!(table.delete_range(&ids[..2])?, 2);
    assert_eq!(table.count_where(None)?, 1);

    // A hostile "id" is just a value that matches nothing.
    let hostile = [RowValues::Text("1) OR (1=1".into())];
    assert_eq!(table.delete_range(&hostile)?, 0);
    assert_eq!(table.count_where(None)?, 1);

    assert!(matches!(
        table.delete_range(&[]),
        Err(TableDaoError::InvalidInput(_))
    ));
    Ok(())
}

#[test]
fn malformed_input_is_rejected_before_execution() -> Result<(), Box<dyn std::error::Error>> {
    let (dao, people) = people_dao()?;
    let table = dao.table(&people);

    assert!(matches!(
        table.select_where(&Criteria::new()),
        Err(TableDaoError::InvalidInput(_))
    ));
    assert!(matches!(
        table.delete_where(&Criteria::new()),
        Err(TableDaoError::InvalidInput(_))
    ));
    assert!(matches!(
        table.insert(&Criteria::new().with("name", vec!["a", "b"])),
        Err(TableDaoError::InvalidInput(_))
    ));
    assert!(matches!(
        table.update(1_i64, &Criteria::new()),
        Err(TableDaoError::InvalidInput(_))
    ));
    Ok(())
}

#[test]
fn driver_errors_propagate() -> Result<(), Box<dyn std::error::Error>> {
    let (dao, _) = people_dao()?;
    let missing = TableConfig::new("no_such_table");
    assert!(matches!(
        dao.table(&missing).select(),
        Err(TableDaoError::SqliteError(_))
    ));

    let people = TableConfig::new("people");
    // name is NOT NULL
    let result = dao.table(&people).insert(&Criteria::new().with("age", 3_i64));
    assert!(matches!(result, Err(TableDaoError::SqliteError(_))));
    Ok(())
}

#[test]
fn numeric_fetch_mode_keys_by_position() -> Result<(), Box<dyn std::error::Error>> {
    let (dao, _) = people_dao()?;
    let people = TableConfig::new("people").with_fetch_mode(FetchMode::Numeric);
    let id = dao
        .table(&people)
        .insert(&Criteria::new().with("name", "n").with("age", 9_i64))?;

    let row = dao.table(&people).select_id(id)?.ok_or("row missing")?;
    assert_eq!(row.get("0"), Some(&RowValues::Int(id)));
    assert_eq!(row.get("1"), Some(&RowValues::Text("n".into())));
    assert_eq!(row.get("name"), None);
    Ok(())
}

#[test]
fn colliding_placeholders_leave_rows_untouched() -> Result<(), Box<dyn std::error::Error>> {
    let dao = Dao::open(&DaoOptions::in_memory())?;
    dao.execute_batch(
        "CREATE TABLE pairs (id_pairs INTEGER PRIMARY KEY, b INTEGER, b_1 INTEGER);
         INSERT INTO pairs (b, b_1) VALUES (2, 9), (3, 9), (9, 9);",
    )?;
    let pairs = TableConfig::new("pairs");

    // `b` as a list and `b_1` as a scalar would both name `:w_b_1`.
    let criteria = Criteria::new().with("b", vec![2_i64, 3]).with("b_1", 9_i64);
    let result = dao.table(&pairs).delete_where(&criteria);
    assert!(matches!(result, Err(TableDaoError::InvalidInput(_))));
    assert_eq!(dao.table(&pairs).select()?.len(), 3);
    Ok(())
}
