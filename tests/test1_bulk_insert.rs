use sql_session::{Session, SqlSessionError};

fn open_session() -> Session {
    sql_session::memory::register();
    Session::open("memory", "").expect("open memory session")
}

#[test]
fn one_execute_inserts_one_row_per_element() -> Result<(), SqlSessionError> {
    let session = open_session();
    session.statement("CREATE TABLE Dummy (data INTEGER)").run()?;

    let data: Vec<i64> = (0..100).collect();
    let affected = session
        .statement("INSERT INTO Dummy VALUES(:data)")
        .bind_each(&data)
        .run()?;
    assert_eq!(affected, 100);

    let mut count = 0i64;
    session
        .statement("SELECT COUNT(*) FROM Dummy")
        .fetch(&mut count)
        .run()?;
    assert_eq!(count, 100);

    let mut fetched: Vec<i64> = Vec::new();
    session
        .statement("SELECT * FROM Dummy")
        .fetch_all(&mut fetched)
        .run()?;
    assert_eq!(fetched, (0..100).collect::<Vec<i64>>());
    Ok(())
}

#[test]
fn scalar_bindings_repeat_across_bulk_elements() -> Result<(), SqlSessionError> {
    let session = open_session();
    session
        .statement("CREATE TABLE Pair (tag TEXT, value INTEGER)")
        .run()?;

    let tag = "batch-1".to_string();
    let values: Vec<i64> = vec![10, 20, 30];
    let affected = session
        .statement("INSERT INTO Pair VALUES(:tag, :value)")
        .bind(&tag)
        .bind_each(&values)
        .run()?;
    assert_eq!(affected, 3);

    // each output binding consumes one column of the two-column rows
    let mut tags: Vec<String> = Vec::new();
    let mut vals: Vec<i64> = Vec::new();
    session
        .statement("SELECT * FROM Pair")
        .fetch_all(&mut tags)
        .fetch_all(&mut vals)
        .run()?;
    assert_eq!(
        tags.into_iter().zip(vals).collect::<Vec<_>>(),
        vec![
            ("batch-1".to_string(), 10),
            ("batch-1".to_string(), 20),
            ("batch-1".to_string(), 30),
        ]
    );
    Ok(())
}

#[test]
fn sets_and_map_values_bind_in_iteration_order() -> Result<(), SqlSessionError> {
    use std::collections::{BTreeMap, BTreeSet};

    let session = open_session();
    session.statement("CREATE TABLE S (data INTEGER)").run()?;

    let set: BTreeSet<i64> = [3, 1, 2].into_iter().collect();
    session
        .statement("INSERT INTO S VALUES(:data)")
        .bind_set(&set)
        .run()?;

    let mut fetched: Vec<i64> = Vec::new();
    session
        .statement("SELECT * FROM S")
        .fetch_all(&mut fetched)
        .run()?;
    assert_eq!(fetched, vec![1, 2, 3]);

    session.statement("DELETE FROM S").run()?;
    let map: BTreeMap<&str, i64> = [("a", 7), ("b", 8)].into_iter().collect();
    session
        .statement("INSERT INTO S VALUES(:data)")
        .bind_map(&map)
        .run()?;

    let mut count = 0i64;
    session
        .statement("SELECT COUNT(*) FROM S")
        .fetch(&mut count)
        .run()?;
    assert_eq!(count, 2);
    Ok(())
}
