use sql_session::{Session, SqlSessionError};

fn seeded_session(rows: i64) -> Result<Session, SqlSessionError> {
    sql_session::memory::register();
    let session = Session::open("memory", "")?;
    session.statement("CREATE TABLE Dummy (data INTEGER)").run()?;
    let data: Vec<i64> = (0..rows).collect();
    if !data.is_empty() {
        session
            .statement("INSERT INTO Dummy VALUES(:data)")
            .bind_each(&data)
            .run()?;
    }
    Ok(session)
}

#[test]
fn limit_partitions_retrieval_into_chunks() -> Result<(), SqlSessionError> {
    let session = seeded_session(100)?;

    let mut fetched: Vec<i64> = Vec::new();
    let mut stmt = session
        .statement("SELECT * FROM Dummy")
        .fetch_all(&mut fetched)
        .limit(50)
        .build()?;

    assert!(!stmt.done());
    let first = stmt.execute()?;
    assert_eq!(first, 50);
    assert!(!stmt.done());

    let second = stmt.execute()?;
    assert_eq!(second, 50);
    assert!(stmt.done());

    drop(stmt);
    assert_eq!(fetched, (0..100).collect::<Vec<i64>>());
    Ok(())
}

#[test]
fn uneven_final_chunk_sets_done_early() -> Result<(), SqlSessionError> {
    let session = seeded_session(70)?;

    let mut fetched: Vec<i64> = Vec::new();
    let mut stmt = session
        .statement("SELECT * FROM Dummy")
        .fetch_all(&mut fetched)
        .limit(50)
        .build()?;

    let mut calls = 0;
    let mut total = 0;
    while !stmt.done() {
        total += stmt.execute()?;
        calls += 1;
    }
    assert_eq!(calls, 2);
    assert_eq!(total, 70);

    drop(stmt);
    assert_eq!(fetched.len(), 70);
    Ok(())
}

#[test]
fn scalar_output_reflects_last_chunk_only() -> Result<(), SqlSessionError> {
    let session = seeded_session(100)?;

    let mut last = -1i64;
    let mut stmt = session
        .statement("SELECT * FROM Dummy")
        .fetch(&mut last)
        .limit(50)
        .build()?;

    stmt.execute()?;
    drop(stmt);
    assert_eq!(last, 49);

    let mut last = -1i64;
    let mut stmt = session
        .statement("SELECT * FROM Dummy")
        .fetch(&mut last)
        .limit(50)
        .build()?;
    while !stmt.done() {
        stmt.execute()?;
    }
    drop(stmt);
    assert_eq!(last, 99);
    Ok(())
}

#[test]
fn executing_a_done_statement_restarts_and_appends() -> Result<(), SqlSessionError> {
    let session = seeded_session(100)?;

    let mut fetched: Vec<i64> = Vec::new();
    let mut stmt = session
        .statement("SELECT * FROM Dummy")
        .fetch_all(&mut fetched)
        .limit(50)
        .build()?;

    stmt.execute()?;
    stmt.execute()?;
    assert!(stmt.done());

    // a further execute restarts retrieval; output keeps accumulating
    let third = stmt.execute()?;
    assert_eq!(third, 50);
    assert!(!stmt.done());

    drop(stmt);
    assert_eq!(fetched.len(), 150);
    assert_eq!(&fetched[100..], &(0..50).collect::<Vec<i64>>()[..]);
    Ok(())
}

#[test]
fn empty_table_is_done_after_one_empty_call() -> Result<(), SqlSessionError> {
    let session = seeded_session(0)?;

    let mut fetched: Vec<i64> = Vec::new();
    let mut stmt = session
        .statement("SELECT * FROM Dummy")
        .fetch_all(&mut fetched)
        .limit(50)
        .build()?;

    assert_eq!(stmt.execute()?, 0);
    assert!(stmt.done());
    drop(stmt);
    assert!(fetched.is_empty());
    Ok(())
}

#[test]
fn limit_larger_than_result_set_completes_in_one_call() -> Result<(), SqlSessionError> {
    let session = seeded_session(10)?;

    let mut fetched: Vec<i64> = Vec::new();
    let mut stmt = session
        .statement("SELECT * FROM Dummy")
        .fetch_all(&mut fetched)
        .limit(50)
        .build()?;

    assert_eq!(stmt.execute()?, 10);
    assert!(stmt.done());
    drop(stmt);
    assert_eq!(fetched, (0..10).collect::<Vec<i64>>());
    Ok(())
}

#[test]
fn unbounded_select_retrieves_everything_in_one_call() -> Result<(), SqlSessionError> {
    let session = seeded_session(100)?;

    let mut fetched: Vec<i64> = Vec::new();
    let mut stmt = session
        .statement("SELECT * FROM Dummy")
        .fetch_all(&mut fetched)
        .build()?;
    assert_eq!(stmt.execute()?, 100);
    assert!(stmt.done());
    drop(stmt);
    assert_eq!(fetched.len(), 100);
    Ok(())
}
