use sql_session::{Session, SqlSessionError};

fn seeded_session() -> Result<Session, SqlSessionError> {
    sql_session::memory::register();
    let session = Session::open("memory", "")?;
    session.statement("CREATE TABLE T (data INTEGER)").run()?;
    let data: Vec<i64> = (0..30).collect();
    session
        .statement("INSERT INTO T VALUES(:data)")
        .bind_each(&data)
        .run()?;
    Ok(session)
}

#[test]
fn reset_reproduces_a_full_retrieval_from_scratch() -> Result<(), SqlSessionError> {
    let session = seeded_session()?;

    let mut fetched: Vec<i64> = Vec::new();
    let mut stmt = session
        .statement("SELECT * FROM T")
        .fetch_all(&mut fetched)
        .limit(10)
        .build()?;

    // first full run
    while !stmt.done() {
        stmt.execute()?;
    }

    // partial second run, abandoned, then a clean restart
    stmt.execute()?;
    stmt.reset()?;
    assert!(!stmt.done());
    let mut total = 0;
    while !stmt.done() {
        total += stmt.execute()?;
    }
    assert_eq!(total, 30);

    drop(stmt);
    assert_eq!(fetched, (0..30).collect::<Vec<i64>>());
    Ok(())
}

#[test]
fn source_fragments_concatenate() -> Result<(), SqlSessionError> {
    let session = seeded_session()?;

    let mut count = 0i64;
    session
        .statement("SELECT COUNT(*) ")
        .sql("FROM T")
        .fetch(&mut count)
        .run()?;
    assert_eq!(count, 30);
    Ok(())
}

#[test]
fn only_the_last_limit_is_effective() -> Result<(), SqlSessionError> {
    let session = seeded_session()?;

    let mut fetched: Vec<i64> = Vec::new();
    let mut stmt = session
        .statement("SELECT * FROM T")
        .fetch_all(&mut fetched)
        .limit(5)
        .limit(20)
        .build()?;

    assert_eq!(stmt.execute()?, 20);
    assert!(!stmt.done());
    Ok(())
}

#[test]
fn rebinding_sources_are_read_at_execute_time() -> Result<(), SqlSessionError> {
    sql_session::memory::register();
    let session = Session::open("memory", "")?;
    session.statement("CREATE TABLE U (data INTEGER)").run()?;

    // the statement re-reads the bound slice on every execute
    let data: Vec<i64> = vec![1, 2, 3];
    let mut stmt = session
        .statement("INSERT INTO U VALUES(:data)")
        .bind_each(&data)
        .build()?;
    stmt.execute()?;
    stmt.execute()?;
    drop(stmt);

    let mut count = 0i64;
    session
        .statement("SELECT COUNT(*) FROM U")
        .fetch(&mut count)
        .run()?;
    assert_eq!(count, 6);
    Ok(())
}
