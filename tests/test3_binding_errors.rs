use sql_session::{Session, SqlSessionError};

fn open_session() -> Session {
    sql_session::memory::register();
    Session::open("memory", "").expect("open memory session")
}

#[test]
fn placeholder_count_mismatch_fails_at_first_execute() -> Result<(), SqlSessionError> {
    let session = open_session();
    session
        .statement("CREATE TABLE T (a INTEGER, b INTEGER)")
        .run()?;

    let a = 1i64;
    // building succeeds; the mismatch is a bind-resolution error
    let mut stmt = session
        .statement("INSERT INTO T VALUES(:a, :b)")
        .bind(&a)
        .build()?;

    match stmt.execute() {
        Err(SqlSessionError::BindingCountMismatch { placeholders, bound }) => {
            assert_eq!(placeholders, 2);
            assert_eq!(bound, 1);
        }
        other => panic!("expected BindingCountMismatch, got {other:?}"),
    }
    Ok(())
}

#[test]
fn empty_collection_fails_before_any_execution() {
    let session = open_session();
    let empty: Vec<i64> = Vec::new();
    let result = session
        .statement("INSERT INTO T VALUES(:data)")
        .bind_each(&empty)
        .build();
    assert!(matches!(result, Err(SqlSessionError::EmptyBinding)));
}

#[test]
fn bulk_bindings_must_agree_on_element_count() -> Result<(), SqlSessionError> {
    let session = open_session();
    session
        .statement("CREATE TABLE T (a INTEGER, b INTEGER)")
        .run()?;

    let lhs: Vec<i64> = vec![1, 2, 3];
    let rhs: Vec<i64> = vec![4, 5];
    let mut stmt = session
        .statement("INSERT INTO T VALUES(:a, :b)")
        .bind_each(&lhs)
        .bind_each(&rhs)
        .build()?;

    assert!(matches!(
        stmt.execute(),
        Err(SqlSessionError::BindingSizeMismatch {
            expected: 3,
            found: 2
        })
    ));
    Ok(())
}

#[test]
fn syntax_errors_surface_at_first_execute_not_at_build() -> Result<(), SqlSessionError> {
    let session = open_session();
    let mut stmt = session.statement("UPDATE T SET a = 1").build()?;
    assert!(matches!(
        stmt.execute(),
        Err(SqlSessionError::SqlSyntax(_))
    ));
    Ok(())
}

#[test]
fn output_conversion_failure_is_an_unsupported_type() -> Result<(), SqlSessionError> {
    let session = open_session();
    session.statement("CREATE TABLE Names (n TEXT)").run()?;
    let name = "alice".to_string();
    session
        .statement("INSERT INTO Names VALUES(:n)")
        .bind(&name)
        .run()?;

    let mut numbers: Vec<i64> = Vec::new();
    let result = session
        .statement("SELECT * FROM Names")
        .fetch_all(&mut numbers)
        .run();
    assert!(matches!(
        result,
        Err(SqlSessionError::UnsupportedType {
            expected: "i64",
            found: "Text"
        })
    ));
    Ok(())
}

#[test]
fn unknown_connector_is_reported_by_open() {
    sql_session::memory::register();
    match Session::open("oracle", "whatever") {
        Err(SqlSessionError::ConnectorNotFound(id)) => assert_eq!(id, "oracle"),
        other => panic!("expected ConnectorNotFound, got {other:?}"),
    }
}
